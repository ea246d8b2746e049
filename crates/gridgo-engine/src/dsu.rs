//! Disjoint-set union with path compression and union by rank.
//!
//! Tracks which cells are already connected while Kruskal's algorithm
//! decides which walls to remove. Indices are the row-major cell index
//! `row * cols + col`; passing an index `>= len()` is a caller bug.

/// A forest of disjoint sets over `0..n`.
#[derive(Debug, Clone)]
pub struct DisjointSet {
    parent: Vec<usize>,
    rank: Vec<u32>,
    sets: usize,
}

impl DisjointSet {
    /// Create `n` singleton sets.
    #[must_use]
    pub fn new(n: usize) -> Self {
        Self {
            parent: (0..n).collect(),
            rank: vec![0; n],
            sets: n,
        }
    }

    /// Number of elements.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.parent.len()
    }

    /// Whether the forest holds no elements.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.parent.is_empty()
    }

    /// Number of disjoint sets remaining.
    #[must_use]
    pub const fn set_count(&self) -> usize {
        self.sets
    }

    /// Representative of the set containing `i`.
    ///
    /// Every node on the walk is re-pointed directly at the root. Two
    /// passes over the chain keep this iterative, so very long chains on
    /// large grids cannot overflow the stack.
    pub fn find(&mut self, i: usize) -> usize {
        let mut root = i;
        while self.parent[root] != root {
            root = self.parent[root];
        }

        let mut node = i;
        while self.parent[node] != root {
            let next = self.parent[node];
            self.parent[node] = root;
            node = next;
        }
        root
    }

    /// Merge the sets containing `i` and `j`.
    ///
    /// The lower-rank root is attached under the higher-rank root. On a
    /// tie, `i`'s root goes under `j`'s root and `j`'s root gains a rank.
    ///
    /// Returns `true` if the two were in different sets.
    pub fn union(&mut self, i: usize, j: usize) -> bool {
        let root_i = self.find(i);
        let root_j = self.find(j);
        if root_i == root_j {
            return false;
        }

        match self.rank[root_i].cmp(&self.rank[root_j]) {
            std::cmp::Ordering::Less => self.parent[root_i] = root_j,
            std::cmp::Ordering::Greater => self.parent[root_j] = root_i,
            std::cmp::Ordering::Equal => {
                self.parent[root_i] = root_j;
                self.rank[root_j] += 1;
            }
        }
        self.sets -= 1;
        true
    }

    /// Whether `i` and `j` are currently in the same set.
    pub fn connected(&mut self, i: usize, j: usize) -> bool {
        self.find(i) == self.find(j)
    }
}
