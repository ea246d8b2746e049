//! Integration test: trace a silhouette into a maze, solve it, and export
//! both formats.

#![allow(clippy::unwrap_used)]

use gridgo_engine::{EngineConfig, GenerateRequest, SolveRequest, generate, solve};
use gridgo_export::{RenderOptions, SvgMetadata, to_png, to_svg};
use image::{DynamicImage, GrayImage, Luma};
use rand::SeedableRng;
use rand::rngs::StdRng;

/// A dark disc on a white background, PNG-encoded.
fn disc_png(size: u32) -> Vec<u8> {
    let r = f64::from(size) / 3.0;
    let mid = f64::from(size) / 2.0;
    let img = GrayImage::from_fn(size, size, |x, y| {
        let d = (f64::from(x) - mid).hypot(f64::from(y) - mid);
        Luma([if d < r { 10 } else { 250 }])
    });
    let mut bytes = Vec::new();
    DynamicImage::ImageLuma8(img)
        .write_to(&mut std::io::Cursor::new(&mut bytes), image::ImageFormat::Png)
        .unwrap();
    bytes
}

#[test]
fn silhouette_maze_to_svg_and_png() {
    let mut request = GenerateRequest::new(24, 24, "image");
    request.image = Some(disc_png(96));
    let mut rng = StdRng::seed_from_u64(2024);
    let response = generate(&request, &EngineConfig::default(), &mut rng).unwrap();
    assert!(response.stats.perfect);

    let solution = solve(&SolveRequest {
        maze: response.maze.clone(),
        algorithm: "astar".to_string(),
    })
    .unwrap();
    assert!(solution.is_solved());

    let svg = to_svg(
        &response.maze,
        Some(&solution),
        &SvgMetadata {
            title: Some("disc"),
            description: Some("image 24x24 seed 2024"),
        },
    );
    assert!(svg.contains("<svg"));
    assert!(svg.contains(r#"id="solution""#));
    // The disc outline shows up as black walls.
    assert!(svg.contains(r##"stroke="#000000""##));
    assert!(svg.trim_end().ends_with("</svg>"));

    let png = to_png(&response.maze, &RenderOptions::default(), Some(&solution)).unwrap();
    let decoded = image::load_from_memory(&png).unwrap().to_rgba8();
    assert_eq!(decoded.dimensions(), (241, 241));
    assert!(decoded.pixels().any(|p| p.0 == [0, 0, 0, 255]));
}
