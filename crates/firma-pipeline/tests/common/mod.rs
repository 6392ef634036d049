//! Synthetic signatures shared by the integration tests.

#![allow(dead_code, clippy::unwrap_used)]

use firma_pipeline::{GrayImage, PhysicalSize};
use image::Luma;
use imageproc::drawing::draw_filled_circle_mut;

/// Canvas of the synthetic scans.
pub const WIDTH: u32 = 600;
pub const HEIGHT: u32 = 300;

/// Physical size matching [`WIDTH`] x [`HEIGHT`] at 4 px/mm.
pub const PHYSICAL: PhysicalSize = PhysicalSize::new(150.0, 75.0);

pub fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

/// Drag a round pen of `radius` along the polyline.
pub fn stroke(img: &mut GrayImage, points: &[(f64, f64)], radius: i32, ink: u8) {
    for pair in points.windows(2) {
        let ((x0, y0), (x1, y1)) = (pair[0], pair[1]);
        let steps = (x1 - x0).hypot(y1 - y0).ceil().max(1.0) as usize;
        for i in 0..=steps {
            let t = i as f64 / steps as f64;
            let center = (
                (x0 + t * (x1 - x0)).round() as i32,
                (y0 + t * (y1 - y0)).round() as i32,
            );
            draw_filled_circle_mut(img, center, radius, Luma([ink]));
        }
    }
}

/// Closed elliptical stroke.
pub fn ellipse(cx: f64, cy: f64, rx: f64, ry: f64) -> Vec<(f64, f64)> {
    (0..=72)
        .map(|i| {
            let a = f64::from(i) * 5.0_f64.to_radians();
            (cx + rx * a.cos(), cy + ry * a.sin())
        })
        .collect()
}

/// A handwritten-looking name: two looped letters, a slanted stem, a
/// small eyelet and a wavy tail, drawn as five separate strokes.
///
/// Only the eyelet is small enough to count as a loop on the analysis
/// canvas.
pub fn signature() -> GrayImage {
    let mut img = GrayImage::from_pixel(WIDTH, HEIGHT, Luma([255]));
    stroke(&mut img, &ellipse(110.0, 160.0, 40.0, 50.0), 4, 40);
    stroke(&mut img, &[(190.0, 220.0), (230.0, 80.0)], 4, 60);
    stroke(&mut img, &ellipse(300.0, 170.0, 35.0, 40.0), 3, 30);
    stroke(&mut img, &ellipse(340.0, 80.0, 14.0, 18.0), 3, 35);
    let tail: Vec<(f64, f64)> = (0..=60)
        .map(|i| {
            let x = 370.0 + f64::from(i) * 3.5;
            (x, 180.0 + 25.0 * (f64::from(i) * 0.35).sin())
        })
        .collect();
    stroke(&mut img, &tail, 4, 50);
    img
}

/// [`signature`] encoded as PNG.
pub fn signature_png() -> Vec<u8> {
    encode_png(&signature())
}

pub fn encode_png(img: &GrayImage) -> Vec<u8> {
    let mut buf = Vec::new();
    let encoder = image::codecs::png::PngEncoder::new(&mut buf);
    image::ImageEncoder::write_image(
        encoder,
        img.as_raw(),
        img.width(),
        img.height(),
        image::ExtendedColorType::L8,
    )
    .unwrap();
    buf
}
