use image::{Rgb, RgbImage};
use std::path::{Path, PathBuf};

/// Background gray of the synthetic frames
pub const BACKGROUND: Rgb<u8> = Rgb([60, 60, 60]);
/// Stroke gray; the 30 level step keeps Sobel responses inside the threshold band
pub const STROKE: Rgb<u8> = Rgb([90, 90, 90]);

/// Draws a "0"-like glyph: a rectangular outline `stroke` pixels thick whose
/// top-left corner is (x0, y0).
pub fn draw_ring_glyph(img: &mut RgbImage, x0: u32, y0: u32, width: u32, height: u32, stroke: u32) {
    for y in y0..y0 + height {
        for x in x0..x0 + width {
            let on_stroke = x < x0 + stroke
                || x >= x0 + width - stroke
                || y < y0 + stroke
                || y >= y0 + height - stroke;
            if on_stroke {
                img.put_pixel(x, y, STROKE);
            }
        }
    }
}

/// 200 wide, 100 high frame with one 24x44 glyph centred at (40, 50)
pub fn single_digit_frame() -> RgbImage {
    let mut img = RgbImage::from_pixel(200, 100, BACKGROUND);
    draw_ring_glyph(&mut img, 28, 28, 24, 44, 2);
    img
}

/// Solid stroke-colored rectangle
pub fn fill_bar(img: &mut RgbImage, x0: u32, y0: u32, width: u32, height: u32) {
    for y in y0..y0 + height {
        for x in x0..x0 + width {
            img.put_pixel(x, y, STROKE);
        }
    }
}

/// 200x100 frame with a glyph in the first column: a 24x44 outline with two
/// inner bars, so the traced hole is dense enough to pass the filter.
pub fn edge_digit_frame() -> RgbImage {
    let mut img = RgbImage::from_pixel(200, 100, BACKGROUND);
    draw_ring_glyph(&mut img, 0, 28, 24, 44, 2);
    fill_bar(&mut img, 5, 34, 2, 32);
    fill_bar(&mut img, 15, 34, 2, 32);
    img
}

/// Uniform frame without any edges
pub fn flat_frame(width: u32, height: u32) -> RgbImage {
    RgbImage::from_pixel(width, height, Rgb([120, 80, 40]))
}

/// Frame with several glyphs, including some hugging the image borders
/// and one in the right half that must be ignored.
pub fn busy_frame() -> RgbImage {
    let mut img = RgbImage::from_pixel(240, 120, BACKGROUND);
    draw_ring_glyph(&mut img, 10, 20, 24, 44, 2);
    draw_ring_glyph(&mut img, 60, 40, 22, 40, 2);
    draw_ring_glyph(&mut img, 0, 70, 24, 44, 2);
    draw_ring_glyph(&mut img, 95, 5, 20, 36, 2);
    draw_ring_glyph(&mut img, 170, 30, 24, 44, 2);
    img
}

/// Saves an image as PNG into `dir` and returns its path
pub fn save_png(dir: &Path, name: &str, img: &RgbImage) -> PathBuf {
    let path = dir.join(name);
    img.save_with_format(&path, image::ImageFormat::Png)
        .expect("Failed to save test image");
    path
}

pub fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}
