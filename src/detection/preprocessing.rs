use image::{GrayImage, Luma, RgbImage};
use imageproc::gradients::{horizontal_sobel, vertical_sobel};

/// Keep the left half of the frame (columns `0..width / 2`)
pub fn crop_left_half(img: &RgbImage) -> RgbImage {
    let (width, height) = img.dimensions();
    image::imageops::crop_imm(img, 0, 0, width / 2, height).to_image()
}

/// Sobel gradient magnitude of one channel, clipped to 255
fn channel_gradient(channel: &GrayImage) -> Vec<f32> {
    let gx = horizontal_sobel(channel);
    let gy = vertical_sobel(channel);

    gx.pixels()
        .zip(gy.pixels())
        .map(|(x, y)| {
            let magnitude = (x[0] as f32).hypot(y[0] as f32);
            magnitude.min(255.0)
        })
        .collect()
}

fn extract_channel(img: &RgbImage, channel: usize) -> GrayImage {
    GrayImage::from_fn(img.width(), img.height(), |x, y| {
        Luma([img.get_pixel(x, y)[channel]])
    })
}

/// Build the edge-strength map used for thresholding.
///
/// Takes the per-pixel maximum of the three channel gradients, then zeroes
/// everything at or below `mean + noise_offset` so only edges that stand out
/// from the frame's own background survive.
pub fn gradient_map(img: &RgbImage, noise_offset: f32) -> GrayImage {
    let (width, height) = img.dimensions();
    if width == 0 || height == 0 {
        return GrayImage::new(width, height);
    }

    let mut strongest = vec![0.0f32; (width * height) as usize];
    for channel in 0..3 {
        let gradient = channel_gradient(&extract_channel(img, channel));
        for (acc, value) in strongest.iter_mut().zip(gradient) {
            *acc = acc.max(value);
        }
    }

    let mean = strongest.iter().map(|&v| v as f64).sum::<f64>() / strongest.len() as f64;
    let cutoff = mean + noise_offset as f64;

    let data = strongest
        .into_iter()
        .map(|v| if v as f64 <= cutoff { 0 } else { v as u8 })
        .collect();

    GrayImage::from_raw(width, height, data).unwrap_or_else(|| GrayImage::new(width, height))
}

/// Foreground (255) wherever `low <= value <= high`, background elsewhere
pub fn binarize(img: &GrayImage, low: u8, high: u8) -> GrayImage {
    GrayImage::from_fn(img.width(), img.height(), |x, y| {
        let value = img.get_pixel(x, y)[0];
        if value >= low && value <= high {
            Luma([255u8])
        } else {
            Luma([0u8])
        }
    })
}
