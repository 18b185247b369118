use image::RgbImage;
use log::debug;
use crate::models::{BoundingBox, Contour, RegionOfInterest};

/// Bounding box grown by `scale` around its own center, truncated to whole pixels
pub fn expanded_box(bbox: &BoundingBox, scale: f64) -> BoundingBox {
    let width = (bbox.width as f64 * scale) as i32;
    let height = (bbox.height as f64 * scale) as i32;
    bbox.recentered(width, height)
}

/// Crop one region per contour out of `source`.
///
/// A contour whose enlarged box leaves the image (or collapses to nothing) is
/// dropped rather than clamped, so every region returned has in-bounds,
/// non-empty coordinates.
pub fn crop_regions(source: &RgbImage, contours: &[Contour], scale: f64) -> Vec<RegionOfInterest> {
    let (width, height) = source.dimensions();
    let mut regions = Vec::with_capacity(contours.len());

    for contour in contours {
        let bbox = contour.bounding_box();
        let expanded = expanded_box(&bbox, scale);

        if !expanded.fits_within(width, height) {
            debug!("dropping candidate at {bbox:?}: expanded box {expanded:?} leaves the image");
            continue;
        }

        let (x, y) = (expanded.x as u32, expanded.y as u32);
        let (w, h) = (expanded.width as u32, expanded.height as u32);
        let image = image::imageops::crop_imm(source, x, y, w, h).to_image();

        regions.push(RegionOfInterest {
            image,
            point1: (x, y),
            point2: (x + w, y + h),
        });
    }

    regions
}
