use image::DynamicImage;
use image::imageops::FilterType;
use thiserror::Error;
use crate::models::RegionOfInterest;

/// Square edge length the digit classifier was trained on
pub const CLASSIFIER_INPUT_SIZE: u32 = 28;

#[derive(Debug, Error, PartialEq)]
pub enum NormalizeError {
    #[error("classifier input size must be non-zero")]
    ZeroSize,
}

/// Shape of the images fed to the classifier
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClassifierInput {
    pub size: u32,
    pub grayscale: bool,
}

impl Default for ClassifierInput {
    fn default() -> Self {
        Self {
            size: CLASSIFIER_INPUT_SIZE,
            grayscale: true,
        }
    }
}

impl ClassifierInput {
    pub fn new(size: u32, grayscale: bool) -> Result<Self, NormalizeError> {
        if size == 0 {
            return Err(NormalizeError::ZeroSize);
        }
        Ok(Self { size, grayscale })
    }

    /// Number of channels per pixel in the normalized image
    pub fn channels(&self) -> u8 {
        if self.grayscale { 1 } else { 3 }
    }

    /// Stretch a region to `size` x `size`; the aspect ratio is not kept
    pub fn normalize(&self, region: &RegionOfInterest) -> DynamicImage {
        let resized = image::imageops::resize(
            &region.image,
            self.size,
            self.size,
            FilterType::Triangle,
        );
        let rgb = DynamicImage::ImageRgb8(resized);

        if self.grayscale {
            DynamicImage::ImageLuma8(rgb.to_luma8())
        } else {
            rgb
        }
    }
}
