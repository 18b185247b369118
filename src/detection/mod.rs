pub mod preprocessing;
pub mod contours;
pub mod candidates;
pub mod regions;
pub mod normalize;

use image::RgbImage;
use log::debug;
use crate::config::{ConfigError, IsolatorConfig};
use crate::models::RegionOfInterest;
use crate::pipeline::{Isolation, StageTrace};
use candidates::CandidateFilter;

/// Finds digit-like regions in camera frames.
///
/// Holds only its configuration, so one instance can serve any number of
/// images, including from several threads at once.
#[derive(Debug, Clone)]
pub struct RegionIsolator {
    config: IsolatorConfig,
    filter: CandidateFilter,
}

impl RegionIsolator {
    pub fn new() -> Self {
        Self::from_valid(IsolatorConfig::default())
    }

    /// Build an isolator with custom thresholds, rejecting inconsistent ones
    pub fn with_config(config: IsolatorConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self::from_valid(config))
    }

    fn from_valid(config: IsolatorConfig) -> Self {
        Self {
            filter: CandidateFilter::new(config.clone()),
            config,
        }
    }

    /// Thresholds this isolator runs with
    pub fn config(&self) -> &IsolatorConfig {
        &self.config
    }

    /// Run the full pipeline on an image and return the candidate regions.
    /// An image without candidates yields an empty list.
    pub fn isolate(&self, img: &RgbImage) -> Vec<RegionOfInterest> {
        self.isolate_traced(img).regions
    }

    /// Same as [`isolate`](Self::isolate) but keeps the intermediate images
    pub fn isolate_traced(&self, img: &RgbImage) -> Isolation {
        // Step 1: Restrict to the region of interest
        let cropped = preprocessing::crop_left_half(img);
        debug!(
            "Cropped {}x{} -> {}x{}",
            img.width(),
            img.height(),
            cropped.width(),
            cropped.height()
        );

        // Step 2: Edge strength across all channels
        let gradient = preprocessing::gradient_map(&cropped, self.config.noise_offset);

        // Step 3: Intensity band
        let binary = preprocessing::binarize(&gradient, self.config.band_low, self.config.band_high);

        // Step 4: Borders with hierarchy
        let all_contours = contours::find_contours(&binary);
        debug!("Found {} contours", all_contours.len());

        // Step 5: Digit heuristics
        let verdicts = self.filter.evaluate(&all_contours, &binary);
        let candidates: Vec<_> = all_contours
            .iter()
            .zip(&verdicts)
            .filter(|(_, verdict)| verdict.is_ok())
            .map(|(contour, _)| contour.clone())
            .collect();
        debug!(
            "Kept {} candidates (from {} contours)",
            candidates.len(),
            all_contours.len()
        );

        // Step 6: Cut out the color regions
        let regions = regions::crop_regions(&cropped, &candidates, self.config.margin_scale);
        debug!("Returning {} regions", regions.len());

        Isolation {
            regions,
            trace: StageTrace {
                cropped,
                gradient,
                binary,
                contours: all_contours,
                verdicts,
            },
        }
    }
}

impl Default for RegionIsolator {
    fn default() -> Self {
        Self::new()
    }
}
