use image::GrayImage;
use log::debug;
use crate::config::IsolatorConfig;
use crate::models::{BoundingBox, Contour, Hierarchy};

/// Why a contour was turned down; only used for diagnostics
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rejection {
    Hierarchy,
    Area,
    Size,
    Aspect,
    Margin,
    Density,
}

/// Geometric and statistical rules deciding which contours look like digits
#[derive(Debug, Clone)]
pub struct CandidateFilter {
    config: IsolatorConfig,
}

impl CandidateFilter {
    pub fn new(config: IsolatorConfig) -> Self {
        Self { config }
    }

    /// Leaf holes, or components that enclose at least one hole.
    /// Structureless top-level specks fail.
    pub fn accepts_hierarchy(&self, hierarchy: &Hierarchy) -> bool {
        let leaf_child = !hierarchy.is_top_level() && !hierarchy.has_children();
        let top_with_children = hierarchy.is_top_level() && hierarchy.has_children();
        let nested_with_children = !hierarchy.is_top_level() && hierarchy.has_children();
        leaf_child || top_with_children || nested_with_children
    }

    pub fn accepts_area(&self, area: f64) -> bool {
        area > self.config.min_area && area < self.config.max_area
    }

    pub fn accepts_size(&self, bbox: &BoundingBox) -> bool {
        bbox.width < self.config.max_width && bbox.height < self.config.max_height
    }

    pub fn accepts_aspect(&self, bbox: &BoundingBox) -> bool {
        if bbox.height <= 0 {
            return false;
        }
        let ratio = bbox.aspect_ratio();
        ratio > self.config.min_aspect && ratio < self.config.max_aspect
    }

    /// Percentages at either limit are rejected
    pub fn accepts_density(&self, percent: f64) -> bool {
        percent > self.config.min_density && percent < self.config.max_density
    }

    /// Run every rule in order, stopping at the first failure
    pub fn check(&self, contour: &Contour, binary: &GrayImage) -> Result<(), Rejection> {
        if !self.accepts_hierarchy(&contour.hierarchy) {
            return Err(Rejection::Hierarchy);
        }
        if !self.accepts_area(contour.area()) {
            return Err(Rejection::Area);
        }

        let bbox = contour.bounding_box();
        if !self.accepts_size(&bbox) {
            return Err(Rejection::Size);
        }
        if !self.accepts_aspect(&bbox) {
            return Err(Rejection::Aspect);
        }

        let window = bbox.recentered(bbox.width, bbox.height);
        let (width, height) = binary.dimensions();
        if !window.fits_strictly_within(width, height) {
            return Err(Rejection::Margin);
        }

        if !self.accepts_density(foreground_percent(binary, &window)) {
            return Err(Rejection::Density);
        }

        Ok(())
    }

    /// Verdict for every contour, index-aligned with `contours`
    pub fn evaluate(&self, contours: &[Contour], binary: &GrayImage) -> Vec<Result<(), Rejection>> {
        contours
            .iter()
            .enumerate()
            .map(|(idx, contour)| {
                let verdict = self.check(contour, binary);
                if let Err(reason) = verdict {
                    if reason != Rejection::Hierarchy && reason != Rejection::Area {
                        debug!("contour {idx} rejected: {reason:?} ({:?})", contour.bounding_box());
                    }
                }
                verdict
            })
            .collect()
    }

    /// Keep the contours that pass every rule, preserving their order
    pub fn filter(&self, contours: &[Contour], binary: &GrayImage) -> Vec<Contour> {
        contours
            .iter()
            .zip(self.evaluate(contours, binary))
            .filter(|(_, verdict)| verdict.is_ok())
            .map(|(contour, _)| contour.clone())
            .collect()
    }
}

/// Share of 255 pixels inside `window`, in percent.
/// The window must already lie inside the image.
pub fn foreground_percent(binary: &GrayImage, window: &BoundingBox) -> f64 {
    let total = window.width as u64 * window.height as u64;
    if total == 0 {
        return 0.0;
    }

    let mut white = 0u64;
    for y in window.y..window.bottom() {
        for x in window.x..window.right() {
            if binary.get_pixel(x as u32, y as u32)[0] == 255 {
                white += 1;
            }
        }
    }

    white as f64 * 100.0 / total as f64
}
