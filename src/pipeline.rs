use image::{GrayImage, Rgb, RgbImage};
use imageproc::drawing::draw_hollow_rect_mut;
use imageproc::rect::Rect;
use std::path::{Path, PathBuf};
use anyhow::Result;
use log::debug;
use crate::detection::candidates::Rejection;
use crate::models::{Contour, RegionOfInterest};

/// Stages of one isolator run, in execution order
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Input,
    Crop,
    Gradient,
    Threshold,
    Regions,
    Overlay,
}

impl Stage {
    pub const ALL: [Stage; 6] = [
        Stage::Input,
        Stage::Crop,
        Stage::Gradient,
        Stage::Threshold,
        Stage::Regions,
        Stage::Overlay,
    ];

    /// Human-readable name for this stage (used in logs and debug folders)
    pub fn name(&self) -> &'static str {
        match self {
            Stage::Input => "Input",
            Stage::Crop => "Crop",
            Stage::Gradient => "Gradient Map",
            Stage::Threshold => "Threshold",
            Stage::Regions => "Regions",
            Stage::Overlay => "Overlay",
        }
    }

    /// Folder name such as `02_gradient_map`
    pub fn dir_name(&self) -> String {
        let index = Stage::ALL.iter().position(|s| s == self).unwrap_or(0);
        format!("{:02}_{}", index, self.name().to_lowercase().replace(' ', "_"))
    }
}

/// Intermediate images kept from one isolator run
#[derive(Debug, Clone)]
pub struct StageTrace {
    pub cropped: RgbImage,
    pub gradient: GrayImage,
    pub binary: GrayImage,
    /// Every border of `binary`, in tracing order
    pub contours: Vec<Contour>,
    /// Filter outcome for each entry of `contours`
    pub verdicts: Vec<Result<(), Rejection>>,
}

impl StageTrace {
    pub fn contour_count(&self) -> usize {
        self.contours.len()
    }

    pub fn candidate_count(&self) -> usize {
        self.verdicts.iter().filter(|v| v.is_ok()).count()
    }

    /// Contours that passed every rule, in tracing order
    pub fn candidates(&self) -> impl Iterator<Item = &Contour> {
        self.contours
            .iter()
            .zip(&self.verdicts)
            .filter(|(_, verdict)| verdict.is_ok())
            .map(|(contour, _)| contour)
    }
}

/// Regions found in one image, together with how they were found
#[derive(Debug, Clone)]
pub struct Isolation {
    pub regions: Vec<RegionOfInterest>,
    pub trace: StageTrace,
}

/// Generate filename from a lineage (e.g., "frame_03.png").
/// Shared by the debug dump and the region writer.
pub fn lineage_filename(stem: &str, index: Option<usize>, extension: &str) -> String {
    match index {
        Some(idx) => format!("{}_{:02}.{}", stem, idx, extension),
        None => format!("{}.{}", stem, extension),
    }
}

/// Cropped image with every region outlined in red
pub fn render_overlay(isolation: &Isolation) -> RgbImage {
    let mut canvas = isolation.trace.cropped.clone();
    for roi in &isolation.regions {
        let rect = Rect::at(roi.point1.0 as i32, roi.point1.1 as i32)
            .of_size(roi.width(), roi.height());
        draw_hollow_rect_mut(&mut canvas, rect, Rgb([255u8, 0, 0]));
    }
    canvas
}

/// Debug output location for stage images
#[derive(Clone, Debug)]
pub struct DebugConfig {
    /// Root directory for debug outputs
    pub output_dir: PathBuf,
}

impl DebugConfig {
    /// Enable debug mode with output directory.
    /// The directory must be empty or non-existent.
    pub fn new(output_dir: PathBuf) -> Result<Self> {
        if output_dir.exists() {
            let entries = std::fs::read_dir(&output_dir)?;
            if entries.count() > 0 {
                return Err(anyhow::anyhow!(
                    "Debug directory is not empty: {}",
                    output_dir.display()
                ));
            }
        } else {
            std::fs::create_dir_all(&output_dir)?;
        }

        Ok(Self { output_dir })
    }

    fn stage_dir(&self, stage: Stage) -> Result<PathBuf> {
        let dir = self.output_dir.join(stage.dir_name());
        std::fs::create_dir_all(&dir)?;
        Ok(dir)
    }

    fn save_rgb(&self, stage: Stage, filename: &str, img: &RgbImage) -> Result<()> {
        let path = self.stage_dir(stage)?.join(filename);
        img.save(&path)
            .map_err(|e| anyhow::anyhow!("Failed to save debug image {}: {}", path.display(), e))?;
        debug!("Debug: saved {}/{}", stage.dir_name(), filename);
        Ok(())
    }

    fn save_gray(&self, stage: Stage, filename: &str, img: &GrayImage) -> Result<()> {
        let path = self.stage_dir(stage)?.join(filename);
        img.save(&path)
            .map_err(|e| anyhow::anyhow!("Failed to save debug image {}: {}", path.display(), e))?;
        debug!("Debug: saved {}/{}", stage.dir_name(), filename);
        Ok(())
    }

    /// Write every stage image of one run under `<output_dir>/NN_stage/`
    pub fn save(&self, stem: &str, input: &RgbImage, isolation: &Isolation) -> Result<()> {
        let trace = &isolation.trace;
        let png = lineage_filename(stem, None, "png");

        self.save_rgb(Stage::Input, &png, input)?;
        self.save_rgb(Stage::Crop, &png, &trace.cropped)?;
        self.save_gray(Stage::Gradient, &png, &trace.gradient)?;
        self.save_gray(Stage::Threshold, &png, &trace.binary)?;

        for (idx, roi) in isolation.regions.iter().enumerate() {
            let filename = lineage_filename(stem, Some(idx + 1), "png");
            self.save_rgb(Stage::Regions, &filename, &roi.image)?;
        }

        self.save_rgb(Stage::Overlay, &png, &render_overlay(isolation))?;
        Ok(())
    }

    pub fn root(&self) -> &Path {
        &self.output_dir
    }
}
