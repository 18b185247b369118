use image::ImageReader;
use std::path::{Path, PathBuf};
use std::sync::mpsc;
use std::sync::{Arc, Mutex};
use std::thread;
use anyhow::Result;
use log::{debug, info, warn};
use walkdir::WalkDir;
use crate::detection::RegionIsolator;
use crate::detection::normalize::ClassifierInput;
use crate::models::RegionOfInterest;
use crate::pipeline::lineage_filename;

/// Default folder scanned for raw frames
pub const DEFAULT_INPUT_DIR: &str = "images_to_extract";
/// Default folder receiving extracted regions
pub const DEFAULT_OUTPUT_DIR: &str = "data_extracted";

const IMAGE_EXTENSIONS: [&str; 7] = ["png", "jpg", "jpeg", "bmp", "tif", "tiff", "webp"];

/// Batch extraction settings
#[derive(Debug, Clone, Default)]
pub struct ExtractOptions {
    /// Worker threads; `None` uses the available parallelism
    pub workers: Option<usize>,
    /// Resize regions to the classifier input before writing them
    pub normalize: Option<ClassifierInput>,
}

/// Regions written for one input image
#[derive(Debug, Clone)]
pub struct ImageOutcome {
    pub path: PathBuf,
    pub written: Vec<PathBuf>,
}

/// Summary of a batch run, sorted by input path
#[derive(Debug, Default)]
pub struct BatchReport {
    pub processed: Vec<ImageOutcome>,
    pub skipped: Vec<(PathBuf, String)>,
}

impl BatchReport {
    pub fn region_count(&self) -> usize {
        self.processed.iter().map(|o| o.written.len()).sum()
    }
}

/// Write regions as PNG files into `dir`, optionally normalized
pub fn write_regions(
    regions: &[RegionOfInterest],
    stem: &str,
    dir: &Path,
    normalize: Option<&ClassifierInput>,
) -> Result<Vec<PathBuf>> {
    std::fs::create_dir_all(dir)?;

    let mut written = Vec::with_capacity(regions.len());
    for (idx, roi) in regions.iter().enumerate() {
        let path = dir.join(lineage_filename(stem, Some(idx + 1), "png"));
        let result = match normalize {
            Some(input) => input.normalize(roi).save(&path),
            None => roi.image.save(&path),
        };
        result.map_err(|e| anyhow::anyhow!("Failed to save region {}: {}", path.display(), e))?;
        written.push(path);
    }

    Ok(written)
}

/// Image files below `dir`, sorted by path
pub fn collect_inputs(dir: &Path) -> Result<Vec<PathBuf>> {
    if !dir.is_dir() {
        return Err(anyhow::anyhow!("Input directory not found: {}", dir.display()));
    }

    let mut inputs = Vec::new();
    for entry in WalkDir::new(dir).sort_by_file_name() {
        let entry = entry?;
        if !entry.file_type().is_file() {
            continue;
        }
        let is_image = entry
            .path()
            .extension()
            .and_then(|ext| ext.to_str())
            .map(|ext| IMAGE_EXTENSIONS.contains(&ext.to_lowercase().as_str()))
            .unwrap_or(false);
        if is_image {
            inputs.push(entry.into_path());
        }
    }

    Ok(inputs)
}

/// Flatten a path below `root` into a file stem: `a/b/frame.jpg` -> `a_b_frame`
fn output_stem(root: &Path, path: &Path) -> String {
    let relative = path.strip_prefix(root).unwrap_or(path);
    let mut parts: Vec<String> = relative
        .parent()
        .map(|p| {
            p.components()
                .map(|c| c.as_os_str().to_string_lossy().into_owned())
                .collect()
        })
        .unwrap_or_default();
    let stem = relative
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "image".to_string());
    parts.push(stem);
    parts.join("_")
}

/// Runs the isolator over a directory of frames with a pool of worker threads
pub struct BatchExtractor {
    isolator: Arc<RegionIsolator>,
    options: ExtractOptions,
}

impl BatchExtractor {
    pub fn new(isolator: RegionIsolator, options: ExtractOptions) -> Self {
        Self {
            isolator: Arc::new(isolator),
            options,
        }
    }

    fn worker_count(&self, jobs: usize) -> usize {
        let wanted = self.options.workers.unwrap_or_else(|| {
            thread::available_parallelism()
                .map(|n| n.get())
                .unwrap_or(1)
        });
        wanted.clamp(1, jobs.max(1))
    }

    fn process_one(&self, root: &Path, path: &Path, output_dir: &Path) -> Result<ImageOutcome> {
        let img = ImageReader::open(path)?
            .with_guessed_format()?
            .decode()
            .map_err(|e| anyhow::anyhow!("Failed to decode image: {}", e))?
            .to_rgb8();

        let regions = self.isolator.isolate(&img);
        debug!("{}: {} regions", path.display(), regions.len());

        let written = write_regions(
            &regions,
            &output_stem(root, path),
            output_dir,
            self.options.normalize.as_ref(),
        )?;

        Ok(ImageOutcome {
            path: path.to_path_buf(),
            written,
        })
    }

    /// Extract regions of every image in `input_dir` into `output_dir`.
    /// Unreadable files are reported in the summary and do not stop the batch.
    pub fn run(&self, input_dir: &Path, output_dir: &Path) -> Result<BatchReport> {
        let inputs = collect_inputs(input_dir)?;
        std::fs::create_dir_all(output_dir)?;

        let workers = self.worker_count(inputs.len());
        info!("Extracting {} images with {} workers", inputs.len(), workers);

        let (job_sender, job_receiver) = mpsc::channel::<PathBuf>();
        let (result_sender, result_receiver) = mpsc::channel::<(PathBuf, Result<ImageOutcome>)>();
        let job_receiver = Arc::new(Mutex::new(job_receiver));

        for path in inputs {
            job_sender
                .send(path)
                .map_err(|e| anyhow::anyhow!("Failed to queue image: {}", e))?;
        }
        drop(job_sender);

        let mut report = BatchReport::default();

        thread::scope(|scope| {
            for _ in 0..workers {
                let jobs = Arc::clone(&job_receiver);
                let results = result_sender.clone();
                scope.spawn(move || {
                    loop {
                        let next = match jobs.lock() {
                            Ok(receiver) => receiver.recv(),
                            Err(_) => break,
                        };
                        let Ok(path) = next else { break };

                        let outcome = self.process_one(input_dir, &path, output_dir);
                        if results.send((path, outcome)).is_err() {
                            break;
                        }
                    }
                });
            }
            drop(result_sender);

            for (path, outcome) in result_receiver {
                match outcome {
                    Ok(done) => report.processed.push(done),
                    Err(e) => {
                        warn!("Skipping {}: {}", path.display(), e);
                        report.skipped.push((path, e.to_string()));
                    }
                }
            }
        });

        report.processed.sort_by(|a, b| a.path.cmp(&b.path));
        report.skipped.sort_by(|a, b| a.0.cmp(&b.0));

        info!(
            "Wrote {} regions from {} images ({} skipped)",
            report.region_count(),
            report.processed.len(),
            report.skipped.len()
        );

        Ok(report)
    }
}
