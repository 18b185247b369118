use clap::{Parser, Subcommand};
use image::ImageReader;
use log::{debug, info};
use std::path::PathBuf;

use digitroi::batch::{self, DEFAULT_INPUT_DIR, DEFAULT_OUTPUT_DIR};
use digitroi::detection::normalize::CLASSIFIER_INPUT_SIZE;
use digitroi::{
    BatchExtractor, ClassifierInput, DebugConfig, ExtractOptions, IsolatorConfig, RegionIsolator,
};

#[derive(Parser)]
#[command(name = "digitroi")]
#[command(about = "Locate digit-like regions in camera images")]
struct Cli {
    /// JSON file overriding the isolator thresholds
    #[arg(long, global = true, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Find candidate regions in a single image
    Isolate {
        /// Path to input image file
        #[arg(value_name = "IMAGE")]
        image_path: PathBuf,

        /// Write each region as a PNG into this directory
        #[arg(long, value_name = "DIR")]
        save_dir: Option<PathBuf>,

        /// Save debug outputs to directory (must be empty)
        #[arg(long, value_name = "DIR")]
        debug_out: Option<PathBuf>,

        /// Resize saved regions to the classifier input shape
        #[arg(long)]
        normalize: bool,
    },
    /// Extract regions from every image in a directory
    Extract {
        #[arg(value_name = "INPUT", default_value = DEFAULT_INPUT_DIR)]
        input: PathBuf,

        #[arg(value_name = "OUTPUT", default_value = DEFAULT_OUTPUT_DIR)]
        output: PathBuf,

        /// Worker threads (defaults to available parallelism)
        #[arg(long)]
        workers: Option<usize>,

        /// Resize regions to the classifier input shape
        #[arg(long)]
        normalize: bool,

        /// Classifier input edge length
        #[arg(long, default_value_t = CLASSIFIER_INPUT_SIZE)]
        size: u32,

        /// Keep three color channels when normalizing
        #[arg(long)]
        rgb: bool,
    },
}

fn main() -> anyhow::Result<()> {
    let args = Cli::parse();

    let level = if args.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level)).init();

    let config = match &args.config {
        Some(path) => IsolatorConfig::load(path)?,
        None => IsolatorConfig::default(),
    };
    let isolator = RegionIsolator::with_config(config)?;
    debug!("Isolator config: {:?}", isolator.config());

    match args.command {
        Command::Isolate {
            image_path,
            save_dir,
            debug_out,
            normalize,
        } => {
            info!("Loading image: {:?}", image_path);
            let img = ImageReader::open(&image_path)?
                .decode()
                .map_err(|e| anyhow::anyhow!("Failed to decode image: {}", e))?
                .to_rgb8();
            info!("Image loaded: {}x{}", img.width(), img.height());

            let debug = debug_out.map(DebugConfig::new).transpose()?;
            let isolation = isolator.isolate_traced(&img);

            let stem = image_path
                .file_stem()
                .map(|s| s.to_string_lossy().into_owned())
                .unwrap_or_else(|| "image".to_string());

            if let Some(debug) = &debug {
                debug.save(&stem, &img, &isolation)?;
                info!("Debug images written to {}", debug.root().display());
            }

            println!("\n=== Region Isolation Results ===");
            println!(
                "Contours: {}, candidates: {}, regions: {}",
                isolation.trace.contour_count(),
                isolation.trace.candidate_count(),
                isolation.regions.len()
            );

            if args.verbose {
                println!("\nContour details (first 10):");
                let trace = &isolation.trace;
                let details = trace.contours.iter().zip(&trace.verdicts).take(10);
                for (i, (contour, verdict)) in details.enumerate() {
                    let bbox = contour.bounding_box();
                    let outcome = match verdict {
                        Ok(()) => "candidate".to_string(),
                        Err(reason) => format!("rejected ({:?})", reason),
                    };
                    println!(
                        "  Contour {}: pos=({}, {}), size={}x{}, area={:.0}, {}",
                        i + 1,
                        bbox.x,
                        bbox.y,
                        bbox.width,
                        bbox.height,
                        contour.area(),
                        outcome
                    );
                }
            }

            if isolation.regions.is_empty() {
                println!("No digit candidates found.");
            } else {
                for (i, roi) in isolation.regions.iter().enumerate() {
                    println!(
                        "  Region {}: ({}, {}) -> ({}, {})  {}x{}",
                        i + 1,
                        roi.point1.0,
                        roi.point1.1,
                        roi.point2.0,
                        roi.point2.1,
                        roi.width(),
                        roi.height()
                    );
                }
            }

            if let Some(dir) = save_dir {
                let input = normalize.then(ClassifierInput::default);
                let written = batch::write_regions(&isolation.regions, &stem, &dir, input.as_ref())?;
                println!("Saved {} regions to {}", written.len(), dir.display());
            }
        }
        Command::Extract {
            input,
            output,
            workers,
            normalize,
            size,
            rgb,
        } => {
            let normalize = if normalize {
                Some(ClassifierInput::new(size, !rgb)?)
            } else {
                None
            };

            let extractor = BatchExtractor::new(isolator, ExtractOptions { workers, normalize });
            let report = extractor.run(&input, &output)?;

            println!("\n=== Extraction Results ===");
            println!("Images processed: {}", report.processed.len());
            println!("Regions written: {}", report.region_count());
            if !report.skipped.is_empty() {
                println!("Skipped {} files:", report.skipped.len());
                for (path, reason) in &report.skipped {
                    println!("  {}: {}", path.display(), reason);
                }
            }
        }
    }

    Ok(())
}
