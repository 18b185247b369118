//! Integration tests for directory extraction.

mod common;

use common::*;
use image::GenericImageView;

#[test]
fn test_extract_writes_one_png_per_region() -> anyhow::Result<()> {
    init_logging();
    let input = tempfile::TempDir::new()?;
    let output = tempfile::TempDir::new()?;

    save_png(input.path(), "digit.png", &single_digit_frame());
    save_png(input.path(), "flat.png", &flat_frame(200, 100));
    std::fs::write(input.path().join("notes.txt"), "not an image")?;

    let extractor = BatchExtractor::new(
        RegionIsolator::new(),
        ExtractOptions {
            workers: Some(2),
            normalize: None,
        },
    );
    let report = extractor.run(input.path(), output.path())?;

    assert_eq!(report.processed.len(), 2);
    assert!(report.skipped.is_empty());
    assert_eq!(report.region_count(), 1);

    let written = output.path().join("digit_01.png");
    assert!(written.exists());
    let region = image::open(&written)?;
    assert_eq!(region.dimensions(), (28, 50));

    Ok(())
}

#[test]
fn test_undecodable_files_are_skipped() -> anyhow::Result<()> {
    let input = tempfile::TempDir::new()?;
    let output = tempfile::TempDir::new()?;

    save_png(input.path(), "a_digit.png", &single_digit_frame());
    std::fs::write(input.path().join("broken.png"), b"definitely not a png")?;

    let extractor = BatchExtractor::new(RegionIsolator::new(), ExtractOptions::default());
    let report = extractor.run(input.path(), output.path())?;

    assert_eq!(report.processed.len(), 1);
    assert_eq!(report.skipped.len(), 1);
    assert!(report.skipped[0].0.ends_with("broken.png"));
    assert!(output.path().join("a_digit_01.png").exists());

    Ok(())
}

#[test]
fn test_nested_inputs_and_normalized_output() -> anyhow::Result<()> {
    let input = tempfile::TempDir::new()?;
    let output = tempfile::TempDir::new()?;

    let nested = input.path().join("street").join("cam1");
    std::fs::create_dir_all(&nested)?;
    save_png(&nested, "frame.png", &single_digit_frame());

    let extractor = BatchExtractor::new(
        RegionIsolator::new(),
        ExtractOptions {
            workers: Some(4),
            normalize: Some(ClassifierInput::default()),
        },
    );
    let report = extractor.run(input.path(), output.path())?;
    assert_eq!(report.region_count(), 1);

    let region = image::open(output.path().join("street_cam1_frame_01.png"))?;
    assert_eq!(region.dimensions(), (28, 28));
    assert_eq!(region.color(), image::ColorType::L8);

    Ok(())
}

#[test]
fn test_missing_input_directory_is_an_error() {
    let output = tempfile::TempDir::new().unwrap();
    let extractor = BatchExtractor::new(RegionIsolator::new(), ExtractOptions::default());
    let missing = output.path().join("does-not-exist");
    assert!(extractor.run(&missing, output.path()).is_err());
}
