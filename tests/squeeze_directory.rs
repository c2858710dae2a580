//! End-to-end batch runs against real encoded images.
//!
//! Fixtures are generated with the `image` crate into a temporary directory,
//! squeezed with the pure Rust backend, and the results decoded again.

use image::{GenericImageView, ImageFormat, Rgb, RgbImage, Rgba, RgbaImage};
use photo_squeeze::config::SqueezeConfig;
use photo_squeeze::imaging::{ImageTransformer, Quality};
use photo_squeeze::process::{self, ProcessEvent, RunOptions};
use std::fs;
use std::path::Path;
use tempfile::TempDir;

fn write_jpeg(path: &Path, width: u32, height: u32) {
    let img = RgbImage::from_fn(width, height, |x, y| {
        Rgb([(x % 256) as u8, (y % 256) as u8, ((x + y) % 256) as u8])
    });
    img.save_with_format(path, ImageFormat::Jpeg).unwrap();
}

fn write_png(path: &Path, width: u32, height: u32) {
    let img = RgbaImage::from_fn(width, height, |x, _| {
        if x < width / 2 {
            Rgba([0, 128, 0, 255])
        } else {
            Rgba([0, 0, 0, 0])
        }
    });
    img.save_with_format(path, ImageFormat::Png).unwrap();
}

fn setup() -> (TempDir, SqueezeConfig) {
    let tmp = TempDir::new().unwrap();
    let config = SqueezeConfig {
        source_dir: tmp.path().join("converter"),
        dest_dir: tmp.path().join("convertido"),
        ..SqueezeConfig::default()
    };
    fs::create_dir_all(&config.source_dir).unwrap();
    (tmp, config)
}

fn sniff(path: &Path) -> ImageFormat {
    image::guess_format(&fs::read(path).unwrap()).unwrap()
}

#[test]
fn batch_shrinks_moves_and_skips() {
    let (_tmp, config) = setup();
    write_jpeg(&config.source_dir.join("photo.jpg"), 2048, 1536);
    write_png(&config.source_dir.join("logo.png"), 400, 200);
    fs::write(config.source_dir.join("notes.bmp"), b"BM not really").unwrap();

    let (tx, rx) = std::sync::mpsc::channel();
    let report = process::process_directory(&config, RunOptions::default(), Some(tx)).unwrap();
    let events: Vec<ProcessEvent> = rx.iter().collect();

    assert_eq!(report.processed.len(), 2);
    assert_eq!(report.failed.len(), 1);
    assert_eq!(events.len(), 4);

    // Sorted by name: logo.png, notes.bmp, photo.jpg
    assert!(report.processed[0].source.ends_with("logo.png"));
    assert!(report.failed[0].source.ends_with("notes.bmp"));
    assert!(report.processed[1].source.ends_with("photo.jpg"));

    let photo = config.dest_dir.join("photo.jpg");
    assert_eq!(sniff(&photo), ImageFormat::Jpeg);
    assert_eq!(image::open(&photo).unwrap().dimensions(), (1280, 960));
    assert!(!config.source_dir.join("photo.jpg").exists());

    // Name kept, content replaced with JPEG, small enough to stay unscaled
    let logo = config.dest_dir.join("logo.png");
    assert_eq!(sniff(&logo), ImageFormat::Jpeg);
    let decoded = image::load_from_memory(&fs::read(&logo).unwrap()).unwrap();
    assert_eq!(decoded.dimensions(), (400, 200));
    assert!(!decoded.color().has_alpha());

    // Rejected files stay put
    assert!(config.source_dir.join("notes.bmp").exists());
    assert!(!config.dest_dir.join("notes.bmp").exists());
}

#[test]
fn rename_option_gives_jpg_extension() {
    let (_tmp, mut config) = setup();
    config.output.rename_to_jpg = true;
    write_png(&config.source_dir.join("badge.png"), 64, 64);

    let report = process::process_directory(&config, RunOptions::default(), None).unwrap();

    assert_eq!(report.processed[0].dest, config.dest_dir.join("badge.jpg"));
    assert_eq!(sniff(&config.dest_dir.join("badge.jpg")), ImageFormat::Jpeg);
}

#[test]
fn quality_override_beats_size_table() {
    let (_tmp, config) = setup();
    write_jpeg(&config.source_dir.join("small.jpg"), 64, 64);

    let options = RunOptions {
        quality: Some(Quality::new(15)),
    };
    let report = process::process_directory(&config, options, None).unwrap();
    assert_eq!(report.processed[0].quality, 15);
}

#[test]
fn transformer_saves_elsewhere_without_touching_source() {
    let (tmp, config) = setup();
    let source = config.source_dir.join("tall.jpg");
    write_jpeg(&source, 1000, 2000);
    let before = fs::read(&source).unwrap();

    let mut transformer = ImageTransformer::open(&source).unwrap();
    let plan = transformer.plan();
    assert_eq!(plan.target, (480, 960));
    assert!(plan.quality_from_table);

    let out = tmp.path().join("tall-small.jpg");
    let saved = transformer.save(Some(&out), None).unwrap();
    assert_eq!(saved.path, out);
    assert_eq!(image::open(&out).unwrap().dimensions(), (480, 960));
    assert_eq!(fs::read(&source).unwrap(), before);
}

#[test]
fn report_round_trips_through_json() {
    let (tmp, config) = setup();
    write_jpeg(&config.source_dir.join("a.jpg"), 32, 32);

    let report = process::process_directory(&config, RunOptions::default(), None).unwrap();
    let path = tmp.path().join("report.json");
    report.write_json(&path).unwrap();

    let value: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
    assert_eq!(value["processed"][0]["resized"], serde_json::json!([32, 32]));
    assert!(value["failed"].as_array().unwrap().is_empty());
}
