//! Fixture helpers shared by the integration tests.
#![allow(dead_code)]

use image::{ImageFormat, ImageReader, Rgb, RgbImage, Rgba, RgbaImage};
use imgbatch::pipeline::TaskRunner;
use imgbatch::{CancelToken, Task, TaskOutcome};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

/// RGBA test pattern with varied colour and alpha per pixel.
pub fn pattern_rgba(width: u32, height: u32) -> RgbaImage {
    RgbaImage::from_fn(width, height, |x, y| {
        Rgba([
            (x * 37 % 256) as u8,
            (y * 59 % 256) as u8,
            ((x + y) * 11 % 256) as u8,
            (255 - (x * 3 % 200)) as u8,
        ])
    })
}

pub fn write_png(path: &Path, width: u32, height: u32) {
    ensure_parent(path);
    pattern_rgba(width, height)
        .save_with_format(path, ImageFormat::Png)
        .unwrap();
}

pub fn write_bmp(path: &Path, width: u32, height: u32) {
    ensure_parent(path);
    pattern_rgba(width, height)
        .save_with_format(path, ImageFormat::Bmp)
        .unwrap();
}

/// Cut the file at `path` down to `keep` bytes.
pub fn truncate(path: &Path, keep: u64) {
    fs::OpenOptions::new()
        .write(true)
        .open(path)
        .unwrap()
        .set_len(keep)
        .unwrap();
}

pub fn write_jpg(path: &Path, width: u32, height: u32) {
    ensure_parent(path);
    RgbImage::from_fn(width, height, |x, y| Rgb([(x % 256) as u8, (y % 256) as u8, 128]))
        .save_with_format(path, ImageFormat::Jpeg)
        .unwrap();
}

pub fn write_text(path: &Path, text: &str) {
    ensure_parent(path);
    fs::write(path, text).unwrap();
}

fn ensure_parent(path: &Path) {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).unwrap();
    }
}

/// Dimensions and sniffed format of the image at `path`.
pub fn probe(path: &Path) -> ((u32, u32), ImageFormat) {
    let reader = ImageReader::open(path)
        .unwrap()
        .with_guessed_format()
        .unwrap();
    let format = reader.format().unwrap();
    let img = reader.decode().unwrap();
    ((img.width(), img.height()), format)
}

/// Canonical temp dir path (tests compare against canonical paths from the walker).
pub fn canonical(dir: &tempfile::TempDir) -> PathBuf {
    dir.path().canonicalize().unwrap()
}

/// Runner that records every path it is asked to run and reports success.
/// Like the file executor, it does nothing once `cancel` is set.
#[derive(Default)]
pub struct RecordingRunner {
    pub seen: Mutex<Vec<PathBuf>>,
    pub cancel: CancelToken,
}

impl RecordingRunner {
    pub fn with_cancel(cancel: CancelToken) -> Self {
        RecordingRunner {
            seen: Mutex::new(Vec::new()),
            cancel,
        }
    }

    pub fn seen_sorted(&self) -> Vec<PathBuf> {
        let mut seen = self.seen.lock().unwrap().clone();
        seen.sort();
        seen
    }
}

impl TaskRunner for RecordingRunner {
    fn run(&self, task: &Task) -> Option<TaskOutcome> {
        if self.cancel.is_cancelled() {
            return None;
        }
        self.seen.lock().unwrap().push(task.path.clone());
        Some(TaskOutcome::succeeded(&task.path))
    }
}
