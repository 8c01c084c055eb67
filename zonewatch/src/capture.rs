//! Capture-source modeling. The actual device API is an external
//! collaborator; this module carries the named quality presets, the
//! facing-mode toggle, and the trait the frame loop pulls frames from,
//! plus the session state the loop owns instead of free globals.

use clap::ValueEnum;
use image::RgbImage;
use zonewatch_common::detection::DEFAULT_MIN_CONFIDENCE;
use zonewatch_common::geometry::Dimensions;

/// Named stream quality presets; the capture API resolves unsupported
/// constraints with its own fallback.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum QualityPreset {
    Low,
    #[default]
    Medium,
    High,
}

impl QualityPreset {
    pub fn ideal_dimensions(&self) -> Dimensions {
        match self {
            QualityPreset::Low => Dimensions::new(640.0, 480.0),
            QualityPreset::Medium => Dimensions::new(1280.0, 720.0),
            QualityPreset::High => Dimensions::new(1920.0, 1080.0),
        }
    }
}

/// Which camera is preferred. The front-facing (`User`) camera renders
/// mirrored, which the coordinate mapper and overlay must correct for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum FacingMode {
    #[default]
    Environment,
    User,
}

impl FacingMode {
    pub fn toggle(&mut self) {
        *self = match self {
            FacingMode::Environment => FacingMode::User,
            FacingMode::User => FacingMode::Environment,
        };
    }

    pub fn is_mirrored(&self) -> bool {
        matches!(self, FacingMode::User)
    }
}

/// Constraints handed to the capture API when requesting a stream.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CaptureConstraints {
    pub preset: QualityPreset,
    pub facing: FacingMode,
}

impl CaptureConstraints {
    pub fn ideal_dimensions(&self) -> Dimensions {
        self.preset.ideal_dimensions()
    }
}

/// A ready frame stream. Owned exclusively by the frame loop; `release`
/// is called synchronously on stop, before any new stream is requested.
pub trait FrameSource {
    fn dimensions(&self) -> Dimensions;
    /// The next ready frame, or `None` when the stream has ended.
    fn next_frame(&mut self) -> Option<RgbImage>;
    fn release(&mut self);
}

/// Mutable per-session switches, gathered in one place and owned by the
/// frame loop driver.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SessionState {
    /// Cleared by `stop()`; checked at the top of every cycle.
    pub detecting: bool,
    pub facing: FacingMode,
    pub preset: QualityPreset,
    pub min_confidence: f32,
    pub roi_active: bool,
}

impl Default for SessionState {
    fn default() -> Self {
        Self {
            detecting: false,
            facing: FacingMode::default(),
            preset: QualityPreset::default(),
            min_confidence: DEFAULT_MIN_CONFIDENCE,
            roi_active: false,
        }
    }
}

/// Replays a recorded frame sequence from a directory of image files in
/// name order. Stands in for a live capture stream, which is an external
/// collaborator this build does not link.
pub struct DirectorySource {
    frames: std::collections::VecDeque<std::path::PathBuf>,
    dims: Dimensions,
}

impl DirectorySource {
    pub fn open(dir: &std::path::Path) -> anyhow::Result<Self> {
        use anyhow::Context;

        let mut paths: Vec<_> = std::fs::read_dir(dir)
            .with_context(|| format!("Failed to read frame directory {dir:?}"))?
            .filter_map(|entry| entry.ok().map(|e| e.path()))
            .filter(|p| {
                matches!(
                    p.extension().and_then(|e| e.to_str()),
                    Some("jpeg" | "jpg" | "png")
                )
            })
            .collect();
        paths.sort();
        anyhow::ensure!(!paths.is_empty(), "No frames found in {dir:?}");

        // The first frame fixes the stream resolution.
        let first = image::open(&paths[0])
            .with_context(|| format!("Failed to open first frame {:?}", paths[0]))?;
        let dims = Dimensions::new(first.width() as f32, first.height() as f32);

        Ok(Self {
            frames: paths.into(),
            dims,
        })
    }
}

impl FrameSource for DirectorySource {
    fn dimensions(&self) -> Dimensions {
        self.dims
    }

    fn next_frame(&mut self) -> Option<RgbImage> {
        while let Some(path) = self.frames.pop_front() {
            match image::open(&path) {
                Ok(img) => return Some(img.to_rgb8()),
                Err(err) => {
                    log::warn!("Skipping unreadable frame {path:?}: {err}");
                }
            }
        }
        None
    }

    fn release(&mut self) {
        self.frames.clear();
    }
}
