mod capture;
mod detector;
mod event_log;
mod frame_loop;
mod process_image;

use std::path::PathBuf;

use clap::Parser;
use tracing_subscriber::prelude::*;
use zonewatch_common::detection::DEFAULT_MIN_CONFIDENCE;
use zonewatch_common::geometry::{Dimensions, ScreenRect};
use zonewatch_common::overlay::OverlayStyle;
use zonewatch_common::voice::{SpeechSynth, Utterance};

use crate::capture::{CaptureConstraints, DirectorySource, FacingMode, FrameSource, QualityPreset};
use crate::detector::JsonDetector;
use crate::frame_loop::{FrameLoop, LoopControl};

#[derive(Debug, Parser)]
pub struct Args {
    /// Path to an input image (.jpeg/.png), a directory of recorded
    /// frames to monitor, or "camera" for a live feed.
    input: PathBuf,
    /// Detections sidecar file produced by the external model run.
    /// Defaults to the input path with a .json extension (or
    /// detections.json inside a frame directory).
    #[arg(long, short)]
    detections: Option<PathBuf>,
    /// Minimum confidence for a detection to be kept, in [0, 1].
    #[arg(long, default_value_t = DEFAULT_MIN_CONFIDENCE)]
    confidence: f32,
    /// Stream quality preset requested from the capture source.
    #[arg(long, value_enum, default_value_t = QualityPreset::Medium)]
    resolution: QualityPreset,
    /// Preferred camera facing mode. The user-facing camera renders
    /// mirrored.
    #[arg(long, value_enum, default_value_t = FacingMode::Environment)]
    facing: FacingMode,
    /// Danger-zone rectangle in layout pixels, as "left,top,width,height".
    /// Activates zone monitoring.
    #[arg(long, value_parser = parse_screen_rect)]
    roi: Option<ScreenRect>,
    /// On-screen size of the video container, as "WIDTHxHEIGHT". The ROI
    /// is mapped from this space into frame pixels under the cover fit.
    #[arg(long, value_parser = parse_dimensions, default_value = "640x360")]
    display: Dimensions,
    /// TrueType font used for overlay labels. Boxes are still drawn
    /// without one.
    #[arg(long)]
    font: Option<PathBuf>,
    /// Silence the object-list announcements; danger alerts still sound.
    #[arg(long)]
    quiet_info: bool,
}

fn main() -> anyhow::Result<()> {
    // Initialize logging.
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "warn,zonewatch=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let args = Args::parse();

    let style = match &args.font {
        Some(path) => match std::fs::read(path) {
            Ok(bytes) => OverlayStyle::with_font_bytes(bytes)?,
            Err(err) => {
                log::warn!("Could not read font {path:?}: {err}. Labels will be boxes only.");
                OverlayStyle::new()
            }
        },
        None => OverlayStyle::new(),
    };

    let input_str = args.input.to_string_lossy();
    if input_str == "camera" {
        // No capture backend is wired into this build; mirror the
        // capture-unavailable fallback: not fatal, point at file input.
        let constraints = CaptureConstraints {
            preset: args.resolution,
            facing: args.facing,
        };
        log::warn!(
            "Camera capture is not available in this build (requested {:?} ideal). \
             Pass an image file or a frame directory instead.",
            constraints.ideal_dimensions()
        );
        return Ok(());
    }

    if args.input.is_dir() {
        return run_monitor(&args, style);
    }

    match args.input.extension().and_then(|os_str| os_str.to_str()) {
        Some("jpeg" | "jpg" | "png") => {
            let detections_path = args
                .detections
                .clone()
                .unwrap_or_else(|| args.input.with_extension("json"));
            // A detector that fails to load is a blocking error; nothing
            // can run until it is fixed.
            let mut detector = JsonDetector::from_file(&detections_path)?;
            process_image::process_image(&args.input, &mut detector, args.confidence, &style)?;
        }
        Some(unk) => log::error!("Unhandled file extension: {unk}"),
        None => log::error!(
            "Input path does not have valid file extension: {:?}",
            args.input
        ),
    }

    Ok(())
}

/// Monitor a recorded frame sequence: full per-frame pipeline with zone
/// evaluation and (logged) voice announcements.
fn run_monitor(args: &Args, style: OverlayStyle) -> anyhow::Result<()> {
    let detections_path = args
        .detections
        .clone()
        .unwrap_or_else(|| args.input.join("detections.json"));
    let detector = JsonDetector::from_file(&detections_path)?;

    let mut source = DirectorySource::open(&args.input)?;
    log::info!(
        "Monitoring {:?} at {:?} native resolution",
        args.input,
        source.dimensions()
    );

    let mut frame_loop = FrameLoop::new(detector, LogSpeech, args.display).with_style(style);
    frame_loop.session_mut().min_confidence = args.confidence;
    frame_loop.session_mut().preset = args.resolution;
    frame_loop.session_mut().facing = args.facing;
    if let Some(roi) = args.roi {
        frame_loop.session_mut().roi_active = true;
        *frame_loop.roi_mut() = roi;
    }
    if args.quiet_info {
        frame_loop.set_info_voice(false);
    }
    let session = frame_loop.session();
    log::debug!(
        "Session: facing {:?}, requested capture {:?}, min confidence {}",
        session.facing,
        session.preset.ideal_dimensions(),
        session.min_confidence
    );

    let mut last_label = None;
    let completed = frame_loop.run(&mut source, |_, outcome| {
        if let Some(visual) = &outcome.visual {
            if last_label != Some(visual.label) {
                log::info!("Zone state: {}", visual.label);
                last_label = Some(visual.label);
            }
        }
        LoopControl::Continue
    });

    log::info!("Processed {completed} frames.");
    for entry in frame_loop.events().entries() {
        log::debug!("[{}] {:.1}s {}", entry.severity.tag(), entry.at.as_secs_f32(), entry.message);
    }
    Ok(())
}

/// Stand-in speech engine: announcements go to the log instead of a
/// synthesizer.
struct LogSpeech;

impl SpeechSynth for LogSpeech {
    fn speak(&mut self, utterance: &Utterance) {
        log::info!("[voice {}] {}", utterance.lang, utterance.text);
    }

    fn cancel(&mut self) {}
}

fn parse_screen_rect(s: &str) -> Result<ScreenRect, String> {
    let parts: Vec<f32> = s
        .split(',')
        .map(|p| p.trim().parse::<f32>())
        .collect::<Result<_, _>>()
        .map_err(|e| format!("invalid rect component: {e}"))?;
    match parts.as_slice() {
        [left, top, width, height] => Ok(ScreenRect::new(*left, *top, *width, *height)),
        _ => Err("expected left,top,width,height".to_string()),
    }
}

fn parse_dimensions(s: &str) -> Result<Dimensions, String> {
    let (w, h) = s
        .split_once('x')
        .ok_or_else(|| "expected WIDTHxHEIGHT".to_string())?;
    let width = w.trim().parse::<f32>().map_err(|e| e.to_string())?;
    let height = h.trim().parse::<f32>().map_err(|e| e.to_string())?;
    Ok(Dimensions::new(width, height))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_screen_rect() {
        assert_eq!(
            parse_screen_rect("100,50,80,60").unwrap(),
            ScreenRect::new(100.0, 50.0, 80.0, 60.0)
        );
        assert!(parse_screen_rect("1,2,3").is_err());
        assert!(parse_screen_rect("a,b,c,d").is_err());
    }

    #[test]
    fn test_parse_dimensions() {
        assert_eq!(
            parse_dimensions("640x360").unwrap(),
            Dimensions::new(640.0, 360.0)
        );
        assert!(parse_dimensions("640").is_err());
    }
}
