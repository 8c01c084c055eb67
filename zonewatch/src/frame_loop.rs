//! The per-frame driver: detect, filter, map the ROI, evaluate the zone,
//! annotate the frame, restyle the ROI, and schedule speech — one cycle
//! in flight at a time, re-triggered per ready frame so a slow detector
//! simply skips frames instead of queueing them.

use std::time::Instant;

use image::RgbImage;
use zonewatch_common::alert::{visual_state, VisualState};
use zonewatch_common::detection::{filter_by_confidence, unique_classes, Detection};
use zonewatch_common::geometry::{map_screen_to_video, Dimensions, ScreenRect};
use zonewatch_common::overlay::{draw_detections, draw_roi, OverlayStyle};
use zonewatch_common::voice::{SpeechKind, SpeechSynth, VoiceNotifier};
use zonewatch_common::zone::{evaluate, ZoneEvaluation};

use crate::capture::{FrameSource, SessionState};
use crate::detector::Detector;
use crate::event_log::{EventLog, Severity};

/// Spoken when a person enters the danger zone. Always preempts the
/// object-list announcement.
pub const DANGER_PHRASE: &str = "Alert! Person in danger zone.";

/// Everything one cycle produced, for callers that render or inspect it.
#[derive(Debug, Clone)]
pub struct CycleOutcome {
    pub detections: Vec<Detection>,
    pub evaluation: ZoneEvaluation,
    /// ROI styling for this frame; `None` when the ROI was inactive or
    /// its mapping was skipped.
    pub visual: Option<VisualState>,
    pub spoke: bool,
}

/// Returned by the per-frame callback to keep running or stop the loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoopControl {
    Continue,
    Stop,
}

pub struct FrameLoop<D, S> {
    detector: D,
    speech: S,
    notifier: VoiceNotifier,
    session: SessionState,
    roi: ScreenRect,
    display_dims: Dimensions,
    style: OverlayStyle,
    events: EventLog,
}

impl<D: Detector, S: SpeechSynth> FrameLoop<D, S> {
    pub fn new(detector: D, speech: S, display_dims: Dimensions) -> Self {
        Self {
            detector,
            speech,
            notifier: VoiceNotifier::new(),
            session: SessionState::default(),
            roi: ScreenRect::new(0.0, 0.0, 150.0, 150.0),
            display_dims,
            style: OverlayStyle::new(),
            events: EventLog::new(),
        }
    }

    pub fn with_style(mut self, style: OverlayStyle) -> Self {
        self.style = style;
        self
    }

    pub fn session(&self) -> &SessionState {
        &self.session
    }

    pub fn session_mut(&mut self) -> &mut SessionState {
        &mut self.session
    }

    pub fn roi_mut(&mut self) -> &mut ScreenRect {
        &mut self.roi
    }

    pub fn events(&self) -> &EventLog {
        &self.events
    }

    /// Toggle the informational voice; danger alerts keep sounding.
    pub fn set_info_voice(&mut self, enabled: bool) {
        self.notifier.set_info_enabled(&mut self.speech, enabled);
        if enabled {
            self.events.push(Severity::Info, "Object voice enabled.");
        } else {
            self.events
                .push(Severity::Warning, "Object voice disabled. Danger alerts will still sound.");
        }
    }

    /// Set the stop guard. Checked at the top of each cycle: the loop
    /// exits without scheduling another one, and an in-flight detection
    /// result is discarded with its frame.
    pub fn stop(&mut self) {
        self.session.detecting = false;
    }

    /// Drive cycles until the source ends, the stop guard is set, or the
    /// callback asks to stop. The source is released synchronously on
    /// exit. Returns the number of completed cycles.
    pub fn run<F, C>(&mut self, source: &mut F, mut on_frame: C) -> u64
    where
        F: FrameSource,
        C: FnMut(&RgbImage, &CycleOutcome) -> LoopControl,
    {
        self.session.detecting = true;
        self.events
            .push(Severity::Info, "Detection started. Real-time monitoring active.");

        let mut completed = 0;
        loop {
            if !self.session.detecting {
                break;
            }
            let Some(mut frame) = source.next_frame() else {
                break;
            };
            if let Some(outcome) = self.run_cycle(&mut frame, Instant::now()) {
                completed += 1;
                if on_frame(&frame, &outcome) == LoopControl::Stop {
                    self.stop();
                }
            }
        }

        source.release();
        self.session.detecting = false;
        self.events.push(Severity::Info, "System stopped.");
        completed
    }

    /// One detect/evaluate/annotate/announce cycle over a ready frame.
    /// Returns `None` when detection failed; the error is logged and the
    /// frame skipped, each frame's failure independent of the next.
    pub fn run_cycle(&mut self, frame: &mut RgbImage, now: Instant) -> Option<CycleOutcome> {
        let raw = match self.detector.detect(frame) {
            Ok(raw) => raw,
            Err(err) => {
                self.events
                    .push(Severity::Error, format!("Detection failed: {err:#}"));
                return None;
            }
        };

        let detections = filter_by_confidence(raw, self.session.min_confidence);
        let mirrored = self.session.facing.is_mirrored();
        let video_dims = Dimensions::new(frame.width() as f32, frame.height() as f32);

        let roi_rect = if self.session.roi_active {
            map_screen_to_video(self.roi, video_dims, self.display_dims, mirrored)
        } else {
            None
        };

        let evaluation = evaluate(&detections, roi_rect.as_ref());
        draw_detections(frame, &detections, &evaluation.in_zone, mirrored, &self.style);

        let visual = roi_rect.map(|rect| {
            let state = visual_state(evaluation.state, rect.proximity_radius());
            draw_roi(frame, &rect, &state);
            state
        });

        let spoke = if evaluation.state.is_danger() {
            // Alert preempts the object-list announcement this frame.
            self.notifier
                .notify(&mut self.speech, DANGER_PHRASE, SpeechKind::Alert, now)
        } else {
            let classes = unique_classes(&detections);
            if classes.is_empty() {
                false
            } else {
                self.notifier
                    .notify(&mut self.speech, &classes.join(", "), SpeechKind::Info, now)
            }
        };

        Some(CycleOutcome {
            detections,
            evaluation,
            visual,
            spoke,
        })
    }
}
