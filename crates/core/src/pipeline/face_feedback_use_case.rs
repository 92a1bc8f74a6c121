use std::sync::Arc;

use crate::bridge::domain::event_codec::{encode, encode_session, BridgeEvent};
use crate::bridge::domain::event_sink::EventSink;
use crate::detection::domain::detection::Detection;
use crate::detection::domain::frame_classifier::{classify, FrameVerdict};
use crate::detection::domain::target_box::TargetBox;
use crate::notification::domain::announcement::AnnouncementChannel;
use crate::notification::domain::narration;
use crate::notification::domain::notification_throttle::NotificationThrottle;
use crate::session::domain::session_aggregator::{SessionAggregator, SessionError, SessionResult};
use crate::shared::clock::Clock;
use crate::shared::config::FeedbackConfig;
use crate::shared::frame::Frame;
use crate::shared::geometry::{Dimensions, OverlaySpace, Point, Rect};

/// One drawable face of an [`OverlaySnapshot`].
#[derive(Clone, Debug, PartialEq)]
pub struct OverlayFace {
    pub bounds: Rect<OverlaySpace>,
    pub landmarks: Vec<Point<OverlaySpace>>,
    pub in_target: bool,
}

/// Immutable drawing list for one frame, handed to the renderer as a whole.
#[derive(Clone, Debug, PartialEq)]
pub struct OverlaySnapshot {
    pub target: Rect<OverlaySpace>,
    pub faces: Vec<OverlayFace>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct FrameReport {
    pub verdict: FrameVerdict,
    pub snapshot: Arc<OverlaySnapshot>,
    /// Set when this frame found the running session already expired.
    pub completed_session: Option<SessionResult>,
}

/// Output collaborators of [`FaceFeedbackUseCase`].
pub struct FeedbackChannels {
    /// Transient on-screen messages (live per-frame feedback).
    pub toast: Box<dyn AnnouncementChannel>,
    /// Spoken narration (session start, countdown, outcome).
    pub speech: Box<dyn AnnouncementChannel>,
    pub events: Box<dyn EventSink>,
}

/// Per-frame classification, live feedback and timed smile sessions.
///
/// Every operation takes `&mut self`; callers that deliver frames and timer
/// ticks from different threads serialize them behind one lock.
pub struct FaceFeedbackUseCase {
    config: FeedbackConfig,
    clock: Arc<dyn Clock>,
    target: TargetBox,
    session: SessionAggregator,
    throttle: NotificationThrottle,
    channels: FeedbackChannels,
}

impl FaceFeedbackUseCase {
    pub fn new(config: FeedbackConfig, clock: Arc<dyn Clock>, channels: FeedbackChannels) -> Self {
        Self {
            target: TargetBox::new(Dimensions::new(0.0, 0.0), config.target_box_ratio),
            session: SessionAggregator::new(config.smile_threshold),
            throttle: NotificationThrottle::new(config.announcement_cooldown_ms, clock.clone()),
            clock,
            config,
            channels,
        }
    }

    pub fn config(&self) -> &FeedbackConfig {
        &self.config
    }

    pub fn target_box(&self) -> &TargetBox {
        &self.target
    }

    pub fn is_session_running(&self) -> bool {
        self.session.is_running()
    }

    /// Generation of the running session, for timer validation.
    pub fn session_generation(&self) -> Option<u64> {
        self.session.generation()
    }

    /// Classifies one frame's detections and fans the verdict out to the
    /// session, live feedback and the UI bridge.
    pub fn process_frame(&mut self, frame: &Frame, detections: &[Detection]) -> FrameReport {
        if self.target.resize(frame.overlay()) {
            log::debug!("Target box recomputed: {:?}", self.target.rect());
        }

        let completed_session = self.complete_if_expired();

        let classified = classify(
            detections,
            frame.image(),
            frame.overlay(),
            frame.front_facing(),
            &self.target,
        );
        let verdict = classified.verdict;
        log::debug!(
            "Frame {}: {} ({} mapped)",
            frame.index(),
            verdict.name(),
            classified.mapped.len()
        );

        if self.session.is_running() {
            self.session.on_frame(&verdict);
        } else if let Some(announcement) = narration::live_feedback(&verdict, self.config.smile_threshold) {
            self.throttle
                .announce(&announcement, self.channels.toast.as_mut());
        }

        self.channels
            .events
            .emit(&BridgeEvent::SingleFaceInTarget(encode(&verdict)));

        let target_rect = *self.target.rect();
        let snapshot = OverlaySnapshot {
            target: target_rect,
            faces: classified
                .mapped
                .into_iter()
                .map(|face| OverlayFace {
                    in_target: target_rect.contains(&face.bounds),
                    bounds: face.bounds,
                    landmarks: face.landmarks,
                })
                .collect(),
        };

        FrameReport {
            verdict,
            snapshot: Arc::new(snapshot),
            completed_session,
        }
    }

    /// Handles a detector error for one frame: the frame counts as `NoFace`.
    ///
    /// Narrated only outside a session, so detector noise never interrupts a
    /// timed run.
    pub fn detection_failed(&mut self, error: &dyn std::error::Error) {
        if self.session.is_running() {
            log::debug!("Face detection failed during session: {error}");
        } else {
            log::warn!("Face detection failed: {error}");
            self.throttle
                .announce(&narration::detection_failed(), self.channels.toast.as_mut());
        }
        self.channels
            .events
            .emit(&BridgeEvent::SingleFaceInTarget(Vec::new()));
    }

    /// Starts a session with the configured duration.
    pub fn start_session(&mut self) -> Result<u64, SessionError> {
        self.start_session_for(self.config.session_duration_ms)
    }

    /// Starts a session; returns its generation.
    pub fn start_session_for(&mut self, duration_ms: u64) -> Result<u64, SessionError> {
        let now = self.clock.now_ms();
        match self.session.start(now, duration_ms) {
            Ok(generation) => {
                log::info!("Session {generation} started ({duration_ms}ms)");
                self.throttle.announce_now(
                    &narration::session_started(duration_ms),
                    self.channels.speech.as_mut(),
                );
                Ok(generation)
            }
            Err(e) => {
                self.reject(e);
                Err(e)
            }
        }
    }

    /// Stops the running session early. Returns `None` when idle.
    pub fn stop_session(&mut self) -> Option<SessionResult> {
        let now = self.clock.now_ms();
        match self.session.stop(now) {
            Ok(result) => {
                self.complete(&result);
                Some(result)
            }
            Err(e) => {
                self.reject(e);
                None
            }
        }
    }

    /// Periodic timer callback: completes an expired session, otherwise
    /// narrates the countdown.
    ///
    /// Only the countdown is subject to the cooldown. Start, outcome and
    /// rejection narration always reach the speech channel.
    pub fn tick(&mut self) -> Option<SessionResult> {
        if let Some(result) = self.complete_if_expired() {
            return Some(result);
        }
        if let Some(remaining) = self.session.remaining_ms(self.clock.now_ms()) {
            self.throttle
                .announce(&narration::countdown(remaining), self.channels.speech.as_mut());
        }
        None
    }

    fn complete_if_expired(&mut self) -> Option<SessionResult> {
        let result = self.session.tick(self.clock.now_ms())?;
        self.complete(&result);
        Some(result)
    }

    fn complete(&mut self, result: &SessionResult) {
        log::info!(
            "Session complete: {} ({}ms, {} faces in target, {} smiles)",
            result.outcome.category(),
            result.elapsed_ms,
            result.faces_in_target,
            result.smiles
        );
        self.throttle.announce_now(
            &narration::session_outcome(&result.outcome),
            self.channels.speech.as_mut(),
        );
        self.channels
            .events
            .emit(&BridgeEvent::SessionComplete(encode_session(result)));
    }

    fn reject(&mut self, error: SessionError) {
        log::info!("Session request rejected: {error}");
        self.throttle
            .announce_now(&narration::session_rejected(error), self.channels.speech.as_mut());
    }
}
