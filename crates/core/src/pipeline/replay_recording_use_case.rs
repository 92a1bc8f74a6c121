use std::iter::Peekable;
use std::sync::Arc;
use std::time::Instant;
use std::vec::IntoIter;

use crate::detection::domain::face_detector::FaceDetector;
use crate::detection::infrastructure::recording::{Recording, SessionAction, SessionCommand};
use crate::pipeline::face_feedback_use_case::{FaceFeedbackUseCase, FeedbackChannels};
use crate::pipeline::pipeline_logger::PipelineLogger;
use crate::session::domain::session_aggregator::SessionResult;
use crate::shared::clock::{Clock, ManualClock};
use crate::shared::config::FeedbackConfig;

/// Verdict name reported to the logger for frames the detector failed on.
const DETECTION_FAILED: &str = "detection_failed";

#[derive(Clone, Debug, Default, PartialEq)]
pub struct ReplaySummary {
    pub frames_processed: usize,
    pub detection_failures: usize,
    pub sessions: Vec<SessionResult>,
}

/// Replays a recorded detection stream through [`FaceFeedbackUseCase`] on
/// simulated time.
///
/// Frame timestamps drive a [`ManualClock`]. Scheduled start/stop commands
/// and the periodic session tick are interleaved with frames in time order,
/// so a replay produces the same announcements and events on every run.
pub struct ReplayRecordingUseCase {
    feedback: FaceFeedbackUseCase,
    clock: Arc<ManualClock>,
    detector: Box<dyn FaceDetector>,
    logger: Box<dyn PipelineLogger>,
    tick_interval_ms: u64,
    next_tick_ms: Option<u64>,
}

impl ReplayRecordingUseCase {
    pub fn new(
        config: FeedbackConfig,
        channels: FeedbackChannels,
        detector: Box<dyn FaceDetector>,
        logger: Box<dyn PipelineLogger>,
    ) -> Self {
        let clock = Arc::new(ManualClock::new(0));
        let tick_interval_ms = config.tick_interval_ms.max(1);
        Self {
            feedback: FaceFeedbackUseCase::new(config, clock.clone(), channels),
            clock,
            detector,
            logger,
            tick_interval_ms,
            next_tick_ms: None,
        }
    }

    pub fn feedback(&self) -> &FaceFeedbackUseCase {
        &self.feedback
    }

    pub fn execute(
        &mut self,
        recording: &Recording,
    ) -> Result<ReplaySummary, Box<dyn std::error::Error>> {
        let frames = recording.frame_infos();
        let total = frames.len();
        let mut commands = recording.sorted_commands().into_iter().peekable();
        let mut summary = ReplaySummary::default();

        self.logger.info(&format!(
            "Replaying {total} frames, {} session commands",
            recording.commands.len()
        ));

        for frame in &frames {
            self.advance_to(frame.timestamp_ms(), &mut commands, &mut summary);
            self.clock.set(frame.timestamp_ms());

            let t0 = Instant::now();
            let detected = self.detector.detect(frame);
            self.logger.timing("detect", elapsed_ms(t0));

            let t1 = Instant::now();
            match detected {
                Ok(detections) => {
                    let report = self.feedback.process_frame(frame, &detections);
                    self.logger.verdict(report.verdict.name());
                    if let Some(result) = report.completed_session {
                        self.record(result, &mut summary);
                    }
                }
                Err(e) => {
                    self.feedback.detection_failed(e.as_ref());
                    self.logger.verdict(DETECTION_FAILED);
                    summary.detection_failures += 1;
                }
            }
            self.logger.timing("feedback", elapsed_ms(t1));
            self.sync_ticker();

            summary.frames_processed += 1;
            self.logger.progress(summary.frames_processed, total);
        }

        // Remaining commands, then ticks until any running session completes.
        self.advance_to(u64::MAX, &mut commands, &mut summary);

        self.logger.summary();
        Ok(summary)
    }

    /// Applies every command and tick scheduled at or before `until_ms`.
    /// A tick due at the same time as a command runs first.
    fn advance_to(
        &mut self,
        until_ms: u64,
        commands: &mut Peekable<IntoIter<SessionCommand>>,
        summary: &mut ReplaySummary,
    ) {
        loop {
            let next_command = commands.peek().map(|c| c.at_ms).filter(|&at| at <= until_ms);
            let next_tick = self.next_tick_ms.filter(|&at| at <= until_ms);

            match (next_command, next_tick) {
                (None, None) => break,
                (Some(command_at), Some(tick_at)) if tick_at <= command_at => {
                    self.run_tick(tick_at, summary)
                }
                (None, Some(tick_at)) => self.run_tick(tick_at, summary),
                (Some(_), _) => {
                    if let Some(command) = commands.next() {
                        self.run_command(&command, summary);
                    }
                }
            }
        }
    }

    fn run_tick(&mut self, at_ms: u64, summary: &mut ReplaySummary) {
        self.clock.set(at_ms);
        match self.feedback.tick() {
            Some(result) => self.record(result, summary),
            None => self.next_tick_ms = Some(at_ms.saturating_add(self.tick_interval_ms)),
        }
        self.sync_ticker();
    }

    fn run_command(&mut self, command: &SessionCommand, summary: &mut ReplaySummary) {
        let now = command.at_ms.max(self.clock.now_ms());
        self.clock.set(now);
        match command.action {
            SessionAction::Start => {
                if self.feedback.start_session().is_ok() {
                    self.next_tick_ms = Some(now.saturating_add(self.tick_interval_ms));
                }
            }
            SessionAction::Stop => {
                if let Some(result) = self.feedback.stop_session() {
                    self.record(result, summary);
                }
            }
        }
        self.sync_ticker();
    }

    /// Drops the simulated timer once no session is running.
    fn sync_ticker(&mut self) {
        if !self.feedback.is_session_running() {
            self.next_tick_ms = None;
        }
    }

    fn record(&mut self, result: SessionResult, summary: &mut ReplaySummary) {
        self.logger.session(result.outcome.category());
        summary.sessions.push(result);
    }
}

fn elapsed_ms(since: Instant) -> f64 {
    since.elapsed().as_secs_f64() * 1000.0
}
