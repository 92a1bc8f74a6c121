//! Timed smile session: counts accepted faces and smiles over a fixed window.

use thiserror::Error;

use crate::detection::domain::frame_classifier::FrameVerdict;
use crate::shared::constants::{DEFAULT_SMILE_THRESHOLD, MIN_SCORED_SESSION_MS};

#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionError {
    #[error("detection already running")]
    AlreadyRunning,
    #[error("no detection running")]
    NotRunning,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RunningSession {
    pub started_at_ms: u64,
    pub duration_ms: u64,
    pub faces_in_target: u32,
    pub smiles: u32,
    /// Distinguishes this session from earlier and later ones, so a stale
    /// timer tick can recognise it no longer applies.
    pub generation: u64,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SessionState {
    Idle,
    Running(RunningSession),
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SessionOutcome {
    TooEarly,
    Positive { smiles: u32, elapsed_secs: u64 },
    NeutralFacePresent { elapsed_secs: u64 },
    NoFaceSeen { elapsed_secs: u64 },
}

impl SessionOutcome {
    /// Priority: too short, then any smile, then any accepted face.
    pub fn derive(elapsed_ms: u64, faces_in_target: u32, smiles: u32) -> Self {
        let elapsed_secs = elapsed_ms / 1000;
        if elapsed_ms < MIN_SCORED_SESSION_MS {
            SessionOutcome::TooEarly
        } else if smiles > 0 {
            SessionOutcome::Positive {
                smiles,
                elapsed_secs,
            }
        } else if faces_in_target > 0 {
            SessionOutcome::NeutralFacePresent { elapsed_secs }
        } else {
            SessionOutcome::NoFaceSeen { elapsed_secs }
        }
    }

    pub fn category(&self) -> &'static str {
        match self {
            SessionOutcome::TooEarly => "too_early",
            SessionOutcome::Positive { .. } => "positive",
            SessionOutcome::NeutralFacePresent { .. } => "neutral_face_present",
            SessionOutcome::NoFaceSeen { .. } => "no_face_seen",
        }
    }
}

/// Snapshot produced once per completed session.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SessionResult {
    pub elapsed_ms: u64,
    pub faces_in_target: u32,
    pub smiles: u32,
    pub outcome: SessionOutcome,
}

/// Single owner of the session state. Callers pass the current time so the
/// machine itself stays free of clocks and timers.
pub struct SessionAggregator {
    state: SessionState,
    smile_threshold: f64,
    next_generation: u64,
}

impl SessionAggregator {
    pub fn new(smile_threshold: f64) -> Self {
        Self {
            state: SessionState::Idle,
            smile_threshold,
            next_generation: 1,
        }
    }

    pub fn state(&self) -> &SessionState {
        &self.state
    }

    pub fn is_running(&self) -> bool {
        matches!(self.state, SessionState::Running(_))
    }

    /// Generation of the running session, if any.
    pub fn generation(&self) -> Option<u64> {
        match &self.state {
            SessionState::Running(s) => Some(s.generation),
            SessionState::Idle => None,
        }
    }

    /// Starts a session with zeroed counters; returns its generation.
    ///
    /// A second `start` while running leaves the first session untouched.
    pub fn start(&mut self, now_ms: u64, duration_ms: u64) -> Result<u64, SessionError> {
        if self.is_running() {
            return Err(SessionError::AlreadyRunning);
        }
        let generation = self.next_generation;
        self.next_generation += 1;
        self.state = SessionState::Running(RunningSession {
            started_at_ms: now_ms,
            duration_ms,
            faces_in_target: 0,
            smiles: 0,
            generation,
        });
        Ok(generation)
    }

    /// Counts a frame. Only `SingleInTarget` contributes; every other verdict
    /// is tolerated without penalty. Returns whether the frame was counted.
    pub fn on_frame(&mut self, verdict: &FrameVerdict) -> bool {
        let SessionState::Running(session) = &mut self.state else {
            return false;
        };
        let FrameVerdict::SingleInTarget(face) = verdict else {
            return false;
        };
        session.faces_in_target += 1;
        if face
            .smile_probability
            .is_some_and(|p| p > self.smile_threshold)
        {
            session.smiles += 1;
        }
        true
    }

    pub fn remaining_ms(&self, now_ms: u64) -> Option<u64> {
        match &self.state {
            SessionState::Running(s) => {
                let elapsed = now_ms.saturating_sub(s.started_at_ms);
                Some(s.duration_ms.saturating_sub(elapsed))
            }
            SessionState::Idle => None,
        }
    }

    /// Completes the session once its duration has elapsed, exactly as
    /// [`stop`](Self::stop) would.
    pub fn tick(&mut self, now_ms: u64) -> Option<SessionResult> {
        match self.remaining_ms(now_ms) {
            Some(0) => self.stop(now_ms).ok(),
            _ => None,
        }
    }

    pub fn stop(&mut self, now_ms: u64) -> Result<SessionResult, SessionError> {
        let SessionState::Running(session) = std::mem::replace(&mut self.state, SessionState::Idle)
        else {
            return Err(SessionError::NotRunning);
        };
        let elapsed_ms = now_ms.saturating_sub(session.started_at_ms);
        Ok(SessionResult {
            elapsed_ms,
            faces_in_target: session.faces_in_target,
            smiles: session.smiles,
            outcome: SessionOutcome::derive(elapsed_ms, session.faces_in_target, session.smiles),
        })
    }
}

impl Default for SessionAggregator {
    fn default() -> Self {
        Self::new(DEFAULT_SMILE_THRESHOLD)
    }
}
