use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::thread::JoinHandle;
use std::time::Duration;

use crossbeam_channel::{Receiver, Sender, TrySendError};

use crate::detection::domain::face_detector::FaceDetector;
use crate::pipeline::face_feedback_use_case::{FaceFeedbackUseCase, OverlaySnapshot};
use crate::session::domain::session_aggregator::{SessionError, SessionResult};
use crate::session::infrastructure::session_ticker::SessionTicker;
use crate::shared::frame::Frame;

type SharedSnapshot = Arc<Mutex<Option<Arc<OverlaySnapshot>>>>;

/// Runs [`FaceFeedbackUseCase`] against a live camera feed.
///
/// Layout: `camera → submit → detect worker → feedback` plus one
/// [`SessionTicker`] per running session. Frames arriving while the worker
/// is busy are dropped rather than queued, so feedback always reflects a
/// recent frame. Frame processing, ticks and session commands all run
/// under the same lock.
pub struct LiveFeedbackRunner {
    feedback: Arc<Mutex<FaceFeedbackUseCase>>,
    snapshot: SharedSnapshot,
    frame_tx: Option<Sender<Frame>>,
    worker: Option<JoinHandle<()>>,
    ticker: Option<SessionTicker>,
    tick_interval: Duration,
}

impl LiveFeedbackRunner {
    pub fn new(feedback: FaceFeedbackUseCase, detector: Box<dyn FaceDetector>) -> Self {
        let tick_interval = Duration::from_millis(feedback.config().tick_interval_ms.max(1));
        let feedback = Arc::new(Mutex::new(feedback));
        let snapshot: SharedSnapshot = Arc::new(Mutex::new(None));

        // Rendezvous channel: a send only succeeds while the worker is idle.
        let (frame_tx, frame_rx) = crossbeam_channel::bounded::<Frame>(0);
        let worker = spawn_worker(detector, frame_rx, feedback.clone(), snapshot.clone());

        Self {
            feedback,
            snapshot,
            frame_tx: Some(frame_tx),
            worker: Some(worker),
            ticker: None,
            tick_interval,
        }
    }

    /// Offers a frame to the worker. Returns `false` when it was dropped.
    pub fn submit(&self, frame: Frame) -> bool {
        let Some(tx) = &self.frame_tx else {
            return false;
        };
        match tx.try_send(frame) {
            Ok(()) => true,
            Err(TrySendError::Full(frame)) => {
                log::trace!("Worker busy, dropping frame {}", frame.index());
                false
            }
            Err(TrySendError::Disconnected(_)) => false,
        }
    }

    /// Drawing list of the most recently processed frame.
    pub fn latest_snapshot(&self) -> Option<Arc<OverlaySnapshot>> {
        lock(&self.snapshot).clone()
    }

    pub fn is_session_running(&self) -> bool {
        lock(&self.feedback).is_session_running()
    }

    /// Starts a session and its periodic timer.
    pub fn start_session(&mut self) -> Result<u64, SessionError> {
        let generation = lock(&self.feedback).start_session()?;

        if let Some(previous) = self.ticker.take() {
            previous.join();
        }

        let feedback = self.feedback.clone();
        self.ticker = Some(SessionTicker::spawn(self.tick_interval, move || {
            let mut feedback = lock(&feedback);
            // A tick queued behind a stop or restart must not touch the
            // session that replaced it.
            if feedback.session_generation() != Some(generation) {
                return false;
            }
            feedback.tick().is_none()
        }));
        Ok(generation)
    }

    /// Stops the running session early; no session event follows the one
    /// emitted here.
    pub fn stop_session(&mut self) -> Option<SessionResult> {
        let result = lock(&self.feedback).stop_session();
        if let Some(ticker) = self.ticker.take() {
            ticker.join();
        }
        result
    }

    /// Stops accepting frames and waits for the worker and timer threads.
    pub fn shutdown(mut self) {
        self.frame_tx.take();
        if let Some(ticker) = self.ticker.take() {
            ticker.join();
        }
        if let Some(worker) = self.worker.take() {
            if worker.join().is_err() {
                log::error!("Feedback worker thread panicked");
            }
        }
    }
}

impl Drop for LiveFeedbackRunner {
    fn drop(&mut self) {
        self.frame_tx.take();
        if let Some(ticker) = self.ticker.as_mut() {
            ticker.cancel();
        }
    }
}

fn spawn_worker(
    mut detector: Box<dyn FaceDetector>,
    frame_rx: Receiver<Frame>,
    feedback: Arc<Mutex<FaceFeedbackUseCase>>,
    snapshot: SharedSnapshot,
) -> JoinHandle<()> {
    std::thread::spawn(move || {
        for frame in frame_rx {
            // Detection runs outside the lock so ticks and commands are not
            // held up by a slow detector.
            let detected = detector.detect(&frame);
            let mut feedback = lock(&feedback);
            match detected {
                Ok(detections) => {
                    let report = feedback.process_frame(&frame, &detections);
                    *lock(&snapshot) = Some(report.snapshot);
                }
                Err(e) => feedback.detection_failed(e.as_ref()),
            }
        }
        log::debug!("Feedback worker stopped");
    })
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}
