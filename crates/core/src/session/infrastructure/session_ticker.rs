use std::thread::JoinHandle;
use std::time::Duration;

use crossbeam_channel::{select, Sender};

/// Periodic timer thread that drives one session's expiry and countdown.
///
/// `on_tick` returns `false` to end the timer (session completed or no longer
/// current). [`cancel`](Self::cancel) only disconnects the cancel channel and
/// never blocks, so it is safe to call while holding the lock `on_tick`
/// takes; callers must still re-validate inside `on_tick`, because a tick
/// may already be waiting on that lock.
pub struct SessionTicker {
    cancel_tx: Option<Sender<()>>,
    handle: Option<JoinHandle<()>>,
}

impl SessionTicker {
    pub fn spawn<F>(interval: Duration, mut on_tick: F) -> Self
    where
        F: FnMut() -> bool + Send + 'static,
    {
        let (cancel_tx, cancel_rx) = crossbeam_channel::bounded::<()>(0);
        let ticks = crossbeam_channel::tick(interval);

        let handle = std::thread::spawn(move || loop {
            select! {
                recv(cancel_rx) -> _ => break,
                recv(ticks) -> _ => {
                    if !on_tick() {
                        break;
                    }
                }
            }
        });

        Self {
            cancel_tx: Some(cancel_tx),
            handle: Some(handle),
        }
    }

    pub fn cancel(&mut self) {
        self.cancel_tx.take();
    }

    pub fn is_finished(&self) -> bool {
        self.handle.as_ref().map_or(true, |h| h.is_finished())
    }

    /// Cancels and waits for the thread. Must not be called while holding a
    /// lock that `on_tick` acquires.
    pub fn join(mut self) {
        self.cancel();
        if let Some(handle) = self.handle.take() {
            if handle.join().is_err() {
                log::error!("Session ticker thread panicked");
            }
        }
    }
}

impl Drop for SessionTicker {
    fn drop(&mut self) {
        self.cancel();
    }
}
