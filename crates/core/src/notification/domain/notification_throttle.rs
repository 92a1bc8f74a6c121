use std::sync::Arc;

use crate::notification::domain::announcement::{Announcement, AnnouncementChannel};
use crate::shared::clock::Clock;

/// Global cooldown between user-facing announcements.
///
/// The cooldown is shared across messages and channels: once anything is
/// announced, everything else passed to [`announce`](Self::announce) is
/// dropped until the window passes. Session lifecycle messages use
/// [`announce_now`](Self::announce_now), which always delivers but still
/// restarts the window.
pub struct NotificationThrottle {
    cooldown_ms: u64,
    last_accepted_ms: Option<u64>,
    clock: Arc<dyn Clock>,
}

impl NotificationThrottle {
    pub fn new(cooldown_ms: u64, clock: Arc<dyn Clock>) -> Self {
        Self {
            cooldown_ms,
            last_accepted_ms: None,
            clock,
        }
    }

    /// Delivers the announcement unless it falls inside the cooldown window.
    ///
    /// Returns whether it was delivered.
    pub fn announce(
        &mut self,
        announcement: &Announcement,
        channel: &mut dyn AnnouncementChannel,
    ) -> bool {
        let now = self.clock.now_ms();
        if let Some(last) = self.last_accepted_ms {
            if now.saturating_sub(last) < self.cooldown_ms {
                log::trace!("Suppressed announcement: {}", announcement.message);
                return false;
            }
        }
        self.accept(now, announcement, channel);
        true
    }

    /// Delivers regardless of the cooldown and restarts the window.
    pub fn announce_now(
        &mut self,
        announcement: &Announcement,
        channel: &mut dyn AnnouncementChannel,
    ) {
        let now = self.clock.now_ms();
        self.accept(now, announcement, channel);
    }

    fn accept(
        &mut self,
        now: u64,
        announcement: &Announcement,
        channel: &mut dyn AnnouncementChannel,
    ) {
        // Recorded before delivery so a slow channel cannot be re-entered.
        self.last_accepted_ms = Some(now);
        channel.deliver(announcement);
    }
}
