use crate::notification::domain::announcement::{Announcement, AnnouncementChannel};

/// Headless channel that writes announcements through the `log` facade.
///
/// Used by the CLI, where there is no speaker or screen to present to.
pub struct LogAnnouncementChannel {
    label: &'static str,
}

impl LogAnnouncementChannel {
    pub fn new(label: &'static str) -> Self {
        Self { label }
    }
}

impl AnnouncementChannel for LogAnnouncementChannel {
    fn deliver(&mut self, announcement: &Announcement) {
        log::info!(
            "[{}:{}] {}",
            self.label,
            announcement.tone,
            announcement.message
        );
    }
}
