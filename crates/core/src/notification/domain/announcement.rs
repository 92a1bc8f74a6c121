use std::fmt;

/// Visual/vocal emphasis of an announcement. Channels decide how to render
/// it (toast colour, speech prosody) or ignore it.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Tone {
    Positive,
    Info,
    Warning,
    Caution,
    Alert,
}

impl fmt::Display for Tone {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Tone::Positive => write!(f, "positive"),
            Tone::Info => write!(f, "info"),
            Tone::Warning => write!(f, "warning"),
            Tone::Caution => write!(f, "caution"),
            Tone::Alert => write!(f, "alert"),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Announcement {
    pub message: String,
    pub tone: Tone,
}

impl Announcement {
    pub fn new(message: impl Into<String>, tone: Tone) -> Self {
        Self {
            message: message.into(),
            tone,
        }
    }
}

/// Capability to present a message to the user: speech, a transient
/// on-screen message, or anything else.
pub trait AnnouncementChannel: Send {
    fn deliver(&mut self, announcement: &Announcement);
}
