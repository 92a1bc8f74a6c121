/// Target box edge length as a fraction of the overlay's width/height.
pub const DEFAULT_TARGET_BOX_RATIO: f64 = 0.85;

/// A face counts as smiling strictly above this probability.
pub const DEFAULT_SMILE_THRESHOLD: f64 = 0.5;

pub const DEFAULT_SESSION_DURATION_MS: u64 = 10_000;

/// Longest accepted session (one hour).
pub const MAX_SESSION_DURATION_MS: u64 = 3_600_000;

/// Minimum gap between two accepted announcements, across all channels.
pub const DEFAULT_ANNOUNCEMENT_COOLDOWN_MS: u64 = 2_000;

/// Period of the session expiry/countdown tick.
pub const DEFAULT_TICK_INTERVAL_MS: u64 = 1_000;

/// Sessions shorter than this are not scored.
pub const MIN_SCORED_SESSION_MS: u64 = 1_000;

pub const CONFIG_DIR_NAME: &str = "SmileSession";
pub const CONFIG_FILE_NAME: &str = "config.json";
