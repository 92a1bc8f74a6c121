use crate::detection::domain::detection::Detection;
use crate::shared::frame::Frame;

/// Domain interface for the platform face detector.
///
/// Implementations may be stateful (e.g., tracking across frames),
/// hence `&mut self`. Errors are reported once per frame and never retried
/// by this crate.
pub trait FaceDetector: Send {
    fn detect(&mut self, frame: &Frame) -> Result<Vec<Detection>, Box<dyn std::error::Error>>;
}
