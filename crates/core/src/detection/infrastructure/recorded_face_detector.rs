use std::sync::Arc;

use crate::detection::domain::detection::Detection;
use crate::detection::domain::face_detector::FaceDetector;
use crate::detection::infrastructure::recording::Recording;
use crate::shared::frame::Frame;

/// Replays recorded detections by frame index.
///
/// Frames flagged `failed` in the recording surface as detector errors, and
/// indices beyond the recording yield no faces.
pub struct RecordedFaceDetector {
    recording: Arc<Recording>,
}

impl RecordedFaceDetector {
    pub fn new(recording: Arc<Recording>) -> Self {
        Self { recording }
    }
}

impl FaceDetector for RecordedFaceDetector {
    fn detect(&mut self, frame: &Frame) -> Result<Vec<Detection>, Box<dyn std::error::Error>> {
        match self.recording.frames.get(frame.index()) {
            None => Ok(Vec::new()),
            Some(record) if record.failed => {
                Err(format!("recorded detector failure at frame {}", frame.index()).into())
            }
            Some(record) => Ok(record
                .detections
                .iter()
                .map(|d| d.to_detection())
                .collect()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::detection::infrastructure::recording::{BoundsRecord, DetectionRecord, FrameRecord};
    use crate::shared::geometry::Dimensions;

    fn frame(index: usize) -> Frame {
        Frame::new(
            index,
            0,
            Dimensions::new(480.0, 640.0),
            Dimensions::new(1000.0, 2000.0),
            true,
        )
    }

    fn frame_record(failed: bool, faces: usize) -> FrameRecord {
        FrameRecord {
            timestamp_ms: 0,
            failed,
            detections: (0..faces)
                .map(|i| DetectionRecord {
                    bounds: BoundsRecord {
                        left: i as f64 * 10.0,
                        top: 0.0,
                        right: i as f64 * 10.0 + 5.0,
                        bottom: 5.0,
                    },
                    smile_probability: None,
                    roll: None,
                    yaw: None,
                    pitch: None,
                    tracking_id: Some(i as u32),
                    landmarks: Vec::new(),
                })
                .collect(),
            overlay: None,
        }
    }

    fn detector(frames: Vec<FrameRecord>) -> RecordedFaceDetector {
        RecordedFaceDetector::new(Arc::new(Recording {
            image_width: 480.0,
            image_height: 640.0,
            overlay_width: 1000.0,
            overlay_height: 2000.0,
            front_facing: true,
            frames,
            commands: Vec::new(),
        }))
    }

    #[test]
    fn test_returns_recorded_detections() {
        let mut d = detector(vec![frame_record(false, 2)]);
        let faces = d.detect(&frame(0)).unwrap();
        assert_eq!(faces.len(), 2);
        assert_eq!(faces[1].tracking_id, Some(1));
    }

    #[test]
    fn test_failed_frame_is_error() {
        let mut d = detector(vec![frame_record(false, 1), frame_record(true, 0)]);
        assert!(d.detect(&frame(1)).is_err());
    }

    #[test]
    fn test_unknown_frame_is_empty() {
        let mut d = detector(vec![frame_record(false, 1)]);
        assert!(d.detect(&frame(5)).unwrap().is_empty());
    }
}
