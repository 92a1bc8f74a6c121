//! JSON recording of a detector stream, used for offline replay.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::detection::domain::detection::{Detection, HeadAngles};
use crate::shared::frame::Frame;
use crate::shared::geometry::{Dimensions, Point, Rect};

#[derive(Error, Debug)]
pub enum RecordingError {
    #[error("failed to read recording {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid recording {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("frame timestamps must be non-decreasing (frame {index}: {timestamp_ms}ms)")]
    OutOfOrder { index: usize, timestamp_ms: u64 },
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct BoundsRecord {
    pub left: f64,
    pub top: f64,
    pub right: f64,
    pub bottom: f64,
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct SizeRecord {
    pub width: f64,
    pub height: f64,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct DetectionRecord {
    pub bounds: BoundsRecord,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub smile_probability: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub roll: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub yaw: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pitch: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tracking_id: Option<u32>,
    /// Landmark positions as `[x, y]` pairs in image coordinates.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub landmarks: Vec<(f64, f64)>,
}

impl DetectionRecord {
    pub fn to_detection(&self) -> Detection {
        let b = self.bounds;
        Detection {
            bounds: Rect::new(b.left, b.top, b.right, b.bottom),
            smile_probability: self.smile_probability.map(|p| p.clamp(0.0, 1.0)),
            angles: HeadAngles {
                roll: self.roll,
                yaw: self.yaw,
                pitch: self.pitch,
            },
            tracking_id: self.tracking_id,
            landmarks: self
                .landmarks
                .iter()
                .map(|&(x, y)| Point::new(x, y))
                .collect(),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct FrameRecord {
    pub timestamp_ms: u64,
    /// Simulates the detector erroring on this frame.
    #[serde(default)]
    pub failed: bool,
    #[serde(default)]
    pub detections: Vec<DetectionRecord>,
    /// Overrides the recording's overlay size from this frame on.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub overlay: Option<SizeRecord>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SessionAction {
    Start,
    Stop,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionCommand {
    pub at_ms: u64,
    pub action: SessionAction,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Recording {
    pub image_width: f64,
    pub image_height: f64,
    pub overlay_width: f64,
    pub overlay_height: f64,
    #[serde(default = "default_front_facing")]
    pub front_facing: bool,
    #[serde(default)]
    pub frames: Vec<FrameRecord>,
    #[serde(default)]
    pub commands: Vec<SessionCommand>,
}

fn default_front_facing() -> bool {
    true
}

impl Recording {
    pub fn load(path: &Path) -> Result<Self, RecordingError> {
        let json = fs::read_to_string(path).map_err(|source| RecordingError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let recording: Recording =
            serde_json::from_str(&json).map_err(|source| RecordingError::Parse {
                path: path.to_path_buf(),
                source,
            })?;
        recording.check_order()?;
        Ok(recording)
    }

    fn check_order(&self) -> Result<(), RecordingError> {
        for (index, pair) in self.frames.windows(2).enumerate() {
            if pair[1].timestamp_ms < pair[0].timestamp_ms {
                return Err(RecordingError::OutOfOrder {
                    index: index + 1,
                    timestamp_ms: pair[1].timestamp_ms,
                });
            }
        }
        Ok(())
    }

    /// Frame metadata in recording order, with overlay overrides carried
    /// forward to later frames.
    pub fn frame_infos(&self) -> Vec<Frame> {
        let image = Dimensions::new(self.image_width, self.image_height);
        let mut overlay = Dimensions::new(self.overlay_width, self.overlay_height);
        self.frames
            .iter()
            .enumerate()
            .map(|(index, record)| {
                if let Some(size) = record.overlay {
                    overlay = Dimensions::new(size.width, size.height);
                }
                Frame::new(index, record.timestamp_ms, image, overlay, self.front_facing)
            })
            .collect()
    }

    /// Commands sorted by time; equal times keep their listed order.
    pub fn sorted_commands(&self) -> Vec<SessionCommand> {
        let mut commands = self.commands.clone();
        commands.sort_by_key(|c| c.at_ms);
        commands
    }
}
