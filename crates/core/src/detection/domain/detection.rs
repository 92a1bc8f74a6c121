use crate::shared::geometry::{ImageSpace, Point, Rect};

/// Head rotation in degrees. Each angle is only present when the detector
/// ran with classification enabled.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct HeadAngles {
    pub roll: Option<f64>,
    pub yaw: Option<f64>,
    pub pitch: Option<f64>,
}

/// One raw face observation for a single frame.
///
/// Built fresh by the detector each frame; `tracking_id` is passed through
/// untouched and never used for identity decisions here.
#[derive(Clone, Debug, PartialEq)]
pub struct Detection {
    pub bounds: Rect<ImageSpace>,
    pub smile_probability: Option<f64>,
    pub angles: HeadAngles,
    pub tracking_id: Option<u32>,
    /// Facial landmark positions (eyes, nose, mouth...), empty when the
    /// detector ran without landmark mode.
    pub landmarks: Vec<Point<ImageSpace>>,
}

impl Detection {
    pub fn new(bounds: Rect<ImageSpace>) -> Self {
        Self {
            bounds,
            smile_probability: None,
            angles: HeadAngles::default(),
            tracking_id: None,
            landmarks: Vec::new(),
        }
    }

    pub fn with_smile(mut self, probability: f64) -> Self {
        self.smile_probability = Some(probability.clamp(0.0, 1.0));
        self
    }

    pub fn with_angles(mut self, roll: f64, yaw: f64, pitch: f64) -> Self {
        self.angles = HeadAngles {
            roll: Some(roll),
            yaw: Some(yaw),
            pitch: Some(pitch),
        };
        self
    }

    pub fn with_tracking_id(mut self, id: u32) -> Self {
        self.tracking_id = Some(id);
        self
    }

    pub fn with_landmarks(mut self, landmarks: Vec<Point<ImageSpace>>) -> Self {
        self.landmarks = landmarks;
        self
    }
}
