use crate::shared::geometry::Dimensions;

/// Metadata of one analysed camera frame.
///
/// Pixel data never reaches this crate: decoding and detection happen in the
/// capture pipeline, which hands over only the sizes needed to map detector
/// coordinates onto the overlay.
#[derive(Clone, Debug, PartialEq)]
pub struct Frame {
    index: usize,
    timestamp_ms: u64,
    image: Dimensions,
    overlay: Dimensions,
    front_facing: bool,
}

impl Frame {
    pub fn new(
        index: usize,
        timestamp_ms: u64,
        image: Dimensions,
        overlay: Dimensions,
        front_facing: bool,
    ) -> Self {
        Self {
            index,
            timestamp_ms,
            image,
            overlay,
            front_facing,
        }
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn timestamp_ms(&self) -> u64 {
        self.timestamp_ms
    }

    /// Sensor-space size of the analysed image.
    pub fn image(&self) -> Dimensions {
        self.image
    }

    /// Current display surface size.
    pub fn overlay(&self) -> Dimensions {
        self.overlay
    }

    /// Front cameras are displayed mirrored.
    pub fn front_facing(&self) -> bool {
        self.front_facing
    }
}
