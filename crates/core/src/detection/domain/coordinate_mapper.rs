//! Image-to-overlay coordinate mapping.
//!
//! The analysed image arrives in sensor orientation, transposed relative to
//! the displayed preview, so the scale is computed against the *cross*
//! dimensions. The preview fills (covers) the overlay and is centered, so
//! the offsets come from whatever overhangs after scaling.

use crate::shared::geometry::{Dimensions, ImageSpace, OverlaySpace, Point, Rect};

/// Scale, centering offsets and optional mirror axis for one frame.
///
/// Boxes and landmark points go through the same transform so they always
/// line up on the overlay.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct OverlayTransform {
    scale: f64,
    offset_x: f64,
    offset_y: f64,
    mirror_center_x: Option<f64>,
}

impl OverlayTransform {
    /// Returns `None` when either surface is degenerate.
    pub fn new(image: Dimensions, overlay: Dimensions, mirror: bool) -> Option<Self> {
        if image.is_degenerate() || overlay.is_degenerate() {
            return None;
        }
        let scale = (overlay.width / image.height).max(overlay.height / image.width);
        Some(Self {
            scale,
            offset_x: (overlay.width - image.height * scale) / 2.0,
            offset_y: (overlay.height - image.width * scale) / 2.0,
            mirror_center_x: mirror.then_some(overlay.width / 2.0),
        })
    }

    pub fn map_rect(&self, bounds: &Rect<ImageSpace>) -> Rect<OverlaySpace> {
        let mapped = Rect::new(
            bounds.left * self.scale + self.offset_x,
            bounds.top * self.scale + self.offset_y,
            bounds.right * self.scale + self.offset_x,
            bounds.bottom * self.scale + self.offset_y,
        );
        // Reflection happens in overlay space, after scaling and offsetting.
        match self.mirror_center_x {
            Some(center_x) => mirror_horizontally(&mapped, center_x),
            None => mapped,
        }
    }

    pub fn map_point(&self, point: &Point<ImageSpace>) -> Point<OverlaySpace> {
        let x = point.x * self.scale + self.offset_x;
        let y = point.y * self.scale + self.offset_y;
        match self.mirror_center_x {
            Some(center_x) => Point::new(2.0 * center_x - x, y),
            None => Point::new(x, y),
        }
    }
}

/// Maps a detector box into overlay coordinates.
///
/// Returns [`Rect::empty`] when either surface is degenerate; callers must
/// check `is_empty()` before treating the result as a face.
pub fn map_to_overlay(
    bounds: &Rect<ImageSpace>,
    image: Dimensions,
    overlay: Dimensions,
    mirror: bool,
) -> Rect<OverlaySpace> {
    OverlayTransform::new(image, overlay, mirror)
        .map(|t| t.map_rect(bounds))
        .unwrap_or_else(Rect::empty)
}

/// Maps a landmark into overlay coordinates; `None` on degenerate surfaces.
pub fn map_point_to_overlay(
    point: &Point<ImageSpace>,
    image: Dimensions,
    overlay: Dimensions,
    mirror: bool,
) -> Option<Point<OverlaySpace>> {
    OverlayTransform::new(image, overlay, mirror).map(|t| t.map_point(point))
}

/// Reflects the left/right edges about the vertical line `x = center_x`.
pub fn mirror_horizontally(rect: &Rect<OverlaySpace>, center_x: f64) -> Rect<OverlaySpace> {
    let left = center_x - (rect.right - center_x);
    let right = center_x + (center_x - rect.left);
    Rect::new(left, rect.top, right, rect.bottom)
}
