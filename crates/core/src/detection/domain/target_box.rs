use crate::shared::geometry::{Dimensions, OverlaySpace, Rect};

/// Fixed centered rectangle a single face must sit inside to be accepted.
///
/// Only changes when the overlay is resized.
#[derive(Clone, Debug, PartialEq)]
pub struct TargetBox {
    ratio: f64,
    overlay: Dimensions,
    rect: Rect<OverlaySpace>,
}

impl TargetBox {
    pub fn new(overlay: Dimensions, ratio: f64) -> Self {
        Self {
            ratio,
            overlay,
            rect: compute(overlay, ratio),
        }
    }

    pub fn rect(&self) -> &Rect<OverlaySpace> {
        &self.rect
    }

    pub fn overlay(&self) -> Dimensions {
        self.overlay
    }

    /// Recomputes the box for new overlay dimensions.
    ///
    /// Returns `true` when the dimensions actually changed.
    pub fn resize(&mut self, overlay: Dimensions) -> bool {
        if overlay == self.overlay {
            return false;
        }
        self.overlay = overlay;
        self.rect = compute(overlay, self.ratio);
        true
    }

    pub fn contains(&self, face: &Rect<OverlaySpace>) -> bool {
        self.rect.contains(face)
    }
}

fn compute(overlay: Dimensions, ratio: f64) -> Rect<OverlaySpace> {
    if overlay.is_degenerate() {
        return Rect::empty();
    }
    let box_width = overlay.width * ratio;
    let box_height = overlay.height * ratio;
    let left = (overlay.width - box_width) / 2.0;
    let top = (overlay.height - box_height) / 2.0;
    Rect::new(left, top, left + box_width, top + box_height)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_default_ratio_on_portrait_overlay() {
        let target = TargetBox::new(Dimensions::new(1000.0, 2000.0), 0.85);
        let r = target.rect();
        assert_relative_eq!(r.left, 75.0, epsilon = 1e-9);
        assert_relative_eq!(r.top, 150.0, epsilon = 1e-9);
        assert_relative_eq!(r.right, 925.0, epsilon = 1e-9);
        assert_relative_eq!(r.bottom, 1850.0, epsilon = 1e-9);
    }

    #[test]
    fn test_ratio_one_covers_overlay() {
        let target = TargetBox::new(Dimensions::new(300.0, 400.0), 1.0);
        assert_eq!(*target.rect(), Rect::new(0.0, 0.0, 300.0, 400.0));
    }

    #[test]
    fn test_resize_recomputes_only_on_change() {
        let mut target = TargetBox::new(Dimensions::new(100.0, 200.0), 0.5);
        assert!(!target.resize(Dimensions::new(100.0, 200.0)));
        assert!(target.resize(Dimensions::new(200.0, 200.0)));
        assert_eq!(*target.rect(), Rect::new(50.0, 50.0, 150.0, 150.0));
        assert_eq!(target.overlay(), Dimensions::new(200.0, 200.0));
    }

    #[test]
    fn test_degenerate_overlay_gives_empty_box() {
        let target = TargetBox::new(Dimensions::new(0.0, 0.0), 0.85);
        assert!(target.rect().is_empty());
        assert!(!target.contains(&Rect::new(0.0, 0.0, 0.0, 0.0)));
    }
}
