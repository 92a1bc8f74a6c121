use std::fmt;
use std::marker::PhantomData;

/// Sensor/analysis image coordinates, as reported by the face detector.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ImageSpace;

/// Display surface coordinates, where the preview and face boxes are drawn.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct OverlaySpace;

/// Axis-aligned rectangle tagged with the coordinate space it lives in.
///
/// Edges are normalized on construction so `right >= left` and
/// `bottom >= top`. A zero-width or zero-height rect is the "degenerate"
/// sentinel and must never be treated as a face.
pub struct Rect<S> {
    pub left: f64,
    pub top: f64,
    pub right: f64,
    pub bottom: f64,
    space: PhantomData<S>,
}

impl<S> Rect<S> {
    pub fn new(left: f64, top: f64, right: f64, bottom: f64) -> Self {
        Self {
            left: left.min(right),
            top: top.min(bottom),
            right: left.max(right),
            bottom: top.max(bottom),
            space: PhantomData,
        }
    }

    pub fn empty() -> Self {
        Self::new(0.0, 0.0, 0.0, 0.0)
    }

    pub fn is_empty(&self) -> bool {
        // Negated so NaN edges also count as empty.
        !(self.right > self.left && self.bottom > self.top)
    }

    pub fn width(&self) -> f64 {
        self.right - self.left
    }

    pub fn height(&self) -> f64 {
        self.bottom - self.top
    }

    pub fn center_x(&self) -> f64 {
        (self.left + self.right) / 2.0
    }

    /// True when every edge of `other` lies within (or on) this rect's edges.
    pub fn contains(&self, other: &Rect<S>) -> bool {
        !self.is_empty()
            && self.left <= other.left
            && other.right <= self.right
            && self.top <= other.top
            && other.bottom <= self.bottom
    }
}

// Manual impls so the space marker needs no trait bounds.
impl<S> Clone for Rect<S> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<S> Copy for Rect<S> {}

impl<S> PartialEq for Rect<S> {
    fn eq(&self, other: &Self) -> bool {
        self.left == other.left
            && self.top == other.top
            && self.right == other.right
            && self.bottom == other.bottom
    }
}

impl<S> fmt::Debug for Rect<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Rect[({:.1}, {:.1}) - ({:.1}, {:.1})]",
            self.left, self.top, self.right, self.bottom
        )
    }
}

/// Single landmark position tagged with its coordinate space.
///
/// Unlike [`Rect`], a point has no area and is never "empty".
pub struct Point<S> {
    pub x: f64,
    pub y: f64,
    space: PhantomData<S>,
}

impl<S> Point<S> {
    pub fn new(x: f64, y: f64) -> Self {
        Self {
            x,
            y,
            space: PhantomData,
        }
    }
}

impl<S> Clone for Point<S> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<S> Copy for Point<S> {}

impl<S> PartialEq for Point<S> {
    fn eq(&self, other: &Self) -> bool {
        self.x == other.x && self.y == other.y
    }
}

impl<S> fmt::Debug for Point<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Point({:.1}, {:.1})", self.x, self.y)
    }
}

/// Width/height of an image or display surface.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Dimensions {
    pub width: f64,
    pub height: f64,
}

impl Dimensions {
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    /// Camera surfaces transiently report zero size during layout.
    pub fn is_degenerate(&self) -> bool {
        !(self.width > 0.0 && self.height > 0.0)
            || !self.width.is_finite()
            || !self.height.is_finite()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use rstest::rstest;

    fn rect(l: f64, t: f64, r: f64, b: f64) -> Rect<OverlaySpace> {
        Rect::new(l, t, r, b)
    }

    #[test]
    fn test_new_normalizes_inverted_edges() {
        let r = rect(50.0, 80.0, 10.0, 20.0);
        assert_eq!(r, rect(10.0, 20.0, 50.0, 80.0));
        assert_relative_eq!(r.width(), 40.0);
        assert_relative_eq!(r.height(), 60.0);
    }

    #[rstest]
    #[case::all_zero(rect(0.0, 0.0, 0.0, 0.0), true)]
    #[case::zero_width(rect(10.0, 0.0, 10.0, 50.0), true)]
    #[case::zero_height(rect(0.0, 10.0, 50.0, 10.0), true)]
    #[case::nan_edge(rect(f64::NAN, 0.0, 10.0, 10.0), true)]
    #[case::regular(rect(0.0, 0.0, 1.0, 1.0), false)]
    fn test_is_empty(#[case] r: Rect<OverlaySpace>, #[case] expected: bool) {
        assert_eq!(r.is_empty(), expected);
    }

    #[test]
    fn test_contains_inner_rect() {
        let outer = rect(0.0, 0.0, 100.0, 100.0);
        assert!(outer.contains(&rect(10.0, 10.0, 90.0, 90.0)));
    }

    #[test]
    fn test_contains_is_inclusive_of_shared_edges() {
        let outer = rect(0.0, 0.0, 100.0, 100.0);
        assert!(outer.contains(&outer));
    }

    #[rstest]
    #[case::left(rect(-1.0, 10.0, 50.0, 50.0))]
    #[case::top(rect(10.0, -1.0, 50.0, 50.0))]
    #[case::right(rect(10.0, 10.0, 101.0, 50.0))]
    #[case::bottom(rect(10.0, 10.0, 50.0, 101.0))]
    fn test_contains_rejects_any_edge_outside(#[case] inner: Rect<OverlaySpace>) {
        let outer = rect(0.0, 0.0, 100.0, 100.0);
        assert!(!outer.contains(&inner));
    }

    #[test]
    fn test_empty_rect_contains_nothing() {
        let outer: Rect<OverlaySpace> = Rect::empty();
        assert!(!outer.contains(&Rect::empty()));
    }

    #[rstest]
    #[case::zero_width(0.0, 10.0)]
    #[case::zero_height(10.0, 0.0)]
    #[case::negative(-5.0, 10.0)]
    #[case::infinite(f64::INFINITY, 10.0)]
    #[case::nan(f64::NAN, 10.0)]
    fn test_degenerate_dimensions(#[case] w: f64, #[case] h: f64) {
        assert!(Dimensions::new(w, h).is_degenerate());
    }

    #[test]
    fn test_regular_dimensions() {
        assert!(!Dimensions::new(480.0, 640.0).is_degenerate());
    }
}
