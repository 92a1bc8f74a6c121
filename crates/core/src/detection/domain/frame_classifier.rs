use crate::detection::domain::coordinate_mapper::OverlayTransform;
use crate::detection::domain::detection::{Detection, HeadAngles};
use crate::detection::domain::target_box::TargetBox;
use crate::shared::geometry::{Dimensions, OverlaySpace, Point, Rect};

/// The single face accepted for a frame, in overlay coordinates.
#[derive(Clone, Debug, PartialEq)]
pub struct AcceptedFace {
    pub bounds: Rect<OverlaySpace>,
    pub smile_probability: Option<f64>,
    pub angles: HeadAngles,
    pub tracking_id: Option<u32>,
}

impl AcceptedFace {
    fn from_detection(detection: &Detection, bounds: Rect<OverlaySpace>) -> Self {
        Self {
            bounds,
            smile_probability: detection.smile_probability,
            angles: detection.angles,
            tracking_id: detection.tracking_id,
        }
    }
}

/// Exactly one of these holds for every frame.
#[derive(Clone, Debug, PartialEq)]
pub enum FrameVerdict {
    NoFace,
    SingleInTarget(AcceptedFace),
    SingleOutOfTarget,
    MultipleInFrame(usize),
    /// Only reachable if frame-level and target-level face lists diverge.
    /// With a single consistent list it folds into `NoFace`; the variant is
    /// kept so consumers of the verdict stream see the complete protocol.
    MultipleInTargetOnly(usize),
}

impl FrameVerdict {
    pub fn name(&self) -> &'static str {
        match self {
            FrameVerdict::NoFace => "no_face",
            FrameVerdict::SingleInTarget(_) => "single_in_target",
            FrameVerdict::SingleOutOfTarget => "single_out_of_target",
            FrameVerdict::MultipleInFrame(_) => "multiple_in_frame",
            FrameVerdict::MultipleInTargetOnly(_) => "multiple_in_target_only",
        }
    }

    pub fn accepted_face(&self) -> Option<&AcceptedFace> {
        match self {
            FrameVerdict::SingleInTarget(face) => Some(face),
            _ => None,
        }
    }
}

/// One detection in overlay coordinates, landmarks included.
#[derive(Clone, Debug, PartialEq)]
pub struct MappedFace {
    pub bounds: Rect<OverlaySpace>,
    pub landmarks: Vec<Point<OverlaySpace>>,
}

/// Classification outcome plus every non-empty mapped face for rendering.
#[derive(Clone, Debug, PartialEq)]
pub struct ClassifiedFrame {
    pub verdict: FrameVerdict,
    pub mapped: Vec<MappedFace>,
}

/// Maps every detection onto the overlay and classifies the frame.
///
/// **Priority rule:** "more than one face anywhere" is decided before any
/// target-box logic, so a flickering second face can never intermittently
/// let a single face through.
pub fn classify(
    detections: &[Detection],
    image: Dimensions,
    overlay: Dimensions,
    mirror: bool,
    target: &TargetBox,
) -> ClassifiedFrame {
    let Some(transform) = OverlayTransform::new(image, overlay, mirror) else {
        return ClassifiedFrame {
            verdict: FrameVerdict::NoFace,
            mapped: Vec::new(),
        };
    };

    let faces_in_frame: Vec<(&Detection, Rect<OverlaySpace>)> = detections
        .iter()
        .map(|d| (d, transform.map_rect(&d.bounds)))
        .filter(|(_, mapped)| !mapped.is_empty())
        .collect();

    let faces_in_target = faces_in_frame
        .iter()
        .filter(|(_, mapped)| target.contains(mapped))
        .count();

    let verdict = match faces_in_frame.as_slice() {
        [] if faces_in_target > 1 => FrameVerdict::MultipleInTargetOnly(faces_in_target),
        [] => FrameVerdict::NoFace,
        [(detection, mapped)] => {
            if target.contains(mapped) {
                FrameVerdict::SingleInTarget(AcceptedFace::from_detection(detection, *mapped))
            } else {
                FrameVerdict::SingleOutOfTarget
            }
        }
        many => FrameVerdict::MultipleInFrame(many.len()),
    };

    ClassifiedFrame {
        verdict,
        mapped: faces_in_frame
            .into_iter()
            .map(|(detection, bounds)| MappedFace {
                bounds,
                landmarks: detection
                    .landmarks
                    .iter()
                    .map(|p| transform.map_point(p))
                    .collect(),
            })
            .collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    // image 200x100 onto overlay 100x200 maps 1:1 (scale 1, no offset),
    // so image coordinates can be reasoned about directly.
    const IMAGE: Dimensions = Dimensions {
        width: 200.0,
        height: 100.0,
    };
    const OVERLAY: Dimensions = Dimensions {
        width: 100.0,
        height: 200.0,
    };

    /// Target (10,20)-(90,180).
    fn target() -> TargetBox {
        TargetBox::new(OVERLAY, 0.8)
    }

    fn face(l: f64, t: f64, r: f64, b: f64) -> Detection {
        Detection::new(Rect::new(l, t, r, b))
    }

    fn run(detections: &[Detection]) -> ClassifiedFrame {
        classify(detections, IMAGE, OVERLAY, false, &target())
    }

    #[test]
    fn test_no_detections_is_no_face() {
        let result = run(&[]);
        assert_eq!(result.verdict, FrameVerdict::NoFace);
        assert!(result.mapped.is_empty());
    }

    #[test]
    fn test_single_face_inside_target_is_accepted() {
        let detection = face(30.0, 40.0, 70.0, 100.0).with_smile(0.9).with_tracking_id(4);
        let result = run(&[detection]);

        let accepted = result.verdict.accepted_face().expect("accepted face");
        assert_eq!(accepted.bounds, Rect::new(30.0, 40.0, 70.0, 100.0));
        assert_eq!(accepted.smile_probability, Some(0.9));
        assert_eq!(accepted.tracking_id, Some(4));
        assert_eq!(result.mapped.len(), 1);
    }

    #[test]
    fn test_face_on_target_edges_is_contained() {
        let result = run(&[face(10.0, 20.0, 90.0, 180.0)]);
        assert!(matches!(result.verdict, FrameVerdict::SingleInTarget(_)));
    }

    #[rstest]
    #[case::past_left(face(9.0, 40.0, 70.0, 100.0))]
    #[case::past_top(face(30.0, 19.0, 70.0, 100.0))]
    #[case::past_right(face(30.0, 40.0, 91.0, 100.0))]
    #[case::past_bottom(face(30.0, 40.0, 70.0, 181.0))]
    fn test_single_face_crossing_any_edge_is_out_of_target(#[case] detection: Detection) {
        let result = run(&[detection]);
        assert_eq!(result.verdict, FrameVerdict::SingleOutOfTarget);
        assert_eq!(result.mapped.len(), 1);
    }

    #[rstest]
    #[case::both_inside(face(20.0, 30.0, 40.0, 60.0), face(50.0, 30.0, 80.0, 60.0))]
    #[case::both_outside(face(0.0, 0.0, 5.0, 5.0), face(95.0, 190.0, 100.0, 200.0))]
    #[case::one_inside(face(20.0, 30.0, 40.0, 60.0), face(0.0, 0.0, 5.0, 5.0))]
    fn test_two_faces_always_multiple_in_frame(#[case] a: Detection, #[case] b: Detection) {
        let result = run(&[a, b]);
        assert_eq!(result.verdict, FrameVerdict::MultipleInFrame(2));
        assert_eq!(result.mapped.len(), 2);
    }

    #[test]
    fn test_empty_mappings_are_discarded_before_counting() {
        // Second detection has zero width and must not count as a face.
        let result = run(&[face(30.0, 40.0, 70.0, 100.0), face(50.0, 50.0, 50.0, 90.0)]);
        assert!(matches!(result.verdict, FrameVerdict::SingleInTarget(_)));
        assert_eq!(result.mapped.len(), 1);
    }

    #[test]
    fn test_degenerate_overlay_yields_no_face() {
        let result = classify(
            &[face(30.0, 40.0, 70.0, 100.0)],
            IMAGE,
            Dimensions::new(0.0, 0.0),
            false,
            &target(),
        );
        assert_eq!(result.verdict, FrameVerdict::NoFace);
        assert!(result.mapped.is_empty());
    }

    #[test]
    fn test_mirroring_changes_containment() {
        // [2, 30] is outside the target; mirrored about x=50 it becomes
        // [70, 98], still outside. [12, 40] mirrors to [60, 88], inside.
        let outside = classify(&[face(2.0, 40.0, 30.0, 100.0)], IMAGE, OVERLAY, true, &target());
        assert_eq!(outside.verdict, FrameVerdict::SingleOutOfTarget);

        let inside = classify(&[face(12.0, 40.0, 40.0, 100.0)], IMAGE, OVERLAY, true, &target());
        let accepted = inside.verdict.accepted_face().expect("accepted face");
        assert_eq!(accepted.bounds, Rect::new(60.0, 40.0, 88.0, 100.0));
    }

    #[test]
    fn test_portrait_example_front_facing() {
        let overlay = Dimensions::new(1000.0, 2000.0);
        let image = Dimensions::new(480.0, 640.0);
        let target = TargetBox::new(overlay, 0.85);

        // Mirrored right edge lands at ~1416, beyond the target's 925.
        let out = classify(&[face(100.0, 100.0, 300.0, 300.0)], image, overlay, true, &target);
        assert_eq!(out.verdict, FrameVerdict::SingleOutOfTarget);

        // Maps to ~(375, 417)-(792, 1250) after mirroring: fully inside.
        let inside = classify(&[face(250.0, 100.0, 350.0, 300.0)], image, overlay, true, &target);
        assert!(matches!(inside.verdict, FrameVerdict::SingleInTarget(_)));
    }

    #[test]
    fn test_verdict_names_are_distinct() {
        let names = [
            FrameVerdict::NoFace.name(),
            FrameVerdict::SingleOutOfTarget.name(),
            FrameVerdict::MultipleInFrame(2).name(),
            FrameVerdict::MultipleInTargetOnly(2).name(),
        ];
        for (i, a) in names.iter().enumerate() {
            for b in &names[i + 1..] {
                assert_ne!(a, b);
            }
        }
    }

    #[test]
    fn test_landmarks_mapped_with_their_face() {
        let detection = face(30.0, 40.0, 70.0, 100.0)
            .with_landmarks(vec![Point::new(40.0, 60.0), Point::new(60.0, 60.0)]);

        let plain = run(&[detection.clone()]);
        assert_eq!(
            plain.mapped[0].landmarks,
            vec![Point::new(40.0, 60.0), Point::new(60.0, 60.0)]
        );

        // Mirrored about x=50 the two points swap sides.
        let mirrored = classify(&[detection], IMAGE, OVERLAY, true, &target());
        assert_eq!(
            mirrored.mapped[0].landmarks,
            vec![Point::new(60.0, 60.0), Point::new(40.0, 60.0)]
        );
    }

    #[test]
    fn test_landmarks_dropped_with_empty_face() {
        let detection = face(50.0, 50.0, 50.0, 90.0).with_landmarks(vec![Point::new(50.0, 60.0)]);
        let result = run(&[detection]);
        assert!(result.mapped.is_empty());
    }
}
