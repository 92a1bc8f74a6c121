//! User-facing wording for live feedback and session narration.

use crate::detection::domain::frame_classifier::FrameVerdict;
use crate::notification::domain::announcement::{Announcement, Tone};
use crate::session::domain::session_aggregator::{SessionError, SessionOutcome};

/// Live feedback for a frame outside a session. `NoFace` stays silent.
pub fn live_feedback(verdict: &FrameVerdict, smile_threshold: f64) -> Option<Announcement> {
    let announcement = match verdict {
        FrameVerdict::NoFace => return None,
        FrameVerdict::MultipleInFrame(_) => {
            Announcement::new("Multiple faces detected in frame", Tone::Alert)
        }
        FrameVerdict::SingleInTarget(face) => match face.smile_probability {
            Some(p) if p > smile_threshold => {
                Announcement::new("You are in a good mood!", Tone::Positive)
            }
            Some(p) if p < smile_threshold => {
                Announcement::new("You are not in a good mood!", Tone::Alert)
            }
            _ => Announcement::new("Face detected in target box", Tone::Positive),
        },
        FrameVerdict::SingleOutOfTarget => {
            Announcement::new("Position your face inside the box", Tone::Warning)
        }
        FrameVerdict::MultipleInTargetOnly(_) => {
            Announcement::new("Multiple faces in target box", Tone::Caution)
        }
    };
    Some(announcement)
}

pub fn detection_failed() -> Announcement {
    Announcement::new("Face detection failed", Tone::Alert)
}

pub fn session_started(duration_ms: u64) -> Announcement {
    Announcement::new(
        format!(
            "Smile detection started for {} seconds",
            whole_seconds_ceil(duration_ms)
        ),
        Tone::Info,
    )
}

pub fn countdown(remaining_ms: u64) -> Announcement {
    let secs = whole_seconds_ceil(remaining_ms);
    let unit = if secs == 1 { "second" } else { "seconds" };
    Announcement::new(format!("{secs} {unit} remaining"), Tone::Info)
}

pub fn session_rejected(error: SessionError) -> Announcement {
    let text = error.to_string();
    let mut chars = text.chars();
    let message = match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => text,
    };
    Announcement::new(message, Tone::Warning)
}

pub fn session_outcome(outcome: &SessionOutcome) -> Announcement {
    match *outcome {
        SessionOutcome::TooEarly => {
            Announcement::new("Session stopped too early to score", Tone::Warning)
        }
        SessionOutcome::Positive {
            smiles,
            elapsed_secs,
        } => Announcement::new(
            format!("You smiled {smiles} times in {elapsed_secs} seconds"),
            Tone::Positive,
        ),
        SessionOutcome::NeutralFacePresent { elapsed_secs } => Announcement::new(
            format!("Face seen for {elapsed_secs} seconds but no smile"),
            Tone::Caution,
        ),
        SessionOutcome::NoFaceSeen { elapsed_secs } => Announcement::new(
            format!("No face seen in {elapsed_secs} seconds"),
            Tone::Alert,
        ),
    }
}

fn whole_seconds_ceil(ms: u64) -> u64 {
    ms.div_ceil(1000)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::detection::domain::detection::HeadAngles;
    use crate::detection::domain::frame_classifier::AcceptedFace;
    use crate::shared::geometry::Rect;
    use rstest::rstest;

    fn in_target(smile: Option<f64>) -> FrameVerdict {
        FrameVerdict::SingleInTarget(AcceptedFace {
            bounds: Rect::new(0.0, 0.0, 1.0, 1.0),
            smile_probability: smile,
            angles: HeadAngles::default(),
            tracking_id: None,
        })
    }

    #[rstest]
    #[case::multiple(FrameVerdict::MultipleInFrame(2), "Multiple faces detected in frame")]
    #[case::smiling(in_target(Some(0.9)), "You are in a good mood!")]
    #[case::not_smiling(in_target(Some(0.1)), "You are not in a good mood!")]
    #[case::no_signal(in_target(None), "Face detected in target box")]
    #[case::exactly_threshold(in_target(Some(0.5)), "Face detected in target box")]
    #[case::outside(FrameVerdict::SingleOutOfTarget, "Position your face inside the box")]
    #[case::target_only(FrameVerdict::MultipleInTargetOnly(2), "Multiple faces in target box")]
    fn test_live_feedback_wording(#[case] verdict: FrameVerdict, #[case] expected: &str) {
        let a = live_feedback(&verdict, 0.5).unwrap();
        assert_eq!(a.message, expected);
    }

    #[test]
    fn test_no_face_is_silent() {
        assert!(live_feedback(&FrameVerdict::NoFace, 0.5).is_none());
    }

    #[test]
    fn test_session_rejections_capitalized() {
        assert_eq!(
            session_rejected(SessionError::AlreadyRunning).message,
            "Detection already running"
        );
        assert_eq!(
            session_rejected(SessionError::NotRunning).message,
            "No detection running"
        );
    }

    #[rstest]
    #[case(10_000, "10 seconds remaining")]
    #[case(9_001, "10 seconds remaining")]
    #[case(1_000, "1 second remaining")]
    #[case(400, "1 second remaining")]
    fn test_countdown_rounds_up(#[case] remaining: u64, #[case] expected: &str) {
        assert_eq!(countdown(remaining).message, expected);
    }

    #[test]
    fn test_started_message() {
        assert_eq!(
            session_started(10_000).message,
            "Smile detection started for 10 seconds"
        );
    }

    #[rstest]
    #[case(SessionOutcome::TooEarly, "Session stopped too early to score")]
    #[case(SessionOutcome::Positive { smiles: 4, elapsed_secs: 10 }, "You smiled 4 times in 10 seconds")]
    #[case(SessionOutcome::NeutralFacePresent { elapsed_secs: 7 }, "Face seen for 7 seconds but no smile")]
    #[case(SessionOutcome::NoFaceSeen { elapsed_secs: 10 }, "No face seen in 10 seconds")]
    fn test_outcome_wording(#[case] outcome: SessionOutcome, #[case] expected: &str) {
        assert_eq!(session_outcome(&outcome).message, expected);
    }
}
