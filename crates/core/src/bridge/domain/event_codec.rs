use serde::{Deserialize, Serialize};

use crate::detection::domain::frame_classifier::FrameVerdict;
use crate::session::domain::session_aggregator::SessionResult;

/// Accepted face as seen by the UI layer.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FacePayload {
    pub x: i32,
    pub y: i32,
    pub width: i32,
    pub height: i32,
    pub roll_angle: f64,
    pub yaw_angle: f64,
    pub pitch_angle: f64,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionPayload {
    pub elapsed_ms: u64,
    pub faces_in_target: u32,
    pub smiles: u32,
    pub outcome_category: String,
}

/// Events handed across the UI boundary.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "event", content = "data")]
pub enum BridgeEvent {
    /// Emitted every frame; an empty list means "nothing actionable".
    #[serde(rename = "onSingleFaceInTarget")]
    SingleFaceInTarget(Vec<FacePayload>),
    #[serde(rename = "onSessionComplete")]
    SessionComplete(SessionPayload),
}

/// Encodes a frame verdict. Only `SingleInTarget` produces an element.
pub fn encode(verdict: &FrameVerdict) -> Vec<FacePayload> {
    let Some(face) = verdict.accepted_face() else {
        return Vec::new();
    };
    let b = &face.bounds;
    // `as` truncates toward zero, matching the platform's float-to-int.
    vec![FacePayload {
        x: b.left as i32,
        y: b.top as i32,
        width: b.width() as i32,
        height: b.height() as i32,
        roll_angle: face.angles.roll.unwrap_or(0.0),
        yaw_angle: face.angles.yaw.unwrap_or(0.0),
        pitch_angle: face.angles.pitch.unwrap_or(0.0),
    }]
}

pub fn encode_session(result: &SessionResult) -> SessionPayload {
    SessionPayload {
        elapsed_ms: result.elapsed_ms,
        faces_in_target: result.faces_in_target,
        smiles: result.smiles,
        outcome_category: result.outcome.category().to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::detection::domain::detection::HeadAngles;
    use crate::detection::domain::frame_classifier::AcceptedFace;
    use crate::session::domain::session_aggregator::SessionOutcome;
    use crate::shared::geometry::Rect;
    use rstest::rstest;

    fn accepted(roll: Option<f64>) -> FrameVerdict {
        FrameVerdict::SingleInTarget(AcceptedFace {
            bounds: Rect::new(375.4, 416.7, 791.9, 1250.0),
            smile_probability: Some(0.9),
            angles: HeadAngles {
                roll,
                yaw: Some(-12.5),
                pitch: None,
            },
            tracking_id: Some(2),
        })
    }

    #[test]
    fn test_single_in_target_encodes_one_face() {
        let payload = encode(&accepted(Some(3.25)));
        assert_eq!(
            payload,
            vec![FacePayload {
                x: 375,
                y: 416,
                width: 416,
                height: 833,
                roll_angle: 3.25,
                yaw_angle: -12.5,
                pitch_angle: 0.0,
            }]
        );
    }

    #[rstest]
    #[case(FrameVerdict::NoFace)]
    #[case(FrameVerdict::SingleOutOfTarget)]
    #[case(FrameVerdict::MultipleInFrame(2))]
    #[case(FrameVerdict::MultipleInTargetOnly(3))]
    fn test_other_verdicts_encode_empty(#[case] verdict: FrameVerdict) {
        assert!(encode(&verdict).is_empty());
    }

    #[test]
    fn test_face_event_json_shape() {
        let event = BridgeEvent::SingleFaceInTarget(encode(&accepted(None)));
        let json: serde_json::Value = serde_json::to_value(&event).unwrap();
        assert_eq!(json["event"], "onSingleFaceInTarget");
        let face = &json["data"][0];
        assert_eq!(face["x"], 375);
        assert_eq!(face["height"], 833);
        assert_eq!(face["rollAngle"], 0.0);
        assert_eq!(face["yawAngle"], -12.5);
    }

    #[test]
    fn test_empty_event_is_empty_list() {
        let event = BridgeEvent::SingleFaceInTarget(Vec::new());
        let json = serde_json::to_string(&event).unwrap();
        assert_eq!(json, r#"{"event":"onSingleFaceInTarget","data":[]}"#);
    }

    #[test]
    fn test_session_payload() {
        let result = SessionResult {
            elapsed_ms: 10_000,
            faces_in_target: 12,
            smiles: 4,
            outcome: SessionOutcome::Positive {
                smiles: 4,
                elapsed_secs: 10,
            },
        };
        let event = BridgeEvent::SessionComplete(encode_session(&result));
        let json: serde_json::Value = serde_json::to_value(&event).unwrap();
        assert_eq!(json["event"], "onSessionComplete");
        assert_eq!(json["data"]["elapsedMs"], 10_000);
        assert_eq!(json["data"]["facesInTarget"], 12);
        assert_eq!(json["data"]["smiles"], 4);
        assert_eq!(json["data"]["outcomeCategory"], "positive");
    }
}
