pub mod recorded_face_detector;
pub mod recording;
