pub mod bridge {
    pub mod domain {
        pub mod event_codec;
        pub mod event_sink;
    }
    pub mod infrastructure {
        pub mod json_lines_event_sink;
    }
}

pub mod detection {
    pub mod domain {
        pub mod coordinate_mapper;
        pub mod detection;
        pub mod face_detector;
        pub mod frame_classifier;
        pub mod target_box;
    }
    pub mod infrastructure;
}

pub mod notification {
    pub mod domain {
        pub mod announcement;
        pub mod narration;
        pub mod notification_throttle;
    }
    pub mod infrastructure {
        pub mod log_announcement_channel;
    }
}

pub mod pipeline {
    pub mod face_feedback_use_case;
    pub mod pipeline_logger;
    pub mod replay_recording_use_case;
    pub mod infrastructure {
        pub mod live_feedback_runner;
    }
}

pub mod session {
    pub mod domain {
        pub mod session_aggregator;
    }
    pub mod infrastructure {
        pub mod session_ticker;
    }
}

pub mod shared;
