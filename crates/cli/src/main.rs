use std::fs::File;
use std::path::PathBuf;
use std::process;
use std::sync::Arc;

use clap::Parser;

use smile_session_core::bridge::domain::event_sink::EventSink;
use smile_session_core::bridge::infrastructure::json_lines_event_sink::JsonLinesEventSink;
use smile_session_core::detection::infrastructure::recorded_face_detector::RecordedFaceDetector;
use smile_session_core::detection::infrastructure::recording::{
    Recording, SessionAction, SessionCommand,
};
use smile_session_core::notification::infrastructure::log_announcement_channel::LogAnnouncementChannel;
use smile_session_core::pipeline::face_feedback_use_case::FeedbackChannels;
use smile_session_core::pipeline::pipeline_logger::StdoutPipelineLogger;
use smile_session_core::pipeline::replay_recording_use_case::ReplayRecordingUseCase;
use smile_session_core::shared::config::FeedbackConfig;

/// Replays recorded face detections through the smile session engine.
#[derive(Parser)]
#[command(name = "smile-session")]
struct Cli {
    /// Recording file (JSON) with per-frame detections.
    recording: PathBuf,

    /// Config file (defaults to the user config directory when present).
    #[arg(long)]
    config: Option<PathBuf>,

    /// Target box size as a fraction of the overlay (0.0-1.0].
    #[arg(long)]
    target_ratio: Option<f64>,

    /// Smile probability above which a face counts as smiling (0.0-1.0).
    #[arg(long)]
    smile_threshold: Option<f64>,

    /// Session length in milliseconds (at most one hour).
    #[arg(long)]
    session_duration_ms: Option<u64>,

    /// Minimum gap between announcements in milliseconds.
    #[arg(long)]
    cooldown_ms: Option<u64>,

    /// Start a session at this recording time (ms).
    #[arg(long)]
    start_at: Option<u64>,

    /// Stop the running session at this recording time (ms).
    #[arg(long)]
    stop_at: Option<u64>,

    /// Write bridge events here instead of stdout (JSON lines).
    #[arg(long)]
    events: Option<PathBuf>,
}

fn main() {
    env_logger::init();

    if let Err(e) = run() {
        eprintln!("Error: {e}");
        process::exit(1);
    }
}

fn run() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    if !cli.recording.exists() {
        return Err(format!("Recording not found: {}", cli.recording.display()).into());
    }

    let config = build_config(&cli)?;
    log::info!(
        "Config: target ratio {}, smile threshold {}, session {}ms, cooldown {}ms",
        config.target_box_ratio,
        config.smile_threshold,
        config.session_duration_ms,
        config.announcement_cooldown_ms
    );

    let mut recording = Recording::load(&cli.recording)?;
    append_commands(&mut recording, cli.start_at, cli.stop_at);
    let recording = Arc::new(recording);

    let events: Box<dyn EventSink> = match &cli.events {
        Some(path) => Box::new(JsonLinesEventSink::new(File::create(path)?)),
        None => Box::new(JsonLinesEventSink::new(std::io::stdout())),
    };
    let channels = FeedbackChannels {
        toast: Box::new(LogAnnouncementChannel::new("toast")),
        speech: Box::new(LogAnnouncementChannel::new("speech")),
        events,
    };

    let mut use_case = ReplayRecordingUseCase::new(
        config,
        channels,
        Box::new(RecordedFaceDetector::new(recording.clone())),
        Box::new(StdoutPipelineLogger::default()),
    );
    let summary = use_case.execute(&recording)?;

    for (i, session) in summary.sessions.iter().enumerate() {
        log::info!(
            "Session {}: {} after {}ms ({} faces in target, {} smiles)",
            i + 1,
            session.outcome.category(),
            session.elapsed_ms,
            session.faces_in_target,
            session.smiles
        );
    }
    if let Some(path) = &cli.events {
        log::info!("Events written to {}", path.display());
    }
    Ok(())
}

fn build_config(cli: &Cli) -> Result<FeedbackConfig, Box<dyn std::error::Error>> {
    let mut config = FeedbackConfig::load(cli.config.as_deref())?;
    if let Some(ratio) = cli.target_ratio {
        config.target_box_ratio = ratio;
    }
    if let Some(threshold) = cli.smile_threshold {
        config.smile_threshold = threshold;
    }
    if let Some(duration) = cli.session_duration_ms {
        config.session_duration_ms = duration;
    }
    if let Some(cooldown) = cli.cooldown_ms {
        config.announcement_cooldown_ms = cooldown;
    }
    config.validate()?;
    Ok(config)
}

fn append_commands(recording: &mut Recording, start_at: Option<u64>, stop_at: Option<u64>) {
    if let Some(at_ms) = start_at {
        recording.commands.push(SessionCommand {
            at_ms,
            action: SessionAction::Start,
        });
    }
    if let Some(at_ms) = stop_at {
        recording.commands.push(SessionCommand {
            at_ms,
            action: SessionAction::Stop,
        });
    }
}
