use std::collections::BTreeMap;
use std::time::Instant;

/// Observer for replay and live-feedback orchestration.
///
/// Use cases report through this trait so the CLI can print a run summary
/// while tests and embedders stay silent.
pub trait PipelineLogger: Send {
    /// Report frame-level progress.
    fn progress(&mut self, current: usize, total: usize);

    /// Record how long a named stage took for one frame.
    fn timing(&mut self, stage: &str, duration_ms: f64);

    /// Record the classification of one frame.
    fn verdict(&mut self, name: &str);

    /// Record a completed session by outcome category.
    fn session(&mut self, category: &str);

    fn info(&mut self, message: &str);

    /// Emit an end-of-run summary. Default: no-op.
    fn summary(&self) {}
}

/// Discards all events.
pub struct NullPipelineLogger;

impl PipelineLogger for NullPipelineLogger {
    fn progress(&mut self, _current: usize, _total: usize) {}
    fn timing(&mut self, _stage: &str, _duration_ms: f64) {}
    fn verdict(&mut self, _name: &str) {}
    fn session(&mut self, _category: &str) {}
    fn info(&mut self, _message: &str) {}
}

/// CLI logger: tallies verdicts and session outcomes, tracks per-stage
/// timing, and prints a summary when the run ends.
///
/// Progress output is throttled to every `throttle_frames` frames.
pub struct StdoutPipelineLogger {
    throttle_frames: usize,
    timings: BTreeMap<String, Vec<f64>>,
    verdicts: BTreeMap<String, usize>,
    sessions: BTreeMap<String, usize>,
    start_time: Instant,
    total_frames: usize,
}

impl StdoutPipelineLogger {
    pub fn new(throttle_frames: usize) -> Self {
        Self {
            throttle_frames: throttle_frames.max(1),
            timings: BTreeMap::new(),
            verdicts: BTreeMap::new(),
            sessions: BTreeMap::new(),
            start_time: Instant::now(),
            total_frames: 0,
        }
    }

    /// Returns the formatted summary, or `None` if nothing was recorded.
    pub fn summary_string(&self) -> Option<String> {
        if self.verdicts.is_empty() && self.sessions.is_empty() && self.timings.is_empty() {
            return None;
        }

        let elapsed_ms = self.start_time.elapsed().as_secs_f64() * 1000.0;
        let classified: usize = self.verdicts.values().sum();
        let mut lines = vec![format!(
            "Replay summary ({} frames, {:.1}s wall time):",
            self.total_frames.max(classified),
            elapsed_ms / 1000.0
        )];

        for (name, count) in &self.verdicts {
            let pct = *count as f64 / classified.max(1) as f64 * 100.0;
            lines.push(format!("  {name:24}: {count:6}  ({pct:5.1}%)"));
        }

        for (stage, durations) in &self.timings {
            let total_ms: f64 = durations.iter().sum();
            let avg_ms = total_ms / durations.len().max(1) as f64;
            lines.push(format!(
                "  {stage:12}: avg {avg_ms:6.2}ms  total {total_ms:7.1}ms"
            ));
        }

        if !self.sessions.is_empty() {
            let total: usize = self.sessions.values().sum();
            lines.push(format!("  Sessions: {total}"));
            for (category, count) in &self.sessions {
                lines.push(format!("    {category}: {count}"));
            }
        }

        Some(lines.join("\n"))
    }

    pub fn verdict_count(&self, name: &str) -> usize {
        self.verdicts.get(name).copied().unwrap_or(0)
    }

    pub fn session_count(&self, category: &str) -> usize {
        self.sessions.get(category).copied().unwrap_or(0)
    }

    pub fn timings_for(&self, stage: &str) -> Option<&[f64]> {
        self.timings.get(stage).map(|v| v.as_slice())
    }
}

impl Default for StdoutPipelineLogger {
    fn default() -> Self {
        Self::new(100)
    }
}

impl PipelineLogger for StdoutPipelineLogger {
    fn progress(&mut self, current: usize, total: usize) {
        self.total_frames = total;
        if total > 0 && (current % self.throttle_frames == 0 || current == total) {
            let pct = current as f64 / total as f64 * 100.0;
            log::info!("Replaying: {current}/{total} frames ({pct:.1}%)");
        }
    }

    fn timing(&mut self, stage: &str, duration_ms: f64) {
        self.timings
            .entry(stage.to_string())
            .or_default()
            .push(duration_ms);
    }

    fn verdict(&mut self, name: &str) {
        *self.verdicts.entry(name.to_string()).or_default() += 1;
    }

    fn session(&mut self, category: &str) {
        *self.sessions.entry(category.to_string()).or_default() += 1;
    }

    fn info(&mut self, message: &str) {
        log::info!("{message}");
    }

    fn summary(&self) {
        if let Some(text) = self.summary_string() {
            log::info!("\n\n{text}");
        }
    }
}
