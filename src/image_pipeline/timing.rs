//! Per-stage wall clock timings.

use std::collections::HashMap;
use std::time::{Duration, Instant};

use tracing::info;

#[derive(Debug, Clone)]
pub struct StepTiming {
    pub name: String,
    pub duration: Duration,
}

/// Ordered stage durations plus a per-name total, so stages that run once
/// per augmented variant accumulate under a single name.
#[derive(Debug, Default)]
pub struct PipelineTimings {
    steps: Vec<StepTiming>,
    step_map: HashMap<String, Duration>,
}

impl PipelineTimings {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_step(&mut self, name: impl Into<String>, duration: Duration) {
        let name = name.into();
        *self.step_map.entry(name.clone()).or_insert(Duration::ZERO) += duration;
        self.steps.push(StepTiming { name, duration });
    }

    pub fn total_duration(&self) -> Duration {
        self.steps.iter().map(|s| s.duration).sum()
    }

    pub fn get_step(&self, name: &str) -> Option<Duration> {
        self.step_map.get(name).copied()
    }

    pub fn steps(&self) -> &[StepTiming] {
        &self.steps
    }

    /// Logs one line per distinct stage, in first-seen order.
    pub fn log_summary(&self) {
        let total = self.total_duration();
        let mut seen = Vec::new();
        for step in &self.steps {
            if seen.contains(&step.name.as_str()) {
                continue;
            }
            seen.push(step.name.as_str());

            let duration = self.step_map[&step.name];
            let percentage = if total.as_secs_f64() > 0.0 {
                duration.as_secs_f64() / total.as_secs_f64() * 100.0
            } else {
                0.0
            };
            info!(
                "{:<16} {:>12.3}ms ({:>5.1}%)",
                step.name,
                duration.as_secs_f64() * 1000.0,
                percentage
            );
        }
        info!("{:<16} {:>12.3}ms", "total", total.as_secs_f64() * 1000.0);
    }
}

pub struct Timer {
    start: Instant,
    name: String,
}

impl Timer {
    pub fn start(name: impl Into<String>) -> Self {
        Self {
            start: Instant::now(),
            name: name.into(),
        }
    }

    pub fn stop(self) -> (String, Duration) {
        (self.name, self.start.elapsed())
    }

    /// Stops the timer and records it into `timings`.
    pub fn record(self, timings: &mut PipelineTimings) {
        let (name, duration) = self.stop();
        timings.add_step(name, duration);
    }
}
