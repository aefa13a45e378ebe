// ============================================
// TIMING UTILITY - Performance Measurement
// ============================================
// Usage:
//   1. Manual tracking: let timer = Timer::start("name"); ... timer.stop();
//   2. Batch tracking: AggregateTimer::record(duration) per item, then log_summary()
// ============================================

use std::time::{Duration, Instant};
use tracing::info;

/// Timer for measuring execution time
pub struct Timer {
    name: String,
    start: Instant,
}

impl Timer {
    pub fn start(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            start: Instant::now(),
        }
    }

    pub fn elapsed_secs(&self) -> f64 {
        self.start.elapsed().as_secs_f64()
    }

    /// Stop the timer and log the result
    pub fn stop(self) -> Duration {
        let duration = self.start.elapsed();
        info!(
            timer = %self.name,
            elapsed_ms = duration.as_millis() as u64,
            "{} - {}", self.name, Self::label(duration.as_millis())
        );
        duration
    }

    fn label(ms: u128) -> &'static str {
        match ms {
            0..=100 => "very fast",
            101..=500 => "fast",
            501..=1000 => "acceptable",
            1001..=5000 => "slow",
            _ => "very slow",
        }
    }
}

// ============================================
// AGGREGATE TIMING FOR BATCH OPERATIONS
// ============================================

/// Aggregate timer for tracking multiple operations
#[derive(Debug, Clone)]
pub struct AggregateTimer {
    name: String,
    count: usize,
    total_duration: Duration,
    min_duration: Option<Duration>,
    max_duration: Option<Duration>,
}

impl AggregateTimer {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            count: 0,
            total_duration: Duration::ZERO,
            min_duration: None,
            max_duration: None,
        }
    }

    /// Record a single operation duration
    pub fn record(&mut self, duration: Duration) {
        self.count += 1;
        self.total_duration += duration;
        self.min_duration = Some(self.min_duration.map_or(duration, |min| min.min(duration)));
        self.max_duration = Some(self.max_duration.map_or(duration, |max| max.max(duration)));
    }

    pub fn count(&self) -> usize {
        self.count
    }

    pub fn min_duration(&self) -> Option<Duration> {
        self.min_duration
    }

    pub fn max_duration(&self) -> Option<Duration> {
        self.max_duration
    }

    pub fn avg_duration(&self) -> Option<Duration> {
        if self.count == 0 {
            None
        } else {
            Some(self.total_duration / self.count as u32)
        }
    }

    pub fn log_summary(&self) {
        if self.count == 0 {
            info!(timer = %self.name, "no operations recorded");
            return;
        }

        info!(
            timer = %self.name,
            count = self.count,
            total_secs = self.total_duration.as_secs_f64(),
            avg_ms = self.avg_duration().unwrap_or_default().as_millis() as u64,
            min_ms = self.min_duration.unwrap_or_default().as_millis() as u64,
            max_ms = self.max_duration.unwrap_or_default().as_millis() as u64,
            "timing summary"
        );
    }
}
