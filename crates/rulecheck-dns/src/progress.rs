use std::time::{Duration, Instant};

use tracing::info;

/// Periodic progress logging for one resolution stage.
pub(crate) struct Progress<'a> {
    tier: &'a str,
    total: usize,
    completed: usize,
    interval: usize,
    started: Instant,
}

impl<'a> Progress<'a> {
    pub(crate) fn new(tier: &'a str, total: usize, interval: usize) -> Self {
        Self {
            tier,
            total,
            completed: 0,
            interval: interval.max(1),
            started: Instant::now(),
        }
    }

    /// Record one completion; logs on every `interval`-th and on the last.
    pub(crate) fn complete(&mut self, in_flight: usize) {
        self.completed += 1;
        if self.completed % self.interval == 0 || self.completed == self.total {
            self.log(in_flight);
        }
    }

    pub(crate) fn elapsed(&self) -> Duration {
        self.started.elapsed()
    }

    fn log(&self, in_flight: usize) {
        let elapsed = self.started.elapsed();
        info!(
            tier = %self.tier,
            completed = self.completed,
            total = self.total,
            percent = format_args!("{:.1}", percent(self.completed, self.total)),
            in_flight,
            elapsed = ?round_secs(elapsed),
            remaining = ?round_secs(estimate_remaining(elapsed, self.completed, self.total)),
            "resolution progress"
        );
    }
}

fn percent(completed: usize, total: usize) -> f64 {
    if total == 0 {
        return 100.0;
    }
    completed as f64 * 100.0 / total as f64
}

/// Linear extrapolation from the average time per completion.
fn estimate_remaining(elapsed: Duration, completed: usize, total: usize) -> Duration {
    if completed == 0 || completed >= total {
        return Duration::ZERO;
    }
    elapsed.mul_f64((total - completed) as f64 / completed as f64)
}

fn round_secs(d: Duration) -> Duration {
    Duration::from_secs(d.as_secs())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn remaining_is_linear() {
        let remaining = estimate_remaining(Duration::from_secs(10), 100, 300);
        assert_eq!(remaining, Duration::from_secs(20));
    }

    #[test]
    fn remaining_zero_at_bounds() {
        assert_eq!(estimate_remaining(Duration::from_secs(5), 0, 10), Duration::ZERO);
        assert_eq!(estimate_remaining(Duration::from_secs(5), 10, 10), Duration::ZERO);
    }

    #[test]
    fn percent_of_empty_stage() {
        assert_eq!(percent(0, 0), 100.0);
        assert_eq!(percent(1, 4), 25.0);
    }
}
