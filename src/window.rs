use chrono::{DateTime, Utc};

use crate::config::WindowConfig;

/// Half-open collection window `[from, to)`.
///
/// The far edge is pushed back by the configured buffer so a file
/// whose "last written" stamp is reported late by the provider is
/// still picked up by a later run. Consecutive runs overlap by
/// design; the destination key makes the overlap harmless.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeWindow {
    pub from: DateTime<Utc>,
    pub to: DateTime<Utc>,
}

impl TimeWindow {
    /// Computes the window relative to `now`.
    pub fn compute(now: DateTime<Utc>, cfg: &WindowConfig) -> Self {
        Self {
            from: now - cfg.from_ago - cfg.buffer,
            to: now - cfg.to_ago,
        }
    }

    /// `from <= ts < to`
    pub fn contains(&self, ts: DateTime<Utc>) -> bool {
        self.from <= ts && ts < self.to
    }

    /// Lower bound handed to the listing API, in epoch milliseconds.
    pub fn since_ms(&self) -> i64 {
        self.from.timestamp_millis()
    }
}

#[cfg(test)]
mod tests {
    use chrono::{Duration, TimeZone};

    use super::*;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap()
    }

    #[test]
    fn default_window_spans_two_hours_ten_to_one_hour_ago() {
        let w = TimeWindow::compute(now(), &WindowConfig::default());

        assert_eq!(w.from, Utc.with_ymd_and_hms(2024, 5, 1, 9, 50, 0).unwrap());
        assert_eq!(w.to, Utc.with_ymd_and_hms(2024, 5, 1, 11, 0, 0).unwrap());
        assert_eq!(w.since_ms(), w.from.timestamp_millis());
    }

    #[test]
    fn window_is_never_empty_for_ordered_offsets() {
        for (from_ago, to_ago, buffer) in [(1, 0, 0), (120, 60, 10), (61, 60, 0), (5, 0, 500)] {
            let cfg = WindowConfig {
                from_ago: Duration::minutes(from_ago),
                to_ago: Duration::minutes(to_ago),
                buffer: Duration::minutes(buffer),
            };
            let w = TimeWindow::compute(now(), &cfg);
            assert!(w.from < w.to, "{from_ago}/{to_ago}/{buffer} produced {w:?}");
        }
    }

    #[test]
    fn bounds_are_half_open() {
        let w = TimeWindow::compute(now(), &WindowConfig::default());

        assert!(w.contains(w.from));
        assert!(!w.contains(w.to));
        assert!(w.contains(w.to - Duration::milliseconds(1)));
        assert!(!w.contains(w.from - Duration::milliseconds(1)));
    }
}
