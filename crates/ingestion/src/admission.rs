//! Admission filter: lossy downsampling to at most one reading per interval.

use std::time::Duration;

use tokio::time::Instant;

/// Interval gate owned by the driver.
///
/// *Armed* when nothing has been admitted yet or `now - last >= interval`;
/// otherwise *Idle*. Admission moves the gate back to Idle by recording `now`.
/// Rejected readings leave the state untouched and are never queued.
#[derive(Debug, Clone)]
pub struct AdmissionFilter {
    interval: Duration,
    last_admitted: Option<Instant>,
}

impl AdmissionFilter {
    /// Create a filter; the first reading is always admitted.
    pub fn new(interval: Duration) -> Self {
        Self {
            interval,
            last_admitted: None,
        }
    }

    /// Configured interval
    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Instant of the last admission, if any
    pub fn last_admitted(&self) -> Option<Instant> {
        self.last_admitted
    }

    /// Whether a reading presented at `now` would be admitted
    pub fn is_armed(&self, now: Instant) -> bool {
        match self.last_admitted {
            None => true,
            Some(last) => now.saturating_duration_since(last) >= self.interval,
        }
    }

    /// Admit or reject a reading presented at `now`.
    pub fn try_admit(&mut self, now: Instant) -> bool {
        if self.is_armed(now) {
            self.last_admitted = Some(now);
            true
        } else {
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const INTERVAL: Duration = Duration::from_secs(30);

    #[test]
    fn test_first_reading_always_admitted() {
        let mut filter = AdmissionFilter::new(INTERVAL);
        assert!(filter.try_admit(Instant::now()));
    }

    #[test]
    fn test_rejects_within_interval() {
        let start = Instant::now();
        let mut filter = AdmissionFilter::new(INTERVAL);
        assert!(filter.try_admit(start));
        assert!(!filter.try_admit(start + Duration::from_secs(10)));
        assert!(!filter.try_admit(start + Duration::from_millis(29_999)));
        assert!(filter.try_admit(start + INTERVAL));
    }

    #[test]
    fn test_rejection_does_not_reset_window() {
        let start = Instant::now();
        let mut filter = AdmissionFilter::new(INTERVAL);
        filter.try_admit(start);
        filter.try_admit(start + Duration::from_secs(20));
        assert_eq!(filter.last_admitted(), Some(start));
        assert!(filter.try_admit(start + Duration::from_secs(35)));
        assert_eq!(filter.last_admitted(), Some(start + Duration::from_secs(35)));
    }

    #[test]
    fn test_admitted_pairs_respect_interval() {
        let start = Instant::now();
        let mut filter = AdmissionFilter::new(Duration::from_secs(7));
        let mut admitted = Vec::new();

        // Irregular sub-interval spacing: 0, 3, 5, 6, 9, 13, ...
        let mut t = Duration::ZERO;
        for step in [3u64, 2, 1, 3, 4, 1, 1, 5, 2, 6, 1, 3, 2, 2].iter().cycle().take(200) {
            let now = start + t;
            if filter.try_admit(now) {
                admitted.push(now);
            }
            t += Duration::from_secs(*step);
        }

        assert!(admitted.len() > 1);
        for pair in admitted.windows(2) {
            assert!(pair[1] - pair[0] >= Duration::from_secs(7));
        }
    }

    #[test]
    fn test_zero_interval_admits_everything() {
        let now = Instant::now();
        let mut filter = AdmissionFilter::new(Duration::ZERO);
        assert!(filter.try_admit(now));
        assert!(filter.try_admit(now));
        assert!(filter.try_admit(now));
    }

    #[test]
    fn test_clock_going_backwards_does_not_admit() {
        let start = Instant::now() + Duration::from_secs(60);
        let mut filter = AdmissionFilter::new(INTERVAL);
        filter.try_admit(start);
        assert!(!filter.is_armed(start - Duration::from_secs(5)));
    }
}
