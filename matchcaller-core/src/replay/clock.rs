//! Wall-time to virtual-time mapping for replay sessions.

use std::time::{Duration, Instant};

use crate::replay::ReplayError;

/// Stateless clock mapping wall-clock elapsed time to virtual elapsed
/// time through a fixed speed multiplier.
///
/// The clock holds no pause state; a caller pauses a replay by not
/// advancing the wall instant it samples. Repeated calls with a
/// non-decreasing `wall_now` always yield non-decreasing virtual time.
#[derive(Debug, Clone, Copy)]
pub struct ReplayClock {
    speed: f64,
}

impl ReplayClock {
    /// Creates a clock with the given speed multiplier.
    ///
    /// # Errors
    ///
    /// - `ReplayError::InvalidSpeed` - Speed is zero, negative, or not finite
    pub fn new(speed: f64) -> Result<ReplayClock, ReplayError> {
        if !speed.is_finite() || speed <= 0.0 {
            return Err(ReplayError::InvalidSpeed { speed });
        }
        Ok(ReplayClock { speed })
    }

    /// The configured speed multiplier.
    pub fn speed(&self) -> f64 {
        self.speed
    }

    /// Virtual time elapsed between `wall_start` and `wall_now`.
    ///
    /// Saturates at zero if `wall_now` is before `wall_start`, so
    /// virtual time never runs backward, and at `Duration::MAX` when
    /// the scaled product overflows.
    pub fn virtual_elapsed(&self, wall_start: Instant, wall_now: Instant) -> Duration {
        let wall = wall_now.saturating_duration_since(wall_start);
        Duration::try_from_secs_f64(wall.as_secs_f64() * self.speed).unwrap_or(Duration::MAX)
    }
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;

    use super::*;

    #[test]
    fn rejects_non_positive_and_non_finite_speeds() {
        for speed in [0.0, -1.0, f64::NAN, f64::INFINITY, f64::NEG_INFINITY] {
            assert!(matches!(
                ReplayClock::new(speed),
                Err(ReplayError::InvalidSpeed { .. })
            ));
        }
    }

    #[test]
    fn scales_elapsed_wall_time() {
        let clock = ReplayClock::new(60.0).unwrap();
        let start = Instant::now();
        let now = start + Duration::from_secs(2);

        assert_eq!(
            clock.virtual_elapsed(start, now),
            Duration::from_secs(120)
        );
    }

    #[test]
    fn saturates_instead_of_overflowing_on_extreme_speeds() {
        let clock = ReplayClock::new(1e30).unwrap();
        let start = Instant::now();
        let now = start + Duration::from_secs(2);

        assert_eq!(clock.virtual_elapsed(start, now), Duration::MAX);
    }

    #[test]
    fn saturates_when_wall_now_precedes_start() {
        let clock = ReplayClock::new(10.0).unwrap();
        let now = Instant::now();
        let start = now + Duration::from_secs(5);

        assert_eq!(clock.virtual_elapsed(start, now), Duration::ZERO);
    }

    proptest! {
        #[test]
        fn virtual_time_is_monotone_in_wall_time(
            speed in 0.001f64..10_000.0,
            first_ms in 0u64..100_000,
            extra_ms in 0u64..100_000,
        ) {
            let clock = ReplayClock::new(speed).unwrap();
            let start = Instant::now();
            let earlier = start + Duration::from_millis(first_ms);
            let later = earlier + Duration::from_millis(extra_ms);

            prop_assert!(
                clock.virtual_elapsed(start, earlier) <= clock.virtual_elapsed(start, later)
            );
        }
    }
}
