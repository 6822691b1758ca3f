//! Replay session configuration.
//!
//! All tunable replay parameters are defined here so callers never
//! scatter magic numbers through session setup code.

use std::time::Duration;

use crate::replay::ReplayError;

/// Configuration for one replay session.
///
/// `speed` is a multiplier on wall time: 60.0 compresses an hour of
/// tournament into a minute of replay. `tick_interval` is the wall-time
/// cadence at which derived state is recomputed and delivered.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ReplayConfig {
    /// Virtual-time multiplier; must be finite and positive.
    pub speed: f64,
    /// Wall-time interval between ticks; must be non-zero.
    pub tick_interval: Duration,
}

impl Default for ReplayConfig {
    fn default() -> Self {
        Self {
            speed: 60.0,
            tick_interval: Duration::from_secs(1),
        }
    }
}

impl ReplayConfig {
    /// Replay at wall-clock speed, useful for shadowing a live display.
    pub fn realtime() -> Self {
        Self {
            speed: 1.0,
            tick_interval: Duration::from_secs(1),
        }
    }

    /// Heavily accelerated replay for exercising display clients in tests.
    pub fn accelerated() -> Self {
        Self {
            speed: 600.0,
            tick_interval: Duration::from_millis(250),
        }
    }

    /// Checks the configuration before a session starts ticking.
    ///
    /// # Errors
    ///
    /// - `ReplayError::InvalidSpeed` - Speed is zero, negative, or not finite
    /// - `ReplayError::InvalidTickInterval` - Tick interval is zero
    pub fn validate(&self) -> Result<(), ReplayError> {
        if !self.speed.is_finite() || self.speed <= 0.0 {
            return Err(ReplayError::InvalidSpeed { speed: self.speed });
        }
        if self.tick_interval.is_zero() {
            return Err(ReplayError::InvalidTickInterval);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_validates() {
        assert!(ReplayConfig::default().validate().is_ok());
        assert!(ReplayConfig::realtime().validate().is_ok());
        assert!(ReplayConfig::accelerated().validate().is_ok());
    }

    #[test]
    fn rejects_bad_speeds() {
        for speed in [0.0, -1.0, f64::NAN, f64::INFINITY] {
            let config = ReplayConfig {
                speed,
                ..ReplayConfig::default()
            };
            assert!(matches!(
                config.validate(),
                Err(ReplayError::InvalidSpeed { .. })
            ));
        }
    }

    #[test]
    fn rejects_zero_tick_interval() {
        let config = ReplayConfig {
            tick_interval: Duration::ZERO,
            ..ReplayConfig::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ReplayError::InvalidTickInterval)
        ));
    }
}
