//! Capped exponential backoff with jitter for dashboard reconnects.
//!
//! After every dropped session or failed connect the connection manager
//! asks [`Backoff::next_delay`] for exactly one delay, sleeps it, and
//! tries again. [`ReconnectConfig::fixed`] restores a constant retry
//! interval without jitter.

use std::time::Duration;

use rand::Rng;

/// Tunable parameters for the backoff strategy.
#[derive(Debug, Clone, PartialEq)]
pub struct ReconnectConfig {
    /// Delay before the first reconnection attempt.
    pub initial_delay: Duration,
    /// Upper bound on the delay between attempts, jitter included.
    pub max_delay: Duration,
    /// Factor by which the delay grows after each failure.
    pub multiplier: f64,
    /// Relative spread applied to each delay, `0.2` meaning ±20 %.
    pub jitter: f64,
}

impl Default for ReconnectConfig {
    fn default() -> Self {
        Self {
            initial_delay: Duration::from_secs(3),
            max_delay: Duration::from_secs(30),
            multiplier: 2.0,
            jitter: 0.2,
        }
    }
}

impl ReconnectConfig {
    /// Retry every `delay`, forever, with no growth and no jitter.
    pub fn fixed(delay: Duration) -> Self {
        Self {
            initial_delay: delay,
            max_delay: delay,
            multiplier: 1.0,
            jitter: 0.0,
        }
    }
}

/// Base delay for the attempt that follows one which waited `current`.
///
/// Multipliers below 1 count as 1, so the delay never shrinks. A product
/// too large for `Duration` saturates at `max_delay`.
pub fn next_delay(current: Duration, config: &ReconnectConfig) -> Duration {
    Duration::try_from_secs_f64(current.as_secs_f64() * config.multiplier.max(1.0))
        .map_or(config.max_delay, |grown| grown.min(config.max_delay))
}

/// Spread `base` by `jitter * unit`, where `unit` is in `[-1.0, 1.0]`.
///
/// Never exceeds `max`.
pub fn apply_jitter(base: Duration, jitter: f64, unit: f64, max: Duration) -> Duration {
    if jitter <= 0.0 {
        return base.min(max);
    }
    let factor = 1.0 + jitter.min(1.0) * unit.clamp(-1.0, 1.0);
    let ms = (base.as_millis() as f64 * factor).round().max(0.0) as u64;
    Duration::from_millis(ms).min(max)
}

/// Backoff state for one connection manager.
#[derive(Debug)]
pub struct Backoff {
    config: ReconnectConfig,
    current: Duration,
    attempt: u32,
}

impl Backoff {
    pub fn new(config: ReconnectConfig) -> Self {
        let current = config.initial_delay;
        Self {
            config,
            current,
            attempt: 0,
        }
    }

    /// Schedule the next attempt: returns its number (from 1) and the
    /// jittered delay to wait, then grows the base delay.
    pub fn next_delay(&mut self) -> (u32, Duration) {
        self.attempt = self.attempt.saturating_add(1);
        let unit = if self.config.jitter > 0.0 {
            rand::rng().random_range(-1.0..=1.0)
        } else {
            0.0
        };
        let delay = apply_jitter(self.current, self.config.jitter, unit, self.config.max_delay);
        self.current = next_delay(self.current, &self.config);
        (self.attempt, delay)
    }

    /// Back to the initial delay after a successful open.
    pub fn reset(&mut self) {
        self.current = self.config.initial_delay;
        self.attempt = 0;
    }

    pub fn attempt(&self) -> u32 {
        self.attempt
    }
}
