use std::time::Duration;

/// Retry budget for a single logical request.
///
/// `max_retries` is the total number of attempts; a value of zero is
/// treated as one attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryConfig {
    pub max_retries: u32,
    pub base_delay_ms: u64,
    pub rate_limit_floor_ms: u64,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_retries: 3,
            base_delay_ms: 2000,
            rate_limit_floor_ms: 5000,
        }
    }
}

impl RetryConfig {
    pub fn new(max_retries: u32, base_delay_ms: u64) -> Self {
        Self {
            max_retries,
            base_delay_ms,
            ..Default::default()
        }
    }

    pub fn with_rate_limit_floor(mut self, rate_limit_floor_ms: u64) -> Self {
        self.rate_limit_floor_ms = rate_limit_floor_ms;
        self
    }

    pub fn backoff(&self) -> Backoff {
        Backoff {
            max_attempts: self.max_retries.max(1),
            attempts: 0,
            delay_ms: self.base_delay_ms,
            rate_limit_floor_ms: self.rate_limit_floor_ms,
        }
    }
}

/// Exponential backoff state for one logical call.
///
/// The delay doubles after every wait and never shrinks. A rate-limited
/// failure raises it to at least the floor before waiting.
#[derive(Debug, Clone)]
pub struct Backoff {
    max_attempts: u32,
    attempts: u32,
    delay_ms: u64,
    rate_limit_floor_ms: u64,
}

impl Backoff {
    /// Records a failed attempt and returns how long to wait before the next
    /// one, or `None` once the attempt budget is spent.
    pub fn next_delay(&mut self, rate_limited: bool) -> Option<Duration> {
        self.attempts += 1;
        if rate_limited {
            self.delay_ms = self.delay_ms.max(self.rate_limit_floor_ms);
        }
        if self.attempts >= self.max_attempts {
            return None;
        }

        let delay = Duration::from_millis(self.delay_ms);
        self.delay_ms = self.delay_ms.saturating_mul(2);
        Some(delay)
    }

    pub fn attempts(&self) -> u32 {
        self.attempts
    }

    pub fn max_attempts(&self) -> u32 {
        self.max_attempts
    }
}
