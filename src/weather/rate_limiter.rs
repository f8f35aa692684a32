// Sliding-window rate limiter and exponential backoff for outbound API calls

use std::collections::VecDeque;
use std::thread;
use std::time::{Duration, Instant};

use tracing::warn;

/// Allows at most `max_calls` within any `window`
#[derive(Debug)]
pub struct RateLimiter {
    max_calls: usize,
    window: Duration,
    calls: VecDeque<Instant>,
}

impl RateLimiter {
    pub fn new(max_calls: usize, window: Duration) -> Self {
        Self {
            max_calls,
            window,
            calls: VecDeque::with_capacity(max_calls),
        }
    }

    /// Records a call and returns true if one is allowed right now
    pub fn try_acquire(&mut self) -> bool {
        self.try_acquire_at(Instant::now())
    }

    fn try_acquire_at(&mut self, now: Instant) -> bool {
        self.evict(now);
        if self.calls.len() < self.max_calls {
            self.calls.push_back(now);
            true
        } else {
            false
        }
    }

    /// Time until the oldest call in the window leaves it
    pub fn wait_time(&self) -> Duration {
        self.wait_time_at(Instant::now())
    }

    fn wait_time_at(&self, now: Instant) -> Duration {
        match self.calls.front() {
            Some(oldest) => (*oldest + self.window).saturating_duration_since(now),
            None => Duration::ZERO,
        }
    }

    /// Blocks until a call is allowed, then records it
    pub fn acquire(&mut self) {
        while !self.try_acquire() {
            let wait = self.wait_time();
            warn!(wait_secs = wait.as_secs_f64(), "rate limit reached, waiting");
            thread::sleep(wait);
        }
    }

    fn evict(&mut self, now: Instant) {
        while let Some(oldest) = self.calls.front() {
            if now.saturating_duration_since(*oldest) >= self.window {
                self.calls.pop_front();
            } else {
                break;
            }
        }
    }
}

/// Runs `op` up to `max_attempts` times, sleeping `base_delay * 2^attempt`
/// between failures. `op` receives the 0-based attempt number.
pub fn retry_with_backoff<T, E, F>(max_attempts: u32, base_delay: Duration, mut op: F) -> Result<T, E>
where
    E: std::fmt::Display,
    F: FnMut(u32) -> Result<T, E>,
{
    let attempts = max_attempts.max(1);
    let mut attempt = 0;
    loop {
        match op(attempt) {
            Ok(value) => return Ok(value),
            Err(err) if attempt + 1 < attempts => {
                warn!(attempt = attempt + 1, error = %err, "request failed, retrying");
                thread::sleep(base_delay.saturating_mul(2u32.saturating_pow(attempt)));
                attempt += 1;
            }
            Err(err) => return Err(err),
        }
    }
}
