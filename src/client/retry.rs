//! Retry policy and backoff schedule for the API client.

use std::error::Error as StdError;
use std::time::Duration;

use rand::Rng;
use reqwest::header::{HeaderMap, RETRY_AFTER};

/// Retries after the initial attempt.
pub const DEFAULT_MAX_RETRIES: u32 = 3;

/// Base delay of the exponential schedule.
pub const DEFAULT_RETRY_DELAY: Duration = Duration::from_secs(1);

/// How the client retries transient failures.
///
/// Delays grow as `base_delay * 2^attempt` plus up to 25% random jitter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    pub max_retries: u32,
    pub base_delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_retries: DEFAULT_MAX_RETRIES,
            base_delay: DEFAULT_RETRY_DELAY,
        }
    }
}

impl RetryPolicy {
    /// Total number of attempts, initial one included.
    pub fn max_attempts(&self) -> u32 {
        self.max_retries + 1
    }

    /// Whether another attempt may follow `attempt` (zero-based).
    pub fn can_retry(&self, attempt: u32) -> bool {
        attempt < self.max_retries
    }

    /// Un-jittered delay for `attempt` (zero-based).
    pub fn base_backoff(&self, attempt: u32) -> Duration {
        self.base_delay.saturating_mul(1u32 << attempt.min(16))
    }

    /// Delay before the attempt following `attempt`, jitter included.
    ///
    /// Always in `[base_backoff, 1.25 * base_backoff)`.
    pub fn backoff(&self, attempt: u32) -> Duration {
        let delay = self.base_backoff(attempt);
        let max_jitter = (delay / 4).as_nanos() as u64;
        if max_jitter == 0 {
            return delay;
        }
        let jitter = rand::thread_rng().gen_range(0..max_jitter);
        delay + Duration::from_nanos(jitter)
    }

    /// Delay after a 429: the server's `Retry-After` if usable, else backoff.
    pub fn rate_limit_delay(&self, attempt: u32, headers: &HeaderMap) -> Duration {
        parse_retry_after(headers).unwrap_or_else(|| self.backoff(attempt))
    }
}

/// Parse `Retry-After` as a positive integer number of seconds.
///
/// HTTP-date values and zero are ignored.
pub fn parse_retry_after(headers: &HeaderMap) -> Option<Duration> {
    headers
        .get(RETRY_AFTER)?
        .to_str()
        .ok()?
        .trim()
        .parse::<u64>()
        .ok()
        .filter(|secs| *secs > 0)
        .map(Duration::from_secs)
}

/// Whether a transport-level failure is worth another attempt.
///
/// Timeouts always are. Connect failures only when caused by a timeout or a
/// temporary name-resolution failure; a refused connection or an unknown
/// host fails immediately.
pub fn is_retryable(err: &reqwest::Error) -> bool {
    if err.is_timeout() {
        return true;
    }
    err.is_connect() && std::iter::successors(err.source(), |&e| e.source()).any(is_transient)
}

fn is_transient(err: &(dyn StdError + 'static)) -> bool {
    if let Some(io) = err.downcast_ref::<std::io::Error>() {
        if io.kind() == std::io::ErrorKind::TimedOut {
            return true;
        }
    }
    let message = err.to_string().to_lowercase();
    message.contains("temporary failure in name resolution") || message.contains("timed out")
}
