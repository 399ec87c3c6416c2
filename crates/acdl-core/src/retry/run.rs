//! Retry loop: run a closure until success or policy says stop.

use std::fmt;

use super::policy::{RetryDecision, RetryPolicy};

/// Returned when every attempt failed. Carries the last error.
#[derive(Debug)]
pub struct RetryExhausted<E> {
    pub attempts: u32,
    pub last: E,
}

impl<E: fmt::Display> fmt::Display for RetryExhausted<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "gave up after {} attempts: {}", self.attempts, self.last)
    }
}

/// Runs `f` (given the 1-based attempt number) until it succeeds or the
/// policy says to stop. Each failure is logged before sleeping; the thread
/// blocks for the delay, which only stalls the calling worker.
pub fn run_with_retry<T, E, F>(
    policy: &RetryPolicy,
    what: &str,
    mut f: F,
) -> Result<T, RetryExhausted<E>>
where
    E: fmt::Display,
    F: FnMut(u32) -> Result<T, E>,
{
    let mut attempt = 1u32;
    loop {
        match f(attempt) {
            Ok(v) => {
                if attempt > 1 {
                    tracing::debug!(attempts = attempt, "{} succeeded after retry", what);
                }
                return Ok(v);
            }
            Err(e) => match policy.decide(attempt) {
                RetryDecision::NoRetry => {
                    return Err(RetryExhausted {
                        attempts: attempt,
                        last: e,
                    })
                }
                RetryDecision::RetryAfter(d) => {
                    tracing::warn!(
                        "{} failed (attempt {}/{}): {}; retrying in {:.1}s",
                        what,
                        attempt,
                        policy.max_attempts,
                        e,
                        d.as_secs_f64()
                    );
                    std::thread::sleep(d);
                    attempt += 1;
                }
            },
        }
    }
}
