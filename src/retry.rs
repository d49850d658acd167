//! Fixed-delay retry loop shared by the network call sites.
//!
//! Every attempt runs to completion before the next one starts. The delay
//! is constant and only observed between attempts, never after the last.

use std::fmt::Display;
use std::future::Future;
use std::time::Duration;
use tracing::{debug, warn};

/// How many times to try and how long to wait in between.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Total number of attempts (at least 1).
    pub attempts: u32,
    /// Pause between two consecutive attempts.
    pub delay: Duration,
}

impl RetryPolicy {
    /// Create a policy; zero attempts is treated as one.
    pub fn new(attempts: u32, delay: Duration) -> Self {
        Self {
            attempts: attempts.max(1),
            delay,
        }
    }

    /// Policy with a delay given in whole seconds.
    pub fn from_secs(attempts: u32, delay_seconds: u64) -> Self {
        Self::new(attempts, Duration::from_secs(delay_seconds))
    }
}

/// The error of the final attempt, with the number of attempts made.
#[derive(Debug)]
pub struct Exhausted<E> {
    pub attempts: u32,
    pub error: E,
}

/// Retry `op` on every error.
pub async fn retry<T, E, F, Fut>(policy: &RetryPolicy, label: &str, op: F) -> Result<T, Exhausted<E>>
where
    E: Display,
    F: FnMut(u32) -> Fut,
    Fut: Future<Output = Result<T, E>>,
{
    retry_when(policy, label, |_| true, op).await
}

/// Retry `op` while `is_retryable` accepts the error.
///
/// `op` receives the 1-based attempt number. A non-retryable error stops
/// the loop immediately and is returned with the attempts made so far.
pub async fn retry_when<T, E, P, F, Fut>(
    policy: &RetryPolicy,
    label: &str,
    is_retryable: P,
    mut op: F,
) -> Result<T, Exhausted<E>>
where
    E: Display,
    P: Fn(&E) -> bool,
    F: FnMut(u32) -> Fut,
    Fut: Future<Output = Result<T, E>>,
{
    let attempts = policy.attempts.max(1);
    let mut attempt = 1;

    loop {
        debug!("{}: attempt {}/{}", label, attempt, attempts);

        match op(attempt).await {
            Ok(value) => return Ok(value),
            Err(error) => {
                if attempt >= attempts || !is_retryable(&error) {
                    return Err(Exhausted { attempts: attempt, error });
                }
                warn!(
                    "{} failed (attempt {}/{}): {}; retrying in {:?}",
                    label, attempt, attempts, error, policy.delay
                );
                tokio::time::sleep(policy.delay).await;
                attempt += 1;
            }
        }
    }
}
