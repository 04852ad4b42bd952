// Request-scoped cancellation, ledger deadlines and the transient retry policy.
//
// - A cancelled request never commits: the in-flight transaction is dropped, which
//   rolls it back.
// - Each ledger attempt runs under its own deadline; a timed-out attempt rolls back
//   and is not retried.
// - Only `MeetingError::Transient` is retried, with exponential backoff, outside the
//   transaction. Exhausted retries surface as `Internal`.

use std::future::Future;
use std::time::Duration;
use tokio_util::sync::CancellationToken;

use crate::modules::meetings::application::errors::MeetingError;

#[derive(Debug, Clone, Default)]
pub struct RequestContext {
    pub cancel: CancellationToken,
}

impl RequestContext {
    pub fn new(cancel: CancellationToken) -> Self {
        Self { cancel }
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancel.is_cancelled()
    }
}

/// Where a request came from, for the audit trail.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RequestOrigin {
    pub ip: Option<String>,
    pub user_agent: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    pub max_attempts: u32,
    pub base_delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            base_delay: Duration::from_millis(50),
        }
    }
}

impl RetryPolicy {
    pub fn backoff(&self, attempt: u32) -> Duration {
        self.base_delay
            .saturating_mul(2u32.saturating_pow(attempt.saturating_sub(1)))
    }
}

pub async fn bounded<T, Fut>(
    context: &RequestContext,
    operation: &'static str,
    deadline: Duration,
    work: Fut,
) -> Result<T, MeetingError>
where
    Fut: Future<Output = Result<T, MeetingError>>,
{
    tokio::select! {
        biased;
        _ = context.cancel.cancelled() => Err(MeetingError::Cancelled),
        outcome = tokio::time::timeout(deadline, work) => match outcome {
            Ok(result) => result,
            Err(_) => {
                tracing::warn!(%operation, ?deadline, "ledger deadline exceeded, rolled back");
                Err(MeetingError::Timeout { operation })
            }
        },
    }
}

pub async fn with_retry<T, F, Fut>(
    context: &RequestContext,
    operation: &'static str,
    policy: RetryPolicy,
    mut attempt: F,
) -> Result<T, MeetingError>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, MeetingError>>,
{
    let max_attempts = policy.max_attempts.max(1);
    let mut tries = 0;
    loop {
        tries += 1;
        match attempt().await {
            Err(MeetingError::Transient { source, .. }) if tries < max_attempts => {
                let delay = policy.backoff(tries);
                tracing::warn!(%operation, attempt = tries, ?delay, error = %source, "transient ledger failure, retrying");
                tokio::select! {
                    _ = context.cancel.cancelled() => return Err(MeetingError::Cancelled),
                    _ = tokio::time::sleep(delay) => {}
                }
            }
            Err(MeetingError::Transient { source, .. }) => {
                tracing::warn!(%operation, attempts = tries, error = %source, "transient ledger failure, giving up");
                return Err(MeetingError::internal(operation, source));
            }
            other => return other,
        }
    }
}
