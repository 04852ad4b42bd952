// Error taxonomy surfaced by the meeting engine to its callers.

use thiserror::Error;
use uuid::Uuid;

use crate::modules::meetings::adapters::outbound::ledger::LedgerError;
use crate::modules::meetings::core::state::Rejection;
use crate::shared::infrastructure::oracle::OracleError;

type BoxedSource = Box<dyn std::error::Error + Send + Sync>;

#[derive(Debug, Error)]
pub enum MeetingError {
    #[error("not found: {0}")]
    NotFound(String),

    #[error("actor {actor_id} may not perform {activity}")]
    Forbidden { actor_id: Uuid, activity: &'static str },

    #[error("invalid state: {0}")]
    InvalidState(String),

    #[error("validation failed: {0}")]
    Validation(String),

    #[error("conflict: {0}")]
    Conflict(String),

    /// Retried by the engine; only escapes when a caller bypasses the retry policy.
    #[error("{operation}: transient ledger failure")]
    Transient {
        operation: &'static str,
        #[source]
        source: LedgerError,
    },

    #[error("request cancelled")]
    Cancelled,

    #[error("{operation}: ledger deadline exceeded")]
    Timeout { operation: &'static str },

    #[error("{operation}: internal error")]
    Internal {
        operation: &'static str,
        #[source]
        source: BoxedSource,
    },
}

impl MeetingError {
    pub fn internal(operation: &'static str, source: impl Into<BoxedSource>) -> Self {
        MeetingError::Internal {
            operation,
            source: source.into(),
        }
    }

    pub fn from_ledger(operation: &'static str, error: LedgerError) -> Self {
        match error {
            LedgerError::NotFound { entity, id } => {
                MeetingError::NotFound(format!("{entity} {id}"))
            }
            LedgerError::Conflict(reason) => MeetingError::Conflict(reason),
            LedgerError::Transient(_) => MeetingError::Transient {
                operation,
                source: error,
            },
            LedgerError::InvariantViolation(_) => {
                tracing::error!(%operation, %error, "ledger invariant violated");
                MeetingError::internal(operation, error)
            }
        }
    }

    pub fn from_oracle(operation: &'static str, error: OracleError) -> Self {
        MeetingError::internal(operation, error)
    }

    /// Stable machine-readable code for transports.
    pub fn code(&self) -> &'static str {
        match self {
            MeetingError::NotFound(_) => "NOT_FOUND",
            MeetingError::Forbidden { .. } => "FORBIDDEN",
            MeetingError::InvalidState(_) => "INVALID_STATE",
            MeetingError::Validation(_) => "VALIDATION",
            MeetingError::Conflict(_) => "CONFLICT",
            MeetingError::Cancelled => "CANCELLED",
            MeetingError::Timeout { .. } => "TIMEOUT",
            MeetingError::Transient { .. } | MeetingError::Internal { .. } => "INTERNAL",
        }
    }
}

impl From<Rejection> for MeetingError {
    fn from(rejection: Rejection) -> Self {
        match rejection {
            Rejection::InvalidState(reason) => MeetingError::InvalidState(reason),
            Rejection::Validation(reason) => MeetingError::Validation(reason),
            Rejection::Conflict(reason) => MeetingError::Conflict(reason),
            Rejection::NotFound(reason) => MeetingError::NotFound(reason),
        }
    }
}

/// Ledger calls inside a use case: `ledger_call.await.map_err(ledger_err("start_meeting"))?`.
pub fn ledger_err(operation: &'static str) -> impl Fn(LedgerError) -> MeetingError {
    move |error| MeetingError::from_ledger(operation, error)
}
