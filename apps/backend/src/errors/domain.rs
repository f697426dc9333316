//! Domain-level error type produced by the game state machine.
//!
//! Every variant is local to the command that caused it: the engine logs it,
//! answers the offending connection with an `error` frame and keeps going.
//! A handler that returns one of these has not mutated any game state.

use thiserror::Error;

use crate::domain::state::{Phase, Team};
use crate::errors::ErrorCode;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DomainError {
    /// Command from a connection that never sent `client_hello`.
    #[error("Join the game first")]
    NotJoined,
    #[error("Client already known")]
    AlreadyJoined,
    #[error("{action} is only allowed during the {expected} phase (current phase: {actual})")]
    PhaseMismatch {
        action: &'static str,
        expected: Phase,
        actual: Phase,
    },
    #[error("Too many words in the suggestion: {submitted} submitted, at most {max} allowed")]
    TooManyWords { submitted: usize, max: usize },
    #[error("Team {0} needs at least one connected player")]
    TeamsNotReady(Team),
    /// Stale, replayed or forged word acknowledgement.
    #[error("Word token does not match the word in play")]
    StaleWordToken,
    #[error("{0}")]
    Validation(String),
}

impl DomainError {
    pub fn validation(detail: impl Into<String>) -> Self {
        Self::Validation(detail.into())
    }

    pub fn phase(action: &'static str, expected: Phase, actual: Phase) -> Self {
        Self::PhaseMismatch {
            action,
            expected,
            actual,
        }
    }

    pub fn code(&self) -> ErrorCode {
        match self {
            DomainError::NotJoined => ErrorCode::NotJoined,
            DomainError::AlreadyJoined => ErrorCode::AlreadyJoined,
            DomainError::PhaseMismatch { .. } => ErrorCode::PhaseMismatch,
            DomainError::TooManyWords { .. } => ErrorCode::TooManyWords,
            DomainError::TeamsNotReady(_) => ErrorCode::TeamsNotReady,
            DomainError::StaleWordToken => ErrorCode::StaleWordToken,
            DomainError::Validation(_) => ErrorCode::ValidationError,
        }
    }
}
