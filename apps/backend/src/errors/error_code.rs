//! Error codes reported to game clients.
//!
//! Add new codes here; never pass ad-hoc strings as error codes.
//!
//! All error codes are SCREAMING_SNAKE_CASE and map 1:1 to the strings that
//! appear in `error` frames sent over the socket.

use core::fmt;

use serde::{Serialize, Serializer};

/// Centralized error codes for the game server.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    // Protocol
    /// Frame could not be decoded into a known command
    BadRequest,

    // Identity
    /// Command requires a prior `client_hello`
    NotJoined,
    /// `client_hello` from a connection that already owns a player
    AlreadyJoined,

    // Phase
    /// Command is valid but not allowed in the current phase
    PhaseMismatch,

    // Validation
    /// More suggested words than the configured maximum
    TooManyWords,
    /// A team has no connected player at start time
    TeamsNotReady,
    /// General validation error (blank names, blank words)
    ValidationError,

    // Word tokens
    /// Word acknowledgement with a stale, replayed or forged token
    StaleWordToken,
}

impl ErrorCode {
    pub const ALL: [ErrorCode; 8] = [
        ErrorCode::BadRequest,
        ErrorCode::NotJoined,
        ErrorCode::AlreadyJoined,
        ErrorCode::PhaseMismatch,
        ErrorCode::TooManyWords,
        ErrorCode::TeamsNotReady,
        ErrorCode::ValidationError,
        ErrorCode::StaleWordToken,
    ];

    /// Returns the canonical SCREAMING_SNAKE_CASE string for this error code.
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::BadRequest => "BAD_REQUEST",
            Self::NotJoined => "NOT_JOINED",
            Self::AlreadyJoined => "ALREADY_JOINED",
            Self::PhaseMismatch => "PHASE_MISMATCH",
            Self::TooManyWords => "TOO_MANY_WORDS",
            Self::TeamsNotReady => "TEAMS_NOT_READY",
            Self::ValidationError => "VALIDATION_ERROR",
            Self::StaleWordToken => "STALE_WORD_TOKEN",
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for ErrorCode {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}
