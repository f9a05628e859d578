//! Kind-based error classification.
//!
//! Domain errors report what kind of failure they are instead of being
//! matched on message text, so context can be added to a message without
//! changing how it is surfaced.

use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// Caller-supplied data violates a rule
    Validation,
    /// Request clashes with stored state
    Conflict,
    NotFound,
    /// Anything else, storage failures included
    Internal,
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            ErrorKind::Validation => "validation",
            ErrorKind::Conflict => "conflict",
            ErrorKind::NotFound => "not_found",
            ErrorKind::Internal => "internal",
        })
    }
}

pub trait ClassifiedError: std::error::Error {
    fn kind(&self) -> ErrorKind;

    fn is_validation(&self) -> bool {
        self.kind() == ErrorKind::Validation
    }

    fn is_conflict(&self) -> bool {
        self.kind() == ErrorKind::Conflict
    }

    fn is_not_found(&self) -> bool {
        self.kind() == ErrorKind::NotFound
    }
}
