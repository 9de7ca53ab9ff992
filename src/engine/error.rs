use chrono::NaiveDate;

use crate::model::{BookingId, ResourceId, ResourceKind};

#[derive(Debug)]
pub enum EngineError {
    /// Malformed or missing required input; detected before any mutation.
    Validation(String),
    /// The resource already serves a checked-in booking on that date.
    Conflict {
        kind: ResourceKind,
        id: ResourceId,
        date: NaiveDate,
    },
    BookingNotFound(BookingId),
    ResourceNotFound {
        kind: ResourceKind,
        id: ResourceId,
    },
    /// Underlying WAL/store failure. The in-memory state is untouched.
    Store(String),
}

impl std::fmt::Display for EngineError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EngineError::Validation(msg) => write!(f, "validation: {msg}"),
            EngineError::Conflict { kind, id, date } => {
                write!(f, "{kind} {id} is already booked for {date}")
            }
            EngineError::BookingNotFound(id) => write!(f, "booking not found: {id}"),
            EngineError::ResourceNotFound { kind, id } => {
                write!(f, "{kind} {id} does not exist")
            }
            EngineError::Store(e) => write!(f, "store error: {e}"),
        }
    }
}

impl std::error::Error for EngineError {}
