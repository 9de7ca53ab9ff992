//! Booking and resource allocation engine for a single-site venue.
//!
//! Tables and rooms are held under date-scoped exclusivity: a resource may
//! serve at most one checked-in booking per calendar date. State lives in
//! memory and is rebuilt from an append-only WAL on startup.

pub mod engine;
pub mod model;
pub mod observability;
pub mod policy;
pub mod sweep;
pub mod wal;

pub use engine::{Engine, EngineError};
pub use model::{
    Booking, BookingId, BookingPatch, BookingRequest, BookingStatus, Resource, ResourceId,
    ResourceKind, ResourceStatus,
};
