//! Errors raised inside the exploration core.
//!
//! None of these are fatal. Each call site absorbs them with a fallback:
//! denied capture drops back to `Released`, stale ids are skipped, and a
//! degenerate heading reuses the previous frame's vector.

use thiserror::Error;

use crate::core::ObjectId;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum CoreError {
    #[error("pointer capture denied by platform: {0}")]
    CapturePermissionDenied(String),
    #[error("object `{0}` is no longer present")]
    StaleReference(ObjectId),
    #[error("direction vector has near-zero length")]
    DegenerateVector,
    #[error("invalid placement constraint: {0}")]
    InvalidConstraint(String),
    #[error("invalid colour `{0}`")]
    InvalidColor(String),
}
