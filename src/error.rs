//! Error types for u-allocation.
//!
//! A rejected allocation is not an internal failure: the gate returns an
//! [`AllocationVerdict`](crate::validation::AllocationVerdict) value. Only
//! the planner, which was asked to write, lifts a rejection into
//! [`Error::Rejected`].

use thiserror::Error;

use crate::validation::{Rejection, ValidationError};

/// Result type for u-allocation operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in u-allocation.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum Error {
    /// A request or record has an empty resource ID.
    #[error("missing resource id")]
    MissingResourceId,

    /// A request or record has an empty project ID.
    #[error("missing project id")]
    MissingProjectId,

    /// A committed percentage is below zero.
    #[error("negative percentage {percentage} on {id:?}")]
    NegativePercentage {
        /// Allocation ID, or the resource ID for a new request.
        id: String,
        /// Offending value.
        percentage: f64,
    },

    /// A committed percentage is NaN or infinite.
    #[error("percentage on {0:?} is not a finite number")]
    NonFinitePercentage(String),

    /// A referenced resource is not in the snapshot.
    #[error("resource {0:?} not found")]
    UnknownResource(String),

    /// A referenced project is not in the snapshot.
    #[error("project {0:?} not found")]
    UnknownProject(String),

    /// A referenced allocation is not in the snapshot.
    #[error("allocation {0:?} not found")]
    UnknownAllocation(String),

    /// The allocation gate refused the write.
    #[error("allocation rejected: {0}")]
    Rejected(Rejection),

    /// The fetched snapshot failed integrity checks.
    #[error("invalid snapshot: {} problem(s)", .0.len())]
    InvalidSnapshot(Vec<ValidationError>),

    /// A policy document could not be parsed or is inconsistent.
    #[error("invalid policy: {0}")]
    InvalidPolicy(String),

    /// The external store failed.
    #[error("store error: {0}")]
    Store(String),
}

impl Error {
    /// Get the rejection if this is a [`Error::Rejected`] error.
    pub fn rejection(&self) -> Option<&Rejection> {
        match self {
            Error::Rejected(rejection) => Some(rejection),
            _ => None,
        }
    }
}

fn _assert_error_send_sync<T: Send + Sync>() {}
fn _error_is_send_sync() {
    _assert_error_send_sync::<Error>();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        assert_eq!(Error::MissingResourceId.to_string(), "missing resource id");
        assert_eq!(
            Error::NegativePercentage {
                id: "A1".into(),
                percentage: -5.0
            }
            .to_string(),
            "negative percentage -5 on \"A1\""
        );
        assert_eq!(
            Error::Store("timeout".into()).to_string(),
            "store error: timeout"
        );
    }

    #[test]
    fn test_rejection_accessor() {
        let err = Error::Rejected(Rejection::NonPositive { requested: 0.0 });
        assert!(err.rejection().is_some());
        assert!(Error::MissingProjectId.rejection().is_none());
    }
}
