use thiserror::Error;

use crate::wire::optimiser::RouteWire;

/// The error taxonomy of the pipeline (see spec section 7).
///
/// `infeasible` and `budget-exceeded` conditions are deliberately absent
/// here: they are reported inside a successful response (`unassigned`
/// lists, `warnings`, `partial` flags), never as an `Err`.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum CoreError {
    /// Missing field, unknown id reference, negative capacity/volume,
    /// malformed time string. The request is rejected atomically.
    #[error("invalid input at {field}: {message}")]
    InputInvalid { field: String, message: String },

    /// A post-condition check failed (e.g. a tour exceeded capacity
    /// after disposal reinsertion). This is a bug, never silently
    /// repaired; the offending tour is attached so it can be reproduced.
    #[error("internal invariant violated: {message}")]
    InternalInvariant {
        message: String,
        tour: Option<Box<RouteWire>>,
    },
}

pub type CoreResult<T> = Result<T, CoreError>;

impl CoreError {
    pub fn input(field: impl Into<String>, message: impl Into<String>) -> Self {
        CoreError::InputInvalid {
            field: field.into(),
            message: message.into(),
        }
    }

    pub fn invariant(message: impl Into<String>) -> Self {
        CoreError::InternalInvariant {
            message: message.into(),
            tour: None,
        }
    }

    pub fn invariant_with_tour(message: impl Into<String>, tour: RouteWire) -> Self {
        CoreError::InternalInvariant {
            message: message.into(),
            tour: Some(Box::new(tour)),
        }
    }
}
