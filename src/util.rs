//! Defines the `Error` type for the bninfer library

use std::result;
use thiserror::Error;

pub type Result<T> = result::Result<T, BnError>;

#[derive(Clone, Debug, Error, PartialEq)]
pub enum BnError {

    /// A parent list references a `Variable` that was never declared in the model
    #[error("variable '{variable}' references undeclared parent '{parent}'")]
    MissingParent { variable: String, parent: String },

    /// Represents a variable that was present multiple times in a situation where it should only
    /// have been present once
    #[error("variable '{0}' was declared more than once")]
    DuplicateVariable(String),

    /// The parent relation does not form a DAG. Holds the names of the variables that could not
    /// be ordered.
    #[error("the parent graph contains a cycle through {0:?}")]
    CyclicGraph(Vec<String>),

    /// A CPT is missing a row for some combination of parent values, or a row has the wrong arity
    #[error("CPT for '{variable}' has no row for parent values {row:?}")]
    UndefinedCptRow { variable: String, row: Vec<bool> },

    /// A CPT entry is not a probability
    #[error("CPT for '{variable}' holds {value}, which is not a probability")]
    InvalidProbability { variable: String, value: f64 },

    /// The same combination of parent values was given two different probabilities
    #[error("CPT for '{variable}' has conflicting rows for parent values {row:?}")]
    ConflictingCptRow { variable: String, row: Vec<bool> },

    /// Represents an error where a certain constraint on a scope was not satisfied
    #[error("provided scope did not satisfy constraints")]
    InvalidScope,

    /// Represents an incomplete assignment where a complete assignment was required.
    #[error("missing assignments to the required variables")]
    IncompleteAssignment,

    /// A query or evidence mentions a variable that is not part of the model
    #[error("unknown variable '{0}'")]
    UnknownVariable(String),

    /// The evidence fixes the very variable being queried
    #[error("evidence assigns the query variable '{0}'")]
    EvidenceOnQuery(String),

    /// A sample or iteration count that cannot produce an estimate
    #[error("sample count must be at least 1, got {0}")]
    InvalidSampleCount(usize),

    /// A target distribution that Metropolis-Hastings cannot walk
    #[error("invalid target distribution: {0}")]
    InvalidTarget(String),

}
