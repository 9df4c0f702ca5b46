//! Exact and approximate inference on small Bayesian networks of boolean variables.
//!
//! A network is built with `DirectedModelBuilder` and queried for ```P(query | evidence)``` by
//! enumeration, variable elimination, rejection sampling or likelihood weighting.

pub mod variable;
pub mod factor;
pub mod init;
pub mod model;
pub mod samplers;
pub mod inference;
pub mod networks;
pub mod util;

pub use crate::util::{BnError, Result};
