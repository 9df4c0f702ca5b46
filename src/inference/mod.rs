//! Defines the interface to inference engines
//!
//! Every network engine answers the same question, ```P(query | evidence)``` for a single boolean
//! query `Variable`, and returns a `Posterior`. Exact engines (`EnumerationEngine`,
//! `VariableEliminationEngine`) agree to floating point precision; sampling engines
//! (`RejectionSamplingEngine`, `ImportanceSamplingEngine`) converge to the same answer as the
//! number of samples grows.
//!
//! `MetropolisHastings` is a separate illustration of MCMC over a flat categorical target and does
//! not answer network queries.

use crate::model::Model;
use crate::model::directed::DirectedModel;
use crate::samplers::rng_from_seed;
use crate::util::{BnError, Result};
use crate::variable::{Assignment, Variable};

use log::debug;
use serde::{Deserialize, Serialize};
use std::fmt;

pub mod enumeration;
pub mod importance_sampling;
pub mod mcmc;
pub mod rejection_sampling;
pub mod variable_elimination;

pub use self::enumeration::EnumerationEngine;
pub use self::importance_sampling::ImportanceSamplingEngine;
pub use self::mcmc::{run_chain, CategoricalTarget, Chain, McmcConfig, MetropolisHastings};
pub use self::rejection_sampling::RejectionSamplingEngine;
pub use self::variable_elimination::{EliminationOrdering, VariableEliminationEngine};


/// The distribution of a boolean query `Variable`.
///
/// A defined posterior sums to 1. When no probability mass is consistent with the evidence the
/// posterior is undefined and both entries are zero.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Posterior {
    p_true: f64,
    p_false: f64
}

impl Posterior {

    /// Normalize unnormalized weights for `true` and `false`
    pub fn from_weights(w_true: f64, w_false: f64) -> Self {
        let total = w_true + w_false;
        if total > 0.0 {
            Posterior { p_true: w_true / total, p_false: w_false / total }
        } else {
            Posterior::undefined()
        }
    }

    pub fn undefined() -> Self {
        Posterior { p_true: 0.0, p_false: 0.0 }
    }

    pub fn is_defined(&self) -> bool {
        self.p_true + self.p_false > 0.0
    }

    pub fn p_true(&self) -> f64 {
        self.p_true
    }

    pub fn p_false(&self) -> f64 {
        self.p_false
    }

    pub fn get(&self, value: bool) -> f64 {
        if value { self.p_true } else { self.p_false }
    }

}

impl fmt::Display for Posterior {

    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        if self.is_defined() {
            write!(f, "{{true: {:.6}, false: {:.6}}}", self.p_true, self.p_false)
        } else {
            write!(f, "undefined")
        }
    }

}


/// A `ConditionalInferenceEngine` is capable of answering Conditional Probability Queries of the form:
///     ```P(Y | E = e)```
///
/// `ConditionalInferenceEngine`s are stateful and must take the evidence `e` as an argument to whatever
/// construction mechanism they employ.
pub trait ConditionalInferenceEngine {

    /// Infer the distribution ```P(query | evidence)```
    ///
    /// # Errors
    /// * `BnError::UnknownVariable` if `query` or an evidence `Variable` is not in the model
    /// * `BnError::EvidenceOnQuery` if the evidence assigns `query`
    fn infer(&mut self, query: &Variable) -> Result<Posterior>;

}


/// Reject malformed queries before any computation
pub(crate) fn validate_query(model: &DirectedModel, query: &Variable, evidence: &Assignment) -> Result<()> {
    if ! model.contains(query) {
        return Err(BnError::UnknownVariable(model.name(query)));
    }

    if let Some((var, _)) = evidence.iter().find(|(v, _)| ! model.contains(v)) {
        return Err(BnError::UnknownVariable(model.name(var)));
    }

    if evidence.contains(query) {
        return Err(BnError::EvidenceOnQuery(model.name(query)));
    }

    Ok(())
}


/// Parameters of a sampling run
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SamplingConfig {

    /// The number of samples to draw. Must be at least 1.
    pub samples: usize,

    /// Seed for the random source. Drawn from OS entropy when absent.
    pub seed: Option<u64>

}

impl Default for SamplingConfig {
    fn default() -> Self {
        SamplingConfig { samples: 5000, seed: None }
    }
}


/// The network inference strategies
#[derive(Clone, Debug, PartialEq)]
pub enum Strategy {
    Enumeration,
    VariableElimination,
    Rejection(SamplingConfig),
    LikelihoodWeighting(SamplingConfig)
}

impl fmt::Display for Strategy {

    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let name = match self {
            Strategy::Enumeration => "enumeration",
            Strategy::VariableElimination => "variable elimination",
            Strategy::Rejection(_) => "rejection sampling",
            Strategy::LikelihoodWeighting(_) => "likelihood weighting"
        };
        write!(f, "{}", name)
    }

}


/// Answer ```P(query | evidence)``` on `model` with the chosen `strategy`.
pub fn infer(
    model: &DirectedModel,
    query: &Variable,
    evidence: &Assignment,
    strategy: &Strategy
) -> Result<Posterior> {
    debug!("{} query for {} with {} evidence variables", strategy, model.name(query), evidence.len());

    match strategy {
        Strategy::Enumeration => EnumerationEngine::new(model, evidence).infer(query),
        Strategy::VariableElimination => VariableEliminationEngine::new(model, evidence).infer(query),
        Strategy::Rejection(config) => {
            RejectionSamplingEngine::new(model, evidence, config.samples, rng_from_seed(config.seed))
                .infer(query)
        },
        Strategy::LikelihoodWeighting(config) => {
            ImportanceSamplingEngine::new(model, evidence, config.samples, rng_from_seed(config.seed))
                .infer(query)
        }
    }
}
