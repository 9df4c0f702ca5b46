//! Defines a `Sampler` for likelihood weighted particle generation for `DirectedModel`s.
//!
//! Koller & Friedman Algorithm 12.2 (pp 493)

use super::{WeightedSample, WeightedSampler};
use super::forward::forward_pass;
use crate::model::directed::DirectedModel;
use crate::util::Result;
use crate::variable::Assignment;

use rand::Rng;


/// A simple `Sampler` for Bayesian Models that uses likelihood weighted sampling to draw full
/// assignments from the `DirectedModel` given evidence.
///
/// Evidence `Variable`s are never drawn. They keep their observed value and each one multiplies
/// the weight of the sample by the probability of that value given the sampled parents.
pub struct LikelihoodWeightedSampler<'a, R: Rng> {

    /// The model from which to sample
    model: &'a DirectedModel,

    /// The evidence on which to condition
    evidence: &'a Assignment,

    rng: R

}


impl<'a, R: Rng> LikelihoodWeightedSampler<'a, R> {

    pub fn new(model: &'a DirectedModel, evidence: &'a Assignment, rng: R) -> Self {
        LikelihoodWeightedSampler { model, evidence, rng }
    }

}


impl<'a, R: Rng> WeightedSampler for LikelihoodWeightedSampler<'a, R> {

    fn weighted_sample(&mut self) -> Result<WeightedSample> {
        forward_pass(self.model, &mut self.rng, self.evidence)
    }

}
