//! Defines a simple forward sampler for Bayesian `Model`s
//!
//! Implementation of Koller & Friedman Algorithm 12.1 (pp 489)

use crate::model::directed::DirectedModel;
use crate::util::Result;
use crate::variable::Assignment;
use super::{Sampler, WeightedSample};

use rand::Rng;

/// A simple `Sampler` for Bayesian Models
pub struct ForwardSampler<'a, R: Rng> {

    /// The `DirectedModel` to sample
    model: &'a DirectedModel,

    rng: R
}


impl<'a, R: Rng> ForwardSampler<'a, R> {

    pub fn new(model: &'a DirectedModel, rng: R) -> Self {
        ForwardSampler { model, rng }
    }

    /// Draw `n` independent samples from the prior
    pub fn sample_n(&mut self, n: usize) -> Result<Vec<Assignment>> {
        (0..n).map(|_| self.sample()).collect()
    }

}

impl<'a, R: Rng> Sampler for ForwardSampler<'a, R> {

    fn sample(&mut self) -> Result<Assignment> {
        let WeightedSample(a, _) = forward_pass(self.model, &mut self.rng, &Assignment::new())?;
        Ok(a)
    }

}


/// One forward pass through `model` in topological order.
///
/// `Variable`s fixed by `clamped` take their clamped value and multiply the weight by
/// ```P(var = value | parents)```; every other `Variable` is drawn by comparing a uniform draw
/// against ```P(var = true | parents)```. With nothing clamped the weight is always 1.
pub(crate) fn forward_pass<R: Rng>(
    model: &DirectedModel,
    rng: &mut R,
    clamped: &Assignment
) -> Result<WeightedSample> {
    let mut a = Assignment::new();
    let mut w = 1.0;

    for var in model.topological_order().iter() {
        // every parent was visited first, so the lookup always finds a full row
        let parents = model.parent_values(var, &a)?;
        let p = model.conditional_true_probability(var, &parents)?;

        if let Some(val) = clamped.get(var) {
            a.set(var, val);
            w *= if val { p } else { 1.0 - p };
        } else {
            a.set(var, rng.gen::<f64>() < p);
        }
    }

    Ok(WeightedSample(a, w))
}
