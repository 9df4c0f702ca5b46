//! Defines an importance-sampling `InferenceEngine` for approximate inference using particle-based
//! approximations.
//!
//! Implementation of Importance Sampling via Normalized Likelihood Weighting, described in Koller &
//! Friedman 12.2.3.3

use crate::model::directed::DirectedModel;
use crate::samplers::{LikelihoodWeightedSampler, RunStats, SamplingRun, WeightedSample, WeightedSampler};
use crate::util::{BnError, Result};
use crate::variable::{Assignment, Variable};
use super::{validate_query, ConditionalInferenceEngine, Posterior};

use log::{debug, warn};
use rand::Rng;

/// An `InferenceEngine` for Bayesian Models using Importance Sampling
pub struct ImportanceSamplingEngine<'a, R: Rng> {

    /// The model over which to perform inference
    model: &'a DirectedModel,

    evidence: &'a Assignment,

    /// The Likelihood-Weighted sampler for the given `DirectedModel`
    sampler: LikelihoodWeightedSampler<'a, R>,

    /// The number of samples to use
    samples: usize,

    last_run: Option<RunStats>
}

impl<'a, R: Rng> ImportanceSamplingEngine<'a, R> {

    pub fn new(model: &'a DirectedModel, evidence: &'a Assignment, samples: usize, rng: R) -> Self {
        ImportanceSamplingEngine {
            model,
            evidence,
            sampler: LikelihoodWeightedSampler::new(model, evidence, rng),
            samples,
            last_run: None
        }
    }

    /// The counts of the most recent query, if any. Every drawn sample is accepted.
    pub fn last_run(&self) -> Option<RunStats> {
        self.last_run
    }

}

impl<'a, R: Rng> ConditionalInferenceEngine for ImportanceSamplingEngine<'a, R> {

    fn infer(&mut self, query: &Variable) -> Result<Posterior> {
        validate_query(self.model, query, self.evidence)?;
        if self.samples == 0 {
            return Err(BnError::InvalidSampleCount(self.samples));
        }

        let mut run = SamplingRun::new(self.samples);
        let mut weights = [0.0; 2];

        while run.begin().is_some() {
            let WeightedSample(a, w) = self.sampler.weighted_sample()?;

            let val = a.get(query).ok_or(BnError::IncompleteAssignment)?;
            weights[val as usize] += w;
            run.accept();
        }

        let stats = run.stats();
        self.last_run = Some(stats);

        if weights[0] + weights[1] == 0.0 {
            warn!("likelihood weighting: every sample has zero weight under the evidence");
        }

        let posterior = Posterior::from_weights(weights[1], weights[0]);
        debug!(
            "likelihood weighting: P({} | evidence) = {} from {} samples",
            self.model.name(query), posterior, stats.drawn
        );
        Ok(posterior)
    }

}
