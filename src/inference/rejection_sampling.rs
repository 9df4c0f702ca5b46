//! Defines a `ConditionalInferenceEngine` that estimates posteriors by rejection sampling.
//!
//! Full assignments are drawn from the prior with a `ForwardSampler`; every sample that disagrees
//! with the evidence is thrown away and the survivors are counted.

use crate::model::directed::DirectedModel;
use crate::samplers::{ForwardSampler, RunStats, Sampler, SamplingRun};
use crate::util::{BnError, Result};
use crate::variable::{Assignment, Variable};
use super::{validate_query, ConditionalInferenceEngine, Posterior};

use log::{debug, warn};
use rand::Rng;


pub struct RejectionSamplingEngine<'a, R: Rng> {

    /// The model over which to perform inference
    model: &'a DirectedModel,

    /// Samples that disagree with the evidence are rejected
    evidence: &'a Assignment,

    sampler: ForwardSampler<'a, R>,

    /// The number of samples to draw per query
    samples: usize,

    last_run: Option<RunStats>

}

impl<'a, R: Rng> RejectionSamplingEngine<'a, R> {

    pub fn new(model: &'a DirectedModel, evidence: &'a Assignment, samples: usize, rng: R) -> Self {
        RejectionSamplingEngine {
            model,
            evidence,
            sampler: ForwardSampler::new(model, rng),
            samples,
            last_run: None
        }
    }

    /// The counts of the most recent query, if any
    pub fn last_run(&self) -> Option<RunStats> {
        self.last_run
    }

}

impl<'a, R: Rng> ConditionalInferenceEngine for RejectionSamplingEngine<'a, R> {

    fn infer(&mut self, query: &Variable) -> Result<Posterior> {
        validate_query(self.model, query, self.evidence)?;
        if self.samples == 0 {
            return Err(BnError::InvalidSampleCount(self.samples));
        }

        let mut run = SamplingRun::new(self.samples);
        let mut hits = [0usize; 2];

        while run.begin().is_some() {
            let sample = self.sampler.sample()?;

            if sample.agrees_with(self.evidence) {
                run.accept();
                let val = sample.get(query).ok_or(BnError::IncompleteAssignment)?;
                hits[val as usize] += 1;
            } else {
                run.reject();
            }
        }

        let stats = run.stats();
        self.last_run = Some(stats);

        if stats.accepted == 0 {
            warn!("rejection sampling: all {} samples disagree with the evidence", stats.drawn);
        }

        let posterior = Posterior::from_weights(hits[1] as f64, hits[0] as f64);
        debug!(
            "rejection sampling: P({} | evidence) = {} from {} of {} samples",
            self.model.name(query), posterior, stats.accepted, stats.drawn
        );
        Ok(posterior)
    }

}


#[cfg(test)]
mod tests {

    use super::*;
    use crate::networks;

    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn no_evidence_keeps_everything() {
        let net = networks::smoking().unwrap();
        let evidence = Assignment::new();

        let mut engine = RejectionSamplingEngine::new(&net.model, &evidence, 20_000, StdRng::seed_from_u64(17));
        let p = engine.infer(&net.fumar).unwrap();

        assert_eq!(Some(RunStats { drawn: 20_000, accepted: 20_000 }), engine.last_run());
        assert!((p.p_true() - 0.3).abs() < 0.02);
    }

    #[test]
    fn repeated_queries() {
        let net = networks::smoking().unwrap();
        let mut evidence = Assignment::new();
        evidence.set(&net.fumar, true);

        let mut engine = RejectionSamplingEngine::new(&net.model, &evidence, 5000, StdRng::seed_from_u64(2));
        assert_eq!(None, engine.last_run());

        // each query is a fresh run; the random stream continues
        for _ in 0..3 {
            let p = engine.infer(&net.cancer).unwrap();
            assert!((p.p_true() - 0.2).abs() < 0.05);
            assert_eq!(5000, engine.last_run().unwrap().drawn);
        }
    }

}
