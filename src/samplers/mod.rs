//! Defines the `Sampler` trait - an object that can randomly sample from a `Model`.
//!
//! Every sampler owns an explicit random source `R: rand::Rng`, so runs are reproducible given a
//! seeded generator.

use crate::util::Result;
use crate::variable::Assignment;

use log::trace;
use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::Serialize;

pub mod forward;
pub mod likelihood;

pub use self::forward::ForwardSampler;
pub use self::likelihood::LikelihoodWeightedSampler;

pub trait Sampler {

    /// Sample a full assignment from the associated `Model`.
    fn sample(&mut self) -> Result<Assignment>;

}


/// A sample (a full assignment) and the associated weight.
/// Used for likelihood weighting.
#[derive(Clone, Debug)]
pub struct WeightedSample(pub Assignment, pub f64);

pub trait WeightedSampler {

    fn weighted_sample(&mut self) -> Result<WeightedSample>;

}


/// Build the random source for a run: seeded when a seed is given, from OS entropy otherwise.
pub fn rng_from_seed(seed: Option<u64>) -> StdRng {
    match seed {
        Some(s) => StdRng::seed_from_u64(s),
        None => StdRng::from_entropy()
    }
}


/// Counts accumulated by a finished sampling run
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
pub struct RunStats {

    /// Samples (or iterations) drawn
    pub drawn: usize,

    /// Samples that contributed to the estimate, or proposals that were accepted
    pub accepted: usize

}

impl RunStats {

    pub fn rejected(&self) -> usize {
        self.drawn - self.accepted
    }

}


/// The life cycle of a sampling run.
///
/// ```text
/// Idle -> Sampling(0) -> Accepted(0) | Rejected(0) -> Sampling(1) -> ... -> Done
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RunState {
    Idle,
    Sampling(usize),
    Accepted(usize),
    Rejected(usize),
    Done(RunStats)
}


/// Drives a fixed number of draws through `RunState`.
///
/// A driver calls `begin` to start each draw and resolves it with `accept` or `reject`.
/// ```ignore
/// let mut run = SamplingRun::new(n);
/// while run.begin().is_some() {
///     if keep { run.accept() } else { run.reject() }
/// }
/// let stats = run.stats();
/// ```
#[derive(Clone, Debug)]
pub struct SamplingRun {

    /// The number of draws to make
    target: usize,

    state: RunState,

    stats: RunStats

}

impl SamplingRun {

    pub fn new(target: usize) -> Self {
        SamplingRun { target, state: RunState::Idle, stats: RunStats::default() }
    }


    /// Start the next draw.
    ///
    /// # Returns
    /// the index of the draw, or `None` once `target` draws have been made. A draw left
    /// unresolved counts as rejected.
    pub fn begin(&mut self) -> Option<usize> {
        let next = match self.state {
            RunState::Idle => 0,
            RunState::Sampling(i) | RunState::Accepted(i) | RunState::Rejected(i) => i + 1,
            RunState::Done(_) => return None
        };

        if next >= self.target {
            self.state = RunState::Done(self.stats);
            trace!("sampling run done: {:?}", self.stats);
            return None;
        }

        self.stats.drawn += 1;
        self.state = RunState::Sampling(next);
        Some(next)
    }


    /// Resolve the current draw as accepted
    pub fn accept(&mut self) {
        if let RunState::Sampling(i) = self.state {
            self.stats.accepted += 1;
            self.state = RunState::Accepted(i);
        }
    }


    /// Resolve the current draw as rejected
    pub fn reject(&mut self) {
        if let RunState::Sampling(i) = self.state {
            self.state = RunState::Rejected(i);
        }
    }


    pub fn state(&self) -> RunState {
        self.state
    }


    /// The counts so far. Final once the state is `Done`.
    pub fn stats(&self) -> RunStats {
        self.stats
    }

}
