//! Metropolis-Hastings over a flat categorical target.
//!
//! The chain walks a small set of named states with an unnormalized target weight each. From the
//! current state it proposes one of the other states uniformly at random and moves there with
//! probability ```min(1, w(proposed) / w(current))```. The state after every step is recorded,
//! accepted or not, and the visit frequencies approximate the normalized target.
//!
//! There is no burn-in and no thinning. The initial state is part of the history.

use crate::samplers::{rng_from_seed, RunStats, SamplingRun};
use crate::util::{BnError, Result};

use indexmap::IndexMap;
use log::debug;
use rand::Rng;
use serde::{Deserialize, Serialize};


/// Parameters of a Metropolis-Hastings run
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct McmcConfig {

    /// The number of proposals. Must be at least 1.
    pub iterations: usize,

    /// The state the chain starts in
    pub initial_state: String,

    pub seed: Option<u64>

}

impl Default for McmcConfig {
    fn default() -> Self {
        McmcConfig { iterations: 5000, initial_state: String::from("estado_a"), seed: None }
    }
}


/// Named states with unnormalized, non-negative weights
#[derive(Clone, Debug, PartialEq)]
pub struct CategoricalTarget {
    weights: IndexMap<String, f64>
}

impl CategoricalTarget {

    /// # Errors
    /// * `BnError::InvalidTarget` if there are fewer than two states, a state is repeated, a
    ///   weight is negative or not finite, or every weight is zero
    pub fn new(states: Vec<(String, f64)>) -> Result<Self> {
        let mut weights = IndexMap::new();

        for (state, w) in states.into_iter() {
            if ! w.is_finite() || w < 0.0 {
                return Err(BnError::InvalidTarget(format!("state '{}' has weight {}", state, w)));
            }
            if weights.contains_key(&state) {
                return Err(BnError::InvalidTarget(format!("state '{}' is repeated", state)));
            }
            weights.insert(state, w);
        }

        if weights.len() < 2 {
            return Err(BnError::InvalidTarget(String::from("at least two states are required")));
        }
        if weights.values().sum::<f64>() <= 0.0 {
            return Err(BnError::InvalidTarget(String::from("total weight must be positive")));
        }

        Ok(CategoricalTarget { weights })
    }

    pub fn len(&self) -> usize {
        self.weights.len()
    }

    pub fn is_empty(&self) -> bool {
        self.weights.is_empty()
    }

    pub fn weight(&self, state: &str) -> Option<f64> {
        self.weights.get(state).cloned()
    }

    pub fn states(&self) -> impl Iterator<Item = &str> {
        self.weights.keys().map(|s| s.as_str())
    }

    fn weight_at(&self, i: usize) -> f64 {
        self.weights.get_index(i).map_or(0.0, |(_, w)| *w)
    }

    /// The target divided by its total weight
    pub fn normalized(&self) -> IndexMap<String, f64> {
        let total: f64 = self.weights.values().sum();
        self.weights.iter().map(|(s, w)| (s.clone(), w / total)).collect()
    }

}


/// The states visited by a Metropolis-Hastings run
#[derive(Clone, Debug)]
pub struct Chain {

    /// The state names, in target order
    states: Vec<String>,

    /// Indices into `states`. Starts with the initial state.
    history: Vec<usize>,

    stats: RunStats

}

impl Chain {

    /// The visited states, starting with the initial state
    pub fn history(&self) -> impl Iterator<Item = &str> {
        self.history.iter().map(move |&i| self.states[i].as_str())
    }

    /// The number of recorded states: one more than the number of iterations
    pub fn len(&self) -> usize {
        self.history.len()
    }

    pub fn is_empty(&self) -> bool {
        self.history.is_empty()
    }

    /// Proposals made and proposals accepted
    pub fn stats(&self) -> RunStats {
        self.stats
    }

    /// The fraction of the history spent in each state, in target order. States never visited
    /// are reported as zero.
    pub fn estimate(&self) -> IndexMap<String, f64> {
        let mut counts = vec![0usize; self.states.len()];
        for &i in self.history.iter() {
            counts[i] += 1;
        }

        let n = self.history.len() as f64;
        self.states
            .iter()
            .zip(counts)
            .map(|(s, c)| (s.clone(), c as f64 / n))
            .collect()
    }

}


pub struct MetropolisHastings<'a, R: Rng> {

    target: &'a CategoricalTarget,

    rng: R

}

impl<'a, R: Rng> MetropolisHastings<'a, R> {

    pub fn new(target: &'a CategoricalTarget, rng: R) -> Self {
        MetropolisHastings { target, rng }
    }

    /// Run the chain for `iterations` proposals starting from `initial`.
    ///
    /// A proposal away from a zero-weight state is always accepted.
    ///
    /// # Errors
    /// * `BnError::InvalidSampleCount` if `iterations` is zero
    /// * `BnError::InvalidTarget` if `initial` is not a state of the target
    pub fn run(&mut self, iterations: usize, initial: &str) -> Result<Chain> {
        if iterations == 0 {
            return Err(BnError::InvalidSampleCount(iterations));
        }

        let mut current = self.target
                              .weights
                              .get_index_of(initial)
                              .ok_or_else(|| BnError::InvalidTarget(format!("unknown initial state '{}'", initial)))?;

        let n = self.target.len();
        let mut history = Vec::with_capacity(iterations + 1);
        history.push(current);

        let mut run = SamplingRun::new(iterations);
        while run.begin().is_some() {
            // uniform over the other n - 1 states
            let mut candidate = self.rng.gen_range(0..n - 1);
            if candidate >= current {
                candidate += 1;
            }

            let w_current = self.target.weight_at(current);
            let w_candidate = self.target.weight_at(candidate);

            let accept = if w_current == 0.0 {
                true
            } else {
                self.rng.gen::<f64>() < (w_candidate / w_current).min(1.0)
            };

            if accept {
                current = candidate;
                run.accept();
            } else {
                run.reject();
            }

            history.push(current);
        }

        let stats = run.stats();
        debug!("metropolis-hastings: {} of {} proposals accepted", stats.accepted, stats.drawn);

        Ok(Chain {
            states: self.target.weights.keys().cloned().collect(),
            history,
            stats
        })
    }

}


/// Run Metropolis-Hastings on `target` as described by `config`, seeding the generator from
/// `config.seed`. Fails the same way as `MetropolisHastings::run`.
pub fn run_chain(target: &CategoricalTarget, config: &McmcConfig) -> Result<Chain> {
    debug!("{} iterations from '{}', seed {:?}", config.iterations, config.initial_state, config.seed);

    MetropolisHastings::new(target, rng_from_seed(config.seed)).run(config.iterations, &config.initial_state)
}
