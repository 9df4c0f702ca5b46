//! Defines a `ConditionalInferenceEngine` that uses exact inference by variable elimination to
//! answer conditional inference queries.
//!
//! Implementation of Koller & Friedman Algorithm 9.1 - Sum-Product-VE

use crate::factor::Factor;
use crate::model::directed::DirectedModel;
use crate::util::Result;
use crate::variable::{Assignment, Variable};
use super::{validate_query, ConditionalInferenceEngine, Posterior};

use log::{debug, trace};
use std::collections::{HashMap, HashSet};


/// The order in which hidden `Variable`s are summed out. Every order gives the same posterior;
/// they differ only in the size of the intermediate factors.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EliminationOrdering {
    /// The topological order of the model
    Topological,

    /// Koller & Friedman's max-cardinality search over the graph induced by the factors
    MaxCardinality
}

impl Default for EliminationOrdering {
    fn default() -> Self {
        EliminationOrdering::Topological
    }
}


pub struct VariableEliminationEngine<'a> {

    /// The model over which to perform inference
    model: &'a DirectedModel,

    /// The observed values. Every factor is restricted to them before elimination starts.
    evidence: &'a Assignment,

    ordering: EliminationOrdering

}


impl<'a> VariableEliminationEngine<'a> {

    pub fn new(model: &'a DirectedModel, evidence: &'a Assignment) -> Self {
        VariableEliminationEngine { model, evidence, ordering: EliminationOrdering::default() }
    }

    pub fn with_ordering(mut self, ordering: EliminationOrdering) -> Self {
        self.ordering = ordering;
        self
    }


    /// One factor per node, each restricted to the evidence
    fn reduced_factors(&self) -> Result<Vec<Factor>> {
        self.model
            .topological_order()
            .iter()
            .map(|v| Ok(Factor::from_node(v, self.model)?.reduce(self.evidence)))
            .collect()
    }

}


/// Compute the preferred elimination order by the max-cardinality heuristic.
///
/// Only `vars` are ordered; every `Variable` in a scope of `factors` must be one of them.
fn max_cardinality_elimination_order(factors: &[Factor], vars: &[Variable]) -> Vec<Variable> {
    // the graph is not held explicitly, so neighbors come from the factor scopes
    let mut neighbors: HashMap<Variable, HashSet<Variable>> = vars.iter()
                                                                  .map(|v| (*v, HashSet::new()))
                                                                  .collect();

    for f in factors.iter() {
        let scope = f.scope();
        for (i, vi) in scope.iter().enumerate() {
            for vj in scope.iter().skip(i + 1) {
                neighbors.entry(*vi).or_default().insert(*vj);
                neighbors.entry(*vj).or_default().insert(*vi);
            }
        }
    }

    let mut marked = HashSet::new();
    // the (reverse) elimination order
    let mut elimination = Vec::with_capacity(vars.len());

    for _ in 0..vars.len() {
        // the unmarked variable with the most marked neighbors; ties go to the earliest
        let mut best: Option<(Variable, usize)> = None;

        for v in vars.iter().filter(|v| ! marked.contains(*v)) {
            let ct = neighbors[v].iter().filter(|&n| marked.contains(n)).count();

            match best {
                Some((_, max)) if ct <= max => {},
                _ => best = Some((*v, ct))
            }
        }

        if let Some((v, _)) = best {
            elimination.push(v);
            marked.insert(v);
        }
    }

    elimination.reverse();
    elimination
}


impl<'a> ConditionalInferenceEngine for VariableEliminationEngine<'a> {

    fn infer(&mut self, query: &Variable) -> Result<Posterior> {
        validate_query(self.model, query, self.evidence)?;

        let mut phis = self.reduced_factors()?;

        // evidence variables were restricted away, so only the query and hidden variables remain
        let remaining: Vec<Variable> = self.model
                                           .topological_order()
                                           .into_iter()
                                           .filter(|v| ! self.evidence.contains(v))
                                           .collect();

        let order = match self.ordering {
            EliminationOrdering::Topological => remaining,
            EliminationOrdering::MaxCardinality => max_cardinality_elimination_order(&phis, &remaining)
        };

        for var in order.into_iter().filter(|v| v != query) {
            let (phi_1prime, phi_2prime): (Vec<Factor>, Vec<Factor>) = phis
                                           .into_iter()
                                           .partition(|f| f.contains(&var));

            // product step - multiply factors with var
            let psi = phi_1prime.iter().fold(Factor::identity(), |acc, phi| acc.product(phi));
            trace!("eliminating {} from a factor of {} entries", self.model.name(&var), psi.len());

            // sum step - marginalize psi over var
            let tau = psi.sum_out(&var);

            phis = phi_2prime;
            phis.push(tau);
        }

        // multiply together remaining phis; the result is over the query alone
        let phi_star = phis.iter().fold(Factor::identity(), |acc, phi| acc.product(phi));

        let posterior = phi_star.normalize_on(query)?;
        debug!("variable elimination: P({} | evidence) = {}", self.model.name(query), posterior);
        Ok(posterior)
    }

}
