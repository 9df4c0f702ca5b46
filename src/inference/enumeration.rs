//! Defines a `ConditionalInferenceEngine` that answers queries exactly by enumerating every joint
//! assignment of the hidden `Variable`s.
//!
//! Russell & Norvig, ENUMERATION-ASK. The cost is exponential in the number of hidden `Variable`s,
//! so this is only suitable for small networks. It is the reference the other engines are checked
//! against.

use crate::model::directed::DirectedModel;
use crate::util::Result;
use crate::variable::{Assignment, Variable};
use super::{validate_query, ConditionalInferenceEngine, Posterior};

use log::debug;


pub struct EnumerationEngine<'a> {

    /// The model over which to perform inference
    model: &'a DirectedModel,

    /// The observed values
    evidence: &'a Assignment

}

impl<'a> EnumerationEngine<'a> {

    pub fn new(model: &'a DirectedModel, evidence: &'a Assignment) -> Self {
        EnumerationEngine { model, evidence }
    }

}

impl<'a> ConditionalInferenceEngine for EnumerationEngine<'a> {

    fn infer(&mut self, query: &Variable) -> Result<Posterior> {
        validate_query(self.model, query, self.evidence)?;

        let order = self.model.topological_order();
        let mut extended = self.evidence.clone();

        extended.set(query, true);
        let w_true = enumerate_all(self.model, &order, &mut extended)?;

        extended.set(query, false);
        let w_false = enumerate_all(self.model, &order, &mut extended)?;

        let posterior = Posterior::from_weights(w_true, w_false);
        debug!("enumeration: P({} | evidence) = {}", self.model.name(query), posterior);
        Ok(posterior)
    }

}


/// Sum of ```P(vars, assigned)``` over every assignment of the unassigned `vars`.
///
/// `vars` must be in topological order so the parents of the head are always assigned. Hidden
/// `Variable`s are set while recursing and unset again before returning, leaving `assigned` as
/// it was found.
fn enumerate_all(model: &DirectedModel, vars: &[Variable], assigned: &mut Assignment) -> Result<f64> {
    let (var, rest) = match vars.split_first() {
        Some(split) => split,
        None => return Ok(1.0)
    };

    if let Some(val) = assigned.get(var) {
        let p = model.probability_given(var, val, assigned)?;
        if p == 0.0 {
            return Ok(0.0);
        }
        return Ok(p * enumerate_all(model, rest, assigned)?);
    }

    let mut total = 0.0;
    for &val in [true, false].iter() {
        assigned.set(var, val);
        let p = model.probability_given(var, val, assigned)?;
        if p > 0.0 {
            total += p * enumerate_all(model, rest, assigned)?;
        }
    }
    assigned.unset(var);

    Ok(total)
}
