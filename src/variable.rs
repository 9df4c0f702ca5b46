//! Definition of the variable module
//!
//! A `Variable` represents a boolean random variable in a Bayesian network. `Variable`s are
//! lightweight handles; the name and CPT of a `Variable` live in the model that declares it.

use std::collections::HashMap;
use std::fmt;
use std::sync::atomic::{AtomicUsize, Ordering};

static NEXT_ID: AtomicUsize = AtomicUsize::new(0);

/// An opaque, unique handle for a boolean random variable.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Variable(usize);

impl Variable {

    /// Construct a new, globally unique boolean `Variable`
    pub fn binary() -> Self {
        Variable(NEXT_ID.fetch_add(1, Ordering::Relaxed))
    }

    /// The unique id of this `Variable`
    pub fn id(&self) -> usize {
        self.0
    }

}

impl fmt::Display for Variable {

    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "X{}", self.0)
    }

}


/// A (possibly partial) assignment of truth values to `Variable`s.
///
/// Used both for evidence, which is partial, and for samples, which are complete.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Assignment {
    values: HashMap<Variable, bool>
}

impl Assignment {

    pub fn new() -> Self {
        Assignment { values: HashMap::new() }
    }

    /// Assign `val` to `var`, replacing any previous value
    pub fn set(&mut self, var: &Variable, val: bool) {
        self.values.insert(*var, val);
    }

    /// Remove `var` from the assignment
    pub fn unset(&mut self, var: &Variable) {
        self.values.remove(var);
    }

    pub fn get(&self, var: &Variable) -> Option<bool> {
        self.values.get(var).cloned()
    }

    pub fn contains(&self, var: &Variable) -> bool {
        self.values.contains_key(var)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// The assigned `Variable`s and their values, in no particular order
    pub fn iter(&self) -> impl Iterator<Item = (&Variable, &bool)> {
        self.values.iter()
    }

    /// Check that every `Variable` assigned in `other` has the same value in `self`.
    ///
    /// A `Variable` of `other` that is missing from `self` counts as a disagreement.
    pub fn agrees_with(&self, other: &Assignment) -> bool {
        other.values.iter().all(|(v, &val)| self.get(v) == Some(val))
    }

}

impl<'a> FromIterator<(&'a Variable, bool)> for Assignment {

    fn from_iter<I: IntoIterator<Item = (&'a Variable, bool)>>(iter: I) -> Self {
        let mut a = Assignment::new();
        for (var, val) in iter {
            a.set(var, val);
        }
        a
    }

}


/// Iterate over all `2^n` complete assignments to the `Variable`s in `scope`.
///
/// The values count up like a binary number with `scope[0]` as the lowest bit, so the first
/// assignment sets everything to `false` and the last sets everything to `true`. An empty scope
/// yields a single, empty assignment. The iterator is lazy and has no limit on the scope size.
pub fn all_assignments(scope: &[Variable]) -> impl Iterator<Item = Assignment> {
    let scope = scope.to_vec();
    let mut next = Some(vec![false; scope.len()]);

    std::iter::from_fn(move || {
        let mut values = next.take()?;
        let assn = scope.iter().zip(values.iter()).map(|(v, &b)| (v, b)).collect();

        // add one; a carry out of the last value means every row has been produced
        let mut carry = true;
        for b in values.iter_mut() {
            carry = *b;
            *b = ! *b;
            if ! carry {
                break;
            }
        }
        if ! carry {
            next = Some(values);
        }

        Some(assn)
    })
}


#[cfg(test)]
mod tests {

    use super::*;

    #[test]
    fn unique() {
        let a = Variable::binary();
        let b = Variable::binary();

        assert_ne!(a, b);
        assert_ne!(a.id(), b.id());
    }

    #[test]
    fn assignment() {
        let a = Variable::binary();
        let b = Variable::binary();

        let mut assn = Assignment::new();
        assert!(assn.is_empty());
        assert_eq!(None, assn.get(&a));

        assn.set(&a, true);
        assn.set(&b, false);
        assert_eq!(Some(true), assn.get(&a));
        assert_eq!(Some(false), assn.get(&b));
        assert_eq!(2, assn.len());

        assn.set(&a, false);
        assert_eq!(Some(false), assn.get(&a));

        assn.unset(&a);
        assert!(! assn.contains(&a));
        assert_eq!(1, assn.len());
    }

    #[test]
    fn agreement() {
        let a = Variable::binary();
        let b = Variable::binary();

        let mut sample = Assignment::new();
        sample.set(&a, true);
        sample.set(&b, false);

        let mut evidence = Assignment::new();
        assert!(sample.agrees_with(&evidence));

        evidence.set(&b, false);
        assert!(sample.agrees_with(&evidence));

        evidence.set(&a, false);
        assert!(! sample.agrees_with(&evidence));

        let partial: Assignment = vec![(&a, true)].into_iter().collect();
        assert!(! partial.agrees_with(&sample));
    }

    #[test]
    fn enumerate_all() {
        let scope = vec![Variable::binary(), Variable::binary(), Variable::binary()];
        let all: Vec<Assignment> = all_assignments(&scope).collect();

        assert_eq!(8, all.len());
        assert!(all.iter().all(|a| a.len() == 3));
        assert!(scope.iter().all(|v| all[0].get(v) == Some(false)));
        assert!(scope.iter().all(|v| all[7].get(v) == Some(true)));

        for (i, a) in all.iter().enumerate() {
            for (j, b) in all.iter().enumerate() {
                if i != j {
                    assert_ne!(a, b);
                }
            }
        }

        let empty: Vec<Assignment> = all_assignments(&[]).collect();
        assert_eq!(1, empty.len());
        assert!(empty[0].is_empty());
    }

    #[test]
    fn enumerate_wide_scope() {
        let scope: Vec<Variable> = (0..70).map(|_| Variable::binary()).collect();
        let first: Vec<Assignment> = all_assignments(&scope).take(3).collect();

        assert_eq!(3, first.len());
        assert!(first.iter().all(|a| a.len() == 70));
        assert!(scope.iter().all(|v| first[0].get(v) == Some(false)));

        assert_eq!(Some(true), first[1].get(&scope[0]));
        assert!(scope[1..].iter().all(|v| first[1].get(v) == Some(false)));

        assert_eq!(Some(false), first[2].get(&scope[0]));
        assert_eq!(Some(true), first[2].get(&scope[1]));
    }

}
