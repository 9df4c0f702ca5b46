//! Definition of the factor module
//!
//! A `Factor` represents a relationship between some set of boolean `Variable`s: a function from
//! every complete assignment of its scope to a non-negative weight. `Factor`s are the working
//! representation of variable elimination. Every operation returns a new `Factor`; nothing is
//! modified in place.

use crate::inference::Posterior;
use crate::model::cpt::{row_index, Table};
use crate::model::directed::DirectedModel;
use crate::util::{BnError, Result};
use crate::variable::{all_assignments, Assignment, Variable};

use itertools::Itertools;
use ndarray::prelude as nd;


#[derive(Clone, Debug)]
pub enum Factor {
    /// The empty, identity `Factor` with no scope. This type exists for dealing with arithmetic
    /// operations of `Factor`s
    Identity,

    /// A `Factor` over some scope of variables.
    ///
    /// The table has one axis of length 2 per scope `Variable`, in scope order; index `0` on an
    /// axis means `false` and index `1` means `true`. Restricting away every `Variable` leaves an
    /// empty scope with a 0-dimensional table holding a single weight.
    TableFactor {
        /// The scope of the `Factor`
        scope: Vec<Variable>,

        /// The values of the `Factor` table.
        table: Table
    }
}


impl Factor {

    /// Get the identity factor
    pub fn identity() -> Self {
        Factor::Identity
    }


    /// Create a new `Factor`
    ///
    /// # Errors
    /// * `BnError::InvalidScope` if the table shape does not match the scope, or a `Variable`
    ///   appears twice in the scope
    /// * `BnError::InvalidProbability` if any weight is negative or not finite
    pub fn new(scope: Vec<Variable>, table: Table) -> Result<Self> {
        if scope.len() != table.ndim() || table.shape().iter().any(|&n| n != 2) {
            return Err(BnError::InvalidScope);
        }

        if scope.iter().unique().count() != scope.len() {
            return Err(BnError::InvalidScope);
        }

        // factors may not have negative values
        if let Some(&w) = table.iter().find(|&&w| !(w >= 0.0 && w.is_finite())) {
            return Err(BnError::InvalidProbability {
                variable: scope.iter().map(|v| v.to_string()).join(","),
                value: w
            });
        }

        Ok(Factor::TableFactor { scope, table })
    }


    /// Build the `Factor` for `var`'s CPT.
    ///
    /// The scope is `[var] + parents(var)` and each cell holds
    /// ```P(var = value | parents = parent values)```, so the `Factor` has
    /// ```2^(1 + |parents(var)|)``` entries.
    pub fn from_node(var: &Variable, model: &DirectedModel) -> Result<Self> {
        let mut scope = vec![*var];
        scope.extend_from_slice(model.parents(var)?);

        let p_true = model.cpt(var)
                          .ok_or_else(|| BnError::UnknownVariable(model.name(var)))?
                          .table();
        let p_false = p_true.mapv(|p| 1.0 - p);

        // axis 0 is `var` itself
        let table = ndarray::stack(ndarray::Axis(0), &[p_false.view(), p_true.view()])
            .map_err(|_| BnError::InvalidScope)?;

        Factor::new(scope, table)
    }


    /// Check if the `Factor` is the identity `Factor`
    pub fn is_identity(&self) -> bool {
        matches!(self, Factor::Identity)
    }


    /// Retrieve the scope of the `Factor`.
    ///
    /// # Note
    /// This method returns a clone of the `Factor`'s scope. `Variable`'s are lightweight and
    /// therefore this is an acceptable overhead
    pub fn scope(&self) -> Vec<Variable> {
        match self {
            Factor::Identity => vec![],
            Factor::TableFactor { scope, .. } => scope.clone()
        }
    }


    /// Check if `var` is in the scope of this `Factor`
    pub fn contains(&self, var: &Variable) -> bool {
        match self {
            Factor::Identity => false,
            Factor::TableFactor { scope, .. } => scope.contains(var)
        }
    }


    /// The number of entries in the table. The identity has none.
    pub fn len(&self) -> usize {
        match self {
            Factor::Identity => 0,
            Factor::TableFactor { table, .. } => table.len()
        }
    }


    /// The sum of every weight in the table
    pub fn total(&self) -> f64 {
        match self {
            Factor::Identity => 1.0,
            Factor::TableFactor { table, .. } => table.sum()
        }
    }


    /// Retrieve the value for a complete assignment over the scope of this `Factor`
    ///
    /// This operation is defined only on non-indentity `Factor`s.
    ///
    /// # Args
    /// * `assignment`: a full assignment to the scope of a `Factor`. The assignment's scope may
    ///   be a superset of the `Factor`s scope.
    ///
    /// # Errors
    /// * `BnError::InvalidScope` if the `Factor` is the identity
    /// * `BnError::IncompleteAssignment`, if assignment is not a complete assignment to the
    ///   scope of the `Factor`
    pub fn value(&self, assignment: &Assignment) -> Result<f64> {
        match self {
            Factor::Identity => Err(BnError::InvalidScope),
            Factor::TableFactor { scope, table } => {
                let row: Option<Vec<bool>> = scope.iter().map(|v| assignment.get(v)).collect();
                let row = row.ok_or(BnError::IncompleteAssignment)?;
                Ok(table[row_index(&row).as_slice()])
            }
        }
    }


    /// Fix `var` to `value`.
    ///
    /// Keeps only the rows where `var` equals `value` and drops `var` from the scope. If `var`
    /// is not in the scope, the `Factor` is returned unchanged.
    pub fn restrict(&self, var: &Variable, value: bool) -> Self {
        match self {
            Factor::Identity => Factor::Identity,
            Factor::TableFactor { scope, table } => {
                match scope.iter().position(|v| v == var) {
                    None => self.clone(),
                    Some(idx) => {
                        let table = table.index_axis(nd::Axis(idx), value as usize).to_owned();
                        let scope = scope.iter().filter(|&v| v != var).cloned().collect();
                        Factor::TableFactor { scope, table }
                    }
                }
            }
        }
    }


    /// Reduce the `Factor` over the given partial assignment, restricting every `Variable` of
    /// the scope that the assignment fixes.
    pub fn reduce(&self, assignment: &Assignment) -> Self {
        self.scope()
            .iter()
            .filter_map(|v| assignment.get(v).map(|val| (v, val)))
            .fold(self.clone(), |phi, (v, val)| phi.restrict(v, val))
    }


    /// Product of this `Factor` and another `Factor`.
    ///
    /// The scope of the product is the scope of `self` followed by the `Variable`s of `other`
    /// that `self` lacks. Each entry is the product of the two rows that agree on the shared
    /// `Variable`s; with disjoint scopes this is the Cartesian product of the rows.
    pub fn product(&self, other: &Self) -> Self {
        // Factor::Identity is the multiplicative identity
        if let Factor::Identity = self {
            return other.clone();
        } else if let Factor::Identity = other {
            return self.clone();
        }

        // compute the ordered union of the two scopes
        let new_scope: Vec<Variable> = self.scope()
                                           .into_iter()
                                           .chain(other.scope())
                                           .unique()
                                           .collect();

        let mut tbl = Table::zeros(nd::IxDyn(&vec![2; new_scope.len()]));

        for assn in all_assignments(&new_scope) {
            let row = values_of(&new_scope, &assn);
            tbl[row_index(&row).as_slice()] = self.cell(&assn) * other.cell(&assn);
        }

        Factor::TableFactor { scope: new_scope, table: tbl }
    }


    /// Sum `var` out of the `Factor`.
    ///
    /// Drops `var` from the scope, adding together the rows that agree on every other
    /// `Variable`. If `var` is not in the scope, the `Factor` is returned unchanged.
    pub fn sum_out(&self, var: &Variable) -> Self {
        match self {
            // the identity factor marginalized over anything is the identity
            Factor::Identity => Factor::Identity,

            Factor::TableFactor { scope, table } => {
                if let Some(idx) = scope.iter().position(|v| v == var) {
                    let table = table.sum_axis(nd::Axis(idx));
                    let scope = scope.iter().filter(|&v| v != var).cloned().collect();

                    Factor::TableFactor { scope, table }
                } else {
                    // variable not in the scope of this factor, so the factor is already
                    // marginalized over the variable
                    self.clone()
                }
            }
        }
    }


    /// Project the `Factor` onto `var` and normalize.
    ///
    /// Every other `Variable` is summed out and the two remaining weights are divided by their
    /// sum.
    ///
    /// # Returns
    /// the normalized distribution over `var`, or `Posterior::undefined()` if all the weight in
    /// the `Factor` is zero.
    ///
    /// # Errors
    /// * `BnError::InvalidScope` if `var` is not in the scope
    pub fn normalize_on(&self, var: &Variable) -> Result<Posterior> {
        match self {
            Factor::Identity => Err(BnError::InvalidScope),
            Factor::TableFactor { scope, table } => {
                let idx = scope.iter().position(|v| v == var).ok_or(BnError::InvalidScope)?;

                let t = table.index_axis(nd::Axis(idx), 1).sum();
                let f = table.index_axis(nd::Axis(idx), 0).sum();

                Ok(Posterior::from_weights(t, f))
            }
        }
    }


    /// Value of a complete assignment to a superset of the scope. Callers uphold completeness.
    fn cell(&self, assignment: &Assignment) -> f64 {
        match self {
            Factor::Identity => 1.0,
            Factor::TableFactor { scope, table } => {
                let row = values_of(scope, assignment);
                table[row_index(&row).as_slice()]
            }
        }
    }

}


/// The values of `scope` in `assn`, in scope order. Unassigned `Variable`s read as `false`.
fn values_of(scope: &[Variable], assn: &Assignment) -> Vec<bool> {
    scope.iter().map(|v| assn.get(v) == Some(true)).collect()
}


// Unit tests
#[cfg(test)]
mod tests {
    use super::*;
    use crate::init::Initialization;
    use crate::model::directed::DirectedModelBuilder;
    use itertools::iproduct;
    use ndarray::arr1;

    fn assignment(vars: &[Variable], idx: &[usize]) -> Assignment {
        vars.iter().zip(idx.iter()).map(|(v, &i)| (v, i == 1)).collect()
    }

    fn abc_table() -> Table {
        nd::Array::from_shape_vec(
            (2, 2, 2),
            vec![ 0.25, 0.35, 0.08, 0.16, 0.05, 0.07, 0., 0. ]
        ).expect("Unexpected error").into_dyn()
    }

    #[test]
    fn identity() {
        let f = Factor::identity();

        assert!(f.is_identity());
        assert!(f.scope().is_empty());
        assert_eq!(BnError::InvalidScope, f.value(&Assignment::new()).unwrap_err());
    }

    #[test]
    fn table_factor() {
        let vars = vec![ Variable::binary(), Variable::binary(), Variable::binary() ];
        let mut table = Table::ones(nd::IxDyn(&[2, 2, 2]));
        table[nd::IxDyn(&[1, 0, 1])] = 5.;

        // assert table holds correct values
        let f = Factor::new(vars.clone(), table).unwrap();

        assert!(! f.is_identity());
        assert_eq!(8, f.len());
        for (x, y, z) in iproduct!(0..2, 0..2, 0..2) {
            let val = f.value(&assignment(&vars, &[x, y, z])).unwrap();
            if x == 1 && y == 0 && z == 1 {
                assert_eq!(5., val);
            } else {
                assert_eq!(1., val);
            }
        }
    }

    #[test]
    fn table_factor_errs() {
        // mismatched number of dimensions
        let vars = vec![ Variable::binary(), Variable::binary() ];
        let table = Table::ones(nd::IxDyn(&[2, 2, 2]));
        assert_eq!(BnError::InvalidScope, Factor::new(vars.clone(), table).unwrap_err());

        // not boolean
        let table = Table::ones(nd::IxDyn(&[2, 3]));
        assert_eq!(BnError::InvalidScope, Factor::new(vars.clone(), table).unwrap_err());

        // repeated variable
        let table = Table::ones(nd::IxDyn(&[2, 2]));
        assert_eq!(BnError::InvalidScope, Factor::new(vec![vars[0], vars[0]], table).unwrap_err());

        // negative weight
        let mut table = Table::ones(nd::IxDyn(&[2, 2]));
        table[nd::IxDyn(&[0, 1])] = -1.;
        match Factor::new(vars, table).unwrap_err() {
            BnError::InvalidProbability { value, .. } => assert_eq!(-1., value),
            _ => panic!("wrong error type")
        };
    }

    #[test]
    fn value() {
        let vars = vec![ Variable::binary(), Variable::binary() ];
        let table = nd::Array::from_shape_vec((2, 2), vec![0., 1., 2., 3.]).unwrap().into_dyn();
        let f = Factor::new(vars.clone(), table).expect("Unexpected error");

        // verify behavior on precise assignment
        for (i, (x, y)) in iproduct!(0..2, 0..2).enumerate() {
            assert_eq!(i as f64, f.value(&assignment(&vars, &[x, y])).unwrap());
        }

        // verify behavior on full assignment with out of scope values
        let v3 = Variable::binary();
        let mut assn = assignment(&vars, &[1, 0]);
        assn.set(&v3, true);
        assert_eq!(2., f.value(&assn).unwrap());

        // verify behavior on incomplete assignment
        let mut assn = Assignment::new();
        assn.set(&vars[0], false);
        assn.set(&v3, false);
        assert_eq!(BnError::IncompleteAssignment, f.value(&assn).unwrap_err());
    }

    #[test]
    /// Adapted from Koller & Friedman Figure 4.3 with a boolean A
    fn product() {
        let a = Variable::binary();
        let b = Variable::binary();
        let c = Variable::binary();

        let tbl1 = nd::Array::from_shape_vec((2, 2), vec![ 0.5, 0.8, 0.1, 0. ]).unwrap().into_dyn();
        let phi1 = Factor::new(vec![ a, b ], tbl1).expect("Unexpected error");

        let tbl2 = nd::Array::from_shape_vec((2, 2), vec![ 0.5, 0.7, 0.1, 0.2 ]).unwrap().into_dyn();
        let phi2 = Factor::new(vec![ b, c ], tbl2).expect("Unexpected error");

        let phi = phi1.product(&phi2);
        assert_eq!(vec![a, b, c], phi.scope());

        let expected = abc_table();
        for (x, y, z) in iproduct!(0..2, 0..2, 0..2) {
            let val = expected[nd::IxDyn(&[x, y, z])];
            let actual = phi.value(&assignment(&[a, b, c], &[x, y, z])).unwrap();
            assert!((val - actual).abs() < std::f64::EPSILON);
        }

        // scope order follows the left operand
        assert_eq!(vec![b, c, a], phi2.product(&phi1).scope());
    }

    #[test]
    fn product_disjoint() {
        let a = Variable::binary();
        let b = Variable::binary();

        let phi1 = Factor::new(vec![a], arr1(&[0.4, 0.6]).into_dyn()).unwrap();
        let phi2 = Factor::new(vec![b], arr1(&[0.3, 0.7]).into_dyn()).unwrap();

        let phi = phi1.product(&phi2);
        assert_eq!(vec![a, b], phi.scope());
        assert_eq!(4, phi.len());

        for (x, y) in iproduct!(0..2, 0..2) {
            let expected = [0.4, 0.6][x] * [0.3, 0.7][y];
            let actual = phi.value(&assignment(&[a, b], &[x, y])).unwrap();
            assert!((expected - actual).abs() < 1e-12);
        }
    }

    #[test]
    fn prod_identity() {
        let a = Variable::binary();
        let b = Variable::binary();

        let tbl1 = nd::Array::from_shape_vec((2, 2), vec![ 0.5, 0.8, 0.1, 0. ]).unwrap().into_dyn();
        let phi1 = Factor::new(vec![ a, b ], tbl1.clone()).expect("Unexpected error");

        for phi in &[phi1.product(&Factor::identity()), Factor::identity().product(&phi1)] {
            assert_eq!(phi1.scope(), phi.scope());

            for (x, y) in iproduct!(0..2, 0..2) {
                let val = tbl1[nd::IxDyn(&[x, y])];
                assert_eq!(val, phi.value(&assignment(&[a, b], &[x, y])).unwrap());
            }
        }

        assert!(Factor::identity().product(&Factor::identity()).is_identity());
    }

    #[test]
    /// Adapted from Koller & Friedman Figure 4.5
    fn restrict() {
        let a = Variable::binary();
        let b = Variable::binary();
        let c = Variable::binary();

        let phi = Factor::new(vec![a, b, c], abc_table()).expect("Unexpected error");

        let reduced = phi.restrict(&c, false);
        assert_eq!(vec![a, b], reduced.scope());
        assert_eq!(4, reduced.len());

        let expected = nd::Array::from_shape_vec((2, 2), vec![ 0.25, 0.08, 0.05, 0. ]).unwrap();
        for (x, y) in iproduct!(0..2, 0..2) {
            assert_eq!(expected[[x, y]], reduced.value(&assignment(&[a, b], &[x, y])).unwrap());
        }

        // restricting on a variable outside the scope is a no-op
        let d = Variable::binary();
        let same = phi.restrict(&d, true);
        assert_eq!(phi.scope(), same.scope());
        assert_eq!(phi.total(), same.total());
    }

    #[test]
    fn restrict_loses_information() {
        let a = Variable::binary();
        let b = Variable::binary();
        let phi = Factor::new(vec![a, b], nd::Array::from_shape_vec((2, 2), vec![0.1, 0.2, 0.3, 0.4]).unwrap().into_dyn()).unwrap();

        let t = phi.restrict(&a, true);
        let f = phi.restrict(&a, false);

        // neither restriction remembers a, and neither carries the whole table
        assert_eq!(vec![b], t.scope());
        assert_eq!(vec![b], f.scope());
        assert!((t.total() - 0.7).abs() < 1e-12);
        assert!((f.total() - 0.3).abs() < 1e-12);
        assert!(t.total() < phi.total());
    }

    #[test]
    fn reduce_multiple() {
        let a = Variable::binary();
        let b = Variable::binary();
        let c = Variable::binary();
        let d = Variable::binary();

        let phi = Factor::new(vec![a, b, c], abc_table()).expect("Unexpected error");

        let mut assn = Assignment::new();
        assn.set(&c, false);
        assn.set(&a, true);
        assn.set(&d, true);

        let reduced = phi.reduce(&assn);
        assert_eq!(vec![b], reduced.scope());
        assert_eq!(0.05, reduced.value(&assignment(&[b], &[0])).unwrap());
        assert_eq!(0., reduced.value(&assignment(&[b], &[1])).unwrap());

        // a complete reduction leaves a single weight with an empty scope
        assn.set(&b, false);
        let scalar = phi.reduce(&assn);
        assert!(scalar.scope().is_empty());
        assert!(! scalar.is_identity());
        assert_eq!(1, scalar.len());
        assert_eq!(0.05, scalar.value(&Assignment::new()).unwrap());
    }

    #[test]
    /// Adapted from Koller & Friedman Figure 9.7
    fn sum_out() {
        let a = Variable::binary();
        let b = Variable::binary();
        let c = Variable::binary();

        let phi = Factor::new(vec![a, b, c], abc_table()).expect("Unexpected error");

        let marginalized = phi.sum_out(&b);
        assert_eq!(vec![a, c], marginalized.scope());

        let expected = nd::Array::from_shape_vec((2, 2), vec![0.33, 0.51, 0.05, 0.07]).unwrap();
        for (x, y) in iproduct!(0..2, 0..2) {
            let actual = marginalized.value(&assignment(&[a, c], &[x, y])).unwrap();
            assert!((expected[[x, y]] - actual).abs() < 1e-12);
        }

        // mass is preserved
        assert!((phi.total() - marginalized.total()).abs() < 1e-12);

        // not in scope
        let d = Variable::binary();
        assert_eq!(phi.scope(), phi.sum_out(&d).scope());
    }

    #[test]
    fn normalize_on() {
        let a = Variable::binary();
        let b = Variable::binary();

        let phi = Factor::new(vec![a, b], nd::Array::from_shape_vec((2, 2), vec![0.1, 0.2, 0.3, 0.4]).unwrap().into_dyn()).unwrap();

        let p = phi.normalize_on(&a).unwrap();
        assert!((p.p_true() - 0.7).abs() < 1e-12);
        assert!((p.p_false() - 0.3).abs() < 1e-12);

        let p = phi.normalize_on(&b).unwrap();
        assert!((p.p_true() - 0.6).abs() < 1e-12);

        assert_eq!(BnError::InvalidScope, phi.normalize_on(&Variable::binary()).unwrap_err());

        // no mass at all is reported, not papered over
        let zero = Factor::new(vec![a], arr1(&[0., 0.]).into_dyn()).unwrap();
        let p = zero.normalize_on(&a).unwrap();
        assert!(! p.is_defined());
        assert_eq!(0., p.p_true());
        assert_eq!(0., p.p_false());
    }

    #[test]
    fn from_node() {
        let virus = Variable::binary();
        let frio = Variable::binary();
        let fiebre = Variable::binary();

        let model = DirectedModelBuilder::new()
            .with_named_variable(&virus, "virus", &[], Initialization::Prior(0.1))
            .with_named_variable(&frio, "clima_frio", &[], Initialization::Prior(0.3))
            .with_named_variable(&fiebre, "fiebre", &[virus, frio], Initialization::Rows(vec![
                (vec![true, true], 0.9),
                (vec![true, false], 0.8),
                (vec![false, true], 0.6),
                (vec![false, false], 0.05),
            ]))
            .build()
            .unwrap();

        let phi = Factor::from_node(&fiebre, &model).unwrap();
        assert_eq!(vec![fiebre, virus, frio], phi.scope());
        assert_eq!(8, phi.len());
        assert_eq!(0.8, phi.value(&assignment(&[fiebre, virus, frio], &[1, 1, 0])).unwrap());
        assert!((phi.value(&assignment(&[fiebre, virus, frio], &[0, 0, 1])).unwrap() - 0.4).abs() < 1e-12);

        // each parent row is a distribution over fiebre
        let summed = phi.sum_out(&fiebre);
        assert_eq!(vec![virus, frio], summed.scope());
        assert!((summed.total() - 4.0).abs() < 1e-12);
        for (x, y) in iproduct!(0..2, 0..2) {
            assert!((summed.value(&assignment(&[virus, frio], &[x, y])).unwrap() - 1.0).abs() < 1e-12);
        }

        // root factors carry their prior, and the joint of the roots has unit mass
        let phi_v = Factor::from_node(&virus, &model).unwrap();
        let phi_f = Factor::from_node(&frio, &model).unwrap();
        assert!((phi_v.total() - 1.0).abs() < 1e-12);
        let joint = phi_v.product(&phi_f);
        assert!((joint.total() - 1.0).abs() < 1e-12);
        assert!((joint.sum_out(&virus).value(&assignment(&[frio], &[1])).unwrap() - 0.3).abs() < 1e-12);
    }
}
