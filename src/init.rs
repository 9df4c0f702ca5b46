//! Module containing initialization routines for the CPTs of a model.

use crate::model::cpt::{row_index, Cpt, Table};
use crate::util::{BnError, Result};

use ndarray::prelude as nd;
use ndarray::Dimension;

/// Defines possible ways to initialize a `Variable`s CPT.
#[derive(Clone, Debug)]
pub enum Initialization {
    /// ```P(X = true | parents) = 0.5``` for every combination of parent values
    Uniform,

    /// Initialize the CPT of a root `Variable` with ```P(X = true) = p```.
    /// Note that this `Initialization` is valid only for a `Variable` with no parents.
    Prior(f64),

    /// Explicit rows mapping a tuple of parent values (in parent order) to
    /// ```P(X = true | parents)```. Every combination must be present. A row may be repeated
    /// only with the same probability.
    Rows(Vec<(Vec<bool>, f64)>),

    /// A user defined table of ```P(X = true | parents)``` with one length-2 axis per parent,
    /// in parent order. Index `0` is `false`, index `1` is `true`.
    Table(Table)
}


impl Initialization {

    /// Construct a CPT, initialized based on ```self```
    ///
    /// # Args
    /// * `name`: the name of the `Variable` the CPT belongs to, used for error reporting
    /// * `num_parents`: the number of parents of the `Variable`
    ///
    /// # Errors
    /// * `BnError::UndefinedCptRow` if some combination of parent values has no row, or a row
    ///   has the wrong number of values
    /// * `BnError::ConflictingCptRow` if a row is given twice with different probabilities
    /// * `BnError::InvalidProbability` if any entry is NaN, infinite or outside ```[0, 1]```
    pub fn build_cpt(self, name: &str, num_parents: usize) -> Result<Cpt> {
        let shape = vec![2; num_parents];

        let table = match self {
            Initialization::Uniform => Table::from_elem(nd::IxDyn(&shape), 0.5),

            Initialization::Prior(p) => {
                if num_parents > 0 {
                    return Err(missing_row(name, vec![false; num_parents]));
                }
                Table::from_elem(nd::IxDyn(&[]), p)
            },

            Initialization::Rows(rows) => {
                let mut table = Table::zeros(nd::IxDyn(&shape));
                let mut seen = nd::ArrayD::from_elem(nd::IxDyn(&shape), false);

                for (key, p) in rows {
                    if key.len() != num_parents {
                        return Err(missing_row(name, key));
                    }
                    check_probability(name, p)?;

                    let idx = row_index(&key);
                    if seen[idx.as_slice()] && table[idx.as_slice()] != p {
                        return Err(BnError::ConflictingCptRow { variable: String::from(name), row: key });
                    }
                    table[idx.as_slice()] = p;
                    seen[idx.as_slice()] = true;
                }

                if let Some((idx, _)) = seen.indexed_iter().find(|(_, present)| ! **present) {
                    return Err(missing_row(name, idx.slice().iter().map(|&i| i == 1).collect()));
                }
                table
            },

            Initialization::Table(table) => {
                if table.shape() != shape.as_slice() {
                    return Err(missing_row(name, vec![false; num_parents]));
                }
                table
            }
        };

        table.iter().try_for_each(|&p| check_probability(name, p))?;
        Ok(Cpt::from_table(table))
    }

}


fn missing_row(name: &str, row: Vec<bool>) -> BnError {
    BnError::UndefinedCptRow { variable: String::from(name), row }
}


/// NaN and the infinities fail the range check as well
fn check_probability(name: &str, p: f64) -> Result<()> {
    if (0.0..=1.0).contains(&p) {
        Ok(())
    } else {
        Err(BnError::InvalidProbability { variable: String::from(name), value: p })
    }
}


#[cfg(test)]
mod tests {

    use super::*;

    #[test]
    fn uniform() {
        let cpt = Initialization::Uniform.build_cpt("x", 2).unwrap();
        assert_eq!(2, cpt.num_parents());
        for row in &[[false, false], [false, true], [true, false], [true, true]] {
            assert_eq!(Some(0.5), cpt.p_true(row));
        }
    }

    #[test]
    fn prior() {
        let cpt = Initialization::Prior(0.3).build_cpt("clima_frio", 0).unwrap();
        assert_eq!(Some(0.3), cpt.p_true(&[]));

        let err = Initialization::Prior(0.3).build_cpt("clima_frio", 1).unwrap_err();
        assert_eq!(missing_row("clima_frio", vec![false]), err);

        let err = Initialization::Prior(1.3).build_cpt("clima_frio", 0).unwrap_err();
        match err {
            BnError::InvalidProbability { value, .. } => assert_eq!(1.3, value),
            _ => panic!("wrong error type")
        };
    }

    #[test]
    fn rows() {
        let init = Initialization::Rows(vec![
            (vec![true, true], 0.9),
            (vec![true, false], 0.8),
            (vec![false, true], 0.6),
            (vec![false, false], 0.05),
        ]);
        let cpt = init.build_cpt("fiebre", 2).unwrap();

        assert_eq!(Some(0.9), cpt.p_true(&[true, true]));
        assert_eq!(Some(0.8), cpt.p_true(&[true, false]));
        assert_eq!(Some(0.6), cpt.p_true(&[false, true]));
        assert_eq!(Some(0.05), cpt.p_true(&[false, false]));
    }

    #[test]
    fn rows_missing() {
        let init = Initialization::Rows(vec![
            (vec![true, true], 0.9),
            (vec![true, false], 0.8),
            (vec![false, false], 0.05),
        ]);
        let err = init.build_cpt("fiebre", 2).unwrap_err();
        assert_eq!(missing_row("fiebre", vec![false, true]), err);
    }

    #[test]
    fn rows_wrong_arity() {
        let init = Initialization::Rows(vec![(vec![true, true], 0.9), (vec![false], 0.1)]);
        let err = init.build_cpt("sudor", 1).unwrap_err();
        assert_eq!(missing_row("sudor", vec![true, true]), err);
    }

    #[test]
    fn rows_out_of_range() {
        let init = Initialization::Rows(vec![(vec![true], 0.85), (vec![false], -0.1)]);
        match init.build_cpt("sudor", 1).unwrap_err() {
            BnError::InvalidProbability { variable, value } => {
                assert_eq!("sudor", variable);
                assert_eq!(-0.1, value);
            },
            _ => panic!("wrong error type")
        };
    }

    #[test]
    fn rows_repeated() {
        let init = Initialization::Rows(vec![(vec![true], 0.85), (vec![false], 0.1), (vec![true], 0.85)]);
        let cpt = init.build_cpt("sudor", 1).unwrap();
        assert_eq!(Some(0.85), cpt.p_true(&[true]));

        let init = Initialization::Rows(vec![(vec![true], 0.85), (vec![false], 0.1), (vec![true], 0.2)]);
        let err = init.build_cpt("sudor", 1).unwrap_err();
        assert_eq!(BnError::ConflictingCptRow { variable: String::from("sudor"), row: vec![true] }, err);
    }

    fn assert_invalid(result: Result<Cpt>) -> f64 {
        match result.unwrap_err() {
            BnError::InvalidProbability { value, .. } => value,
            other => panic!("wrong error type {:?}", other)
        }
    }

    #[test]
    fn non_finite() {
        assert!(assert_invalid(Initialization::Prior(f64::NAN).build_cpt("x", 0)).is_nan());
        assert_eq!(f64::INFINITY, assert_invalid(Initialization::Prior(f64::INFINITY).build_cpt("x", 0)));

        let init = Initialization::Rows(vec![(vec![true], f64::NAN), (vec![false], 0.1)]);
        assert!(assert_invalid(init.build_cpt("sudor", 1)).is_nan());

        let init = Initialization::Rows(vec![(vec![true], 0.85), (vec![false], f64::NEG_INFINITY)]);
        assert_eq!(f64::NEG_INFINITY, assert_invalid(init.build_cpt("sudor", 1)));

        // a bad value is reported before a conflict with it
        let init = Initialization::Rows(vec![(vec![true], 0.85), (vec![true], f64::NAN)]);
        assert!(assert_invalid(init.build_cpt("sudor", 1)).is_nan());

        let table = ndarray::arr1(&[f64::NAN, 0.85]).into_dyn();
        assert!(assert_invalid(Initialization::Table(table).build_cpt("sudor", 1)).is_nan());

        let table = ndarray::arr1(&[0.1, f64::INFINITY]).into_dyn();
        assert_eq!(f64::INFINITY, assert_invalid(Initialization::Table(table).build_cpt("sudor", 1)));
    }

    #[test]
    fn table() {
        // sudor | fiebre
        let table = ndarray::arr1(&[0.1, 0.85]).into_dyn();
        let cpt = Initialization::Table(table.clone()).build_cpt("sudor", 1).unwrap();
        assert_eq!(Some(0.85), cpt.p_true(&[true]));
        assert_eq!(Some(0.1), cpt.p_true(&[false]));

        let err = Initialization::Table(table).build_cpt("sudor", 2).unwrap_err();
        assert_eq!(missing_row("sudor", vec![false, false]), err);

        let bad = ndarray::arr1(&[0.1, 1.5]).into_dyn();
        assert!(Initialization::Table(bad).build_cpt("sudor", 1).is_err());

        let copy = Initialization::Table(cpt.table().clone()).build_cpt("sudor", 1).unwrap();
        assert_eq!(cpt, copy);
    }

}
