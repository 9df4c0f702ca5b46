//! Conditional Probability Tables for boolean `Variable`s.

use ndarray::prelude as nd;

/// Alias f64 ndarray::Array as Table
pub type Table = nd::ArrayD<f64>;


/// The CPT of a boolean `Variable` with `k` ordered parents.
///
/// # Representation
/// The table has `k` axes of length 2, one per parent in the order the parents were declared.
/// Along each axis index `0` is `false` and index `1` is `true`. The cell addressed by a tuple
/// of parent values holds ```P(X = true | parents)```; ```P(X = false | parents)``` is always
/// its complement and is never stored. A `Variable` with no parents has a 0-dimensional table
/// holding its prior.
#[derive(Clone, Debug, PartialEq)]
pub struct Cpt {
    table: Table
}

impl Cpt {

    /// Wrap an already validated table. See `Initialization::build_cpt` for the checked entry
    /// point.
    pub(crate) fn from_table(table: Table) -> Self {
        Cpt { table }
    }

    /// The number of parents this CPT is conditioned on
    pub fn num_parents(&self) -> usize {
        self.table.ndim()
    }

    /// Look up ```P(X = true | parent_values)```.
    ///
    /// # Returns
    /// `None` if the length of `parent_values` does not match the number of parents
    pub fn p_true(&self, parent_values: &[bool]) -> Option<f64> {
        if parent_values.len() != self.num_parents() {
            return None;
        }

        self.table.get(row_index(parent_values).as_slice()).cloned()
    }

    /// The raw table. Axis `i` is parent `i`.
    pub fn table(&self) -> &Table {
        &self.table
    }

}


/// Convert a tuple of truth values into an ndarray index
pub fn row_index(values: &[bool]) -> Vec<usize> {
    values.iter().map(|&b| b as usize).collect()
}
