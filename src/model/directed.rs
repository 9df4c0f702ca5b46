//! Defines a `DirectedModel`, which is a Bayesian model that represents the factorization of
//! a probability distribution P

use crate::init::Initialization;
use crate::util::{BnError, Result};
use crate::variable::{Assignment, Variable};
use super::Model;
use super::cpt::Cpt;

use bidir_map::BidirMap;
use indexmap::IndexMap;
use log::debug;


/// A `Variable`'s place in the network: its ordered parents and its CPT
#[derive(Clone, Debug)]
struct Node {

    /// The parents, in the order the CPT is keyed on
    parents: Vec<Variable>,

    cpt: Cpt

}


/// Represents a Bayesian Network - a Directed Probabilistic Graphical Model over boolean
/// `Variable`s.
///
/// # Representation
/// The network is represented as a Directed Acyclic Graph (DAG). A traditional graph data
/// structure is not used; instead, the ordered parent list of each `Variable` implicitly defines
/// the edges of the graph. The `Variable`s are held in topological order, so iterating over
/// them always visits parents before children.
///
/// A `DirectedModel` is immutable once built.
#[derive(Clone, Debug)]
pub struct DirectedModel {

    /// The `Variable`s comprising the `DirectedModel` and their parents and CPTs, in
    /// topological order
    graph: IndexMap<Variable, Node>,

    /// The user-defined names of each `Variable`. This is a two way lookup ```(`Variable`->Name)```
    /// and ```(Name->`Variable`)```
    names: BidirMap<Variable, String>

}

impl DirectedModel {

    /// Get a topological order of the `DirectedModel`
    pub fn topological_order(&self) -> Vec<Variable> {
        self.graph.keys().cloned().collect()
    }


    /// The name of `var`, or its anonymous display name if the model does not know it
    pub fn name(&self, var: &Variable) -> String {
        self.lookup_name(var).cloned().unwrap_or_else(|| var.to_string())
    }


    /// Resolve a name into a `Variable` of this model
    ///
    /// # Errors
    /// * `BnError::UnknownVariable` if no `Variable` has that name
    pub fn variable(&self, name: &str) -> Result<Variable> {
        self.lookup_variable(name)
            .cloned()
            .ok_or_else(|| BnError::UnknownVariable(String::from(name)))
    }


    /// The ordered parents of `var`
    pub fn parents(&self, var: &Variable) -> Result<&[Variable]> {
        Ok(&self.node(var)?.parents)
    }


    /// The `Variable`s that list `var` as a parent, in topological order
    pub fn children(&self, var: &Variable) -> Result<Vec<Variable>> {
        self.node(var)?;

        Ok(self.graph.iter()
                     .filter(|(_, node)| node.parents.contains(var))
                     .map(|(&child, _)| child)
                     .collect())
    }


    /// The Markov blanket of `var`: its parents, its children and the other parents of its
    /// children. Returned in topological order, without `var` itself.
    pub fn markov_blanket(&self, var: &Variable) -> Result<Vec<Variable>> {
        let children = self.children(var)?;
        let parents = self.parents(var)?;

        let in_blanket = |v: &Variable| {
            v != var && (
                parents.contains(v) ||
                children.contains(v) ||
                children.iter().any(|c| self.graph[c].parents.contains(v))
            )
        };

        Ok(self.graph.keys().filter(|v| in_blanket(v)).cloned().collect())
    }


    /// Get the CPT for the given `Variable` in this model.
    pub fn cpt(&self, var: &Variable) -> Option<&Cpt> {
        self.graph.get(var).map(|node| &node.cpt)
    }


    /// Look up ```P(var = true | parents(var) = parent_values)```
    ///
    /// # Args
    /// * `parent_values`: one value per parent, positionally matching `parents(var)`
    ///
    /// # Errors
    /// * `BnError::UnknownVariable` if `var` is not in the model
    /// * `BnError::UndefinedCptRow` if `parent_values` is not a row of the CPT
    pub fn conditional_true_probability(&self, var: &Variable, parent_values: &[bool]) -> Result<f64> {
        self.node(var)?
            .cpt
            .p_true(parent_values)
            .ok_or_else(|| BnError::UndefinedCptRow {
                variable: self.name(var),
                row: parent_values.to_vec()
            })
    }


    /// Look up ```P(var = value | parents(var) = parent_values)```
    pub fn probability_of(&self, var: &Variable, value: bool, parent_values: &[bool]) -> Result<f64> {
        let p = self.conditional_true_probability(var, parent_values)?;
        Ok(if value { p } else { 1.0 - p })
    }


    /// Read the values of `var`'s parents out of `assignment`, in parent order
    ///
    /// # Errors
    /// * `BnError::IncompleteAssignment` if a parent has no value in `assignment`
    pub fn parent_values(&self, var: &Variable, assignment: &Assignment) -> Result<Vec<bool>> {
        self.node(var)?
            .parents
            .iter()
            .map(|p| assignment.get(p).ok_or(BnError::IncompleteAssignment))
            .collect()
    }


    /// Look up ```P(var = value | parents)``` where the parents' values are read from `assignment`
    pub fn probability_given(&self, var: &Variable, value: bool, assignment: &Assignment) -> Result<f64> {
        let parent_values = self.parent_values(var, assignment)?;
        self.probability_of(var, value, &parent_values)
    }


    fn node(&self, var: &Variable) -> Result<&Node> {
        self.graph.get(var).ok_or_else(|| BnError::UnknownVariable(self.name(var)))
    }
}

impl Model for DirectedModel {

    /// Lookup a `Variable` in the `DirectedModel` based on the name
    fn lookup_variable(&self, name: &str) -> Option<&Variable> {
        self.names.get_by_second(&String::from(name))
    }

    /// Lookup a `Variable`'s name in the `DirectedModel`.
    fn lookup_name(&self, var: &Variable) -> Option<&String> {
        self.names.get_by_first(var)
    }

    fn variables(&self) -> Vec<Variable> {
        self.topological_order()
    }

    fn num_variables(&self) -> usize {
        self.graph.len()
    }

    fn contains(&self, var: &Variable) -> bool {
        self.graph.contains_key(var)
    }

    /// Determine the probability of a full `Assignment` by the chain rule.
    fn probability(&self, assignment: &Assignment) -> Result<f64> {
        // for every variable in the graph
        self.graph.keys()
                  .map(|var| {
                      let val = assignment.get(var).ok_or(BnError::IncompleteAssignment)?;
                      self.probability_given(var, val, assignment)
                  })
                  // and multiply those probability by the chain rule
                  // but if there are any errors, just return the error
                  .fold(Ok(1.0), |acc, val| acc.and_then(|p| val.map(|v| p * v)))
    }
}


/// A declaration recorded by the builder, checked and ordered at `build` time
struct Declaration {
    parents: Vec<Variable>,
    cpt: Cpt
}


/// An implementation of the [builder pattern] for creating a `DirectedModel`.
///
/// `Variable`s may be declared in any order. `build` rejects parents that were never declared
/// and parent graphs with cycles, then stores the `Variable`s in topological order. Among
/// `Variable`s whose relative order is not forced by an edge, declaration order is kept.
///
/// [builder pattern]: https://en.wikipedia.org/wiki/Builder_pattern
pub struct DirectedModelBuilder {

    /// The `Variable`s and their declarations, in declaration order
    decls: IndexMap<Variable, Declaration>,

    /// The names of each `Variable`
    names: BidirMap<Variable, String>,

    /// The error state of the builder
    err: Option<BnError>

}


impl Default for DirectedModelBuilder {
    fn default() -> Self {
        DirectedModelBuilder::new()
    }
}


impl DirectedModelBuilder {

    /// Construct a new `DirectedModelBuilder` representing an empty `DirectedModel`
    pub fn new() -> Self {
        DirectedModelBuilder {
            decls: IndexMap::new(),
            names: BidirMap::new(),
            err: None
        }
    }


    /// Add an anonymous `Variable` to the `DirectedModel`.
    ///
    /// # Args
    /// * `var`: the variable to add to the model
    /// * `parents`: the ordered parent variables. The CPT is keyed on parent values in this
    ///   order.
    /// * `init`: the initialization mechanism for the CPT of `var` in the model.
    pub fn with_variable(self, var: &Variable, parents: &[Variable], init: Initialization) -> Self {
        self.add_variable(var, var.to_string(), parents, init)
    }


    /// Add a named `Variable` to the `DirectedModel`.
    ///
    /// # Args
    /// * `var`: the variable to add to the model
    /// * `name`: the name for the variable. Names must be unique within a model.
    /// * `parents`: the ordered parent variables. The CPT is keyed on parent values in this
    ///   order.
    /// * `init`: the initialization mechanism for the CPT of `var` in the model.
    pub fn with_named_variable(
        self,
        var: &Variable,
        name: &str,
        parents: &[Variable],
        init: Initialization,
    ) -> Self {
        self.add_variable(var, String::from(name), parents, init)
    }


    /// Complete building the model.
    ///
    /// # Returns
    /// the `DirectedModel`, or the first error generated during the building process
    ///
    /// # Errors
    /// * `BnError::MissingParent` if a parent was never declared
    /// * `BnError::CyclicGraph` if the parent relation has a cycle
    /// * any error recorded while declaring variables
    pub fn build(self) -> Result<DirectedModel> {
        if let Some(e) = self.err {
            return Err(e);
        }

        let DirectedModelBuilder { mut decls, names, .. } = self;

        let name = |v: &Variable| names.get_by_first(v).cloned().unwrap_or_else(|| v.to_string());

        ///////////////////////////////////////////////////////////////////////
        // 1) every parent must be declared
        for (var, decl) in decls.iter() {
            if let Some(p) = decl.parents.iter().find(|p| ! decls.contains_key(*p)) {
                return Err(BnError::MissingParent { variable: name(var), parent: name(p) });
            }
        }

        ///////////////////////////////////////////////////////////////////////
        // 2) order topologically. Each pass emits every pending variable whose parents have
        //    all been emitted; a pass that emits nothing means the rest sit on a cycle.
        let mut graph: IndexMap<Variable, Node> = IndexMap::new();

        while ! decls.is_empty() {
            let ready: Vec<Variable> = decls.iter()
                                            .filter(|(_, d)| d.parents.iter().all(|p| graph.contains_key(p)))
                                            .map(|(&v, _)| v)
                                            .collect();

            if ready.is_empty() {
                return Err(BnError::CyclicGraph(decls.keys().map(|v| name(v)).collect()));
            }

            for var in ready {
                if let Some(Declaration { parents, cpt }) = decls.shift_remove(&var) {
                    graph.insert(var, Node { parents, cpt });
                }
            }
        }

        debug!("built directed model with {} variables", graph.len());
        Ok(DirectedModel { graph, names })
    }


    /// Internal function that actually does the variable addition to the model
    fn add_variable(
        mut self,
        var: &Variable,
        name: String,
        parents: &[Variable],
        init: Initialization,
    ) -> Self {
        ///////////////////////////////////////////////////////////////////////
        // 1) if we are in an error state, do nothing
        if self.err.is_some() {
            return self;
        }

        ///////////////////////////////////////////////////////////////////////
        // 2) Check for error conditions
        if self.decls.contains_key(var) || self.names.get_by_second(&name).is_some() {
            self.err = Some(BnError::DuplicateVariable(name));
            return self;
        }

        if parents.contains(var) {
            self.err = Some(BnError::CyclicGraph(vec![name]));
            return self;
        }

        for (i, p) in parents.iter().enumerate() {
            if parents[..i].contains(p) {
                let pname = self.names.get_by_first(p).cloned().unwrap_or_else(|| p.to_string());
                self.err = Some(BnError::DuplicateVariable(pname));
                return self;
            }
        }

        ///////////////////////////////////////////////////////////////////////
        // 3) Build the CPT based on the initialization
        match init.build_cpt(&name, parents.len()) {
            Ok(cpt) => {
                ///////////////////////////////////////////////////////////////
                // 4) Add to current model
                self.decls.insert(*var, Declaration { parents: parents.to_vec(), cpt });
                self.names.insert(*var, name);
            },
            Err(e) => self.err = Some(e)
        };

        self
    }
}
