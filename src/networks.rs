//! Small, fixed networks used throughout the crate's tests, the demo and the CLI.

use crate::inference::mcmc::CategoricalTarget;
use crate::init::Initialization;
use crate::model::directed::{DirectedModel, DirectedModelBuilder};
use crate::util::Result;
use crate::variable::Variable;


/// The fever network
/// ```text
/// virus    clima_frio
///     \      /
///      fiebre
///        |
///      sudor
/// ```
#[derive(Clone, Debug)]
pub struct FeverNetwork {
    pub virus: Variable,
    pub clima_frio: Variable,
    pub fiebre: Variable,
    pub sudor: Variable,
    pub model: DirectedModel
}

pub fn fever() -> Result<FeverNetwork> {
    let virus = Variable::binary();
    let clima_frio = Variable::binary();
    let fiebre = Variable::binary();
    let sudor = Variable::binary();

    let model = DirectedModelBuilder::new()
        .with_named_variable(&virus, "virus", &[], Initialization::Prior(0.1))
        .with_named_variable(&clima_frio, "clima_frio", &[], Initialization::Prior(0.3))
        .with_named_variable(&fiebre, "fiebre", &[virus, clima_frio], Initialization::Rows(vec![
            (vec![true, true], 0.9),
            (vec![true, false], 0.8),
            (vec![false, true], 0.6),
            (vec![false, false], 0.05),
        ]))
        .with_named_variable(&sudor, "sudor", &[fiebre], Initialization::Rows(vec![
            (vec![true], 0.85),
            (vec![false], 0.1),
        ]))
        .build()?;

    Ok(FeverNetwork { virus, clima_frio, fiebre, sudor, model })
}


/// `fumar -> cancer`, and both cause `tos`
#[derive(Clone, Debug)]
pub struct SmokingNetwork {
    pub fumar: Variable,
    pub cancer: Variable,
    pub tos: Variable,
    pub model: DirectedModel
}

pub fn smoking() -> Result<SmokingNetwork> {
    let fumar = Variable::binary();
    let cancer = Variable::binary();
    let tos = Variable::binary();

    let model = DirectedModelBuilder::new()
        .with_named_variable(&fumar, "fumar", &[], Initialization::Prior(0.3))
        .with_named_variable(&cancer, "cancer", &[fumar], Initialization::Rows(vec![
            (vec![true], 0.2),
            (vec![false], 0.01),
        ]))
        .with_named_variable(&tos, "tos", &[fumar, cancer], Initialization::Rows(vec![
            (vec![true, true], 0.9),
            (vec![true, false], 0.5),
            (vec![false, true], 0.9),
            (vec![false, false], 0.1),
        ]))
        .build()?;

    Ok(SmokingNetwork { fumar, cancer, tos, model })
}


/// `a -> b <- c`, `b -> d`. Only the structure matters, so every CPT is uniform.
#[derive(Clone, Debug)]
pub struct BlanketNetwork {
    pub a: Variable,
    pub b: Variable,
    pub c: Variable,
    pub d: Variable,
    pub model: DirectedModel
}

pub fn blanket() -> Result<BlanketNetwork> {
    let a = Variable::binary();
    let b = Variable::binary();
    let c = Variable::binary();
    let d = Variable::binary();

    let model = DirectedModelBuilder::new()
        .with_named_variable(&a, "a", &[], Initialization::Uniform)
        .with_named_variable(&b, "b", &[a, c], Initialization::Uniform)
        .with_named_variable(&c, "c", &[], Initialization::Uniform)
        .with_named_variable(&d, "d", &[b], Initialization::Uniform)
        .build()?;

    Ok(BlanketNetwork { a, b, c, d, model })
}


/// Three states weighted `0.1`, `0.4` and `0.5`
pub fn three_states() -> Result<CategoricalTarget> {
    CategoricalTarget::new(vec![
        (String::from("estado_a"), 0.1),
        (String::from("estado_b"), 0.4),
        (String::from("estado_c"), 0.5),
    ])
}
