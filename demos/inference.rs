//! Provides an example of how to use bninfer to perform inference on a Bayesian Network.
//!
//! Builds the fever network by hand and asks every engine for ```P(fiebre | sudor = true)```.

use bninfer::inference::{
    ConditionalInferenceEngine, EnumerationEngine, ImportanceSamplingEngine,
    RejectionSamplingEngine, VariableEliminationEngine,
};
use bninfer::init::Initialization;
use bninfer::model::directed::{DirectedModel, DirectedModelBuilder};
use bninfer::samplers::rng_from_seed;
use bninfer::variable::{Assignment, Variable};

use ndarray::array;

fn main() -> bninfer::Result<()> {
    let virus = Variable::binary();
    let clima_frio = Variable::binary();
    let fiebre = Variable::binary();
    let sudor = Variable::binary();

    let vars = FeverVariables(virus, clima_frio, fiebre, sudor);

    /////////////////////////////////////////////////////
    // Step 1: Build Model
    let model = build_model(vars)?;

    /////////////////////////////////////////////////////
    // Step 2: Compile some evidence
    let mut evidence = Assignment::new();
    evidence.set(&sudor, true);

    /////////////////////////////////////////////////////
    // Step 3: Build the inference engines
    let samples = 20_000;
    let mut engines: Vec<(&str, Box<dyn ConditionalInferenceEngine + '_>)> = vec![
        ("enumeration", Box::new(EnumerationEngine::new(&model, &evidence))),
        ("variable elimination", Box::new(VariableEliminationEngine::new(&model, &evidence))),
        ("rejection sampling", Box::new(RejectionSamplingEngine::new(&model, &evidence, samples, rng_from_seed(Some(1))))),
        ("likelihood weighting", Box::new(ImportanceSamplingEngine::new(&model, &evidence, samples, rng_from_seed(Some(1))))),
    ];

    /////////////////////////////////////////////////////
    // Step 4: Run a Conditional Query
    for (name, engine) in engines.iter_mut() {
        let p = engine.infer(&fiebre)?;
        println!("{:<22} P(fiebre = true | sudor = true) = {:.4}", name, p.p_true());
    }

    Ok(())
}

struct FeverVariables(Variable, Variable, Variable, Variable);

fn build_model(vars: FeverVariables) -> bninfer::Result<DirectedModel> {
    let FeverVariables(virus, clima_frio, fiebre, sudor) = vars;

    ///////////////////////////////////////////////////
    // P(fiebre = true | virus, clima_frio); axis 0 is virus, axis 1 is clima_frio
    let cpt_fiebre = array![
        [0.05, 0.6],
        [0.8, 0.9]
    ].into_dyn();

    ///////////////////////////////////////////////////
    // Build the Model. Declaration order does not matter.
    DirectedModelBuilder::new()
        .with_named_variable(&sudor, "sudor", &[fiebre], Initialization::Rows(vec![
            (vec![true], 0.85),
            (vec![false], 0.1),
        ]))
        .with_named_variable(&fiebre, "fiebre", &[virus, clima_frio], Initialization::Table(cpt_fiebre))
        .with_named_variable(&virus, "virus", &[], Initialization::Prior(0.1))
        .with_named_variable(&clima_frio, "clima_frio", &[], Initialization::Prior(0.3))
        .build()
}
