use bninfer::inference::{
    self, ConditionalInferenceEngine, ImportanceSamplingEngine, McmcConfig, Posterior,
    RejectionSamplingEngine, SamplingConfig, Strategy,
};
use bninfer::model::Model;
use bninfer::model::directed::DirectedModel;
use bninfer::networks;
use bninfer::samplers::{rng_from_seed, RunStats};
use bninfer::variable::Assignment;

use clap::{Parser, Subcommand, ValueEnum};
use env_logger::{Builder, Env};
use indexmap::IndexMap;
use log::info;
use serde::Serialize;

#[derive(Parser, Debug)]
#[command(author, version, about = "Inference on small Bayesian networks of boolean variables", long_about = None)]
struct Args {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Compute P(query | evidence)
    Query {
        #[arg(long, value_enum, default_value_t = Network::Fever)]
        network: Network,

        /// Name of the query variable
        #[arg(long)]
        query: String,

        /// Observed values, as name=true or name=false. Repeatable.
        #[arg(long, value_parser = parse_pair)]
        evidence: Vec<(String, bool)>,

        #[arg(long, value_enum, default_value_t = Algorithm::All)]
        algorithm: Algorithm,

        /// Samples per sampling algorithm [default: 5000]
        #[arg(long)]
        samples: Option<usize>,

        #[arg(long)]
        seed: Option<u64>,

        /// Print JSON instead of text
        #[arg(long)]
        json: bool,
    },

    /// Run Metropolis-Hastings on the three-state target
    Mcmc {
        /// [default: 5000]
        #[arg(long)]
        iterations: Option<usize>,

        /// [default: estado_a]
        #[arg(long)]
        initial: Option<String>,

        #[arg(long)]
        seed: Option<u64>,

        #[arg(long)]
        json: bool,
    },

    /// List the Markov blanket of a variable
    Blanket {
        #[arg(long, value_enum, default_value_t = Network::Blanket)]
        network: Network,

        #[arg(long)]
        variable: String,
    },

    /// Chain rule probability of a complete assignment
    Joint {
        #[arg(long, value_enum, default_value_t = Network::Fever)]
        network: Network,

        /// One name=bool per variable of the network
        #[arg(long, value_parser = parse_pair)]
        assign: Vec<(String, bool)>,
    },
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum Network {
    Fever,
    Smoking,
    Blanket,
}

impl Network {
    fn build(self) -> bninfer::Result<DirectedModel> {
        Ok(match self {
            Network::Fever => networks::fever()?.model,
            Network::Smoking => networks::smoking()?.model,
            Network::Blanket => networks::blanket()?.model,
        })
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum Algorithm {
    Enumeration,
    Elimination,
    Rejection,
    Likelihood,
    All,
}

/// A single engine the `query` subcommand can run
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Engine {
    Enumeration,
    Elimination,
    Rejection,
    Likelihood,
}

impl Algorithm {
    fn engines(self) -> Vec<Engine> {
        match self {
            Algorithm::Enumeration => vec![Engine::Enumeration],
            Algorithm::Elimination => vec![Engine::Elimination],
            Algorithm::Rejection => vec![Engine::Rejection],
            Algorithm::Likelihood => vec![Engine::Likelihood],
            Algorithm::All => vec![Engine::Enumeration, Engine::Elimination, Engine::Rejection, Engine::Likelihood],
        }
    }
}

#[derive(Serialize, Debug)]
struct QueryReport {
    algorithm: String,
    query: String,
    evidence: IndexMap<String, bool>,
    posterior: Posterior,
    defined: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    samples: Option<RunStats>,
}

#[derive(Serialize, Debug)]
struct McmcReport {
    iterations: usize,
    initial: String,
    accepted: usize,
    estimate: IndexMap<String, f64>,
    target: IndexMap<String, f64>,
}

fn parse_pair(s: &str) -> Result<(String, bool), String> {
    let (name, value) = s
        .split_once('=')
        .ok_or_else(|| format!("expected name=bool, got '{}'", s))?;
    let value = value
        .trim()
        .parse::<bool>()
        .map_err(|_| format!("'{}' is not true or false", value))?;
    Ok((name.trim().to_string(), value))
}

fn assignment(model: &DirectedModel, pairs: &[(String, bool)]) -> bninfer::Result<Assignment> {
    let mut a = Assignment::new();
    for (name, value) in pairs.iter() {
        a.set(&model.variable(name)?, *value);
    }
    Ok(a)
}

fn run_query(
    model: &DirectedModel,
    query: &str,
    evidence: &[(String, bool)],
    engine: Engine,
    config: &SamplingConfig,
) -> bninfer::Result<QueryReport> {
    let q = model.variable(query)?;
    let e = assignment(model, evidence)?;

    let (name, posterior, samples) = match engine {
        Engine::Enumeration => {
            let p = inference::infer(model, &q, &e, &Strategy::Enumeration)?;
            ("enumeration", p, None)
        }
        Engine::Elimination => {
            let p = inference::infer(model, &q, &e, &Strategy::VariableElimination)?;
            ("variable elimination", p, None)
        }
        Engine::Rejection => {
            let mut engine = RejectionSamplingEngine::new(model, &e, config.samples, rng_from_seed(config.seed));
            let p = engine.infer(&q)?;
            ("rejection sampling", p, engine.last_run())
        }
        Engine::Likelihood => {
            let mut engine = ImportanceSamplingEngine::new(model, &e, config.samples, rng_from_seed(config.seed));
            let p = engine.infer(&q)?;
            ("likelihood weighting", p, engine.last_run())
        }
    };

    Ok(QueryReport {
        algorithm: name.to_string(),
        query: query.to_string(),
        evidence: evidence.iter().cloned().collect(),
        posterior,
        defined: posterior.is_defined(),
        samples,
    })
}

fn print_query(report: &QueryReport) {
    let evidence: Vec<String> = report.evidence.iter().map(|(n, v)| format!("{}={}", n, v)).collect();
    let mut line = format!(
        "{:<22} P({}=true | {}) = ",
        report.algorithm,
        report.query,
        evidence.join(", ")
    );

    if report.defined {
        line.push_str(&format!("{:.6}", report.posterior.p_true()));
    } else {
        line.push_str("undefined (evidence has zero probability)");
    }

    if let Some(stats) = report.samples {
        line.push_str(&format!("  [{} of {} samples used]", stats.accepted, stats.drawn));
    }

    println!("{}", line);
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    Builder::from_env(Env::default().default_filter_or("info")).init();

    let args = Args::parse();

    match args.command {
        Command::Query { network, query, evidence, algorithm, samples, seed, json } => {
            let model = network.build()?;
            let config = SamplingConfig { samples: samples.unwrap_or(SamplingConfig::default().samples), seed };
            info!("{:?} network, {} variables", network, model.num_variables());

            let reports = algorithm
                .engines()
                .into_iter()
                .map(|e| run_query(&model, &query, &evidence, e, &config))
                .collect::<bninfer::Result<Vec<_>>>()?;

            if json {
                println!("{}", serde_json::to_string_pretty(&reports)?);
            } else {
                reports.iter().for_each(print_query);
            }
        }

        Command::Mcmc { iterations, initial, seed, json } => {
            let defaults = McmcConfig::default();
            let config = McmcConfig {
                iterations: iterations.unwrap_or(defaults.iterations),
                initial_state: initial.unwrap_or(defaults.initial_state),
                seed,
            };

            let target = networks::three_states()?;
            let chain = inference::run_chain(&target, &config)?;

            let report = McmcReport {
                iterations: config.iterations,
                initial: config.initial_state,
                accepted: chain.stats().accepted,
                estimate: chain.estimate(),
                target: target.normalized(),
            };

            if json {
                println!("{}", serde_json::to_string_pretty(&report)?);
            } else {
                println!("{} of {} proposals accepted", report.accepted, report.iterations);
                for state in target.states() {
                    let weight = target.weight(state).unwrap_or(0.0);
                    let visited = report.estimate.get(state).copied().unwrap_or(0.0);
                    let p = report.target.get(state).copied().unwrap_or(0.0);
                    println!("{:<10} {:.4}  (target {:.4}, weight {})", state, visited, p, weight);
                }
            }
        }

        Command::Blanket { network, variable } => {
            let model = network.build()?;
            let var = model.variable(&variable)?;

            let names: Vec<String> = model.markov_blanket(&var)?.iter().map(|v| model.name(v)).collect();
            println!("markov blanket of {}: [{}]", variable, names.join(", "));
        }

        Command::Joint { network, assign } => {
            let model = network.build()?;
            let a = assignment(&model, &assign)?;

            println!("P(assignment) = {:.6}", model.probability(&a)?);
        }
    }

    Ok(())
}
