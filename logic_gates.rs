use multilayer_perceptron::architecture::{build_network, load_architecture};
use multilayer_perceptron::config::load_config;
use multilayer_perceptron::network::{
    MultiLayerPerceptron, TrainingExample, TrainingParameters,
};
use multilayer_perceptron::utils::SimpleRng;
use multilayer_perceptron::Result;
use std::process;
use tracing_subscriber::EnvFilter;

// Small MLP learning a two-input logic gate (educational example).
const DEFAULT_TOPOLOGY: [usize; 3] = [2, 2, 1];
// Training hyperparameters used without a config file.
const EPOCHS: usize = 5000;
const COST_GOAL: f64 = 0.001;
const LEARNING_COEFFICIENT: f64 = 0.5;
const MOMENTUM_COEFFICIENT: f64 = 0.9;
const EPOCH_INTERVAL: usize = 100;
const SEED: u64 = 42;

struct Options {
    gate: String,
    training: Option<String>,
    architecture: Option<String>,
    save: Option<String>,
}

fn usage() -> ! {
    eprintln!(
        "usage: logic_gates [--gate and|or|nand|xor] [--training FILE] [--architecture FILE] [--save FILE]"
    );
    process::exit(2);
}

fn parse_options() -> Options {
    let mut options = Options {
        gate: "and".to_string(),
        training: None,
        architecture: None,
        save: None,
    };

    let mut args = std::env::args().skip(1);
    while let Some(flag) = args.next() {
        let value = args.next().unwrap_or_else(|| usage());
        match flag.as_str() {
            "--gate" => options.gate = value.to_lowercase(),
            "--training" => options.training = Some(value),
            "--architecture" => options.architecture = Some(value),
            "--save" => options.save = Some(value),
            _ => usage(),
        }
    }
    options
}

// Truth table of the requested gate.
fn gate_examples(gate: &str) -> Option<Vec<TrainingExample>> {
    let truth: fn(bool, bool) -> bool = match gate {
        "and" => |a, b| a && b,
        "or" => |a, b| a || b,
        "nand" => |a, b| !(a && b),
        "xor" => |a, b| a ^ b,
        _ => return None,
    };

    let as_f64 = |x: bool| if x { 1.0 } else { 0.0 };
    Some(
        [(false, false), (false, true), (true, false), (true, true)]
            .into_iter()
            .map(|(a, b)| {
                TrainingExample::new(vec![as_f64(a), as_f64(b)], vec![as_f64(truth(a, b))])
            })
            .collect(),
    )
}

fn run(options: &Options) -> Result<()> {
    let examples = gate_examples(&options.gate).unwrap_or_else(|| usage());

    let (parameters, seed) = match &options.training {
        Some(path) => {
            let config = load_config(path)?;
            (config.parameters(), config.seed.unwrap_or(SEED))
        }
        None => (
            TrainingParameters::new(EPOCHS, COST_GOAL, LEARNING_COEFFICIENT)
                .with_momentum_coefficient(MOMENTUM_COEFFICIENT)
                .with_epoch_interval(EPOCH_INTERVAL),
            SEED,
        ),
    };

    // Fixed seed: the same run every time.
    let mut rng = SimpleRng::new(seed);
    let mut network = match &options.architecture {
        Some(path) => build_network(&load_architecture(path)?, &mut rng)?,
        None => MultiLayerPerceptron::new(&DEFAULT_TOPOLOGY, None, &mut rng)?,
    };

    let results = network.train(&examples, &parameters, &mut rng)?;
    for (sample, (epoch, cost)) in results
        .sampled_epochs()
        .into_iter()
        .zip(&results.cost_per_epoch_interval)
        .enumerate()
    {
        println!("Sample {:>4} (epoch {}), Cost: {:.6}", sample, epoch, cost);
    }
    println!(
        "Trained for {} epochs, goal reached: {}",
        results.epochs_run, results.reached_cost_goal
    );

    println!("\nTesting the trained network:");
    let testing = network.test(&examples)?;
    for (example, result) in examples.iter().zip(&testing.per_example) {
        println!(
            "Input: {:.1}, {:.1}, Expected Output: {:.1}, Predicted Output: {:.3}",
            example.inputs()[0],
            example.inputs()[1],
            example.targets()[0],
            result.outputs()[0]
        );
    }
    println!("Mean cost: {:.6}", testing.global_cost);

    if let Some(path) = &options.save {
        network.save_to_file(path)?;
        println!("Saved network to {path}");
    }
    Ok(())
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let options = parse_options();
    if let Err(err) = run(&options) {
        eprintln!("error: {err}");
        process::exit(1);
    }
}
