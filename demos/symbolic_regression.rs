//! Symbolic Regression with Genetic Programming
//!
//! Evolves an expression tree that fits samples of a target function.
//! Per-generation progress is emitted as `tracing` events; set `RUST_LOG`
//! (e.g. `RUST_LOG=fugue_gp=debug`) to change the verbosity.

use fugue_gp::prelude::*;
use rand::rngs::StdRng;
use rand::SeedableRng;
use tracing_subscriber::EnvFilter;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    println!("=== Symbolic Regression with GP ===\n");

    let mut rng = StdRng::seed_from_u64(42);

    // Training data from f(x) = x^2 + 2*x + 1
    let training_data: Vec<(f64, f64)> = (-5..=5)
        .map(|i| {
            let x = i as f64;
            (x, x * x + 2.0 * x + 1.0)
        })
        .collect();

    println!("Target function: f(x) = x^2 + 2*x + 1");
    println!("Training points: {}\n", training_data.len());

    let primitives = PrimitiveSet::new(
        vec![
            ArithmeticTerminal::Constant(1.0),
            ArithmeticTerminal::Constant(2.0),
            ArithmeticTerminal::Constant(3.0),
        ],
        ArithmeticOperator::all(),
    )
    .with_variables(vec![ArithmeticTerminal::Variable(0)], 0.5);

    let mut gp = GeneticProgramBuilder::new()
        .population_size(200)
        .max_tree_depth(5)
        .mutation_probability(0.25)
        .selection(SelectionStrategy::Tournament)
        .reproduction(ReproductionStrategy::Crossover)
        .primitives(primitives)
        .generator(RampedHalfAndHalf::new(2))
        .fitness(SymbolicRegressionFitness::from_points(&training_data))
        .acceptance(FitnessThreshold::new(1e-9))
        .build()?;

    let result = gp.run(60, &mut rng)?;

    println!("\n{}", result.summary());
    println!("Prefix form: {}", result.best_individual.eval_post_order());
    println!("Tree size: {} nodes", result.best_individual.size());
    println!("Tree depth: {}", result.best_individual.depth());

    println!("\nComparison on test points:");
    println!("{:>6} {:>12} {:>12} {:>12}", "x", "Target", "Predicted", "Error");
    for x in [-3.5, -1.0, 0.0, 1.0, 2.5] {
        let target = x * x + 2.0 * x + 1.0;
        let predicted = result.best_individual.evaluate(&[x]);
        let error = (target - predicted).abs();
        println!("{:6.1} {:12.4} {:12.4} {:12.6}", x, target, predicted, error);
    }

    println!("\nFitness history (JSON): {}", result.history.to_json()?);

    Ok(())
}
