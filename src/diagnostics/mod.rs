//! Diagnostics and statistics
//!
//! This module provides statistics collection for evolutionary runs: the
//! per-generation min/mean/max fitness, the history of those values across a
//! run, and the final result handed back to the caller.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{EvoResult, EvolutionError};
use crate::genome::tree::{Operator, Terminal, Tree};
use crate::population::population::Population;

/// Statistics for a single generation
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct GenerationStats {
    /// Generation number (1-based)
    pub generation: usize,
    /// Lowest fitness in this generation
    pub min_fitness: f64,
    /// Mean fitness
    pub mean_fitness: f64,
    /// Highest fitness in this generation
    pub max_fitness: f64,
    /// Index of the first individual holding `min_fitness`
    pub best_index: usize,
    /// Index of the first individual holding `max_fitness`
    pub worst_index: usize,
    /// Time spent on fitness evaluation (ms)
    pub evaluation_ms: f64,
}

impl GenerationStats {
    /// Compute statistics from an evaluated population
    ///
    /// Fails if the population is empty or any fitness is NaN (or missing),
    /// since neither can be ordered.
    pub fn from_population<T, O>(
        population: &Population<T, O>,
        generation: usize,
    ) -> EvoResult<Self>
    where
        T: Terminal,
        O: Operator,
    {
        if population.is_empty() {
            return Err(EvolutionError::EmptyPopulation);
        }

        let mut best_index = 0;
        let mut worst_index = 0;
        let mut min_fitness = f64::INFINITY;
        let mut max_fitness = f64::NEG_INFINITY;
        let mut total = 0.0;

        for (index, individual) in population.iter().enumerate() {
            let value = match individual.fitness {
                Some(f) if !f.is_nan() => f,
                other => {
                    return Err(EvolutionError::InvalidFitness {
                        index,
                        value: other.unwrap_or(f64::NAN),
                    })
                }
            };
            if index == 0 || value < min_fitness {
                min_fitness = value;
                best_index = index;
            }
            if index == 0 || value > max_fitness {
                max_fitness = value;
                worst_index = index;
            }
            total += value;
        }

        Ok(Self {
            generation,
            min_fitness,
            mean_fitness: total / population.len() as f64,
            max_fitness,
            best_index,
            worst_index,
            evaluation_ms: 0.0,
        })
    }

    /// Set evaluation time
    pub fn with_evaluation_time(mut self, duration: Duration) -> Self {
        self.evaluation_ms = duration.as_secs_f64() * 1000.0;
        self
    }
}

/// Min/mean/max fitness per generation, in generation order
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct FitnessHistory {
    /// Lowest fitness per generation
    pub min: Vec<f64>,
    /// Mean fitness per generation
    pub mean: Vec<f64>,
    /// Highest fitness per generation
    pub max: Vec<f64>,
}

impl FitnessHistory {
    /// Create an empty history
    pub fn new() -> Self {
        Self::default()
    }

    /// Append one generation
    pub fn record(&mut self, stats: &GenerationStats) {
        self.min.push(stats.min_fitness);
        self.mean.push(stats.mean_fitness);
        self.max.push(stats.max_fitness);
    }

    /// Number of generations recorded
    pub fn len(&self) -> usize {
        self.min.len()
    }

    /// Check if nothing has been recorded
    pub fn is_empty(&self) -> bool {
        self.min.is_empty()
    }

    /// Lowest minimum across all recorded generations
    pub fn global_min(&self) -> Option<f64> {
        self.min.iter().copied().reduce(f64::min)
    }

    /// Export as JSON for external charting
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    /// Import a history previously exported with [`FitnessHistory::to_json`]
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}

/// Result of an evolution run
#[derive(Clone, Debug)]
pub struct EvolutionResult<T: Terminal, O: Operator> {
    /// The best individual found
    pub best_individual: Tree<T, O>,
    /// Its fitness
    pub best_fitness: f64,
    /// Number of generations evaluated
    pub generations: usize,
    /// Whether the acceptance criterion stopped the run
    pub accepted: bool,
    /// Reason the run stopped
    pub termination_reason: String,
    /// Fitness history of the run
    pub history: FitnessHistory,
    /// Total runtime in milliseconds
    pub total_runtime_ms: f64,
}

impl<T: Terminal, O: Operator> EvolutionResult<T, O> {
    /// Split into `(best_individual, best_fitness)`
    pub fn into_parts(self) -> (Tree<T, O>, f64) {
        (self.best_individual, self.best_fitness)
    }

    /// Get a summary of the evolution run
    pub fn summary(&self) -> String {
        format!(
            "Evolution Summary:\n\
             - Generations: {}\n\
             - Best fitness: {:.6}\n\
             - Best individual: {}\n\
             - Runtime: {:.2}ms\n\
             - Termination: {}",
            self.generations,
            self.best_fitness,
            self.best_individual,
            self.total_runtime_ms,
            self.termination_reason
        )
    }
}

pub mod prelude {
    pub use super::{EvolutionResult, FitnessHistory, GenerationStats};
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::genome::tree::{ArithmeticOperator, ArithmeticTerminal};
    use crate::population::individual::Individual;

    fn population(fitness: &[f64]) -> Population<ArithmeticTerminal, ArithmeticOperator> {
        let mut pop = Population::new();
        for &f in fitness {
            let mut ind = Individual::new(Tree::leaf(ArithmeticTerminal::Constant(f)));
            ind.set_fitness(f);
            pop.push(ind);
        }
        pop
    }

    #[test]
    fn test_generation_stats_from_population() {
        let pop = population(&[30.0, 10.0, 50.0, 10.0, 20.0]);
        let stats = GenerationStats::from_population(&pop, 3).unwrap();

        assert_eq!(stats.generation, 3);
        assert_eq!(stats.min_fitness, 10.0);
        assert_eq!(stats.best_index, 1);
        assert_eq!(stats.max_fitness, 50.0);
        assert_eq!(stats.worst_index, 2);
        assert_eq!(stats.mean_fitness, 24.0);
    }

    #[test]
    fn test_generation_stats_empty_population() {
        let pop: Population<ArithmeticTerminal, ArithmeticOperator> = Population::new();
        assert!(matches!(
            GenerationStats::from_population(&pop, 1),
            Err(EvolutionError::EmptyPopulation)
        ));
    }

    #[test]
    fn test_generation_stats_rejects_nan() {
        let result = GenerationStats::from_population(&population(&[1.0, f64::NAN]), 1);
        assert!(matches!(
            result,
            Err(EvolutionError::InvalidFitness { index: 1, .. })
        ));
    }

    #[test]
    fn test_generation_stats_rejects_unevaluated() {
        let pop = Population::from_trees(vec![Tree::<ArithmeticTerminal, ArithmeticOperator>::leaf(
            ArithmeticTerminal::Constant(1.0),
        )]);
        assert!(matches!(
            GenerationStats::from_population(&pop, 1),
            Err(EvolutionError::InvalidFitness { index: 0, .. })
        ));
    }

    #[test]
    fn test_generation_stats_infinity_is_comparable() {
        let pop = population(&[f64::INFINITY, 2.0]);
        let stats = GenerationStats::from_population(&pop, 1).unwrap();
        assert_eq!(stats.min_fitness, 2.0);
        assert_eq!(stats.max_fitness, f64::INFINITY);
    }

    #[test]
    fn test_fitness_history_record() {
        let mut history = FitnessHistory::new();
        assert!(history.is_empty());
        assert_eq!(history.global_min(), None);

        for (i, values) in [[3.0, 4.0], [1.0, 5.0], [2.0, 2.0]].iter().enumerate() {
            let stats = GenerationStats::from_population(&population(values), i + 1).unwrap();
            history.record(&stats);
        }

        assert_eq!(history.len(), 3);
        assert_eq!(history.min, vec![3.0, 1.0, 2.0]);
        assert_eq!(history.mean, vec![3.5, 3.0, 2.0]);
        assert_eq!(history.max, vec![4.0, 5.0, 2.0]);
        assert_eq!(history.global_min(), Some(1.0));
    }

    #[test]
    fn test_fitness_history_json() {
        let history = FitnessHistory {
            min: vec![1.0],
            mean: vec![2.0],
            max: vec![3.0],
        };
        let json = history.to_json().unwrap();
        assert!(json.contains("\"min\":[1.0]"));
        assert_eq!(FitnessHistory::from_json(&json).unwrap(), history);
    }

    #[test]
    fn test_evolution_result_parts() {
        let result = EvolutionResult {
            best_individual: Tree::<ArithmeticTerminal, ArithmeticOperator>::leaf(
                ArithmeticTerminal::Constant(4.0),
            ),
            best_fitness: 0.5,
            generations: 7,
            accepted: false,
            termination_reason: "Generation budget exhausted".to_string(),
            history: FitnessHistory::new(),
            total_runtime_ms: 1.0,
        };
        let summary = result.summary();
        assert!(summary.contains("Generations: 7"));
        assert!(summary.contains("Generation budget exhausted"));

        let (tree, fitness) = result.into_parts();
        assert_eq!(tree.size(), 1);
        assert_eq!(fitness, 0.5);
    }
}
