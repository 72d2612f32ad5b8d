//! Generational genetic programming
//!
//! This module implements the tree-based evolutionary loop: evaluate the
//! population, stop if the acceptance criterion is met, otherwise breed a
//! full replacement generation through selection, crossover and mutation.

use std::marker::PhantomData;
use std::time::Instant;

use rand::Rng;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::diagnostics::{EvolutionResult, FitnessHistory, GenerationStats};
use crate::error::{EvoResult, EvolutionError, OperatorError};
use crate::fitness::traits::FitnessFunction;
use crate::genome::generator::{IndividualGenerator, PrimitiveSet};
use crate::genome::tree::{Operator, Terminal, Tree};
use crate::operators::crossover::{Recombination, ReproductionStrategy};
use crate::operators::mutation::{generate_within, SubtreeMutation};
use crate::operators::selection::{Selection, SelectionStrategy};
use crate::operators::traits::{ParentSelection, Reproduction};
use crate::population::individual::Individual;
use crate::population::population::Population;
use crate::termination::AcceptanceCriterion;

/// Configuration for the genetic program
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneticProgramConfig {
    /// Population size
    pub population_size: usize,
    /// Maximum depth of any individual (a single leaf has depth 0)
    pub max_tree_depth: usize,
    /// Probability that each offspring is mutated
    pub mutation_probability: f64,
    /// Parent selection strategy
    pub selection: SelectionStrategy,
    /// Reproduction strategy
    pub reproduction: ReproductionStrategy,
    /// Pool size for tournament selection
    pub tournament_size: usize,
    /// Whether to evaluate in parallel
    pub parallel_evaluation: bool,
}

impl Default for GeneticProgramConfig {
    fn default() -> Self {
        Self {
            population_size: 100,
            max_tree_depth: 4,
            mutation_probability: 0.25,
            selection: SelectionStrategy::Tournament,
            reproduction: ReproductionStrategy::Crossover,
            tournament_size: 5,
            parallel_evaluation: true,
        }
    }
}

impl GeneticProgramConfig {
    /// Check every field against its allowed range
    pub fn validate(&self) -> EvoResult<()> {
        if self.population_size < 2 {
            return Err(EvolutionError::Configuration(format!(
                "population_size must be at least 2, got {}",
                self.population_size
            )));
        }
        if self.max_tree_depth == 0 {
            return Err(EvolutionError::Configuration(
                "max_tree_depth must be positive".to_string(),
            ));
        }
        if !(0.0..=1.0).contains(&self.mutation_probability) {
            return Err(EvolutionError::Configuration(format!(
                "mutation_probability must be in [0, 1], got {}",
                self.mutation_probability
            )));
        }
        if self.tournament_size == 0 {
            return Err(EvolutionError::Configuration(
                "tournament_size must be at least 1".to_string(),
            ));
        }
        Ok(())
    }

    /// Load and validate a configuration from JSON
    ///
    /// Missing fields take their default values.
    pub fn from_json(json: &str) -> EvoResult<Self> {
        let config: Self = serde_json::from_str(json)
            .map_err(|e| EvolutionError::Configuration(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }
}

/// Builder for GeneticProgram
pub struct GeneticProgramBuilder<T, O, Gen, Fit, Acc>
where
    T: Terminal,
    O: Operator,
{
    config: GeneticProgramConfig,
    primitives: Option<PrimitiveSet<T, O>>,
    generator: Option<Gen>,
    fitness: Option<Fit>,
    acceptance: Option<Acc>,
    _phantom: PhantomData<(T, O)>,
}

impl<T, O> GeneticProgramBuilder<T, O, (), (), ()>
where
    T: Terminal,
    O: Operator,
{
    /// Create a new builder with default configuration
    pub fn new() -> Self {
        Self {
            config: GeneticProgramConfig::default(),
            primitives: None,
            generator: None,
            fitness: None,
            acceptance: None,
            _phantom: PhantomData,
        }
    }
}

impl<T, O> Default for GeneticProgramBuilder<T, O, (), (), ()>
where
    T: Terminal,
    O: Operator,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<T, O, Gen, Fit, Acc> GeneticProgramBuilder<T, O, Gen, Fit, Acc>
where
    T: Terminal,
    O: Operator,
{
    /// Set the population size
    pub fn population_size(mut self, size: usize) -> Self {
        self.config.population_size = size;
        self
    }

    /// Set the maximum tree depth
    pub fn max_tree_depth(mut self, depth: usize) -> Self {
        self.config.max_tree_depth = depth;
        self
    }

    /// Set the per-offspring mutation probability
    pub fn mutation_probability(mut self, probability: f64) -> Self {
        self.config.mutation_probability = probability;
        self
    }

    /// Set the selection strategy
    pub fn selection(mut self, strategy: SelectionStrategy) -> Self {
        self.config.selection = strategy;
        self
    }

    /// Set the reproduction strategy
    pub fn reproduction(mut self, strategy: ReproductionStrategy) -> Self {
        self.config.reproduction = strategy;
        self
    }

    /// Set the tournament pool size
    pub fn tournament_size(mut self, size: usize) -> Self {
        self.config.tournament_size = size;
        self
    }

    /// Enable or disable parallel evaluation
    pub fn parallel_evaluation(mut self, enabled: bool) -> Self {
        self.config.parallel_evaluation = enabled;
        self
    }

    /// Replace the whole configuration
    pub fn config(mut self, config: GeneticProgramConfig) -> Self {
        self.config = config;
        self
    }

    /// Set the primitives handed to the generator
    pub fn primitives(mut self, primitives: PrimitiveSet<T, O>) -> Self {
        self.primitives = Some(primitives);
        self
    }

    /// Set the individual generator
    pub fn generator<NewGen>(
        self,
        generator: NewGen,
    ) -> GeneticProgramBuilder<T, O, NewGen, Fit, Acc>
    where
        NewGen: IndividualGenerator<T, O>,
    {
        GeneticProgramBuilder {
            config: self.config,
            primitives: self.primitives,
            generator: Some(generator),
            fitness: self.fitness,
            acceptance: self.acceptance,
            _phantom: PhantomData,
        }
    }

    /// Set the fitness function
    pub fn fitness<NewFit>(self, fitness: NewFit) -> GeneticProgramBuilder<T, O, Gen, NewFit, Acc>
    where
        NewFit: FitnessFunction<T, O>,
    {
        GeneticProgramBuilder {
            config: self.config,
            primitives: self.primitives,
            generator: self.generator,
            fitness: Some(fitness),
            acceptance: self.acceptance,
            _phantom: PhantomData,
        }
    }

    /// Set the acceptance criterion
    pub fn acceptance<NewAcc>(
        self,
        acceptance: NewAcc,
    ) -> GeneticProgramBuilder<T, O, Gen, Fit, NewAcc>
    where
        NewAcc: AcceptanceCriterion,
    {
        GeneticProgramBuilder {
            config: self.config,
            primitives: self.primitives,
            generator: self.generator,
            fitness: self.fitness,
            acceptance: Some(acceptance),
            _phantom: PhantomData,
        }
    }
}

impl<T, O, Gen, Fit, Acc> GeneticProgramBuilder<T, O, Gen, Fit, Acc>
where
    T: Terminal,
    O: Operator,
    Gen: IndividualGenerator<T, O>,
    Fit: FitnessFunction<T, O>,
    Acc: AcceptanceCriterion,
{
    /// Build the GeneticProgram instance
    pub fn build(self) -> EvoResult<GeneticProgram<T, O, Gen, Fit, Acc>> {
        self.config.validate()?;

        let primitives = self.primitives.ok_or_else(|| {
            EvolutionError::Configuration("Primitive set must be specified".to_string())
        })?;
        primitives
            .validate()
            .map_err(|e| EvolutionError::Configuration(e.to_string()))?;

        let generator = self.generator.ok_or_else(|| {
            EvolutionError::Configuration("Individual generator must be specified".to_string())
        })?;

        let fitness = self.fitness.ok_or_else(|| {
            EvolutionError::Configuration("Fitness function must be specified".to_string())
        })?;

        let acceptance = self.acceptance.ok_or_else(|| {
            EvolutionError::Configuration("Acceptance criterion must be specified".to_string())
        })?;

        let selection =
            Selection::from_strategy(self.config.selection, self.config.tournament_size);
        let reproduction =
            Recombination::from_strategy(self.config.reproduction, self.config.max_tree_depth);
        let mutation = SubtreeMutation::new(self.config.max_tree_depth);

        Ok(GeneticProgram {
            config: self.config,
            primitives,
            generator,
            fitness,
            acceptance,
            selection,
            reproduction,
            mutation,
            population: Population::new(),
            history: FitnessHistory::new(),
        })
    }
}

/// Tree-based genetic program
///
/// Owns the population across runs. The first [`GeneticProgram::run`]
/// initializes it; later runs continue from where the previous one left off
/// with fresh statistics.
pub struct GeneticProgram<T, O, Gen, Fit, Acc>
where
    T: Terminal,
    O: Operator,
{
    config: GeneticProgramConfig,
    primitives: PrimitiveSet<T, O>,
    generator: Gen,
    fitness: Fit,
    acceptance: Acc,
    selection: Selection,
    reproduction: Recombination,
    mutation: SubtreeMutation,
    population: Population<T, O>,
    history: FitnessHistory,
}

impl<T, O> GeneticProgram<T, O, (), (), ()>
where
    T: Terminal,
    O: Operator,
{
    /// Create a builder for GeneticProgram
    pub fn builder() -> GeneticProgramBuilder<T, O, (), (), ()> {
        GeneticProgramBuilder::new()
    }
}

impl<T, O, Gen, Fit, Acc> GeneticProgram<T, O, Gen, Fit, Acc>
where
    T: Terminal,
    O: Operator,
    Gen: IndividualGenerator<T, O>,
    Fit: FitnessFunction<T, O>,
    Acc: AcceptanceCriterion,
{
    /// Get the configuration
    pub fn config(&self) -> &GeneticProgramConfig {
        &self.config
    }

    /// Get the current population
    pub fn population(&self) -> &Population<T, O> {
        &self.population
    }

    /// Fitness history of the latest run
    pub fn history(&self) -> &FitnessHistory {
        &self.history
    }

    /// Replace the population with `population_size` fresh individuals
    pub fn initialize<R: Rng>(&mut self, rng: &mut R) -> EvoResult<()> {
        let size = self.config.population_size;
        let mut population = Population::with_capacity(size);
        for _ in 0..size {
            let tree = generate_within(
                &self.generator,
                self.config.max_tree_depth,
                &self.primitives,
                rng,
            )?;
            population.push(Individual::new(tree));
        }
        debug!(size, max_depth = self.config.max_tree_depth, "population initialized");
        self.population = population;
        Ok(())
    }

    /// Run for at most `generations` generations
    ///
    /// Stops early when the acceptance criterion accepts a generation's
    /// minimum fitness, returning that generation's best individual. On
    /// exhaustion the best individual seen in any generation is returned.
    pub fn run<R: Rng>(
        &mut self,
        generations: usize,
        rng: &mut R,
    ) -> EvoResult<EvolutionResult<T, O>> {
        if generations == 0 {
            return Err(EvolutionError::Configuration(
                "generation budget must be positive".to_string(),
            ));
        }

        let start_time = Instant::now();
        if self.population.is_empty() {
            self.initialize(rng)?;
        }
        self.history = FitnessHistory::new();

        let mut best: Option<(Tree<T, O>, f64)> = None;

        for generation in 1..=generations {
            let eval_start = Instant::now();
            self.evaluate();
            let stats = GenerationStats::from_population(&self.population, generation)?
                .with_evaluation_time(eval_start.elapsed());

            let improved = self
                .history
                .global_min()
                .map_or(true, |previous| stats.min_fitness < previous);
            if improved {
                best = Some((
                    self.population[stats.best_index].tree.clone(),
                    stats.min_fitness,
                ));
            }
            self.history.record(&stats);

            info!(
                generation,
                min = stats.min_fitness,
                mean = stats.mean_fitness,
                max = stats.max_fitness,
                "generation evaluated"
            );

            if self.acceptance.accept(stats.min_fitness) {
                let reason = self.acceptance.reason();
                info!(generation, fitness = stats.min_fitness, reason, "run accepted");
                return Ok(EvolutionResult {
                    best_individual: self.population[stats.best_index].tree.clone(),
                    best_fitness: stats.min_fitness,
                    generations: generation,
                    accepted: true,
                    termination_reason: reason.to_string(),
                    history: self.history.clone(),
                    total_runtime_ms: start_time.elapsed().as_secs_f64() * 1000.0,
                });
            }

            self.next_generation(rng)?;
        }

        let (best_individual, best_fitness) = best.ok_or(EvolutionError::EmptyPopulation)?;
        info!(generations, fitness = best_fitness, "generation budget exhausted");

        Ok(EvolutionResult {
            best_individual,
            best_fitness,
            generations,
            accepted: false,
            termination_reason: "Generation budget exhausted".to_string(),
            history: self.history.clone(),
            total_runtime_ms: start_time.elapsed().as_secs_f64() * 1000.0,
        })
    }

    fn evaluate(&mut self) {
        if self.config.parallel_evaluation {
            self.population.evaluate_parallel(&self.fitness);
        } else {
            self.population.evaluate(&self.fitness);
        }
    }

    /// Breed a full replacement population from the evaluated one
    fn next_generation<R: Rng>(&mut self, rng: &mut R) -> EvoResult<()> {
        let size = self.config.population_size;
        let birth = self.population.generation() + 1;
        let fitness: Vec<f64> = self
            .population
            .iter()
            .map(|i| i.fitness.unwrap_or(f64::INFINITY))
            .collect();

        let mut next: Population<T, O> = Population::with_capacity(size);
        while next.len() < size {
            let [first, second] = self.selection.select_parents(&fitness, rng)?;
            let parent1 = &self.population[first].tree;
            let parent2 = &self.population[second].tree;

            let offspring = self
                .reproduction
                .reproduce(parent1, parent2, rng)
                .map_err(|e| match e {
                    OperatorError::NoCandidates {
                        available_depth,
                        attempts,
                    } => EvolutionError::Configuration(format!(
                        "no subtree fits depth budget {} after {} attempts; \
                         max_tree_depth {} is below what the population can satisfy",
                        available_depth, attempts, self.config.max_tree_depth
                    )),
                    other => other.into(),
                })?;

            // Excess offspring from the last two-child reproduction are dropped.
            let remaining = size - next.len();
            for child in offspring.into_iter().take(remaining) {
                let child = if rng.gen::<f64>() < self.config.mutation_probability {
                    self.mutation
                        .mutate(child, &self.generator, &self.primitives, rng)?
                } else {
                    child
                };
                next.push(Individual::with_generation(child, birth));
            }
        }

        next.set_generation(birth);
        self.population = next;
        Ok(())
    }
}
