//! Population type
//!
//! This module provides the Population container type.

#[cfg(feature = "parallel")]
use rayon::prelude::*;

use crate::fitness::traits::FitnessFunction;
use crate::genome::tree::{Operator, Terminal, Tree};
use crate::population::individual::Individual;

/// A population of individuals
#[derive(Clone, Debug)]
pub struct Population<T: Terminal, O: Operator> {
    /// The individuals in this population
    individuals: Vec<Individual<T, O>>,
    /// Current generation number
    generation: usize,
}

impl<T: Terminal, O: Operator> Default for Population<T, O> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Terminal, O: Operator> Population<T, O> {
    /// Create an empty population
    pub fn new() -> Self {
        Self {
            individuals: Vec::new(),
            generation: 0,
        }
    }

    /// Create a population with the given capacity
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            individuals: Vec::with_capacity(capacity),
            generation: 0,
        }
    }

    /// Create a population of unevaluated trees
    pub fn from_trees(trees: Vec<Tree<T, O>>) -> Self {
        Self {
            individuals: trees.into_iter().map(Individual::new).collect(),
            generation: 0,
        }
    }

    /// Get the current generation
    pub fn generation(&self) -> usize {
        self.generation
    }

    /// Set the generation number
    pub fn set_generation(&mut self, generation: usize) {
        self.generation = generation;
    }

    /// Get the population size
    pub fn len(&self) -> usize {
        self.individuals.len()
    }

    /// Check if the population is empty
    pub fn is_empty(&self) -> bool {
        self.individuals.is_empty()
    }

    /// Get an individual by index
    pub fn get(&self, index: usize) -> Option<&Individual<T, O>> {
        self.individuals.get(index)
    }

    /// Add an individual to the population
    pub fn push(&mut self, individual: Individual<T, O>) {
        self.individuals.push(individual);
    }

    /// Get an iterator over the individuals
    pub fn iter(&self) -> impl Iterator<Item = &Individual<T, O>> {
        self.individuals.iter()
    }

    /// Get the underlying slice of individuals
    pub fn individuals(&self) -> &[Individual<T, O>] {
        &self.individuals
    }

    /// Get the trees in population order
    pub fn trees(&self) -> impl Iterator<Item = &Tree<T, O>> {
        self.individuals.iter().map(|i| &i.tree)
    }

    /// Fitness of every individual, `None` where not yet evaluated
    pub fn fitness_values(&self) -> Vec<Option<f64>> {
        self.individuals.iter().map(|i| i.fitness).collect()
    }

    /// Check if all individuals have been evaluated
    pub fn all_evaluated(&self) -> bool {
        self.individuals.iter().all(|i| i.is_evaluated())
    }

    /// Index of the evaluated individual with the lowest fitness
    ///
    /// Ties resolve to the first occurrence.
    pub fn best_index(&self) -> Option<usize> {
        let mut best: Option<(usize, f64)> = None;
        for (index, individual) in self.individuals.iter().enumerate() {
            if let Some(f) = individual.fitness {
                match best {
                    Some((_, current)) if f >= current => {}
                    _ => best = Some((index, f)),
                }
            }
        }
        best.map(|(index, _)| index)
    }

    /// Evaluate all individuals using the given fitness function (sequential)
    pub fn evaluate<Fit>(&mut self, fitness: &Fit)
    where
        Fit: FitnessFunction<T, O>,
    {
        for individual in &mut self.individuals {
            if !individual.is_evaluated() {
                let f = fitness.evaluate(&individual.tree);
                individual.set_fitness(f);
            }
        }
    }
}

/// Parallel evaluation support (requires `parallel` feature)
#[cfg(feature = "parallel")]
impl<T: Terminal, O: Operator> Population<T, O> {
    /// Evaluate all individuals using the given fitness function (parallel)
    pub fn evaluate_parallel<Fit>(&mut self, fitness: &Fit)
    where
        Fit: FitnessFunction<T, O>,
    {
        self.individuals
            .par_iter_mut()
            .filter(|i| !i.is_evaluated())
            .for_each(|individual| {
                let f = fitness.evaluate(&individual.tree);
                individual.set_fitness(f);
            });
    }
}

/// Sequential fallback for parallel evaluation (when `parallel` feature is disabled)
#[cfg(not(feature = "parallel"))]
impl<T: Terminal, O: Operator> Population<T, O> {
    /// Evaluate all individuals (falls back to sequential)
    pub fn evaluate_parallel<Fit>(&mut self, fitness: &Fit)
    where
        Fit: FitnessFunction<T, O>,
    {
        self.evaluate(fitness);
    }
}

impl<T: Terminal, O: Operator> std::ops::Index<usize> for Population<T, O> {
    type Output = Individual<T, O>;

    fn index(&self, index: usize) -> &Self::Output {
        &self.individuals[index]
    }
}
