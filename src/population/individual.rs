//! Individual wrapper type
//!
//! This module provides the Individual type that wraps a tree with its fitness.

use serde::{Deserialize, Serialize};

use crate::genome::tree::{Operator, Terminal, Tree};

/// An individual in the population
///
/// Wraps a tree with its computed cost and the generation it was born in.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(bound = "")]
pub struct Individual<T: Terminal, O: Operator> {
    /// The expression tree of this individual
    pub tree: Tree<T, O>,
    /// The fitness value (None if not yet evaluated)
    pub fitness: Option<f64>,
    /// Generation when this individual was created
    pub birth_generation: usize,
}

impl<T: Terminal, O: Operator> Individual<T, O> {
    /// Create a new individual with an unevaluated tree
    pub fn new(tree: Tree<T, O>) -> Self {
        Self {
            tree,
            fitness: None,
            birth_generation: 0,
        }
    }

    /// Create a new individual with birth generation
    pub fn with_generation(tree: Tree<T, O>, generation: usize) -> Self {
        Self {
            tree,
            fitness: None,
            birth_generation: generation,
        }
    }

    /// Check if this individual has been evaluated
    pub fn is_evaluated(&self) -> bool {
        self.fitness.is_some()
    }

    /// Set the fitness value
    pub fn set_fitness(&mut self, fitness: f64) {
        self.fitness = Some(fitness);
    }

    /// Take the tree out of this individual
    pub fn into_tree(self) -> Tree<T, O> {
        self.tree
    }

    /// Get a reference to the tree
    pub fn tree(&self) -> &Tree<T, O> {
        &self.tree
    }

    /// Age of this individual (generations since birth)
    pub fn age(&self, current_generation: usize) -> usize {
        current_generation.saturating_sub(self.birth_generation)
    }
}
