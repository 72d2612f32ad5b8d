//! Fitness traits
//!
//! This module defines the fitness evaluation traits. Fitness is a cost:
//! lower values are better.

use crate::genome::tree::{Operator, Terminal, Tree};

/// Fitness evaluation trait
///
/// Implementations must be pure: evaluating the same tree twice yields the
/// same value and never changes the tree.
#[cfg(feature = "parallel")]
pub trait FitnessFunction<T: Terminal, O: Operator>: Send + Sync {
    /// Evaluate the cost of a tree (lower = better)
    fn evaluate(&self, tree: &Tree<T, O>) -> f64;
}

/// Fitness evaluation trait (non-parallel version)
///
/// Implementations must be pure: evaluating the same tree twice yields the
/// same value and never changes the tree.
#[cfg(not(feature = "parallel"))]
pub trait FitnessFunction<T: Terminal, O: Operator> {
    /// Evaluate the cost of a tree (lower = better)
    fn evaluate(&self, tree: &Tree<T, O>) -> f64;
}

/// A simple function wrapper for fitness evaluation
pub struct FnFitness<F> {
    f: F,
}

impl<F> FnFitness<F> {
    /// Create a new function-based fitness evaluator
    pub fn new(f: F) -> Self {
        Self { f }
    }
}

#[cfg(feature = "parallel")]
impl<T, O, F> FitnessFunction<T, O> for FnFitness<F>
where
    T: Terminal,
    O: Operator,
    F: Fn(&Tree<T, O>) -> f64 + Send + Sync,
{
    fn evaluate(&self, tree: &Tree<T, O>) -> f64 {
        (self.f)(tree)
    }
}

#[cfg(not(feature = "parallel"))]
impl<T, O, F> FitnessFunction<T, O> for FnFitness<F>
where
    T: Terminal,
    O: Operator,
    F: Fn(&Tree<T, O>) -> f64,
{
    fn evaluate(&self, tree: &Tree<T, O>) -> f64 {
        (self.f)(tree)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::genome::tree::{ArithmeticOperator, ArithmeticTerminal};

    #[test]
    fn test_fn_fitness() {
        let fitness = FnFitness::new(|t: &Tree| -> f64 { t.size() as f64 });

        let tree: Tree = Tree::node(
            ArithmeticOperator::Add,
            Tree::leaf(ArithmeticTerminal::Constant(1.0)),
            Tree::leaf(ArithmeticTerminal::Constant(2.0)),
        );
        assert_eq!(fitness.evaluate(&tree), 3.0);
    }
}
