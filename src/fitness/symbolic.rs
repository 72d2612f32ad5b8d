//! Ready-made fitness functions for symbolic regression
//!
//! Non-finite errors are reported as `f64::INFINITY` so that a degenerate
//! expression ranks last instead of poisoning the statistics with NaN.

use serde::{Deserialize, Serialize};

use crate::fitness::traits::FitnessFunction;
use crate::genome::tree::{Operator, Terminal, Tree};

fn finite_or_infinite(error: f64) -> f64 {
    if error.is_nan() {
        f64::INFINITY
    } else {
        error
    }
}

/// Absolute distance between the tree's value and a target
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct TargetValueFitness {
    /// Value the expression should produce
    pub target: f64,
    /// Variable bindings used to evaluate the tree
    pub variables: Vec<f64>,
}

impl TargetValueFitness {
    /// Target a constant expression
    pub fn new(target: f64) -> Self {
        Self {
            target,
            variables: Vec::new(),
        }
    }

    /// Evaluate with the given variable bindings
    pub fn with_variables(mut self, variables: Vec<f64>) -> Self {
        self.variables = variables;
        self
    }
}

impl<T: Terminal, O: Operator> FitnessFunction<T, O> for TargetValueFitness {
    fn evaluate(&self, tree: &Tree<T, O>) -> f64 {
        finite_or_infinite((tree.evaluate(&self.variables) - self.target).abs())
    }
}

/// Mean absolute error over `(inputs, expected)` samples
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct SymbolicRegressionFitness {
    samples: Vec<(Vec<f64>, f64)>,
}

impl SymbolicRegressionFitness {
    /// Create from samples of `(variable bindings, expected output)`
    pub fn new(samples: Vec<(Vec<f64>, f64)>) -> Self {
        Self { samples }
    }

    /// Create from one-variable `(x, y)` pairs
    pub fn from_points(points: &[(f64, f64)]) -> Self {
        Self::new(points.iter().map(|&(x, y)| (vec![x], y)).collect())
    }

    /// Number of samples
    pub fn len(&self) -> usize {
        self.samples.len()
    }

    /// Check if there are no samples
    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }
}

impl<T: Terminal, O: Operator> FitnessFunction<T, O> for SymbolicRegressionFitness {
    fn evaluate(&self, tree: &Tree<T, O>) -> f64 {
        if self.samples.is_empty() {
            return 0.0;
        }
        let total: f64 = self
            .samples
            .iter()
            .map(|(inputs, expected)| (tree.evaluate(inputs) - expected).abs())
            .sum();
        finite_or_infinite(total / self.samples.len() as f64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::genome::tree::{ArithmeticOperator, ArithmeticTerminal};

    fn x_plus_one() -> Tree {
        Tree::node(
            ArithmeticOperator::Add,
            Tree::leaf(ArithmeticTerminal::Variable(0)),
            Tree::leaf(ArithmeticTerminal::Constant(1.0)),
        )
    }

    #[test]
    fn test_target_value_fitness() {
        let fitness = TargetValueFitness::new(10.0).with_variables(vec![4.0]);
        assert_eq!(fitness.evaluate(&x_plus_one()), 5.0);
    }

    #[test]
    fn test_symbolic_regression_exact_fit() {
        let points: Vec<(f64, f64)> = (-3..=3).map(|i| (i as f64, i as f64 + 1.0)).collect();
        let fitness = SymbolicRegressionFitness::from_points(&points);
        assert_eq!(fitness.len(), 7);
        assert_eq!(fitness.evaluate(&x_plus_one()), 0.0);
    }

    #[test]
    fn test_symbolic_regression_mean_error() {
        let fitness = SymbolicRegressionFitness::from_points(&[(0.0, 0.0), (1.0, 0.0)]);
        // predictions 1 and 2 -> errors 1 and 2 -> mean 1.5
        assert_eq!(fitness.evaluate(&x_plus_one()), 1.5);
    }

    #[test]
    fn test_nan_becomes_infinity() {
        let tree: Tree = Tree::node(
            ArithmeticOperator::Sub,
            Tree::leaf(ArithmeticTerminal::Constant(f64::INFINITY)),
            Tree::leaf(ArithmeticTerminal::Constant(f64::INFINITY)),
        );
        let fitness = TargetValueFitness::new(0.0);
        assert_eq!(fitness.evaluate(&tree), f64::INFINITY);
    }
}
