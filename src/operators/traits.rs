//! Operator traits
//!
//! This module defines the core operator traits for genetic programming.

use rand::Rng;

use crate::error::OperatorError;
use crate::genome::tree::{Operator, Terminal, Tree};

/// Parent selection trait
///
/// Chooses two distinct parents from an evaluated population.
pub trait ParentSelection {
    /// Select two distinct population indices
    ///
    /// `fitness[i]` is the cost of individual `i` (lower = better).
    fn select_parents<R: Rng>(
        &self,
        fitness: &[f64],
        rng: &mut R,
    ) -> Result<[usize; 2], OperatorError>;
}

/// Reproduction operator trait
///
/// Combines genetic material from two parents. Parents are only read;
/// offspring are fresh trees.
pub trait Reproduction<T: Terminal, O: Operator> {
    /// Produce offspring from two parents
    fn reproduce<R: Rng>(
        &self,
        parent1: &Tree<T, O>,
        parent2: &Tree<T, O>,
        rng: &mut R,
    ) -> Result<Vec<Tree<T, O>>, OperatorError>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::genome::tree::{ArithmeticOperator, ArithmeticTerminal};

    // Mock selection operator for testing
    struct FirstTwo;

    impl ParentSelection for FirstTwo {
        fn select_parents<R: Rng>(
            &self,
            fitness: &[f64],
            _rng: &mut R,
        ) -> Result<[usize; 2], OperatorError> {
            if fitness.len() < 2 {
                return Err(OperatorError::InsufficientPopulation { size: fitness.len() });
            }
            Ok([0, 1])
        }
    }

    // Mock reproduction operator for testing
    struct Swap;

    impl Reproduction<ArithmeticTerminal, ArithmeticOperator> for Swap {
        fn reproduce<R: Rng>(
            &self,
            parent1: &Tree,
            parent2: &Tree,
            _rng: &mut R,
        ) -> Result<Vec<Tree>, OperatorError> {
            Ok(vec![parent2.clone(), parent1.clone()])
        }
    }

    #[test]
    fn test_mock_selection() {
        let mut rng = rand::thread_rng();
        assert_eq!(FirstTwo.select_parents(&[1.0, 2.0, 3.0], &mut rng), Ok([0, 1]));
        assert!(FirstTwo.select_parents(&[1.0], &mut rng).is_err());
    }

    #[test]
    fn test_mock_reproduction() {
        let mut rng = rand::thread_rng();
        let a: Tree = Tree::leaf(ArithmeticTerminal::Constant(1.0));
        let b: Tree = Tree::leaf(ArithmeticTerminal::Constant(2.0));

        let offspring = Swap.reproduce(&a, &b, &mut rng).unwrap();
        assert_eq!(offspring.len(), 2);
        assert_eq!(offspring[0], b);
        assert_eq!(offspring[1], a);
    }
}
