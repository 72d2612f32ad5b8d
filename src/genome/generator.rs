//! Random tree generation
//!
//! The engine never builds trees itself: it asks an [`IndividualGenerator`]
//! for a tree no deeper than a given budget, handing over the
//! [`PrimitiveSet`] untouched.

use rand::seq::SliceRandom;
use rand::{Rng, RngCore};
use serde::{Deserialize, Serialize};

use crate::error::GenomeError;
use crate::genome::tree::{
    ArithmeticOperator, ArithmeticTerminal, Operator, Terminal, Tree,
};

/// Alphabet available to a generator
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(bound = "")]
pub struct PrimitiveSet<T: Terminal = ArithmeticTerminal, O: Operator = ArithmeticOperator> {
    /// Leaf values
    pub terminals: Vec<T>,
    /// Binary operators for internal nodes
    pub operators: Vec<O>,
    /// Variable leaves, drawn with probability `variables_prob`
    pub variables: Vec<T>,
    /// Probability that a leaf is drawn from `variables`
    pub variables_prob: f64,
}

impl<T: Terminal, O: Operator> PrimitiveSet<T, O> {
    /// Create a primitive set without variables
    pub fn new(terminals: Vec<T>, operators: Vec<O>) -> Self {
        Self {
            terminals,
            operators,
            variables: Vec::new(),
            variables_prob: 0.0,
        }
    }

    /// Add variable leaves and the probability of picking one
    pub fn with_variables(mut self, variables: Vec<T>, variables_prob: f64) -> Self {
        self.variables = variables;
        self.variables_prob = variables_prob;
        self
    }

    /// Check that at least one leaf value exists and the probability is sane
    pub fn validate(&self) -> Result<(), GenomeError> {
        if self.terminals.is_empty() && self.variables.is_empty() {
            return Err(GenomeError::InvalidStructure(
                "primitive set has no terminals or variables".to_string(),
            ));
        }
        if !(0.0..=1.0).contains(&self.variables_prob) {
            return Err(GenomeError::InvalidStructure(format!(
                "variables_prob must be in [0, 1], got {}",
                self.variables_prob
            )));
        }
        Ok(())
    }

    /// Draw a leaf value
    pub fn random_terminal<R: Rng + ?Sized>(&self, rng: &mut R) -> Result<T, GenomeError> {
        let use_variable = !self.variables.is_empty()
            && (self.terminals.is_empty() || rng.gen::<f64>() < self.variables_prob);
        let pool = if use_variable {
            &self.variables
        } else {
            &self.terminals
        };
        pool.choose(rng).cloned().ok_or_else(|| {
            GenomeError::InvalidStructure("primitive set has no terminals or variables".to_string())
        })
    }

    /// Draw an operator, if any are available
    pub fn random_operator<R: Rng + ?Sized>(&self, rng: &mut R) -> Option<O> {
        self.operators.choose(rng).cloned()
    }
}

/// Produces random individuals for a depth budget
pub trait IndividualGenerator<T: Terminal, O: Operator> {
    /// Generate a tree whose depth does not exceed `depth_budget`
    fn generate<R: Rng>(
        &self,
        depth_budget: usize,
        primitives: &PrimitiveSet<T, O>,
        rng: &mut R,
    ) -> Result<Tree<T, O>, GenomeError>;
}

/// "Grow" initialization: leaves may appear at any level
#[derive(Clone, Debug)]
pub struct GrowGenerator {
    /// Probability of stopping with a leaf above the depth limit
    pub terminal_prob: f64,
}

impl GrowGenerator {
    /// Create a grow generator with the given early-leaf probability
    pub fn new(terminal_prob: f64) -> Self {
        assert!(
            (0.0..=1.0).contains(&terminal_prob),
            "Terminal probability must be in [0, 1]"
        );
        Self { terminal_prob }
    }
}

impl Default for GrowGenerator {
    fn default() -> Self {
        Self::new(0.3)
    }
}

impl<T: Terminal, O: Operator> IndividualGenerator<T, O> for GrowGenerator {
    fn generate<R: Rng>(
        &self,
        depth_budget: usize,
        primitives: &PrimitiveSet<T, O>,
        rng: &mut R,
    ) -> Result<Tree<T, O>, GenomeError> {
        if depth_budget == 0 || rng.gen::<f64>() < self.terminal_prob {
            return Ok(Tree::leaf(primitives.random_terminal(rng)?));
        }
        match primitives.random_operator(rng) {
            Some(op) => {
                let left = self.generate(depth_budget - 1, primitives, rng)?;
                let right = self.generate(depth_budget - 1, primitives, rng)?;
                Ok(Tree::node(op, left, right))
            }
            None => Ok(Tree::leaf(primitives.random_terminal(rng)?)),
        }
    }
}

/// "Full" initialization: every leaf sits exactly at the depth budget
#[derive(Clone, Debug, Default)]
pub struct FullGenerator;

impl<T: Terminal, O: Operator> IndividualGenerator<T, O> for FullGenerator {
    fn generate<R: Rng>(
        &self,
        depth_budget: usize,
        primitives: &PrimitiveSet<T, O>,
        rng: &mut R,
    ) -> Result<Tree<T, O>, GenomeError> {
        if depth_budget == 0 {
            return Ok(Tree::leaf(primitives.random_terminal(rng)?));
        }
        match primitives.random_operator(rng) {
            Some(op) => {
                let left = self.generate(depth_budget - 1, primitives, rng)?;
                let right = self.generate(depth_budget - 1, primitives, rng)?;
                Ok(Tree::node(op, left, right))
            }
            None => Ok(Tree::leaf(primitives.random_terminal(rng)?)),
        }
    }
}

/// Ramped half-and-half: random target depth, then full or grow
#[derive(Clone, Debug)]
pub struct RampedHalfAndHalf {
    /// Smallest target depth (capped by the budget)
    pub min_depth: usize,
    /// Grow generator used for the "half" that is not full
    pub grow: GrowGenerator,
}

impl RampedHalfAndHalf {
    /// Create a ramped generator starting at `min_depth`
    pub fn new(min_depth: usize) -> Self {
        Self {
            min_depth,
            grow: GrowGenerator::default(),
        }
    }
}

impl Default for RampedHalfAndHalf {
    fn default() -> Self {
        Self::new(1)
    }
}

impl<T: Terminal, O: Operator> IndividualGenerator<T, O> for RampedHalfAndHalf {
    fn generate<R: Rng>(
        &self,
        depth_budget: usize,
        primitives: &PrimitiveSet<T, O>,
        rng: &mut R,
    ) -> Result<Tree<T, O>, GenomeError> {
        let depth = rng.gen_range(self.min_depth.min(depth_budget)..=depth_budget);
        if rng.gen() {
            FullGenerator.generate(depth, primitives, rng)
        } else {
            self.grow.generate(depth, primitives, rng)
        }
    }
}

/// A closure wrapper for caller-supplied generation policies
pub struct FnGenerator<F> {
    func: F,
}

impl<F> FnGenerator<F> {
    /// Wrap a closure `(depth_budget, primitives, rng) -> tree`
    pub fn new(func: F) -> Self {
        Self { func }
    }
}

impl<T, O, F> IndividualGenerator<T, O> for FnGenerator<F>
where
    T: Terminal,
    O: Operator,
    F: Fn(usize, &PrimitiveSet<T, O>, &mut dyn RngCore) -> Result<Tree<T, O>, GenomeError>,
{
    fn generate<R: Rng>(
        &self,
        depth_budget: usize,
        primitives: &PrimitiveSet<T, O>,
        rng: &mut R,
    ) -> Result<Tree<T, O>, GenomeError> {
        (self.func)(depth_budget, primitives, rng)
    }
}
