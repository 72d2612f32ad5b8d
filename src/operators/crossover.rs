//! Crossover operators
//!
//! Subtree exchange between two parent trees under a maximum depth. The
//! crossover point in the first parent is drawn uniformly over its nodes;
//! replacement material comes from [`Tree::get_sub_trees_by_level`] on the
//! second parent, so the offspring never grows past `max_depth` as long as
//! the donor respects it.

use std::fmt;
use std::str::FromStr;

use rand::Rng;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::error::{EvolutionError, OperatorError};
use crate::genome::tree::{Operator, Terminal, Tree};
use crate::operators::traits::Reproduction;

/// Bound on candidate queries before variant crossover gives up
pub const CANDIDATE_RETRY_LIMIT: usize = 8;

/// Reproduction strategy named in the configuration
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReproductionStrategy {
    /// One offspring; the donor's vacated material is discarded
    #[default]
    Crossover,
    /// Two offspring by reciprocal exchange
    VariantCrossover,
}

impl FromStr for ReproductionStrategy {
    type Err = EvolutionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "crossover" => Ok(Self::Crossover),
            "variant_crossover" => Ok(Self::VariantCrossover),
            other => Err(EvolutionError::Configuration(format!(
                "unknown reproduction strategy '{}'",
                other
            ))),
        }
    }
}

impl fmt::Display for ReproductionStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Crossover => write!(f, "crossover"),
            Self::VariantCrossover => write!(f, "variant_crossover"),
        }
    }
}

/// Draw the crossover point: a uniform node index and its level
fn crossover_point<T, O, R>(
    tree: &Tree<T, O>,
    rng: &mut R,
) -> Result<(usize, usize), OperatorError>
where
    T: Terminal,
    O: Operator,
    R: Rng,
{
    let index = rng.gen_range(0..tree.size());
    let (level, _) = tree.get_sub_tree(index)?;
    Ok((index, level))
}

/// Pick one candidate; a single candidate is taken without a draw
fn pick_candidate<'a, T, O, R>(
    candidates: &[(usize, &'a Tree<T, O>)],
    rng: &mut R,
) -> Option<(usize, &'a Tree<T, O>)>
where
    T: Terminal,
    O: Operator,
    R: Rng,
{
    match candidates.len() {
        0 => None,
        1 => Some(candidates[0]),
        n => Some(candidates[rng.gen_range(0..n)]),
    }
}

/// Standard subtree crossover
///
/// Grafts a subtree of the second parent into a copy of the first. Produces
/// a single offspring.
#[derive(Clone, Debug)]
pub struct SubtreeCrossover {
    /// Maximum depth of any offspring
    pub max_depth: usize,
}

impl SubtreeCrossover {
    /// Create a new subtree crossover bounded by `max_depth`
    pub fn new(max_depth: usize) -> Self {
        Self { max_depth }
    }
}

impl<T: Terminal, O: Operator> Reproduction<T, O> for SubtreeCrossover {
    fn reproduce<R: Rng>(
        &self,
        parent1: &Tree<T, O>,
        parent2: &Tree<T, O>,
        rng: &mut R,
    ) -> Result<Vec<Tree<T, O>>, OperatorError> {
        let (index, level) = crossover_point(parent1, rng)?;
        let available_depth = self.max_depth.saturating_sub(level);

        let candidates = parent2.get_sub_trees_by_level(available_depth, self.max_depth);
        let (donor_index, donor) =
            pick_candidate(&candidates, rng).ok_or(OperatorError::NoCandidates {
                available_depth,
                attempts: 1,
            })?;
        debug!(
            index,
            level,
            donor_index,
            candidates = candidates.len(),
            "subtree crossover"
        );

        let (offspring, _) = parent1.copy().graft(index, donor.copy())?;
        Ok(vec![offspring])
    }
}

/// Reciprocal subtree crossover
///
/// Swaps a subtree of the first parent with a depth-compatible subtree of
/// the second, returning both offspring. Node payloads are conserved across
/// the pair. The first offspring respects `max_depth`; the second can exceed
/// it when the first parent's detached subtree is deeper than the slot it
/// lands in.
#[derive(Clone, Debug)]
pub struct VariantCrossover {
    /// Maximum depth used for the candidate query
    pub max_depth: usize,
}

impl VariantCrossover {
    /// Create a new variant crossover bounded by `max_depth`
    pub fn new(max_depth: usize) -> Self {
        Self { max_depth }
    }

    fn query_candidates<'a, T: Terminal, O: Operator>(
        &self,
        donor: &'a Tree<T, O>,
        available_depth: usize,
    ) -> Result<Vec<(usize, &'a Tree<T, O>)>, OperatorError> {
        for attempt in 1..=CANDIDATE_RETRY_LIMIT {
            let candidates = donor.get_sub_trees_by_level(available_depth, self.max_depth);
            if !candidates.is_empty() {
                return Ok(candidates);
            }
            warn!(
                attempt,
                available_depth,
                "candidate query returned no subtrees, retrying"
            );
        }
        Err(OperatorError::NoCandidates {
            available_depth,
            attempts: CANDIDATE_RETRY_LIMIT,
        })
    }
}

impl<T: Terminal, O: Operator> Reproduction<T, O> for VariantCrossover {
    fn reproduce<R: Rng>(
        &self,
        parent1: &Tree<T, O>,
        parent2: &Tree<T, O>,
        rng: &mut R,
    ) -> Result<Vec<Tree<T, O>>, OperatorError> {
        let (index, level) = crossover_point(parent1, rng)?;
        let available_depth = self.max_depth.saturating_sub(level);

        let candidates = self.query_candidates(parent2, available_depth)?;
        let (donor_index, donor) =
            pick_candidate(&candidates, rng).ok_or(OperatorError::NoCandidates {
                available_depth,
                attempts: CANDIDATE_RETRY_LIMIT,
            })?;
        let donor = donor.copy();
        debug!(
            index,
            level,
            donor_index,
            candidates = candidates.len(),
            "variant crossover"
        );

        let (first, detached) = parent1.copy().graft(index, donor)?;
        let (second, _) = parent2.copy().graft(donor_index, detached)?;
        Ok(vec![first, second])
    }
}

/// Reproduction operator resolved from a [`ReproductionStrategy`]
#[derive(Clone, Debug)]
pub enum Recombination {
    /// Single-offspring crossover
    Subtree(SubtreeCrossover),
    /// Two-offspring reciprocal crossover
    Variant(VariantCrossover),
}

impl Recombination {
    /// Resolve a configured strategy into an operator
    pub fn from_strategy(strategy: ReproductionStrategy, max_depth: usize) -> Self {
        match strategy {
            ReproductionStrategy::Crossover => Self::Subtree(SubtreeCrossover::new(max_depth)),
            ReproductionStrategy::VariantCrossover => {
                Self::Variant(VariantCrossover::new(max_depth))
            }
        }
    }
}

impl<T: Terminal, O: Operator> Reproduction<T, O> for Recombination {
    fn reproduce<R: Rng>(
        &self,
        parent1: &Tree<T, O>,
        parent2: &Tree<T, O>,
        rng: &mut R,
    ) -> Result<Vec<Tree<T, O>>, OperatorError> {
        match self {
            Self::Subtree(op) => op.reproduce(parent1, parent2, rng),
            Self::Variant(op) => op.reproduce(parent1, parent2, rng),
        }
    }
}
