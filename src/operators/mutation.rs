//! Mutation operators
//!
//! Subtree mutation: a random node is replaced by a freshly generated tree
//! whose depth fits the remaining budget below that node.

use rand::Rng;
use tracing::debug;

use crate::error::{EvoResult, EvolutionError};
use crate::genome::generator::{IndividualGenerator, PrimitiveSet};
use crate::genome::tree::{Operator, Terminal, Tree};

/// Ask `generator` for a tree and check it honours `depth_budget`
pub fn generate_within<T, O, G, R>(
    generator: &G,
    depth_budget: usize,
    primitives: &PrimitiveSet<T, O>,
    rng: &mut R,
) -> EvoResult<Tree<T, O>>
where
    T: Terminal,
    O: Operator,
    G: IndividualGenerator<T, O>,
    R: Rng,
{
    let tree = generator.generate(depth_budget, primitives, rng)?;
    let depth = tree.depth();
    if depth > depth_budget {
        return Err(EvolutionError::GeneratorContract {
            requested: depth_budget,
            actual: depth,
        });
    }
    Ok(tree)
}

/// Subtree mutation
#[derive(Clone, Debug)]
pub struct SubtreeMutation {
    /// Maximum depth of a mutated individual
    pub max_depth: usize,
}

impl SubtreeMutation {
    /// Create a new subtree mutation bounded by `max_depth`
    pub fn new(max_depth: usize) -> Self {
        Self { max_depth }
    }

    /// Replace a uniformly chosen subtree of `tree`
    ///
    /// At index 0 the whole individual is replaced by the generated tree.
    pub fn mutate<T, O, G, R>(
        &self,
        tree: Tree<T, O>,
        generator: &G,
        primitives: &PrimitiveSet<T, O>,
        rng: &mut R,
    ) -> EvoResult<Tree<T, O>>
    where
        T: Terminal,
        O: Operator,
        G: IndividualGenerator<T, O>,
        R: Rng,
    {
        let index = rng.gen_range(0..tree.size());
        let (level, _) = tree.get_sub_tree(index)?;
        let depth_budget = self.max_depth.saturating_sub(level);

        let replacement = generate_within(generator, depth_budget, primitives, rng)?;
        debug!(index, level, depth_budget, "subtree mutation");

        let (mutated, _) = tree.graft(index, replacement)?;
        Ok(mutated)
    }
}
