//! # fugue-gp
//!
//! Tree-based genetic programming for Rust.
//!
//! This library evolves binary expression trees toward a minimum of a
//! caller-supplied cost, using tournament or uniform parent selection,
//! subtree crossover (single-child or reciprocal), and subtree mutation under
//! a fixed maximum depth.
//!
//! ## Core Concepts
//!
//! - **Trees**: owned binary trees with cached sizes, addressed by pre-order index
//! - **Collaborators**: generator, fitness and acceptance are traits injected through the builder
//! - **Reproducibility**: every random draw comes from the `Rng` passed to `run`
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use fugue_gp::prelude::*;
//! use rand::SeedableRng;
//!
//! let mut rng = rand::rngs::StdRng::seed_from_u64(42);
//!
//! let primitives = PrimitiveSet::new(
//!     vec![ArithmeticTerminal::Constant(1.0), ArithmeticTerminal::Constant(2.0)],
//!     ArithmeticOperator::all(),
//! )
//! .with_variables(vec![ArithmeticTerminal::Variable(0)], 0.5);
//!
//! let result = GeneticProgramBuilder::new()
//!     .population_size(200)
//!     .max_tree_depth(5)
//!     .primitives(primitives)
//!     .generator(RampedHalfAndHalf::default())
//!     .fitness(SymbolicRegressionFitness::from_points(&points))
//!     .acceptance(FitnessThreshold::new(1e-6))
//!     .build()?
//!     .run(100, &mut rng)?;
//! ```

pub mod algorithms;
pub mod diagnostics;
pub mod error;
pub mod fitness;
pub mod genome;
pub mod operators;
pub mod population;
pub mod termination;

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::algorithms::prelude::*;
    pub use crate::diagnostics::prelude::*;
    pub use crate::error::*;
    pub use crate::fitness::prelude::*;
    pub use crate::genome::prelude::*;
    pub use crate::operators::prelude::*;
    pub use crate::population::prelude::*;
    pub use crate::termination::prelude::*;
}
