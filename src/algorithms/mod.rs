//! Evolutionary algorithms
//!
//! This module provides the generational genetic programming engine.

pub mod genetic_program;

pub mod prelude {
    pub use super::genetic_program::*;
}
