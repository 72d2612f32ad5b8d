//! Genome types
//!
//! This module provides the binary expression tree and its random generators.

pub mod generator;
pub mod tree;

pub mod prelude {
    pub use super::generator::*;
    pub use super::tree::*;
}
