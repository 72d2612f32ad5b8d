//! Fitness evaluation
//!
//! This module provides the fitness abstraction and symbolic regression costs.

pub mod symbolic;
pub mod traits;

pub mod prelude {
    pub use super::symbolic::*;
    pub use super::traits::*;
}
