//! Error types for fugue-gp
//!
//! This module defines all error types used throughout the library.

use thiserror::Error;

/// Error type for tree structure operations
#[derive(Debug, Error, Clone, PartialEq)]
pub enum GenomeError {
    /// A pre-order index did not address any node of the tree
    #[error("Subtree index {index} out of range for tree of size {size}")]
    IndexOutOfRange { index: usize, size: usize },

    /// Invalid tree structure
    #[error("Invalid tree structure: {0}")]
    InvalidStructure(String),
}

/// Error type for operator failures
#[derive(Debug, Error, Clone, PartialEq)]
pub enum OperatorError {
    /// The donor tree offered no subtree fitting the depth budget
    #[error("No candidate subtree fits depth budget {available_depth} after {attempts} attempts")]
    NoCandidates {
        available_depth: usize,
        attempts: usize,
    },

    /// Too few individuals to draw two distinct parents
    #[error("Selection needs at least 2 individuals, population has {size}")]
    InsufficientPopulation { size: usize },

    /// Structural failure while grafting
    #[error("Genome error: {0}")]
    Genome(#[from] GenomeError),
}

/// Top-level error type for evolution operations
#[derive(Debug, Error)]
pub enum EvolutionError {
    /// Genome error
    #[error("Genome error: {0}")]
    Genome(#[from] GenomeError),

    /// Operator error
    #[error("Operator error: {0}")]
    Operator(#[from] OperatorError),

    /// Invalid configuration
    #[error("Invalid configuration: {0}")]
    Configuration(String),

    /// The individual generator returned a tree deeper than requested
    #[error("Generator returned a tree of depth {actual} for a depth budget of {requested}")]
    GeneratorContract { requested: usize, actual: usize },

    /// The fitness function returned a value that cannot be ordered
    #[error("Fitness of individual {index} is not comparable: {value}")]
    InvalidFitness { index: usize, value: f64 },

    /// Empty population
    #[error("Empty population")]
    EmptyPopulation,
}

/// Result type alias for evolution operations
pub type EvoResult<T> = Result<T, EvolutionError>;
