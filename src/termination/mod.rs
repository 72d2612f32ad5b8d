//! Acceptance criteria
//!
//! After each generation is evaluated the engine hands the generation's
//! minimum fitness to an [`AcceptanceCriterion`]. Acceptance ends the run
//! early with that generation's best individual; otherwise evolution
//! continues until the generation budget is spent.

/// Decides whether a generation's best fitness is good enough to stop
pub trait AcceptanceCriterion {
    /// Check if the run should stop with the current best
    fn accept(&self, min_fitness: f64) -> bool;

    /// Get a description of why the run stopped
    fn reason(&self) -> &'static str {
        "Acceptance criterion met"
    }
}

/// Accept once the minimum fitness reaches a threshold
#[derive(Clone, Debug)]
pub struct FitnessThreshold {
    /// Fitness at or below which the run stops
    pub threshold: f64,
}

impl FitnessThreshold {
    /// Create a new threshold criterion
    pub fn new(threshold: f64) -> Self {
        Self { threshold }
    }
}

impl AcceptanceCriterion for FitnessThreshold {
    fn accept(&self, min_fitness: f64) -> bool {
        min_fitness <= self.threshold
    }

    fn reason(&self) -> &'static str {
        "Fitness threshold reached"
    }
}

/// Never accept: always run the full generation budget
#[derive(Clone, Debug, Default)]
pub struct NeverAccept;

impl AcceptanceCriterion for NeverAccept {
    fn accept(&self, _min_fitness: f64) -> bool {
        false
    }
}

/// Accept on the first generation
#[derive(Clone, Debug, Default)]
pub struct AlwaysAccept;

impl AcceptanceCriterion for AlwaysAccept {
    fn accept(&self, _min_fitness: f64) -> bool {
        true
    }
}

/// A closure wrapper for caller-supplied acceptance predicates
pub struct FnCriterion<F> {
    f: F,
}

impl<F: Fn(f64) -> bool> FnCriterion<F> {
    /// Create a new function-based criterion
    pub fn new(f: F) -> Self {
        Self { f }
    }
}

impl<F: Fn(f64) -> bool> AcceptanceCriterion for FnCriterion<F> {
    fn accept(&self, min_fitness: f64) -> bool {
        (self.f)(min_fitness)
    }
}

pub mod prelude {
    pub use super::{AcceptanceCriterion, AlwaysAccept, FitnessThreshold, FnCriterion, NeverAccept};
}
