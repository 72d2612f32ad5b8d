//! Selection operators
//!
//! Both strategies return two distinct indices into the live population.

use std::fmt;
use std::str::FromStr;

use rand::seq::{index, SliceRandom};
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::error::{EvolutionError, OperatorError};
use crate::operators::traits::ParentSelection;

/// Selection strategy named in the configuration
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SelectionStrategy {
    /// Best of a random pool, per parent slot
    #[default]
    Tournament,
    /// Uniform draw of two distinct individuals
    Roulette,
}

impl FromStr for SelectionStrategy {
    type Err = EvolutionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "tournament" => Ok(Self::Tournament),
            "roulette" => Ok(Self::Roulette),
            other => Err(EvolutionError::Configuration(format!(
                "unknown selection strategy '{}'",
                other
            ))),
        }
    }
}

impl fmt::Display for SelectionStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Tournament => write!(f, "tournament"),
            Self::Roulette => write!(f, "roulette"),
        }
    }
}

/// Tournament selection operator
///
/// For each parent slot, draws a pool of distinct individuals that have not
/// been chosen yet and keeps the one with the lowest fitness. The second
/// pool is one smaller than the first so it never exceeds what is left.
#[derive(Clone, Debug)]
pub struct TournamentSelection {
    /// Tournament size (number of individuals competing)
    pub tournament_size: usize,
}

impl TournamentSelection {
    /// Create a new tournament selection with the given size
    pub fn new(tournament_size: usize) -> Self {
        assert!(tournament_size >= 1, "Tournament size must be at least 1");
        Self { tournament_size }
    }
}

impl Default for TournamentSelection {
    fn default() -> Self {
        Self::new(5)
    }
}

impl ParentSelection for TournamentSelection {
    fn select_parents<R: Rng>(
        &self,
        fitness: &[f64],
        rng: &mut R,
    ) -> Result<[usize; 2], OperatorError> {
        let n = fitness.len();
        if n < 2 {
            return Err(OperatorError::InsufficientPopulation { size: n });
        }

        let mut parents = [usize::MAX; 2];
        for slot in 0..2 {
            let pool_size = (self.tournament_size.min(n) - slot).max(1);
            let available: Vec<usize> = (0..n).filter(|i| !parents[..slot].contains(i)).collect();

            // Ties keep the first minimum in pool order.
            let winner = available
                .choose_multiple(rng, pool_size)
                .copied()
                .reduce(|best, i| if fitness[i] < fitness[best] { i } else { best })
                .ok_or(OperatorError::InsufficientPopulation { size: n })?;
            parents[slot] = winner;
        }
        Ok(parents)
    }
}

/// Roulette selection
///
/// Despite the historical name this is a uniform draw: every individual is
/// equally likely, fitness is ignored, and the two parents are distinct.
#[derive(Clone, Debug, Default)]
pub struct RouletteSelection;

impl RouletteSelection {
    /// Create a new roulette selection
    pub fn new() -> Self {
        Self
    }
}

impl ParentSelection for RouletteSelection {
    fn select_parents<R: Rng>(
        &self,
        fitness: &[f64],
        rng: &mut R,
    ) -> Result<[usize; 2], OperatorError> {
        let n = fitness.len();
        if n < 2 {
            return Err(OperatorError::InsufficientPopulation { size: n });
        }
        let drawn = index::sample(rng, n, 2);
        Ok([drawn.index(0), drawn.index(1)])
    }
}

/// Selection operator resolved from a [`SelectionStrategy`]
#[derive(Clone, Debug)]
pub enum Selection {
    /// Tournament selection
    Tournament(TournamentSelection),
    /// Uniform distinct selection
    Roulette(RouletteSelection),
}

impl Selection {
    /// Resolve a configured strategy into an operator
    pub fn from_strategy(strategy: SelectionStrategy, tournament_size: usize) -> Self {
        match strategy {
            SelectionStrategy::Tournament => {
                Self::Tournament(TournamentSelection::new(tournament_size))
            }
            SelectionStrategy::Roulette => Self::Roulette(RouletteSelection::new()),
        }
    }
}

impl ParentSelection for Selection {
    fn select_parents<R: Rng>(
        &self,
        fitness: &[f64],
        rng: &mut R,
    ) -> Result<[usize; 2], OperatorError> {
        match self {
            Self::Tournament(op) => op.select_parents(fitness, rng),
            Self::Roulette(op) => op.select_parents(fitness, rng),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_strategy_from_str() {
        assert_eq!(
            "tournament".parse::<SelectionStrategy>().unwrap(),
            SelectionStrategy::Tournament
        );
        assert_eq!(
            "roulette".parse::<SelectionStrategy>().unwrap(),
            SelectionStrategy::Roulette
        );
        let err = "elitist".parse::<SelectionStrategy>().unwrap_err();
        assert!(matches!(err, EvolutionError::Configuration(_)));
        assert_eq!(SelectionStrategy::Roulette.to_string(), "roulette");
    }

    #[test]
    fn test_tournament_selection_distinct_valid_indices() {
        let mut rng = StdRng::seed_from_u64(11);
        let fitness: Vec<f64> = (0..10).map(|i| i as f64).collect();
        let selection = TournamentSelection::default();

        for _ in 0..200 {
            let [a, b] = selection.select_parents(&fitness, &mut rng).unwrap();
            assert!(a < 10 && b < 10);
            assert_ne!(a, b);
        }
    }

    #[test]
    fn test_tournament_full_pool_picks_two_best() {
        let mut rng = StdRng::seed_from_u64(12);
        // Population of 5 with a size-5 tournament: slot 0 sees everyone.
        let fitness = vec![4.0, 0.5, 3.0, 0.1, 9.0];
        let selection = TournamentSelection::new(5);

        for _ in 0..50 {
            let [first, _] = selection.select_parents(&fitness, &mut rng).unwrap();
            assert_eq!(first, 3);
        }
    }

    #[test]
    fn test_tournament_population_of_two() {
        let mut rng = StdRng::seed_from_u64(13);
        let fitness = vec![2.0, 1.0];
        let selection = TournamentSelection::new(5);
        for _ in 0..20 {
            assert_eq!(selection.select_parents(&fitness, &mut rng).unwrap(), [1, 0]);
        }
    }

    #[test]
    fn test_tournament_size_one_is_random_but_distinct() {
        let mut rng = StdRng::seed_from_u64(14);
        let fitness = vec![1.0, 1.0, 1.0];
        let selection = TournamentSelection::new(1);
        for _ in 0..50 {
            let [a, b] = selection.select_parents(&fitness, &mut rng).unwrap();
            assert_ne!(a, b);
        }
    }

    #[test]
    fn test_roulette_selection_distinct() {
        let mut rng = StdRng::seed_from_u64(15);
        let fitness = vec![0.0; 6];
        let mut seen = [false; 6];
        for _ in 0..300 {
            let [a, b] = RouletteSelection::new().select_parents(&fitness, &mut rng).unwrap();
            assert_ne!(a, b);
            seen[a] = true;
            seen[b] = true;
        }
        assert!(seen.iter().all(|&s| s));
    }

    #[test]
    fn test_selection_rejects_tiny_population() {
        let mut rng = StdRng::seed_from_u64(16);
        for selection in [
            Selection::from_strategy(SelectionStrategy::Tournament, 5),
            Selection::from_strategy(SelectionStrategy::Roulette, 5),
        ] {
            assert_eq!(
                selection.select_parents(&[1.0], &mut rng),
                Err(OperatorError::InsufficientPopulation { size: 1 })
            );
        }
    }
}
