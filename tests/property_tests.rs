//! Property-based tests for fugue-gp
//!
//! Uses proptest to verify invariants and properties of the library.

use fugue_gp::prelude::*;
use proptest::prelude::*;
use rand::rngs::StdRng;
use rand::SeedableRng;

fn primitives() -> PrimitiveSet {
    PrimitiveSet::new(
        vec![
            ArithmeticTerminal::Constant(1.0),
            ArithmeticTerminal::Constant(2.0),
            ArithmeticTerminal::Constant(3.0),
        ],
        ArithmeticOperator::all(),
    )
    .with_variables(
        vec![ArithmeticTerminal::Variable(0), ArithmeticTerminal::Variable(1)],
        0.4,
    )
}

fn random_tree(seed: u64, depth: usize) -> Tree {
    let mut rng = StdRng::seed_from_u64(seed);
    RampedHalfAndHalf::default()
        .generate(depth, &primitives(), &mut rng)
        .unwrap()
}

fn sorted_labels(trees: &[&Tree]) -> Vec<String> {
    let mut labels: Vec<String> = trees.iter().flat_map(|t| t.labels()).collect();
    labels.sort();
    labels
}

proptest! {
    // ==================== Tree Properties ====================

    #[test]
    fn update_sub_tree_preserves_size_invariant(
        seed in any::<u64>(),
        depth in 0usize..6,
        replacement_seed in any::<u64>(),
        replacement_depth in 0usize..4,
        pick in any::<prop::sample::Index>()
    ) {
        let mut tree = random_tree(seed, depth);
        let replacement = random_tree(replacement_seed, replacement_depth);
        let index = pick.index(tree.size());
        let before = tree.size();

        match tree.update_sub_tree(index, replacement.clone()).unwrap() {
            Some(detached) => {
                prop_assert_eq!(tree.size(), before - detached.size() + replacement.size());
            }
            None => {
                prop_assert_eq!(index, 0);
                prop_assert_eq!(tree.size(), before);
            }
        }
        prop_assert!(tree.validate().is_ok());
    }

    #[test]
    fn copy_is_independent(
        seed in any::<u64>(),
        depth in 1usize..6,
        pick in any::<prop::sample::Index>()
    ) {
        let original = random_tree(seed, depth);
        let rendered = original.eval_in_order();
        let mut copy = original.copy();
        prop_assert_eq!(copy.eval_in_order(), rendered.clone());

        let index = pick.index(copy.size());
        let marker = Tree::leaf(ArithmeticTerminal::Constant(-99.0));
        let _ = copy.update_sub_tree(index, marker);
        prop_assert_eq!(original.eval_in_order(), rendered);
    }

    #[test]
    fn get_sub_tree_covers_exactly_the_index_range(seed in any::<u64>(), depth in 0usize..6) {
        let tree = random_tree(seed, depth);
        for index in 0..tree.size() {
            let (level, sub) = tree.get_sub_tree(index).unwrap();
            prop_assert!(level <= tree.depth());
            prop_assert!(sub.size() <= tree.size() - index);
        }
        let out_of_range = tree.get_sub_tree(tree.size());
        prop_assert!(
            matches!(out_of_range, Err(GenomeError::IndexOutOfRange { .. })),
            "index past the end must fail"
        );
    }

    #[test]
    fn sub_trees_by_level_never_empty(
        seed in any::<u64>(),
        depth in 0usize..6,
        available in 0usize..6
    ) {
        let tree = random_tree(seed, depth);
        let candidates = tree.get_sub_trees_by_level(available, 5);
        prop_assert!(!candidates.is_empty());
        for (index, sub) in candidates {
            let (_, located) = tree.get_sub_tree(index).unwrap();
            prop_assert_eq!(located, sub);
        }
    }

    // ==================== Operator Properties ====================

    #[test]
    fn crossover_respects_max_depth(
        seed1 in any::<u64>(),
        seed2 in any::<u64>(),
        rng_seed in any::<u64>(),
        max_depth in 1usize..6
    ) {
        let p1 = random_tree(seed1, max_depth);
        let p2 = random_tree(seed2, max_depth);
        let mut rng = StdRng::seed_from_u64(rng_seed);

        let offspring = SubtreeCrossover::new(max_depth).reproduce(&p1, &p2, &mut rng).unwrap();
        prop_assert_eq!(offspring.len(), 1);
        prop_assert!(offspring[0].depth() <= max_depth);
        prop_assert!(offspring[0].validate().is_ok());
    }

    #[test]
    fn variant_crossover_conserves_nodes(
        seed1 in any::<u64>(),
        seed2 in any::<u64>(),
        rng_seed in any::<u64>(),
        max_depth in 1usize..6
    ) {
        let p1 = random_tree(seed1, max_depth);
        let p2 = random_tree(seed2, max_depth);
        let mut rng = StdRng::seed_from_u64(rng_seed);

        let offspring = VariantCrossover::new(max_depth).reproduce(&p1, &p2, &mut rng).unwrap();
        prop_assert_eq!(offspring.len(), 2);
        prop_assert_eq!(
            sorted_labels(&[&offspring[0], &offspring[1]]),
            sorted_labels(&[&p1, &p2])
        );
        prop_assert!(offspring[0].depth() <= max_depth);
    }

    #[test]
    fn mutation_respects_max_depth(
        seed in any::<u64>(),
        rng_seed in any::<u64>(),
        max_depth in 1usize..6
    ) {
        let tree = random_tree(seed, max_depth);
        let mut rng = StdRng::seed_from_u64(rng_seed);

        let mutated = SubtreeMutation::new(max_depth)
            .mutate(tree, &RampedHalfAndHalf::default(), &primitives(), &mut rng)
            .unwrap();
        prop_assert!(mutated.depth() <= max_depth);
    }

    #[test]
    fn selection_returns_distinct_indices(
        fitness in prop::collection::vec(0.0..100.0f64, 2..30),
        tournament_size in 1usize..8,
        rng_seed in any::<u64>()
    ) {
        let mut rng = StdRng::seed_from_u64(rng_seed);
        for strategy in [SelectionStrategy::Tournament, SelectionStrategy::Roulette] {
            let selection = Selection::from_strategy(strategy, tournament_size);
            let [a, b] = selection.select_parents(&fitness, &mut rng).unwrap();
            prop_assert_ne!(a, b);
            prop_assert!(a < fitness.len() && b < fitness.len());
        }
    }
}
