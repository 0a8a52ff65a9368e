//! Tests for the local search phase.

use commercial_grasp::config::{ConstructionSettings, LocalSearchSettings, SearchMode};
use commercial_grasp::construction::ConstructiveHeuristic;
use commercial_grasp::generator::{generate, GeneratorConfig};
use commercial_grasp::local_search::LocalSearch;
use commercial_grasp::moves::{MoveKind, RunContext};
use commercial_grasp::problem::{Attention, Commercial, Inventory, PricingType, Problem};
use commercial_grasp::solution::Solution;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

/// Creates two inventories with room for six fixed-price commercials of
/// distinct groups, suitable everywhere.
fn create_roomy_problem() -> Problem {
    let inventories = vec![Inventory::new(1, 120, 20), Inventory::new(2, 120, 21)];
    let commercials = (1..=6)
        .map(|id| {
            Commercial::new(id, 30, id as f64, PricingType::Fixed, 1, id)
                .suitable_for(1, Attention::None)
                .suitable_for(2, Attention::None)
        })
        .collect();
    Problem::new("Roomy".to_string(), inventories, commercials).unwrap()
}

/// Creates settings using every move kind.
fn all_moves() -> LocalSearchSettings {
    LocalSearchSettings {
        moves: MoveKind::ALL.to_vec(),
        ..LocalSearchSettings::default()
    }
}

#[test]
fn test_insert_fills_empty_solution() {
    let problem = create_roomy_problem();
    let start = Solution::empty(&problem);
    let mut local_search = LocalSearch::new(
        LocalSearchSettings::default(),
        SearchMode::FirstImprovement,
        RunContext::new(true),
    );
    let mut rng = ChaCha8Rng::seed_from_u64(0);

    let result = local_search.search(&problem, &start, &mut rng).unwrap();
    assert!(result.verify(&problem).is_ok());
    assert_eq!(result.num_assigned(), 6);
    // Σ price × duration = 30 × (1 + ... + 6)
    assert!((result.revenue - 630.0).abs() < 1e-9);
}

#[test]
fn test_search_never_worsens() {
    for mode in [
        SearchMode::FirstImprovement,
        SearchMode::BestImprovement,
        SearchMode::Random,
    ] {
        for seed in 0..3 {
            let problem = generate(&GeneratorConfig::new().with_size(30, 5).with_seed(seed))
                .unwrap();
            let mut rng = ChaCha8Rng::seed_from_u64(seed);
            let start = ConstructiveHeuristic::new(&problem, ConstructionSettings::default())
                .construct(0.8, &mut rng);

            let mut local_search = LocalSearch::new(all_moves(), mode, RunContext::new(true));
            let result = local_search.search(&problem, &start, &mut rng).unwrap();

            assert!(result.verify(&problem).is_ok());
            assert!(
                result.revenue >= start.revenue,
                "{:?} local search lost revenue: {} < {}",
                mode,
                result.revenue,
                start.revenue
            );
        }
    }
}

#[test]
fn test_best_improvement_reaches_local_optimum() {
    let problem = generate(&GeneratorConfig::new().with_size(25, 4).with_seed(5)).unwrap();
    let mut rng = ChaCha8Rng::seed_from_u64(5);
    let start = ConstructiveHeuristic::new(&problem, ConstructionSettings::default())
        .construct(1.0, &mut rng);

    let mut local_search = LocalSearch::new(
        LocalSearchSettings::default(),
        SearchMode::BestImprovement,
        RunContext::default(),
    );
    let result = local_search.search(&problem, &start, &mut rng).unwrap();
    let again = local_search.search(&problem, &result, &mut rng).unwrap();

    assert!(
        (again.revenue - result.revenue).abs() < 1e-6,
        "A local optimum must not improve on a second pass"
    );
}

#[test]
fn test_adaptive_probabilities_stay_normalized() {
    let problem = generate(&GeneratorConfig::new().with_size(20, 4).with_seed(2)).unwrap();
    let settings = LocalSearchSettings {
        adaptive: true,
        update_probabilities_every: 3,
        ..all_moves()
    };
    let mut local_search =
        LocalSearch::new(settings, SearchMode::FirstImprovement, RunContext::default());
    let heuristic = ConstructiveHeuristic::new(&problem, ConstructionSettings::default());
    let mut rng = ChaCha8Rng::seed_from_u64(2);

    for _ in 0..9 {
        let start = heuristic.construct(1.0, &mut rng);
        let result = local_search.search(&problem, &start, &mut rng).unwrap();
        assert!(result.revenue >= start.revenue);
        assert!(result.verify(&problem).is_ok());
    }

    let probabilities = local_search.probabilities();
    assert_eq!(probabilities.len(), MoveKind::ALL.len());
    let sum: f64 = probabilities.iter().sum();
    assert!((sum - 1.0).abs() < 1e-9, "Probabilities sum to {}", sum);
    assert!(probabilities.iter().all(|&p| p > 0.0));
}

#[test]
fn test_skipping_every_neighborhood_returns_start() {
    let problem = create_roomy_problem();
    let start = Solution::empty(&problem);
    let settings = LocalSearchSettings {
        neighborhood_skip_probability: 1.0,
        ..LocalSearchSettings::default()
    };
    let mut local_search =
        LocalSearch::new(settings, SearchMode::FirstImprovement, RunContext::default());
    let mut rng = ChaCha8Rng::seed_from_u64(0);

    let result = local_search.search(&problem, &start, &mut rng).unwrap();
    assert_eq!(result, start);
}

#[test]
fn test_statistics_are_collected() {
    let problem = create_roomy_problem();
    let start = Solution::empty(&problem);
    let mut local_search = LocalSearch::new(
        LocalSearchSettings::default(),
        SearchMode::FirstImprovement,
        RunContext::default(),
    )
    .with_statistics(true);
    let mut rng = ChaCha8Rng::seed_from_u64(0);
    local_search.search(&problem, &start, &mut rng).unwrap();

    let insert = local_search.statistics().get(MoveKind::Insert);
    assert!(insert.attempts >= 7, "Six successful inserts and a failing one");
    assert_eq!(insert.successes, 6);
    assert!((insert.total_gain - 630.0).abs() < 1e-9);
    assert!(insert.success_rate() <= 1.0);
    assert_eq!(local_search.statistics().get(MoveKind::ChainSwap).attempts, 0);

    let taken = local_search.take_statistics();
    assert!(!taken.is_empty());
    assert!(local_search.statistics().is_empty());
}

#[test]
fn test_statistics_disabled_by_default() {
    let problem = create_roomy_problem();
    let mut local_search = LocalSearch::new(
        LocalSearchSettings::default(),
        SearchMode::FirstImprovement,
        RunContext::default(),
    );
    let mut rng = ChaCha8Rng::seed_from_u64(0);
    local_search
        .search(&problem, &Solution::empty(&problem), &mut rng)
        .unwrap();

    assert!(local_search.statistics().is_empty());
}
