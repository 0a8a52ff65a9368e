//! Unit tests for move feasibility, revenue gains and application.

use commercial_grasp::error::SearchError;
use commercial_grasp::moves::{Move, MoveContext, MoveKind, RunContext};
use commercial_grasp::problem::{Attention, Commercial, Inventory, PricingType, Problem};
use commercial_grasp::solution::Solution;

/// Creates two rated inventories and five rating-priced commercials.
///
/// Inventory 1 (index 0) rates minutes 1, 2, 3 at 1.0, 2.0, 3.0; inventory 2
/// (index 1) at 2.0, 1.0, 1.0. Commercials 10..14 map to indices 0..4;
/// indices 0 and 3 share group 1, index 4 must air first in inventory 1.
fn create_test_problem() -> Problem {
    let inventories = vec![
        Inventory::new(1, 120, 20)
            .with_rating(1, 1, 1.0)
            .with_rating(2, 1, 2.0)
            .with_rating(3, 1, 3.0),
        Inventory::new(2, 120, 21)
            .with_rating(1, 1, 2.0)
            .with_rating(2, 1, 1.0)
            .with_rating(3, 1, 1.0),
    ];
    let commercials = vec![
        Commercial::new(10, 30, 1.0, PricingType::RatingBased, 1, 1)
            .suitable_for(1, Attention::None)
            .suitable_for(2, Attention::None),
        Commercial::new(11, 30, 1.0, PricingType::RatingBased, 1, 2)
            .suitable_for(1, Attention::None)
            .suitable_for(2, Attention::None),
        Commercial::new(12, 60, 1.0, PricingType::RatingBased, 1, 3)
            .suitable_for(1, Attention::None)
            .suitable_for(2, Attention::None),
        Commercial::new(13, 30, 1.0, PricingType::RatingBased, 1, 1)
            .suitable_for(1, Attention::None),
        Commercial::new(14, 30, 1.0, PricingType::RatingBased, 1, 4)
            .suitable_for(1, Attention::First),
    ];
    Problem::new("MoveTest".to_string(), inventories, commercials).unwrap()
}

/// Creates the base solution: inventory 0 airs [0, 1], inventory 1 airs [2].
///
/// Revenue is 30 + 30 + 120 = 180.
fn create_test_solution(problem: &Problem) -> Solution {
    Solution::from_sequences(problem, &[vec![0, 1], vec![2]])
}

/// Creates fixed-price commercials with placement requirements in one
/// two-minute inventory: 0 (30s), 1 (60s), 2 (30s, first 30s), 3 (30s, last).
fn create_attention_problem() -> Problem {
    let inventories = vec![Inventory::new(1, 120, 20)];
    let commercials = vec![
        Commercial::new(1, 30, 1.0, PricingType::Fixed, 1, 1).suitable_for(1, Attention::None),
        Commercial::new(2, 60, 1.0, PricingType::Fixed, 1, 2).suitable_for(1, Attention::None),
        Commercial::new(3, 30, 1.0, PricingType::Fixed, 1, 3).suitable_for(1, Attention::F30),
        Commercial::new(4, 30, 1.0, PricingType::Fixed, 1, 4).suitable_for(1, Attention::Last),
    ];
    Problem::new("AttentionTest".to_string(), inventories, commercials).unwrap()
}

fn assert_applies(candidate: &Move, problem: &Problem, solution: &Solution) -> Solution {
    assert!(candidate.is_feasible(), "{:?} should be feasible", candidate.kind());
    let next = candidate.apply(&RunContext::new(true)).unwrap();
    assert!(next.verify(problem).is_ok());
    assert!(
        (next.revenue - (solution.revenue + candidate.revenue_gain())).abs() < 1e-9,
        "Applied revenue must equal old revenue plus the predicted gain"
    );
    next
}

#[test]
fn test_insert_at_end() {
    let problem = create_test_problem();
    let solution = create_test_solution(&problem);
    let hourly = solution.hourly_durations(&problem);
    let context = MoveContext::new(&problem, &solution, &hourly);

    // Commercial 3 starts at 60s, minute 2, rating 2.0
    let candidate = Move::insert(context, 3, 0, 2);
    assert_eq!(candidate.kind(), MoveKind::Insert);
    assert!((candidate.revenue_gain() - 60.0).abs() < 1e-9);

    let next = assert_applies(&candidate, &problem, &solution);
    assert_eq!(next.sequence(0), vec![0, 1, 3]);
    assert!((next.revenue - 240.0).abs() < 1e-9);
}

#[test]
fn test_insert_rejects_group_adjacency() {
    let problem = create_test_problem();
    let solution = create_test_solution(&problem);
    let hourly = solution.hourly_durations(&problem);
    let context = MoveContext::new(&problem, &solution, &hourly);

    // Commercial 3 shares group 1 with commercial 0
    assert!(!Move::insert(context, 3, 0, 0).is_feasible());
    assert!(!Move::insert(context, 3, 0, 1).is_feasible());
}

#[test]
fn test_insert_first_attention_shifts_tail() {
    let problem = create_test_problem();
    let solution = create_test_solution(&problem);
    let hourly = solution.hourly_durations(&problem);
    let context = MoveContext::new(&problem, &solution, &hourly);

    // Commercial 4 earns 30; commercial 1 moves from 30s to 60s and doubles to 60
    let candidate = Move::insert(context, 4, 0, 0);
    assert!((candidate.revenue_gain() - 60.0).abs() < 1e-9);
    let next = assert_applies(&candidate, &problem, &solution);
    assert_eq!(next.sequence(0), vec![4, 0, 1]);

    assert!(
        !Move::insert(context, 4, 0, 1).is_feasible(),
        "A FIRST commercial cannot air second"
    );
}

#[test]
fn test_insert_rejects_assigned_or_unsuitable() {
    let problem = create_test_problem();
    let solution = create_test_solution(&problem);
    let hourly = solution.hourly_durations(&problem);
    let context = MoveContext::new(&problem, &solution, &hourly);

    assert!(!Move::insert(context, 0, 1, 1).is_feasible(), "Already assigned");
    assert!(!Move::insert(context, 3, 1, 0).is_feasible(), "Unsuitable inventory");
    assert!(!Move::insert(context, 3, 0, 5).is_feasible(), "Position out of range");
}

#[test]
fn test_insert_into_full_inventory_is_infeasible() {
    let problem = create_test_problem();
    let solution = Solution::from_sequences(&problem, &[vec![0, 1, 2], vec![]]);
    assert_eq!(solution.utilization(0), 120);
    let hourly = solution.hourly_durations(&problem);
    let context = MoveContext::new(&problem, &solution, &hourly);

    for position in 0..=3 {
        let candidate = Move::insert(context, 3, 0, position);
        assert!(!candidate.is_feasible());
        assert_eq!(
            candidate.apply(&RunContext::default()),
            Err(SearchError::InfeasibleMove(MoveKind::Insert))
        );
    }
}

#[test]
fn test_insert_respects_hourly_limit() {
    let inventories = vec![Inventory::new(1, 400, 20), Inventory::new(2, 400, 20)];
    let commercials = vec![
        Commercial::new(1, 400, 1.0, PricingType::Fixed, 1, 1).suitable_for(1, Attention::None),
        Commercial::new(2, 300, 1.0, PricingType::Fixed, 1, 2).suitable_for(2, Attention::None),
        Commercial::new(3, 30, 1.0, PricingType::Fixed, 1, 3).suitable_for(2, Attention::None),
        Commercial::new(4, 20, 1.0, PricingType::Fixed, 1, 4).suitable_for(2, Attention::None),
    ];
    let problem = Problem::new("Hourly".to_string(), inventories, commercials).unwrap();
    let solution = Solution::from_sequences(&problem, &[vec![0], vec![1]]);
    let hourly = solution.hourly_durations(&problem);
    let context = MoveContext::new(&problem, &solution, &hourly);

    // 700 + 30 exceeds 720 even though the inventory itself has room
    assert!(!Move::insert(context, 2, 1, 1).is_feasible());
    assert!(Move::insert(context, 3, 1, 1).is_feasible());
}

#[test]
fn test_remove() {
    let problem = create_test_problem();
    let solution = create_test_solution(&problem);
    let hourly = solution.hourly_durations(&problem);
    let context = MoveContext::new(&problem, &solution, &hourly);

    // Commercial 1 moves to 0s and keeps its minute-1 revenue
    let candidate = Move::remove(context, 0, 0);
    assert!((candidate.revenue_gain() + 30.0).abs() < 1e-9);
    let next = assert_applies(&candidate, &problem, &solution);
    assert_eq!(next.sequence(0), vec![1]);
    assert!(!next.is_assigned(0));

    let candidate = Move::remove(context, 1, 0);
    assert!((candidate.revenue_gain() + 120.0).abs() < 1e-9);
    assert!(!Move::remove(context, 1, 1).is_feasible());
}

#[test]
fn test_out_of_pool_swap() {
    let problem = create_test_problem();
    let solution = create_test_solution(&problem);
    let hourly = solution.hourly_durations(&problem);
    let context = MoveContext::new(&problem, &solution, &hourly);

    let candidate = Move::out_of_pool_swap(context, 0, 0, 3);
    assert!(candidate.revenue_gain().abs() < 1e-9);
    let next = assert_applies(&candidate, &problem, &solution);
    assert_eq!(next.sequence(0), vec![3, 1]);
    assert!(!next.is_assigned(0));

    // Commercial 3 next to commercial 0 would repeat group 1
    assert!(!Move::out_of_pool_swap(context, 0, 1, 3).is_feasible());
    // The incoming commercial must be unassigned
    assert!(!Move::out_of_pool_swap(context, 0, 0, 2).is_feasible());
}

#[test]
fn test_intra_swap() {
    let problem = create_test_problem();
    let solution = Solution::from_sequences(&problem, &[vec![0, 2], vec![]]);
    let hourly = solution.hourly_durations(&problem);
    let context = MoveContext::new(&problem, &solution, &hourly);

    // [0, 2] earns 30 + 60; [2, 0] earns 60 + 60
    let candidate = Move::intra_swap(context, 0, 0, 1);
    assert!((candidate.revenue_gain() - 30.0).abs() < 1e-9);
    let next = assert_applies(&candidate, &problem, &solution);
    assert_eq!(next.sequence(0), vec![2, 0]);

    assert!(!Move::intra_swap(context, 0, 1, 0).is_feasible(), "Positions must be ordered");
}

#[test]
fn test_inter_swap() {
    let problem = create_test_problem();
    let solution = create_test_solution(&problem);
    let hourly = solution.hourly_durations(&problem);
    let context = MoveContext::new(&problem, &solution, &hourly);

    // Inventory 0 gains 60 - 30, inventory 1 loses 120 - 60
    let candidate = Move::inter_swap(context, 0, 1, 1, 0);
    assert!((candidate.revenue_gain() + 30.0).abs() < 1e-9);
    let next = assert_applies(&candidate, &problem, &solution);
    assert_eq!(next.sequences(), vec![vec![0, 2], vec![1]]);
}

#[test]
fn test_transfer() {
    let problem = create_test_problem();
    let solution = create_test_solution(&problem);
    let hourly = solution.hourly_durations(&problem);
    let context = MoveContext::new(&problem, &solution, &hourly);

    // Commercial 1 earns 60 at the start of inventory 1; commercial 2 moves
    // to 30s but stays in minute 1
    let candidate = Move::transfer(context, 0, 1, 1, 0);
    assert!((candidate.revenue_gain() - 30.0).abs() < 1e-9);
    let next = assert_applies(&candidate, &problem, &solution);
    assert_eq!(next.sequences(), vec![vec![0], vec![1, 2]]);

    // Commercial 2 at the end of inventory 0 fills it exactly
    let candidate = Move::transfer(context, 1, 0, 0, 2);
    let next = assert_applies(&candidate, &problem, &solution);
    assert_eq!(next.utilization(0), 120);
    assert!(next.schedule(1).is_empty());

    assert!(!Move::transfer(context, 0, 0, 0, 1).is_feasible(), "Same inventory");
}

#[test]
fn test_shift() {
    let problem = create_test_problem();
    let solution = Solution::from_sequences(&problem, &[vec![2, 0, 1], vec![]]);
    let hourly = solution.hourly_durations(&problem);
    let context = MoveContext::new(&problem, &solution, &hourly);

    // [2, 0, 1] earns 60 + 60 + 60; [0, 1, 2] earns 30 + 30 + 120
    let candidate = Move::shift(context, 0, 0, 2);
    assert!(candidate.revenue_gain().abs() < 1e-9);
    let next = assert_applies(&candidate, &problem, &solution);
    assert_eq!(next.sequence(0), vec![0, 1, 2]);

    // [0, 2, 1] earns 30 + 60 + 60
    let candidate = Move::shift(context, 0, 1, 0);
    assert!((candidate.revenue_gain() + 30.0).abs() < 1e-9);
    let next = assert_applies(&candidate, &problem, &solution);
    assert_eq!(next.sequence(0), vec![0, 2, 1]);

    assert!(!Move::shift(context, 0, 1, 1).is_feasible());
}

#[test]
fn test_out_of_range_inventory_is_infeasible() {
    let problem = create_test_problem();
    let solution = create_test_solution(&problem);
    let hourly = solution.hourly_durations(&problem);
    let context = MoveContext::new(&problem, &solution, &hourly);

    let candidates = [
        Move::shift(context, 5, 0, 1),
        Move::intra_swap(context, 5, 0, 1),
        Move::remove(context, 5, 0),
    ];
    for candidate in &candidates {
        assert!(!candidate.is_feasible(), "{:?} past the last inventory", candidate.kind());
        assert_eq!(candidate.revenue_gain(), f64::NEG_INFINITY);
        assert!(matches!(
            candidate.apply(&RunContext::new(true)),
            Err(SearchError::InfeasibleMove(_))
        ));
    }
}

#[test]
fn test_chain_swap_rotates_commercials() {
    let inventories = vec![
        Inventory::new(1, 60, 18),
        Inventory::new(2, 60, 19),
        Inventory::new(3, 60, 20),
    ];
    let commercials = (1..=3)
        .map(|id| {
            Commercial::new(id, 30, id as f64, PricingType::Fixed, 1, id)
                .suitable_for(1, Attention::None)
                .suitable_for(2, Attention::None)
                .suitable_for(3, Attention::None)
        })
        .collect();
    let problem = Problem::new("Chain".to_string(), inventories, commercials).unwrap();
    let solution = Solution::from_sequences(&problem, &[vec![0], vec![1], vec![2]]);
    let hourly = solution.hourly_durations(&problem);
    let context = MoveContext::new(&problem, &solution, &hourly);

    let candidate = Move::chain_swap(context, [(0, 0), (1, 0), (2, 0)]);
    assert_eq!(candidate.kind(), MoveKind::ChainSwap);
    assert!(candidate.revenue_gain().abs() < 1e-9);
    let next = assert_applies(&candidate, &problem, &solution);
    assert_eq!(next.sequences(), vec![vec![2], vec![0], vec![1]]);

    assert!(
        !Move::chain_swap(context, [(0, 0), (0, 0), (2, 0)]).is_feasible(),
        "Slots must lie in distinct inventories"
    );
}

#[test]
fn test_attention_windows() {
    let problem = create_attention_problem();

    // F30 commercial after a 30s commercial starts at 30s: allowed
    let solution = Solution::from_sequences(&problem, &[vec![0]]);
    let hourly = solution.hourly_durations(&problem);
    let context = MoveContext::new(&problem, &solution, &hourly);
    assert!(Move::insert(context, 2, 0, 1).is_feasible());

    // After a 60s commercial it would start at 60s
    let solution = Solution::from_sequences(&problem, &[vec![1]]);
    let hourly = solution.hourly_durations(&problem);
    let context = MoveContext::new(&problem, &solution, &hourly);
    assert!(!Move::insert(context, 2, 0, 1).is_feasible());
    assert!(Move::insert(context, 2, 0, 0).is_feasible());
}

#[test]
fn test_last_attention_stays_last() {
    let problem = create_attention_problem();
    let solution = Solution::from_sequences(&problem, &[vec![3]]);
    let hourly = solution.hourly_durations(&problem);
    let context = MoveContext::new(&problem, &solution, &hourly);

    assert!(
        !Move::insert(context, 0, 0, 1).is_feasible(),
        "Appending behind a LAST commercial displaces it"
    );
    let next = assert_applies(&Move::insert(context, 0, 0, 0), &problem, &solution);
    assert_eq!(next.sequence(0), vec![0, 3]);

    // Removing the LAST commercial's predecessor keeps it last
    let hourly = next.hourly_durations(&problem);
    let context = MoveContext::new(&problem, &next, &hourly);
    assert_applies(&Move::remove(context, 0, 0), &problem, &next);
}

#[test]
fn test_evaluation_is_memoized_and_pure() {
    let problem = create_test_problem();
    let solution = create_test_solution(&problem);
    let snapshot = solution.clone();
    let hourly = solution.hourly_durations(&problem);
    let context = MoveContext::new(&problem, &solution, &hourly);

    let candidate = Move::transfer(context, 0, 1, 1, 0);
    let first = (candidate.is_feasible(), candidate.revenue_gain());
    let second = (candidate.is_feasible(), candidate.revenue_gain());
    assert_eq!(first, second);

    let applied_once = candidate.apply(&RunContext::default()).unwrap();
    let applied_twice = candidate.apply(&RunContext::default()).unwrap();
    assert_eq!(applied_once, applied_twice);
    assert_eq!(solution, snapshot, "Applying a move must not touch its source");
}
