//! Randomized checks that every feasible move keeps the schedule valid and
//! changes revenue by exactly its predicted gain.

use commercial_grasp::config::ConstructionSettings;
use commercial_grasp::construction::ConstructiveHeuristic;
use commercial_grasp::generator::{generate, GeneratorConfig};
use commercial_grasp::moves::{Move, MoveContext, MoveKind, RunContext};
use commercial_grasp::problem::Problem;
use commercial_grasp::solution::Solution;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

/// Creates a crowded random instance with every attention kind present.
fn create_random_problem(seed: u64) -> Problem {
    let config = GeneratorConfig::new()
        .with_size(40, 6)
        .with_seed(seed)
        .with_suitability_probability(0.7)
        .with_attention_probabilities([0.1, 0.1, 0.1, 0.1]);
    generate(&config).unwrap()
}

/// A random position in `inventory`, one past the end when `append` is set.
fn random_position<R: Rng>(
    solution: &Solution,
    inventory: usize,
    append: bool,
    rng: &mut R,
) -> usize {
    let len = solution.schedule(inventory).len() + usize::from(append);
    rng.gen_range(0..len.max(1))
}

/// Draws a random, possibly infeasible, move of the given kind.
fn random_move<'a, R: Rng>(kind: MoveKind, context: MoveContext<'a>, rng: &mut R) -> Move<'a> {
    let problem = context.problem;
    let solution = context.solution;
    let inventories = problem.num_inventories();
    let mut inventory = || rng.gen_range(0..inventories);
    let (a, b, c) = (inventory(), inventory(), inventory());
    let commercial = rng.gen_range(0..problem.num_commercials());

    match kind {
        MoveKind::Insert => {
            Move::insert(context, commercial, a, random_position(solution, a, true, rng))
        }
        MoveKind::Remove => Move::remove(context, a, random_position(solution, a, false, rng)),
        MoveKind::OutOfPoolSwap => Move::out_of_pool_swap(
            context,
            a,
            random_position(solution, a, false, rng),
            commercial,
        ),
        MoveKind::IntraSwap => {
            let first = random_position(solution, a, false, rng);
            let second = random_position(solution, a, false, rng);
            Move::intra_swap(context, a, first.min(second), first.max(second))
        }
        MoveKind::InterSwap => Move::inter_swap(
            context,
            a,
            random_position(solution, a, false, rng),
            b,
            random_position(solution, b, false, rng),
        ),
        MoveKind::Transfer => Move::transfer(
            context,
            a,
            random_position(solution, a, false, rng),
            b,
            random_position(solution, b, true, rng),
        ),
        MoveKind::Shift => {
            let from = random_position(solution, a, false, rng);
            let to = random_position(solution, a, false, rng);
            Move::shift(context, a, from, to)
        }
        MoveKind::ChainSwap => Move::chain_swap(
            context,
            [
                (a, random_position(solution, a, false, rng)),
                (b, random_position(solution, b, false, rng)),
                (c, random_position(solution, c, false, rng)),
            ],
        ),
    }
}

/// Walks `steps` random feasible moves from a constructed solution, checking
/// each one. Returns how many moves of each kind were feasible.
fn random_walk(problem: &Problem, seed: u64, steps: usize) -> Vec<usize> {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    let mut solution = ConstructiveHeuristic::new(problem, ConstructionSettings::default())
        .construct(0.5, &mut rng);
    assert!(solution.verify(problem).is_ok(), "Constructed solution must be feasible");

    let run = RunContext::new(true);
    let mut feasible = vec![0; MoveKind::ALL.len()];
    for _ in 0..steps {
        let kind = *MoveKind::ALL.choose(&mut rng).unwrap();
        let snapshot = solution.clone();
        let hourly = solution.hourly_durations(problem);
        let context = MoveContext::new(problem, &solution, &hourly);
        let candidate = random_move(kind, context, &mut rng);

        if !candidate.is_feasible() {
            assert!(candidate.apply(&run).is_err());
            continue;
        }
        feasible[kind as usize] += 1;

        let next = candidate
            .apply(&run)
            .unwrap_or_else(|err| panic!("{} left an invalid solution: {}", kind, err));
        let expected = solution.revenue + candidate.revenue_gain();
        assert!(
            (next.revenue - expected).abs() <= 1e-6 * expected.abs().max(1.0),
            "{}: revenue {} differs from predicted {}",
            kind,
            next.revenue,
            expected
        );
        assert!(
            (next.revenue - next.recomputed_revenue()).abs() <= 1e-6 * next.revenue.abs().max(1.0)
        );
        assert_eq!(solution, snapshot, "{} mutated its source solution", kind);

        solution = next;
    }
    feasible
}

#[test]
fn test_random_moves_keep_solutions_valid() {
    for seed in 0..4 {
        let problem = create_random_problem(seed);
        random_walk(&problem, seed, 1500);
    }
}

#[test]
fn test_random_walk_reaches_every_kind() {
    let problem = create_random_problem(11);
    let feasible = random_walk(&problem, 11, 4000);

    for kind in MoveKind::ALL {
        if kind == MoveKind::ChainSwap {
            continue;
        }
        assert!(
            feasible[kind as usize] > 0,
            "No feasible {} move was drawn",
            kind
        );
    }
}
