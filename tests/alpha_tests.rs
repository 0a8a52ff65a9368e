//! Tests for the alpha generators.

use commercial_grasp::alpha::{AlphaGenerator, ReactiveAlpha, UPDATE_INTERVAL};
use commercial_grasp::config::AlphaPolicy;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

#[test]
fn test_constant_alpha() {
    let generator = AlphaGenerator::from_policy(&AlphaPolicy::Constant(0.3));
    let mut rng = ChaCha8Rng::seed_from_u64(0);
    for _ in 0..10 {
        assert_eq!(generator.generate(&mut rng).value, 0.3);
    }
}

#[test]
fn test_uniform_alpha_in_range() {
    let generator = AlphaGenerator::from_policy(&AlphaPolicy::Uniform {
        lower: 0.2,
        upper: 0.6,
    });
    let mut rng = ChaCha8Rng::seed_from_u64(1);
    for _ in 0..200 {
        let value = generator.generate(&mut rng).value;
        assert!((0.2..0.6).contains(&value), "Alpha {} out of range", value);
    }
}

#[test]
fn test_reactive_starts_uniform() {
    let reactive = ReactiveAlpha::new(vec![0.1, 0.5, 0.9]);
    for &probability in reactive.probabilities() {
        assert!((probability - 1.0 / 3.0).abs() < 1e-12);
    }
    assert_eq!(reactive.usage_counts(), &[0, 0, 0]);
}

#[test]
fn test_reactive_favors_better_alpha() {
    let mut reactive = ReactiveAlpha::new(vec![0.1, 0.5, 0.9]);

    // Alpha 0.1 yields 100, alpha 0.9 yields 50, alpha 0.5 is never used
    for round in 0..UPDATE_INTERVAL {
        if round % 2 == 0 {
            reactive.feedback(0, 100.0);
        } else {
            reactive.feedback(2, 50.0);
        }
    }

    let probabilities = reactive.probabilities();
    let sum: f64 = probabilities.iter().sum();
    assert!((sum - 1.0).abs() < 1e-12);
    assert!(probabilities[0] > probabilities[1]);
    assert!(probabilities[1] > probabilities[2], "Unused alpha sits in the middle");
    assert!(probabilities[2] > 0.0, "Worst alpha keeps a floor");

    assert_eq!(reactive.average_qualities(), vec![100.0, 0.0, 50.0]);
}

#[test]
fn test_reactive_equal_quality_stays_uniform() {
    let mut reactive = ReactiveAlpha::new(vec![0.2, 0.4]);
    for round in 0..UPDATE_INTERVAL {
        reactive.feedback(round % 2, 10.0);
    }
    assert!((reactive.probabilities()[0] - 0.5).abs() < 1e-12);
    assert!((reactive.probabilities()[1] - 0.5).abs() < 1e-12);
}

#[test]
fn test_reactive_feedback_tracks_drawn_index() {
    let mut generator = AlphaGenerator::from_policy(&AlphaPolicy::reactive_default());
    let mut rng = ChaCha8Rng::seed_from_u64(7);

    for _ in 0..(3 * UPDATE_INTERVAL) {
        let draw = generator.generate(&mut rng);
        let revenue = if draw.value < 0.35 { 1000.0 } else { 10.0 };
        generator.feedback(draw, revenue);
    }

    let AlphaGenerator::Reactive(reactive) = &generator else {
        panic!("Default policy is reactive");
    };
    assert_eq!(reactive.usage_counts().iter().sum::<usize>(), 3 * UPDATE_INTERVAL);
    let low: f64 = reactive.probabilities()[..3].iter().sum();
    let high: f64 = reactive.probabilities()[3..].iter().sum();
    assert!(low > high, "Alphas 0.1 to 0.3 earned more");
}
