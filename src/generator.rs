//! Random instance generator for experiments and benchmarks.

use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};

use crate::error::ProblemError;
use crate::problem::{Attention, Commercial, Inventory, PricingType, Problem};

/// Parameters of a random instance.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeneratorConfig {
    pub num_commercials: usize,
    pub num_inventories: usize,
    /// Inclusive range of inventory durations in seconds
    pub inventory_duration: (u32, u32),
    /// Commercial durations to draw from
    pub commercial_durations: Vec<u32>,
    /// Price range per second and rating point for rating-based pricing
    pub rating_price: (f64, f64),
    /// Price range per second for fixed pricing
    pub fixed_price: (f64, f64),
    /// Share of fixed-price commercials
    pub fixed_share: f64,
    /// Hours inventories are broadcast in
    pub hours: Vec<u32>,
    pub audience_types: Vec<u32>,
    pub groups: u32,
    /// Probability that a given inventory is suitable for a commercial
    pub suitability_probability: f64,
    /// Probabilities of FIRST, LAST, F30 and F60 requirements; the rest is NONE
    pub attention_probabilities: [f64; 4],
    /// Inclusive range of per-minute ratings
    pub rating: (f64, f64),
    pub seed: u64,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        GeneratorConfig {
            num_commercials: 60,
            num_inventories: 8,
            inventory_duration: (120, 360),
            commercial_durations: vec![10, 15, 20, 30, 45, 60],
            rating_price: (1.0, 5.0),
            fixed_price: (0.5, 3.0),
            fixed_share: 0.2,
            hours: (18..24).collect(),
            audience_types: vec![1, 2, 3],
            groups: 12,
            suitability_probability: 0.5,
            attention_probabilities: [0.05, 0.05, 0.05, 0.05],
            rating: (0.1, 2.0),
            seed: 0,
        }
    }
}

impl GeneratorConfig {
    pub fn new() -> Self {
        GeneratorConfig::default()
    }

    pub fn with_size(mut self, commercials: usize, inventories: usize) -> Self {
        self.num_commercials = commercials;
        self.num_inventories = inventories;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    pub fn with_suitability_probability(mut self, probability: f64) -> Self {
        self.suitability_probability = probability;
        self
    }

    pub fn with_attention_probabilities(mut self, probabilities: [f64; 4]) -> Self {
        self.attention_probabilities = probabilities;
        self
    }
}

/// Generate a validated problem named after the seed.
pub fn generate(config: &GeneratorConfig) -> Result<Problem, ProblemError> {
    let mut rng = ChaCha8Rng::seed_from_u64(config.seed);
    let audience_types = non_empty(&config.audience_types, 1);
    let hours = non_empty(&config.hours, 0);
    let durations = non_empty(&config.commercial_durations, 30);

    let inventories: Vec<Inventory> = (0..config.num_inventories)
        .map(|id| {
            let (low, high) = config.inventory_duration;
            let duration = rng.gen_range(low..=high.max(low));
            let hour = *hours.choose(&mut rng).unwrap_or(&0);
            let mut inventory = Inventory::new(id as u32, duration, hour);
            for minute in 1..=duration / 60 + 1 {
                for &audience in &audience_types {
                    inventory.set_rating(minute, audience, sample(&mut rng, config.rating));
                }
            }
            inventory
        })
        .collect();

    let commercials: Vec<Commercial> = (0..config.num_commercials)
        .map(|id| {
            let duration = *durations.choose(&mut rng).unwrap_or(&30);
            let audience = *audience_types.choose(&mut rng).unwrap_or(&1);
            let (pricing_type, price) = if rng.gen_bool(config.fixed_share.clamp(0.0, 1.0)) {
                (PricingType::Fixed, sample(&mut rng, config.fixed_price))
            } else {
                (PricingType::RatingBased, sample(&mut rng, config.rating_price))
            };
            let group = rng.gen_range(0..config.groups.max(1));

            let mut commercial =
                Commercial::new(id as u32, duration, price, pricing_type, audience, group);
            let probability = config.suitability_probability.clamp(0.0, 1.0);
            for inventory in &inventories {
                if rng.gen_bool(probability) {
                    let attention = sample_attention(&mut rng, &config.attention_probabilities);
                    commercial = commercial.suitable_for(inventory.id, attention);
                }
            }
            commercial
        })
        .collect();

    Problem::new(format!("random_{}", config.seed), inventories, commercials)
}

fn non_empty<T: Copy>(values: &[T], fallback: T) -> Vec<T> {
    if values.is_empty() {
        vec![fallback]
    } else {
        values.to_vec()
    }
}

fn sample<R: Rng>(rng: &mut R, (low, high): (f64, f64)) -> f64 {
    if high > low {
        rng.gen_range(low..=high)
    } else {
        low
    }
}

fn sample_attention<R: Rng>(rng: &mut R, probabilities: &[f64; 4]) -> Attention {
    let draw: f64 = rng.gen();
    let kinds = [Attention::First, Attention::Last, Attention::F30, Attention::F60];
    let mut cumulative = 0.0;
    for (kind, probability) in kinds.iter().zip(probabilities) {
        cumulative += probability;
        if draw < cumulative {
            return *kind;
        }
    }
    Attention::None
}
