//! Greediness parameter generators for GRASP construction.

use rand::Rng;

use crate::config::AlphaPolicy;

/// Number of feedbacks between probability recalculations.
pub const UPDATE_INTERVAL: usize = 50;

/// Probability floor added to every reactive alpha after normalisation.
const MIN_PROBABILITY: f64 = 0.05;

/// One alpha drawn from a generator. `index` identifies the reactive bucket
/// the value came from and is what feedback is keyed on.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AlphaDraw {
    pub index: usize,
    pub value: f64,
}

/// Draws α for each construction and optionally learns from the result.
#[derive(Debug, Clone)]
pub enum AlphaGenerator {
    Constant(f64),
    Uniform { lower: f64, upper: f64 },
    Reactive(ReactiveAlpha),
}

impl AlphaGenerator {
    pub fn from_policy(policy: &AlphaPolicy) -> Self {
        match policy {
            AlphaPolicy::Constant(value) => AlphaGenerator::Constant(*value),
            AlphaPolicy::Uniform { lower, upper } => AlphaGenerator::Uniform {
                lower: *lower,
                upper: *upper,
            },
            AlphaPolicy::Reactive { values } => {
                AlphaGenerator::Reactive(ReactiveAlpha::new(values.clone()))
            }
        }
    }

    pub fn generate<R: Rng>(&self, rng: &mut R) -> AlphaDraw {
        match self {
            AlphaGenerator::Constant(value) => AlphaDraw {
                index: 0,
                value: *value,
            },
            AlphaGenerator::Uniform { lower, upper } => AlphaDraw {
                index: 0,
                value: if upper > lower {
                    rng.gen_range(*lower..*upper)
                } else {
                    *lower
                },
            },
            AlphaGenerator::Reactive(reactive) => reactive.generate(rng),
        }
    }

    /// Report the revenue obtained with `draw`. Only the reactive generator
    /// uses it.
    pub fn feedback(&mut self, draw: AlphaDraw, revenue: f64) {
        if let AlphaGenerator::Reactive(reactive) = self {
            reactive.feedback(draw.index, revenue);
        }
    }
}

/// Discrete alpha set whose selection probabilities follow the average
/// revenue each value produced.
#[derive(Debug, Clone)]
pub struct ReactiveAlpha {
    values: Vec<f64>,
    probabilities: Vec<f64>,
    total_quality: Vec<f64>,
    usage: Vec<usize>,
    feedbacks: usize,
}

impl ReactiveAlpha {
    pub fn new(values: Vec<f64>) -> Self {
        let values = if values.is_empty() { vec![0.5] } else { values };
        let n = values.len();
        ReactiveAlpha {
            probabilities: vec![1.0 / n as f64; n],
            total_quality: vec![0.0; n],
            usage: vec![0; n],
            values,
            feedbacks: 0,
        }
    }

    pub fn values(&self) -> &[f64] {
        &self.values
    }

    pub fn probabilities(&self) -> &[f64] {
        &self.probabilities
    }

    pub fn usage_counts(&self) -> &[usize] {
        &self.usage
    }

    /// Average revenue per alpha, zero for unused ones.
    pub fn average_qualities(&self) -> Vec<f64> {
        self.total_quality
            .iter()
            .zip(&self.usage)
            .map(|(&total, &count)| if count == 0 { 0.0 } else { total / count as f64 })
            .collect()
    }

    pub fn generate<R: Rng>(&self, rng: &mut R) -> AlphaDraw {
        let draw: f64 = rng.gen();
        let mut cumulative = 0.0;
        for (index, &probability) in self.probabilities.iter().enumerate() {
            cumulative += probability;
            if draw <= cumulative {
                return AlphaDraw {
                    index,
                    value: self.values[index],
                };
            }
        }
        let index = self.values.len() - 1;
        AlphaDraw {
            index,
            value: self.values[index],
        }
    }

    pub fn feedback(&mut self, index: usize, revenue: f64) {
        if index >= self.values.len() {
            return;
        }
        self.usage[index] += 1;
        self.total_quality[index] += revenue;
        self.feedbacks += 1;
        if self.feedbacks % UPDATE_INTERVAL == 0 {
            self.recalculate();
        }
    }

    fn recalculate(&mut self) {
        let averages = self.average_qualities();
        let used = || {
            averages
                .iter()
                .zip(&self.usage)
                .filter(|(_, &count)| count > 0)
                .map(|(&average, _)| average)
        };
        let max = used().fold(f64::NEG_INFINITY, f64::max);
        let min = used().fold(f64::INFINITY, f64::min);
        let spread = max - min;

        for (index, probability) in self.probabilities.iter_mut().enumerate() {
            *probability = if self.usage[index] == 0 {
                0.5 + MIN_PROBABILITY
            } else if spread > 0.0 {
                (averages[index] - min) / spread + MIN_PROBABILITY
            } else {
                1.0 + MIN_PROBABILITY
            };
        }

        let sum: f64 = self.probabilities.iter().sum();
        for probability in &mut self.probabilities {
            *probability /= sum;
        }
    }
}
