//! Small feedforward network policy
//!
//! Observation -> hidden (tanh) -> single output (tanh). Weights are a flat
//! vector so an external optimizer can evolve them directly.

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::error::PolicyError;

use super::{Observation, Policy};

const WEIGHT_LIMIT: f32 = 4.0;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeedForwardPolicy {
    weights: Vec<f32>,
    hidden_dim: usize,
}

impl FeedForwardPolicy {
    const INPUT_DIM: usize = Observation::SIZE;
    const OUTPUT_DIM: usize = 1;

    /// Weights plus biases for the given hidden layer width
    pub fn weight_count(hidden_dim: usize) -> usize {
        Self::INPUT_DIM * hidden_dim + hidden_dim + hidden_dim * Self::OUTPUT_DIM + Self::OUTPUT_DIM
    }

    /// Wrap an existing flat weight vector
    pub fn from_weights(hidden_dim: usize, weights: Vec<f32>) -> Result<Self, PolicyError> {
        let expected = Self::weight_count(hidden_dim);
        if weights.len() != expected {
            return Err(PolicyError::Evaluation(format!(
                "expected {} weights for hidden width {}, got {}",
                expected,
                hidden_dim,
                weights.len()
            )));
        }
        Ok(Self {
            weights,
            hidden_dim,
        })
    }

    /// Uniform random weights in [-1, 1)
    pub fn random<R: Rng + ?Sized>(hidden_dim: usize, rng: &mut R) -> Self {
        let weights = (0..Self::weight_count(hidden_dim))
            .map(|_| rng.random_range(-1.0..1.0))
            .collect();
        Self {
            weights,
            hidden_dim,
        }
    }

    /// Perturb (90%) or replace (10%) each weight with probability `rate`
    ///
    /// Returns how many weights changed.
    pub fn mutate<R: Rng + ?Sized>(&mut self, rate: f32, power: f32, rng: &mut R) -> usize {
        let mut mutated = 0;
        for weight in &mut self.weights {
            if rng.random::<f32>() < rate {
                if rng.random::<f32>() < 0.9 {
                    if power > 0.0 {
                        *weight += rng.random_range(-power..power);
                    }
                    *weight = weight.clamp(-WEIGHT_LIMIT, WEIGHT_LIMIT);
                } else {
                    *weight = rng.random_range(-2.0..2.0);
                }
                mutated += 1;
            }
        }
        mutated
    }

    pub fn hidden_dim(&self) -> usize {
        self.hidden_dim
    }

    pub fn weights(&self) -> &[f32] {
        &self.weights
    }

    /// Forward pass
    pub fn forward(&self, input: &[f32; Observation::SIZE]) -> f32 {
        let (input_weights, rest) = self.weights.split_at(Self::INPUT_DIM * self.hidden_dim);
        let (hidden_bias, rest) = rest.split_at(self.hidden_dim);
        let (output_weights, output_bias) = rest.split_at(self.hidden_dim);

        let mut sum = output_bias[0];
        for (h, bias) in hidden_bias.iter().enumerate() {
            let row = &input_weights[h * Self::INPUT_DIM..(h + 1) * Self::INPUT_DIM];
            let activation: f32 = row.iter().zip(input).map(|(w, x)| w * x).sum::<f32>() + bias;
            sum += activation.tanh() * output_weights[h];
        }
        sum.tanh()
    }
}

impl Policy for FeedForwardPolicy {
    fn decide(&mut self, observation: &Observation) -> Result<f32, PolicyError> {
        let output = self.forward(&observation.to_array());
        if output.is_finite() {
            Ok(output)
        } else {
            Err(PolicyError::NonFinite(output))
        }
    }
}
