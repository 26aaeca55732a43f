//! Agent control policies
//!
//! The engine only sees [`Policy::decide`]; how an output is produced (network,
//! lookup table, hand-written rule) is up to the optimizer that supplies it.

mod neural;

pub use neural::FeedForwardPolicy;

use serde::{Deserialize, Serialize};

use crate::entity::AgentBody;
use crate::error::PolicyError;
use crate::world::Obstacle;

/// Inputs handed to a policy each tick
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Observation {
    /// Agent's current y
    pub agent_height: f32,
    /// Vertical distance to the lower edge of the top segment
    pub distance_to_gap_top: f32,
    /// Vertical distance to the upper edge of the bottom segment
    pub distance_to_gap_bottom: f32,
}

impl Observation {
    pub const SIZE: usize = 3;

    pub fn new(body: &AgentBody, target: &Obstacle) -> Self {
        Self {
            agent_height: body.y,
            distance_to_gap_top: (body.y - target.gap_top() as f32).abs(),
            distance_to_gap_bottom: (body.y - target.gap_bottom() as f32).abs(),
        }
    }

    pub fn to_array(&self) -> [f32; Self::SIZE] {
        [
            self.agent_height,
            self.distance_to_gap_top,
            self.distance_to_gap_bottom,
        ]
    }
}

/// Opaque decision function supplied per agent
pub trait Policy {
    /// Scalar output; the engine jumps when it exceeds the decision threshold
    fn decide(&mut self, observation: &Observation) -> Result<f32, PolicyError>;
}

impl<F> Policy for F
where
    F: FnMut(&Observation) -> f32,
{
    fn decide(&mut self, observation: &Observation) -> Result<f32, PolicyError> {
        Ok(self(observation))
    }
}

/// Jumps whenever the agent sinks below a fixed height
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ThresholdPolicy {
    pub jump_below: f32,
}

impl Policy for ThresholdPolicy {
    fn decide(&mut self, observation: &Observation) -> Result<f32, PolicyError> {
        Ok(if observation.agent_height > self.jump_below {
            1.0
        } else {
            0.0
        })
    }
}

/// Never jumps
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Passive;

impl Policy for Passive {
    fn decide(&mut self, _observation: &Observation) -> Result<f32, PolicyError> {
        Ok(0.0)
    }
}
