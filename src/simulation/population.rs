//! Live agents of one generation and their fitness bookkeeping
//!
//! Each agent is one slot holding its body, its policy and its fitness
//! accumulator together, so removal can never misalign the three.

use crate::config::{AgentConfig, FitnessConfig};
use crate::entity::AgentBody;
use crate::policy::{Observation, Policy};
use crate::world::Obstacle;

use super::report::{AgentId, AgentOutcome, Fate};

/// Externally owned fitness record, updated on every credit
pub trait FitnessSink {
    fn credit(&mut self, delta: f32);
}

impl FitnessSink for f32 {
    fn credit(&mut self, delta: f32) {
        *self += delta;
    }
}

impl FitnessSink for f64 {
    fn credit(&mut self, delta: f32) {
        *self += f64::from(delta);
    }
}

/// One (policy, fitness sink) pair supplied by the optimizer
pub struct AgentEntry<'a> {
    pub policy: &'a mut dyn Policy,
    pub fitness: &'a mut dyn FitnessSink,
}

impl<'a> AgentEntry<'a> {
    pub fn new(policy: &'a mut dyn Policy, fitness: &'a mut dyn FitnessSink) -> Self {
        Self { policy, fitness }
    }
}

/// Generation-local fitness that writes every change through to its sink
pub struct FitnessAccumulator<'a> {
    value: f32,
    sink: &'a mut dyn FitnessSink,
}

impl<'a> FitnessAccumulator<'a> {
    pub fn new(sink: &'a mut dyn FitnessSink) -> Self {
        Self { value: 0.0, sink }
    }

    pub fn credit(&mut self, delta: f32) {
        self.value += delta;
        self.sink.credit(delta);
    }

    #[inline]
    pub fn value(&self) -> f32 {
        self.value
    }
}

struct Slot<'a> {
    id: AgentId,
    body: AgentBody,
    policy: &'a mut dyn Policy,
    fitness: FitnessAccumulator<'a>,
    ticks_survived: u64,
}

impl Slot<'_> {
    fn outcome(&self, fate: Fate) -> AgentOutcome {
        AgentOutcome {
            id: self.id,
            fitness: self.fitness.value(),
            fate,
            ticks_survived: self.ticks_survived,
        }
    }
}

/// Live agents in insertion order
pub struct Population<'a> {
    slots: Vec<Slot<'a>>,
}

impl<'a> Population<'a> {
    /// Spawn one body per entry; ids follow input order
    pub fn new<I>(entries: I, params: &AgentConfig) -> Self
    where
        I: IntoIterator<Item = AgentEntry<'a>>,
    {
        let slots = entries
            .into_iter()
            .enumerate()
            .map(|(i, entry)| Slot {
                id: AgentId(i),
                body: AgentBody::spawn(params),
                policy: entry.policy,
                fitness: FitnessAccumulator::new(entry.fitness),
                ticks_survived: 0,
            })
            .collect();
        Self { slots }
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    pub fn bodies(&self) -> impl Iterator<Item = (AgentId, &AgentBody)> + use<'_, 'a> {
        self.slots.iter().map(|s| (s.id, &s.body))
    }

    pub fn body(&self, id: AgentId) -> Option<&AgentBody> {
        self.slots.iter().find(|s| s.id == id).map(|s| &s.body)
    }

    pub fn fitness(&self, id: AgentId) -> Option<f32> {
        self.slots
            .iter()
            .find(|s| s.id == id)
            .map(|s| s.fitness.value())
    }

    /// X of the first live agent, used to pick the observed obstacle
    pub fn reference_x(&self) -> Option<f32> {
        self.slots.first().map(|s| s.body.x)
    }

    /// Rightmost live agent x, used for pass detection
    pub fn leading_x(&self) -> Option<f32> {
        self.slots.iter().map(|s| s.body.x).reduce(f32::max)
    }

    /// Survival bonus, motion, then one decision per agent against `target`
    pub fn step(&mut self, target: &Obstacle, agent: &AgentConfig, fitness: &FitnessConfig) {
        for slot in &mut self.slots {
            slot.fitness.credit(fitness.survival_bonus);
            slot.body.tick(agent);
            slot.ticks_survived += 1;

            let observation = Observation::new(&slot.body, target);
            let output = match slot.policy.decide(&observation) {
                Ok(output) if output.is_finite() => output,
                Ok(output) => {
                    log::warn!(
                        "Agent {} returned non-finite output {}, treating as no jump",
                        slot.id,
                        output
                    );
                    continue;
                }
                Err(e) => {
                    log::warn!("Agent {} policy failed: {}, treating as no jump", slot.id, e);
                    continue;
                }
            };

            if output > agent.decision_threshold {
                slot.body.jump(agent);
            }
        }
    }

    /// Credit the pass bonus to every live agent
    pub fn on_obstacle_passed(&mut self, fitness: &FitnessConfig) {
        for slot in &mut self.slots {
            slot.fitness.credit(fitness.pass_bonus);
        }
    }

    /// Apply the collision penalty; returns false if `id` is not alive
    pub fn on_collision(&mut self, id: AgentId, fitness: &FitnessConfig) -> bool {
        match self.slots.iter_mut().find(|s| s.id == id) {
            Some(slot) => {
                slot.fitness.credit(-fitness.collision_penalty);
                true
            }
            None => false,
        }
    }

    /// Remove every agent `classify` assigns a fate to
    ///
    /// The scan and the removal are a single `retain`, so removing one agent
    /// never shifts another out of the scan. Outcomes are returned in id order.
    pub fn cull<F>(&mut self, mut classify: F) -> Vec<AgentOutcome>
    where
        F: FnMut(AgentId, &AgentBody) -> Option<Fate>,
    {
        let mut removed = Vec::new();
        self.slots.retain(|slot| match classify(slot.id, &slot.body) {
            Some(fate) => {
                log::debug!(
                    "Agent {} removed ({:?}) with fitness {:.2}",
                    slot.id,
                    fate,
                    slot.fitness.value()
                );
                removed.push(slot.outcome(fate));
                false
            }
            None => true,
        });
        removed
    }

    /// Outcomes of the agents still alive, consuming the population
    pub fn into_survivors(self) -> Vec<AgentOutcome> {
        self.slots.iter().map(|s| s.outcome(Fate::Alive)).collect()
    }
}
