//! Generation results handed back to the optimizer

use serde::{Deserialize, Serialize};

/// Stable handle of an agent within one generation (its input position)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct AgentId(pub usize);

impl std::fmt::Display for AgentId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Why a generation stopped
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TerminationReason {
    /// Score went past the configured cap while agents were still alive
    ScoreLimitReached,
    /// No live agent left
    PopulationExtinct,
    /// The presenter asked to stop
    ExternalStop,
    /// The optional tick bound was hit
    TickLimitReached,
}

/// How an agent's run ended
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Fate {
    /// Still alive when the generation ended
    Alive,
    /// Touched an obstacle segment
    Collided,
    /// Left the band between the ceiling and the ground line
    OutOfBounds,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AgentOutcome {
    pub id: AgentId,
    /// Final accumulated fitness for this generation
    pub fitness: f32,
    pub fate: Fate,
    pub ticks_survived: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenerationReport {
    pub generation: u64,
    pub reason: TerminationReason,
    pub score: u32,
    pub ticks: u64,
    /// One entry per input agent, ordered by id
    pub outcomes: Vec<AgentOutcome>,
}

impl GenerationReport {
    pub fn best_fitness(&self) -> Option<f32> {
        self.outcomes.iter().map(|o| o.fitness).reduce(f32::max)
    }

    pub fn average_fitness(&self) -> Option<f32> {
        if self.outcomes.is_empty() {
            return None;
        }
        let total: f32 = self.outcomes.iter().map(|o| o.fitness).sum();
        Some(total / self.outcomes.len() as f32)
    }

    pub fn survivors(&self) -> usize {
        self.outcomes
            .iter()
            .filter(|o| o.fate == Fate::Alive)
            .count()
    }

    pub fn outcome(&self, id: AgentId) -> Option<&AgentOutcome> {
        self.outcomes.iter().find(|o| o.id == id)
    }
}
