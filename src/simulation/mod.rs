//! Simulation systems - population, collision, generation loop

pub mod collision;
pub mod generation;
pub mod population;
pub mod presenter;
pub mod report;

pub use collision::{CollisionDetector, Contact, Segment};
pub use generation::{GenerationLoop, Session};
pub use population::{AgentEntry, FitnessAccumulator, FitnessSink, Population};
pub use presenter::{Headless, Presenter, Snapshot, StopAfter};
pub use report::{AgentId, AgentOutcome, Fate, GenerationReport, TerminationReason};
