//! Simulated bodies

pub mod agent;

pub use agent::AgentBody;
