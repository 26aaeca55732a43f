//! Training environment for evolving flight policies
//!
//! Truncation selection over feedforward policies: each generation is
//! evaluated by one [`Session::run_generation`], the fittest fraction
//! survives unchanged and the rest of the next population are mutated copies.

use anyhow::{Context, Result};
use rand::{Rng, SeedableRng};
use rand_xoshiro::Xoshiro256StarStar;
use serde::{Deserialize, Serialize};

use crate::policy::FeedForwardPolicy;
use crate::simulation::{AgentEntry, Presenter, Session, TerminationReason};

/// Configuration for the training run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrainingConfig {
    /// Number of generations to run
    pub generations: usize,
    /// Population size per generation
    pub population_size: usize,
    /// Hidden layer width of every policy
    pub hidden_dim: usize,
    /// Share of each generation copied unchanged into the next
    pub elite_fraction: f32,
    /// Probability per weight
    pub mutation_rate: f32,
    /// Max perturbation magnitude
    pub mutation_power: f32,
    /// Seed for initial weights and mutation
    pub seed: u64,
}

impl Default for TrainingConfig {
    fn default() -> Self {
        Self {
            generations: 20,
            population_size: 50,
            hidden_dim: 6,
            elite_fraction: 0.2,
            mutation_rate: 0.3,
            mutation_power: 0.5,
            seed: 0,
        }
    }
}

/// Statistics from one training generation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrainingStats {
    pub generation: u64,
    pub best_fitness: f32,
    pub avg_fitness: f32,
    pub score: u32,
    pub ticks: u64,
    pub reason: TerminationReason,
    /// Agents still alive at the end
    pub survivors: usize,
}

/// Main training environment
pub struct TrainingEnv {
    pub config: TrainingConfig,
    session: Session,
    rng: Xoshiro256StarStar,
    policies: Vec<FeedForwardPolicy>,
    champion: Option<(FeedForwardPolicy, f32)>,
    /// Statistics history
    pub stats_history: Vec<TrainingStats>,
}

impl TrainingEnv {
    /// Create a training environment with a random initial population
    pub fn new(config: TrainingConfig, session: Session) -> Self {
        let mut rng = Xoshiro256StarStar::seed_from_u64(config.seed);
        let policies = (0..config.population_size)
            .map(|_| FeedForwardPolicy::random(config.hidden_dim, &mut rng))
            .collect();

        Self {
            config,
            session,
            rng,
            policies,
            champion: None,
            stats_history: Vec::new(),
        }
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn policies(&self) -> &[FeedForwardPolicy] {
        &self.policies
    }

    /// Fittest policy seen so far and its fitness
    pub fn champion(&self) -> Option<(&FeedForwardPolicy, f32)> {
        self.champion.as_ref().map(|(p, f)| (p, *f))
    }

    /// Run the configured number of generations
    pub fn run(&mut self, presenter: &mut dyn Presenter) -> Result<()> {
        log::info!(
            "Starting training: {} generations, {} population",
            self.config.generations,
            self.config.population_size
        );

        for _ in 0..self.config.generations {
            let stats = self.run_generation(presenter)?;
            log::info!(
                "Generation {}: best {:.2}, avg {:.2}, score {}, {:?} after {} ticks",
                stats.generation,
                stats.best_fitness,
                stats.avg_fitness,
                stats.score,
                stats.reason,
                stats.ticks
            );
            if presenter.stop_requested() {
                log::info!("Stop requested, ending training early");
                break;
            }
        }
        Ok(())
    }

    /// Evaluate the current population once, then breed the next one
    pub fn run_generation(&mut self, presenter: &mut dyn Presenter) -> Result<TrainingStats> {
        let mut fitness = vec![0.0f32; self.policies.len()];
        let entries = self
            .policies
            .iter_mut()
            .zip(fitness.iter_mut())
            .map(|(policy, sink)| AgentEntry::new(policy, sink));
        let report = self
            .session
            .run_generation(entries, presenter)
            .context("Generation failed")?;

        // Stable sort: ties keep population order
        let mut ranked: Vec<usize> = (0..fitness.len()).collect();
        ranked.sort_by(|&a, &b| fitness[b].total_cmp(&fitness[a]));

        let best = ranked.first().map(|&i| (i, fitness[i]));
        let avg_fitness = if fitness.is_empty() {
            0.0
        } else {
            fitness.iter().sum::<f32>() / fitness.len() as f32
        };

        if let Some((index, value)) = best {
            if self.champion.as_ref().map_or(true, |(_, f)| value > *f) {
                self.champion = Some((self.policies[index].clone(), value));
            }
        }

        let stats = TrainingStats {
            generation: report.generation,
            best_fitness: best.map_or(0.0, |(_, f)| f),
            avg_fitness,
            score: report.score,
            ticks: report.ticks,
            reason: report.reason,
            survivors: report.survivors(),
        };
        self.stats_history.push(stats.clone());

        self.evolve(&ranked);
        Ok(stats)
    }

    /// Keep the elite unchanged and fill the rest with mutated elite copies
    ///
    /// `ranked` lists population indices, fittest first.
    fn evolve(&mut self, ranked: &[usize]) {
        if self.policies.is_empty() {
            return;
        }

        let size = self.policies.len();
        let elite_count =
            ((size as f32 * self.config.elite_fraction).ceil() as usize).clamp(1, size);
        let elites: Vec<FeedForwardPolicy> = ranked[..elite_count]
            .iter()
            .map(|&i| self.policies[i].clone())
            .collect();

        let mut next = elites.clone();
        while next.len() < size {
            let parent = &elites[self.rng.random_range(0..elite_count)];
            let mut child = parent.clone();
            child.mutate(
                self.config.mutation_rate,
                self.config.mutation_power,
                &mut self.rng,
            );
            next.push(child);
        }
        self.policies = next;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SimConfig;
    use crate::simulation::Headless;

    fn small_config() -> TrainingConfig {
        TrainingConfig {
            generations: 2,
            population_size: 8,
            hidden_dim: 3,
            seed: 5,
            ..Default::default()
        }
    }

    fn session() -> Session {
        let mut sim = SimConfig::default();
        sim.run.max_ticks = Some(300);
        Session::new(sim).unwrap()
    }

    #[test]
    fn test_training_config_default() {
        let config = TrainingConfig::default();
        assert_eq!(config.population_size, 50);
        assert!(config.elite_fraction > 0.0 && config.elite_fraction <= 1.0);
    }

    #[test]
    fn test_training_env_creation() {
        let env = TrainingEnv::new(small_config(), session());
        assert_eq!(env.policies().len(), 8);
        assert!(env.champion().is_none());
        assert_eq!(env.session().generation(), 0);
    }

    #[test]
    fn test_generations_keep_population_size() {
        let mut env = TrainingEnv::new(small_config(), session());
        env.run(&mut Headless).unwrap();

        assert_eq!(env.stats_history.len(), 2);
        assert_eq!(env.stats_history[1].generation, 2);
        assert_eq!(env.policies().len(), 8);
        for stats in &env.stats_history {
            assert!(stats.best_fitness >= stats.avg_fitness);
        }
        let (_, best) = env.champion().unwrap();
        let best_seen = env
            .stats_history
            .iter()
            .map(|s| s.best_fitness)
            .fold(f32::MIN, f32::max);
        assert_eq!(best, best_seen);
    }

    #[test]
    fn test_elite_survives_unchanged() {
        let mut env = TrainingEnv::new(small_config(), session());
        env.run_generation(&mut Headless).unwrap();
        let (champion, _) = env.champion().unwrap();
        // Ranked first, so copied into slot 0 of the next population
        assert_eq!(&env.policies()[0], champion);
    }

    #[test]
    fn test_training_is_seeded() {
        let mut a = TrainingEnv::new(small_config(), session());
        let mut b = TrainingEnv::new(small_config(), session());
        a.run(&mut Headless).unwrap();
        b.run(&mut Headless).unwrap();
        assert_eq!(a.stats_history, b.stats_history);
        assert_eq!(a.policies(), b.policies());
    }
}
