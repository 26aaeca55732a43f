//! Generation driver: fixed-step tick loop and termination
//!
//! Tick order: scroll ground, scroll obstacles, agent decisions, collision
//! penalties, culling, pass detection, retirement, presentation.

use crate::config::SimConfig;
use crate::error::{EngineError, EngineResult};
use crate::sprite::Silhouettes;
use crate::world::{ObstacleStream, ScrollTrack};

use super::collision::CollisionDetector;
use super::population::{AgentEntry, Population};
use super::presenter::{Presenter, Snapshot};
use super::report::{AgentId, AgentOutcome, Fate, GenerationReport, TerminationReason};

/// Owns validated parameters and silhouettes plus the generation counter
#[derive(Debug, Clone)]
pub struct Session {
    config: SimConfig,
    silhouettes: Silhouettes,
    generation: u64,
}

impl Session {
    /// Session with the procedural silhouettes
    pub fn new(config: SimConfig) -> EngineResult<Self> {
        Self::with_silhouettes(config, Silhouettes::procedural())
    }

    pub fn with_silhouettes(config: SimConfig, silhouettes: Silhouettes) -> EngineResult<Self> {
        config.validate()?;
        silhouettes.validate()?;
        Ok(Self {
            config,
            silhouettes,
            generation: 0,
        })
    }

    pub fn config(&self) -> &SimConfig {
        &self.config
    }

    pub fn silhouettes(&self) -> &Silhouettes {
        &self.silhouettes
    }

    /// Number of generations started so far
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Obstacle seed for the given generation
    pub fn course_seed(&self, generation: u64) -> u64 {
        if self.config.run.vary_course {
            self.config.run.seed.wrapping_add(generation)
        } else {
            self.config.run.seed
        }
    }

    /// Run one generation to termination
    ///
    /// Fitness reaches each entry's sink as it accrues, so the sinks hold
    /// final values once this returns, whatever the outcome.
    pub fn run_generation<'a, I>(
        &mut self,
        agents: I,
        presenter: &mut dyn Presenter,
    ) -> EngineResult<GenerationReport>
    where
        I: IntoIterator<Item = AgentEntry<'a>>,
    {
        self.generation += 1;
        let seed = self.course_seed(self.generation);
        GenerationLoop::new(&self.config, &self.silhouettes, self.generation, seed, agents)
            .run(presenter)
    }
}

/// State of one running generation
pub struct GenerationLoop<'s, 'a> {
    config: &'s SimConfig,
    silhouettes: &'s Silhouettes,
    generation: u64,
    population: Population<'a>,
    stream: ObstacleStream,
    track: ScrollTrack,
    score: u32,
    tick: u64,
    removed: Vec<AgentOutcome>,
}

impl<'s, 'a> GenerationLoop<'s, 'a> {
    pub fn new<I>(
        config: &'s SimConfig,
        silhouettes: &'s Silhouettes,
        generation: u64,
        seed: u64,
        agents: I,
    ) -> Self
    where
        I: IntoIterator<Item = AgentEntry<'a>>,
    {
        let population = Population::new(agents, &config.agent);
        let stream = ObstacleStream::new(
            config.obstacles.clone(),
            silhouettes.segment_height(),
            silhouettes.obstacle_width(),
            seed,
        );
        let track = ScrollTrack::new(config.screen.ground_y, silhouettes.ground_width);

        Self {
            config,
            silhouettes,
            generation,
            population,
            stream,
            track,
            score: 0,
            tick: 0,
            removed: Vec::new(),
        }
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn ticks(&self) -> u64 {
        self.tick
    }

    pub fn population(&self) -> &Population<'a> {
        &self.population
    }

    pub fn stream(&self) -> &ObstacleStream {
        &self.stream
    }

    pub fn snapshot(&self) -> Snapshot<'_> {
        Snapshot {
            generation: self.generation,
            tick: self.tick,
            score: self.score,
            agents: self.population.bodies().collect(),
            obstacles: self.stream.iter().collect(),
            track: &self.track,
        }
    }

    /// Terminal state reached by the simulation itself, if any
    pub fn termination(&self) -> Option<TerminationReason> {
        if self.score > self.config.run.score_limit {
            Some(TerminationReason::ScoreLimitReached)
        } else if self.population.is_empty() {
            Some(TerminationReason::PopulationExtinct)
        } else {
            None
        }
    }

    /// Advance one fixed tick
    pub fn step(&mut self) -> EngineResult<()> {
        self.tick += 1;
        let config = self.config;

        self.track.advance(config.obstacles.scroll_speed);
        self.stream.advance();

        let Some(reference_x) = self.population.reference_x() else {
            return Ok(());
        };
        let target = self
            .stream
            .relevant(reference_x)
            .ok_or(EngineError::Observation { tick: self.tick })?;
        self.population.step(target, &config.agent, &config.fitness);

        // Ids are visited in ascending order, so `collided` stays sorted
        let detector = CollisionDetector::new(self.silhouettes);
        let stream = &self.stream;
        let collided: Vec<AgentId> = self
            .population
            .bodies()
            .filter(|(_, body)| stream.iter().any(|o| detector.collides(body, o)))
            .map(|(id, _)| id)
            .collect();
        for &id in &collided {
            self.population.on_collision(id, &config.fitness);
        }

        let silhouettes = self.silhouettes;
        let ground_y = config.screen.ground_y;
        let removed = self.population.cull(|id, body| {
            let height = silhouettes.agent_frame(body.frame()).height() as f32;
            if collided.binary_search(&id).is_ok() {
                Some(Fate::Collided)
            } else if body.is_out_of_band(height, ground_y) {
                Some(Fate::OutOfBounds)
            } else {
                None
            }
        });
        self.removed.extend(removed);

        if let Some(leading_x) = self.population.leading_x() {
            let passes = self.stream.update_passes(leading_x);
            for _ in 0..passes {
                self.score += 1;
                self.population.on_obstacle_passed(&config.fitness);
            }
            if passes > 0 {
                log::debug!("Tick {}: score {}", self.tick, self.score);
            }
        }
        self.stream.retire();

        log::trace!(
            "Tick {}: {} alive, {} obstacles, score {}",
            self.tick,
            self.population.len(),
            self.stream.len(),
            self.score
        );
        Ok(())
    }

    /// Tick until a terminal state, presenting every tick
    pub fn run(mut self, presenter: &mut dyn Presenter) -> EngineResult<GenerationReport> {
        log::info!(
            "Generation {} started with {} agents",
            self.generation,
            self.population.len()
        );

        let reason = loop {
            if let Some(reason) = self.termination() {
                break reason;
            }
            if presenter.stop_requested() {
                break TerminationReason::ExternalStop;
            }
            if self
                .config
                .run
                .max_ticks
                .is_some_and(|limit| self.tick >= limit)
            {
                break TerminationReason::TickLimitReached;
            }

            self.step()?;
            if presenter.wants_frames() {
                presenter.present(&self.snapshot());
            }
        };

        log::info!(
            "Generation {} ended after {} ticks: {:?}, score {}",
            self.generation,
            self.tick,
            reason,
            self.score
        );

        let mut outcomes = self.removed;
        outcomes.extend(self.population.into_survivors());
        outcomes.sort_by_key(|o| o.id);

        Ok(GenerationReport {
            generation: self.generation,
            reason,
            score: self.score,
            ticks: self.tick,
            outcomes,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::policy::{Observation, Passive, ThresholdPolicy};
    use crate::simulation::Headless;
    use crate::sprite::{Mask, AGENT_FRAMES};

    #[test]
    fn test_session_rejects_invalid_config() {
        let mut config = SimConfig::default();
        config.obstacles.gap_min = 500;
        assert!(matches!(
            Session::new(config),
            Err(EngineError::Configuration(_))
        ));
    }

    #[test]
    fn test_session_rejects_empty_agent_silhouette() {
        let frames: [Mask; AGENT_FRAMES] = std::array::from_fn(|_| Mask::new(68, 48));
        let silhouettes = Silhouettes::new(frames, Mask::filled(104, 640), 672.0);
        assert!(Session::with_silhouettes(SimConfig::default(), silhouettes).is_err());
    }

    #[test]
    fn test_course_seed() {
        let mut config = SimConfig::default();
        config.run.seed = 10;
        let session = Session::new(config.clone()).unwrap();
        assert_eq!(session.course_seed(1), 10);
        assert_eq!(session.course_seed(2), 10);

        config.run.vary_course = true;
        let session = Session::new(config).unwrap();
        assert_eq!(session.course_seed(1), 11);
        assert_eq!(session.course_seed(2), 12);
    }

    #[test]
    fn test_step_scrolls_world() {
        let config = SimConfig::default();
        let silhouettes = Silhouettes::procedural();
        let mut policy = Passive;
        let mut sink = 0.0f32;
        let mut generation = GenerationLoop::new(
            &config,
            &silhouettes,
            1,
            0,
            [AgentEntry::new(&mut policy, &mut sink)],
        );

        generation.step().unwrap();
        assert_eq!(generation.ticks(), 1);
        assert_eq!(generation.stream().iter().next().unwrap().x, 595.0);

        let snapshot = generation.snapshot();
        assert_eq!(snapshot.agents.len(), 1);
        assert_eq!(snapshot.track.offsets()[0], -5.0);
        assert!((snapshot.agents[0].1.y - 351.5).abs() < 1e-4);
    }

    #[test]
    fn test_step_past_first_pass() {
        let config = SimConfig::default();
        let procedural = Silhouettes::procedural();
        // See-through obstacles so the hovering agent survives the pass
        let silhouettes =
            Silhouettes::new(procedural.agent_frames.clone(), Mask::new(104, 640), 672.0);
        let mut policy = ThresholdPolicy { jump_below: 400.0 };
        let mut sink = 0.0f32;
        {
            let mut generation = GenerationLoop::new(
                &config,
                &silhouettes,
                1,
                0,
                [AgentEntry::new(&mut policy, &mut sink)],
            );

            for _ in 0..94 {
                generation.step().unwrap();
            }
            assert_eq!(generation.score(), 0);
            assert_eq!(generation.stream().len(), 1);

            // Trailing edge 704 - 5 * 95 = 229 clears x=230 on this tick
            generation.step().unwrap();
            assert_eq!(generation.score(), 1);
            assert_eq!(generation.population().len(), 1);
            assert_eq!(generation.stream().len(), 2);

            let next = generation.stream().relevant(230.0).unwrap();
            assert_eq!(next.x, 600.0);
            assert!(!next.passed());

            for _ in 0..10 {
                generation.step().unwrap();
                assert!(generation.stream().len() >= 1);
            }
            assert_eq!(generation.score(), 1);
            assert!(generation.termination().is_none());
        }
        assert!((sink - (105.0 * 0.1 + 5.0)).abs() < 1e-3);
    }

    #[test]
    fn test_tick_limit() {
        let mut config = SimConfig::default();
        config.run.max_ticks = Some(5);
        let mut session = Session::new(config).unwrap();
        // Jumps whenever it drops below the spawn height, so it hovers
        let mut policy = |obs: &Observation| {
            if obs.agent_height > 350.0 {
                1.0f32
            } else {
                0.0
            }
        };
        let mut sink = 0.0f32;

        let report = session
            .run_generation([AgentEntry::new(&mut policy, &mut sink)], &mut Headless)
            .unwrap();
        assert_eq!(report.reason, TerminationReason::TickLimitReached);
        assert_eq!(report.ticks, 5);
        assert_eq!(report.outcomes[0].fate, Fate::Alive);
    }
}
