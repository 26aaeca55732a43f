//! Integration tests for full generations
//!
//! These drive `Session::run_generation` end to end with the default
//! constants: spawn (230, 350), ground line 730, 68x48 agent silhouette,
//! obstacles spawning at x=600 and scrolling 5px per tick.

use gapflight::policy::{FeedForwardPolicy, Observation, Passive, ThresholdPolicy};
use gapflight::simulation::{
    AgentEntry, Fate, Headless, Presenter, Session, Snapshot, StopAfter, TerminationReason,
};
use gapflight::sprite::{Mask, Silhouettes};
use gapflight::SimConfig;
use rand::SeedableRng;
use rand_xoshiro::Xoshiro256StarStar;

/// Procedural agent frames with fully transparent obstacles, so nothing collides
fn ghost_obstacles() -> Silhouettes {
    let procedural = Silhouettes::procedural();
    Silhouettes::new(procedural.agent_frames.clone(), Mask::new(104, 640), 672.0)
}

/// Jumps whenever it sinks below y=400, hovering between roughly 307 and 403
fn hover() -> ThresholdPolicy {
    ThresholdPolicy { jump_below: 400.0 }
}

// ============================================================================
// Termination
// ============================================================================

#[test]
fn test_passive_agent_falls_to_ground() {
    let mut session = Session::new(SimConfig::default()).unwrap();
    let mut policy = Passive;
    let mut fitness = 0.0f32;

    let report = session
        .run_generation([AgentEntry::new(&mut policy, &mut fitness)], &mut Headless)
        .unwrap();

    // y after n ticks: 351.5, 357.5, 371, 387, then +16 per tick;
    // 387 + 16 * 19 = 691 is the first y with y + 48 > 730
    assert_eq!(report.reason, TerminationReason::PopulationExtinct);
    assert_eq!(report.ticks, 23);
    assert_eq!(report.score, 0);
    assert_eq!(report.generation, 1);

    let outcome = &report.outcomes[0];
    assert_eq!(outcome.fate, Fate::OutOfBounds);
    assert_eq!(outcome.ticks_survived, 23);
    assert!((fitness - 2.3).abs() < 1e-4);
    assert_eq!(outcome.fitness, fitness);
}

#[test]
fn test_score_limit_ends_generation_with_live_agents() {
    let mut config = SimConfig::default();
    config.run.score_limit = 0;
    let mut session = Session::with_silhouettes(config, ghost_obstacles()).unwrap();
    let mut policy = hover();
    let mut fitness = 0.0f32;

    let report = session
        .run_generation([AgentEntry::new(&mut policy, &mut fitness)], &mut Headless)
        .unwrap();

    // Trailing edge 704 - 5n drops below x=230 at n = 95
    assert_eq!(report.reason, TerminationReason::ScoreLimitReached);
    assert_eq!(report.ticks, 95);
    assert_eq!(report.score, 1);
    assert_eq!(report.outcomes[0].fate, Fate::Alive);
    assert!((fitness - (95.0 * 0.1 + 5.0)).abs() < 1e-3);
}

#[test]
fn test_pass_bonus_only_reaches_survivors() {
    let mut config = SimConfig::default();
    config.run.score_limit = 1;
    let mut session = Session::with_silhouettes(config, ghost_obstacles()).unwrap();
    let mut faller = Passive;
    let mut flyer = hover();
    let (mut faller_fitness, mut flyer_fitness) = (0.0f32, 0.0f32);

    let report = session
        .run_generation(
            [
                AgentEntry::new(&mut faller, &mut faller_fitness),
                AgentEntry::new(&mut flyer, &mut flyer_fitness),
            ],
            &mut Headless,
        )
        .unwrap();

    // Second obstacle spawns at tick 95 and is cleared 95 ticks later
    assert_eq!(report.reason, TerminationReason::ScoreLimitReached);
    assert_eq!(report.score, 2);
    assert_eq!(report.ticks, 190);

    assert_eq!(report.outcomes[0].fate, Fate::OutOfBounds);
    assert!((faller_fitness - 2.3).abs() < 1e-4);
    assert!((flyer_fitness - (190.0 * 0.1 + 2.0 * 5.0)).abs() < 1e-3);
}

#[test]
fn test_collision_applies_penalty() {
    let mut config = SimConfig::default();
    // Gap fixed at 50..250, well above the hovering agent
    config.obstacles.gap_min = 50;
    config.obstacles.gap_max = 51;
    let mut session = Session::new(config).unwrap();
    let mut policy = hover();
    let mut fitness = 0.0f32;

    let report = session
        .run_generation([AgentEntry::new(&mut policy, &mut fitness)], &mut Headless)
        .unwrap();

    assert_eq!(report.reason, TerminationReason::PopulationExtinct);
    assert_eq!(report.score, 0);
    let outcome = &report.outcomes[0];
    assert_eq!(outcome.fate, Fate::Collided);
    // Bounding boxes first overlap at tick 61 (x = 295)
    assert!(outcome.ticks_survived >= 61 && outcome.ticks_survived < 95);

    // Survival bonus for the final tick is kept, then the penalty applies
    let expected = outcome.ticks_survived as f32 * 0.1 - 1.0;
    assert!((fitness - expected).abs() < 1e-3);
}

#[test]
fn test_external_stop() {
    let mut session = Session::new(SimConfig::default()).unwrap();
    let mut policy = Passive;
    let mut fitness = 0.0f32;
    let mut presenter = StopAfter::new(10);

    let report = session
        .run_generation([AgentEntry::new(&mut policy, &mut fitness)], &mut presenter)
        .unwrap();

    assert_eq!(report.reason, TerminationReason::ExternalStop);
    assert_eq!(report.ticks, 10);
    assert_eq!(report.outcomes[0].fate, Fate::Alive);
    assert!((fitness - 1.0).abs() < 1e-4);
}

#[test]
fn test_empty_population_is_extinct_immediately() {
    let mut session = Session::new(SimConfig::default()).unwrap();
    let report = session
        .run_generation(Vec::<AgentEntry>::new(), &mut Headless)
        .unwrap();

    assert_eq!(report.reason, TerminationReason::PopulationExtinct);
    assert_eq!(report.ticks, 0);
    assert!(report.outcomes.is_empty());
}

// ============================================================================
// Policies and bookkeeping
// ============================================================================

#[test]
fn test_malformed_output_counts_as_no_jump() {
    let mut session = Session::new(SimConfig::default()).unwrap();
    let mut policy = |_: &Observation| f32::NAN;
    let mut fitness = 0.0f32;

    let report = session
        .run_generation([AgentEntry::new(&mut policy, &mut fitness)], &mut Headless)
        .unwrap();

    // Same trajectory as an agent that never jumps
    assert_eq!(report.reason, TerminationReason::PopulationExtinct);
    assert_eq!(report.ticks, 23);
}

#[test]
fn test_generation_counter_increments() {
    let mut session = Session::new(SimConfig::default()).unwrap();
    for expected in 1..=3 {
        let mut policy = Passive;
        let mut fitness = 0.0f32;
        let report = session
            .run_generation([AgentEntry::new(&mut policy, &mut fitness)], &mut Headless)
            .unwrap();
        assert_eq!(report.generation, expected);
    }
    assert_eq!(session.generation(), 3);
}

#[test]
fn test_same_seed_same_generation() {
    let mut config = SimConfig::default();
    config.run.seed = 99;
    config.run.max_ticks = Some(2_000);

    let run = || {
        let mut rng = Xoshiro256StarStar::seed_from_u64(1);
        let mut policies: Vec<FeedForwardPolicy> = (0..12)
            .map(|_| FeedForwardPolicy::random(4, &mut rng))
            .collect();
        let mut fitness = vec![0.0f32; policies.len()];
        let mut session = Session::new(config.clone()).unwrap();
        let entries = policies
            .iter_mut()
            .zip(fitness.iter_mut())
            .map(|(p, f)| AgentEntry::new(p, f));
        let report = session.run_generation(entries, &mut Headless).unwrap();
        (report, fitness)
    };

    let (report_a, fitness_a) = run();
    let (report_b, fitness_b) = run();
    assert_eq!(report_a, report_b);
    assert_eq!(fitness_a, fitness_b);
    assert_eq!(report_a.outcomes.len(), 12);
}

// ============================================================================
// Presentation
// ============================================================================

/// Records what every snapshot looked like
#[derive(Default)]
struct Recorder {
    ticks: Vec<u64>,
    scores: Vec<u32>,
    min_obstacles: usize,
    max_agents: usize,
}

impl Presenter for Recorder {
    fn present(&mut self, snapshot: &Snapshot<'_>) {
        self.ticks.push(snapshot.tick);
        self.scores.push(snapshot.score);
        self.min_obstacles = if self.ticks.len() == 1 {
            snapshot.obstacles.len()
        } else {
            self.min_obstacles.min(snapshot.obstacles.len())
        };
        self.max_agents = self.max_agents.max(snapshot.agents.len());
    }
}

#[test]
fn test_presenter_sees_every_tick() {
    let mut config = SimConfig::default();
    config.run.score_limit = 2;
    let mut session = Session::with_silhouettes(config, ghost_obstacles()).unwrap();
    let mut policy = hover();
    let mut fitness = 0.0f32;
    let mut recorder = Recorder::default();

    let report = session
        .run_generation([AgentEntry::new(&mut policy, &mut fitness)], &mut recorder)
        .unwrap();

    assert_eq!(recorder.ticks.len() as u64, report.ticks);
    assert!(recorder.ticks.windows(2).all(|w| w[1] == w[0] + 1));
    assert!(recorder.scores.windows(2).all(|w| w[1] >= w[0]));
    assert_eq!(*recorder.scores.last().unwrap(), report.score);
    assert!(recorder.min_obstacles >= 1);
    assert_eq!(recorder.max_agents, 1);
}
