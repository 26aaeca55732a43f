use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use gapflight::headless::{GifCapture, TrainingConfig, TrainingEnv, TrainingReport};
use gapflight::simulation::Headless;
use gapflight::{Session, SimConfig};

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Number of generations to evolve
    #[arg(long, default_value_t = 20)]
    generations: usize,

    /// Agents per generation
    #[arg(long, default_value_t = 50)]
    population: usize,

    /// Seed for obstacles and policy initialisation
    #[arg(long)]
    seed: Option<u64>,

    /// RON config file (defaults to ./gapflight.ron when present)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Override the score cap that ends a generation
    #[arg(long)]
    score_limit: Option<u32>,

    /// Hidden layer width of the policies
    #[arg(long, default_value_t = 6)]
    hidden: usize,

    /// Fly a different course every generation
    #[arg(long)]
    vary_course: bool,

    /// Write a RON training report to this path
    #[arg(long)]
    report: Option<PathBuf>,

    /// Capture the final generation as an animated GIF
    #[arg(long)]
    gif: Option<PathBuf>,
}

fn main() -> anyhow::Result<()> {
    env_logger::init();

    let args = Args::parse();

    let mut config = match &args.config {
        Some(path) => SimConfig::load_from(path)?,
        None => SimConfig::load()?,
    };
    if let Some(seed) = args.seed {
        config.run.seed = seed;
    }
    if let Some(limit) = args.score_limit {
        config.run.score_limit = limit;
    }
    config.run.vary_course |= args.vary_course;

    let training = TrainingConfig {
        generations: args.generations,
        population_size: args.population,
        hidden_dim: args.hidden,
        seed: config.run.seed,
        ..Default::default()
    };

    let session = Session::new(config).context("Invalid simulation config")?;
    let mut env = TrainingEnv::new(training, session);

    log::info!("Starting Gapflight");
    match &args.gif {
        Some(path) if env.config.generations > 0 => {
            // Train all but the last generation headless, then record it
            let last = env.config.generations.saturating_sub(1);
            env.config.generations = last;
            env.run(&mut Headless)?;

            let screen = &env.session().config().screen;
            let mut capture = GifCapture::new(
                screen.width as u16,
                screen.height as u16,
                env.session().silhouettes().clone(),
                4,
                300,
                15,
            );
            let stats = env.run_generation(&mut capture)?;
            log::info!(
                "Recorded generation {}: best {:.2}, score {}",
                stats.generation,
                stats.best_fitness,
                stats.score
            );
            env.config.generations = last + 1;
            capture.save(path)?;
        }
        _ => env.run(&mut Headless)?,
    }

    if let Some((_, fitness)) = env.champion() {
        log::info!("Best fitness over all generations: {:.2}", fitness);
    }

    if let Some(path) = &args.report {
        TrainingReport::from_env(&env).save(path)?;
    }

    Ok(())
}
