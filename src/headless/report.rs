//! RON report of a training run

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::config::SimConfig;
use crate::policy::FeedForwardPolicy;

use super::training_env::{TrainingConfig, TrainingEnv, TrainingStats};

/// Everything needed to inspect or replay a training run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrainingReport {
    pub simulation: SimConfig,
    pub training: TrainingConfig,
    pub generations: Vec<TrainingStats>,
    pub champion: Option<FeedForwardPolicy>,
    pub champion_fitness: Option<f32>,
}

impl TrainingReport {
    pub fn from_env(env: &TrainingEnv) -> Self {
        let champion = env.champion();
        Self {
            simulation: env.session().config().clone(),
            training: env.config.clone(),
            generations: env.stats_history.clone(),
            champion: champion.map(|(p, _)| p.clone()),
            champion_fitness: champion.map(|(_, f)| f),
        }
    }

    pub fn to_ron(&self) -> Result<String> {
        ron::ser::to_string_pretty(self, ron::ser::PrettyConfig::default())
            .context("Failed to serialize training report")
    }

    /// Write the report, creating parent directories as needed
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        if let Some(dir) = path.parent().filter(|d| !d.as_os_str().is_empty()) {
            fs::create_dir_all(dir).context("Failed to create report directory")?;
        }
        fs::write(path, self.to_ron()?)
            .with_context(|| format!("Failed to write report {}", path.display()))?;
        log::info!("Report written to {}", path.display());
        Ok(())
    }

    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let text = fs::read_to_string(path)
            .with_context(|| format!("Failed to read report {}", path.display()))?;
        ron::from_str(&text).with_context(|| format!("Failed to parse report {}", path.display()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::simulation::{Headless, Session};

    #[test]
    fn test_report_from_env() {
        let mut sim = SimConfig::default();
        sim.run.max_ticks = Some(100);
        let session = Session::new(sim).unwrap();
        let training = TrainingConfig {
            generations: 1,
            population_size: 4,
            hidden_dim: 2,
            ..Default::default()
        };
        let mut env = TrainingEnv::new(training, session);
        env.run(&mut Headless).unwrap();

        let report = TrainingReport::from_env(&env);
        assert_eq!(report.generations.len(), 1);
        assert!(report.champion.is_some());
        assert_eq!(report.champion_fitness, Some(report.generations[0].best_fitness));

        let text = report.to_ron().unwrap();
        let parsed: TrainingReport = ron::from_str(&text).unwrap();
        assert_eq!(parsed.training, report.training);
        assert_eq!(parsed.generations.len(), 1);
    }

    #[test]
    fn test_save_and_load() {
        let report = TrainingReport {
            simulation: SimConfig::default(),
            training: TrainingConfig::default(),
            generations: Vec::new(),
            champion: None,
            champion_fitness: None,
        };
        let path = std::env::temp_dir().join("gapflight_report_test/report.ron");
        report.save(&path).unwrap();
        let loaded = TrainingReport::load(&path).unwrap();
        assert_eq!(loaded, report);
        let _ = fs::remove_dir_all(path.parent().unwrap());
    }
}
