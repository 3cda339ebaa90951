//! Workout flags shared by `run`, `plan` and `simulate`.

use clap::Args;
use interval_core::storage::ExerciseConfig;
use interval_core::{Config, ConfigError};
use std::path::PathBuf;

#[derive(Args, Debug, Clone, Default)]
pub struct WorkoutArgs {
    /// Preset file (defaults to ~/.config/interval/config.toml)
    #[arg(long)]
    pub preset: Option<PathBuf>,
    /// Get-ready countdown in seconds
    #[arg(long)]
    pub get_ready: Option<u32>,
    /// Global exercise time in seconds
    #[arg(long)]
    pub exercise_time: Option<u32>,
    /// Rest between rounds in seconds
    #[arg(long)]
    pub rest_rounds: Option<u32>,
    /// Rest between exercises in seconds
    #[arg(long)]
    pub rest_exercises: Option<u32>,
    /// Number of rounds
    #[arg(long)]
    pub rounds: Option<u32>,
    /// Exercise as NAME or NAME:SECS (repeatable, replaces the preset list).
    /// Any explicit SECS turns off the global exercise time.
    #[arg(long = "exercise", value_name = "NAME[:SECS]")]
    pub exercises: Vec<String>,
}

impl WorkoutArgs {
    /// Preset with command-line overrides applied.
    pub fn load_config(&self) -> interval_core::Result<Config> {
        let mut cfg = match &self.preset {
            Some(path) => Config::load_from(path)?,
            None => Config::load()?,
        };

        let workout = &mut cfg.workout;
        if let Some(secs) = self.get_ready {
            workout.get_ready_secs = secs;
        }
        if let Some(secs) = self.exercise_time {
            workout.global_exercise_secs = secs;
        }
        if let Some(secs) = self.rest_rounds {
            workout.rest_between_rounds_secs = secs;
        }
        if let Some(secs) = self.rest_exercises {
            workout.rest_between_exercises_secs = secs;
        }
        if let Some(rounds) = self.rounds {
            workout.rounds = rounds;
        }

        if !self.exercises.is_empty() {
            let exercises = self
                .exercises
                .iter()
                .map(String::as_str)
                .map(parse_exercise)
                .collect::<Result<Vec<_>, _>>()?;
            if exercises.iter().any(|e| e.duration_secs.is_some()) {
                cfg.workout.use_global_time = false;
            }
            cfg.exercises = exercises;
        }
        Ok(cfg)
    }
}

fn parse_exercise(arg: &str) -> Result<ExerciseConfig, ConfigError> {
    match arg.rsplit_once(':') {
        Some((name, secs)) => {
            let secs = secs
                .trim()
                .parse::<u32>()
                .map_err(|_| ConfigError::InvalidValue {
                    key: "--exercise".to_string(),
                    message: format!("invalid duration in '{arg}'"),
                })?;
            Ok(ExerciseConfig {
                name: name.trim().to_string(),
                duration_secs: Some(secs),
            })
        }
        None => Ok(ExerciseConfig {
            name: arg.trim().to_string(),
            duration_secs: None,
        }),
    }
}
