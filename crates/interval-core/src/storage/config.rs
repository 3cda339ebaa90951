//! TOML-based workout presets.
//!
//! A preset describes the workout an engine starts with:
//! - Get-ready, rest and round settings
//! - The global exercise time and whether it applies to every exercise
//! - The ordered exercise list
//! - The tick period used by the CLI driver
//!
//! Presets are read from `~/.config/interval/config.toml` or an explicit
//! path. They are never written back.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

use super::config_dir;
use crate::error::ConfigError;
use crate::timer::{
    IntervalEngine, Workout, DEFAULT_EXERCISE_SECS, DEFAULT_GET_READY_SECS,
    DEFAULT_REST_BETWEEN_EXERCISES_SECS, DEFAULT_REST_BETWEEN_ROUNDS_SECS, DEFAULT_ROUNDS,
};

/// Workout timing settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkoutConfig {
    #[serde(default = "default_get_ready_secs")]
    pub get_ready_secs: u32,
    #[serde(default = "default_exercise_secs")]
    pub global_exercise_secs: u32,
    #[serde(default = "default_true")]
    pub use_global_time: bool,
    #[serde(default = "default_rest_between_rounds_secs")]
    pub rest_between_rounds_secs: u32,
    #[serde(default = "default_rest_between_exercises_secs")]
    pub rest_between_exercises_secs: u32,
    #[serde(default = "default_rounds")]
    pub rounds: u32,
}

/// One `[[exercises]]` entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExerciseConfig {
    pub name: String,
    /// Falls back to the global exercise time when absent.
    #[serde(default)]
    pub duration_secs: Option<u32>,
}

/// Preset configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub workout: WorkoutConfig,
    #[serde(default = "default_exercises")]
    pub exercises: Vec<ExerciseConfig>,
    /// Tick period in milliseconds.
    #[serde(default = "default_tick_millis")]
    pub tick_millis: u64,
}

fn default_get_ready_secs() -> u32 {
    DEFAULT_GET_READY_SECS
}
fn default_exercise_secs() -> u32 {
    DEFAULT_EXERCISE_SECS
}
fn default_rest_between_rounds_secs() -> u32 {
    DEFAULT_REST_BETWEEN_ROUNDS_SECS
}
fn default_rest_between_exercises_secs() -> u32 {
    DEFAULT_REST_BETWEEN_EXERCISES_SECS
}
fn default_rounds() -> u32 {
    DEFAULT_ROUNDS
}
fn default_true() -> bool {
    true
}
fn default_tick_millis() -> u64 {
    1000
}
fn default_exercises() -> Vec<ExerciseConfig> {
    vec![ExerciseConfig {
        name: "Exercise 1".into(),
        duration_secs: None,
    }]
}

impl Default for WorkoutConfig {
    fn default() -> Self {
        Self {
            get_ready_secs: default_get_ready_secs(),
            global_exercise_secs: default_exercise_secs(),
            use_global_time: true,
            rest_between_rounds_secs: default_rest_between_rounds_secs(),
            rest_between_exercises_secs: default_rest_between_exercises_secs(),
            rounds: default_rounds(),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            workout: WorkoutConfig::default(),
            exercises: default_exercises(),
            tick_millis: default_tick_millis(),
        }
    }
}

impl Config {
    fn get_json_value_by_path<'a>(
        root: &'a serde_json::Value,
        key: &str,
    ) -> Option<&'a serde_json::Value> {
        if key.is_empty() {
            return None;
        }

        let mut current = root;
        for part in key.split('.') {
            current = match current {
                serde_json::Value::Array(items) => items.get(part.parse::<usize>().ok()?)?,
                other => other.get(part)?,
            };
        }
        Some(current)
    }

    /// Default preset location.
    pub fn path() -> Result<PathBuf, ConfigError> {
        Ok(config_dir()?.join("config.toml"))
    }

    /// Load the default preset, or defaults when the file does not exist.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be read or parsed.
    pub fn load() -> Result<Self, ConfigError> {
        let path = Self::path()?;
        if !path.exists() {
            return Ok(Self::default());
        }
        Self::load_from(&path)
    }

    /// Load a preset from an explicit path.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::LoadFailed {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;
        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(content)?)
    }

    /// Get a config value as string by dot-separated key, e.g.
    /// `workout.rounds` or `exercises.0.name`.
    pub fn get(&self, key: &str) -> Option<String> {
        let json = serde_json::to_value(self).ok()?;
        let val = Self::get_json_value_by_path(&json, key)?;
        match val {
            serde_json::Value::String(s) => Some(s.clone()),
            other => Some(other.to_string()),
        }
    }

    /// Tick period for the driver.
    ///
    /// # Errors
    ///
    /// Returns an error when `tick_millis` is zero.
    pub fn tick_period(&self) -> Result<Duration, ConfigError> {
        if self.tick_millis == 0 {
            return Err(ConfigError::InvalidValue {
                key: "tick_millis".into(),
                message: "must be greater than zero".into(),
            });
        }
        Ok(Duration::from_millis(self.tick_millis))
    }

    /// Build a validated workout from this preset.
    ///
    /// # Errors
    ///
    /// Returns an error for zero rounds, zero exercise durations or an empty
    /// exercise list.
    pub fn build_workout(&self) -> Result<Workout, ConfigError> {
        let settings = &self.workout;
        let Some((first, rest)) = self.exercises.split_first() else {
            return Err(ConfigError::InvalidValue {
                key: "exercises".into(),
                message: "at least one exercise is required".into(),
            });
        };

        let mut workout = Workout::default();
        // explicit durations first, the global time is applied last
        workout.set_use_global_time(false);
        workout
            .set_global_exercise_secs(settings.global_exercise_secs)
            .map_err(|_| invalid("workout.global_exercise_secs"))?;
        workout
            .set_rounds(settings.rounds)
            .map_err(|_| invalid("workout.rounds"))?;
        workout.set_get_ready_secs(settings.get_ready_secs);
        workout.set_rest_between_rounds_secs(settings.rest_between_rounds_secs);
        workout.set_rest_between_exercises_secs(settings.rest_between_exercises_secs);

        let secs_of = |e: &ExerciseConfig| e.duration_secs.unwrap_or(settings.global_exercise_secs);
        workout.rename_exercise(0, first.name.clone())?;
        workout
            .set_exercise_duration(0, secs_of(first))
            .map_err(|_| invalid("exercises.0.duration_secs"))?;
        for (i, exercise) in rest.iter().enumerate() {
            workout
                .add_named_exercise(exercise.name.clone(), secs_of(exercise))
                .map_err(|_| invalid(&format!("exercises.{}.duration_secs", i + 1)))?;
        }

        workout.set_use_global_time(settings.use_global_time);
        Ok(workout)
    }

    pub fn build_engine(&self) -> Result<IntervalEngine, ConfigError> {
        Ok(IntervalEngine::new(self.build_workout()?))
    }
}

fn invalid(key: &str) -> ConfigError {
    ConfigError::InvalidValue {
        key: key.to_string(),
        message: "must be greater than zero".to_string(),
    }
}
