use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::timer::Phase;

/// Every accepted command and every phase transition produces an Event.
/// Rendering layers either poll `snapshot()` or consume these from the ticker.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Event {
    WorkoutStarted {
        rounds: u32,
        exercise_count: usize,
        total_secs: u64,
        at: DateTime<Utc>,
    },
    WorkoutPaused {
        phase: Phase,
        remaining_secs: u32,
        at: DateTime<Utc>,
    },
    WorkoutResumed {
        phase: Phase,
        remaining_secs: u32,
        at: DateTime<Utc>,
    },
    WorkoutRestarted {
        at: DateTime<Utc>,
    },
    WorkoutCleared {
        at: DateTime<Utc>,
    },
    /// A tick moved the engine into a new phase.
    PhaseEntered {
        phase: Phase,
        round: u32,
        exercise_index: usize,
        remaining_secs: u32,
        at: DateTime<Utc>,
    },
    WorkoutCompleted {
        rounds: u32,
        total_secs: u64,
        at: DateTime<Utc>,
    },
    StateSnapshot {
        phase: Phase,
        label: String,
        clock: String,
        round: u32,
        rounds: u32,
        round_indicator: Option<String>,
        exercise_index: usize,
        remaining_secs: u32,
        running: bool,
        paused: bool,
        live: bool,
        overall_progress_pct: f64,
        total_secs: u64,
        exercises: Vec<ExerciseView>,
        at: DateTime<Utc>,
    },
}

impl Event {
    /// Short snake_case name, used for log lines.
    pub fn kind(&self) -> &'static str {
        match self {
            Event::WorkoutStarted { .. } => "workout_started",
            Event::WorkoutPaused { .. } => "workout_paused",
            Event::WorkoutResumed { .. } => "workout_resumed",
            Event::WorkoutRestarted { .. } => "workout_restarted",
            Event::WorkoutCleared { .. } => "workout_cleared",
            Event::PhaseEntered { .. } => "phase_entered",
            Event::WorkoutCompleted { .. } => "workout_completed",
            Event::StateSnapshot { .. } => "state_snapshot",
        }
    }

    /// Single-line JSON, as written by the CLI's `--json` output.
    pub fn to_json_line(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }
}

/// Per-exercise row of a snapshot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExerciseView {
    pub name: String,
    pub duration_secs: u32,
    pub duration_clock: String,
    pub completed: bool,
    pub in_progress: bool,
    pub progress_pct: f64,
}
