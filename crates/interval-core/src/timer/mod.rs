mod display;
mod engine;
mod phase;
mod progress;
mod workout;

pub use display::{format_clock, phase_label, round_indicator};
pub use engine::IntervalEngine;
pub use phase::{Phase, RunState};
pub use progress::{elapsed_secs, exercise_progress_pct, overall_progress_pct};
pub use workout::{
    Exercise, PlannedPhase, Workout, DEFAULT_EXERCISE_SECS, DEFAULT_GET_READY_SECS,
    DEFAULT_REST_BETWEEN_EXERCISES_SECS, DEFAULT_REST_BETWEEN_ROUNDS_SECS, DEFAULT_ROUNDS,
};
