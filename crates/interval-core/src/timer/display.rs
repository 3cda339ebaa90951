//! Text helpers for rendering layers.

use super::phase::{Phase, RunState};
use super::workout::Workout;

/// Format seconds as `mm:ss`. Minutes are not folded into hours.
pub fn format_clock(secs: u64) -> String {
    format!("{:02}:{:02}", secs / 60, secs % 60)
}

/// Label for the current phase. While working an exercise this is the
/// exercise name, falling back to "Work" when it is blank.
pub fn phase_label(workout: &Workout, run: &RunState) -> String {
    if run.phase == Phase::Run {
        if let Some(exercise) = workout.exercise(run.current_exercise_index) {
            if !exercise.name.is_empty() {
                return exercise.name.clone();
            }
        }
    }
    run.phase.label().to_string()
}

/// "Round r/n" for phases inside a round.
pub fn round_indicator(workout: &Workout, run: &RunState) -> Option<String> {
    run.phase
        .in_round()
        .then(|| format!("Round {}/{}", run.current_round, workout.rounds()))
}
