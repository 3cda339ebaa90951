//! Overall and per-exercise completion percentages.
//!
//! Both are pure functions of the workout and the run state so rendering
//! layers can call them once per frame.

use super::phase::{Phase, RunState};
use super::workout::Workout;

/// 0.0 .. 100.0 progress across the whole workout.
///
/// Returns 0 in `Idle` and also in `Completed`, even though the whole
/// planned time has elapsed at that point. Renderers that want a full bar
/// on completion must special-case the phase themselves.
pub fn overall_progress_pct(workout: &Workout, run: &RunState) -> f64 {
    if matches!(run.phase, Phase::Idle | Phase::Completed) {
        return 0.0;
    }
    let total = workout.total_planned_secs();
    if total == 0 {
        return 0.0;
    }
    let elapsed = elapsed_secs(workout, run);
    (elapsed as f64 / total as f64 * 100.0).clamp(0.0, 100.0)
}

/// Seconds of planned time consumed so far in the current run.
pub fn elapsed_secs(workout: &Workout, run: &RunState) -> u64 {
    let remaining = u64::from(run.remaining_secs);
    let get_ready = u64::from(workout.get_ready_secs());
    if run.phase == Phase::GetReady {
        return get_ready.saturating_sub(remaining);
    }
    if run.phase == Phase::Idle {
        return 0;
    }

    let exercise_rest = u64::from(workout.rest_between_exercises_secs());
    let round_rest = u64::from(workout.rest_between_rounds_secs());
    let rounds_done = u64::from(run.current_round.saturating_sub(1));
    let round_rests_done = rounds_done.min(u64::from(workout.rounds().saturating_sub(1)));

    let mut elapsed = get_ready + rounds_done * workout.round_secs() + round_rests_done * round_rest;

    let idx = run.current_exercise_index;
    let durations_before = |end: usize| -> u64 {
        workout
            .exercises()
            .iter()
            .take(end)
            .map(|e| u64::from(e.duration_secs()))
            .sum()
    };
    let current_duration = workout
        .exercise(idx)
        .map(|e| u64::from(e.duration_secs()))
        .unwrap_or(0);

    elapsed += match run.phase {
        Phase::Run => {
            durations_before(idx)
                + idx as u64 * exercise_rest
                + current_duration.saturating_sub(remaining)
        }
        Phase::ExerciseRest => {
            durations_before(idx + 1)
                + idx as u64 * exercise_rest
                + exercise_rest.saturating_sub(remaining)
        }
        Phase::RoundRest => workout.round_secs() + round_rest.saturating_sub(remaining),
        Phase::Idle | Phase::GetReady | Phase::Completed => 0,
    };
    elapsed
}

/// 0.0 .. 100.0 progress of a single exercise.
///
/// Only the exercise currently being worked reports a partial value; every
/// other one is 100 when marked completed and 0 otherwise. Unknown indices
/// report 0.
pub fn exercise_progress_pct(workout: &Workout, run: &RunState, index: usize) -> f64 {
    let Some(exercise) = workout.exercise(index) else {
        return 0.0;
    };
    let active = run.running && run.phase == Phase::Run && run.current_exercise_index == index;
    if !active {
        return if exercise.is_completed() { 100.0 } else { 0.0 };
    }
    let total = f64::from(exercise.duration_secs());
    if total == 0.0 {
        return 0.0;
    }
    let done = total - f64::from(run.remaining_secs);
    (done / total * 100.0).clamp(0.0, 100.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn workout() -> Workout {
        // get ready 10, two 20s exercises, 5s between, 30s between rounds, 2 rounds
        let mut w = Workout::default();
        w.set_use_global_time(false);
        w.set_exercise_duration(0, 20).unwrap();
        w.add_named_exercise("Squats", 20).unwrap();
        w.set_get_ready_secs(10);
        w.set_rest_between_exercises_secs(5);
        w.set_rest_between_rounds_secs(30);
        w.set_rounds(2).unwrap();
        w
    }

    fn at(phase: Phase, round: u32, idx: usize, remaining: u32) -> RunState {
        RunState {
            phase,
            remaining_secs: remaining,
            current_round: round,
            current_exercise_index: idx,
            running: phase != Phase::Completed,
            paused: false,
        }
    }

    #[test]
    fn total_includes_one_round_rest() {
        assert_eq!(workout().total_planned_secs(), 10 + 2 * 45 + 30);
    }

    #[test]
    fn elapsed_per_phase() {
        let w = workout();
        assert_eq!(elapsed_secs(&w, &at(Phase::GetReady, 1, 0, 10)), 0);
        assert_eq!(elapsed_secs(&w, &at(Phase::GetReady, 1, 0, 4)), 6);
        assert_eq!(elapsed_secs(&w, &at(Phase::Run, 1, 0, 20)), 10);
        assert_eq!(elapsed_secs(&w, &at(Phase::Run, 1, 0, 5)), 25);
        assert_eq!(elapsed_secs(&w, &at(Phase::ExerciseRest, 1, 0, 5)), 30);
        assert_eq!(elapsed_secs(&w, &at(Phase::ExerciseRest, 1, 0, 1)), 34);
        assert_eq!(elapsed_secs(&w, &at(Phase::Run, 1, 1, 20)), 35);
        assert_eq!(elapsed_secs(&w, &at(Phase::RoundRest, 1, 1, 30)), 55);
        assert_eq!(elapsed_secs(&w, &at(Phase::RoundRest, 1, 1, 10)), 75);
        assert_eq!(elapsed_secs(&w, &at(Phase::Run, 2, 0, 20)), 85);
        assert_eq!(elapsed_secs(&w, &at(Phase::Run, 2, 1, 1)), 129);
    }

    #[test]
    fn overall_is_zero_when_idle_or_completed() {
        let w = workout();
        assert_eq!(overall_progress_pct(&w, &RunState::idle()), 0.0);
        assert_eq!(overall_progress_pct(&w, &at(Phase::Completed, 2, 1, 0)), 0.0);
    }

    #[test]
    fn overall_scales_to_total() {
        let w = workout();
        let pct = overall_progress_pct(&w, &at(Phase::RoundRest, 1, 1, 30));
        assert!((pct - 55.0 / 130.0 * 100.0).abs() < 1e-9);
    }

    #[test]
    fn exercise_progress_only_for_active() {
        let w = workout();
        let run = at(Phase::Run, 1, 1, 15);
        assert!((exercise_progress_pct(&w, &run, 1) - 25.0).abs() < 1e-9);
        assert_eq!(exercise_progress_pct(&w, &run, 0), 0.0);
        assert_eq!(exercise_progress_pct(&w, &run, 9), 0.0);

        let mut stopped = run.clone();
        stopped.running = false;
        assert_eq!(exercise_progress_pct(&w, &stopped, 1), 0.0);
    }

    #[test]
    fn exercise_progress_clamps_after_resize() {
        let w = workout();
        // remaining larger than the (shrunk) duration
        let run = at(Phase::Run, 1, 0, 45);
        assert_eq!(exercise_progress_pct(&w, &run, 0), 0.0);
    }
}
