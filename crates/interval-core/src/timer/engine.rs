//! Interval engine implementation.
//!
//! The engine is a tick-driven state machine. It owns no timer and spawns
//! no threads - the caller invokes `tick()` once per second (see
//! [`crate::ticker::Ticker`] for a tokio-based driver).
//!
//! ## Phase Transitions
//!
//! ```text
//! Idle -> GetReady -> Run -> (ExerciseRest -> Run)* -> RoundRest -> Run ... -> Completed
//! ```
//!
//! ## Usage
//!
//! ```
//! use interval_core::{IntervalEngine, Phase, Workout};
//!
//! let mut engine = IntervalEngine::new(Workout::default());
//! engine.start();
//! while engine.phase() != Phase::Completed {
//!     engine.tick(); // Returns Some(Event) when the phase changes
//! }
//! ```

use chrono::Utc;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use super::display::{format_clock, phase_label, round_indicator};
use super::phase::{Phase, RunState};
use super::progress;
use super::workout::{Exercise, Workout};
use crate::error::ValidationError;
use crate::events::{Event, ExerciseView};

/// Core interval engine.
///
/// Commands that do not apply to the current state are ignored and return
/// `None`; nothing here panics or errors on a badly timed command.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IntervalEngine {
    workout: Workout,
    run: RunState,
}

impl IntervalEngine {
    /// Create an idle engine for the given workout.
    pub fn new(workout: Workout) -> Self {
        Self {
            workout,
            run: RunState::idle(),
        }
    }

    // ── Queries ──────────────────────────────────────────────────────

    pub fn workout(&self) -> &Workout {
        &self.workout
    }

    pub fn run_state(&self) -> &RunState {
        &self.run
    }

    pub fn phase(&self) -> Phase {
        self.run.phase
    }

    pub fn remaining_secs(&self) -> u32 {
        self.run.remaining_secs
    }

    pub fn current_round(&self) -> u32 {
        self.run.current_round
    }

    pub fn current_exercise_index(&self) -> usize {
        self.run.current_exercise_index
    }

    pub fn is_running(&self) -> bool {
        self.run.running
    }

    pub fn is_paused(&self) -> bool {
        self.run.paused
    }

    /// Running, not paused and not finished.
    pub fn is_live(&self) -> bool {
        self.run.running && !self.run.paused && self.run.phase != Phase::Completed
    }

    /// The exercise being worked or just finished, if any.
    pub fn current_exercise(&self) -> Option<&Exercise> {
        match self.run.phase {
            Phase::Run | Phase::ExerciseRest => {
                self.workout.exercise(self.run.current_exercise_index)
            }
            _ => None,
        }
    }

    pub fn total_planned_secs(&self) -> u64 {
        self.workout.total_planned_secs()
    }

    /// See [`progress::overall_progress_pct`]; 0 once completed.
    pub fn overall_progress_pct(&self) -> f64 {
        progress::overall_progress_pct(&self.workout, &self.run)
    }

    pub fn exercise_progress_pct(&self, index: usize) -> f64 {
        progress::exercise_progress_pct(&self.workout, &self.run, index)
    }

    pub fn phase_label(&self) -> String {
        phase_label(&self.workout, &self.run)
    }

    pub fn clock(&self) -> String {
        format_clock(u64::from(self.run.remaining_secs))
    }

    /// Build a full state snapshot event.
    pub fn snapshot(&self) -> Event {
        let exercises = self
            .workout
            .exercises()
            .iter()
            .enumerate()
            .map(|(i, e)| ExerciseView {
                name: e.name.clone(),
                duration_secs: e.duration_secs(),
                duration_clock: format_clock(u64::from(e.duration_secs())),
                completed: e.is_completed(),
                in_progress: e.is_in_progress(),
                progress_pct: self.exercise_progress_pct(i),
            })
            .collect();
        Event::StateSnapshot {
            phase: self.run.phase,
            label: self.phase_label(),
            clock: self.clock(),
            round: self.run.current_round,
            rounds: self.workout.rounds(),
            round_indicator: round_indicator(&self.workout, &self.run),
            exercise_index: self.run.current_exercise_index,
            remaining_secs: self.run.remaining_secs,
            running: self.run.running,
            paused: self.run.paused,
            live: self.is_live(),
            overall_progress_pct: self.overall_progress_pct(),
            total_secs: self.total_planned_secs(),
            exercises,
            at: Utc::now(),
        }
    }

    // ── Commands ─────────────────────────────────────────────────────

    pub fn start(&mut self) -> Option<Event> {
        if self.run.running || self.run.paused {
            return None;
        }
        self.run = RunState {
            phase: Phase::GetReady,
            remaining_secs: self.workout.get_ready_secs(),
            current_round: 1,
            current_exercise_index: 0,
            running: true,
            paused: false,
        };
        self.workout.clear_status();
        info!(
            rounds = self.workout.rounds(),
            exercises = self.workout.exercise_count(),
            total_secs = self.total_planned_secs(),
            "workout started"
        );
        Some(Event::WorkoutStarted {
            rounds: self.workout.rounds(),
            exercise_count: self.workout.exercise_count(),
            total_secs: self.total_planned_secs(),
            at: Utc::now(),
        })
    }

    pub fn pause(&mut self) -> Option<Event> {
        if !self.run.running || self.run.paused {
            return None;
        }
        self.run.paused = true;
        debug!(phase = ?self.run.phase, remaining = self.run.remaining_secs, "paused");
        Some(Event::WorkoutPaused {
            phase: self.run.phase,
            remaining_secs: self.run.remaining_secs,
            at: Utc::now(),
        })
    }

    pub fn resume(&mut self) -> Option<Event> {
        if !self.run.paused {
            return None;
        }
        self.run.paused = false;
        debug!(phase = ?self.run.phase, remaining = self.run.remaining_secs, "resumed");
        Some(Event::WorkoutResumed {
            phase: self.run.phase,
            remaining_secs: self.run.remaining_secs,
            at: Utc::now(),
        })
    }

    /// Start over from the beginning. Only while paused.
    pub fn restart(&mut self) -> Option<Event> {
        if !self.run.paused {
            return None;
        }
        self.run = RunState::idle();
        self.start()?;
        debug!("restarted");
        Some(Event::WorkoutRestarted { at: Utc::now() })
    }

    /// Back to idle with all exercise flags cleared. Refused mid-run
    /// (paused included) unless the workout already completed.
    pub fn clear(&mut self) -> Option<Event> {
        if self.run.running && self.run.phase != Phase::Completed {
            return None;
        }
        self.run = RunState::idle();
        self.workout.clear_status();
        debug!("cleared");
        Some(Event::WorkoutCleared { at: Utc::now() })
    }

    /// Advance the clock by one second.
    ///
    /// Decrements while more than one second remains; otherwise applies the
    /// transition table and returns `PhaseEntered` or `WorkoutCompleted`.
    /// Ignored unless running and not paused.
    pub fn tick(&mut self) -> Option<Event> {
        if !self.run.running || self.run.paused || self.run.phase.is_terminal() {
            return None;
        }
        if self.run.remaining_secs > 1 {
            self.run.remaining_secs -= 1;
            if self.run.phase == Phase::Run {
                self.refresh_exercise_status();
            }
            return None;
        }
        self.advance()
    }

    // ── Configuration ────────────────────────────────────────────────
    //
    // No running-state guard here: renderers are expected to disable these
    // while the workout is live.

    pub fn set_get_ready_secs(&mut self, secs: u32) {
        self.workout.set_get_ready_secs(secs);
    }

    pub fn set_rest_between_rounds_secs(&mut self, secs: u32) {
        self.workout.set_rest_between_rounds_secs(secs);
    }

    pub fn set_rest_between_exercises_secs(&mut self, secs: u32) {
        self.workout.set_rest_between_exercises_secs(secs);
    }

    pub fn set_rounds(&mut self, rounds: u32) -> Result<(), ValidationError> {
        self.workout.set_rounds(rounds)
    }

    pub fn set_global_exercise_secs(&mut self, secs: u32) -> Result<(), ValidationError> {
        self.workout.set_global_exercise_secs(secs)
    }

    pub fn set_use_global_time(&mut self, enabled: bool) {
        self.workout.set_use_global_time(enabled);
    }

    pub fn add_exercise(&mut self) -> usize {
        self.workout.add_exercise()
    }

    pub fn add_named_exercise(
        &mut self,
        name: impl Into<String>,
        secs: u32,
    ) -> Result<usize, ValidationError> {
        self.workout.add_named_exercise(name, secs)
    }

    /// Remove an exercise. Mid-run the current index is shifted so it keeps
    /// pointing at the same exercise, or at the last one if that was removed.
    pub fn remove_exercise(&mut self, index: usize) -> Result<Exercise, ValidationError> {
        let removed = self.workout.remove_exercise(index)?;
        if matches!(self.run.phase, Phase::Run | Phase::ExerciseRest) {
            let current = self.run.current_exercise_index;
            if index < current {
                self.run.current_exercise_index = current - 1;
            }
            let last = self.workout.exercise_count() - 1;
            self.run.current_exercise_index = self.run.current_exercise_index.min(last);
            self.refresh_exercise_status();
        }
        Ok(removed)
    }

    pub fn rename_exercise(
        &mut self,
        index: usize,
        name: impl Into<String>,
    ) -> Result<(), ValidationError> {
        self.workout.rename_exercise(index, name)
    }

    pub fn set_exercise_duration(&mut self, index: usize, secs: u32) -> Result<(), ValidationError> {
        self.workout.set_exercise_duration(index, secs)
    }

    // ── Internal ─────────────────────────────────────────────────────

    /// The transition table. Called only from `tick()`.
    fn advance(&mut self) -> Option<Event> {
        match self.run.phase {
            Phase::GetReady => Some(self.enter_run(0)),
            Phase::Run => {
                let next = self.run.current_exercise_index + 1;
                if next < self.workout.exercise_count() {
                    let rest = self.workout.rest_between_exercises_secs();
                    Some(self.enter(Phase::ExerciseRest, rest))
                } else {
                    Some(self.finish_round())
                }
            }
            Phase::ExerciseRest => {
                let next = self.run.current_exercise_index + 1;
                if next < self.workout.exercise_count() {
                    Some(self.enter_run(next))
                } else {
                    // exercises were removed during the rest
                    Some(self.finish_round())
                }
            }
            Phase::RoundRest => {
                self.run.current_round += 1;
                Some(self.enter_run(0))
            }
            Phase::Idle | Phase::Completed => None,
        }
    }

    fn finish_round(&mut self) -> Event {
        if self.run.current_round < self.workout.rounds() {
            let rest = self.workout.rest_between_rounds_secs();
            self.enter(Phase::RoundRest, rest)
        } else {
            self.complete()
        }
    }

    fn enter_run(&mut self, index: usize) -> Event {
        self.run.current_exercise_index = index;
        let secs = self
            .workout
            .exercise(index)
            .map(Exercise::duration_secs)
            .unwrap_or(0);
        self.enter(Phase::Run, secs)
    }

    fn enter(&mut self, phase: Phase, remaining_secs: u32) -> Event {
        self.run.phase = phase;
        self.run.remaining_secs = remaining_secs;
        self.refresh_exercise_status();
        debug!(
            ?phase,
            round = self.run.current_round,
            exercise = self.run.current_exercise_index,
            remaining = remaining_secs,
            "phase entered"
        );
        Event::PhaseEntered {
            phase,
            round: self.run.current_round,
            exercise_index: self.run.current_exercise_index,
            remaining_secs,
            at: Utc::now(),
        }
    }

    fn complete(&mut self) -> Event {
        self.run.phase = Phase::Completed;
        self.run.remaining_secs = 0;
        self.run.running = false;
        self.run.paused = false;
        self.refresh_exercise_status();
        info!(rounds = self.workout.rounds(), "workout completed");
        Event::WorkoutCompleted {
            rounds: self.workout.rounds(),
            total_secs: self.total_planned_secs(),
            at: Utc::now(),
        }
    }

    /// Recompute every exercise's completed/in-progress flags from the
    /// current position within the round.
    ///
    /// Flags reset at each round boundary. The original web app instead left
    /// every exercise completed and none in progress from round 2 onward.
    fn refresh_exercise_status(&mut self) {
        let phase = self.run.phase;
        let current = self.run.current_exercise_index;
        for (i, exercise) in self.workout.exercises_mut().iter_mut().enumerate() {
            let (completed, in_progress) = match phase {
                Phase::Idle | Phase::GetReady => (false, false),
                Phase::Run => (i < current, i == current),
                Phase::ExerciseRest => (i <= current, false),
                Phase::RoundRest | Phase::Completed => (true, false),
            };
            exercise.set_status(completed, in_progress);
        }
    }
}

impl Default for IntervalEngine {
    fn default() -> Self {
        Self::new(Workout::default())
    }
}
