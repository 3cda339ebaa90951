//! Workout configuration: timing settings plus the ordered exercise list.
//!
//! While `use_global_time` is on, every exercise lasts exactly
//! `global_exercise_secs`. The two mutators that can affect this
//! (`set_global_exercise_secs`, `set_use_global_time`) re-apply it
//! explicitly, as do `add_exercise` and `add_named_exercise`.

use serde::{Deserialize, Serialize};

use super::phase::Phase;
use crate::error::ValidationError;

pub const DEFAULT_GET_READY_SECS: u32 = 10;
pub const DEFAULT_EXERCISE_SECS: u32 = 30;
pub const DEFAULT_REST_BETWEEN_ROUNDS_SECS: u32 = 15;
pub const DEFAULT_REST_BETWEEN_EXERCISES_SECS: u32 = 5;
pub const DEFAULT_ROUNDS: u32 = 3;

/// A named, timed unit of work within a round.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Exercise {
    pub name: String,
    duration_secs: u32,
    #[serde(default)]
    completed: bool,
    #[serde(default)]
    in_progress: bool,
}

impl Exercise {
    fn new(name: impl Into<String>, duration_secs: u32) -> Self {
        Self {
            name: name.into(),
            duration_secs,
            completed: false,
            in_progress: false,
        }
    }

    pub fn duration_secs(&self) -> u32 {
        self.duration_secs
    }

    pub fn is_completed(&self) -> bool {
        self.completed
    }

    pub fn is_in_progress(&self) -> bool {
        self.in_progress
    }

    pub(crate) fn set_status(&mut self, completed: bool, in_progress: bool) {
        self.completed = completed;
        self.in_progress = in_progress;
    }
}

/// One entry of the planned phase sequence, see [`Workout::plan`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlannedPhase {
    pub phase: Phase,
    pub round: u32,
    pub exercise_index: Option<usize>,
    pub label: String,
    pub duration_secs: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "WorkoutFields")]
pub struct Workout {
    get_ready_secs: u32,
    global_exercise_secs: u32,
    use_global_time: bool,
    rest_between_rounds_secs: u32,
    rest_between_exercises_secs: u32,
    rounds: u32,
    exercises: Vec<Exercise>,
}

impl Workout {
    // ── Queries ──────────────────────────────────────────────────────

    pub fn get_ready_secs(&self) -> u32 {
        self.get_ready_secs
    }

    pub fn global_exercise_secs(&self) -> u32 {
        self.global_exercise_secs
    }

    pub fn use_global_time(&self) -> bool {
        self.use_global_time
    }

    pub fn rest_between_rounds_secs(&self) -> u32 {
        self.rest_between_rounds_secs
    }

    pub fn rest_between_exercises_secs(&self) -> u32 {
        self.rest_between_exercises_secs
    }

    pub fn rounds(&self) -> u32 {
        self.rounds
    }

    pub fn exercises(&self) -> &[Exercise] {
        &self.exercises
    }

    pub fn exercise(&self, index: usize) -> Option<&Exercise> {
        self.exercises.get(index)
    }

    pub fn exercise_count(&self) -> usize {
        self.exercises.len()
    }

    /// Sum of all exercise durations in one round.
    pub fn exercise_secs_per_round(&self) -> u64 {
        self.exercises.iter().map(|e| u64::from(e.duration_secs)).sum()
    }

    /// Exercise rests in one round: one after every exercise but the last.
    pub fn exercise_rest_secs_per_round(&self) -> u64 {
        let rests = self.exercises.len().saturating_sub(1) as u64;
        rests * u64::from(self.rest_between_exercises_secs)
    }

    /// Exercise time plus inter-exercise rests for one full round.
    pub fn round_secs(&self) -> u64 {
        self.exercise_secs_per_round() + self.exercise_rest_secs_per_round()
    }

    /// Total planned seconds for the whole workout, get-ready included.
    pub fn total_planned_secs(&self) -> u64 {
        let rounds = u64::from(self.rounds);
        u64::from(self.get_ready_secs)
            + rounds * self.round_secs()
            + rounds.saturating_sub(1) * u64::from(self.rest_between_rounds_secs)
    }

    /// The ordered sequence of phases a full run walks through.
    pub fn plan(&self) -> Vec<PlannedPhase> {
        let mut plan = vec![PlannedPhase {
            phase: Phase::GetReady,
            round: 1,
            exercise_index: None,
            label: Phase::GetReady.label().to_string(),
            duration_secs: self.get_ready_secs,
        }];
        let last = self.exercises.len().saturating_sub(1);
        for round in 1..=self.rounds {
            for (i, exercise) in self.exercises.iter().enumerate() {
                plan.push(PlannedPhase {
                    phase: Phase::Run,
                    round,
                    exercise_index: Some(i),
                    label: exercise.name.clone(),
                    duration_secs: exercise.duration_secs,
                });
                if i < last {
                    plan.push(PlannedPhase {
                        phase: Phase::ExerciseRest,
                        round,
                        exercise_index: Some(i),
                        label: Phase::ExerciseRest.label().to_string(),
                        duration_secs: self.rest_between_exercises_secs,
                    });
                }
            }
            if round < self.rounds {
                plan.push(PlannedPhase {
                    phase: Phase::RoundRest,
                    round,
                    exercise_index: None,
                    label: Phase::RoundRest.label().to_string(),
                    duration_secs: self.rest_between_rounds_secs,
                });
            }
        }
        plan
    }

    // ── Mutators ─────────────────────────────────────────────────────

    pub fn set_get_ready_secs(&mut self, secs: u32) {
        self.get_ready_secs = secs;
    }

    pub fn set_rest_between_rounds_secs(&mut self, secs: u32) {
        self.rest_between_rounds_secs = secs;
    }

    pub fn set_rest_between_exercises_secs(&mut self, secs: u32) {
        self.rest_between_exercises_secs = secs;
    }

    pub fn set_rounds(&mut self, rounds: u32) -> Result<(), ValidationError> {
        if rounds == 0 {
            return Err(ValidationError::must_be_positive("rounds"));
        }
        self.rounds = rounds;
        Ok(())
    }

    pub fn set_global_exercise_secs(&mut self, secs: u32) -> Result<(), ValidationError> {
        if secs == 0 {
            return Err(ValidationError::must_be_positive("global_exercise_secs"));
        }
        self.global_exercise_secs = secs;
        self.sync_global_time();
        Ok(())
    }

    /// Turning this off leaves every duration where it currently is.
    pub fn set_use_global_time(&mut self, enabled: bool) {
        self.use_global_time = enabled;
        self.sync_global_time();
    }

    /// Append "Exercise {n+1}" and return its index.
    pub fn add_exercise(&mut self) -> usize {
        let name = format!("Exercise {}", self.exercises.len() + 1);
        let secs = if self.use_global_time {
            self.global_exercise_secs
        } else {
            DEFAULT_EXERCISE_SECS
        };
        self.exercises.push(Exercise::new(name, secs));
        self.exercises.len() - 1
    }

    /// Append a named exercise. With global time on, `secs` is overridden.
    pub fn add_named_exercise(
        &mut self,
        name: impl Into<String>,
        secs: u32,
    ) -> Result<usize, ValidationError> {
        if secs == 0 {
            return Err(ValidationError::must_be_positive("duration_secs"));
        }
        let secs = if self.use_global_time {
            self.global_exercise_secs
        } else {
            secs
        };
        self.exercises.push(Exercise::new(name, secs));
        Ok(self.exercises.len() - 1)
    }

    /// Remove and return the exercise at `index`.
    ///
    /// Refused when it is the only one left.
    pub fn remove_exercise(&mut self, index: usize) -> Result<Exercise, ValidationError> {
        self.check_index(index)?;
        if self.exercises.len() <= 1 {
            return Err(ValidationError::EmptyCollection(
                "a workout needs at least one exercise".to_string(),
            ));
        }
        Ok(self.exercises.remove(index))
    }

    pub fn rename_exercise(
        &mut self,
        index: usize,
        name: impl Into<String>,
    ) -> Result<(), ValidationError> {
        self.check_index(index)?;
        self.exercises[index].name = name.into();
        Ok(())
    }

    /// Per-exercise durations are locked while global time is on.
    pub fn set_exercise_duration(&mut self, index: usize, secs: u32) -> Result<(), ValidationError> {
        self.check_index(index)?;
        if secs == 0 {
            return Err(ValidationError::must_be_positive("duration_secs"));
        }
        if self.use_global_time {
            return Err(ValidationError::InvalidValue {
                field: "duration_secs".to_string(),
                message: "governed by the global exercise time".to_string(),
            });
        }
        self.exercises[index].duration_secs = secs;
        Ok(())
    }

    // ── Internal ─────────────────────────────────────────────────────

    pub(crate) fn exercises_mut(&mut self) -> &mut [Exercise] {
        &mut self.exercises
    }

    pub(crate) fn clear_status(&mut self) {
        for exercise in &mut self.exercises {
            exercise.set_status(false, false);
        }
    }

    fn sync_global_time(&mut self) {
        if !self.use_global_time {
            return;
        }
        let secs = self.global_exercise_secs;
        for exercise in &mut self.exercises {
            exercise.duration_secs = secs;
        }
    }

    fn check_index(&self, index: usize) -> Result<(), ValidationError> {
        if index >= self.exercises.len() {
            return Err(ValidationError::OutOfBounds {
                collection: "exercises".to_string(),
                index,
                len: self.exercises.len(),
            });
        }
        Ok(())
    }
}

/// Serialized form of [`Workout`], checked before it becomes one.
#[derive(Deserialize)]
struct WorkoutFields {
    get_ready_secs: u32,
    global_exercise_secs: u32,
    use_global_time: bool,
    rest_between_rounds_secs: u32,
    rest_between_exercises_secs: u32,
    rounds: u32,
    exercises: Vec<Exercise>,
}

impl TryFrom<WorkoutFields> for Workout {
    type Error = ValidationError;

    fn try_from(fields: WorkoutFields) -> Result<Self, Self::Error> {
        if fields.rounds == 0 {
            return Err(ValidationError::must_be_positive("rounds"));
        }
        if fields.global_exercise_secs == 0 {
            return Err(ValidationError::must_be_positive("global_exercise_secs"));
        }
        if fields.exercises.is_empty() {
            return Err(ValidationError::EmptyCollection(
                "a workout needs at least one exercise".to_string(),
            ));
        }
        if fields.exercises.iter().any(|e| e.duration_secs == 0) {
            return Err(ValidationError::must_be_positive("duration_secs"));
        }
        let mut workout = Workout {
            get_ready_secs: fields.get_ready_secs,
            global_exercise_secs: fields.global_exercise_secs,
            use_global_time: fields.use_global_time,
            rest_between_rounds_secs: fields.rest_between_rounds_secs,
            rest_between_exercises_secs: fields.rest_between_exercises_secs,
            rounds: fields.rounds,
            exercises: fields.exercises,
        };
        workout.sync_global_time();
        Ok(workout)
    }
}

impl Default for Workout {
    fn default() -> Self {
        Self {
            get_ready_secs: DEFAULT_GET_READY_SECS,
            global_exercise_secs: DEFAULT_EXERCISE_SECS,
            use_global_time: true,
            rest_between_rounds_secs: DEFAULT_REST_BETWEEN_ROUNDS_SECS,
            rest_between_exercises_secs: DEFAULT_REST_BETWEEN_EXERCISES_SECS,
            rounds: DEFAULT_ROUNDS,
            exercises: vec![Exercise::new("Exercise 1", DEFAULT_EXERCISE_SECS)],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn custom(durations: &[u32]) -> Workout {
        let mut w = Workout::default();
        w.set_use_global_time(false);
        w.set_exercise_duration(0, durations[0]).unwrap();
        for &secs in &durations[1..] {
            w.add_named_exercise("extra", secs).unwrap();
        }
        w
    }

    #[test]
    fn deserialize_checks_invariants() {
        let mut value = serde_json::to_value(Workout::default()).unwrap();
        let restored: Workout = serde_json::from_value(value.clone()).unwrap();
        assert_eq!(restored, Workout::default());

        value["rounds"] = 0.into();
        assert!(serde_json::from_value::<Workout>(value.clone()).is_err());
        value["rounds"] = 2.into();

        value["exercises"][0]["duration_secs"] = 0.into();
        assert!(serde_json::from_value::<Workout>(value.clone()).is_err());

        value["exercises"] = serde_json::json!([]);
        let err = serde_json::from_value::<Workout>(value).unwrap_err();
        assert!(err.to_string().contains("at least one exercise"));
    }

    #[test]
    fn deserialize_applies_global_time() {
        let mut value = serde_json::to_value(Workout::default()).unwrap();
        value["global_exercise_secs"] = 45.into();
        let w: Workout = serde_json::from_value(value).unwrap();
        assert_eq!(w.exercises()[0].duration_secs(), 45);
    }

    #[test]
    fn default_workout() {
        let w = Workout::default();
        assert_eq!(w.exercise_count(), 1);
        assert_eq!(w.exercises()[0].name, "Exercise 1");
        assert!(w.use_global_time());
        // 10 + 3*30 + 0 exercise rests + 2*15
        assert_eq!(w.total_planned_secs(), 130);
    }

    #[test]
    fn total_counts_rests_between_not_after() {
        let mut w = custom(&[20, 40, 10]);
        w.set_get_ready_secs(5);
        w.set_rest_between_exercises_secs(3);
        w.set_rest_between_rounds_secs(60);
        w.set_rounds(2).unwrap();
        assert_eq!(w.round_secs(), 70 + 6);
        assert_eq!(w.total_planned_secs(), 5 + 2 * 76 + 60);
    }

    #[test]
    fn global_time_propagates_only_while_enabled() {
        let mut w = custom(&[20, 40]);
        w.set_use_global_time(true);
        assert!(w.exercises().iter().all(|e| e.duration_secs() == 30));

        w.set_global_exercise_secs(45).unwrap();
        assert!(w.exercises().iter().all(|e| e.duration_secs() == 45));

        w.set_use_global_time(false);
        w.set_global_exercise_secs(10).unwrap();
        assert!(w.exercises().iter().all(|e| e.duration_secs() == 45));
    }

    #[test]
    fn add_exercise_uses_global_or_fallback() {
        let mut w = Workout::default();
        w.set_global_exercise_secs(50).unwrap();
        let i = w.add_exercise();
        assert_eq!(w.exercises()[i].name, "Exercise 2");
        assert_eq!(w.exercises()[i].duration_secs(), 50);

        w.set_use_global_time(false);
        let i = w.add_exercise();
        assert_eq!(w.exercises()[i].name, "Exercise 3");
        assert_eq!(w.exercises()[i].duration_secs(), DEFAULT_EXERCISE_SECS);
    }

    #[test]
    fn cannot_remove_last_exercise() {
        let mut w = Workout::default();
        let err = w.remove_exercise(0).unwrap_err();
        assert!(matches!(err, ValidationError::EmptyCollection(_)));
        assert_eq!(w.exercise_count(), 1);

        w.add_exercise();
        let removed = w.remove_exercise(0).unwrap();
        assert_eq!(removed.name, "Exercise 1");
        assert_eq!(w.exercise_count(), 1);
    }

    #[test]
    fn rejects_zero_and_out_of_range() {
        let mut w = Workout::default();
        assert!(w.set_rounds(0).is_err());
        assert_eq!(w.rounds(), DEFAULT_ROUNDS);
        assert!(w.set_global_exercise_secs(0).is_err());
        assert!(matches!(
            w.rename_exercise(3, "nope"),
            Err(ValidationError::OutOfBounds { index: 3, len: 1, .. })
        ));
        assert!(w.set_exercise_duration(0, 20).is_err());
    }

    #[test]
    fn plan_matches_total() {
        let mut w = custom(&[20, 40]);
        w.set_rest_between_exercises_secs(5);
        w.set_rounds(2).unwrap();
        let plan = w.plan();
        let phases: Vec<Phase> = plan.iter().map(|p| p.phase).collect();
        assert_eq!(
            phases,
            vec![
                Phase::GetReady,
                Phase::Run,
                Phase::ExerciseRest,
                Phase::Run,
                Phase::RoundRest,
                Phase::Run,
                Phase::ExerciseRest,
                Phase::Run,
            ]
        );
        let sum: u64 = plan.iter().map(|p| u64::from(p.duration_secs)).sum();
        assert_eq!(sum, w.total_planned_secs());
    }
}
