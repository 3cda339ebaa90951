use serde::{Deserialize, Serialize};

/// One discrete stage of the workout sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Phase {
    Idle,
    GetReady,
    Run,
    ExerciseRest,
    RoundRest,
    Completed,
}

impl Phase {
    /// Display label. `Run` shows the exercise name instead, see
    /// [`crate::timer::phase_label`].
    pub fn label(&self) -> &'static str {
        match self {
            Phase::Idle => "Ready",
            Phase::GetReady => "Get Ready!",
            Phase::Run => "Work",
            Phase::ExerciseRest => "Rest Between Exercises",
            Phase::RoundRest => "Rest Between Rounds",
            Phase::Completed => "Completed!",
        }
    }

    /// No automatic transition leaves these phases.
    pub fn is_terminal(&self) -> bool {
        matches!(self, Phase::Idle | Phase::Completed)
    }

    /// Phases that sit inside a round and show a round counter.
    pub fn in_round(&self) -> bool {
        matches!(self, Phase::Run | Phase::ExerciseRest | Phase::RoundRest)
    }
}

/// Run-time record of an engine. Exactly one per engine.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunState {
    pub phase: Phase,
    pub remaining_secs: u32,
    /// 1-based while a run is in progress, 0 when idle.
    pub current_round: u32,
    pub current_exercise_index: usize,
    pub running: bool,
    pub paused: bool,
}

impl RunState {
    pub fn idle() -> Self {
        Self {
            phase: Phase::Idle,
            remaining_secs: 0,
            current_round: 0,
            current_exercise_index: 0,
            running: false,
            paused: false,
        }
    }
}

impl Default for RunState {
    fn default() -> Self {
        Self::idle()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn serializes_camel_case() {
        let json = serde_json::to_string(&Phase::ExerciseRest).unwrap();
        assert_eq!(json, "\"exerciseRest\"");
        let phase: Phase = serde_json::from_str("\"getReady\"").unwrap();
        assert_eq!(phase, Phase::GetReady);
    }

    #[test]
    fn terminal_phases() {
        assert!(Phase::Idle.is_terminal());
        assert!(Phase::Completed.is_terminal());
        assert!(!Phase::RoundRest.is_terminal());
        assert!(!Phase::GetReady.in_round());
        assert!(Phase::RoundRest.in_round());
    }
}
