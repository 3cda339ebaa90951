use clap::Args;
use interval_core::{format_clock, PlannedPhase};
use serde::Serialize;

use super::workout::WorkoutArgs;

#[derive(Args)]
pub struct PlanArgs {
    #[command(flatten)]
    pub workout: WorkoutArgs,
}

#[derive(Serialize)]
struct PlanOutput {
    total_secs: u64,
    total_clock: String,
    rounds: u32,
    exercise_count: usize,
    phases: Vec<PlannedPhase>,
}

pub fn run(args: PlanArgs) -> Result<(), Box<dyn std::error::Error>> {
    let workout = args.workout.load_config()?.build_workout()?;
    let total = workout.total_planned_secs();
    let output = PlanOutput {
        total_secs: total,
        total_clock: format_clock(total),
        rounds: workout.rounds(),
        exercise_count: workout.exercise_count(),
        phases: workout.plan(),
    };
    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}
