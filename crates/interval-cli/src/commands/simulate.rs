use clap::Args;
use interval_core::{Event, Phase};
use serde_json::json;

use super::workout::WorkoutArgs;

#[derive(Args)]
pub struct SimulateArgs {
    #[command(flatten)]
    pub workout: WorkoutArgs,
    /// Also print a state snapshot after every tick
    #[arg(long)]
    pub snapshots: bool,
}

/// Tick a fresh engine to completion, printing events as JSON lines.
pub fn run(args: SimulateArgs) -> Result<(), Box<dyn std::error::Error>> {
    let mut engine = args.workout.load_config()?.build_engine()?;

    let print = |event: &Event| -> interval_core::Result<()> {
        println!("{}", event.to_json_line()?);
        Ok(())
    };

    if let Some(event) = engine.start() {
        print(&event)?;
    }
    let mut ticks: u64 = 0;
    let mut elapsed_secs: u64 = 0;
    while engine.phase() != Phase::Completed {
        if engine.remaining_secs() >= 1 {
            elapsed_secs += 1;
        }
        let transition = engine.tick();
        ticks += 1;
        if let Some(event) = transition {
            print(&event)?;
        }
        if args.snapshots {
            print(&engine.snapshot())?;
        }
    }

    let summary = json!({
        "type": "Summary",
        "ticks": ticks,
        "elapsed_secs": elapsed_secs,
        "total_secs": engine.total_planned_secs(),
    });
    println!("{summary}");
    Ok(())
}
