//! Live workout in the terminal.
//!
//! Renders one line per tick and reads single-word commands from stdin:
//! `s` start, `p` pause, `r` resume, `R` restart, `c` clear, `status`, `q` quit.

use std::time::Duration;

use clap::Args;
use interval_core::{Event, Phase, Ticker};
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::{debug, warn};

use super::workout::WorkoutArgs;

#[derive(Args)]
pub struct RunArgs {
    #[command(flatten)]
    pub workout: WorkoutArgs,
    /// Override the preset tick period (milliseconds)
    #[arg(long)]
    pub tick_millis: Option<u64>,
    /// Print events as JSON lines instead of text
    #[arg(long)]
    pub json: bool,
    /// Keep accepting commands after the workout completes
    #[arg(long)]
    pub stay: bool,
}

pub fn run(args: RunArgs) -> Result<(), Box<dyn std::error::Error>> {
    let cfg = args.workout.load_config()?;
    let engine = cfg.build_engine()?;
    let period = match args.tick_millis {
        Some(0) => return Err("--tick-millis must be greater than zero".into()),
        Some(ms) => Duration::from_millis(ms),
        None => cfg.tick_period()?,
    };

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()?;
    let result = runtime.block_on(drive(engine, period, args.json, args.stay));
    // stdin is read on a blocking thread that only returns on the next line
    runtime.shutdown_background();
    result
}

async fn drive(
    engine: interval_core::IntervalEngine,
    period: Duration,
    json: bool,
    stay: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let (mut ticker, mut events) = Ticker::with_period(engine, period);
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut stdin_open = true;

    if !json {
        eprintln!("commands: s start | p pause | r resume | R restart | c clear | status | q quit");
    }
    ticker.start();

    loop {
        tokio::select! {
            event = events.recv() => {
                let Some(event) = event else { break };
                render(&event, json)?;
                let finished = matches!(event, Event::StateSnapshot { phase: Phase::Completed, .. });
                if finished && !stay {
                    break;
                }
            }
            line = lines.next_line(), if stdin_open => {
                match line? {
                    Some(line) => {
                        if !handle_command(&mut ticker, line.trim(), json)? {
                            break;
                        }
                    }
                    None => {
                        debug!("stdin closed, running without commands");
                        stdin_open = false;
                    }
                }
            }
        }
    }
    Ok(())
}

/// Returns false when the user asked to quit.
fn handle_command(
    ticker: &mut Ticker,
    command: &str,
    json: bool,
) -> Result<bool, Box<dyn std::error::Error>> {
    let accepted = match command {
        "" => return Ok(true),
        "q" | "quit" => return Ok(false),
        "status" => {
            render(&ticker.snapshot(), json)?;
            return Ok(true);
        }
        "s" | "start" => ticker.start(),
        "p" | "pause" => ticker.pause(),
        "r" | "resume" => ticker.resume(),
        "R" | "restart" => ticker.restart(),
        "c" | "clear" => ticker.clear(),
        other => {
            warn!(command = other, "unknown command");
            return Ok(true);
        }
    };
    if accepted.is_none() {
        let phase = ticker.with_engine(|e| e.phase());
        eprintln!("ignored: '{command}' does not apply in phase {phase:?}");
    }
    // accepted commands arrive through the event channel
    Ok(true)
}

fn render(event: &Event, json: bool) -> interval_core::Result<()> {
    if json {
        println!("{}", event.to_json_line()?);
        return Ok(());
    }
    match event {
        Event::StateSnapshot {
            clock,
            label,
            round_indicator,
            overall_progress_pct,
            ..
        } => {
            let round = round_indicator
                .as_ref()
                .map(|r| format!(" ({r})"))
                .unwrap_or_default();
            println!("{clock}  {label}{round}  {overall_progress_pct:>5.1}%");
        }
        Event::WorkoutCompleted { total_secs, .. } => {
            println!("-- workout completed ({})", interval_core::format_clock(*total_secs));
        }
        other => println!("-- {}", other.kind().replace('_', " ")),
    }
    Ok(())
}
