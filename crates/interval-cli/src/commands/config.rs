use clap::Subcommand;
use interval_core::Config;
use std::path::PathBuf;

#[derive(Subcommand)]
pub enum ConfigAction {
    /// Print the effective preset as JSON
    Show {
        /// Preset file instead of the default location
        #[arg(long)]
        preset: Option<PathBuf>,
    },
    /// Get a preset value
    Get {
        /// Dotted key (e.g. "workout.rounds", "exercises.0.name")
        key: String,
        /// Preset file instead of the default location
        #[arg(long)]
        preset: Option<PathBuf>,
    },
    /// Print the default preset location
    Path,
}

fn load(preset: Option<PathBuf>) -> Result<Config, Box<dyn std::error::Error>> {
    Ok(match preset {
        Some(path) => Config::load_from(&path)?,
        None => Config::load()?,
    })
}

pub fn run(action: ConfigAction) -> Result<(), Box<dyn std::error::Error>> {
    match action {
        ConfigAction::Show { preset } => {
            let config = load(preset)?;
            println!("{}", serde_json::to_string_pretty(&config)?);
        }
        ConfigAction::Get { key, preset } => {
            let config = load(preset)?;
            match config.get(&key) {
                Some(value) => println!("{value}"),
                None => return Err(format!("unknown key: {key}").into()),
            }
        }
        ConfigAction::Path => {
            println!("{}", Config::path()?.display());
        }
    }
    Ok(())
}
