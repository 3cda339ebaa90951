//! # Interval Core Library
//!
//! This library provides the core logic for an interval-training stopwatch:
//! a warm-up, a list of named exercises, rests between exercises and
//! between rounds, repeated for a number of rounds.
//!
//! ## Architecture
//!
//! - **Interval Engine**: A tick-driven phase state machine. It holds no
//!   timer; the caller invokes `tick()` once per second
//! - **Progress**: Planned duration plus overall and per-exercise percentages
//! - **Ticker**: A tokio task that drives the engine at a fixed cadence
//! - **Storage**: TOML-based workout presets
//!
//! ## Key Components
//!
//! - [`IntervalEngine`]: Core phase state machine
//! - [`Workout`]: Timing settings and the ordered exercise list
//! - [`Ticker`]: At-most-one tick source for an engine
//! - [`Config`]: Preset loading

pub mod error;
pub mod events;
pub mod storage;
pub mod ticker;
pub mod timer;

pub use error::{ConfigError, CoreError, Result, ValidationError};
pub use events::{Event, ExerciseView};
pub use storage::Config;
pub use ticker::Ticker;
pub use timer::{format_clock, Exercise, IntervalEngine, Phase, PlannedPhase, RunState, Workout};
