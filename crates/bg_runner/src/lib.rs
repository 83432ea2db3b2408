//! Headless battle runner: CLI dispatch, the tournament and parameter-sweep
//! drivers, and the shared worker-pool helper they both use.
//!
//! - [`cli`] - subcommand definitions and their handlers (`run`/`tourney`/`plot`/`load`)
//! - [`config`] - typed, three-layer-precedence runner configuration
//! - [`tournament`] - round-robin tournament driver and aggregation
//! - [`sweep`] - Lanchester parameter-sweep driver
//! - [`batch`] - generic worker-pool dispatch shared by the two drivers above
//! - [`error`] - crate-wide error type

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod batch;
pub mod cli;
pub mod config;
pub mod error;
pub mod sweep;
pub mod tournament;

pub use cli::{init_logging, Cli, Commands};
pub use config::RunnerConfig;
pub use error::{Result, RunnerError};
