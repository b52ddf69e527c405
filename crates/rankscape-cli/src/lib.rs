//! # rankscape-cli
//!
//! Library side of the `rankscape` binary:
//! - Command-line definitions ([`cli`])
//! - Configuration file, environment overrides, and the `config` commands
//! - Sub-command implementations (`plot`, `score`, `rank`, `eval`, `sql`)

#![warn(clippy::all)]
#![forbid(unsafe_code)]

pub mod cli;
pub mod commands;
pub mod config;
pub mod config_handlers;
pub mod error;

pub use config::{ConfigManager, RankscapeConfig};
pub use error::{Error, Result};
