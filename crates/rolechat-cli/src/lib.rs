//! Command-line adapter for rolechat.
//!
//! Parses arguments, wires the core services to the `SQLite` session store
//! and the `OpenAI` client in [`bootstrap`], and runs interactive chat and
//! roleplay conversations from the terminal.

#![deny(unsafe_code)]
#![deny(unused_crate_dependencies)]

// Used by main.rs only
use dotenvy as _;
use tokio as _;
use tracing_subscriber as _;

pub mod bootstrap;
pub mod commands;
pub mod error;
pub mod handlers;
pub mod parser;
pub mod presentation;
pub mod utils;

// Re-export primary types for convenient access
pub use bootstrap::{CliConfig, CliContext, HistoryMode, bootstrap};
pub use commands::Commands;
pub use error::CliError;
pub use parser::Cli;
