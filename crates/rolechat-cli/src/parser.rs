//! Main CLI parser and top-level argument handling.
//!
//! This module defines the root CLI structure with global options.

use std::path::PathBuf;

use clap::Parser;
use rolechat_core::SettingsUpdate;

use crate::commands::Commands;

/// Command-line interface for chat and roleplay language practice.
///
/// Global options override the chat model settings for this invocation.
#[derive(Parser)]
#[command(name = "rolechat")]
#[command(about = "Chat and roleplay conversation practice with structured replies")]
#[command(version)]
pub struct Cli {
    /// Path to the session database (defaults to the user data directory)
    #[arg(long = "database", global = true, env = "ROLECHAT_DATABASE")]
    pub database: Option<PathBuf>,

    /// Model used for completions
    #[arg(long, global = true, env = "ROLECHAT_MODEL")]
    pub model: Option<String>,

    /// Sampling temperature (0.0-2.0)
    #[arg(long, global = true)]
    pub temperature: Option<f32>,

    /// Maximum tokens per reply
    #[arg(long = "max-tokens", global = true)]
    pub max_tokens: Option<u32>,

    /// Number of recent history messages sent as context
    #[arg(long = "context-window", global = true)]
    pub context_window: Option<usize>,

    /// Enable verbose/debug output, including the assembled prompt
    #[arg(short = 'v', long = "verbose", global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

impl Cli {
    /// Settings overrides given on the command line.
    pub fn settings_update(&self) -> SettingsUpdate {
        SettingsUpdate {
            model: self.model.clone(),
            temperature: self.temperature,
            max_tokens: self.max_tokens,
            context_window: self.context_window,
            verbose: self.verbose.then_some(true),
        }
    }
}
