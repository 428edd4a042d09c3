//! Main commands enum and primary subcommands.

use std::path::PathBuf;

use clap::{Args, Subcommand, ValueEnum};
use rolechat_core::{Scenario, SessionKind};

/// Instruction used by `chat` when none is given.
pub const DEFAULT_INSTRUCTION: &str = "You are a helpful assistant.";

/// Available commands.
#[derive(Subcommand)]
pub enum Commands {
    /// Start an interactive chat with a plain instruction
    Chat {
        /// System instruction for the assistant [default: "You are a helpful assistant."]
        #[arg(short, long)]
        instruction: Option<String>,
        /// Resume an existing general session by ID, with its stored instruction
        #[arg(short, long, conflicts_with_all = ["memory", "instruction"])]
        session: Option<i64>,
        /// Keep history in memory only (nothing is saved)
        #[arg(long)]
        memory: bool,
    },

    /// Start an interactive roleplay for language practice
    Roleplay(RoleplayArgs),

    /// List stored sessions
    Sessions {
        /// Only list sessions of this kind
        #[arg(short, long, value_enum)]
        kind: Option<KindArg>,
    },

    /// Print the stored messages of a session
    History {
        /// Session kind
        #[arg(value_enum)]
        kind: KindArg,
        /// Session ID
        id: i64,
        /// Only show the most recent N messages
        #[arg(short, long)]
        limit: Option<usize>,
    },

    /// Delete all messages of a session
    Clear {
        /// Session kind
        #[arg(value_enum)]
        kind: KindArg,
        /// Session ID
        id: i64,
        /// Remove the session record as well
        #[arg(long)]
        delete: bool,
        /// Skip confirmation prompt
        #[arg(short, long)]
        force: bool,
    },
}

/// Arguments for the `roleplay` command.
///
/// Exactly one of `--scenario`, `--template-file` or `--session` selects
/// the configuration.
#[derive(Args, Debug)]
#[command(group(
    clap::ArgGroup::new("template")
        .required(true)
        .args(["scenario", "template_file", "session"])
))]
pub struct RoleplayArgs {
    /// Built-in scenario providing the role template and default roles
    #[arg(long, value_enum)]
    pub scenario: Option<ScenarioArg>,

    /// File containing a custom role template
    #[arg(long = "template-file")]
    pub template_file: Option<PathBuf>,

    /// Practice language
    #[arg(short, long, default_value = "English")]
    pub language: String,

    /// Role played by the user (defaults to the scenario's)
    #[arg(long = "user-role")]
    pub user_role: Option<String>,

    /// Role played by the assistant (defaults to the scenario's)
    #[arg(long = "gpt-role")]
    pub gpt_role: Option<String>,

    /// Learner level: beginner, intermediate or advanced
    #[arg(short, long, default_value = "beginner")]
    pub difficulty: String,

    /// Resume an existing roleplay session by ID, with its stored roles,
    /// language and difficulty
    #[arg(
        short,
        long,
        conflicts_with_all = ["memory", "language", "user_role", "gpt_role", "difficulty"]
    )]
    pub session: Option<i64>,

    /// Keep history in memory only (nothing is saved)
    #[arg(long)]
    pub memory: bool,
}

/// Session kind as given on the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum KindArg {
    General,
    Roleplay,
}

impl From<KindArg> for SessionKind {
    fn from(kind: KindArg) -> Self {
        match kind {
            KindArg::General => Self::General,
            KindArg::Roleplay => Self::RolePlay,
        }
    }
}

/// Built-in scenario as given on the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ScenarioArg {
    Starbucks,
    Cafe,
    Hotel,
}

impl From<ScenarioArg> for Scenario {
    fn from(scenario: ScenarioArg) -> Self {
        match scenario {
            ScenarioArg::Starbucks => Self::Starbucks,
            ScenarioArg::Cafe => Self::Cafe,
            ScenarioArg::Hotel => Self::Hotel,
        }
    }
}
