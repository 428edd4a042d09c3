//! Command handlers.
//!
//! Handlers follow the canonical pattern:
//! - Signature: `pub async fn execute(ctx: &CliContext, ...) -> Result<()>`
//! - Thin wrappers that:
//!   1. Parse/validate CLI-specific input
//!   2. Call core services or the session repository
//!   3. Format output for the terminal

pub mod chat;
pub mod roleplay;
pub mod sessions;
