//! Chat command handler.
//!
//! Runs an interactive conversation against the completion API. The same
//! loop backs the `roleplay` command.

use std::io::{self, BufRead, Write};

use anyhow::Result;
use rolechat_core::{ChatConfig, ChatError, SessionKey, SessionKind, SimpleConfig};
use tracing::warn;

use crate::bootstrap::{CliContext, Conversation, HistoryMode};
use crate::commands::DEFAULT_INSTRUCTION;
use crate::error::CliError;
use crate::presentation::format_response;
use crate::utils::input::{is_exit_command, read_line, validate_message};

/// Execute the chat command.
pub async fn execute(ctx: &CliContext, instruction: Option<&str>, mode: HistoryMode) -> Result<()> {
    let config = resolve_config(ctx, instruction, mode).await?;
    let conversation = ctx.conversation(config, mode, None)?;

    println!("Chat started. Type 'exit' or press Ctrl-D to quit.\n");

    let stdin = io::stdin();
    let mut stdout = io::stdout();
    run_conversation(&conversation, "AI", &mut stdin.lock(), &mut stdout).await
}

/// Configuration for a chat: the stored one when resuming, otherwise
/// the given instruction or the default.
pub async fn resolve_config(
    ctx: &CliContext,
    instruction: Option<&str>,
    mode: HistoryMode,
) -> Result<ChatConfig> {
    match mode {
        HistoryMode::Resume(id) => {
            ctx.stored_config(SessionKey::new(SessionKind::General, id))
                .await
        }
        HistoryMode::Memory | HistoryMode::NewSession => Ok(SimpleConfig::new(
            instruction.unwrap_or(DEFAULT_INSTRUCTION),
        )
        .into()),
    }
}

/// Drive a conversation until the user exits or input ends.
///
/// Blank lines are rejected without contacting the API. Completion
/// failures are reported and the loop continues; the user turn stays in
/// the history. Storage failures end the conversation.
pub async fn run_conversation<R: BufRead, W: Write>(
    conversation: &Conversation,
    speaker: &str,
    input: &mut R,
    out: &mut W,
) -> Result<()> {
    if let Some(store) = &conversation.persistent {
        let session = store.session().await.map_err(CliError::from)?;
        let count = store.message_count().await.map_err(CliError::from)?;
        writeln!(
            out,
            "Session {} ({count} stored message(s))\n",
            session.key
        )?;
    }

    while let Some(line) = read_line(input, out, "You")? {
        if is_exit_command(&line) {
            break;
        }
        let message = match validate_message(&line) {
            Ok(message) => message,
            Err(e) => {
                writeln!(out, "{e}")?;
                continue;
            }
        };

        match conversation.service.send(message).await {
            Ok(response) => writeln!(out, "\n{}", format_response(speaker, &response))?,
            Err(ChatError::ExternalApi(e)) => {
                warn!(error = %e, "Completion failed");
                writeln!(out, "\n{}\n", CliError::from(e))?;
            }
            Err(e) => return Err(CliError::from(e).into()),
        }
    }

    if let Some(store) = &conversation.persistent {
        let session = store.session().await.map_err(CliError::from)?;
        writeln!(
            out,
            "\nSaved as {} ({} tokens used). Resume with --session {}.",
            session.key,
            session.total_tokens(),
            session.key.id
        )?;
    }

    Ok(())
}
