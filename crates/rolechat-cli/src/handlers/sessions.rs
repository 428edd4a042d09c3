//! Session maintenance handlers: `sessions`, `history` and `clear`.

use anyhow::Result;
use rolechat_core::{SessionKey, SessionKind, StoredMessage};

use crate::bootstrap::CliContext;
use crate::error::CliError;
use crate::presentation::{
    format_stored_message, print_separator, session_details, truncate_string,
};
use crate::utils::input::prompt_confirmation;

/// List stored sessions, most recently updated first.
///
/// Without a kind both general and roleplay sessions are shown.
pub async fn list(ctx: &CliContext, kind: Option<SessionKind>) -> Result<()> {
    let kinds = match kind {
        Some(kind) => vec![kind],
        None => vec![SessionKind::General, SessionKind::RolePlay],
    };

    for kind in kinds {
        let sessions = ctx
            .sessions()
            .list_sessions(kind)
            .await
            .map_err(CliError::from)?;

        if sessions.is_empty() {
            println!("No {kind} sessions found.\n");
            continue;
        }

        println!("{} {kind} session(s):\n", sessions.len());
        println!(
            "{:<5} {:<22} {:<14} {:<8} {:<20} {:<45} Last message",
            "ID", "Title", "Model", "Tokens", "Updated", "Details"
        );
        print_separator(150);

        for session in sessions {
            let last = ctx
                .sessions()
                .recent_messages(session.key, Some(1))
                .await
                .map_err(CliError::from)?;
            let preview = last
                .first()
                .map_or_else(|| "--".to_string(), StoredMessage::preview);

            println!(
                "{:<5} {:<22} {:<14} {:<8} {:<20} {:<45} {}",
                session.key.id,
                truncate_string(&session.display_title(), 21),
                truncate_string(&session.model, 13),
                session.total_tokens(),
                session.updated_at.format("%Y-%m-%d %H:%M:%S"),
                truncate_string(&session_details(&session), 44),
                preview
            );
        }
        println!();
    }

    Ok(())
}

/// Print the stored messages of a session in chronological order.
pub async fn history(ctx: &CliContext, key: SessionKey, limit: Option<usize>) -> Result<()> {
    let session = ctx
        .sessions()
        .get_session(key)
        .await
        .map_err(CliError::from)?
        .ok_or_else(|| CliError::Arguments(format!("session {key} not found")))?;

    let messages = ctx
        .sessions()
        .recent_messages(key, limit)
        .await
        .map_err(CliError::from)?;

    println!("{} ({key}, model {})", session.display_title(), session.model);
    print_separator(60);

    if messages.is_empty() {
        println!("No messages stored.");
        return Ok(());
    }

    for message in &messages {
        println!("{}", format_stored_message(message));
    }
    print_separator(60);
    println!(
        "{} message(s), {} tokens in total",
        messages.len(),
        session.total_tokens()
    );

    Ok(())
}

/// Delete the messages of a session, or the whole session with `delete`.
pub async fn clear(ctx: &CliContext, key: SessionKey, delete: bool, force: bool) -> Result<()> {
    if ctx
        .sessions()
        .get_session(key)
        .await
        .map_err(CliError::from)?
        .is_none()
    {
        return Err(CliError::Arguments(format!("session {key} not found")).into());
    }

    let count = ctx
        .sessions()
        .message_count(key)
        .await
        .map_err(CliError::from)?;

    if !force {
        let what = if delete { "Delete session" } else { "Clear" };
        let confirmed = prompt_confirmation(&format!("{what} {key} with {count} message(s)?"))?;
        if !confirmed {
            println!("Cancelled.");
            return Ok(());
        }
    }

    if delete {
        ctx.sessions()
            .delete_session(key)
            .await
            .map_err(CliError::from)?;
        println!("Deleted session {key} and {count} message(s).");
    } else {
        let deleted = ctx
            .sessions()
            .delete_messages(key)
            .await
            .map_err(CliError::from)?;
        println!("Cleared {deleted} message(s) from {key}.");
    }

    Ok(())
}
