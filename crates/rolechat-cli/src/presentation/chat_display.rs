//! Formatting of chat replies and stored messages.

use rolechat_core::{ChatResponse, MessageRole, Session, StoredMessage, UsageInfo};

use super::tables::truncate_string;

/// Lines shown for a reply: the text, then suggested phrases and usage.
pub fn format_response(speaker: &str, response: &ChatResponse) -> String {
    let mut out = format!("{speaker}: {}\n", response.text);

    if !response.suggested_phrases.is_empty() {
        out.push_str("\nSuggested phrases:\n");
        for phrase in &response.suggested_phrases {
            out.push_str(&format!("  • {phrase}\n"));
        }
    }

    if let Some(usage) = response.usage {
        out.push_str(&format!("\n[tokens] {}\n", format_usage(usage)));
    }

    out
}

pub fn format_usage(usage: UsageInfo) -> String {
    usage.to_string()
}

/// One line per stored message for the `history` command.
pub fn format_stored_message(message: &StoredMessage) -> String {
    let mut line = format!(
        "[{}] {}: {}",
        message.created_at.format("%Y-%m-%d %H:%M:%S"),
        role_label(message.role),
        message.content
    );
    if let Some(usage) = message.usage {
        line.push_str(&format!("\n    → tokens: {}", usage.total_tokens()));
    }
    line
}

/// Short description of a session's setup for listings.
pub fn session_details(session: &Session) -> String {
    match &session.roleplay {
        Some(profile) => format!(
            "{} / {} ({}, {})",
            truncate_string(&profile.user_role, 20),
            truncate_string(&profile.gpt_role, 20),
            profile.language,
            profile.difficulty
        ),
        None => truncate_string(&session.instruction, 40),
    }
}

const fn role_label(role: MessageRole) -> &'static str {
    match role {
        MessageRole::System => "System",
        MessageRole::User => "You",
        MessageRole::Assistant => "AI",
    }
}
