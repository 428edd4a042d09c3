//! Shared CLI presentation utilities.
//!
//! Keep this module format-only: no domain transforms.

pub mod chat_display;
pub mod tables;

// Re-export commonly used items
pub use chat_display::{format_response, format_stored_message, format_usage, session_details};
pub use tables::{print_separator, truncate_string};
