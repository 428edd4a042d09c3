//! History store implementations.
//!
//! - [`InMemoryHistoryStore`]: ephemeral, process-local
//! - [`PersistentHistoryStore`]: durable, over any [`SessionRepository`](crate::ports::SessionRepository)

mod memory;
mod persistent;

pub use memory::InMemoryHistoryStore;
pub use persistent::{PersistentHistoryStore, new_session_for};
