//! `SQLite` persistence for rolechat.
//!
//! Implements the [`SessionRepository`](rolechat_core::SessionRepository)
//! port over two session tables (general and roleplay) and one shared
//! message table, plus schema setup and composition helpers.

#![deny(unsafe_code)]

pub mod factory;
pub mod repositories;
pub mod setup;

// Re-export factory for convenient access
pub use factory::StoreFactory;

// Re-export TestDb for integration tests
#[cfg(any(test, feature = "test-utils"))]
pub use factory::TestDb;

pub use repositories::SqliteSessionRepository;

// Re-export setup functions for convenient access
pub use setup::setup_database;
#[cfg(any(test, feature = "test-utils"))]
pub use setup::setup_test_database;
