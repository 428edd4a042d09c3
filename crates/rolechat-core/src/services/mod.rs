//! Core services - the application's orchestration layer.
//!
//! Services here are pure orchestrators over ports; they don't know about
//! concrete implementations.

mod chat_service;

pub use chat_service::ChatService;
