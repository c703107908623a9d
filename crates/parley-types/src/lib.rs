//! Shared domain types for Parley.
//!
//! This crate contains the core domain types used across the assistant:
//! conversations, chat messages, LLM request/response shapes, configuration
//! keys and defaults, and their associated error types.
//!
//! Zero infrastructure dependencies -- only serde, chrono, thiserror.

pub mod chat;
pub mod config;
pub mod error;
pub mod llm;
