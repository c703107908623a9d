//! Infrastructure implementations for Parley.
//!
//! Concrete adapters for the ports defined in `parley-core`: SQLite
//! repositories, the OpenAI-compatible model provider, and startup config
//! loading.

pub mod config;
pub mod llm;
pub mod sqlite;
