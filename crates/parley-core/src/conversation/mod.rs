//! Conversation and message persistence for Parley.
//!
//! `ConversationRepository` is the port the infrastructure layer implements;
//! `ConversationService` layers validation and not-found mapping on top.

pub mod repository;
pub mod service;
