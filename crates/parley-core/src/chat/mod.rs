//! Chat orchestration: history windowing and the send-message cycle.

pub mod history;
pub mod service;
