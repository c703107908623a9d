//! Runtime configuration: override storage and precedence resolution.

pub mod repository;
pub mod service;
