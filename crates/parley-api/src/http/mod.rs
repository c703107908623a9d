//! HTTP/REST API layer for Parley.
//!
//! Axum-based REST API at `/api/v1/` with envelope response format and CORS
//! support. There is no authentication: the server is meant for localhost.

pub mod error;
pub mod handlers;
pub mod response;
pub mod router;
