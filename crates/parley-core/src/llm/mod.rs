//! Model provider abstractions for Parley.
//!
//! - `LlmProvider`: RPITIT trait for concrete provider implementations
//! - `BoxLlmProvider`: object-safe wrapper for dynamic dispatch
//! - `ProviderFactory`: builds a provider for a credential at call time
//! - `probe`: the minimal request used to check a credential

pub mod box_provider;
pub mod probe;
pub mod provider;
