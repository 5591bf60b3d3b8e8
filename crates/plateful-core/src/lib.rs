//! Shared kernel for Plateful
//!
//! Holds the per-request user context and the `HttpError` trait that feature
//! crates implement to expose their domain errors over HTTP.

#![allow(clippy::must_use_candidate, clippy::missing_errors_doc)]

pub mod context;
pub mod error;

pub use context::UserContext;
pub use error::HttpError;
