//! HTTP client for the Closetly backend.
//!
//! [`api::ClosetlyApi`] wraps the REST endpoints and implements
//! [`closetly_core::backend::JobBackend`] so it can drive the try-on
//! controller directly.

pub mod api;
pub mod backend;
pub mod config;
pub mod messages;
