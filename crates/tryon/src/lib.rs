//! Try-on job workflow.
//!
//! [`controller::TryOnJobController`] submits a try-on request through a
//! [`closetly_core::backend::JobBackend`], polls it to completion under a
//! bounded [`config::PollConfig`] budget, and publishes
//! [`state::TryOnState`] transitions to the presentation layer.

pub mod config;
pub mod controller;
pub mod schedule;
pub mod state;

pub use config::PollConfig;
pub use controller::TryOnJobController;
pub use state::{TryOnError, TryOnState};
