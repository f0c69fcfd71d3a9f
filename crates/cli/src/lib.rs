//! Command-line front end for the Closetly try-on workflow.

pub mod args;
pub mod render;
