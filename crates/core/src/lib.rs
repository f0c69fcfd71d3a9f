//! Domain types shared by the Closetly client crates.
//!
//! Catalog entries, image payloads, try-on requests and job records, the
//! [`backend::JobBackend`] seam, and small configuration helpers. Nothing
//! here performs I/O except [`image::ImagePayload::from_file`].

pub mod backend;
pub mod catalog;
pub mod config;
pub mod error;
pub mod image;
pub mod tryon;
pub mod types;
