//! Collaborators outside the core, currently the shared HTTP client.

pub mod client;

pub use client::{HttpOutcome, http_client, send};
