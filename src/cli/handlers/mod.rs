//! Command handlers for CLI operations
//!
//! Handlers resolve providers through the global registry and return plain
//! values; printing is left to the executor.

pub mod notify;
pub mod providers;
pub mod resource;

pub use notify::NotifyCommandHandler;
pub use providers::ProvidersCommandHandler;
pub use resource::ResourceCommandHandler;
