//! Core module containing shared infrastructure components.
//!
//! Configuration, error handling, the upstream HTTP client, and the MCP
//! server handler live here.

pub mod client;
pub mod config;
pub mod error;
pub mod server;

pub use client::{ApiError, ApiTransport, RebilliaClient};
pub use config::Config;
pub use error::{Error, Result};
pub use server::RebilliaServer;
