//! Rebillia MCP server library.
//!
//! Exposes the Rebillia Public API (customers, subscriptions, invoices,
//! products, rate plans, transactions, bill runs, gateways, currencies,
//! integrations, shipping, filters) as MCP tools over stdio, plus bundled
//! API documentation resources.
//!
//! # Architecture
//!
//! - **core**: configuration, error handling, the upstream HTTP client, and
//!   the MCP server handler
//! - **services**: one function per Rebillia endpoint, speaking the upstream
//!   REST conventions
//! - **domains**: the MCP-facing surface
//!   - **tools**: tool contracts, argument validation, registry and dispatch
//!   - **resources**: static API documentation under `rebillia://docs/*`

pub mod core;
pub mod domains;
pub mod services;

pub use core::{Config, Error, RebilliaServer, Result};
