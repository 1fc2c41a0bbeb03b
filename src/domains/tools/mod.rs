//! Tools domain module.
//!
//! Every Rebillia API operation is exposed as one MCP tool. A tool couples a
//! JSON-schema contract with a handler that validates the argument bag,
//! calls exactly one service function, and wraps the outcome in a uniform
//! [`ToolResult`].
//!
//! ## Architecture
//!
//! - `definitions/` - tool contracts and handlers, one module per resource area
//! - `registry.rs` - insertion-ordered registry and dispatch
//! - `schema.rs` - argument validation combinators
//! - `result.rs` - the uniform result shape

pub mod definitions;
pub mod registry;
pub mod result;
pub mod schema;

pub use definitions::register_all;
pub use registry::{ToolDef, ToolHandler, ToolRegistry};
pub use result::ToolResult;
pub use schema::Validator;
