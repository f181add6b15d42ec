//! Tools module - what the model is allowed to call.
//!
//! ## Key Types
//!
//! - [`ToolDefinition`] - name, description and input schema
//! - [`ToolRegistry`] - the ordered tool list for a [`Toolset`]
//! - [`ToolResult`] - the only shape a dispatched call returns
//! - [`validate_input`] - schema check applied before any tool runs

pub mod definitions;
pub mod geo;
mod schema;
mod tool_definition;
mod tool_registry;
mod tool_result;

pub use schema::{validate_input, SchemaValidationError};
pub use tool_definition::ToolDefinition;
pub use tool_registry::{ToolRegistry, Toolset};
pub use tool_result::ToolResult;
