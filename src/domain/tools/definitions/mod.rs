//! Tool Definitions - parameter types and schemas for every tool.
//!
//! - [`research`] - base research tools
//! - [`experimental`] - record and geography tools for the extended toolset
//! - [`decision`] - the terminal `submit_decision` tool

pub mod decision;
pub mod experimental;
pub mod research;

pub use decision::*;
pub use experimental::*;
pub use research::*;
