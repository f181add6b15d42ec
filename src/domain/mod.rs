//! Domain layer - pure types and rules.
//!
//! Nothing in here performs I/O.

pub mod agent;
pub mod foundation;
pub mod tools;
