//! Core provisioning logic — plan types, the built-in plan, parsing, execution.

pub mod error;
pub mod executor;
pub mod parser;
pub mod plan;
pub mod types;
