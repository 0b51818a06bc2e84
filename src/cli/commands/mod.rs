//! CLI command handlers

pub mod validate;
