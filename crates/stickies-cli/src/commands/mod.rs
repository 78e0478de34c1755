//! Command handlers, one module per command group

pub mod config;
pub mod note;
pub mod status;
