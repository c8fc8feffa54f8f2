//! Library side of the `solar-compare` command: configuration, logging and
//! the command drivers used by the binary and the integration tests.

pub mod cli;
pub mod commands;
pub mod config;
pub mod logging;
pub mod types;
