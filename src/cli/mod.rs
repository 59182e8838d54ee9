//! Command-line interface: argument parsing, telemetry setup and dispatch.

pub mod actions;
pub mod commands;
pub mod dispatch;
mod start;
pub mod telemetry;

pub use start::start;
