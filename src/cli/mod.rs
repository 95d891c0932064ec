//! Command-line front end: one-shot `check` and periodic `watch`

pub mod commands;
pub mod logging;
pub mod output;

pub use commands::{Cli, Commands, exit_status, run};
