mod args;
pub mod commands;
pub mod core;
pub mod output;
pub mod registry;
mod shell;

pub use shell::{run_cli, run_once, SCRIPT_ENV};
