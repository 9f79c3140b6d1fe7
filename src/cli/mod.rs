//! Command-line interface module.

mod args;
pub mod check;
pub mod common;
pub mod generate;
pub mod init;
pub mod routes;
pub mod validate;

pub use args::{CheckArgs, Cli, Commands, GenerateArgs, ValidateArgs};
