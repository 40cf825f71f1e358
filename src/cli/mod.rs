//! Command-line interface module.

mod args;
pub mod init;
pub mod render;
pub mod serve;

pub use args::{Cli, Commands, RenderArgs};
