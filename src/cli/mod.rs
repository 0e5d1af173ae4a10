//! Command-line front end.

pub mod args;
pub mod display;

pub use args::{Cli, Command, Connection, DownloadArgs, SearchArgs};
