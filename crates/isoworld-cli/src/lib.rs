//! Command-line inspector for isometric world data.
//!
//! The `isoworld` binary is a thin wrapper around this crate: it parses a
//! [`Cli`], installs logging and hands over to [`run`].

#![warn(missing_docs)]

pub mod commands;
pub mod config;

pub use commands::run;
pub use config::{Cli, Command};
