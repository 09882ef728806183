//! formfill command line front end.
//!
//! The `formfill` binary parses [`cli::Cli`], sets up [`logging`] and hands
//! the subcommand to [`commands::run`].

pub mod cli;
pub mod commands;
pub mod logging;
mod summary;
