//! linear-mcp CLI Library
//!
//! Command-line definitions, exit codes and the `stale` report command,
//! exposed as a library so they can be tested.

/// Command-line interface definitions and argument parsing
pub mod cli;
/// Exit codes used by the CLI application
pub mod exit_codes;
/// One-shot stale project report
pub mod stale;
