//! Exit code constants for CLI commands
//!
//! - 0: Success
//! - 1: Completed with warnings (for example, projects that could not be checked)
//! - 2: Configuration errors or failures talking to Linear

/// Successful execution
pub const EXIT_SUCCESS: i32 = 0;

/// Completed, but some results are incomplete
pub const EXIT_WARNING: i32 = 1;

/// The command could not complete
pub const EXIT_ERROR: i32 = 2;
