//! Exit codes for the CLI

/// Success
#[allow(dead_code)]
pub const SUCCESS: i32 = 0;

/// Any fatal condition: configuration error, failed command, failed test
pub const ERROR: i32 = 1;
