// Runner constants (no magic values)

/// Working directory used when none is given
pub const DEFAULT_WORKING_DIR: &str = ".";

/// Shell used for `Command::Shell` lines
#[cfg(unix)]
pub const DEFAULT_SHELL_PROGRAM: &str = "sh";
#[cfg(unix)]
pub const DEFAULT_SHELL_FLAG: &str = "-c";

#[cfg(windows)]
pub const DEFAULT_SHELL_PROGRAM: &str = "cmd";
#[cfg(windows)]
pub const DEFAULT_SHELL_FLAG: &str = "/C";

/// Prefix of every diagnostic line
pub const DIAGNOSTIC_PREFIX: &str = "seqrun";

/// Process exit code when the failing command has no usable code of its own
pub const FALLBACK_FAILURE_EXIT_CODE: i32 = 1;
