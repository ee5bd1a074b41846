//! File naming used inside the pipeline output folder.

/// Suffix of the status flag files, `<name>_<status>.flag`.
pub const FLAG_EXT: &str = ".flag";

/// Prefix of target lock files, `lock.<target file name>`.
pub const LOCK_PREFIX: &str = "lock.";

/// Suffix of the pipeline log, `<name>_log.md`.
pub const LOG_SUFFIX: &str = "_log.md";

/// Suffix of the executed commands record, `<name>_commands.sh`.
pub const COMMANDS_SUFFIX: &str = "_commands.sh";

/// Timestamp format used in the log.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";
