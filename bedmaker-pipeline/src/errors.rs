use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Error type for pipeline manager operations.
#[derive(Error, Debug)]
pub enum PipelineError {
    /// An external tool exited unsuccessfully.
    #[error("`{program}` failed with {status}: {command}")]
    CommandFailed {
        command: String,
        program: String,
        status: String,
    },

    /// An external tool could not be started, usually because it is not installed.
    #[error("Failed to start `{program}`: {source}")]
    Spawn {
        program: String,
        #[source]
        source: io::Error,
    },

    /// A lock file for the target is left over from another (or a crashed) run.
    #[error("Target is locked by {0}. Another run may be in progress; use --recover to override")]
    Locked(PathBuf),

    /// The command succeeded but did not write its target.
    #[error("Command completed but target was not produced: {0}")]
    MissingTarget(PathBuf),

    /// The run was cancelled with an interrupt signal.
    #[error("Pipeline aborted")]
    Interrupted,

    #[error(transparent)]
    Io(#[from] io::Error),
}

/// Result type alias for bedmaker-pipeline operations.
pub type Result<T> = std::result::Result<T, PipelineError>;
