//! Errors raised while configuring, launching or waiting on a child.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

use crate::process::api::StandardStream;

/// Errors that can occur while configuring or launching a child.
#[derive(Debug, Error)]
pub enum LaunchError {
    /// Path has no file name, does not exist, or is not a file.
    #[error("Invalid executable '{}'", path.display())]
    InvalidExecutable { path: PathBuf },

    #[error("Argument must not be empty")]
    EmptyArgument,

    /// A redirection target could not be opened.
    #[error("Failed to open {stream} redirection: {source}")]
    StreamSetupFailed {
        stream: StandardStream,
        #[source]
        source: io::Error,
    },

    /// The native create-process call reported failure.
    #[error("Process creation failed: {source}")]
    ProcessCreationFailed {
        code: Option<i32>,
        #[source]
        source: io::Error,
    },

    #[error("Failed to wait for process {pid}: {source}")]
    WaitFailed {
        pid: u32,
        #[source]
        source: io::Error,
    },
}

impl LaunchError {
    pub(crate) fn creation(source: io::Error) -> Self {
        LaunchError::ProcessCreationFailed {
            code: source.raw_os_error(),
            source,
        }
    }

    /// OS error code carried by the error, if any.
    pub fn os_code(&self) -> Option<i32> {
        match self {
            LaunchError::ProcessCreationFailed { code, .. } => *code,
            LaunchError::StreamSetupFailed { source, .. }
            | LaunchError::WaitFailed { source, .. } => source.raw_os_error(),
            LaunchError::InvalidExecutable { .. } | LaunchError::EmptyArgument => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn creation_keeps_os_code() {
        let err = LaunchError::creation(io::Error::from_raw_os_error(2));
        assert_eq!(err.os_code(), Some(2));
        assert!(err.to_string().starts_with("Process creation failed"));
    }

    #[test]
    fn invalid_executable_names_the_path() {
        let err = LaunchError::InvalidExecutable {
            path: PathBuf::from("/no/such/tool"),
        };
        assert_eq!(err.to_string(), "Invalid executable '/no/such/tool'");
        assert_eq!(err.os_code(), None);
    }
}
