//! Chained configuration of a child launch.

use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::process::api::{CreateRequest, ProcessApi, StandardStream, Stdio};
use crate::process::command_line::sanitize_argument;
use crate::process::error::LaunchError;
use crate::process::handle::{OwnedHandle, Process, ProcessInfo, StartupInfo};
use crate::process::sys::native_api;

/// Builder for a child process launch.
///
/// Holds configuration only; every [`start`](Self::start) opens its own
/// handles and launches an independent child.
pub struct ProcessBuilder {
    api: Arc<dyn ProcessApi>,
    executable: Option<PathBuf>,
    arguments: String,
    stdin: Stdio,
    stdout: Stdio,
    stderr: Stdio,
}

impl ProcessBuilder {
    /// Builder over the platform's native process API.
    pub fn new() -> Self {
        Self::with_api(native_api())
    }

    pub fn with_api(api: Arc<dyn ProcessApi>) -> Self {
        Self {
            api,
            executable: None,
            arguments: String::new(),
            stdin: Stdio::Inherit,
            stdout: Stdio::Inherit,
            stderr: Stdio::Inherit,
        }
    }

    /// Set the program to run, replacing any earlier one.
    ///
    /// The path must name an existing file.
    pub fn executable(mut self, path: impl AsRef<Path>) -> Result<Self, LaunchError> {
        let path = path.as_ref();
        if !is_valid_executable(path) {
            return Err(LaunchError::InvalidExecutable {
                path: path.to_path_buf(),
            });
        }
        tracing::debug!(executable = %path.display(), "Executable set");
        self.executable = Some(path.to_path_buf());
        Ok(self)
    }

    /// Quote `argument` and append it to the command line.
    pub fn add_argument(mut self, argument: &str) -> Result<Self, LaunchError> {
        let sanitized = sanitize_argument(argument)?;
        if !self.arguments.is_empty() {
            self.arguments.push(' ');
        }
        self.arguments.push_str(&sanitized);
        Ok(self)
    }

    /// Replace the whole command line verbatim, without quoting.
    pub fn arguments(mut self, raw: impl Into<String>) -> Self {
        self.arguments = raw.into();
        self
    }

    pub fn stdin(mut self, target: Stdio) -> Self {
        self.stdin = target;
        self
    }

    pub fn stdout(mut self, target: Stdio) -> Self {
        self.stdout = target;
        self
    }

    pub fn stderr(mut self, target: Stdio) -> Self {
        self.stderr = target;
        self
    }

    pub fn get_executable(&self) -> Option<&Path> {
        self.executable.as_deref()
    }

    /// The accumulated argument string.
    pub fn command_line(&self) -> &str {
        &self.arguments
    }

    /// Launch a child with the current configuration.
    pub fn start(&self) -> Result<Process, LaunchError> {
        let startup = self.open_streams()?;
        let request = CreateRequest {
            executable: self.executable.as_deref(),
            command_line: (!self.arguments.is_empty()).then_some(self.arguments.as_str()),
            inherit_handles: !startup.is_empty(),
            startup: &startup,
        };
        tracing::debug!(?request, "Creating process");

        // On failure `startup` drops here and closes whatever was opened.
        let raw = self
            .api
            .create_process(&request)
            .map_err(LaunchError::creation)?;

        let info = ProcessInfo::from_raw(raw, &self.api);
        tracing::info!(pid = info.id(), "Process started");
        Ok(Process::new(startup, info, Arc::clone(&self.api)))
    }

    fn open_streams(&self) -> Result<StartupInfo, LaunchError> {
        let mut startup = StartupInfo::new();
        let targets = [
            (StandardStream::Input, &self.stdin),
            (StandardStream::Output, &self.stdout),
            (StandardStream::Error, &self.stderr),
        ];
        for (stream, target) in targets {
            if target.is_inherit() {
                continue;
            }
            let raw = self
                .api
                .open_stream(stream, target)
                .map_err(|source| LaunchError::StreamSetupFailed { stream, source })?;
            startup.populate(stream, OwnedHandle::new(raw, Arc::clone(&self.api)));
        }
        Ok(startup)
    }
}

impl Default for ProcessBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for ProcessBuilder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ProcessBuilder")
            .field("executable", &self.executable)
            .field("arguments", &self.arguments)
            .field("stdin", &self.stdin)
            .field("stdout", &self.stdout)
            .field("stderr", &self.stderr)
            .finish_non_exhaustive()
    }
}

fn is_valid_executable(path: &Path) -> bool {
    path.file_name().is_some() && path.is_file()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn add_argument_joins_with_single_space() {
        let builder = ProcessBuilder::new()
            .add_argument("a b")
            .unwrap()
            .add_argument("c")
            .unwrap();
        assert_eq!(builder.command_line(), "\"a b\" \"c\"");
    }

    #[test]
    fn arguments_replace_verbatim() {
        let builder = ProcessBuilder::new()
            .add_argument("x")
            .unwrap()
            .arguments("raw tail \"as is");
        assert_eq!(builder.command_line(), "raw tail \"as is");
    }

    #[test]
    fn empty_argument_is_rejected() {
        let err = ProcessBuilder::new().add_argument("").unwrap_err();
        assert!(matches!(err, LaunchError::EmptyArgument));
    }

    #[test]
    fn executable_without_file_name_is_rejected() {
        let err = ProcessBuilder::new().executable("/").unwrap_err();
        assert!(matches!(err, LaunchError::InvalidExecutable { .. }));

        let err = ProcessBuilder::new().executable("..").unwrap_err();
        assert!(matches!(err, LaunchError::InvalidExecutable { .. }));
    }

    #[test]
    fn directory_is_not_an_executable() {
        let dir = tempfile::tempdir().unwrap();
        let err = ProcessBuilder::new().executable(dir.path()).unwrap_err();
        assert!(matches!(err, LaunchError::InvalidExecutable { .. }));
    }
}
