//! Seam between the builder and the OS process-creation primitive.

use std::fmt;
use std::io;
use std::path::{Path, PathBuf};

use crate::process::handle::{ExitStatus, RawHandle, StartupInfo};

/// One of the three standard streams of a child.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StandardStream {
    Input,
    Output,
    Error,
}

impl fmt::Display for StandardStream {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            StandardStream::Input => "stdin",
            StandardStream::Output => "stdout",
            StandardStream::Error => "stderr",
        })
    }
}

/// Where a child's standard stream goes.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum Stdio {
    /// Share the parent's stream.
    #[default]
    Inherit,
    /// Discard output / read nothing.
    Null,
    /// Read from or write to a file. Output files are created if missing.
    File { path: PathBuf, append: bool },
}

impl Stdio {
    /// Write to `path`, truncating it first.
    pub fn file(path: impl Into<PathBuf>) -> Self {
        Stdio::File {
            path: path.into(),
            append: false,
        }
    }

    /// Write to the end of `path`.
    pub fn append(path: impl Into<PathBuf>) -> Self {
        Stdio::File {
            path: path.into(),
            append: true,
        }
    }

    pub fn is_inherit(&self) -> bool {
        matches!(self, Stdio::Inherit)
    }
}

/// Arguments of one create-process call.
#[derive(Debug)]
pub struct CreateRequest<'a> {
    /// Program to run; `None` lets the OS resolve it from the command line.
    pub executable: Option<&'a Path>,
    /// Argument string; `None` when nothing was configured.
    pub command_line: Option<&'a str>,
    /// True when the startup info carries redirected handles.
    pub inherit_handles: bool,
    pub startup: &'a StartupInfo,
}

/// Raw handles returned by a successful create-process call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RawProcessInfo {
    pub process: Option<RawHandle>,
    pub thread: Option<RawHandle>,
    pub pid: u32,
}

/// The native primitives a launch needs.
///
/// Every handle returned by `open_stream` or `create_process` is later passed
/// to `close_handle` exactly once by its owning guard.
pub trait ProcessApi: Send + Sync {
    /// Open the handle a child will use for `stream`. Never called for
    /// [`Stdio::Inherit`].
    fn open_stream(&self, stream: StandardStream, target: &Stdio) -> io::Result<RawHandle>;

    fn create_process(&self, request: &CreateRequest<'_>) -> io::Result<RawProcessInfo>;

    fn close_handle(&self, handle: RawHandle) -> io::Result<()>;

    /// Block until the child exits.
    fn wait(&self, pid: u32, process: Option<RawHandle>) -> io::Result<ExitStatus>;
}
