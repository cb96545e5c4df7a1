//! Ownership guards for the OS handles a launch produces.

use std::fmt;
use std::io;
use std::sync::Arc;

use crate::process::api::{ProcessApi, RawProcessInfo, StandardStream};
use crate::process::error::LaunchError;

/// Opaque OS handle value: a file descriptor on Unix, a `HANDLE` on Windows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RawHandle(isize);

impl RawHandle {
    pub const fn from_raw(raw: isize) -> Self {
        Self(raw)
    }

    pub const fn as_raw(self) -> isize {
        self.0
    }
}

/// A handle that is closed through its [`ProcessApi`] when dropped.
pub struct OwnedHandle {
    raw: Option<RawHandle>,
    api: Arc<dyn ProcessApi>,
}

impl OwnedHandle {
    pub fn new(raw: RawHandle, api: Arc<dyn ProcessApi>) -> Self {
        Self {
            raw: Some(raw),
            api,
        }
    }

    pub fn raw(&self) -> Option<RawHandle> {
        self.raw
    }

    /// Close now and report the result instead of logging it.
    pub fn close(mut self) -> io::Result<()> {
        self.release()
    }

    fn release(&mut self) -> io::Result<()> {
        match self.raw.take() {
            Some(raw) => self.api.close_handle(raw),
            None => Ok(()),
        }
    }
}

impl fmt::Debug for OwnedHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("OwnedHandle").field(&self.raw).finish()
    }
}

impl Drop for OwnedHandle {
    fn drop(&mut self) {
        let raw = self.raw;
        if let Err(err) = self.release() {
            tracing::warn!(handle = ?raw, error = %err, "Failed to close handle");
        }
    }
}

/// Stream handles handed to a child at creation time.
#[derive(Debug, Default)]
pub struct StartupInfo {
    stdin: Option<OwnedHandle>,
    stdout: Option<OwnedHandle>,
    stderr: Option<OwnedHandle>,
}

impl StartupInfo {
    pub fn new() -> Self {
        Self::default()
    }

    /// Install the handle for `stream`. Only the builder populates startup info.
    pub(crate) fn populate(&mut self, stream: StandardStream, handle: OwnedHandle) {
        let slot = match stream {
            StandardStream::Input => &mut self.stdin,
            StandardStream::Output => &mut self.stdout,
            StandardStream::Error => &mut self.stderr,
        };
        debug_assert!(slot.is_none(), "{} handle populated twice", stream);
        *slot = Some(handle);
    }

    pub fn get(&self, stream: StandardStream) -> Option<RawHandle> {
        match stream {
            StandardStream::Input => self.stdin(),
            StandardStream::Output => self.stdout(),
            StandardStream::Error => self.stderr(),
        }
    }

    pub fn stdin(&self) -> Option<RawHandle> {
        self.stdin.as_ref().and_then(OwnedHandle::raw)
    }

    pub fn stdout(&self) -> Option<RawHandle> {
        self.stdout.as_ref().and_then(OwnedHandle::raw)
    }

    pub fn stderr(&self) -> Option<RawHandle> {
        self.stderr.as_ref().and_then(OwnedHandle::raw)
    }

    /// Number of handles this instance will release.
    pub fn handle_count(&self) -> usize {
        [&self.stdin, &self.stdout, &self.stderr]
            .iter()
            .filter(|h| h.is_some())
            .count()
    }

    pub fn is_empty(&self) -> bool {
        self.handle_count() == 0
    }

    /// Move the handles out, leaving this instance empty.
    pub fn take(&mut self) -> StartupInfo {
        std::mem::take(self)
    }

    /// Close every held handle now; returns the first failure.
    pub fn close(mut self) -> io::Result<()> {
        close_all([self.stdin.take(), self.stdout.take(), self.stderr.take()])
    }
}

/// Process and primary-thread handles of a created child.
#[derive(Debug, Default)]
pub struct ProcessInfo {
    process: Option<OwnedHandle>,
    thread: Option<OwnedHandle>,
    pid: u32,
}

impl ProcessInfo {
    pub(crate) fn from_raw(raw: RawProcessInfo, api: &Arc<dyn ProcessApi>) -> Self {
        Self {
            process: raw.process.map(|h| OwnedHandle::new(h, Arc::clone(api))),
            thread: raw.thread.map(|h| OwnedHandle::new(h, Arc::clone(api))),
            pid: raw.pid,
        }
    }

    pub fn process(&self) -> Option<RawHandle> {
        self.process.as_ref().and_then(OwnedHandle::raw)
    }

    pub fn thread(&self) -> Option<RawHandle> {
        self.thread.as_ref().and_then(OwnedHandle::raw)
    }

    /// OS process id; 0 once moved out.
    pub fn id(&self) -> u32 {
        self.pid
    }

    pub fn handle_count(&self) -> usize {
        usize::from(self.process.is_some()) + usize::from(self.thread.is_some())
    }

    pub fn is_empty(&self) -> bool {
        self.handle_count() == 0
    }

    /// Move the handles out, leaving this instance empty.
    pub fn take(&mut self) -> ProcessInfo {
        std::mem::take(self)
    }

    /// Close both handles now; returns the first failure.
    pub fn close(mut self) -> io::Result<()> {
        close_all([self.process.take(), self.thread.take()])
    }
}

fn close_all<const N: usize>(handles: [Option<OwnedHandle>; N]) -> io::Result<()> {
    let mut first_error = None;
    for handle in handles.into_iter().flatten() {
        if let Err(err) = handle.close() {
            first_error.get_or_insert(err);
        }
    }
    first_error.map_or(Ok(()), Err)
}

/// How a waited-on child finished.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExitStatus {
    Exited(i32),
    /// Unix only: terminated by this signal.
    Signaled(i32),
}

impl ExitStatus {
    pub fn success(self) -> bool {
        self == ExitStatus::Exited(0)
    }

    pub fn code(self) -> Option<i32> {
        match self {
            ExitStatus::Exited(code) => Some(code),
            ExitStatus::Signaled(_) => None,
        }
    }
}

/// A launched child and every handle its creation produced.
///
/// Not `Clone`: exactly one owner releases the handles, on drop.
pub struct Process {
    startup: StartupInfo,
    info: ProcessInfo,
    api: Arc<dyn ProcessApi>,
}

impl Process {
    pub(crate) fn new(startup: StartupInfo, info: ProcessInfo, api: Arc<dyn ProcessApi>) -> Self {
        Self { startup, info, api }
    }

    pub fn id(&self) -> u32 {
        self.info.id()
    }

    pub fn startup_info(&self) -> &StartupInfo {
        &self.startup
    }

    pub fn process_info(&self) -> &ProcessInfo {
        &self.info
    }

    /// Block until the child exits.
    pub fn wait(&mut self) -> Result<ExitStatus, LaunchError> {
        let pid = self.info.id();
        let status = self
            .api
            .wait(pid, self.info.process())
            .map_err(|source| LaunchError::WaitFailed { pid, source })?;
        tracing::debug!(pid, ?status, "Process exited");
        Ok(status)
    }

    /// Give up the guards without releasing anything.
    pub fn into_parts(self) -> (StartupInfo, ProcessInfo) {
        (self.startup, self.info)
    }
}

impl fmt::Debug for Process {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Process")
            .field("startup", &self.startup)
            .field("info", &self.info)
            .finish_non_exhaustive()
    }
}
