//! Shared test utilities: a spy `ProcessApi` that records every call.

#![allow(dead_code)]

use parking_lot::Mutex;
use std::io;
use std::path::PathBuf;
use std::sync::Arc;

use stdio_recorder::process::{
    CreateRequest, ExitStatus, ProcessApi, ProcessBuilder, RawHandle, RawProcessInfo,
    StandardStream, Stdio,
};

/// Pid reported for every spawned child.
pub const SPY_PID: u32 = 4242;

/// What one `create_process` call received.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordedRequest {
    pub executable: Option<PathBuf>,
    pub command_line: Option<String>,
    pub inherit_handles: bool,
    pub stdin: Option<RawHandle>,
    pub stdout: Option<RawHandle>,
    pub stderr: Option<RawHandle>,
}

#[derive(Debug, Default)]
struct SpyState {
    next_handle: isize,
    opened: Vec<(StandardStream, Stdio, RawHandle)>,
    closed: Vec<RawHandle>,
    requests: Vec<RecordedRequest>,
}

/// Hands out increasing fake handles and remembers what was closed.
#[derive(Debug, Default)]
pub struct SpyApi {
    state: Mutex<SpyState>,
    /// Fail `create_process` with this OS error code.
    pub fail_create: Option<i32>,
    /// Fail `open_stream` for this stream.
    pub fail_open: Option<StandardStream>,
    /// Report a thread handle alongside the process handle.
    pub with_thread: bool,
}

impl SpyApi {
    pub fn new() -> Arc<Self> {
        Arc::new(Self {
            with_thread: true,
            ..Default::default()
        })
    }

    pub fn failing_create(code: i32) -> Arc<Self> {
        Arc::new(Self {
            fail_create: Some(code),
            with_thread: true,
            ..Default::default()
        })
    }

    pub fn failing_open(stream: StandardStream) -> Arc<Self> {
        Arc::new(Self {
            fail_open: Some(stream),
            with_thread: true,
            ..Default::default()
        })
    }

    pub fn opened(&self) -> Vec<(StandardStream, Stdio, RawHandle)> {
        self.state.lock().opened.clone()
    }

    pub fn opened_count(&self) -> usize {
        self.state.lock().opened.len()
    }

    pub fn closed(&self) -> Vec<RawHandle> {
        self.state.lock().closed.clone()
    }

    pub fn closed_count(&self) -> usize {
        self.state.lock().closed.len()
    }

    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.state.lock().requests.clone()
    }

    fn allocate(state: &mut SpyState) -> RawHandle {
        state.next_handle += 1;
        RawHandle::from_raw(100 + state.next_handle)
    }
}

impl ProcessApi for SpyApi {
    fn open_stream(&self, stream: StandardStream, target: &Stdio) -> io::Result<RawHandle> {
        if self.fail_open == Some(stream) {
            return Err(io::Error::from_raw_os_error(13));
        }
        let mut state = self.state.lock();
        let handle = Self::allocate(&mut state);
        state.opened.push((stream, target.clone(), handle));
        Ok(handle)
    }

    fn create_process(&self, request: &CreateRequest<'_>) -> io::Result<RawProcessInfo> {
        let mut state = self.state.lock();
        state.requests.push(RecordedRequest {
            executable: request.executable.map(PathBuf::from),
            command_line: request.command_line.map(str::to_string),
            inherit_handles: request.inherit_handles,
            stdin: request.startup.stdin(),
            stdout: request.startup.stdout(),
            stderr: request.startup.stderr(),
        });
        if let Some(code) = self.fail_create {
            return Err(io::Error::from_raw_os_error(code));
        }
        let process = Self::allocate(&mut state);
        let thread = self.with_thread.then(|| Self::allocate(&mut state));
        Ok(RawProcessInfo {
            process: Some(process),
            thread,
            pid: SPY_PID,
        })
    }

    fn close_handle(&self, handle: RawHandle) -> io::Result<()> {
        self.state.lock().closed.push(handle);
        Ok(())
    }

    fn wait(&self, _pid: u32, _process: Option<RawHandle>) -> io::Result<ExitStatus> {
        Ok(ExitStatus::Exited(0))
    }
}

/// Builder wired to `spy`.
pub fn spy_builder(spy: &Arc<SpyApi>) -> ProcessBuilder {
    let api: Arc<dyn ProcessApi> = spy.clone();
    ProcessBuilder::with_api(api)
}

/// An existing regular file usable as an executable path.
pub fn temp_executable() -> (tempfile::TempDir, PathBuf) {
    let dir = tempfile::tempdir().expect("Failed to create temp dir");
    let path = dir.path().join("child");
    std::fs::write(&path, b"").expect("Failed to write fake executable");
    (dir, path)
}
