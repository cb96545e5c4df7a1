//! `CreateProcessW` backend.

use std::ffi::{c_void, OsStr};
use std::fs::{File, OpenOptions};
use std::io;
use std::mem::size_of;
use std::os::windows::ffi::OsStrExt;
use std::os::windows::io::IntoRawHandle;
use std::path::Path;

use windows::core::{PCWSTR, PWSTR};
use windows::Win32::Foundation::{
    CloseHandle, SetHandleInformation, HANDLE, HANDLE_FLAG_INHERIT, WAIT_FAILED,
};
use windows::Win32::System::Console::{
    GetStdHandle, STD_ERROR_HANDLE, STD_HANDLE, STD_INPUT_HANDLE, STD_OUTPUT_HANDLE,
};
use windows::Win32::System::Threading::{
    CreateProcessW, GetExitCodeProcess, WaitForSingleObject, INFINITE, PROCESS_CREATION_FLAGS,
    PROCESS_INFORMATION, STARTF_USESTDHANDLES, STARTUPINFOW,
};

use crate::process::api::{CreateRequest, ProcessApi, RawProcessInfo, StandardStream, Stdio};
use crate::process::handle::{ExitStatus, RawHandle};

const NUL_DEVICE: &str = "NUL";

/// Native process API for Windows.
///
/// When an executable is set its quoted path leads the command line, so the
/// child sees itself as argv[0].
#[derive(Debug, Clone, Copy, Default)]
pub struct NativeApi;

impl ProcessApi for NativeApi {
    fn open_stream(&self, stream: StandardStream, target: &Stdio) -> io::Result<RawHandle> {
        let file = match (stream, target) {
            (_, Stdio::Inherit) => {
                return Err(io::Error::new(
                    io::ErrorKind::InvalidInput,
                    "inherited streams have no handle to open",
                ))
            }
            (StandardStream::Input, Stdio::Null) => File::open(NUL_DEVICE)?,
            (StandardStream::Input, Stdio::File { path, .. }) => File::open(path)?,
            (_, Stdio::Null) => OpenOptions::new().write(true).open(NUL_DEVICE)?,
            (_, Stdio::File { path, append }) => open_output(path, *append)?,
        };

        let handle = HANDLE(file.into_raw_handle());
        // std opens files non-inheritable; the child needs to inherit this one.
        let inheritable =
            unsafe { SetHandleInformation(handle, HANDLE_FLAG_INHERIT.0, HANDLE_FLAG_INHERIT) };
        if let Err(err) = inheritable {
            let _ = unsafe { CloseHandle(handle) };
            return Err(err.into());
        }
        Ok(to_raw(handle))
    }

    fn create_process(&self, request: &CreateRequest<'_>) -> io::Result<RawProcessInfo> {
        let application = request.executable.map(|exe| wide(exe.as_os_str()));

        let mut command_line = String::new();
        if let Some(exe) = request.executable {
            command_line.push('"');
            command_line.push_str(&exe.to_string_lossy());
            command_line.push('"');
        }
        if let Some(args) = request.command_line {
            if !command_line.is_empty() {
                command_line.push(' ');
            }
            command_line.push_str(args);
        }
        let mut command_line =
            (!command_line.is_empty()).then(|| wide(OsStr::new(&command_line)));

        let mut startup = STARTUPINFOW {
            cb: size_of::<STARTUPINFOW>() as u32,
            ..Default::default()
        };
        if request.inherit_handles {
            startup.dwFlags |= STARTF_USESTDHANDLES;
            startup.hStdInput =
                stream_or_parent(request, StandardStream::Input, STD_INPUT_HANDLE);
            startup.hStdOutput =
                stream_or_parent(request, StandardStream::Output, STD_OUTPUT_HANDLE);
            startup.hStdError =
                stream_or_parent(request, StandardStream::Error, STD_ERROR_HANDLE);
        }

        let mut info = PROCESS_INFORMATION::default();
        unsafe {
            CreateProcessW(
                application
                    .as_ref()
                    .map_or(PCWSTR::null(), |app| PCWSTR(app.as_ptr())),
                command_line.as_mut().map(|line| PWSTR(line.as_mut_ptr())),
                None,
                None,
                request.inherit_handles,
                PROCESS_CREATION_FLAGS(0),
                None,
                PCWSTR::null(),
                &startup,
                &mut info,
            )
        }?;

        Ok(RawProcessInfo {
            process: Some(to_raw(info.hProcess)),
            thread: Some(to_raw(info.hThread)),
            pid: info.dwProcessId,
        })
    }

    fn close_handle(&self, handle: RawHandle) -> io::Result<()> {
        unsafe { CloseHandle(from_raw(handle)) }?;
        Ok(())
    }

    fn wait(&self, _pid: u32, process: Option<RawHandle>) -> io::Result<ExitStatus> {
        let process = process.map(from_raw).ok_or_else(|| {
            io::Error::new(io::ErrorKind::InvalidInput, "no process handle to wait on")
        })?;
        if unsafe { WaitForSingleObject(process, INFINITE) } == WAIT_FAILED {
            return Err(io::Error::last_os_error());
        }
        let mut code = 0u32;
        unsafe { GetExitCodeProcess(process, &mut code) }?;
        Ok(ExitStatus::Exited(code as i32))
    }
}

fn open_output(path: &Path, append: bool) -> io::Result<File> {
    OpenOptions::new()
        .write(true)
        .create(true)
        .append(append)
        .truncate(!append)
        .open(path)
}

fn stream_or_parent(
    request: &CreateRequest<'_>,
    stream: StandardStream,
    parent: STD_HANDLE,
) -> HANDLE {
    match request.startup.get(stream) {
        Some(handle) => from_raw(handle),
        None => unsafe { GetStdHandle(parent) }.unwrap_or_default(),
    }
}

fn wide(s: &OsStr) -> Vec<u16> {
    s.encode_wide().chain(std::iter::once(0)).collect()
}

fn to_raw(handle: HANDLE) -> RawHandle {
    RawHandle::from_raw(handle.0 as isize)
}

fn from_raw(handle: RawHandle) -> HANDLE {
    HANDLE(handle.as_raw() as *mut c_void)
}
