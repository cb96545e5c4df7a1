//! `posix_spawn` backend.

use std::ffi::CString;
use std::fs::{File, OpenOptions};
use std::io;
use std::os::unix::ffi::{OsStrExt, OsStringExt};
use std::os::unix::io::IntoRawFd;
use std::path::Path;
use std::ptr;

use libc::{c_char, c_int};

use crate::process::api::{CreateRequest, ProcessApi, RawProcessInfo, StandardStream, Stdio};
use crate::process::command_line::split_command_line;
use crate::process::handle::{ExitStatus, RawHandle};

const DEV_NULL: &str = "/dev/null";

/// Native process API for Unix.
///
/// The command line is split back into argv. Without an executable, argv[0]
/// is looked up in `PATH`. The process handle is a pidfd on Linux; there is
/// never a thread handle.
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
            (StandardStream::Input, Stdio::Null) => File::open(DEV_NULL)?,
            (StandardStream::Input, Stdio::File { path, .. }) => File::open(path)?,
            (_, Stdio::Null) => OpenOptions::new().write(true).open(DEV_NULL)?,
            (_, Stdio::File { path, append }) => open_output(path, *append)?,
        };
        Ok(RawHandle::from_raw(file.into_raw_fd() as isize))
    }

    fn create_process(&self, request: &CreateRequest<'_>) -> io::Result<RawProcessInfo> {
        let mut argv = request
            .command_line
            .map(split_command_line)
            .unwrap_or_default()
            .into_iter()
            .map(|arg| CString::new(arg.into_bytes()))
            .collect::<Result<Vec<_>, _>>()?;

        let program = match request.executable {
            Some(exe) => {
                let exe = c_path(exe)?;
                argv.insert(0, exe.clone());
                exe
            }
            None => argv.first().cloned().ok_or_else(|| {
                io::Error::new(
                    io::ErrorKind::InvalidInput,
                    "no executable and an empty command line",
                )
            })?,
        };
        let envp = environment();

        let mut actions: libc::posix_spawn_file_actions_t = unsafe { std::mem::zeroed() };
        check(unsafe { libc::posix_spawn_file_actions_init(&mut actions) })?;
        let mut actions = scopeguard::guard(&mut actions, |actions| unsafe {
            libc::posix_spawn_file_actions_destroy(actions);
        });

        let streams = [
            (StandardStream::Input, libc::STDIN_FILENO),
            (StandardStream::Output, libc::STDOUT_FILENO),
            (StandardStream::Error, libc::STDERR_FILENO),
        ];
        for (stream, target_fd) in streams {
            if let Some(handle) = request.startup.get(stream) {
                check(unsafe {
                    libc::posix_spawn_file_actions_adddup2(
                        &mut **actions,
                        handle.as_raw() as c_int,
                        target_fd,
                    )
                })?;
            }
        }

        let argv_ptrs = null_terminated(&argv);
        let envp_ptrs = null_terminated(&envp);
        let mut pid: libc::pid_t = 0;
        let rc = unsafe {
            if request.executable.is_some() {
                libc::posix_spawn(
                    &mut pid,
                    program.as_ptr(),
                    &**actions,
                    ptr::null(),
                    argv_ptrs.as_ptr(),
                    envp_ptrs.as_ptr(),
                )
            } else {
                libc::posix_spawnp(
                    &mut pid,
                    program.as_ptr(),
                    &**actions,
                    ptr::null(),
                    argv_ptrs.as_ptr(),
                    envp_ptrs.as_ptr(),
                )
            }
        };
        check(rc)?;

        Ok(RawProcessInfo {
            process: open_pidfd(pid),
            thread: None,
            pid: pid as u32,
        })
    }

    fn close_handle(&self, handle: RawHandle) -> io::Result<()> {
        if unsafe { libc::close(handle.as_raw() as c_int) } == -1 {
            return Err(io::Error::last_os_error());
        }
        Ok(())
    }

    fn wait(&self, pid: u32, _process: Option<RawHandle>) -> io::Result<ExitStatus> {
        let mut status: c_int = 0;
        loop {
            if unsafe { libc::waitpid(pid as libc::pid_t, &mut status, 0) } != -1 {
                break;
            }
            let err = io::Error::last_os_error();
            if err.kind() != io::ErrorKind::Interrupted {
                return Err(err);
            }
        }

        if libc::WIFEXITED(status) {
            Ok(ExitStatus::Exited(libc::WEXITSTATUS(status)))
        } else {
            Ok(ExitStatus::Signaled(libc::WTERMSIG(status)))
        }
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

/// posix_spawn reports failures as a returned errno.
fn check(rc: c_int) -> io::Result<()> {
    if rc == 0 {
        Ok(())
    } else {
        Err(io::Error::from_raw_os_error(rc))
    }
}

fn c_path(path: &Path) -> io::Result<CString> {
    Ok(CString::new(path.as_os_str().as_bytes())?)
}

fn environment() -> Vec<CString> {
    std::env::vars_os()
        .filter_map(|(key, value)| {
            let mut entry = key.into_vec();
            entry.push(b'=');
            entry.extend(value.into_vec());
            CString::new(entry).ok()
        })
        .collect()
}

fn null_terminated(strings: &[CString]) -> Vec<*mut c_char> {
    strings
        .iter()
        .map(|s| s.as_ptr() as *mut c_char)
        .chain(std::iter::once(ptr::null_mut()))
        .collect()
}

#[cfg(target_os = "linux")]
fn open_pidfd(pid: libc::pid_t) -> Option<RawHandle> {
    let fd = unsafe { libc::syscall(libc::SYS_pidfd_open, pid, 0) };
    if fd < 0 {
        tracing::debug!(pid, error = %io::Error::last_os_error(), "pidfd_open unavailable");
        return None;
    }
    Some(RawHandle::from_raw(fd as isize))
}

#[cfg(not(target_os = "linux"))]
fn open_pidfd(_pid: libc::pid_t) -> Option<RawHandle> {
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::process::handle::StartupInfo;

    #[test]
    fn empty_request_is_rejected_before_spawning() {
        let startup = StartupInfo::new();
        let request = CreateRequest {
            executable: None,
            command_line: None,
            inherit_handles: false,
            startup: &startup,
        };
        let err = NativeApi.create_process(&request).unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::InvalidInput);
    }

    #[test]
    fn inherit_has_no_stream_to_open() {
        let err = NativeApi
            .open_stream(StandardStream::Output, &Stdio::Inherit)
            .unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::InvalidInput);
    }

    #[test]
    fn close_reports_bad_descriptor() {
        let err = NativeApi.close_handle(RawHandle::from_raw(-1)).unwrap_err();
        assert_eq!(err.raw_os_error(), Some(libc::EBADF));
    }
}
