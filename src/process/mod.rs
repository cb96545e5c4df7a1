//! Child process launching.
//!
//! [`ProcessBuilder`] collects the executable, the command line and the
//! stream redirections, then asks a [`ProcessApi`] to create the child.
//! The resulting [`Process`] owns every handle the launch produced and
//! closes each one exactly once.

mod api;
mod builder;
mod command_line;
mod error;
mod handle;
mod sys;

pub use api::{CreateRequest, ProcessApi, RawProcessInfo, StandardStream, Stdio};
pub use builder::ProcessBuilder;
pub use command_line::{sanitize_argument, split_command_line};
pub use error::LaunchError;
pub use handle::{ExitStatus, OwnedHandle, Process, ProcessInfo, RawHandle, StartupInfo};
pub use sys::{native_api, NativeApi};
