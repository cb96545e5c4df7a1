//! Platform implementations of [`ProcessApi`].

use std::sync::Arc;

use crate::process::api::ProcessApi;

#[cfg(unix)]
mod unix;
#[cfg(unix)]
pub use self::unix::NativeApi;

#[cfg(windows)]
mod win32;
#[cfg(windows)]
pub use self::win32::NativeApi;

/// The process API for the platform this binary was built for.
pub fn native_api() -> Arc<dyn ProcessApi> {
    Arc::new(NativeApi)
}
