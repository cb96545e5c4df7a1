//! Launch a child process and record its standard streams.
//!
//! Two layers make up the crate:
//!
//! ```text
//! raw args → SwitchCatalog/classify → RecordOptions → ProcessBuilder → Process
//! ```
//!
//! [`switches`] recognizes the command-line switches, [`process`] builds the
//! child and owns the OS handles produced by launching it.

pub mod config;
pub mod logging;
pub mod process;
pub mod switches;
