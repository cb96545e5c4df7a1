//! Command-line switch handling.
//!
//! ```text
//! raw tokens → classify (catalog patterns) → ClassifiedArg → RecordOptions
//! ```

mod catalog;
mod classifier;
mod options;
mod pattern;

pub use catalog::{SwitchArity, SwitchCatalog, SwitchDescriptor, SwitchId};
pub use classifier::{classify, ClassifiedArg, ClassifyResult};
pub use options::{RecordOptions, UsageError};
pub use pattern::{SwitchError, SwitchPattern};
