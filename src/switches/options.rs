//! Typed view of a classified command line.

use std::path::PathBuf;

use thiserror::Error;

use crate::switches::catalog::{SwitchCatalog, SwitchId};
use crate::switches::classifier::{classify, ClassifiedArg};

/// Command-line mistakes reported back to the user.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum UsageError {
    #[error("{switch}: missing required value")]
    MissingValue { switch: String },

    #[error("Unknown switch '{0}'")]
    UnknownSwitch(String),

    #[error("Unexpected argument '{0}'")]
    UnexpectedArgument(String),

    #[error("Invalid pid '{0}'")]
    InvalidPid(String),

    #[error("Nothing to record: pass --application <path> or --pid <pid>")]
    NoTarget,

    /// The single-string command line has no escape for an inner quote.
    #[error("Parameter '{0}' contains a double quote, which cannot be passed through")]
    QuotedParameter(String),

    #[error("Nowhere to record: pass --file <path> or set output.path in the config")]
    NoOutputFile,
}

/// What the user asked to record.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RecordOptions {
    pub capture_stdout: bool,
    pub capture_stderr: bool,
    pub application: Option<PathBuf>,
    pub output_file: Option<PathBuf>,
    pub pid: Option<u32>,
    /// Arguments for the child, in command-line order.
    pub parameters: Vec<String>,
}

impl RecordOptions {
    /// Classify `raw_args` and fold them into options.
    ///
    /// Returns the options together with non-fatal warnings.
    pub fn parse(
        raw_args: &[String],
        catalog: &SwitchCatalog,
    ) -> Result<(Self, Vec<String>), UsageError> {
        let classified = classify(raw_args, catalog);
        let options = Self::from_classified(&classified.args, catalog)?;
        Ok((options, classified.warnings))
    }

    /// Later occurrences of single-value switches replace earlier ones;
    /// parameters accumulate.
    pub fn from_classified(
        args: &[ClassifiedArg],
        catalog: &SwitchCatalog,
    ) -> Result<Self, UsageError> {
        let mut options = Self::default();

        for arg in args {
            let (id, values) = match arg {
                ClassifiedArg::Switch { id, values } => (*id, values),
                ClassifiedArg::Unknown(s) => return Err(UsageError::UnknownSwitch(s.clone())),
                ClassifiedArg::Positional(s) => {
                    return Err(UsageError::UnexpectedArgument(s.clone()))
                }
            };

            let single = || {
                values.first().cloned().ok_or_else(|| UsageError::MissingValue {
                    switch: catalog.get(id).long_form(),
                })
            };

            match id {
                SwitchId::Stdout => options.capture_stdout = true,
                SwitchId::Stderr => options.capture_stderr = true,
                SwitchId::Application => options.application = Some(PathBuf::from(single()?)),
                SwitchId::File => options.output_file = Some(PathBuf::from(single()?)),
                SwitchId::Pid => {
                    let raw = single()?;
                    let pid = raw
                        .parse::<u32>()
                        .map_err(|_| UsageError::InvalidPid(raw.clone()))?;
                    options.pid = Some(pid);
                }
                SwitchId::Parameters => {
                    if let Some(quoted) = values.iter().find(|v| v.contains('"')) {
                        return Err(UsageError::QuotedParameter(quoted.clone()));
                    }
                    options.parameters.extend(values.iter().cloned());
                }
            }
        }

        if options.application.is_none() && options.pid.is_none() {
            return Err(UsageError::NoTarget);
        }

        Ok(options)
    }

    /// True when at least one standard stream should be recorded.
    pub fn captures_output(&self) -> bool {
        self.capture_stdout || self.capture_stderr
    }
}
