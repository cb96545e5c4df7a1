//! Compiled matcher for a single switch.

use regex::{Regex, RegexBuilder};
use thiserror::Error;

const LONG_NAME: &str = "<longname>";
const SHORT_NAME: &str = "<shortname>";

/// Flag switch: `--name`, or a short cluster containing the letter anywhere.
const NO_ARGS_TEMPLATE: &str = r"^(?:--<longname>|-[a-z]*<shortname>[a-z]*)$";

/// Value-taking switch: the short letter must close its cluster.
const ARGS_TEMPLATE: &str = r"^(?:--<longname>|-[a-z]*<shortname>)$";

/// Errors raised while building the switch table.
///
/// These only happen at startup; a built pattern never fails to match.
#[derive(Debug, Error)]
pub enum SwitchError {
    #[error("Invalid long switch name '{name}': {reason}")]
    InvalidLongName { name: String, reason: &'static str },

    #[error("Invalid short switch name '{name}': {reason}")]
    InvalidShortName { name: String, reason: &'static str },

    #[error("Failed to compile pattern for switch '--{long_name}': {source}")]
    Pattern {
        long_name: String,
        #[source]
        source: regex::Error,
    },
}

/// Case-insensitive whole-token matcher for one switch.
#[derive(Debug, Clone)]
pub struct SwitchPattern {
    regex: Regex,
}

impl SwitchPattern {
    pub fn new(
        long_name: &str,
        short_name: &str,
        has_parameters: bool,
    ) -> Result<Self, SwitchError> {
        validate_long_name(long_name)?;
        validate_short_name(short_name)?;

        let template = if has_parameters {
            ARGS_TEMPLATE
        } else {
            NO_ARGS_TEMPLATE
        };
        let source = template
            .replace(LONG_NAME, &regex::escape(long_name))
            .replace(SHORT_NAME, &regex::escape(short_name));

        let regex = RegexBuilder::new(&source)
            .case_insensitive(true)
            .build()
            .map_err(|source| SwitchError::Pattern {
                long_name: long_name.to_string(),
                source,
            })?;

        Ok(Self { regex })
    }

    /// Does `token` select this switch?
    pub fn is_match(&self, token: &str) -> bool {
        self.regex.is_match(token)
    }

    /// Source text of the compiled pattern.
    pub fn as_str(&self) -> &str {
        self.regex.as_str()
    }
}

fn validate_long_name(name: &str) -> Result<(), SwitchError> {
    if name.is_empty() {
        return Err(SwitchError::InvalidLongName {
            name: name.to_string(),
            reason: "must not be empty",
        });
    }
    if name.starts_with('-') {
        return Err(SwitchError::InvalidLongName {
            name: name.to_string(),
            reason: "must not include the leading dashes",
        });
    }
    Ok(())
}

fn validate_short_name(name: &str) -> Result<(), SwitchError> {
    let mut chars = name.chars();
    match (chars.next(), chars.next()) {
        (Some(c), None) if c.is_ascii_alphabetic() => Ok(()),
        _ => Err(SwitchError::InvalidShortName {
            name: name.to_string(),
            reason: "must be a single ASCII letter",
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn long_form_matches_exactly() {
        for has_parameters in [false, true] {
            let pattern = SwitchPattern::new("stdout", "o", has_parameters).unwrap();
            assert!(pattern.is_match("--stdout"));
            assert!(!pattern.is_match("--stdoutx"));
            assert!(!pattern.is_match("x--stdout"));
            assert!(!pattern.is_match("--std"));
        }
    }

    #[test]
    fn matching_ignores_case() {
        let pattern = SwitchPattern::new("stderr", "e", false).unwrap();
        assert!(pattern.is_match("--STDERR"));
        assert!(pattern.is_match("-E"));
        assert!(pattern.is_match("-oE"));
    }

    #[test]
    fn regex_metacharacters_in_names_are_literal() {
        let pattern = SwitchPattern::new("a.b", "x", false).unwrap();
        assert!(pattern.is_match("--a.b"));
        assert!(!pattern.is_match("--azb"));
    }

    #[test]
    fn rejects_empty_long_name() {
        let err = SwitchPattern::new("", "o", false).unwrap_err();
        assert!(matches!(err, SwitchError::InvalidLongName { .. }));
    }

    #[test]
    fn rejects_multi_letter_short_name() {
        let err = SwitchPattern::new("stdout", "oo", false).unwrap_err();
        assert!(matches!(err, SwitchError::InvalidShortName { .. }));

        let err = SwitchPattern::new("stdout", "", true).unwrap_err();
        assert!(matches!(err, SwitchError::InvalidShortName { .. }));
    }

    #[test]
    fn source_text_names_the_switch() {
        let pattern = SwitchPattern::new("file", "f", true).unwrap();
        assert_eq!(pattern.as_str(), r"^(?:--file|-[a-z]*f)$");
    }
}
