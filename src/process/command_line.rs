//! Quoting for the single-string command line.

use crate::process::error::LaunchError;

const QUOTE: char = '"';

/// Wrap `argument` in double quotes unless it already starts/ends with one.
///
/// Embedded quotes and backslashes are left untouched, so callers must not
/// pass a token containing an unescaped inner quote.
pub fn sanitize_argument(argument: &str) -> Result<String, LaunchError> {
    if argument.is_empty() {
        return Err(LaunchError::EmptyArgument);
    }

    let mut buffer = String::with_capacity(argument.len() + 2);
    if !argument.starts_with(QUOTE) {
        buffer.push(QUOTE);
    }
    buffer.push_str(argument);
    if !argument.ends_with(QUOTE) {
        buffer.push(QUOTE);
    }
    Ok(buffer)
}

/// Split a command line into argv, honouring the quoting above.
///
/// Whitespace separates tokens outside quotes; quote characters toggle
/// quoting and are dropped. `""` yields an empty token.
pub fn split_command_line(line: &str) -> Vec<String> {
    let mut args = Vec::new();
    let mut current = String::new();
    let mut in_token = false;
    let mut quoted = false;

    for ch in line.chars() {
        match ch {
            QUOTE => {
                quoted = !quoted;
                in_token = true;
            }
            c if c.is_whitespace() && !quoted => {
                if in_token {
                    args.push(std::mem::take(&mut current));
                    in_token = false;
                }
            }
            c => {
                current.push(c);
                in_token = true;
            }
        }
    }
    if in_token {
        args.push(current);
    }
    args
}
