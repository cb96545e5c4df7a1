//! Switch classifier — raw tokens → classified switches.

use crate::switches::catalog::{SwitchArity, SwitchCatalog, SwitchDescriptor, SwitchId};

/// A classified token (or switch with the tokens it consumed).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClassifiedArg {
    /// Recognized switch with the values it consumed.
    Switch { id: SwitchId, values: Vec<String> },
    /// Looks like a switch but matches nothing in the catalog.
    Unknown(String),
    /// Not a switch and not consumed by one.
    Positional(String),
}

/// Result of classifying raw arguments.
#[derive(Debug, Clone)]
pub struct ClassifyResult {
    /// Classified arguments in order.
    pub args: Vec<ClassifiedArg>,
    /// Warnings produced during classification (e.g., missing values).
    pub warnings: Vec<String>,
}

/// Classify raw args against the catalog.
pub fn classify(raw_args: &[String], catalog: &SwitchCatalog) -> ClassifyResult {
    let mut args = Vec::new();
    let mut warnings = Vec::new();
    let mut iter = raw_args.iter().peekable();

    while let Some(arg) = iter.next() {
        let matched: Vec<&SwitchDescriptor> = catalog.matching(arg).collect();

        if matched.is_empty() {
            if looks_like_switch(arg) {
                warnings.push(format!("{}: unknown switch", arg));
                args.push(ClassifiedArg::Unknown(arg.clone()));
            } else {
                args.push(ClassifiedArg::Positional(arg.clone()));
            }
            continue;
        }

        if !arg.starts_with("--") {
            for letter in unclaimed_letters(arg, &matched) {
                let known = catalog
                    .iter()
                    .any(|d| d.arity.takes_values() && d.short.eq_ignore_ascii_case(&letter));
                if known {
                    warnings.push(format!(
                        "{}: '{}' takes a value and must end its cluster",
                        arg, letter
                    ));
                } else {
                    warnings.push(format!("{}: unknown switch letter '{}'", arg, letter));
                }
            }
        }

        // Value-taking switches close their cluster, so at most one is last.
        for def in matched {
            let values = match def.arity {
                SwitchArity::None => Vec::new(),
                SwitchArity::One => match iter.peek() {
                    Some(next) if !catalog.is_switch(next) => {
                        iter.next().into_iter().cloned().collect()
                    }
                    Some(_) | None => {
                        warnings.push(format!("{}: missing required value", def.long_form()));
                        Vec::new()
                    }
                },
                SwitchArity::Unbounded => {
                    let mut values = Vec::new();
                    while let Some(next) = iter.next_if(|next| !catalog.is_switch(next)) {
                        values.push(next.clone());
                    }
                    values
                }
            };
            args.push(ClassifiedArg::Switch { id: def.id, values });
        }
    }

    ClassifyResult { args, warnings }
}

fn looks_like_switch(arg: &str) -> bool {
    arg.len() > 1 && arg.starts_with('-')
}

/// Letters of a short cluster that no matched switch accounts for.
fn unclaimed_letters(cluster: &str, matched: &[&SwitchDescriptor]) -> Vec<char> {
    cluster
        .chars()
        .skip(1)
        .filter(|letter| {
            !matched
                .iter()
                .any(|d| d.short.eq_ignore_ascii_case(letter))
        })
        .collect()
}
