//! Switch catalog — single source of truth for all switches.

use std::sync::OnceLock;

use crate::switches::pattern::{SwitchError, SwitchPattern};

static SHARED: OnceLock<SwitchCatalog> = OnceLock::new();

/// Identifies one entry of the catalog.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SwitchId {
    Stdout,
    Stderr,
    Application,
    File,
    Pid,
    Parameters,
}

/// How many tokens a switch consumes after itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SwitchArity {
    /// Plain flag (e.g., --stdout).
    None,
    /// Exactly one value (e.g., --file <PATH>).
    One,
    /// Every following token up to the next recognized switch.
    Unbounded,
}

impl SwitchArity {
    pub fn takes_values(self) -> bool {
        !matches!(self, SwitchArity::None)
    }
}

/// A single switch definition.
#[derive(Debug, Clone)]
pub struct SwitchDescriptor {
    pub id: SwitchId,
    /// Name used in messages (e.g., "output file").
    pub friendly_name: &'static str,
    /// Long form without dashes (e.g., "file").
    pub long: &'static str,
    /// Short letter (e.g., 'f').
    pub short: char,
    /// Two-column help line: switch forms, then description.
    pub help: &'static str,
    pub pattern: SwitchPattern,
    pub arity: SwitchArity,
}

impl SwitchDescriptor {
    pub fn matches(&self, token: &str) -> bool {
        self.pattern.is_match(token)
    }

    /// Canonical spelling used in diagnostics (e.g., "--file").
    pub fn long_form(&self) -> String {
        format!("--{}", self.long)
    }
}

struct SwitchSpec {
    id: SwitchId,
    friendly_name: &'static str,
    long: &'static str,
    short: char,
    arity: SwitchArity,
    help: &'static str,
}

const SWITCHES: [SwitchSpec; 6] = [
    SwitchSpec {
        id: SwitchId::Stdout,
        friendly_name: "stdout",
        long: "stdout",
        short: 'o',
        arity: SwitchArity::None,
        help: "--stdout, -o\t\trecord stdout of child application",
    },
    SwitchSpec {
        id: SwitchId::Stderr,
        friendly_name: "stderr",
        long: "stderr",
        short: 'e',
        arity: SwitchArity::None,
        help: "--stderr, -e\t\trecord stderr of child application",
    },
    SwitchSpec {
        id: SwitchId::Application,
        friendly_name: "application",
        long: "application",
        short: 'a',
        arity: SwitchArity::One,
        help: "--application, -a\tpath to application to run/record stdout",
    },
    SwitchSpec {
        id: SwitchId::File,
        friendly_name: "output file",
        long: "file",
        short: 'f',
        arity: SwitchArity::One,
        help: "--file, -f\t\t\tfile to record output to",
    },
    SwitchSpec {
        id: SwitchId::Pid,
        friendly_name: "application pid",
        long: "pid",
        short: 'i',
        arity: SwitchArity::One,
        help: "--pid, -i\t\t\tpid of application to record output",
    },
    SwitchSpec {
        id: SwitchId::Parameters,
        friendly_name: "parameters",
        long: "parameters",
        short: 'p',
        arity: SwitchArity::Unbounded,
        help: "--parameters, -p\tparameters to give to the application",
    },
];

/// Ordered, immutable table of supported switches.
#[derive(Debug, Clone)]
pub struct SwitchCatalog {
    descriptors: Vec<SwitchDescriptor>,
}

impl SwitchCatalog {
    /// Compile every switch pattern. Fails only on a malformed table.
    pub fn new() -> Result<Self, SwitchError> {
        let descriptors = SWITCHES
            .iter()
            .map(|spec| {
                let short = spec.short.to_string();
                let pattern = SwitchPattern::new(spec.long, &short, spec.arity.takes_values())?;
                Ok(SwitchDescriptor {
                    id: spec.id,
                    friendly_name: spec.friendly_name,
                    long: spec.long,
                    short: spec.short,
                    help: spec.help,
                    pattern,
                    arity: spec.arity,
                })
            })
            .collect::<Result<Vec<_>, SwitchError>>()?;

        Ok(Self { descriptors })
    }

    /// Process-wide catalog, compiled on first use.
    pub fn shared() -> Result<&'static SwitchCatalog, SwitchError> {
        if let Some(catalog) = SHARED.get() {
            return Ok(catalog);
        }
        let catalog = Self::new()?;
        Ok(SHARED.get_or_init(|| catalog))
    }

    pub fn iter(&self) -> impl Iterator<Item = &SwitchDescriptor> {
        self.descriptors.iter()
    }

    pub fn as_slice(&self) -> &[SwitchDescriptor] {
        &self.descriptors
    }

    pub fn get(&self, id: SwitchId) -> &SwitchDescriptor {
        // SWITCHES is declared in SwitchId order.
        &self.descriptors[id as usize]
    }

    /// First descriptor whose pattern matches `token`.
    pub fn find(&self, token: &str) -> Option<&SwitchDescriptor> {
        self.descriptors.iter().find(|d| d.matches(token))
    }

    /// Every descriptor selected by `token`, in catalog order.
    ///
    /// A short cluster like `-oe` selects more than one switch.
    pub fn matching<'a>(&'a self, token: &'a str) -> impl Iterator<Item = &'a SwitchDescriptor> {
        self.descriptors.iter().filter(move |d| d.matches(token))
    }

    pub fn is_switch(&self, token: &str) -> bool {
        self.find(token).is_some()
    }

    /// Help lines for every switch, one per line.
    pub fn help_text(&self) -> String {
        self.descriptors
            .iter()
            .map(|d| d.help)
            .collect::<Vec<_>>()
            .join("\n")
    }
}
