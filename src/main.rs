use std::fs::File;
use std::path::Path;

use anyhow::{bail, Context, Result};

use stdio_recorder::config::Config;
use stdio_recorder::logging::init_tracing;
use stdio_recorder::process::{ExitStatus, ProcessBuilder, Stdio};
use stdio_recorder::switches::{RecordOptions, SwitchCatalog, UsageError};

/// Exit code for command-line mistakes.
const EXIT_USAGE: i32 = 2;
/// Exit code when the child could not be launched or waited on.
const EXIT_FAILURE: i32 = 1;

fn main() {
    let args: Vec<String> = std::env::args().skip(1).collect();

    if let None | Some("--help" | "-h") = args.first().map(String::as_str) {
        std::process::exit(print_help());
    }

    let code = match run(&args) {
        Ok(code) => code,
        Err(err) => {
            eprintln!("Error: {err:#}");
            if err.is::<UsageError>() {
                eprintln!("Run with --help to list the available switches.");
                EXIT_USAGE
            } else {
                EXIT_FAILURE
            }
        }
    };
    std::process::exit(code);
}

fn print_help() -> i32 {
    match SwitchCatalog::shared() {
        Ok(catalog) => {
            println!("Usage: stdio-recorder [switches]");
            println!();
            println!("{}", catalog.help_text());
            0
        }
        Err(err) => {
            eprintln!("Error: {err}");
            EXIT_FAILURE
        }
    }
}

fn run(args: &[String]) -> Result<i32> {
    let config = Config::load()
        .with_context(|| format!("Failed to load {}", Config::config_path().display()))?;
    init_tracing(&config.logging.filter);

    let catalog = SwitchCatalog::shared().context("Failed to build the switch table")?;
    let (options, warnings) = RecordOptions::parse(args, catalog)?;
    for warning in &warnings {
        eprintln!("Warning: {warning}");
    }
    tracing::debug!(?options, "Parsed command line");

    let Some(application) = options.application.as_deref() else {
        bail!("Attaching to a running process (--pid) is not supported; pass --application");
    };
    if options.pid.is_some() {
        eprintln!("Warning: --pid is ignored when --application is given");
    }

    let mut builder = ProcessBuilder::new().executable(application)?;
    for parameter in &options.parameters {
        builder = builder.add_argument(parameter)?;
    }
    let builder = redirect_output(builder, &options, &config)?;

    let mut process = builder
        .start()
        .with_context(|| format!("Failed to launch '{}'", application.display()))?;
    let status = process.wait()?;
    tracing::info!(pid = process.id(), ?status, "Child exited");

    Ok(exit_code(status))
}

/// Point the recorded streams at the output file.
///
/// `--file` without `-o`/`-e` records stdout.
fn redirect_output(
    builder: ProcessBuilder,
    options: &RecordOptions,
    config: &Config,
) -> Result<ProcessBuilder> {
    let (stdout, stderr) = match (options.captures_output(), &options.output_file) {
        (true, _) => (options.capture_stdout, options.capture_stderr),
        (false, Some(_)) => (true, false),
        (false, None) => return Ok(builder),
    };

    let path = options
        .output_file
        .as_deref()
        .or(config.output.path.as_deref())
        .ok_or(UsageError::NoOutputFile)?;
    if !config.output.append {
        truncate(path)?;
    }

    // Both streams append so they interleave instead of overwriting each other.
    let mut builder = builder;
    if stdout {
        builder = builder.stdout(Stdio::append(path));
    }
    if stderr {
        builder = builder.stderr(Stdio::append(path));
    }
    Ok(builder)
}

fn truncate(path: &Path) -> Result<()> {
    File::create(path).with_context(|| format!("Failed to create '{}'", path.display()))?;
    Ok(())
}

fn exit_code(status: ExitStatus) -> i32 {
    match status {
        ExitStatus::Exited(code) => code,
        ExitStatus::Signaled(signal) => 128 + signal,
    }
}
