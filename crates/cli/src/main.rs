//! draftrun CLI
//!
//! Two subcommands:
//! - `draftrun [--config PATH] [--store PATH] [--json|--raw] exec <FILE|->`:
//!   run one JSON command against in-memory collaborators loaded from a
//!   fixture, print its output, then print every published event as a JSON
//!   line.
//! - `draftrun init-config [PATH]`: write the default config.
//!
//! Logs go to stderr, filtered by `RUST_LOG` (default `info`).

mod commands;
mod format;

use std::io::Read;
use std::path::Path;
use std::process;

use anyhow::{Context, Result};
use clap::ArgMatches;
use draftrun_executor::{Command, DraftrunConfig, Executor, Fixture, Services};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer};

use commands::build_cli;
use format::{format_error, format_event_line, format_output, OutputMode};

const DEFAULT_CONFIG: &str = "draftrun.toml";

fn main() {
    init_tracing();
    let matches = build_cli().get_matches();

    let exit_code = match run(&matches) {
        Ok(code) => code,
        Err(e) => {
            eprintln!("error: {:#}", e);
            2
        }
    };
    process::exit(exit_code);
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .with_filter(filter),
        )
        .init();
}

fn output_mode(matches: &ArgMatches) -> OutputMode {
    if matches.get_flag("json") {
        OutputMode::Json
    } else if matches.get_flag("raw") {
        OutputMode::Raw
    } else {
        OutputMode::Human
    }
}

fn run(matches: &ArgMatches) -> Result<i32> {
    match matches.subcommand() {
        Some(("init-config", sub)) => {
            let path = sub
                .get_one::<String>("path")
                .map(String::as_str)
                .unwrap_or(DEFAULT_CONFIG);
            DraftrunConfig::write_default_if_missing(Path::new(path))?;
            println!("{}", path);
            Ok(0)
        }
        Some(("exec", sub)) => exec(sub),
        _ => Ok(1),
    }
}

fn load_config(matches: &ArgMatches) -> Result<DraftrunConfig> {
    match matches.get_one::<String>("config") {
        Some(path) => Ok(DraftrunConfig::from_file(Path::new(path))?),
        None if Path::new(DEFAULT_CONFIG).exists() => {
            Ok(DraftrunConfig::from_file(Path::new(DEFAULT_CONFIG))?)
        }
        None => Ok(DraftrunConfig::default()),
    }
}

fn load_fixture(matches: &ArgMatches) -> Result<Fixture> {
    let Some(path) = matches.get_one::<String>("store") else {
        return Ok(Fixture::default());
    };
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read store fixture '{}'", path))?;
    let fixture = Fixture::from_json(&text)
        .with_context(|| format!("failed to parse store fixture '{}'", path))?;
    info!(
        target: "draftrun::cli",
        runs = fixture.runs.len(),
        payloads = fixture.payloads.len(),
        libraries = fixture.libraries.len(),
        "Store fixture loaded"
    );
    Ok(fixture)
}

fn read_command(source: &str) -> Result<Command> {
    let text = if source == "-" {
        let mut buf = String::new();
        std::io::stdin()
            .read_to_string(&mut buf)
            .context("failed to read command from stdin")?;
        buf
    } else {
        std::fs::read_to_string(source)
            .with_context(|| format!("failed to read command file '{}'", source))?
    };
    serde_json::from_str(&text).context("failed to parse command")
}

fn exec(matches: &ArgMatches) -> Result<i32> {
    let mode = output_mode(matches);
    let config = load_config(matches)?;
    let fixture = load_fixture(matches)?;
    let source = matches
        .get_one::<String>("file")
        .map(String::as_str)
        .unwrap_or("-");
    let cmd = read_command(source)?;

    let (services, sink) = Services::in_memory(config, fixture)?;
    let executor = Executor::new(services);

    let code = match executor.execute(cmd) {
        Ok(output) => {
            println!("{}", format_output(&output, mode));
            0
        }
        Err(e) => {
            eprintln!("{}", format_error(&e, mode));
            1
        }
    };
    for event in sink.take() {
        println!("{}", format_event_line(&event));
    }
    Ok(code)
}
