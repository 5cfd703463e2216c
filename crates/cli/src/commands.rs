//! Clap command tree definition.

use clap::{Arg, ArgAction, Command};

/// Build the complete CLI command tree.
pub fn build_cli() -> Command {
    Command::new("draftrun")
        .about("Draft workflow-run resolution and payload merging")
        .version(env!("CARGO_PKG_VERSION"))
        .subcommand_required(true)
        .arg_required_else_help(true)
        .arg(
            Arg::new("config")
                .long("config")
                .help("Config file (default: ./draftrun.toml if present)")
                .global(true),
        )
        .arg(
            Arg::new("store")
                .long("store")
                .help("JSON fixture with runs, payloads, files and libraries")
                .global(true),
        )
        .arg(
            Arg::new("json")
                .long("json")
                .help("JSON output mode")
                .action(ArgAction::SetTrue)
                .conflicts_with("raw")
                .global(true),
        )
        .arg(
            Arg::new("raw")
                .long("raw")
                .help("Single-line JSON output mode")
                .action(ArgAction::SetTrue)
                .global(true),
        )
        .subcommand(
            Command::new("exec")
                .about("Execute one JSON command and print its output and published events")
                .arg(
                    Arg::new("file")
                        .help("File holding the command, or - for stdin")
                        .default_value("-"),
                ),
        )
        .subcommand(
            Command::new("init-config")
                .about("Write the default config file if it does not exist")
                .arg(
                    Arg::new("path")
                        .help("Destination (default: draftrun.toml)")
                        .default_value("draftrun.toml"),
                ),
        )
}
