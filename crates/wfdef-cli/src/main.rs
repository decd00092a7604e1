use std::path::PathBuf;
use std::process::ExitCode;

use clap::{value_parser, Arg, ArgAction, Command};
use tracing::error;
use tracing_subscriber::EnvFilter;
use wfdef_cli::{exit_code, inspect, render_json, render_text, InspectOptions, EXIT_FAILED};

fn cli() -> Command {
    Command::new("wfdef")
        .version(wfdef_model::VERSION)
        .about("Inspect persisted workflow definitions")
        .subcommand_required(true)
        .arg_required_else_help(true)
        .subcommand(
            Command::new("inspect")
                .about("Load a workflow file and report load exceptions")
                .arg(
                    Arg::new("file")
                        .required(true)
                        .value_parser(value_parser!(PathBuf))
                        .help("Workflow settings file (.json, .yaml, .yml)"),
                )
                .arg(
                    Arg::new("strict")
                        .long("strict")
                        .action(ArgAction::SetTrue)
                        .help("Fail when a required field has no value"),
                )
                .arg(
                    Arg::new("json")
                        .long("json")
                        .action(ArgAction::SetTrue)
                        .help("Output as JSON"),
                )
                .arg(
                    Arg::new("config")
                        .long("config")
                        .value_parser(value_parser!(PathBuf))
                        .help("Settings file with a 'load' section"),
                )
                .arg(
                    Arg::new("report-limit")
                        .long("report-limit")
                        .value_parser(value_parser!(usize))
                        .help("Maximum exceptions to list (0 for all)"),
                ),
        )
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let matches = cli().get_matches();
    let Some(("inspect", args)) = matches.subcommand() else {
        return ExitCode::from(EXIT_FAILED);
    };
    let Some(file) = args.get_one::<PathBuf>("file").cloned() else {
        return ExitCode::from(EXIT_FAILED);
    };
    let options = InspectOptions {
        file,
        config: args.get_one::<PathBuf>("config").cloned(),
        strict: args.get_flag("strict"),
        report_limit: args.get_one::<usize>("report-limit").copied(),
    };

    let report = match inspect(&options) {
        Ok(report) => report,
        Err(e) => {
            error!("{e:#}");
            eprintln!("error: {e:#}");
            return ExitCode::from(EXIT_FAILED);
        }
    };

    if args.get_flag("json") {
        match render_json(&report) {
            Ok(json) => println!("{json}"),
            Err(e) => {
                eprintln!("error: {e:#}");
                return ExitCode::from(EXIT_FAILED);
            }
        }
    } else {
        print!("{}", render_text(&report));
    }
    ExitCode::from(exit_code(&report))
}
