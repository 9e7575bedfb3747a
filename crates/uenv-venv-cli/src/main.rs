use std::path::PathBuf;

use atty::Stream;
use clap::{value_parser, ArgAction, Parser};
use color_eyre::Result;
use serde_json::Value;
use uenv_venv_core::{to_json_response, CommandStatus, CreateRequest, ExecutionOutcome};

mod style;

use style::Style;

fn main() -> Result<()> {
    color_eyre::install()?;

    let cli = UenvVenvCli::parse();
    init_tracing(cli.trace, cli.verbose);

    let request = CreateRequest {
        venv_dir: cli.venv.clone(),
        python: cli.python.clone(),
        force: cli.force,
        copies: cli.copies,
    };
    let outcome =
        uenv_venv_core::execute(&request).map_err(|err| color_eyre::eyre::eyre!("{err:?}"))?;
    let code = emit_output(&cli, &outcome)?;

    if code == 0 {
        Ok(())
    } else {
        std::process::exit(code);
    }
}

fn init_tracing(trace: bool, verbose: u8) {
    let level = if trace {
        "trace"
    } else {
        match verbose {
            0 => "info",
            1 => "debug",
            _ => "trace",
        }
    };

    let filter =
        format!("uenv_venv_cli={level},uenv_venv_core={level},uenv_venv_domain={level}");
    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_level(true)
        .with_writer(std::io::stderr)
        .finish();

    let _ = tracing::subscriber::set_global_default(subscriber);
}

fn emit_output(cli: &UenvVenvCli, outcome: &ExecutionOutcome) -> Result<i32> {
    let code = exit_code(outcome);

    if cli.json {
        println!("{}", serde_json::to_string_pretty(&to_json_response(outcome))?);
        return Ok(code);
    }

    if outcome.status == CommandStatus::Ok {
        if !cli.quiet {
            println!("{}", outcome.message);
        }
    } else {
        let style = Style::new(cli.no_color, atty::is(Stream::Stderr));
        eprintln!("{}", style.error(&outcome.message));
        if let Some(hint) = hint_from_details(&outcome.details) {
            let hint_line = format!("Hint: {hint}");
            eprintln!("{}", style.hint(&hint_line));
        }
    }
    Ok(code)
}

fn exit_code(outcome: &ExecutionOutcome) -> i32 {
    match outcome.status {
        CommandStatus::Ok => 0,
        CommandStatus::UserError => 2,
        CommandStatus::Failure => outcome
            .details
            .get("exit_code")
            .and_then(Value::as_i64)
            .and_then(|code| i32::try_from(code).ok())
            .filter(|code| *code != 0)
            .unwrap_or(1),
    }
}

fn hint_from_details(details: &Value) -> Option<&str> {
    details
        .as_object()
        .and_then(|map| map.get("hint"))
        .and_then(Value::as_str)
}

#[derive(Parser, Debug)]
#[command(
    name = "uenv-venv",
    author,
    version,
    about = "Create a Python venv layered on the active uenv view",
    long_about = "Discovers the active uenv and its view, validates the seeding interpreter, \
creates a venv from it, and links the view's site-packages into the venv.",
    after_help = "Examples:\n  uenv-venv --venv ./venv\n  uenv-venv --venv ./venv --python /user-environment/env/default/bin/python\n  uenv-venv --venv ./venv --force --copies"
)]
struct UenvVenvCli {
    #[arg(
        short,
        long,
        help = "Suppress the success summary (errors still print to stderr)"
    )]
    quiet: bool,
    #[arg(short, long, action = ArgAction::Count, help = "Increase logging (-vv reaches trace)")]
    verbose: u8,
    #[arg(long, help = "Force trace logging regardless of -v/-q")]
    trace: bool,
    #[arg(long, help = "Emit a {status,message,details} JSON envelope")]
    json: bool,
    #[arg(long, help = "Disable colored output")]
    no_color: bool,
    #[arg(long, value_parser = value_parser!(PathBuf), help = "Target venv directory")]
    venv: PathBuf,
    #[arg(
        long,
        value_parser = value_parser!(PathBuf),
        help = "Python to seed the venv (must live inside the uenv mount)"
    )]
    python: Option<PathBuf>,
    #[arg(long, help = "Remove an existing venv directory first")]
    force: bool,
    #[arg(long, help = "Use file copies instead of symlinks")]
    copies: bool,
}
