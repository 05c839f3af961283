use clap::Parser;
use spindle_rust::cli::commands;
use spindle_rust::cli::{Cli, Commands};
use spindle_rust::config;
use spindle_rust::logging::init_logging;
use spindle_rust::{SpindleError, StructuredError};
use std::io::{self, IsTerminal};

fn main() {
    let cli = Cli::parse();

    if let Err(e) = init_logging(cli.verbose, cli.quiet) {
        eprintln!("Failed to initialize logging: {e}");
        // Continue without logging rather than refuse to run
    }

    let overrides = build_cli_overrides(&cli);

    let result = match cli.command {
        Commands::Init { force } => commands::init::execute(force, None),
        Commands::User { command } => commands::user::execute(&command, cli.json, &overrides),
        Commands::Project { command } => commands::project::execute(&command, cli.json, &overrides),
        Commands::Create(args) => commands::create::execute(&args, cli.json, &overrides),
        Commands::Update(args) => commands::update::execute(&args, cli.json, &overrides),
        Commands::List(args) => commands::list::execute(&args, cli.json, &overrides),
        Commands::Show { refs } => commands::show::execute(&refs, cli.json, &overrides),
        Commands::Reorder(args) => commands::reorder::execute(&args, cli.json, &overrides),
        Commands::History { issue } => commands::history::execute(&issue, cli.json, &overrides),
        Commands::Comment { command } => commands::comment::execute(&command, cli.json, &overrides),
        Commands::Version => commands::version::execute(cli.json),
    };

    if let Err(e) = result {
        handle_error(&e, cli.json, cli.no_color);
    }
}

/// Handle errors with structured output support.
///
/// When --json is set or stdout is not a TTY, outputs structured JSON to
/// stderr. Otherwise, outputs human-readable error with optional color.
fn handle_error(err: &SpindleError, json_mode: bool, no_color: bool) -> ! {
    let structured = StructuredError::from_error(err);
    let exit_code = structured.code.exit_code();

    let use_json = json_mode || !io::stdout().is_terminal();

    if use_json {
        let json = structured.to_json();
        eprintln!(
            "{}",
            serde_json::to_string_pretty(&json).unwrap_or_else(|_| json.to_string())
        );
    } else {
        let use_color = !no_color && io::stderr().is_terminal();
        eprintln!("{}", structured.to_human(use_color));
    }

    std::process::exit(exit_code);
}

fn build_cli_overrides(cli: &Cli) -> config::CliOverrides {
    config::CliOverrides {
        db: cli.db.clone(),
        actor: cli.actor.clone(),
        json: Some(cli.json),
        lock_timeout: cli.lock_timeout,
    }
}
