use anyhow::Result;

use crate::cli::{parse_cli_args, usage_text, version_text, CliCommand};
use crate::command_handlers::{
    handle_links, handle_resolve, handle_seed, handle_simulate, handle_stats, handle_threats,
    handle_track_click,
};

/// Run the app by parsing CLI-style args and dispatching the command.
pub fn run<I, S>(args: I) -> Result<()>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let command = parse_cli_args(args)?;
    execute_command(command)
}

/// Execute a pre-parsed command. This is reusable for non-CLI entrypoints.
pub fn execute_command(command: CliCommand) -> Result<()> {
    match command {
        CliCommand::Help => {
            println!("{}", usage_text());
            Ok(())
        }
        CliCommand::Version => {
            println!("{}", version_text());
            Ok(())
        }
        CliCommand::Seed => handle_seed(),
        CliCommand::Simulate { count } => handle_simulate(count),
        CliCommand::Threats {
            page,
            page_size,
            severity,
            status,
        } => handle_threats(page, page_size, severity, status),
        CliCommand::Stats => handle_stats(),
        CliCommand::Links => handle_links(),
        CliCommand::TrackClick { id } => handle_track_click(id),
        CliCommand::Resolve {
            id,
            status,
            expected_version,
        } => handle_resolve(id, status, expected_version),
    }
}
