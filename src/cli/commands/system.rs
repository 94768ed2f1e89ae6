use crate::cli::commands::CommandDefinition;
use crate::cli::core::{CommandError, CommandResult, ShellContext};
use crate::cli::{io as cli_io, output};
use crate::core::build_info;

pub(crate) fn definitions() -> Vec<CommandDefinition> {
    vec![
        CommandDefinition::new(
            "help",
            "List commands or show usage of one command",
            "help [command]",
            cmd_help,
        ),
        CommandDefinition::new(
            "about",
            "Show version and build metadata",
            "about",
            cmd_about,
        ),
        CommandDefinition::new("exit", "Leave the shell", "exit", cmd_exit),
        CommandDefinition::new("quit", "Leave the shell", "quit", cmd_exit),
    ]
}

fn cmd_help(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    if let Some(name) = args.first() {
        let entry = context.command(&name.to_ascii_lowercase()).ok_or_else(|| {
            CommandError::InvalidArguments(format!("unknown command `{name}`"))
        })?;
        cli_io::print_info(format!("{}: {}", entry.name, entry.description));
        cli_io::print_info(format!("usage: {}", entry.usage));
        return Ok(());
    }

    output::section("Commands");
    let rows: Vec<Vec<String>> = context
        .command_list()
        .iter()
        .map(|entry| vec![entry.name.to_string(), entry.description.to_string()])
        .collect();
    output::render_table(&["command", "description"], &rows);
    Ok(())
}

fn cmd_about(_context: &mut ShellContext, _args: &[&str]) -> CommandResult {
    let build = build_info::current();
    output::section("Rental Core");
    cli_io::print_info(format!("Version: {}", build.version));
    cli_io::print_info(format!(
        "Build: {} ({}) at {}",
        build.git_hash, build.git_status, build.timestamp
    ));
    cli_io::print_info(format!("Target: {} [{}]", build.target, build.profile));
    cli_io::print_info(format!("Toolchain: {}", build.rustc));
    Ok(())
}

fn cmd_exit(_context: &mut ShellContext, _args: &[&str]) -> CommandResult {
    Err(CommandError::ExitRequested)
}
