use crate::cli::commands::CommandDefinition;
use crate::cli::core::{CommandError, CommandResult, ShellContext};
use crate::cli::{io as cli_io, output};
use crate::registry::ALERT_WINDOW_DAYS;

pub(crate) fn definitions() -> Vec<CommandDefinition> {
    vec![CommandDefinition::new(
        "config",
        "Show or change application settings",
        "config <show|set <key> <value>|backup [note]|backups|restore <ref>>",
        cmd_config,
    )]
}

fn cmd_config(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    match args.split_first() {
        None => handle_show(context),
        Some((subcommand, rest)) => match subcommand.to_ascii_lowercase().as_str() {
            "show" => handle_show(context),
            "set" => handle_set(context, rest),
            "backup" => handle_backup(context, rest),
            "backups" => handle_backups(context),
            "restore" => handle_restore(context, rest),
            other => Err(CommandError::InvalidArguments(format!(
                "unknown config subcommand `{}`",
                other
            ))),
        },
    }
}

fn handle_show(context: &mut ShellContext) -> CommandResult {
    output::section("Configuration");
    cli_io::print_info(format!("  Locale: {}", context.config.locale));
    cli_io::print_info(format!("  Currency: {}", context.config.currency));
    cli_io::print_info(format!(
        "  Theme: {}",
        context.config.theme.as_deref().unwrap_or("default")
    ));
    cli_io::print_info(format!(
        "  Last opened registry: {}",
        context
            .config
            .last_opened_registry
            .as_deref()
            .unwrap_or("(none)")
    ));
    cli_io::print_info(format!(
        "  Alert window: {} days{}",
        context.alert_window(),
        if context.config.alert_window_days.is_none() {
            " (default)"
        } else {
            ""
        }
    ));
    Ok(())
}

fn handle_set(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let (key, value) = match args {
        [key, value] => (*key, *value),
        _ => {
            return Err(CommandError::InvalidArguments(
                "usage: config set <key> <value>".into(),
            ))
        }
    };
    match key.to_lowercase().as_str() {
        "locale" => context.config.locale = value.to_string(),
        "currency" => context.config.currency = value.to_string(),
        "theme" => {
            if value.eq_ignore_ascii_case("none") || value.is_empty() {
                context.config.theme = None;
            } else {
                context.config.theme = Some(value.to_string());
            }
        }
        "last_opened_registry" => {
            if value.eq_ignore_ascii_case("none") || value.is_empty() {
                context.config.last_opened_registry = None;
            } else {
                context.config.last_opened_registry = Some(value.to_string());
            }
        }
        "alert_window_days" => {
            if value.eq_ignore_ascii_case("default") || value.is_empty() {
                context.config.alert_window_days = None;
            } else {
                let parsed: i64 = value.parse().map_err(|_| {
                    CommandError::InvalidArguments("alert_window_days must be numeric".into())
                })?;
                if !(0..=60).contains(&parsed) {
                    return Err(CommandError::InvalidArguments(
                        "alert_window_days must be between 0 and 60".into(),
                    ));
                }
                context.config.alert_window_days = Some(parsed);
            }
        }
        other => {
            return Err(CommandError::InvalidArguments(format!(
                "unknown config key `{}`",
                other
            )))
        }
    }
    context.persist_config()?;
    cli_io::print_success("Configuration updated.");
    if key.eq_ignore_ascii_case("alert_window_days") {
        cli_io::print_info(format!(
            "Near-due alerts now fire within {} days of the end date.",
            context
                .config
                .alert_window_days
                .unwrap_or(ALERT_WINDOW_DAYS)
        ));
    }
    Ok(())
}

fn handle_backup(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let note = args.first().map(|value| value.to_string());
    let file_name = context
        .config_manager
        .backup(&context.config, note.as_deref())?;
    cli_io::print_success(format!("Configuration backup saved: {}", file_name));
    Ok(())
}

fn handle_backups(context: &mut ShellContext) -> CommandResult {
    let backups = context.config_manager.list_backups()?;
    if backups.is_empty() {
        cli_io::print_warning("No configuration backups found.");
        return Ok(());
    }
    cli_io::print_info("Available configuration backups:");
    for (index, name) in backups.iter().enumerate() {
        cli_io::print_info(format!("  {:>2}. {}", index + 1, name));
    }
    Ok(())
}

fn handle_restore(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let Some(reference) = args.first() else {
        return Err(CommandError::InvalidArguments(
            "usage: config restore <backup-name-or-number>".into(),
        ));
    };
    let backups = context.config_manager.list_backups()?;
    if backups.is_empty() {
        return Err(CommandError::InvalidArguments(
            "no configuration backups available".into(),
        ));
    }
    let target = if let Ok(number) = reference.parse::<usize>() {
        backups
            .get(number.saturating_sub(1))
            .ok_or_else(|| {
                CommandError::InvalidArguments(format!(
                    "configuration backup number {} out of range",
                    reference
                ))
            })?
            .clone()
    } else {
        backups
            .iter()
            .find(|candidate| candidate.contains(reference))
            .cloned()
            .ok_or_else(|| {
                CommandError::InvalidArguments(format!(
                    "no configuration backup matches reference `{}`",
                    reference
                ))
            })?
    };

    let restored = context.config_manager.restore(&target)?;
    context.config = restored;
    context.persist_config()?;
    cli_io::print_success(format!("Configuration restored from `{}`.", target));
    Ok(())
}
