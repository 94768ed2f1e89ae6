use crate::cli::commands::CommandDefinition;
use crate::cli::core::{CliMode, CommandError, CommandResult, ShellContext};
use crate::cli::{io as cli_io, output};
use crate::registry::Registry;
use crate::storage::StorageBackend;

pub(crate) fn definitions() -> Vec<CommandDefinition> {
    vec![CommandDefinition::new(
        "registry",
        "Manage the company registry file",
        "registry <new|load|save|list|info|backup|backups|restore> [...]",
        cmd_registry,
    )]
}

fn cmd_registry(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let Some((subcommand, rest)) = args.split_first() else {
        return Err(CommandError::InvalidArguments(
            "usage: registry <new|load|save|list|info|backup|backups|restore>".into(),
        ));
    };
    match subcommand.to_ascii_lowercase().as_str() {
        "new" => handle_new(context, rest),
        "load" => handle_load(context, rest),
        "save" => handle_save(context, rest),
        "list" => handle_list(context),
        "info" => handle_info(context),
        "backup" => handle_backup(context, rest),
        "backups" => handle_backups(context),
        "restore" => handle_restore(context, rest),
        other => Err(CommandError::InvalidArguments(format!(
            "unknown registry subcommand `{}`",
            other
        ))),
    }
}

fn handle_new(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let name = if let Some(name) = args.first() {
        name.to_string()
    } else if context.mode() == CliMode::Interactive {
        cli_io::prompt_text(context.theme(), "Company name")?
    } else {
        return Err(CommandError::InvalidArguments(
            "usage: registry new <name>".into(),
        ));
    };
    if name.trim().is_empty() {
        return Err(CommandError::InvalidArguments(
            "registry name cannot be empty".into(),
        ));
    }

    let registry = Registry::new(name.clone());
    context.manager.set_current(registry, None, Some(name.clone()));
    cli_io::print_success(format!("Registry `{}` created.", name));
    Ok(())
}

fn handle_load(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let Some(name) = args.first().copied() else {
        return Err(CommandError::InvalidArguments(
            "usage: registry load <name>".into(),
        ));
    };
    let metadata = context.manager.load(name)?;
    context.report_load(&metadata);
    cli_io::print_success(format!("Registry `{}` loaded.", name));
    context.update_last_opened(Some(name))?;
    Ok(())
}

fn handle_save(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let path = match args.first().copied() {
        Some(name) => {
            let path = context.manager.save_as(name)?;
            context.update_last_opened(Some(name))?;
            path
        }
        None => context.manager.save()?,
    };
    cli_io::print_success(format!("Registry saved to {}.", path.display()));
    Ok(())
}

fn handle_list(context: &mut ShellContext) -> CommandResult {
    let names = context.manager.storage().list_registries()?;
    if names.is_empty() {
        cli_io::print_warning("No registries saved yet.");
        return Ok(());
    }
    cli_io::print_info("Saved registries:");
    for (index, name) in names.iter().enumerate() {
        cli_io::print_info(format!("  {:>2}. {}", index + 1, name));
    }
    Ok(())
}

fn handle_info(context: &mut ShellContext) -> CommandResult {
    let name = context.registry_name();
    context.with_registry(|registry| {
        output::section(&registry.name);
        if let Some(name) = &name {
            cli_io::print_info(format!("File name: {}", name));
        }
        cli_io::print_info(format!("Clients: {}", registry.clients.len()));
        cli_io::print_info(format!("Equipment items: {}", registry.equipment.len()));
        cli_io::print_info(format!(
            "Rentals: {} ({} active)",
            registry.rental_count(),
            registry.active_rentals().count()
        ));
        cli_io::print_info(format!("Receivables: {}", registry.receivables.len()));
        cli_io::print_info(format!("Last updated: {}", registry.updated_at));
        Ok(())
    })
}

fn handle_backup(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let note = args.first().map(|value| value.to_string());
    context.manager.backup(note.as_deref())?;
    cli_io::print_success("Backup created.");
    Ok(())
}

fn handle_backups(context: &mut ShellContext) -> CommandResult {
    let name = context.registry_name().ok_or_else(|| {
        CommandError::InvalidArguments(
            "no named registry loaded; use `registry save <name>` once to bind it".into(),
        )
    })?;
    let backups = context.manager.list_backups(&name)?;
    if backups.is_empty() {
        cli_io::print_warning("No backups available.");
        return Ok(());
    }
    cli_io::print_info("Available backups:");
    for (index, backup_name) in backups.iter().enumerate() {
        cli_io::print_info(format!("  {:>2}. {}", index + 1, backup_name));
    }
    Ok(())
}

fn handle_restore(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let name = context.registry_name().ok_or_else(|| {
        CommandError::InvalidArguments(
            "no named registry loaded; use `registry load <name>` first".into(),
        )
    })?;
    let Some(reference) = args.first() else {
        return Err(CommandError::InvalidArguments(
            "usage: registry restore <backup-name-or-number>".into(),
        ));
    };

    let backups = context.manager.list_backups(&name)?;
    if backups.is_empty() {
        return Err(CommandError::InvalidArguments(
            "no backups available to restore".into(),
        ));
    }
    let target = if let Ok(number) = reference.parse::<usize>() {
        let index = number.saturating_sub(1);
        backups
            .get(index)
            .ok_or_else(|| {
                CommandError::InvalidArguments(format!("backup number {} out of range", reference))
            })?
            .clone()
    } else {
        backups
            .iter()
            .find(|candidate| candidate.contains(reference))
            .cloned()
            .ok_or_else(|| {
                CommandError::InvalidArguments(format!(
                    "no backup matches reference `{}`",
                    reference
                ))
            })?
    };

    let confirm = if context.mode() == CliMode::Interactive {
        cli_io::confirm_action(
            context.theme(),
            &format!("Restore registry `{}` from backup `{}`?", name, target),
            false,
        )?
    } else {
        true
    };
    if !confirm {
        cli_io::print_info("Operation cancelled.");
        return Ok(());
    }

    let metadata = context.manager.restore_backup(&name, &target)?;
    context.report_load(&metadata);
    cli_io::print_success(format!(
        "Registry `{}` loaded from backup `{}`.",
        name, target
    ));
    Ok(())
}
