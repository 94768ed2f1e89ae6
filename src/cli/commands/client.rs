use crate::cli::commands::{parse_bool, parse_key_values, CommandDefinition};
use crate::cli::core::{CliMode, CommandError, CommandResult, ShellContext};
use crate::cli::{io as cli_io, output};
use crate::core::services::ClientService;
use crate::domain::Client;

pub(crate) fn definitions() -> Vec<CommandDefinition> {
    vec![CommandDefinition::new(
        "client",
        "Manage clients",
        "client <add|list|show|edit|remove> [...]",
        cmd_client,
    )]
}

fn cmd_client(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let Some((subcommand, rest)) = args.split_first() else {
        return Err(CommandError::InvalidArguments(
            "usage: client <add|list|show|edit|remove>".into(),
        ));
    };
    match subcommand.to_ascii_lowercase().as_str() {
        "add" => handle_add(context, rest),
        "list" => handle_list(context),
        "show" => handle_show(context, rest),
        "edit" => handle_edit(context, rest),
        "remove" => handle_remove(context, rest),
        other => Err(CommandError::InvalidArguments(format!(
            "unknown client subcommand `{}`",
            other
        ))),
    }
}

fn apply_optional_fields(client: &mut Client, args: &[&str]) -> Result<(), CommandError> {
    let extra = parse_key_values(args)?;
    for (key, value) in extra {
        match key.as_str() {
            "email" => client.email = Some(value),
            "tax" | "tax_id" => client.tax_id = Some(value),
            "address" => client.address = Some(value),
            "notes" => client.notes = Some(value),
            "invoice" => client.requires_invoice = parse_bool(&value)?,
            other => {
                return Err(CommandError::InvalidArguments(format!(
                    "unknown client field `{}`",
                    other
                )))
            }
        }
    }
    Ok(())
}

fn handle_add(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let (name, phone, rest) = match args {
        [] if context.mode() == CliMode::Interactive => {
            let name = cli_io::prompt_text(context.theme(), "Client name")?;
            let phone = cli_io::prompt_text(context.theme(), "Phone")?;
            (name, phone, Vec::new())
        }
        [name, phone, rest @ ..] => (name.to_string(), phone.to_string(), rest.to_vec()),
        _ => {
            return Err(CommandError::InvalidArguments(
                "usage: client add <name> <phone> [email=..] [tax=..] [address=..] [invoice=yes|no] [notes=..]"
                    .into(),
            ))
        }
    };

    let mut client = Client::new(name.clone(), phone);
    apply_optional_fields(&mut client, &rest)?;

    context.with_registry_mut(|registry| {
        ClientService::add(registry, client).map_err(CommandError::from)
    })?;
    cli_io::print_success(format!("Client `{}` added.", name));
    Ok(())
}

fn handle_list(context: &mut ShellContext) -> CommandResult {
    context.with_registry(|registry| {
        let clients = ClientService::list(registry);
        if clients.is_empty() {
            cli_io::print_warning("No clients registered yet.");
            return Ok(());
        }
        let rows: Vec<Vec<String>> = clients
            .iter()
            .enumerate()
            .map(|(index, client)| {
                vec![
                    index.to_string(),
                    client.name.clone(),
                    client.phone.clone(),
                    client.email.clone().unwrap_or_default(),
                    if client.requires_invoice { "yes" } else { "no" }.to_string(),
                ]
            })
            .collect();
        output::render_table(&["#", "name", "phone", "email", "invoice"], &rows);
        Ok(())
    })
}

fn client_labels(context: &ShellContext) -> Result<Vec<String>, CommandError> {
    context.with_registry(|registry| {
        Ok(registry
            .clients
            .iter()
            .map(|client| format!("{} ({})", client.name, client.phone))
            .collect())
    })
}

fn resolve_index(
    context: &ShellContext,
    arg: Option<&str>,
    usage: &str,
    prompt: &str,
) -> Result<Option<usize>, CommandError> {
    let labels = client_labels(context)?;
    context.index_from_arg(arg, labels, usage, prompt)
}

fn handle_show(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let Some(index) = resolve_index(
        context,
        args.first().copied(),
        "usage: client show <index>",
        "Select a client",
    )?
    else {
        return Ok(());
    };
    context.with_registry(|registry| {
        let client = registry.clients.get(index).ok_or_else(|| {
            CommandError::InvalidArguments("client index out of range".into())
        })?;
        output::section(&client.name);
        cli_io::print_info(format!("Phone: {}", client.phone));
        if let Some(tax_id) = &client.tax_id {
            cli_io::print_info(format!("Tax id: {}", tax_id));
        }
        if let Some(email) = &client.email {
            cli_io::print_info(format!("Email: {}", email));
        }
        if let Some(address) = &client.address {
            cli_io::print_info(format!("Address: {}", address));
        }
        cli_io::print_info(format!(
            "Requires invoice: {}",
            if client.requires_invoice { "yes" } else { "no" }
        ));
        if let Some(notes) = &client.notes {
            cli_io::print_info(format!("Notes: {}", notes));
        }
        let open_rentals = registry
            .active_rentals()
            .filter(|rental| rental.client_id == client.id)
            .count();
        cli_io::print_info(format!("Active rentals: {}", open_rentals));
        Ok(())
    })
}

fn handle_edit(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let Some((index_arg, rest)) = args.split_first() else {
        return Err(CommandError::InvalidArguments(
            "usage: client edit <index> [name=..] [phone=..] [email=..] [tax=..] [address=..] [invoice=yes|no] [notes=..]"
                .into(),
        ));
    };
    let index: usize = index_arg.parse().map_err(|_| {
        CommandError::InvalidArguments("client index must be numeric".into())
    })?;
    let extra = parse_key_values(rest)?;

    let name = context.with_registry_mut(|registry| {
        let current = registry
            .clients
            .get(index)
            .ok_or_else(|| CommandError::InvalidArguments("client index out of range".into()))?
            .clone();
        let mut changes = current.clone();
        for (key, value) in extra {
            match key.as_str() {
                "name" => changes.name = value,
                "phone" => changes.phone = value,
                "email" => changes.email = Some(value),
                "tax" | "tax_id" => changes.tax_id = Some(value),
                "address" => changes.address = Some(value),
                "notes" => changes.notes = Some(value),
                "invoice" => changes.requires_invoice = parse_bool(&value)?,
                other => {
                    return Err(CommandError::InvalidArguments(format!(
                        "unknown client field `{}`",
                        other
                    )))
                }
            }
        }
        let name = changes.name.clone();
        ClientService::edit(registry, current.id, changes).map_err(CommandError::from)?;
        Ok(name)
    })?;
    cli_io::print_success(format!("Client `{}` updated.", name));
    Ok(())
}

fn handle_remove(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let Some(index) = resolve_index(
        context,
        args.first().copied(),
        "usage: client remove <index>",
        "Select a client to remove",
    )?
    else {
        return Ok(());
    };

    let (client_id, name) = context.with_registry(|registry| {
        let client = registry.clients.get(index).ok_or_else(|| {
            CommandError::InvalidArguments("client index out of range".into())
        })?;
        Ok((client.id, client.name.clone()))
    })?;

    if context.mode() == CliMode::Interactive {
        let confirm =
            cli_io::confirm_action(context.theme(), &format!("Remove client `{}`?", name), false)?;
        if !confirm {
            cli_io::print_info("Operation cancelled.");
            return Ok(());
        }
    }

    context.with_registry_mut(|registry| {
        ClientService::remove(registry, client_id).map_err(CommandError::from)
    })?;
    cli_io::print_success(format!("Client `{}` removed.", name));
    Ok(())
}
