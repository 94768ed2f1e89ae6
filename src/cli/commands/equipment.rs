use crate::cli::commands::{parse_decimal, parse_key_values, CommandDefinition};
use crate::cli::core::{CliMode, CommandError, CommandResult, ShellContext};
use crate::cli::{io as cli_io, output};
use crate::core::services::EquipmentService;
use crate::domain::{Equipment, Period};

pub(crate) fn definitions() -> Vec<CommandDefinition> {
    vec![CommandDefinition::new(
        "equipment",
        "Manage the equipment inventory",
        "equipment <add|list|available|show|edit|remove> [...]",
        cmd_equipment,
    )]
}

fn cmd_equipment(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let Some((subcommand, rest)) = args.split_first() else {
        return Err(CommandError::InvalidArguments(
            "usage: equipment <add|list|available|show|edit|remove>".into(),
        ));
    };
    match subcommand.to_ascii_lowercase().as_str() {
        "add" => handle_add(context, rest),
        "list" => handle_list(context),
        "available" => handle_available(context),
        "show" => handle_show(context, rest),
        "edit" => handle_edit(context, rest),
        "remove" => handle_remove(context, rest),
        other => Err(CommandError::InvalidArguments(format!(
            "unknown equipment subcommand `{}`",
            other
        ))),
    }
}

fn apply_fields(equipment: &mut Equipment, args: &[&str]) -> Result<(), CommandError> {
    let extra = parse_key_values(args)?;
    for (key, value) in extra {
        match key.as_str() {
            "name" => equipment.name = value,
            "daily" => equipment.daily_price = Some(parse_decimal(&value)?),
            "weekly" => equipment.weekly_price = Some(parse_decimal(&value)?),
            "biweekly" => equipment.biweekly_price = Some(parse_decimal(&value)?),
            "monthly" => equipment.monthly_price = Some(parse_decimal(&value)?),
            "cost" => equipment.purchase_cost = Some(parse_decimal(&value)?),
            "category" => equipment.category = Some(value),
            "tag" => equipment.asset_tags.push(value),
            "notes" => equipment.notes = Some(value),
            other => {
                return Err(CommandError::InvalidArguments(format!(
                    "unknown equipment field `{}`",
                    other
                )))
            }
        }
    }
    Ok(())
}

fn handle_add(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let (name, rest) = match args {
        [] if context.mode() == CliMode::Interactive => {
            (cli_io::prompt_text(context.theme(), "Equipment name")?, Vec::new())
        }
        [name, rest @ ..] => (name.to_string(), rest.to_vec()),
        _ => {
            return Err(CommandError::InvalidArguments(
                "usage: equipment add <name> [daily=..] [weekly=..] [biweekly=..] [monthly=..] [cost=..] [category=..] [tag=..] [notes=..]"
                    .into(),
            ))
        }
    };

    let mut equipment = Equipment::new(name.clone());
    apply_fields(&mut equipment, &rest)?;
    if !equipment.is_rentable() {
        cli_io::print_warning(
            "No period price configured; the item cannot be rented until one is set.",
        );
    }

    context.with_registry_mut(|registry| {
        EquipmentService::add(registry, equipment).map_err(CommandError::from)
    })?;
    cli_io::print_success(format!("Equipment `{}` added.", name));
    Ok(())
}

fn price_cell(context: &ShellContext, price: Option<rust_decimal::Decimal>) -> String {
    price
        .map(|value| context.format_amount(value))
        .unwrap_or_else(|| "-".into())
}

fn handle_list(context: &mut ShellContext) -> CommandResult {
    let rows = context.with_registry(|registry| {
        Ok(EquipmentService::list(registry)
            .iter()
            .enumerate()
            .map(|(index, item)| {
                vec![
                    index.to_string(),
                    item.name.clone(),
                    item.category.clone().unwrap_or_default(),
                    price_cell(context, item.daily_price),
                    price_cell(context, item.weekly_price),
                    price_cell(context, item.biweekly_price),
                    price_cell(context, item.monthly_price),
                ]
            })
            .collect::<Vec<_>>())
    })?;
    if rows.is_empty() {
        cli_io::print_warning("No equipment registered yet.");
        return Ok(());
    }
    output::render_table(
        &["#", "name", "category", "daily", "weekly", "biweekly", "monthly"],
        &rows,
    );
    Ok(())
}

fn handle_available(context: &mut ShellContext) -> CommandResult {
    let rows = context.with_registry(|registry| {
        Ok(EquipmentService::available_for_rental(registry)
            .iter()
            .map(|item| {
                let (period, price) = item
                    .first_available_price()
                    .expect("available items always carry a price");
                vec![
                    registry
                        .equipment
                        .iter()
                        .position(|candidate| candidate.id == item.id)
                        .map(|index| index.to_string())
                        .unwrap_or_default(),
                    item.name.clone(),
                    period.label().to_string(),
                    context.format_amount(price),
                ]
            })
            .collect::<Vec<_>>())
    })?;
    if rows.is_empty() {
        cli_io::print_warning("No equipment available for a new rental.");
        return Ok(());
    }
    output::render_table(&["#", "name", "suggested period", "price"], &rows);
    Ok(())
}

fn equipment_labels(context: &ShellContext) -> Result<Vec<String>, CommandError> {
    context.with_registry(|registry| {
        Ok(registry
            .equipment
            .iter()
            .map(|item| item.name.clone())
            .collect())
    })
}

fn handle_show(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let labels = equipment_labels(context)?;
    let Some(index) = context.index_from_arg(
        args.first().copied(),
        labels,
        "usage: equipment show <index>",
        "Select an equipment item",
    )?
    else {
        return Ok(());
    };
    context.with_registry(|registry| {
        let item = registry.equipment.get(index).ok_or_else(|| {
            CommandError::InvalidArguments("equipment index out of range".into())
        })?;
        output::section(&item.name);
        if let Some(category) = &item.category {
            cli_io::print_info(format!("Category: {}", category));
        }
        if !item.asset_tags.is_empty() {
            cli_io::print_info(format!("Asset tags: {}", item.asset_tags.join(", ")));
        }
        for period in Period::CANONICAL {
            if let Some(price) = item.price_for(period) {
                cli_io::print_info(format!(
                    "{} price: {}",
                    period.label(),
                    context.format_amount(price)
                ));
            }
        }
        if let Some(cost) = item.purchase_cost {
            cli_io::print_info(format!("Purchase cost: {}", context.format_amount(cost)));
        }
        if let Some(notes) = &item.notes {
            cli_io::print_info(format!("Notes: {}", notes));
        }
        let rented = crate::registry::is_rented(item.id, &registry.rentals);
        cli_io::print_info(format!(
            "Status: {}",
            if rented { "rented out" } else { "in the yard" }
        ));
        Ok(())
    })
}

fn handle_edit(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let Some((index_arg, rest)) = args.split_first() else {
        return Err(CommandError::InvalidArguments(
            "usage: equipment edit <index> [name=..] [daily=..] [weekly=..] [biweekly=..] [monthly=..] [cost=..] [category=..] [notes=..]"
                .into(),
        ));
    };
    let index: usize = index_arg.parse().map_err(|_| {
        CommandError::InvalidArguments("equipment index must be numeric".into())
    })?;
    let rest = rest.to_vec();

    let name = context.with_registry_mut(|registry| {
        let current = registry
            .equipment
            .get(index)
            .ok_or_else(|| CommandError::InvalidArguments("equipment index out of range".into()))?
            .clone();
        let mut changes = current.clone();
        apply_fields(&mut changes, &rest)?;
        let name = changes.name.clone();
        EquipmentService::edit(registry, current.id, changes).map_err(CommandError::from)?;
        Ok(name)
    })?;
    cli_io::print_success(format!("Equipment `{}` updated.", name));
    Ok(())
}

fn handle_remove(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let labels = equipment_labels(context)?;
    let Some(index) = context.index_from_arg(
        args.first().copied(),
        labels,
        "usage: equipment remove <index>",
        "Select an equipment item to remove",
    )?
    else {
        return Ok(());
    };

    let (equipment_id, name) = context.with_registry(|registry| {
        let item = registry.equipment.get(index).ok_or_else(|| {
            CommandError::InvalidArguments("equipment index out of range".into())
        })?;
        Ok((item.id, item.name.clone()))
    })?;

    if context.mode() == CliMode::Interactive {
        let confirm = cli_io::confirm_action(
            context.theme(),
            &format!("Remove equipment `{}`?", name),
            false,
        )?;
        if !confirm {
            cli_io::print_info("Operation cancelled.");
            return Ok(());
        }
    }

    context.with_registry_mut(|registry| {
        EquipmentService::remove(registry, equipment_id).map_err(CommandError::from)
    })?;
    cli_io::print_success(format!("Equipment `{}` removed.", name));
    Ok(())
}
