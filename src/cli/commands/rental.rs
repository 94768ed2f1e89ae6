use uuid::Uuid;

use crate::cli::commands::{
    parse_bool, parse_date, parse_decimal, parse_key_values, CommandDefinition,
};
use crate::cli::core::{CliMode, CommandError, CommandResult, ShellContext};
use crate::cli::{io as cli_io, output};
use crate::core::services::{RentalDraft, RentalService};
use crate::domain::{CollectionStatus, DeliveryStatus, PaymentStatus, Period};
use crate::registry::DueStatus;

pub(crate) fn definitions() -> Vec<CommandDefinition> {
    vec![CommandDefinition::new(
        "rental",
        "Manage rental contracts and their lifecycle",
        "rental <add|list|show|due|receivables|paid|schedule|delivered|collected|invoice|renew|remove> [...]",
        cmd_rental,
    )]
}

fn cmd_rental(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let Some((subcommand, rest)) = args.split_first() else {
        return Err(CommandError::InvalidArguments(
            "usage: rental <add|list|show|due|receivables|paid|schedule|delivered|collected|invoice|renew|remove>"
                .into(),
        ));
    };
    match subcommand.to_ascii_lowercase().as_str() {
        "add" => handle_add(context, rest),
        "list" => handle_list(context),
        "show" => handle_show(context, rest),
        "due" => handle_due(context),
        "receivables" => handle_receivables(context, rest),
        "paid" => handle_paid(context, rest),
        "schedule" => handle_schedule(context, rest),
        "delivered" => handle_delivered(context, rest),
        "collected" => handle_collected(context, rest),
        "invoice" => handle_invoice(context, rest),
        "renew" => handle_renew(context, rest),
        "remove" => handle_remove(context, rest),
        other => Err(CommandError::InvalidArguments(format!(
            "unknown rental subcommand `{}`",
            other
        ))),
    }
}

const ADD_USAGE: &str = "usage: rental add <client_index> <equipment_indexes> period=<daily|weekly|biweekly|monthly> [amount=..] [start=YYYY-MM-DD] [end=YYYY-MM-DD] [invoice=yes|no] [due=YYYY-MM-DD] [notes=..]";

fn handle_add(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let [client_arg, equipment_arg, rest @ ..] = args else {
        return Err(CommandError::InvalidArguments(ADD_USAGE.into()));
    };
    let client_index: usize = client_arg
        .parse()
        .map_err(|_| CommandError::InvalidArguments("client index must be numeric".into()))?;
    let equipment_indexes: Vec<usize> = equipment_arg
        .split(',')
        .map(|token| {
            token.trim().parse::<usize>().map_err(|_| {
                CommandError::InvalidArguments(
                    "equipment indexes must be numeric, comma-separated".into(),
                )
            })
        })
        .collect::<Result<_, _>>()?;
    let extra = parse_key_values(rest)?;

    let period = match extra.get("period") {
        Some(token) => Period::parse(token).ok_or_else(|| {
            CommandError::InvalidArguments(format!("`{token}` is not a rental period"))
        })?,
        None => {
            return Err(CommandError::InvalidArguments(ADD_USAGE.into()));
        }
    };
    let start_date = match extra.get("start") {
        Some(value) => parse_date(value)?,
        None => context.today(),
    };
    let expected_end_date = match extra.get("end") {
        Some(value) => parse_date(value)?,
        None => period.next_cycle_end(start_date),
    };
    let invoice_required = extra.get("invoice").map(|v| parse_bool(v)).transpose()?;
    let payment_due_date = extra.get("due").map(|v| parse_date(v)).transpose()?;
    let notes = extra.get("notes").cloned();
    let explicit_amount = extra.get("amount").map(|v| parse_decimal(v)).transpose()?;

    let (client_id, equipment_ids, amount) = context.with_registry(|registry| {
        let client = registry.clients.get(client_index).ok_or_else(|| {
            CommandError::InvalidArguments("client index out of range".into())
        })?;
        let mut equipment_ids = Vec::new();
        for index in &equipment_indexes {
            let item = registry.equipment.get(*index).ok_or_else(|| {
                CommandError::InvalidArguments(format!("equipment index {index} out of range"))
            })?;
            equipment_ids.push(item.id);
        }
        let amount = match explicit_amount {
            Some(amount) => amount,
            None => RentalService::suggested_amount(registry, &equipment_ids, period)
                .ok_or_else(|| {
                    CommandError::InvalidArguments(
                        "no amount given and the selected items carry no price for that period"
                            .into(),
                    )
                })?,
        };
        Ok((client.id, equipment_ids, amount))
    })?;

    let draft = RentalDraft {
        client_id,
        equipment_ids,
        period,
        amount,
        start_date,
        expected_end_date,
        invoice_required,
        payment_due_date,
        notes,
    };
    context.with_registry_mut(|registry| {
        RentalService::create(registry, draft).map_err(CommandError::from)
    })?;
    cli_io::print_success(format!(
        "Rental created: {} until {} for {}.",
        period.label(),
        expected_end_date,
        context.format_amount(amount)
    ));
    Ok(())
}

fn payment_cell(status: PaymentStatus) -> &'static str {
    match status {
        PaymentStatus::Pending => "pending",
        PaymentStatus::Paid => "paid",
    }
}

fn delivery_cell(status: DeliveryStatus) -> &'static str {
    match status {
        DeliveryStatus::NotScheduled => "not scheduled",
        DeliveryStatus::Scheduled => "scheduled",
        DeliveryStatus::Delivered => "delivered",
    }
}

fn collection_cell(status: CollectionStatus) -> &'static str {
    match status {
        CollectionStatus::NotCollected => "out",
        CollectionStatus::Collected => "collected",
    }
}

fn handle_list(context: &mut ShellContext) -> CommandResult {
    let today = context.today();
    let window = context.alert_window();
    let rows = context.with_registry(|registry| {
        Ok(registry
            .rentals
            .iter()
            .enumerate()
            .map(|(index, rental)| {
                let client = registry
                    .client(rental.client_id)
                    .map(|client| client.name.clone())
                    .unwrap_or_else(|| "?".into());
                let equipment = rental
                    .equipment_ids
                    .iter()
                    .filter_map(|id| registry.equipment(*id).map(|item| item.name.clone()))
                    .collect::<Vec<_>>()
                    .join(", ");
                let due = DueStatus::classify_with_window(rental, today, window);
                vec![
                    index.to_string(),
                    client,
                    equipment,
                    context.format_date(rental.expected_end_date),
                    context.format_amount(rental.amount),
                    payment_cell(rental.payment).to_string(),
                    delivery_cell(rental.delivery).to_string(),
                    collection_cell(rental.collection).to_string(),
                    format!("{:?}", rental.lifecycle),
                    due.label().to_string(),
                ]
            })
            .collect::<Vec<_>>())
    })?;
    if rows.is_empty() {
        cli_io::print_warning("No rentals registered yet.");
        return Ok(());
    }
    output::render_table(
        &[
            "#", "client", "equipment", "end", "amount", "payment", "delivery", "collection",
            "state", "due",
        ],
        &rows,
    );
    Ok(())
}

fn rental_labels(context: &ShellContext) -> Result<Vec<String>, CommandError> {
    context.with_registry(|registry| {
        Ok(registry
            .rentals
            .iter()
            .map(|rental| context.rental_label(registry, rental))
            .collect())
    })
}

fn resolve_rental(
    context: &ShellContext,
    arg: Option<&str>,
    usage: &str,
    prompt: &str,
) -> Result<Option<Uuid>, CommandError> {
    let labels = rental_labels(context)?;
    let Some(index) = context.index_from_arg(arg, labels, usage, prompt)? else {
        return Ok(None);
    };
    context.with_registry(|registry| {
        registry
            .rentals
            .get(index)
            .map(|rental| Some(rental.id))
            .ok_or_else(|| CommandError::InvalidArguments("rental index out of range".into()))
    })
}

fn handle_show(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let Some(rental_id) = resolve_rental(
        context,
        args.first().copied(),
        "usage: rental show <index>",
        "Select a rental",
    )?
    else {
        return Ok(());
    };
    let today = context.today();
    let window = context.alert_window();
    context.with_registry(|registry| {
        let rental = registry
            .rental(rental_id)
            .ok_or_else(|| CommandError::InvalidArguments("rental no longer exists".into()))?;
        let client = registry
            .client(rental.client_id)
            .map(|client| client.name.clone())
            .unwrap_or_else(|| "?".into());
        output::section(format!("Rental for {}", client));
        let equipment = rental
            .equipment_ids
            .iter()
            .filter_map(|id| registry.equipment(*id).map(|item| item.name.clone()))
            .collect::<Vec<_>>()
            .join(", ");
        cli_io::print_info(format!("Equipment: {}", equipment));
        cli_io::print_info(format!(
            "Term: {} {} -> {}",
            rental.period.label(),
            context.format_date(rental.start_date),
            context.format_date(rental.expected_end_date)
        ));
        cli_io::print_info(format!("Amount: {}", context.format_amount(rental.amount)));
        cli_io::print_info(format!("Payment: {}", payment_cell(rental.payment)));
        if let Some(due) = rental.payment_due_date {
            cli_io::print_info(format!("Payment due: {}", context.format_date(due)));
        }
        cli_io::print_info(format!("Delivery: {}", delivery_cell(rental.delivery)));
        if let Some(date) = rental.scheduled_delivery_date {
            cli_io::print_info(format!("Scheduled delivery: {}", context.format_date(date)));
        }
        cli_io::print_info(format!("Collection: {}", collection_cell(rental.collection)));
        cli_io::print_info(format!(
            "Invoice: {}{}",
            if rental.invoice_required { "required" } else { "not required" },
            if rental.invoice_issued { ", issued" } else { "" }
        ));
        cli_io::print_info(format!("State: {:?}", rental.lifecycle));
        cli_io::print_info(format!(
            "Due status: {}",
            DueStatus::classify_with_window(rental, today, window).label()
        ));
        cli_io::print_info(format!("Renewals: {}", rental.renewal_count));
        if let Some(notes) = &rental.notes {
            cli_io::print_info(format!("Notes: {}", notes));
        }
        Ok(())
    })
}

fn handle_due(context: &mut ShellContext) -> CommandResult {
    let today = context.today();
    let window = context.alert_window();
    let (overdue, near_due) = context.with_registry(|registry| {
        let mut overdue = Vec::new();
        let mut near_due = Vec::new();
        for rental in &registry.rentals {
            match DueStatus::classify_with_window(rental, today, window) {
                DueStatus::Overdue => overdue.push(context.rental_label(registry, rental)),
                DueStatus::NearDue => near_due.push(context.rental_label(registry, rental)),
                DueStatus::Normal => {}
            }
        }
        Ok((overdue, near_due))
    })?;

    if overdue.is_empty() && near_due.is_empty() {
        cli_io::print_success("No rentals are overdue or near due.");
        return Ok(());
    }
    if !overdue.is_empty() {
        output::section("Overdue");
        for label in &overdue {
            cli_io::print_warning(label);
        }
    }
    if !near_due.is_empty() {
        output::section(format!("Due within {} days", window));
        for label in &near_due {
            cli_io::print_info(label);
        }
    }
    Ok(())
}

fn handle_receivables(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let Some(rental_id) = resolve_rental(
        context,
        args.first().copied(),
        "usage: rental receivables <index>",
        "Select a rental",
    )?
    else {
        return Ok(());
    };
    let rows = context.with_registry(|registry| {
        let mut receivables = registry.receivables_for(rental_id);
        receivables.sort_by_key(|receivable| receivable.renewal_number);
        Ok(receivables
            .iter()
            .map(|receivable| {
                vec![
                    receivable.renewal_number.to_string(),
                    context.format_amount(receivable.amount),
                    context.format_date(receivable.due_date),
                    payment_cell(receivable.status).to_string(),
                ]
            })
            .collect::<Vec<_>>())
    })?;
    if rows.is_empty() {
        cli_io::print_warning("No receivables recorded for this rental.");
        return Ok(());
    }
    output::render_table(&["cycle", "amount", "due", "status"], &rows);
    Ok(())
}

fn handle_paid(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let Some(rental_id) = resolve_rental(
        context,
        args.first().copied(),
        "usage: rental paid <index>",
        "Select a rental to mark as paid",
    )?
    else {
        return Ok(());
    };
    let now = context.now();
    let updated = context.with_registry_mut(|registry| {
        RentalService::mark_paid(registry, rental_id, now).map_err(CommandError::from)
    })?;
    if updated.is_finalized() {
        cli_io::print_success("Payment recorded; rental is now finalized.");
    } else {
        cli_io::print_success("Payment recorded.");
    }
    Ok(())
}

fn handle_schedule(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let [index_arg, date_arg] = args else {
        return Err(CommandError::InvalidArguments(
            "usage: rental schedule <index> <YYYY-MM-DD>".into(),
        ));
    };
    let date = parse_date(date_arg)?;
    let Some(rental_id) = resolve_rental(
        context,
        Some(*index_arg),
        "usage: rental schedule <index> <YYYY-MM-DD>",
        "Select a rental",
    )?
    else {
        return Ok(());
    };
    context.with_registry_mut(|registry| {
        RentalService::schedule_delivery(registry, rental_id, date).map_err(CommandError::from)
    })?;
    cli_io::print_success(format!("Delivery scheduled for {}.", date));
    Ok(())
}

fn handle_delivered(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let Some(rental_id) = resolve_rental(
        context,
        args.first().copied(),
        "usage: rental delivered <index>",
        "Select a rental to mark as delivered",
    )?
    else {
        return Ok(());
    };
    let now = context.now();
    context.with_registry_mut(|registry| {
        RentalService::mark_delivered(registry, rental_id, now).map_err(CommandError::from)
    })?;
    cli_io::print_success("Delivery recorded.");
    Ok(())
}

fn handle_collected(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let Some(rental_id) = resolve_rental(
        context,
        args.first().copied(),
        "usage: rental collected <index>",
        "Select a rental to mark as collected",
    )?
    else {
        return Ok(());
    };
    let now = context.now();
    let updated = context.with_registry_mut(|registry| {
        RentalService::mark_collected(registry, rental_id, now).map_err(CommandError::from)
    })?;
    if updated.is_finalized() {
        cli_io::print_success("Collection recorded; rental is now finalized.");
    } else {
        cli_io::print_success("Collection recorded.");
    }
    Ok(())
}

fn handle_invoice(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let Some(rental_id) = resolve_rental(
        context,
        args.first().copied(),
        "usage: rental invoice <index>",
        "Select a rental",
    )?
    else {
        return Ok(());
    };
    context.with_registry_mut(|registry| {
        RentalService::mark_invoice_issued(registry, rental_id).map_err(CommandError::from)
    })?;
    cli_io::print_success("Invoice marked as issued.");
    Ok(())
}

fn handle_renew(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let Some((index_arg, rest)) = args.split_first() else {
        return Err(CommandError::InvalidArguments(
            "usage: rental renew <index> [end=YYYY-MM-DD] [amount=..]".into(),
        ));
    };
    let extra = parse_key_values(rest)?;
    let new_amount = extra.get("amount").map(|v| parse_decimal(v)).transpose()?;
    let explicit_end = extra.get("end").map(|v| parse_date(v)).transpose()?;

    let Some(rental_id) = resolve_rental(
        context,
        Some(*index_arg),
        "usage: rental renew <index> [end=YYYY-MM-DD] [amount=..]",
        "Select a rental to renew",
    )?
    else {
        return Ok(());
    };

    let new_end = match explicit_end {
        Some(date) => date,
        None => context.with_registry(|registry| {
            let rental = registry.rental(rental_id).ok_or_else(|| {
                CommandError::InvalidArguments("rental no longer exists".into())
            })?;
            Ok(rental.period.next_cycle_end(rental.expected_end_date))
        })?,
    };

    let now = context.now();
    let updated = context.with_registry_mut(|registry| {
        RentalService::renew(registry, rental_id, new_end, new_amount, now)
            .map_err(CommandError::from)
    })?;
    cli_io::print_success(format!(
        "Rental renewed until {} for {} (cycle {}).",
        new_end,
        context.format_amount(updated.amount),
        updated.renewal_count
    ));
    Ok(())
}

fn handle_remove(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let Some(rental_id) = resolve_rental(
        context,
        args.first().copied(),
        "usage: rental remove <index>",
        "Select a rental to remove",
    )?
    else {
        return Ok(());
    };

    if context.mode() == CliMode::Interactive {
        let confirm = cli_io::confirm_action(
            context.theme(),
            "Remove this rental and all of its receivables?",
            false,
        )?;
        if !confirm {
            cli_io::print_info("Operation cancelled.");
            return Ok(());
        }
    }

    let (_, dropped) = context.with_registry_mut(|registry| {
        RentalService::remove(registry, rental_id).map_err(CommandError::from)
    })?;
    cli_io::print_success(format!(
        "Rental removed along with {} receivable(s).",
        dropped
    ));
    Ok(())
}
