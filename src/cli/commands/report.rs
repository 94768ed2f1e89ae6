use crate::cli::commands::{parse_key_values, parse_month, parse_year, CommandDefinition};
use crate::cli::core::{CommandError, CommandResult, ShellContext};
use crate::cli::{io as cli_io, output};
use crate::core::services::ReportService;

pub(crate) fn definitions() -> Vec<CommandDefinition> {
    vec![CommandDefinition::new(
        "report",
        "Revenue and profit per equipment item",
        "report <equipment_index> [month=1-12] [year=YYYY]",
        cmd_report,
    )]
}

fn cmd_report(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let Some((index_arg, rest)) = args.split_first() else {
        return Err(CommandError::InvalidArguments(
            "usage: report <equipment_index> [month=1-12] [year=YYYY]".into(),
        ));
    };
    let index: usize = index_arg.parse().map_err(|_| {
        CommandError::InvalidArguments("equipment index must be numeric".into())
    })?;
    let extra = parse_key_values(rest)?;
    let month = extra.get("month").map(|v| parse_month(v)).transpose()?;
    let year = extra.get("year").map(|v| parse_year(v)).transpose()?;

    let equipment_id = context.with_registry(|registry| {
        registry
            .equipment
            .get(index)
            .map(|item| item.id)
            .ok_or_else(|| CommandError::InvalidArguments("equipment index out of range".into()))
    })?;

    let report = context.with_registry(|registry| {
        ReportService::equipment_report(registry, equipment_id, month, year)
            .map_err(CommandError::from)
    })?;

    output::section(format!("Revenue: {}", report.equipment_name));
    if report.entries.is_empty() {
        cli_io::print_warning("No paid rentals match the selected filter.");
    } else {
        let rows: Vec<Vec<String>> = report
            .entries
            .iter()
            .map(|entry| {
                vec![
                    entry.client_name.clone(),
                    context.format_amount(entry.amount),
                    context.format_date(entry.effective_date),
                ]
            })
            .collect();
        output::render_table(&["client", "amount", "date"], &rows);
    }

    if month.is_some() || year.is_some() {
        cli_io::print_info(format!(
            "Filtered revenue: {}",
            context.format_amount(report.filtered_revenue)
        ));
    }
    cli_io::print_info(format!(
        "Total revenue: {}",
        context.format_amount(report.total_revenue)
    ));
    if let Some(cost) = report.purchase_cost {
        cli_io::print_info(format!("Purchase cost: {}", context.format_amount(cost)));
    }
    cli_io::print_info(format!("Profit: {}", context.format_amount(report.profit)));

    if !report.months.is_empty() {
        let labels: Vec<String> = report.months.iter().map(|key| key.label()).collect();
        cli_io::print_info(format!("Months with revenue: {}", labels.join(", ")));
    }
    Ok(())
}
