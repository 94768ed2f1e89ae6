use std::collections::HashMap;

use chrono::NaiveDate;
use rust_decimal::Decimal;

pub mod client;
pub mod config;
pub mod equipment;
pub mod registry;
pub mod rental;
pub mod report;
pub mod system;

use crate::cli::core::{CommandError, CommandResult, ShellContext};

pub(crate) fn all_definitions() -> Vec<CommandDefinition> {
    let mut commands = Vec::new();
    commands.extend(system::definitions());
    commands.extend(registry::definitions());
    commands.extend(config::definitions());
    commands.extend(client::definitions());
    commands.extend(equipment::definitions());
    commands.extend(rental::definitions());
    commands.extend(report::definitions());
    commands
}

pub type CommandHandler = fn(&mut ShellContext, &[&str]) -> CommandResult;

#[derive(Clone)]
pub struct CommandDefinition {
    pub name: &'static str,
    pub description: &'static str,
    pub usage: &'static str,
    pub handler: CommandHandler,
}

impl CommandDefinition {
    pub const fn new(
        name: &'static str,
        description: &'static str,
        usage: &'static str,
        handler: CommandHandler,
    ) -> Self {
        Self {
            name,
            description,
            usage,
            handler,
        }
    }
}

pub struct CommandRegistry {
    commands: HashMap<&'static str, CommandDefinition>,
    order: Vec<&'static str>,
}

impl CommandRegistry {
    pub fn new(definitions: Vec<CommandDefinition>) -> Self {
        let mut commands = HashMap::new();
        let mut order = Vec::new();
        for definition in definitions {
            order.push(definition.name);
            commands.insert(definition.name, definition);
        }
        Self { commands, order }
    }

    pub fn get(&self, name: &str) -> Option<&CommandDefinition> {
        self.commands.get(name)
    }

    pub fn iter(&self) -> impl Iterator<Item = &CommandDefinition> {
        self.order
            .iter()
            .filter_map(move |name| self.commands.get(name))
    }

    pub fn names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.order.iter().copied()
    }

    pub fn handler(&self, name: &str) -> Option<CommandHandler> {
        self.commands.get(name).map(|entry| entry.handler)
    }
}

/// Splits trailing `key=value` arguments into a map, leaving positional
/// arguments untouched for the caller.
pub(crate) fn parse_key_values(args: &[&str]) -> Result<HashMap<String, String>, CommandError> {
    let mut map = HashMap::new();
    for arg in args {
        let Some((key, value)) = arg.split_once('=') else {
            return Err(CommandError::InvalidArguments(format!(
                "expected key=value, got `{arg}`"
            )));
        };
        map.insert(key.trim().to_ascii_lowercase(), value.trim().to_string());
    }
    Ok(map)
}

pub(crate) fn parse_date(value: &str) -> Result<NaiveDate, CommandError> {
    NaiveDate::parse_from_str(value, "%Y-%m-%d").map_err(|_| {
        CommandError::InvalidArguments(format!("`{value}` is not a date (expected YYYY-MM-DD)"))
    })
}

pub(crate) fn parse_decimal(value: &str) -> Result<Decimal, CommandError> {
    value.parse::<Decimal>().map_err(|_| {
        CommandError::InvalidArguments(format!("`{value}` is not a valid amount"))
    })
}

pub(crate) fn parse_bool(value: &str) -> Result<bool, CommandError> {
    match value.to_ascii_lowercase().as_str() {
        "yes" | "y" | "true" | "1" => Ok(true),
        "no" | "n" | "false" | "0" => Ok(false),
        other => Err(CommandError::InvalidArguments(format!(
            "`{other}` is not a yes/no value"
        ))),
    }
}

pub(crate) fn parse_month(value: &str) -> Result<u32, CommandError> {
    let month = value.parse::<u32>().map_err(|_| {
        CommandError::InvalidArguments(format!("`{value}` is not a month number"))
    })?;
    if !(1..=12).contains(&month) {
        return Err(CommandError::InvalidArguments(
            "month must be between 1 and 12".into(),
        ));
    }
    Ok(month)
}

pub(crate) fn parse_year(value: &str) -> Result<i32, CommandError> {
    value.parse::<i32>().map_err(|_| {
        CommandError::InvalidArguments(format!("`{value}` is not a year"))
    })
}
