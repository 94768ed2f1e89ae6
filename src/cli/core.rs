//! Shell context, command dispatch, and error reporting for the CLI.

use chrono::{DateTime, NaiveDate, Utc};
use dialoguer::theme::ColorfulTheme;
use rust_decimal::Decimal;
use strsim::levenshtein;
use thiserror::Error;

use crate::{
    config::{Config, ConfigManager},
    core::{
        errors::RentalError,
        registry_manager::{LoadMetadata, RegistryManager},
        time::{Clock, SystemClock},
    },
    domain::Rental,
    registry::{Registry, ALERT_WINDOW_DAYS},
    storage::JsonStorage,
};

use super::commands::{self, CommandDefinition, CommandRegistry};
use super::io as cli_io;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CliMode {
    Interactive,
    Script,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum LoopControl {
    Continue,
    Exit,
}

pub type CommandResult = Result<(), CommandError>;

/// Failure of a single command; reported and the shell keeps running.
#[derive(Debug, Error)]
pub enum CommandError {
    #[error(transparent)]
    Core(#[from] RentalError),
    #[error("{0}")]
    InvalidArguments(String),
    #[error("input error: {0}")]
    Dialoguer(#[from] dialoguer::Error),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("exit requested")]
    ExitRequested,
}

/// Fatal shell failure that aborts the whole CLI run.
#[derive(Debug, Error)]
pub enum CliError {
    #[error(transparent)]
    Core(#[from] RentalError),
    #[error("readline error: {0}")]
    Readline(#[from] rustyline::error::ReadlineError),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

pub struct ShellContext {
    mode: CliMode,
    commands: CommandRegistry,
    pub(crate) manager: RegistryManager,
    pub(crate) config_manager: ConfigManager,
    pub(crate) config: Config,
    theme: ColorfulTheme,
    clock: Box<dyn Clock>,
    pub(crate) running: bool,
}

impl ShellContext {
    pub fn new(mode: CliMode) -> Result<Self, CliError> {
        let registry = CommandRegistry::new(commands::all_definitions());
        let storage = JsonStorage::new_default()?;
        let manager = RegistryManager::new(Box::new(storage));
        let config_manager = ConfigManager::new()?;
        let config = config_manager.load()?;

        let mut context = ShellContext {
            mode,
            commands: registry,
            manager,
            config_manager,
            config,
            theme: ColorfulTheme::default(),
            clock: Box::new(SystemClock),
            running: true,
        };
        context.auto_load_last();
        Ok(context)
    }

    fn auto_load_last(&mut self) {
        if self.mode != CliMode::Interactive {
            return;
        }
        if self.manager.current().is_some() {
            return;
        }
        let Some(name) = self.config.last_opened_registry.clone() else {
            return;
        };
        match self.manager.load(&name) {
            Ok(metadata) => {
                self.report_load(&metadata);
                cli_io::print_success(format!("Automatically loaded last registry `{}`.", name));
            }
            Err(err) => {
                tracing::debug!(registry = %name, error = %err, "auto-load skipped");
            }
        }
    }

    pub(crate) fn mode(&self) -> CliMode {
        self.mode
    }

    pub(crate) fn theme(&self) -> &ColorfulTheme {
        &self.theme
    }

    pub(crate) fn now(&self) -> DateTime<Utc> {
        self.clock.now()
    }

    pub(crate) fn today(&self) -> NaiveDate {
        self.clock.today()
    }

    /// Alert window, config override first, default constant otherwise.
    pub(crate) fn alert_window(&self) -> i64 {
        self.config.alert_window_days.unwrap_or(ALERT_WINDOW_DAYS)
    }

    pub(crate) fn prompt(&self) -> String {
        match self.manager.current_name() {
            Some(name) => format!("{name}> "),
            None => "rental> ".into(),
        }
    }

    pub(crate) fn command_names(&self) -> Vec<&'static str> {
        self.commands.names().collect()
    }

    pub(crate) fn command(&self, name: &str) -> Option<&CommandDefinition> {
        self.commands.get(name)
    }

    pub(crate) fn command_list(&self) -> Vec<&CommandDefinition> {
        self.commands.iter().collect()
    }

    pub(crate) fn registry_name(&self) -> Option<String> {
        self.manager.current_name().map(|name| name.to_string())
    }

    pub(crate) fn with_registry<T>(
        &self,
        f: impl FnOnce(&Registry) -> Result<T, CommandError>,
    ) -> Result<T, CommandError> {
        match self.manager.current() {
            Some(registry) => f(registry),
            None => Err(CommandError::Core(RentalError::RegistryNotLoaded)),
        }
    }

    pub(crate) fn with_registry_mut<T>(
        &mut self,
        f: impl FnOnce(&mut Registry) -> Result<T, CommandError>,
    ) -> Result<T, CommandError> {
        match self.manager.current_mut() {
            Some(registry) => f(registry),
            None => Err(CommandError::Core(RentalError::RegistryNotLoaded)),
        }
    }

    pub(crate) fn report_load(&self, metadata: &LoadMetadata) {
        for warning in &metadata.warnings {
            cli_io::print_warning(warning);
        }
    }

    pub(crate) fn persist_config(&self) -> Result<(), CommandError> {
        self.config_manager
            .save(&self.config)
            .map_err(CommandError::from)
    }

    pub(crate) fn update_last_opened(&mut self, name: Option<&str>) -> CommandResult {
        self.config.last_opened_registry = name.map(|value| value.to_string());
        self.persist_config()
    }

    pub(crate) fn format_amount(&self, amount: Decimal) -> String {
        format!("{} {}", self.config.currency, amount.round_dp(2))
    }

    pub(crate) fn format_date(&self, date: NaiveDate) -> String {
        date.format("%Y-%m-%d").to_string()
    }

    pub(crate) fn rental_label(&self, registry: &Registry, rental: &Rental) -> String {
        let client = registry
            .client(rental.client_id)
            .map(|client| client.name.clone())
            .unwrap_or_else(|| "?".into());
        format!(
            "{}: {} {} -> {} ({:?})",
            client,
            rental.period.label(),
            self.format_date(rental.start_date),
            self.format_date(rental.expected_end_date),
            rental.lifecycle
        )
    }

    pub(crate) fn dispatch(
        &mut self,
        command: &str,
        raw: &str,
        args: &[&str],
    ) -> Result<LoopControl, CommandError> {
        if let Some(handler) = self.commands.handler(command) {
            match handler(self, args) {
                Ok(()) => Ok(LoopControl::Continue),
                Err(CommandError::ExitRequested) => Ok(LoopControl::Exit),
                Err(err) => Err(err),
            }
        } else {
            self.suggest_command(raw);
            Ok(LoopControl::Continue)
        }
    }

    pub(crate) fn suggest_command(&self, input: &str) {
        cli_io::print_warning(format!(
            "Unknown command `{}`. Type `help` to see available commands.",
            input
        ));

        let mut suggestions: Vec<_> = self
            .commands
            .names()
            .map(|key| (levenshtein(key, input), key))
            .collect();
        suggestions.sort_by_key(|(distance, _)| *distance);

        if let Some((distance, best)) = suggestions.first() {
            if *distance <= 3 {
                cli_io::print_info(format!("Suggestion: `{}`?", best));
            }
        }
    }

    pub(crate) fn confirm_exit(&self) -> Result<bool, CliError> {
        if self.mode == CliMode::Script {
            return Ok(true);
        }
        cli_io::confirm_action(&self.theme, "Exit shell?", true)
            .map_err(|err| CliError::Io(std::io::Error::other(err.to_string())))
    }

    pub(crate) fn report_error(&self, err: CommandError) -> Result<(), CliError> {
        match err {
            CommandError::ExitRequested => Ok(()),
            CommandError::InvalidArguments(message) => {
                self.print_error(&message);
                self.print_hint("Use `help <command>` for usage details.");
                Ok(())
            }
            CommandError::Core(RentalError::RegistryNotLoaded) => {
                self.print_error("Registry not loaded. Use `registry new` or `registry load` first.");
                self.print_hint("Try `registry new \"My Rentals\"` to get started.");
                Ok(())
            }
            other => {
                self.print_error(&other.to_string());
                Ok(())
            }
        }
    }

    pub(crate) fn print_error(&self, message: &str) {
        cli_io::print_error(message);
    }

    pub(crate) fn print_warning(&self, message: &str) {
        cli_io::print_warning(message);
    }

    pub(crate) fn print_hint(&self, message: &str) {
        cli_io::print_info(message);
    }

    /// Resolves a list index either from an explicit argument or, in
    /// interactive mode, from a selection prompt over `labels`.
    pub(crate) fn index_from_arg(
        &self,
        arg: Option<&str>,
        labels: Vec<String>,
        usage: &str,
        prompt: &str,
    ) -> Result<Option<usize>, CommandError> {
        if let Some(raw) = arg {
            let index = raw
                .parse::<usize>()
                .map_err(|_| CommandError::InvalidArguments(format!("index must be numeric; {usage}")))?;
            return Ok(Some(index));
        }
        if self.mode != CliMode::Interactive {
            return Err(CommandError::InvalidArguments(usage.into()));
        }
        if labels.is_empty() {
            cli_io::print_warning("Nothing to select from.");
            return Ok(None);
        }
        let selection = dialoguer::Select::with_theme(&self.theme)
            .with_prompt(prompt)
            .items(&labels)
            .default(0)
            .interact_opt()?;
        Ok(selection)
    }
}
