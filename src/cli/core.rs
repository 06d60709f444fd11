use dialoguer::{theme::ColorfulTheme, Confirm};
use spendbook_config::{Config, ConfigError, ConfigManager};
use spendbook_core::{CoreError, ErrorKind, ExpenseStore, StandardFormatter};
use spendbook_storage_json::JsonFileStorage;
use strsim::levenshtein;
use thiserror::Error;

use crate::errors::{AppError, CliError};

use super::{commands, output, registry::CommandRegistry};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CliMode {
    Interactive,
    Script,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoopControl {
    Continue,
    Exit,
}

#[derive(Debug, Error)]
pub enum CommandError {
    #[error("{0}")]
    InvalidArguments(String),
    #[error(transparent)]
    App(#[from] AppError),
    #[error(transparent)]
    Dialoguer(#[from] dialoguer::Error),
    #[error("exit requested")]
    ExitRequested,
}

impl From<CoreError> for CommandError {
    fn from(err: CoreError) -> Self {
        CommandError::App(AppError::from(err))
    }
}

impl From<ConfigError> for CommandError {
    fn from(err: ConfigError) -> Self {
        CommandError::App(AppError::from(err))
    }
}

pub type CommandResult = Result<(), CommandError>;

/// State shared by every command handler for one shell session.
pub struct ShellContext {
    pub mode: CliMode,
    pub registry: CommandRegistry,
    pub store: ExpenseStore,
    pub config_manager: ConfigManager,
    pub config: Config,
    pub formatter: StandardFormatter,
    pub theme: ColorfulTheme,
    pub last_command: Option<String>,
    pub running: bool,
}

impl ShellContext {
    pub fn new(mode: CliMode) -> Result<Self, CliError> {
        Self::with_manager(mode, ConfigManager::new_default()?)
    }

    /// Loads configuration from `config_manager` and opens the expense document it points at.
    pub fn with_manager(mode: CliMode, config_manager: ConfigManager) -> Result<Self, CliError> {
        let config = config_manager.load()?;
        output::apply_color_preference(config.ui_color_enabled);
        let store = open_store(&config_manager, &config)?;

        let mut registry = CommandRegistry::new();
        commands::register_all(&mut registry);

        Ok(Self {
            mode,
            registry,
            store,
            config_manager,
            config,
            formatter: StandardFormatter,
            theme: ColorfulTheme::default(),
            last_command: None,
            running: true,
        })
    }

    /// Reopens the store after the configured data file changed.
    pub fn reload_store(&mut self) -> Result<(), CommandError> {
        self.store = open_store(&self.config_manager, &self.config)?;
        tracing::info!(location = %self.store.storage().location(), "expense store reopened");
        Ok(())
    }

    pub fn command_names(&self) -> Vec<&'static str> {
        self.registry.names().collect()
    }

    pub fn prompt(&self) -> String {
        "spendbook> ".into()
    }

    pub(crate) fn dispatch(
        &mut self,
        command: &str,
        raw: &str,
        args: &[&str],
    ) -> Result<LoopControl, CommandError> {
        if let Some(handler) = self.registry.handler(command) {
            match handler(self, args) {
                Ok(()) => Ok(LoopControl::Continue),
                Err(CommandError::ExitRequested) => Ok(LoopControl::Exit),
                Err(err) => Err(err),
            }
        } else {
            self.suggest_command(raw);
            Err(CommandError::InvalidArguments(format!(
                "Unknown command `{raw}`."
            )))
        }
    }

    pub(crate) fn suggest_command(&self, input: &str) {
        let needle = input.to_ascii_lowercase();
        let best = self
            .registry
            .names()
            .map(|name| (levenshtein(name, &needle), name))
            .min_by_key(|(distance, _)| *distance);

        if let Some((distance, name)) = best {
            if distance <= 3 {
                output::hint(format!("Did you mean `{name}`?"));
            }
        }
    }

    /// Asks for confirmation in interactive mode; scripts never block on prompts.
    pub(crate) fn confirm(&self, prompt: &str) -> Result<bool, CommandError> {
        if self.mode == CliMode::Script {
            return Ok(true);
        }
        Ok(Confirm::with_theme(&self.theme)
            .with_prompt(prompt)
            .default(false)
            .interact()?)
    }

    pub(crate) fn confirm_exit(&self) -> Result<bool, CliError> {
        if self.mode == CliMode::Script {
            return Ok(true);
        }
        Ok(Confirm::with_theme(&self.theme)
            .with_prompt("Exit shell?")
            .default(true)
            .interact()?)
    }

    pub(crate) fn report_error(&self, err: CommandError) {
        match err {
            CommandError::ExitRequested => {}
            CommandError::InvalidArguments(message) => {
                output::error(&message);
                output::hint("Use `help <command>` for usage details.");
            }
            CommandError::App(app) => {
                output::error(&app);
                match app.kind() {
                    ErrorKind::NotFound => output::hint("Use `list` to see expense IDs."),
                    ErrorKind::Storage => {
                        tracing::error!(error = %app, "storage failure");
                        output::hint(format!(
                            "Data file: {}",
                            self.store.storage().location()
                        ));
                    }
                    ErrorKind::Validation => {}
                }
            }
            other => output::error(&other),
        }
    }
}

fn open_store(manager: &ConfigManager, config: &Config) -> Result<ExpenseStore, CoreError> {
    let storage = JsonFileStorage::open(manager.data_file(config))?;
    Ok(ExpenseStore::new(Box::new(storage)))
}


#[cfg(test)]
mod tests {
    use super::test_support::script_context;
    use super::*;

    #[test]
    fn unknown_commands_are_rejected() {
        let (_dir, mut context) = script_context();
        let result = context.dispatch("lst", "lst", &[]);
        assert!(matches!(result, Err(CommandError::InvalidArguments(_))));
    }

    #[test]
    fn exit_stops_the_loop() {
        let (_dir, mut context) = script_context();
        let result = context.dispatch("exit", "exit", &[]).unwrap();
        assert_eq!(result, LoopControl::Exit);
    }

    #[test]
    fn script_mode_confirms_without_prompting() {
        let (_dir, context) = script_context();
        assert!(context.confirm("Delete?").unwrap());
        assert!(context.confirm_exit().unwrap());
    }

    #[test]
    fn store_points_at_configured_data_file() {
        let (dir, context) = script_context();
        assert!(dir.path().join("expenses.json").exists());
        assert!(context.store.list_all().unwrap().is_empty());
    }
}
