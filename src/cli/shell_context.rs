//! Shared state threaded through every command handler.

use std::ops::ControlFlow;

use chrono::{Local, NaiveDate};
use dialoguer::{theme::ColorfulTheme, Confirm};

use crate::{
    cli::{commands, CliError, CommandError},
    config::{Config, ConfigManager},
    core::BookManager,
    storage::JsonStorage,
};

use super::{
    output::{self, OutputPreferences},
    registry::CommandRegistry,
};

/// Edit distance above which an unknown command gets no suggestion.
const SUGGESTION_DISTANCE: usize = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CliMode {
    Interactive,
    Script,
}

pub struct ShellContext {
    pub mode: CliMode,
    pub registry: CommandRegistry,
    pub manager: BookManager,
    pub theme: ColorfulTheme,
    pub config_manager: ConfigManager,
    pub config: Config,
    pub running: bool,
}

impl ShellContext {
    pub fn new(mode: CliMode) -> Result<Self, CliError> {
        let storage = JsonStorage::new_default()?;
        let config_manager = ConfigManager::new()?;
        Ok(Self::from_parts(mode, storage, config_manager))
    }

    /// Builds a context around explicit storage and config locations.
    pub fn from_parts(mode: CliMode, storage: JsonStorage, config_manager: ConfigManager) -> Self {
        let config = match config_manager.load() {
            Ok(config) => config,
            Err(err) => {
                output::warning(format!("Could not read the config file ({err}); using defaults."));
                Config::default()
            }
        };

        let mut registry = CommandRegistry::default();
        commands::register_all(&mut registry);

        let context = Self {
            mode,
            registry,
            manager: BookManager::new(Box::new(storage)),
            theme: ColorfulTheme::default(),
            config_manager,
            config,
            running: true,
        };
        context.apply_output_preferences();
        context
    }

    /// Recomputes the global output switches from mode, config, and `NO_COLOR`.
    pub fn apply_output_preferences(&self) {
        let plain = self.mode == CliMode::Script
            || self.config.plain_output
            || std::env::var_os("NO_COLOR").is_some();
        output::set_preferences(OutputPreferences { plain });
    }

    pub fn is_script(&self) -> bool {
        self.mode == CliMode::Script
    }

    /// Runs one parsed command line through the registry.
    pub(crate) fn dispatch(&mut self, command: &str, args: &[&str]) -> ControlFlow<()> {
        match self.registry.handler(command) {
            Some(handler) => match handler(self, args) {
                Ok(()) => ControlFlow::Continue(()),
                Err(CommandError::ExitRequested) => {
                    self.running = false;
                    ControlFlow::Break(())
                }
                Err(err) => {
                    self.report_error(command, err);
                    ControlFlow::Continue(())
                }
            },
            None => {
                self.report_unknown(command);
                ControlFlow::Continue(())
            }
        }
    }

    fn report_error(&self, command: &str, err: CommandError) {
        match err {
            CommandError::ExitRequested => {}
            CommandError::InvalidArguments(message) => {
                output::error(message);
                if let Some(entry) = self.registry.get(command) {
                    output::hint(format!("Usage: {}", entry.usage));
                }
            }
            other => output::error(other),
        }
    }

    pub(crate) fn report_unknown(&self, command: &str) {
        output::error(format!("Unknown command: {command}"));
        if let Some(suggestion) = self.suggest_command(command) {
            output::hint(format!("Did you mean `{suggestion}`?"));
        } else {
            output::hint("Type `help` to list the available commands.");
        }
    }

    fn suggest_command(&self, input: &str) -> Option<&'static str> {
        self.registry
            .list()
            .iter()
            .map(|entry| (strsim::levenshtein(input, entry.name), entry.name))
            .filter(|(distance, _)| *distance <= SUGGESTION_DISTANCE)
            .min_by_key(|(distance, _)| *distance)
            .map(|(_, name)| name)
    }

    fn ask(&self, prompt: &str, default: bool) -> Result<bool, CommandError> {
        let answer = Confirm::with_theme(&self.theme)
            .with_prompt(prompt)
            .default(default)
            .interact()?;
        Ok(answer)
    }

    /// Asks before a destructive action; scripts proceed without asking.
    pub fn confirm_destructive(&self, prompt: &str) -> Result<bool, CommandError> {
        match self.mode {
            CliMode::Script => Ok(true),
            CliMode::Interactive => self.ask(prompt, false),
        }
    }

    pub fn confirm_exit(&self) -> bool {
        match self.mode {
            CliMode::Script => true,
            CliMode::Interactive => matches!(self.ask("Exit Finance Core?", true), Ok(true)),
        }
    }

    pub fn prompt(&self) -> String {
        let arrow = if output::current_preferences().plain {
            ">"
        } else {
            "⮞"
        };
        match self.manager.current_name() {
            Some(name) => format!("book: {name} {arrow} "),
            None => format!("no-book {arrow} "),
        }
    }

    /// Reopens the book recorded from the previous session, if any.
    pub fn auto_open_last_book(&mut self) {
        let Some(name) = self.config.last_opened_book.clone() else {
            return;
        };
        match self.manager.open(&name) {
            Ok(_) => output::info(format!("Opened book `{name}`.")),
            Err(err) => {
                output::warning(format!("Could not reopen `{name}`: {err}"));
                self.config.last_opened_book = None;
                self.persist_config();
            }
        }
    }

    pub fn remember_last_opened(&mut self, name: &str) {
        if self.config.last_opened_book.as_deref() != Some(name) {
            self.config.last_opened_book = Some(name.to_string());
            self.persist_config();
        }
    }

    pub fn clear_last_opened(&mut self) {
        if self.config.last_opened_book.take().is_some() {
            self.persist_config();
        }
    }

    pub fn persist_config(&self) {
        if let Err(err) = self.config_manager.save(&self.config) {
            output::warning(format!("Could not save the config file: {err}"));
        }
    }

    pub fn today(&self) -> NaiveDate {
        Local::now().date_naive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn script_context(dir: &TempDir) -> ShellContext {
        let root = dir.path().to_path_buf();
        let storage = JsonStorage::new(Some(root.clone()), None).unwrap();
        let config_manager = ConfigManager::with_base_dir(root).unwrap();
        ShellContext::from_parts(CliMode::Script, storage, config_manager)
    }

    #[test]
    fn registry_is_populated_at_startup() {
        let dir = TempDir::new().unwrap();
        let context = script_context(&dir);
        assert!(context.registry.get("book").is_some());
        assert!(context.registry.get("upcoming").is_some());
    }

    #[test]
    fn prompt_tracks_the_open_book() {
        let dir = TempDir::new().unwrap();
        let mut context = script_context(&dir);
        assert!(context.prompt().starts_with("no-book"));

        context.manager.create("trip fund").unwrap();
        assert!(context.prompt().starts_with("book: trip fund"));
    }

    #[test]
    fn near_miss_commands_get_a_suggestion() {
        let dir = TempDir::new().unwrap();
        let context = script_context(&dir);
        assert_eq!(context.suggest_command("bok"), Some("book"));
        assert_eq!(context.suggest_command("chrage"), Some("charge"));
        assert_eq!(context.suggest_command("zzzzzzzzzz"), None);
    }

    #[test]
    fn scripts_skip_destructive_confirmation() {
        let dir = TempDir::new().unwrap();
        let context = script_context(&dir);
        assert!(context.confirm_destructive("Remove it?").unwrap());
        assert!(context.confirm_exit());
    }

    #[test]
    fn unknown_commands_keep_the_loop_running() {
        let dir = TempDir::new().unwrap();
        let mut context = script_context(&dir);
        assert!(context.dispatch("nonsense", &[]).is_continue());
        assert!(context.dispatch("exit", &[]).is_break());
        assert!(!context.running);
    }
}
