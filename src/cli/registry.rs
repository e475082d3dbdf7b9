use crate::cli::shell_context::ShellContext;
use crate::cli::CommandResult;

pub type CommandHandler = fn(&mut ShellContext, &[&str]) -> CommandResult;

/// A root command: help strings plus the handler that runs it. Command
/// modules build these as plain literals in their `entries()`.
pub struct CommandEntry {
    pub name: &'static str,
    pub description: &'static str,
    pub usage: &'static str,
    pub handler: CommandHandler,
}

/// Root-command table. Registration order is what `help` shows, and the
/// table stays small enough that lookups just scan it.
#[derive(Default)]
pub struct CommandRegistry {
    entries: Vec<CommandEntry>,
}

impl CommandRegistry {
    /// Adds a command. Re-registering a name replaces the entry in place,
    /// keeping its original position in listings.
    pub fn register(&mut self, entry: CommandEntry) {
        match self.entries.iter_mut().find(|slot| slot.name == entry.name) {
            Some(slot) => *slot = entry,
            None => self.entries.push(entry),
        }
    }

    pub fn get(&self, name: &str) -> Option<&CommandEntry> {
        self.entries.iter().find(|entry| entry.name == name)
    }

    pub fn handler(&self, name: &str) -> Option<CommandHandler> {
        self.get(name).map(|entry| entry.handler)
    }

    pub fn list(&self) -> &[CommandEntry] {
        &self.entries
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn noop(_context: &mut ShellContext, _args: &[&str]) -> CommandResult {
        Ok(())
    }

    fn entry(name: &'static str, description: &'static str) -> CommandEntry {
        CommandEntry {
            name,
            description,
            usage: name,
            handler: noop,
        }
    }

    #[test]
    fn registration_order_drives_listing() {
        let mut registry = CommandRegistry::default();
        registry.register(entry("book", ""));
        registry.register(entry("upcoming", ""));
        registry.register(entry("exit", ""));

        let names: Vec<&str> = registry.list().iter().map(|slot| slot.name).collect();
        assert_eq!(names, vec!["book", "upcoming", "exit"]);
    }

    #[test]
    fn re_registration_keeps_one_slot() {
        let mut registry = CommandRegistry::default();
        registry.register(entry("book", "first"));
        registry.register(entry("upcoming", ""));
        registry.register(entry("book", "second"));

        assert_eq!(registry.list().len(), 2);
        let first = registry.list().first().map(|slot| slot.description);
        assert_eq!(first, Some("second"));
    }
}
