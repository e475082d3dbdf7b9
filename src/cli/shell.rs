//! Read-eval loop: rustyline-backed interactive shell plus a line-at-a-time
//! script mode for piped input.

use std::io::{self, BufRead, IsTerminal};
use std::ops::ControlFlow;

use rustyline::{
    completion::{Completer, Pair},
    error::ReadlineError,
    highlight::Highlighter,
    hint::Hinter,
    history::DefaultHistory,
    validate::Validator,
    Cmd, Context as ReadlineContext, Editor, Helper, KeyEvent,
};

use crate::cli::output;
use crate::cli::{CliError, CliMode, ShellContext};

pub fn run() -> Result<(), CliError> {
    let mode = detect_mode();
    let mut context = ShellContext::new(mode)?;

    match mode {
        CliMode::Interactive => interactive_loop(&mut context),
        CliMode::Script => script_loop(&mut context),
    }
}

/// Piped stdin or the override variable switch the shell into script mode.
fn detect_mode() -> CliMode {
    if std::env::var_os("FINANCE_CORE_CLI_SCRIPT").is_some() || !io::stdin().is_terminal() {
        CliMode::Script
    } else {
        CliMode::Interactive
    }
}

fn interactive_loop(context: &mut ShellContext) -> Result<(), CliError> {
    let mut editor = Editor::<ShellCompleter, DefaultHistory>::new()?;
    editor.set_helper(Some(ShellCompleter::new(
        context.registry.list().iter().map(|entry| entry.name),
    )));
    editor.bind_sequence(KeyEvent::from('?'), Cmd::Complete);

    context.auto_open_last_book();

    while context.running {
        match editor.readline(&context.prompt()) {
            Ok(line) => {
                let trimmed = line.trim();
                if trimmed.is_empty() {
                    continue;
                }

                editor.add_history_entry(trimmed).ok();

                if handle_line(context, trimmed).is_break() {
                    break;
                }
            }
            Err(ReadlineError::Interrupted) => {
                if context.confirm_exit() {
                    break;
                }
            }
            Err(ReadlineError::Eof) => {
                output::info("Exiting shell.");
                break;
            }
            Err(err) => return Err(err.into()),
        }
    }

    Ok(())
}

fn script_loop(context: &mut ShellContext) -> Result<(), CliError> {
    for line in io::stdin().lock().lines() {
        let line = line?;
        if handle_line(context, &line).is_break() || !context.running {
            break;
        }
    }
    Ok(())
}

/// Tokenizes one input line and dispatches it. Parse and command failures
/// are reported and the loop keeps going; only `exit` stops it.
fn handle_line(context: &mut ShellContext, line: &str) -> ControlFlow<()> {
    let tokens = match shell_words::split(line) {
        Ok(tokens) if tokens.is_empty() => return ControlFlow::Continue(()),
        Ok(tokens) => tokens,
        Err(err) => {
            output::warning(err.to_string());
            return ControlFlow::Continue(());
        }
    };

    let command = tokens[0].to_ascii_lowercase();
    let args: Vec<&str> = tokens[1..].iter().map(String::as_str).collect();
    context.dispatch(&command, &args)
}

/// Tab completion over registered command names. Arguments never complete;
/// past the first word the line belongs to the user.
struct ShellCompleter {
    names: Vec<&'static str>,
}

impl ShellCompleter {
    fn new(names: impl IntoIterator<Item = &'static str>) -> Self {
        let mut names: Vec<&'static str> = names.into_iter().collect();
        names.sort_unstable();
        Self { names }
    }
}

impl Helper for ShellCompleter {}

impl Completer for ShellCompleter {
    type Candidate = Pair;

    fn complete(
        &self,
        line: &str,
        pos: usize,
        _ctx: &ReadlineContext<'_>,
    ) -> rustyline::Result<(usize, Vec<Pair>)> {
        let typed = &line[..pos];
        if typed.trim_start().contains(char::is_whitespace) {
            return Ok((pos, Vec::new()));
        }

        let indent = typed.len() - typed.trim_start().len();
        let word = typed[indent..].to_ascii_lowercase();
        let matches = self
            .names
            .iter()
            .filter(|name| name.starts_with(&word))
            .map(|name| Pair {
                display: (*name).to_string(),
                replacement: (*name).to_string(),
            })
            .collect();
        Ok((indent, matches))
    }
}

impl Hinter for ShellCompleter {
    type Hint = String;
}

impl Highlighter for ShellCompleter {}

impl Validator for ShellCompleter {}
