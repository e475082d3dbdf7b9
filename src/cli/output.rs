//! All shell text funnels through here so styling and plain-mode stay in
//! one place. Labeled lines render as `LABEL: message`; sections as
//! `=== Title ===` headings.

use colored::{Color, Colorize};
use once_cell::sync::Lazy;
use std::fmt;
use std::sync::RwLock;

/// Global output switches, set once at startup from config and flags.
#[derive(Clone, Copy, Debug, Default)]
pub struct OutputPreferences {
    /// Suppress ANSI styling entirely (scripts, pipes, `NO_COLOR`).
    pub plain: bool,
}

static PREFERENCES: Lazy<RwLock<OutputPreferences>> = Lazy::new(RwLock::default);

pub fn set_preferences(prefs: OutputPreferences) {
    if let Ok(mut guard) = PREFERENCES.write() {
        *guard = prefs;
    }
}

pub fn current_preferences() -> OutputPreferences {
    PREFERENCES
        .read()
        .map(|guard| *guard)
        .unwrap_or_default()
}

fn paint(text: String, color: Option<Color>, prefs: &OutputPreferences) -> String {
    match color {
        Some(color) if !prefs.plain => text.color(color).to_string(),
        _ => text,
    }
}

fn emit(label: &str, color: Option<Color>, message: impl fmt::Display) {
    let prefs = current_preferences();
    println!("{}", paint(format!("{label}: {message}"), color, &prefs));
}

pub fn info(message: impl fmt::Display) {
    emit("INFO", None, message);
}

pub fn success(message: impl fmt::Display) {
    emit("SUCCESS", Some(Color::BrightGreen), message);
}

pub fn warning(message: impl fmt::Display) {
    emit("WARNING", Some(Color::BrightYellow), message);
}

pub fn error(message: impl fmt::Display) {
    emit("ERROR", Some(Color::BrightRed), message);
}

pub fn hint(message: impl fmt::Display) {
    emit("HINT", Some(Color::BrightCyan), message);
}

/// `=== Title ===` heading, bold unless plain, preceded by a blank line.
pub fn section(title: impl fmt::Display) {
    let prefs = current_preferences();
    let mut heading = format!("=== {} ===", title.to_string().trim());
    if !prefs.plain {
        heading = heading.bold().to_string();
    }
    println!("\n{heading}");
}

/// Unstyled rule, preceded by a blank line.
pub fn separator() {
    println!("\n{}", "-".repeat(40));
}

/// Plain text line, no label, no styling beyond what the caller baked in.
pub fn line(message: impl fmt::Display) {
    println!("{}", message);
}

pub fn blank_line() {
    println!();
}
