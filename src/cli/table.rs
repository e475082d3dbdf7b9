//! Plain-text column layout for listings.
//!
//! Widths are fitted to the widest cell per column, measured by visible
//! characters so styled cells line up with unstyled ones.

use crate::cli::output::{self, current_preferences};

/// Horizontal alignment for a rendered column.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Alignment {
    Left,
    Right,
}

/// Column metadata: header text plus layout constraints.
#[derive(Clone, Debug)]
pub struct TableColumn {
    pub header: String,
    pub max_width: Option<usize>,
    pub alignment: Alignment,
}

impl TableColumn {
    pub fn new(header: impl Into<String>) -> Self {
        Self {
            header: header.into(),
            max_width: None,
            alignment: Alignment::Left,
        }
    }

    /// Right-aligned column, used for amounts and counts.
    pub fn right(header: impl Into<String>) -> Self {
        Self {
            alignment: Alignment::Right,
            ..Self::new(header)
        }
    }

    /// Caps the column width; longer cells are truncated with an ellipsis.
    pub fn capped(mut self, width: usize) -> Self {
        self.max_width = Some(width);
        self
    }
}

/// A small table rendered as aligned text columns with a header rule.
pub struct Table {
    columns: Vec<TableColumn>,
    rows: Vec<Vec<String>>,
}

impl Table {
    pub fn new(columns: Vec<TableColumn>) -> Self {
        Self {
            columns,
            rows: Vec::new(),
        }
    }

    pub fn add_row(&mut self, row: Vec<String>) {
        self.rows.push(row);
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    fn column_widths(&self) -> Vec<usize> {
        let mut widths: Vec<usize> = self
            .columns
            .iter()
            .map(|column| visible_width(&column.header))
            .collect();
        for row in &self.rows {
            for (cell, width) in row.iter().zip(widths.iter_mut()) {
                *width = (*width).max(visible_width(cell));
            }
        }
        for (column, width) in self.columns.iter().zip(widths.iter_mut()) {
            if let Some(cap) = column.max_width {
                *width = (*width).min(cap);
            }
        }
        widths
    }

    fn render_line(&self, cells: &[String], widths: &[usize]) -> String {
        let mut parts = Vec::with_capacity(self.columns.len());
        for (idx, column) in self.columns.iter().enumerate() {
            let text = cells.get(idx).map_or("", String::as_str);
            parts.push(pad_cell(text, widths[idx], column.alignment));
        }
        parts.join("  ").trim_end().to_string()
    }

    /// Renders the table: header row, rule, then data rows.
    pub fn render(&self) -> String {
        let widths = self.column_widths();
        let headers: Vec<String> = self.columns.iter().map(|col| col.header.clone()).collect();
        let mut lines = vec![self.render_line(&headers, &widths), rule_line(&widths)];
        lines.extend(self.rows.iter().map(|row| self.render_line(row, &widths)));
        lines.join("\n")
    }

    /// Prints the rendered table through the shared output layer.
    pub fn print(&self) {
        for line in self.render().lines() {
            output::line(line);
        }
    }
}

/// One lexed unit of a styled string: a visible character, or an ANSI
/// escape sequence that renders at zero width.
enum Piece<'a> {
    Glyph(char),
    Escape(&'a str),
}

struct Pieces<'a> {
    rest: &'a str,
}

impl<'a> Pieces<'a> {
    fn of(text: &'a str) -> Self {
        Self { rest: text }
    }
}

impl<'a> Iterator for Pieces<'a> {
    type Item = Piece<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        let first = self.rest.chars().next()?;
        if first == '\u{1b}' {
            // CSI sequences run through their final byte in `@`..=`~`.
            if let Some(body) = self.rest.strip_prefix("\u{1b}[") {
                let mut len = 2;
                for ch in body.chars() {
                    len += ch.len_utf8();
                    if ('\u{40}'..='\u{7e}').contains(&ch) {
                        break;
                    }
                }
                let (seq, rest) = self.rest.split_at(len);
                self.rest = rest;
                return Some(Piece::Escape(seq));
            }
            // Stray escape byte, emitted as zero-width.
            let (seq, rest) = self.rest.split_at(1);
            self.rest = rest;
            return Some(Piece::Escape(seq));
        }
        self.rest = &self.rest[first.len_utf8()..];
        Some(Piece::Glyph(first))
    }
}

/// Counts visible characters, skipping ANSI escape sequences.
fn visible_width(text: &str) -> usize {
    Pieces::of(text)
        .filter(|piece| matches!(piece, Piece::Glyph(_)))
        .count()
}

fn truncate_text(text: &str, width: usize) -> String {
    if width == 0 {
        return String::new();
    }
    if visible_width(text) <= width {
        return text.to_string();
    }
    if width == 1 {
        return "…".to_string();
    }

    let keep = width - 1;
    let mut shortened = String::new();
    let mut glyphs = 0;
    let mut styled = false;
    for piece in Pieces::of(text) {
        if glyphs == keep {
            break;
        }
        match piece {
            Piece::Glyph(ch) => {
                shortened.push(ch);
                glyphs += 1;
            }
            Piece::Escape(seq) => {
                shortened.push_str(seq);
                styled = true;
            }
        }
    }
    shortened.push('…');
    if styled {
        // Keep the ellipsis from inheriting whatever style was cut off.
        shortened.push_str("\u{1b}[0m");
    }
    shortened
}

fn pad_cell(text: &str, width: usize, alignment: Alignment) -> String {
    let fitted = truncate_text(text, width);
    let pad = " ".repeat(width.saturating_sub(visible_width(&fitted)));
    match alignment {
        Alignment::Left => format!("{fitted}{pad}"),
        Alignment::Right => format!("{pad}{fitted}"),
    }
}

fn rule_line(widths: &[usize]) -> String {
    if widths.is_empty() {
        return String::new();
    }
    let span = widths.iter().sum::<usize>() + 2 * (widths.len() - 1);
    let rule = if current_preferences().plain { "-" } else { "─" };
    rule.repeat(span)
}
