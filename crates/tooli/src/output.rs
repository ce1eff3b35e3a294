//! Console rendering: per-tool status lines and box-drawn tables.

use crossterm::style::{Color, Stylize};
use std::fmt::Write as _;

const SUCCESS_GREEN: Color = Color::Rgb {
    r: 50,
    g: 205,
    b: 50,
};
const WARNING_YELLOW: Color = Color::Rgb {
    r: 181,
    g: 137,
    b: 0,
};
const ERROR_RED: Color = Color::Rgb {
    r: 220,
    g: 50,
    b: 47,
};

/// Severity of a [`Message`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MessageKind {
    /// The tool was installed or removed.
    Success,
    /// Nothing needed doing.
    Info,
    /// Done, but with something the user should look at.
    Warning,
    /// The tool failed.
    Error,
}

/// One result line about one tool.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Message {
    /// Severity.
    pub kind: MessageKind,
    /// Tool the line is about.
    pub tool: String,
    /// Human readable detail.
    pub content: String,
}

impl Message {
    /// Create a message.
    pub fn new(kind: MessageKind, tool: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            kind,
            tool: tool.into(),
            content: content.into(),
        }
    }

    /// Success line.
    pub fn success(tool: impl Into<String>, content: impl Into<String>) -> Self {
        Self::new(MessageKind::Success, tool, content)
    }

    /// Info line.
    pub fn info(tool: impl Into<String>, content: impl Into<String>) -> Self {
        Self::new(MessageKind::Info, tool, content)
    }

    /// Warning line.
    pub fn warning(tool: impl Into<String>, content: impl Into<String>) -> Self {
        Self::new(MessageKind::Warning, tool, content)
    }

    /// Error line.
    pub fn error(tool: impl Into<String>, content: impl Into<String>) -> Self {
        Self::new(MessageKind::Error, tool, content)
    }

    /// The line without colour.
    #[must_use]
    pub fn text(&self) -> String {
        match self.kind {
            MessageKind::Success => format!("{}: {}", self.tool, self.content),
            MessageKind::Info => format!("{}: info: {}", self.tool, self.content),
            MessageKind::Warning => format!("{}: warning: {}", self.tool, self.content),
            MessageKind::Error => format!("{}: error: {}", self.tool, self.content),
        }
    }

    /// Print the line to stdout. Colour is dropped when `NO_COLOR` is set.
    #[allow(clippy::print_stdout)]
    pub fn print(&self) {
        let text = self.text();
        match self.kind {
            MessageKind::Success => println!("{}", text.with(SUCCESS_GREEN)),
            MessageKind::Info => println!("{text}"),
            MessageKind::Warning => println!("{}", text.with(WARNING_YELLOW)),
            MessageKind::Error => println!("{}", text.with(ERROR_RED)),
        }
    }
}

/// Shorten `text` to `max` characters, ending in `...` when cut.
#[must_use]
pub fn truncate(text: &str, max: usize) -> String {
    if text.chars().count() <= max {
        return text.to_string();
    }
    if max <= 3 {
        return ".".repeat(max);
    }
    let kept: String = text.chars().take(max - 3).collect();
    format!("{kept}...")
}

/// Table with `N` columns, drawn with box-drawing characters.
///
/// Column widths follow the widest cell, capped by an optional per-column
/// maximum; longer cells are truncated.
#[derive(Debug, Clone)]
pub struct Table<const N: usize> {
    headers: [String; N],
    rows: Vec<[String; N]>,
    widths: [usize; N],
    max_widths: [Option<usize>; N],
}

impl<const N: usize> Table<N> {
    /// Create a table with the given column headers.
    #[must_use]
    pub fn new(headers: [&str; N]) -> Self {
        let headers = headers.map(str::to_string);
        let mut table = Self {
            headers: headers.clone(),
            rows: Vec::new(),
            widths: [0; N],
            max_widths: [None; N],
        };
        table.update_widths(&headers);
        table
    }

    /// Cap column `column` at `max` characters.
    ///
    /// Out-of-range columns are ignored.
    #[must_use]
    pub fn with_max_width(mut self, column: usize, max: usize) -> Self {
        if column < N {
            self.max_widths[column] = Some(max);
            let headers = self.headers.clone();
            self.widths = [0; N];
            self.update_widths(&headers);
            for row in self.rows.clone() {
                self.update_widths(&row);
            }
        }
        self
    }

    /// Append a row.
    pub fn add_row(&mut self, row: [String; N]) {
        self.update_widths(&row);
        self.rows.push(row);
    }

    /// Number of data rows.
    #[must_use]
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// True if the table has no data rows.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    fn update_widths(&mut self, row: &[String; N]) {
        for (i, cell) in row.iter().enumerate() {
            let mut width = cell.chars().count();
            if let Some(max) = self.max_widths[i] {
                width = width.min(max);
            }
            self.widths[i] = self.widths[i].max(width);
        }
    }

    fn separator(&self, out: &mut String, left: char, middle: char, right: char) {
        let columns: Vec<String> = self.widths.iter().map(|w| "─".repeat(*w)).collect();
        let _ = writeln!(
            out,
            "{left}─{}─{right}",
            columns.join(format!("─{middle}─").as_str())
        );
    }

    fn format_row(&self, out: &mut String, row: &[String; N]) {
        let cells: Vec<String> = row
            .iter()
            .zip(self.widths)
            .map(|(cell, width)| format!("{:<width$}", truncate(cell, width)))
            .collect();
        let _ = writeln!(out, "│ {} │", cells.join(" │ "));
    }

    /// Render the table, one line per row plus borders.
    #[must_use]
    pub fn render(&self) -> String {
        let mut out = String::new();
        self.separator(&mut out, '┌', '┬', '┐');
        self.format_row(&mut out, &self.headers);
        self.separator(&mut out, '├', '┼', '┤');
        for row in &self.rows {
            self.format_row(&mut out, row);
        }
        self.separator(&mut out, '└', '┴', '┘');
        out
    }
}

impl<const N: usize> std::fmt::Display for Table<N> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.render())
    }
}
