use colored::Colorize;
use std::fmt;

/// Message categories used by the CLI output helpers.
#[derive(Clone, Copy, PartialEq, Eq)]
pub enum MessageKind {
    Info,
    Success,
    Warning,
    Error,
    Section,
}

fn apply_style(kind: MessageKind, message: impl fmt::Display) -> String {
    let text = message.to_string();

    let base = match kind {
        MessageKind::Section => format!("=== {} ===", text.trim()),
        MessageKind::Info => format!("INFO: [i] {text}"),
        MessageKind::Success => format!("SUCCESS: [ok] {text}"),
        MessageKind::Warning => format!("WARNING: [!] {text}"),
        MessageKind::Error => format!("ERROR: [x] {text}"),
    };

    match kind {
        MessageKind::Success => base.bright_green().to_string(),
        MessageKind::Warning => base.bright_yellow().to_string(),
        MessageKind::Error => base.bright_red().to_string(),
        MessageKind::Section => base.bold().to_string(),
        MessageKind::Info => base,
    }
}

pub fn print(kind: MessageKind, message: impl fmt::Display) {
    let formatted = apply_style(kind, message);
    match kind {
        MessageKind::Section => println!("\n{}", formatted),
        _ => println!("{}", formatted),
    }
}

pub fn info(message: impl fmt::Display) {
    print(MessageKind::Info, message);
}

pub fn success(message: impl fmt::Display) {
    print(MessageKind::Success, message);
}

pub fn warning(message: impl fmt::Display) {
    print(MessageKind::Warning, message);
}

pub fn error(message: impl fmt::Display) {
    print(MessageKind::Error, message);
}

pub fn section(title: impl fmt::Display) {
    print(MessageKind::Section, title);
}

/// Renders a plain column-aligned table capped to the terminal width.
pub fn render_table(headers: &[&str], rows: &[Vec<String>]) {
    let columns = headers.len();
    if columns == 0 {
        return;
    }
    let mut widths: Vec<usize> = headers.iter().map(|h| h.chars().count()).collect();
    for row in rows {
        for (index, cell) in row.iter().enumerate().take(columns) {
            widths[index] = widths[index].max(cell.chars().count());
        }
    }

    let terminal_width = crossterm::terminal::size()
        .map(|(w, _)| w as usize)
        .unwrap_or(120);
    let cap = (terminal_width / columns).max(8);
    for width in &mut widths {
        *width = (*width).min(cap);
    }

    let header_line = headers
        .iter()
        .zip(&widths)
        .map(|(header, width)| pad(header, *width))
        .collect::<Vec<_>>()
        .join("  ");
    println!("{}", header_line.bold());
    println!(
        "{}",
        "-".repeat(widths.iter().sum::<usize>() + 2 * (columns - 1))
    );

    for row in rows {
        let line = (0..columns)
            .map(|index| {
                let cell = row.get(index).map(String::as_str).unwrap_or("");
                pad(cell, widths[index])
            })
            .collect::<Vec<_>>()
            .join("  ");
        println!("{}", line);
    }
}

fn pad(text: &str, width: usize) -> String {
    let count = text.chars().count();
    if count > width {
        let truncated: String = text.chars().take(width.saturating_sub(1)).collect();
        format!("{truncated}…")
    } else {
        let mut padded = text.to_string();
        padded.extend(std::iter::repeat(' ').take(width - count));
        padded
    }
}
