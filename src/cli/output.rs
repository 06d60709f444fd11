use std::{fmt, io::IsTerminal};

use colored::Colorize;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MessageKind {
    Info,
    Success,
    Warning,
    Error,
    Hint,
    Section,
}

/// Turns colored output on or off. Colors also stay off when stdout is not a
/// terminal or `NO_COLOR` is set.
pub fn apply_color_preference(enabled: bool) {
    let use_color =
        enabled && std::io::stdout().is_terminal() && std::env::var_os("NO_COLOR").is_none();
    colored::control::set_override(use_color);
}

fn apply_style(kind: MessageKind, message: impl fmt::Display) -> String {
    let formatted = message.to_string();
    match kind {
        MessageKind::Success => formatted.bright_green().to_string(),
        MessageKind::Warning => formatted.bright_yellow().to_string(),
        MessageKind::Error => formatted.bright_red().to_string(),
        MessageKind::Hint => formatted.dimmed().to_string(),
        MessageKind::Section => formatted.bold().to_string(),
        MessageKind::Info => formatted,
    }
}

pub fn print(kind: MessageKind, message: impl fmt::Display) {
    let formatted = apply_style(kind, message);
    match kind {
        MessageKind::Warning | MessageKind::Error | MessageKind::Hint => {
            eprintln!("{}", formatted)
        }
        MessageKind::Section => println!("\n{}", formatted),
        MessageKind::Info | MessageKind::Success => println!("{}", formatted),
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

pub fn hint(message: impl fmt::Display) {
    print(MessageKind::Hint, message);
}

pub fn section(title: impl fmt::Display) {
    print(MessageKind::Section, title);
}

/// Prints an aligned `label: value` line.
pub fn row(label: &str, value: impl fmt::Display, width: usize) {
    println!("  {:<width$}  {}", format!("{label}:"), value, width = width + 1);
}
