//! Colored terminal output for `envcmd` commands
//!
//! `colored` honours NO_COLOR and CLICOLOR_FORCE.

use std::fmt::Display;

use colored::Colorize;

use crate::domain::Value;

/// `error: <msg>` on stderr, prefix red bold
pub fn error(msg: &(impl Display + ?Sized)) {
    eprintln!("{}: {}", "error".red().bold(), msg);
}

/// `Warning: <msg>` on stderr
pub fn warning(msg: &(impl Display + ?Sized)) {
    eprintln!("{}: {}", "Warning".yellow(), msg);
}

pub fn success(msg: &(impl Display + ?Sized)) {
    println!("{} {}", "✓".green(), msg);
}

pub fn header(msg: &(impl Display + ?Sized)) {
    println!("{}", msg.to_string().cyan().bold());
}

/// One bound field: `  path = value`; empty strings and lists shown dimmed as `(empty)`.
pub fn binding(path: &str, value: &Value) {
    let empty = match value {
        Value::Str(s) => s.is_empty(),
        Value::List(items) => items.is_empty(),
        _ => false,
    };
    if empty {
        println!("  {} = {}", path.bold(), "(empty)".dimmed());
    } else {
        println!("  {} = {}", path.bold(), value);
    }
}

pub fn detail(msg: &(impl Display + ?Sized)) {
    println!("  {}", msg);
}

/// Uncolored, for output meant to be piped or sourced
pub fn info(msg: &(impl Display + ?Sized)) {
    println!("{}", msg);
}
