use crate::models::Transition;
use std::fmt;

/// ANSI colors
const RESET: &str = "\x1b[0m";
const BOLD: &str = "\x1b[1m";

const FG_BLUE: &str = "\x1b[34m";
const FG_GREEN: &str = "\x1b[32m";
const FG_YELLOW: &str = "\x1b[33m";

/// Icons
const ICON_INFO: &str = "ℹ️";
const ICON_OK: &str = "✅";
const ICON_WARN: &str = "⚠️";

pub fn info<T: fmt::Display>(msg: T) {
    println!("{}{}{} {}{}", FG_BLUE, BOLD, ICON_INFO, RESET, msg);
}

pub fn success<T: fmt::Display>(msg: T) {
    println!("{}{}{} {}{}", FG_GREEN, BOLD, ICON_OK, RESET, msg);
}

pub fn warning<T: fmt::Display>(msg: T) {
    eprintln!("{}{}{} {}{}", FG_YELLOW, BOLD, ICON_WARN, RESET, msg);
}

fn icon_for(kind: Transition) -> &'static str {
    match kind {
        Transition::CheckIn => "🟢",
        Transition::StartBreak => "☕",
        Transition::EndBreak => "▶️",
        Transition::CheckOut => "🔴",
        Transition::Reset => "🔄",
        Transition::EditNote => "✏️",
    }
}

/// Confirmation line for a committed transition.
pub fn transition<T: fmt::Display>(kind: Transition, msg: T) {
    println!("{}{}{} {}{}", FG_GREEN, BOLD, icon_for(kind), RESET, msg);
}
