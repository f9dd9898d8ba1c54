use serde::{Deserialize, Serialize};
use std::fmt;

/// Where the subject is working from. Informational only: no rule in the
/// session engine depends on it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WorkLocation {
    Office, // O
    Remote, // R
    Home,   // H
    Field,  // F
}

impl WorkLocation {
    pub fn code(&self) -> &'static str {
        match self {
            WorkLocation::Office => "O",
            WorkLocation::Remote => "R",
            WorkLocation::Home => "H",
            WorkLocation::Field => "F",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            WorkLocation::Office => "Office",
            WorkLocation::Remote => "Remote",
            WorkLocation::Home => "Home",
            WorkLocation::Field => "Field",
        }
    }

    /// Convert enum → DB string
    pub fn to_db_str(&self) -> &'static str {
        self.code()
    }

    /// Convert DB string → enum
    pub fn from_db_str(s: &str) -> Option<Self> {
        match s {
            "O" => Some(WorkLocation::Office),
            "R" => Some(WorkLocation::Remote),
            "H" => Some(WorkLocation::Home),
            "F" => Some(WorkLocation::Field),
            _ => None,
        }
    }

    /// Helper: convert input from CLI, either a code (`o`, `R`) or a full
    /// name (`office`, `Home`).
    pub fn from_code(code: &str) -> Option<Self> {
        match code.trim().to_lowercase().as_str() {
            "office" => Some(WorkLocation::Office),
            "remote" => Some(WorkLocation::Remote),
            "home" => Some(WorkLocation::Home),
            "field" => Some(WorkLocation::Field),
            other => WorkLocation::from_db_str(&other.to_uppercase()),
        }
    }
}

impl fmt::Display for WorkLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}
