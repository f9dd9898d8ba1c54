use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BreakCategory {
    Lunch,
    Tea,
    Short,
    Meeting,
    Other,
}

impl BreakCategory {
    pub const ALL: [BreakCategory; 5] = [
        BreakCategory::Lunch,
        BreakCategory::Tea,
        BreakCategory::Short,
        BreakCategory::Meeting,
        BreakCategory::Other,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            BreakCategory::Lunch => "lunch",
            BreakCategory::Tea => "tea",
            BreakCategory::Short => "short",
            BreakCategory::Meeting => "meeting",
            BreakCategory::Other => "other",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "lunch" => Some(BreakCategory::Lunch),
            "tea" | "coffee" => Some(BreakCategory::Tea),
            "short" => Some(BreakCategory::Short),
            "meeting" => Some(BreakCategory::Meeting),
            "other" => Some(BreakCategory::Other),
            _ => None,
        }
    }

    /// Advisory duration in minutes. Only a label: nothing checks a break
    /// against it.
    pub fn nominal_minutes(&self) -> Option<i64> {
        match self {
            BreakCategory::Lunch => Some(60),
            BreakCategory::Tea => Some(15),
            BreakCategory::Short => Some(10),
            BreakCategory::Meeting => Some(30),
            BreakCategory::Other => None,
        }
    }
}

impl fmt::Display for BreakCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
