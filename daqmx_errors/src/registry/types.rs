//! Registry record types

use serde::{Deserialize, Serialize};
use std::fmt;

/// Broad classification of a driver status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Category {
    Configuration,
    Communication,
    Hardware,
    Software,
    Other,
}

impl Category {
    pub const ALL: [Category; 5] = [
        Category::Configuration,
        Category::Communication,
        Category::Hardware,
        Category::Software,
        Category::Other,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Configuration => "Configuration",
            Category::Communication => "Communication",
            Category::Hardware => "Hardware",
            Category::Software => "Software",
            Category::Other => "Other",
        }
    }

    /// Case-insensitive name match
    pub fn from_str(s: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|c| c.as_str().eq_ignore_ascii_case(s))
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// How urgently a status needs attention
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum ActionRequired {
    Warning,
    ImmediateAction,
    Stall,
}

impl ActionRequired {
    pub const ALL: [ActionRequired; 3] = [
        ActionRequired::Warning,
        ActionRequired::ImmediateAction,
        ActionRequired::Stall,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ActionRequired::Warning => "Warning",
            ActionRequired::ImmediateAction => "ImmediateAction",
            ActionRequired::Stall => "Stall",
        }
    }

    /// Case-insensitive name match
    pub fn from_str(s: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|a| a.as_str().eq_ignore_ascii_case(s))
    }
}

impl fmt::Display for ActionRequired {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Diagnostic metadata for one status code
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ErrorInfo {
    pub category: Category,
    pub action_required: ActionRequired,
    pub description: &'static str,
}

/// One declared table row, duplicates included
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RawEntry {
    pub code: i32,
    pub category: Category,
    pub action_required: ActionRequired,
    pub description: &'static str,
}

impl RawEntry {
    pub fn info(&self) -> ErrorInfo {
        ErrorInfo {
            category: self.category,
            action_required: self.action_required,
            description: self.description,
        }
    }
}
