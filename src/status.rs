//! Status values shared by projects, workplans and tasks.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A record status. Values outside the known set are kept verbatim in
/// `Other` so a dataset written by a newer version still loads.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Status {
    Planning,
    Pending,
    InProgress,
    Active,
    Submitted,
    Approved,
    Rejected,
    OnHold,
    Completed,
    Archived,
    Other(String),
}

/// Color family used when drawing a status badge or bar.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tone {
    Green,
    Yellow,
    Blue,
    Gray,
    Red,
    Purple,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RecordKind {
    Project,
    WorkPlan,
    Task,
}

const CANONICAL_ORDER: [Status; 10] = [
    Status::Planning,
    Status::Pending,
    Status::InProgress,
    Status::Active,
    Status::Submitted,
    Status::Approved,
    Status::Rejected,
    Status::OnHold,
    Status::Completed,
    Status::Archived,
];

/// Left-to-right order of board columns.
pub fn canonical_column_order() -> &'static [Status] {
    &CANONICAL_ORDER
}

impl Status {
    pub fn as_str(&self) -> &str {
        match self {
            Status::Planning => "PLANNING",
            Status::Pending => "PENDING",
            Status::InProgress => "IN_PROGRESS",
            Status::Active => "ACTIVE",
            Status::Submitted => "SUBMITTED",
            Status::Approved => "APPROVED",
            Status::Rejected => "REJECTED",
            Status::OnHold => "ON_HOLD",
            Status::Completed => "COMPLETED",
            Status::Archived => "ARCHIVED",
            Status::Other(raw) => raw,
        }
    }

    pub fn parse(raw: &str) -> Self {
        let normalized = raw.trim().to_ascii_uppercase().replace([' ', '-'], "_");
        match normalized.as_str() {
            "PLANNING" => Status::Planning,
            "PENDING" => Status::Pending,
            "IN_PROGRESS" => Status::InProgress,
            "ACTIVE" => Status::Active,
            "SUBMITTED" => Status::Submitted,
            "APPROVED" => Status::Approved,
            "REJECTED" => Status::Rejected,
            "ON_HOLD" => Status::OnHold,
            "COMPLETED" => Status::Completed,
            "ARCHIVED" => Status::Archived,
            _ => Status::Other(raw.trim().to_string()),
        }
    }

    pub fn tone(&self) -> Tone {
        match self {
            Status::Active | Status::Approved => Tone::Green,
            Status::Planning | Status::Pending => Tone::Yellow,
            Status::OnHold | Status::InProgress => Tone::Blue,
            Status::Completed => Tone::Gray,
            Status::Rejected | Status::Archived => Tone::Red,
            Status::Submitted => Tone::Purple,
            Status::Other(_) => Tone::Gray,
        }
    }

    /// Human label: "IN_PROGRESS" reads "In progress".
    pub fn label(&self) -> String {
        let raw = self.as_str();
        let mut chars = raw.chars();
        match chars.next() {
            Some(first) => {
                let rest = chars.as_str().to_lowercase().replacen('_', " ", 1);
                format!("{}{}", first, rest)
            }
            None => String::new(),
        }
    }

    /// Position in the canonical column order, `None` for unknown statuses.
    pub fn rank(&self) -> Option<usize> {
        CANONICAL_ORDER.iter().position(|s| s == self)
    }
}

impl RecordKind {
    pub fn label(&self) -> &'static str {
        match self {
            RecordKind::Project => "project",
            RecordKind::WorkPlan => "workplan",
            RecordKind::Task => "task",
        }
    }

    pub fn allowed_statuses(&self) -> &'static [Status] {
        const PROJECT: [Status; 5] = [
            Status::Planning,
            Status::Active,
            Status::OnHold,
            Status::Completed,
            Status::Archived,
        ];
        const WORKPLAN: [Status; 3] = [Status::Pending, Status::Approved, Status::Rejected];
        const TASK: [Status; 6] = [
            Status::Pending,
            Status::InProgress,
            Status::Submitted,
            Status::Approved,
            Status::Rejected,
            Status::Completed,
        ];
        match self {
            RecordKind::Project => &PROJECT,
            RecordKind::WorkPlan => &WORKPLAN,
            RecordKind::Task => &TASK,
        }
    }

    pub fn allows(&self, status: &Status) -> bool {
        self.allowed_statuses().contains(status)
    }

    pub fn default_status(&self) -> Status {
        match self {
            RecordKind::Project => Status::Planning,
            RecordKind::WorkPlan | RecordKind::Task => Status::Pending,
        }
    }
}

impl From<String> for Status {
    fn from(raw: String) -> Self {
        Status::parse(&raw)
    }
}

impl From<Status> for String {
    fn from(status: Status) -> Self {
        status.as_str().to_string()
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl fmt::Display for RecordKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}
