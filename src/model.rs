use crate::status::{RecordKind, Status};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

pub type RecordId = String;

/// Inclusive calendar span of a record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateSpan {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl DateSpan {
    pub fn new(start: NaiveDate, end: NaiveDate) -> Self {
        DateSpan { start, end }
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        date >= self.start && date <= self.end
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct Project {
    pub id: RecordId,
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub status: Option<Status>,
    #[serde(default)]
    pub start_date: Option<NaiveDate>,
    #[serde(default)]
    pub end_date: Option<NaiveDate>,
    #[serde(default)]
    pub department: Option<String>,
    #[serde(default)]
    pub team: Option<String>,
    #[serde(default)]
    pub progress: u8,
    #[serde(default)]
    pub total_tasks: u32,
    #[serde(default)]
    pub completed_tasks: u32,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct WorkPlan {
    pub id: RecordId,
    pub project_id: RecordId,
    #[serde(default)]
    pub project_title: String,
    pub week_number: u32,
    pub year: i32,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    #[serde(default)]
    pub status: Option<Status>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub tasks_count: u32,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct Assignee {
    pub id: String,
    pub name: String,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct Task {
    pub id: RecordId,
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub status: Option<Status>,
    #[serde(default)]
    pub start_date: Option<NaiveDate>,
    #[serde(default)]
    pub end_date: Option<NaiveDate>,
    pub project_id: RecordId,
    #[serde(default)]
    pub project_title: String,
    #[serde(default)]
    pub workplan_id: Option<RecordId>,
    #[serde(default)]
    pub assignees: Vec<Assignee>,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct Team {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub department: Option<String>,
    #[serde(default)]
    pub members_count: u32,
    #[serde(default)]
    pub projects_count: u32,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct Department {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
}

/// A file attached to a project, and optionally to one of its tasks.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct Document {
    pub id: String,
    pub name: String,
    pub url: String,
    pub file_type: String,
    /// Size in bytes.
    #[serde(default)]
    pub size: u64,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub uploader_id: Option<String>,
    #[serde(default)]
    pub uploader_name: Option<String>,
    pub project_id: RecordId,
    #[serde(default)]
    pub project_title: String,
    #[serde(default)]
    pub task_id: Option<RecordId>,
    #[serde(default)]
    pub task_title: Option<String>,
    pub upload_date: NaiveDate,
}

impl Document {
    /// Case-insensitive match against name and description.
    pub fn matches(&self, query: &str) -> bool {
        let needle = query.to_lowercase();
        self.name.to_lowercase().contains(&needle)
            || self
                .description
                .as_deref()
                .map(|d| d.to_lowercase().contains(&needle))
                .unwrap_or(false)
    }

    /// "512 B", "244.1 KB", "4.3 MB".
    pub fn size_label(&self) -> String {
        if self.size < 1024 {
            return format!("{} B", self.size);
        }
        let kilobytes = self.size as f64 / 1024.0;
        if kilobytes < 1024.0 {
            return format!("{:.1} KB", kilobytes);
        }
        format!("{:.1} MB", kilobytes / 1024.0)
    }
}

/// Anything that can be laid out on a calendar, Gantt chart or board.
#[derive(Debug, Clone, PartialEq)]
pub enum Record {
    Project(Project),
    WorkPlan(WorkPlan),
    Task(Task),
}

#[derive(thiserror::Error, Debug)]
pub enum RecordError {
    #[error("record not found: {0}")]
    NotFound(String),
    #[error("record id already in use: {0}")]
    DuplicateId(String),
    #[error("status {status} is not valid for a {kind}")]
    StatusNotAllowed { kind: RecordKind, status: Status },
}

impl Record {
    pub fn kind(&self) -> RecordKind {
        match self {
            Record::Project(_) => RecordKind::Project,
            Record::WorkPlan(_) => RecordKind::WorkPlan,
            Record::Task(_) => RecordKind::Task,
        }
    }

    pub fn id(&self) -> &str {
        match self {
            Record::Project(p) => &p.id,
            Record::WorkPlan(w) => &w.id,
            Record::Task(t) => &t.id,
        }
    }

    /// Workplans have no title of their own; they borrow the project's and
    /// add the week.
    pub fn title(&self) -> String {
        match self {
            Record::Project(p) => p.title.clone(),
            Record::WorkPlan(w) => format!("{} (week {})", w.project_title, w.week_number),
            Record::Task(t) => t.title.clone(),
        }
    }

    pub fn description(&self) -> Option<&str> {
        match self {
            Record::Project(p) => p.description.as_deref(),
            Record::WorkPlan(w) => w.description.as_deref(),
            Record::Task(t) => t.description.as_deref(),
        }
    }

    pub fn status(&self) -> Option<&Status> {
        match self {
            Record::Project(p) => p.status.as_ref(),
            Record::WorkPlan(w) => w.status.as_ref(),
            Record::Task(t) => t.status.as_ref(),
        }
    }

    pub fn set_status(&mut self, status: Status) {
        match self {
            Record::Project(p) => p.status = Some(status),
            Record::WorkPlan(w) => w.status = Some(status),
            Record::Task(t) => t.status = Some(status),
        }
    }

    /// `None` unless both ends are known.
    pub fn span(&self) -> Option<DateSpan> {
        match self {
            Record::Project(p) => Some(DateSpan::new(p.start_date?, p.end_date?)),
            Record::WorkPlan(w) => Some(DateSpan::new(w.start_date, w.end_date)),
            Record::Task(t) => Some(DateSpan::new(t.start_date?, t.end_date?)),
        }
    }

    pub fn progress(&self) -> Option<u8> {
        match self {
            Record::Project(p) => Some(p.progress),
            Record::WorkPlan(_) | Record::Task(_) => None,
        }
    }

    pub fn assignees(&self) -> &[Assignee] {
        match self {
            Record::Task(t) => &t.assignees,
            Record::Project(_) | Record::WorkPlan(_) => &[],
        }
    }

    /// Case-insensitive match against title and description.
    pub fn matches(&self, query: &str) -> bool {
        let needle = query.to_lowercase();
        self.title().to_lowercase().contains(&needle)
            || self
                .description()
                .map(|d| d.to_lowercase().contains(&needle))
                .unwrap_or(false)
    }
}

impl From<Project> for Record {
    fn from(p: Project) -> Self {
        Record::Project(p)
    }
}

impl From<WorkPlan> for Record {
    fn from(w: WorkPlan) -> Self {
        Record::WorkPlan(w)
    }
}

impl From<Task> for Record {
    fn from(t: Task) -> Self {
        Record::Task(t)
    }
}

#[cfg(test)]
pub(crate) mod fixtures {
    use super::*;

    pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    pub fn task(id: &str, status: Option<Status>, span: Option<(NaiveDate, NaiveDate)>) -> Record {
        Record::Task(Task {
            id: id.into(),
            title: format!("Task {}", id),
            description: None,
            status,
            start_date: span.map(|s| s.0),
            end_date: span.map(|s| s.1),
            project_id: "proj_1".into(),
            project_title: "Agricultural Training Program".into(),
            workplan_id: None,
            assignees: Vec::new(),
        })
    }
}
