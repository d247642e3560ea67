use crate::board::StatusChange;
use crate::model::{Department, Document, Project, Record, RecordError, Task, Team, WorkPlan};
use crate::status::{RecordKind, Status};
use crate::summary::Summary;
use anyhow::{Context, Result};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

const SAMPLE: &str = include_str!("../assets/sample.yml");

/// Everything a board, calendar or chart is drawn from.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct Dataset {
    pub name: String,
    #[serde(default)]
    pub projects: Vec<Project>,
    #[serde(default)]
    pub workplans: Vec<WorkPlan>,
    #[serde(default)]
    pub tasks: Vec<Task>,
    #[serde(default)]
    pub teams: Vec<Team>,
    #[serde(default)]
    pub departments: Vec<Department>,
    #[serde(default)]
    pub documents: Vec<Document>,
}

impl Dataset {
    pub fn empty(name: impl Into<String>) -> Self {
        Dataset {
            name: name.into(),
            projects: Vec::new(),
            workplans: Vec::new(),
            tasks: Vec::new(),
            teams: Vec::new(),
            departments: Vec::new(),
            documents: Vec::new(),
        }
    }

    /// A populated dataset to explore the views with.
    pub fn sample(name: Option<String>) -> Result<Self> {
        let mut dataset: Dataset = serde_yaml::from_str(SAMPLE).context("parsing sample dataset")?;
        if let Some(name) = name {
            dataset.name = name;
        }
        Ok(dataset)
    }

    /// Records of one kind, or all of them (projects, workplans, tasks).
    pub fn records(&self, kind: Option<RecordKind>) -> Vec<Record> {
        let wants = |k: RecordKind| kind.map_or(true, |wanted| wanted == k);
        let mut records = Vec::new();
        if wants(RecordKind::Project) {
            records.extend(self.projects.iter().cloned().map(Record::from));
        }
        if wants(RecordKind::WorkPlan) {
            records.extend(self.workplans.iter().cloned().map(Record::from));
        }
        if wants(RecordKind::Task) {
            records.extend(self.tasks.iter().cloned().map(Record::from));
        }
        records
    }

    pub fn find(&self, id: &str) -> Option<Record> {
        self.records(None).into_iter().find(|r| r.id() == id)
    }

    /// Change a record's status after checking it against the kind's
    /// schema.
    pub fn set_status(&mut self, id: &str, status: Status) -> Result<StatusChange, RecordError> {
        let record = self
            .find(id)
            .ok_or_else(|| RecordError::NotFound(id.to_string()))?;
        let kind = record.kind();
        if !kind.allows(&status) {
            return Err(RecordError::StatusNotAllowed { kind, status });
        }
        let change = StatusChange {
            record_id: id.to_string(),
            kind,
            from: record
                .status()
                .cloned()
                .unwrap_or_else(|| kind.default_status()),
            to: status,
        };
        self.apply(&change)?;
        Ok(change)
    }

    /// Write a board move back into the dataset.
    pub fn apply(&mut self, change: &StatusChange) -> Result<(), RecordError> {
        let id = change.record_id.as_str();
        let slot = match change.kind {
            RecordKind::Project => self
                .projects
                .iter_mut()
                .find(|p| p.id == id)
                .map(|p| &mut p.status),
            RecordKind::WorkPlan => self
                .workplans
                .iter_mut()
                .find(|w| w.id == id)
                .map(|w| &mut w.status),
            RecordKind::Task => self
                .tasks
                .iter_mut()
                .find(|t| t.id == id)
                .map(|t| &mut t.status),
        };
        let slot = slot.ok_or_else(|| RecordError::NotFound(id.to_string()))?;
        *slot = Some(change.to.clone());
        Ok(())
    }

    pub fn add_record(&mut self, record: Record) -> Result<(), RecordError> {
        if self.find(record.id()).is_some() {
            return Err(RecordError::DuplicateId(record.id().to_string()));
        }
        match record {
            Record::Project(p) => self.projects.push(p),
            Record::WorkPlan(w) => self.workplans.push(w),
            Record::Task(t) => self.tasks.push(t),
        }
        Ok(())
    }

    pub fn project_title(&self, id: &str) -> Option<&str> {
        self.projects
            .iter()
            .find(|p| p.id == id)
            .map(|p| p.title.as_str())
    }

    /// Documents narrowed by project, task, file type and a text query.
    /// `None` filters match everything.
    pub fn documents(
        &self,
        project: Option<&str>,
        task: Option<&str>,
        file_type: Option<&str>,
        search: Option<&str>,
    ) -> Vec<&Document> {
        self.documents
            .iter()
            .filter(|d| project.map_or(true, |p| d.project_id == p))
            .filter(|d| task.map_or(true, |t| d.task_id.as_deref() == Some(t)))
            .filter(|d| file_type.map_or(true, |ft| d.file_type.eq_ignore_ascii_case(ft)))
            .filter(|d| search.map_or(true, |q| d.matches(q)))
            .collect()
    }

    pub fn summary(&self, today: NaiveDate) -> Summary {
        Summary::compute(&self.projects, &self.workplans, &self.tasks, today)
    }
}
