use crate::model::{Project, Task, WorkPlan};
use crate::status::Status;
use chrono::{Duration, NaiveDate};

/// Headline numbers for the dashboard.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Summary {
    pub total_projects: usize,
    pub active_projects: usize,
    pub pending_tasks: usize,
    pub upcoming_deadlines: usize,
    pub pending_workplans: usize,
}

const DEADLINE_HORIZON_DAYS: i64 = 7;

impl Summary {
    pub fn compute(
        projects: &[Project],
        workplans: &[WorkPlan],
        tasks: &[Task],
        today: NaiveDate,
    ) -> Self {
        let horizon = today
            .checked_add_signed(Duration::days(DEADLINE_HORIZON_DAYS))
            .unwrap_or(today);
        Summary {
            total_projects: projects.len(),
            active_projects: projects
                .iter()
                .filter(|p| p.status == Some(Status::Active))
                .count(),
            pending_tasks: tasks
                .iter()
                .filter(|t| matches!(t.status, Some(Status::Pending | Status::InProgress)))
                .count(),
            upcoming_deadlines: tasks
                .iter()
                .filter(|t| t.status != Some(Status::Completed))
                .filter_map(|t| t.end_date)
                .filter(|end| *end >= today && *end <= horizon)
                .count(),
            pending_workplans: workplans
                .iter()
                .filter(|w| w.status == Some(Status::Pending))
                .count(),
        }
    }

    /// Share of projects that are active, rounded to a whole percent.
    pub fn active_share(&self) -> u32 {
        if self.total_projects == 0 {
            return 0;
        }
        ((self.active_projects as f64 / self.total_projects as f64) * 100.0).round() as u32
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::fixtures::{date, task};
    use crate::model::Record;
    use pretty_assertions::assert_eq;

    fn as_task(record: Record) -> Task {
        match record {
            Record::Task(t) => t,
            _ => unreachable!(),
        }
    }

    #[test]
    fn counts_match_dashboard_rules() {
        let today = date(2025, 3, 20);
        let tasks = vec![
            as_task(task("a", Some(Status::Pending), Some((date(2025, 3, 18), date(2025, 3, 22))))),
            as_task(task("b", Some(Status::InProgress), Some((date(2025, 3, 18), date(2025, 3, 27))))),
            as_task(task("c", Some(Status::Completed), Some((date(2025, 3, 18), date(2025, 3, 21))))),
            as_task(task("d", Some(Status::Submitted), Some((date(2025, 3, 1), date(2025, 3, 19))))),
            as_task(task("e", Some(Status::Approved), None)),
        ];
        let summary = Summary::compute(&[], &[], &tasks, today);
        assert_eq!(summary.pending_tasks, 2);
        assert_eq!(summary.upcoming_deadlines, 2);
        assert_eq!(summary.active_share(), 0);
    }
}
