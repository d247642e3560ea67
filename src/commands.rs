use crate::cli::{CalendarModeArg, GanttModeArg, KindArg};
use crate::ui;
use anyhow::{anyhow, bail, Context, Result};
use chrono::{Datelike, Local, NaiveDate};
use planboard::config::Settings;
use planboard::dates::{cell_preview, enumerate_days, records_for_bucket, week_number, BucketUnit};
use planboard::layout::{bar_geometry, compute_window, header_groups, TimelineWindow};
use planboard::model::{Assignee, Project, Task, WorkPlan};
use planboard::storage::{
    init_dataset_at, init_project_dataset, load_dataset, locate_dataset, save_dataset,
    DatasetLocation, DatasetScope,
};
use planboard::view::{CalendarMode, CalendarView, GanttMode, GanttView};
use planboard::{group_by_status, Dataset, Record, RecordError, RecordKind, Status};
use rand::{distributions::Alphanumeric, Rng};
use std::env;
use std::path::PathBuf;
use tracing::info;

/// Gantt pixels drawn per terminal cell.
pub const PIXELS_PER_CELL: u32 = 10;
const LABEL_WIDTH: usize = 32;

pub fn init(data: Option<PathBuf>, name: Option<String>, empty: bool) -> Result<()> {
    let location = match data {
        Some(path) => {
            let location = DatasetLocation::explicit(path);
            init_dataset_at(&location, name, empty)?;
            location
        }
        None => init_project_dataset(name, empty)?,
    };
    println!("Initialized dataset at {}", location.path.display());
    Ok(())
}

pub fn list(
    data: Option<PathBuf>,
    kind: Option<KindArg>,
    status: Option<String>,
    search: Option<String>,
) -> Result<()> {
    let (dataset, location, _) = open(data)?;
    println!(
        "Dataset: {} ({})",
        dataset.name,
        match location.scope {
            DatasetScope::Project => "project",
            DatasetScope::Global => "global",
            DatasetScope::Explicit => "file",
        }
    );
    let wanted_status = status.as_deref().map(Status::parse);
    let records: Vec<Record> = dataset
        .records(kind.map(RecordKind::from))
        .into_iter()
        .filter(|r| wanted_status.is_none() || r.status() == wanted_status.as_ref())
        .filter(|r| search.as_deref().map_or(true, |q| r.matches(q)))
        .collect();
    if records.is_empty() {
        println!("  (no matching records)");
    }
    for record in &records {
        print_record(record);
    }
    Ok(())
}

pub fn board(data: Option<PathBuf>, kind: KindArg) -> Result<()> {
    let (dataset, _, _) = open(data)?;
    let board = group_by_status(&dataset.records(Some(kind.into())));
    if board.is_empty() {
        println!("(no records with a status)");
    }
    for status in board.ordered_columns() {
        let column = board.column(status);
        println!("{} ({})", status.label(), column.len());
        for record in column {
            println!("  - {}: {}", record.id(), record.title());
        }
        println!();
    }
    Ok(())
}

pub fn calendar(
    data: Option<PathBuf>,
    kind: Option<KindArg>,
    mode: CalendarModeArg,
    date: Option<String>,
) -> Result<()> {
    let (dataset, _, settings) = open(data)?;
    let today = today();
    let anchor = match date.as_deref() {
        Some(raw) => parse_date(raw)?,
        None => today,
    };
    let records = dataset.records(kind.map(RecordKind::from));
    let mut view = CalendarView::new(anchor);
    view.set_mode(match mode {
        CalendarModeArg::Month => CalendarMode::Month,
        CalendarModeArg::Week => CalendarMode::Week,
        CalendarModeArg::Day => CalendarMode::Day,
    });
    println!("{}", view.title());
    let mut printed = 0;
    for bucket in view.visible_days(today) {
        let items = records_for_bucket(&records, bucket.date());
        if items.is_empty() && view.mode == CalendarMode::Month {
            continue;
        }
        printed += 1;
        println!(
            "{}{}",
            bucket.date().format("%a %Y-%m-%d"),
            if bucket.is_current { " (today)" } else { "" }
        );
        if items.is_empty() {
            println!("  (nothing scheduled)");
            continue;
        }
        let preview = if view.mode == CalendarMode::Month {
            cell_preview(items, settings.calendar.preview_limit)
        } else {
            cell_preview(items, usize::MAX)
        };
        for record in &preview.shown {
            println!(
                "  [{}] {}",
                record.status().map(Status::label).unwrap_or_default(),
                record.title()
            );
        }
        if preview.overflow > 0 {
            println!("  +{} more", preview.overflow);
        }
    }
    if printed == 0 {
        println!("(nothing scheduled)");
    }
    Ok(())
}

pub fn gantt(
    data: Option<PathBuf>,
    kind: KindArg,
    mode: GanttModeArg,
    zoom: Option<u32>,
) -> Result<()> {
    let (dataset, _, settings) = open(data)?;
    let records = dataset.records(Some(kind.into()));
    let window = compute_window(&records, &settings.layout, today());
    let mut view = GanttView::new(&settings.zoom);
    view.set_mode(match mode {
        GanttModeArg::Days => GanttMode::Days,
        GanttModeArg::Weeks => GanttMode::Weeks,
        GanttModeArg::Months => GanttMode::Months,
    });
    if let Some(z) = zoom {
        view.pixels_per_day = z.clamp(settings.zoom.min, settings.zoom.max);
    }
    println!(
        "{} to {} ({} days, {} px/day)",
        window.start,
        window.end,
        window.total_days(),
        view.pixels_per_day
    );
    for line in gantt_lines(&records, &window, &view, &settings) {
        println!("{}", line.trim_end());
    }
    Ok(())
}

/// Plain-text Gantt chart: header rows, then one bar per record.
pub fn gantt_lines(
    records: &[Record],
    window: &TimelineWindow,
    view: &GanttView,
    settings: &Settings,
) -> Vec<String> {
    let day_cells = cells(view.pixels_per_day).max(1);
    let mut lines = Vec::new();
    for unit in view.mode.header_rows() {
        let mut line = " ".repeat(LABEL_WIDTH);
        match unit {
            BucketUnit::Day => {
                for bucket in enumerate_days(window, window.anchor) {
                    line.push_str(&fit(&bucket.date().day().to_string(), day_cells));
                }
            }
            BucketUnit::Week | BucketUnit::Month => {
                for group in header_groups(window, *unit) {
                    line.push_str(&fit(&group.label, group.column_span * day_cells));
                }
            }
        }
        lines.push(line);
    }
    for record in records {
        let mut line = fit(&record.title(), LABEL_WIDTH);
        if let Some(bar) = bar_geometry(record, window, view.pixels_per_day, settings.layout.gutter) {
            line.push_str(&" ".repeat(cells(bar.offset)));
            line.push_str(&"#".repeat(cells(bar.length).max(1)));
        }
        lines.push(line);
    }
    lines
}

pub fn move_record(data: Option<PathBuf>, record_id: String, status: String) -> Result<()> {
    let (mut dataset, location, _) = open(data)?;
    let to = Status::parse(&status);
    let record = dataset
        .find(&record_id)
        .ok_or_else(|| RecordError::NotFound(record_id.clone()))?;
    let kind = record.kind();
    if !kind.allows(&to) {
        return Err(RecordError::StatusNotAllowed { kind, status: to }.into());
    }
    let board = group_by_status(&dataset.records(Some(kind)));
    let change = match board.locate(&record_id) {
        Some(from) => board.move_record(&record, from, &to).1,
        None => Some(dataset.set_status(&record_id, to.clone())?),
    };
    let Some(change) = change else {
        println!("{} is already {}", record_id, to);
        return Ok(());
    };
    dataset
        .apply(&change)
        .with_context(|| format!("moving {} to {}", record_id, to))?;
    save_dataset(&location, &dataset)?;
    info!(record = %record_id, from = %change.from, to = %change.to, "status changed");
    println!("Moved {} from {} to {}", record_id, change.from, change.to);
    Ok(())
}

#[allow(clippy::too_many_arguments)]
pub fn add(
    data: Option<PathBuf>,
    title: String,
    kind: KindArg,
    status: Option<String>,
    start: Option<String>,
    end: Option<String>,
    project: Option<String>,
    description: Option<String>,
    assignees: Vec<String>,
) -> Result<()> {
    let (mut dataset, location, _) = open(data)?;
    let kind = RecordKind::from(kind);
    let status = status
        .as_deref()
        .map(Status::parse)
        .unwrap_or_else(|| kind.default_status());
    if !kind.allows(&status) {
        return Err(RecordError::StatusNotAllowed { kind, status }.into());
    }
    let start = start.as_deref().map(parse_date).transpose()?;
    let end = end.as_deref().map(parse_date).transpose()?;
    let id = generate_id(kind);
    let record = match kind {
        RecordKind::Project => Record::Project(Project {
            id: id.clone(),
            title,
            description,
            status: Some(status),
            start_date: start,
            end_date: end,
            department: None,
            team: None,
            progress: 0,
            total_tasks: 0,
            completed_tasks: 0,
        }),
        RecordKind::WorkPlan => {
            let (project_id, project_title) = owning_project(&dataset, project)?;
            let (Some(start), Some(end)) = (start, end) else {
                bail!("workplans need both --start and --end");
            };
            Record::WorkPlan(WorkPlan {
                id: id.clone(),
                project_id,
                project_title,
                week_number: week_number(start),
                year: start.year(),
                start_date: start,
                end_date: end,
                status: Some(status),
                description: Some(title),
                tasks_count: 0,
            })
        }
        RecordKind::Task => {
            let (project_id, project_title) = owning_project(&dataset, project)?;
            Record::Task(Task {
                id: id.clone(),
                title,
                description,
                status: Some(status),
                start_date: start,
                end_date: end,
                project_id,
                project_title,
                workplan_id: None,
                assignees: assignees
                    .into_iter()
                    .enumerate()
                    .map(|(i, name)| Assignee {
                        id: format!("{}_a{}", id, i + 1),
                        name,
                    })
                    .collect(),
            })
        }
    };
    dataset.add_record(record)?;
    save_dataset(&location, &dataset)?;
    println!("Added {} {}", kind, id);
    Ok(())
}

pub fn summary(data: Option<PathBuf>) -> Result<()> {
    let (dataset, _, _) = open(data)?;
    let summary = dataset.summary(today());
    println!("Dataset: {}", dataset.name);
    println!(
        "Active projects:    {} ({}% of {})",
        summary.active_projects,
        summary.active_share(),
        summary.total_projects
    );
    println!("Pending tasks:      {}", summary.pending_tasks);
    println!("Upcoming deadlines: {}", summary.upcoming_deadlines);
    println!("Pending workplans:  {}", summary.pending_workplans);
    Ok(())
}

pub fn teams(data: Option<PathBuf>) -> Result<()> {
    let (dataset, _, _) = open(data)?;
    if dataset.teams.is_empty() {
        println!("(no teams)");
    }
    for team in &dataset.teams {
        println!("  - {}: {}", team.id, team.name);
        if let Some(department) = &team.department {
            println!("    department: {}", department);
        }
        println!(
            "    {} members, {} projects",
            team.members_count, team.projects_count
        );
    }
    Ok(())
}

pub fn documents(
    data: Option<PathBuf>,
    project: Option<String>,
    task: Option<String>,
    file_type: Option<String>,
    search: Option<String>,
) -> Result<()> {
    let (dataset, _, _) = open(data)?;
    match project.as_deref() {
        Some(id) => println!(
            "Documents: {}",
            dataset
                .project_title(id)
                .ok_or_else(|| RecordError::NotFound(id.to_string()))?
        ),
        None => println!("All documents"),
    }
    let docs = dataset.documents(
        project.as_deref(),
        task.as_deref(),
        file_type.as_deref(),
        search.as_deref(),
    );
    if docs.is_empty() {
        println!("  (no matching documents)");
    }
    for doc in docs {
        println!("  - {} [{}]: {}", doc.id, doc.file_type, doc.name);
        println!("    {}  uploaded {}", doc.size_label(), doc.upload_date);
        match &doc.task_title {
            Some(task) => println!("    {} / {}", doc.project_title, task),
            None => println!("    {}", doc.project_title),
        }
        if let Some(uploader) = &doc.uploader_name {
            println!("    by {}", uploader);
        }
    }
    Ok(())
}

pub fn tui(data: Option<PathBuf>) -> Result<()> {
    let (dataset, location, settings) = open(data)?;
    ui::run(dataset, location, settings)
}

fn open(data: Option<PathBuf>) -> Result<(Dataset, DatasetLocation, Settings)> {
    let location = match data {
        Some(path) => DatasetLocation::explicit(path),
        None => locate_dataset(&env::current_dir()?)?,
    };
    let dataset = load_dataset(&location)?;
    let settings = location.settings()?;
    Ok((dataset, location, settings))
}

fn owning_project(dataset: &Dataset, project: Option<String>) -> Result<(String, String)> {
    let project_id = project.ok_or_else(|| anyhow!("--project is required for this kind"))?;
    let title = dataset
        .project_title(&project_id)
        .ok_or_else(|| RecordError::NotFound(project_id.clone()))?
        .to_string();
    Ok((project_id, title))
}

pub fn today() -> NaiveDate {
    Local::now().date_naive()
}

pub fn cells(pixels: u32) -> usize {
    (pixels / PIXELS_PER_CELL) as usize
}

fn parse_date(raw: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d")
        .map_err(|_| anyhow!("invalid date format (use YYYY-MM-DD): {}", raw))
}

fn generate_id(kind: RecordKind) -> String {
    let prefix = match kind {
        RecordKind::Project => "proj",
        RecordKind::WorkPlan => "wp",
        RecordKind::Task => "task",
    };
    let suffix: String = rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(6)
        .map(char::from)
        .collect();
    format!("{}_{}", prefix, suffix.to_lowercase())
}

/// Pad or cut `text` to exactly `width` characters.
fn fit(text: &str, width: usize) -> String {
    let count = text.chars().count();
    if count >= width {
        let mut cut: String = text.chars().take(width.saturating_sub(1)).collect();
        if width > 0 {
            cut.push(' ');
        }
        cut
    } else {
        format!("{}{}", text, " ".repeat(width - count))
    }
}

fn print_record(record: &Record) {
    println!(
        "  - {} [{}]: {}",
        record.id(),
        record.kind(),
        record.title()
    );
    if let Some(status) = record.status() {
        println!("    status: {}", status.label());
    }
    if let Some(span) = record.span() {
        println!("    dates: {} - {}", span.start, span.end);
    }
    if let Some(progress) = record.progress() {
        println!("    progress: {}%", progress);
    }
    if !record.assignees().is_empty() {
        let names: Vec<&str> = record.assignees().iter().map(|a| a.name.as_str()).collect();
        println!("    assignees: {}", names.join(", "));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fit_pads_and_cuts() {
        assert_eq!(fit("abc", 5), "abc  ");
        assert_eq!(fit("abcdef", 4), "abc ");
        assert_eq!(fit("", 0), "");
    }

    #[test]
    fn gantt_lines_have_one_row_per_record() {
        let dataset = Dataset::sample(None).unwrap();
        let records = dataset.records(Some(RecordKind::WorkPlan));
        let settings = Settings::default();
        let window = compute_window(&records, &settings.layout, today());
        let view = GanttView::new(&settings.zoom);
        let lines = gantt_lines(&records, &window, &view, &settings);
        assert_eq!(lines.len(), 2 + records.len());
        assert!(lines[0].contains("March 2025"));
        // wp_1 starts on the window's 16th day: 15 padding days * 4 cells
        assert!(lines[2].ends_with(&"#".repeat(27)));
        assert_eq!(lines[2].find('#'), Some(LABEL_WIDTH + 60));
    }

    #[test]
    fn generated_ids_carry_kind_prefix() {
        assert!(generate_id(RecordKind::Task).starts_with("task_"));
        assert_eq!(generate_id(RecordKind::WorkPlan).len(), "wp_".len() + 6);
    }
}
