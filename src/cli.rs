use clap::{Parser, Subcommand, ValueEnum};
use planboard::RecordKind;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    name = "planboard",
    version,
    about = "Projects, workplans and tasks on a board, calendar and Gantt chart"
)]
pub struct Cli {
    /// Dataset file to use instead of the nearest .planboard/data.yml
    #[arg(long, global = true)]
    pub data: Option<PathBuf>,

    /// Increase log verbosity (-v debug, -vv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Option<Command>,
}

impl Cli {
    pub fn log_level(&self) -> &'static str {
        match self.verbose {
            0 => "warn",
            1 => "debug",
            _ => "trace",
        }
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
pub enum KindArg {
    Project,
    Workplan,
    Task,
}

impl From<KindArg> for RecordKind {
    fn from(kind: KindArg) -> Self {
        match kind {
            KindArg::Project => RecordKind::Project,
            KindArg::Workplan => RecordKind::WorkPlan,
            KindArg::Task => RecordKind::Task,
        }
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
pub enum CalendarModeArg {
    Month,
    Week,
    Day,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
pub enum GanttModeArg {
    Days,
    Weeks,
    Months,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Initialize a dataset in the current directory (or at --data)
    Init {
        /// Optional dataset name
        #[arg(long)]
        name: Option<String>,
        /// Start without the sample projects
        #[arg(long)]
        empty: bool,
    },
    /// List records
    List {
        /// Only this kind of record
        #[arg(long, value_enum)]
        kind: Option<KindArg>,
        /// Only records with this status
        #[arg(long)]
        status: Option<String>,
        /// Case-insensitive text search on title and description
        #[arg(long)]
        search: Option<String>,
    },
    /// Show records grouped into status columns
    Board {
        #[arg(long, value_enum, default_value = "task")]
        kind: KindArg,
    },
    /// Show a month, week or day of the calendar
    Calendar {
        #[arg(long, value_enum)]
        kind: Option<KindArg>,
        #[arg(long, value_enum, default_value = "month")]
        mode: CalendarModeArg,
        /// Anchor date in YYYY-MM-DD format (defaults to today)
        #[arg(long)]
        date: Option<String>,
    },
    /// Draw records as Gantt bars
    Gantt {
        #[arg(long, value_enum, default_value = "project")]
        kind: KindArg,
        #[arg(long, value_enum, default_value = "days")]
        mode: GanttModeArg,
        /// Pixels per day (clamped to the configured zoom bounds)
        #[arg(long)]
        zoom: Option<u32>,
    },
    /// Move a record to another status column
    Move {
        /// Record id to move
        record_id: String,
        /// Destination status, e.g. IN_PROGRESS
        status: String,
    },
    /// Add a new record
    Add {
        /// Title of the record (or description, for workplans)
        title: String,
        #[arg(long, value_enum, default_value = "task")]
        kind: KindArg,
        #[arg(long)]
        status: Option<String>,
        /// Start date in YYYY-MM-DD format
        #[arg(long)]
        start: Option<String>,
        /// End date in YYYY-MM-DD format
        #[arg(long)]
        end: Option<String>,
        /// Owning project id (required for tasks and workplans)
        #[arg(long)]
        project: Option<String>,
        /// Optional description
        #[arg(long)]
        description: Option<String>,
        /// Assignee names (repeatable, tasks only)
        #[arg(long = "assignee", short = 'a')]
        assignees: Vec<String>,
    },
    /// Dashboard counts
    Summary,
    /// List teams
    Teams,
    /// List project documents
    Documents {
        /// Only documents of this project
        #[arg(long)]
        project: Option<String>,
        /// Only documents attached to this task
        #[arg(long)]
        task: Option<String>,
        /// Only this file type, e.g. pdf
        #[arg(long = "type")]
        file_type: Option<String>,
        /// Case-insensitive text search on name and description
        #[arg(long)]
        search: Option<String>,
    },
    /// Launch the interactive TUI
    Tui,
}
