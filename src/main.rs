mod cli;
mod commands;
mod ui;

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::{fmt, EnvFilter};

fn main() -> Result<()> {
    let args = cli::Cli::parse();
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(args.log_level()));
    fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let data = args.data;
    let command = args.command.unwrap_or(cli::Command::Tui);
    match command {
        cli::Command::Init { name, empty } => commands::init(data, name, empty),
        cli::Command::List {
            kind,
            status,
            search,
        } => commands::list(data, kind, status, search),
        cli::Command::Board { kind } => commands::board(data, kind),
        cli::Command::Calendar { kind, mode, date } => commands::calendar(data, kind, mode, date),
        cli::Command::Gantt { kind, mode, zoom } => commands::gantt(data, kind, mode, zoom),
        cli::Command::Move { record_id, status } => commands::move_record(data, record_id, status),
        cli::Command::Add {
            title,
            kind,
            status,
            start,
            end,
            project,
            description,
            assignees,
        } => commands::add(
            data,
            title,
            kind,
            status,
            start,
            end,
            project,
            description,
            assignees,
        ),
        cli::Command::Summary => commands::summary(data),
        cli::Command::Teams => commands::teams(data),
        cli::Command::Documents {
            project,
            task,
            file_type,
            search,
        } => commands::documents(data, project, task, file_type, search),
        cli::Command::Tui => commands::tui(data),
    }
}
