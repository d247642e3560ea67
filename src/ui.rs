use crate::commands::{cells, today};
use anyhow::Result;
use chrono::{Datelike, NaiveDate};
use crossterm::{
    event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use planboard::config::Settings;
use planboard::dates::{cell_preview, enumerate_days, month_grid, records_for_bucket, BucketUnit};
use planboard::layout::{
    auto_scroll_to_today, bar_geometry, compute_window, header_groups, TimelineWindow,
};
use planboard::storage::{save_dataset, DatasetLocation, DatasetScope};
use planboard::view::{CalendarMode, CalendarView, GanttView};
use planboard::{
    canonical_column_order, group_by_status, Board, Dataset, DragState, Record, RecordKind,
    Status, Tone,
};
use ratatui::{
    backend::CrosstermBackend,
    layout::{Constraint, Direction, Layout},
    prelude::{Alignment, Color, Modifier, Rect, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, List, ListItem, ListState, Paragraph, Wrap},
    Terminal,
};
use std::io::{stdout, Stdout};
use std::time::{Duration, Instant};
use tracing::{info, warn};

const LABEL_WIDTH: u16 = 32;

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
enum ViewMode {
    Board,
    Calendar,
    Gantt,
}

impl ViewMode {
    fn label(&self) -> &'static str {
        match self {
            ViewMode::Board => "Board",
            ViewMode::Calendar => "Calendar",
            ViewMode::Gantt => "Gantt",
        }
    }
}

pub fn run(dataset: Dataset, location: DatasetLocation, settings: Settings) -> Result<()> {
    let mut terminal = setup_terminal()?;
    let mut app = App::new(dataset, location, settings);
    let res = app.event_loop(&mut terminal);
    teardown_terminal(&mut terminal)?;
    res
}

struct App {
    dataset: Dataset,
    location: DatasetLocation,
    settings: Settings,
    today: NaiveDate,
    kind: RecordKind,
    records: Vec<Record>,
    board: Board,
    window: TimelineWindow,
    view: ViewMode,
    selected_column: usize,
    selected_record: usize,
    drag: DragState,
    calendar: CalendarView,
    gantt: GanttView,
    status: String,
    last_save: Instant,
}

impl App {
    fn new(dataset: Dataset, location: DatasetLocation, settings: Settings) -> Self {
        let today = today();
        let gantt = GanttView::new(&settings.zoom);
        let mut app = App {
            dataset,
            location,
            today,
            kind: RecordKind::Task,
            records: Vec::new(),
            board: Board::default(),
            window: TimelineWindow {
                anchor: today,
                start: today,
                end: today,
            },
            view: ViewMode::Board,
            selected_column: 0,
            selected_record: 0,
            drag: DragState::Idle,
            calendar: CalendarView::new(today),
            gantt,
            settings,
            status: "Press 1/2/3 to switch views, t to switch record kind, q to quit".into(),
            last_save: Instant::now(),
        };
        app.refresh();
        app
    }

    fn event_loop(&mut self, terminal: &mut Terminal<CrosstermBackend<Stdout>>) -> Result<()> {
        loop {
            terminal.draw(|f| self.draw(f))?;

            if event::poll(Duration::from_millis(200))? {
                if let Event::Key(key) = event::read()? {
                    if key.kind != KeyEventKind::Press {
                        continue;
                    }
                    if self.handle_key(key) {
                        return Ok(());
                    }
                }
            }
        }
    }

    /// Rebuild everything derived from the dataset for the current kind.
    fn refresh(&mut self) {
        self.records = self.dataset.records(Some(self.kind));
        self.board = group_by_status(&self.records);
        self.window = compute_window(&self.records, &self.settings.layout, self.today);
        self.clamp_selection();
        self.scroll_to_today();
    }

    fn scroll_to_today(&mut self) {
        self.gantt.scroll_offset = auto_scroll_to_today(
            &self.window,
            self.gantt.pixels_per_day,
            self.today,
            self.settings.layout.today_lead_buckets,
            self.gantt.scroll_offset,
        );
    }

    /// Board columns on screen: the non-empty columns plus every status the
    /// current kind allows, so empty columns stay available as drop targets.
    fn columns(&self) -> Vec<Status> {
        let present = self.board.ordered_columns();
        let mut columns: Vec<Status> = canonical_column_order()
            .iter()
            .filter(|s| present.contains(s) || self.kind.allows(s))
            .cloned()
            .collect();
        columns.extend(
            present
                .into_iter()
                .filter(|s| s.rank().is_none())
                .cloned(),
        );
        columns
    }

    fn clamp_selection(&mut self) {
        let columns = self.columns();
        if columns.is_empty() {
            self.selected_column = 0;
            self.selected_record = 0;
            return;
        }
        self.selected_column = self.selected_column.min(columns.len() - 1);
        let len = self.board.column(&columns[self.selected_column]).len();
        self.selected_record = self.selected_record.min(len.saturating_sub(1));
    }

    fn handle_key(&mut self, key: KeyEvent) -> bool {
        if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
            return true;
        }
        match key.code {
            KeyCode::Char('q') => return true,
            KeyCode::Char('1') => self.switch_view(ViewMode::Board),
            KeyCode::Char('2') => self.switch_view(ViewMode::Calendar),
            KeyCode::Char('3') => self.switch_view(ViewMode::Gantt),
            KeyCode::Char('t') if !self.drag.is_dragging() => self.cycle_kind(),
            _ => match self.view {
                ViewMode::Board => self.handle_board_key(key),
                ViewMode::Calendar => self.handle_calendar_key(key),
                ViewMode::Gantt => self.handle_gantt_key(key),
            },
        }
        false
    }

    fn switch_view(&mut self, view: ViewMode) {
        if self.drag.is_dragging() {
            self.drag = std::mem::take(&mut self.drag).end_drag();
            self.status = "Drag cancelled".into();
        }
        self.view = view;
        if view == ViewMode::Gantt {
            self.scroll_to_today();
        }
    }

    fn cycle_kind(&mut self) {
        self.kind = match self.kind {
            RecordKind::Project => RecordKind::WorkPlan,
            RecordKind::WorkPlan => RecordKind::Task,
            RecordKind::Task => RecordKind::Project,
        };
        self.selected_column = 0;
        self.selected_record = 0;
        self.refresh();
        self.status = format!("Showing {}s", self.kind.label());
    }

    fn handle_board_key(&mut self, key: KeyEvent) {
        let columns = self.columns();
        if columns.is_empty() {
            return;
        }
        match key.code {
            KeyCode::Left | KeyCode::Char('h') => self.step_column(&columns, -1),
            KeyCode::Right | KeyCode::Char('l') => self.step_column(&columns, 1),
            KeyCode::Up | KeyCode::Char('k') if !self.drag.is_dragging() => {
                self.selected_record = self.selected_record.saturating_sub(1);
            }
            KeyCode::Down | KeyCode::Char('j') if !self.drag.is_dragging() => {
                let len = self.board.column(&columns[self.selected_column]).len();
                if self.selected_record + 1 < len {
                    self.selected_record += 1;
                }
            }
            KeyCode::Char(' ') if !self.drag.is_dragging() => self.begin_drag(&columns),
            KeyCode::Enter => self.drop_dragged(&columns),
            KeyCode::Esc => {
                if self.drag.is_dragging() {
                    self.drag = std::mem::take(&mut self.drag).end_drag();
                    self.status = "Drag cancelled".into();
                }
            }
            _ => {}
        }
    }

    fn step_column(&mut self, columns: &[Status], delta: isize) {
        let next = (self.selected_column as isize + delta).clamp(0, columns.len() as isize - 1);
        self.selected_column = next as usize;
        if self.drag.is_dragging() {
            let hovered = columns.get(self.selected_column).cloned();
            self.drag = std::mem::take(&mut self.drag).hover_column(hovered);
        } else {
            self.clamp_selection();
        }
    }

    fn begin_drag(&mut self, columns: &[Status]) {
        let from = columns[self.selected_column].clone();
        let Some(record) = self.board.column(&from).get(self.selected_record).cloned() else {
            self.status = "Nothing to move in this column".into();
            return;
        };
        self.status = format!("Moving {}: choose a column and press Enter", record.id());
        self.drag = DragState::begin_drag(record, from.clone()).hover_column(Some(from));
    }

    fn drop_dragged(&mut self, columns: &[Status]) {
        if !self.drag.is_dragging() {
            return;
        }
        let target = self
            .drag
            .hovered()
            .cloned()
            .unwrap_or_else(|| columns[self.selected_column].clone());
        if !self.kind.allows(&target) {
            self.status = format!("{} cannot be {}", self.kind.label(), target.label());
            return;
        }
        let drag = std::mem::take(&mut self.drag);
        let (next, change, drag) = drag.drop_on(&self.board, &target);
        self.drag = drag;
        let Some(change) = change else {
            self.status = "Dropped on the same column".into();
            return;
        };

        let mut updated = self.dataset.clone();
        let persisted = updated
            .apply(&change)
            .map_err(anyhow::Error::from)
            .and_then(|_| save_dataset(&self.location, &updated));
        match persisted {
            Ok(()) => {
                info!(record = %change.record_id, from = %change.from, to = %change.to, "status changed");
                self.dataset = updated;
                self.board = next;
                self.records = self.dataset.records(Some(self.kind));
                self.last_save = Instant::now();
                self.selected_record = self.board.column(&target).len().saturating_sub(1);
                self.status = format!(
                    "Moved {} from {} to {}",
                    change.record_id,
                    change.from.label(),
                    change.to.label()
                );
            }
            Err(err) => {
                warn!(record = %change.record_id, "status change not saved: {:#}", err);
                self.board = group_by_status(&self.records);
                self.status = format!("Move failed, board restored: {:#}", err);
            }
        }
        self.clamp_selection();
    }

    fn handle_calendar_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Left | KeyCode::Char('h') => self.calendar.previous(),
            KeyCode::Right | KeyCode::Char('l') => self.calendar.next(),
            KeyCode::Char('m') => self.calendar.set_mode(CalendarMode::Month),
            KeyCode::Char('w') => self.calendar.set_mode(CalendarMode::Week),
            KeyCode::Char('d') => self.calendar.set_mode(CalendarMode::Day),
            KeyCode::Char('.') => {
                let mode = self.calendar.mode;
                self.calendar = CalendarView::new(self.today);
                self.calendar.set_mode(mode);
            }
            _ => {}
        }
    }

    fn handle_gantt_key(&mut self, key: KeyEvent) {
        let step = self.settings.layout.scroll_step;
        match key.code {
            KeyCode::Left | KeyCode::Char('h') => self.gantt.previous(step),
            KeyCode::Right | KeyCode::Char('l') => self.gantt.next(step),
            KeyCode::Char('+') | KeyCode::Char('=') => {
                self.gantt.zoom_in(&self.settings.zoom);
                self.scroll_to_today();
            }
            KeyCode::Char('-') => {
                self.gantt.zoom_out(&self.settings.zoom);
                self.scroll_to_today();
            }
            KeyCode::Char('m') => {
                let mode = self.gantt.mode.cycle();
                self.gantt.set_mode(mode);
            }
            KeyCode::Char('.') => self.scroll_to_today(),
            _ => {}
        }
    }

    fn draw(&self, f: &mut ratatui::Frame<'_>) {
        let layout = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(2),
                Constraint::Min(5),
                Constraint::Length(4),
            ])
            .split(f.size());

        self.draw_header(f, layout[0]);
        match self.view {
            ViewMode::Board => self.draw_board(f, layout[1]),
            ViewMode::Calendar => self.draw_calendar(f, layout[1]),
            ViewMode::Gantt => self.draw_gantt(f, layout[1]),
        }
        self.draw_footer(f, layout[2]);
    }

    fn draw_header(&self, f: &mut ratatui::Frame<'_>, area: Rect) {
        let scope = match self.location.scope {
            DatasetScope::Project => "project",
            DatasetScope::Global => "global",
            DatasetScope::Explicit => "file",
        };
        let title = Line::from(vec![
            Span::styled(
                "planboard ",
                Style::default()
                    .fg(Color::Cyan)
                    .add_modifier(Modifier::BOLD),
            ),
            Span::styled(
                self.dataset.name.clone(),
                Style::default().add_modifier(Modifier::BOLD),
            ),
            Span::raw("  •  "),
            Span::styled(scope, Style::default().fg(Color::Green)),
            Span::raw("  •  "),
            Span::styled(
                format!("{}", self.location.path.display()),
                Style::default().fg(Color::DarkGray),
            ),
            Span::raw("  •  "),
            Span::styled(
                format!("saved {}", format_elapsed(self.last_save)),
                Style::default().fg(Color::Gray),
            ),
            Span::raw("  •  "),
            Span::styled(
                format!(
                    "{} {}s",
                    self.view.label().to_lowercase(),
                    self.kind.label()
                ),
                Style::default().fg(Color::Magenta),
            ),
        ]);

        let block = Block::default()
            .borders(Borders::BOTTOM)
            .border_style(Style::default().fg(Color::DarkGray));
        let paragraph = Paragraph::new(title)
            .alignment(Alignment::Center)
            .block(block);
        f.render_widget(paragraph, area);
    }

    fn draw_board(&self, f: &mut ratatui::Frame<'_>, area: Rect) {
        let columns = self.columns();
        if columns.is_empty() {
            let msg = Paragraph::new(format!("No {}s yet", self.kind.label()))
                .alignment(Alignment::Center)
                .block(Block::default().borders(Borders::ALL).title("planboard"));
            f.render_widget(Clear, area);
            f.render_widget(msg, area);
            return;
        }

        let chunks = Layout::default()
            .direction(Direction::Horizontal)
            .constraints(
                columns
                    .iter()
                    .map(|_| Constraint::Ratio(1, columns.len() as u32))
                    .collect::<Vec<_>>(),
            )
            .split(area);

        let dragged = match &self.drag {
            DragState::Dragging { record, .. } => Some(record.id().to_string()),
            DragState::Idle => None,
        };
        for (idx, status) in columns.iter().enumerate() {
            let accent = tone_color(status.tone());
            let width = chunks[idx].width.saturating_sub(2) as usize;
            let records = self.board.column(status);
            let items = records
                .iter()
                .map(|record| board_item(record, width, dragged.as_deref() == Some(record.id())))
                .collect::<Vec<_>>();

            let is_selected = idx == self.selected_column;
            let is_target = self.drag.hovered() == Some(status);
            let mut title_style = Style::default().fg(accent).add_modifier(Modifier::BOLD);
            if is_selected {
                title_style = title_style.add_modifier(Modifier::UNDERLINED);
            }
            let border = if is_target {
                Style::default().fg(Color::White).add_modifier(Modifier::BOLD)
            } else {
                Style::default().fg(accent)
            };
            let block = Block::default()
                .title(Span::styled(
                    format!("{} ({})", status.label(), records.len()),
                    title_style,
                ))
                .borders(Borders::ALL)
                .border_style(border);

            let mut state = ListState::default();
            if is_selected && !self.drag.is_dragging() && !records.is_empty() {
                state.select(Some(self.selected_record));
            }
            let list = List::new(items).block(block).highlight_style(
                Style::default()
                    .bg(Color::LightCyan)
                    .fg(Color::Black)
                    .add_modifier(Modifier::BOLD),
            );
            f.render_stateful_widget(list, chunks[idx], &mut state);
        }
    }

    fn draw_calendar(&self, f: &mut ratatui::Frame<'_>, area: Rect) {
        let block = Block::default()
            .title(Span::styled(
                format!("{}  {}", self.calendar.mode.label(), self.calendar.title()),
                Style::default()
                    .fg(Color::Cyan)
                    .add_modifier(Modifier::BOLD),
            ))
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::DarkGray));
        let inner = block.inner(area);
        f.render_widget(block, area);

        match self.calendar.mode {
            CalendarMode::Month => self.draw_month(f, inner),
            CalendarMode::Week | CalendarMode::Day => {
                let days = self.calendar.visible_days(self.today);
                let chunks = Layout::default()
                    .direction(Direction::Horizontal)
                    .constraints(
                        days.iter()
                            .map(|_| Constraint::Ratio(1, days.len() as u32))
                            .collect::<Vec<_>>(),
                    )
                    .split(inner);
                for (bucket, chunk) in days.iter().zip(chunks.iter()) {
                    let date = bucket.date();
                    let heading = Style::default()
                        .fg(if bucket.is_weekend {
                            Color::DarkGray
                        } else {
                            Color::White
                        })
                        .add_modifier(if bucket.is_current {
                            Modifier::BOLD | Modifier::UNDERLINED
                        } else {
                            Modifier::BOLD
                        });
                    let width = chunk.width.saturating_sub(2) as usize;
                    let items = records_for_bucket(&self.records, date)
                        .into_iter()
                        .map(|record| board_item(record, width, false))
                        .collect::<Vec<_>>();
                    let list = List::new(items).block(
                        Block::default()
                            .title(Span::styled(date.format("%a %d").to_string(), heading))
                            .borders(Borders::ALL)
                            .border_style(Style::default().fg(Color::DarkGray)),
                    );
                    f.render_widget(list, *chunk);
                }
            }
        }
    }

    fn draw_month(&self, f: &mut ratatui::Frame<'_>, area: Rect) {
        let grid = month_grid(self.calendar.anchor, self.today);
        let rows = (grid.leading_blanks + grid.days.len()).div_ceil(7);
        let mut constraints = vec![Constraint::Length(1)];
        constraints.extend((0..rows).map(|_| Constraint::Ratio(1, rows as u32)));
        let row_areas = Layout::default()
            .direction(Direction::Vertical)
            .constraints(constraints)
            .split(area);

        let week_cols = |row: Rect| {
            Layout::default()
                .direction(Direction::Horizontal)
                .constraints([Constraint::Ratio(1, 7); 7])
                .split(row)
        };

        for (name, cell) in ["Sun", "Mon", "Tue", "Wed", "Thu", "Fri", "Sat"]
            .iter()
            .zip(week_cols(row_areas[0]).iter())
        {
            let header = Paragraph::new(*name)
                .alignment(Alignment::Center)
                .style(Style::default().fg(Color::Gray).add_modifier(Modifier::BOLD));
            f.render_widget(header, *cell);
        }

        let limit = self.settings.calendar.preview_limit;
        for (idx, bucket) in grid.days.iter().enumerate() {
            let slot = grid.leading_blanks + idx;
            let cell = week_cols(row_areas[1 + slot / 7])[slot % 7];
            let date = bucket.date();
            let preview = cell_preview(records_for_bucket(&self.records, date), limit);
            let width = cell.width.saturating_sub(1) as usize;

            let day_style = if bucket.is_current {
                Style::default()
                    .fg(Color::Black)
                    .bg(Color::LightCyan)
                    .add_modifier(Modifier::BOLD)
            } else if bucket.is_weekend {
                Style::default().fg(Color::DarkGray)
            } else {
                Style::default().fg(Color::White)
            };
            let mut lines = vec![Line::from(Span::styled(
                format!("{:>2}", date.day()),
                day_style,
            ))];
            for record in &preview.shown {
                let tone = record.status().map(Status::tone).unwrap_or(Tone::Gray);
                lines.push(Line::from(Span::styled(
                    truncate_text(&record.title(), width),
                    Style::default().fg(tone_color(tone)),
                )));
            }
            if preview.overflow > 0 {
                lines.push(Line::from(Span::styled(
                    format!("+{} more", preview.overflow),
                    Style::default().fg(Color::DarkGray),
                )));
            }
            f.render_widget(Paragraph::new(lines), cell);
        }
    }

    fn draw_gantt(&self, f: &mut ratatui::Frame<'_>, area: Rect) {
        let block = Block::default()
            .title(Span::styled(
                format!(
                    "{}  {} to {}  {} px/day",
                    self.gantt.mode.label(),
                    self.window.start,
                    self.window.end,
                    self.gantt.pixels_per_day
                ),
                Style::default()
                    .fg(Color::Cyan)
                    .add_modifier(Modifier::BOLD),
            ))
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::DarkGray));
        let inner = block.inner(area);
        f.render_widget(block, area);

        let panes = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Length(LABEL_WIDTH), Constraint::Min(10)])
            .split(inner);

        let header_rows = self.gantt.mode.header_rows();
        let mut labels: Vec<Line> = header_rows.iter().map(|_| Line::from("")).collect();
        labels.extend(self.records.iter().map(|record| {
            Line::from(Span::raw(truncate_text(
                &record.title(),
                LABEL_WIDTH.saturating_sub(1) as usize,
            )))
        }));
        f.render_widget(Paragraph::new(labels), panes[0]);

        let day_cells = cells(self.gantt.pixels_per_day).max(1);
        let mut chart: Vec<Line> = header_rows
            .iter()
            .map(|unit| self.gantt_header(*unit, day_cells))
            .collect();
        for record in &self.records {
            let Some(bar) = bar_geometry(
                record,
                &self.window,
                self.gantt.pixels_per_day,
                self.settings.layout.gutter,
            ) else {
                chart.push(Line::from(""));
                continue;
            };
            let tone = record.status().map(Status::tone).unwrap_or(Tone::Gray);
            let length = cells(bar.length).max(1);
            let mut text = truncate_text(record.id(), length);
            text.push_str(&" ".repeat(length.saturating_sub(text.chars().count())));
            chart.push(Line::from(vec![
                Span::raw(" ".repeat(cells(bar.offset))),
                Span::styled(
                    text,
                    Style::default().fg(Color::Black).bg(tone_color(tone)),
                ),
            ]));
        }
        let scroll_x = u16::try_from(cells(self.gantt.scroll_offset)).unwrap_or(u16::MAX);
        f.render_widget(Paragraph::new(chart).scroll((0, scroll_x)), panes[1]);
    }

    fn gantt_header(&self, unit: BucketUnit, day_cells: usize) -> Line<'static> {
        match unit {
            BucketUnit::Day => Line::from(
                enumerate_days(&self.window, self.today)
                    .into_iter()
                    .map(|bucket| {
                        let style = if bucket.is_current {
                            Style::default().fg(Color::Black).bg(Color::LightCyan)
                        } else if bucket.is_weekend {
                            Style::default().fg(Color::DarkGray)
                        } else {
                            Style::default().fg(Color::Gray)
                        };
                        Span::styled(pad(&bucket.date().day().to_string(), day_cells), style)
                    })
                    .collect::<Vec<_>>(),
            ),
            BucketUnit::Week | BucketUnit::Month => Line::from(
                header_groups(&self.window, unit)
                    .into_iter()
                    .map(|group| {
                        Span::styled(
                            pad(&group.label, group.column_span * day_cells),
                            Style::default()
                                .fg(Color::White)
                                .add_modifier(Modifier::BOLD),
                        )
                    })
                    .collect::<Vec<_>>(),
            ),
        }
    }

    fn draw_footer(&self, f: &mut ratatui::Frame<'_>, area: Rect) {
        let rows = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(2), Constraint::Length(2)])
            .split(area);

        let help_bar = Paragraph::new(self.footer_help_line())
            .alignment(Alignment::Center)
            .block(
                Block::default()
                    .borders(Borders::TOP)
                    .border_style(Style::default().fg(Color::DarkGray)),
            );
        f.render_widget(help_bar, rows[0]);

        let status = Paragraph::new(self.status.clone())
            .wrap(Wrap { trim: true })
            .block(
                Block::default()
                    .borders(Borders::TOP)
                    .border_style(Style::default().fg(Color::DarkGray)),
            );
        f.render_widget(status, rows[1]);
    }

    fn footer_help_line(&self) -> Line<'static> {
        let mut spans = vec![
            Span::styled("1", Style::default().fg(Color::LightCyan)),
            Span::raw(" board  "),
            Span::styled("2", Style::default().fg(Color::LightCyan)),
            Span::raw(" calendar  "),
            Span::styled("3", Style::default().fg(Color::LightCyan)),
            Span::raw(" gantt  "),
            Span::styled("t", Style::default().fg(Color::LightMagenta)),
            Span::raw(" kind  "),
        ];
        match self.view {
            ViewMode::Board if self.drag.is_dragging() => spans.extend([
                Span::styled("← → / h l", Style::default().fg(Color::LightCyan)),
                Span::raw(" target  "),
                Span::styled("Enter", Style::default().fg(Color::LightGreen)),
                Span::raw(" drop  "),
                Span::styled("Esc", Style::default().fg(Color::LightRed)),
                Span::raw(" cancel  "),
            ]),
            ViewMode::Board => spans.extend([
                Span::styled("←↑↓→ / h j k l", Style::default().fg(Color::LightCyan)),
                Span::raw(" move  "),
                Span::styled("Space", Style::default().fg(Color::LightGreen)),
                Span::raw(" pick up  "),
            ]),
            ViewMode::Calendar => spans.extend([
                Span::styled("← → / h l", Style::default().fg(Color::LightCyan)),
                Span::raw(" prev/next  "),
                Span::styled("m w d", Style::default().fg(Color::LightYellow)),
                Span::raw(" month/week/day  "),
                Span::styled(".", Style::default().fg(Color::LightGreen)),
                Span::raw(" today  "),
            ]),
            ViewMode::Gantt => spans.extend([
                Span::styled("← → / h l", Style::default().fg(Color::LightCyan)),
                Span::raw(" scroll  "),
                Span::styled("+ -", Style::default().fg(Color::LightYellow)),
                Span::raw(" zoom  "),
                Span::styled("m", Style::default().fg(Color::LightYellow)),
                Span::raw(" mode  "),
                Span::styled(".", Style::default().fg(Color::LightGreen)),
                Span::raw(" today  "),
            ]),
        }
        spans.extend([
            Span::styled("q", Style::default().fg(Color::LightRed)),
            Span::raw(" quit"),
        ]);
        Line::from(spans)
    }
}

fn setup_terminal() -> Result<Terminal<CrosstermBackend<Stdout>>> {
    enable_raw_mode()?;
    let mut stdout = stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let terminal = Terminal::new(backend)?;
    Ok(terminal)
}

fn teardown_terminal(terminal: &mut Terminal<CrosstermBackend<Stdout>>) -> Result<()> {
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;
    Ok(())
}

fn tone_color(tone: Tone) -> Color {
    match tone {
        Tone::Green => Color::LightGreen,
        Tone::Yellow => Color::LightYellow,
        Tone::Blue => Color::LightBlue,
        Tone::Gray => Color::Gray,
        Tone::Red => Color::LightRed,
        Tone::Purple => Color::LightMagenta,
    }
}

fn board_item(record: &Record, width: usize, dragged: bool) -> ListItem<'static> {
    let title_style = if dragged {
        Style::default()
            .fg(Color::LightYellow)
            .add_modifier(Modifier::BOLD | Modifier::ITALIC)
    } else {
        Style::default().add_modifier(Modifier::BOLD)
    };
    let mut lines = vec![Line::from(Span::styled(
        truncate_text(&record.title(), width),
        title_style,
    ))];

    let mut meta = vec![Span::styled(
        format!("[{}]", record.id()),
        Style::default().fg(Color::DarkGray),
    )];
    if let Some(span) = record.span() {
        meta.push(Span::raw(" "));
        meta.push(Span::styled(
            format!("{} → {}", short_date(span.start), short_date(span.end)),
            Style::default().fg(Color::Gray),
        ));
    }
    if let Some(progress) = record.progress() {
        meta.push(Span::styled(
            format!(" {}%", progress),
            Style::default().fg(Color::LightGreen),
        ));
    }
    lines.push(Line::from(meta));

    let names = record
        .assignees()
        .iter()
        .map(|a| a.name.as_str())
        .collect::<Vec<_>>();
    if !names.is_empty() {
        lines.push(Line::from(Span::styled(
            truncate_text(&names.join(", "), width),
            Style::default().fg(Color::LightBlue),
        )));
    }
    ListItem::new(lines)
}

fn short_date(date: NaiveDate) -> String {
    date.format("%b %d").to_string()
}

fn pad(text: &str, width: usize) -> String {
    let mut out = truncate_text(text, width);
    let count = out.chars().count();
    if count < width {
        out.push_str(&" ".repeat(width - count));
    }
    out
}

fn truncate_text(text: &str, max: usize) -> String {
    if max == 0 {
        return String::new();
    }
    if text.chars().count() <= max {
        return text.to_string();
    }
    if max <= 3 {
        return text.chars().take(max).collect();
    }
    let mut out: String = text.chars().take(max - 3).collect();
    out.push_str("...");
    out
}

fn format_elapsed(last: Instant) -> String {
    let secs = last.elapsed().as_secs();
    if secs < 60 {
        format!("{}s ago", secs)
    } else if secs < 3600 {
        format!("{}m ago", secs / 60)
    } else {
        format!("{}h ago", secs / 3600)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use planboard::storage::load_dataset;
    use pretty_assertions::assert_eq;
    use std::fs;
    use tempfile::TempDir;

    fn press(app: &mut App, code: KeyCode) {
        assert!(!app.handle_key(KeyEvent::new(code, KeyModifiers::NONE)));
    }

    /// Pick up task_3 from "In progress" and drop it one column right,
    /// on "Submitted".
    fn drag_task_3_to_submitted(app: &mut App) {
        press(app, KeyCode::Char('l'));
        assert_eq!(app.columns()[app.selected_column], Status::InProgress);
        press(app, KeyCode::Char(' '));
        assert!(app.drag.is_dragging());
        press(app, KeyCode::Char('l'));
        assert_eq!(app.drag.hovered(), Some(&Status::Submitted));
        press(app, KeyCode::Enter);
    }

    #[test]
    fn failed_save_restores_the_last_saved_board() {
        let dir = TempDir::new().unwrap();
        let blocker = dir.path().join("file");
        fs::write(&blocker, "not a directory").unwrap();
        let dataset = Dataset::sample(None).unwrap();
        let location = DatasetLocation::explicit(blocker.join("data.yml"));
        let mut app = App::new(dataset.clone(), location, Settings::default());

        drag_task_3_to_submitted(&mut app);

        assert_eq!(app.dataset, dataset);
        assert_eq!(
            app.board,
            group_by_status(&dataset.records(Some(RecordKind::Task)))
        );
        assert_eq!(app.drag, DragState::Idle);
        assert!(app.status.starts_with("Move failed, board restored"));
    }

    #[test]
    fn successful_drop_is_saved() {
        let dir = TempDir::new().unwrap();
        let location = DatasetLocation::explicit(dir.path().join("data.yml"));
        let mut app = App::new(
            Dataset::sample(None).unwrap(),
            location.clone(),
            Settings::default(),
        );

        drag_task_3_to_submitted(&mut app);

        assert_eq!(app.drag, DragState::Idle);
        assert_eq!(app.status, "Moved task_3 from In progress to Submitted");
        assert_eq!(
            app.dataset.find("task_3").unwrap().status(),
            Some(&Status::Submitted)
        );
        assert_eq!(app.board.locate("task_3"), Some(&Status::Submitted));
        assert_eq!(load_dataset(&location).unwrap(), app.dataset);
    }

    #[test]
    fn truncate_keeps_short_text_and_marks_cut_text() {
        assert_eq!(truncate_text("Design", 10), "Design");
        assert_eq!(truncate_text("Frontend Development", 10), "Fronten...");
        assert_eq!(truncate_text("abc", 0), "");
    }

    #[test]
    fn pad_fills_to_width() {
        assert_eq!(pad("12", 4), "12  ");
        assert_eq!(pad("March 2025", 4), "M...");
    }
}
