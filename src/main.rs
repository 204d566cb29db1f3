use std::io;
use std::sync::mpsc;
use std::time::{Duration, Instant};

use crossterm::event::{
    self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEvent, KeyEventKind,
};
use crossterm::execute;
use crossterm::terminal::{
    disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen,
};
use ratatui::layout::{Constraint, Direction, Layout};
use ratatui::prelude::*;
use ratatui::style::{Color, Modifier, Style};
use ratatui::widgets::{Bar, BarChart, BarGroup, Block, Borders, Clear, Paragraph, Row, Table, Tabs};
use serde_json::Value;

use ufc_terminal::api;
use ufc_terminal::feed;
use ufc_terminal::payload;
use ufc_terminal::state::{apply_delta, AppState, Delta, ProviderCommand, Tab};

struct App {
    state: AppState,
    should_quit: bool,
    cmd_tx: mpsc::Sender<ProviderCommand>,
}

impl App {
    fn new(cmd_tx: mpsc::Sender<ProviderCommand>) -> Self {
        Self {
            state: AppState::new(),
            should_quit: false,
            cmd_tx,
        }
    }

    fn send(&mut self, cmd: Option<ProviderCommand>) {
        let Some(cmd) = cmd else {
            return;
        };
        if self.cmd_tx.send(cmd).is_err() {
            self.state.push_log("[WARN] Provider unavailable");
        }
    }

    fn on_key(&mut self, key: KeyEvent) {
        if self.state.search_editing {
            self.on_search_key(key);
            return;
        }
        match key.code {
            KeyCode::Char('q') => self.should_quit = true,
            KeyCode::Char('1') => self.select(Tab::Overview),
            KeyCode::Char('2') => self.select(Tab::FormerChampions),
            KeyCode::Char('3') => self.select(Tab::Performers),
            KeyCode::Char('4') => self.select(Tab::International),
            KeyCode::Char('5') => self.select(Tab::Events),
            KeyCode::Char('6') => self.select(Tab::Advanced),
            KeyCode::Char('7') => self.select(Tab::Search),
            KeyCode::Tab => self.select(self.state.tab.next()),
            KeyCode::BackTab => self.select(self.state.tab.prev()),
            KeyCode::Char('/') => {
                self.select(Tab::Search);
                self.state.search_editing = true;
            }
            KeyCode::Char('s') if self.state.tab == Tab::Performers => {
                self.state.cycle_performer_section();
            }
            KeyCode::Char('j') | KeyCode::Down => self.state.scroll_down(),
            KeyCode::Char('k') | KeyCode::Up => self.state.scroll_up(),
            KeyCode::Char('?') => self.state.help_overlay = !self.state.help_overlay,
            _ => {}
        }
    }

    fn on_search_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Enter => {
                let query = self.state.search_input.clone();
                let cmd = self.state.run_search(&query);
                if cmd.is_some() {
                    self.state.push_log(format!("[INFO] Searching: {}", query.trim()));
                }
                self.send(cmd);
                self.state.search_editing = false;
            }
            KeyCode::Esc => self.state.search_editing = false,
            KeyCode::Backspace => {
                self.state.search_input.pop();
            }
            KeyCode::Char(ch) => self.state.search_input.push(ch),
            _ => {}
        }
    }

    fn select(&mut self, tab: Tab) {
        let cmd = self.state.select_tab(tab);
        self.send(cmd);
    }
}

fn main() -> io::Result<()> {
    let _ = dotenvy::from_filename(".env.local");
    let _ = dotenvy::from_filename(".env");

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = ratatui::backend::CrosstermBackend::new(stdout);
    let mut terminal = ratatui::Terminal::new(backend)?;

    let (tx, rx) = mpsc::channel();
    let (cmd_tx, cmd_rx) = mpsc::channel();
    feed::spawn_provider(tx, cmd_rx);

    let mut app = App::new(cmd_tx);
    app.state
        .push_log(format!("[INFO] Analytics API: {}", api::base_url()));
    for cmd in app.state.startup_commands() {
        let _ = app.cmd_tx.send(cmd);
    }

    let res = run_app(&mut terminal, &mut app, rx);

    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    if let Err(err) = res {
        eprintln!("error: {err}");
    }
    Ok(())
}

fn run_app<B: Backend>(
    terminal: &mut Terminal<B>,
    app: &mut App,
    rx: mpsc::Receiver<Delta>,
) -> io::Result<()> {
    let tick_rate = Duration::from_millis(250);
    let mut last_tick = Instant::now();

    loop {
        while let Ok(delta) = rx.try_recv() {
            apply_delta(&mut app.state, delta);
        }

        terminal.draw(|f| ui(f, app))?;

        let timeout = tick_rate
            .checked_sub(last_tick.elapsed())
            .unwrap_or(Duration::ZERO);
        if event::poll(timeout)? {
            if let Event::Key(key) = event::read()? {
                if key.kind == KeyEventKind::Press {
                    app.on_key(key);
                }
            }
        }

        if last_tick.elapsed() >= tick_rate {
            last_tick = Instant::now();
        }

        if app.should_quit {
            return Ok(());
        }
    }
}

fn ui(frame: &mut Frame, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(2),
            Constraint::Length(1),
            Constraint::Min(1),
            Constraint::Length(5),
            Constraint::Length(1),
        ])
        .split(frame.size());

    render_header(frame, chunks[0], &app.state);
    render_banner(frame, chunks[1], &app.state);
    render_body(frame, chunks[2], &app.state);

    let console = Paragraph::new(console_text(&app.state))
        .block(Block::default().title("Console").borders(Borders::ALL));
    frame.render_widget(console, chunks[3]);

    let footer = Paragraph::new(footer_text(&app.state));
    frame.render_widget(footer, chunks[4]);

    if app.state.help_overlay {
        render_help_overlay(frame, frame.size());
    }
}

fn render_header(frame: &mut Frame, area: Rect, state: &AppState) {
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(1), Constraint::Length(1)])
        .split(area);

    let busy = if state.loading { " | fetching..." } else { "" };
    let title = Paragraph::new(format!("UFC ANALYTICS TERMINAL{busy}"))
        .style(Style::default().add_modifier(Modifier::BOLD));
    frame.render_widget(title, rows[0]);

    let titles: Vec<Line> = Tab::ALL
        .iter()
        .enumerate()
        .map(|(idx, tab)| Line::from(format!("{} {}", idx + 1, tab.title())))
        .collect();
    let selected = Tab::ALL.iter().position(|t| *t == state.tab).unwrap_or(0);
    let tabs = Tabs::new(titles)
        .select(selected)
        .highlight_style(
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD),
        )
        .divider("|");
    frame.render_widget(tabs, rows[1]);
}

fn render_banner(frame: &mut Frame, area: Rect, state: &AppState) {
    if let Some(error) = &state.error {
        let banner = Paragraph::new(error.as_str()).style(Style::default().fg(Color::Red));
        frame.render_widget(banner, area);
    }
}

fn render_body(frame: &mut Frame, area: Rect, state: &AppState) {
    match state.tab {
        Tab::Search => render_search(frame, area, state),
        tab => match state.payload(tab) {
            Some(value) => render_tab(frame, area, state, tab, value),
            None => render_loading(frame, area, tab),
        },
    }
}

fn render_loading(frame: &mut Frame, area: Rect, tab: Tab) {
    let path = tab.endpoint_path().unwrap_or("");
    let placeholder = Paragraph::new(format!("Fetching {path} ..."))
        .style(Style::default().fg(Color::DarkGray));
    frame.render_widget(placeholder, area);
}

fn render_tab(frame: &mut Frame, area: Rect, state: &AppState, tab: Tab, value: &Value) {
    match tab {
        Tab::Overview => render_overview(frame, area, value),
        Tab::FormerChampions => render_former_champions(frame, area, state, value),
        Tab::Performers => render_performers(frame, area, state, value),
        Tab::International => render_international(frame, area, state, value),
        Tab::Events => render_events(frame, area, state, value),
        Tab::Advanced => render_advanced(frame, area, state, value),
        Tab::Search => {}
    }
}

fn render_overview(frame: &mut Frame, area: Rect, value: &Value) {
    let cols = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Length(38), Constraint::Min(30)])
        .split(area);

    let stats = payload::overview_stat_lines(value)
        .into_iter()
        .map(|(label, val)| format!("{label:<22} {val}"))
        .collect::<Vec<_>>()
        .join("\n");
    let stats = Paragraph::new(stats)
        .block(Block::default().title("Database").borders(Borders::ALL));
    frame.render_widget(stats, cols[0]);

    let right = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
        .split(cols[1]);

    render_count_bars(
        frame,
        right[0],
        "Fighter Categories",
        &payload::fighter_category_bars(value),
    );
    render_count_bars(
        frame,
        right[1],
        "Finish Methods",
        &payload::finish_method_bars(value),
    );
}

fn render_performers(frame: &mut Frame, area: Rect, state: &AppState, value: &Value) {
    let section = state.performer_section;
    let rows = payload::fighter_rows(value, &[section.payload_key()]);
    let title = format!("Top Performers [{}] (s to cycle)", section.label());
    render_fighter_table(frame, area, state, &title, &rows);
}

fn render_fighter_table(
    frame: &mut Frame,
    area: Rect,
    state: &AppState,
    title: &str,
    rows: &[payload::FighterRow],
) {
    if rows.is_empty() {
        let empty = Paragraph::new("No fighters in payload")
            .style(Style::default().fg(Color::DarkGray))
            .block(Block::default().title(title.to_string()).borders(Borders::ALL));
        frame.render_widget(empty, area);
        return;
    }

    let header = Row::new(vec!["Fighter", "Record", "Win%", "Finish%", "Fights", "Country", "Tier"])
        .style(Style::default().add_modifier(Modifier::BOLD));
    let body = rows
        .iter()
        .skip(state.scroll as usize)
        .map(|row| {
            Row::new(vec![
                row.name.clone(),
                row.record.clone(),
                format!("{:.1}", row.win_rate),
                format!("{:.1}", row.finish_rate),
                row.total_fights.to_string(),
                row.country.clone(),
                row.category.clone(),
            ])
        })
        .collect::<Vec<_>>();

    let table = Table::new(
        body,
        [
            Constraint::Min(22),
            Constraint::Length(9),
            Constraint::Length(7),
            Constraint::Length(8),
            Constraint::Length(7),
            Constraint::Length(16),
            Constraint::Length(12),
        ],
    )
    .header(header)
    .block(Block::default().title(title.to_string()).borders(Borders::ALL));
    frame.render_widget(table, area);
}

fn render_international(frame: &mut Frame, area: Rect, state: &AppState, value: &Value) {
    let cols = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Min(46), Constraint::Length(34)])
        .split(area);

    let rows = payload::country_rows(value);
    if rows.is_empty() {
        let empty = Paragraph::new("No country data in payload")
            .style(Style::default().fg(Color::DarkGray))
            .block(Block::default().title("Country Performance").borders(Borders::ALL));
        frame.render_widget(empty, cols[0]);
    } else {
        let header = Row::new(vec!["Country", "Fighters", "Avg Win%", "Wins", "Fights"])
            .style(Style::default().add_modifier(Modifier::BOLD));
        let body = rows
            .iter()
            .skip(state.scroll as usize)
            .map(|row| {
                Row::new(vec![
                    row.country.clone(),
                    row.fighter_count.to_string(),
                    format!("{:.1}", row.avg_win_rate),
                    row.total_wins.to_string(),
                    row.total_fights.to_string(),
                ])
            })
            .collect::<Vec<_>>();
        let table = Table::new(
            body,
            [
                Constraint::Min(18),
                Constraint::Length(9),
                Constraint::Length(9),
                Constraint::Length(7),
                Constraint::Length(7),
            ],
        )
        .header(header)
        .block(Block::default().title("Country Performance").borders(Borders::ALL));
        frame.render_widget(table, cols[0]);
    }

    let mut distribution = payload::country_distribution_bars(value);
    distribution.truncate(10);
    render_count_bars(frame, cols[1], "Fighters by Country", &distribution);
}

fn render_events(frame: &mut Frame, area: Rect, state: &AppState, value: &Value) {
    let rows_areas = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(8), Constraint::Length(10)])
        .split(area);

    let events = payload::recent_event_rows(value);
    let title = format!("Recent Events ({} total)", payload::total_events(value));
    if events.is_empty() {
        let empty = Paragraph::new("No events in payload")
            .style(Style::default().fg(Color::DarkGray))
            .block(Block::default().title(title).borders(Borders::ALL));
        frame.render_widget(empty, rows_areas[0]);
    } else {
        let header = Row::new(vec!["Event", "Date", "Location"])
            .style(Style::default().add_modifier(Modifier::BOLD));
        let body = events
            .iter()
            .skip(state.scroll as usize)
            .map(|event| {
                Row::new(vec![
                    event.title.clone(),
                    event.date.clone(),
                    event.location.clone(),
                ])
            })
            .collect::<Vec<_>>();
        let table = Table::new(
            body,
            [
                Constraint::Min(28),
                Constraint::Length(12),
                Constraint::Min(24),
            ],
        )
        .header(header)
        .block(Block::default().title(title).borders(Borders::ALL));
        frame.render_widget(table, rows_areas[0]);
    }

    let mut by_year = payload::events_by_year_bars(value);
    // Keep the most recent years when the chart area is narrow.
    let max_years = (rows_areas[1].width / 6).max(4) as usize;
    if by_year.len() > max_years {
        by_year.drain(..by_year.len() - max_years);
    }
    render_count_bars(frame, rows_areas[1], "Events by Year", &by_year);
}

fn render_advanced(frame: &mut Frame, area: Rect, state: &AppState, value: &Value) {
    let cols = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Length(44), Constraint::Min(30)])
        .split(area);

    let left = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(8), Constraint::Min(6)])
        .split(cols[0]);

    let mut age_lines = Vec::new();
    if let Some(avg) = payload::average_age(value) {
        age_lines.push(format!("Average age: {avg:.1}"));
    }
    for row in payload::age_group_rows(value) {
        age_lines.push(format!(
            "{:<6} {:>4} fighters  {:>5.1}% win",
            row.group, row.count, row.avg_win_rate
        ));
    }
    if age_lines.is_empty() {
        age_lines.push("No age analytics in payload".to_string());
    }
    let ages = Paragraph::new(age_lines.join("\n"))
        .block(Block::default().title("Age Groups").borders(Borders::ALL));
    frame.render_widget(ages, left[0]);

    let weight_rows = payload::weight_class_rows(value);
    if weight_rows.is_empty() {
        let empty = Paragraph::new("No weight class data")
            .style(Style::default().fg(Color::DarkGray))
            .block(Block::default().title("Weight Classes").borders(Borders::ALL));
        frame.render_widget(empty, left[1]);
    } else {
        let header = Row::new(vec!["Class", "Fighters", "Win%", "Finish%"])
            .style(Style::default().add_modifier(Modifier::BOLD));
        let body = weight_rows
            .iter()
            .map(|row| {
                Row::new(vec![
                    row.weight_class.clone(),
                    row.fighter_count.to_string(),
                    format!("{:.1}", row.avg_win_rate),
                    format!("{:.1}", row.avg_finish_rate),
                ])
            })
            .collect::<Vec<_>>();
        let table = Table::new(
            body,
            [
                Constraint::Min(17),
                Constraint::Length(9),
                Constraint::Length(7),
                Constraint::Length(8),
            ],
        )
        .header(header)
        .block(Block::default().title("Weight Classes").borders(Borders::ALL));
        frame.render_widget(table, left[1]);
    }

    let finishers = payload::fighter_rows(value, &["performance_trends", "high_finishers"]);
    render_fighter_table(frame, cols[1], state, "High Finishers", &finishers);
}

fn render_former_champions(frame: &mut Frame, area: Rect, state: &AppState, value: &Value) {
    let cols = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Length(36), Constraint::Min(40)])
        .split(area);

    let summary = payload::champion_summary_lines(value)
        .into_iter()
        .map(|(label, val)| format!("{label:<24} {val}"))
        .collect::<Vec<_>>()
        .join("\n");
    let summary = Paragraph::new(summary)
        .block(Block::default().title("After the Belt").borders(Borders::ALL));
    frame.render_widget(summary, cols[0]);

    let rows = payload::champion_rows(value);
    if rows.is_empty() {
        let empty = Paragraph::new("No champions in payload")
            .style(Style::default().fg(Color::DarkGray))
            .block(Block::default().title("Former Champions").borders(Borders::ALL));
        frame.render_widget(empty, cols[1]);
        return;
    }

    let header = Row::new(vec!["Champion", "Post-belt", "Win%", "Division", "Lost belt to"])
        .style(Style::default().add_modifier(Modifier::BOLD));
    let body = rows
        .iter()
        .skip(state.scroll as usize)
        .map(|row| {
            Row::new(vec![
                row.name.clone(),
                row.record.clone(),
                format!("{:.1}", row.win_pct),
                row.weight_class.clone(),
                row.lost_to.clone(),
            ])
        })
        .collect::<Vec<_>>();
    let table = Table::new(
        body,
        [
            Constraint::Min(20),
            Constraint::Length(10),
            Constraint::Length(7),
            Constraint::Length(16),
            Constraint::Min(18),
        ],
    )
    .header(header)
    .block(Block::default().title("Former Champions").borders(Borders::ALL));
    frame.render_widget(table, cols[1]);
}

fn render_search(frame: &mut Frame, area: Rect, state: &AppState) {
    let rows_areas = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(3), Constraint::Min(1)])
        .split(area);

    let prompt = if state.search_editing {
        format!("> {}_", state.search_input)
    } else if state.search_input.is_empty() {
        "Press / to type a fighter name, Enter to search".to_string()
    } else {
        format!("> {}", state.search_input)
    };
    let input = Paragraph::new(prompt)
        .block(Block::default().title("Fighter Search").borders(Borders::ALL));
    frame.render_widget(input, rows_areas[0]);

    let Some(result) = &state.search_result else {
        let hint = Paragraph::new("No search yet").style(Style::default().fg(Color::DarkGray));
        frame.render_widget(hint, rows_areas[1]);
        return;
    };

    let rows = payload::search_rows(result);
    let title = format!(
        "Results for \"{}\" ({} found)",
        state.search_query,
        payload::search_total(result)
    );
    if rows.is_empty() {
        let empty = Paragraph::new("No fighters matched")
            .style(Style::default().fg(Color::DarkGray))
            .block(Block::default().title(title).borders(Borders::ALL));
        frame.render_widget(empty, rows_areas[1]);
        return;
    }

    let header = Row::new(vec!["Fighter", "Record", "Win%", "Country", "Weight"])
        .style(Style::default().add_modifier(Modifier::BOLD));
    let body = rows
        .iter()
        .map(|row| {
            let weight = row
                .weight_lbs
                .map(|w| format!("{w:.0} lbs"))
                .unwrap_or_else(|| "-".to_string());
            Row::new(vec![
                row.name.clone(),
                row.record.clone(),
                format!("{:.1}", row.win_rate),
                row.country.clone(),
                weight,
            ])
        })
        .collect::<Vec<_>>();
    let table = Table::new(
        body,
        [
            Constraint::Min(22),
            Constraint::Length(10),
            Constraint::Length(7),
            Constraint::Length(16),
            Constraint::Length(9),
        ],
    )
    .header(header)
    .block(Block::default().title(title).borders(Borders::ALL));
    frame.render_widget(table, rows_areas[1]);
}

fn render_count_bars(frame: &mut Frame, area: Rect, title: &str, bars: &[(String, u64)]) {
    if bars.is_empty() {
        let empty = Paragraph::new("No data")
            .style(Style::default().fg(Color::DarkGray))
            .block(Block::default().title(title.to_string()).borders(Borders::ALL));
        frame.render_widget(empty, area);
        return;
    }

    let built: Vec<Bar> = bars
        .iter()
        .map(|(label, count)| {
            Bar::default()
                .value(*count)
                .label(Line::from(truncate_label(label)))
                .style(Style::default().fg(Color::Cyan))
        })
        .collect();
    let chart = BarChart::default()
        .data(BarGroup::default().bars(&built))
        .bar_width(5)
        .bar_gap(1)
        .block(Block::default().title(title.to_string()).borders(Borders::ALL));
    frame.render_widget(chart, area);
}

fn truncate_label(label: &str) -> String {
    let mut short: String = label.chars().take(5).collect();
    if label.chars().count() > 5 {
        short.pop();
        short.push('.');
    }
    short
}

fn console_text(state: &AppState) -> String {
    if state.logs.is_empty() {
        return "No activity yet".to_string();
    }
    state
        .logs
        .iter()
        .rev()
        .take(3)
        .cloned()
        .collect::<Vec<_>>()
        .into_iter()
        .rev()
        .collect::<Vec<_>>()
        .join("\n")
}

fn footer_text(state: &AppState) -> String {
    if state.search_editing {
        return "Type query | Enter Search | Esc Cancel".to_string();
    }
    match state.tab {
        Tab::Performers => {
            "1-7 Tabs | Tab/Shift-Tab Cycle | s Section | j/k Scroll | / Search | ? Help | q Quit"
                .to_string()
        }
        Tab::Search => "1-7 Tabs | / Type query | Enter Search | ? Help | q Quit".to_string(),
        _ => "1-7 Tabs | Tab/Shift-Tab Cycle | j/k Scroll | / Search | ? Help | q Quit".to_string(),
    }
}

fn render_help_overlay(frame: &mut Frame, area: Rect) {
    let popup_area = centered_rect(60, 60, area);
    frame.render_widget(Clear, popup_area);

    let text = [
        "UFC Analytics Terminal - Help",
        "",
        "Tabs:",
        "  1  Overview          5  Events",
        "  2  Ex-Champions      6  Advanced",
        "  3  Top Performers    7  Search",
        "  4  International",
        "",
        "Keys:",
        "  Tab / Shift-Tab   Cycle tabs",
        "  j/k or ↑/↓        Scroll",
        "  s                 Cycle performer section",
        "  /                 Search fighters",
        "  ?                 Toggle help",
        "  q                 Quit",
        "",
        "Payloads are fetched once per tab and kept for the session.",
        "A failed tab retries the next time you open it.",
    ]
    .join("\n");

    let help = Paragraph::new(text)
        .block(Block::default().title("Help").borders(Borders::ALL))
        .style(Style::default());
    frame.render_widget(help, popup_area);
}

fn centered_rect(percent_x: u16, percent_y: u16, area: Rect) -> Rect {
    let vertical = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(area);

    let horizontal = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(vertical[1]);

    horizontal[1]
}
