//! Ratatui-based terminal UI.
//!
//! Shows the normalized displacement/force curve of one file with the
//! stiffness line, both slope points, the yield point and the peak. The
//! selected point walks along real samples with the arrow keys; the custom
//! slope follows the slope points. `e` appends the current values to the
//! export CSV; `o` opens another file while keeping the rows exported so far.

use std::io;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crossterm::{
    event::{self, Event, KeyCode, KeyEventKind},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::{
    Terminal,
    backend::CrosstermBackend,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span, Text},
    widgets::{Block, Borders, Clear, Paragraph, Row, Table},
};
use tracing::info;

use crate::cli::picker::{discover_rig_files, pretty_path, validate_input_path};
use crate::domain::{AnalysisConfig, Column, CurvePoint, MovablePoint};
use crate::error::{AppError, EXIT_INTERNAL};
use crate::io::export::{DEFAULT_EXPORT_NAME, ExportLog};
use crate::io::ingest::load_raw_input;
use crate::report::{fmt_opt, fmt_point};
use crate::session::Session;

mod plotters_chart;

use plotters_chart::{CurveChart, chart_bounds};

/// Start the TUI on the first input of `config`.
pub fn run(config: &AnalysisConfig) -> Result<(), AppError> {
    let path = config
        .inputs
        .first()
        .ok_or_else(|| AppError::io("No input file given."))?;
    let raw = load_raw_input(path)?;
    let session = Session::load_with_columns(raw, config.x_column, config.y_column);
    let export_path = config
        .export_results
        .clone()
        .unwrap_or_else(|| PathBuf::from(DEFAULT_EXPORT_NAME));

    let _guard = TerminalGuard::new()?;

    let backend = CrosstermBackend::new(io::stdout());
    let mut terminal = Terminal::new(backend)
        .map_err(|e| AppError::new(EXIT_INTERNAL, format!("Failed to initialize terminal: {e}")))?;

    let mut app = App::new(session, export_path, config.x_column, config.y_column);
    app.event_loop(&mut terminal)
}

/// Ensures the terminal is restored (raw mode, alternate screen) on exit.
struct TerminalGuard;

impl TerminalGuard {
    fn new() -> Result<Self, AppError> {
        enable_raw_mode().map_err(|e| AppError::new(EXIT_INTERNAL, format!("Failed to enable raw mode: {e}")))?;
        if let Err(e) = execute!(io::stdout(), EnterAlternateScreen) {
            let _ = disable_raw_mode();
            return Err(AppError::new(
                EXIT_INTERNAL,
                format!("Failed to enter alternate screen: {e}"),
            ));
        }
        Ok(Self)
    }
}

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        let _ = disable_raw_mode();
        let _ = execute!(io::stdout(), LeaveAlternateScreen);
    }
}

/// File list shown by `o`.
struct FilePicker {
    files: Vec<PathBuf>,
    selected: usize,
}

struct App {
    session: Session,
    active: MovablePoint,
    /// Spans every file opened in this run.
    export_log: ExportLog,
    export_path: PathBuf,
    /// Column pair requested on the command line, applied to each opened file.
    x_column: Column,
    y_column: Option<Column>,
    picker: Option<FilePicker>,
    status: String,
}

impl App {
    fn new(session: Session, export_path: PathBuf, x_column: Column, y_column: Option<Column>) -> Self {
        let status = loaded_status(&session);
        Self {
            session,
            active: MovablePoint::PointOne,
            export_log: ExportLog::new(),
            export_path,
            x_column,
            y_column,
            picker: None,
            status,
        }
    }

    fn event_loop<B: ratatui::backend::Backend>(&mut self, terminal: &mut Terminal<B>) -> Result<(), AppError> {
        let mut needs_redraw = true;
        loop {
            if needs_redraw {
                terminal
                    .draw(|f| self.draw(f))
                    .map_err(|e| AppError::new(EXIT_INTERNAL, format!("Terminal draw error: {e}")))?;
                needs_redraw = false;
            }

            if !event::poll(Duration::from_millis(100))
                .map_err(|e| AppError::new(EXIT_INTERNAL, format!("Event poll error: {e}")))?
            {
                continue;
            }

            match event::read().map_err(|e| AppError::new(EXIT_INTERNAL, format!("Event read error: {e}")))? {
                Event::Key(key) => {
                    if key.kind != KeyEventKind::Press {
                        continue;
                    }
                    if self.handle_key(key.code) {
                        break;
                    }
                    needs_redraw = true;
                }
                Event::Resize(_, _) => {
                    needs_redraw = true;
                }
                _ => {}
            }
        }
        Ok(())
    }

    /// Apply one key press; returns `true` to quit.
    fn handle_key(&mut self, code: KeyCode) -> bool {
        if self.picker.is_some() {
            self.handle_picker_key(code);
            return false;
        }
        match code {
            KeyCode::Char('q') | KeyCode::Esc => return true,
            KeyCode::Char('1') => self.select(MovablePoint::PointOne),
            KeyCode::Char('2') => self.select(MovablePoint::PointTwo),
            KeyCode::Char('y') => self.select(MovablePoint::Yield),
            KeyCode::Left => self.step(-1),
            KeyCode::Right => self.step(1),
            KeyCode::Char('h') | KeyCode::PageDown => self.step(-10),
            KeyCode::Char('l') | KeyCode::PageUp => self.step(10),
            KeyCode::Char('r') => {
                self.session.reset();
                self.status = "Points reset.".to_string();
            }
            KeyCode::Char('x') => {
                let a = self.session.analysis();
                let (x, y) = (a.x.next(), a.y);
                self.session.set_columns(x, y);
                self.status = format!("x = {x}");
            }
            KeyCode::Char('c') => {
                let a = self.session.analysis();
                let (x, y) = (a.x, a.y.next());
                self.session.set_columns(x, y);
                self.status = format!("y = {y}");
            }
            KeyCode::Char('e') => self.export(),
            KeyCode::Char('o') => self.show_picker(discover_rig_files(Path::new("."))),
            KeyCode::Char('d') => {
                match crate::debug::write_debug_bundle(std::path::Path::new(crate::debug::DEBUG_DIR), &self.session) {
                    Ok(path) => self.status = format!("Wrote debug bundle: {}", path.display()),
                    Err(err) => self.status = format!("Debug write failed: {err}"),
                }
            }
            _ => {}
        }
        false
    }

    fn show_picker(&mut self, files: Vec<PathBuf>) {
        if files.is_empty() {
            self.status = "No .csv/.txt/.dat files found.".to_string();
            return;
        }
        self.picker = Some(FilePicker { files, selected: 0 });
        self.status = "Enter opens, Esc cancels.".to_string();
    }

    fn handle_picker_key(&mut self, code: KeyCode) {
        let Some(picker) = self.picker.as_mut() else {
            return;
        };
        match code {
            KeyCode::Esc | KeyCode::Char('q') => {
                self.picker = None;
                self.status = "Open canceled.".to_string();
            }
            KeyCode::Up | KeyCode::Char('k') => picker.selected = picker.selected.saturating_sub(1),
            KeyCode::Down | KeyCode::Char('j') => {
                picker.selected = (picker.selected + 1).min(picker.files.len().saturating_sub(1));
            }
            KeyCode::Enter => {
                let chosen = picker.files.get(picker.selected).cloned();
                self.picker = None;
                if let Some(path) = chosen {
                    self.open(&path);
                }
            }
            _ => {}
        }
    }

    /// Replace the session with a freshly analysed file. The export log is kept.
    fn open(&mut self, path: &Path) {
        match validate_input_path(path).and_then(|p| load_raw_input(&p)) {
            Ok(raw) => {
                self.session = Session::load_with_columns(raw, self.x_column, self.y_column);
                self.active = MovablePoint::PointOne;
                self.status = loaded_status(&self.session);
                info!(file = %path.display(), "opened rig file");
            }
            Err(err) => self.status = format!("Open failed: {err}"),
        }
    }

    fn select(&mut self, which: MovablePoint) {
        self.active = which;
        self.status = match self.session.state().point(which) {
            Some(_) => format!("Selected {}.", which.label()),
            None => format!("{} is not available.", which.label()),
        };
    }

    fn step(&mut self, delta: isize) {
        match self.session.step_point(self.active, delta) {
            Some(p) => self.status = format!("{} -> ({:.4}, {:.4})", self.active.label(), p.x, p.y),
            None => self.status = format!("{} is not available.", self.active.label()),
        }
    }

    fn export(&mut self) {
        self.export_log.push(self.session.export_row());
        match self.export_log.write_csv(&self.export_path) {
            Ok(()) => {
                info!(path = %self.export_path.display(), rows = self.export_log.len(), "export written");
                self.status = format!(
                    "Exported {} row(s) to {}",
                    self.export_log.len(),
                    self.export_path.display()
                );
            }
            Err(err) => self.status = format!("Export failed: {err}"),
        }
    }

    fn draw(&self, frame: &mut ratatui::Frame<'_>) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(4), Constraint::Min(0), Constraint::Length(3)])
            .split(frame.area());

        self.draw_header(frame, chunks[0]);

        let body = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Min(0), Constraint::Length(38)])
            .split(chunks[1]);
        self.draw_chart(frame, body[0]);
        self.draw_points(frame, body[1]);

        self.draw_footer(frame, chunks[2]);

        if let Some(picker) = &self.picker {
            draw_picker(frame, picker);
        }
    }

    fn draw_header(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let analysis = self.session.analysis();
        let state = self.session.state();
        let max = analysis.peak.map(|p| p.max_value);

        let lines = vec![
            Line::from(vec![
                Span::styled("rig", Style::default().fg(Color::Cyan)),
                Span::raw(format!(" {} | x: {} | y: {}", self.session.name(), analysis.x, analysis.y)),
            ]),
            Line::from(Span::styled(
                format!(
                    "slope={} | area={:.4} | max={} | n={}{}",
                    fmt_opt(state.custom_slope, 3),
                    analysis.area,
                    fmt_opt(max, 3),
                    analysis.dataset.len(),
                    if state.is_edited() { " | edited" } else { "" },
                ),
                Style::default().fg(Color::Gray),
            )),
        ];
        let p = Paragraph::new(Text::from(lines)).block(Block::default().borders(Borders::ALL));
        frame.render_widget(p, area);
    }

    fn draw_chart(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let block = Block::default().title("Displacement / Force").borders(Borders::ALL);
        let inner = block.inner(area);
        frame.render_widget(block, area);
        frame.render_widget(Clear, inner);

        let series = ChartSeries::from_session(&self.session, self.active);
        let Some((x_bounds, y_bounds)) = chart_bounds(
            series
                .curve
                .iter()
                .chain(series.stiffness.iter())
                .chain(series.custom_dashes.iter()),
        ) else {
            let msg = Paragraph::new("No usable samples.").style(Style::default().fg(Color::Yellow));
            frame.render_widget(msg, inner);
            return;
        };

        let analysis = self.session.analysis();
        let widget = CurveChart {
            curve: &series.curve,
            stiffness: &series.stiffness,
            custom_dashes: &series.custom_dashes,
            slope_points: &series.slope_points,
            yield_point: series.yield_point,
            peak: series.peak,
            active: series.active,
            x_bounds,
            y_bounds,
            x_label: analysis.x.label(),
            y_label: analysis.y.label(),
        };
        frame.render_widget(widget, inner);
    }

    fn draw_points(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let state = self.session.state();
        let rows = [MovablePoint::PointOne, MovablePoint::PointTwo, MovablePoint::Yield]
            .into_iter()
            .map(|which| {
                let style = if which == self.active {
                    Style::default().fg(Color::Black).bg(Color::Yellow)
                } else {
                    Style::default()
                };
                Row::new(vec![which.label().to_string(), fmt_point(state.point(which))]).style(style)
            });

        let table = Table::new(rows, [Constraint::Length(14), Constraint::Min(0)])
            .header(Row::new(vec!["point", "(x, y)"]).style(Style::default().add_modifier(Modifier::BOLD)))
            .block(Block::default().title("Points").borders(Borders::ALL));
        frame.render_widget(table, area);
    }

    fn draw_footer(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let help = "1/2/y select  ←/→ move  r reset  x/c columns  e export  o open  d debug  q quit";
        let line = Line::from(vec![
            Span::styled(help, Style::default().fg(Color::Gray)),
            Span::raw(" | "),
            Span::styled(&self.status, Style::default().fg(Color::Yellow)),
        ]);
        let p = Paragraph::new(line).block(Block::default().borders(Borders::ALL));
        frame.render_widget(p, area);
    }
}

fn loaded_status(session: &Session) -> String {
    match session.analysis().slope {
        Some(_) => format!("Loaded {}.", session.name()),
        None => "No elastic window; slope points unavailable.".to_string(),
    }
}

fn draw_picker(frame: &mut ratatui::Frame<'_>, picker: &FilePicker) {
    let area = frame.area();
    let width = (area.width / 3 * 2).max(20).min(area.width);
    let height = (picker.files.len() as u16 + 2).min(area.height.saturating_sub(2)).max(3);
    let popup = Rect::new(
        area.x + (area.width - width) / 2,
        area.y + area.height.saturating_sub(height) / 2,
        width,
        height.min(area.height),
    );

    let visible = usize::from(popup.height.saturating_sub(2)).max(1);
    let offset = picker.selected.saturating_sub(visible - 1);
    let rows = picker
        .files
        .iter()
        .enumerate()
        .skip(offset)
        .take(visible)
        .map(|(idx, path)| {
            let style = if idx == picker.selected {
                Style::default().fg(Color::Black).bg(Color::Yellow)
            } else {
                Style::default()
            };
            Row::new(vec![pretty_path(path)]).style(style)
        });

    let table = Table::new(rows, [Constraint::Min(0)])
        .block(Block::default().title("Open rig file").borders(Borders::ALL));
    frame.render_widget(Clear, popup);
    frame.render_widget(table, popup);
}

/// Plot-ready series for one frame.
struct ChartSeries {
    curve: Vec<(f64, f64)>,
    stiffness: Vec<(f64, f64)>,
    custom_dashes: Vec<(f64, f64)>,
    slope_points: Vec<(f64, f64)>,
    yield_point: Option<(f64, f64)>,
    peak: Option<(f64, f64)>,
    active: Option<(f64, f64)>,
}

impl ChartSeries {
    fn from_session(session: &Session, active: MovablePoint) -> Self {
        let analysis = session.analysis();
        let state = session.state();
        let xy = |p: CurvePoint| (p.x, p.y);

        let slope_points: Vec<(f64, f64)> = [state.point_one, state.point_two].into_iter().flatten().map(xy).collect();

        // The computed line never moves; edits show up as the dashed segment.
        let stiffness: Vec<(f64, f64)> = analysis
            .slope
            .as_ref()
            .map(|slope| slope.extended.iter().copied().map(xy).collect())
            .unwrap_or_default();
        let custom_dashes = match (state.point_one, state.point_two) {
            (Some(p1), Some(p2)) => dashed_segment(p1, p2),
            _ => Vec::new(),
        };

        Self {
            curve: analysis.curve().collect(),
            stiffness,
            custom_dashes,
            slope_points,
            yield_point: state.yield_point.map(xy),
            peak: analysis.peak.map(|p| (p.max_x, p.max_value)),
            active: state.point(active).map(xy),
        }
    }
}

/// Samples along `p1 -> p2`; two on, two off.
const DASH_SAMPLES: usize = 60;

fn dashed_segment(p1: CurvePoint, p2: CurvePoint) -> Vec<(f64, f64)> {
    (0..=DASH_SAMPLES)
        .filter(|i| i % 4 < 2)
        .map(|i| {
            let t = i as f64 / DASH_SAMPLES as f64;
            (p1.x + t * (p2.x - p1.x), p1.y + t * (p2.y - p1.y))
        })
        .collect()
}
