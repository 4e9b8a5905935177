//! Ratatui-based terminal UI.
//!
//! The TUI shows the two-line prediction title, the CO2 chart, and a settings
//! panel with the six controls. Hidden segment controls are neither drawn nor
//! focusable.

use std::io;
use std::time::Duration;

use crossterm::{
    event::{self, Event, KeyCode, KeyEventKind},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::{
    Terminal,
    backend::CrosstermBackend,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span, Text},
    widgets::{Block, Borders, Clear, Paragraph},
};
use tracing::{debug, info};

use crate::controls::{ControlEvent, ControlId, RadioGroup, Slider};
use crate::domain::Segment;
use crate::error::AppError;
use crate::view::{Figure, TraceColor, ViewController, segment_visible};

mod plotters_chart;

use plotters_chart::{Co2PlottersChart, clip_points, clip_polyline};

/// Steps moved by PgUp/PgDn.
const COARSE_STEPS: i32 = 10;

/// Start the TUI.
pub fn run(controller: ViewController<Figure>) -> Result<(), AppError> {
    let _guard = TerminalGuard::new()?;

    let backend = CrosstermBackend::new(io::stdout());
    let mut terminal =
        Terminal::new(backend).map_err(|e| AppError::runtime(format!("Failed to initialize terminal: {e}")))?;

    info!(observations = controller.data().observations.len(), "starting TUI");
    let mut app = App::new(controller);
    app.event_loop(&mut terminal)
}

/// Ensures the terminal is restored (raw mode, alternate screen) on exit.
struct TerminalGuard;

impl TerminalGuard {
    fn new() -> Result<Self, AppError> {
        enable_raw_mode().map_err(|e| AppError::runtime(format!("Failed to enable raw mode: {e}")))?;
        if let Err(e) = execute!(io::stdout(), EnterAlternateScreen) {
            let _ = disable_raw_mode();
            return Err(AppError::runtime(format!("Failed to enter alternate screen: {e}")));
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

struct App {
    controller: ViewController<Figure>,
    /// Index into `ControlId::ALL`.
    focus: usize,
    status: String,
}

impl App {
    fn new(controller: ViewController<Figure>) -> Self {
        let mut app = Self {
            controller,
            focus: 0,
            status: "Ready.".to_string(),
        };
        app.ensure_focus_visible();
        app
    }

    fn event_loop<B: ratatui::backend::Backend>(&mut self, terminal: &mut Terminal<B>) -> Result<(), AppError> {
        let mut needs_redraw = true;
        loop {
            if needs_redraw {
                terminal
                    .draw(|f| self.draw(f))
                    .map_err(|e| AppError::runtime(format!("Terminal draw error: {e}")))?;
                needs_redraw = false;
            }

            if !event::poll(Duration::from_millis(100))
                .map_err(|e| AppError::runtime(format!("Event poll error: {e}")))?
            {
                continue;
            }

            match event::read().map_err(|e| AppError::runtime(format!("Event read error: {e}")))? {
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

    fn focused(&self) -> ControlId {
        ControlId::ALL[self.focus]
    }

    fn is_visible(&self, id: ControlId) -> bool {
        let range = self.controller.controls().range().value();
        id.segment().is_none_or(|s| segment_visible(range, s))
    }

    /// Visible controls in focus order.
    fn visible_controls(&self) -> Vec<ControlId> {
        ControlId::ALL.into_iter().filter(|&id| self.is_visible(id)).collect()
    }

    fn ensure_focus_visible(&mut self) {
        if self.is_visible(self.focused()) {
            return;
        }
        if let Some(idx) = ControlId::ALL.iter().position(|&id| self.is_visible(id)) {
            self.focus = idx;
        }
    }

    fn move_focus(&mut self, delta: isize) {
        let visible = self.visible_controls();
        let Some(pos) = visible.iter().position(|&id| id == self.focused()) else {
            self.ensure_focus_visible();
            return;
        };
        let next = (pos as isize + delta).clamp(0, visible.len() as isize - 1) as usize;
        if let Some(idx) = ControlId::ALL.iter().position(|&id| id == visible[next]) {
            self.focus = idx;
        }
    }

    /// Returns `true` when the app should quit.
    fn handle_key(&mut self, code: KeyCode) -> bool {
        debug!(?code, "key");
        match code {
            KeyCode::Char('q') | KeyCode::Esc => return true,
            KeyCode::Up => self.move_focus(-1),
            KeyCode::Down => self.move_focus(1),
            KeyCode::Left => self.nudge(-1),
            KeyCode::Right | KeyCode::Char(' ') => self.nudge(1),
            KeyCode::PageDown => self.nudge(-COARSE_STEPS),
            KeyCode::PageUp => self.nudge(COARSE_STEPS),
            KeyCode::Char('f') => self.snap_visible_to_fit(),
            _ => {}
        }
        false
    }

    fn nudge(&mut self, steps: i32) {
        let id = self.focused();
        // Selectors move one option at a time regardless of coarse steps.
        let steps = match id {
            ControlId::Signal | ControlId::Range => steps.signum(),
            _ => steps,
        };
        match self.controller.dispatch(ControlEvent::Nudge(id, steps)) {
            Some(change) => self.status = format!("{change:?}"),
            None => self.status = "No change (at bound).".to_string(),
        }
        self.ensure_focus_visible();
    }

    fn snap_visible_to_fit(&mut self) {
        let range = self.controller.controls().range().value();
        let mut moved = 0usize;
        for segment in Segment::ALL {
            if segment_visible(range, segment) {
                moved += self.controller.snap_to_fit(segment).len();
            }
        }
        self.status = if moved > 0 {
            "Moved sliders to the least-squares fit.".to_string()
        } else {
            "Sliders already at the least-squares fit.".to_string()
        };
    }

    fn draw(&mut self, frame: &mut ratatui::Frame<'_>) {
        let size = frame.area();
        let settings_height = self.visible_controls().len() as u16 + 2;
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(4),
                Constraint::Min(0),
                Constraint::Length(settings_height),
                Constraint::Length(3),
            ])
            .split(size);

        self.draw_header(frame, chunks[0]);
        self.draw_chart(frame, chunks[1]);
        self.draw_settings(frame, chunks[2]);
        self.draw_footer(frame, chunks[3]);
    }

    fn draw_header(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let lines: Vec<Line> = self
            .controller
            .surface()
            .title
            .iter()
            .map(|l| Line::from(Span::styled(l.clone(), Style::default().fg(Color::White))))
            .collect();

        let p = Paragraph::new(Text::from(lines)).block(
            Block::default()
                .borders(Borders::ALL)
                .title(Span::styled("co2", Style::default().fg(Color::Cyan))),
        );
        frame.render_widget(p, area);
    }

    fn draw_chart(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let fig = self.controller.surface();
        let legend: Vec<Span> = fig
            .traces
            .iter()
            .flat_map(|t| {
                let glyph = if t.y.is_empty() { " " } else { "■ " };
                [
                    Span::styled(glyph, Style::default().fg(rgb(t.color))),
                    Span::raw(format!("{}  ", t.name)),
                ]
            })
            .collect();

        let block = Block::default().title(Line::from(legend)).borders(Borders::ALL);
        let inner = block.inner(area);
        frame.render_widget(block, area);
        frame.render_widget(Clear, inner);

        let Some(axes) = fig.axes else {
            let msg = Paragraph::new("Waiting for data...").style(Style::default().fg(Color::Yellow));
            frame.render_widget(msg, inner);
            return;
        };

        let (points, points_rgb) = fig
            .trace(0)
            .map(|t| (clip_points(t.points(), axes.x, axes.y), t.color.rgb()))
            .unwrap_or_default();
        let runs: Vec<(Vec<Vec<(f64, f64)>>, (u8, u8, u8))> = fig
            .traces
            .iter()
            .skip(1)
            .map(|t| {
                let pts: Vec<(f64, f64)> = t.points().collect();
                (clip_polyline(&pts, axes.x, axes.y), t.color.rgb())
            })
            .collect();

        let (chart_rect, insets) = chart_layout(inner);
        let widget = Co2PlottersChart {
            points: &points,
            points_rgb,
            lines: runs.iter().map(|(r, c)| (r.as_slice(), *c)).collect(),
            x_bounds: axes.x,
            y_bounds: axes.y,
            x_label: &fig.x_title,
            y_label: &fig.y_title,
        };

        frame.render_widget(widget, chart_rect);
        if let Some(insets) = insets {
            draw_axis_ticks(frame, inner, chart_rect, insets, axes.x, axes.y, &fig.x_title, &fig.y_title);
        }
    }

    fn draw_settings(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let block = Block::default().title("Controls").borders(Borders::ALL);
        let inner = block.inner(area);
        frame.render_widget(block, area);

        let controls = self.controller.controls();
        let bar_width = (inner.width as usize).saturating_sub(48).clamp(10, 40);
        let mut lines = Vec::new();
        for id in self.visible_controls() {
            let focused = id == self.focused();
            let marker = if focused { "» " } else { "  " };
            let label_style = if focused {
                Style::default().fg(Color::Black).bg(Color::White)
            } else {
                Style::default()
            };

            let mut spans = vec![
                Span::raw(marker),
                Span::styled(format!("{:<30}", id.label()), label_style),
                Span::raw(" "),
            ];
            match id {
                ControlId::Slope(s) => spans.extend(slider_spans(controls.slope(s), bar_width)),
                ControlId::Intercept(s) => spans.extend(slider_spans(controls.intercept(s), bar_width)),
                ControlId::Signal => spans.push(Span::raw(radio_line(controls.signal(), |s| s.display_name()))),
                ControlId::Range => spans.push(Span::raw(radio_line(controls.range(), |r| r.display_name()))),
            }
            lines.push(Line::from(spans));
        }

        frame.render_widget(Paragraph::new(Text::from(lines)), inner);
    }

    fn draw_footer(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let help = "↑/↓ select  ←/→ adjust  PgUp/PgDn ×10  f fit  q quit";
        let line = Line::from(vec![
            Span::styled(help, Style::default().fg(Color::Gray)),
            Span::raw(" | "),
            Span::styled(&self.status, Style::default().fg(Color::Yellow)),
        ]);
        let p = Paragraph::new(line).block(Block::default().borders(Borders::ALL));
        frame.render_widget(p, area);
    }
}

fn rgb(color: TraceColor) -> Color {
    let (r, g, b) = color.rgb();
    Color::Rgb(r, g, b)
}

fn slider_spans(slider: &Slider, width: usize) -> Vec<Span<'static>> {
    let [lo, hi] = slider.bounds();
    vec![
        Span::styled(format!("{:>6.2} ", slider.value()), Style::default().add_modifier(Modifier::BOLD)),
        Span::styled(format!("{lo} "), Style::default().fg(Color::Gray)),
        Span::raw(slider_bar(slider, width)),
        Span::styled(format!(" {hi}"), Style::default().fg(Color::Gray)),
    ]
}

/// Horizontal slider track with a knob at the current value.
fn slider_bar(slider: &Slider, width: usize) -> String {
    let width = width.max(2);
    let knob = (slider.fraction() * (width as f64 - 1.0)).round() as usize;
    (0..width).map(|i| if i == knob { '●' } else { '─' }).collect()
}

fn radio_line<T: Copy + PartialEq + 'static>(group: &RadioGroup<T>, name: impl Fn(T) -> &'static str) -> String {
    group
        .options()
        .iter()
        .map(|&o| {
            let mark = if o == group.value() { "(•)" } else { "( )" };
            format!("{mark} {}", name(o))
        })
        .collect::<Vec<_>>()
        .join("  ")
}

#[derive(Debug, Clone, Copy)]
struct AxisInsets {
    left: u16,
    right: u16,
    top: u16,
    bottom: u16,
}

fn chart_layout(inner: Rect) -> (Rect, Option<AxisInsets>) {
    let insets = AxisInsets {
        left: 8,
        right: 2,
        top: 1,
        bottom: 2,
    };

    if inner.width <= insets.left + insets.right + 10 || inner.height <= insets.top + insets.bottom + 5 {
        return (inner, None);
    }

    let rect = Rect {
        x: inner.x + insets.left,
        y: inner.y + insets.top,
        width: inner.width - insets.left - insets.right,
        height: inner.height - insets.top - insets.bottom,
    };

    (rect, Some(insets))
}

#[allow(clippy::too_many_arguments)]
fn draw_axis_ticks(
    frame: &mut ratatui::Frame<'_>,
    inner: Rect,
    chart: Rect,
    insets: AxisInsets,
    x_bounds: [f64; 2],
    y_bounds: [f64; 2],
    x_title: &str,
    y_title: &str,
) {
    let ticks = 6usize;
    let style = Style::default().fg(Color::Gray);

    for i in 0..ticks {
        let u = i as f64 / (ticks as f64 - 1.0);
        let x_val = x_bounds[0] + u * (x_bounds[1] - x_bounds[0]);
        let x = chart.x + ((chart.width - 1) as f64 * u).round() as u16;
        let label = format!("{x_val:.0}");
        let label_len = label.len() as u16;
        let start = x.saturating_sub(label_len / 2);
        let y = chart.y + chart.height;
        if y >= inner.y + inner.height - 1 {
            continue;
        }
        frame.render_widget(
            Paragraph::new(label).style(style),
            Rect {
                x: start,
                y,
                width: label_len,
                height: 1,
            },
        );
    }

    for i in 0..ticks {
        let u = i as f64 / (ticks as f64 - 1.0);
        let y_val = y_bounds[0] + u * (y_bounds[1] - y_bounds[0]);
        let y = chart.y + (chart.height - 1) - ((chart.height - 1) as f64 * u).round() as u16;
        let label = format!("{y_val:.0}");
        let label_len = label.len() as u16;
        let x = inner.x + insets.left.saturating_sub(1);
        let start = x.saturating_sub(label_len);
        if start < inner.x {
            continue;
        }
        frame.render_widget(
            Paragraph::new(label).style(style),
            Rect {
                x: start,
                y,
                width: label_len,
                height: 1,
            },
        );
    }

    let x_label = Paragraph::new(x_title.to_string())
        .alignment(Alignment::Center)
        .style(style);
    let x_rect = Rect {
        x: chart.x,
        y: chart.y + chart.height + 1,
        width: chart.width,
        height: 1,
    };
    if x_rect.y < inner.y + inner.height {
        frame.render_widget(x_label, x_rect);
    }

    let y_label = Paragraph::new(y_title.to_string()).style(style.add_modifier(Modifier::BOLD));
    let y_rect = Rect {
        x: inner.x,
        y: inner.y,
        width: insets.left.saturating_sub(1),
        height: 1,
    };
    frame.render_widget(y_label, y_rect);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::controls::Controls;
    use crate::domain::{MISSING_SENTINEL, SignalType, TimeRange};
    use crate::io::ingest::tests::{ROWS, fixture};
    use crate::io::parse_observations;

    fn app() -> App {
        let data = parse_observations(&fixture(&ROWS), 3, MISSING_SENTINEL).unwrap();
        App::new(ViewController::new(data, Controls::default(), Figure::new()))
    }

    #[test]
    fn hidden_segment_controls_are_skipped() {
        let app = app();
        assert_eq!(
            app.visible_controls(),
            vec![
                ControlId::Slope(Segment::First),
                ControlId::Intercept(Segment::First),
                ControlId::Signal,
                ControlId::Range,
            ]
        );
    }

    #[test]
    fn keys_drive_the_controller() {
        let mut app = app();
        app.handle_key(KeyCode::Right);
        assert_eq!(app.controller.snapshot().first.slope, 2.05);

        // Slope -> intercept -> signal.
        app.handle_key(KeyCode::Down);
        app.handle_key(KeyCode::PageUp);
        assert_eq!(app.controller.snapshot().first.intercept, 314.5);
        app.handle_key(KeyCode::Down);
        app.handle_key(KeyCode::Right);
        assert_eq!(app.controller.snapshot().signal, SignalType::Raw);

        // Range: first -> last hides the first segment; focus stays on the range selector.
        app.handle_key(KeyCode::Down);
        app.handle_key(KeyCode::Right);
        assert_eq!(app.controller.snapshot().range, TimeRange::Last5Years);
        assert_eq!(app.focused(), ControlId::Range);
        app.handle_key(KeyCode::Up);
        app.handle_key(KeyCode::Up);
        assert_eq!(app.focused(), ControlId::Intercept(Segment::Last));

        assert!(app.handle_key(KeyCode::Char('q')));
    }

    #[test]
    fn focus_moves_off_hidden_control() {
        let mut app = app();
        app.focus = ControlId::ALL.iter().position(|&id| id == ControlId::Range).unwrap();
        app.handle_key(KeyCode::Right);
        app.handle_key(KeyCode::Right);
        assert_eq!(app.controller.snapshot().range, TimeRange::AllData);
        app.handle_key(KeyCode::Right);
        assert_eq!(app.controller.snapshot().range, TimeRange::First5Years);
        assert!(app.is_visible(app.focused()));
    }

    #[test]
    fn slider_bar_places_knob() {
        let s = Slider::new([0.0, 3.0], 0.05, 3.0);
        assert_eq!(slider_bar(&s, 5), "────●");
        let s = Slider::new([0.0, 3.0], 0.05, 0.0);
        assert_eq!(slider_bar(&s, 5), "●────");
    }

    #[test]
    fn radio_line_marks_selection() {
        let controls = Controls::default();
        assert_eq!(
            radio_line(controls.signal(), |s| s.display_name()),
            "(•) Seasonally adjusted data  ( ) Raw data"
        );
    }
}
