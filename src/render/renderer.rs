use std::rc::Rc;

use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Paragraph},
};

use crate::game::{Cell, Controls, GameConfig, Geometry};
use crate::metrics::{SessionStats, format_score};
use crate::render::TerminalCanvas;

/// Everything one drawn frame needs
pub struct View<'a> {
    pub canvas: &'a TerminalCanvas,
    pub geometry: &'a Geometry,
    pub notice: Option<&'a str>,
    pub stats: &'a SessionStats,
    pub controls: Controls,
}

pub struct Renderer {
    active: Color,
    idle: Color,
}

impl Renderer {
    pub fn new(config: &GameConfig) -> Self {
        let [r, g, b] = config.active_color;
        let active = Color::Rgb(r, g, b);
        let [r, g, b] = config.idle_color;
        let idle = Color::Rgb(r, g, b);
        Self { active, idle }
    }

    fn chunks(area: Rect) -> Rc<[Rect]> {
        Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(1), // Header
                Constraint::Length(1), // Notice
                Constraint::Min(0),    // Board
                Constraint::Length(1), // Footer
            ])
            .split(area)
    }

    fn board_block() -> Block<'static> {
        Block::default()
            .borders(Borders::ALL)
            .border_type(BorderType::Double)
            .border_style(Style::default().fg(Color::White))
            .title(" Snake ")
    }

    /// Drawing surface left for the board inside a terminal of `area`
    pub fn board_surface(area: Rect) -> Rect {
        Self::board_block().inner(Self::chunks(area)[2])
    }

    pub fn render(&self, frame: &mut Frame, view: &View) {
        let chunks = Self::chunks(frame.area());

        frame.render_widget(self.render_stats(view), chunks[0]);
        frame.render_widget(self.render_notice(view), chunks[1]);
        frame.render_widget(self.render_board(view), chunks[2]);
        frame.render_widget(self.render_controls(view.controls), chunks[3]);
    }

    fn render_board(&self, view: &View) -> Paragraph<'_> {
        let geometry = view.geometry;
        let canvas = view.canvas;
        let mut lines = Vec::new();

        let (left, top) = geometry.origin_of(Cell::new(0, 0));
        for _ in 0..top {
            lines.push(Line::from(""));
        }

        let point = "■".repeat(geometry.pitch_x.point as usize);
        let gap = " ".repeat(geometry.pitch_x.spacing as usize);
        let indent = " ".repeat(left as usize);

        for y in 0..canvas.height() {
            let mut spans = vec![Span::raw(indent.clone())];
            for x in 0..canvas.width() {
                let color = if canvas.is_active(Cell::new(x as i32, y as i32)) {
                    self.active
                } else {
                    self.idle
                };
                spans.push(Span::styled(point.clone(), Style::default().fg(color)));
                spans.push(Span::raw(gap.clone()));
            }

            let row = Line::from(spans);
            for _ in 0..geometry.pitch_y.point {
                lines.push(row.clone());
            }
            for _ in 0..geometry.pitch_y.spacing {
                lines.push(Line::from(""));
            }
        }

        Paragraph::new(lines).block(Self::board_block())
    }

    fn render_stats(&self, view: &View) -> Paragraph<'_> {
        let status = view.canvas.status();
        let label = Style::default().fg(Color::Yellow);
        let value = Style::default().fg(Color::White);

        let text = vec![Line::from(vec![
            Span::styled("Score: ", label),
            Span::styled(
                format_score(status.score),
                value.add_modifier(Modifier::BOLD),
            ),
            Span::raw("    "),
            Span::styled("Speed: ", label),
            Span::styled(status.speed.to_string(), value.add_modifier(Modifier::BOLD)),
            Span::raw("    "),
            Span::styled("Time: ", label),
            Span::styled(view.stats.format_time(), value),
            Span::raw("    "),
            Span::styled("Best: ", label),
            Span::styled(format_score(view.stats.best_score), value),
            Span::raw("    "),
            Span::styled("Games: ", label),
            Span::styled(view.stats.games_played.to_string(), value),
        ])];

        Paragraph::new(text).alignment(Alignment::Center)
    }

    fn render_notice(&self, view: &View) -> Paragraph<'_> {
        let message = view.notice.unwrap_or_default().to_string();
        Paragraph::new(Line::from(Span::styled(
            message,
            Style::default()
                .fg(Color::LightYellow)
                .add_modifier(Modifier::BOLD),
        )))
        .alignment(Alignment::Center)
    }

    fn render_controls(&self, controls: Controls) -> Paragraph<'_> {
        let key = Style::default().fg(Color::Cyan);
        let mut spans = match controls {
            Controls::Setup => vec![
                Span::styled("↑↓", key),
                Span::raw(" speed | "),
                Span::styled("Space", key),
                Span::raw(" start | "),
            ],
            Controls::Steering => vec![
                Span::styled("↑↓←→", key),
                Span::raw(" or "),
                Span::styled("WASD", key),
                Span::raw(" to steer | "),
            ],
            Controls::Locked => Vec::new(),
        };
        spans.push(Span::styled("Q", Style::default().fg(Color::Red)));
        spans.push(Span::raw(" to quit"));

        Paragraph::new(Line::from(spans)).alignment(Alignment::Center)
    }
}
