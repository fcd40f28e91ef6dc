use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Direction as LayoutDirection, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Clear, Paragraph},
};

use crate::game::{Direction, FrameSink, Phase, Snapshot};
use crate::metrics::GameMetrics;

const BOARD_BG: Color = Color::Rgb(0x23, 0x27, 0x41);
const HEAD_COLOR: Color = Color::Rgb(0x4e, 0xcc, 0xa3);
const FOOD_COLOR: Color = Color::Rgb(0xff, 0x6b, 0x6b);

/// Each grid cell is two terminal columns wide so the board looks square
const CELL_WIDTH: u16 = 2;

/// Keeps the most recent snapshot for the next frame
#[derive(Debug, Default)]
pub struct LatestFrame {
    snapshot: Option<Snapshot>,
    presented: usize,
}

impl LatestFrame {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn snapshot(&self) -> Option<&Snapshot> {
        self.snapshot.as_ref()
    }

    /// Number of snapshots received so far
    pub fn presented(&self) -> usize {
        self.presented
    }
}

impl FrameSink for LatestFrame {
    fn present(&mut self, snapshot: &Snapshot) {
        self.snapshot = Some(snapshot.clone());
        self.presented += 1;
    }
}

pub struct Renderer;

impl Renderer {
    pub fn new() -> Self {
        Self
    }

    pub fn render(
        &self,
        frame: &mut Frame,
        snapshot: &Snapshot,
        phase: Phase,
        metrics: &GameMetrics,
    ) {
        let chunks = Layout::default()
            .direction(LayoutDirection::Vertical)
            .constraints([
                Constraint::Length(3), // Header
                Constraint::Min(0),    // Board
                Constraint::Length(3), // Footer
            ])
            .split(frame.area());

        frame.render_widget(self.render_stats(snapshot, metrics), chunks[0]);

        let board_width = cells_to_u16(snapshot.grid_width)
            .saturating_mul(CELL_WIDTH)
            .saturating_add(2);
        let board_height = cells_to_u16(snapshot.grid_height).saturating_add(2);
        let board_area = centered_rect(board_width, board_height, chunks[1]);
        frame.render_widget(self.render_grid(snapshot), board_area);

        match phase {
            Phase::Idle => self.render_overlay(frame, board_area, self.idle_message()),
            Phase::GameOver => self.render_overlay(frame, board_area, self.game_over(snapshot)),
            Phase::Running => {}
        }

        frame.render_widget(self.render_controls(), chunks[2]);
    }

    fn render_grid(&self, snapshot: &Snapshot) -> Paragraph<'static> {
        let width = snapshot.grid_width;
        let empty = Span::styled("· ", Style::default().fg(Color::DarkGray));
        let mut cells = vec![empty; width * snapshot.grid_height];

        if let Some(food) = snapshot.food {
            cells[food.y as usize * width + food.x as usize] =
                Span::styled("● ", Style::default().fg(FOOD_COLOR));
        }

        // Drawn tail to head so the head always lands on top
        for (index, pos) in snapshot.snake.iter().enumerate().rev() {
            let span = if index == 0 {
                Span::styled(
                    head_glyph(snapshot.direction),
                    Style::default()
                        .fg(BOARD_BG)
                        .bg(HEAD_COLOR)
                        .add_modifier(Modifier::BOLD),
                )
            } else {
                Span::styled("  ", Style::default().bg(body_color(index)))
            };
            cells[pos.y as usize * width + pos.x as usize] = span;
        }

        let lines: Vec<Line> = cells
            .chunks(width)
            .map(|row| Line::from(row.to_vec()))
            .collect();

        Paragraph::new(lines).style(Style::default().bg(BOARD_BG)).block(
            Block::default()
                .borders(Borders::ALL)
                .border_type(BorderType::Double)
                .border_style(Style::default().fg(Color::White))
                .title(" Snake "),
        )
    }

    fn render_stats(&self, snapshot: &Snapshot, metrics: &GameMetrics) -> Paragraph<'static> {
        let label = Style::default().fg(Color::Yellow);
        let value = Style::default().fg(Color::White);

        let text = vec![Line::from(vec![
            Span::styled("Score: ", label),
            Span::styled(snapshot.score.to_string(), value.add_modifier(Modifier::BOLD)),
            Span::raw("    "),
            Span::styled("Speed: ", label),
            Span::styled(format!("{}ms", snapshot.speed_ms), value),
            Span::raw("    "),
            Span::styled("Best: ", label),
            Span::styled(metrics.best_score.to_string(), value),
            Span::raw("    "),
            Span::styled("Time: ", label),
            Span::styled(metrics.format_time(), value),
        ])];

        Paragraph::new(text)
            .alignment(Alignment::Center)
            .block(Block::default().borders(Borders::BOTTOM))
    }

    fn idle_message(&self) -> Vec<Line<'static>> {
        vec![
            Line::from(""),
            Line::from(vec![
                Span::styled("Press ", Style::default().fg(Color::Gray)),
                Span::styled(
                    "Space",
                    Style::default()
                        .fg(Color::Green)
                        .add_modifier(Modifier::BOLD),
                ),
                Span::styled(" to start", Style::default().fg(Color::Gray)),
            ]),
        ]
    }

    fn game_over(&self, snapshot: &Snapshot) -> Vec<Line<'static>> {
        let (title, color) = if snapshot.won {
            ("You Win!", HEAD_COLOR)
        } else {
            ("Game Over!", FOOD_COLOR)
        };

        vec![
            Line::from(Span::styled(
                title,
                Style::default().fg(color).add_modifier(Modifier::BOLD),
            )),
            Line::from(vec![
                Span::styled("Score: ", Style::default().fg(Color::White)),
                Span::styled(
                    snapshot.score.to_string(),
                    Style::default()
                        .fg(Color::White)
                        .add_modifier(Modifier::BOLD),
                ),
            ]),
            Line::from(vec![
                Span::styled("Press ", Style::default().fg(Color::Gray)),
                Span::styled(
                    "R",
                    Style::default()
                        .fg(Color::Green)
                        .add_modifier(Modifier::BOLD),
                ),
                Span::styled(" to restart or ", Style::default().fg(Color::Gray)),
                Span::styled(
                    "Q",
                    Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
                ),
                Span::styled(" to quit", Style::default().fg(Color::Gray)),
            ]),
        ]
    }

    fn render_overlay(&self, frame: &mut Frame, board: Rect, lines: Vec<Line<'static>>) {
        let width = (board.width.saturating_sub(4)).min(40);
        let height = lines.len() as u16 + 2;
        let area = centered_rect(width, height, board);

        frame.render_widget(Clear, area);
        frame.render_widget(
            Paragraph::new(lines).alignment(Alignment::Center).block(
                Block::default()
                    .borders(Borders::ALL)
                    .border_style(Style::default().fg(Color::White))
                    .style(Style::default().bg(Color::Black)),
            ),
            area,
        );
    }

    fn render_controls(&self) -> Paragraph<'static> {
        let text = vec![Line::from(vec![
            Span::styled("↑↓←→", Style::default().fg(Color::Cyan)),
            Span::raw(" or "),
            Span::styled("WASD", Style::default().fg(Color::Cyan)),
            Span::raw(" to move | "),
            Span::styled("Space", Style::default().fg(Color::Green)),
            Span::raw(" start | "),
            Span::styled("R", Style::default().fg(Color::Green)),
            Span::raw(" restart | "),
            Span::styled("Q", Style::default().fg(Color::Red)),
            Span::raw(" quit"),
        ])];

        Paragraph::new(text)
            .alignment(Alignment::Center)
            .block(Block::default().borders(Borders::TOP))
    }
}

impl Default for Renderer {
    fn default() -> Self {
        Self::new()
    }
}

/// Head cell with its eyes on the leading edge
fn head_glyph(direction: Direction) -> &'static str {
    match direction {
        Direction::Up => "''",
        Direction::Down => "..",
        Direction::Left => ": ",
        Direction::Right => " :",
    }
}

/// Body shades from bright to darker green along the snake
fn body_color(index: usize) -> Color {
    let green = 255usize.saturating_sub(index * 5).max(150) as u8;
    Color::Rgb(78, green, 163)
}

fn cells_to_u16(cells: usize) -> u16 {
    u16::try_from(cells).unwrap_or(u16::MAX)
}

fn centered_rect(width: u16, height: u16, area: Rect) -> Rect {
    let width = width.min(area.width);
    let height = height.min(area.height);
    Rect {
        x: area.x + (area.width - width) / 2,
        y: area.y + (area.height - height) / 2,
        width,
        height,
    }
}
