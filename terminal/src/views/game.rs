use super::{View, centered_fixed_rect};
use crate::api_client::ScoreEntry;
use crate::app::AppCommand;
use common::{Direction as SnakeDirection, GRID_SIZE, GameCommand, GameEngine, GameEvent, Position};
use crossterm::event::{KeyCode, KeyEvent};
use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Direction, Layout},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph},
};
use std::time::Duration;
use tracing::warn;

pub struct GameViewState {
    pub engine: GameEngine,
    /// Gates the restart key while a score submission is on the wire
    pub submission_in_flight: bool,
    /// Player's best scores, filled in after a successful submission
    pub personal_best: Vec<ScoreEntry>,
    pending_submission: Option<(String, u32)>,
}

impl GameViewState {
    pub fn new(engine: GameEngine) -> Self {
        GameViewState {
            engine,
            submission_in_flight: false,
            personal_best: Vec::new(),
            pending_submission: None,
        }
    }

    /// Hand the finished game's score to the app driver, at most once.
    pub fn take_pending_submission(&mut self) -> Option<(String, u32)> {
        self.pending_submission.take()
    }

    fn turn(&mut self, direction: SnakeDirection) -> Option<AppCommand> {
        if let Err(err) = self
            .engine
            .session
            .exec_command(GameCommand::Turn { direction })
        {
            warn!("turn command failed: {:#}", err);
        }
        None
    }

    fn restart(&mut self) -> Option<AppCommand> {
        if !self.engine.session.is_game_over() || self.submission_in_flight {
            return None;
        }
        match self.engine.session.exec_command(GameCommand::Restart) {
            Ok(_) => self.personal_best.clear(),
            Err(err) => warn!("restart command failed: {:#}", err),
        }
        None
    }

    fn grid_lines(&self) -> Vec<Line<'static>> {
        let session = &self.engine.session;
        let head = session.snake.head();
        let mut lines = Vec::with_capacity(GRID_SIZE as usize);
        for y in 0..GRID_SIZE as i16 {
            let mut spans = Vec::with_capacity(GRID_SIZE as usize);
            for x in 0..GRID_SIZE as i16 {
                let cell = Position { x, y };
                let span = if cell == head {
                    Span::styled(
                        "██",
                        Style::default()
                            .fg(Color::LightGreen)
                            .add_modifier(Modifier::BOLD),
                    )
                } else if session.snake.contains_point(cell) {
                    Span::styled("██", Style::default().fg(Color::Green))
                } else if cell == session.food {
                    Span::styled("██", Style::default().fg(Color::Red))
                } else {
                    Span::styled("· ", Style::default().fg(Color::DarkGray))
                };
                spans.push(span);
            }
            lines.push(Line::from(spans));
        }
        lines
    }

    fn render_game_over_overlay(&self, frame: &mut Frame) {
        let session = &self.engine.session;
        let mut lines = vec![
            Line::from(Span::styled(
                "GAME OVER",
                Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
            )),
            Line::from(""),
            Line::from(format!("Final score: {}", session.score)),
            Line::from(""),
        ];

        if self.submission_in_flight {
            lines.push(Line::from(Span::styled(
                "Submitting score...",
                Style::default().fg(Color::Yellow),
            )));
        } else if !self.personal_best.is_empty() {
            lines.push(Line::from(format!("Best runs for {}:", session.player_name)));
            for entry in &self.personal_best {
                lines.push(Line::from(format!("  {:>6}", entry.score)));
            }
        }
        lines.push(Line::from(""));

        let hint = if self.submission_in_flight {
            "Esc: menu"
        } else {
            "r: restart   Esc: menu"
        };
        lines.push(Line::from(Span::styled(
            hint,
            Style::default().fg(Color::DarkGray),
        )));

        let height = lines.len() as u16 + 2;
        let area = centered_fixed_rect(36, height, frame.area());
        frame.render_widget(Clear, area);
        let overlay = Paragraph::new(lines)
            .alignment(Alignment::Center)
            .block(Block::default().borders(Borders::ALL));
        frame.render_widget(overlay, area);
    }
}

impl View for GameViewState {
    fn handle_input(&mut self, key: KeyEvent) -> Option<AppCommand> {
        match key.code {
            KeyCode::Up => self.turn(SnakeDirection::Up),
            KeyCode::Down => self.turn(SnakeDirection::Down),
            KeyCode::Left => self.turn(SnakeDirection::Left),
            KeyCode::Right => self.turn(SnakeDirection::Right),
            KeyCode::Char('r') | KeyCode::Char('R') => self.restart(),
            KeyCode::Esc => Some(AppCommand::BackToMenu),
            _ => None,
        }
    }

    fn update(&mut self, dt: Duration) {
        match self.engine.advance(dt) {
            Ok(events) => {
                for event in events {
                    if let GameEvent::GameEnded { player_name, score } = event {
                        self.pending_submission = Some((player_name, score));
                    }
                }
            }
            Err(err) => warn!("game tick failed: {:#}", err),
        }
    }

    fn render(&self, frame: &mut Frame) {
        let session = &self.engine.session;
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(3),
                Constraint::Min(GRID_SIZE + 2),
                Constraint::Length(1),
            ])
            .split(frame.area());

        // Score header
        let header = Paragraph::new(format!(
            "{}   Score: {}",
            session.player_name, session.score
        ))
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::ALL));
        frame.render_widget(header, chunks[0]);

        // Arena, two terminal columns per cell
        let arena_area = centered_fixed_rect(GRID_SIZE * 2 + 2, GRID_SIZE + 2, chunks[1]);
        let arena = Paragraph::new(self.grid_lines())
            .block(Block::default().borders(Borders::ALL).title("snakeboard"));
        frame.render_widget(arena, arena_area);

        // Help footer
        let footer = Paragraph::new("Arrows: steer   Esc: menu")
            .style(Style::default().fg(Color::DarkGray))
            .alignment(Alignment::Center);
        frame.render_widget(footer, chunks[2]);

        if session.is_game_over() {
            self.render_game_over_overlay(frame);
        }
    }
}
