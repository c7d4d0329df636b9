use super::View;
use crate::api_client::{ScoreEntry, StatsSummary};
use crate::app::AppCommand;
use crossterm::event::{KeyCode, KeyEvent};
use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Direction, Layout},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
};
use std::time::Duration;

/// Longest player name the input accepts
const MAX_NAME_LENGTH: usize = 20;

pub struct MenuState {
    pub name_input: String,
    pub error: Option<String>,
    /// None until the first fetch completes
    pub leaderboard: Option<Vec<ScoreEntry>>,
    pub stats: Option<StatsSummary>,
}

impl MenuState {
    pub fn new() -> Self {
        Self::with_name(String::new())
    }

    pub fn with_name(name_input: String) -> Self {
        MenuState {
            name_input,
            error: None,
            leaderboard: None,
            stats: None,
        }
    }
}

impl Default for MenuState {
    fn default() -> Self {
        Self::new()
    }
}

impl View for MenuState {
    fn handle_input(&mut self, key: KeyEvent) -> Option<AppCommand> {
        match key.code {
            KeyCode::Esc => Some(AppCommand::Quit),
            KeyCode::Enter => {
                let trimmed = self.name_input.trim();
                if trimmed.is_empty() {
                    self.error = Some("player name cannot be empty".to_string());
                    None
                } else {
                    Some(AppCommand::StartGame {
                        player_name: trimmed.to_string(),
                    })
                }
            }
            KeyCode::Backspace => {
                self.name_input.pop();
                self.error = None;
                None
            }
            KeyCode::Char(c) => {
                if self.name_input.len() < MAX_NAME_LENGTH {
                    self.name_input.push(c);
                }
                self.error = None;
                None
            }
            _ => None,
        }
    }

    fn update(&mut self, _dt: Duration) {
        // Leaderboard and stats arrive through net events; nothing to do here.
    }

    fn render(&self, frame: &mut Frame) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .margin(1)
            .constraints([
                Constraint::Length(3),
                Constraint::Min(6),
                Constraint::Length(3),
                Constraint::Length(3),
                Constraint::Length(2),
            ])
            .split(frame.area());

        // Title
        let title = Paragraph::new("SNAKEBOARD")
            .style(Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD))
            .alignment(Alignment::Center)
            .block(Block::default().borders(Borders::ALL));
        frame.render_widget(title, chunks[0]);

        // Leaderboard
        let rows: Vec<Line> = match &self.leaderboard {
            None => vec![Line::from("Loading leaderboard...")],
            Some(entries) if entries.is_empty() => {
                vec![Line::from("No scores yet. Be the first!")]
            }
            Some(entries) => entries
                .iter()
                .enumerate()
                .map(|(idx, entry)| {
                    Line::from(vec![
                        Span::styled(
                            format!("{:>3}. ", idx + 1),
                            Style::default().fg(Color::DarkGray),
                        ),
                        Span::raw(format!("{:<20}", entry.username)),
                        Span::styled(
                            format!("{:>6}", entry.score),
                            Style::default().fg(Color::Yellow),
                        ),
                    ])
                })
                .collect(),
        };
        let leaderboard = Paragraph::new(rows)
            .alignment(Alignment::Center)
            .block(Block::default().borders(Borders::ALL).title("Top scores"));
        frame.render_widget(leaderboard, chunks[1]);

        // Aggregate stats
        let stats_line = match &self.stats {
            Some(stats) => format!(
                "Players: {}   Games: {}   Best: {}   Average: {}",
                stats.total_players, stats.total_games, stats.highest_score, stats.average_score
            ),
            None => "Loading stats...".to_string(),
        };
        let stats = Paragraph::new(stats_line)
            .alignment(Alignment::Center)
            .block(Block::default().borders(Borders::ALL));
        frame.render_widget(stats, chunks[2]);

        // Name entry
        let input = Paragraph::new(format!("{}_", self.name_input))
            .block(Block::default().borders(Borders::ALL).title("Your name"));
        frame.render_widget(input, chunks[3]);

        // Hint or validation error
        let footer = match &self.error {
            Some(error) => Paragraph::new(error.as_str())
                .style(Style::default().fg(Color::Red))
                .alignment(Alignment::Center),
            None => Paragraph::new("Enter: start game   Esc: quit")
                .style(Style::default().fg(Color::DarkGray))
                .alignment(Alignment::Center),
        };
        frame.render_widget(footer, chunks[4]);
    }
}
