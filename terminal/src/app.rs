use std::sync::mpsc::{self, Receiver, Sender};
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use anyhow::Result;
use crossterm::event::KeyEvent;
use ratatui::Frame;
use tokio::runtime::Handle;
use tracing::warn;

use common::{GameCommand, GameEngine};

use crate::api_client::{ApiClient, ScoreEntry, StatsSummary};
use crate::views::{GameViewState, MenuState, View};

/// Leaderboard rows requested for the menu screen
pub const LEADERBOARD_LIMIT: usize = 10;

#[derive(Debug)]
pub enum AppCommand {
    Quit,
    StartGame { player_name: String },
    BackToMenu,
}

/// Completions of fire-and-forget network calls, delivered back to the UI
/// thread over a channel and drained once per frame.
#[derive(Debug)]
pub enum NetEvent {
    TopScores(Result<Vec<ScoreEntry>>),
    Stats(Result<StatsSummary>),
    UserScores(Result<Vec<ScoreEntry>>),
    SubmissionFinished(Result<ScoreEntry>),
}

pub enum AppState {
    Menu(Box<MenuState>),
    Playing(Box<GameViewState>),
}

pub struct App {
    pub state: AppState,
    api: ApiClient,
    runtime: Handle,
    net_tx: Sender<NetEvent>,
    net_rx: Receiver<NetEvent>,
}

impl App {
    pub fn new(runtime: Handle, server_url: &str) -> Result<Self> {
        let api = ApiClient::new(server_url)?;
        let (net_tx, net_rx) = mpsc::channel();
        let app = App {
            state: AppState::Menu(Box::new(MenuState::new())),
            api,
            runtime,
            net_tx,
            net_rx,
        };
        app.spawn_leaderboard_fetch();
        app.spawn_stats_fetch();
        Ok(app)
    }

    pub fn handle_input(&mut self, key: KeyEvent) -> Option<AppCommand> {
        match &mut self.state {
            AppState::Menu(menu) => menu.handle_input(key),
            AppState::Playing(game) => game.handle_input(key),
        }
    }

    pub fn update(&mut self, dt: Duration) {
        while let Ok(event) = self.net_rx.try_recv() {
            self.handle_net_event(event);
        }

        match &mut self.state {
            AppState::Menu(menu) => menu.update(dt),
            AppState::Playing(game) => game.update(dt),
        }

        // A finished game hands its score over exactly once; the submission
        // runs in the background while the overlay stays interactive.
        let pending = match &mut self.state {
            AppState::Playing(game) => {
                let pending = game.take_pending_submission();
                if pending.is_some() {
                    game.submission_in_flight = true;
                }
                pending
            }
            AppState::Menu(_) => None,
        };
        if let Some((player_name, score)) = pending {
            self.spawn_submission(player_name, score);
        }
    }

    pub fn render(&self, frame: &mut Frame) {
        match &self.state {
            AppState::Menu(menu) => menu.render(frame),
            AppState::Playing(game) => game.render(frame),
        }
    }

    pub fn handle_command(&mut self, command: AppCommand) -> Result<()> {
        match command {
            AppCommand::StartGame { player_name } => {
                let mut engine = GameEngine::new(wall_clock_seed());
                match engine.session.exec_command(GameCommand::Start { player_name }) {
                    Ok(_) => {
                        self.state = AppState::Playing(Box::new(GameViewState::new(engine)));
                    }
                    Err(err) => {
                        if let AppState::Menu(menu) = &mut self.state {
                            menu.error = Some(err.to_string());
                        }
                    }
                }
            }
            AppCommand::BackToMenu => {
                let menu = match &self.state {
                    AppState::Playing(game) => {
                        MenuState::with_name(game.engine.session.player_name.clone())
                    }
                    AppState::Menu(_) => MenuState::new(),
                };
                self.state = AppState::Menu(Box::new(menu));
                self.spawn_leaderboard_fetch();
                self.spawn_stats_fetch();
            }
            AppCommand::Quit => {
                // Handled in main loop
            }
        }
        Ok(())
    }

    fn handle_net_event(&mut self, event: NetEvent) {
        match event {
            NetEvent::TopScores(Ok(scores)) => {
                if let AppState::Menu(menu) = &mut self.state {
                    menu.leaderboard = Some(scores);
                }
            }
            NetEvent::TopScores(Err(err)) => warn!("leaderboard fetch failed: {:#}", err),
            NetEvent::Stats(Ok(stats)) => {
                if let AppState::Menu(menu) = &mut self.state {
                    menu.stats = Some(stats);
                }
            }
            NetEvent::Stats(Err(err)) => warn!("stats fetch failed: {:#}", err),
            NetEvent::UserScores(Ok(scores)) => {
                if let AppState::Playing(game) = &mut self.state {
                    game.personal_best = scores;
                }
            }
            NetEvent::UserScores(Err(err)) => warn!("personal scores fetch failed: {:#}", err),
            NetEvent::SubmissionFinished(result) => {
                if let AppState::Playing(game) = &mut self.state {
                    game.submission_in_flight = false;
                }
                match result {
                    Ok(record) => {
                        self.spawn_user_scores_fetch(record.username);
                        self.spawn_leaderboard_fetch();
                    }
                    Err(err) => warn!("score submission failed: {:#}", err),
                }
            }
        }
    }

    fn spawn_submission(&self, player_name: String, score: u32) {
        let api = self.api.clone();
        let tx = self.net_tx.clone();
        self.runtime.spawn(async move {
            let result = api.submit_score(&player_name, score).await;
            let _ = tx.send(NetEvent::SubmissionFinished(result));
        });
    }

    fn spawn_leaderboard_fetch(&self) {
        let api = self.api.clone();
        let tx = self.net_tx.clone();
        self.runtime.spawn(async move {
            let _ = tx.send(NetEvent::TopScores(api.top_scores(LEADERBOARD_LIMIT).await));
        });
    }

    fn spawn_stats_fetch(&self) {
        let api = self.api.clone();
        let tx = self.net_tx.clone();
        self.runtime.spawn(async move {
            let _ = tx.send(NetEvent::Stats(api.stats().await));
        });
    }

    fn spawn_user_scores_fetch(&self, username: String) {
        let api = self.api.clone();
        let tx = self.net_tx.clone();
        self.runtime.spawn(async move {
            let _ = tx.send(NetEvent::UserScores(api.user_scores(&username).await));
        });
    }
}

fn wall_clock_seed() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|elapsed| elapsed.as_millis() as u64)
        .unwrap_or(0x5eed)
}
