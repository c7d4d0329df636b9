use std::time::Duration;

use anyhow::Result;

use crate::constants::TICK_INTERVAL_MS;
use crate::game_state::{GameCommand, GameEvent, GameSession};

/// Drives a session at a fixed tick cadence from irregular frame times.
///
/// Callers feed in whatever elapsed time their event loop observed; the
/// engine accumulates it and executes whole ticks, so tick transitions stay
/// strictly serialized no matter how uneven the frames are.
pub struct GameEngine {
    pub session: GameSession,
    tick_interval: Duration,
    accumulator: Duration,
}

impl GameEngine {
    pub fn new(seed: u64) -> Self {
        GameEngine {
            session: GameSession::new(seed),
            tick_interval: Duration::from_millis(TICK_INTERVAL_MS),
            accumulator: Duration::ZERO,
        }
    }

    /// Run every whole tick covered by `elapsed` since the last call and
    /// return the events they produced. A direction update between calls is
    /// visible to the next tick at the earliest, never retroactively.
    pub fn advance(&mut self, elapsed: Duration) -> Result<Vec<GameEvent>> {
        self.accumulator += elapsed;
        let mut out = Vec::new();
        while self.accumulator >= self.tick_interval {
            self.accumulator -= self.tick_interval;
            out.extend(self.session.exec_command(GameCommand::Tick)?);
        }
        Ok(out)
    }
}
