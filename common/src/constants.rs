use crate::snake::{Direction, Position};

/// Number of cells along each axis of the square arena
pub const GRID_SIZE: u16 = 20;

/// Tick interval in milliseconds for game loops
pub const TICK_INTERVAL_MS: u64 = 150;

/// Snake body at the start of every game, head first
pub const INITIAL_SNAKE: [Position; 2] = [
    Position { x: 10, y: 10 },
    Position { x: 10, y: 11 },
];

/// Direction the snake moves in until the first accepted turn
pub const INITIAL_DIRECTION: Direction = Direction::Up;

/// Food position for a freshly created session
pub const INITIAL_FOOD: Position = Position { x: 5, y: 5 };
