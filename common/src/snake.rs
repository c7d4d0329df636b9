use std::collections::VecDeque;

use serde::{Deserialize, Serialize};

use crate::constants::{GRID_SIZE, INITIAL_SNAKE};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Position {
    pub x: i16,
    pub y: i16,
}

impl Position {
    pub fn offset(&self, dx: i16, dy: i16) -> Position {
        Position {
            x: self.x + dx,
            y: self.y + dy,
        }
    }

    /// Whether the position lies inside the playable grid
    pub fn in_bounds(&self) -> bool {
        self.x >= 0 && self.x < GRID_SIZE as i16 && self.y >= 0 && self.y < GRID_SIZE as i16
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

impl Direction {
    /// Unit vector in grid coordinates, y growing downwards
    pub fn vector(&self) -> (i16, i16) {
        match self {
            Direction::Up => (0, -1),
            Direction::Down => (0, 1),
            Direction::Left => (-1, 0),
            Direction::Right => (1, 0),
        }
    }

    pub fn opposite(&self) -> Direction {
        match self {
            Direction::Up => Direction::Down,
            Direction::Down => Direction::Up,
            Direction::Left => Direction::Right,
            Direction::Right => Direction::Left,
        }
    }

    /// True when turning to `self` would point straight back against `other`
    pub fn is_opposite_of(&self, other: Direction) -> bool {
        *self == other.opposite()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Snake {
    /// Ordered body cells, head at the front. Never empty.
    pub body: VecDeque<Position>,
}

impl Snake {
    pub fn initial() -> Self {
        Snake {
            body: INITIAL_SNAKE.into_iter().collect(),
        }
    }

    pub fn head(&self) -> Position {
        *self.body.front().expect("Snake body should not be empty")
    }

    pub fn len(&self) -> usize {
        self.body.len()
    }

    pub fn is_empty(&self) -> bool {
        self.body.is_empty()
    }

    pub fn contains_point(&self, position: Position) -> bool {
        self.body.contains(&position)
    }

    /// Self-collision test for a candidate head. The current head cell is
    /// excluded from the comparison set; the tail still counts even though
    /// it moves away on the same tick.
    pub fn hits_body(&self, candidate: Position) -> bool {
        self.body.iter().skip(1).any(|cell| *cell == candidate)
    }
}
