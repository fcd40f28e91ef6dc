use std::collections::VecDeque;

use super::action::Direction;

/// A cell on the game grid
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Position {
    pub x: i32,
    pub y: i32,
}

impl Position {
    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Move position by delta
    pub fn moved_by(&self, dx: i32, dy: i32) -> Self {
        Self {
            x: self.x + dx,
            y: self.y + dy,
        }
    }

    /// Move position one cell in a direction
    pub fn moved_in_direction(&self, direction: Direction) -> Self {
        let (dx, dy) = direction.delta();
        self.moved_by(dx, dy)
    }
}

/// The snake's body, head first
///
/// Always holds at least one cell.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Snake {
    body: VecDeque<Position>,
}

impl Snake {
    /// Create a snake with its head at `head` and the rest of the body
    /// trailing behind it, opposite to `direction`
    pub fn new(head: Position, direction: Direction, length: usize) -> Self {
        let (back_dx, back_dy) = direction.opposite().delta();
        let body = (0..length.max(1) as i32)
            .map(|i| head.moved_by(back_dx * i, back_dy * i))
            .collect();

        Self { body }
    }

    /// Build a snake from explicit cells, head first.
    ///
    /// Returns `None` for an empty list.
    pub fn from_cells(cells: impl IntoIterator<Item = Position>) -> Option<Self> {
        let body: VecDeque<Position> = cells.into_iter().collect();
        if body.is_empty() {
            None
        } else {
            Some(Self { body })
        }
    }

    pub fn head(&self) -> Position {
        self.body[0]
    }

    #[cfg(test)]
    pub(crate) fn tail(&self) -> Position {
        self.body[self.body.len() - 1]
    }

    /// Body cells in order, head first
    pub fn cells(&self) -> impl Iterator<Item = &Position> + '_ {
        self.body.iter()
    }

    /// Check if position is occupied by any cell of the snake
    pub fn occupies(&self, pos: Position) -> bool {
        self.body.contains(&pos)
    }

    /// Check if position hits the snake, ignoring the tail cell
    ///
    /// The tail vacates its cell on a move without growth, so the head may
    /// safely step into it.
    pub fn collides_ignoring_tail(&self, pos: Position) -> bool {
        self.body.range(..self.body.len() - 1).any(|&cell| cell == pos)
    }

    pub fn push_head(&mut self, pos: Position) {
        self.body.push_front(pos);
    }

    /// Drop the tail cell; a single-cell snake is left as is
    pub fn pop_tail(&mut self) -> Option<Position> {
        if self.body.len() > 1 {
            self.body.pop_back()
        } else {
            None
        }
    }

    pub fn len(&self) -> usize {
        self.body.len()
    }

    /// Check if the snake is empty (should never happen in practice)
    pub fn is_empty(&self) -> bool {
        self.body.is_empty()
    }

    pub fn to_vec(&self) -> Vec<Position> {
        self.cells().copied().collect()
    }
}
