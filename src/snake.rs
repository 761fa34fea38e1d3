use crate::board::{Board, Position};
use crate::food::Look;
use Direction::*;
use MoveResult::*;

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Direction {
    North,
    East,
    South,
    West,
}

impl Direction {
    pub fn opposite(self) -> Direction {
        match self {
            North => South,
            East => West,
            South => North,
            West => East,
        }
    }

    fn delta(self) -> (i32, i32) {
        match self {
            North => (0, -1),
            East => (1, 0),
            South => (0, 1),
            West => (-1, 0),
        }
    }

    /// Sidestep on the cross axis applied when this heading reverses the
    /// previous one.
    fn reversal_nudge(self) -> (i32, i32) {
        match self {
            North | South => (1, 0),
            East => (0, 1),
            West => (0, -1),
        }
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Collision {
    Wall,
    Body,
}

#[derive(Debug, PartialEq, Eq)]
pub enum MoveResult {
    Moved { new_head: Position },
    Crashed { at: Position, collision: Collision },
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Segment {
    pub pos: Position,
    pub look: Look,
}

/// Body is ordered head first.
#[derive(Clone, Debug)]
pub struct Snake {
    body: Vec<Segment>,
    direction: Direction,
    prev_direction: Direction,
}

impl Snake {
    pub fn new(pos: Position, direction: Direction) -> Self {
        let head = Segment { pos, look: Look::HEAD };
        Snake { body: vec![head], direction, prev_direction: direction }
    }

    /// Builds a snake from explicit segment positions, head first. `None`
    /// without at least a head.
    pub fn from_positions(positions: &[Position], direction: Direction) -> Option<Self> {
        if positions.is_empty() {
            return None;
        }
        let body = positions.iter().map(|&pos| Segment { pos, look: Look::HEAD }).collect();
        Some(Snake { body, direction, prev_direction: direction })
    }

    pub fn body(&self) -> &[Segment] {
        &self.body
    }

    pub fn len(&self) -> usize {
        self.body.len()
    }

    pub fn is_empty(&self) -> bool {
        self.body.is_empty()
    }

    pub fn head(&self) -> Position {
        self.body[0].pos
    }

    pub fn occupies(&self, pos: Position) -> bool {
        self.body.iter().any(|s| s.pos == pos)
    }

    pub fn get_direction(&self) -> Direction {
        self.direction
    }

    pub fn prev_direction(&self) -> Direction {
        self.prev_direction
    }

    /// Records the heading for the next step. Nothing moves until
    /// `move_step`.
    pub fn set_direction(&mut self, new_direction: Direction) {
        self.direction = new_direction;
    }

    pub fn next_head(&self) -> Position {
        let mut head = self.head();

        if self.direction == self.prev_direction.opposite() {
            let (dx, dy) = self.direction.reversal_nudge();
            head = head.offset(dx, dy);
        }

        let (dx, dy) = self.direction.delta();
        head.offset(dx, dy)
    }

    /// Prepends the new head unless it hits a wall or the body. The tail is
    /// kept; callers drop it with `drop_tail` when nothing was eaten.
    pub fn move_step(&mut self, board: &Board) -> MoveResult {
        let new_head = self.next_head();

        if !board.contains(new_head) {
            return Crashed { at: new_head, collision: Collision::Wall };
        }
        if self.occupies(new_head) {
            return Crashed { at: new_head, collision: Collision::Body };
        }

        let look = self.body[0].look;
        self.body.insert(0, Segment { pos: new_head, look });
        self.prev_direction = self.direction;

        Moved { new_head }
    }

    pub fn drop_tail(&mut self) {
        if self.body.len() > 1 {
            self.body.pop();
        }
    }

    pub fn paint_head(&mut self, look: Look) {
        self.body[0].look = look;
    }
}
