use std::ops::RangeInclusive;

use rand::Rng;

/// A grid cell. Coordinates are 1-based; anything outside `[1, width]` x
/// `[1, height]` is off the board.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct Position {
    pub x: i32,
    pub y: i32,
}

impl Position {
    pub const fn new(x: i32, y: i32) -> Self {
        Position { x, y }
    }

    pub fn offset(self, dx: i32, dy: i32) -> Self {
        Position { x: self.x + dx, y: self.y + dy }
    }
}

/// Board dimensions as reported by the terminal for the current tick.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Board {
    pub width: i32,
    pub height: i32,
}

impl Board {
    pub fn new(width: u16, height: u16) -> Self {
        Board { width: width as i32, height: height as i32 }
    }

    pub fn contains(&self, pos: Position) -> bool {
        pos.x >= 1 && pos.y >= 1 && pos.x <= self.width && pos.y <= self.height
    }

    pub fn center(&self) -> Position {
        Position::new(self.width / 2, self.height / 2)
    }

    /// Picks a cell at least `inset` cells away from every edge. A dimension
    /// too small for the inset falls back to its full range.
    pub fn random_cell<R: Rng + ?Sized>(&self, inset: i32, rng: &mut R) -> Position {
        let x = rng.gen_range(inset_range(self.width, inset));
        let y = rng.gen_range(inset_range(self.height, inset));
        Position::new(x, y)
    }

    /// Every cell `random_cell` can return, row by row.
    pub fn spawn_area(&self, inset: i32) -> impl Iterator<Item = Position> {
        let xs = inset_range(self.width, inset);
        inset_range(self.height, inset)
            .flat_map(move |y| xs.clone().map(move |x| Position::new(x, y)))
    }
}

fn inset_range(size: i32, inset: i32) -> RangeInclusive<i32> {
    let size = size.max(1);
    if inset > 0 && size - inset >= inset {
        inset..=size - inset
    } else {
        1..=size
    }
}
