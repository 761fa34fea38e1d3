use crossterm::style::Color;
use rand::{rngs::StdRng, seq::SliceRandom};
use tracing::{debug, info, warn};

use crate::board::{Board, Position};
use crate::error::{Error, Result};
use crate::snake::Snake;

/// Random cells tried before scanning the spawn area.
const MAX_PLACEMENT_ATTEMPTS: usize = 128;

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Look {
    pub glyph: char,
    pub color: Color,
}

impl Look {
    pub const HEAD: Look = Look { glyph: 'O', color: Color::White };

    pub const fn new(glyph: char, color: Color) -> Self {
        Look { glyph, color }
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct FoodKind {
    pub look: Look,
    /// Score awarded when eaten.
    pub level: u32,
}

impl FoodKind {
    pub const fn new(glyph: char, color: Color, level: u32) -> Self {
        FoodKind { look: Look::new(glyph, color), level }
    }
}

/// Immutable set of food kinds instances are drawn from.
#[derive(Clone, Debug)]
pub struct FoodCatalog {
    kinds: Vec<FoodKind>,
}

impl FoodCatalog {
    pub fn new(kinds: Vec<FoodKind>) -> Result<Self> {
        if kinds.is_empty() {
            return Err(Error::EmptyCatalog);
        }
        Ok(FoodCatalog { kinds })
    }

    pub fn standard() -> Self {
        FoodCatalog {
            kinds: vec![
                FoodKind::new('☆', Color::Yellow, 1),
                FoodKind::new('❤', Color::Blue, 2),
                FoodKind::new('♣', Color::Green, 3),
                FoodKind::new('✿', Color::Red, 4),
                FoodKind::new('♫', Color::Cyan, 5),
            ],
        }
    }

    pub fn kinds(&self) -> &[FoodKind] {
        &self.kinds
    }

    fn choose(&self, rng: &mut StdRng) -> FoodKind {
        // Non-empty by construction.
        *self.kinds.choose(rng).unwrap_or(&self.kinds[0])
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct FoodId(pub u64);

/// Expiry timer state. Only the owner of the `FoodManager` moves an
/// instance between states.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum FoodStatus {
    /// Not drawn since it was placed; no timer running.
    Dormant,
    /// Drawn at least once; exactly one expiry timer is in flight.
    Armed,
    /// Timer fired before it was eaten; relocated on the next tick.
    Expired,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct FoodInstance {
    pub id: FoodId,
    pub kind: FoodKind,
    pub pos: Position,
    pub status: FoodStatus,
}

pub struct FoodManager {
    catalog: FoodCatalog,
    foods: Vec<FoodInstance>,
    next_id: u64,
    inset: i32,
    rng: StdRng,
}

impl FoodManager {
    pub fn new(catalog: FoodCatalog, inset: i32, rng: StdRng) -> Self {
        FoodManager { catalog, foods: vec![], next_id: 0, inset, rng }
    }

    pub fn foods(&self) -> &[FoodInstance] {
        &self.foods
    }

    pub fn len(&self) -> usize {
        self.foods.len()
    }

    pub fn is_empty(&self) -> bool {
        self.foods.is_empty()
    }

    pub fn get(&self, id: FoodId) -> Option<&FoodInstance> {
        self.foods.iter().find(|f| f.id == id)
    }

    /// Draws a random kind at a random cell with a fresh id. The instance is
    /// not added to the live set.
    pub fn spawn(&mut self, board: &Board) -> FoodInstance {
        let kind = self.catalog.choose(&mut self.rng);
        let pos = board.random_cell(self.inset, &mut self.rng);
        FoodInstance { id: self.fresh_id(), kind, pos, status: FoodStatus::Dormant }
    }

    /// Adds a food of the given kind at an exact cell.
    pub fn insert(&mut self, kind: FoodKind, pos: Position) -> FoodId {
        let id = self.fresh_id();
        self.foods.push(FoodInstance { id, kind, pos, status: FoodStatus::Dormant });
        id
    }

    /// Spawns one food on a cell free of other food and of the snake.
    pub fn place(&mut self, board: &Board, snake: &Snake) -> Option<FoodId> {
        let mut food = self.spawn(board);

        match self.free_cell(board, snake, food.pos, None) {
            Some(pos) => {
                food.pos = pos;
                debug!("spawned food {:?} level {} at {:?}", food.id, food.kind.level, pos);
                self.foods.push(food);
                Some(food.id)
            }
            None => {
                warn!("no free cell for food {:?}", food.id);
                None
            }
        }
    }

    /// Tops the live set up to `capacity`. Returns how many were placed.
    pub fn place_new_food(&mut self, capacity: usize, board: &Board, snake: &Snake) -> usize {
        let missing = capacity.saturating_sub(self.foods.len());
        let mut placed = 0;

        for _ in 0..missing {
            if self.place(board, snake).is_none() {
                break;
            }
            placed += 1;
        }

        placed
    }

    /// Removes and returns the food lying on `pos`, if any.
    pub fn take_at(&mut self, pos: Position) -> Option<FoodInstance> {
        let idx = self.foods.iter().rposition(|f| f.pos == pos)?;
        Some(self.foods.remove(idx))
    }

    /// Arms every dormant food and returns the ids that were flipped. Each
    /// returned id needs exactly one expiry timer.
    pub fn arm_dormant(&mut self) -> Vec<FoodId> {
        self.foods
            .iter_mut()
            .filter(|f| f.status == FoodStatus::Dormant)
            .map(|f| {
                f.status = FoodStatus::Armed;
                f.id
            })
            .collect()
    }

    /// Records that the timer for `id` fired. Eaten or already relocated
    /// foods are ignored.
    pub fn mark_expired(&mut self, id: FoodId) -> bool {
        match self.foods.iter_mut().find(|f| f.id == id) {
            Some(food) if food.status == FoodStatus::Armed => {
                food.status = FoodStatus::Expired;
                true
            }
            _ => false,
        }
    }

    /// Moves every expired food, and any food the board no longer contains,
    /// to a new free cell. Expired food goes back to dormant; any other food
    /// keeps its status, since its timer may still be in flight.
    pub fn relocate_stale(&mut self, board: &Board, snake: &Snake) -> usize {
        let mut moved = 0;

        for idx in 0..self.foods.len() {
            let food = self.foods[idx];
            let expired = food.status == FoodStatus::Expired;
            if !expired && board.contains(food.pos) {
                continue;
            }

            let start = board.random_cell(self.inset, &mut self.rng);
            let Some(pos) = self.free_cell(board, snake, start, Some(food.pos)) else {
                warn!("no free cell to relocate food {:?}", food.id);
                continue;
            };

            info!(
                "food {:?} relocated {:?} -> {:?} (expired: {})",
                food.id, food.pos, pos, expired
            );
            let slot = &mut self.foods[idx];
            slot.pos = pos;
            if expired {
                slot.status = FoodStatus::Dormant;
            }
            moved += 1;
        }

        moved
    }

    fn fresh_id(&mut self) -> FoodId {
        self.next_id += 1;
        FoodId(self.next_id)
    }

    /// Rejects and re-rolls `candidate` until it is on the board and clear of
    /// food, the snake and `avoid`. Falls back to scanning the spawn area.
    fn free_cell(
        &mut self,
        board: &Board,
        snake: &Snake,
        mut candidate: Position,
        avoid: Option<Position>,
    ) -> Option<Position> {
        let taken = |foods: &[FoodInstance], pos: Position| {
            !board.contains(pos)
                || avoid == Some(pos)
                || snake.occupies(pos)
                || foods.iter().any(|f| f.pos == pos)
        };

        for _ in 0..MAX_PLACEMENT_ATTEMPTS {
            if !taken(&self.foods, candidate) {
                return Some(candidate);
            }
            candidate = board.random_cell(self.inset, &mut self.rng);
        }

        board.spawn_area(self.inset).find(|&pos| !taken(&self.foods, pos))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::snake::Direction;
    use rand::SeedableRng;

    fn manager(inset: i32) -> FoodManager {
        FoodManager::new(FoodCatalog::standard(), inset, StdRng::seed_from_u64(42))
    }

    fn snake_at(x: i32, y: i32) -> Snake {
        Snake::new(Position::new(x, y), Direction::North)
    }

    #[test]
    fn empty_catalog_is_rejected() {
        assert!(matches!(FoodCatalog::new(vec![]), Err(Error::EmptyCatalog)));
    }

    #[test]
    fn spawn_draws_from_catalog_with_increasing_ids() {
        let board = Board::new(80, 40);
        let mut foods = manager(10);
        let a = foods.spawn(&board);
        let b = foods.spawn(&board);

        assert!(a.id < b.id);
        assert_eq!(a.status, FoodStatus::Dormant);
        assert!(FoodCatalog::standard().kinds().contains(&a.kind));
        assert!((10..=70).contains(&a.pos.x));
        assert!((10..=30).contains(&a.pos.y));
    }

    #[test]
    fn top_up_never_overlaps() {
        let board = Board::new(4, 4);
        let snake = Snake::from_positions(
            &[Position::new(1, 1), Position::new(2, 1), Position::new(3, 1), Position::new(4, 1)],
            Direction::West,
        )
        .unwrap();
        let mut foods = manager(0);

        assert_eq!(foods.place_new_food(6, &board, &snake), 6);
        for (i, f) in foods.foods().iter().enumerate() {
            assert!(board.contains(f.pos));
            assert!(!snake.occupies(f.pos));
            assert!(foods.foods()[i + 1..].iter().all(|g| g.pos != f.pos));
        }
    }

    #[test]
    fn top_up_stops_when_board_is_full() {
        let board = Board::new(2, 1);
        let snake = snake_at(1, 1);
        let mut foods = manager(0);

        assert_eq!(foods.place_new_food(3, &board, &snake), 1);
        assert_eq!(foods.foods()[0].pos, Position::new(2, 1));
    }

    #[test]
    fn take_at_removes_only_the_matching_food() {
        let mut foods = manager(0);
        let kind = FoodCatalog::standard().kinds()[1];
        let keep = foods.insert(kind, Position::new(3, 3));
        let eat = foods.insert(kind, Position::new(4, 3));

        let eaten = foods.take_at(Position::new(4, 3)).unwrap();
        assert_eq!(eaten.id, eat);
        assert_eq!(foods.len(), 1);
        assert_eq!(foods.foods()[0].id, keep);
        assert!(foods.take_at(Position::new(9, 9)).is_none());
    }

    #[test]
    fn arming_is_test_and_set() {
        let mut foods = manager(0);
        let kind = FoodCatalog::standard().kinds()[0];
        let a = foods.insert(kind, Position::new(3, 3));

        assert_eq!(foods.arm_dormant(), vec![a]);
        assert!(foods.arm_dormant().is_empty());

        let b = foods.insert(kind, Position::new(5, 5));
        assert_eq!(foods.arm_dormant(), vec![b]);
    }

    #[test]
    fn expired_food_moves_and_can_be_rearmed() {
        let board = Board::new(30, 30);
        let snake = snake_at(15, 15);
        let mut foods = manager(10);
        let kind = FoodCatalog::standard().kinds()[2];
        let id = foods.insert(kind, Position::new(12, 12));

        assert!(!foods.mark_expired(id), "dormant food has no timer");
        foods.arm_dormant();
        assert!(foods.mark_expired(id));
        assert!(!foods.mark_expired(id));

        assert_eq!(foods.relocate_stale(&board, &snake), 1);
        let food = foods.get(id).unwrap();
        assert_ne!(food.pos, Position::new(12, 12));
        assert!(board.contains(food.pos));
        assert_eq!(food.status, FoodStatus::Dormant);
        assert_eq!(foods.arm_dormant(), vec![id]);
    }

    #[test]
    fn expiry_of_eaten_food_is_ignored() {
        let mut foods = manager(0);
        let kind = FoodCatalog::standard().kinds()[0];
        let id = foods.insert(kind, Position::new(3, 3));
        foods.arm_dormant();
        foods.take_at(Position::new(3, 3));

        assert!(!foods.mark_expired(id));
    }

    #[test]
    fn shrunk_board_pulls_food_back_in() {
        let board = Board::new(10, 10);
        let snake = snake_at(5, 5);
        let mut foods = manager(0);
        let kind = FoodCatalog::standard().kinds()[0];
        let id = foods.insert(kind, Position::new(40, 20));

        assert_eq!(foods.relocate_stale(&board, &snake), 1);
        assert!(board.contains(foods.get(id).unwrap().pos));
    }

    #[test]
    fn pulling_armed_food_back_in_keeps_its_timer() {
        let board = Board::new(10, 10);
        let snake = snake_at(5, 5);
        let mut foods = manager(0);
        let kind = FoodCatalog::standard().kinds()[0];
        let id = foods.insert(kind, Position::new(40, 20));
        assert_eq!(foods.arm_dormant(), vec![id]);

        assert_eq!(foods.relocate_stale(&board, &snake), 1);
        let food = foods.get(id).unwrap();
        assert!(board.contains(food.pos));
        assert_eq!(food.status, FoodStatus::Armed);
        assert!(foods.arm_dormant().is_empty(), "second timer armed");

        // The original timer still expires it exactly once.
        assert!(foods.mark_expired(id));
        assert!(!foods.mark_expired(id));
    }
}
