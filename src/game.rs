use rand::rngs::StdRng;
use tracing::{debug, info};

use crate::board::{Board, Position};
use crate::food::{FoodCatalog, FoodId, FoodInstance, FoodKind, FoodManager};
use crate::snake::{Collision, Direction, MoveResult, Segment, Snake};

/// Engine tunables. The catalog and RNG are passed separately.
#[derive(Clone, Debug)]
pub struct GameConfig {
    pub initial_food_count: usize,
    pub max_food_count: usize,
    pub boosted_max_food_count: usize,
    /// Score at which `boosted_max_food_count` takes over.
    pub boost_score: u32,
    pub food_inset: i32,
}

impl Default for GameConfig {
    fn default() -> Self {
        GameConfig {
            initial_food_count: 1,
            max_food_count: 3,
            boosted_max_food_count: 4,
            boost_score: 10,
            food_inset: 10,
        }
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum GameOverCause {
    HitWall,
    HitSelf,
    Interrupted,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct GameOver {
    pub score: u32,
    pub cause: GameOverCause,
}

#[derive(Debug, PartialEq, Eq)]
pub enum TickOutcome {
    Running { eaten: Option<FoodInstance> },
    GameOver(GameOver),
}

/// Everything a renderer needs for one frame.
#[derive(Debug)]
pub struct Snapshot<'a> {
    pub body: &'a [Segment],
    pub foods: &'a [FoodInstance],
    pub score: u32,
}

pub struct GameState {
    score: u32,
    snake: Snake,
    food: FoodManager,
    max_food_count: usize,
    config: GameConfig,
    over: Option<GameOver>,
}

impl GameState {
    /// One-segment snake at the board center heading north, plus the
    /// configured number of starting foods.
    pub fn new(board: &Board, catalog: FoodCatalog, config: GameConfig, rng: StdRng) -> Self {
        info!("game init on {}x{} board", board.width, board.height);

        let snake = Snake::new(board.center(), Direction::North);
        info!("snake init at {:?}", snake.head());

        let mut game = GameState::from_layout(snake, &[], catalog, config, rng);
        game.food.place_new_food(game.config.initial_food_count, board, &game.snake);
        game
    }

    /// Starts from an explicit snake and food placement. No random food is
    /// spawned until something is eaten.
    pub fn from_layout(
        snake: Snake,
        foods: &[(FoodKind, Position)],
        catalog: FoodCatalog,
        config: GameConfig,
        rng: StdRng,
    ) -> Self {
        let mut food = FoodManager::new(catalog, config.food_inset, rng);
        for &(kind, pos) in foods {
            food.insert(kind, pos);
        }

        GameState {
            score: 0,
            snake,
            food,
            max_food_count: config.max_food_count,
            config,
            over: None,
        }
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn snake(&self) -> &Snake {
        &self.snake
    }

    #[cfg(test)]
    pub(crate) fn snake_mut(&mut self) -> &mut Snake {
        &mut self.snake
    }

    pub fn foods(&self) -> &[FoodInstance] {
        self.food.foods()
    }

    #[cfg(test)]
    pub(crate) fn food_mut(&mut self) -> &mut FoodManager {
        &mut self.food
    }

    pub fn max_food_count(&self) -> usize {
        self.max_food_count
    }

    pub fn game_over(&self) -> Option<GameOver> {
        self.over
    }

    pub fn request_direction(&mut self, direction: Direction) {
        self.snake.set_direction(direction);
    }

    pub fn snapshot(&self) -> Snapshot<'_> {
        Snapshot { body: self.snake.body(), foods: self.food.foods(), score: self.score }
    }

    /// Marks foods drawn for the first time as armed. Returns the ids that
    /// need an expiry timer.
    pub fn arm_observed_food(&mut self) -> Vec<FoodId> {
        self.food.arm_dormant()
    }

    pub fn expire_food(&mut self, id: FoodId) {
        if self.food.mark_expired(id) {
            debug!("food {:?} expired", id);
        } else {
            debug!("expiry for food {:?} ignored", id);
        }
    }

    /// Ends the game. Only the first call reports; later calls return `None`.
    pub fn end(&mut self, cause: GameOverCause) -> Option<GameOver> {
        if self.over.is_some() {
            return None;
        }

        let over = GameOver { score: self.score, cause };
        info!("game over ({:?}), score {}", cause, self.score);
        self.over = Some(over);
        Some(over)
    }

    /// Advances one step: relocate stale food, move, collide, eat.
    pub fn tick(&mut self, board: &Board) -> TickOutcome {
        if let Some(over) = self.over {
            return TickOutcome::GameOver(over);
        }

        self.food.relocate_stale(board, &self.snake);

        let new_head = match self.snake.move_step(board) {
            MoveResult::Crashed { at, collision } => {
                let cause = match collision {
                    Collision::Wall => GameOverCause::HitWall,
                    Collision::Body => GameOverCause::HitSelf,
                };
                info!("crashed into {:?} at {:?}", collision, at);
                let over = self.end(cause).unwrap_or(GameOver { score: self.score, cause });
                return TickOutcome::GameOver(over);
            }
            MoveResult::Moved { new_head } => new_head,
        };

        let Some(eaten) = self.food.take_at(new_head) else {
            self.snake.drop_tail();
            return TickOutcome::Running { eaten: None };
        };

        self.score += eaten.kind.level;
        info!("ate food {:?} worth {}, score {}", eaten.id, eaten.kind.level, self.score);

        let boosted = self.config.boosted_max_food_count;
        if self.score >= self.config.boost_score && self.max_food_count < boosted {
            self.max_food_count = boosted;
            info!("max food count raised to {}", self.max_food_count);
        }

        self.food.place_new_food(self.max_food_count, board, &self.snake);
        self.snake.paint_head(eaten.kind.look);

        TickOutcome::Running { eaten: Some(eaten) }
    }
}
