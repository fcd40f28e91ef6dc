use anyhow::Result;
use rand::{rngs::StdRng, Rng, SeedableRng};
use std::time::Duration;
use tracing::debug;

use super::{
    action::Direction,
    config::GameConfig,
    snake::{Position, Snake},
};

/// Type of collision that ended a game
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CollisionType {
    /// Snake left the grid
    Wall,
    /// Snake ran into its own body
    SelfCollision,
}

/// Read-only copy of the game handed to renderers
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Snapshot {
    /// Snake cells, head first
    pub snake: Vec<Position>,
    /// `None` once the board is full
    pub food: Option<Position>,
    pub direction: Direction,
    pub score: u32,
    pub over: bool,
    pub won: bool,
    pub speed_ms: u64,
    pub grid_width: usize,
    pub grid_height: usize,
}

impl Snapshot {
    pub fn head(&self) -> Position {
        self.snake[0]
    }
}

/// Information about a tick
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TickInfo {
    /// Whether the snake ate food this tick
    pub ate_food: bool,
    /// Type of collision if one occurred
    pub collision_type: Option<CollisionType>,
    /// The snake filled every cell, leaving nowhere for food
    pub board_full: bool,
    /// New tick interval when this tick sped the game up
    pub new_speed_ms: Option<u64>,
}

/// Result of a game tick
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TickResult {
    /// Whether the game has ended
    pub terminated: bool,
    pub info: TickInfo,
    /// State after the tick
    pub snapshot: Snapshot,
}

/// Owner of everything that changes during a game
///
/// The controller drives it through [`GameState::reset`],
/// [`GameState::request_direction`] and [`GameState::tick`].
#[derive(Debug, Clone)]
pub struct GameState {
    pub snake: Snake,
    pub food: Option<Position>,
    /// Direction applied by the most recent tick
    pub direction: Direction,
    /// Direction the next tick will commit
    pub pending_direction: Direction,
    pub score: u32,
    /// Current tick interval in milliseconds
    pub speed_ms: u64,
    pub steps: u32,
    pub over: bool,
    pub won: bool,
    config: GameConfig,
    seed: u64,
    rng: StdRng,
}

impl GameState {
    /// Create a game with a random seed
    pub fn new(config: GameConfig) -> Result<Self> {
        Self::with_seed(config, rand::random())
    }

    /// Create a game whose food placement is driven by `seed`
    pub fn with_seed(config: GameConfig, seed: u64) -> Result<Self> {
        config.validate().map_err(anyhow::Error::msg)?;

        let mut state = Self {
            snake: Snake::new(Position::new(0, 0), Direction::Right, 1),
            food: None,
            direction: Direction::Right,
            pending_direction: Direction::Right,
            score: 0,
            speed_ms: config.initial_speed_ms,
            steps: 0,
            over: false,
            won: false,
            config,
            seed,
            rng: StdRng::seed_from_u64(seed),
        };
        state.reset();

        Ok(state)
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    /// Put the game back to its starting position
    ///
    /// Resetting twice without ticking in between gives the same board: the
    /// food generator is reseeded from a per-game seed, which only moves on
    /// once a game has been played.
    pub fn reset(&mut self) {
        if self.steps > 0 {
            self.seed = self.rng.gen();
        }
        self.rng = StdRng::seed_from_u64(self.seed);

        let center = Position::new(
            (self.config.grid_width / 2) as i32,
            (self.config.grid_height / 2) as i32,
        );
        self.snake = Snake::new(center, Direction::Right, self.config.initial_snake_length);
        self.direction = Direction::Right;
        self.pending_direction = Direction::Right;
        self.score = 0;
        self.speed_ms = self.config.initial_speed_ms;
        self.steps = 0;
        self.over = false;
        self.won = false;
        self.food = self.spawn_food();
    }

    /// Buffer a turn for the next tick
    ///
    /// A request pointing back the way the snake last moved is dropped.
    /// Later requests overwrite earlier ones until the tick commits.
    pub fn request_direction(&mut self, direction: Direction) {
        if !self.direction.is_opposite(direction) {
            self.pending_direction = direction;
        }
    }

    /// Advance the game by one step
    pub fn tick(&mut self) -> TickResult {
        if self.over {
            return self.result(true, TickInfo::default());
        }

        self.direction = self.pending_direction;
        let new_head = self.snake.head().moved_in_direction(self.direction);

        if let Some(collision_type) = self.check_collision(new_head) {
            self.over = true;
            self.steps += 1;
            return self.result(
                true,
                TickInfo {
                    collision_type: Some(collision_type),
                    ..TickInfo::default()
                },
            );
        }

        self.snake.push_head(new_head);
        self.steps += 1;

        if self.food != Some(new_head) {
            self.snake.pop_tail();
            return self.result(false, TickInfo::default());
        }

        self.score += self.config.food_score;
        self.food = self.spawn_food();
        debug!(score = self.score, length = self.snake.len(), "food eaten");

        if self.food.is_none() {
            self.over = true;
            self.won = true;
            return self.result(
                true,
                TickInfo {
                    ate_food: true,
                    board_full: true,
                    ..TickInfo::default()
                },
            );
        }

        let new_speed_ms = self.maybe_speed_up();

        self.result(
            false,
            TickInfo {
                ate_food: true,
                new_speed_ms,
                ..TickInfo::default()
            },
        )
    }

    /// Current tick interval
    pub fn tick_interval(&self) -> Duration {
        Duration::from_millis(self.speed_ms)
    }

    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            snake: self.snake.to_vec(),
            food: self.food,
            direction: self.direction,
            score: self.score,
            over: self.over,
            won: self.won,
            speed_ms: self.speed_ms,
            grid_width: self.config.grid_width,
            grid_height: self.config.grid_height,
        }
    }

    /// Check if a position is within the grid bounds
    pub fn is_in_bounds(&self, pos: Position) -> bool {
        pos.x >= 0
            && pos.x < self.config.grid_width as i32
            && pos.y >= 0
            && pos.y < self.config.grid_height as i32
    }

    fn check_collision(&self, pos: Position) -> Option<CollisionType> {
        if !self.is_in_bounds(pos) {
            return Some(CollisionType::Wall);
        }

        if self.snake.collides_ignoring_tail(pos) {
            return Some(CollisionType::SelfCollision);
        }

        None
    }

    fn maybe_speed_up(&mut self) -> Option<u64> {
        if self.score % self.config.speed_up_every != 0 || self.speed_ms <= self.config.min_speed_ms
        {
            return None;
        }

        let faster = self
            .speed_ms
            .saturating_sub(self.config.speed_step_ms)
            .max(self.config.min_speed_ms);
        if faster == self.speed_ms {
            return None;
        }

        self.speed_ms = faster;
        debug!(speed_ms = faster, score = self.score, "speed increased");
        Some(faster)
    }

    /// Pick a random free cell by rejection sampling
    ///
    /// Returns `None` when the snake covers the whole board.
    fn spawn_food(&mut self) -> Option<Position> {
        if self.snake.len() >= self.config.cell_count() {
            return None;
        }

        loop {
            let x = self.rng.gen_range(0..self.config.grid_width) as i32;
            let y = self.rng.gen_range(0..self.config.grid_height) as i32;
            let pos = Position::new(x, y);

            if !self.snake.occupies(pos) {
                return Some(pos);
            }
        }
    }

    fn result(&self, terminated: bool, info: TickInfo) -> TickResult {
        TickResult {
            terminated,
            info,
            snapshot: self.snapshot(),
        }
    }
}
