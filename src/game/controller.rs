//! Game loop state machine
//!
//! The controller owns the lifecycle (`Idle -> Running -> GameOver`), arms and
//! disarms the tick timer, and pushes a snapshot to the frame sink whenever
//! the visible state changes. Timing is abstracted behind [`Scheduler`] so the
//! whole loop can be driven by hand in tests.

use tracing::{debug, info};

use super::{
    action::Direction,
    scheduler::Scheduler,
    state::{GameState, Snapshot, TickResult},
};

/// Consumer of game snapshots, usually a renderer
pub trait FrameSink {
    fn present(&mut self, snapshot: &Snapshot);
}

/// Lifecycle of a single game
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Idle,
    Running,
    GameOver,
}

pub struct Controller<S: Scheduler, F: FrameSink> {
    state: GameState,
    scheduler: S,
    sink: F,
    phase: Phase,
}

impl<S: Scheduler, F: FrameSink> Controller<S, F> {
    /// Wrap a freshly reset game and show its first frame
    pub fn new(state: GameState, scheduler: S, sink: F) -> Self {
        let mut controller = Self {
            state,
            scheduler,
            sink,
            phase: Phase::Idle,
        };
        controller.present();
        controller
    }

    /// Begin ticking; ignored unless idle
    pub fn start(&mut self) {
        if self.phase != Phase::Idle {
            return;
        }

        self.phase = Phase::Running;
        self.scheduler.arm(self.state.tick_interval());
        let config = self.state.config();
        info!(
            width = config.grid_width,
            height = config.grid_height,
            speed_ms = self.state.speed_ms,
            "game started"
        );
    }

    /// Throw away the current game and go back to idle
    pub fn restart(&mut self) {
        self.scheduler.disarm();
        self.state.reset();
        self.phase = Phase::Idle;
        info!("game restarted");
        self.present();
    }

    /// Handle one timer firing
    pub fn on_timer(&mut self) -> Option<TickResult> {
        if self.phase != Phase::Running {
            return None;
        }

        let result = self.state.tick();

        if result.terminated {
            self.phase = Phase::GameOver;
            self.scheduler.disarm();
            info!(
                score = result.snapshot.score,
                length = result.snapshot.snake.len(),
                won = result.snapshot.won,
                collision = ?result.info.collision_type,
                "game over"
            );
        } else if result.info.new_speed_ms.is_some() {
            self.scheduler.disarm();
            self.scheduler.arm(self.state.tick_interval());
            debug!(speed_ms = self.state.speed_ms, "timer re-armed");
        }

        self.sink.present(&result.snapshot);
        Some(result)
    }

    /// Turn the snake; only honoured while the game is running
    pub fn steer(&mut self, direction: Direction) {
        if self.phase == Phase::Running {
            self.state.request_direction(direction);
        }
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn score(&self) -> u32 {
        self.state.score
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    pub fn scheduler_mut(&mut self) -> &mut S {
        &mut self.scheduler
    }

    pub fn sink(&self) -> &F {
        &self.sink
    }

    fn present(&mut self) {
        let snapshot = self.state.snapshot();
        self.sink.present(&snapshot);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::{GameConfig, Position, Snake};
    use std::time::Duration;

    #[derive(Debug, Default)]
    struct ManualScheduler {
        period: Option<Duration>,
        arms: Vec<Duration>,
        disarms: usize,
    }

    impl Scheduler for ManualScheduler {
        fn arm(&mut self, period: Duration) {
            self.period = Some(period);
            self.arms.push(period);
        }

        fn disarm(&mut self) {
            self.period = None;
            self.disarms += 1;
        }

        fn is_armed(&self) -> bool {
            self.period.is_some()
        }
    }

    #[derive(Debug, Default)]
    struct RecordingSink {
        frames: Vec<Snapshot>,
    }

    impl FrameSink for RecordingSink {
        fn present(&mut self, snapshot: &Snapshot) {
            self.frames.push(snapshot.clone());
        }
    }

    fn controller() -> Controller<ManualScheduler, RecordingSink> {
        let state = GameState::with_seed(GameConfig::default(), 21).unwrap();
        Controller::new(state, ManualScheduler::default(), RecordingSink::default())
    }

    fn last_frame(controller: &Controller<ManualScheduler, RecordingSink>) -> &Snapshot {
        controller.sink().frames.last().unwrap()
    }

    #[test]
    fn test_initial_frame_presented() {
        let controller = controller();
        assert_eq!(controller.phase(), Phase::Idle);
        assert_eq!(controller.sink().frames.len(), 1);
        assert!(!controller.scheduler.is_armed());
    }

    #[test]
    fn test_start_arms_timer_once() {
        let mut controller = controller();
        controller.start();
        controller.start();

        assert_eq!(controller.phase(), Phase::Running);
        assert_eq!(controller.scheduler.arms, vec![Duration::from_millis(150)]);
    }

    #[test]
    fn test_timer_ignored_when_not_running() {
        let mut controller = controller();
        assert!(controller.on_timer().is_none());
        assert_eq!(controller.state().steps, 0);
        assert_eq!(controller.sink().frames.len(), 1);
    }

    #[test]
    fn test_tick_presents_frame() {
        let mut controller = controller();
        controller.state.food = Some(Position::new(0, 0));
        controller.start();

        let result = controller.on_timer().unwrap();

        assert!(!result.terminated);
        assert_eq!(controller.sink().frames.len(), 2);
        assert_eq!(last_frame(&controller).head(), Position::new(16, 10));
    }

    #[test]
    fn test_steer_only_while_running() {
        let mut controller = controller();
        controller.steer(Direction::Up);
        assert_eq!(controller.state().pending_direction, Direction::Right);

        controller.start();
        controller.steer(Direction::Up);
        assert_eq!(controller.state().pending_direction, Direction::Up);
    }

    #[test]
    fn test_collision_ends_game() {
        let mut controller = controller();
        controller.state.snake = Snake::new(Position::new(29, 10), Direction::Right, 1);
        controller.state.food = Some(Position::new(0, 0));
        controller.start();

        let result = controller.on_timer().unwrap();

        assert!(result.terminated);
        assert_eq!(controller.phase(), Phase::GameOver);
        assert!(!controller.scheduler.is_armed());
        assert!(last_frame(&controller).over);

        // Frozen: no more ticks, no steering, no restart via start()
        assert!(controller.on_timer().is_none());
        controller.steer(Direction::Up);
        controller.start();
        assert_eq!(controller.phase(), Phase::GameOver);
        assert_eq!(controller.state().pending_direction, Direction::Right);
    }

    #[test]
    fn test_full_board_win_ends_game() {
        let state = GameState::with_seed(GameConfig::new(2, 2), 5).unwrap();
        let mut controller =
            Controller::new(state, ManualScheduler::default(), RecordingSink::default());
        controller.state.snake = Snake::from_cells([
            Position::new(0, 0),
            Position::new(0, 1),
            Position::new(1, 1),
        ])
        .unwrap();
        controller.state.food = Some(Position::new(1, 0));
        controller.start();

        let result = controller.on_timer().unwrap();

        assert!(result.terminated);
        assert!(result.info.board_full);
        assert_eq!(controller.phase(), Phase::GameOver);
        assert!(!controller.scheduler.is_armed());
        assert_eq!(controller.scheduler.disarms, 1);

        let frame = last_frame(&controller);
        assert!(frame.won);
        assert!(frame.over);
        assert_eq!(frame.food, None);
        assert_eq!(frame.snake.len(), 4);
        assert!(controller.on_timer().is_none());
    }

    #[test]
    fn test_speed_up_rearms_timer() {
        let mut controller = controller();
        controller.state.score = 40;
        controller.state.food = Some(Position::new(16, 10));
        controller.start();

        let result = controller.on_timer().unwrap();

        assert_eq!(result.info.new_speed_ms, Some(140));
        assert_eq!(controller.phase(), Phase::Running);
        assert_eq!(controller.scheduler.disarms, 1);
        assert_eq!(
            controller.scheduler.arms,
            vec![Duration::from_millis(150), Duration::from_millis(140)]
        );
        assert_eq!(controller.scheduler.period, Some(Duration::from_millis(140)));
    }

    #[test]
    fn test_restart_returns_to_idle() {
        let mut controller = controller();
        controller.start();
        controller.on_timer();

        controller.restart();

        assert_eq!(controller.phase(), Phase::Idle);
        assert!(!controller.scheduler.is_armed());
        assert_eq!(controller.score(), 0);
        assert_eq!(last_frame(&controller).snake, vec![Position::new(15, 10)]);

        controller.start();
        assert_eq!(controller.phase(), Phase::Running);
    }

    #[test]
    fn test_restart_twice_is_idempotent() {
        let mut controller = controller();
        controller.start();
        controller.on_timer();

        controller.restart();
        let first = last_frame(&controller).clone();
        controller.restart();
        let second = last_frame(&controller).clone();

        assert_eq!(first, second);
    }
}
