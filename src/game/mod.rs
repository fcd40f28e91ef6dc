//! Core game logic module for Snake
//!
//! This module contains the game rules and the tick-driven loop without any
//! I/O or rendering dependencies. Timers and frame output are plugged in
//! through the [`Scheduler`] and [`FrameSink`] traits.

pub mod action;
pub mod config;
pub mod controller;
pub mod scheduler;
pub mod snake;
pub mod state;

// Re-export commonly used types
pub use action::Direction;
pub use config::GameConfig;
pub use controller::{Controller, FrameSink, Phase};
pub use scheduler::{IntervalScheduler, Scheduler};
pub use snake::{Position, Snake};
pub use state::{CollisionType, GameState, Snapshot, TickInfo, TickResult};
