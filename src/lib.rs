//! Grid Snake - a terminal Snake game driven by a fixed-interval loop
//!
//! This library provides:
//! - Core game rules and the tick loop state machine (game module)
//! - Keyboard mapping (input module)
//! - TUI rendering (render module)
//! - Per-session statistics (metrics module)
//! - The interactive terminal mode (modes module)

pub mod game;
pub mod input;
pub mod metrics;
pub mod modes;
pub mod render;
