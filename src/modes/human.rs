use anyhow::{Context, Result};
use crossterm::{
    cursor::Show,
    event::{Event, EventStream, KeyEventKind},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use futures::StreamExt;
use ratatui::{Terminal, backend::CrosstermBackend};
use std::io::{Stderr, stderr};
use std::time::Duration;
use tokio::time::interval;
use tracing::{error, info};

use crate::game::{Controller, GameState, IntervalScheduler, Phase};
use crate::input::{InputHandler, KeyAction};
use crate::metrics::GameMetrics;
use crate::render::{LatestFrame, Renderer};

/// Interactive play in the terminal
pub struct HumanMode {
    controller: Controller<IntervalScheduler, LatestFrame>,
    metrics: GameMetrics,
    renderer: Renderer,
    input_handler: InputHandler,
    should_quit: bool,
}

impl HumanMode {
    pub fn new(state: GameState) -> Self {
        Self {
            controller: Controller::new(state, IntervalScheduler::new(), LatestFrame::new()),
            metrics: GameMetrics::new(),
            renderer: Renderer::new(),
            input_handler: InputHandler::new(),
            should_quit: false,
        }
    }

    pub async fn run(&mut self) -> Result<()> {
        enable_raw_mode().context("Failed to enable raw mode")?;

        // Whatever happens after raw mode is on, the terminal gets restored
        let result = match setup_terminal() {
            Ok(mut terminal) => self.run_game_loop(&mut terminal).await,
            Err(err) => Err(err),
        };

        restore_terminal();

        result
    }

    async fn run_game_loop(
        &mut self,
        terminal: &mut Terminal<CrosstermBackend<Stderr>>,
    ) -> Result<()> {
        let mut event_stream = EventStream::new();

        // Render at 30 FPS; game ticks come from the controller's scheduler
        let mut render_timer = interval(Duration::from_millis(33));

        loop {
            tokio::select! {
                maybe_event = event_stream.next() => {
                    match maybe_event {
                        Some(Ok(event)) => self.handle_event(event),
                        Some(Err(err)) => {
                            return Err(err).context("Failed to read terminal event");
                        }
                        None => self.should_quit = true,
                    }
                }

                _ = self.controller.scheduler_mut().fired() => {
                    self.update_game();
                }

                _ = render_timer.tick() => {
                    self.metrics.update();
                    self.draw(terminal)?;
                }

                _ = tokio::signal::ctrl_c() => {
                    self.should_quit = true;
                }
            }

            if self.should_quit {
                info!("quitting");
                break;
            }
        }

        Ok(())
    }

    fn handle_event(&mut self, event: Event) {
        let Event::Key(key) = event else {
            return;
        };

        // Only process key press events, not release
        if key.kind != KeyEventKind::Press {
            return;
        }

        match self.input_handler.handle_key_event(key) {
            KeyAction::Steer(direction) => self.controller.steer(direction),
            KeyAction::Start => self.start_game(),
            KeyAction::Restart => self.reset_game(),
            KeyAction::Quit => self.should_quit = true,
            KeyAction::None => {}
        }
    }

    fn start_game(&mut self) {
        if self.controller.phase() == Phase::Idle {
            self.controller.start();
            self.metrics.on_game_start();
        }
    }

    fn update_game(&mut self) {
        if let Some(result) = self.controller.on_timer() {
            if result.terminated {
                self.metrics.on_game_over(result.snapshot.score);
            }
        }
    }

    fn reset_game(&mut self) {
        self.controller.restart();
        self.metrics.on_restart();
    }

    fn draw(&self, terminal: &mut Terminal<CrosstermBackend<Stderr>>) -> Result<()> {
        let Some(snapshot) = self.controller.sink().snapshot() else {
            return Ok(());
        };
        let phase = self.controller.phase();

        terminal
            .draw(|frame| {
                self.renderer.render(frame, snapshot, phase, &self.metrics);
            })
            .context("Failed to draw frame")?;

        Ok(())
    }
}

fn setup_terminal() -> Result<Terminal<CrosstermBackend<Stderr>>> {
    let mut stderr = stderr();
    execute!(stderr, EnterAlternateScreen).context("Failed to enter alternate screen")?;
    let backend = CrosstermBackend::new(stderr);
    let mut terminal = Terminal::new(backend).context("Failed to create terminal")?;
    terminal.hide_cursor().context("Failed to hide cursor")?;
    terminal.clear().context("Failed to clear terminal")?;
    Ok(terminal)
}

/// Undo every terminal change; each step runs even if an earlier one failed
///
/// Returns the number of steps that failed.
fn restore_terminal() -> usize {
    let mut failures = 0;

    if let Err(err) = disable_raw_mode() {
        error!(?err, "failed to disable raw mode");
        failures += 1;
    }
    if let Err(err) = execute!(stderr(), LeaveAlternateScreen) {
        error!(?err, "failed to leave alternate screen");
        failures += 1;
    }
    if let Err(err) = execute!(stderr(), Show) {
        error!(?err, "failed to show cursor");
        failures += 1;
    }

    failures
}
