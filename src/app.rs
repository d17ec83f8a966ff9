use color_eyre::Result;
use ratatui::{Terminal, backend::Backend};
use std::time::{Duration, Instant};

use crate::game::Game;
use crate::input::{InputAction, InputManager};
use crate::renderer::GameRenderer;
use crate::scheduler::FrameHandle;
use crate::tuning::Tuning;

/// The main application which holds the state and logic of the application.
pub struct App {
    running: bool,
    game: Game,
    /// Handle of the current run; `None` while nothing should tick.
    frame: Option<FrameHandle>,
    /// Origin of the monotonic clock fed to the game
    clock_origin: Instant,
    /// internal components
    input_manager: InputManager,
    renderer: GameRenderer,
}

impl App {
    /// Construct a new instance of [`App`].
    pub fn new(tuning: Tuning, reports_release: bool) -> Self {
        Self {
            running: true,
            game: Game::new(tuning),
            frame: None,
            clock_origin: Instant::now(),
            input_manager: InputManager::new(reports_release),
            renderer: GameRenderer::new(),
        }
    }

    /// Milliseconds since the app started.
    fn now_ms(&self) -> f64 {
        self.clock_origin.elapsed().as_secs_f64() * 1000.0
    }

    /// Run the application's main loop.
    pub fn run<B: Backend>(mut self, terminal: &mut Terminal<B>) -> Result<()> {
        while self.running {
            terminal.draw(|frame| {
                let snapshot = self.game.snapshot();
                self.renderer.render(frame, &snapshot);
            })?;

            // Poll input events and get actions
            self.input_manager.poll_events(self.game.phase())?;
            let actions = self.input_manager.get_actions().to_vec();
            self.process_actions(&actions);

            if let Some(handle) = self.frame {
                let input = self.input_manager.sample(self.game.phase());
                let now = self.now_ms();
                if let Some(report) = self.game.tick(handle, now, &input)
                    && report.game_over
                {
                    self.stop_ticking();
                }
            }

            // Small sleep to maintain ~60 FPS and prevent CPU spinning
            std::thread::sleep(Duration::from_millis(8));
        }
        Ok(())
    }

    /// Process input actions and update game state accordingly
    fn process_actions(&mut self, actions: &[InputAction]) {
        for action in actions {
            match action {
                InputAction::Quit => {
                    self.running = false;
                }
                // a repeated start or resume in the same batch must not drop
                // the live handle
                InputAction::Start => {
                    if let Some(handle) = self.game.start() {
                        self.frame = Some(handle);
                    }
                }
                InputAction::Pause => {
                    self.game.pause();
                    self.stop_ticking();
                }
                InputAction::Resume => {
                    if let Some(handle) = self.game.resume() {
                        self.frame = Some(handle);
                    }
                }
                InputAction::Restart => {
                    self.game.reset();
                    self.stop_ticking();
                }
            }
        }
    }

    fn stop_ticking(&mut self) {
        self.frame = None;
        self.input_manager.release_all();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::GamePhase;

    #[test]
    fn test_double_start_keeps_frame_handle() {
        let mut app = App::new(Tuning::default(), true);
        app.process_actions(&[InputAction::Start, InputAction::Start]);
        assert_eq!(app.game.phase(), GamePhase::Running);
        assert!(app.frame.is_some());
    }

    #[test]
    fn test_double_resume_keeps_frame_handle() {
        let mut app = App::new(Tuning::default(), true);
        app.process_actions(&[InputAction::Start]);
        app.process_actions(&[InputAction::Pause]);
        assert!(app.frame.is_none());

        app.process_actions(&[InputAction::Resume, InputAction::Resume]);
        assert_eq!(app.game.phase(), GamePhase::Running);
        let handle = app.frame.unwrap();
        let now = app.now_ms();
        assert!(app.game.tick(handle, now, &Default::default()).is_some());
    }

    #[test]
    fn test_restart_and_quit() {
        let mut app = App::new(Tuning::default(), true);
        app.process_actions(&[InputAction::Start, InputAction::Restart]);
        assert_eq!(app.game.phase(), GamePhase::Idle);
        assert!(app.frame.is_none());

        app.process_actions(&[InputAction::Quit]);
        assert!(!app.running);
    }
}
