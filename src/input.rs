use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use std::time::{Duration, Instant};

use crate::entities::{GamePhase, InputSample};

/// How long a press counts as held when the terminal never reports releases.
const HOLD_WINDOW: Duration = Duration::from_millis(120);

/// Represents semantic game actions that can be triggered by input
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputAction {
    Start,
    Pause,
    Resume,
    Restart,
    Quit,
}

#[derive(Debug, Default, Clone, Copy)]
struct HeldKey {
    down: bool,
    last_press: Option<Instant>,
}

impl HeldKey {
    fn press(&mut self, now: Instant) {
        self.down = true;
        self.last_press = Some(now);
    }

    fn release(&mut self) {
        self.down = false;
    }

    fn is_held(&self, now: Instant, decay: Option<Duration>) -> bool {
        match decay {
            None => self.down,
            Some(window) => {
                self.down
                    && self
                        .last_press
                        .is_some_and(|pressed| now.saturating_duration_since(pressed) <= window)
            }
        }
    }
}

/// Tracks the state of keys that can be held down for continuous input
#[derive(Debug, Default)]
struct KeyState {
    left: HeldKey,
    right: HeldKey,
    fire: HeldKey,
}

/// Manages input polling and translates raw key events into game actions
pub struct InputManager {
    key_state: KeyState,
    oneshot_actions: Vec<InputAction>,
    /// `None` when the terminal reports key releases.
    hold_decay: Option<Duration>,
}

impl InputManager {
    /// `reports_release` should be true when keyboard enhancement with event
    /// types is active; otherwise held keys expire shortly after the last
    /// press or repeat.
    pub fn new(reports_release: bool) -> Self {
        Self {
            key_state: KeyState::default(),
            oneshot_actions: Vec::new(),
            hold_decay: if reports_release { None } else { Some(HOLD_WINDOW) },
        }
    }

    /// Polls for all input events and stores one-shot actions
    /// Should be called once per frame before getting actions
    pub fn poll_events(&mut self, phase: GamePhase) -> color_eyre::Result<()> {
        self.oneshot_actions.clear();

        while event::poll(Duration::from_millis(0))? {
            if let Event::Key(key_event) = event::read()? {
                self.handle_key_event(key_event, phase, Instant::now());
            }
        }

        Ok(())
    }

    fn handle_key_event(&mut self, key_event: KeyEvent, phase: GamePhase, now: Instant) {
        match key_event.kind {
            KeyEventKind::Press => self.handle_key_press(key_event, phase, now),
            KeyEventKind::Repeat => self.handle_held_key(key_event.code, phase, now),
            KeyEventKind::Release => self.handle_key_release(key_event.code),
        }
    }

    fn handle_key_press(&mut self, key_event: KeyEvent, phase: GamePhase, now: Instant) {
        // Quit works in any phase
        if matches!(
            key_event.code,
            KeyCode::Char('q') | KeyCode::Char('Q') | KeyCode::Esc
        ) || (key_event.code == KeyCode::Char('c')
            && key_event.modifiers.contains(KeyModifiers::CONTROL))
        {
            self.oneshot_actions.push(InputAction::Quit);
            return;
        }

        let action = match (phase, key_event.code) {
            (GamePhase::Idle, KeyCode::Enter | KeyCode::Char(' ' | 's' | 'S')) => {
                Some(InputAction::Start)
            }
            (GamePhase::Running, KeyCode::Char('p' | 'P')) => Some(InputAction::Pause),
            (GamePhase::Paused, KeyCode::Char('p' | 'P')) => Some(InputAction::Resume),
            (GamePhase::Over, KeyCode::Char('r' | 'R')) => Some(InputAction::Restart),
            _ => None,
        };
        if let Some(action) = action {
            self.oneshot_actions.push(action);
            return;
        }

        self.handle_held_key(key_event.code, phase, now);
    }

    /// Continuous keys are only tracked while running.
    fn handle_held_key(&mut self, code: KeyCode, phase: GamePhase, now: Instant) {
        if !phase.is_running() {
            return;
        }
        match code {
            KeyCode::Char('a' | 'A') | KeyCode::Left => {
                self.key_state.left.press(now);
                self.key_state.right.release();
            }
            KeyCode::Char('d' | 'D') | KeyCode::Right => {
                self.key_state.right.press(now);
                self.key_state.left.release();
            }
            KeyCode::Char(' ') => self.key_state.fire.press(now),
            _ => {}
        }
    }

    fn handle_key_release(&mut self, code: KeyCode) {
        match code {
            KeyCode::Char('a' | 'A') | KeyCode::Left => self.key_state.left.release(),
            KeyCode::Char('d' | 'D') | KeyCode::Right => self.key_state.right.release(),
            KeyCode::Char(' ') => self.key_state.fire.release(),
            _ => {}
        }
    }

    /// One-shot actions collected by the last [`InputManager::poll_events`].
    pub fn get_actions(&self) -> &[InputAction] {
        &self.oneshot_actions
    }

    /// Held left/right/fire intent for this frame.
    pub fn sample(&self, phase: GamePhase) -> InputSample {
        self.sample_at(phase, Instant::now())
    }

    fn sample_at(&self, phase: GamePhase, now: Instant) -> InputSample {
        if !phase.is_running() {
            return InputSample::default();
        }
        InputSample {
            left: self.key_state.left.is_held(now, self.hold_decay),
            right: self.key_state.right.is_held(now, self.hold_decay),
            fire: self.key_state.fire.is_held(now, self.hold_decay),
        }
    }

    /// Drops every held key, e.g. when play stops.
    pub fn release_all(&mut self) {
        self.key_state = KeyState::default();
    }
}
