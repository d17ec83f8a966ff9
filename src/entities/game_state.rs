/// Lifecycle of a game session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum GamePhase {
    /// Waiting for the start signal.
    #[default]
    Idle,
    Running,
    Paused,
    /// Finished; frozen until reset.
    Over,
}

impl GamePhase {
    pub fn is_running(&self) -> bool {
        matches!(self, GamePhase::Running)
    }

    pub fn get_name(&self) -> &'static str {
        match self {
            GamePhase::Idle => "Idle",
            GamePhase::Running => "Running",
            GamePhase::Paused => "Paused",
            GamePhase::Over => "Game Over",
        }
    }
}
