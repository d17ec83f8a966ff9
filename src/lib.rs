// Library exports for testing
pub use entities::{
    Direction, EnemyClass, EntityGrid, Formation, GamePhase, InputSample, Projectile,
    ProjectileManager, Shooter, StepOutcome,
};
pub use game::{Game, SessionStats, Snapshot, TickReport};
pub use scheduler::{Cadence, FrameHandle, FrameScheduler};
pub use tuning::Tuning;

pub mod app;
pub mod entities;
pub mod game;
pub mod input;
pub mod renderer;
pub mod scheduler;
pub mod tuning;
