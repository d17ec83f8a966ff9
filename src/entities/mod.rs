mod collision;
mod formation;
mod game_state;
mod grid;
mod projectile;
mod shooter;

// Re-export all public types
pub use collision::{Aabb, Hit, resolve};
pub use formation::{Direction, Formation, StepOutcome};
pub use game_state::GamePhase;
pub use grid::{ClassGeometry, EnemyClass, EntityGrid};
pub use projectile::{Projectile, ProjectileManager};
pub use shooter::{InputSample, Shooter};
