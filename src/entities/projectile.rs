use super::collision::{Aabb, Hit, resolve};
use super::formation::Formation;
use crate::tuning::ProjectileTuning;

/// A player shot. `(x, y)` is the bottom-centre of its box.
#[derive(Debug, Clone, PartialEq)]
pub struct Projectile {
    pub x: f32,
    pub y: f32,
    /// Distance moved per tick
    pub velocity: f32,
    pub width: f32,
    pub height: f32,
}

impl Projectile {
    pub fn new(x: f32, y: f32, tuning: &ProjectileTuning) -> Self {
        Self {
            x,
            y,
            velocity: tuning.velocity,
            width: tuning.width,
            height: tuning.height,
        }
    }

    pub fn bounds(&self) -> Aabb {
        let half_width = self.width / 2.0;
        Aabb::new(
            self.x - half_width,
            self.x + half_width,
            self.y,
            self.y + self.height,
        )
    }

    pub fn update(&mut self) {
        self.y += self.velocity;
    }

    pub fn is_out_of_bounds(&self, forward_bound: f32) -> bool {
        self.y > forward_bound
    }
}

/// Owns the in-flight projectiles, oldest first.
#[derive(Debug, Clone)]
pub struct ProjectileManager {
    projectiles: Vec<Projectile>,
    tuning: ProjectileTuning,
}

impl ProjectileManager {
    pub fn new(tuning: ProjectileTuning) -> Self {
        Self {
            projectiles: Vec::with_capacity(tuning.max_projectiles),
            tuning,
        }
    }

    pub fn len(&self) -> usize {
        self.projectiles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.projectiles.is_empty()
    }

    pub fn is_full(&self) -> bool {
        self.projectiles.len() >= self.tuning.max_projectiles
    }

    /// Live projectiles, never more than the configured capacity.
    pub fn as_slice(&self) -> &[Projectile] {
        let live = self.projectiles.len().min(self.tuning.max_projectiles);
        &self.projectiles[..live]
    }

    /// Appends a projectile at `(x, y)` unless the manager is at capacity.
    pub fn fire(&mut self, x: f32, y: f32) -> bool {
        if self.is_full() {
            log::trace!("fire rejected, {} projectiles in flight", self.projectiles.len());
            return false;
        }
        self.projectiles.push(Projectile::new(x, y, &self.tuning));
        true
    }

    /// Moves every projectile one tick, resolving hits against `formation`.
    ///
    /// A projectile that hits is retired without moving; one past the
    /// forward bound is retired without scoring.
    pub fn advance(&mut self, formation: &mut Formation) -> Vec<Hit> {
        let forward_bound = self.tuning.forward_bound;
        let mut hits = Vec::new();

        self.projectiles.retain_mut(|projectile| {
            if let Some(hit) = resolve(projectile, formation) {
                hits.push(hit);
                return false;
            }
            if projectile.is_out_of_bounds(forward_bound) {
                return false;
            }
            projectile.update();
            true
        });

        hits
    }

    pub fn clear(&mut self) {
        self.projectiles.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::grid::{EnemyClass, EntityGrid};
    use crate::tuning::Tuning;

    fn empty_formation() -> Formation {
        let grid = |class| EntityGrid::from_state(class, 0, 0, vec![], vec![]).unwrap();
        Formation::from_grids(
            grid(EnemyClass::Front),
            grid(EnemyClass::Mid),
            grid(EnemyClass::Back),
            Tuning::default().formation,
        )
    }

    #[test]
    fn test_projectile_new() {
        let projectile = Projectile::new(0.1, -0.9, &ProjectileTuning::default());
        assert_eq!(projectile.x, 0.1);
        assert_eq!(projectile.y, -0.9);
        assert_eq!(projectile.velocity, 0.01);
    }

    #[test]
    fn test_bounds_anchor_is_bottom_centre() {
        let projectile = Projectile::new(0.0, 0.5, &ProjectileTuning::default());
        let bounds = projectile.bounds();
        assert_eq!(bounds.min_y, 0.5);
        assert!((bounds.max_y - 0.54).abs() < 1e-6);
        assert!((bounds.min_x - -0.005).abs() < 1e-6);
        assert!((bounds.max_x - 0.005).abs() < 1e-6);
    }

    #[test]
    fn test_projectile_moves_forward_each_tick() {
        let mut manager = ProjectileManager::new(ProjectileTuning::default());
        let mut formation = empty_formation();
        manager.fire(0.0, -0.9);
        manager.advance(&mut formation);
        assert!((manager.as_slice()[0].y - -0.89).abs() < 1e-6);
    }

    #[test]
    fn test_projectile_retired_past_forward_bound() {
        let mut manager = ProjectileManager::new(ProjectileTuning::default());
        let mut formation = empty_formation();
        manager.fire(0.0, 1.0);
        manager.advance(&mut formation);
        assert_eq!(manager.len(), 1);
        manager.advance(&mut formation);
        assert!(manager.is_empty());
    }

    #[test]
    fn test_fire_rejected_at_capacity() {
        let tuning = ProjectileTuning {
            max_projectiles: 2,
            ..ProjectileTuning::default()
        };
        let mut manager = ProjectileManager::new(tuning);
        assert!(manager.fire(0.0, 0.0));
        assert!(manager.fire(0.0, 0.0));
        assert!(manager.is_full());
        assert!(!manager.fire(0.0, 0.0));
        assert_eq!(manager.len(), 2);
    }

    #[test]
    fn test_hit_removes_projectile_and_reports_score() {
        let mut manager = ProjectileManager::new(ProjectileTuning::default());
        let mut formation = Formation::new(&Tuning::default());
        let (x, y) = formation.grid(EnemyClass::Front).offsets()[0];
        manager.fire(x, y);
        manager.fire(0.0, -0.9);

        let hits = manager.advance(&mut formation);
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].points, 30);
        assert_eq!(manager.len(), 1);
        assert_eq!(manager.as_slice()[0].x, 0.0);
    }

    // Property-based tests
    #[cfg(test)]
    mod proptests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn test_never_exceeds_capacity(
                capacity in 1usize..10,
                fires in prop::collection::vec(prop::bool::ANY, 0..100)
            ) {
                let tuning = ProjectileTuning { max_projectiles: capacity, ..ProjectileTuning::default() };
                let mut manager = ProjectileManager::new(tuning);
                let mut formation = empty_formation();
                for fire in fires {
                    if fire {
                        manager.fire(0.0, 0.9);
                    }
                    manager.advance(&mut formation);
                    prop_assert!(manager.len() <= capacity);
                }
            }
        }
    }
}
