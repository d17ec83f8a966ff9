//! Projectile versus formation hit testing.

use super::formation::Formation;
use super::grid::EnemyClass;
use super::projectile::Projectile;

/// Axis-aligned bounding box in play-field units (y grows upwards).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Aabb {
    pub min_x: f32,
    pub max_x: f32,
    pub min_y: f32,
    pub max_y: f32,
}

impl Aabb {
    pub fn new(min_x: f32, max_x: f32, min_y: f32, max_y: f32) -> Self {
        Self {
            min_x,
            max_x,
            min_y,
            max_y,
        }
    }

    /// Closed-interval overlap: boxes that only touch still overlap.
    pub fn overlaps(&self, other: &Aabb) -> bool {
        !(self.max_x < other.min_x
            || self.min_x > other.max_x
            || self.max_y < other.min_y
            || self.min_y > other.max_y)
    }
}

/// A kill reported by [`resolve`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Hit {
    pub class: EnemyClass,
    pub index: usize,
    pub points: u32,
}

/// Tests `projectile` against every active enemy, front rows first, and
/// deactivates the first one it overlaps.
pub fn resolve(projectile: &Projectile, formation: &mut Formation) -> Option<Hit> {
    let bounds = projectile.bounds();

    for class in EnemyClass::HIT_ORDER {
        let grid = formation.grid_mut(class);
        let hit = grid
            .active_offsets()
            .find(|(_, (x, y))| class.geometry().bounds(*x, *y).overlaps(&bounds))
            .map(|(index, _)| index);

        if let Some(index) = hit {
            grid.deactivate(index);
            log::debug!("{class:?} enemy {index} destroyed");
            return Some(Hit {
                class,
                index,
                points: class.get_points(),
            });
        }
    }

    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::grid::EntityGrid;
    use crate::tuning::{ProjectileTuning, Tuning};

    fn single_cell(class: EnemyClass, x: f32, y: f32) -> EntityGrid {
        EntityGrid::from_state(class, 1, 1, vec![(x, y)], vec![true]).unwrap()
    }

    fn empty(class: EnemyClass) -> EntityGrid {
        EntityGrid::from_state(class, 0, 0, vec![], vec![]).unwrap()
    }

    fn formation(front: EntityGrid, mid: EntityGrid, back: EntityGrid) -> Formation {
        Formation::from_grids(front, mid, back, Tuning::default().formation)
    }

    #[test]
    fn test_overlap_is_boundary_inclusive() {
        let a = Aabb::new(0.0, 1.0, 0.0, 1.0);
        let touching = Aabb::new(1.0, 2.0, 1.0, 2.0);
        let apart = Aabb::new(1.01, 2.0, 0.0, 1.0);
        assert!(a.overlaps(&touching));
        assert!(touching.overlaps(&a));
        assert!(!a.overlaps(&apart));
    }

    #[test]
    fn test_front_row_has_priority() {
        let mut formation = formation(
            single_cell(EnemyClass::Front, 0.0, 0.0),
            empty(EnemyClass::Mid),
            single_cell(EnemyClass::Back, 0.0, 0.0),
        );
        let projectile = Projectile::new(0.0, 0.01, &ProjectileTuning::default());

        let hit = resolve(&projectile, &mut formation).unwrap();
        assert_eq!(hit.class, EnemyClass::Front);
        assert_eq!(hit.points, 30);
        assert_eq!(formation.grid(EnemyClass::Front).active_count(), 0);
        assert_eq!(formation.grid(EnemyClass::Back).active_count(), 1);
    }

    #[test]
    fn test_one_kill_per_projectile() {
        let front = EntityGrid::from_state(
            EnemyClass::Front,
            1,
            2,
            vec![(0.0, 0.0), (0.01, 0.0)],
            vec![true, true],
        )
        .unwrap();
        let mut formation = formation(front, empty(EnemyClass::Mid), empty(EnemyClass::Back));
        let projectile = Projectile::new(0.005, 0.0, &ProjectileTuning::default());

        assert!(resolve(&projectile, &mut formation).is_some());
        assert_eq!(formation.grid(EnemyClass::Front).active_count(), 1);
    }

    #[test]
    fn test_inactive_enemies_are_ignored() {
        let back =
            EntityGrid::from_state(EnemyClass::Back, 1, 1, vec![(0.0, 0.0)], vec![false]).unwrap();
        let mut formation = formation(empty(EnemyClass::Front), empty(EnemyClass::Mid), back);
        let projectile = Projectile::new(0.0, 0.0, &ProjectileTuning::default());

        assert_eq!(resolve(&projectile, &mut formation), None);
    }

    #[test]
    fn test_miss_returns_none() {
        let mut formation = formation(
            single_cell(EnemyClass::Front, 0.5, 0.5),
            empty(EnemyClass::Mid),
            empty(EnemyClass::Back),
        );
        let projectile = Projectile::new(-0.5, -0.5, &ProjectileTuning::default());
        assert_eq!(resolve(&projectile, &mut formation), None);
        assert_eq!(formation.active_count(), 1);
    }

    #[cfg(test)]
    mod proptests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn test_at_most_one_kill(
                x in -0.2f32..0.2,
                y in -0.2f32..0.2,
            ) {
                let tuning = Tuning::default();
                let mut formation = Formation::new(&tuning);
                let before = formation.active_count();
                let projectile = Projectile::new(x, y, &tuning.projectile);

                let hit = resolve(&projectile, &mut formation);
                let killed = before - formation.active_count();
                prop_assert_eq!(killed, usize::from(hit.is_some()));
            }
        }
    }
}
