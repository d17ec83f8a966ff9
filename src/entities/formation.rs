use super::grid::{EnemyClass, EntityGrid};
use crate::tuning::{FormationTuning, Tuning};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Left,
    Right,
}

impl Direction {
    pub fn sign(&self) -> f32 {
        match self {
            Direction::Left => -1.0,
            Direction::Right => 1.0,
        }
    }

    pub fn reversed(&self) -> Self {
        match self {
            Direction::Left => Direction::Right,
            Direction::Right => Direction::Left,
        }
    }
}

/// What a call to [`Formation::advance`] did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepOutcome {
    /// Less than one tick period has elapsed; nothing moved.
    Waiting,
    /// Slid sideways by speed times elapsed time.
    Advanced,
    /// Hit an edge: turned around, dropped and sped up.
    Reversed,
}

/// The three enemy grids moving as one body.
#[derive(Debug, Clone)]
pub struct Formation {
    front: EntityGrid,
    mid: EntityGrid,
    back: EntityGrid,
    direction: Direction,
    /// Horizontal speed in units per second
    shift_factor: f32,
    tick_period_ms: f32,
    tuning: FormationTuning,
}

impl Formation {
    pub fn new(tuning: &Tuning) -> Self {
        Self::from_grids(
            EntityGrid::new(EnemyClass::Front, &tuning.grid),
            EntityGrid::new(EnemyClass::Mid, &tuning.grid),
            EntityGrid::new(EnemyClass::Back, &tuning.grid),
            tuning.formation,
        )
    }

    pub fn from_grids(
        front: EntityGrid,
        mid: EntityGrid,
        back: EntityGrid,
        tuning: FormationTuning,
    ) -> Self {
        Self {
            front,
            mid,
            back,
            direction: Direction::Right,
            shift_factor: tuning.initial_shift_factor,
            tick_period_ms: tuning.initial_tick_period_ms,
            tuning,
        }
    }

    pub fn grid(&self, class: EnemyClass) -> &EntityGrid {
        match class {
            EnemyClass::Front => &self.front,
            EnemyClass::Mid => &self.mid,
            EnemyClass::Back => &self.back,
        }
    }

    pub fn grid_mut(&mut self, class: EnemyClass) -> &mut EntityGrid {
        match class {
            EnemyClass::Front => &mut self.front,
            EnemyClass::Mid => &mut self.mid,
            EnemyClass::Back => &mut self.back,
        }
    }

    pub fn grids(&self) -> [&EntityGrid; 3] {
        [&self.front, &self.mid, &self.back]
    }

    pub fn direction(&self) -> Direction {
        self.direction
    }

    pub fn shift_factor(&self) -> f32 {
        self.shift_factor
    }

    pub fn tick_period_ms(&self) -> f32 {
        self.tick_period_ms
    }

    pub fn downward_shift(&self) -> f32 {
        self.tuning.downward_shift
    }

    pub fn active_count(&self) -> usize {
        self.grids().iter().map(|g| g.active_count()).sum()
    }

    /// Leftmost and rightmost active x across all classes.
    ///
    /// `None` when nothing is active, which never triggers a reversal.
    pub fn horizontal_extremes(&self) -> Option<(f32, f32)> {
        self.grids()
            .into_iter()
            .flat_map(|grid| grid.active_offsets())
            .fold(None::<(f32, f32)>, |acc, (_, (x, _))| match acc {
                None => Some((x, x)),
                Some((left, right)) => Some((left.min(x), right.max(x))),
            })
    }

    /// Offset of the lowest active enemy.
    ///
    /// Classes are scanned back, mid, front; on equal heights the first one
    /// scanned wins.
    pub fn bottommost_active(&self) -> Option<(f32, f32)> {
        [EnemyClass::Back, EnemyClass::Mid, EnemyClass::Front]
            .into_iter()
            .flat_map(|class| self.grid(class).active_offsets())
            .fold(None, |lowest: Option<(f32, f32)>, (_, offset)| match lowest {
                Some(current) if current.1 <= offset.1 => Some(current),
                _ => Some(offset),
            })
    }

    /// Runs one step of the movement state machine if at least one tick
    /// period has elapsed.
    pub fn advance(&mut self, elapsed_ms: f64) -> StepOutcome {
        if elapsed_ms < f64::from(self.tick_period_ms) {
            return StepOutcome::Waiting;
        }

        let bound = self.tuning.reversal_bound;
        let at_edge = match (self.direction, self.horizontal_extremes()) {
            (Direction::Right, Some((_, right))) => right >= bound,
            (Direction::Left, Some((left, _))) => left <= -bound,
            (_, None) => false,
        };

        if at_edge {
            self.reverse();
            StepOutcome::Reversed
        } else {
            let dx = self.direction.sign() * self.shift_factor * (elapsed_ms * 0.001) as f32;
            for class in EnemyClass::HIT_ORDER {
                self.grid_mut(class).shift(dx, 0.0);
            }
            log::trace!("formation slid {dx:+.4}");
            StepOutcome::Advanced
        }
    }

    fn reverse(&mut self) {
        self.direction = self.direction.reversed();
        self.tick_period_ms = (self.tick_period_ms - self.tuning.tick_period_decrement_ms)
            .max(self.tuning.min_tick_period_ms);
        self.shift_factor = (self.shift_factor + self.tuning.shift_factor_increment)
            .min(self.tuning.max_shift_factor);

        let drop = -self.tuning.downward_shift;
        for class in EnemyClass::HIT_ORDER {
            self.grid_mut(class).shift(0.0, drop);
        }

        log::debug!(
            "formation reversed to {:?}: period {}ms, speed {:.3}",
            self.direction,
            self.tick_period_ms,
            self.shift_factor
        );
    }
}
