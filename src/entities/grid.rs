use color_eyre::eyre::{Result, eyre};

use super::collision::Aabb;
use crate::tuning::GridTuning;

/// The three enemy tiers, ordered nearest-the-player first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EnemyClass {
    /// Hard rectangles in the rows nearest the player.
    Front,
    /// Medium circles in the middle rows.
    Mid,
    /// Easy triangles in the top rows.
    Back,
}

impl EnemyClass {
    /// Collision priority: front rows are hit first.
    pub const HIT_ORDER: [EnemyClass; 3] = [EnemyClass::Front, EnemyClass::Mid, EnemyClass::Back];

    pub fn get_points(&self) -> u32 {
        match self {
            EnemyClass::Front => 30,
            EnemyClass::Mid => 20,
            EnemyClass::Back => 10,
        }
    }

    pub fn geometry(&self) -> ClassGeometry {
        match self {
            EnemyClass::Front => ClassGeometry::Rect { half_width: 0.0375, height: 0.05 },
            EnemyClass::Mid => ClassGeometry::Circle { radius: 0.035, center_y: 0.025 },
            EnemyClass::Back => ClassGeometry::Triangle { half_width: 0.025, height: 0.05 },
        }
    }

    /// Rows of this class in the given layout.
    pub fn rows(&self, tuning: &GridTuning) -> usize {
        match self {
            EnemyClass::Front => tuning.front_rows,
            EnemyClass::Mid => tuning.mid_rows,
            EnemyClass::Back => tuning.back_rows,
        }
    }

    /// Index of this class's first row in the top-down layout.
    fn first_row(&self, tuning: &GridTuning) -> usize {
        match self {
            EnemyClass::Back => 0,
            EnemyClass::Mid => tuning.back_rows,
            EnemyClass::Front => tuning.back_rows + tuning.mid_rows,
        }
    }
}

/// Shape of an enemy relative to its offset.
///
/// Collision only ever uses [`ClassGeometry::bounds`]; the shape itself is
/// kept so renderers can draw the right thing.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ClassGeometry {
    /// Apex at `y + height`, base on `y`.
    Triangle { half_width: f32, height: f32 },
    /// Centred on `(x, y + center_y)`.
    Circle { radius: f32, center_y: f32 },
    /// Bottom edge on `y`.
    Rect { half_width: f32, height: f32 },
}

impl ClassGeometry {
    /// Bounding box of the shape anchored at `(x, y)`.
    pub fn bounds(&self, x: f32, y: f32) -> Aabb {
        match *self {
            ClassGeometry::Triangle { half_width, height }
            | ClassGeometry::Rect { half_width, height } => {
                Aabb::new(x - half_width, x + half_width, y, y + height)
            }
            ClassGeometry::Circle { radius, center_y } => Aabb::new(
                x - radius,
                x + radius,
                y + center_y - radius,
                y + center_y + radius,
            ),
        }
    }
}

/// Offsets and active flags of every cell of one class, row-major.
#[derive(Debug, Clone, PartialEq)]
pub struct EntityGrid {
    class: EnemyClass,
    rows: usize,
    cols: usize,
    offsets: Vec<(f32, f32)>,
    active: Vec<bool>,
}

impl EntityGrid {
    /// Lays out a fully active grid for `class` according to `tuning`.
    pub fn new(class: EnemyClass, tuning: &GridTuning) -> Self {
        let rows = class.rows(tuning);
        let cols = tuning.cols;
        let first_row = class.first_row(tuning);

        let mut offsets = Vec::with_capacity(rows * cols);
        for row in 0..rows {
            let y = tuning.origin_y - (first_row + row) as f32 * tuning.row_spacing;
            for col in 0..cols {
                offsets.push((tuning.origin_x + col as f32 * tuning.col_spacing, y));
            }
        }

        Self {
            class,
            rows,
            cols,
            active: vec![true; offsets.len()],
            offsets,
        }
    }

    /// Builds a grid from explicit state.
    ///
    /// Both sequences must hold exactly `rows * cols` cells.
    pub fn from_state(
        class: EnemyClass,
        rows: usize,
        cols: usize,
        offsets: Vec<(f32, f32)>,
        active: Vec<bool>,
    ) -> Result<Self> {
        let expected = rows * cols;
        if offsets.len() != expected || active.len() != expected {
            return Err(eyre!(
                "{class:?} grid expects {expected} cells ({rows}x{cols}), got {} offsets and {} flags",
                offsets.len(),
                active.len()
            ));
        }
        Ok(Self {
            class,
            rows,
            cols,
            offsets,
            active,
        })
    }

    pub fn class(&self) -> EnemyClass {
        self.class
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    pub fn len(&self) -> usize {
        self.offsets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.offsets.is_empty()
    }

    pub fn offsets(&self) -> &[(f32, f32)] {
        &self.offsets
    }

    pub fn active(&self) -> &[bool] {
        &self.active
    }

    pub fn is_active(&self, index: usize) -> bool {
        self.active.get(index).copied().unwrap_or(false)
    }

    pub fn active_count(&self) -> usize {
        self.active.iter().filter(|a| **a).count()
    }

    /// Offsets of active cells only, in render order.
    pub fn active_offsets(&self) -> impl Iterator<Item = (usize, (f32, f32))> + '_ {
        self.offsets
            .iter()
            .zip(&self.active)
            .enumerate()
            .filter(|(_, (_, active))| **active)
            .map(|(i, (offset, _))| (i, *offset))
    }

    /// Bounding box of the cell at `index`.
    pub fn bounds(&self, index: usize) -> Option<Aabb> {
        let (x, y) = *self.offsets.get(index)?;
        Some(self.class.geometry().bounds(x, y))
    }

    /// Returns whether the cell was active before the call.
    pub fn deactivate(&mut self, index: usize) -> bool {
        match self.active.get_mut(index) {
            Some(active) if *active => {
                *active = false;
                true
            }
            _ => false,
        }
    }

    /// Shifts every cell, active or not.
    pub fn shift(&mut self, dx: f32, dy: f32) {
        for (x, y) in &mut self.offsets {
            *x += dx;
            *y += dy;
        }
    }
}
