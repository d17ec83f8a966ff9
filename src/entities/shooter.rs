use crate::scheduler::Cadence;
use crate::tuning::ShooterTuning;

/// Left/right/fire intent sampled once per frame.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct InputSample {
    pub left: bool,
    pub right: bool,
    pub fire: bool,
}

/// The player's ship, sliding along the bottom edge.
#[derive(Debug, Clone)]
pub struct Shooter {
    offset_x: f32,
    fire_cooldown: u8,
    clock: Cadence,
    tuning: ShooterTuning,
}

impl Shooter {
    pub fn new(tuning: ShooterTuning) -> Self {
        Self {
            offset_x: 0.0,
            fire_cooldown: 0,
            clock: Cadence::new(),
            tuning,
        }
    }

    pub fn offset_x(&self) -> f32 {
        self.offset_x
    }

    pub fn offset_y(&self) -> f32 {
        self.tuning.offset_y
    }

    pub fn half_width(&self) -> f32 {
        self.tuning.half_width
    }

    pub fn height(&self) -> f32 {
        self.tuning.height
    }

    /// Moves according to held input once per sampling period, scaled by the
    /// time since the previous sample. Left wins when both are held.
    pub fn sample(&mut self, now: f64, input: &InputSample) {
        let Some(elapsed) = self
            .clock
            .poll(now, f64::from(self.tuning.sample_period_ms))
        else {
            return;
        };
        let delta = (elapsed * 0.01) as f32;

        if input.left {
            self.move_left(self.tuning.speed * delta);
        } else if input.right {
            self.move_right(self.tuning.speed * delta);
        }
    }

    pub fn move_left(&mut self, distance: f32) {
        self.offset_x = (self.offset_x - distance).max(-self.tuning.travel_limit);
    }

    pub fn move_right(&mut self, distance: f32) {
        self.offset_x = (self.offset_x + distance).min(self.tuning.travel_limit);
    }

    pub fn can_fire(&self) -> bool {
        self.fire_cooldown == 0
    }

    pub fn reset_cooldown(&mut self) {
        self.fire_cooldown = self.tuning.fire_cooldown_ticks;
    }

    pub fn update_cooldown(&mut self) {
        self.fire_cooldown = self.fire_cooldown.saturating_sub(1);
    }

    /// Where a new projectile starts: centred on the nose of the ship.
    pub fn muzzle(&self) -> (f32, f32) {
        (self.offset_x, self.tuning.offset_y + self.tuning.height)
    }

    /// Forget the last sample time so time spent outside play is not
    /// turned into movement.
    pub fn clear_clock(&mut self) {
        self.clock.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const LEFT: InputSample = InputSample {
        left: true,
        right: false,
        fire: false,
    };
    const RIGHT: InputSample = InputSample {
        left: false,
        right: true,
        fire: false,
    };

    #[test]
    fn test_shooter_new() {
        let shooter = Shooter::new(ShooterTuning::default());
        assert_eq!(shooter.offset_x(), 0.0);
        assert_eq!(shooter.offset_y(), -0.9);
        assert!(shooter.can_fire());
    }

    #[test]
    fn test_sample_waits_for_period() {
        let mut shooter = Shooter::new(ShooterTuning::default());
        shooter.sample(0.0, &RIGHT);
        shooter.sample(20.0, &RIGHT);
        assert_eq!(shooter.offset_x(), 0.0);

        shooter.sample(40.0, &RIGHT);
        // 40 ms is 0.4 units of 10 ms
        assert!((shooter.offset_x() - 0.02).abs() < 1e-6);
    }

    #[test]
    fn test_left_wins_over_right() {
        let mut shooter = Shooter::new(ShooterTuning::default());
        let both = InputSample {
            left: true,
            right: true,
            fire: false,
        };
        shooter.sample(0.0, &both);
        shooter.sample(40.0, &both);
        assert!(shooter.offset_x() < 0.0);
    }

    #[test]
    fn test_movement_clamped() {
        let mut shooter = Shooter::new(ShooterTuning::default());
        shooter.move_right(5.0);
        assert_eq!(shooter.offset_x(), 0.9);
        shooter.move_left(5.0);
        assert_eq!(shooter.offset_x(), -0.9);
    }

    #[test]
    fn test_fire_cooldown() {
        let mut shooter = Shooter::new(ShooterTuning::default());
        shooter.reset_cooldown();
        assert!(!shooter.can_fire());
        for _ in 0..8 {
            shooter.update_cooldown();
        }
        assert!(shooter.can_fire());
    }

    #[test]
    fn test_clear_clock_skips_paused_time() {
        let mut shooter = Shooter::new(ShooterTuning::default());
        shooter.sample(0.0, &LEFT);
        shooter.clear_clock();
        shooter.sample(10_000.0, &LEFT);
        assert_eq!(shooter.offset_x(), 0.0);
    }

    // Property-based tests
    #[cfg(test)]
    mod proptests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn test_shooter_stays_in_travel_range(
                samples in prop::collection::vec((prop::bool::ANY, 1.0f64..500.0), 0..200)
            ) {
                let mut shooter = Shooter::new(ShooterTuning::default());
                let mut now = 0.0;
                for (go_left, step) in samples {
                    now += step;
                    let input = if go_left { LEFT } else { RIGHT };
                    shooter.sample(now, &input);
                    prop_assert!(shooter.offset_x() >= -0.9);
                    prop_assert!(shooter.offset_x() <= 0.9);
                }
            }
        }
    }
}
