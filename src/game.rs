//! Game session orchestration.
//!
//! [`Game`] is the only thing that mutates simulation state. Each tick runs
//! shooter, projectiles (with hit resolution) and formation in that order,
//! then checks whether the session is over.

use crate::entities::{
    Direction, EnemyClass, EntityGrid, Formation, GamePhase, Hit, InputSample, Projectile,
    ProjectileManager, Shooter, StepOutcome,
};
use crate::scheduler::{Cadence, FrameHandle, FrameScheduler};
use crate::tuning::Tuning;

/// Per-session counters shown on the game over screen.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SessionStats {
    pub front_kills: u32,
    pub mid_kills: u32,
    pub back_kills: u32,
    pub reversals: u32,
    pub ticks: u64,
}

impl SessionStats {
    fn record_kill(&mut self, class: EnemyClass) {
        match class {
            EnemyClass::Front => self.front_kills += 1,
            EnemyClass::Mid => self.mid_kills += 1,
            EnemyClass::Back => self.back_kills += 1,
        }
    }

    pub fn total_kills(&self) -> u32 {
        self.front_kills + self.mid_kills + self.back_kills
    }
}

/// What happened during one accepted tick.
#[derive(Debug, Clone, PartialEq)]
pub struct TickReport {
    pub hits: Vec<Hit>,
    pub fired: bool,
    pub step: StepOutcome,
    pub game_over: bool,
}

/// Read-only view of everything a renderer needs for one frame.
#[derive(Debug, Clone, Copy)]
pub struct Snapshot<'a> {
    pub phase: GamePhase,
    pub score: u32,
    pub shooter_x: f32,
    pub shooter_y: f32,
    pub shooter_half_width: f32,
    pub shooter_height: f32,
    pub projectiles: &'a [Projectile],
    /// Front, mid, back.
    pub grids: [&'a EntityGrid; 3],
    pub direction: Direction,
    pub tick_period_ms: f32,
    pub shift_factor: f32,
    pub stats: SessionStats,
}

impl Snapshot<'_> {
    pub fn enemies_remaining(&self) -> usize {
        self.grids.iter().map(|g| g.active_count()).sum()
    }
}

pub struct Game {
    phase: GamePhase,
    formation: Formation,
    shooter: Shooter,
    projectiles: ProjectileManager,
    score: u32,
    /// Time of the last formation step
    previous_timestamp: Cadence,
    scheduler: FrameScheduler,
    stats: SessionStats,
    tuning: Tuning,
}

impl Game {
    pub fn new(tuning: Tuning) -> Self {
        Self {
            phase: GamePhase::Idle,
            formation: Formation::new(&tuning),
            shooter: Shooter::new(tuning.shooter),
            projectiles: ProjectileManager::new(tuning.projectile),
            score: 0,
            previous_timestamp: Cadence::new(),
            scheduler: FrameScheduler::new(),
            stats: SessionStats::default(),
            tuning,
        }
    }

    pub fn phase(&self) -> GamePhase {
        self.phase
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn formation(&self) -> &Formation {
        &self.formation
    }

    /// Direct grid access for test setups; gameplay code goes through
    /// [`Game::tick`].
    #[doc(hidden)]
    pub fn formation_mut(&mut self) -> &mut Formation {
        &mut self.formation
    }

    pub fn shooter(&self) -> &Shooter {
        &self.shooter
    }

    pub fn projectiles(&self) -> &ProjectileManager {
        &self.projectiles
    }

    pub fn stats(&self) -> SessionStats {
        self.stats
    }

    pub fn tuning(&self) -> &Tuning {
        &self.tuning
    }

    /// Idle -> Running. Returns the handle ticks must carry, or `None` when
    /// the game is not idle.
    pub fn start(&mut self) -> Option<FrameHandle> {
        if self.phase != GamePhase::Idle {
            log::warn!("start ignored while {}", self.phase.get_name());
            return None;
        }
        self.reset_session();
        self.phase = GamePhase::Running;
        log::info!("game started");
        Some(self.scheduler.start())
    }

    /// Running -> Paused.
    pub fn pause(&mut self) {
        if self.phase == GamePhase::Running {
            self.scheduler.stop();
            self.phase = GamePhase::Paused;
            log::info!("game paused at score {}", self.score);
        }
    }

    /// Paused -> Running, with clocks restarted so the pause is not replayed
    /// as movement.
    pub fn resume(&mut self) -> Option<FrameHandle> {
        if self.phase != GamePhase::Paused {
            return None;
        }
        self.previous_timestamp.clear();
        self.shooter.clear_clock();
        self.phase = GamePhase::Running;
        log::info!("game resumed");
        Some(self.scheduler.start())
    }

    /// Back to Idle with a fresh formation, zero score and no projectiles.
    /// Any outstanding frame handle stops working.
    pub fn reset(&mut self) {
        self.scheduler.stop();
        self.reset_session();
        self.phase = GamePhase::Idle;
        log::info!("game reset");
    }

    fn reset_session(&mut self) {
        self.formation = Formation::new(&self.tuning);
        self.shooter = Shooter::new(self.tuning.shooter);
        self.projectiles.clear();
        self.score = 0;
        self.previous_timestamp.clear();
        self.stats = SessionStats::default();
    }

    /// True once the lowest active enemy reaches the player line, or when
    /// no enemy is left.
    pub fn is_game_over(&self) -> bool {
        match self.formation.bottommost_active() {
            Some((_, y)) => y <= self.tuning.formation.game_over_line,
            None => true,
        }
    }

    /// Runs one frame. Ticks carrying a stale handle, or arriving outside
    /// the Running phase, are ignored.
    pub fn tick(&mut self, handle: FrameHandle, now: f64, input: &InputSample) -> Option<TickReport> {
        if !self.scheduler.is_live(handle) || !self.phase.is_running() {
            log::trace!("dropped stale tick at {now:.1}");
            return None;
        }
        self.stats.ticks += 1;

        self.shooter.sample(now, input);
        self.shooter.update_cooldown();
        let fired = input.fire && self.shooter.can_fire() && self.fire();

        let hits = self.projectiles.advance(&mut self.formation);
        for hit in &hits {
            self.score += hit.points;
            self.stats.record_kill(hit.class);
        }

        let elapsed = self.previous_timestamp.elapsed(now);
        let step = self.formation.advance(elapsed);
        if step != StepOutcome::Waiting {
            self.previous_timestamp.rebase(now);
        }
        if step == StepOutcome::Reversed {
            self.stats.reversals += 1;
        }

        let game_over = self.is_game_over();
        if game_over {
            self.scheduler.stop();
            self.phase = GamePhase::Over;
            log::info!(
                "game over: score {}, {} enemies left",
                self.score,
                self.formation.active_count()
            );
        }

        Some(TickReport {
            hits,
            fired,
            step,
            game_over,
        })
    }

    fn fire(&mut self) -> bool {
        let (x, y) = self.shooter.muzzle();
        let fired = self.projectiles.fire(x, y);
        if fired {
            self.shooter.reset_cooldown();
        }
        fired
    }

    pub fn snapshot(&self) -> Snapshot<'_> {
        Snapshot {
            phase: self.phase,
            score: self.score,
            shooter_x: self.shooter.offset_x(),
            shooter_y: self.shooter.offset_y(),
            shooter_half_width: self.shooter.half_width(),
            shooter_height: self.shooter.height(),
            projectiles: self.projectiles.as_slice(),
            grids: self.formation.grids(),
            direction: self.formation.direction(),
            tick_period_ms: self.formation.tick_period_ms(),
            shift_factor: self.formation.shift_factor(),
            stats: self.stats,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const IDLE_INPUT: InputSample = InputSample {
        left: false,
        right: false,
        fire: false,
    };

    #[test]
    fn test_new_game_is_idle() {
        let game = Game::new(Tuning::default());
        assert_eq!(game.phase(), GamePhase::Idle);
        assert_eq!(game.score(), 0);
        assert!(!game.is_game_over());
    }

    #[test]
    fn test_start_only_from_idle() {
        let mut game = Game::new(Tuning::default());
        assert!(game.start().is_some());
        assert!(game.start().is_none());
        assert_eq!(game.phase(), GamePhase::Running);
    }

    #[test]
    fn test_tick_ignored_when_idle() {
        let mut game = Game::new(Tuning::default());
        let handle = game.start().unwrap();
        game.reset();
        assert!(game.tick(handle, 0.0, &IDLE_INPUT).is_none());
        assert_eq!(game.stats().ticks, 0);
    }

    #[test]
    fn test_fire_respects_cooldown() {
        let mut game = Game::new(Tuning::default());
        let handle = game.start().unwrap();
        let fire = InputSample {
            fire: true,
            ..IDLE_INPUT
        };

        let report = game.tick(handle, 0.0, &fire).unwrap();
        assert!(report.fired);
        let report = game.tick(handle, 16.0, &fire).unwrap();
        assert!(!report.fired);
        assert_eq!(game.projectiles().len(), 1);
    }

    #[test]
    fn test_held_fire_spaces_shots_by_cooldown() {
        let mut game = Game::new(Tuning::default());
        let handle = game.start().unwrap();
        let fire = InputSample {
            fire: true,
            ..IDLE_INPUT
        };

        let fired_on: Vec<u32> = (0..20)
            .filter(|&step| {
                game.tick(handle, f64::from(step) * 16.0, &fire)
                    .unwrap()
                    .fired
            })
            .collect();
        assert_eq!(fired_on, vec![0, 8, 16]);
    }

    #[test]
    fn test_pause_freezes_and_resume_issues_new_handle() {
        let mut game = Game::new(Tuning::default());
        let handle = game.start().unwrap();
        game.tick(handle, 0.0, &IDLE_INPUT);

        game.pause();
        assert_eq!(game.phase(), GamePhase::Paused);
        assert!(game.tick(handle, 100.0, &IDLE_INPUT).is_none());

        let resumed = game.resume().unwrap();
        assert!(game.tick(handle, 200.0, &IDLE_INPUT).is_none());

        let before = game.formation().grid(EnemyClass::Front).offsets().to_vec();
        // a long pause must not turn into one huge slide
        let report = game.tick(resumed, 60_000.0, &IDLE_INPUT).unwrap();
        assert_eq!(report.step, StepOutcome::Waiting);
        assert_eq!(game.formation().grid(EnemyClass::Front).offsets(), &before[..]);
    }

    #[test]
    fn test_hit_adds_class_points() {
        let mut game = Game::new(Tuning::default());
        let handle = game.start().unwrap();
        let fire = InputSample {
            fire: true,
            ..IDLE_INPUT
        };
        // the muzzle sits under column 5 of every row
        let mut now = 0.0;
        let mut hits = Vec::new();
        while hits.is_empty() && now < 200_000.0 {
            let report = game.tick(handle, now, &fire).unwrap();
            hits = report.hits;
            now += 1.0;
        }
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].class, EnemyClass::Front);
        assert_eq!(game.score(), 30);
        assert_eq!(game.stats().front_kills, 1);
    }
}
