//! The per-level attack coordinator.
//!
//! The hive exclusively owns the level's roster (enemies and their bullets).
//! Each tick it sweeps entries that died on a previous tick, phase-locks
//! every idle member's animation to one shared clock, runs the attack
//! frequency gate, updates every member, and turns this tick's shot events
//! into new bullet entries.  Nothing else mutates the roster.

use rand::Rng;

use crate::context::SimContext;
use crate::enemy::{Enemy, Tag};
use crate::error::ConfigError;
use crate::events::{GameEvent, ShotKind};

/// Fallback idle cycle length when no roster member carries an idle
/// animation to derive it from.
const DEFAULT_IDLE_DURATION_MS: f32 = 800.0;

/// Upper bound of the random stagger handed to a freshly scheduled attacker.
const MAX_ATTACK_DELAY_MS: f32 = 300.0;

/// Scheduling knobs.  `for_level` fills them from the difficulty tiers, but
/// the fields are plain data: callers may override any of them.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct HiveSettings {
    /// How long the frequency timer runs before an attack attempt.
    pub attack_frequency_ms: f32,
    /// Cap on simultaneously attacking enemies.
    pub max_attackers: usize,
}

impl HiveSettings {
    /// Difficulty tiers by level number: higher levels shorten the attack
    /// interval and raise the concurrency cap.  Tunable table, not a
    /// contract.
    pub fn for_level(level: u32) -> Self {
        let (attack_frequency_ms, max_attackers) = match level {
            0 | 1 => (3000.0, 1),
            2 => (2400.0, 2),
            3 => (1800.0, 2),
            4 => (1400.0, 3),
            _ => (1000.0, 4),
        };
        HiveSettings {
            attack_frequency_ms,
            max_attackers,
        }
    }
}

#[derive(Debug)]
pub struct HiveMind {
    roster: Vec<Enemy>,
    settings: HiveSettings,
    idle_timer_ms: f32,
    attack_timer_ms: f32,
}

impl HiveMind {
    /// A hive without at least one actual enemy (bullets don't count) is an
    /// authoring mistake and fails fast.
    pub fn new(roster: Vec<Enemy>, settings: HiveSettings) -> Result<Self, ConfigError> {
        if !roster.iter().any(|e| e.tag == Tag::Enemy) {
            return Err(ConfigError::EmptyRoster);
        }
        Ok(HiveMind {
            roster,
            settings,
            idle_timer_ms: 0.0,
            attack_timer_ms: 0.0,
        })
    }

    pub fn roster(&self) -> &[Enemy] {
        &self.roster
    }

    pub fn roster_mut(&mut self) -> &mut Vec<Enemy> {
        &mut self.roster
    }

    pub fn settings(&self) -> &HiveSettings {
        &self.settings
    }

    /// Live enemies still in the fight (bullets excluded).
    pub fn live_enemy_count(&self) -> usize {
        self.roster
            .iter()
            .filter(|e| e.tag == Tag::Enemy && !e.is_dead)
            .count()
    }

    /// Count recomputed from roster flags every tick rather than tracked
    /// through callbacks; a missed decrement can't corrupt it.
    pub fn attacker_count(&self) -> usize {
        self.roster
            .iter()
            .filter(|e| e.tag == Tag::Enemy && !e.is_dead && e.on_attack)
            .count()
    }

    /// One coordination pass.  Order matters: sweep, idle sync, schedule,
    /// member updates, bullet spawns.
    pub fn update(&mut self, ctx: &mut SimContext, rng: &mut impl Rng) {
        // Entries flagged dead on a previous tick were drawn one last frame;
        // remove them before anything can select them.
        self.roster.retain(|e| !e.is_dead);

        self.sync_idle(ctx);
        self.schedule_attack(ctx, rng);

        for enemy in &mut self.roster {
            enemy.update(ctx, rng);
        }

        self.spawn_shots(ctx);

        // Bullets that left the screen this tick disappear without being
        // drawn again.
        self.roster
            .retain(|e| e.tag != Tag::EnemyBullet || !e.is_dead);
    }

    /// Advance the shared idle clock and force every idle member's animator
    /// onto it, so all idle enemies stay frame-synchronized no matter when
    /// each entered idle.
    fn sync_idle(&mut self, ctx: &SimContext) {
        let idle_duration = self
            .roster
            .iter()
            .find_map(|e| e.animator.collection.get("idle"))
            .map(|anim| anim.duration_ms() as f32)
            .unwrap_or(DEFAULT_IDLE_DURATION_MS);

        self.idle_timer_ms += ctx.frame_time_ms;
        if self.idle_timer_ms >= idle_duration {
            self.idle_timer_ms = 0.0;
        }

        for enemy in &mut self.roster {
            if enemy.tag == Tag::Enemy && !enemy.is_dead && enemy.idle {
                enemy.animator.sync_timer(self.idle_timer_ms);
            }
        }
    }

    /// Frequency-gated attack issue.  One uniform random candidate per
    /// attempt; a candidate already attacking or mid-restore aborts the
    /// attempt without resetting the timer.  The timer resets only once the
    /// concurrent attacker count reaches the cap, so attacks come in bursts
    /// up to the cap followed by a quiet period.
    fn schedule_attack(&mut self, ctx: &mut SimContext, rng: &mut impl Rng) {
        self.attack_timer_ms += ctx.frame_time_ms;
        if self.attack_timer_ms <= self.settings.attack_frequency_ms {
            return;
        }

        let mut attackers = self.attacker_count();
        let candidates: Vec<usize> = self
            .roster
            .iter()
            .enumerate()
            .filter(|(_, e)| e.schedulable())
            .map(|(i, _)| i)
            .collect();

        if !candidates.is_empty() {
            let index = candidates[rng.gen_range(0..candidates.len())];
            let enemy = &mut self.roster[index];
            if !enemy.on_attack && !enemy.restart_pos && attackers < self.settings.max_attackers {
                enemy.attack_delay_ms = rng.gen_range(0.0..MAX_ATTACK_DELAY_MS);
                enemy.attack(rng, ctx);
                attackers += 1;
                log::debug!(
                    "hive scheduled attacker {index}, {attackers}/{} slots filled",
                    self.settings.max_attackers
                );
            }
        }

        if attackers >= self.settings.max_attackers {
            self.attack_timer_ms = 0.0;
        }
    }

    /// Turn this tick's `ShotFired` events into bullet roster entries.
    /// Sound cues stay in the sink for the frontend.
    fn spawn_shots(&mut self, ctx: &mut SimContext) {
        let mut spawned: Vec<Enemy> = Vec::new();
        ctx.events.retain(|event| match *event {
            GameEvent::ShotFired { kind, x, y } => {
                spawned.push(match kind {
                    ShotKind::Straight => Enemy::bullet(x, y + 4.0),
                    ShotKind::Aimed => Enemy::aimed_bullet(x, y + 4.0),
                });
                false
            }
            _ => true,
        });
        self.roster.append(&mut spawned);
    }
}
