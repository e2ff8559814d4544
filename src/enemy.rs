//! Enemy state machine and archetypes.
//!
//! Every enemy cycles IDLE -> ATTACKING -> RESTORING_POSITION -> IDLE, with
//! DEAD reachable from anywhere and terminal.  An enemy *has* an animator
//! and a rectangle rather than inheriting render capabilities; archetype
//! differences live in the `Behavior` union selected at construction.
//! Bullets are degenerate enemies tagged `EnemyBullet`: no idle or restore
//! states, just movement until they fall off screen or a collision flags
//! them dead.

use rand::Rng;

use crate::animation::AnimationCollection;
use crate::animator::Animator;
use crate::animset::AnimationLibrary;
use crate::context::SimContext;
use crate::error::ConfigError;
use crate::events::{GameEvent, ShotKind, SoundCue};
use crate::geom::Rect;

pub const ENEMY_SIZE: f32 = 48.0;

/// Horizontal wrap margin beyond the screen edge.
const WRAP_MARGIN: f32 = 20.0;

/// Attack animation pool for the basic archetype; zigzag appears twice so
/// it is picked half the time.
const BASIC_ATTACKS: [&str; 4] = ["zigzag", "zigzag", "kamikaze_left", "kamikaze_right"];

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Tag {
    Enemy,
    EnemyBullet,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Side {
    Left,
    Right,
}

impl Side {
    fn jump_animation(self) -> &'static str {
        match self {
            Side::Left => "jump_left",
            Side::Right => "jump_right",
        }
    }

    fn attack_animation(self) -> &'static str {
        match self {
            Side::Left => "attack_left",
            Side::Right => "attack_right",
        }
    }
}

/// Archetype-specific state.  The shared state machine lives on `Enemy`;
/// these fields only carry what each variant's attack/update logic needs.
#[derive(Clone, Debug)]
pub enum Behavior {
    Basic {
        /// Guards the fall cue so one attack plays it once.
        sound_active: bool,
    },
    /// Jumps sideways, then descends on a looping attack animation and
    /// fires a single straight shot partway through.
    Shooter {
        side: Side,
        /// Set when the jump animation finished and the descent should start.
        jump_done: bool,
        /// True between shots; cleared when a descent arms its shot timer.
        shot_ready: bool,
        shot_timer_ms: f32,
        sound_active: bool,
    },
    /// Never leaves its slot; fires aimed shots on its own clock,
    /// independent of hive scheduling.
    Sniper {
        scope_delay_ms: f32,
        fire_timer_ms: f32,
    },
    /// Straight-down projectile.
    Bullet { speed: f32 },
    /// Locks its travel angle toward the player on its first tick.
    AimedBullet { speed: f32, angle: Option<f32> },
}

#[derive(Debug)]
pub struct Enemy {
    pub tag: Tag,
    pub behavior: Behavior,
    pub animator: Animator,
    pub rect: Rect,
    /// Formation slot the enemy glides back to after an attack.
    pub initial_center: (f32, f32),
    pub life: i32,
    pub max_life: i32,
    pub damage: i32,
    pub points: u32,
    pub is_dead: bool,
    pub idle: bool,
    pub on_attack: bool,
    pub restart_pos: bool,
    /// Stagger before a scheduled attack starts moving, so a burst does not
    /// fall in lockstep.
    pub attack_delay_ms: f32,
}

impl Enemy {
    fn base(tag: Tag, behavior: Behavior, animator: Animator, rect: Rect) -> Self {
        let initial_center = rect.center();
        Enemy {
            tag,
            behavior,
            animator,
            rect,
            initial_center,
            life: 10,
            max_life: 10,
            damage: 10,
            points: 5,
            is_dead: false,
            idle: true,
            on_attack: false,
            restart_pos: false,
            attack_delay_ms: 0.0,
        }
    }

    pub fn basic(cx: f32, cy: f32, library: &AnimationLibrary) -> Result<Self, ConfigError> {
        let collection = library.build_collection("basic", ENEMY_SIZE, ENEMY_SIZE)?;
        let mut animator = Animator::new(collection);
        animator.play("idle", true);
        let rect = Rect::from_center(cx, cy, ENEMY_SIZE, ENEMY_SIZE);
        Ok(Enemy::base(
            Tag::Enemy,
            Behavior::Basic { sound_active: false },
            animator,
            rect,
        ))
    }

    pub fn shooter(cx: f32, cy: f32, library: &AnimationLibrary) -> Result<Self, ConfigError> {
        let collection = library.build_collection("shooter", ENEMY_SIZE, ENEMY_SIZE)?;
        let mut animator = Animator::new(collection);
        animator.play("idle", true);
        let rect = Rect::from_center(cx, cy, ENEMY_SIZE, ENEMY_SIZE);
        let mut enemy = Enemy::base(
            Tag::Enemy,
            Behavior::Shooter {
                side: Side::Left,
                jump_done: false,
                shot_ready: true,
                shot_timer_ms: 0.0,
                sound_active: false,
            },
            animator,
            rect,
        );
        enemy.life = 20;
        enemy.max_life = 20;
        enemy.damage = 20;
        enemy.points = 10;
        Ok(enemy)
    }

    pub fn sniper(cx: f32, cy: f32, library: &AnimationLibrary) -> Result<Self, ConfigError> {
        let collection = library.build_collection("sniper", ENEMY_SIZE, ENEMY_SIZE)?;
        let mut animator = Animator::new(collection);
        animator.play("idle", true);
        let rect = Rect::from_center(cx, cy, ENEMY_SIZE, ENEMY_SIZE);
        let mut enemy = Enemy::base(
            Tag::Enemy,
            Behavior::Sniper {
                scope_delay_ms: 1500.0,
                fire_timer_ms: 0.0,
            },
            animator,
            rect,
        );
        enemy.life = 25;
        enemy.max_life = 25;
        enemy.damage = 25;
        enemy.points = 15;
        Ok(enemy)
    }

    pub fn bullet(cx: f32, cy: f32) -> Self {
        let rect = Rect::from_center(cx, cy, 5.0, 8.0);
        let animator = Animator::new(AnimationCollection::new());
        let mut bullet = Enemy::base(Tag::EnemyBullet, Behavior::Bullet { speed: 5.0 }, animator, rect);
        bullet.life = 1;
        bullet.max_life = 1;
        bullet.damage = 10;
        bullet.points = 0;
        bullet.idle = false;
        bullet
    }

    pub fn aimed_bullet(cx: f32, cy: f32) -> Self {
        let rect = Rect::from_center(cx, cy, 8.0, 8.0);
        let animator = Animator::new(AnimationCollection::new());
        let mut bullet = Enemy::base(
            Tag::EnemyBullet,
            Behavior::AimedBullet {
                speed: 5.0,
                angle: None,
            },
            animator,
            rect,
        );
        bullet.life = 1;
        bullet.max_life = 1;
        bullet.damage = 20;
        bullet.points = 0;
        bullet.idle = false;
        bullet
    }

    /// True when the hive may pick this entity as an attack candidate.
    /// Snipers fire autonomously and never enter the attack cycle.
    pub fn schedulable(&self) -> bool {
        self.tag == Tag::Enemy && !self.is_dead && !matches!(self.behavior, Behavior::Sniper { .. })
    }

    /// Enter the attack state.  The sequence is fixed: set the flag, emit
    /// the start event, then run archetype setup.
    pub fn attack(&mut self, rng: &mut impl Rng, ctx: &mut SimContext) {
        self.on_attack = true;
        ctx.emit(GameEvent::AttackStarted);
        match &mut self.behavior {
            Behavior::Basic { sound_active } => {
                if !*sound_active {
                    ctx.emit(GameEvent::Sound(SoundCue::AttackFall));
                    *sound_active = true;
                }
                self.animator.stop();
                let id = BASIC_ATTACKS[rng.gen_range(0..BASIC_ATTACKS.len())];
                self.animator.play(id, true);
                self.idle = false;
            }
            Behavior::Shooter {
                side, sound_active, ..
            } => {
                if !*sound_active {
                    ctx.emit(GameEvent::Sound(SoundCue::AttackFall));
                    *sound_active = true;
                }
                *side = if rng.gen_bool(0.5) { Side::Left } else { Side::Right };
                self.animator.stop();
                self.animator.play(side.jump_animation(), false);
                self.idle = false;
            }
            // Snipers and bullets have no attack excursion.
            Behavior::Sniper { .. } | Behavior::Bullet { .. } | Behavior::AimedBullet { .. } => {}
        }
    }

    /// Per-tick update.  Dead entries do nothing; the owner sweeps them on
    /// its next pass.
    pub fn update(&mut self, ctx: &mut SimContext, rng: &mut impl Rng) {
        if self.is_dead {
            return;
        }
        if self.tag == Tag::EnemyBullet {
            self.update_bullet(ctx);
            return;
        }

        // Hold position while the attack stagger runs down.
        if self.on_attack && self.attack_delay_ms > 0.0 {
            self.attack_delay_ms -= ctx.frame_time_ms;
            return;
        }

        self.archetype_update(ctx, rng);
        self.animator.render_animation(&mut self.rect, ctx.frame_time_ms);
        self.check_limit(ctx);
        if !self.on_attack {
            self.repositioning(ctx);
            match &mut self.behavior {
                Behavior::Basic { sound_active } | Behavior::Shooter { sound_active, .. } => {
                    *sound_active = false;
                }
                _ => {}
            }
        }
    }

    /// Archetype timers and sub-state transitions that run before the
    /// animation advances.
    fn archetype_update(&mut self, ctx: &mut SimContext, rng: &mut impl Rng) {
        match &mut self.behavior {
            Behavior::Shooter {
                side,
                jump_done,
                shot_ready,
                shot_timer_ms,
                ..
            } => {
                if self.animator.last_finished() == Some(side.jump_animation()) {
                    self.animator.take_finished();
                    *jump_done = true;
                }
                if *jump_done && *shot_ready {
                    // Jump landed: start the descent and arm exactly one shot.
                    *jump_done = false;
                    *shot_ready = false;
                    self.animator.play(side.attack_animation(), true);
                    self.on_attack = true;
                    *shot_timer_ms = rng.gen_range(200.0..1500.0);
                }
                if *shot_timer_ms > 0.0 {
                    *shot_timer_ms -= ctx.frame_time_ms;
                } else if self.on_attack && !*shot_ready {
                    *shot_ready = true;
                    let (cx, _) = self.rect.center();
                    ctx.emit(GameEvent::ShotFired {
                        kind: ShotKind::Straight,
                        x: cx,
                        y: self.rect.bottom(),
                    });
                    ctx.emit(GameEvent::Sound(SoundCue::Shot));
                }
            }
            Behavior::Sniper {
                scope_delay_ms,
                fire_timer_ms,
            } => {
                *fire_timer_ms -= ctx.frame_time_ms;
                if *scope_delay_ms > 0.0 {
                    *scope_delay_ms -= ctx.frame_time_ms;
                }
                if *fire_timer_ms <= 0.0 && *scope_delay_ms <= 0.0 {
                    let (cx, _) = self.rect.center();
                    ctx.emit(GameEvent::ShotFired {
                        kind: ShotKind::Aimed,
                        x: cx,
                        y: self.rect.bottom(),
                    });
                    ctx.emit(GameEvent::Sound(SoundCue::AimedShot));
                    *fire_timer_ms = rng.gen_range(1500.0..3000.0);
                }
            }
            Behavior::Basic { .. } | Behavior::Bullet { .. } | Behavior::AimedBullet { .. } => {}
        }
    }

    fn update_bullet(&mut self, ctx: &mut SimContext) {
        match &mut self.behavior {
            Behavior::Bullet { speed } => {
                let dy = *speed;
                self.rect.translate(0.0, dy);
            }
            Behavior::AimedBullet { speed, angle } => {
                let locked = *angle.get_or_insert_with(|| {
                    let (cx, cy) = self.rect.center();
                    (ctx.player_center.1 - cy).atan2(ctx.player_center.0 - cx)
                });
                let dv = *speed;
                self.rect.translate(locked.cos() * dv, locked.sin() * dv);
            }
            _ => {}
        }
        // Off the bottom: flagged for immediate removal, no score, no events.
        if self.rect.y > ctx.height {
            self.is_dead = true;
        }
    }

    /// Wrap the x axis toroidally and catch attack excursions that fall
    /// past the bottom edge: the enemy reappears above the top, its
    /// animation stops, and the restore phase begins.
    pub fn check_limit(&mut self, ctx: &mut SimContext) {
        if self.rect.y > ctx.height {
            self.rect.y = -self.rect.h;
            self.animator.stop();
            self.restart_pos = true;
            self.on_attack = false;
            ctx.emit(GameEvent::AttackEnded);
        }
        if self.rect.x > ctx.width + self.rect.w + WRAP_MARGIN {
            self.rect.x = -self.rect.w;
        }
        if self.rect.x < -(self.rect.w + WRAP_MARGIN) {
            self.rect.x = ctx.width + self.rect.w;
        }
    }

    /// Fraction of the remaining distance covered per restore tick.  The
    /// 5%/10% split is per-archetype tuning.
    fn restore_fraction(&self) -> f32 {
        match self.behavior {
            Behavior::Shooter { .. } => 0.10,
            _ => 0.05,
        }
    }

    /// Glide back toward the formation slot; snap onto it once within half
    /// the entity's own size, then go idle again.
    pub fn repositioning(&mut self, ctx: &mut SimContext) {
        if !self.restart_pos {
            return;
        }
        let (ix, iy) = self.initial_center;
        let (cx, cy) = self.rect.center();
        let dx = ix - cx;
        let dy = iy - cy;
        let distance = (dx * dx + dy * dy).sqrt();
        if distance > 1.0 {
            let step = self.restore_fraction();
            self.rect.translate(dx * step, dy * step);
        }
        let gap_x = self.rect.w / 2.0;
        let gap_y = self.rect.h / 2.0;
        let (cx, cy) = self.rect.center();
        if (ix - cx).abs() <= gap_x && (iy - cy).abs() <= gap_y {
            self.rect.set_center(ix, iy);
            self.restart_pos = false;
            self.idle = true;
            self.animator.play("idle", true);
            ctx.emit(GameEvent::PositionRestored);
        }
    }

    /// Apply damage.  Already-dead entities ignore further hits so the
    /// score can never double-count a kill.
    pub fn take_damage(&mut self, amount: i32, ctx: &mut SimContext) {
        if self.is_dead {
            return;
        }
        self.life -= amount;
        if self.life <= 0 {
            self.life = 0;
            self.is_dead = true;
            ctx.score += self.points;
            let (cx, cy) = self.rect.center();
            ctx.emit(GameEvent::Died {
                points: self.points,
                x: cx,
                y: cy,
            });
            ctx.emit(GameEvent::ExplosionAt { x: cx, y: cy });
            ctx.emit(GameEvent::Sound(SoundCue::Explosion));
        }
    }
}
