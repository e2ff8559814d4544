//! Player ship and player bullets.
//!
//! The enemy core only ever touches the score.  The life pool lives on the
//! context, this module is the only writer that decrements it.

use crate::context::SimContext;
use crate::events::{GameEvent, SoundCue};
use crate::geom::Rect;

pub const PLAYER_SIZE: f32 = 40.0;

/// Pixels per second along each axis.
const MOVE_SPEED: f32 = 400.0;

/// Minimum milliseconds between shots.
const SHOOT_COOLDOWN_MS: f32 = 600.0;

/// Simultaneous on-screen player bullets.
const BULLET_CAP: usize = 3;

const BULLET_SPEED: f32 = 10.0;
const INVULNERABILITY_MS: f32 = 2000.0;

pub struct PlayerBullet {
    pub rect: Rect,
    pub damage: i32,
    pub is_dead: bool,
}

pub struct Player {
    pub rect: Rect,
    pub bullets: Vec<PlayerBullet>,
    pub invulnerable: bool,
    invulnerability_ms: f32,
    shoot_timer_ms: f32,
}

impl Player {
    pub fn new(cx: f32, cy: f32) -> Self {
        Player {
            rect: Rect::from_center(cx, cy, PLAYER_SIZE, PLAYER_SIZE),
            bullets: Vec::new(),
            invulnerable: false,
            invulnerability_ms: 0.0,
            shoot_timer_ms: 0.0,
        }
    }

    /// Move along both axes; `ax`/`ay` are -1, 0 or 1.  The ship is clamped
    /// to the screen.
    pub fn steer(&mut self, ax: f32, ay: f32, ctx: &SimContext) {
        let step = MOVE_SPEED * ctx.frame_time_ms / 1000.0;
        self.rect.translate(ax * step, ay * step);
        self.rect.x = self.rect.x.clamp(0.0, ctx.width - self.rect.w);
        self.rect.y = self.rect.y.clamp(0.0, ctx.height - self.rect.h);
    }

    /// Fire upward, honoring the cooldown and the on-screen bullet cap.
    pub fn shoot(&mut self) {
        let active = self.bullets.iter().filter(|b| !b.is_dead).count();
        if self.shoot_timer_ms > 0.0 || active >= BULLET_CAP {
            return;
        }
        let (cx, _) = self.rect.center();
        self.bullets.push(PlayerBullet {
            rect: Rect::from_center(cx, self.rect.y - 4.0, 5.0, 8.0),
            damage: 10,
            is_dead: false,
        });
        self.shoot_timer_ms = SHOOT_COOLDOWN_MS;
    }

    /// Advance bullets and timers by one tick.
    pub fn update(&mut self, ctx: &mut SimContext) {
        self.shoot_timer_ms = (self.shoot_timer_ms - ctx.frame_time_ms).max(0.0);

        for bullet in &mut self.bullets {
            bullet.rect.translate(0.0, -BULLET_SPEED);
            if bullet.rect.bottom() < 0.0 {
                bullet.is_dead = true;
            }
        }
        self.bullets.retain(|b| !b.is_dead);

        if self.invulnerability_ms > 0.0 {
            self.invulnerability_ms -= ctx.frame_time_ms;
            if self.invulnerability_ms <= 0.0 {
                self.invulnerable = false;
            }
        }
    }

    /// Take a hit unless the post-hit invulnerability window is open.
    pub fn take_hit(&mut self, damage: i32, ctx: &mut SimContext) {
        if self.invulnerable {
            return;
        }
        ctx.lives -= damage;
        self.invulnerable = true;
        self.invulnerability_ms = INVULNERABILITY_MS;
        let (cx, cy) = self.rect.center();
        ctx.emit(GameEvent::ExplosionAt { x: cx, y: cy });
        ctx.emit(GameEvent::Sound(SoundCue::Explosion));
    }
}
