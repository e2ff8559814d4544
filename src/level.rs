//! Level patterns, the enemy-army factory, and the per-tick driver.
//!
//! A level pattern is a grid of archetype-name strings, one row per
//! formation row, 1 to 8 columns each.  Unknown names fall back to the
//! basic archetype; an empty or over-wide row is an authoring mistake and
//! fails construction.

use rand::Rng;

use crate::animset::AnimationLibrary;
use crate::context::SimContext;
use crate::enemy::{Enemy, Tag, ENEMY_SIZE};
use crate::error::ConfigError;
use crate::hive::{HiveMind, HiveSettings};
use crate::player::Player;

pub const SCREEN_W: f32 = 600.0;
pub const SCREEN_H: f32 = 600.0;

/// Horizontal spacing between formation slots.
const COLUMN_SPACING: f32 = 64.0;
/// Vertical spacing between formation rows.
const ROW_SPACING: f32 = 56.0;
/// Top margin above the first formation row.
const TOP_MARGIN: f32 = 60.0;

pub const MAX_COLUMNS: usize = 8;

/// Built-in pattern table.  Levels past the table reuse the last, densest
/// layout; the hive settings keep scaling instead.
pub fn pattern_for(level: u32) -> Vec<Vec<String>> {
    let rows: &[&[&str]] = match level {
        0 | 1 => &[
            &["basic", "basic", "basic", "basic", "basic"],
            &["basic", "basic", "basic"],
        ],
        2 => &[
            &["shooter", "basic", "basic", "basic", "shooter"],
            &["basic", "basic", "basic", "basic", "basic"],
        ],
        3 => &[
            &["sniper", "basic", "sniper"],
            &["shooter", "basic", "basic", "basic", "shooter"],
            &["basic", "basic", "basic", "basic", "basic"],
        ],
        _ => &[
            &["sniper", "basic", "basic", "sniper"],
            &["shooter", "basic", "shooter", "basic", "shooter"],
            &["basic", "basic", "basic", "basic", "basic", "basic"],
        ],
    };
    rows.iter()
        .map(|row| row.iter().map(|name| name.to_string()).collect())
        .collect()
}

/// Place one enemy per grid cell, rows centered horizontally.  Unknown
/// archetype names fall back to `basic` with a warning.
pub fn build_army(
    pattern: &[Vec<String>],
    library: &AnimationLibrary,
) -> Result<Vec<Enemy>, ConfigError> {
    let mut army = Vec::new();
    for (row_index, row) in pattern.iter().enumerate() {
        if row.is_empty() || row.len() > MAX_COLUMNS {
            return Err(ConfigError::MalformedLevelRow {
                row: row_index,
                columns: row.len(),
            });
        }
        let row_width = (row.len() - 1) as f32 * COLUMN_SPACING;
        let cy = TOP_MARGIN + row_index as f32 * ROW_SPACING + ENEMY_SIZE / 2.0;
        for (col_index, name) in row.iter().enumerate() {
            let cx = SCREEN_W / 2.0 - row_width / 2.0 + col_index as f32 * COLUMN_SPACING;
            let enemy = match name.as_str() {
                "basic" => Enemy::basic(cx, cy, library)?,
                "shooter" => Enemy::shooter(cx, cy, library)?,
                "sniper" => Enemy::sniper(cx, cy, library)?,
                other => {
                    log::warn!("unknown enemy type `{other}`, falling back to basic");
                    Enemy::basic(cx, cy, library)?
                }
            };
            army.push(enemy);
        }
    }
    Ok(army)
}

/// One playable level: the hive with its army, plus the player ship.
pub struct Level {
    pub number: u32,
    pub hive: HiveMind,
    pub player: Player,
}

impl Level {
    pub fn new(number: u32, library: &AnimationLibrary) -> Result<Self, ConfigError> {
        let army = build_army(&pattern_for(number), library)?;
        let hive = HiveMind::new(army, HiveSettings::for_level(number))?;
        Ok(Level {
            number,
            hive,
            player: Player::new(SCREEN_W / 2.0, SCREEN_H - 50.0),
        })
    }

    /// One simulation tick: hive coordination and enemy updates, then the
    /// player side, then the collision pass.  The frontend drains the
    /// context's events afterwards.
    pub fn tick(&mut self, ctx: &mut SimContext, rng: &mut impl Rng) {
        ctx.player_center = self.player.rect.center();
        self.hive.update(ctx, rng);
        self.player.update(ctx);
        self.collisions(ctx);
    }

    /// Player bullets against enemies, enemy bullets and bodies against the
    /// player.  Hits only flag entities; removal is deferred to the owners'
    /// next pass.
    fn collisions(&mut self, ctx: &mut SimContext) {
        for bullet in &mut self.player.bullets {
            if bullet.is_dead {
                continue;
            }
            for enemy in self.hive.roster_mut().iter_mut() {
                if enemy.tag != Tag::Enemy || enemy.is_dead {
                    continue;
                }
                if bullet.rect.overlaps(&enemy.rect) {
                    enemy.take_damage(bullet.damage, ctx);
                    bullet.is_dead = true;
                    break;
                }
            }
        }

        let player_rect = self.player.rect;
        let mut hit_damage: Option<i32> = None;
        for enemy in self.hive.roster_mut().iter_mut() {
            if enemy.is_dead || !enemy.rect.overlaps(&player_rect) {
                continue;
            }
            hit_damage = Some(hit_damage.unwrap_or(0).max(enemy.damage));
            if enemy.tag == Tag::EnemyBullet {
                enemy.is_dead = true;
            }
        }
        if let Some(damage) = hit_damage {
            self.player.take_hit(damage, ctx);
        }
    }

    /// The level is done once no live enemy remains (in-flight bullets
    /// don't keep it open).
    pub fn cleared(&self) -> bool {
        self.hive.live_enemy_count() == 0
    }
}
