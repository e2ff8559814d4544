//! Rendering layer; all terminal I/O lives here.
//!
//! The simulation runs in a 600x600 pixel space; this module scales it onto
//! the terminal grid and translates state into terminal commands.  No game
//! logic is performed here.

use std::io::Write;

use crossterm::{
    cursor,
    style::{self, Color, Print},
    terminal, QueueableCommand,
};

use hive_invaders::context::SimContext;
use hive_invaders::enemy::Behavior;
use hive_invaders::level::{Level, SCREEN_H, SCREEN_W};

// ── Colour palette ────────────────────────────────────────────────────────────

const C_BORDER: Color = Color::DarkBlue;
const C_HUD_SCORE: Color = Color::Yellow;
const C_HUD_LIFE: Color = Color::Red;
const C_PLAYER: Color = Color::White;
const C_ENEMY_BASIC: Color = Color::Green;
const C_ENEMY_SHOOTER: Color = Color::Yellow;
const C_ENEMY_SNIPER: Color = Color::Magenta;
const C_BULLET_PLAYER: Color = Color::Cyan;
const C_BULLET_ENEMY: Color = Color::Magenta;
const C_FLASH: Color = Color::Yellow;
const C_HINT: Color = Color::DarkGrey;

/// Short-lived explosion marker kept by the frontend.
pub struct Flash {
    pub x: f32,
    pub y: f32,
    pub frames: u32,
}

/// Everything one frame needs from the driver.
pub struct Scene<'a> {
    pub level: &'a Level,
    pub ctx: &'a SimContext,
    pub flashes: &'a [Flash],
    pub high_score: u32,
    pub game_over: bool,
    /// Frames the "LEVEL n" banner stays up after a level starts.
    pub banner_frames: u32,
}

/// Map a simulation-space point onto the playfield cells inside the border.
fn to_cell(x: f32, y: f32, width: u16, height: u16) -> (u16, u16) {
    let inner_w = width.saturating_sub(2) as f32;
    let inner_h = height.saturating_sub(4) as f32;
    let col = 1.0 + (x / SCREEN_W).clamp(0.0, 1.0) * (inner_w - 1.0).max(0.0);
    let row = 2.0 + (y / SCREEN_H).clamp(0.0, 1.0) * (inner_h - 1.0).max(0.0);
    (col as u16, row as u16)
}

/// Render one complete frame.
pub fn render<W: Write>(out: &mut W, scene: &Scene) -> std::io::Result<()> {
    let (width, height) = terminal::size()?;

    out.queue(terminal::Clear(terminal::ClearType::All))?;

    draw_border(out, width, height)?;
    draw_hud(out, scene, width)?;

    for enemy in scene.level.hive.roster() {
        let (cx, cy) = enemy.rect.center();
        let (col, row) = to_cell(cx, cy, width, height);
        if enemy.is_dead {
            // Dead entries get drawn one last frame, as debris.
            out.queue(style::SetForegroundColor(C_FLASH))?;
            out.queue(cursor::MoveTo(col, row))?;
            out.queue(Print("✶"))?;
            continue;
        }
        let (glyph, color) = match enemy.behavior {
            Behavior::Basic { .. } => ("▼", C_ENEMY_BASIC),
            Behavior::Shooter { .. } => ("W", C_ENEMY_SHOOTER),
            Behavior::Sniper { .. } => ("◊", C_ENEMY_SNIPER),
            Behavior::Bullet { .. } => ("╷", C_BULLET_ENEMY),
            Behavior::AimedBullet { .. } => ("•", C_BULLET_ENEMY),
        };
        out.queue(style::SetForegroundColor(color))?;
        out.queue(cursor::MoveTo(col, row))?;
        out.queue(Print(glyph))?;
    }

    for bullet in &scene.level.player.bullets {
        let (cx, cy) = bullet.rect.center();
        let (col, row) = to_cell(cx, cy, width, height);
        out.queue(style::SetForegroundColor(C_BULLET_PLAYER))?;
        out.queue(cursor::MoveTo(col, row))?;
        out.queue(Print("|"))?;
    }

    for flash in scene.flashes {
        let (col, row) = to_cell(flash.x, flash.y, width, height);
        out.queue(style::SetForegroundColor(C_FLASH))?;
        out.queue(cursor::MoveTo(col, row))?;
        out.queue(Print("✶"))?;
    }

    draw_player(out, scene, width, height)?;
    draw_controls_hint(out, height)?;

    if scene.banner_frames > 0 && !scene.game_over {
        draw_banner(out, scene.level.number, width, height)?;
    }
    if scene.game_over {
        draw_game_over(out, scene, width, height)?;
    }

    out.queue(style::ResetColor)?;
    out.queue(cursor::MoveTo(0, height.saturating_sub(1)))?;
    out.flush()?;
    Ok(())
}

fn draw_border<W: Write>(out: &mut W, width: u16, height: u16) -> std::io::Result<()> {
    let w = width as usize;
    out.queue(style::SetForegroundColor(C_BORDER))?;

    out.queue(cursor::MoveTo(0, 1))?;
    out.queue(Print(format!("┌{}┐", "─".repeat(w.saturating_sub(2)))))?;
    out.queue(cursor::MoveTo(0, height.saturating_sub(2)))?;
    out.queue(Print(format!("└{}┘", "─".repeat(w.saturating_sub(2)))))?;

    for row in 2..height.saturating_sub(2) {
        out.queue(cursor::MoveTo(0, row))?;
        out.queue(Print("│"))?;
        out.queue(cursor::MoveTo(width.saturating_sub(1), row))?;
        out.queue(Print("│"))?;
    }
    Ok(())
}

fn draw_hud<W: Write>(out: &mut W, scene: &Scene, width: u16) -> std::io::Result<()> {
    out.queue(cursor::MoveTo(1, 0))?;
    out.queue(style::SetForegroundColor(C_HUD_SCORE))?;
    if scene.high_score > 0 {
        out.queue(Print(format!(
            "Score:{:>6}  Hi:{:>6}",
            scene.ctx.score, scene.high_score
        )))?;
    } else {
        out.queue(Print(format!("Score:{:>6}", scene.ctx.score)))?;
    }

    let level_str = format!("[ LEVEL {} ]", scene.level.number);
    out.queue(cursor::MoveTo(
        (width / 2).saturating_sub(level_str.chars().count() as u16 / 2),
        0,
    ))?;
    out.queue(style::SetForegroundColor(Color::White))?;
    out.queue(Print(&level_str))?;

    let life = scene.ctx.lives.max(0);
    let life_str = if scene.level.player.invulnerable {
        format!("Life:{:>4} *", life)
    } else {
        format!("Life:{:>4}", life)
    };
    out.queue(cursor::MoveTo(
        width.saturating_sub(life_str.chars().count() as u16 + 1),
        0,
    ))?;
    out.queue(style::SetForegroundColor(C_HUD_LIFE))?;
    out.queue(Print(&life_str))?;
    Ok(())
}

fn draw_player<W: Write>(
    out: &mut W,
    scene: &Scene,
    width: u16,
    height: u16,
) -> std::io::Result<()> {
    let (cx, cy) = scene.level.player.rect.center();
    let (col, row) = to_cell(cx, cy, width, height);
    out.queue(style::SetForegroundColor(C_PLAYER))?;
    out.queue(cursor::MoveTo(col.saturating_sub(1), row))?;
    out.queue(Print("◢▲◣"))?;
    Ok(())
}

fn draw_controls_hint<W: Write>(out: &mut W, height: u16) -> std::io::Result<()> {
    out.queue(cursor::MoveTo(1, height.saturating_sub(1)))?;
    out.queue(style::SetForegroundColor(C_HINT))?;
    out.queue(Print("←→↑↓ / WASD : Move   SPACE : Shoot   Q : Quit"))?;
    Ok(())
}

fn draw_banner<W: Write>(
    out: &mut W,
    number: u32,
    width: u16,
    height: u16,
) -> std::io::Result<()> {
    let text = format!("─  LEVEL {}  ─", number);
    out.queue(cursor::MoveTo(
        (width / 2).saturating_sub(text.chars().count() as u16 / 2),
        height / 2,
    ))?;
    out.queue(style::SetForegroundColor(Color::Cyan))?;
    out.queue(Print(&text))?;
    Ok(())
}

fn draw_game_over<W: Write>(
    out: &mut W,
    scene: &Scene,
    width: u16,
    height: u16,
) -> std::io::Result<()> {
    let cx = width / 2;
    let cy = height / 2;

    let title = "G A M E   O V E R";
    out.queue(cursor::MoveTo(
        cx.saturating_sub(title.chars().count() as u16 / 2),
        cy.saturating_sub(1),
    ))?;
    out.queue(style::SetForegroundColor(Color::Red))?;
    out.queue(Print(title))?;

    let score_line = format!("Final score: {}", scene.ctx.score);
    out.queue(cursor::MoveTo(
        cx.saturating_sub(score_line.chars().count() as u16 / 2),
        cy + 1,
    ))?;
    out.queue(style::SetForegroundColor(Color::White))?;
    out.queue(Print(&score_line))?;

    let hint = "[R] Menu   [Q] Quit";
    out.queue(cursor::MoveTo(
        cx.saturating_sub(hint.chars().count() as u16 / 2),
        cy + 3,
    ))?;
    out.queue(style::SetForegroundColor(C_HINT))?;
    out.queue(Print(hint))?;
    Ok(())
}
