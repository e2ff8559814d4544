mod display;

use std::collections::HashMap;
use std::io::{stdout, BufWriter, Write};
use std::path::PathBuf;
use std::sync::mpsc;
use std::thread;
use std::time::{Duration, Instant};

use crossterm::{
    cursor,
    event::{
        self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers, KeyboardEnhancementFlags,
        PopKeyboardEnhancementFlags, PushKeyboardEnhancementFlags,
    },
    terminal, ExecutableCommand,
};
use rand::thread_rng;

use hive_invaders::animset::AnimationLibrary;
use hive_invaders::context::SimContext;
use hive_invaders::events::GameEvent;
use hive_invaders::level::{Level, SCREEN_H, SCREEN_W};

use display::{Flash, Scene};

const FRAME: Duration = Duration::from_micros(16_667); // 60 FPS

/// Frames an explosion flash stays on screen.
const FLASH_FRAMES: u32 = 8;

/// Frames the level banner stays up after a level starts.
const BANNER_FRAMES: u32 = 90;

/// A key is considered "held" if its last press/repeat event arrived within
/// this many frames.  Covers terminals that don't emit key-release events:
/// the OS key-repeat rate keeps refreshing the timestamp while the key is
/// actually down.
const HOLD_WINDOW: u64 = 8;

/// Returns true if `key` was seen within the last `HOLD_WINDOW` frames.
fn is_held(key_frame: &HashMap<KeyCode, u64>, key: &KeyCode, frame: u64) -> bool {
    key_frame
        .get(key)
        .map(|&last| frame.saturating_sub(last) <= HOLD_WINDOW)
        .unwrap_or(false)
}

fn any_held(key_frame: &HashMap<KeyCode, u64>, keys: &[KeyCode], frame: u64) -> bool {
    keys.iter().any(|k| is_held(key_frame, k, frame))
}

// ── High-score persistence ────────────────────────────────────────────────────

fn high_score_path() -> PathBuf {
    let home = std::env::var("HOME").unwrap_or_else(|_| ".".to_string());
    PathBuf::from(home).join(".hive_invaders_score")
}

fn load_high_score() -> u32 {
    std::fs::read_to_string(high_score_path())
        .ok()
        .and_then(|s| s.trim().parse().ok())
        .unwrap_or(0)
}

fn save_high_score(score: u32) {
    let _ = std::fs::write(high_score_path(), score.to_string());
}

// ── Menu ──────────────────────────────────────────────────────────────────────

enum MenuResult {
    /// Starting level number.
    Start(u32),
    Quit,
}

fn show_menu<W: Write>(
    out: &mut W,
    rx: &mpsc::Receiver<Event>,
    high_score: u32,
) -> std::io::Result<MenuResult> {
    use crossterm::style::{self, Color, Print};
    use crossterm::QueueableCommand;

    out.queue(terminal::Clear(terminal::ClearType::All))?;

    let (width, height) = terminal::size()?;
    let cx = width / 2;
    let cy = height / 2;

    let title = "★  HIVE  INVADERS  ★";
    out.queue(cursor::MoveTo(
        cx.saturating_sub(title.chars().count() as u16 / 2),
        cy.saturating_sub(6),
    ))?;
    out.queue(style::SetForegroundColor(Color::Cyan))?;
    out.queue(Print(title))?;

    if high_score > 0 {
        let hs_str = format!("Best Score: {}", high_score);
        out.queue(cursor::MoveTo(
            cx.saturating_sub(hs_str.chars().count() as u16 / 2),
            cy.saturating_sub(5),
        ))?;
        out.queue(style::SetForegroundColor(Color::Yellow))?;
        out.queue(Print(&hs_str))?;
    }

    out.queue(cursor::MoveTo(cx.saturating_sub(10), cy.saturating_sub(3)))?;
    out.queue(style::SetForegroundColor(Color::White))?;
    out.queue(Print("Select difficulty:"))?;

    let options: &[(&str, &str, Color, &str)] = &[
        ("1", "Easy  ", Color::Green, "Start at level 1"),
        ("2", "Medium", Color::Yellow, "Start at level 3"),
        ("3", "Hard  ", Color::Red, "Start at level 5"),
    ];
    for (i, (key, label, color, desc)) in options.iter().enumerate() {
        let row = cy.saturating_sub(1) + i as u16;
        out.queue(cursor::MoveTo(cx.saturating_sub(10), row))?;
        out.queue(style::SetForegroundColor(Color::DarkGrey))?;
        out.queue(Print(format!("[{}] ", key)))?;
        out.queue(style::SetForegroundColor(*color))?;
        out.queue(Print(format!("{:<8}", label)))?;
        out.queue(style::SetForegroundColor(Color::DarkGrey))?;
        out.queue(Print(format!(" - {}", desc)))?;
    }

    out.queue(cursor::MoveTo(cx.saturating_sub(10), cy + 3))?;
    out.queue(style::SetForegroundColor(Color::DarkGrey))?;
    out.queue(Print("←→↑↓ / WASD : Move   SPACE : Shoot   Q : Quit"))?;

    out.queue(style::ResetColor)?;
    out.flush()?;

    loop {
        if let Ok(Event::Key(KeyEvent { code, .. })) = rx.recv() {
            match code {
                KeyCode::Char('1') => return Ok(MenuResult::Start(1)),
                KeyCode::Char('2') => return Ok(MenuResult::Start(3)),
                KeyCode::Char('3') => return Ok(MenuResult::Start(5)),
                KeyCode::Char('q') | KeyCode::Char('Q') | KeyCode::Esc => {
                    return Ok(MenuResult::Quit);
                }
                _ => {}
            }
        }
    }
}

// ── Game loop ─────────────────────────────────────────────────────────────────

/// Returns `true` → quit program,  `false` → back to menu.
fn game_loop<W: Write>(
    out: &mut W,
    start_level: u32,
    rx: &mpsc::Receiver<Event>,
    high_score: &mut u32,
) -> std::io::Result<bool> {
    let mut rng = thread_rng();

    let library = match AnimationLibrary::built_in() {
        Ok(lib) => lib,
        Err(err) => return Err(std::io::Error::new(std::io::ErrorKind::InvalidData, err)),
    };

    let mut level_number = start_level;
    let mut level = Level::new(level_number, &library)
        .map_err(|err| std::io::Error::new(std::io::ErrorKind::InvalidData, err))?;
    let mut ctx = SimContext::new(SCREEN_W, SCREEN_H, level_number);

    let mut key_frame: HashMap<KeyCode, u64> = HashMap::new();
    let mut flashes: Vec<Flash> = Vec::new();
    let mut banner_frames = BANNER_FRAMES;
    let mut game_over = false;
    let mut frame: u64 = 0;

    loop {
        let frame_start = Instant::now();
        frame += 1;

        // ── Drain all pending input events (non-blocking) ─────────────────────
        while let Ok(Event::Key(KeyEvent {
            code,
            kind,
            modifiers,
            ..
        })) = rx.try_recv()
        {
            match kind {
                KeyEventKind::Press => {
                    key_frame.insert(code, frame);
                    match code {
                        KeyCode::Char('q') | KeyCode::Char('Q') | KeyCode::Esc => {
                            return Ok(true);
                        }
                        KeyCode::Char('c') if modifiers.contains(KeyModifiers::CONTROL) => {
                            return Ok(true);
                        }
                        KeyCode::Char('r') | KeyCode::Char('R') if game_over => {
                            return Ok(false);
                        }
                        _ => {}
                    }
                }
                KeyEventKind::Repeat => {
                    key_frame.insert(code, frame);
                }
                KeyEventKind::Release => {
                    key_frame.remove(&code);
                }
            }
        }

        if !game_over {
            // ── Held-key actions, applied every frame ─────────────────────────
            let left = any_held(
                &key_frame,
                &[KeyCode::Left, KeyCode::Char('a'), KeyCode::Char('A')],
                frame,
            );
            let right = any_held(
                &key_frame,
                &[KeyCode::Right, KeyCode::Char('d'), KeyCode::Char('D')],
                frame,
            );
            let up = any_held(
                &key_frame,
                &[KeyCode::Up, KeyCode::Char('w'), KeyCode::Char('W')],
                frame,
            );
            let down = any_held(
                &key_frame,
                &[KeyCode::Down, KeyCode::Char('s'), KeyCode::Char('S')],
                frame,
            );
            let shoot = is_held(&key_frame, &KeyCode::Char(' '), frame);

            let ax = (right as i32 - left as i32) as f32;
            let ay = (down as i32 - up as i32) as f32;
            if ax != 0.0 || ay != 0.0 {
                level.player.steer(ax, ay, &ctx);
            }
            if shoot {
                level.player.shoot();
            }

            // ── Simulation tick ───────────────────────────────────────────────
            level.tick(&mut ctx, &mut rng);

            for event in ctx.drain_events() {
                match event {
                    GameEvent::ExplosionAt { x, y } => flashes.push(Flash {
                        x,
                        y,
                        frames: FLASH_FRAMES,
                    }),
                    GameEvent::Sound(cue) => log::debug!("sound cue {cue:?}"),
                    _ => {}
                }
            }

            if ctx.score > *high_score {
                *high_score = ctx.score;
                save_high_score(*high_score);
            }

            if level.cleared() {
                level_number += 1;
                log::debug!("level {level_number} starting");
                level = Level::new(level_number, &library)
                    .map_err(|err| std::io::Error::new(std::io::ErrorKind::InvalidData, err))?;
                ctx.level = level_number;
                ctx.events.clear();
                banner_frames = BANNER_FRAMES;
            }

            if ctx.lives <= 0 {
                game_over = true;
            }
        }

        flashes.retain_mut(|f| {
            f.frames -= 1;
            f.frames > 0
        });
        banner_frames = banner_frames.saturating_sub(1);

        let scene = Scene {
            level: &level,
            ctx: &ctx,
            flashes: &flashes,
            high_score: *high_score,
            game_over,
            banner_frames,
        };
        display::render(out, &scene)?;

        let elapsed = frame_start.elapsed();
        if elapsed < FRAME {
            std::thread::sleep(FRAME - elapsed);
        }
    }
}

// ── Entry point ───────────────────────────────────────────────────────────────

fn main() -> std::io::Result<()> {
    env_logger::init(); // stderr, harmless under the alternate screen

    let raw_out = stdout();
    let mut out = BufWriter::new(raw_out);

    terminal::enable_raw_mode()?;
    out.execute(terminal::EnterAlternateScreen)?;
    out.execute(cursor::Hide)?;

    // Request key-release events where the terminal supports them; classic
    // terminals fall back to the hold-window heuristic.
    let keyboard_enhanced = out
        .execute(PushKeyboardEnhancementFlags(
            KeyboardEnhancementFlags::REPORT_EVENT_TYPES,
        ))
        .is_ok();

    // Dedicate a thread to blocking event reads so the game loop never has
    // to block on I/O.
    let (tx, rx) = mpsc::channel::<Event>();
    thread::spawn(move || loop {
        match event::read() {
            Ok(ev) => {
                if tx.send(ev).is_err() {
                    break; // receiver dropped → program exiting
                }
            }
            Err(_) => break,
        }
    });

    let result = run(&mut out, &rx);

    // Always restore the terminal
    if keyboard_enhanced {
        let _ = out.execute(PopKeyboardEnhancementFlags);
    }
    let _ = out.execute(cursor::Show);
    let _ = out.execute(terminal::LeaveAlternateScreen);
    let _ = terminal::disable_raw_mode();

    result
}

fn run<W: Write>(out: &mut W, rx: &mpsc::Receiver<Event>) -> std::io::Result<()> {
    let mut high_score = load_high_score();

    loop {
        match show_menu(out, rx, high_score)? {
            MenuResult::Quit => break,
            MenuResult::Start(start_level) => {
                let quit = game_loop(out, start_level, rx, &mut high_score)?;
                if quit {
                    break;
                }
            }
        }
    }
    Ok(())
}
