use hive_invaders::animset::AnimationLibrary;
use hive_invaders::context::SimContext;
use hive_invaders::enemy::{Behavior, Enemy, Tag};
use hive_invaders::events::{GameEvent, ShotKind};

use rand::rngs::StdRng;
use rand::SeedableRng;

fn make_ctx() -> SimContext {
    SimContext::new(600.0, 600.0, 1)
}

fn seeded_rng() -> StdRng {
    StdRng::seed_from_u64(42)
}

fn library() -> AnimationLibrary {
    AnimationLibrary::built_in().unwrap()
}

// ── Damage & death bookkeeping ────────────────────────────────────────────────

#[test]
fn basic_combat_exchange() {
    let mut ctx = make_ctx();
    let lib = library();
    let mut enemy = Enemy::basic(300.0, 100.0, &lib).unwrap();
    assert_eq!(enemy.life, 10);
    assert_eq!(enemy.points, 5);
    assert_eq!(enemy.damage, 10);

    enemy.take_damage(4, &mut ctx);
    assert_eq!(enemy.life, 6);
    assert!(!enemy.is_dead);
    assert_eq!(ctx.score, 0);

    enemy.take_damage(6, &mut ctx);
    assert!(enemy.is_dead);
    assert_eq!(ctx.score, 5); // points awarded exactly once
}

#[test]
fn dead_enemies_ignore_further_damage() {
    let mut ctx = make_ctx();
    let lib = library();
    let mut enemy = Enemy::basic(300.0, 100.0, &lib).unwrap();

    enemy.take_damage(11, &mut ctx);
    assert!(enemy.is_dead);
    assert_eq!(ctx.score, 5);

    enemy.take_damage(100, &mut ctx);
    enemy.take_damage(100, &mut ctx);
    assert_eq!(ctx.score, 5); // never double-counted

    let deaths = ctx
        .events
        .iter()
        .filter(|e| matches!(e, GameEvent::Died { .. }))
        .count();
    assert_eq!(deaths, 1);
}

#[test]
fn death_emits_explosion_at_the_enemy_center() {
    let mut ctx = make_ctx();
    let lib = library();
    let mut enemy = Enemy::basic(300.0, 100.0, &lib).unwrap();
    enemy.take_damage(10, &mut ctx);

    assert!(ctx
        .events
        .iter()
        .any(|e| matches!(e, GameEvent::ExplosionAt { x, y } if *x == 300.0 && *y == 100.0)));
}

// ── Attack entry ──────────────────────────────────────────────────────────────

#[test]
fn basic_attack_picks_an_attack_animation() {
    let mut ctx = make_ctx();
    let mut rng = seeded_rng();
    let lib = library();
    let mut enemy = Enemy::basic(300.0, 100.0, &lib).unwrap();
    assert!(enemy.idle);

    enemy.attack(&mut rng, &mut ctx);
    assert!(enemy.on_attack);
    assert!(!enemy.idle);
    let current = enemy.animator.current_animation().unwrap();
    assert!(
        ["zigzag", "kamikaze_left", "kamikaze_right"].contains(&current),
        "unexpected attack animation {current}"
    );
    assert!(ctx
        .events
        .iter()
        .any(|e| matches!(e, GameEvent::AttackStarted)));
}

#[test]
fn shooter_attack_starts_with_a_jump() {
    let mut ctx = make_ctx();
    let mut rng = seeded_rng();
    let lib = library();
    let mut enemy = Enemy::shooter(300.0, 100.0, &lib).unwrap();

    enemy.attack(&mut rng, &mut ctx);
    let current = enemy.animator.current_animation().unwrap();
    assert!(current == "jump_left" || current == "jump_right");
}

#[test]
fn shooter_fires_exactly_one_shot_per_attack_run() {
    let mut ctx = make_ctx();
    let mut rng = seeded_rng();
    let lib = library();
    let mut enemy = Enemy::shooter(300.0, 100.0, &lib).unwrap();
    enemy.attack(&mut rng, &mut ctx);

    let mut shots = 0;
    for _ in 0..400 {
        enemy.update(&mut ctx, &mut rng);
        for event in ctx.drain_events() {
            if matches!(
                event,
                GameEvent::ShotFired {
                    kind: ShotKind::Straight,
                    ..
                }
            ) {
                shots += 1;
            }
        }
    }
    // jump (~400 ms) + armed delay (200..1500 ms) both fit well inside
    // 400 ticks ≈ 6.7 s, and the trigger resets only on the next attack.
    assert_eq!(shots, 1);
}

// ── Sniper autonomy ───────────────────────────────────────────────────────────

#[test]
fn snipers_are_not_schedulable() {
    let lib = library();
    let sniper = Enemy::sniper(300.0, 100.0, &lib).unwrap();
    assert!(!sniper.schedulable());

    let basic = Enemy::basic(300.0, 100.0, &lib).unwrap();
    assert!(basic.schedulable());
}

#[test]
fn sniper_fires_after_its_scope_delay() {
    let mut ctx = make_ctx();
    let mut rng = seeded_rng();
    let lib = library();
    let mut sniper = Enemy::sniper(300.0, 100.0, &lib).unwrap();

    let mut aimed_shots = 0;
    let mut first_shot_tick = None;
    for tick in 0..120 {
        sniper.update(&mut ctx, &mut rng);
        for event in ctx.drain_events() {
            if matches!(
                event,
                GameEvent::ShotFired {
                    kind: ShotKind::Aimed,
                    ..
                }
            ) {
                aimed_shots += 1;
                first_shot_tick.get_or_insert(tick);
            }
        }
    }
    assert_eq!(aimed_shots, 1); // next shot re-armed 1500..3000 ms out
    // 1500 ms scope delay ≈ 90 ticks at 16.667 ms
    assert!(first_shot_tick.unwrap() >= 85);

    // It never left idle or drifted sideways; the idle bob is the only
    // vertical motion.
    assert!(sniper.idle);
    assert!(!sniper.on_attack);
    let (cx, cy) = sniper.rect.center();
    assert_eq!(cx, 300.0);
    assert!((cy - 100.0).abs() <= 9.0 + 1e-3);
}

// ── Screen limits & repositioning ─────────────────────────────────────────────

#[test]
fn falling_off_the_bottom_starts_the_restore_phase() {
    let mut ctx = make_ctx();
    let lib = library();
    let mut enemy = Enemy::basic(300.0, 100.0, &lib).unwrap();
    enemy.on_attack = true;
    enemy.rect.y = 601.0;

    enemy.check_limit(&mut ctx);
    assert_eq!(enemy.rect.y, -48.0); // reset above the top
    assert!(enemy.restart_pos);
    assert!(!enemy.on_attack);
    assert!(ctx.events.iter().any(|e| matches!(e, GameEvent::AttackEnded)));
}

#[test]
fn x_axis_wraps_toroidally() {
    let mut ctx = make_ctx();
    let lib = library();
    let mut enemy = Enemy::basic(300.0, 100.0, &lib).unwrap();

    enemy.rect.x = 600.0 + 48.0 + 21.0; // past the right margin
    enemy.check_limit(&mut ctx);
    assert_eq!(enemy.rect.x, -48.0);

    enemy.rect.x = -(48.0 + 21.0); // past the left margin
    enemy.check_limit(&mut ctx);
    assert_eq!(enemy.rect.x, 600.0 + 48.0);
}

#[test]
fn repositioning_glides_back_and_snaps_onto_the_slot() {
    let mut ctx = make_ctx();
    let lib = library();
    let mut enemy = Enemy::basic(300.0, 100.0, &lib).unwrap();
    enemy.idle = false;
    enemy.restart_pos = true;
    enemy.rect.set_center(300.0, 400.0); // 300 px below its slot

    let mut ticks = 0;
    while enemy.restart_pos && ticks < 500 {
        let before = enemy.rect.center().1;
        enemy.repositioning(&mut ctx);
        let after = enemy.rect.center().1;
        assert!(after <= before); // monotone approach
        ticks += 1;
    }
    assert!(!enemy.restart_pos, "restore never finished");
    assert_eq!(enemy.rect.center(), (300.0, 100.0)); // exact snap
    assert!(enemy.idle);
    assert!(ctx
        .events
        .iter()
        .any(|e| matches!(e, GameEvent::PositionRestored)));
}

// ── Bullets ───────────────────────────────────────────────────────────────────

#[test]
fn straight_bullets_fall_and_die_off_screen() {
    let mut ctx = make_ctx();
    let mut rng = seeded_rng();
    let mut bullet = Enemy::bullet(300.0, 300.0);
    assert_eq!(bullet.tag, Tag::EnemyBullet);
    assert_eq!(bullet.damage, 10);

    let y0 = bullet.rect.y;
    bullet.update(&mut ctx, &mut rng);
    assert_eq!(bullet.rect.y, y0 + 5.0); // 5 px per tick straight down
    assert_eq!(bullet.rect.x, 300.0 - 2.5); // x untouched

    for _ in 0..100 {
        bullet.update(&mut ctx, &mut rng);
    }
    assert!(bullet.is_dead);
    assert_eq!(ctx.score, 0); // off-screen exit is silent
}

#[test]
fn aimed_bullets_lock_their_angle_on_the_first_tick() {
    let mut ctx = make_ctx();
    let mut rng = seeded_rng();
    ctx.player_center = (300.0, 500.0); // straight below the muzzle
    let mut bullet = Enemy::aimed_bullet(300.0, 100.0);
    assert!(matches!(
        bullet.behavior,
        Behavior::AimedBullet { angle: None, .. }
    ));

    bullet.update(&mut ctx, &mut rng);
    let x_after_lock = bullet.rect.center().0;
    assert!((x_after_lock - 300.0).abs() < 1e-3);

    // The player moves; the bullet must not re-aim.
    ctx.player_center = (0.0, 0.0);
    let y_before = bullet.rect.center().1;
    for _ in 0..10 {
        bullet.update(&mut ctx, &mut rng);
    }
    assert!((bullet.rect.center().0 - 300.0).abs() < 1e-3); // still vertical
    assert!(bullet.rect.center().1 > y_before); // still descending
}
