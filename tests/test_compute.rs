use dodge_shooter::compute::*;
use dodge_shooter::config::GameConfig;
use dodge_shooter::entities::*;
use dodge_shooter::events::GameEvent;
use dodge_shooter::input::{InputEvent, Key};

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

fn make_state() -> GameState {
    init_state(&GameConfig::default())
}

fn seeded_rng() -> StdRng {
    StdRng::seed_from_u64(42)
}

fn press(pos: Vec2, at_ms: u64) -> InputEvent {
    InputEvent::PointerDown { pos, at_ms }
}

fn drag_to(pos: Vec2, at_ms: u64) -> InputEvent {
    InputEvent::PointerMove { pos, at_ms }
}

fn release(pos: Vec2, at_ms: u64) -> InputEvent {
    InputEvent::PointerUp { pos, at_ms }
}

fn drain(state: &mut GameState) -> Vec<GameEvent> {
    state.events().drain().collect()
}

/// Park an enemy on the ship and tick until the session ends.
fn kill_player(state: &mut GameState, rng: &mut StdRng) {
    state.player.health = 1;
    let pos = state.player.pos;
    state.registry.spawn_enemy(pos, 0.0);
    tick(state, rng);
    assert_eq!(state.status, GameStatus::GameOver);
}

// ── init_state ────────────────────────────────────────────────────────────────

#[test]
fn init_state_player_position() {
    let s = make_state();
    assert_eq!(s.player.pos, Vec2::new(400.0, 500.0));
    assert_eq!(s.player.health, MAX_HEALTH);
    assert!(!s.player.flashing);
}

#[test]
fn init_state_is_an_empty_playing_session() {
    let s = make_state();
    assert!(s.registry.is_empty());
    assert_eq!(s.score, 0);
    assert_eq!(s.elapsed_ticks(), 0);
    assert_eq!(s.status, GameStatus::Playing);
    assert_eq!(s.summary, None);
    assert_eq!(s.pending_actions(), 0);
}

// ── Spawning ──────────────────────────────────────────────────────────────────

#[test]
fn first_wave_fires_on_tick_121() {
    let mut s = make_state();
    let mut rng = seeded_rng();
    for _ in 0..120 {
        tick(&mut s, &mut rng);
    }
    assert!(drain(&mut s).is_empty());
    assert_eq!(s.director().frame_counter(), 120);

    tick(&mut s, &mut rng);
    assert_eq!(drain(&mut s), vec![GameEvent::WaveStarted { count: 1 }]);
    assert_eq!(s.director().frame_counter(), 0);
    // Staggered: nothing on the field until the next tick.
    assert!(s.registry.enemies().is_empty());
    assert_eq!(s.pending_actions(), 1);

    tick(&mut s, &mut rng);
    assert_eq!(s.registry.enemies().len(), 1);
    assert_eq!(s.pending_actions(), 0);
}

#[test]
fn spawned_enemy_starts_above_field_inside_margins() {
    let mut s = make_state();
    let mut rng = seeded_rng();
    for _ in 0..122 {
        tick(&mut s, &mut rng);
    }
    let e = &s.registry.enemies()[0];
    assert!(e.pos.x >= 50.0 && e.pos.x <= 750.0);
    // Spawned at -50 then moved for the rest of its first tick.
    assert!(e.pos.y > ENEMY_SPAWN_Y && e.pos.y < 0.0);
    // Two seconds in: speed range is [100, 201].
    assert!(e.speed >= 100.0 && e.speed <= 201.0);
}

#[test]
fn restart_cancels_pending_spawns() {
    let mut s = make_state();
    let mut rng = seeded_rng();
    for _ in 0..121 {
        tick(&mut s, &mut rng);
    }
    assert_eq!(s.pending_actions(), 1);

    s.restart();
    tick(&mut s, &mut rng);
    assert!(s.registry.enemies().is_empty());
    assert_eq!(s.pending_actions(), 0);
}

// ── Shooting ──────────────────────────────────────────────────────────────────

#[test]
fn shoot_press_fires_from_muzzle() {
    let mut s = make_state();
    let mut rng = seeded_rng();
    s.feed(&InputEvent::KeyDown(Key::Shoot));
    tick(&mut s, &mut rng);

    let bullets = s.registry.bullets();
    assert_eq!(bullets.len(), 1);
    assert_eq!(bullets[0].pos.x, 400.0);
    // 470 at the muzzle, one tick of travel upward.
    assert!((bullets[0].pos.y - 460.0).abs() < 1e-3);
}

#[test]
fn holding_shoot_fires_once() {
    let mut s = make_state();
    let mut rng = seeded_rng();
    s.feed(&InputEvent::KeyDown(Key::Shoot));
    for _ in 0..30 {
        tick(&mut s, &mut rng);
    }
    assert_eq!(s.registry.bullets().len(), 1);
}

#[test]
fn shots_respect_cooldown() {
    let mut s = make_state();
    let mut rng = seeded_rng();
    let mut fired = 0;
    for _ in 0..20 {
        s.feed(&InputEvent::KeyDown(Key::Shoot));
        s.feed(&InputEvent::KeyUp(Key::Shoot));
        let before = s.registry.bullets().len();
        tick(&mut s, &mut rng);
        if s.registry.bullets().len() > before {
            fired += 1;
        }
    }
    // Ticks 1 and 11 fire; the cooldown swallows the rest.
    assert_eq!(fired, 2);
}

#[test]
fn tap_fires_a_bullet() {
    let mut s = make_state();
    let mut rng = seeded_rng();
    let at = Vec2::new(200.0, 200.0);
    s.feed(&press(at, 1000));
    s.feed(&release(at, 1050));
    tick(&mut s, &mut rng);
    assert_eq!(s.registry.bullets().len(), 1);
}

#[test]
fn still_tap_fires_without_moving_the_ship() {
    let mut s = make_state();
    let mut rng = seeded_rng();
    let start = s.player.pos;
    let at = Vec2::new(100.0, 200.0);

    s.feed(&press(at, 0));
    for _ in 0..9 {
        tick(&mut s, &mut rng);
    }
    s.feed(&release(at, 150));
    tick(&mut s, &mut rng);

    assert_eq!(s.player.pos, start);
    let bullets = s.registry.bullets();
    assert_eq!(bullets.len(), 1);
    assert_eq!(bullets[0].pos.x, start.x);
}

// ── Movement ──────────────────────────────────────────────────────────────────

#[test]
fn held_key_moves_at_player_speed() {
    let mut s = make_state();
    let mut rng = seeded_rng();
    s.feed(&InputEvent::KeyDown(Key::Left));
    for _ in 0..60 {
        tick(&mut s, &mut rng);
    }
    // 300 px/s for one second.
    assert!((s.player.pos.x - 100.0).abs() < 0.1);
    assert_eq!(s.player.pos.y, 500.0);
}

#[test]
fn player_is_clamped_to_field() {
    let mut s = make_state();
    let mut rng = seeded_rng();
    s.feed(&InputEvent::KeyDown(Key::Right));
    s.feed(&InputEvent::KeyDown(Key::Down));
    for _ in 0..120 {
        tick(&mut s, &mut rng);
    }
    assert_eq!(s.player.pos, Vec2::new(780.0, 580.0));
}

#[test]
fn drag_steers_toward_pointer_and_stops() {
    let mut s = make_state();
    let mut rng = seeded_rng();
    let target = Vec2::new(400.0, 200.0);
    s.feed(&press(Vec2::new(400.0, 480.0), 0));
    s.feed(&drag_to(target, 30));
    for _ in 0..120 {
        tick(&mut s, &mut rng);
    }
    assert!(s.player.pos.distance(target) <= 5.0);
}

// ── Collisions & scoring ──────────────────────────────────────────────────────

#[test]
fn bullet_kill_scores_50() {
    let mut s = make_state();
    let mut rng = seeded_rng();
    let enemy = s.registry.spawn_enemy(Vec2::new(400.0, 300.0), 0.0);
    s.registry.spawn_bullet(Vec2::new(400.0, 310.0));
    tick(&mut s, &mut rng);

    assert_eq!(s.score, POINTS_FOR_KILL);
    assert!(!s.registry.contains_enemy(enemy));
    assert!(s.registry.bullets().is_empty());
    assert_eq!(
        drain(&mut s),
        vec![GameEvent::EnemyDestroyed { x: 400.0, y: 300.0 }]
    );
}

#[test]
fn dodged_enemy_scores_10() {
    let mut s = make_state();
    let mut rng = seeded_rng();
    s.registry.spawn_enemy(Vec2::new(100.0, 649.0), 120.0);
    tick(&mut s, &mut rng);
    assert_eq!(s.score, POINTS_FOR_DODGE);
    assert!(s.registry.enemies().is_empty());
    assert_eq!(drain(&mut s), vec![GameEvent::EnemyDodged]);
}

#[test]
fn enemy_at_exit_line_is_not_yet_dodged() {
    let mut s = make_state();
    let mut rng = seeded_rng();
    s.registry.spawn_enemy(Vec2::new(100.0, 650.0), 0.0);
    tick(&mut s, &mut rng);
    assert_eq!(s.score, 0);
    assert_eq!(s.registry.enemies().len(), 1);
}

#[test]
fn ram_costs_one_health_and_flashes() {
    let mut s = make_state();
    let mut rng = seeded_rng();
    let pos = s.player.pos;
    s.registry.spawn_enemy(pos, 0.0);
    tick(&mut s, &mut rng);

    assert_eq!(s.player.health, 2);
    assert!(s.player.flashing);
    assert_eq!(s.status, GameStatus::Playing);
    assert!(s.registry.enemies().is_empty());
    assert_eq!(drain(&mut s), vec![GameEvent::PlayerHit { health: 2 }]);
}

#[test]
fn hit_flash_clears_after_200ms() {
    let mut s = make_state();
    let mut rng = seeded_rng();
    let pos = s.player.pos;
    s.registry.spawn_enemy(pos, 0.0);
    tick(&mut s, &mut rng);

    for _ in 0..10 {
        tick(&mut s, &mut rng);
    }
    assert!(s.player.flashing);
    for _ in 0..10 {
        tick(&mut s, &mut rng);
    }
    assert!(!s.player.flashing);
    assert_eq!(s.player.flash_until, None);
}

#[test]
fn second_hit_extends_flash() {
    let mut s = make_state();
    let mut rng = seeded_rng();
    let pos = s.player.pos;
    s.registry.spawn_enemy(pos, 0.0);
    tick(&mut s, &mut rng);
    for _ in 0..8 {
        tick(&mut s, &mut rng);
    }
    s.registry.spawn_enemy(pos, 0.0);
    tick(&mut s, &mut rng);
    // First flash would have ended by now; the second keeps it on.
    for _ in 0..6 {
        tick(&mut s, &mut rng);
    }
    assert!(s.player.flashing);
    assert_eq!(s.player.health, 1);
}

// ── Game over ─────────────────────────────────────────────────────────────────

#[test]
fn last_health_ends_the_session() {
    let mut s = make_state();
    let mut rng = seeded_rng();
    s.score = 120;
    s.registry.spawn_enemy(Vec2::new(100.0, 100.0), 150.0);
    kill_player(&mut s, &mut rng);

    assert_eq!(s.player.health, 0);
    assert_eq!(s.summary, Some(GameOverSummary { final_score: 120 }));
    assert!(s.player.flashing);
    assert!(s.registry.is_frozen());
    let events = drain(&mut s);
    assert_eq!(
        events.last(),
        Some(&GameEvent::PlayerDied { final_score: 120 })
    );
}

#[test]
fn double_ram_on_last_health_takes_one_hit() {
    let mut s = make_state();
    let mut rng = seeded_rng();
    s.player.health = 1;
    let pos = s.player.pos;
    s.registry.spawn_enemy(pos, 0.0);
    s.registry.spawn_enemy(Vec2::new(pos.x + 10.0, pos.y), 0.0);
    tick(&mut s, &mut rng);
    assert_eq!(s.status, GameStatus::GameOver);
    assert_eq!(s.player.health, 0);
    assert_eq!(s.registry.enemies().len(), 1);
}

#[test]
fn game_over_freezes_the_world() {
    let mut s = make_state();
    let mut rng = seeded_rng();
    s.registry.spawn_enemy(Vec2::new(100.0, 100.0), 150.0);
    s.registry.spawn_bullet(Vec2::new(700.0, 300.0));
    kill_player(&mut s, &mut rng);

    let enemies = s.registry.enemies().to_vec();
    let bullets = s.registry.bullets().to_vec();
    let ticks = s.elapsed_ticks();
    s.feed(&InputEvent::KeyDown(Key::Left));
    for _ in 0..300 {
        tick(&mut s, &mut rng);
    }
    assert_eq!(s.registry.enemies(), enemies.as_slice());
    assert_eq!(s.registry.bullets(), bullets.as_slice());
    assert_eq!(s.elapsed_ticks(), ticks);
    assert_eq!(s.status, GameStatus::GameOver);
    assert_eq!(s.pending_actions(), 0);
}

// ── Restart ───────────────────────────────────────────────────────────────────

#[test]
fn pointer_press_restarts_after_game_over() {
    let mut s = make_state();
    let mut rng = seeded_rng();
    s.score = 340;
    s.registry.spawn_enemy(Vec2::new(100.0, 100.0), 150.0);
    kill_player(&mut s, &mut rng);
    drain(&mut s);
    let session = s.session();

    s.feed(&press(Vec2::new(10.0, 10.0), 5000));
    tick(&mut s, &mut rng);

    assert_eq!(s.status, GameStatus::Playing);
    assert_eq!(s.score, 0);
    assert_eq!(s.player, Player::spawn(FIELD_WIDTH, FIELD_HEIGHT));
    assert!(s.registry.is_empty());
    assert_eq!(s.summary, None);
    assert_eq!(s.elapsed_ticks(), 0);
    assert_eq!(s.director().frame_counter(), 0);
    assert_eq!(s.session(), session + 1);
    assert_eq!(drain(&mut s), vec![GameEvent::Restarted]);
}

#[test]
fn restart_press_does_not_fire() {
    let mut s = make_state();
    let mut rng = seeded_rng();
    kill_player(&mut s, &mut rng);

    let at = Vec2::new(300.0, 300.0);
    s.feed(&press(at, 100));
    tick(&mut s, &mut rng);
    s.feed(&release(at, 120));
    tick(&mut s, &mut rng);

    assert_eq!(s.status, GameStatus::Playing);
    assert!(s.registry.bullets().is_empty());
}

#[test]
fn space_and_r_also_restart() {
    for key in [Key::Shoot, Key::Restart] {
        let mut s = make_state();
        let mut rng = seeded_rng();
        kill_player(&mut s, &mut rng);
        s.feed(&InputEvent::KeyDown(key));
        tick(&mut s, &mut rng);
        assert_eq!(s.status, GameStatus::Playing, "{:?}", key);
    }
}

#[test]
fn restart_while_playing_is_a_no_op() {
    let mut s = make_state();
    let mut rng = seeded_rng();
    s.feed(&InputEvent::KeyDown(Key::Restart));
    tick(&mut s, &mut rng);
    assert_eq!(s.session(), 0);
    assert!(drain(&mut s).is_empty());
}

#[test]
fn repeated_restarts_give_identical_sessions() {
    let mut s = make_state();
    let mut rng = seeded_rng();
    s.restart();
    let first = (s.player.clone(), s.score, s.elapsed_ticks(), s.status);
    s.restart();
    let second = (s.player.clone(), s.score, s.elapsed_ticks(), s.status);
    assert_eq!(first, second);
    assert!(s.registry.is_empty());
}

// ── Long runs ─────────────────────────────────────────────────────────────────

#[test]
fn random_play_keeps_invariants() {
    let mut s = make_state();
    let mut rng = seeded_rng();
    let mut input_rng = StdRng::seed_from_u64(7);
    let keys = [Key::Left, Key::Right, Key::Up, Key::Down, Key::Shoot];
    let mut last_score = 0;

    for frame in 0..20_000u64 {
        let key = keys[input_rng.gen_range(0..keys.len())];
        if input_rng.gen_bool(0.5) {
            s.feed(&InputEvent::KeyDown(key));
        } else {
            s.feed(&InputEvent::KeyUp(key));
        }
        if s.status == GameStatus::GameOver && frame % 90 == 0 {
            s.feed(&InputEvent::KeyDown(Key::Restart));
            s.feed(&InputEvent::KeyUp(Key::Restart));
        }

        tick(&mut s, &mut rng);

        for event in drain(&mut s) {
            match event {
                GameEvent::WaveStarted { count } => assert!((1..=6).contains(&count)),
                GameEvent::PlayerHit { health } => assert!(health < MAX_HEALTH),
                GameEvent::Restarted => last_score = 0,
                _ => {}
            }
        }

        assert!(s.player.health <= MAX_HEALTH);
        assert_eq!(s.score % POINTS_FOR_DODGE, 0);
        assert!(s.score >= last_score, "score went down within a session");
        last_score = s.score;
        assert!(s.player.pos.x >= 20.0 && s.player.pos.x <= 780.0);
        assert!(s.player.pos.y >= 20.0 && s.player.pos.y <= 580.0);
        match s.status {
            GameStatus::Playing => assert!(s.summary.is_none() && s.player.health > 0),
            GameStatus::GameOver => {
                assert_eq!(s.player.health, 0);
                assert_eq!(s.summary.map(|o| o.final_score), Some(s.score));
            }
        }
    }
}

#[test]
fn same_seed_same_game() {
    let run = || {
        let mut s = make_state();
        let mut rng = StdRng::seed_from_u64(99);
        s.feed(&InputEvent::KeyDown(Key::Left));
        for _ in 0..1_500 {
            tick(&mut s, &mut rng);
        }
        (s.score, s.player.health, s.registry.enemies().to_vec())
    };
    assert_eq!(run(), run());
}
