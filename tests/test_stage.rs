use std::collections::HashSet;

use auto_invaders::entities::{Bullet, Enemy, MoveDirection};
use auto_invaders::stage::{kill_score, Stage};

use rand::rngs::StdRng;
use rand::SeedableRng;

fn make_stage() -> Stage {
    Stage::new(40, 20)
}

fn seeded_rng() -> StdRng {
    StdRng::seed_from_u64(42)
}

// ── Bullet travel ─────────────────────────────────────────────────────────────

#[test]
fn bullet_advances_one_row() {
    let mut stage = make_stage();
    stage.add_bullet(5, 5);
    let destroyed = stage.step();
    assert!(destroyed.is_empty());
    assert_eq!(stage.bullets, vec![Bullet { x: 5, y: 6 }]);
}

#[test]
fn bullet_discarded_at_top_boundary() {
    // height = 20: y=18 → 19 kept, y=19 → 20 discarded.
    let mut stage = make_stage();
    stage.add_bullet(20, 18);
    stage.add_bullet(15, 19);
    stage.step();
    assert_eq!(stage.bullets, vec![Bullet { x: 20, y: 19 }]);
}

// ── Collision ─────────────────────────────────────────────────────────────────

#[test]
fn lethal_hit_removes_enemy_and_consumes_bullet() {
    let mut stage = make_stage();
    stage.enemies.push(Enemy::invader(1, 10, 8, MoveDirection::Right));
    stage.add_bullet(10, 7); // climbs into (10, 8)
    let destroyed = stage.step();
    assert_eq!(destroyed.len(), 1);
    assert_eq!(destroyed[0].0.id, 1);
    // Killed on its first tick: 100 + (100/50) * (150-1)
    assert_eq!(destroyed[0].1, 398);
    assert_eq!(stage.scores, vec![398]);
    assert!(stage.enemies.is_empty());
    assert!(stage.bullets.is_empty());
}

#[test]
fn nonlethal_hit_consumes_bullet_but_keeps_enemy() {
    let mut stage = make_stage();
    let mut tough = Enemy::invader(1, 10, 8, MoveDirection::Right);
    tough.hitpoint = 20;
    stage.enemies.push(tough);
    stage.add_bullet(10, 7);
    let destroyed = stage.step();
    assert!(destroyed.is_empty());
    assert_eq!(stage.enemies[0].hitpoint, 10);
    assert!(stage.bullets.is_empty());
    assert!(stage.scores.is_empty());
}

#[test]
fn first_enemy_in_spawn_order_absorbs_the_bullet() {
    let mut stage = make_stage();
    stage.enemies.push(Enemy::invader(1, 10, 8, MoveDirection::Right));
    stage.enemies.push(Enemy::invader(2, 10, 8, MoveDirection::Right));
    stage.add_bullet(10, 7);
    let destroyed = stage.step();
    assert_eq!(destroyed.len(), 1);
    assert_eq!(destroyed[0].0.id, 1);
    assert_eq!(stage.enemies.len(), 1);
    assert_eq!(stage.enemies[0].id, 2);
    assert_eq!(stage.enemies[0].hitpoint, 10);
}

#[test]
fn second_bullet_passes_through_the_vacated_cell() {
    // Two bullets converge on one enemy: the first kills it, the second finds
    // the cell empty and keeps flying.
    let mut stage = make_stage();
    stage.enemies.push(Enemy::invader(1, 10, 8, MoveDirection::Right));
    stage.add_bullet(10, 7);
    stage.add_bullet(10, 7);
    let destroyed = stage.step();
    assert_eq!(destroyed.len(), 1);
    assert_eq!(stage.bullets, vec![Bullet { x: 10, y: 8 }]);
}

#[test]
fn enemies_march_before_bullets_resolve() {
    // The invader relocates on this tick (phase rollover), so the bullet must
    // be aimed at the cell it marches into, not the one it left.
    let mut stage = make_stage();
    let mut e = Enemy::invader(1, 10, 12, MoveDirection::Right);
    e.moved_count = 2;
    stage.enemies.push(e);
    stage.add_bullet(11, 11);
    let destroyed = stage.step();
    assert_eq!(destroyed.len(), 1);
    // Killed on its third tick: 100 + (100/50) * (150-3)
    assert_eq!(destroyed[0].1, 394);
}

#[test]
fn bullet_misses_and_survives_at_new_height() {
    let mut stage = make_stage();
    stage.enemies.push(Enemy::invader(1, 10, 9, MoveDirection::Right));
    stage.add_bullet(10, 7); // climbs to (10, 8), one row short
    let destroyed = stage.step();
    assert!(destroyed.is_empty());
    assert_eq!(stage.bullets, vec![Bullet { x: 10, y: 8 }]);
    assert_eq!(stage.enemies.len(), 1);
}

// ── Scoring ───────────────────────────────────────────────────────────────────

#[test]
fn score_bonus_for_fast_high_value_kill() {
    let mut e = Enemy::invader(1, 0, 0, MoveDirection::Left);
    e.moved_count = 50;
    assert_eq!(kill_score(&e), 300); // 100 + (100/50) * (150-50)
}

#[test]
fn score_no_bonus_past_tick_limit() {
    let mut e = Enemy::invader(1, 0, 0, MoveDirection::Left);
    e.moved_count = 200;
    assert_eq!(kill_score(&e), 100);
}

#[test]
fn score_no_bonus_below_value_floor() {
    let mut e = Enemy::invader(1, 0, 0, MoveDirection::Left);
    e.base_score = 40;
    e.moved_count = 10;
    assert_eq!(kill_score(&e), 40);
    e.moved_count = 200;
    assert_eq!(kill_score(&e), 40);
}

#[test]
fn score_bonus_is_zero_exactly_at_tick_limit() {
    let mut e = Enemy::invader(1, 0, 0, MoveDirection::Left);
    e.moved_count = 150;
    assert_eq!(kill_score(&e), 100); // qualifies, but 150-150 ticks of bonus
}

// ── Reset ─────────────────────────────────────────────────────────────────────

#[test]
fn reset_folds_round_total_into_max_score() {
    let mut stage = make_stage();
    stage.scores = vec![100, 200];
    stage.max_score = 150;
    stage.add_bullet(5, 5);
    stage.reset(&mut seeded_rng());
    assert_eq!(stage.max_score, 300);
    assert!(stage.scores.is_empty());
    assert!(stage.bullets.is_empty());
}

#[test]
fn reset_keeps_higher_previous_max() {
    let mut stage = make_stage();
    stage.scores = vec![100];
    stage.max_score = 500;
    stage.reset(&mut seeded_rng());
    assert_eq!(stage.max_score, 500);
}

#[test]
fn reset_regenerates_roster_in_the_top_band() {
    // height = 20 → 20 invaders across a 5-row band of distinct cells.
    let mut stage = make_stage();
    stage.reset(&mut seeded_rng());
    assert_eq!(stage.enemies.len(), 20);
    let cells: HashSet<(i32, i32)> = stage.enemies.iter().map(|e| (e.x, e.y)).collect();
    assert_eq!(cells.len(), 20); // sampled without replacement
    for e in &stage.enemies {
        assert!(e.x >= 0 && e.x < 40);
        assert!(e.y >= 15 && e.y <= 19);
    }
}

#[test]
fn reset_never_reuses_enemy_ids() {
    let mut stage = make_stage();
    let mut rng = seeded_rng();
    stage.reset(&mut rng);
    let first: HashSet<u32> = stage.enemies.iter().map(|e| e.id).collect();
    stage.reset(&mut rng);
    let second: HashSet<u32> = stage.enemies.iter().map(|e| e.id).collect();
    assert!(first.is_disjoint(&second));
}

// ── Game over ─────────────────────────────────────────────────────────────────

#[test]
fn game_over_with_empty_roster() {
    let stage = make_stage();
    assert!(stage.is_game_over());
}

#[test]
fn game_over_when_an_enemy_reaches_the_deadline() {
    let mut stage = make_stage();
    stage.enemies.push(Enemy::invader(1, 5, 10, MoveDirection::Left));
    assert!(stage.is_game_over());
}

#[test]
fn not_game_over_one_row_above_the_deadline() {
    let mut stage = make_stage();
    stage.enemies.push(Enemy::invader(1, 5, 11, MoveDirection::Left));
    stage.enemies.push(Enemy::invader(2, 9, 11, MoveDirection::Right));
    assert!(!stage.is_game_over());
}

#[test]
fn game_over_below_the_deadline() {
    let mut stage = make_stage();
    stage.enemies.push(Enemy::invader(1, 5, 9, MoveDirection::Left));
    assert!(stage.is_game_over());
}
