//! World ownership and the per-tick simulation step.
//!
//! The stage owns the enemy roster, the bullets in flight, the per-round
//! score ledger and the best-score record.  One call to [`Stage::step`]
//! advances the whole world by a tick and reports the enemies destroyed in
//! it; everything is synchronous and deterministic apart from the rng
//! injected into [`Stage::reset`].

use rand::seq::SliceRandom;
use rand::Rng;

use crate::entities::{Bullet, Enemy, EnemyId};

// ── Tuning ────────────────────────────────────────────────────────────────────

/// Damage one bullet deals on a coincident cell.
const BULLET_DAMAGE: i32 = 10;

/// Row at or below which a descending enemy ends the round.
const DEADLINE_ROW: i32 = 10;

/// Kills within this many ticks of the enemy's spawn qualify for the bonus.
const BONUS_TICK_LIMIT: u32 = 150;

/// Minimum base score for a kill to earn the speed bonus at all.
const BONUS_SCORE_FLOOR: u32 = 50;

// ── Stage ─────────────────────────────────────────────────────────────────────

pub struct Stage {
    pub width: i32,
    pub height: i32,
    pub deadline: i32,
    /// Live roster, in spawn order.  Collision scans rely on that order being
    /// stable.
    pub enemies: Vec<Enemy>,
    pub bullets: Vec<Bullet>,
    /// One entry per kill in the current round.
    pub scores: Vec<u32>,
    /// Best round total seen since the stage was created.
    pub max_score: u32,
    next_enemy_id: EnemyId,
}

impl Stage {
    pub fn new(width: i32, height: i32) -> Self {
        Stage {
            width,
            height,
            deadline: DEADLINE_ROW,
            enemies: Vec::new(),
            bullets: Vec::new(),
            scores: Vec::new(),
            max_score: 0,
            next_enemy_id: 0,
        }
    }

    /// Sum of the per-kill ledger for the current round.
    pub fn round_score(&self) -> u32 {
        self.scores.iter().sum()
    }

    /// Fold the finished round into the best-score record and regenerate the
    /// roster for a fresh one.
    ///
    /// Roster policy: candidate cells are every column of a band of top rows
    /// (10 rows on tall screens, a quarter of the screen otherwise); the pool
    /// is shuffled and sampled without replacement up to an enemy count
    /// scaled to the screen height, capped at the pool size.
    pub fn reset(&mut self, rng: &mut impl Rng) {
        self.max_score = self.max_score.max(self.round_score());
        self.scores.clear();
        self.bullets.clear();

        let enemy_count = (self.height * (self.height / 4) / 5).max(0) as usize;
        let band = if self.height > 20 { 10 } else { self.height / 4 };

        let mut pool: Vec<(i32, i32)> = Vec::new();
        for row in 0..band {
            for x in 0..self.width {
                pool.push((x, self.height - 1 - row));
            }
        }
        pool.shuffle(rng);

        self.enemies.clear();
        for &(x, y) in pool.iter().take(enemy_count) {
            let id = self.next_enemy_id;
            self.next_enemy_id += 1;
            self.enemies.push(Enemy::invader_random_direction(id, x, y, rng));
        }
    }

    /// Called by the game model when the player fires.
    pub fn add_bullet(&mut self, x: i32, y: i32) {
        self.bullets.push(Bullet { x, y });
    }

    /// Advance the world by one tick: march every enemy, then move every
    /// bullet up a row and resolve collisions.  Returns the enemies destroyed
    /// this tick together with the score each one was worth.
    pub fn step(&mut self) -> Vec<(Enemy, u32)> {
        for enemy in &mut self.enemies {
            enemy.advance(self.width);
        }

        let mut destroyed = Vec::new();
        let in_flight = std::mem::take(&mut self.bullets);
        for bullet in in_flight {
            let y = bullet.y + 1;
            if y >= self.height {
                continue;
            }
            // First enemy on the cell, in spawn order, absorbs the bullet.
            match self.enemies.iter().position(|e| e.x == bullet.x && e.y == y) {
                Some(index) => {
                    self.enemies[index].hitpoint -= BULLET_DAMAGE;
                    if self.enemies[index].hitpoint <= 0 {
                        let enemy = self.enemies.remove(index);
                        let score = kill_score(&enemy);
                        self.scores.push(score);
                        destroyed.push((enemy, score));
                    }
                }
                None => self.bullets.push(Bullet { x: bullet.x, y }),
            }
        }
        destroyed
    }

    /// The round is over when the roster is cleared or any enemy has reached
    /// the deadline.  Which of the two happened is the caller's business.
    pub fn is_game_over(&self) -> bool {
        self.enemies.is_empty() || self.enemies.iter().any(|e| e.y <= self.deadline)
    }
}

// ── Scoring ───────────────────────────────────────────────────────────────────

/// Base score plus the fast-kill bonus: high-value targets destroyed early in
/// their lifetime pay out extra, scaled by how early.
pub fn kill_score(enemy: &Enemy) -> u32 {
    let bonus = if enemy.base_score >= BONUS_SCORE_FLOOR && enemy.moved_count <= BONUS_TICK_LIMIT {
        (enemy.base_score / BONUS_SCORE_FLOOR) * (BONUS_TICK_LIMIT - enemy.moved_count)
    } else {
        0
    };
    enemy.base_score + bonus
}
