//! Game entity types and the read-only view handed to strategies.

use rand::Rng;

// ── Actions & directions ──────────────────────────────────────────────────────

/// What a strategy asks the player unit to do on one tick.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Action {
    Left,
    Right,
    Shoot,
    None,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MoveDirection {
    Left,
    Right,
    Down,
}

// ── Enemy ─────────────────────────────────────────────────────────────────────

/// Stable handle used for target tracking.  Assigned by the stage from a
/// monotonic counter and never reused within a round, so a stale id held by a
/// strategy cannot alias a different live enemy.
pub type EnemyId = u32;

#[derive(Clone, Debug)]
pub struct Enemy {
    pub id: EnemyId,
    pub x: i32,
    pub y: i32,
    pub hitpoint: i32,
    pub move_direction: MoveDirection,
    /// Cells covered per triggered relocation.
    pub move_distance: i32,
    /// Ticks between triggered relocations.
    pub move_count: u32,
    /// Total ticks since creation; advances every tick, relocation or not.
    pub moved_count: u32,
    pub base_score: u32,
}

impl Enemy {
    /// Standard invader: 10 HP, marches one cell every third tick, 100 points.
    pub fn invader(id: EnemyId, x: i32, y: i32, direction: MoveDirection) -> Self {
        Enemy {
            id,
            x,
            y,
            hitpoint: 10,
            move_direction: direction,
            move_distance: 1,
            move_count: 3,
            moved_count: 0,
            base_score: 100,
        }
    }

    /// Spawn an invader marching toward a random side.
    pub fn invader_random_direction(id: EnemyId, x: i32, y: i32, rng: &mut impl Rng) -> Self {
        let direction = if rng.gen_bool(0.5) {
            MoveDirection::Left
        } else {
            MoveDirection::Right
        };
        Self::invader(id, x, y, direction)
    }

    /// One tick of the marching policy.  The phase counter always advances;
    /// the enemy only relocates on every `move_count`-th tick.  Horizontal
    /// marches turn into a drop at the screen edges, and every drop re-picks
    /// the horizontal side by which half of the screen the enemy is in.
    pub fn advance(&mut self, width: i32) {
        self.moved_count += 1;
        if self.moved_count % self.move_count != 0 {
            return;
        }
        match self.move_direction {
            MoveDirection::Left => {
                if self.x > 0 {
                    self.x -= self.move_distance;
                } else {
                    self.move_direction = MoveDirection::Down;
                }
            }
            MoveDirection::Right => {
                if self.x < width - 1 {
                    self.x += self.move_distance;
                } else {
                    self.move_direction = MoveDirection::Down;
                }
            }
            MoveDirection::Down => {
                self.y -= self.move_distance;
                self.move_direction = if self.x > width / 2 {
                    MoveDirection::Left
                } else {
                    MoveDirection::Right
                };
            }
        }
    }
}

// ── Bullet & player ───────────────────────────────────────────────────────────

/// A bare position.  Bullets have no identity and are interchangeable.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Bullet {
    pub x: i32,
    pub y: i32,
}

/// The player unit.  Owned by the game model, not the stage — stages are
/// swappable, the player is not.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Player {
    pub x: i32,
    pub y: i32,
}

// ── Strategy-facing view ──────────────────────────────────────────────────────

/// Read-only snapshot of one tick's world, assembled by the game model for
/// strategies and the renderer.  Coordinates point y upward; the only write
/// path back into the game is the returned [`Action`].
#[derive(Clone, Copy, Debug)]
pub struct GameState<'a> {
    pub width: i32,
    pub height: i32,
    /// Row at or below which a descending enemy ends the round.
    pub deadline: i32,
    pub player: &'a Player,
    pub enemies: &'a [Enemy],
    pub bullets: &'a [Bullet],
    /// Per-kill scores recorded so far this round.
    pub scores: &'a [u32],
}
