//! Player strategies: decision functions mapping world state to one action.
//!
//! Every strategy implements [`PlayerStrategy`] and may keep private target
//! memory across ticks.  The registry at the bottom owns the built-ins in a
//! fixed order and routes all switching through `reset` so no stale target
//! references survive a change of control.

use std::collections::BTreeMap;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use thiserror::Error;

use crate::entities::{Action, Enemy, EnemyId, GameState, MoveDirection};

// ── Contract ──────────────────────────────────────────────────────────────────

/// One decision per tick, taken before the world mutates.
pub trait PlayerStrategy {
    fn name(&self) -> &'static str;

    /// Map the current world view to a player action.  Called exactly once
    /// per tick while this strategy is in control.
    fn decide(&mut self, state: &GameState<'_>) -> Action;

    /// Clear internal target memory.  Invoked on round restarts and on both
    /// sides of a strategy switch.
    fn reset(&mut self);
}

// ── Predict ───────────────────────────────────────────────────────────────────

/// Leads its shots by replaying the enemy marching policy in lockstep with a
/// rising bullet, aiming at the intersection cell rather than the current
/// one.  Remembers which enemies already have a bullet on the way so it never
/// double-spends shots.
pub struct PredictStrategy {
    target: Option<EnemyId>,
    /// (ticks until the predicted impact, enemy) for every shot in flight.
    fired: Vec<(u32, EnemyId)>,
}

impl PredictStrategy {
    pub fn new() -> Self {
        PredictStrategy {
            target: None,
            fired: Vec::new(),
        }
    }

    /// The held target if it is still alive, otherwise the unfired-upon enemy
    /// needing the least sideways travel to intercept, ties broken by sooner
    /// impact, then by proximity to the deadline.
    fn pick_target<'a>(&mut self, state: &GameState<'a>) -> Option<&'a Enemy> {
        if let Some(id) = self.target {
            if let Some(enemy) = state.enemies.iter().find(|e| e.id == id) {
                return Some(enemy);
            }
        }
        let candidate = state
            .enemies
            .iter()
            .filter(|e| !self.fired.iter().any(|&(_, id)| id == e.id))
            .min_by_key(|e| {
                let (x, ticks) = predict_intersection(e, state.player.y, state.width, state.height);
                ((x - state.player.x).abs(), ticks, e.y)
            })?;
        self.target = Some(candidate.id);
        Some(candidate)
    }
}

impl PlayerStrategy for PredictStrategy {
    fn name(&self) -> &'static str {
        "predict"
    }

    fn decide(&mut self, state: &GameState<'_>) -> Action {
        // Age out in-flight shots; an expired record means the bullet has
        // either landed or left the screen by now.
        self.fired.retain_mut(|record| {
            record.0 = record.0.saturating_sub(1);
            record.0 > 0
        });

        let enemy = match self.pick_target(state) {
            Some(enemy) => enemy,
            None => return Action::None,
        };
        let (target_x, ticks) = predict_intersection(enemy, state.player.y, state.width, state.height);

        let px = state.player.x;
        if (px == 0 || px == state.width - 1) && target_x == px {
            return Action::Shoot;
        }
        if target_x < px {
            Action::Left
        } else if target_x > px {
            Action::Right
        } else {
            self.fired.push((ticks, enemy.id));
            self.target = None;
            Action::Shoot
        }
    }

    fn reset(&mut self) {
        self.target = None;
        self.fired.clear();
    }
}

/// Forward-simulate `enemy` against a bullet rising from `player_y`, one tick
/// per iteration and in the stage's update order (enemy marches, then the
/// bullet climbs).  Returns the enemy's x at the tick the bullet reaches its
/// row, and that tick count.  If no intersection is found within
/// `height + 2` ticks, falls back to the enemy's current x and the bound.
pub fn predict_intersection(enemy: &Enemy, player_y: i32, width: i32, height: i32) -> (i32, u32) {
    let mut ghost = enemy.clone();
    let mut bullet_y = player_y;
    let bound = (height + 2).max(0) as u32;

    for tick in 1..=bound {
        ghost.advance(width);
        bullet_y += 1;
        if bullet_y == ghost.y {
            return (ghost.x, tick);
        }
    }
    (enemy.x, bound)
}

// ── Reactive ──────────────────────────────────────────────────────────────────

/// Extrapolates the nearest front-line enemy's column at bullet arrival and
/// walks under it.  `jitter` widens the aim by a bounded random offset each
/// tick; zero keeps it exact.
pub struct ReactiveStrategy {
    name: &'static str,
    jitter: i32,
    rng: StdRng,
}

impl ReactiveStrategy {
    pub fn new() -> Self {
        Self::with_jitter("reactive", 0)
    }

    pub fn with_jitter(name: &'static str, jitter: i32) -> Self {
        ReactiveStrategy {
            name,
            jitter,
            rng: StdRng::from_entropy(),
        }
    }
}

impl PlayerStrategy for ReactiveStrategy {
    fn name(&self) -> &'static str {
        self.name
    }

    fn decide(&mut self, state: &GameState<'_>) -> Action {
        // Front-most enemy per column, then the one vertically nearest the
        // player.
        let mut front: BTreeMap<i32, &Enemy> = BTreeMap::new();
        for enemy in state.enemies {
            front
                .entry(enemy.x)
                .and_modify(|held| {
                    if enemy.y < held.y {
                        *held = enemy;
                    }
                })
                .or_insert(enemy);
        }
        let target = match front.values().min_by_key(|e| (e.y - state.player.y).abs()) {
            Some(enemy) => *enemy,
            None => return Action::None,
        };

        // Straight-line extrapolation: one relocation per full phase period
        // elapsed before the bullet arrives, no change while dropping.
        let ticks = (target.y - state.player.y).abs();
        let lead = (ticks / target.move_count as i32) * target.move_distance;
        let mut predicted = match target.move_direction {
            MoveDirection::Left => target.x - lead,
            MoveDirection::Right => target.x + lead,
            MoveDirection::Down => target.x,
        };
        if self.jitter > 0 {
            predicted += self.rng.gen_range(-self.jitter..=self.jitter);
        }

        let px = state.player.x;
        if (predicted < 0 || predicted >= state.width) && (px == 0 || px == state.width - 1) {
            return Action::Shoot;
        }
        if predicted < px {
            Action::Left
        } else if predicted > px {
            Action::Right
        } else {
            Action::Shoot
        }
    }

    fn reset(&mut self) {}
}

// ── Scatter ───────────────────────────────────────────────────────────────────

/// Fire-and-sweep baseline: ignores the enemies entirely, shoots every other
/// tick and walks the remaining ticks, turning around whenever it finds
/// itself on an edge column.
pub struct ScatterStrategy {
    ticks: u32,
    turns: u32,
}

impl ScatterStrategy {
    pub fn new() -> Self {
        ScatterStrategy { ticks: 0, turns: 0 }
    }
}

impl PlayerStrategy for ScatterStrategy {
    fn name(&self) -> &'static str {
        "scatter"
    }

    fn decide(&mut self, state: &GameState<'_>) -> Action {
        self.ticks += 1;
        if self.ticks % 2 == 1 {
            return Action::Shoot;
        }
        if state.player.x == 0 || state.player.x == state.width - 1 {
            self.turns += 1;
        }
        if self.turns % 2 == 0 {
            Action::Left
        } else {
            Action::Right
        }
    }

    fn reset(&mut self) {
        self.ticks = 0;
        self.turns = 0;
    }
}

// ── Registry ──────────────────────────────────────────────────────────────────

#[derive(Debug, Error)]
#[error("unknown strategy `{name}`")]
pub struct UnknownStrategy {
    pub name: String,
}

/// Ordered collection of the built-in strategies.  All switching goes through
/// here so that both the strategy losing control and the one gaining it get
/// reset.
pub struct StrategyRegistry {
    strategies: Vec<Box<dyn PlayerStrategy>>,
    active: usize,
}

impl StrategyRegistry {
    pub fn builtin() -> Self {
        StrategyRegistry {
            strategies: vec![
                Box::new(PredictStrategy::new()),
                Box::new(ReactiveStrategy::new()),
                Box::new(ReactiveStrategy::with_jitter("shaky", 2)),
                Box::new(ScatterStrategy::new()),
            ],
            active: 0,
        }
    }

    pub fn names(&self) -> Vec<&'static str> {
        self.strategies.iter().map(|s| s.name()).collect()
    }

    pub fn active(&self) -> &dyn PlayerStrategy {
        self.strategies[self.active].as_ref()
    }

    pub fn active_mut(&mut self) -> &mut dyn PlayerStrategy {
        self.strategies[self.active].as_mut()
    }

    /// Select the initial strategy by name (the CLI path).
    pub fn select(&mut self, name: &str) -> Result<(), UnknownStrategy> {
        match self.strategies.iter().position(|s| s.name() == name) {
            Some(index) => {
                self.switch_to(index);
                Ok(())
            }
            None => Err(UnknownStrategy {
                name: name.to_string(),
            }),
        }
    }

    pub fn next(&mut self) {
        self.switch_to((self.active + 1) % self.strategies.len());
    }

    pub fn previous(&mut self) {
        self.switch_to((self.active + self.strategies.len() - 1) % self.strategies.len());
    }

    fn switch_to(&mut self, index: usize) {
        self.strategies[self.active].reset();
        self.active = index;
        self.strategies[self.active].reset();
    }
}
