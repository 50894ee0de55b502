//! One-tick orchestration: strategy decision, player mutation, world step.

use rand::Rng;

use crate::entities::{Action, Enemy, GameState, Player};
use crate::stage::Stage;
use crate::strategy::PlayerStrategy;

/// Row the player unit sits on, just below the deadline.
const PLAYER_ROW: i32 = 6;

pub struct GameModel {
    pub stage: Stage,
    pub player: Player,
}

impl GameModel {
    pub fn new(width: i32, height: i32, rng: &mut impl Rng) -> Self {
        let mut model = GameModel {
            stage: Stage::new(width, height),
            player: Player {
                x: width / 2,
                y: PLAYER_ROW,
            },
        };
        model.initialize(rng);
        model
    }

    /// Start a fresh round: regenerate the roster (folding the finished
    /// round's total into the best-score record) and re-center the player.
    pub fn initialize(&mut self, rng: &mut impl Rng) {
        self.stage.reset(rng);
        self.player = Player {
            x: self.stage.width / 2,
            y: PLAYER_ROW,
        };
    }

    /// Swap in a different stage and start over on it.
    pub fn change_stage(&mut self, stage: Stage, rng: &mut impl Rng) {
        self.stage = stage;
        self.initialize(rng);
    }

    pub fn is_game_over(&self) -> bool {
        self.stage.is_game_over()
    }

    /// Read-only view for strategies and the renderer.
    pub fn state(&self) -> GameState<'_> {
        GameState {
            width: self.stage.width,
            height: self.stage.height,
            deadline: self.stage.deadline,
            player: &self.player,
            enemies: &self.stage.enemies,
            bullets: &self.stage.bullets,
            scores: &self.stage.scores,
        }
    }

    /// Run one tick under `strategy` and report the enemies it destroyed.
    /// Movement is clamped to the screen; a shot spawns a bullet at the
    /// player's cell, which the stage then advances within the same tick.
    pub fn step(&mut self, strategy: &mut dyn PlayerStrategy) -> Vec<(Enemy, u32)> {
        let action = strategy.decide(&self.state());
        match action {
            Action::Left => self.player.x = (self.player.x - 1).max(0),
            Action::Right => self.player.x = (self.player.x + 1).min(self.stage.width - 1),
            Action::Shoot => self.stage.add_bullet(self.player.x, self.player.y),
            Action::None => {}
        }
        self.stage.step()
    }
}
