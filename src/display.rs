//! Rendering sink — all terminal drawing lives here.
//!
//! Each function receives a mutable writer and an immutable view of the
//! game state.  No game logic is performed; this module only translates
//! state into terminal commands.  Game space points y upward, so rows are
//! flipped here and nowhere else.

use std::io::Write;

use crossterm::{
    cursor,
    style::{self, Color, Print},
    terminal, QueueableCommand,
};

use crate::entities::GameState;

// ── Colour palette ────────────────────────────────────────────────────────────

const C_PLAYER: Color = Color::White;
const C_ENEMY: Color = Color::Green;
const C_BULLET: Color = Color::Cyan;
const C_HUD: Color = Color::Yellow;
const C_DEADLINE: Color = Color::DarkBlue;
const C_POPUP: Color = Color::Magenta;
const C_HINT: Color = Color::DarkGrey;

// ── Score popups ──────────────────────────────────────────────────────────────

/// Transient "+N" label shown where an enemy died.  Spawned by the host loop
/// from destroyed-enemy events and aged by frame count.
pub struct ScorePopup {
    pub x: i32,
    pub y: i32,
    pub text: String,
    /// Remaining frames to display.
    pub ttl: u32,
}

// ── Public entry point ────────────────────────────────────────────────────────

/// Render one complete frame.
pub fn render<W: Write>(
    out: &mut W,
    state: &GameState<'_>,
    max_score: u32,
    strategy: &str,
    interval_ms: u64,
    popups: &[ScorePopup],
) -> std::io::Result<()> {
    out.queue(terminal::Clear(terminal::ClearType::All))?;

    draw_deadline(out, state)?;

    out.queue(style::SetForegroundColor(C_ENEMY))?;
    for enemy in state.enemies {
        draw_glyph(out, state.height, enemy.x, enemy.y, "M")?;
    }

    out.queue(style::SetForegroundColor(C_BULLET))?;
    for bullet in state.bullets {
        draw_glyph(out, state.height, bullet.x, bullet.y, "|")?;
    }

    out.queue(style::SetForegroundColor(C_PLAYER))?;
    draw_glyph(out, state.height, state.player.x, state.player.y, "A")?;

    out.queue(style::SetForegroundColor(C_POPUP))?;
    for popup in popups {
        draw_glyph(out, state.height, popup.x, popup.y, &popup.text)?;
    }

    draw_hud(out, state, max_score, strategy, interval_ms)?;
    draw_controls_hint(out, state)?;

    // Park cursor in a harmless spot and flush
    out.queue(style::ResetColor)?;
    out.queue(cursor::MoveTo(0, flip(state.height, 0)))?;
    out.flush()?;
    Ok(())
}

// ── Helpers ───────────────────────────────────────────────────────────────────

/// Game y (upward) → terminal row (downward).
fn flip(height: i32, y: i32) -> u16 {
    (height - 1 - y).max(0) as u16
}

fn draw_glyph<W: Write>(out: &mut W, height: i32, x: i32, y: i32, glyph: &str) -> std::io::Result<()> {
    out.queue(cursor::MoveTo(x.max(0) as u16, flip(height, y)))?;
    out.queue(Print(glyph))?;
    Ok(())
}

// ── Deadline rule ─────────────────────────────────────────────────────────────

fn draw_deadline<W: Write>(out: &mut W, state: &GameState<'_>) -> std::io::Result<()> {
    out.queue(style::SetForegroundColor(C_DEADLINE))?;
    out.queue(cursor::MoveTo(0, flip(state.height, state.deadline)))?;
    out.queue(Print("·".repeat(state.width.max(0) as usize)))?;
    Ok(())
}

// ── HUD (top row) ─────────────────────────────────────────────────────────────

fn draw_hud<W: Write>(
    out: &mut W,
    state: &GameState<'_>,
    max_score: u32,
    strategy: &str,
    interval_ms: u64,
) -> std::io::Result<()> {
    let round: u32 = state.scores.iter().sum();
    out.queue(cursor::MoveTo(1, 0))?;
    out.queue(style::SetForegroundColor(C_HUD))?;
    out.queue(Print(format!(
        "Score: {:>6}   Max Score: {:>6}   [{}]   {} ms/tick",
        round, max_score, strategy, interval_ms
    )))?;
    Ok(())
}

// ── Controls hint (last row) ──────────────────────────────────────────────────

fn draw_controls_hint<W: Write>(out: &mut W, state: &GameState<'_>) -> std::io::Result<()> {
    out.queue(cursor::MoveTo(1, flip(state.height, 0)))?;
    out.queue(style::SetForegroundColor(C_HINT))?;
    out.queue(Print("N/P : Strategy   +/- : Speed   Q : Quit"))?;
    Ok(())
}
