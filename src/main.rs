use std::io::{stdout, BufWriter, Write};
use std::sync::mpsc;
use std::thread;
use std::time::{Duration, Instant};

use anyhow::Context;
use clap::Parser;
use crossterm::{
    cursor,
    event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers},
    terminal, ExecutableCommand,
};
use rand::thread_rng;

use auto_invaders::display::{self, ScorePopup};
use auto_invaders::game::GameModel;
use auto_invaders::strategy::StrategyRegistry;

/// Frames a score popup stays on screen.
const POPUP_TTL: u32 = 20;

const MIN_INTERVAL: Duration = Duration::from_millis(10);
const MAX_INTERVAL: Duration = Duration::from_millis(1000);
const INTERVAL_STEP: Duration = Duration::from_millis(10);

// ── CLI ───────────────────────────────────────────────────────────────────────

/// Invader game whose player unit is controlled by scripted strategies.
#[derive(Parser)]
#[command(version, about)]
struct Args {
    /// Initial player strategy.
    #[arg(short, long)]
    strategy: Option<String>,

    /// Starting tick interval in milliseconds.
    #[arg(short, long, default_value_t = 100)]
    interval: u64,
}

// ── Entry point ───────────────────────────────────────────────────────────────

fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let mut registry = StrategyRegistry::builtin();
    if let Some(name) = args.strategy.as_deref() {
        if let Err(err) = registry.select(name) {
            eprintln!("{err}");
            eprintln!("Available strategies:");
            for name in registry.names() {
                eprintln!("- {name}");
            }
            std::process::exit(1);
        }
    }

    let raw_out = stdout();
    let mut out = BufWriter::new(raw_out);

    terminal::enable_raw_mode().context("enabling raw mode")?;
    out.execute(terminal::EnterAlternateScreen)?;
    out.execute(cursor::Hide)?;

    // Dedicate a thread exclusively to blocking event reads, sending them
    // through a channel so the game loop never has to block on I/O.
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

    let result = run(&mut out, &rx, &mut registry, args.interval);

    // Always restore the terminal
    let _ = out.execute(cursor::Show);
    let _ = out.execute(terminal::LeaveAlternateScreen);
    let _ = terminal::disable_raw_mode();

    result
}

// ── Game loop ─────────────────────────────────────────────────────────────────

/// Cooperative loop: drain input, run one simulation tick, draw, sleep the
/// remainder of the tick interval.  Rounds cycle endlessly; the best round
/// total is folded into the stage record on every reset.
fn run<W: Write>(
    out: &mut W,
    rx: &mpsc::Receiver<Event>,
    registry: &mut StrategyRegistry,
    interval_ms: u64,
) -> anyhow::Result<()> {
    let mut rng = thread_rng();
    let (width, height) = terminal::size().context("querying terminal size")?;
    let mut model = GameModel::new(width as i32, height as i32, &mut rng);
    let mut interval = Duration::from_millis(interval_ms).clamp(MIN_INTERVAL, MAX_INTERVAL);
    let mut popups: Vec<ScorePopup> = Vec::new();

    loop {
        let frame_start = Instant::now();

        // ── Drain all pending input events (non-blocking) ─────────────────────
        while let Ok(event) = rx.try_recv() {
            if let Event::Key(KeyEvent {
                code,
                kind: KeyEventKind::Press,
                modifiers,
                ..
            }) = event
            {
                match code {
                    KeyCode::Char('q') | KeyCode::Char('Q') | KeyCode::Esc => return Ok(()),
                    KeyCode::Char('c') if modifiers.contains(KeyModifiers::CONTROL) => {
                        return Ok(());
                    }
                    KeyCode::Char('+') | KeyCode::Char('=') => {
                        interval = interval.saturating_sub(INTERVAL_STEP).max(MIN_INTERVAL);
                    }
                    KeyCode::Char('-') => {
                        interval = (interval + INTERVAL_STEP).min(MAX_INTERVAL);
                    }
                    KeyCode::Char('n') | KeyCode::Right => registry.next(),
                    KeyCode::Char('p') | KeyCode::Left => registry.previous(),
                    _ => {}
                }
            }
        }

        // ── One simulation tick ───────────────────────────────────────────────
        popups.retain_mut(|popup| {
            popup.ttl -= 1;
            popup.ttl > 0
        });
        for (enemy, score) in model.step(registry.active_mut()) {
            popups.push(ScorePopup {
                x: enemy.x,
                y: enemy.y,
                text: format!("+{score}"),
                ttl: POPUP_TTL,
            });
        }

        if model.is_game_over() {
            // Reset folds the round total into the best-score record.
            model.initialize(&mut rng);
            registry.active_mut().reset();
            popups.clear();
        }

        display::render(
            out,
            &model.state(),
            model.stage.max_score,
            registry.active().name(),
            interval.as_millis() as u64,
            &popups,
        )?;

        let elapsed = frame_start.elapsed();
        if elapsed < interval {
            thread::sleep(interval - elapsed);
        }
    }
}
