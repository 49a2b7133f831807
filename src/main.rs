//! Terminal blockfall runner (default binary).
//!
//! Reads keys with crossterm, queues the resulting actions and feeds the
//! engine one of them per fixed tick. Rendering goes through the framebuffer
//! renderer in `blockfall-term`; logs go to a file.

use std::collections::VecDeque;
use std::fs::File;
use std::path::Path;
use std::sync::Mutex;
use std::time::{Duration, Instant, SystemTime, UNIX_EPOCH};

use anyhow::{Context, Result};
use clap::Parser;
use crossterm::event::{self, Event, KeyEventKind};
use tracing::info;
use tracing_subscriber::EnvFilter;

use blockfall::cli::Cli;
use blockfall::core::{GameConfig, GameState, Settings, SimpleRng};
use blockfall::input::{handle_key_event, should_quit};
use blockfall::term::{FrameBuffer, GameView, Hud, TempoGauge, TerminalRenderer, TileCanvas, Viewport};
use blockfall::types::{GameAction, TICK_MS};

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(&cli.log)?;
    let (config, settings) = cli.resolve()?;
    let seed = cli.seed.unwrap_or_else(clock_seed);
    info!(seed, "starting blockfall");

    let mut term = TerminalRenderer::new();
    term.enter()?;

    let result = run(&mut term, config, settings, seed);

    // Always try to restore terminal state.
    let _ = term.exit();
    result
}

fn init_logging(path: &Path) -> Result<()> {
    let file = File::create(path)
        .with_context(|| format!("failed to create log file {}", path.display()))?;
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .init();
    Ok(())
}

fn clock_seed() -> u32 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.subsec_nanos() ^ d.as_secs() as u32)
        .unwrap_or(1)
}

fn run(term: &mut TerminalRenderer, config: GameConfig, settings: Settings, seed: u32) -> Result<()> {
    let mut game = GameState::new(
        config,
        settings,
        SimpleRng::new(seed),
        TileCanvas::new(config.bounds()),
        TempoGauge::new(),
    )?;
    game.start();

    let view = GameView::default();
    let mut fb = FrameBuffer::new(0, 0);
    let mut pending: VecDeque<GameAction> = VecDeque::new();
    let tick = Duration::from_millis(TICK_MS as u64);
    let mut last_tick = Instant::now();

    loop {
        // Render.
        let (w, h) = crossterm::terminal::size().unwrap_or((80, 24));
        let hud = Hud {
            level: game.level(),
            score: game.score(),
            tempo: game.audio().tempo(),
            clear_events: game.line_clear_events(),
            games_over: game.games_over(),
        };
        view.render_into(game.surface(), &hud, Viewport::new(w, h), &mut fb);
        term.draw(&fb)?;

        // Input with timeout until next tick.
        if event::poll(tick.saturating_sub(last_tick.elapsed()))? {
            match event::read()? {
                Event::Key(key) if key.kind != KeyEventKind::Release => {
                    if should_quit(key) {
                        info!(score = game.score(), "quit");
                        return Ok(());
                    }
                    if let Some(action) = handle_key_event(key) {
                        pending.push_back(action);
                    }
                }
                Event::Resize(..) => term.invalidate(),
                _ => {}
            }
        }

        // Tick.
        let elapsed = last_tick.elapsed();
        if elapsed >= tick {
            last_tick = Instant::now();
            let out = game.tick(elapsed, pending.pop_front());
            if out.lock.is_some_and(|lock| lock.game_over) {
                pending.clear();
            }
        }
    }
}
