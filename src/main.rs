//! Terminal runner (default binary).
//!
//! Uses crossterm for input and the framebuffer renderer from `rectris::term`.
//! Logs go to `rectris.log` because stdout is the game screen.

use std::fs::File;
use std::time::{Duration, Instant, SystemTime, UNIX_EPOCH};

use anyhow::{Context, Result};
use crossterm::event::{self, Event, KeyEventKind};
use log::{error, info, warn};

use rectris::config::Config;
use rectris::core::{GameSnapshot, GameState};
use rectris::input::{handle_key_event, should_quit};
use rectris::records::RecordStore;
use rectris::term::{FrameBuffer, GameView, TerminalRenderer, Viewport};
use rectris::types::GameAction;

const LOG_FILE: &str = "rectris.log";

fn main() -> Result<()> {
    init_logging()?;
    info!("starting rectris");

    let config = match Config::load() {
        Ok(config) => config,
        Err(err) => {
            error!("failed to load configuration: {err}; using defaults");
            Config::default()
        }
    };
    let mut records = RecordStore::open(config.records_path());

    let mut term = TerminalRenderer::new();
    let result = term.enter().and_then(|()| run(&mut term, &config, &mut records));

    // Always try to restore terminal state.
    if let Err(err) = term.exit() {
        warn!("failed to restore terminal: {err:#}");
    }
    if let Err(err) = records.save() {
        error!("failed to save records: {err:#}");
    }
    if let Err(err) = &result {
        error!("game loop failed: {err:#}");
    }
    info!("exiting rectris");
    result
}

fn init_logging() -> Result<()> {
    let log_file = File::create(LOG_FILE).with_context(|| format!("failed to create {LOG_FILE}"))?;
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .target(env_logger::Target::Pipe(Box::new(log_file)))
        .format_module_path(false)
        .init();
    Ok(())
}

fn run(term: &mut TerminalRenderer, config: &Config, records: &mut RecordStore) -> Result<()> {
    let seed = config.seed.unwrap_or_else(time_seed);
    info!(
        "new {}x{} game, seed {}, color mode {}",
        config.width,
        config.height,
        seed,
        config.color_mode.as_str()
    );

    let mut game = GameState::new(config.width, config.height, seed)
        .with_timing(config.tick_ms, config.speedup);
    game.set_color_mode(config.color_mode);

    let view = GameView::default();
    let mut fb = FrameBuffer::new(0, 0);
    let mut snap = GameSnapshot::default();
    let mut last_tick = Instant::now();

    loop {
        game.snapshot_into(&mut snap);
        let standings = records.standings(snap.scores);
        let (w, h) = crossterm::terminal::size().unwrap_or((80, 24));
        view.render_into(&snap, &standings, Viewport::new(w, h), &mut fb);
        term.draw(&fb)?;

        // Input with timeout until next tick; the interval shrinks as the level rises.
        let tick = Duration::from_millis(game.tick_interval_ms());
        let timeout = tick.saturating_sub(last_tick.elapsed());

        if event::poll(timeout)? {
            match event::read()? {
                Event::Key(key) if key.kind != KeyEventKind::Release => {
                    if should_quit(key) {
                        break;
                    }
                    if let Some(action) = handle_key_event(key) {
                        if action == GameAction::Restart {
                            records.commit(game.scores());
                            if let Err(err) = records.save() {
                                error!("failed to save records: {err:#}");
                            }
                        }
                        game.apply_action(action);
                    }
                }
                Event::Resize(..) => term.invalidate(),
                _ => {}
            }
        }

        if last_tick.elapsed() >= tick {
            last_tick = Instant::now();
            if !game.end_of_the_game() {
                game.update();
            }
        }
    }

    records.commit(game.scores());
    Ok(())
}

fn time_seed() -> u32 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.subsec_nanos() ^ d.as_secs() as u32)
        .unwrap_or(1)
}
