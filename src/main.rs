//! Terminal runner (default binary).
//!
//! One frame per period: poll crossterm events until the frame deadline,
//! dispatch them, then draw the current state and advance it.

use std::time::{Duration, Instant};

use anyhow::Result;
use crossterm::event::{self, Event};
use log::info;

use canvas_tetris::config::{init_logging, Config};
use canvas_tetris::core::{FrameClock, GameState};
use canvas_tetris::input::{handle_key_event, should_quit, InputHandler};
use canvas_tetris::term::{CanvasSurface, GameView, TerminalRenderer, Viewport};
use canvas_tetris::types::CoreEvent;

fn main() -> Result<()> {
    let config = Config::from_env();
    init_logging(&config)?;
    info!("starting with seed {}", config.seed);

    let mut term = TerminalRenderer::new();
    term.enter()?;

    let result = run(&mut term, &config);

    // Always try to restore terminal state.
    let _ = term.exit();
    result
}

fn run(term: &mut TerminalRenderer, config: &Config) -> Result<()> {
    let mut game = GameState::new(config.seed);
    let view = GameView::new();
    let mut input = InputHandler::new()
        .with_key_release_timeout_ms(config.key_release_timeout_ms)
        .with_down_release_timeout_ms(config.down_release_timeout_ms)
        .with_release_events(term.reports_key_release());

    let (w, h) = crossterm::terminal::size().unwrap_or((80, 24));
    let mut surface = CanvasSurface::with_viewport(Viewport::new(w, h));

    let started = Instant::now();
    let now_ms = || started.elapsed().as_millis() as u64;
    let frame = Duration::from_millis(config.frame_ms);
    let mut clock = FrameClock::new();

    loop {
        let deadline = Instant::now() + frame;

        // Input until the frame deadline.
        loop {
            let timeout = deadline.saturating_duration_since(Instant::now());
            if !event::poll(timeout)? {
                break;
            }
            match event::read()? {
                Event::Key(key) => {
                    if should_quit(key) {
                        return Ok(());
                    }
                    if let Some(key_input) = handle_key_event(key) {
                        if let Some(key_input) = input.handle(key_input, now_ms()) {
                            game.handle_key(key_input);
                        }
                    }
                }
                Event::Resize(w, h) => {
                    if surface.adjust_size(Viewport::new(w, h)) {
                        term.invalidate();
                    }
                }
                _ => {}
            }
        }

        for release in input.update(now_ms()) {
            game.handle_key(release);
        }

        // Draw first, then update.
        view.render(&game.snapshot(), &mut surface);
        term.draw(&mut surface)?;

        game.tick(clock.delta(started.elapsed().as_secs_f64() * 1000.0));

        if let Some(CoreEvent::GameOver {
            episode_id,
            collapsed_rows,
        }) = game.take_last_event()
        {
            info!("episode {episode_id} over after {collapsed_rows} collapsed row(s)");
        }
    }
}
