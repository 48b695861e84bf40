mod display;

use std::fs::File;
use std::io::{stdout, BufWriter, Write};
use std::sync::mpsc;
use std::thread;
use std::time::{Duration, Instant};

use crossterm::{
    cursor,
    event::{
        self, DisableMouseCapture, EnableMouseCapture, Event, KeyboardEnhancementFlags,
        PopKeyboardEnhancementFlags, PushKeyboardEnhancementFlags,
    },
    terminal, ExecutableCommand,
};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use dodge_shooter::audio::{AudioCues, TerminalBell};
use dodge_shooter::compute::{init_state, tick, GameState};
use dodge_shooter::config::GameConfig;
use dodge_shooter::effects::Effects;
use dodge_shooter::entities::GameStatus;
use dodge_shooter::error::GameError;
use dodge_shooter::events::{dispatch, EventSink, LogSink};
use dodge_shooter::sprites::SpriteSet;
use dodge_shooter::starfield::Starfield;
use dodge_shooter::terminal_input::TerminalInput;
use dodge_shooter::viewport::Viewport;

use display::Scene;

// ── Logging ───────────────────────────────────────────────────────────────────

/// The terminal belongs to the game while it runs, so the log goes to a file.
fn init_logging(cfg: &GameConfig) -> Result<(), GameError> {
    let file = File::create(&cfg.log_file)?;
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .target(env_logger::Target::Pipe(Box::new(file)))
        .init();
    Ok(())
}

fn audio_cues(cfg: &GameConfig) -> AudioCues {
    if !cfg.audio {
        log::info!("audio disabled by config");
        return AudioCues::silent();
    }
    match TerminalBell::stderr() {
        Ok(bell) => AudioCues::new(Box::new(bell)),
        Err(e) => {
            log::warn!("{}; continuing without sound", e);
            AudioCues::silent()
        }
    }
}

// ── Game loop ─────────────────────────────────────────────────────────────────

/// Everything the loop owns besides the simulation.
struct Host {
    viewport: Viewport,
    input: TerminalInput,
    sprites: SpriteSet,
    stars: Starfield,
    effects: Effects,
    audio: AudioCues,
    log: LogSink,
}

/// Runs until the player quits.
///
/// One iteration is one fixed tick: drain pending terminal events into the
/// simulation, step it, hand its events to the presentation sinks, draw.
fn game_loop<W: Write>(
    out: &mut W,
    state: &mut GameState,
    host: &mut Host,
    rng: &mut StdRng,
    rx: &mpsc::Receiver<Event>,
    frame_time: Duration,
) -> std::io::Result<()> {
    let started = Instant::now();
    let mut frame: u64 = 0;

    loop {
        let frame_start = Instant::now();
        frame += 1;

        // ── Drain all pending input events (non-blocking) ─────────────────────
        while let Ok(ev) = rx.try_recv() {
            if let Event::Resize(cols, rows) = ev {
                host.viewport = Viewport::new(state.field_width, state.field_height, cols, rows);
                log::debug!("terminal resized to {}x{}", cols, rows);
                continue;
            }
            let at_ms = started.elapsed().as_millis() as u64;
            let translated = host.input.translate(&ev, frame, at_ms, &host.viewport);
            if translated.quit {
                log::info!("quit at score {}", state.score);
                return Ok(());
            }
            for input in &translated.events {
                state.feed(input);
            }
        }
        for input in host.input.expire(frame) {
            state.feed(&input);
        }

        tick(state, rng);
        host.effects.advance(state.clock());

        let mut sinks: [&mut dyn EventSink; 4] = [
            &mut host.log,
            &mut host.effects,
            &mut host.audio,
            &mut host.stars,
        ];
        dispatch(state.events(), &mut sinks);
        if state.status == GameStatus::Playing {
            host.stars.advance();
        }

        let scene = Scene {
            viewport: &host.viewport,
            sprites: &host.sprites,
            stars: &host.stars,
            effects: &host.effects,
        };
        display::render(out, state, &scene)?;

        let elapsed = frame_start.elapsed();
        if elapsed < frame_time {
            std::thread::sleep(frame_time - elapsed);
        }
    }
}

// ── Entry point ───────────────────────────────────────────────────────────────

fn main() -> Result<(), GameError> {
    let args: Vec<String> = std::env::args().collect();
    let cfg = GameConfig::from_args_or_env(&args)?;
    init_logging(&cfg)?;
    log::info!("starting with {:?}", cfg);

    let mut rng = match cfg.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };

    let (cols, rows) = terminal::size()?;
    let mut host = Host {
        viewport: Viewport::new(cfg.field_width, cfg.field_height, cols, rows),
        input: TerminalInput::new(false),
        sprites: SpriteSet::load(cfg.sprite_dir.as_deref(), &mut rng),
        stars: Starfield::new(cfg.field_height),
        effects: Effects::new(rng.gen()),
        audio: audio_cues(&cfg),
        log: LogSink,
    };
    let mut state = init_state(&cfg);

    let raw_out = stdout();
    let mut out = BufWriter::new(raw_out);

    terminal::enable_raw_mode()?;
    out.execute(terminal::EnterAlternateScreen)?;
    out.execute(cursor::Hide)?;
    out.execute(EnableMouseCapture)?;

    // Request key-release (and key-repeat) events from the terminal.
    // Ghostty / kitty-protocol terminals support this; others fall back to
    // hold-window expiry.
    let keyboard_enhanced = terminal::supports_keyboard_enhancement().unwrap_or(false)
        && out
            .execute(PushKeyboardEnhancementFlags(
                KeyboardEnhancementFlags::REPORT_EVENT_TYPES,
            ))
            .is_ok();
    host.input = TerminalInput::new(keyboard_enhanced);
    log::info!(
        "terminal {}x{}, key release events: {}",
        cols,
        rows,
        keyboard_enhanced
    );

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

    let frame_time = Duration::from_secs(1) / cfg.tick_hz;
    let result = game_loop(&mut out, &mut state, &mut host, &mut rng, &rx, frame_time);

    // Always restore the terminal
    if keyboard_enhanced {
        let _ = out.execute(PopKeyboardEnhancementFlags);
    }
    let _ = out.execute(DisableMouseCapture);
    let _ = out.execute(cursor::Show);
    let _ = out.execute(terminal::LeaveAlternateScreen);
    let _ = terminal::disable_raw_mode();

    if host.effects.dropped() > 0 || host.audio.failures() > 0 {
        log::info!(
            "effects dropped: {}, audio failures: {}",
            host.effects.dropped(),
            host.audio.failures()
        );
    }
    result.map_err(GameError::from)
}
