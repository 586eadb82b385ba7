use std::fs::File;
use std::io::{Stdout, stdout};
use std::sync::Mutex;
use std::time::{Duration, Instant};

use crossterm::{
    cursor,
    event::{self, Event},
    execute, terminal,
};
use rand::SeedableRng;
use rand::rngs::StdRng;
use tracing::info;

use flappy_term::input::{self, Action};
use flappy_term::render::Renderer;
use flappy_term::sound::{Audio, Cue};
use flappy_term::{Config, Result, Session, Signal, Simulation};

/// Path of the log file. Unset means no logging; stdout is the game screen.
const LOG_ENV: &str = "FLAPPY_LOG";

/// The bird flaps its wings on its own clock, whatever the game is doing.
const WING_FRAME: Duration = Duration::from_millis(150);

fn init_logging() -> Result<()> {
    let Some(path) = std::env::var_os(LOG_ENV) else {
        return Ok(());
    };
    let file = File::create(path)?;
    tracing_subscriber::fmt()
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .with_max_level(tracing::Level::DEBUG)
        .init();
    Ok(())
}

/// Plays the cue for `signal`. Returns true when the signal ends the process.
fn react(signal: Signal, audio: Option<&Audio>) -> bool {
    if let (Some(audio), Some(cue)) = (audio, Cue::for_signal(signal)) {
        audio.play(cue);
    }
    signal == Signal::Exit
}

fn run(out: &mut Stdout, config: &Config, audio: Option<&Audio>) -> Result<()> {
    let (cols, rows) = terminal::size()?;
    let mut renderer = Renderer::new(cols, rows, config.physics);
    let sim = Simulation::new(config.physics, StdRng::from_entropy());
    let mut session = Session::new(sim, config.tick_interval());

    let frame_dur = config.frame_interval();
    let started = Instant::now();
    let mut next_frame = started;

    loop {
        // Sleep until input arrives, a tick is due, or the next frame.
        let wake = session
            .next_tick()
            .map_or(next_frame, |tick| tick.min(next_frame));
        let mut timeout = wake.saturating_duration_since(Instant::now());

        // Input
        while event::poll(timeout)? {
            timeout = Duration::ZERO;
            match event::read()? {
                Event::Key(key) => match input::map_key(key, session.phase()) {
                    Some(Action::Quit) => return Ok(()),
                    Some(Action::Command(command)) => {
                        if let Some(signal) = session.handle(command, Instant::now()) {
                            if react(signal, audio) {
                                return Ok(());
                            }
                        }
                    }
                    None => {}
                },
                Event::Resize(c, r) => renderer.resize(c, r),
                _ => {}
            }
        }

        // Update
        for signal in session.advance(Instant::now()) {
            if react(signal, audio) {
                return Ok(());
            }
        }

        // Render
        let now = Instant::now();
        if now >= next_frame {
            let frame = session.frame();
            let wing = (now.duration_since(started).as_millis() / WING_FRAME.as_millis()) as usize;
            renderer.draw(&frame, wing);
            renderer.present(out, &frame)?;
            next_frame += frame_dur;
            if next_frame < now {
                next_frame = now + frame_dur;
            }
        }
    }
}

fn main() -> Result<()> {
    init_logging()?;
    let config = Config::from_env()?;
    info!(?config, "starting");

    let audio = if config.sound { Audio::open() } else { None };

    terminal::enable_raw_mode()?;
    let mut out = stdout();
    execute!(
        out,
        terminal::EnterAlternateScreen,
        cursor::Hide,
        terminal::DisableLineWrap,
    )?;

    let result = run(&mut out, &config, audio.as_ref());

    execute!(
        out,
        terminal::LeaveAlternateScreen,
        cursor::Show,
        terminal::EnableLineWrap,
    )?;
    terminal::disable_raw_mode()?;
    info!("bye");
    result
}
