//! Session state machine: start menu, running, paused, game over.
//!
//! The session owns the simulation and the tick source. Inputs arrive as
//! abstract [`Command`]s; anything not valid in the current phase is dropped
//! without touching the game.

use std::time::{Duration, Instant};

use rand::Rng;
use tracing::{info, trace};

use crate::sim::{Outcome, Simulation, Snapshot};
use crate::ticker::Ticker;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    StartMenu,
    Running,
    Paused,
    GameOver { score: u32, high_score: u32 },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Start,
    Flap,
    Pause,
    Resume,
    Restart,
    Exit,
    /// "Play again?" answered yes.
    Yes,
    /// "Play again?" answered no.
    No,
}

/// Something the outer shell may want to react to (sound, process exit).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Signal {
    Flapped,
    Scored(u32),
    Crashed { score: u32, high_score: u32 },
    Exit,
}

/// Everything the renderer needs for one frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Frame {
    pub phase: Phase,
    pub sim: Snapshot,
}

pub struct Session<R> {
    sim: Simulation<R>,
    phase: Phase,
    ticker: Ticker,
}

impl<R: Rng> Session<R> {
    pub fn new(sim: Simulation<R>, tick: Duration) -> Self {
        Self {
            sim,
            phase: Phase::StartMenu,
            ticker: Ticker::new(tick),
        }
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn is_ticking(&self) -> bool {
        self.ticker.is_running()
    }

    /// When the next tick falls due, if the tick source is running.
    pub fn next_tick(&self) -> Option<Instant> {
        self.ticker.next_deadline()
    }

    pub fn frame(&self) -> Frame {
        Frame {
            phase: self.phase,
            sim: self.sim.snapshot(),
        }
    }

    /// Applies one input. Commands that are not accepted in the current phase
    /// are ignored.
    pub fn handle(&mut self, command: Command, now: Instant) -> Option<Signal> {
        match (self.phase, command) {
            (Phase::StartMenu, Command::Start) => {
                self.new_run(now);
                None
            }
            (Phase::Running, Command::Flap) => {
                self.sim.flap();
                Some(Signal::Flapped)
            }
            (Phase::Running, Command::Pause) => {
                self.ticker.stop();
                self.enter(Phase::Paused);
                None
            }
            (Phase::Paused, Command::Resume) => {
                self.ticker.start(now);
                self.enter(Phase::Running);
                None
            }
            (Phase::Paused, Command::Restart) | (Phase::GameOver { .. }, Command::Yes) => {
                self.new_run(now);
                None
            }
            (Phase::Paused, Command::Exit) | (Phase::GameOver { .. }, Command::No) => {
                self.ticker.stop();
                info!("exit requested");
                Some(Signal::Exit)
            }
            (phase, command) => {
                trace!(?phase, ?command, "command ignored");
                None
            }
        }
    }

    /// Runs every tick that is due at `now`. Stops at the first crash; any
    /// further due ticks are dropped along with the stopped tick source.
    pub fn advance(&mut self, now: Instant) -> Vec<Signal> {
        let mut signals = Vec::new();
        if self.phase != Phase::Running {
            return signals;
        }
        for _ in 0..self.ticker.due(now) {
            let before = self.sim.scores().score;
            let outcome = self.sim.step();
            let after = self.sim.scores().score;
            if after > before {
                signals.push(Signal::Scored(after));
            }
            if let Outcome::GameOver { score, high_score } = outcome {
                self.ticker.stop();
                self.enter(Phase::GameOver { score, high_score });
                signals.push(Signal::Crashed { score, high_score });
                break;
            }
        }
        signals
    }

    fn new_run(&mut self, now: Instant) {
        self.sim.reset();
        self.ticker.start(now);
        self.enter(Phase::Running);
    }

    fn enter(&mut self, phase: Phase) {
        info!(from = ?self.phase, to = ?phase, "phase change");
        self.phase = phase;
    }
}
