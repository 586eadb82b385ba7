use std::time::{Duration, Instant};

use flappy_term::session::{Command, Phase, Session, Signal};
use flappy_term::sim::{Physics, Simulation};

use rand::SeedableRng;
use rand::rngs::StdRng;

const TICK: Duration = Duration::from_millis(20);

/// Drives a session one tick at a time on a fake clock.
struct Harness {
    session: Session<StdRng>,
    now: Instant,
}

impl Harness {
    fn new(seed: u64) -> Self {
        let sim = Simulation::new(Physics::default(), StdRng::seed_from_u64(seed));
        Self {
            session: Session::new(sim, TICK),
            now: Instant::now(),
        }
    }

    fn send(&mut self, command: Command) -> Option<Signal> {
        self.session.handle(command, self.now)
    }

    fn tick(&mut self) -> Vec<Signal> {
        self.now += TICK;
        self.session.advance(self.now)
    }

    /// Flaps like a careful player would, then advances one tick.
    fn guided_tick(&mut self) -> Vec<Signal> {
        let s = self.session.frame().sim;
        if s.player_y > f64::from(s.gap_top) + 80.0 {
            self.send(Command::Flap);
        }
        self.tick()
    }

    /// Lets the player fall until the run ends.
    fn crash(&mut self) -> Signal {
        for _ in 0..100 {
            if let Some(&last) = self.tick().last() {
                if let Signal::Crashed { .. } = last {
                    return last;
                }
            }
        }
        panic!("player never crashed");
    }
}

#[test]
fn full_round_trip_menu_play_pause_exit() {
    let mut h = Harness::new(1);
    assert_eq!(h.session.phase(), Phase::StartMenu);
    assert!(h.tick().is_empty());

    h.send(Command::Start);
    assert_eq!(h.session.phase(), Phase::Running);
    for _ in 0..10 {
        h.guided_tick();
    }
    assert_eq!(h.session.frame().sim.ticks, 10);

    h.send(Command::Pause);
    for _ in 0..10 {
        assert!(h.tick().is_empty());
    }
    assert_eq!(h.session.frame().sim.ticks, 10);

    h.send(Command::Resume);
    h.tick();
    assert_eq!(h.session.frame().sim.ticks, 11);

    h.send(Command::Pause);
    assert_eq!(h.send(Command::Exit), Some(Signal::Exit));
}

#[test]
fn scoring_is_signalled() {
    let mut h = Harness::new(7);
    h.send(Command::Start);
    let mut scored = Vec::new();
    for _ in 0..250 {
        for signal in h.guided_tick() {
            if let Signal::Scored(n) = signal {
                scored.push(n);
            }
        }
    }
    assert_eq!(scored, vec![1, 2]);
    assert_eq!(h.session.phase(), Phase::Running);
}

#[test]
fn game_over_then_play_again_keeps_high_score() {
    let mut h = Harness::new(11);
    h.send(Command::Start);
    for _ in 0..100 {
        h.guided_tick();
    }
    assert_eq!(h.session.frame().sim.score, 1);

    assert_eq!(
        h.crash(),
        Signal::Crashed {
            score: 1,
            high_score: 1
        }
    );
    assert_eq!(
        h.session.phase(),
        Phase::GameOver {
            score: 1,
            high_score: 1
        }
    );
    assert!(!h.session.is_ticking());
    let frozen = h.session.frame().sim;
    assert!(h.tick().is_empty());
    assert_eq!(h.session.frame().sim, frozen);

    h.send(Command::Yes);
    assert_eq!(h.session.phase(), Phase::Running);
    let fresh = h.session.frame().sim;
    assert_eq!((fresh.score, fresh.high_score, fresh.ticks), (0, 1, 0));

    assert_eq!(
        h.crash(),
        Signal::Crashed {
            score: 0,
            high_score: 1
        }
    );
    assert_eq!(h.send(Command::No), Some(Signal::Exit));
}

#[test]
fn inputs_outside_their_phase_change_nothing() {
    let mut h = Harness::new(4);
    h.send(Command::Start);
    h.tick();
    let before = h.session.frame();

    for cmd in [Command::Start, Command::Resume, Command::Yes, Command::No, Command::Exit] {
        assert_eq!(h.send(cmd), None);
    }
    assert_eq!(h.session.frame(), before);

    h.send(Command::Pause);
    let paused = h.session.frame();
    for cmd in [Command::Start, Command::Flap, Command::Pause, Command::Yes, Command::No] {
        assert_eq!(h.send(cmd), None);
        assert_eq!(h.session.frame(), paused);
    }
}
