//! Simulation core: one player body falling under gravity, one obstacle
//! scrolling towards it, and the score.
//!
//! The core never reads input or clocks. Callers drive it through
//! [`Simulation::flap`], [`Simulation::step`] and [`Simulation::reset`] and
//! read it back through [`Simulation::snapshot`].

use rand::Rng;
use serde::Deserialize;
use tracing::debug;

// ── Constants ───────────────────────────────────────────────────────────────

/// Every tunable of the simulation. `Default` reproduces the classic game:
/// a 400x600 playfield with the ground line at y = 500.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Physics {
    /// Added to the vertical velocity every tick (px/tick²).
    pub gravity: f64,
    /// Velocity set by a flap (px/tick, negative is up).
    pub lift: f64,
    /// Distance the obstacle scrolls left every tick (px/tick).
    pub pipe_speed: f64,
    pub window_width: f64,
    pub window_height: f64,
    /// The player dies once its bottom edge passes this line.
    pub ground_y: f64,
    pub player_x: f64,
    pub player_width: f64,
    pub player_height: f64,
    pub player_start_y: f64,
    pub obstacle_width: f64,
    pub gap_size: i32,
    /// Inclusive lower bound of the random gap top.
    pub gap_top_min: i32,
    /// Exclusive upper bound of the random gap top.
    pub gap_top_max: i32,
}

impl Default for Physics {
    fn default() -> Self {
        Self {
            gravity: 1.0,
            lift: -10.0,
            pipe_speed: 4.0,
            window_width: 400.0,
            window_height: 600.0,
            ground_y: 500.0,
            player_x: 100.0,
            player_width: 34.0,
            player_height: 24.0,
            player_start_y: 250.0,
            obstacle_width: 52.0,
            gap_size: 150,
            gap_top_min: 100,
            gap_top_max: 300,
        }
    }
}

// ── Entities ────────────────────────────────────────────────────────────────

/// The controlled sprite. `y` is the top edge of its hitbox.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlayerBody {
    pub y: f64,
    pub velocity: f64,
}

impl PlayerBody {
    fn at_rest(physics: &Physics) -> Self {
        Self {
            y: physics.player_start_y,
            velocity: 0.0,
        }
    }
}

/// The single gapped barrier. It is recycled rather than replaced.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Obstacle {
    /// Left edge.
    pub x: f64,
    /// Y coordinate of the bottom of the upper segment.
    pub gap_top: i32,
    /// Set once the player has passed this obstacle; cleared on recycle.
    pub scored: bool,
}

impl Obstacle {
    fn spawn(physics: &Physics, rng: &mut impl Rng) -> Self {
        Self {
            x: physics.window_width,
            gap_top: rng.gen_range(physics.gap_top_min..physics.gap_top_max),
            scored: false,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ScoreState {
    pub score: u32,
    /// Never lowered, not even by a reset.
    pub high_score: u32,
}

impl ScoreState {
    fn bump(&mut self) {
        self.score += 1;
        self.high_score = self.high_score.max(self.score);
    }
}

/// Result of one tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Continue,
    /// The run is over. `step` must not be called again before `reset`.
    GameOver { score: u32, high_score: u32 },
}

/// Read-only view handed to the renderer once per frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Snapshot {
    pub player_y: f64,
    pub player_velocity: f64,
    pub obstacle_x: f64,
    pub gap_top: i32,
    pub gap_size: i32,
    pub obstacle_width: f64,
    pub score: u32,
    pub high_score: u32,
    /// Ticks simulated since the last reset.
    pub ticks: u64,
}

// ── Simulation ──────────────────────────────────────────────────────────────

pub struct Simulation<R> {
    physics: Physics,
    pub(crate) player: PlayerBody,
    pub(crate) obstacle: Obstacle,
    scores: ScoreState,
    ticks: u64,
    rng: R,
}

impl<R: Rng> Simulation<R> {
    /// Builds a fresh run. The high score starts at zero.
    pub fn new(physics: Physics, mut rng: R) -> Self {
        let obstacle = Obstacle::spawn(&physics, &mut rng);
        Self {
            player: PlayerBody::at_rest(&physics),
            obstacle,
            scores: ScoreState::default(),
            ticks: 0,
            physics,
            rng,
        }
    }

    pub fn player(&self) -> PlayerBody {
        self.player
    }

    pub fn obstacle(&self) -> Obstacle {
        self.obstacle
    }

    pub fn scores(&self) -> ScoreState {
        self.scores
    }

    /// Puts the player back at its start position and spawns a new obstacle.
    /// The high score is kept.
    pub fn reset(&mut self) {
        self.player = PlayerBody::at_rest(&self.physics);
        self.obstacle = Obstacle::spawn(&self.physics, &mut self.rng);
        self.scores.score = 0;
        self.ticks = 0;
    }

    /// Sets the velocity to the lift constant. Flaps do not accumulate.
    pub fn flap(&mut self) {
        self.player.velocity = self.physics.lift;
    }

    /// Advances the run by one tick.
    ///
    /// The order is fixed: integrate the player, scroll the obstacle, recycle
    /// it if it left the screen, award a point if it was passed, then test
    /// for a crash. Scoring looks at the obstacle after recycling, so a tick
    /// that recycles can never also score.
    pub fn step(&mut self) -> Outcome {
        let p = &self.physics;
        self.ticks += 1;

        self.player.velocity += p.gravity;
        self.player.y += self.player.velocity;

        self.obstacle.x -= p.pipe_speed;

        if self.obstacle.x + p.obstacle_width < 0.0 {
            self.obstacle = Obstacle::spawn(p, &mut self.rng);
            debug!(gap_top = self.obstacle.gap_top, "obstacle recycled");
        }

        if self.obstacle.x + p.obstacle_width < p.player_x && !self.obstacle.scored {
            self.obstacle.scored = true;
            self.scores.bump();
            debug!(score = self.scores.score, high_score = self.scores.high_score, "scored");
        }

        if self.is_terminal() {
            Outcome::GameOver {
                score: self.scores.score,
                high_score: self.scores.high_score,
            }
        } else {
            Outcome::Continue
        }
    }

    /// Ground, ceiling, or a hit on either obstacle segment.
    pub fn is_terminal(&self) -> bool {
        let p = &self.physics;
        let top = self.player.y;
        let bottom = top + p.player_height;

        let out_of_bounds = bottom > p.ground_y || top < 0.0;

        let ox = self.obstacle.x;
        let overlaps = p.player_x < ox + p.obstacle_width && ox < p.player_x + p.player_width;
        let gap_top = f64::from(self.obstacle.gap_top);
        let gap_bottom = gap_top + f64::from(p.gap_size);
        let outside_gap = top < gap_top || bottom > gap_bottom;

        out_of_bounds || (overlaps && outside_gap)
    }

    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            player_y: self.player.y,
            player_velocity: self.player.velocity,
            obstacle_x: self.obstacle.x,
            gap_top: self.obstacle.gap_top,
            gap_size: self.physics.gap_size,
            obstacle_width: self.physics.obstacle_width,
            score: self.scores.score,
            high_score: self.scores.high_score,
            ticks: self.ticks,
        }
    }
}
