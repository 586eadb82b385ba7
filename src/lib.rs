//! A Flappy Bird clone for the terminal.
//!
//! [`sim`] holds the game rules, [`session`] sequences menu, play, pause and
//! game over, and the remaining modules connect both to a real terminal.

pub mod config;
pub mod error;
pub mod input;
pub mod render;
pub mod session;
pub mod sim;
pub mod sound;
pub mod ticker;

pub use config::Config;
pub use error::{Error, Result};
pub use session::{Command, Frame, Phase, Session, Signal};
pub use sim::{Outcome, Physics, Simulation, Snapshot};
