//! Sound cues. Each cue is synthesised once at start-up with fundsp
//! oscillators and replayed through rodio on demand.

use fundsp::prelude::*;
use rodio::{OutputStream, OutputStreamBuilder, Sink, buffer::SamplesBuffer};
use tracing::{info, warn};

use crate::session::Signal;

const SAMPLE_RATE: u32 = 44_100;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Cue {
    Flap,
    Score,
    Crash,
}

impl Cue {
    /// The cue that goes with a session signal, if any.
    pub fn for_signal(signal: Signal) -> Option<Cue> {
        match signal {
            Signal::Flapped => Some(Cue::Flap),
            Signal::Scored(_) => Some(Cue::Score),
            Signal::Crashed { .. } => Some(Cue::Crash),
            Signal::Exit => None,
        }
    }
}

// ── Synthesis ───────────────────────────────────────────────────────────────

/// Runs `graph` for `seconds` and collects its mono output.
fn bounce(mut graph: impl AudioUnit, seconds: f32) -> Vec<f32> {
    graph.set_sample_rate(f64::from(SAMPLE_RATE));
    let n = (seconds * SAMPLE_RATE as f32) as usize;
    (0..n).map(|_| graph.get_mono()).collect()
}

/// Short upward chirp, 300Hz to 700Hz.
fn flap_samples() -> Vec<f32> {
    let freq = lfo(|t: f32| -> f32 { 300.0 + 400.0 * (t / 0.08).min(1.0) });
    let gain = lfo(|t: f32| -> f32 { 0.08 * (1.0 - (t / 0.08).min(1.0)) });
    bounce((freq >> square()) * gain, 0.08)
}

/// Two rising sine notes.
fn score_samples() -> Vec<f32> {
    let freq = lfo(|t: f32| -> f32 { if t < 0.07 { 880.0 } else { 1320.0 } });
    let gain = lfo(|t: f32| -> f32 { 0.2 * (1.0 - (t / 0.18).min(1.0)) });
    bounce((freq >> sine::<f32>()) * gain, 0.18)
}

/// Falling sawtooth, 400Hz down to 80Hz over 0.4s.
fn crash_samples() -> Vec<f32> {
    let freq = lfo(|t: f32| -> f32 { 400.0 - 320.0 * (t / 0.4).min(1.0) });
    let gain = lfo(|t: f32| -> f32 { 0.15 * (1.0 - (t / 0.5).min(1.0)) });
    bounce((freq >> saw()) * gain, 0.5)
}

// ── Playback ────────────────────────────────────────────────────────────────

pub struct Audio {
    stream: OutputStream,
    flap: Vec<f32>,
    score: Vec<f32>,
    crash: Vec<f32>,
}

impl Audio {
    /// Opens the default output device. Without one the game runs silent.
    pub fn open() -> Option<Self> {
        match OutputStreamBuilder::open_default_stream() {
            Ok(mut stream) => {
                stream.log_on_drop(false);
                info!("audio output opened");
                Some(Self {
                    stream,
                    flap: flap_samples(),
                    score: score_samples(),
                    crash: crash_samples(),
                })
            }
            Err(err) => {
                warn!(%err, "no audio output, running silent");
                None
            }
        }
    }

    /// Starts `cue` in the background.
    pub fn play(&self, cue: Cue) {
        let samples = match cue {
            Cue::Flap => &self.flap,
            Cue::Score => &self.score,
            Cue::Crash => &self.crash,
        };
        let sink = Sink::connect_new(self.stream.mixer());
        sink.append(SamplesBuffer::new(1, SAMPLE_RATE, samples.clone()));
        sink.detach();
    }
}
