//! Game rules, independent of any toolkit.
//!
//! [`Session`] is the single owner of one game's mutable state. The UI holds
//! one session at a time and forwards clicks, flip completions and clock
//! ticks to it.

pub mod board;
pub mod countdown;
pub mod match_state;
pub mod summary;

use rand::Rng;
use tracing::info;

use crate::deck::Deck;
pub use board::{Tile, TileStatus, deal};
pub use countdown::{Countdown, Tick};
pub use match_state::{MatchState, Phase, RevealOutcome, Resolution};
pub use summary::{Outcome, Summary};

pub struct Session {
    state: MatchState,
    countdown: Countdown,
    summary: Option<Summary>,
}

impl Session {
    pub fn new<R: Rng + ?Sized>(deck: &Deck, time_limit_secs: u32, rng: &mut R) -> Self {
        Self::from_tiles(deal(deck, rng), time_limit_secs)
    }

    /// Start from an already dealt board.
    pub fn from_tiles(tiles: Vec<Tile>, time_limit_secs: u32) -> Self {
        Self {
            state: MatchState::new(tiles),
            countdown: Countdown::new(time_limit_secs.max(1)),
            summary: None,
        }
    }

    pub fn tiles(&self) -> &[Tile] {
        self.state.tiles()
    }

    pub fn attempts(&self) -> u32 {
        self.state.attempts()
    }

    pub fn correct_pairs(&self) -> u32 {
        self.state.correct_pairs()
    }

    pub fn seconds_remaining(&self) -> u32 {
        self.countdown.remaining()
    }

    pub fn phase(&self) -> Phase {
        self.state.phase()
    }

    pub fn input_blocked(&self) -> bool {
        self.state.input_blocked()
    }

    pub fn summary(&self) -> Option<Summary> {
        self.summary
    }

    pub fn is_finished(&self) -> bool {
        self.summary.is_some()
    }

    pub fn click(&mut self, index: usize) -> RevealOutcome {
        self.state.reveal(index)
    }

    /// Judge the pending pair once the second card has finished flipping.
    pub fn resolve_pending(&mut self) -> Option<Resolution> {
        let resolution = self.state.resolve()?;
        if resolution.won {
            self.finish(Outcome::Victory);
        }
        Some(resolution)
    }

    /// Advance the clock by one second. `None` once the game is over, which
    /// tells the caller to drop its tick source.
    pub fn tick(&mut self) -> Option<Tick> {
        if self.is_finished() {
            return None;
        }
        let tick = self.countdown.tick();
        if tick == Tick::Expired && self.state.time_up() {
            self.finish(Outcome::Defeat);
        }
        Some(tick)
    }

    fn finish(&mut self, outcome: Outcome) {
        let summary = Summary {
            outcome,
            correct_pairs: self.state.correct_pairs(),
            attempts: self.state.attempts(),
            seconds_remaining: self.countdown.remaining(),
        };
        info!(
            ?outcome,
            correct_pairs = summary.correct_pairs,
            attempts = summary.attempts,
            seconds_remaining = summary.seconds_remaining,
            "game over"
        );
        self.summary = Some(summary);
    }
}
