use tracing::debug;

use super::board::{Tile, TileStatus};
use crate::deck::PAIR_COUNT;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Phase {
    Idle,
    OneSelected,
    /// Two cards are up and input is blocked until the pair is judged.
    ResolvingPair,
    Won,
    TimeUp,
}

impl Phase {
    pub fn is_terminal(self) -> bool {
        matches!(self, Phase::Won | Phase::TimeUp)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RevealOutcome {
    /// Already up, out of range, input blocked, or game over.
    Ignored,
    First(usize),
    /// Second card of a pair; call [`MatchState::resolve`] once its flip ends.
    Second(usize),
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Resolution {
    pub first: usize,
    pub second: usize,
    pub matched: bool,
    pub won: bool,
}

/// Pair-matching rules over a dealt board.
#[derive(Clone, Debug)]
pub struct MatchState {
    tiles: Vec<Tile>,
    attempts: u32,
    correct_pairs: u32,
    last_selection: Option<usize>,
    current_selection: Option<usize>,
    phase: Phase,
}

impl MatchState {
    pub fn new(tiles: Vec<Tile>) -> Self {
        Self {
            tiles,
            attempts: 0,
            correct_pairs: 0,
            last_selection: None,
            current_selection: None,
            phase: Phase::Idle,
        }
    }

    pub fn tiles(&self) -> &[Tile] {
        &self.tiles
    }

    pub fn attempts(&self) -> u32 {
        self.attempts
    }

    pub fn correct_pairs(&self) -> u32 {
        self.correct_pairs
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn pending_pair(&self) -> Option<(usize, usize)> {
        self.last_selection.zip(self.current_selection)
    }

    pub fn input_blocked(&self) -> bool {
        self.phase == Phase::ResolvingPair || self.phase.is_terminal()
    }

    pub fn reveal(&mut self, index: usize) -> RevealOutcome {
        if self.input_blocked() {
            return RevealOutcome::Ignored;
        }
        let Some(tile) = self.tiles.get_mut(index) else {
            return RevealOutcome::Ignored;
        };
        if tile.status != TileStatus::Hidden {
            return RevealOutcome::Ignored;
        }

        tile.status = TileStatus::Flipped;
        if self.last_selection.is_none() {
            self.last_selection = Some(index);
            self.phase = Phase::OneSelected;
            RevealOutcome::First(index)
        } else {
            self.current_selection = Some(index);
            self.phase = Phase::ResolvingPair;
            RevealOutcome::Second(index)
        }
    }

    /// Judge the pending pair. `None` when there is no pair to judge.
    pub fn resolve(&mut self) -> Option<Resolution> {
        if self.phase != Phase::ResolvingPair {
            return None;
        }
        let (first, second) = self.pending_pair()?;

        let matched = self.tiles[first].card == self.tiles[second].card;
        let next_status = if matched {
            self.correct_pairs += 1;
            TileStatus::Matched
        } else {
            TileStatus::Hidden
        };
        self.tiles[first].status = next_status.clone();
        self.tiles[second].status = next_status;
        self.attempts += 1;
        self.last_selection = None;
        self.current_selection = None;

        let won = self.correct_pairs as usize == PAIR_COUNT;
        self.phase = if won { Phase::Won } else { Phase::Idle };
        debug!(
            first,
            second,
            matched,
            attempts = self.attempts,
            correct_pairs = self.correct_pairs,
            "pair resolved"
        );
        Some(Resolution {
            first,
            second,
            matched,
            won,
        })
    }

    /// Returns `true` if this call ended the game.
    pub fn time_up(&mut self) -> bool {
        if self.phase.is_terminal() {
            return false;
        }
        self.phase = Phase::TimeUp;
        true
    }
}
