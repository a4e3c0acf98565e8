#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Tick {
    Running(u32),
    Expired,
}

/// Whole seconds left in the game.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Countdown {
    remaining: u32,
}

impl Countdown {
    pub fn new(seconds: u32) -> Self {
        Self { remaining: seconds }
    }

    pub fn remaining(&self) -> u32 {
        self.remaining
    }

    pub fn is_expired(&self) -> bool {
        self.remaining == 0
    }

    /// One second passes. Saturates at zero.
    pub fn tick(&mut self) -> Tick {
        self.remaining = self.remaining.saturating_sub(1);
        if self.remaining == 0 {
            Tick::Expired
        } else {
            Tick::Running(self.remaining)
        }
    }
}
