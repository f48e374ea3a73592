use serde::{Deserialize, Serialize};

use super::board::{Board, Symbol};

/// How a finished game ended, from the human's point of view.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum Outcome {
    HumanWin,
    ComputerWin,
    Draw,
}

impl Outcome {
    /// `None` while the game is still in progress.
    pub fn classify(board: &Board, human: Symbol) -> Option<Self> {
        match board.winner() {
            Some(symbol) if symbol == human => Some(Outcome::HumanWin),
            Some(_) => Some(Outcome::ComputerWin),
            None if board.is_full() => Some(Outcome::Draw),
            None => None,
        }
    }
}

/// Running win/loss/draw counters for the session.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct ScoreTally {
    pub human: u32,
    pub computer: u32,
    pub draws: u32,
}

impl ScoreTally {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, outcome: Outcome) {
        let counter = match outcome {
            Outcome::HumanWin => &mut self.human,
            Outcome::ComputerWin => &mut self.computer,
            Outcome::Draw => &mut self.draws,
        };
        *counter = counter.saturating_add(1);
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }

    pub fn total(&self) -> u32 {
        self.human
            .saturating_add(self.computer)
            .saturating_add(self.draws)
    }
}
