use std::time::Duration;

use rand::Rng;
use serde::{Deserialize, Serialize};

use super::{
    board::{Board, BoardError, Symbol},
    score::{Outcome, ScoreTally},
};
use crate::ai::{AiAgent, AiDifficulty};

/// The human always plays X and opens every game.
pub const HUMAN_SYMBOL: Symbol = Symbol::X;
pub const COMPUTER_SYMBOL: Symbol = Symbol::O;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "type")]
pub enum RuleError {
    GameFinished,
    InputLocked,
    NotAwaitingAi,
    StaleTurn { expected: u64, actual: u64 },
    NoMoveAvailable,
    InvalidBoard { error: BoardError },
}

impl From<BoardError> for RuleError {
    fn from(error: BoardError) -> Self {
        RuleError::InvalidBoard { error }
    }
}

/// Returned when input is locked and the computer owes a reply. The
/// collaborator waits `delay`, then hands the token back to
/// [`GameSession::complete_ai_turn`]. `turn` ties the token to the human
/// move it answers; a reset in between makes it stale.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct PendingAiMove {
    pub delay: Duration,
    pub turn: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct TurnResolution {
    pub board: Board,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub human_move: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub computer_move: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub outcome: Option<Outcome>,
    pub scores: ScoreTally,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pending: Option<PendingAiMove>,
}

/// Board, tally and input lock for one player at one screen.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct GameSession {
    board: Board,
    difficulty: AiDifficulty,
    scores: ScoreTally,
    locked: bool,
    turn: u64,
    think_delay: Duration,
}

impl GameSession {
    pub fn new(difficulty: AiDifficulty, think_delay: Duration) -> Self {
        Self {
            board: Board::new(),
            difficulty,
            scores: ScoreTally::new(),
            locked: false,
            turn: 0,
            think_delay,
        }
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn difficulty(&self) -> AiDifficulty {
        self.difficulty
    }

    pub fn scores(&self) -> &ScoreTally {
        &self.scores
    }

    pub fn is_locked(&self) -> bool {
        self.locked
    }

    pub fn outcome(&self) -> Option<Outcome> {
        Outcome::classify(&self.board, HUMAN_SYMBOL)
    }

    /// Applies the human's mark. If the game goes on, input stays locked
    /// until the computer has replied.
    pub fn play_human(&mut self, index: usize) -> Result<TurnResolution, RuleError> {
        if self.locked {
            return Err(RuleError::InputLocked);
        }
        if self.outcome().is_some() {
            return Err(RuleError::GameFinished);
        }
        self.board.place(index, HUMAN_SYMBOL)?;
        self.turn += 1;

        let outcome = self.finish_if_done();
        let pending = if outcome.is_none() {
            self.locked = true;
            Some(PendingAiMove {
                delay: self.think_delay,
                turn: self.turn,
            })
        } else {
            None
        };

        Ok(TurnResolution {
            board: self.board,
            human_move: Some(index),
            computer_move: None,
            outcome,
            scores: self.scores,
            pending,
        })
    }

    /// Plays the computer's reply for `pending`. The session's tier wins
    /// over whatever the agent was configured with.
    pub fn complete_ai_turn<R: Rng>(
        &mut self,
        pending: PendingAiMove,
        agent: &mut AiAgent<R>,
    ) -> Result<TurnResolution, RuleError> {
        if pending.turn != self.turn {
            return Err(RuleError::StaleTurn {
                expected: self.turn,
                actual: pending.turn,
            });
        }
        if !self.locked {
            return Err(RuleError::NotAwaitingAi);
        }
        if agent.config().difficulty != self.difficulty {
            agent.set_difficulty(self.difficulty);
        }
        let index = match agent.select_move(&self.board) {
            Some(index) => index,
            None => {
                self.locked = false;
                return Err(RuleError::NoMoveAvailable);
            }
        };
        let placed = self.board.place(index, agent.config().symbol);
        self.locked = false;
        placed?;

        let outcome = self.finish_if_done();
        Ok(TurnResolution {
            board: self.board,
            human_move: None,
            computer_move: Some(index),
            outcome,
            scores: self.scores,
            pending: None,
        })
    }

    /// Clears the board and unlocks input; scores are kept.
    pub fn reset_board(&mut self) {
        self.board = Board::new();
        self.locked = false;
        self.turn += 1;
    }

    pub fn reset_scores(&mut self) {
        self.scores.reset();
    }

    /// Switching tier starts a fresh game.
    pub fn set_difficulty(&mut self, difficulty: AiDifficulty) {
        self.difficulty = difficulty;
        self.reset_board();
    }

    fn finish_if_done(&mut self) -> Option<Outcome> {
        let outcome = self.outcome()?;
        self.scores.record(outcome);
        Some(outcome)
    }
}

impl Default for GameSession {
    fn default() -> Self {
        let config = crate::ai::AiConfig::default();
        GameSession::new(config.difficulty, config.think_delay)
    }
}
