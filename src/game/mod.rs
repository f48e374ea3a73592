//! Board evaluation, score keeping and turn rules.

pub mod board;
pub mod rules;
pub mod score;

pub use board::{Board, BoardError, Symbol, CELL_COUNT, LINES};
pub use rules::{
    GameSession, PendingAiMove, RuleError, TurnResolution, COMPUTER_SYMBOL, HUMAN_SYMBOL,
};
pub use score::{Outcome, ScoreTally};
