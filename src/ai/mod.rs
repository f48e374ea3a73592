//! Computer opponent: random play and exhaustive minimax.

pub mod minimax;

pub use minimax::{minimax, AiAgent, AiConfig, AiDecision, AiDifficulty};
