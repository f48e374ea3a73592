use std::str::FromStr;
use std::time::Duration;

use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};

use crate::game::{Board, Symbol, COMPUTER_SYMBOL};

const DEFAULT_THINK_DELAY: Duration = Duration::from_millis(120);
const HARD_MISPLAY_CHANCE: f64 = 0.3;

const WIN_SCORE: i8 = 1;
const LOSS_SCORE: i8 = -1;
const DRAW_SCORE: i8 = 0;

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum AiDifficulty {
    Normal,
    Hard,
    #[default]
    Nightmare,
}

impl AiDifficulty {
    pub fn as_str(self) -> &'static str {
        match self {
            AiDifficulty::Normal => "Normal",
            AiDifficulty::Hard => "Hard",
            AiDifficulty::Nightmare => "Nightmare",
        }
    }
}

impl FromStr for AiDifficulty {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "normal" | "easy" => Ok(AiDifficulty::Normal),
            "hard" => Ok(AiDifficulty::Hard),
            "nightmare" | "expert" => Ok(AiDifficulty::Nightmare),
            _ => Err(()),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AiConfig {
    pub difficulty: AiDifficulty,
    /// Probability of playing a uniformly random cell instead of searching.
    pub misplay_chance: f64,
    /// Pause the UI should leave before asking for the computer's reply.
    pub think_delay: Duration,
    pub symbol: Symbol,
}

impl AiConfig {
    pub fn from_difficulty(difficulty: AiDifficulty) -> Self {
        let misplay_chance = match difficulty {
            AiDifficulty::Normal => 1.0,
            AiDifficulty::Hard => HARD_MISPLAY_CHANCE,
            AiDifficulty::Nightmare => 0.0,
        };
        Self {
            difficulty,
            misplay_chance,
            think_delay: DEFAULT_THINK_DELAY,
            symbol: COMPUTER_SYMBOL,
        }
    }

    pub fn with_think_delay(mut self, delay: Duration) -> Self {
        self.think_delay = delay;
        self
    }

    pub fn with_symbol(mut self, symbol: Symbol) -> Self {
        self.symbol = symbol;
        self
    }
}

impl Default for AiConfig {
    fn default() -> Self {
        AiConfig::from_difficulty(AiDifficulty::default())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct AiDecision {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub index: Option<usize>,
    /// Minimax value of the chosen cell; absent for random picks.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub score: Option<i8>,
    pub nodes: u64,
    pub misplay: bool,
    pub difficulty: AiDifficulty,
}

struct SearchStats {
    nodes: u64,
}

impl SearchStats {
    fn new() -> Self {
        Self { nodes: 0 }
    }
}

/// Picks the computer's cell. Randomness comes from the owned `rng`, so a
/// seeded or mock generator makes every branch reproducible.
pub struct AiAgent<R = SmallRng> {
    config: AiConfig,
    rng: R,
}

impl AiAgent<SmallRng> {
    pub fn new(config: AiConfig) -> Self {
        Self {
            config,
            rng: SmallRng::from_entropy(),
        }
    }

    pub fn with_seed(config: AiConfig, seed: u64) -> Self {
        Self {
            config,
            rng: SmallRng::seed_from_u64(seed),
        }
    }
}

impl<R: Rng> AiAgent<R> {
    pub fn with_rng(config: AiConfig, rng: R) -> Self {
        Self { config, rng }
    }

    pub fn config(&self) -> &AiConfig {
        &self.config
    }

    pub fn set_difficulty(&mut self, difficulty: AiDifficulty) {
        self.config = AiConfig::from_difficulty(difficulty)
            .with_think_delay(self.config.think_delay)
            .with_symbol(self.config.symbol);
    }

    /// Index of the next computer move, or `None` on a full board.
    pub fn select_move(&mut self, board: &Board) -> Option<usize> {
        self.decide(board).index
    }

    pub fn decide(&mut self, board: &Board) -> AiDecision {
        let difficulty = self.config.difficulty;
        if board.is_full() {
            return AiDecision {
                index: None,
                score: None,
                nodes: 0,
                misplay: false,
                difficulty,
            };
        }

        if self.roll_misplay() {
            return AiDecision {
                index: self.random_move(board),
                score: None,
                nodes: 0,
                misplay: true,
                difficulty,
            };
        }

        let mut stats = SearchStats::new();
        let mut scratch = *board;
        match best_move(&mut scratch, self.config.symbol, &mut stats) {
            Some((index, score)) => AiDecision {
                index: Some(index),
                score: Some(score),
                nodes: stats.nodes,
                misplay: false,
                difficulty,
            },
            None => AiDecision {
                index: self.random_move(board),
                score: None,
                nodes: stats.nodes,
                misplay: false,
                difficulty,
            },
        }
    }

    fn roll_misplay(&mut self) -> bool {
        let chance = self.config.misplay_chance;
        if chance <= 0.0 {
            false
        } else if chance >= 1.0 {
            true
        } else {
            self.rng.gen_bool(chance)
        }
    }

    fn random_move(&mut self, board: &Board) -> Option<usize> {
        let empties = board.empty_indices();
        if empties.is_empty() {
            return None;
        }
        Some(empties[self.rng.gen_range(0..empties.len())])
    }
}

// Highest-scoring cell for `me`; ties keep the lowest index.
fn best_move(board: &mut Board, me: Symbol, stats: &mut SearchStats) -> Option<(usize, i8)> {
    let mut best: Option<(usize, i8)> = None;
    let mut best_score = i8::MIN;
    for idx in board.empty_indices() {
        board.set(idx, me);
        let score = minimax_rec(board, me, false, stats);
        board.clear(idx);
        if score > best_score {
            best_score = score;
            best = Some((idx, score));
        }
    }
    best
}

/// Exhaustive minimax value of `board` for `me`: +1 win, -1 loss, 0 draw.
/// `maximizing` is true when `me` is to move. Trial placements are undone
/// before returning, so the board comes back unchanged.
pub fn minimax(board: &mut Board, me: Symbol, maximizing: bool) -> i8 {
    minimax_rec(board, me, maximizing, &mut SearchStats::new())
}

fn minimax_rec(board: &mut Board, me: Symbol, maximizing: bool, stats: &mut SearchStats) -> i8 {
    stats.nodes += 1;

    match board.winner() {
        Some(symbol) if symbol == me => return WIN_SCORE,
        Some(_) => return LOSS_SCORE,
        None if board.is_full() => return DRAW_SCORE,
        None => {}
    }

    if maximizing {
        let mut value = i8::MIN;
        for idx in board.empty_indices() {
            board.set(idx, me);
            value = value.max(minimax_rec(board, me, false, stats));
            board.clear(idx);
        }
        value
    } else {
        let opponent = me.opponent();
        let mut value = i8::MAX;
        for idx in board.empty_indices() {
            board.set(idx, opponent);
            value = value.min(minimax_rec(board, me, true, stats));
            board.clear(idx);
        }
        value
    }
}
