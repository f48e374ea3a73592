pub mod ai;
pub mod game;
pub mod utils;

use std::cell::RefCell;
use std::rc::Rc;
use std::str::FromStr;
use std::time::Duration;

use gloo_timers::future::TimeoutFuture;
use serde_wasm_bindgen::{from_value, to_value};
use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::future_to_promise;
use web_sys::js_sys::Promise;

pub use ai::{minimax, AiAgent, AiConfig, AiDecision, AiDifficulty};
pub use game::{
    Board, BoardError, GameSession, Outcome, PendingAiMove, RuleError, ScoreTally, Symbol,
    TurnResolution, COMPUTER_SYMBOL, HUMAN_SYMBOL,
};

#[cfg(feature = "wee_alloc")]
#[global_allocator]
static ALLOC: wee_alloc::WeeAlloc = wee_alloc::WeeAlloc::INIT;

#[wasm_bindgen(start)]
pub fn start() {
    utils::set_panic_hook();
}

/// Unknown or missing tier names fall back to the strongest tier.
fn parse_difficulty(value: Option<&str>) -> AiDifficulty {
    match value {
        Some(raw) => AiDifficulty::from_str(raw).unwrap_or_else(|_| {
            utils::warn(&format!("unknown difficulty {raw:?}, using Nightmare"));
            AiDifficulty::Nightmare
        }),
        None => AiDifficulty::default(),
    }
}

fn to_js_error(error: RuleError) -> JsValue {
    to_value(&error).unwrap_or_else(|serialize_err| JsValue::from_str(&serialize_err.to_string()))
}

fn serde_to_js_error<E: std::fmt::Display>(error: E) -> JsValue {
    JsValue::from_str(&error.to_string())
}

fn board_from_js(board: JsValue) -> Result<Board, JsValue> {
    from_value(board).map_err(JsValue::from)
}

fn resolution_json(resolution: &TurnResolution) -> Result<JsValue, JsValue> {
    let json = serde_json::to_string(resolution).map_err(serde_to_js_error)?;
    Ok(JsValue::from_str(&json))
}

#[wasm_bindgen]
pub fn winner(board: JsValue) -> Result<Option<String>, JsValue> {
    let board = board_from_js(board)?;
    Ok(board.winner().map(|symbol| symbol.as_str().to_string()))
}

#[wasm_bindgen(js_name = "isFull")]
pub fn is_full(board: JsValue) -> Result<bool, JsValue> {
    Ok(board_from_js(board)?.is_full())
}

#[wasm_bindgen(js_name = "emptyIndices")]
pub fn empty_indices(board: JsValue) -> Result<Vec<u32>, JsValue> {
    let board = board_from_js(board)?;
    Ok(board.empty_indices().into_iter().map(|idx| idx as u32).collect())
}

/// Computer (O) move for `board`, or `undefined` when the board is full.
/// The caller's array is never modified.
#[wasm_bindgen(js_name = "selectMove")]
pub fn select_move(board: JsValue, difficulty: Option<String>) -> Result<Option<u32>, JsValue> {
    let board = board_from_js(board)?;
    let config = AiConfig::from_difficulty(parse_difficulty(difficulty.as_deref()));
    let mut agent = AiAgent::new(config);
    Ok(agent.select_move(&board).map(|idx| idx as u32))
}

/// Like `selectMove`, but returns the full decision (score, nodes searched,
/// whether the pick was a deliberate misplay).
#[wasm_bindgen(js_name = "decideMove")]
pub fn decide_move(board: JsValue, difficulty: Option<String>) -> Result<JsValue, JsValue> {
    let board = board_from_js(board)?;
    let config = AiConfig::from_difficulty(parse_difficulty(difficulty.as_deref()));
    let mut agent = AiAgent::new(config);
    let decision = agent.decide(&board);
    to_value(&decision).map_err(JsValue::from)
}

/// One human-vs-computer session: board, difficulty, scores and input lock.
#[wasm_bindgen]
pub struct GameEngine {
    session: Rc<RefCell<GameSession>>,
    agent: Rc<RefCell<AiAgent>>,
}

#[wasm_bindgen]
impl GameEngine {
    #[wasm_bindgen(constructor)]
    pub fn new(difficulty: Option<String>, think_delay_ms: Option<u32>) -> GameEngine {
        let mut config = AiConfig::from_difficulty(parse_difficulty(difficulty.as_deref()));
        if let Some(delay) = think_delay_ms {
            config = config.with_think_delay(Duration::from_millis(u64::from(delay)));
        }
        let session = GameSession::new(config.difficulty, config.think_delay);
        GameEngine {
            session: Rc::new(RefCell::new(session)),
            agent: Rc::new(RefCell::new(AiAgent::new(config))),
        }
    }

    pub fn board(&self) -> Result<JsValue, JsValue> {
        to_value(self.session.borrow().board()).map_err(JsValue::from)
    }

    pub fn scores(&self) -> Result<JsValue, JsValue> {
        to_value(self.session.borrow().scores()).map_err(JsValue::from)
    }

    pub fn difficulty(&self) -> String {
        self.session.borrow().difficulty().as_str().to_string()
    }

    #[wasm_bindgen(js_name = "setDifficulty")]
    pub fn set_difficulty(&self, difficulty: &str) {
        let difficulty = parse_difficulty(Some(difficulty));
        self.session.borrow_mut().set_difficulty(difficulty);
        utils::log(&format!("difficulty set to {}", difficulty.as_str()));
    }

    #[wasm_bindgen(js_name = "isLocked")]
    pub fn is_locked(&self) -> bool {
        self.session.borrow().is_locked()
    }

    #[wasm_bindgen(js_name = "resetBoard")]
    pub fn reset_board(&self) {
        self.session.borrow_mut().reset_board();
    }

    #[wasm_bindgen(js_name = "resetScores")]
    pub fn reset_scores(&self) {
        self.session.borrow_mut().reset_scores();
    }

    /// Plays the human's mark at `index`. The promise resolves with the JSON
    /// turn resolution once the computer has answered (after the think delay),
    /// or right away when the human's move ended the game.
    pub fn play(&self, index: u32) -> Promise {
        let human = match self.session.borrow_mut().play_human(index as usize) {
            Ok(resolution) => resolution,
            Err(error) => return Promise::reject(&to_js_error(error)),
        };

        let Some(pending) = human.pending else {
            return match resolution_json(&human) {
                Ok(json) => Promise::resolve(&json),
                Err(error) => Promise::reject(&error),
            };
        };

        let session = Rc::clone(&self.session);
        let agent = Rc::clone(&self.agent);
        future_to_promise(async move {
            let delay = u32::try_from(pending.delay.as_millis()).unwrap_or(u32::MAX);
            if delay > 0 {
                TimeoutFuture::new(delay).await;
            }

            let reply = {
                let mut agent = agent.borrow_mut();
                session.borrow_mut().complete_ai_turn(pending, &mut *agent)
            };
            let reply = reply.map_err(|error| {
                utils::warn(&format!("computer turn dropped: {error:?}"));
                to_js_error(error)
            })?;

            if let Some(index) = reply.computer_move {
                utils::log(&format!("computer played {index}\n{}", reply.board));
            }
            resolution_json(&TurnResolution {
                human_move: human.human_move,
                ..reply
            })
        })
    }
}
