#![cfg(target_arch = "wasm32")]

use serde_json::Value;
use wasm_bindgen::JsValue;
use wasm_bindgen_futures::JsFuture;
use wasm_bindgen_test::*;

use wasm_tictactoe::{empty_indices, is_full, select_move, winner, GameEngine};

fn js_board(cells: [&str; 9]) -> JsValue {
    serde_wasm_bindgen::to_value(&cells).expect("board should convert")
}

fn parse(value: JsValue) -> Value {
    let text = value.as_string().expect("resolution is a JSON string");
    serde_json::from_str(&text).expect("resolution should parse")
}

#[wasm_bindgen_test]
fn evaluator_reads_js_arrays() {
    let board = js_board(["X", "X", "X", "O", "O", "", "", "", ""]);
    assert_eq!(winner(board.clone()).expect("valid board"), Some("X".into()));
    assert!(!is_full(board.clone()).expect("valid board"));
    assert_eq!(
        empty_indices(board).expect("valid board"),
        vec![5, 6, 7, 8]
    );
}

#[wasm_bindgen_test]
fn full_draw_board() {
    let board = js_board(["X", "O", "X", "X", "O", "O", "O", "X", "X"]);
    assert_eq!(winner(board.clone()).expect("valid board"), None);
    assert!(is_full(board.clone()).expect("valid board"));
    assert!(empty_indices(board.clone()).expect("valid board").is_empty());
    assert_eq!(select_move(board, None).expect("valid board"), None);
}

#[wasm_bindgen_test]
fn nightmare_blocks_from_js() {
    let board = js_board(["X", "X", "", "O", "O", "", "", "", ""]);
    let index = select_move(board, Some("Nightmare".into())).expect("valid board");
    assert_eq!(index, Some(2));
}

#[wasm_bindgen_test]
fn malformed_board_is_rejected() {
    let board = serde_wasm_bindgen::to_value(&["X", "Q"]).expect("array should convert");
    assert!(winner(board).is_err());
}

#[wasm_bindgen_test]
async fn engine_plays_a_turn() {
    let engine = GameEngine::new(Some("nightmare".into()), Some(0));
    assert_eq!(engine.difficulty(), "Nightmare");

    let resolution = JsFuture::from(engine.play(4))
        .await
        .expect("turn should resolve");
    let resolution = parse(resolution);
    assert_eq!(resolution["human_move"], 4);
    let computer = resolution["computer_move"]
        .as_u64()
        .expect("computer should reply");
    assert_ne!(computer, 4);
    assert_eq!(resolution["board"][4], "X");
    assert_eq!(resolution["board"][computer as usize], "O");
    assert!(!engine.is_locked());

    let rejected = JsFuture::from(engine.play(4)).await;
    assert!(rejected.is_err());
}

#[wasm_bindgen_test]
async fn difficulty_change_drops_the_pending_reply() {
    let engine = GameEngine::new(None, Some(0));
    assert_eq!(engine.difficulty(), "Nightmare");
    let stale = engine.play(0);
    assert!(engine.is_locked());

    engine.set_difficulty("normal");
    assert_eq!(engine.difficulty(), "Normal");
    assert!(!engine.is_locked());

    // The new game's move is answered even though the old timer is still queued.
    let fresh = engine.play(4);
    let error = JsFuture::from(stale)
        .await
        .expect_err("reply for the old game must be dropped");
    let error: Value = serde_wasm_bindgen::from_value(error).expect("error should convert");
    assert_eq!(error["type"], "StaleTurn");

    let resolution = parse(JsFuture::from(fresh).await.expect("new turn should resolve"));
    assert_eq!(resolution["human_move"], 4);
    assert_eq!(resolution["board"][4], "X");
    assert!(resolution["computer_move"].is_u64());
    assert!(!engine.is_locked());

    engine.set_difficulty("unknown");
    assert_eq!(engine.difficulty(), "Nightmare");
}
