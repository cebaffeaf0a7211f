//! MCTS engine behavior: determinism under a fixed seed, forced-move
//! short-circuit, and basic sanity of the returned move.

use outpost::board::Board;
use outpost::mcts::MctsEngine;
use outpost::moves::movegen::legal_moves;
use std::str::FromStr;

#[test]
fn same_seed_same_move() {
    let fen = "r3k2r/p1ppqpb1/bn2pnp1/3PN3/1p2P3/2N2Q1p/PPPBBPPP/R3K2R w KQkq - 0 1";

    let mut first = MctsEngine::new();
    first.set_seed(424242);
    let mut board = Board::from_str(fen).unwrap();
    let move_a = first.search(&mut board, 300);

    let mut second = MctsEngine::new();
    second.set_seed(424242);
    let mut board = Board::from_str(fen).unwrap();
    let move_b = second.search(&mut board, 300);

    assert!(move_a.same_move(move_b), "seeded searches must replay identically");
}

#[test]
fn different_seeds_may_differ_but_stay_legal() {
    let mut board = Board::new();
    let mut engine = MctsEngine::new();
    engine.set_seed(7);
    let chosen = engine.search(&mut board, 200);

    let legal = legal_moves(&mut board);
    assert!(
        legal.iter().any(|m| m.same_move(chosen)),
        "mcts returned {chosen}, which is not a legal move"
    );
}

#[test]
fn single_legal_move_is_returned_immediately() {
    // Black's only move is Ka8-a7.
    let fen = "k7/8/8/8/8/8/8/KR6 b - - 0 1";

    let mut board = Board::from_str(fen).unwrap();
    assert_eq!(legal_moves(&mut board).len(), 1);

    let mut engine = MctsEngine::new();
    let with_one_sim = engine.search(&mut board, 1);
    assert_eq!(with_one_sim.to_uci(), "a8a7");

    // Simulation count must not matter for a forced move.
    let with_many = engine.search(&mut board, 5_000);
    assert_eq!(with_many.to_uci(), "a8a7");
}

#[test]
fn no_legal_moves_returns_the_null_move() {
    // Stalemate: the search has nothing to pick.
    let mut board = Board::from_str("k7/2Q5/8/8/8/8/8/K7 b - - 0 1").unwrap();
    let mut engine = MctsEngine::new();
    assert!(engine.search(&mut board, 100).is_none());
}

#[test]
fn board_is_restored_after_a_search() {
    let mut board = Board::new();
    let fen_before = board.to_fen();
    let hash_before = board.hash;
    let undo_before = board.undo_depth();

    let mut engine = MctsEngine::new();
    engine.set_seed(99);
    let _ = engine.search(&mut board, 150);

    assert_eq!(board.to_fen(), fen_before);
    assert_eq!(board.hash, hash_before);
    assert_eq!(board.undo_depth(), undo_before);
}

#[test]
fn mcts_finds_mate_in_one() {
    // Ra8# wins every rollout that tries it, so its visit count runs away
    // from the noisy alternatives.
    let fen = "6k1/5ppp/8/8/8/8/8/R3K3 w Q - 0 1";
    let mut board = Board::from_str(fen).unwrap();

    let mut engine = MctsEngine::new();
    engine.set_seed(1);
    let chosen = engine.search(&mut board, 2_000);
    assert_eq!(chosen.to_uci(), "a1a8", "expected the back-rank mate");
}
