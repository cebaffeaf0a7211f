//! Search behavior: mate finding, mate-score ordering, draw handling and
//! the iterative-deepening result contract.

use outpost::board::Board;
use outpost::search::tt::TranspositionTable;
use outpost::search::{is_mate_score, search_position, SearchResult, SCORE_MATE};
use outpost::square;
use std::str::FromStr;

fn search_fen(fen: &str, depth: u8) -> SearchResult {
    let mut board = Board::from_str(fen).expect("valid FEN");
    let mut tt = TranspositionTable::new();
    search_position(&mut board, &mut tt, depth, 0)
}

#[test]
fn finds_scholars_mate() {
    let result = search_fen(
        "r1bqkb1r/pppp1ppp/2n2n2/4p2Q/2B1P3/8/PPPP1PPP/RNB1K1NR w KQkq - 4 4",
        3,
    );
    assert_eq!(result.best_move.from, square::make(4, 7), "expected Qh5xf7#");
    assert_eq!(result.best_move.to, square::make(6, 5));
    assert!(is_mate_score(result.score) && result.score > 0);
    assert_eq!(result.score, SCORE_MATE - 1);
}

#[test]
fn finds_back_rank_mate() {
    let result = search_fen("6k1/5ppp/8/8/8/8/8/R3K3 w Q - 0 1", 3);
    assert_eq!(result.best_move.from, square::make(0, 0), "expected Ra1-a8#");
    assert_eq!(result.best_move.to, square::make(7, 0));
    assert!(is_mate_score(result.score) && result.score > 0);
}

#[test]
fn finds_queen_mate_in_two() {
    // No mate in one exists (the b6 king blocks its own queen's b-file),
    // but several two-movers do, e.g. 1.Qa2+ Kb8 2.Qg8#. The backed-up
    // score pins the distance even though the first move is not unique.
    let result = search_fen("k7/8/1K6/8/8/8/8/1Q6 w - - 0 1", 3);
    assert_eq!(result.score, SCORE_MATE - 3);
    assert!(!result.best_move.is_none());
}

#[test]
fn krr_vs_k_is_mate_for_white() {
    let result = search_fen("k7/8/1K6/8/8/8/8/R6R w - - 0 1", 4);
    assert!(
        is_mate_score(result.score) && result.score > 0,
        "expected a winning mate score, got {}",
        result.score
    );
}

#[test]
fn krr_vs_k_is_lost_for_black() {
    let result = search_fen("k7/8/1K6/8/8/8/8/R6R b - - 0 1", 4);
    assert!(
        is_mate_score(result.score) && result.score < 0,
        "expected a losing mate score, got {}",
        result.score
    );
}

#[test]
fn shorter_mates_score_strictly_better() {
    // Mate in one backs up as SCORE_MATE - 1; getting mated in two plies
    // backs up as -(SCORE_MATE - 2). The nearer mate always carries the
    // larger magnitude.
    let mate_in_one = search_fen("6k1/5ppp/8/8/8/8/8/R3K3 w Q - 0 1", 4);
    let mated_in_two = search_fen("k7/8/1K6/8/8/8/8/R6R b - - 0 1", 4);

    assert_eq!(mate_in_one.score, SCORE_MATE - 1);
    assert_eq!(mated_in_two.score, -(SCORE_MATE - 2));
    assert!(mate_in_one.score > -mated_in_two.score);
}

#[test]
fn no_mate_in_quiet_position() {
    let result = search_fen(
        "r1bqkb1r/pppp1ppp/2n2n2/4p3/2B1P3/5N2/PPPP1PPP/RNBQ1RK1 b kq - 0 1",
        2,
    );
    assert!(!is_mate_score(result.score));
    assert!(!result.best_move.is_none());
}

#[test]
fn stalemate_position_returns_no_move() {
    let result = search_fen("k7/2Q5/8/8/8/8/8/K7 b - - 0 1", 3);
    assert!(result.best_move.is_none());
    assert_eq!(result.score, 0);
}

#[test]
fn result_reports_completed_depth_and_nodes() {
    let result = search_fen("rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1", 4);
    assert_eq!(result.depth, 4);
    assert!(result.nodes > 0);
    assert!(!result.best_move.is_none());
}

#[test]
fn timed_search_returns_a_completed_iteration() {
    let mut board = Board::new();
    let mut tt = TranspositionTable::new();
    // Even with a tiny budget, depth 1 completes before the first clock
    // poll can fire, so a best move is always available.
    let result = search_position(&mut board, &mut tt, 30, 50);
    assert!(!result.best_move.is_none());
    assert!(result.depth >= 1);
}

#[test]
fn repetition_is_scored_as_draw() {
    // Shuffle a rook back and forth until the third occurrence is one ply
    // away; the search must see the draw coming.
    let mut board = Board::from_str("7k/8/8/8/8/8/R7/K7 w - - 0 1").unwrap();
    let mut tt = TranspositionTable::new();

    for mv in ["a2b2", "h8g8", "b2a2", "g8h8", "a2b2", "h8g8", "b2a2"] {
        let m = outpost::uci::parse_move(&mut board, mv).unwrap();
        assert!(board.make_move(m));
    }
    // Black to move; ...g8h8 would repeat the position a third time. The
    // position is hopeless for Black, so the draw is its best score.
    let result = search_position(&mut board, &mut tt, 4, 0);
    assert_eq!(result.score, 0);
    assert_eq!(result.best_move.to_uci(), "g8h8");
}
