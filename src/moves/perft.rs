//! Perft: exhaustive legal-move leaf counts, the cross-validation standard
//! for the generator + make/unmake pipeline.

use crate::board::{Board, MAX_PLY};
use crate::moves::movegen::generate_moves;
use tracing::{debug, instrument};

fn perft_recursive(board: &mut Board, depth: u8, ply: usize) -> u64 {
    if depth == 0 {
        return 1;
    }

    let num_moves = generate_moves(board, ply);
    let base = board.move_buf_idx[ply] as usize;
    let mut nodes = 0;

    for i in 0..num_moves as usize {
        let m = board.move_buf[base + i];
        if board.make_move(m) {
            nodes += perft_recursive(board, depth - 1, ply + 1);
            board.unmake_move(m);
        }
    }

    nodes
}

/// Count legal leaves at `depth` from the current position.
#[instrument(skip(board))]
pub fn perft(board: &mut Board, depth: u8) -> u64 {
    assert!(
        (depth as usize) < MAX_PLY,
        "perft depth {depth} exceeds MAX_PLY"
    );
    perft_recursive(board, depth, 0)
}

/// Perft split by root move; each root move's subtree count is emitted as a
/// debug event. Returns the total.
#[instrument(skip(board))]
pub fn perft_divide(board: &mut Board, depth: u8) -> u64 {
    assert!(
        depth >= 1 && (depth as usize) < MAX_PLY,
        "perft_divide depth {depth} out of range"
    );

    let num_moves = generate_moves(board, 0);
    let base = board.move_buf_idx[0] as usize;
    let mut total = 0;

    debug!(depth, moves = num_moves, "divide: pseudo-legal root moves");

    for i in 0..num_moves as usize {
        let m = board.move_buf[base + i];
        if !board.make_move(m) {
            continue;
        }
        let count = perft_recursive(board, depth - 1, 1);
        board.unmake_move(m);
        debug!(mv = %m, count, "divide");
        total += count;
    }

    total
}
