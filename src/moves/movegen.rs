//! Pseudo-legal move generation.
//!
//! The generator writes into the board's flat move pool at the slot for the
//! requested ply; legality (own king left in check) is decided later by
//! trial-make in [`Board::make_move`]. A captures-only variant feeds the
//! quiescence search.

use crate::board::{
    make_piece, Board, Color, BISHOP, CASTLE_BK, CASTLE_BQ, CASTLE_WK, CASTLE_WQ, COLOR_MASK,
    EMPTY, KNIGHT, MAX_MOVES, MAX_PLY, MOVE_BUF_SIZE, PAWN, QUEEN, ROOK,
};
use crate::moves::types::{
    Move, MF_CAPTURE, MF_CASTLE, MF_EP, MF_NONE, MF_PAWNSTART, MF_PROMO_B, MF_PROMO_N, MF_PROMO_Q,
    MF_PROMO_R,
};
use crate::square::{
    self, SQ_B1, SQ_B8, SQ_C1, SQ_C8, SQ_D1, SQ_D8, SQ_E1, SQ_E8, SQ_F1, SQ_F8, SQ_G1, SQ_G8,
    SQ_NONE,
};
use crate::tables::{BISHOP_OFFSETS, KING_OFFSETS, KNIGHT_OFFSETS, ROOK_OFFSETS};

/// Append a move at the ply's slot. Moves past the pool capacity are
/// silently dropped; the pool is sized well beyond any bounded search.
fn add_move(board: &mut Board, ply: usize, count: u16, from: u8, to: u8, flags: u8) -> u16 {
    let idx = (board.move_buf_idx[ply] + count) as usize;
    if idx >= MOVE_BUF_SIZE {
        return count;
    }
    board.move_buf[idx] = Move::new(from, to, flags);
    count + 1
}

/// Promotions are emitted as four separate moves, queen first.
fn add_promotions(board: &mut Board, ply: usize, count: u16, from: u8, to: u8, capture: bool) -> u16 {
    let base = if capture { MF_CAPTURE } else { MF_NONE };
    let mut count = add_move(board, ply, count, from, to, base | MF_PROMO_Q);
    count = add_move(board, ply, count, from, to, base | MF_PROMO_R);
    count = add_move(board, ply, count, from, to, base | MF_PROMO_B);
    add_move(board, ply, count, from, to, base | MF_PROMO_N)
}

fn generate_pawn_moves(board: &mut Board, ply: usize, mut count: u16, captures_only: bool) -> u16 {
    let side = board.side;
    let our_pawn = make_piece(side, PAWN);
    let (forward, start_rank, promo_rank, cap_left, cap_right): (i8, u8, u8, i8, i8) =
        if side == Color::White {
            (16, 1, 7, 15, 17)
        } else {
            (-16, 6, 0, -17, -15)
        };
    let opp_mask = side.opposite().mask();

    for sq in 0..128u8 {
        if !square::valid(sq) || board.squares[sq as usize] != our_pawn {
            continue;
        }

        for delta in [cap_left, cap_right] {
            let target = square::offset(sq, delta);
            if square::valid(target) {
                let piece = board.squares[target as usize];
                if piece != EMPTY && piece & COLOR_MASK == opp_mask {
                    if square::rank(target) == promo_rank {
                        count = add_promotions(board, ply, count, sq, target, true);
                    } else {
                        count = add_move(board, ply, count, sq, target, MF_CAPTURE);
                    }
                }
            }
        }

        if board.ep_square != SQ_NONE {
            for delta in [cap_left, cap_right] {
                let target = square::offset(sq, delta);
                if target == board.ep_square {
                    count = add_move(board, ply, count, sq, target, MF_CAPTURE | MF_EP);
                }
            }
        }

        if captures_only {
            continue;
        }

        let target = square::offset(sq, forward);
        if square::valid(target) && board.squares[target as usize] == EMPTY {
            if square::rank(target) == promo_rank {
                count = add_promotions(board, ply, count, sq, target, false);
            } else {
                count = add_move(board, ply, count, sq, target, MF_NONE);

                if square::rank(sq) == start_rank {
                    let target2 = square::offset(target, forward);
                    if board.squares[target2 as usize] == EMPTY {
                        count = add_move(board, ply, count, sq, target2, MF_PAWNSTART);
                    }
                }
            }
        }
    }
    count
}

fn generate_knight_moves(board: &mut Board, ply: usize, mut count: u16, captures_only: bool) -> u16 {
    let side = board.side;
    let our_knight = make_piece(side, KNIGHT);
    let our_mask = side.mask();

    for sq in 0..128u8 {
        if !square::valid(sq) || board.squares[sq as usize] != our_knight {
            continue;
        }
        for &delta in &KNIGHT_OFFSETS {
            let target = square::offset(sq, delta);
            if !square::valid(target) {
                continue;
            }
            let piece = board.squares[target as usize];
            if piece != EMPTY && piece & COLOR_MASK == our_mask {
                continue;
            }
            if piece != EMPTY {
                count = add_move(board, ply, count, sq, target, MF_CAPTURE);
            } else if !captures_only {
                count = add_move(board, ply, count, sq, target, MF_NONE);
            }
        }
    }
    count
}

fn generate_sliding_moves(
    board: &mut Board,
    ply: usize,
    mut count: u16,
    dirs: &[i8],
    kind: u8,
    captures_only: bool,
) -> u16 {
    let side = board.side;
    let our_piece = make_piece(side, kind);
    let our_mask = side.mask();

    for sq in 0..128u8 {
        if !square::valid(sq) || board.squares[sq as usize] != our_piece {
            continue;
        }
        for &delta in dirs {
            let mut target = square::offset(sq, delta);
            while square::valid(target) {
                let piece = board.squares[target as usize];
                if piece != EMPTY {
                    if piece & COLOR_MASK != our_mask {
                        count = add_move(board, ply, count, sq, target, MF_CAPTURE);
                    }
                    break;
                }
                if !captures_only {
                    count = add_move(board, ply, count, sq, target, MF_NONE);
                }
                target = square::offset(target, delta);
            }
        }
    }
    count
}

fn generate_king_moves(board: &mut Board, ply: usize, mut count: u16, captures_only: bool) -> u16 {
    let side = board.side;
    let sq = board.king_sq[side as usize];
    let our_mask = side.mask();

    for &delta in &KING_OFFSETS {
        let target = square::offset(sq, delta);
        if !square::valid(target) {
            continue;
        }
        let piece = board.squares[target as usize];
        if piece != EMPTY && piece & COLOR_MASK == our_mask {
            continue;
        }
        if piece != EMPTY {
            count = add_move(board, ply, count, sq, target, MF_CAPTURE);
        } else if !captures_only {
            count = add_move(board, ply, count, sq, target, MF_NONE);
        }
    }

    if captures_only {
        return count;
    }

    // Castling: rights intact, path clear, and the king's origin, transit
    // and destination squares all unattacked.
    let opp = side.opposite();
    if side == Color::White {
        if board.castle_rights & CASTLE_WK != 0
            && board.squares[SQ_F1 as usize] == EMPTY
            && board.squares[SQ_G1 as usize] == EMPTY
            && !board.is_square_attacked(SQ_E1, opp)
            && !board.is_square_attacked(SQ_F1, opp)
            && !board.is_square_attacked(SQ_G1, opp)
        {
            count = add_move(board, ply, count, SQ_E1, SQ_G1, MF_CASTLE);
        }
        if board.castle_rights & CASTLE_WQ != 0
            && board.squares[SQ_D1 as usize] == EMPTY
            && board.squares[SQ_C1 as usize] == EMPTY
            && board.squares[SQ_B1 as usize] == EMPTY
            && !board.is_square_attacked(SQ_E1, opp)
            && !board.is_square_attacked(SQ_D1, opp)
            && !board.is_square_attacked(SQ_C1, opp)
        {
            count = add_move(board, ply, count, SQ_E1, SQ_C1, MF_CASTLE);
        }
    } else {
        if board.castle_rights & CASTLE_BK != 0
            && board.squares[SQ_F8 as usize] == EMPTY
            && board.squares[SQ_G8 as usize] == EMPTY
            && !board.is_square_attacked(SQ_E8, opp)
            && !board.is_square_attacked(SQ_F8, opp)
            && !board.is_square_attacked(SQ_G8, opp)
        {
            count = add_move(board, ply, count, SQ_E8, SQ_G8, MF_CASTLE);
        }
        if board.castle_rights & CASTLE_BQ != 0
            && board.squares[SQ_D8 as usize] == EMPTY
            && board.squares[SQ_C8 as usize] == EMPTY
            && board.squares[SQ_B8 as usize] == EMPTY
            && !board.is_square_attacked(SQ_E8, opp)
            && !board.is_square_attacked(SQ_D8, opp)
            && !board.is_square_attacked(SQ_C8, opp)
        {
            count = add_move(board, ply, count, SQ_E8, SQ_C8, MF_CASTLE);
        }
    }

    count
}

/// Generate all pseudo-legal moves for the side to move into the ply's
/// buffer slot. Returns the move count and sets the next ply's start index.
pub fn generate_moves(board: &mut Board, ply: usize) -> u16 {
    if ply == 0 {
        board.move_buf_idx[0] = 0;
    }

    let mut count = generate_pawn_moves(board, ply, 0, false);
    count = generate_knight_moves(board, ply, count, false);
    count = generate_sliding_moves(board, ply, count, &BISHOP_OFFSETS, BISHOP, false);
    count = generate_sliding_moves(board, ply, count, &ROOK_OFFSETS, ROOK, false);
    // The queen reuses the king's eight directions.
    count = generate_sliding_moves(board, ply, count, &KING_OFFSETS, QUEEN, false);
    count = generate_king_moves(board, ply, count, false);

    board.move_buf_idx[ply + 1] = board.move_buf_idx[ply] + count;
    count
}

/// Captures-only variant (plus promotions via the pawn pass) used by the
/// quiescence search.
pub fn generate_captures(board: &mut Board, ply: usize) -> u16 {
    if ply == 0 {
        board.move_buf_idx[0] = 0;
    }

    let mut count = generate_pawn_moves(board, ply, 0, true);
    count = generate_knight_moves(board, ply, count, true);
    count = generate_sliding_moves(board, ply, count, &BISHOP_OFFSETS, BISHOP, true);
    count = generate_sliding_moves(board, ply, count, &ROOK_OFFSETS, ROOK, true);
    count = generate_sliding_moves(board, ply, count, &KING_OFFSETS, QUEEN, true);
    count = generate_king_moves(board, ply, count, true);

    board.move_buf_idx[ply + 1] = board.move_buf_idx[ply] + count;
    count
}

/// Collect the legal moves for the side to move, filtered by trial-make.
/// Convenience for front-ends and tests; the search iterates the ply
/// buffers directly.
pub fn legal_moves(board: &mut Board) -> Vec<Move> {
    let ply = MAX_PLY - 2;
    board.move_buf_idx[ply] = (MOVE_BUF_SIZE - MAX_MOVES) as u16;

    let num_moves = generate_moves(board, ply);
    let base = board.move_buf_idx[ply] as usize;
    let mut out = Vec::with_capacity(num_moves as usize);

    for i in 0..num_moves as usize {
        let m = board.move_buf[base + i];
        if board.make_move(m) {
            board.unmake_move(m);
            out.push(m);
        }
    }
    out
}

/// Does the side to move have at least one legal move? Uses a high ply slot
/// with a reserved buffer tail so an in-flight search is never disturbed.
pub fn has_legal_move(board: &mut Board) -> bool {
    let ply = MAX_PLY - 2;
    board.move_buf_idx[ply] = (MOVE_BUF_SIZE - MAX_MOVES) as u16;

    let num_moves = generate_moves(board, ply);
    let base = board.move_buf_idx[ply] as usize;

    for i in 0..num_moves as usize {
        let m = board.move_buf[base + i];
        if board.make_move(m) {
            board.unmake_move(m);
            return true;
        }
    }
    false
}
