//! Wire-format helpers shared by the UCI front-ends.
//!
//! A move on the wire is `<file><rank><file><rank>` with an optional
//! promotion letter. Parsing resolves the string against the generator's
//! output for the current position, so flags (capture, castle, en passant,
//! double push) are always filled in correctly.

use crate::board::Board;
use crate::moves::movegen::generate_moves;
use crate::moves::types::Move;
use crate::square;

/// Match a coordinate-notation move against the legal-move superset of the
/// current position. Returns `None` for garbage or a move the generator
/// does not produce. A promotion without a piece letter defaults to queen.
pub fn parse_move(board: &mut Board, s: &str) -> Option<Move> {
    let chars: Vec<char> = s.chars().collect();
    if chars.len() < 4 {
        return None;
    }

    let from = square::from_chars(chars[0], chars[1])?;
    let to = square::from_chars(chars[2], chars[3])?;

    let num_moves = generate_moves(board, 0);
    let base = board.move_buf_idx[0] as usize;

    for i in 0..num_moves as usize {
        let m = board.move_buf[base + i];
        if m.from != from || m.to != to {
            continue;
        }
        if m.is_promotion() {
            let promo_kind = match chars.get(4).copied() {
                Some('n') => 2,
                Some('b') => 3,
                Some('r') => 4,
                _ => 5,
            };
            if m.promo_kind() == promo_kind {
                return Some(m);
            }
            continue;
        }
        return Some(m);
    }
    None
}

/// Format a move for the wire; the null move renders as "0000".
pub fn format_move(m: Move) -> String {
    if m.is_none() {
        return "0000".to_string();
    }
    m.to_uci()
}
