//! FEN parsing and emission.
//!
//! Parsing is best-effort: the board is rebuilt field by field and an error
//! may leave a partially filled position behind. Callers that need to keep
//! the previous state parse into a fresh `Board` and swap on success.

use super::{
    make_piece, piece_color, piece_kind, pst_value, Board, Color, BISHOP, CASTLE_BK, CASTLE_BQ,
    CASTLE_WK, CASTLE_WQ, EMPTY, KING, KNIGHT, MAX_PLY, PAWN, QUEEN, ROOK,
};
use crate::square::{self, SQ_NONE};
use crate::tables::MATERIAL_VALUE;

fn char_to_piece(c: char) -> Option<u8> {
    let kind = match c.to_ascii_uppercase() {
        'P' => PAWN,
        'N' => KNIGHT,
        'B' => BISHOP,
        'R' => ROOK,
        'Q' => QUEEN,
        'K' => KING,
        _ => return None,
    };
    let color = if c.is_ascii_uppercase() {
        Color::White
    } else {
        Color::Black
    };
    Some(make_piece(color, kind))
}

fn piece_to_char(piece: u8) -> char {
    const CHARS: &[u8; 7] = b".PNBRQK";
    let ch = CHARS[piece_kind(piece) as usize];
    if piece_color(piece) == Color::Black {
        ch.to_ascii_lowercase() as char
    } else {
        ch as char
    }
}

impl Board {
    /// Parse a six-field FEN. Missing trailing fields default to
    /// halfmove 0 / fullmove 1. Rebuilds material, PST, king squares and
    /// hash from scratch and clears the undo stack and hash history.
    pub fn set_fen(&mut self, fen: &str) -> Result<(), String> {
        self.squares = [EMPTY; 128];
        self.side = Color::White;
        self.castle_rights = 0;
        self.ep_square = SQ_NONE;
        self.fifty_clock = 0;
        self.ply = 0;
        self.hash = 0;
        self.king_sq = [0; 2];
        self.material = [0; 2];
        self.pst_score = [0; 2];
        self.undo_stack.clear();
        self.hash_history.clear();
        self.move_buf_idx = [0; MAX_PLY + 1];

        let mut fields = fen.split_whitespace();

        let placement = fields.next().ok_or_else(|| "empty FEN".to_string())?;
        let mut rank: u8 = 7;
        let mut file: u8 = 0;
        for c in placement.chars() {
            match c {
                '/' => {
                    if rank == 0 {
                        return Err("too many ranks in piece placement".to_string());
                    }
                    rank -= 1;
                    file = 0;
                }
                '1'..='8' => {
                    file += c as u8 - b'0';
                    if file > 8 {
                        return Err(format!("rank {} overflows 8 files", rank + 1));
                    }
                }
                _ => {
                    let piece =
                        char_to_piece(c).ok_or_else(|| format!("bad piece character '{c}'"))?;
                    if file > 7 {
                        return Err(format!("rank {} overflows 8 files", rank + 1));
                    }
                    let sq = square::make(rank, file);
                    self.squares[sq as usize] = piece;
                    let color = piece_color(piece) as usize;
                    self.material[color] += MATERIAL_VALUE[piece_kind(piece) as usize];
                    self.pst_score[color] += pst_value(piece, sq);
                    if piece_kind(piece) == KING {
                        self.king_sq[color] = sq;
                    }
                    file += 1;
                }
            }
        }

        self.side = match fields.next() {
            Some("b") => Color::Black,
            _ => Color::White,
        };

        if let Some(castling) = fields.next() {
            for c in castling.chars() {
                match c {
                    'K' => self.castle_rights |= CASTLE_WK,
                    'Q' => self.castle_rights |= CASTLE_WQ,
                    'k' => self.castle_rights |= CASTLE_BK,
                    'q' => self.castle_rights |= CASTLE_BQ,
                    _ => {}
                }
            }
        }

        if let Some(ep) = fields.next() {
            if ep != "-" {
                let mut chars = ep.chars();
                match (chars.next(), chars.next()) {
                    (Some(f), Some(r)) => {
                        self.ep_square = square::from_chars(f, r)
                            .ok_or_else(|| format!("bad en passant square '{ep}'"))?;
                    }
                    _ => return Err(format!("bad en passant square '{ep}'")),
                }
            }
        }

        self.fifty_clock = fields
            .next()
            .and_then(|s| s.parse::<u16>().ok())
            .unwrap_or(0)
            .min(u8::MAX as u16) as u8;

        let fullmove: u16 = fields
            .next()
            .and_then(|s| s.parse().ok())
            .unwrap_or(1)
            .max(1);
        self.ply = (fullmove - 1) * 2 + self.side as u16;

        self.hash = self.compute_hash_from_scratch();
        Ok(())
    }

    /// Emit the six-field FEN for the current position. Re-parsing the
    /// result reproduces the state exactly.
    pub fn to_fen(&self) -> String {
        let mut out = String::new();

        for rank in (0..8).rev() {
            let mut empty = 0;
            for file in 0..8 {
                let piece = self.squares[square::make(rank, file) as usize];
                if piece == EMPTY {
                    empty += 1;
                } else {
                    if empty > 0 {
                        out.push((b'0' + empty) as char);
                        empty = 0;
                    }
                    out.push(piece_to_char(piece));
                }
            }
            if empty > 0 {
                out.push((b'0' + empty) as char);
            }
            if rank > 0 {
                out.push('/');
            }
        }

        out.push(' ');
        out.push(if self.side == Color::White { 'w' } else { 'b' });
        out.push(' ');

        if self.castle_rights == 0 {
            out.push('-');
        } else {
            if self.castle_rights & CASTLE_WK != 0 {
                out.push('K');
            }
            if self.castle_rights & CASTLE_WQ != 0 {
                out.push('Q');
            }
            if self.castle_rights & CASTLE_BK != 0 {
                out.push('k');
            }
            if self.castle_rights & CASTLE_BQ != 0 {
                out.push('q');
            }
        }

        out.push(' ');
        if self.ep_square == SQ_NONE {
            out.push('-');
        } else {
            out.push_str(&square::to_str(self.ep_square));
        }

        out.push_str(&format!(" {} {}", self.fifty_clock, self.ply / 2 + 1));
        out
    }
}
