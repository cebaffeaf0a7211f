//! Move ordering: score assignment plus a one-element-at-a-time selection
//! sort driven by the search loop.
//!
//! Scores live in the move's scratch byte:
//!
//! | band    | moves                                   |
//! |---------|-----------------------------------------|
//! | 255     | PV / hash move                          |
//! | 200+    | captures, MVV-LVA                       |
//! | 190+    | non-capturing promotions                |
//! | 150/140 | killer slots 0 and 1                    |
//! | 0       | everything else                         |

use crate::board::{piece_kind, Board, MAX_PLY, PAWN};
use crate::moves::types::{Move, MF_CAPTURE, MF_EP, MF_PROMO};
use crate::tables::MVV_LVA;

/// Two quiet moves per ply that caused a beta cutoff, remembered across
/// sibling branches.
pub struct Killers {
    slots: [[Move; 2]; MAX_PLY],
}

impl Killers {
    pub fn new() -> Self {
        Killers {
            slots: [[Move::NONE; 2]; MAX_PLY],
        }
    }

    pub fn clear(&mut self) {
        self.slots = [[Move::NONE; 2]; MAX_PLY];
    }

    /// Record a quiet cutoff move: slot 0 shifts to slot 1 unless the move
    /// already occupies slot 0. Captures are never stored.
    pub fn update(&mut self, ply: usize, m: Move) {
        if ply >= MAX_PLY || m.flags & MF_CAPTURE != 0 {
            return;
        }
        if !m.same_move(self.slots[ply][0]) {
            self.slots[ply][1] = self.slots[ply][0];
            self.slots[ply][0] = m;
        }
    }

    #[inline]
    pub fn slot(&self, ply: usize, which: usize) -> Move {
        self.slots[ply][which]
    }
}

impl Default for Killers {
    fn default() -> Self {
        Self::new()
    }
}

/// Assign ordering scores to the ply's generated moves.
pub fn score_moves(
    board: &mut Board,
    ply: usize,
    num_moves: u16,
    pv_move: Option<Move>,
    killers: &Killers,
) {
    let base = board.move_buf_idx[ply] as usize;

    for i in 0..num_moves as usize {
        let m = board.move_buf[base + i];

        if let Some(pv) = pv_move {
            if m.same_move(pv) {
                board.move_buf[base + i].score = 255;
                continue;
            }
        }

        if m.flags & MF_CAPTURE != 0 {
            let victim = if m.flags & MF_EP != 0 {
                PAWN
            } else {
                piece_kind(board.squares[m.to as usize])
            };
            let attacker = piece_kind(board.squares[m.from as usize]);
            board.move_buf[base + i].score =
                200 + MVV_LVA[victim as usize][attacker as usize];
            continue;
        }

        if m.flags & MF_PROMO != 0 {
            board.move_buf[base + i].score = 190 + m.promo_kind();
            continue;
        }

        if ply < MAX_PLY {
            if m.same_move(killers.slot(ply, 0)) {
                board.move_buf[base + i].score = 150;
                continue;
            }
            if m.same_move(killers.slot(ply, 1)) {
                board.move_buf[base + i].score = 140;
                continue;
            }
        }

        board.move_buf[base + i].score = 0;
    }
}

/// Swap the best-scored remaining move into position `idx`. The search
/// calls this once per iteration instead of sorting up front, so a fast
/// beta cutoff never pays for ordering moves it will not visit.
pub fn pick_best(board: &mut Board, ply: usize, idx: u16, num_moves: u16) {
    let base = board.move_buf_idx[ply] as usize;
    let mut best_i = idx as usize;
    let mut best_score = board.move_buf[base + best_i].score;

    for i in (idx as usize + 1)..num_moves as usize {
        if board.move_buf[base + i].score > best_score {
            best_score = board.move_buf[base + i].score;
            best_i = i;
        }
    }

    if best_i != idx as usize {
        board.move_buf.swap(base + idx as usize, base + best_i);
    }
}
