use crate::hash::HashKey;
use once_cell::sync::OnceCell;
use rand::{rngs::StdRng, RngCore, SeedableRng};

/// Fixed seed: keys are stable across runs, so hashes (and anything seeded
/// from them, like a reproducible MCTS search) replay identically.
const ZOBRIST_SEED: u64 = 0x9E37_79B9_AAAC_5C87;

pub struct ZobristKeys {
    /// `[color][piece_kind][0x88 square]` with {White=0, Black=1} and
    /// piece kinds 1..=6 (row 0 unused, matching the packed-piece encoding).
    pub piece: [[[HashKey; 128]; 7]; 2],
    /// XOR'd in when Black is to move.
    pub side: HashKey,
    /// Indexed directly by the castle-rights nibble.
    pub castle: [HashKey; 16],
    /// Indexed by en-passant file a..h => 0..7.
    pub ep_file: [HashKey; 8],
}

/// Global keys, generated on first use.
pub fn zobrist_keys() -> &'static ZobristKeys {
    static KEYS: OnceCell<ZobristKeys> = OnceCell::new();
    KEYS.get_or_init(|| generate_keys(StdRng::seed_from_u64(ZOBRIST_SEED)))
}

fn generate_keys(mut rng: StdRng) -> ZobristKeys {
    #[inline]
    fn non_zero(r: &mut StdRng) -> HashKey {
        // avoid zero keys to reduce degenerate collisions
        let mut v = r.next_u32();
        while v == 0 {
            v = r.next_u32();
        }
        v
    }

    let mut keys = ZobristKeys {
        piece: [[[0; 128]; 7]; 2],
        side: 0,
        castle: [0; 16],
        ep_file: [0; 8],
    };

    for color in 0..2 {
        for kind in 1..7 {
            for sq in 0..128 {
                keys.piece[color][kind][sq] = non_zero(&mut rng);
            }
        }
    }
    for rights in 0..16 {
        keys.castle[rights] = non_zero(&mut rng);
    }
    for f in 0..8 {
        keys.ep_file[f] = non_zero(&mut rng);
    }
    keys.side = non_zero(&mut rng);

    keys
}
