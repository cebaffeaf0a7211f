pub mod eval;
pub mod ordering;
pub mod search;
pub mod tt;

pub use search::{search_position, SearchResult};

pub const SCORE_INFINITY: i16 = 30000;
pub const SCORE_MATE: i16 = 29000;
pub const SCORE_DRAW: i16 = 0;

/// Scores within 100 of the mate bound encode a forced mate; the exact
/// value carries the distance to mate relative to a reference ply.
#[inline]
pub fn is_mate_score(score: i16) -> bool {
    score > SCORE_MATE - 100 || score < -SCORE_MATE + 100
}
