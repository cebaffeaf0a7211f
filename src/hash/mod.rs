pub mod zobrist;

/// Position hash width. 32 bits on unconstrained hosts; every consumer
/// treats it as an opaque integer, so widening is a one-line change.
pub type HashKey = u32;
