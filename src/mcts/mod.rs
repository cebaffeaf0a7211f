//! Pure Monte-Carlo Tree Search, used as an Elo baseline.
//!
//! No evaluation function and no policy prior: UCT selection over a flat
//! node pool, uniformly random rollouts, visit-count move choice. The tree
//! walks the real board via make/unmake, and every simulation starts by
//! restoring a snapshot of the root position, so the search's own undo
//! stack is never unwound through.

use crate::board::{Board, Color, MAX_MOVES};
use crate::moves::movegen::generate_moves;
use crate::moves::types::Move;
use arrayvec::ArrayVec;
use tracing::debug;

pub const MCTS_MAX_NODES: usize = 100_000;
pub const MCTS_MAX_CHILDREN: usize = MAX_MOVES;
pub const MCTS_MAX_ROLLOUT_PLY: usize = 200;

/// Pool index sentinel (no parent / allocation failed).
const NODE_NONE: u32 = u32::MAX;

const DEFAULT_SEED: u32 = 98765;

struct MctsNode {
    /// Move that produced this node.
    mv: Move,
    visits: u32,
    /// Cumulative score from the perspective of the player who made `mv`.
    wins: f32,
    parent: u32,
    children: ArrayVec<u32, MCTS_MAX_CHILDREN>,
    /// Side to move at this node.
    side: Color,
    expanded: bool,
}

pub struct MctsEngine {
    pool: Vec<MctsNode>,
    rng_state: u32,
    exploration: f32,
    seed: u32,
}

impl MctsEngine {
    pub fn new() -> Self {
        MctsEngine {
            pool: Vec::new(),
            rng_state: DEFAULT_SEED,
            exploration: std::f32::consts::SQRT_2,
            seed: DEFAULT_SEED,
        }
    }

    /// Reseed the rollout PRNG. With the same seed, position and
    /// simulation count, the search replays identically.
    pub fn set_seed(&mut self, seed: u32) {
        self.seed = seed;
    }

    /// Exploration constant `C` in the UCT formula (default sqrt(2)).
    pub fn set_exploration(&mut self, c: f32) {
        self.exploration = c;
    }

    fn xorshift32(&mut self) -> u32 {
        let mut x = self.rng_state;
        x ^= x << 13;
        x ^= x >> 17;
        x ^= x << 5;
        self.rng_state = x;
        x
    }

    /// Claim a pool slot, or `NODE_NONE` when the pool is exhausted.
    fn alloc_node(&mut self, side: Color) -> u32 {
        if self.pool.len() >= MCTS_MAX_NODES {
            return NODE_NONE;
        }
        self.pool.push(MctsNode {
            mv: Move::NONE,
            visits: 0,
            wins: 0.0,
            parent: NODE_NONE,
            children: ArrayVec::new(),
            side,
            expanded: false,
        });
        (self.pool.len() - 1) as u32
    }

    /// UCT: exploitation plus `C * sqrt(ln(parent_visits) / visits)`.
    /// Unvisited children sort first.
    fn uct_value(&self, parent_visits: u32, child_idx: u32) -> f32 {
        let child = &self.pool[child_idx as usize];
        if child.visits == 0 {
            return 1e9;
        }
        let exploit = child.wins / child.visits as f32;
        let explore =
            self.exploration * ((parent_visits as f32).ln() / child.visits as f32).sqrt();
        exploit + explore
    }

    /// Descend by UCT until a leaf, applying each chosen move to the board.
    /// A child whose move turns out illegal is penalized and the walk stays
    /// at the current node for this simulation.
    fn select_leaf(&mut self, board: &mut Board, root: u32) -> u32 {
        let mut current = root;

        loop {
            let node = &self.pool[current as usize];
            if !node.expanded || node.children.is_empty() {
                return current;
            }

            let parent_visits = node.visits;
            let mut best_val = f32::NEG_INFINITY;
            let mut best_child = node.children[0];
            for &ci in node.children.iter() {
                let val = self.uct_value(parent_visits, ci);
                if val > best_val {
                    best_val = val;
                    best_child = ci;
                }
            }

            let mv = self.pool[best_child as usize].mv;
            if !board.make_move(mv) {
                let child = &mut self.pool[best_child as usize];
                child.visits += 1;
                child.wins -= 1.0;
                return current;
            }
            current = best_child;
        }
    }

    /// Generate the node's legal moves (by trial-make) and allocate a child
    /// for each, capped by `MCTS_MAX_CHILDREN` and pool exhaustion.
    fn expand(&mut self, board: &mut Board, node_idx: u32) {
        if self.pool[node_idx as usize].expanded {
            return;
        }
        self.pool[node_idx as usize].expanded = true;
        self.pool[node_idx as usize].side = board.side;

        let num_moves = generate_moves(board, 0);
        let base = board.move_buf_idx[0] as usize;
        let child_side = board.side.opposite();

        for i in 0..num_moves as usize {
            if self.pool[node_idx as usize].children.is_full() {
                break;
            }
            let m = board.move_buf[base + i];
            if !board.make_move(m) {
                continue;
            }
            board.unmake_move(m);

            let child_idx = self.alloc_node(child_side);
            if child_idx == NODE_NONE {
                break;
            }
            self.pool[child_idx as usize].mv = m;
            self.pool[child_idx as usize].parent = node_idx;
            self.pool[node_idx as usize].children.push(child_idx);
        }
    }

    /// Play uniformly random legal moves until mate, stalemate, a draw
    /// condition, or the ply cap. The result is from `result_side`'s
    /// perspective: 1.0 win, 0.0 loss, 0.5 draw. All rollout moves are
    /// undone before returning.
    fn rollout(&mut self, board: &mut Board, result_side: Color) -> f32 {
        let mut rollout_moves: ArrayVec<Move, MCTS_MAX_ROLLOUT_PLY> = ArrayVec::new();
        let mut result = 0.5;

        for _ in 0..MCTS_MAX_ROLLOUT_PLY {
            let num_moves = generate_moves(board, 0);
            let base = board.move_buf_idx[0] as usize;

            // Two passes: count the legal moves, then walk to the pick.
            let mut legal_count = 0u32;
            for j in 0..num_moves as usize {
                let m = board.move_buf[base + j];
                if board.make_move(m) {
                    board.unmake_move(m);
                    legal_count += 1;
                }
            }

            if legal_count == 0 {
                result = if board.in_check() {
                    // Checkmate: the side to move has lost.
                    if board.side == result_side {
                        0.0
                    } else {
                        1.0
                    }
                } else {
                    0.5
                };
                break;
            }

            let picked = self.xorshift32() % legal_count;
            let mut seen = 0u32;
            let mut found = false;
            for j in 0..num_moves as usize {
                let m = board.move_buf[base + j];
                if board.make_move(m) {
                    if seen == picked {
                        rollout_moves.push(m);
                        found = true;
                        break;
                    }
                    board.unmake_move(m);
                    seen += 1;
                }
            }
            if !found {
                break;
            }

            if board.fifty_clock >= 100 || board.is_repetition() {
                result = 0.5;
                break;
            }
        }

        while let Some(m) = rollout_moves.pop() {
            board.unmake_move(m);
        }

        result
    }

    /// Walk the parent chain adding `result` or its complement, depending
    /// on whether the ancestor's side-to-move matches the perspective the
    /// result was scored in.
    fn backpropagate(&mut self, node_idx: u32, result: f32, result_side: Color) {
        let mut current = node_idx;
        while current != NODE_NONE {
            let node = &mut self.pool[current as usize];
            node.visits += 1;
            // `wins` belongs to the player who made the move into this
            // node, the opponent of the side to move here, hence the flip.
            if node.side == result_side {
                node.wins += 1.0 - result;
            } else {
                node.wins += result;
            }
            current = node.parent;
        }
    }

    /// Run `num_simulations` simulations from the current position and
    /// return the most-visited root move. A single legal move is returned
    /// immediately; no legal move returns `Move::NONE`.
    pub fn search(&mut self, board: &mut Board, num_simulations: u32) -> Move {
        self.pool.clear();
        let root = self.alloc_node(board.side);
        if root == NODE_NONE {
            return Move::NONE;
        }

        // Deterministic for a given (seed, position, simulation count).
        self.rng_state = board.hash ^ num_simulations ^ self.seed;
        if self.rng_state == 0 {
            self.rng_state = DEFAULT_SEED;
        }

        let snapshot = board.clone();

        self.expand(board, root);

        if self.pool[root as usize].children.is_empty() {
            return Move::NONE;
        }
        if self.pool[root as usize].children.len() == 1 {
            let only = self.pool[root as usize].children[0];
            return self.pool[only as usize].mv;
        }

        for _ in 0..num_simulations {
            *board = snapshot.clone();

            let mut leaf = self.select_leaf(board, root);

            if !self.pool[leaf as usize].expanded {
                self.expand(board, leaf);
                if let Some(&first) = self.pool[leaf as usize].children.first() {
                    if !board.make_move(self.pool[first as usize].mv) {
                        // Filtered as legal during expansion; a failure here
                        // means the simulation is not worth scoring.
                        continue;
                    }
                    leaf = first;
                }
            }

            let result_side = board.side;
            let result = self.rollout(board, result_side);

            self.backpropagate(leaf, result, result_side);
        }

        *board = snapshot;

        let root_children = &self.pool[root as usize].children;
        let mut best_move = Move::NONE;
        let mut best_visits = 0u32;
        for &ci in root_children.iter() {
            let child = &self.pool[ci as usize];
            if child.visits > best_visits {
                best_visits = child.visits;
                best_move = child.mv;
            }
        }

        debug!(
            simulations = num_simulations,
            nodes = self.pool.len(),
            best = %best_move,
            visits = best_visits,
            "mcts search complete"
        );

        best_move
    }
}

impl Default for MctsEngine {
    fn default() -> Self {
        Self::new()
    }
}
