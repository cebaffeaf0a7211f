//! UCI front-end for the pure-MCTS baseline engine.
//!
//! Simulation count comes from the `Simulations` option (default 800) or a
//! `go nodes N` override; `nodes 0` plays a uniformly random legal move.
//! The `Seed` option makes searches reproducible.

use outpost::board::Board;
use outpost::mcts::MctsEngine;
use outpost::moves::movegen::legal_moves;
use outpost::uci::{format_move, parse_move};
use std::io::{self, BufRead};
use std::str::FromStr;

fn main() {
    let mut board = Board::new();
    let mut engine = MctsEngine::new();
    let mut num_simulations: u32 = 800;
    let mut rng_state: u32 = 0x2545_F491;

    let stdin = io::stdin();
    for line in stdin.lock().lines() {
        let line = match line {
            Ok(l) => l.trim().to_string(),
            Err(_) => break,
        };
        if line.is_empty() {
            continue;
        }

        let parts: Vec<&str> = line.split_whitespace().collect();
        match parts[0] {
            "uci" => {
                println!("id name Outpost MCTS");
                println!("id author the Outpost authors");
                println!("option name Simulations type spin default 800 min 0 max 100000");
                println!("option name Seed type spin default 0 min 0 max 2147483647");
                println!("uciok");
            }
            "isready" => println!("readyok"),
            "ucinewgame" => board = Board::new(),
            "setoption" => {
                if let Some(value_idx) = parts.iter().position(|&p| p == "value") {
                    let value = parts.get(value_idx + 1).copied().unwrap_or("");
                    if parts.contains(&"Simulations") {
                        num_simulations = value.parse().unwrap_or(800);
                    } else if parts.contains(&"Seed") {
                        let seed = value.parse().unwrap_or(0);
                        engine.set_seed(seed);
                        rng_state = seed | 1;
                    }
                }
            }
            "position" => {
                if let Some(new_board) = handle_position(&parts) {
                    board = new_board;
                }
            }
            "go" => {
                let mut sims = num_simulations;
                if let Some(nodes_idx) = parts.iter().position(|&p| p == "nodes") {
                    sims = parts
                        .get(nodes_idx + 1)
                        .and_then(|s| s.parse().ok())
                        .unwrap_or(sims);
                }

                let best = if sims == 0 {
                    random_legal_move(&mut board, &mut rng_state)
                } else {
                    engine.search(&mut board, sims)
                };

                println!("bestmove {}", format_move(best));
            }
            "fen" => println!("{}", board.to_fen()),
            "d" | "display" => print!("{}", board.ascii()),
            "quit" => break,
            _ => {}
        }
    }
}

fn handle_position(parts: &[&str]) -> Option<Board> {
    let mut board = if parts.len() > 1 && parts[1] == "fen" {
        let fen_end = parts
            .iter()
            .position(|&p| p == "moves")
            .unwrap_or(parts.len());
        Board::from_str(&parts[2..fen_end].join(" ")).ok()?
    } else {
        Board::new()
    };

    if let Some(moves_idx) = parts.iter().position(|&p| p == "moves") {
        for move_str in &parts[moves_idx + 1..] {
            match parse_move(&mut board, move_str) {
                Some(mv) if board.make_move(mv) => {}
                _ => {
                    eprintln!("Invalid move: {}", move_str);
                    return None;
                }
            }
        }
    }

    Some(board)
}

fn xorshift32(state: &mut u32) -> u32 {
    let mut x = *state;
    x ^= x << 13;
    x ^= x >> 17;
    x ^= x << 5;
    *state = x;
    x
}

/// Uniform random choice among the legal moves.
fn random_legal_move(board: &mut Board, rng_state: &mut u32) -> outpost::moves::types::Move {
    let legal = legal_moves(board);
    if legal.is_empty() {
        return outpost::moves::types::Move::NONE;
    }
    legal[(xorshift32(rng_state) % legal.len() as u32) as usize]
}
