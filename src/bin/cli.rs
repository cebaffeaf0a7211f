use outpost::board::{Board, Color, MAX_PLY};
use outpost::search::search_position;
use outpost::search::tt::TranspositionTable;
use outpost::uci::{format_move, parse_move};
use std::io::{self, BufRead};
use std::str::FromStr;

fn main() {
    let mut board = Board::new();
    let mut tt = TranspositionTable::new();

    // Main UCI loop
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
            "uci" => handle_uci(),
            "isready" => println!("readyok"),
            "ucinewgame" => {
                board = Board::new();
                tt.clear();
            }
            "position" => {
                if let Some(new_board) = handle_position(&parts) {
                    board = new_board;
                }
            }
            "go" => handle_go(&parts, &mut board, &mut tt),
            "fen" => println!("{}", board.to_fen()),
            "d" | "display" => print!("{}", board.ascii()),
            "quit" => break,
            _ => {}
        }
    }
}

fn handle_uci() {
    println!("id name Outpost 1.0");
    println!("id author the Outpost authors");
    println!("uciok");
}

fn handle_position(parts: &[&str]) -> Option<Board> {
    let mut board = if parts.len() > 1 && parts[1] == "fen" {
        let fen_start = 2;
        let fen_end = parts
            .iter()
            .position(|&p| p == "moves")
            .unwrap_or(parts.len());
        let fen_string = parts[fen_start..fen_end].join(" ");
        Board::from_str(&fen_string).ok()?
    } else {
        Board::new()
    };

    if let Some(moves_idx) = parts.iter().position(|&p| p == "moves") {
        for move_str in &parts[moves_idx + 1..] {
            match parse_move(&mut board, move_str) {
                Some(mv) => {
                    if !board.make_move(mv) {
                        eprintln!("Illegal move: {}", move_str);
                        return None;
                    }
                }
                None => {
                    eprintln!("Invalid move: {}", move_str);
                    return None;
                }
            }
        }
    }

    Some(board)
}

fn handle_go(parts: &[&str], board: &mut Board, tt: &mut TranspositionTable) {
    let depth_cap = (MAX_PLY - 4) as u8;
    let mut max_depth: u8 = 20;
    let mut max_time: u32 = 0;

    let mut wtime: Option<i64> = None;
    let mut btime: Option<i64> = None;
    let mut winc: i64 = 0;
    let mut binc: i64 = 0;
    let mut movetime: u32 = 0;

    let mut i = 1;
    while i < parts.len() {
        let arg = |idx: usize| parts.get(idx).copied().unwrap_or("");
        match parts[i] {
            "depth" => {
                max_depth = arg(i + 1).parse().unwrap_or(20).min(depth_cap);
                i += 2;
            }
            "movetime" => {
                movetime = arg(i + 1).parse().unwrap_or(0);
                i += 2;
            }
            "wtime" => {
                wtime = arg(i + 1).parse().ok();
                i += 2;
            }
            "btime" => {
                btime = arg(i + 1).parse().ok();
                i += 2;
            }
            "winc" => {
                winc = arg(i + 1).parse().unwrap_or(0);
                i += 2;
            }
            "binc" => {
                binc = arg(i + 1).parse().unwrap_or(0);
                i += 2;
            }
            "infinite" => {
                max_depth = depth_cap;
                max_time = 0;
                i += 1;
            }
            _ => i += 1,
        }
    }

    if movetime > 0 {
        max_time = movetime;
    } else if wtime.is_some() || btime.is_some() {
        // Budget about 1/30 of the remaining clock plus half the increment,
        // and never the whole clock.
        let (our_time, our_inc) = if board.side == Color::White {
            (wtime.unwrap_or(-1), winc)
        } else {
            (btime.unwrap_or(-1), binc)
        };
        if our_time > 0 {
            let mut alloc = our_time / 30 + our_inc / 2;
            if alloc > our_time - 100 {
                alloc = if our_time > 200 { our_time - 100 } else { 100 };
            }
            max_time = alloc.max(1) as u32;
        } else {
            max_time = 1000;
        }
    }

    let result = search_position(board, tt, max_depth, max_time);
    println!("bestmove {}", format_move(result.best_move));
}
