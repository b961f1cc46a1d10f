//! Two-player chess rules engine on a mailbox board.
//!
//! This crate provides:
//! - [`Board`] - 8×8 grid of piece ids plus the pieces themselves
//! - [`Piece`] - a piece instance with its cached reachable squares
//! - [`Player`] - the per-side list of piece ids
//! - [`Game`] - turn control, move submission and status reporting
//! - [`legality`] - simulate-then-restore king safety checks
//!
//! # Architecture
//!
//! Each piece caches the squares it can reach. Before a move is accepted
//! the caches are recomputed from the board, and the move is then played
//! for real and undone again if it would leave the mover's king attacked.
//! Double pawn pushes leave an en passant marker on the skipped square: a
//! pseudo-piece that only enemy pawns can see and capture.
//!
//! # Example
//!
//! ```
//! use chess_core::Color;
//! use chess_engine::{Game, Status};
//!
//! let mut game = Game::new();
//! game.submit_move(Color::White, "e2", "e4").unwrap();
//! let report = game.submit_move(Color::Black, "e7", "e5").unwrap();
//! assert_eq!(report.status, Status::Normal);
//! println!("Position after 1.e4 e5: {}", game.to_fen());
//! ```

mod board;
mod game;
pub mod legality;
mod piece;
mod player;
pub mod render;

pub use board::{Board, BoardError};
pub use game::{Attacker, Game, MoveError, MoveReport, Status};
pub use piece::{Piece, PieceId, Reach, Role};
pub use player::Player;
pub use render::Cell;
