//! Core types for chess.
//!
//! This crate provides the fundamental types used by the engine:
//! - [`PieceKind`] and [`Color`] for piece representation
//! - [`Square`] and the [`to_label`]/[`from_label`] coordinate mapping
//! - [`Move`] as a plain origin/destination pair
//! - [`Layout`] parsing from FEN text

mod color;
mod fen;
mod mov;
mod piece;
mod square;

pub use color::Color;
pub use fen::{FenError, FenParser, Layout};
pub use mov::Move;
pub use piece::PieceKind;
pub use square::{from_label, to_label, CoordinateError, Square};
