//! Turn-by-turn game control.
//!
//! The [`Game`] struct owns the board and both players and is the only
//! place moves are committed. Every submitted move goes through the same
//! pipeline:
//! - both labels are parsed
//! - the origin must hold a piece of the submitting side
//! - the destination must be in that piece's freshly computed reach
//! - the move is simulated and rejected if it leaves the king attacked
//!
//! Once committed, the turn passes to the other side: its expired en
//! passant markers are cleared and its status is recomputed.

use std::fmt;

use chess_core::{Color, CoordinateError, FenError, FenParser, Layout, Move, PieceKind, Square};
use thiserror::Error;

use crate::legality::{self, Snapshot};
use crate::piece::{Piece, PieceId, Role};
use crate::render::{self, Cell};
use crate::{Board, BoardError, Player};

/// Check and end-of-game state of one side.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Status {
    Normal,
    /// The king is attacked and at least one legal move exists.
    InCheck,
    /// The king is attacked and no legal move exists.
    Checkmate,
    /// The king is safe but no legal move exists.
    Stalemate,
}

impl Status {
    /// Returns true for checkmate and stalemate.
    pub fn is_game_over(self) -> bool {
        matches!(self, Status::Checkmate | Status::Stalemate)
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Status::Normal => write!(f, "normal"),
            Status::InCheck => write!(f, "check"),
            Status::Checkmate => write!(f, "checkmate"),
            Status::Stalemate => write!(f, "stalemate"),
        }
    }
}

/// A piece attacking a king.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Attacker {
    pub kind: PieceKind,
    pub color: Color,
    pub square: Square,
}

impl fmt::Display for Attacker {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} on {}", self.color, self.kind, self.square)
    }
}

fn list(attackers: &[Attacker]) -> String {
    attackers
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

/// Reasons a submitted move is refused.
///
/// A refused move leaves the game exactly as it was.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum MoveError {
    #[error(transparent)]
    InvalidSquare(#[from] CoordinateError),

    #[error("cannot find a piece of yours at {0}")]
    PieceNotFound(String),

    #[error("cannot move from {from} to {to}")]
    ImpossibleMove { from: String, to: String },

    #[error("move would leave the king in check from {}", list(.attackers))]
    DiscoveredCheck { attackers: Vec<Attacker> },

    #[error("it is {0}'s turn")]
    WrongTurn(Color),

    #[error("game has already ended")]
    GameOver,

    #[error(transparent)]
    Board(#[from] BoardError),
}

/// A committed move.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MoveReport {
    pub mv: Move,
    /// Pieces taken by the move and the squares they stood on.
    pub captured: Vec<(PieceKind, Square)>,
    /// Status of the side that moves next.
    pub status: Status,
}

/// A two-player game on one board.
#[derive(Debug, Clone)]
pub struct Game {
    board: Board,
    /// Indexed by [`Color::index`].
    players: [Player; 2],
    side_to_move: Color,
    /// Set once the side to move is found checkmated or stalemated.
    result: Option<Status>,
}

impl Default for Game {
    fn default() -> Self {
        Self::new()
    }
}

impl Game {
    /// Creates a game from the standard starting position.
    pub fn new() -> Self {
        Self::from_fen(FenParser::STARTPOS).expect("STARTPOS is valid")
    }

    /// Creates a game from a FEN string. Only the placement and active
    /// color fields are read.
    pub fn from_fen(fen: &str) -> Result<Self, FenError> {
        Ok(Self::from_layout(&FenParser::parse(fen)?))
    }

    pub fn from_layout(layout: &Layout) -> Self {
        let board = Board::from_layout(layout);
        let players = Color::ALL.map(|color| Player::from_board(color, &board));
        Game {
            board,
            players,
            side_to_move: layout.side_to_move,
            result: None,
        }
    }

    #[inline]
    pub fn side_to_move(&self) -> Color {
        self.side_to_move
    }

    #[inline]
    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn player(&self, color: Color) -> &Player {
        &self.players[color.index()]
    }

    /// The final status of the losing or stalemated side, once known.
    pub fn result(&self) -> Option<Status> {
        self.result
    }

    pub fn is_game_over(&self) -> bool {
        self.result.is_some()
    }

    /// The current position as a FEN placement plus active color.
    pub fn to_fen(&self) -> String {
        let side = match self.side_to_move {
            Color::White => 'w',
            Color::Black => 'b',
        };
        format!("{} {}", self.board.placement(), side)
    }

    /// Renders the board, rank 8 first.
    pub fn render(&self) -> [[Cell; 8]; 8] {
        render::render(&self.board)
    }

    /// Plays a move for `side` given as origin and destination labels.
    pub fn submit_move(
        &mut self,
        side: Color,
        origin: &str,
        dest: &str,
    ) -> Result<MoveReport, MoveError> {
        let mv = Move::from_labels(origin, dest)?;
        if self.result.is_some() {
            return Err(MoveError::GameOver);
        }
        if side != self.side_to_move {
            return Err(MoveError::WrongTurn(self.side_to_move));
        }
        let id = self.movable_piece(side, mv.from)?;

        self.recompute_all()?;
        if !self.board.piece(id)?.can_reach(mv.to) {
            tracing::debug!(%side, %mv, "rejected: destination out of reach");
            return Err(MoveError::ImpossibleMove {
                from: mv.from.to_label(),
                to: mv.to.to_label(),
            });
        }

        let snapshot = legality::simulate(&mut self.board, &mut self.players, id, mv.to)?;
        self.players[side.opposite().index()].recompute(&mut self.board)?;
        let checkers = legality::checking_pieces(&self.board, &self.players, side);
        if !checkers.is_empty() {
            let attackers = self.describe(&checkers)?;
            legality::restore(&mut self.board, &mut self.players, &snapshot)?;
            self.recompute_all()?;
            tracing::debug!(%side, %mv, attackers = %list(&attackers), "rejected: king left in check");
            return Err(MoveError::DiscoveredCheck { attackers });
        }

        Ok(self.commit(side, id, mv, &snapshot)?)
    }

    /// Recomputes and returns the status of `side`.
    ///
    /// Both sides' reachable squares are refreshed and those of `side` are
    /// filtered down to legal moves. A side without a king is never in
    /// check.
    pub fn status(&mut self, side: Color) -> Result<Status, BoardError> {
        self.refresh(side)?;
        let in_check = !legality::checking_pieces(&self.board, &self.players, side).is_empty();
        let can_move = self.players[side.index()].has_moves(&self.board);
        let status = match (in_check, can_move) {
            (true, true) => Status::InCheck,
            (true, false) => Status::Checkmate,
            (false, true) => Status::Normal,
            (false, false) => Status::Stalemate,
        };
        if side == self.side_to_move && status.is_game_over() && self.result.is_none() {
            tracing::debug!(%side, %status, "game over");
            self.result = Some(status);
        }
        Ok(status)
    }

    /// Legal destinations of the piece standing on `label`.
    pub fn legal_moves(&mut self, label: &str) -> Result<Vec<Square>, MoveError> {
        let square = Square::from_label(label)?;
        let (id, color) = self
            .board
            .occupant(square)
            .filter(|piece| !piece.is_marker())
            .map(|piece| (piece.id, piece.color))
            .ok_or_else(|| MoveError::PieceNotFound(square.to_label()))?;
        self.refresh(color)?;
        Ok(self.board.piece(id)?.targets())
    }

    /// Opponent pieces attacking the king of `side`.
    pub fn checkers(&mut self, side: Color) -> Result<Vec<Attacker>, BoardError> {
        self.recompute_all()?;
        let ids = legality::checking_pieces(&self.board, &self.players, side);
        self.describe(&ids)
    }

    fn movable_piece(&self, side: Color, square: Square) -> Result<PieceId, MoveError> {
        self.board
            .occupant(square)
            .filter(|piece| piece.color == side && !piece.is_marker())
            .map(|piece| piece.id)
            .ok_or_else(|| MoveError::PieceNotFound(square.to_label()))
    }

    fn commit(
        &mut self,
        side: Color,
        id: PieceId,
        mv: Move,
        snapshot: &Snapshot,
    ) -> Result<MoveReport, BoardError> {
        let captured: Vec<(PieceKind, Square)> = snapshot
            .removed
            .iter()
            .filter_map(|removal| {
                let kind = self.board.piece(removal.id).ok()?.kind()?;
                Some((kind, removal.square))
            })
            .collect();

        let piece = self.board.piece_mut(id)?;
        piece.has_moved = true;
        if piece.kind() == Some(PieceKind::Pawn) && mv.rank_distance() == 2 {
            if let Some(skipped) = mv.from.offset(side.forward(), 0) {
                let marker = self.board.place(Role::EnPassant { pawn: id }, side, skipped);
                self.players[side.index()].push(marker);
                tracing::trace!(%skipped, "en passant marker placed");
            }
        }
        tracing::debug!(%side, %mv, ?captured, "move applied");

        let next = side.opposite();
        self.side_to_move = next;
        self.expire_markers(next)?;
        let status = self.status(next)?;
        Ok(MoveReport {
            mv,
            captured,
            status,
        })
    }

    /// Takes the en passant markers of `color` off the board. Runs at the
    /// start of that side's turn, one full turn after they were placed.
    fn expire_markers(&mut self, color: Color) -> Result<(), BoardError> {
        let markers: Vec<PieceId> = self.players[color.index()]
            .pieces()
            .iter()
            .copied()
            .filter(|&id| self.board.piece(id).is_ok_and(Piece::is_marker))
            .collect();
        for id in markers {
            self.board.lift(id)?;
            self.players[color.index()].remove(id);
            tracing::trace!(marker = %id, "en passant marker expired");
        }
        Ok(())
    }

    fn recompute_all(&mut self) -> Result<(), BoardError> {
        for player in &self.players {
            player.recompute(&mut self.board)?;
        }
        Ok(())
    }

    fn refresh(&mut self, side: Color) -> Result<(), BoardError> {
        self.recompute_all()?;
        legality::filter_illegal_moves(&mut self.board, &mut self.players, side)
    }

    fn describe(&self, ids: &[PieceId]) -> Result<Vec<Attacker>, BoardError> {
        ids.iter()
            .filter_map(|&id| match self.board.piece(id) {
                Ok(piece) => piece.kind().map(|kind| {
                    Ok(Attacker {
                        kind,
                        color: piece.color,
                        square: piece.square,
                    })
                }),
                Err(err) => Some(Err(err)),
            })
            .collect()
    }
}
