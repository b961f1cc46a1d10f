//! Piece instances and reachable-square generation.
//!
//! Every piece kind except the pawn shares one algorithm: walk each step
//! vector from the piece's square, once for steppers and up to seven times
//! for ranged pieces, recording empty squares, recording and stopping on an
//! enemy, and stopping without recording on a friendly piece. Pawns separate
//! forward pushes (never captures) from diagonal captures (only captures).

use std::fmt;

use chess_core::{Color, PieceKind, Square};

use crate::Board;

/// Stable identifier of a piece within its [`Board`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PieceId(pub(crate) usize);

impl fmt::Display for PieceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// What a board occupant is.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    /// An ordinary chess piece.
    Regular(PieceKind),
    /// The square a pawn skipped with its double push. Capturable by enemy
    /// pawns for one turn; `pawn` is the piece that skipped it.
    EnPassant { pawn: PieceId },
}

/// Squares a piece can reach, split into plain moves and captures.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Reach {
    pub moves: Vec<Square>,
    pub captures: Vec<Square>,
}

/// A piece on (or once on) the board.
///
/// `possible_moves` and `capture_moves` are caches filled by
/// [`Board::recompute`]; any board mutation makes them stale.
#[derive(Debug, Clone)]
pub struct Piece {
    pub id: PieceId,
    pub role: Role,
    pub color: Color,
    pub square: Square,
    /// Set once the piece has made a committed move. No rule reads it.
    pub has_moved: bool,
    /// Reachable squares. For pawns, the forward pushes only.
    pub possible_moves: Vec<Square>,
    /// Squares holding an enemy piece that this piece can take.
    pub capture_moves: Vec<Square>,
}

impl Piece {
    pub(crate) fn new(id: PieceId, role: Role, color: Color, square: Square) -> Self {
        Piece {
            id,
            role,
            color,
            square,
            has_moved: false,
            possible_moves: Vec::new(),
            capture_moves: Vec::new(),
        }
    }

    /// Returns the piece kind, or `None` for an en passant marker.
    #[inline]
    pub fn kind(&self) -> Option<PieceKind> {
        match self.role {
            Role::Regular(kind) => Some(kind),
            Role::EnPassant { .. } => None,
        }
    }

    #[inline]
    pub fn is_marker(&self) -> bool {
        matches!(self.role, Role::EnPassant { .. })
    }

    /// The pawn an en passant marker stands for.
    #[inline]
    pub fn marked_pawn(&self) -> Option<PieceId> {
        match self.role {
            Role::EnPassant { pawn } => Some(pawn),
            Role::Regular(_) => None,
        }
    }

    /// The display glyph, or `None` for an en passant marker.
    pub fn glyph(&self) -> Option<char> {
        self.kind().map(|kind| kind.glyph(self.color))
    }

    /// Returns true if `square` is in either cached list.
    pub fn can_reach(&self, square: Square) -> bool {
        self.possible_moves.contains(&square) || self.capture_moves.contains(&square)
    }

    /// Returns true if either cached list is non-empty.
    pub fn has_targets(&self) -> bool {
        !self.possible_moves.is_empty() || !self.capture_moves.is_empty()
    }

    /// Every distinct cached destination, captures first.
    pub fn targets(&self) -> Vec<Square> {
        let mut targets = self.capture_moves.clone();
        for &square in &self.possible_moves {
            if !targets.contains(&square) {
                targets.push(square);
            }
        }
        targets
    }

    /// Drops `square` from both cached lists.
    pub fn remove_target(&mut self, square: Square) {
        self.possible_moves.retain(|&s| s != square);
        self.capture_moves.retain(|&s| s != square);
    }

    pub(crate) fn set_reach(&mut self, reach: Reach) {
        self.possible_moves = reach.moves;
        self.capture_moves = reach.captures;
    }

    /// Computes the squares this piece can reach on `board`.
    pub fn reach(&self, board: &Board) -> Reach {
        match self.role {
            Role::EnPassant { .. } => Reach::default(),
            Role::Regular(PieceKind::Pawn) => self.pawn_reach(board),
            Role::Regular(kind) => {
                let limit = if kind.is_ranged() { 7 } else { 1 };
                self.step_reach(board, kind.steps(), limit)
            }
        }
    }

    fn step_reach(&self, board: &Board, steps: &[(i8, i8)], limit: usize) -> Reach {
        let mut reach = Reach::default();
        for &(d_rank, d_file) in steps {
            let mut current = self.square;
            for _ in 0..limit {
                let Some(next) = current.offset(d_rank, d_file) else {
                    break;
                };
                // Markers only matter to pawn captures; everything else
                // walks over them.
                match board.occupant(next).filter(|p| !p.is_marker()) {
                    None => reach.moves.push(next),
                    Some(other) if other.color != self.color => {
                        reach.moves.push(next);
                        reach.captures.push(next);
                        break;
                    }
                    Some(_) => break,
                }
                current = next;
            }
        }
        reach
    }

    fn pawn_reach(&self, board: &Board) -> Reach {
        let mut reach = Reach::default();
        let is_open = |square: &Square| board.occupant(*square).map_or(true, Piece::is_marker);

        let (push_rank, push_file) = PieceKind::pawn_push(self.color);
        if let Some(one) = self.square.offset(push_rank, push_file).filter(is_open) {
            reach.moves.push(one);
            if self.square.rank() == self.color.pawn_rank() {
                if let Some(two) = one.offset(push_rank, push_file).filter(is_open) {
                    reach.moves.push(two);
                }
            }
        }

        for (d_rank, d_file) in PieceKind::pawn_captures(self.color) {
            if let Some(target) = self.square.offset(d_rank, d_file) {
                if board
                    .occupant(target)
                    .is_some_and(|other| other.color != self.color)
                {
                    reach.captures.push(target);
                }
            }
        }
        reach
    }
}
