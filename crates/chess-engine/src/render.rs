//! Board rendering as an 8×8 grid of glyphs.

use chess_core::Square;

use crate::Board;

/// Glyph of an empty light square.
pub const LIGHT_SQUARE: char = ' ';
/// Glyph of an empty dark square.
pub const DARK_SQUARE: char = '█';

/// One rendered square.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Cell {
    pub square: Square,
    pub glyph: char,
    /// False for empty squares, including those holding an en passant marker.
    pub occupied: bool,
}

/// Renders the board with rank 8 in the first row and file a in the first
/// column.
pub fn render(board: &Board) -> [[Cell; 8]; 8] {
    std::array::from_fn(|rank| {
        std::array::from_fn(|file| {
            let square = Square::ALL[rank * 8 + file];
            match board.occupant(square).and_then(|piece| piece.glyph()) {
                Some(glyph) => Cell {
                    square,
                    glyph,
                    occupied: true,
                },
                None => Cell {
                    square,
                    glyph: if square.is_light() {
                        LIGHT_SQUARE
                    } else {
                        DARK_SQUARE
                    },
                    occupied: false,
                },
            }
        })
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::piece::Role;
    use chess_core::{Color, FenParser};

    fn board(fen: &str) -> Board {
        Board::from_layout(&FenParser::parse(fen).unwrap())
    }

    #[test]
    fn empty_board_alternates_colors() {
        let grid = render(&Board::empty());
        assert_eq!(grid[0][0].glyph, LIGHT_SQUARE);
        assert_eq!(grid[0][1].glyph, DARK_SQUARE);
        assert_eq!(grid[7][0].glyph, DARK_SQUARE);
        assert_eq!(grid[7][7].glyph, LIGHT_SQUARE);
        assert_eq!(grid[7][0].square.to_label(), "a1");
        assert!(grid.iter().flatten().all(|cell| !cell.occupied));
    }

    #[test]
    fn startpos_glyphs() {
        let grid = render(&board(FenParser::STARTPOS));
        let back: String = grid[0].iter().map(|cell| cell.glyph).collect();
        assert_eq!(back, "♜♞♝♛♚♝♞♜");
        let front: String = grid[6].iter().map(|cell| cell.glyph).collect();
        assert_eq!(front, "♙♙♙♙♙♙♙♙");
        assert_eq!(grid[7][4].glyph, '♔');
        assert!(grid[4].iter().all(|cell| !cell.occupied));
    }

    #[test]
    fn marker_renders_as_empty() {
        let mut board = board("8/8/8/8/4P3/8/8/8");
        let pawn = board.occupant(Square::from_label("e4").unwrap()).unwrap().id;
        let e3 = Square::from_label("e3").unwrap();
        board.place(Role::EnPassant { pawn }, Color::White, e3);

        let cell = render(&board)[5][4];
        assert_eq!(cell.square, e3);
        assert!(!cell.occupied);
        assert_eq!(cell.glyph, DARK_SQUARE);
    }
}
