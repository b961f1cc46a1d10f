//! Text output for the terminal.

use chess_core::Color;
use chess_engine::{Cell, Status};

/// Formats a rendered grid with rank numbers on the left and file letters
/// underneath.
pub fn board_text(grid: &[[Cell; 8]; 8]) -> String {
    let mut text = String::new();
    for row in grid {
        let rank = row[0].square.to_label().chars().nth(1).unwrap_or('?');
        text.push(rank);
        text.push(' ');
        text.extend(row.iter().map(|cell| cell.glyph));
        text.push('\n');
    }
    text.push_str("  abcdefgh");
    text
}

/// The line announcing `side`'s status, if there is anything to say.
pub fn status_line(side: Color, status: Status) -> Option<String> {
    match status {
        Status::Normal => None,
        Status::InCheck => Some(format!("{side} is in check.")),
        Status::Checkmate => Some(format!("Checkmate! {} wins.", side.opposite())),
        Status::Stalemate => Some(format!("Stalemate! {side} has no legal moves. Draw.")),
    }
}
