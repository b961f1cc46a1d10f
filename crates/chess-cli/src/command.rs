//! Player input parsing.

/// A line typed by a player.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Move a piece, as `e2 e4` or `e2e4`.
    Move { origin: String, dest: String },
    /// List the legal destinations of the piece on a square.
    Moves(String),
    /// Print the board again.
    Board,
    /// Print the position as FEN.
    Fen,
    Help,
    Quit,
    /// Anything else, including an empty line.
    Unknown(String),
}

impl Command {
    /// Parses one input line. Never fails: unrecognized input becomes
    /// [`Command::Unknown`].
    pub fn parse(input: &str) -> Self {
        let input = input.trim();
        let mut parts = input.split_whitespace();

        let first = parts.next().unwrap_or("");
        match first {
            "quit" | "exit" => Command::Quit,
            "board" => Command::Board,
            "fen" => Command::Fen,
            "help" | "?" => Command::Help,
            "moves" => match (parts.next(), parts.next()) {
                (Some(label), None) => Command::Moves(label.to_string()),
                _ => Command::Unknown(input.to_string()),
            },
            _ => match (parts.next(), parts.next()) {
                (Some(dest), None) => Command::Move {
                    origin: first.to_string(),
                    dest: dest.to_string(),
                },
                (None, None) if first.len() == 4 && first.is_ascii() => Command::Move {
                    origin: first[..2].to_string(),
                    dest: first[2..].to_string(),
                },
                _ => Command::Unknown(input.to_string()),
            },
        }
    }
}

pub const HELP: &str = "\
Enter moves as origin and destination squares, e.g. `e2 e4` or `e2e4`.
Other commands:
  moves <square>  list legal destinations of a piece
  board           print the board
  fen             print the position as FEN
  help            show this message
  quit            leave the game";
