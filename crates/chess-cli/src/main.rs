//! Two-player chess in the terminal.
//!
//! Both players share one terminal and take turns typing moves such as
//! `e2 e4`. The board is printed after every accepted move.

mod command;
mod display;

use std::io::{self, BufRead, Write};

use anyhow::Context;
use chess_engine::{Game, MoveError};
use clap::Parser;
use command::Command;
use tracing::Level;

/// Two-player chess in the terminal.
#[derive(Parser)]
#[command(name = "chess")]
#[command(about = "Two-player chess in the terminal")]
struct Args {
    /// Starting position as FEN (placement and active color are read)
    #[arg(long)]
    fen: Option<String>,

    /// Log engine decisions to stderr (-v debug, -vv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    let level = match args.verbose {
        0 => Level::WARN,
        1 => Level::DEBUG,
        _ => Level::TRACE,
    };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(io::stderr)
        .init();

    let mut game = match &args.fen {
        Some(fen) => Game::from_fen(fen).with_context(|| format!("invalid FEN {fen:?}"))?,
        None => Game::new(),
    };
    tracing::info!(fen = %game.to_fen(), "starting game");

    let stdin = io::stdin();
    let mut out = io::stdout().lock();
    show_turn(&mut out, &mut game)?;

    let mut line = String::new();
    loop {
        if !game.is_game_over() {
            write!(out, "{}'s move: ", game.side_to_move())?;
        } else {
            write!(out, "> ")?;
        }
        out.flush()?;

        line.clear();
        if stdin.lock().read_line(&mut line)? == 0 {
            writeln!(out)?;
            break;
        }

        match Command::parse(&line) {
            Command::Move { origin, dest } => {
                let side = game.side_to_move();
                match game.submit_move(side, &origin, &dest) {
                    Ok(report) => {
                        for (kind, square) in &report.captured {
                            writeln!(out, "{side} takes {} {kind} on {square}.", side.opposite())?;
                        }
                        show_turn(&mut out, &mut game)?;
                    }
                    Err(MoveError::Board(err)) => {
                        return Err(err).context("board state corrupted");
                    }
                    Err(err) => writeln!(out, "Illegal move: {err}")?,
                }
            }
            Command::Moves(label) => match game.legal_moves(&label) {
                Ok(squares) if squares.is_empty() => writeln!(out, "No legal moves.")?,
                Ok(squares) => {
                    let labels: Vec<String> = squares.iter().map(|s| s.to_label()).collect();
                    writeln!(out, "{}", labels.join(" "))?;
                }
                Err(err) => writeln!(out, "{err}")?,
            },
            Command::Board => writeln!(out, "{}", display::board_text(&game.render()))?,
            Command::Fen => writeln!(out, "{}", game.to_fen())?,
            Command::Help => writeln!(out, "{}", command::HELP)?,
            Command::Quit => break,
            Command::Unknown(input) if input.is_empty() => {}
            Command::Unknown(input) => {
                writeln!(out, "Unrecognized input {input:?}. Type `help` for commands.")?
            }
        }
    }

    tracing::info!(fen = %game.to_fen(), "leaving game");
    Ok(())
}

/// Prints the board and announces the status of the side to move.
fn show_turn(out: &mut impl Write, game: &mut Game) -> anyhow::Result<()> {
    writeln!(out, "{}", display::board_text(&game.render()))?;
    let side = game.side_to_move();
    let status = game.status(side)?;
    if let Some(line) = display::status_line(side, status) {
        writeln!(out, "{line}")?;
    }
    Ok(())
}
