//! Move legality by simulation.
//!
//! A candidate move is played on the real board, the opponent's reachable
//! squares are recomputed, and the move is illegal if any of them lands on
//! the mover's king. The board is then put back exactly as it was from a
//! [`Snapshot`] taken while simulating.
//!
//! Simulation never recomputes the mover's own pieces, so the cached lists
//! being filtered stay intact while their candidates are tried one by one.

use chess_core::{Color, PieceKind, Square};

use crate::piece::PieceId;
use crate::{Board, BoardError, Player};

/// A piece taken off the board by a simulated move.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Removal {
    pub id: PieceId,
    pub square: Square,
    pub owner: Color,
    /// Position in the owner's piece list, if it was listed.
    pub index: Option<usize>,
}

/// Everything needed to undo a simulated move.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Snapshot {
    pub mover: PieceId,
    pub origin: Square,
    pub had_moved: bool,
    /// Captured occupant first, then the pawn behind a captured marker.
    pub removed: Vec<Removal>,
}

/// Plays `mover` to `dest` without any legality check.
///
/// The destination occupant, if any, is taken off the board and out of its
/// owner's list before the mover is relocated. A pawn landing on an enemy en
/// passant marker also takes the pawn that marker stands for.
pub fn simulate(
    board: &mut Board,
    players: &mut [Player; 2],
    mover: PieceId,
    dest: Square,
) -> Result<Snapshot, BoardError> {
    let piece = board.piece(mover)?;
    let origin = piece.square;
    let had_moved = piece.has_moved;
    let color = piece.color;
    let is_pawn = piece.kind() == Some(PieceKind::Pawn);

    let mut removed = Vec::new();
    if let Some(target) = board.occupant(dest).filter(|target| target.id != mover) {
        let target_id = target.id;
        let linked = target
            .marked_pawn()
            .filter(|_| is_pawn && target.color != color);
        removed.push(take(board, players, target_id)?);
        if let Some(pawn) = linked.filter(|&pawn| board.contains(pawn)) {
            removed.push(take(board, players, pawn)?);
        }
    }

    board.relocate(mover, dest)?;
    Ok(Snapshot {
        mover,
        origin,
        had_moved,
        removed,
    })
}

/// Undoes a [`simulate`] call.
pub fn restore(
    board: &mut Board,
    players: &mut [Player; 2],
    snapshot: &Snapshot,
) -> Result<(), BoardError> {
    board.relocate(snapshot.mover, snapshot.origin)?;
    board.piece_mut(snapshot.mover)?.has_moved = snapshot.had_moved;
    for removal in snapshot.removed.iter().rev() {
        board.restore(removal.id)?;
        if let Some(index) = removal.index {
            players[removal.owner.index()].insert(index, removal.id);
        }
    }
    Ok(())
}

fn take(board: &mut Board, players: &mut [Player; 2], id: PieceId) -> Result<Removal, BoardError> {
    let piece = board.piece(id)?;
    let (square, owner) = (piece.square, piece.color);
    board.lift(id)?;
    let index = players[owner.index()].remove(id);
    Ok(Removal {
        id,
        square,
        owner,
        index,
    })
}

/// Opponent pieces whose cached lists contain the king square of `side`.
///
/// A side without a king is never in check.
pub fn checking_pieces(board: &Board, players: &[Player; 2], side: Color) -> Vec<PieceId> {
    let Some(king) = players[side.index()]
        .king(board)
        .and_then(|id| board.piece(id).ok())
    else {
        return Vec::new();
    };
    let king_square = king.square;

    players[side.opposite().index()]
        .pieces()
        .iter()
        .copied()
        .filter(|&id| {
            board
                .piece(id)
                .is_ok_and(|piece| piece.can_reach(king_square))
        })
        .collect()
}

/// Simulates `mover` to `dest` and returns the opponent pieces that would
/// then attack the mover's king. The board is restored before returning and
/// the opponent's caches are recomputed for the restored board.
pub fn attackers_after(
    board: &mut Board,
    players: &mut [Player; 2],
    mover: PieceId,
    dest: Square,
) -> Result<Vec<PieceId>, BoardError> {
    let side = board.piece(mover)?.color;
    let opponent = side.opposite().index();

    let snapshot = simulate(board, players, mover, dest)?;
    let attackers = players[opponent]
        .recompute(board)
        .map(|()| checking_pieces(board, players, side));
    restore(board, players, &snapshot)?;
    players[opponent].recompute(board)?;
    attackers
}

/// Drops every candidate that would leave the king of `side` attacked from
/// the cached lists of that side's pieces.
///
/// The opponent's caches must be current when this is called.
pub fn filter_illegal_moves(
    board: &mut Board,
    players: &mut [Player; 2],
    side: Color,
) -> Result<(), BoardError> {
    let ids = players[side.index()].pieces().to_vec();
    for id in ids {
        for dest in board.piece(id)?.targets() {
            let attackers = attackers_after(board, players, id, dest)?;
            if !attackers.is_empty() {
                tracing::trace!(piece = %id, %dest, ?attackers, "dropping move that exposes the king");
                board.piece_mut(id)?.remove_target(dest);
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::piece::Role;
    use chess_core::FenParser;
    use proptest::prelude::*;

    fn sq(label: &str) -> Square {
        Square::from_label(label).unwrap()
    }

    fn setup(fen: &str) -> (Board, [Player; 2]) {
        let mut board = Board::from_layout(&FenParser::parse(fen).unwrap());
        let players = [
            Player::from_board(Color::White, &board),
            Player::from_board(Color::Black, &board),
        ];
        for player in &players {
            player.recompute(&mut board).unwrap();
        }
        (board, players)
    }

    fn id_at(board: &Board, label: &str) -> PieceId {
        board.occupant(sq(label)).unwrap().id
    }

    #[test]
    fn simulate_capture_and_restore() {
        let (mut board, mut players) = setup("4k3/8/8/3p4/4N3/8/8/4K3 w");
        let knight = id_at(&board, "e4");
        let before = board.placement();

        let snapshot = simulate(&mut board, &mut players, knight, sq("d6")).unwrap();
        assert!(snapshot.removed.is_empty());
        restore(&mut board, &mut players, &snapshot).unwrap();

        let snapshot = simulate(&mut board, &mut players, knight, sq("f6")).unwrap();
        restore(&mut board, &mut players, &snapshot).unwrap();
        assert_eq!(board.placement(), before);

        let (mut board, mut players) = setup("4k3/8/8/3p4/8/4N3/8/4K3 w");
        let knight = id_at(&board, "e3");
        let pawn = id_at(&board, "d5");
        let snapshot = simulate(&mut board, &mut players, knight, sq("d5")).unwrap();
        assert_eq!(snapshot.removed.len(), 1);
        assert_eq!(snapshot.removed[0].id, pawn);
        assert!(!players[1].contains(pawn));
        assert_eq!(board.placement(), "4k3/8/8/3N4/8/8/8/4K3");

        restore(&mut board, &mut players, &snapshot).unwrap();
        assert_eq!(board.placement(), "4k3/8/8/3p4/8/4N3/8/4K3");
        assert!(players[1].contains(pawn));
    }

    #[test]
    fn simulate_en_passant_takes_both() {
        let (mut board, mut players) = setup("4k3/8/8/8/3pP3/8/8/4K3 b");
        let white_pawn = id_at(&board, "e4");
        let marker = board.place(Role::EnPassant { pawn: white_pawn }, Color::White, sq("e3"));
        players[0].push(marker);
        let black_pawn = id_at(&board, "d4");

        let snapshot = simulate(&mut board, &mut players, black_pawn, sq("e3")).unwrap();
        let removed: Vec<PieceId> = snapshot.removed.iter().map(|r| r.id).collect();
        assert_eq!(removed, vec![marker, white_pawn]);
        assert_eq!(board.placement(), "4k3/8/8/8/8/4p3/8/4K3");
        assert!(!players[0].contains(white_pawn));
        assert!(!players[0].contains(marker));

        restore(&mut board, &mut players, &snapshot).unwrap();
        assert_eq!(board.placement(), "4k3/8/8/8/3pP3/8/8/4K3");
        assert_eq!(board.occupant(sq("e3")).map(|p| p.id), Some(marker));
        assert!(players[0].contains(white_pawn));
        assert!(players[0].contains(marker));
    }

    #[test]
    fn pinned_rook_keeps_only_the_file() {
        let (mut board, mut players) = setup("4r2k/8/8/8/8/8/4R3/4K3 w");
        let rook = id_at(&board, "e2");
        filter_illegal_moves(&mut board, &mut players, Color::White).unwrap();

        let targets = board.piece(rook).unwrap().targets();
        for label in ["e3", "e4", "e5", "e6", "e7", "e8"] {
            assert!(targets.contains(&sq(label)), "{label} should stay legal");
        }
        for label in ["a2", "d2", "f2", "h2"] {
            assert!(!targets.contains(&sq(label)), "{label} should be filtered");
        }
    }

    #[test]
    fn king_cannot_step_into_attack() {
        let (mut board, mut players) = setup("3r3k/8/8/8/8/8/8/4K3 w");
        let king = id_at(&board, "e1");
        filter_illegal_moves(&mut board, &mut players, Color::White).unwrap();

        let targets = board.piece(king).unwrap().targets();
        assert!(!targets.contains(&sq("d1")));
        assert!(!targets.contains(&sq("d2")));
        assert!(targets.contains(&sq("e2")));
        assert!(targets.contains(&sq("f1")));
    }

    #[test]
    fn king_may_capture_unprotected_attacker_only() {
        let (mut board, mut players) = setup("7k/8/8/8/8/8/4q3/4K3 w");
        let king = id_at(&board, "e1");
        assert_eq!(
            checking_pieces(&board, &players, Color::White),
            vec![id_at(&board, "e2")]
        );
        filter_illegal_moves(&mut board, &mut players, Color::White).unwrap();
        assert_eq!(board.piece(king).unwrap().targets(), vec![sq("e2")]);

        let (mut board, mut players) = setup("4r2k/8/8/8/8/8/4q3/4K3 w");
        let king = id_at(&board, "e1");
        assert_eq!(
            checking_pieces(&board, &players, Color::White),
            vec![id_at(&board, "e2")]
        );
        filter_illegal_moves(&mut board, &mut players, Color::White).unwrap();
        assert!(!board.piece(king).unwrap().has_targets());
    }

    #[test]
    fn kingless_side_has_no_checks() {
        let (mut board, mut players) = setup("4r3/8/8/8/8/8/4R3/8 w");
        assert!(checking_pieces(&board, &players, Color::White).is_empty());
        let rook = id_at(&board, "e2");
        let before = board.piece(rook).unwrap().targets();
        filter_illegal_moves(&mut board, &mut players, Color::White).unwrap();
        assert_eq!(board.piece(rook).unwrap().targets(), before);
    }

    const POSITIONS: [&str; 5] = [
        "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR",
        "r3k2r/pp3ppp/2n1bn2/2bpp1B1/3PP3/2N2N2/PPP2PPP/R2QKB1R",
        "4r2k/8/8/3p4/4N3/8/4R3/4K3",
        "6k1/5ppp/8/8/8/8/5PPP/R5K1",
        "4k3/8/8/3pP3/8/8/8/4K3",
    ];

    proptest! {
        #[test]
        fn simulate_then_restore_is_identity(
            position in 0..POSITIONS.len(),
            pick in any::<prop::sample::Index>(),
        ) {
            let (mut board, mut players) = setup(POSITIONS[position]);
            let candidates: Vec<(PieceId, Square)> = players
                .iter()
                .flat_map(|player| player.pieces().to_vec())
                .flat_map(|id| {
                    let targets = board.piece(id).unwrap().targets();
                    targets.into_iter().map(move |dest| (id, dest))
                })
                .collect();
            prop_assume!(!candidates.is_empty());
            let (mover, dest) = candidates[pick.index(candidates.len())];

            let placement = board.placement();
            let lists = players.clone();
            let squares: Vec<(PieceId, Square)> =
                board.occupants().map(|p| (p.id, p.square)).collect();

            let snapshot = simulate(&mut board, &mut players, mover, dest).unwrap();
            prop_assert_eq!(board.piece(mover).unwrap().square, dest);
            restore(&mut board, &mut players, &snapshot).unwrap();

            prop_assert_eq!(board.placement(), placement);
            prop_assert_eq!(&players, &lists);
            let after: Vec<(PieceId, Square)> =
                board.occupants().map(|p| (p.id, p.square)).collect();
            prop_assert_eq!(after, squares);
        }
    }
}
