//! Move generation.
//!
//! Destinations are produced in two layers. [`Board::unfiltered_moves`]
//! walks a piece's candidate moves against the pieces in play and is the
//! attack set used for check detection. [`Board::legal_moves`] drops every
//! destination that would leave the mover's own king attacked and adds the
//! king's castling destinations.

use std::cmp::Ordering;

use tracing::trace;

use crate::{
    board::{Board, PieceIndex},
    color::Color,
    error::IllegalCastle,
    piece::{CandidateMoves, PieceKind},
    square::Square,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CastlingSide {
    Queenside,
    Kingside,
}

/// A castling move that passed every check.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Castling {
    pub side: CastlingSide,
    pub king: PieceIndex,
    pub rook: PieceIndex,
    pub king_destination: Square,
    pub rook_destination: Square,
}

impl Board {
    fn walk(
        &self,
        squares: impl IntoIterator<Item = Square>,
        color: Color,
        moves: &mut Vec<Square>,
    ) {
        for square in squares {
            match self.piece_at(square) {
                Some(other) if other.color() == color => break,
                Some(_) => {
                    moves.push(square);
                    break;
                }
                None => moves.push(square),
            }
        }
    }
    /// Destinations reachable by the piece given the current occupancy,
    /// ignoring whether its own king ends up attacked. Empty for an empty
    /// slot.
    pub fn unfiltered_moves(&self, index: PieceIndex) -> Vec<Square> {
        let Some(piece) = self[index] else {
            return Vec::new();
        };
        let color = piece.color();
        let mut moves = Vec::new();
        match piece.raw_moves() {
            CandidateMoves::Rays(rays) => {
                for ray in rays {
                    self.walk(ray, color, &mut moves);
                }
            }
            CandidateMoves::Steps(steps) => {
                for step in steps {
                    self.walk([step], color, &mut moves);
                }
            }
            CandidateMoves::Pawn { captures, advances } => {
                moves.extend(captures.into_iter().filter(|square| {
                    self.piece_at(*square)
                        .is_some_and(|other| other.color() != color)
                }));
                moves.extend(
                    advances
                        .into_iter()
                        .take_while(|square| self[*square].is_none()),
                );
            }
        }
        moves
    }
    /// The position after moving the piece to `destination`. An enemy piece
    /// other than the king standing there is removed first.
    pub fn simulate(&self, index: PieceIndex, destination: Square) -> Board {
        let mut board = self.clone();
        if let Some(piece) = self[index]
            && let Some(captured) = self[destination]
            && let Some(target) = self[captured]
            && target.color() != piece.color()
            && target.kind() != PieceKind::King
        {
            board.remove(captured);
        }
        board.set_position(index, destination);
        board
    }
    pub fn leaves_king_in_check(&self, index: PieceIndex, destination: Square) -> bool {
        let Some(piece) = self[index] else {
            return false;
        };
        self.simulate(index, destination)
            .is_in_check(piece.color())
    }
    /// Unfiltered moves that keep the mover's king safe. Castling is not
    /// included.
    pub fn checked_moves(&self, index: PieceIndex) -> Vec<Square> {
        self.unfiltered_moves(index)
            .into_iter()
            .filter(|destination| !self.leaves_king_in_check(index, *destination))
            .collect()
    }
    /// Every square the piece may legally move to. For a king this includes
    /// the destinations of available castling moves, except those already
    /// occupied by the king itself or the castling rook; such castling is
    /// still reachable through [`Board::castling_with`].
    pub fn legal_moves(&self, index: PieceIndex) -> Vec<Square> {
        let mut moves = self.checked_moves(index);
        if self[index].is_some_and(|piece| piece.kind() == PieceKind::King) {
            for castling in self.castling_moves(index) {
                if self[castling.king_destination].is_none()
                    && !moves.contains(&castling.king_destination)
                {
                    moves.push(castling.king_destination);
                }
            }
        }
        moves
    }
    /// Castling moves available to the king in the given slot.
    pub fn castling_moves(&self, king: PieceIndex) -> Vec<Castling> {
        let Some(king) = self[king] else {
            return Vec::new();
        };
        if !king.can_castle {
            return Vec::new();
        }
        self.pieces_of(king.color())
            .filter(|(_, piece)| piece.kind() == PieceKind::Rook && piece.can_castle)
            .filter_map(|(rook, _)| self.castling_with(rook).ok())
            .collect()
    }
    /// Validates castling with the given rook. The king ends on the c-file
    /// with the rook on the d-file when the rook stands on the king's a-side,
    /// otherwise on the g-file with the rook on the f-file.
    pub fn castling_with(&self, rook_index: PieceIndex) -> Result<Castling, IllegalCastle> {
        let rook = self[rook_index].ok_or(IllegalCastle::NoRook)?;
        if rook.kind() != PieceKind::Rook {
            return Err(IllegalCastle::NotARook(rook.id));
        }
        let color = rook.color();
        let (king_index, king) = self.king(color).ok_or(IllegalCastle::NoKing(color))?;
        if !king.can_castle {
            return Err(IllegalCastle::AlreadyMoved(king.id));
        }
        if !rook.can_castle {
            return Err(IllegalCastle::AlreadyMoved(rook.id));
        }
        if king.position.rank() != rook.position.rank() {
            return Err(IllegalCastle::NotAligned(rook.id));
        }
        let (side, king_file, rook_file) =
            match Ord::cmp(&rook.position.file(), &king.position.file()) {
                Ordering::Less => (CastlingSide::Queenside, 3, 4),
                Ordering::Equal => return Err(IllegalCastle::NotAligned(rook.id)),
                Ordering::Greater => (CastlingSide::Kingside, 7, 6),
            };
        let castling = Castling {
            side,
            king: king_index,
            rook: rook_index,
            king_destination: king.position.with_file(king_file),
            rook_destination: rook.position.with_file(rook_file),
        };
        if self.is_in_check(color) {
            return Err(IllegalCastle::InCheck(color));
        }
        for square in king
            .position
            .rank_span(castling.king_destination)
            .chain(rook.position.rank_span(castling.rook_destination))
        {
            if let Some(other) = self[square]
                && other != king_index
                && other != rook_index
            {
                return Err(IllegalCastle::Blocked(square));
            }
        }
        for square in king.position.rank_span(castling.king_destination) {
            if square != king.position && self.leaves_king_in_check(king_index, square) {
                return Err(IllegalCastle::Attacked(square));
            }
        }
        let mut castled = self.clone();
        castled.apply_castling(castling);
        if castled.is_in_check(color) {
            return Err(IllegalCastle::Attacked(castling.king_destination));
        }
        trace!(king = %king.id, rook = %rook.id, ?side, "castling available");
        Ok(castling)
    }
    /// Puts king and rook on their castled squares and clears both flags.
    pub fn apply_castling(&mut self, castling: Castling) {
        self.relocate(castling.king, castling.king_destination);
        self.relocate(castling.rook, castling.rook_destination);
    }
}

#[cfg(test)]
mod test {
    use crate::{
        arrangement::Arrangement,
        board::Board,
        color::Color,
        error::IllegalCastle,
        legality::CastlingSide,
        piece::PieceKind,
        square::Square,
    };

    fn square(name: &str) -> Square {
        name.parse().unwrap()
    }
    fn sorted(mut squares: Vec<Square>) -> Vec<String> {
        squares.sort_unstable();
        squares.into_iter().map(|square| square.to_string()).collect()
    }
    fn clear(board: &mut Board, names: &[&str]) {
        for name in names {
            let index = board.find_by_name(name).unwrap();
            board.remove(index);
        }
    }

    #[test]
    fn opening_moves() {
        let board = Board::default();
        let knight = board.find_by_name("whiteKnight1").unwrap();
        assert_eq!(sorted(board.legal_moves(knight)), ["a3", "c3"]);
        let pawn = board.find_by_name("blackPawn5").unwrap();
        assert_eq!(sorted(board.legal_moves(pawn)), ["e5", "e6"]);
        let rook = board.find_by_name("whiteRook1").unwrap();
        assert!(board.legal_moves(rook).is_empty());
    }
    #[test]
    fn pawn_captures_only_enemies_and_is_blocked_by_anything() {
        let mut board = Board::empty();
        let pawn = board.add(Color::White, PieceKind::Pawn, square("d2")).unwrap();
        board.add(Color::Black, PieceKind::Knight, square("c3")).unwrap();
        board.add(Color::White, PieceKind::Knight, square("e3")).unwrap();
        board.add(Color::Black, PieceKind::Pawn, square("d4")).unwrap();
        assert_eq!(sorted(board.unfiltered_moves(pawn)), ["c3", "d3"]);
        board.add(Color::White, PieceKind::Bishop, square("d3")).unwrap();
        assert_eq!(sorted(board.unfiltered_moves(pawn)), ["c3"]);
    }
    #[test]
    fn sliders_stop_at_the_first_piece() {
        let mut board = Board::empty();
        let rook = board.add(Color::White, PieceKind::Rook, square("d4")).unwrap();
        board.add(Color::White, PieceKind::Pawn, square("d6")).unwrap();
        board.add(Color::Black, PieceKind::Pawn, square("f4")).unwrap();
        let moves = sorted(board.unfiltered_moves(rook));
        assert!(moves.contains(&"d5".to_owned()));
        assert!(!moves.contains(&"d6".to_owned()));
        assert!(moves.contains(&"f4".to_owned()));
        assert!(!moves.contains(&"g4".to_owned()));
        assert_eq!(moves.len(), 3 + 1 + 2 + 3);
    }
    #[test]
    fn pinned_piece_keeps_only_moves_along_the_pin() {
        let mut board = Board::empty();
        board.add(Color::White, PieceKind::King, square("e1")).unwrap();
        let rook = board.add(Color::White, PieceKind::Rook, square("e4")).unwrap();
        board.add(Color::Black, PieceKind::Queen, square("e8")).unwrap();
        board.add(Color::Black, PieceKind::King, square("a8")).unwrap();
        assert_eq!(
            sorted(board.legal_moves(rook)),
            ["e2", "e3", "e5", "e6", "e7", "e8"]
        );
    }
    #[test]
    fn filtering_does_not_disturb_the_board() {
        let board = Board::from_arrangement(Arrangement::from_id(123).unwrap());
        let before = board.clone();
        for (index, _) in board.pieces() {
            board.legal_moves(index);
        }
        assert_eq!(board, before);
    }
    #[test]
    fn destinations_never_hold_friendly_pieces() {
        for (_, arrangement) in Arrangement::all().step_by(37) {
            let board = Board::from_arrangement(arrangement);
            for (index, piece) in board.pieces() {
                for destination in board.legal_moves(index) {
                    assert!(
                        board
                            .piece_at(destination)
                            .is_none_or(|other| other.color() != piece.color()),
                        "{arrangement}: {piece} to {destination}"
                    );
                }
            }
        }
    }
    #[test]
    fn standard_castling_both_ways() {
        let mut board = Board::default();
        clear(
            &mut board,
            &["whiteKnight1", "whiteBishop1", "whiteQueen", "whiteBishop2", "whiteKnight2"],
        );
        let king = board.find_by_name("whiteKing").unwrap();
        let moves = sorted(board.legal_moves(king));
        assert_eq!(moves, ["c1", "d1", "f1", "g1"]);
        let castlings = board.castling_moves(king);
        assert_eq!(castlings.len(), 2);
        let kingside = castlings
            .iter()
            .find(|castling| castling.side == CastlingSide::Kingside)
            .unwrap();
        assert_eq!(kingside.rook_destination, square("f1"));
        let queenside = castlings
            .iter()
            .find(|castling| castling.side == CastlingSide::Queenside)
            .unwrap();
        assert_eq!(queenside.king_destination, square("c1"));
        assert_eq!(queenside.rook_destination, square("d1"));
    }
    #[test]
    fn castling_through_an_attacked_square_is_refused() {
        let mut board = Board::empty();
        let king = board.add(Color::White, PieceKind::King, square("e1")).unwrap();
        let rook = board.add(Color::White, PieceKind::Rook, square("h1")).unwrap();
        board.add(Color::Black, PieceKind::King, square("a8")).unwrap();
        board.add(Color::Black, PieceKind::Rook, square("f8")).unwrap();
        assert_eq!(
            board.castling_with(rook),
            Err(IllegalCastle::Attacked(square("f1")))
        );
        assert!(!board.legal_moves(king).contains(&square("g1")));
    }
    #[test]
    fn castling_is_refused_in_check_or_after_moving() {
        let mut board = Board::empty();
        board.add(Color::White, PieceKind::King, square("e1")).unwrap();
        let rook = board.add(Color::White, PieceKind::Rook, square("a1")).unwrap();
        board.add(Color::Black, PieceKind::King, square("a8")).unwrap();
        let checker = board.add(Color::Black, PieceKind::Rook, square("e8")).unwrap();
        assert_eq!(
            board.castling_with(rook),
            Err(IllegalCastle::InCheck(Color::White))
        );
        board.remove(checker);
        assert!(board.castling_with(rook).is_ok());
        board.forbid_castling(rook);
        assert!(matches!(
            board.castling_with(rook),
            Err(IllegalCastle::AlreadyMoved(_))
        ));
    }
    #[test]
    fn castling_needs_the_rook_on_the_king_rank() {
        let mut board = Board::empty();
        let king = board.add(Color::White, PieceKind::King, square("e1")).unwrap();
        let rook = board.add(Color::White, PieceKind::Rook, square("h1")).unwrap();
        board.add(Color::Black, PieceKind::King, square("a8")).unwrap();
        board.set_position(rook, square("h4"));
        assert!(board[rook].unwrap().can_castle);
        assert!(matches!(
            board.castling_with(rook),
            Err(IllegalCastle::NotAligned(_))
        ));
        assert!(board.castling_moves(king).is_empty());
    }
    #[test]
    fn castling_is_refused_when_blocked() {
        let board = Board::default();
        let rook = board.find_by_name("whiteRook2").unwrap();
        assert_eq!(
            board.castling_with(rook),
            Err(IllegalCastle::Blocked(square("f1")))
        );
        let knight = board.find_by_name("whiteKnight2").unwrap();
        assert!(matches!(
            board.castling_with(knight),
            Err(IllegalCastle::NotARook(_))
        ));
    }
    #[test]
    fn castling_without_moving_the_king_is_not_listed_but_valid() {
        // king already on g1 with the rook on h1
        let mut board = Board::from_arrangement("RNBQNBKR".parse().unwrap());
        clear(&mut board, &["whiteBishop2"]);
        let king = board.find_by_name("whiteKing").unwrap();
        let rook = board.find_by_name("whiteRook2").unwrap();
        assert!(!board.legal_moves(king).contains(&square("g1")));
        let castling = board.castling_with(rook).unwrap();
        assert_eq!(castling.king_destination, square("g1"));
        board.apply_castling(castling);
        assert_eq!(board.piece_at(square("f1")).unwrap().id.to_string(), "whiteRook2");
        assert_eq!(board.piece_at(square("g1")).unwrap().id.to_string(), "whiteKing");
        assert!(!board[king].unwrap().can_castle);
    }
    #[test]
    fn king_may_pass_over_its_own_rook() {
        // king b1 between rooks a1 and c1
        let mut board = Board::from_arrangement("RKRNNQBB".parse().unwrap());
        clear(
            &mut board,
            &["whiteKnight1", "whiteKnight2", "whiteQueen", "whiteBishop1"],
        );
        let rook = board.find_by_name("whiteRook2").unwrap();
        let castling = board.castling_with(rook).unwrap();
        assert_eq!(castling.side, CastlingSide::Kingside);
        assert_eq!(castling.king_destination, square("g1"));
        let rook = board.find_by_name("whiteRook1").unwrap();
        assert!(board.castling_with(rook).is_err());
    }
}
