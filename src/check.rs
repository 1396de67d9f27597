use crate::{board::Board, color::Color, end_state::EndState};

impl Board {
    /// Whether any enemy piece attacks the king of `color`. A side without
    /// a king is never in check.
    pub fn is_in_check(&self, color: Color) -> bool {
        let Some((_, king)) = self.king(color) else {
            return false;
        };
        self.pieces_of(!color)
            .any(|(index, _)| self.unfiltered_moves(index).contains(&king.position))
    }
    pub fn has_legal_move(&self, color: Color) -> bool {
        self.pieces_of(color)
            .any(|(index, _)| !self.checked_moves(index).is_empty())
            || self
                .king(color)
                .is_some_and(|(king, _)| !self.castling_moves(king).is_empty())
    }
    pub fn is_checkmated(&self, color: Color) -> bool {
        self.is_in_check(color) && !self.has_legal_move(color)
    }
    pub fn is_stalemated(&self, color: Color) -> bool {
        !self.is_in_check(color) && !self.has_legal_move(color)
    }
    /// The result of the game if `color`, about to move, cannot.
    pub fn end_state(&self, color: Color) -> Option<EndState> {
        if self.has_legal_move(color) {
            None
        } else if self.is_in_check(color) {
            Some(EndState::Win(!color))
        } else {
            Some(EndState::Stalemate)
        }
    }
}

#[cfg(test)]
mod test {
    use rustc_hash::FxHashSet;

    use crate::{
        arrangement::Arrangement, board::Board, color::Color, end_state::EndState,
        piece::PieceKind, square::Square,
    };

    fn square(name: &str) -> Square {
        name.parse().unwrap()
    }

    #[test]
    fn corner_mate() {
        let mut board = Board::empty();
        board.add(Color::White, PieceKind::King, square("h1")).unwrap();
        board.add(Color::Black, PieceKind::Queen, square("g2")).unwrap();
        board.add(Color::Black, PieceKind::King, square("f3")).unwrap();
        assert!(board.is_in_check(Color::White));
        assert!(board.is_checkmated(Color::White));
        assert!(!board.is_stalemated(Color::White));
        assert_eq!(board.end_state(Color::White), Some(EndState::Win(Color::Black)));
        assert_eq!(board.end_state(Color::Black), None);
    }
    #[test]
    fn check_that_can_be_escaped_is_not_mate() {
        let mut board = Board::empty();
        board.add(Color::White, PieceKind::King, square("h1")).unwrap();
        board.add(Color::Black, PieceKind::Queen, square("g2")).unwrap();
        board.add(Color::Black, PieceKind::King, square("a8")).unwrap();
        assert!(board.is_in_check(Color::White));
        assert!(!board.is_checkmated(Color::White));
        let king = board.find_by_name("whiteKing").unwrap();
        assert_eq!(board.legal_moves(king), [square("g2")]);
    }
    #[test]
    fn cornered_king_with_no_move_is_stalemated() {
        let mut board = Board::empty();
        board.add(Color::Black, PieceKind::King, square("a8")).unwrap();
        board.add(Color::White, PieceKind::Queen, square("b6")).unwrap();
        board.add(Color::White, PieceKind::King, square("h1")).unwrap();
        assert!(!board.is_in_check(Color::Black));
        assert!(board.is_stalemated(Color::Black));
        assert_eq!(board.end_state(Color::Black), Some(EndState::Stalemate));
    }
    #[test]
    fn kingless_side_is_never_in_check() {
        let mut board = Board::empty();
        board.add(Color::Black, PieceKind::Queen, square("d1")).unwrap();
        assert!(!board.is_in_check(Color::White));
    }
    #[test]
    fn check_matches_the_union_of_enemy_attacks() {
        for (_, arrangement) in Arrangement::all().step_by(97) {
            let mut board = Board::from_arrangement(arrangement);
            let (king, _) = board.king(Color::White).unwrap();
            for destination in Square::all() {
                if board[destination].is_some() {
                    continue;
                }
                board.relocate(king, destination);
                let attacked: FxHashSet<Square> = board
                    .pieces_of(Color::Black)
                    .flat_map(|(index, _)| board.unfiltered_moves(index))
                    .collect();
                assert_eq!(
                    board.is_in_check(Color::White),
                    attacked.contains(&destination),
                    "{arrangement}: king on {destination}"
                );
            }
        }
    }
}
