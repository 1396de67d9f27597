use std::fmt::{self, Display, Formatter};

use crate::{
    board::Board,
    color::Color,
    piece::{Piece, PieceKind},
    square::Square,
};

/// Forsyth-Edwards rendering of a position. Castling rights use X-FEN:
/// `K`/`Q` for the outermost rook on a side, the rook's file letter
/// otherwise. En passant is not played, so its field is always `-`.
#[derive(Debug, Clone, Copy)]
pub struct Fen<'a> {
    pub board: &'a Board,
    pub turn: Color,
    pub fullmove: u32,
}
impl Fen<'_> {
    fn castling_letter(&self, king: Piece, rook: Piece) -> char {
        let kingside = rook.position.file() > king.position.file();
        let outermost = !self.board.pieces_of(rook.color()).any(|(_, other)| {
            other.kind() == PieceKind::Rook
                && other.position.rank() == rook.position.rank()
                && if kingside {
                    other.position.file() > rook.position.file()
                } else {
                    other.position.file() < rook.position.file()
                }
        });
        let letter = match (outermost, kingside) {
            (true, true) => 'K',
            (true, false) => 'Q',
            (false, _) => (b'A' + rook.position.file() - 1) as char,
        };
        match rook.color() {
            Color::White => letter,
            Color::Black => letter.to_ascii_lowercase(),
        }
    }
    fn castling_rights(&self) -> String {
        let mut rights = String::new();
        for color in Color::ALL {
            let Some((_, king)) = self.board.king(color) else {
                continue;
            };
            if !king.can_castle {
                continue;
            }
            let mut rooks: Vec<_> = self
                .board
                .pieces_of(color)
                .map(|(_, piece)| piece)
                .filter(|piece| {
                    piece.kind() == PieceKind::Rook
                        && piece.can_castle
                        && piece.position.rank() == king.position.rank()
                })
                .collect();
            // kingside first
            rooks.sort_by_key(|rook| std::cmp::Reverse(rook.position.file()));
            rights.extend(rooks.into_iter().map(|rook| self.castling_letter(king, rook)));
        }
        if rights.is_empty() {
            rights.push('-');
        }
        rights
    }
}
impl Display for Fen<'_> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        for rank in (1..=8).rev() {
            let mut empty = 0;
            for file in 1..=8 {
                match self.board.piece_at(Square::new(file, rank)) {
                    Some(piece) => {
                        if empty > 0 {
                            write!(f, "{empty}")?;
                            empty = 0;
                        }
                        let letter = match piece.color() {
                            Color::White => piece.kind().uppercase(),
                            Color::Black => piece.kind().lowercase(),
                        };
                        write!(f, "{letter}")?;
                    }
                    None => empty += 1,
                }
            }
            if empty > 0 {
                write!(f, "{empty}")?;
            }
            if rank != 1 {
                write!(f, "/")?;
            }
        }
        write!(
            f,
            " {} {} - 0 {}",
            self.turn.lowercase(),
            self.castling_rights(),
            self.fullmove
        )?;
        Ok(())
    }
}
