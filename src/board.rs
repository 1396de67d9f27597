use std::{
    cell::OnceCell,
    fmt::{self, Display, Formatter},
    ops::{Index, Range},
};

use thiserror::Error;

use crate::{
    arrangement::Arrangement,
    color::Color,
    piece::{Piece, PieceId, PieceKind},
    square::Square,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Error)]
pub enum BoardError {
    #[error("{0} is already occupied")]
    Occupied(Square),
    #[error("{0} has no room for another piece")]
    NoRoom(Color),
    #[error("{0} already has a king")]
    SecondKing(Color),
}

/// Slot of a piece on the [`Board`]; white uses `0..16`, black `16..32`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct PieceIndex(u8);

impl From<PieceIndex> for usize {
    fn from(value: PieceIndex) -> Self {
        usize::from(value.0)
    }
}
impl Display for PieceIndex {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)?;
        Ok(())
    }
}

fn slots(color: Color) -> Range<usize> {
    match color {
        Color::White => 0..16,
        Color::Black => 16..32,
    }
}

/// Every piece in play. A value type: simulations work on copies.
#[derive(Debug, Clone)]
pub struct Board {
    pieces: [Option<Piece>; 32],
    indices: OnceCell<[Option<PieceIndex>; 64]>,
}
impl Board {
    pub fn empty() -> Self {
        Board {
            pieces: [None; 32],
            indices: OnceCell::new(),
        }
    }
    /// Both sides' back ranks follow `arrangement`, mirrored, with pawns
    /// in front.
    pub fn from_arrangement(arrangement: Arrangement) -> Self {
        let mut board = Board::empty();
        for color in Color::ALL {
            let start = slots(color).start;
            let mut numbers = [0_u8; 6];
            for (file, kind) in (1..=8).zip(arrangement.pieces()) {
                let number = match kind {
                    PieceKind::King | PieceKind::Queen => 0,
                    kind => {
                        let number = &mut numbers[kind as usize];
                        *number += 1;
                        *number
                    }
                };
                board.pieces[start + usize::from(file) - 1] = Some(Piece {
                    id: PieceId::new(color, kind, number),
                    position: Square::new(file, color.home_rank()),
                    can_castle: matches!(kind, PieceKind::King | PieceKind::Rook),
                });
            }
            for file in 1..=8 {
                board.pieces[start + 7 + usize::from(file)] = Some(Piece::new(
                    PieceId::new(color, PieceKind::Pawn, file),
                    Square::new(file, color.pawn_rank()),
                ));
            }
        }
        board
    }
    /// Puts a new piece on the board under the lowest number still free
    /// for its kind. Kings and rooks standing on their home rank keep the
    /// right to castle.
    pub fn add(
        &mut self,
        color: Color,
        kind: PieceKind,
        square: Square,
    ) -> Result<PieceIndex, BoardError> {
        if self[square].is_some() {
            return Err(BoardError::Occupied(square));
        }
        let same_kind = self
            .pieces_of(color)
            .filter(|(_, piece)| piece.kind() == kind)
            .count();
        let number = match kind {
            PieceKind::King if same_kind > 0 => return Err(BoardError::SecondKing(color)),
            PieceKind::King => 0,
            PieceKind::Queen if same_kind == 0 => 0,
            kind => self
                .free_number(color, kind)
                .ok_or(BoardError::NoRoom(color))?,
        };
        let slot = slots(color)
            .find(|slot| self.pieces[*slot].is_none())
            .ok_or(BoardError::NoRoom(color))?;
        self.pieces[slot] = Some(Piece {
            id: PieceId::new(color, kind, number),
            position: square,
            can_castle: matches!(kind, PieceKind::King | PieceKind::Rook)
                && square.rank() == color.home_rank(),
        });
        self.indices = OnceCell::new();
        Ok(PieceIndex(slot as u8))
    }
    /// Lowest number no piece of `kind` holds. Pawns and queens share
    /// numbers since a promoted queen keeps its pawn's number.
    fn free_number(&self, color: Color, kind: PieceKind) -> Option<u8> {
        let shares_numbers = |other: PieceKind| {
            other == kind
                || matches!(
                    (kind, other),
                    (PieceKind::Pawn, PieceKind::Queen) | (PieceKind::Queen, PieceKind::Pawn)
                )
        };
        (1..=u8::MAX).find(|number| {
            !self
                .pieces_of(color)
                .any(|(_, piece)| shares_numbers(piece.kind()) && piece.id.number == *number)
        })
    }
    pub fn forbid_castling(&mut self, index: PieceIndex) {
        if let Some(piece) = &mut self.pieces[usize::from(index)] {
            piece.can_castle = false;
        }
    }
    fn indices(&self) -> &[Option<PieceIndex>; 64] {
        self.indices.get_or_init(|| {
            let mut board = [None; 64];
            for (index, piece) in self.pieces() {
                board[piece.position.index()] = Some(index);
            }
            board
        })
    }
    pub fn piece_at(&self, square: Square) -> Option<Piece> {
        self[square].and_then(|index| self[index])
    }
    pub fn pieces(&self) -> impl Iterator<Item = (PieceIndex, Piece)> + '_ {
        self.pieces
            .iter()
            .enumerate()
            .filter_map(|(slot, piece)| Some((PieceIndex(slot as u8), (*piece)?)))
    }
    pub fn pieces_of(&self, color: Color) -> impl Iterator<Item = (PieceIndex, Piece)> + '_ {
        self.pieces()
            .filter(move |(_, piece)| piece.color() == color)
    }
    pub fn king(&self, color: Color) -> Option<(PieceIndex, Piece)> {
        self.pieces()
            .find(|(_, piece)| piece.is(color, PieceKind::King))
    }
    /// Looks a piece up by its rendered identity, ignoring ASCII case.
    pub fn find_by_name(&self, name: &str) -> Option<PieceIndex> {
        self.pieces()
            .find(|(_, piece)| piece.id.to_string().eq_ignore_ascii_case(name))
            .map(|(index, _)| index)
    }
    /// Moves a piece without any legality check; the piece loses its right
    /// to castle.
    pub fn relocate(&mut self, index: PieceIndex, destination: Square) {
        if let Some(piece) = &mut self.pieces[usize::from(index)] {
            piece.position = destination;
            piece.can_castle = false;
        }
        self.indices = OnceCell::new();
    }
    /// Like [`Board::relocate`] but keeps the castling flag; used for
    /// hypothetical positions only.
    pub(crate) fn set_position(&mut self, index: PieceIndex, destination: Square) {
        if let Some(piece) = &mut self.pieces[usize::from(index)] {
            piece.position = destination;
        }
        self.indices = OnceCell::new();
    }
    pub fn remove(&mut self, index: PieceIndex) -> Option<Piece> {
        let piece = self.pieces[usize::from(index)].take();
        self.indices = OnceCell::new();
        piece
    }
    /// Retires a pawn and puts a queen of the same color on its square.
    /// The queen inherits the pawn's number, `whitePawn3` becomes
    /// `whiteQueen3`. Returns `None` when the slot holds no pawn.
    pub fn promote(&mut self, index: PieceIndex) -> Option<PieceId> {
        let slot = &mut self.pieces[usize::from(index)];
        let pawn = slot.filter(|piece| piece.kind() == PieceKind::Pawn)?;
        let queen = PieceId::new(pawn.color(), PieceKind::Queen, pawn.id.number);
        *slot = Some(Piece::new(queen, pawn.position));
        self.indices = OnceCell::new();
        Some(queen)
    }
}
impl Default for Board {
    fn default() -> Self {
        Board::from_arrangement(Arrangement::standard())
    }
}
impl PartialEq for Board {
    fn eq(&self, other: &Self) -> bool {
        self.pieces == other.pieces
    }
}
impl Eq for Board {}

impl Index<Square> for Board {
    type Output = Option<PieceIndex>;

    fn index(&self, index: Square) -> &Self::Output {
        &self.indices()[index.index()]
    }
}
impl Index<PieceIndex> for Board {
    type Output = Option<Piece>;

    fn index(&self, index: PieceIndex) -> &Self::Output {
        &self.pieces[usize::from(index)]
    }
}
