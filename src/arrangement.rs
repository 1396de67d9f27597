//! The 960 Chess960 back-rank arrangements.
//!
//! Arrangements are numbered with the Scharnagl scheme, so number 518 is
//! the standard `RNBQKBNR` setup.

use std::{
    fmt::{self, Display, Formatter},
    str::FromStr,
};

use rand::random_range;
use thiserror::Error;

use crate::piece::{InvalidPieceLetter, PieceKind};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Error)]
pub enum ParseArrangementError {
    #[error("a back rank holds 8 pieces, found {0}")]
    WrongLength(usize),
    #[error(transparent)]
    InvalidLetter(#[from] InvalidPieceLetter),
    #[error("expected {expected} {kind}, found {found}")]
    WrongCount {
        kind: PieceKind,
        expected: usize,
        found: usize,
    },
    #[error("the king must stand between the two rooks")]
    KingNotBetweenRooks,
    #[error("the bishops must stand on squares of opposite colors")]
    BishopsOnSameColor,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Error)]
#[error("{0} is not a Chess960 position number, expected 0 to 959")]
pub struct InvalidPositionId(pub u16);

// pairs of free squares taken by the knights, in Scharnagl order
const KNIGHT_PLACEMENTS: [(usize, usize); 10] = [
    (0, 1),
    (0, 2),
    (0, 3),
    (0, 4),
    (1, 2),
    (1, 3),
    (1, 4),
    (2, 3),
    (2, 4),
    (3, 4),
];

/// A validated back rank, a-file first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Arrangement([PieceKind; 8]);

impl Arrangement {
    pub const COUNT: u16 = 960;
    pub const STANDARD_ID: u16 = 518;

    pub fn standard() -> Self {
        Arrangement([
            PieceKind::Rook,
            PieceKind::Knight,
            PieceKind::Bishop,
            PieceKind::Queen,
            PieceKind::King,
            PieceKind::Bishop,
            PieceKind::Knight,
            PieceKind::Rook,
        ])
    }
    pub fn from_id(id: u16) -> Result<Self, InvalidPositionId> {
        fn nth_free(configuration: &[Option<PieceKind>; 8], nth: usize) -> usize {
            configuration
                .iter()
                .enumerate()
                .filter(|(_, cell)| cell.is_none())
                .nth(nth)
                .map(|(i, _)| i)
                .unwrap()
        }
        if id >= Self::COUNT {
            return Err(InvalidPositionId(id));
        }
        let mut state = usize::from(id);
        let light_bishop = state % 4;
        state /= 4;
        let dark_bishop = state % 4;
        state /= 4;
        let queen = state % 6;
        state /= 6;
        let (knight_1, knight_2) = KNIGHT_PLACEMENTS[state];

        let mut configuration = [None; 8];
        configuration[light_bishop * 2 + 1] = Some(PieceKind::Bishop);
        configuration[dark_bishop * 2] = Some(PieceKind::Bishop);
        configuration[nth_free(&configuration, queen)] = Some(PieceKind::Queen);

        // resolve both before placing, placing the first would shift the second
        let knight_1 = nth_free(&configuration, knight_1);
        let knight_2 = nth_free(&configuration, knight_2);
        configuration[knight_1] = Some(PieceKind::Knight);
        configuration[knight_2] = Some(PieceKind::Knight);

        let mut remaining = [PieceKind::Rook, PieceKind::King, PieceKind::Rook].into_iter();
        Ok(Arrangement(configuration.map(|cell| {
            cell.or_else(|| remaining.next()).unwrap()
        })))
    }
    pub fn random() -> (u16, Self) {
        let id = random_range(0..Self::COUNT);
        (id, Arrangement::from_id(id).unwrap())
    }
    pub fn all() -> impl Iterator<Item = (u16, Self)> {
        (0..Self::COUNT).map(|id| (id, Arrangement::from_id(id).unwrap()))
    }
    pub fn new(pieces: [PieceKind; 8]) -> Result<Self, ParseArrangementError> {
        for (kind, expected) in [
            (PieceKind::King, 1),
            (PieceKind::Queen, 1),
            (PieceKind::Rook, 2),
            (PieceKind::Knight, 2),
            (PieceKind::Bishop, 2),
            (PieceKind::Pawn, 0),
        ] {
            let found = pieces.iter().filter(|piece| **piece == kind).count();
            if found != expected {
                return Err(ParseArrangementError::WrongCount {
                    kind,
                    expected,
                    found,
                });
            }
        }
        let files_of = |kind: PieceKind| {
            pieces
                .iter()
                .enumerate()
                .filter(move |(_, piece)| **piece == kind)
                .map(|(i, _)| i)
        };
        let king = files_of(PieceKind::King).next().unwrap();
        let mut rooks = files_of(PieceKind::Rook);
        let (Some(left_rook), Some(right_rook)) = (rooks.next(), rooks.next()) else {
            unreachable!()
        };
        if !(left_rook < king && king < right_rook) {
            return Err(ParseArrangementError::KingNotBetweenRooks);
        }
        let mut bishops = files_of(PieceKind::Bishop);
        let (Some(bishop_1), Some(bishop_2)) = (bishops.next(), bishops.next()) else {
            unreachable!()
        };
        if bishop_1 % 2 == bishop_2 % 2 {
            return Err(ParseArrangementError::BishopsOnSameColor);
        }
        Ok(Arrangement(pieces))
    }
    pub fn pieces(self) -> [PieceKind; 8] {
        self.0
    }
    /// Scharnagl number of this arrangement.
    pub fn id(self) -> u16 {
        let files_of = |kind: PieceKind| {
            self.0
                .iter()
                .enumerate()
                .filter(move |(_, piece)| **piece == kind)
                .map(|(i, _)| i)
        };
        let (mut light_bishop, mut dark_bishop) = (0, 0);
        for file in files_of(PieceKind::Bishop) {
            if file % 2 == 1 {
                light_bishop = file / 2;
            } else {
                dark_bishop = file / 2;
            }
        }
        let without_bishops: Vec<_> = self
            .0
            .into_iter()
            .filter(|piece| *piece != PieceKind::Bishop)
            .collect();
        let queen = without_bishops
            .iter()
            .position(|piece| *piece == PieceKind::Queen)
            .unwrap_or_default();
        let mut knights = without_bishops
            .iter()
            .filter(|piece| **piece != PieceKind::Queen)
            .enumerate()
            .filter(|(_, piece)| **piece == PieceKind::Knight)
            .map(|(i, _)| i);
        let first = knights.next().unwrap_or_default();
        let second = knights.next().unwrap_or_default();
        let knight = 4 * first - first * first.saturating_sub(1) / 2 + (second - first - 1);
        let id = light_bishop + 4 * dark_bishop + 16 * queen + 96 * knight;
        id.try_into().unwrap()
    }
}
impl Default for Arrangement {
    fn default() -> Self {
        Arrangement::standard()
    }
}
impl Display for Arrangement {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        for piece in self.0 {
            write!(f, "{}", piece.uppercase())?;
        }
        Ok(())
    }
}
impl FromStr for Arrangement {
    type Err = ParseArrangementError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let letters: Vec<char> = s.chars().collect();
        let letters: [char; 8] = letters
            .try_into()
            .map_err(|letters: Vec<char>| ParseArrangementError::WrongLength(letters.len()))?;
        let mut pieces = [PieceKind::Pawn; 8];
        for (piece, letter) in pieces.iter_mut().zip(letters) {
            if !letter.is_ascii_uppercase() {
                return Err(InvalidPieceLetter(letter).into());
            }
            *piece = PieceKind::from_letter(letter)?;
        }
        Arrangement::new(pieces)
    }
}
