//! Two-digit board coordinates.
//!
//! A square is stored as `rank * 10 + file` with both digits in `1..=8`, so
//! `11` is a1, `18` is h1 and `88` is h8. Stepping by a [`Vector`] is plain
//! integer arithmetic on that code; a step that leaves the board lands on a
//! code with a `0` or `9` digit, or outside `11..=88`, and is discarded.

use std::{
    fmt::{self, Display, Formatter},
    str::FromStr,
};

use thiserror::Error;

use crate::color::Color;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Error)]
pub enum ParseSquareError {
    #[error("found `{0}`, characters from `a` to `h` were expected instead")]
    InvalidFile(char),
    #[error("found `{0}`, characters from `1` to `8` were expected instead")]
    InvalidRank(char),
    #[error("provided string have length of {0} characters, 2 were expected")]
    NotEnoughCharacter(u8),
    #[error("unexpected `{0}`")]
    Unexpected(char),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Error)]
#[error("{0} is not the code of a square on the board")]
pub struct InvalidSquareCode(pub i16);

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Square(u8);

impl Square {
    /// Codes at or below this are off the board.
    pub const LOWER_SENTINEL: i16 = 10;
    /// Codes at or above this are off the board.
    pub const UPPER_SENTINEL: i16 = 89;

    pub fn new(file: u8, rank: u8) -> Self {
        debug_assert!((1..=8).contains(&file), "file {file} should be in 1..=8");
        debug_assert!((1..=8).contains(&rank), "rank {rank} should be in 1..=8");
        Square(rank * 10 + file)
    }
    pub fn new_checked(file: i8, rank: i8) -> Option<Self> {
        if (1..=8).contains(&file) && (1..=8).contains(&rank) {
            Some(Square::new(file.unsigned_abs(), rank.unsigned_abs()))
        } else {
            None
        }
    }
    pub fn from_code(code: i16) -> Option<Self> {
        if code <= Self::LOWER_SENTINEL || code >= Self::UPPER_SENTINEL {
            return None;
        }
        let file = code % 10;
        let rank = code / 10;
        Square::new_checked(file.try_into().ok()?, rank.try_into().ok()?)
    }
    pub fn from_chars(file: char, rank: char) -> Result<Self, ParseSquareError> {
        let file = match file {
            'a'..='h' => file as u8 - b'a' + 1,
            _ => return Err(ParseSquareError::InvalidFile(file)),
        };
        let rank = match rank {
            '1'..='8' => rank as u8 - b'0',
            _ => return Err(ParseSquareError::InvalidRank(rank)),
        };
        Ok(Square::new(file, rank))
    }
    pub fn code(self) -> u8 {
        self.0
    }
    pub fn file(self) -> u8 {
        self.0 % 10
    }
    pub fn rank(self) -> u8 {
        self.0 / 10
    }
    /// Dense `0..64` index, a1 first.
    pub fn index(self) -> usize {
        usize::from(self.rank() - 1) * 8 + usize::from(self.file() - 1)
    }
    pub fn all() -> impl DoubleEndedIterator<Item = Self> {
        (1..=8).flat_map(|rank| (1..=8).map(move |file| Square::new(file, rank)))
    }
    /// Only valid for steps whose file component is within `-2..=2`; wider
    /// steps could carry across the rank digit unnoticed.
    pub fn move_by(self, movement: Vector) -> Option<Self> {
        debug_assert!(movement.file.abs() <= 2);
        Square::from_code(i16::from(self.0) + movement.code_offset())
    }
    /// Squares from this one (exclusive) to the board edge.
    pub fn ray(self, direction: Vector) -> impl Iterator<Item = Self> {
        debug_assert_ne!(direction, Vector::ZERO);
        std::iter::successors(self.move_by(direction), move |square| {
            square.move_by(direction)
        })
    }
    /// Squares of this square's rank from `self` to `other`, both inclusive,
    /// in increasing file order.
    pub fn rank_span(self, other: Self) -> impl Iterator<Item = Self> {
        debug_assert_eq!(self.rank(), other.rank());
        let rank = self.rank();
        let low = Ord::min(self.file(), other.file());
        let high = Ord::max(self.file(), other.file());
        (low..=high).map(move |file| Square::new(file, rank))
    }
    pub fn with_file(self, file: u8) -> Self {
        Square::new(file, self.rank())
    }
    /// Shade of the square; a1 is dark.
    pub fn color(self) -> Color {
        if (self.file() + self.rank()) % 2 == 0 {
            Color::Black
        } else {
            Color::White
        }
    }
}
/// Drops every code outside the board.
pub fn filter_on_board(codes: impl IntoIterator<Item = i16>) -> impl Iterator<Item = Square> {
    codes.into_iter().filter_map(Square::from_code)
}
impl Display for Square {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        let file = (self.file() - 1 + b'a') as char;
        write!(f, "{file}{}", self.rank())?;
        Ok(())
    }
}
impl FromStr for Square {
    type Err = ParseSquareError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut chars = s.chars();
        let Some(file) = chars.next() else {
            return Err(ParseSquareError::NotEnoughCharacter(0));
        };
        let Some(rank) = chars.next() else {
            return Err(ParseSquareError::NotEnoughCharacter(1));
        };
        if let Some(c) = chars.next() {
            return Err(ParseSquareError::Unexpected(c));
        }
        Square::from_chars(file, rank)
    }
}
impl TryFrom<i16> for Square {
    type Error = InvalidSquareCode;

    fn try_from(value: i16) -> Result<Self, Self::Error> {
        Square::from_code(value).ok_or(InvalidSquareCode(value))
    }
}
impl From<Square> for u8 {
    fn from(value: Square) -> Self {
        value.0
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Vector {
    pub file: i8,
    pub rank: i8,
}
impl Vector {
    pub const ZERO: Self = Vector { file: 0, rank: 0 };

    pub const KNIGHT_MOVES: [Self; 8] = [
        Vector { file: -1, rank: -2 },
        Vector { file: 1, rank: -2 },
        Vector { file: -1, rank: 2 },
        Vector { file: 1, rank: 2 },
        Vector { file: -2, rank: -1 },
        Vector { file: 2, rank: -1 },
        Vector { file: -2, rank: 1 },
        Vector { file: 2, rank: 1 },
    ];
    pub const KING_MOVES: [Self; 8] = [
        Vector { file: -1, rank: -1 },
        Vector { file: 0, rank: -1 },
        Vector { file: 1, rank: -1 },
        Vector { file: -1, rank: 0 },
        Vector { file: 1, rank: 0 },
        Vector { file: -1, rank: 1 },
        Vector { file: 0, rank: 1 },
        Vector { file: 1, rank: 1 },
    ];
    pub const ROOK_DIRECTIONS: [Self; 4] = [
        Vector { file: -1, rank: 0 },
        Vector { file: 1, rank: 0 },
        Vector { file: 0, rank: -1 },
        Vector { file: 0, rank: 1 },
    ];
    pub const BISHOP_DIRECTIONS: [Self; 4] = [
        Vector { file: -1, rank: -1 },
        Vector { file: 1, rank: -1 },
        Vector { file: -1, rank: 1 },
        Vector { file: 1, rank: 1 },
    ];
    pub const QUEEN_DIRECTIONS: [Self; 8] = Vector::KING_MOVES;

    pub fn pawn_advance(color: Color) -> Self {
        Vector {
            file: 0,
            rank: color.forward(),
        }
    }
    pub fn pawn_captures(color: Color) -> [Self; 2] {
        [-1, 1].map(|file| Vector {
            file,
            rank: color.forward(),
        })
    }
    /// Difference between the two-digit codes of a square and its
    /// neighbour along this vector.
    pub fn code_offset(self) -> i16 {
        i16::from(self.rank) * 10 + i16::from(self.file)
    }
}

#[cfg(test)]
mod test {
    use crate::square::{Square, Vector, filter_on_board};

    #[test]
    fn codes_follow_rank_then_file() {
        assert_eq!("a1".parse::<Square>().unwrap().code(), 11);
        assert_eq!("h1".parse::<Square>().unwrap().code(), 18);
        assert_eq!("a8".parse::<Square>().unwrap().code(), 81);
        assert_eq!("h8".parse::<Square>().unwrap().code(), 88);
        assert_eq!(Square::new(5, 4).to_string(), "e4");
    }
    #[test]
    fn sentinels_and_stray_digits_are_off_board() {
        for code in [-5, 0, 9, 10, 19, 20, 50, 89, 90, 99] {
            assert_eq!(Square::from_code(code), None, "{code}");
        }
        let squares: Vec<_> = filter_on_board([10, 11, 19, 45, 88, 89]).collect();
        assert_eq!(squares, [Square::new(1, 1), Square::new(5, 4), Square::new(8, 8)]);
    }
    #[test]
    fn knight_jump_does_not_wrap_around_the_edge() {
        let h2: Square = "h2".parse().unwrap();
        let a2: Square = "a2".parse().unwrap();
        assert_eq!(h2.move_by(Vector { file: 2, rank: 1 }), None);
        assert_eq!(h2.move_by(Vector { file: 1, rank: 2 }), None);
        assert_eq!(a2.move_by(Vector { file: -2, rank: 1 }), None);
        assert_eq!(
            a2.move_by(Vector { file: 1, rank: 2 }),
            Some("b4".parse().unwrap())
        );
    }
    #[test]
    fn ray_runs_to_the_edge_nearest_first() {
        let c1: Square = "c1".parse().unwrap();
        let ray: Vec<_> = c1.ray(Vector { file: 1, rank: 1 }).map(Square::code).collect();
        assert_eq!(ray, [24, 35, 46, 57, 68]);
        assert_eq!(c1.ray(Vector { file: 0, rank: -1 }).next(), None);
    }
    #[test]
    fn parse_errors() {
        assert!("i1".parse::<Square>().is_err());
        assert!("a9".parse::<Square>().is_err());
        assert!("a".parse::<Square>().is_err());
        assert!("a1x".parse::<Square>().is_err());
    }
}
