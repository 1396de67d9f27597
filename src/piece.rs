use std::fmt::{self, Display, Formatter};

use thiserror::Error;

use crate::{
    color::Color,
    square::{Square, Vector},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Error)]
#[error(
    "found `{0}`, expected one of `p`, `n`, `b`, `r`, `k`, `q`, or uppercase forms of these letters"
)]
pub struct InvalidPieceLetter(pub char);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PieceKind {
    Pawn,
    Knight,
    Bishop,
    Rook,
    Queen,
    King,
}
impl PieceKind {
    pub fn uppercase(self) -> char {
        match self {
            PieceKind::Pawn => 'P',
            PieceKind::Knight => 'N',
            PieceKind::Bishop => 'B',
            PieceKind::Rook => 'R',
            PieceKind::Queen => 'Q',
            PieceKind::King => 'K',
        }
    }
    pub fn lowercase(self) -> char {
        self.uppercase().to_ascii_lowercase()
    }
    pub fn from_letter(c: char) -> Result<Self, InvalidPieceLetter> {
        let piece = match c {
            'p' | 'P' => PieceKind::Pawn,
            'n' | 'N' => PieceKind::Knight,
            'b' | 'B' => PieceKind::Bishop,
            'r' | 'R' => PieceKind::Rook,
            'q' | 'Q' => PieceKind::Queen,
            'k' | 'K' => PieceKind::King,
            c => return Err(InvalidPieceLetter(c)),
        };
        Ok(piece)
    }
    /// Name fragment used in piece identities, e.g. `Rook` in `whiteRook1`.
    pub fn title(self) -> &'static str {
        match self {
            PieceKind::Pawn => "Pawn",
            PieceKind::Knight => "Knight",
            PieceKind::Bishop => "Bishop",
            PieceKind::Rook => "Rook",
            PieceKind::Queen => "Queen",
            PieceKind::King => "King",
        }
    }
}
impl Display for PieceKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            PieceKind::Pawn => write!(f, "pawn")?,
            PieceKind::Knight => write!(f, "knight")?,
            PieceKind::Bishop => write!(f, "bishop")?,
            PieceKind::Rook => write!(f, "rook")?,
            PieceKind::Queen => write!(f, "queen")?,
            PieceKind::King => write!(f, "king")?,
        }
        Ok(())
    }
}

/// Unique identity of a piece, rendered as `whiteKing`, `blackRook2`,
/// `whitePawn5` or `whiteQueen5` for a queen promoted from that pawn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PieceId {
    pub color: Color,
    pub kind: PieceKind,
    /// `0` for unnumbered pieces (the king and the starting queen).
    pub number: u8,
}
impl PieceId {
    pub fn new(color: Color, kind: PieceKind, number: u8) -> Self {
        PieceId {
            color,
            kind,
            number,
        }
    }
}
impl Display for PieceId {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.color, self.kind.title())?;
        if self.number != 0 {
            write!(f, "{}", self.number)?;
        }
        Ok(())
    }
}

/// Destinations a piece could reach on an empty board, grouped the way
/// the legality engine walks them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CandidateMoves {
    /// One ray per direction, nearest square first.
    Rays(Vec<Vec<Square>>),
    /// Independent single-step destinations.
    Steps(Vec<Square>),
    Pawn {
        captures: Vec<Square>,
        /// Nearest square first; two long only from the pawn-start rank.
        advances: Vec<Square>,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Piece {
    pub id: PieceId,
    pub position: Square,
    pub can_castle: bool,
}
impl Piece {
    pub fn new(id: PieceId, position: Square) -> Self {
        Piece {
            id,
            position,
            can_castle: false,
        }
    }
    pub fn kind(self) -> PieceKind {
        self.id.kind
    }
    pub fn color(self) -> Color {
        self.id.color
    }
    pub fn is(self, color: Color, kind: PieceKind) -> bool {
        self.id.color == color && self.id.kind == kind
    }
    pub fn figurine(self) -> char {
        match (self.color(), self.kind()) {
            (Color::White, PieceKind::Pawn) => '♙',
            (Color::White, PieceKind::Knight) => '♘',
            (Color::White, PieceKind::Bishop) => '♗',
            (Color::White, PieceKind::Rook) => '♖',
            (Color::White, PieceKind::Queen) => '♕',
            (Color::White, PieceKind::King) => '♔',
            (Color::Black, PieceKind::Pawn) => '♟',
            (Color::Black, PieceKind::Knight) => '♞',
            (Color::Black, PieceKind::Bishop) => '♝',
            (Color::Black, PieceKind::Rook) => '♜',
            (Color::Black, PieceKind::Queen) => '♛',
            (Color::Black, PieceKind::King) => '♚',
        }
    }
    fn steps(self, moves: &[Vector]) -> CandidateMoves {
        CandidateMoves::Steps(
            moves
                .iter()
                .filter_map(|movement| self.position.move_by(*movement))
                .collect(),
        )
    }
    fn rays(self, directions: &[Vector]) -> CandidateMoves {
        CandidateMoves::Rays(
            directions
                .iter()
                .map(|direction| self.position.ray(*direction).collect::<Vec<_>>())
                .filter(|ray| !ray.is_empty())
                .collect(),
        )
    }
    fn pawn_moves(self) -> CandidateMoves {
        let color = self.color();
        // no moved flag is kept for pawns; standing on the start rank means unmoved
        let reach = if self.position.rank() == color.pawn_rank() {
            2
        } else {
            1
        };
        CandidateMoves::Pawn {
            captures: Vector::pawn_captures(color)
                .into_iter()
                .filter_map(|movement| self.position.move_by(movement))
                .collect(),
            advances: self
                .position
                .ray(Vector::pawn_advance(color))
                .take(reach)
                .collect(),
        }
    }
    /// Candidate destinations ignoring every other piece on the board.
    pub fn raw_moves(self) -> CandidateMoves {
        match self.kind() {
            PieceKind::Pawn => self.pawn_moves(),
            PieceKind::Knight => self.steps(&Vector::KNIGHT_MOVES),
            PieceKind::Bishop => self.rays(&Vector::BISHOP_DIRECTIONS),
            PieceKind::Rook => self.rays(&Vector::ROOK_DIRECTIONS),
            PieceKind::Queen => self.rays(&Vector::QUEEN_DIRECTIONS),
            PieceKind::King => self.steps(&Vector::KING_MOVES),
        }
    }
}
impl Display for Piece {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{} on {}", self.id, self.position)?;
        Ok(())
    }
}

#[cfg(test)]
mod test {
    use crate::{
        color::Color,
        piece::{CandidateMoves, Piece, PieceId, PieceKind},
        square::Square,
    };

    fn piece(color: Color, kind: PieceKind, square: &str) -> Piece {
        Piece::new(PieceId::new(color, kind, 1), square.parse().unwrap())
    }
    fn codes(squares: &[Square]) -> Vec<u8> {
        squares.iter().map(|square| square.code()).collect()
    }

    #[test]
    fn identities_render_like_names() {
        assert_eq!(
            PieceId::new(Color::White, PieceKind::King, 0).to_string(),
            "whiteKing"
        );
        assert_eq!(
            PieceId::new(Color::Black, PieceKind::Rook, 2).to_string(),
            "blackRook2"
        );
    }
    #[test]
    fn cornered_knight_has_two_steps() {
        let CandidateMoves::Steps(steps) = piece(Color::White, PieceKind::Knight, "h1").raw_moves()
        else {
            panic!("knight should step");
        };
        let mut steps = codes(&steps);
        steps.sort_unstable();
        assert_eq!(steps, [26, 37]);
    }
    #[test]
    fn queen_has_eight_rays_in_the_centre() {
        let CandidateMoves::Rays(rays) = piece(Color::Black, PieceKind::Queen, "d4").raw_moves()
        else {
            panic!("queen should slide");
        };
        assert_eq!(rays.len(), 8);
        assert_eq!(rays.iter().map(Vec::len).sum::<usize>(), 27);
    }
    #[test]
    fn rook_in_corner_drops_empty_rays() {
        let CandidateMoves::Rays(rays) = piece(Color::White, PieceKind::Rook, "a1").raw_moves()
        else {
            panic!("rook should slide");
        };
        assert_eq!(rays.len(), 2);
    }
    #[test]
    fn pawn_reach_depends_on_start_rank() {
        let CandidateMoves::Pawn { captures, advances } =
            piece(Color::White, PieceKind::Pawn, "a2").raw_moves()
        else {
            panic!("pawn moves");
        };
        assert_eq!(codes(&captures), [32]);
        assert_eq!(codes(&advances), [31, 41]);

        let CandidateMoves::Pawn { advances, .. } =
            piece(Color::Black, PieceKind::Pawn, "e6").raw_moves()
        else {
            panic!("pawn moves");
        };
        assert_eq!(codes(&advances), [55]);

        let CandidateMoves::Pawn { advances, captures } =
            piece(Color::Black, PieceKind::Pawn, "e7").raw_moves()
        else {
            panic!("pawn moves");
        };
        assert_eq!(codes(&advances), [65, 55]);
        assert_eq!(codes(&captures), [64, 66]);
    }
}
