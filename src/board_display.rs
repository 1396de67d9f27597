use std::fmt::{self, Display, Formatter};

use crate::{board::Board, color::Color, square::Square};

const WHITE: &str = "\x1b[30;107m";
const BLACK: &str = "\x1b[30;47m";
const HIGHLIGHTED: &str = "\x1b[30;103m";
const RESET: &str = "\x1b[0m";

/// Which ranks get drawn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Ranks {
    All,
    /// Ranks 8 and 1 only, for previewing a starting arrangement.
    BackRanks,
}
impl Ranks {
    fn top_down(self) -> &'static [u8] {
        match self {
            Ranks::All => &[8, 7, 6, 5, 4, 3, 2, 1],
            Ranks::BackRanks => &[8, 1],
        }
    }
}

pub struct BoardDisplay<'a, 'b, 'c> {
    pub board: &'a Board,
    pub view: Color,
    pub ranks: Ranks,
    pub highlighted: &'b [Square],
    pub info: &'c str,
}
impl Display for BoardDisplay<'_, '_, '_> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        let mut lines = self.info.lines().fuse();
        let mut ranks = self.ranks.top_down().to_vec();
        if self.view == Color::Black {
            ranks.reverse();
        }
        for rank in ranks {
            for file in 1..=8 {
                let file = match self.view {
                    Color::White => file,
                    Color::Black => 9 - file,
                };
                let square = Square::new(file, rank);
                let color = if self.highlighted.contains(&square) {
                    HIGHLIGHTED
                } else {
                    match square.color() {
                        Color::White => WHITE,
                        Color::Black => BLACK,
                    }
                };
                let figurine = self
                    .board
                    .piece_at(square)
                    .map_or(' ', |piece| piece.figurine());
                write!(f, "{color}{figurine} {RESET}")?;
            }
            write!(f, "{rank}")?;
            if let Some(line) = lines.next() {
                write!(f, " {line}")?;
            }
            writeln!(f)?;
        }
        match self.view {
            Color::White => write!(f, "a b c d e f g h")?,
            Color::Black => write!(f, "h g f e d c b a")?,
        }
        if let Some(line) = lines.next() {
            write!(f, "   {line}")?;
        }
        writeln!(f)?;
        for line in lines {
            writeln!(f, "                  {line}")?;
        }
        Ok(())
    }
}
