use std::fmt::{self, Display, Formatter};

use crate::color::Color;

/// How a finished game ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EndState {
    /// The other side was checkmated.
    Win(Color),
    /// The side to move has no legal move but is not in check.
    Stalemate,
}
impl EndState {
    pub fn winner(self) -> Option<Color> {
        match self {
            EndState::Win(color) => Some(color),
            EndState::Stalemate => None,
        }
    }
}
impl Display for EndState {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            EndState::Win(color) => write!(f, "checkmate, {color} wins")?,
            EndState::Stalemate => write!(f, "stalemate, the game is drawn")?,
        }
        Ok(())
    }
}
