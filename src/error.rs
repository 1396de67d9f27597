use thiserror::Error;

use crate::{color::Color, end_state::EndState, piece::PieceId, square::Square};

/// Why a selection request was turned down.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Error)]
pub enum InvalidSelection {
    #[error("there is no piece named `{0}`")]
    UnknownPiece(String),
    #[error("no piece stands on {0}")]
    EmptySquare(Square),
    #[error("it is {turn}'s turn, {piece} cannot be selected")]
    WrongTurn { piece: PieceId, turn: Color },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Error)]
pub enum IllegalCastle {
    #[error("there is no such rook")]
    NoRook,
    #[error("{0} is not a rook")]
    NotARook(PieceId),
    #[error("{0} has no king")]
    NoKing(Color),
    #[error("{0} has already moved")]
    AlreadyMoved(PieceId),
    #[error("{0} does not share a rank with its king")]
    NotAligned(PieceId),
    #[error("{0} is in check")]
    InCheck(Color),
    #[error("{0} is in the way")]
    Blocked(Square),
    #[error("the king would pass through or land on {0}, which is attacked")]
    Attacked(Square),
}

/// Why [`Game::from_board`](crate::game::Game::from_board) refused a position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Error)]
pub enum InvalidPosition {
    #[error("{0} has no king")]
    MissingKing(Color),
    #[error("{0} is in check but it is not their turn")]
    WaitingSideInCheck(Color),
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Error)]
pub enum GameError {
    #[error(transparent)]
    InvalidSelection(#[from] InvalidSelection),
    #[error("no piece is selected")]
    NothingSelected,
    #[error("{piece} cannot move to {target}")]
    IllegalMove { piece: PieceId, target: Square },
    #[error("cannot castle: {0}")]
    IllegalCastle(#[from] IllegalCastle),
    #[error("the game is over, {0}")]
    GameOver(EndState),
}
