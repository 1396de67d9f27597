#![forbid(unsafe_code)]
#![warn(clippy::pedantic)]

pub mod arrangement;
pub mod board;
pub mod board_display;
mod check;
pub mod color;
pub mod config;
#[cfg(test)]
mod crosscheck;
pub mod end_state;
pub mod error;
pub mod fen;
pub mod game;
pub mod legality;
mod misc;
pub mod piece;
pub mod repl;
pub mod square;

pub use crate::{
    arrangement::Arrangement,
    board::{Board, PieceIndex},
    color::Color,
    end_state::EndState,
    error::{GameError, IllegalCastle, InvalidPosition, InvalidSelection},
    game::{Game, GameEvent, Phase, Selection},
    piece::{Piece, PieceId, PieceKind},
    square::Square,
};
