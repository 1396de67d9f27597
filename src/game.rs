//! Turn handling and the selection flow.
//!
//! A turn is two requests: select a piece of the side to move, which
//! records its legal destinations, then commit one of them. Selecting an
//! enemy piece standing on one of the recorded destinations captures it.

use std::fmt::{self, Display, Formatter};

use rustc_hash::FxHashSet;
use tracing::{debug, info};

use crate::{
    arrangement::Arrangement,
    board::{Board, PieceIndex},
    color::Color,
    end_state::EndState,
    error::{GameError, InvalidPosition, InvalidSelection},
    fen::Fen,
    legality::Castling,
    piece::{Piece, PieceId, PieceKind},
    square::Square,
};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Phase {
    AwaitingSelection,
    PieceSelected {
        piece: PieceIndex,
        moves: FxHashSet<Square>,
    },
    GameOver(EndState),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GameEvent {
    PieceCaptured(Piece),
    PawnPromoted {
        pawn: PieceId,
        queen: PieceId,
        square: Square,
    },
    Castled {
        king: PieceId,
        rook: PieceId,
    },
    TurnChanged(Color),
    Check(Color),
    GameOver(EndState),
}
impl Display for GameEvent {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            GameEvent::PieceCaptured(piece) => {
                write!(f, "{} captured on {}", piece.id, piece.position)?;
            }
            GameEvent::PawnPromoted { pawn, queen, square } => {
                write!(f, "{pawn} promoted to {queen} on {square}")?;
            }
            GameEvent::Castled { king, rook } => write!(f, "{king} castled with {rook}")?,
            GameEvent::TurnChanged(color) => write!(f, "{color} plays")?,
            GameEvent::Check(color) => write!(f, "{color} is in check")?,
            GameEvent::GameOver(end_state) => write!(f, "{end_state}")?,
        }
        Ok(())
    }
}

/// Result of a successful selection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Selection {
    /// A piece of the side to move is now selected.
    Selected { piece: PieceId, moves: Vec<Square> },
    /// The request captured the chosen enemy piece and completed the turn.
    Moved(Vec<GameEvent>),
}

#[derive(Debug, Clone)]
pub struct Game {
    board: Board,
    turn: Color,
    phase: Phase,
    arrangement: Option<Arrangement>,
    fullmove: u32,
    captured: Vec<Piece>,
}
impl Game {
    pub fn new(arrangement: Arrangement) -> Self {
        info!(%arrangement, id = arrangement.id(), "new game");
        Game {
            board: Board::from_arrangement(arrangement),
            turn: Color::White,
            phase: Phase::AwaitingSelection,
            arrangement: Some(arrangement),
            fullmove: 1,
            captured: Vec::new(),
        }
    }
    /// Starts from an arbitrary position. Both sides need a king and the
    /// side waiting for its turn must not be in check. The game is over
    /// right away when `turn` has no legal move.
    pub fn from_board(board: Board, turn: Color) -> Result<Self, InvalidPosition> {
        for color in Color::ALL {
            if board.king(color).is_none() {
                return Err(InvalidPosition::MissingKing(color));
            }
        }
        if board.is_in_check(!turn) {
            return Err(InvalidPosition::WaitingSideInCheck(!turn));
        }
        let phase = match board.end_state(turn) {
            Some(end_state) => Phase::GameOver(end_state),
            None => Phase::AwaitingSelection,
        };
        Ok(Game {
            board,
            turn,
            phase,
            arrangement: None,
            fullmove: 1,
            captured: Vec::new(),
        })
    }
    pub fn board(&self) -> &Board {
        &self.board
    }
    pub fn turn(&self) -> Color {
        self.turn
    }
    pub fn phase(&self) -> &Phase {
        &self.phase
    }
    pub fn arrangement(&self) -> Option<Arrangement> {
        self.arrangement
    }
    pub fn pieces(&self) -> impl Iterator<Item = Piece> + '_ {
        self.board.pieces().map(|(_, piece)| piece)
    }
    /// Pieces of `color` taken so far, in capture order.
    pub fn captured(&self, color: Color) -> impl Iterator<Item = PieceId> + '_ {
        self.captured
            .iter()
            .filter(move |piece| piece.color() == color)
            .map(|piece| piece.id)
    }
    pub fn end_state(&self) -> Option<EndState> {
        match self.phase {
            Phase::GameOver(end_state) => Some(end_state),
            _ => None,
        }
    }
    pub fn selected(&self) -> Option<Piece> {
        match &self.phase {
            Phase::PieceSelected { piece, .. } => self.board[*piece],
            _ => None,
        }
    }
    /// Destinations of the selected piece, sorted.
    pub fn selected_moves(&self) -> Vec<Square> {
        let mut moves: Vec<_> = match &self.phase {
            Phase::PieceSelected { moves, .. } => moves.iter().copied().collect(),
            _ => Vec::new(),
        };
        moves.sort_unstable();
        moves
    }
    pub fn is_in_check(&self) -> bool {
        self.board.is_in_check(self.turn)
    }
    pub fn fen(&self) -> String {
        Fen {
            board: &self.board,
            turn: self.turn,
            fullmove: self.fullmove,
        }
        .to_string()
    }
    fn ensure_running(&self) -> Result<(), GameError> {
        match self.phase {
            Phase::GameOver(end_state) => Err(GameError::GameOver(end_state)),
            _ => Ok(()),
        }
    }
    /// Selects a piece by name, e.g. `whiteKnight2`.
    pub fn select(&mut self, name: &str) -> Result<Selection, GameError> {
        self.ensure_running()?;
        let index = self
            .board
            .find_by_name(name)
            .ok_or_else(|| InvalidSelection::UnknownPiece(name.to_owned()))?;
        self.select_piece(index)
    }
    pub fn select_piece(&mut self, index: PieceIndex) -> Result<Selection, GameError> {
        self.ensure_running()?;
        let piece = self.board[index].ok_or(GameError::NothingSelected)?;
        if piece.color() == self.turn {
            let moves = self.board.legal_moves(index);
            debug!(piece = %piece.id, moves = moves.len(), "selected");
            self.phase = Phase::PieceSelected {
                piece: index,
                moves: moves.iter().copied().collect(),
            };
            return Ok(Selection::Selected {
                piece: piece.id,
                moves,
            });
        }
        if let Phase::PieceSelected { moves, .. } = &self.phase
            && moves.contains(&piece.position)
        {
            return self.commit_move(piece.position).map(Selection::Moved);
        }
        debug!(piece = %piece.id, turn = %self.turn, "selection rejected");
        Err(InvalidSelection::WrongTurn {
            piece: piece.id,
            turn: self.turn,
        }
        .into())
    }
    /// Acts on a square the way a click on the board would: selects the
    /// piece there, or moves the selected piece onto it.
    pub fn select_square(&mut self, square: Square) -> Result<Selection, GameError> {
        self.ensure_running()?;
        if let Some(index) = self.board[square] {
            return self.select_piece(index);
        }
        if self.selected().is_some() {
            return self.commit_move(square).map(Selection::Moved);
        }
        Err(InvalidSelection::EmptySquare(square).into())
    }
    pub fn clear_selection(&mut self) {
        if let Phase::PieceSelected { .. } = self.phase {
            self.phase = Phase::AwaitingSelection;
        }
    }
    /// Moves the selected piece to `target`, which must be one of the
    /// destinations recorded at selection. A king moving to a castling
    /// destination that is not also a plain step castles.
    pub fn commit_move(&mut self, target: Square) -> Result<Vec<GameEvent>, GameError> {
        self.ensure_running()?;
        let Phase::PieceSelected { piece: index, moves } = &self.phase else {
            return Err(GameError::NothingSelected);
        };
        let index = *index;
        let piece = self.board[index].ok_or(GameError::NothingSelected)?;
        if !moves.contains(&target) {
            debug!(piece = %piece.id, %target, "move rejected");
            return Err(GameError::IllegalMove {
                piece: piece.id,
                target,
            });
        }
        let mut events = Vec::new();
        if piece.kind() == PieceKind::King
            && !self.board.checked_moves(index).contains(&target)
            && let Some(castling) = self
                .board
                .castling_moves(index)
                .into_iter()
                .find(|castling| castling.king_destination == target)
        {
            self.perform_castling(castling, &mut events);
        } else {
            self.perform_move(index, piece, target, &mut events);
        }
        self.finish_turn(&mut events);
        Ok(events)
    }
    /// Castles the side to move with the named rook.
    pub fn castle(&mut self, rook: &str) -> Result<Vec<GameEvent>, GameError> {
        self.ensure_running()?;
        let index = self
            .board
            .find_by_name(rook)
            .ok_or_else(|| InvalidSelection::UnknownPiece(rook.to_owned()))?;
        let piece = self.board[index].ok_or(GameError::NothingSelected)?;
        if piece.color() != self.turn {
            return Err(InvalidSelection::WrongTurn {
                piece: piece.id,
                turn: self.turn,
            }
            .into());
        }
        let castling = self.board.castling_with(index).inspect_err(|err| {
            debug!(rook = %piece.id, %err, "castling rejected");
        })?;
        let mut events = Vec::new();
        self.perform_castling(castling, &mut events);
        self.finish_turn(&mut events);
        Ok(events)
    }
    fn perform_move(
        &mut self,
        index: PieceIndex,
        piece: Piece,
        target: Square,
        events: &mut Vec<GameEvent>,
    ) {
        info!(piece = %piece.id, from = %piece.position, to = %target, "move");
        if let Some(captured) = self.board[target]
            && let Some(captured) = self.board.remove(captured)
        {
            info!(piece = %captured.id, square = %target, "capture");
            self.captured.push(captured);
            events.push(GameEvent::PieceCaptured(captured));
        }
        self.board.relocate(index, target);
        if piece.kind() == PieceKind::Pawn
            && target.rank() == piece.color().promotion_rank()
            && let Some(queen) = self.board.promote(index)
        {
            info!(pawn = %piece.id, %queen, square = %target, "promotion");
            events.push(GameEvent::PawnPromoted {
                pawn: piece.id,
                queen,
                square: target,
            });
        }
    }
    fn perform_castling(&mut self, castling: Castling, events: &mut Vec<GameEvent>) {
        let (Some(king), Some(rook)) = (self.board[castling.king], self.board[castling.rook])
        else {
            return;
        };
        info!(king = %king.id, rook = %rook.id, side = ?castling.side, "castling");
        self.board.apply_castling(castling);
        events.push(GameEvent::Castled {
            king: king.id,
            rook: rook.id,
        });
    }
    fn finish_turn(&mut self, events: &mut Vec<GameEvent>) {
        if self.turn == Color::Black {
            self.fullmove += 1;
        }
        self.turn = !self.turn;
        self.phase = Phase::AwaitingSelection;
        events.push(GameEvent::TurnChanged(self.turn));
        if let Some(end_state) = self.board.end_state(self.turn) {
            info!(%end_state, "game over");
            self.phase = Phase::GameOver(end_state);
            events.push(GameEvent::GameOver(end_state));
        } else if self.board.is_in_check(self.turn) {
            debug!(color = %self.turn, "check");
            events.push(GameEvent::Check(self.turn));
        }
    }
}
impl Default for Game {
    fn default() -> Self {
        Game::new(Arrangement::standard())
    }
}
