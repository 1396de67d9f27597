use std::{
    fmt::{self, Display, Formatter},
    io::{self, BufRead, Write, stderr, stdin, stdout},
    num::ParseIntError,
    str::FromStr,
};

use thiserror::Error;

use crate::{
    arrangement::Arrangement,
    board::Board,
    board_display::{BoardDisplay, Ranks},
    color::Color,
    game::{Game, GameEvent, Selection},
    misc::strip_prefix_token,
    square::{ParseSquareError, Square},
};

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
enum Input {
    Help,
    Flip,
    Restart,
    New(Option<u16>),
    Preview(Option<u16>),
    Pieces,
    ExportFen,
    Quit,
    Square(Square),
    Piece(String),
    Move(Square, Square),
    Castle(String),
}
impl Display for Input {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Input::Help => write!(f, "help")?,
            Input::Flip => write!(f, "flip")?,
            Input::Restart => write!(f, "restart")?,
            Input::New(None) => write!(f, "new")?,
            Input::New(Some(id)) => write!(f, "new {id}")?,
            Input::Preview(None) => write!(f, "preview")?,
            Input::Preview(Some(id)) => write!(f, "preview {id}")?,
            Input::Pieces => write!(f, "pieces")?,
            Input::ExportFen => write!(f, "fen")?,
            Input::Quit => write!(f, "quit")?,
            Input::Square(square) => write!(f, "{square}")?,
            Input::Piece(name) => write!(f, "{name}")?,
            Input::Move(origin, destination) => write!(f, "{origin}{destination}")?,
            Input::Castle(rook) => write!(f, "castle {rook}")?,
        }
        Ok(())
    }
}
fn optional_id(s: &str) -> Result<Option<u16>, ParseInputError> {
    if s.is_empty() {
        Ok(None)
    } else {
        Ok(Some(s.parse()?))
    }
}
impl FromStr for Input {
    type Err = ParseInputError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "help" => Ok(Input::Help),
            "flip" => Ok(Input::Flip),
            "restart" => Ok(Input::Restart),
            "pieces" => Ok(Input::Pieces),
            "fen" => Ok(Input::ExportFen),
            "quit" => Ok(Input::Quit),
            s => {
                if let Some(s) = strip_prefix_token(s, "new") {
                    Ok(Input::New(optional_id(s)?))
                } else if let Some(s) = strip_prefix_token(s, "preview") {
                    Ok(Input::Preview(optional_id(s)?))
                } else if let Some(s) = strip_prefix_token(s, "castle") {
                    Ok(Input::Castle(s.to_owned()))
                } else if s.starts_with("white") || s.starts_with("black") {
                    Ok(Input::Piece(s.to_owned()))
                } else if s.len() == 4
                    && let (Some(origin), Some(destination)) = (s.get(..2), s.get(2..))
                {
                    Ok(Input::Move(origin.parse()?, destination.parse()?))
                } else if s.len() == 2 {
                    Ok(Input::Square(s.parse()?))
                } else {
                    Err(ParseInputError::Unknown(s.to_owned()))
                }
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
enum ParseInputError {
    #[error(transparent)]
    Square(#[from] ParseSquareError),
    #[error("invalid position number: {0}")]
    Int(#[from] ParseIntError),
    #[error("unknown command `{0}`")]
    Unknown(String),
}

fn report(mut output: impl Write, events: &[GameEvent]) -> io::Result<()> {
    for event in events {
        match event {
            GameEvent::TurnChanged(_) => {}
            event => writeln!(output, "{event}")?,
        }
    }
    Ok(())
}

struct Session {
    game: Game,
    id: u16,
    arrangement: Arrangement,
}
impl Session {
    fn new(id: u16, arrangement: Arrangement) -> Self {
        Session {
            game: Game::new(arrangement),
            id,
            arrangement,
        }
    }
    fn status(&self) -> String {
        let mut lines = vec![format!("Chess960 #{} {}", self.id, self.arrangement)];
        match self.game.end_state() {
            Some(end_state) => lines.push(end_state.to_string()),
            None => {
                lines.push(format!("{} plays", self.game.turn()));
                if self.game.is_in_check() {
                    lines.push(format!("{} is in check", self.game.turn()));
                }
            }
        }
        if let Some(piece) = self.game.selected() {
            lines.push(format!("{} selected", piece.id));
        }
        for color in Color::ALL {
            let captured: Vec<_> = self.game.captured(color).map(|id| id.to_string()).collect();
            if !captured.is_empty() {
                lines.push(format!("{color} lost {}", captured.join(", ")));
            }
        }
        lines.join("\n")
    }
}

#[allow(
    clippy::too_many_lines,
    reason = "further decomposition could potentially hurt readability"
)]
pub fn repl(mut view: Color, id: u16, arrangement: Arrangement) -> io::Result<()> {
    let input = stdin().lock();
    let mut output = stdout().lock();
    let mut error = stderr().lock();

    let mut lines = input.lines();

    let mut session = Session::new(id, arrangement);
    let mut highlighted = Vec::new();
    let mut first_time = true;
    loop {
        let mut info = session.status();
        if first_time {
            info.push_str("\ntype `help` for instructions");
            first_time = false;
        }
        writeln!(
            output,
            "{}",
            BoardDisplay {
                board: session.game.board(),
                view,
                ranks: Ranks::All,
                highlighted: &highlighted,
                info: &info,
            },
        )?;
        loop {
            write!(output, "> ")?;
            output.flush()?;
            let Some(text) = lines.next() else {
                return Ok(());
            };
            let text = text?;
            let input = match text.trim().parse() {
                Ok(input) => input,
                Err(err) => {
                    writeln!(error, "Error: {err}")?;
                    writeln!(error, "for available command, enter `help`")?;
                    continue;
                }
            };
            match input {
                Input::Help => {
                    writeln!(output, "flip             - flip the board")?;
                    writeln!(output, "restart          - restart the current position")?;
                    writeln!(output, "new [number]     - start a new game, random if no number")?;
                    writeln!(output, "preview [number] - show the back ranks of a position")?;
                    writeln!(output, "pieces           - list the pieces in play")?;
                    writeln!(output, "fen              - export the position as fen")?;
                    writeln!(output, "quit             - quit the game")?;
                    writeln!(output, "e2               - select the piece on e2, or move there")?;
                    writeln!(output, "whiteKnight1     - select a piece by name")?;
                    writeln!(output, "e2e4             - play the move")?;
                    writeln!(output, "castle <rook>    - castle with the named rook")?;
                    continue;
                }
                Input::Flip => {
                    view = !view;
                }
                Input::Restart => {
                    session = Session::new(session.id, session.arrangement);
                    highlighted.clear();
                }
                Input::New(id) => {
                    let (id, arrangement) = match id {
                        Some(id) => match Arrangement::from_id(id) {
                            Ok(arrangement) => (id, arrangement),
                            Err(err) => {
                                writeln!(error, "Error: {err}")?;
                                continue;
                            }
                        },
                        None => Arrangement::random(),
                    };
                    session = Session::new(id, arrangement);
                    highlighted.clear();
                }
                Input::Preview(id) => {
                    let (id, arrangement) = match id.map(Arrangement::from_id) {
                        Some(Ok(arrangement)) => (id.unwrap_or_default(), arrangement),
                        Some(Err(err)) => {
                            writeln!(error, "Error: {err}")?;
                            continue;
                        }
                        None => (session.id, session.arrangement),
                    };
                    writeln!(
                        output,
                        "{}",
                        BoardDisplay {
                            board: &Board::from_arrangement(arrangement),
                            view,
                            ranks: Ranks::BackRanks,
                            highlighted: &[],
                            info: &format!("Chess960 #{id}\n{arrangement}"),
                        }
                    )?;
                    continue;
                }
                Input::Pieces => {
                    for piece in session.game.pieces() {
                        writeln!(
                            output,
                            "{:<14} {:<6} {:<5} {}",
                            piece.id.to_string(),
                            piece.kind().to_string(),
                            piece.color().to_string(),
                            piece.position,
                        )?;
                    }
                    continue;
                }
                Input::ExportFen => {
                    writeln!(output, "{}", session.game.fen())?;
                    continue;
                }
                Input::Quit => return Ok(()),
                Input::Square(square) => {
                    let origin = session.game.selected().map(|piece| piece.position);
                    match session.game.select_square(square) {
                        Ok(Selection::Selected { moves, .. }) => {
                            highlighted = moves;
                        }
                        Ok(Selection::Moved(events)) => {
                            report(&mut output, &events)?;
                            highlighted.clear();
                            highlighted.extend(origin);
                            highlighted.push(square);
                        }
                        Err(err) => {
                            writeln!(error, "Error: {err}")?;
                            continue;
                        }
                    }
                }
                Input::Piece(name) => {
                    let origin = session.game.selected().map(|piece| piece.position);
                    match session.game.select(&name) {
                        Ok(Selection::Selected { moves, .. }) => {
                            highlighted = moves;
                        }
                        Ok(Selection::Moved(events)) => {
                            report(&mut output, &events)?;
                            highlighted.clear();
                            highlighted.extend(origin);
                        }
                        Err(err) => {
                            writeln!(error, "Error: {err}")?;
                            continue;
                        }
                    }
                }
                Input::Move(origin, destination) => {
                    let Some(index) = session.game.board()[origin] else {
                        writeln!(error, "Error: no piece stands on {origin}")?;
                        continue;
                    };
                    session.game.clear_selection();
                    let result = session
                        .game
                        .select_piece(index)
                        .and_then(|_| session.game.commit_move(destination));
                    match result {
                        Ok(events) => {
                            report(&mut output, &events)?;
                            highlighted.clear();
                            highlighted.push(origin);
                            highlighted.push(destination);
                        }
                        Err(err) => {
                            session.game.clear_selection();
                            writeln!(error, "Error: {err}")?;
                            continue;
                        }
                    }
                }
                Input::Castle(rook) => match session.game.castle(&rook) {
                    Ok(events) => {
                        report(&mut output, &events)?;
                        highlighted.clear();
                    }
                    Err(err) => {
                        writeln!(error, "Error: {err}")?;
                        continue;
                    }
                },
            }
            break;
        }
    }
}
