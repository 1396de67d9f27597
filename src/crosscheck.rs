use rand::{Rng, SeedableRng, rngs::SmallRng};
use rustc_hash::FxHashSet;

use crate::{
    board_display::{BoardDisplay, Ranks},
    game::Game,
    square::Square,
};

const PLIES: usize = 1500;
const MAX_GAME_LENGTH: usize = 120;

impl From<chess::Square> for Square {
    fn from(value: chess::Square) -> Self {
        let file = u8::try_from(value.get_file().to_index()).unwrap();
        let rank = u8::try_from(value.get_rank().to_index()).unwrap();
        Square::new(file + 1, rank + 1)
    }
}
fn legal_pairs(game: &Game) -> FxHashSet<(Square, Square)> {
    let board = game.board();
    board
        .pieces_of(game.turn())
        .flat_map(|(index, piece)| {
            board
                .legal_moves(index)
                .into_iter()
                .map(move |destination| (piece.position, destination))
        })
        .collect()
}
fn oracle_pairs(fen: &str) -> FxHashSet<(Square, Square)> {
    let board: chess::Board = fen.parse().unwrap();
    chess::MoveGen::new_legal(&board)
        .map(|movement| (movement.get_source().into(), movement.get_dest().into()))
        .collect()
}
fn describe(game: &Game) -> String {
    let highlighted = game.selected_moves();
    BoardDisplay {
        board: game.board(),
        view: game.turn(),
        ranks: Ranks::All,
        highlighted: &highlighted,
        info: &game.fen(),
    }
    .to_string()
}
#[test]
fn random_games_agree_with_the_chess_crate() {
    let mut rng = SmallRng::seed_from_u64(960);
    let mut game = Game::default();
    let mut length = 0;
    for _ in 0..PLIES {
        let moves = legal_pairs(&game);
        let fen = game.fen();
        let expected = oracle_pairs(&fen);
        if let Some((origin, destination)) = moves.difference(&expected).next() {
            panic!(
                "found {origin}{destination} but it's not a legal move\n{}",
                describe(&game)
            );
        }
        if let Some((origin, destination)) = expected.difference(&moves).next() {
            panic!("{origin}{destination} not found\n{}", describe(&game));
        }
        if moves.is_empty() || length >= MAX_GAME_LENGTH {
            assert_eq!(moves.is_empty(), game.end_state().is_some(), "{fen}");
            game = Game::default();
            length = 0;
            continue;
        }
        let moves: Box<[_]> = moves.into_iter().collect();
        let (origin, destination) = moves[rng.random_range(0..moves.len())];
        game.select_square(origin).unwrap();
        game.commit_move(destination).unwrap();
        length += 1;
    }
}
