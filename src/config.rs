use clap::Parser;
use thiserror::Error;

use crate::{
    arrangement::{Arrangement, InvalidPositionId, ParseArrangementError},
    color::Color,
};

/// Play Chess960 in the terminal.
#[derive(Debug, Clone, Parser)]
#[command(version, about)]
pub struct Args {
    /// Start from this Chess960 position number
    #[arg(long, value_name = "0..959", conflicts_with_all = ["arrangement", "random"])]
    pub position: Option<u16>,
    /// Start from this back rank, e.g. RNBQKBNR
    #[arg(long, conflicts_with = "random")]
    pub arrangement: Option<String>,
    /// Start from a random Chess960 position
    #[arg(long)]
    pub random: bool,
    /// Side shown at the bottom of the board
    #[arg(long, default_value = "white")]
    pub view: Color,
    /// Log filter directives
    #[arg(long, env = "CHESS960_LOG", default_value = "warn")]
    pub log: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error(transparent)]
    Position(#[from] InvalidPositionId),
    #[error("invalid arrangement `{text}`: {source}")]
    Arrangement {
        text: String,
        source: ParseArrangementError,
    },
}

/// Where the first game starts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StartPosition {
    Standard,
    Numbered(u16),
    Random,
    Custom(Arrangement),
}
impl StartPosition {
    /// Picks the arrangement and its number, rolling one for
    /// [`StartPosition::Random`].
    pub fn arrangement(self) -> Result<(u16, Arrangement), InvalidPositionId> {
        match self {
            StartPosition::Standard => Ok((Arrangement::STANDARD_ID, Arrangement::standard())),
            StartPosition::Numbered(id) => Ok((id, Arrangement::from_id(id)?)),
            StartPosition::Random => Ok(Arrangement::random()),
            StartPosition::Custom(arrangement) => Ok((arrangement.id(), arrangement)),
        }
    }
}
impl Args {
    pub fn start_position(&self) -> Result<StartPosition, ConfigError> {
        if let Some(id) = self.position {
            Arrangement::from_id(id)?;
            Ok(StartPosition::Numbered(id))
        } else if let Some(text) = &self.arrangement {
            let arrangement = text
                .parse()
                .map_err(|source| ConfigError::Arrangement {
                    text: text.clone(),
                    source,
                })?;
            Ok(StartPosition::Custom(arrangement))
        } else if self.random {
            Ok(StartPosition::Random)
        } else {
            Ok(StartPosition::Standard)
        }
    }
}

#[cfg(test)]
mod test {
    use clap::Parser;

    use crate::{
        arrangement::Arrangement,
        color::Color,
        config::{Args, ConfigError, StartPosition},
    };

    fn parse(args: &[&str]) -> Args {
        Args::try_parse_from(std::iter::once("chess960").chain(args.iter().copied())).unwrap()
    }

    #[test]
    fn defaults_to_the_standard_position() {
        let args = parse(&[]);
        assert_eq!(args.view, Color::White);
        assert_eq!(args.start_position(), Ok(StartPosition::Standard));
        assert_eq!(
            StartPosition::Standard.arrangement(),
            Ok((518, Arrangement::standard()))
        );
    }
    #[test]
    fn numbered_and_custom_positions() {
        let args = parse(&["--position", "0", "--view", "black"]);
        assert_eq!(args.view, Color::Black);
        assert_eq!(args.start_position(), Ok(StartPosition::Numbered(0)));

        let args = parse(&["--arrangement", "RKRNNQBB"]);
        let Ok(StartPosition::Custom(arrangement)) = args.start_position() else {
            panic!("custom arrangement expected");
        };
        assert_eq!(StartPosition::Custom(arrangement).arrangement(), Ok((959, arrangement)));
    }
    #[test]
    fn bad_positions_are_reported() {
        assert!(matches!(
            parse(&["--position", "960"]).start_position(),
            Err(ConfigError::Position(_))
        ));
        assert!(matches!(
            parse(&["--arrangement", "RNBQKBNQ"]).start_position(),
            Err(ConfigError::Arrangement { .. })
        ));
        assert!(Args::try_parse_from(["chess960", "--position", "3", "--random"]).is_err());
    }
    #[test]
    fn random_start_rolls_a_valid_number() {
        let (id, arrangement) = StartPosition::Random.arrangement().unwrap();
        assert_eq!(arrangement.id(), id);
    }
}
