use anyhow::{Context, bail};
use core::str::FromStr;
use minesweeper_core::{Coord, Coord2, Difficulty};

pub(crate) const HELP: &str = "\
Commands:
  r <row> <col>   reveal a cell
  f <row> <col>   flag or unflag a cell
  n               new game
  d <level>       change difficulty (beginner, intermediate, expert)
  s               show high scores
  h               show this help
  q               quit";

#[derive(Copy, Clone, Debug, PartialEq)]
pub(crate) enum Command {
    Reveal(Coord2),
    Flag(Coord2),
    NewGame,
    SetDifficulty(Difficulty),
    Scores,
    Help,
    Quit,
}

impl FromStr for Command {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut words = s.split_whitespace();
        let Some(verb) = words.next() else {
            bail!("empty command, type h for help");
        };

        let command = match verb.to_ascii_lowercase().as_str() {
            "r" | "reveal" => Self::Reveal(parse_coords(&mut words)?),
            "f" | "flag" => Self::Flag(parse_coords(&mut words)?),
            "n" | "new" => Self::NewGame,
            "d" | "difficulty" => {
                let level = words.next().context("missing difficulty level")?;
                Self::SetDifficulty(level.parse()?)
            }
            "s" | "scores" => Self::Scores,
            "h" | "help" | "?" => Self::Help,
            "q" | "quit" | "exit" => Self::Quit,
            other => bail!("unknown command {:?}, type h for help", other),
        };

        if let Some(extra) = words.next() {
            bail!("unexpected argument {:?}", extra);
        }
        Ok(command)
    }
}

fn parse_coords<'a>(words: &mut impl Iterator<Item = &'a str>) -> anyhow::Result<Coord2> {
    let row = parse_axis(words.next(), "row")?;
    let col = parse_axis(words.next(), "column")?;
    Ok((row, col))
}

fn parse_axis(word: Option<&str>, axis: &str) -> anyhow::Result<Coord> {
    let word = word.with_context(|| format!("missing {}", axis))?;
    word.parse()
        .with_context(|| format!("invalid {} {:?}", axis, word))
}
