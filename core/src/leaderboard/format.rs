//! Text form of the high score file.
//!
//! ```text
//! High Scores
//! Beginner
//! 1. alice: 31 seconds
//! 2. : 45 seconds
//! 3.
//! 4.
//! 5.
//! Intermediate
//! ...
//! ```
//!
//! Every difficulty always lists all slots. An empty slot keeps only its rank, and an entry whose
//! player has not been named yet is written with an empty name.

use core::fmt;
use core::str::FromStr;

use super::*;

const HEADER: &str = "High Scores";
const TIME_SUFFIX: &str = "seconds";

impl fmt::Display for Leaderboard {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}", HEADER)?;
        for difficulty in Difficulty::ALL {
            writeln!(f, "{}", difficulty.name())?;
            let entries = self.entries(difficulty);
            for rank in 1..=LEADERBOARD_SLOTS {
                match entries.get(rank - 1) {
                    Some(entry) => writeln!(
                        f,
                        "{}. {}{} {} {}",
                        rank,
                        entry.name.as_deref().unwrap_or_default(),
                        NAME_DELIMITER,
                        entry.seconds,
                        TIME_SUFFIX
                    )?,
                    None => writeln!(f, "{}. ", rank)?,
                }
            }
        }
        Ok(())
    }
}

impl FromStr for Leaderboard {
    type Err = LeaderboardError;

    fn from_str(s: &str) -> Result<Self> {
        let mut lines = NumberedLines::new(s);
        let mut leaderboard = Leaderboard::new();

        let (line, header) = lines.next_line()?;
        if header.trim() != HEADER {
            return Err(malformed(line, format!("expected {:?} header", HEADER)));
        }

        for difficulty in Difficulty::ALL {
            let (line, marker) = lines.next_line()?;
            if marker.trim() != difficulty.name() {
                return Err(malformed(
                    line,
                    format!("expected {:?} section", difficulty.name()),
                ));
            }

            let mut previous: Option<u32> = None;
            let mut seen_empty = false;
            for rank in 1..=LEADERBOARD_SLOTS {
                let (line, text) = lines.next_line()?;
                let slot = parse_slot(text, rank).map_err(|reason| malformed(line, reason))?;

                let Some(entry) = slot else {
                    seen_empty = true;
                    continue;
                };
                if seen_empty {
                    return Err(malformed(line, "score listed after an empty slot".into()));
                }
                if previous.is_some_and(|seconds| seconds > entry.seconds) {
                    return Err(malformed(line, "scores are not in ascending order".into()));
                }
                previous = Some(entry.seconds);
                leaderboard.push_loaded(difficulty, entry);
            }
        }

        if let Some((line, _)) = lines.find(|(_, text)| !text.trim().is_empty()) {
            return Err(malformed(line, "unexpected content after last section".into()));
        }

        Ok(leaderboard)
    }
}

fn malformed(line: usize, reason: String) -> LeaderboardError {
    LeaderboardError::Malformed { line, reason }
}

/// Parses `<rank>. <name>: <seconds> seconds`, or `<rank>.` for an empty slot.
fn parse_slot(text: &str, rank: usize) -> core::result::Result<Option<ScoreEntry>, String> {
    let rest = text
        .trim()
        .strip_prefix(&format!("{}.", rank))
        .ok_or_else(|| format!("expected rank {}", rank))?
        .trim();
    if rest.is_empty() {
        return Ok(None);
    }

    let (name, time) = rest
        .split_once(NAME_DELIMITER)
        .ok_or_else(|| format!("missing {:?} between name and time", NAME_DELIMITER))?;
    if time.contains(NAME_DELIMITER) {
        return Err(format!("name contains {:?}", NAME_DELIMITER));
    }

    let seconds = time
        .trim()
        .strip_suffix(TIME_SUFFIX)
        .map(str::trim)
        .and_then(|number| number.parse::<u32>().ok())
        .ok_or_else(|| format!("invalid time {:?}", time.trim()))?;

    let name = name.trim();
    Ok(Some(if name.is_empty() {
        ScoreEntry::pending(seconds)
    } else {
        ScoreEntry::named(name, seconds)
    }))
}

/// Lines paired with their 1-based line number.
struct NumberedLines<'a> {
    inner: core::iter::Enumerate<core::str::Lines<'a>>,
    last: usize,
}

impl<'a> NumberedLines<'a> {
    fn new(text: &'a str) -> Self {
        Self {
            inner: text.lines().enumerate(),
            last: 0,
        }
    }

    fn next_line(&mut self) -> Result<(usize, &'a str)> {
        self.next()
            .ok_or_else(|| malformed(self.last + 1, "unexpected end of file".into()))
    }
}

impl<'a> Iterator for NumberedLines<'a> {
    type Item = (usize, &'a str);

    fn next(&mut self) -> Option<Self::Item> {
        let (index, text) = self.inner.next()?;
        self.last = index + 1;
        Some((self.last, text))
    }
}
