use core::fmt::Write;
use minesweeper_core::{CellView, Outcome, Snapshot};

/// Glyph for a cell, taking the end of game reveal into account.
fn glyph(cell: &CellView, outcome: Outcome) -> char {
    let over = outcome.is_over();
    match cell {
        CellView { revealed: true, is_mine: true, .. } => 'X',
        CellView { revealed: true, adjacent_count: Some(0), .. } => ' ',
        CellView { revealed: true, adjacent_count: Some(count), .. } => char::from(b'0' + count),
        CellView { flagged: true, .. } if over && cell.is_misflagged() => 'x',
        CellView { flagged: true, .. } => 'F',
        CellView { is_mine: true, .. } if outcome == Outcome::Lost => '*',
        _ => '.',
    }
}

fn status(outcome: Outcome) -> &'static str {
    match outcome {
        Outcome::InProgress => "",
        Outcome::Won => "You win!",
        Outcome::Lost => "You lose!",
    }
}

pub(crate) fn board_text(snapshot: &Snapshot) -> String {
    let mut out = String::new();
    let level = snapshot
        .difficulty
        .map(|difficulty| difficulty.name())
        .unwrap_or("Custom");

    // writing into a String cannot fail
    let _ = writeln!(
        out,
        "{}  Mines left: {}  Time: {}  {}",
        level,
        snapshot.mines_left,
        snapshot.elapsed_secs,
        status(snapshot.outcome)
    );

    out.push_str("   ");
    for col in 0..snapshot.side {
        let _ = write!(out, "{:>3}", col);
    }
    out.push('\n');

    for (row, cells) in snapshot.cells.rows().into_iter().enumerate() {
        let _ = write!(out, "{:>3}", row);
        for cell in cells {
            let _ = write!(out, "{:>3}", glyph(cell, snapshot.outcome));
        }
        out.push('\n');
    }
    out
}
