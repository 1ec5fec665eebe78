//! Ranking: ordering players per game type, win ratios, and paged standings views.

use crate::models::{GameType, PlayerRecord, Scoreboard};
use serde::Serialize;
use std::cmp::Ordering;
use std::fmt;
use std::io;

/// Default number of leading rows in a capped view.
pub const DEFAULT_TOP_N: usize = 5;

/// wins / (wins + losses), or None before any decided game.
pub fn win_ratio(record: &PlayerRecord) -> Option<f64> {
    match record.decided_games() {
        0 => None,
        games => Some(f64::from(record.wins) / f64::from(games)),
    }
}

/// Win ratio as display text; "N/A" when undefined.
pub fn format_win_ratio(record: &PlayerRecord) -> String {
    match win_ratio(record) {
        Some(ratio) => format!("{:.3}", ratio),
        None => "N/A".to_string(),
    }
}

/// Ordering of two records on a board of `game_type` (best first). Does not break ties.
pub fn compare_records(game_type: GameType, a: &PlayerRecord, b: &PlayerRecord) -> Ordering {
    match game_type {
        GameType::Elo => b.elo.cmp(&a.elo),
        GameType::Points => b.points.cmp(&a.points),
        GameType::WinLoss | GameType::ZeroSum => b.wins.cmp(&a.wins).then(a.losses.cmp(&b.losses)),
    }
}

/// Players best first; equal records fall back to name order.
pub fn sort_players(board: &Scoreboard) -> Vec<(&str, &PlayerRecord)> {
    let mut players: Vec<(&str, &PlayerRecord)> = board
        .players
        .iter()
        .map(|(name, record)| (name.as_str(), record))
        .collect();
    players.sort_by(|(na, a), (nb, b)| compare_records(board.game_type, a, b).then(na.cmp(nb)));
    players
}

/// How much of the ranking to show.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum View {
    Full,
    /// Leading `n` rows plus any highlighted players further down.
    Top(usize),
}

/// One ranked player. Tied records share a rank.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct RankedPlayer {
    pub rank: usize,
    pub name: String,
    pub record: PlayerRecord,
    pub win_ratio: Option<f64>,
    /// Named by the most recent score event.
    pub highlighted: bool,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum StandingsRow {
    Player(RankedPlayer),
    /// Placeholder for `hidden` consecutive players left out of a capped view.
    Collapsed { hidden: usize },
}

/// Ranked view of one board.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Standings {
    pub board: String,
    #[serde(rename = "type")]
    pub game_type: GameType,
    pub archived: bool,
    pub rows: Vec<StandingsRow>,
}

impl Standings {
    /// Ranked players shown in this view (placeholders skipped).
    pub fn players(&self) -> impl Iterator<Item = &RankedPlayer> {
        self.rows.iter().filter_map(|row| match row {
            StandingsRow::Player(p) => Some(p),
            StandingsRow::Collapsed { .. } => None,
        })
    }

    /// Write the shown players as CSV with a header row.
    pub fn write_csv<W: io::Write>(&self, writer: W) -> csv::Result<()> {
        let mut wtr = csv::Writer::from_writer(writer);
        wtr.write_record(["rank", "player", "wins", "losses", "draws", "points", "elo", "win_ratio"])?;
        for p in self.players() {
            wtr.write_record([
                p.rank.to_string(),
                p.name.clone(),
                p.record.wins.to_string(),
                p.record.losses.to_string(),
                p.record.draws.to_string(),
                p.record.points.to_string(),
                p.record.elo.to_string(),
                format_win_ratio(&p.record),
            ])?;
        }
        wtr.flush()?;
        Ok(())
    }
}

/// Build the standings of `board`. Players in `highlight` are marked and always shown.
pub fn standings(board: &Scoreboard, view: View, highlight: &[String]) -> Standings {
    let sorted = sort_players(board);
    let limit = match view {
        View::Full => usize::MAX,
        View::Top(n) => n,
    };

    let mut rows = Vec::new();
    let mut hidden = 0;
    let mut rank = 0;
    let mut previous: Option<&PlayerRecord> = None;
    for (idx, &(name, record)) in sorted.iter().enumerate() {
        let tied = previous.is_some_and(|p| compare_records(board.game_type, p, record) == Ordering::Equal);
        if !tied {
            rank = idx + 1;
        }
        previous = Some(record);

        let highlighted = highlight.iter().any(|h| h == name);
        if idx >= limit && !highlighted {
            hidden += 1;
            continue;
        }
        if hidden > 0 {
            rows.push(StandingsRow::Collapsed { hidden });
            hidden = 0;
        }
        rows.push(StandingsRow::Player(RankedPlayer {
            rank,
            name: name.to_string(),
            record: record.clone(),
            win_ratio: win_ratio(record),
            highlighted,
        }));
    }
    if hidden > 0 {
        rows.push(StandingsRow::Collapsed { hidden });
    }

    Standings {
        board: board.name.clone(),
        game_type: board.game_type,
        archived: board.archived,
        rows,
    }
}

const COL_WIDTH: usize = 8;

/// Fixed-width text table; highlighted players are marked with `*`.
impl fmt::Display for Standings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let headers: &[&str] = match self.game_type {
            GameType::Points => &["Points"],
            GameType::WinLoss | GameType::ZeroSum => &["Wins", "Losses", "Draws", "Ratio"],
            GameType::Elo => &["Elo", "Wins", "Losses", "Draws"],
        };
        let name_width = self
            .players()
            .map(|p| p.name.chars().count())
            .max()
            .unwrap_or(0)
            .max(10);

        let title = if self.archived {
            format!("{} [archived]", self.board)
        } else {
            self.board.clone()
        };
        writeln!(f, "{}", title)?;
        write!(f, "{:>5}  {:<name_width$}", "#", "Player")?;
        for h in headers {
            write!(f, " | {:>width$}", h, width = COL_WIDTH)?;
        }
        writeln!(f)?;
        let width = 7 + name_width + headers.len() * (COL_WIDTH + 3);
        writeln!(f, "{}", "=".repeat(width))?;

        for row in &self.rows {
            match row {
                StandingsRow::Collapsed { hidden } => {
                    writeln!(f, "{:>5}  ({} more)", "...", hidden)?;
                }
                StandingsRow::Player(p) => {
                    let marker = if p.highlighted { "*" } else { " " };
                    write!(f, "{}{:>4}  {:<name_width$}", marker, p.rank, p.name)?;
                    let r = &p.record;
                    let cells: Vec<String> = match self.game_type {
                        GameType::Points => vec![r.points.to_string()],
                        GameType::WinLoss | GameType::ZeroSum => vec![
                            r.wins.to_string(),
                            r.losses.to_string(),
                            r.draws.to_string(),
                            format_win_ratio(r),
                        ],
                        GameType::Elo => vec![
                            r.elo.to_string(),
                            r.wins.to_string(),
                            r.losses.to_string(),
                            r.draws.to_string(),
                        ],
                    };
                    for cell in cells {
                        write!(f, " | {:>width$}", cell, width = COL_WIDTH)?;
                    }
                    writeln!(f)?;
                }
            }
        }
        Ok(())
    }
}
