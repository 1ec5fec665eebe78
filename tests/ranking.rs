//! Integration tests for ranking and standings views.

use scorekeeper::logic::{format_win_ratio, sort_players, win_ratio};
use scorekeeper::{standings, GameType, PlayerRecord, Scoreboard, StandingsRow, View};

fn board(game_type: GameType, players: &[(&str, PlayerRecord)]) -> Scoreboard {
    let mut b = Scoreboard::new("board", game_type, "owner");
    for (name, record) in players {
        b.players.insert(name.to_string(), record.clone());
    }
    b
}

fn wl(wins: u32, losses: u32) -> PlayerRecord {
    PlayerRecord {
        wins,
        losses,
        ..PlayerRecord::default()
    }
}

fn names(b: &Scoreboard) -> Vec<&str> {
    sort_players(b).into_iter().map(|(n, _)| n).collect()
}

#[test]
fn elo_sorts_by_rating() {
    let b = board(
        GameType::Elo,
        &[
            ("ann", PlayerRecord { elo: 1480, ..PlayerRecord::default() }),
            ("bob", PlayerRecord { elo: 1620, ..PlayerRecord::default() }),
            ("cid", PlayerRecord::default()),
        ],
    );
    assert_eq!(names(&b), vec!["bob", "cid", "ann"]);
}

#[test]
fn points_sort_descending() {
    let b = board(
        GameType::Points,
        &[
            ("ann", PlayerRecord { points: -2, ..PlayerRecord::default() }),
            ("bob", PlayerRecord { points: 9, ..PlayerRecord::default() }),
        ],
    );
    assert_eq!(names(&b), vec!["bob", "ann"]);
}

#[test]
fn winloss_sorts_by_wins_then_fewer_losses() {
    let b = board(
        GameType::WinLoss,
        &[("ann", wl(3, 4)), ("bob", wl(3, 1)), ("cid", wl(5, 9)), ("dee", wl(0, 0))],
    );
    assert_eq!(names(&b), vec!["cid", "bob", "ann", "dee"]);
}

#[test]
fn win_ratio_is_na_without_games() {
    assert_eq!(win_ratio(&wl(0, 0)), None);
    assert_eq!(format_win_ratio(&wl(0, 0)), "N/A");
    assert_eq!(win_ratio(&wl(3, 1)), Some(0.75));
    assert_eq!(format_win_ratio(&wl(1, 2)), "0.333");
}

#[test]
fn tied_records_share_rank() {
    let b = board(GameType::WinLoss, &[("ann", wl(2, 0)), ("bob", wl(2, 0)), ("cid", wl(1, 0))]);
    let s = standings(&b, View::Full, &[]);
    let ranks: Vec<usize> = s.players().map(|p| p.rank).collect();
    assert_eq!(ranks, vec![1, 1, 3]);
}

#[test]
fn top_view_collapses_gap_and_keeps_highlighted() {
    let players: Vec<(String, PlayerRecord)> = (0..8).map(|i| (format!("p{i}"), wl(10 - i, 0))).collect();
    let refs: Vec<(&str, PlayerRecord)> = players.iter().map(|(n, r)| (n.as_str(), r.clone())).collect();
    let b = board(GameType::WinLoss, &refs);

    let s = standings(&b, View::Top(3), &["p6".to_string()]);
    let shape: Vec<String> = s
        .rows
        .iter()
        .map(|row| match row {
            StandingsRow::Player(p) => p.name.clone(),
            StandingsRow::Collapsed { hidden } => format!("...{hidden}"),
        })
        .collect();
    assert_eq!(shape, vec!["p0", "p1", "p2", "...3", "p6", "...1"]);
    assert!(s.players().find(|p| p.name == "p6").unwrap().highlighted);
    assert_eq!(s.players().find(|p| p.name == "p6").unwrap().rank, 7);
}

#[test]
fn full_view_has_no_placeholders() {
    let b = board(GameType::WinLoss, &[("ann", wl(1, 0)), ("bob", wl(0, 1))]);
    let s = standings(&b, View::Full, &[]);
    assert_eq!(s.rows.len(), 2);
}

#[test]
fn text_table_lists_players_and_placeholder() {
    let b = board(
        GameType::Points,
        &[
            ("ann", PlayerRecord { points: 3, ..PlayerRecord::default() }),
            ("bob", PlayerRecord { points: 2, ..PlayerRecord::default() }),
            ("cid", PlayerRecord { points: 1, ..PlayerRecord::default() }),
        ],
    );
    let text = standings(&b, View::Top(1), &["cid".to_string()]).to_string();
    assert!(text.starts_with("board\n"));
    assert!(text.contains("Points"));
    assert!(text.contains("ann"));
    assert!(!text.contains("bob"));
    assert!(text.contains("(1 more)"));
    assert!(text.contains("*   3  cid"));
}

#[test]
fn csv_export_has_header_and_rows() {
    let b = board(GameType::WinLoss, &[("ann", wl(2, 1)), ("bob", wl(0, 0))]);
    let mut buf = Vec::new();
    standings(&b, View::Full, &[]).write_csv(&mut buf).unwrap();
    let text = String::from_utf8(buf).unwrap();
    let lines: Vec<&str> = text.lines().collect();
    assert_eq!(lines[0], "rank,player,wins,losses,draws,points,elo,win_ratio");
    assert_eq!(lines[1], "1,ann,2,1,0,0,1500,0.667");
    assert_eq!(lines[2], "2,bob,0,0,0,0,1500,N/A");
}
