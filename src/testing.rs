//! Fixture builders for unit tests.
use crate::matches::{derive_match_statistics, MatchRecord, SeasonTable};
use chrono::{Days, NaiveDate};

pub const CLUB: &str = "Milan";

pub fn day(n: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(2023, 8, 1)
        .unwrap()
        .checked_add_days(Days::new(u64::from(n)))
        .unwrap()
}

pub fn fixture(n: u32, team1: &str, team2: &str, goals: (i64, i64)) -> MatchRecord {
    MatchRecord::played(format!("Matchday {n}"), day(n), team1, team2, goals)
}

/// A home game for [`CLUB`] per score, each against a different opponent.
pub fn season(scores: &[(i64, i64)]) -> SeasonTable {
    let raw: Vec<_> = scores
        .iter()
        .enumerate()
        .map(|(i, &goals)| {
            let n = i as u32 + 1;
            fixture(n, CLUB, &format!("Opponent {n}"), goals)
        })
        .collect();
    derive_match_statistics(&raw, CLUB).unwrap()
}

/// Like [`season`], but naming the opponent of each home game.
pub fn season_against(games: &[(&str, (i64, i64))]) -> SeasonTable {
    let raw: Vec<_> = games
        .iter()
        .enumerate()
        .map(|(i, &(opponent, goals))| fixture(i as u32 + 1, CLUB, opponent, goals))
        .collect();
    derive_match_statistics(&raw, CLUB).unwrap()
}
