//! Raw match records and the per-club derived match table.
//!
//! A season file lists every fixture of a league. [`derive_match_statistics`] keeps the matches
//! played by one club, re-expresses them from that club's point of view and accumulates league
//! points in date order.
use crate::error::StatsError;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashSet};
use strum_macros::Display;
use tracing::debug;

/// Highest goal count accepted for one side of a fixture.
pub const MAX_GOALS: i64 = 99;

/// One fixture as it appears in the season file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchRecord {
    pub round: String,
    pub date: NaiveDate,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub time: Option<String>,
    pub team1: String,
    pub team2: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub score: Option<ScoreSheet>,
}

/// Goals per period. Signed so that bad source data surfaces as a malformed record.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreSheet {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ht: Option<Vec<i64>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ft: Option<Vec<i64>>,
}

impl MatchRecord {
    /// A played fixture with a full-time score of `goals.0` for `team1` and `goals.1` for `team2`.
    pub fn played(
        round: impl Into<String>,
        date: NaiveDate,
        team1: impl Into<String>,
        team2: impl Into<String>,
        goals: (i64, i64),
    ) -> Self {
        Self {
            round: round.into(),
            date,
            time: None,
            team1: team1.into(),
            team2: team2.into(),
            score: Some(ScoreSheet {
                ht: None,
                ft: Some(vec![goals.0, goals.1]),
            }),
        }
    }

    pub fn involves(&self, club: &str) -> bool {
        self.team1 == club || self.team2 == club
    }

    fn full_time_goals(&self) -> Result<(u32, u32), String> {
        let ft = self
            .score
            .as_ref()
            .ok_or_else(|| "missing score".to_string())?
            .ft
            .as_ref()
            .ok_or_else(|| "missing full-time score".to_string())?;
        if ft.len() != 2 {
            return Err(format!("expected 2 full-time goal counts, got {}", ft.len()));
        }
        let goals = |value: i64| {
            if value < 0 {
                Err(format!("negative goal count {value}"))
            } else if value > MAX_GOALS {
                Err(format!("goal count {value} exceeds {MAX_GOALS}"))
            } else {
                u32::try_from(value).map_err(|_| format!("goal count {value} out of range"))
            }
        };
        Ok((goals(ft[0])?, goals(ft[1])?))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display)]
pub enum Venue {
    Home,
    Away,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display)]
pub enum Outcome {
    #[strum(serialize = "W")]
    Win,
    #[strum(serialize = "D")]
    Draw,
    #[strum(serialize = "L")]
    Loss,
}

impl Outcome {
    pub fn from_goals(scored: u32, conceded: u32) -> Self {
        match scored.cmp(&conceded) {
            std::cmp::Ordering::Greater => Outcome::Win,
            std::cmp::Ordering::Less => Outcome::Loss,
            std::cmp::Ordering::Equal => Outcome::Draw,
        }
    }

    /// League points awarded for this outcome.
    pub fn points(self) -> u32 {
        match self {
            Outcome::Win => 3,
            Outcome::Draw => 1,
            Outcome::Loss => 0,
        }
    }
}

/// One row of the derived table, seen from the tracked club's side.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DerivedMatch {
    pub date: NaiveDate,
    pub matchday: String,
    pub opponent: String,
    pub venue: Venue,
    pub goals_scored: u32,
    pub goals_conceded: u32,
    pub outcome: Outcome,
    pub match_points: u32,
    pub cumulative_points: u32,
}

impl DerivedMatch {
    pub fn goal_difference(&self) -> i64 {
        i64::from(self.goals_scored) - i64::from(self.goals_conceded)
    }

    pub fn total_goals(&self) -> u32 {
        self.goals_scored + self.goals_conceded
    }

    pub fn is_clean_sheet(&self) -> bool {
        self.goals_conceded == 0
    }

    /// "scored-conceded", e.g. "3-1".
    pub fn scoreline(&self) -> String {
        format!("{}-{}", self.goals_scored, self.goals_conceded)
    }
}

/// Season totals shown above the progression chart.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SeasonSummary {
    pub matches: usize,
    pub wins: usize,
    pub draws: usize,
    pub losses: usize,
    pub points: u32,
    pub goals_scored: u32,
    pub goals_conceded: u32,
    pub goal_difference: i64,
}

/// The derived table for a single club, ordered by date.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SeasonTable {
    club: String,
    matches: Vec<DerivedMatch>,
}

impl SeasonTable {
    pub fn club(&self) -> &str {
        &self.club
    }

    pub fn matches(&self) -> &[DerivedMatch] {
        &self.matches
    }

    pub fn len(&self) -> usize {
        self.matches.len()
    }

    pub fn is_empty(&self) -> bool {
        self.matches.is_empty()
    }

    pub fn total_points(&self) -> u32 {
        self.matches.last().map_or(0, |row| row.cumulative_points)
    }

    pub fn summary(&self) -> SeasonSummary {
        let mut summary = SeasonSummary {
            matches: self.matches.len(),
            points: self.total_points(),
            ..SeasonSummary::default()
        };
        for row in &self.matches {
            match row.outcome {
                Outcome::Win => summary.wins += 1,
                Outcome::Draw => summary.draws += 1,
                Outcome::Loss => summary.losses += 1,
            }
            summary.goals_scored += row.goals_scored;
            summary.goals_conceded += row.goals_conceded;
        }
        summary.goal_difference =
            i64::from(summary.goals_scored) - i64::from(summary.goals_conceded);
        summary
    }

    /// The last `n` matches, oldest first.
    pub fn recent(&self, n: usize) -> &[DerivedMatch] {
        &self.matches[self.matches.len().saturating_sub(n)..]
    }

    /// Matchday label and cumulative points for each row, for charting.
    pub fn progression(&self) -> Vec<(&str, u32)> {
        self.matches
            .iter()
            .map(|row| (row.matchday.as_str(), row.cumulative_points))
            .collect()
    }

    pub fn distinct_opponents(&self) -> BTreeSet<&str> {
        self.matches.iter().map(|row| row.opponent.as_str()).collect()
    }

    /// Length of the longest run of consecutive wins.
    pub fn longest_winning_streak(&self) -> usize {
        let mut longest = 0;
        let mut current = 0;
        for row in &self.matches {
            if row.outcome == Outcome::Win {
                current += 1;
                longest = longest.max(current);
            } else {
                current = 0;
            }
        }
        longest
    }

    pub fn clean_sheets(&self) -> usize {
        self.matches.iter().filter(|row| row.is_clean_sheet()).count()
    }

    /// The first row with the largest positive goal difference.
    pub fn biggest_win(&self) -> Option<&DerivedMatch> {
        self.matches
            .iter()
            .filter(|row| row.outcome == Outcome::Win)
            .fold(None, |best: Option<&DerivedMatch>, row| match best {
                Some(best) if best.goal_difference() >= row.goal_difference() => Some(best),
                _ => Some(row),
            })
    }
}

/// Builds the derived table for `club` out of a season's raw fixtures.
///
/// Fixtures not involving the club are ignored. A club with no fixtures yields an empty table.
/// Any malformed fixture involving the club aborts the derivation.
pub fn derive_match_statistics(raw: &[MatchRecord], club: &str) -> Result<SeasonTable, StatsError> {
    let mut oriented = Vec::new();
    for (index, record) in raw.iter().enumerate() {
        if !record.involves(club) {
            continue;
        }
        let malformed = |reason: String| StatsError::MalformedInput { index, reason };

        if record.team1.trim().is_empty() || record.team2.trim().is_empty() {
            return Err(malformed("empty team name".into()));
        }
        if record.team1 == record.team2 {
            return Err(malformed(format!("{club} is listed on both sides")));
        }
        let (team1_goals, team2_goals) = record.full_time_goals().map_err(malformed)?;

        let is_home = record.team1 == club;
        let (opponent, venue, goals_scored, goals_conceded) = if is_home {
            (&record.team2, Venue::Home, team1_goals, team2_goals)
        } else {
            (&record.team1, Venue::Away, team2_goals, team1_goals)
        };
        let outcome = Outcome::from_goals(goals_scored, goals_conceded);
        oriented.push((
            index,
            DerivedMatch {
                date: record.date,
                matchday: record.round.trim().to_string(),
                opponent: opponent.clone(),
                venue,
                goals_scored,
                goals_conceded,
                outcome,
                match_points: outcome.points(),
                cumulative_points: 0,
            },
        ));
    }

    // stable: fixtures on the same date keep their source order
    oriented.sort_by_key(|(_, row)| row.date);

    let mut seen = HashSet::with_capacity(oriented.len());
    let mut points = 0;
    let mut matches = Vec::with_capacity(oriented.len());
    for (index, mut row) in oriented {
        if !seen.insert((row.date, row.opponent.clone())) {
            return Err(StatsError::MalformedInput {
                index,
                reason: format!("duplicate fixture against {} on {}", row.opponent, row.date),
            });
        }
        points += row.match_points;
        row.cumulative_points = points;
        matches.push(row);
    }

    debug!(
        "derived {} of {} fixtures for {club} ({points} points)",
        matches.len(),
        raw.len()
    );
    Ok(SeasonTable {
        club: club.to_string(),
        matches,
    })
}
