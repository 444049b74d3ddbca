//! Reading a league season from its JSON file.
//!
//! The file follows the openfootball layout:
//!
//! ```json
//! { "name": "Serie A 2023/24",
//!   "matches": [ { "round": "Matchday 1", "date": "2023-08-19", "team1": "..", "team2": "..",
//!                  "score": { "ht": [0, 0], "ft": [2, 0] } } ] }
//! ```
use crate::error::LoadError;
use crate::matches::MatchRecord;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use tracing::info;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Season {
    #[serde(default)]
    pub name: String,
    pub matches: Vec<MatchRecord>,
}

impl Season {
    pub fn clubs(&self) -> Vec<&str> {
        let mut clubs: Vec<&str> = self
            .matches
            .iter()
            .flat_map(|record| [record.team1.as_str(), record.team2.as_str()])
            .collect();
        clubs.sort_unstable();
        clubs.dedup();
        clubs
    }
}

pub fn parse_season(json: &str) -> Result<Season, LoadError> {
    Ok(serde_json::from_str(json)?)
}

pub fn load_season(path: impl AsRef<Path>) -> Result<Season, LoadError> {
    let path = path.as_ref();
    let season = parse_season(&fs::read_to_string(path)?)?;
    info!(
        "loaded {} fixtures of '{}' from {}",
        season.matches.len(),
        season.name,
        path.display()
    );
    Ok(season)
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"{
        "name": "Serie A 2023/24",
        "matches": [
            { "round": "Matchday 1", "date": "2023-08-19", "time": "18:30",
              "team1": "Empoli FC", "team2": "Hellas Verona FC",
              "score": { "ht": [0, 1], "ft": [0, 1] } },
            { "round": "Matchday 1", "date": "2023-08-21",
              "team1": "Bologna FC 1909", "team2": "AC Milan",
              "score": { "ft": [0, 2] } },
            { "round": "Matchday 38", "date": "2024-05-26",
              "team1": "AC Milan", "team2": "US Salernitana 1919" }
        ]
    }"#;

    #[test]
    fn test_parse_season() {
        let season = parse_season(SAMPLE).unwrap();

        assert_eq!(season.name, "Serie A 2023/24");
        assert_eq!(season.matches.len(), 3);
        let milan = &season.matches[1];
        assert_eq!(milan.team2, "AC Milan");
        assert_eq!(milan.score.as_ref().unwrap().ft, Some(vec![0, 2]));
        assert!(season.matches[2].score.is_none());
    }

    #[test]
    fn test_clubs_are_sorted_and_unique() {
        let season = parse_season(SAMPLE).unwrap();
        assert_eq!(
            season.clubs(),
            vec![
                "AC Milan",
                "Bologna FC 1909",
                "Empoli FC",
                "Hellas Verona FC",
                "US Salernitana 1919"
            ]
        );
    }

    #[test]
    fn test_fractional_score_is_rejected() {
        let json = r#"{ "matches": [ { "round": "1", "date": "2023-08-19",
            "team1": "A", "team2": "B", "score": { "ft": [1.5, 0] } } ] }"#;
        assert!(matches!(parse_season(json), Err(LoadError::Json(_))));
    }

    #[test]
    fn test_bad_date_is_rejected() {
        let json = r#"{ "matches": [ { "round": "1", "date": "19/08/2023",
            "team1": "A", "team2": "B" } ] }"#;
        assert!(parse_season(json).is_err());
    }

    #[test]
    fn test_missing_file() {
        let err = load_season("does/not/exist.json").unwrap_err();
        assert!(matches!(err, LoadError::Io(_)));
    }
}
