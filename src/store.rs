//! SQLite storage for raw season fixtures.
use crate::error::LoadError;
use crate::matches::{MatchRecord, ScoreSheet};
use crate::season::Season;
use chrono::NaiveDate;
use rusqlite::{params, Connection, OptionalExtension};
use std::path::Path;
use tracing::info;

const SCHEMA: &str = "CREATE TABLE IF NOT EXISTS season (
        id   INTEGER PRIMARY KEY CHECK (id = 1),
        name TEXT NOT NULL
    );
    CREATE TABLE IF NOT EXISTS matches (
        id    INTEGER PRIMARY KEY,
        round TEXT NOT NULL,
        date  TEXT NOT NULL,
        time  TEXT,
        team1 TEXT NOT NULL,
        team2 TEXT NOT NULL,
        score TEXT
    );";

/// Raw fixtures of one season, stored in source order.
pub struct SeasonStore {
    conn: Connection,
}

impl SeasonStore {
    pub fn open(path: impl AsRef<Path>) -> Result<Self, LoadError> {
        Self::with_schema(Connection::open(path)?)
    }

    pub fn open_in_memory() -> Result<Self, LoadError> {
        Self::with_schema(Connection::open_in_memory()?)
    }

    fn with_schema(conn: Connection) -> Result<Self, LoadError> {
        conn.execute_batch(SCHEMA)?;
        Ok(Self { conn })
    }

    /// Replaces the stored season with `season`. Returns the number of fixtures written.
    pub fn import(&mut self, season: &Season) -> Result<usize, LoadError> {
        let tx = self.conn.transaction()?;
        tx.execute("DELETE FROM matches", [])?;
        tx.execute(
            "INSERT INTO season (id, name) VALUES (1, ?1)
             ON CONFLICT (id) DO UPDATE SET name = excluded.name",
            params![season.name],
        )?;
        {
            let mut insert = tx.prepare(
                "INSERT INTO matches (round, date, time, team1, team2, score)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            )?;
            for record in &season.matches {
                let score = record.score.as_ref().map(serde_json::to_string).transpose()?;
                insert.execute(params![
                    record.round,
                    record.date.to_string(),
                    record.time,
                    record.team1,
                    record.team2,
                    score,
                ])?;
            }
        }
        tx.commit()?;
        info!("imported {} fixtures of '{}'", season.matches.len(), season.name);
        Ok(season.matches.len())
    }

    pub fn load(&self) -> Result<Season, LoadError> {
        let name: Option<String> = self
            .conn
            .query_row("SELECT name FROM season WHERE id = 1", [], |row| row.get(0))
            .optional()?;

        let mut stmt = self
            .conn
            .prepare("SELECT id, round, date, time, team1, team2, score FROM matches ORDER BY id")?;
        let rows_iter = stmt.query_map([], |row| {
            Ok((
                row.get::<_, i64>(0)?,
                row.get::<_, String>(1)?,
                row.get::<_, String>(2)?,
                row.get::<_, Option<String>>(3)?,
                row.get::<_, String>(4)?,
                row.get::<_, String>(5)?,
                row.get::<_, Option<String>>(6)?,
            ))
        })?;

        let mut matches = Vec::new();
        for row_res in rows_iter {
            let (id, round, date, time, team1, team2, score) = row_res?;
            let date = NaiveDate::parse_from_str(&date, "%Y-%m-%d")
                .map_err(|_| LoadError::InvalidDate { row: id, value: date.clone() })?;
            let score = score
                .map(|json| serde_json::from_str::<ScoreSheet>(&json))
                .transpose()?;
            matches.push(MatchRecord {
                round,
                date,
                time,
                team1,
                team2,
                score,
            });
        }

        Ok(Season {
            name: name.unwrap_or_default(),
            matches,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::fixture;

    fn sample() -> Season {
        let mut unplayed = fixture(3, "Milan", "Inter", (0, 0));
        unplayed.score = None;
        unplayed.time = Some("20:45".into());
        Season {
            name: "Serie A".into(),
            matches: vec![
                fixture(1, "Milan", "Roma", (2, 0)),
                fixture(2, "Lazio", "Milan", (1, 1)),
                unplayed,
            ],
        }
    }

    #[test]
    fn test_import_then_load() {
        let mut store = SeasonStore::open_in_memory().unwrap();
        let season = sample();

        assert_eq!(store.import(&season).unwrap(), 3);
        assert_eq!(store.load().unwrap(), season);
    }

    #[test]
    fn test_import_replaces_previous_season() {
        let mut store = SeasonStore::open_in_memory().unwrap();
        store.import(&sample()).unwrap();

        let smaller = Season {
            name: "Serie A (partial)".into(),
            matches: vec![fixture(1, "Milan", "Roma", (2, 0))],
        };
        store.import(&smaller).unwrap();
        assert_eq!(store.load().unwrap(), smaller);
    }

    #[test]
    fn test_empty_store() {
        let store = SeasonStore::open_in_memory().unwrap();
        let season = store.load().unwrap();
        assert!(season.name.is_empty());
        assert!(season.matches.is_empty());
    }

    #[test]
    fn test_invalid_stored_date() {
        let store = SeasonStore::open_in_memory().unwrap();
        store
            .conn
            .execute(
                "INSERT INTO matches (round, date, team1, team2) VALUES ('1', 'yesterday', 'A', 'B')",
                [],
            )
            .unwrap();
        let err = store.load().unwrap_err();
        assert!(matches!(err, LoadError::InvalidDate { row: 1, .. }));
    }
}
