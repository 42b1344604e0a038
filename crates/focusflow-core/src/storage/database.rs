//! SQLite-based session storage.
//!
//! Provides persistent storage for:
//! - The append-only study session log
//! - The break activity catalog
//! - Key-value store for counters (the streak)

use std::path::Path;

use chrono::{DateTime, Utc};
use rusqlite::{params, Connection, OptionalExtension, Row};

use super::data_dir;
use super::traits::{BreakActivityCatalog, SessionLog, StreakStore};
use crate::breaks::BreakActivity;
use crate::error::{ConfigError, DatabaseError, StoreError};
use crate::session::StudySession;
use crate::timer::TimerMode;

const STREAK_KEY: &str = "streak";

/// SQLite database for sessions, break activities and the streak counter.
pub struct Database {
    conn: Connection,
}

impl Database {
    /// Open the database at `<data dir>/focusflow.db`.
    ///
    /// Creates the database file and schema if they don't exist.
    ///
    /// # Errors
    /// Returns an error if the data directory cannot be resolved or the
    /// database cannot be opened or migrated.
    pub fn open() -> Result<Self, StoreError> {
        let dir = data_dir().map_err(|e| ConfigError::DataDir(e.to_string()))?;
        Ok(Self::open_at(&dir.join("focusflow.db"))?)
    }

    /// Open (or create) a database file at `path`.
    pub fn open_at(path: &Path) -> Result<Self, DatabaseError> {
        let conn = Connection::open(path).map_err(|source| DatabaseError::OpenFailed {
            path: path.to_path_buf(),
            source,
        })?;
        let db = Self { conn };
        db.migrate()?;
        Ok(db)
    }

    /// Open an in-memory database.
    pub fn open_memory() -> Result<Self, DatabaseError> {
        let conn = Connection::open_in_memory()?;
        let db = Self { conn };
        db.migrate()?;
        Ok(db)
    }

    fn migrate(&self) -> Result<(), DatabaseError> {
        self.conn
            .execute_batch(
                "CREATE TABLE IF NOT EXISTS sessions (
                    seq              INTEGER PRIMARY KEY AUTOINCREMENT,
                    id               TEXT NOT NULL UNIQUE,
                    session_type     TEXT NOT NULL,
                    start_time       TEXT NOT NULL,
                    end_time         TEXT,
                    duration_minutes INTEGER NOT NULL,
                    completed        INTEGER NOT NULL,
                    topic            TEXT
                );

                CREATE TABLE IF NOT EXISTS break_activities (
                    seq              INTEGER PRIMARY KEY AUTOINCREMENT,
                    id               TEXT NOT NULL UNIQUE,
                    name             TEXT NOT NULL,
                    category         TEXT,
                    url              TEXT,
                    duration_minutes INTEGER
                );

                CREATE TABLE IF NOT EXISTS kv (
                    key   TEXT PRIMARY KEY,
                    value TEXT NOT NULL
                );

                CREATE INDEX IF NOT EXISTS idx_sessions_start_time ON sessions(start_time);
                CREATE INDEX IF NOT EXISTS idx_sessions_type_completed ON sessions(session_type, completed);",
            )
            .map_err(|e| DatabaseError::MigrationFailed(e.to_string()))
    }

    /// Append one session to the log.
    pub fn insert_session(&self, session: &StudySession) -> Result<(), DatabaseError> {
        self.conn.execute(
            "INSERT INTO sessions (id, session_type, start_time, end_time, duration_minutes, completed, topic)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
            params![
                session.id,
                session.session_type.as_str(),
                session.start_time.to_rfc3339(),
                session.end_time.map(|t| t.to_rfc3339()),
                session.duration_minutes,
                session.completed,
                session.topic,
            ],
        )?;
        Ok(())
    }

    /// All sessions in insertion order.
    pub fn sessions(&self) -> Result<Vec<StudySession>, DatabaseError> {
        self.query_sessions(
            "SELECT id, session_type, start_time, end_time, duration_minutes, completed, topic
             FROM sessions ORDER BY seq ASC",
            params![],
        )
    }

    /// The newest `limit` sessions, oldest first.
    pub fn recent_sessions(&self, limit: usize) -> Result<Vec<StudySession>, DatabaseError> {
        let mut rows = self.query_sessions(
            "SELECT id, session_type, start_time, end_time, duration_minutes, completed, topic
             FROM sessions ORDER BY seq DESC LIMIT ?1",
            params![limit as i64],
        )?;
        rows.reverse();
        Ok(rows)
    }

    fn query_sessions(
        &self,
        sql: &str,
        args: &[&dyn rusqlite::ToSql],
    ) -> Result<Vec<StudySession>, DatabaseError> {
        let mut stmt = self.conn.prepare(sql)?;
        let rows = stmt.query_map(args, |row| {
            Ok((
                row.get::<_, String>(0)?,
                row.get::<_, String>(1)?,
                row.get::<_, String>(2)?,
                row.get::<_, Option<String>>(3)?,
                row.get::<_, u32>(4)?,
                row.get::<_, bool>(5)?,
                row.get::<_, Option<String>>(6)?,
            ))
        })?;

        let mut sessions = Vec::new();
        for row in rows {
            let (id, kind, start, end, duration_minutes, completed, topic) = row?;
            let session_type = TimerMode::parse(&kind).ok_or_else(|| corrupt("sessions", &kind))?;
            let end_time = end.as_deref().map(parse_ts).transpose()?;
            sessions.push(StudySession {
                id,
                start_time: parse_ts(&start)?,
                end_time,
                duration_minutes,
                session_type,
                completed,
                topic,
            });
        }
        Ok(sessions)
    }

    pub fn insert_activity(&self, activity: &BreakActivity) -> Result<(), DatabaseError> {
        self.conn.execute(
            "INSERT INTO break_activities (id, name, category, url, duration_minutes)
             VALUES (?1, ?2, ?3, ?4, ?5)",
            params![
                activity.id,
                activity.name,
                activity.category,
                activity.url,
                activity.duration_minutes,
            ],
        )?;
        Ok(())
    }

    pub fn delete_activity(&self, id: &str) -> Result<bool, DatabaseError> {
        let n = self
            .conn
            .execute("DELETE FROM break_activities WHERE id = ?1", params![id])?;
        Ok(n > 0)
    }

    pub fn list_activities(&self) -> Result<Vec<BreakActivity>, DatabaseError> {
        let mut stmt = self.conn.prepare(
            "SELECT id, name, category, url, duration_minutes
             FROM break_activities ORDER BY seq ASC",
        )?;
        let rows = stmt.query_map([], activity_from_row)?;
        let mut out = Vec::new();
        for row in rows {
            out.push(row?);
        }
        Ok(out)
    }

    /// Get a value from the kv store.
    pub fn kv_get(&self, key: &str) -> Result<Option<String>, DatabaseError> {
        let value = self
            .conn
            .query_row("SELECT value FROM kv WHERE key = ?1", params![key], |row| {
                row.get::<_, String>(0)
            })
            .optional()?;
        Ok(value)
    }

    /// Set a value in the kv store.
    pub fn kv_set(&self, key: &str, value: &str) -> Result<(), DatabaseError> {
        self.conn.execute(
            "INSERT OR REPLACE INTO kv (key, value) VALUES (?1, ?2)",
            params![key, value],
        )?;
        Ok(())
    }
}

fn activity_from_row(row: &Row<'_>) -> rusqlite::Result<BreakActivity> {
    Ok(BreakActivity {
        id: row.get(0)?,
        name: row.get(1)?,
        category: row.get(2)?,
        url: row.get(3)?,
        duration_minutes: row.get(4)?,
    })
}

fn parse_ts(value: &str) -> Result<DateTime<Utc>, DatabaseError> {
    DateTime::parse_from_rfc3339(value)
        .map(|t| t.with_timezone(&Utc))
        .map_err(|e| corrupt("sessions", &format!("{value}: {e}")))
}

fn corrupt(table: &str, message: &str) -> DatabaseError {
    DatabaseError::CorruptRow {
        table: table.to_string(),
        message: message.to_string(),
    }
}

impl SessionLog for Database {
    fn append(&self, session: &StudySession) -> Result<(), StoreError> {
        Ok(self.insert_session(session)?)
    }

    fn list(&self) -> Result<Vec<StudySession>, StoreError> {
        Ok(self.sessions()?)
    }
}

impl StreakStore for Database {
    fn read(&self) -> Result<u32, StoreError> {
        let raw = self.kv_get(STREAK_KEY)?;
        match raw {
            None => Ok(0),
            Some(v) => v
                .parse::<u32>()
                .map_err(|e| corrupt("kv", &format!("{STREAK_KEY}={v}: {e}")).into()),
        }
    }

    fn write(&self, value: u32) -> Result<(), StoreError> {
        Ok(self.kv_set(STREAK_KEY, &value.to_string())?)
    }
}

impl BreakActivityCatalog for Database {
    fn activities(&self) -> Result<Vec<BreakActivity>, StoreError> {
        Ok(self.list_activities()?)
    }

    fn add(&self, activity: &BreakActivity) -> Result<(), StoreError> {
        Ok(self.insert_activity(activity)?)
    }

    fn remove(&self, id: &str) -> Result<bool, StoreError> {
        Ok(self.delete_activity(id)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sessions_round_trip_in_order() {
        let db = Database::open_memory().unwrap();
        let now = Utc::now();
        let mut first = StudySession::new(TimerMode::Study, 25 * 60, now, now, true);
        first.topic = Some("Algebra".into());
        let second = StudySession::new(TimerMode::ShortBreak, 90, now, now, false);
        db.append(&first).unwrap();
        db.append(&second).unwrap();

        let all = db.list().unwrap();
        assert_eq!(all.len(), 2);
        assert_eq!(all[0].id, first.id);
        assert_eq!(all[0].topic.as_deref(), Some("Algebra"));
        assert_eq!(all[0].duration_minutes, 25);
        assert!(all[0].completed);
        assert_eq!(all[1].session_type, TimerMode::ShortBreak);
        assert_eq!(all[1].duration_minutes, 2);
    }

    #[test]
    fn recent_sessions_returns_tail() {
        let db = Database::open_memory().unwrap();
        let now = Utc::now();
        let ids: Vec<_> = (0..5)
            .map(|_| {
                let s = StudySession::new(TimerMode::Study, 60, now, now, true);
                db.insert_session(&s).unwrap();
                s.id
            })
            .collect();
        let recent = db.recent_sessions(2).unwrap();
        assert_eq!(recent.len(), 2);
        assert_eq!(recent[0].id, ids[3]);
        assert_eq!(recent[1].id, ids[4]);
    }

    #[test]
    fn streak_defaults_to_zero() {
        let db = Database::open_memory().unwrap();
        assert_eq!(StreakStore::read(&db).unwrap(), 0);
        StreakStore::write(&db, 5).unwrap();
        assert_eq!(StreakStore::read(&db).unwrap(), 5);
    }

    #[test]
    fn catalog_add_and_remove() {
        let db = Database::open_memory().unwrap();
        let a = BreakActivity::new("Stretch", Some("Quick Exercise".into()), None).unwrap();
        db.add(&a).unwrap();
        let listed = db.activities().unwrap();
        assert_eq!(listed, vec![a.clone()]);
        assert!(db.remove(&a.id).unwrap());
        assert!(db.activities().unwrap().is_empty());
    }

    #[test]
    fn kv_store() {
        let db = Database::open_memory().unwrap();
        assert!(db.kv_get("test").unwrap().is_none());
        db.kv_set("test", "hello").unwrap();
        assert_eq!(db.kv_get("test").unwrap().unwrap(), "hello");
    }

    #[test]
    fn file_database_persists() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("focusflow.db");
        {
            let db = Database::open_at(&path).unwrap();
            StreakStore::write(&db, 3).unwrap();
        }
        let db = Database::open_at(&path).unwrap();
        assert_eq!(StreakStore::read(&db).unwrap(), 3);
    }
}
