use crate::model::Course;
use rusqlite::{Connection, OptionalExtension};
use std::path::Path;

const DB_FILE: &str = "assigntrack.sqlite3";

// The persisted surface is two independent keyed entries: the serialized
// course list and the serialized selection.
const KEY_COURSES: &str = "courses";
const KEY_SELECTION: &str = "selected_course_id";

/// Durable key/value store backing one workspace.
pub struct Store {
    conn: Connection,
}

impl Store {
    pub fn open(workspace: &Path) -> anyhow::Result<Store> {
        std::fs::create_dir_all(workspace)?;
        let conn = Connection::open(workspace.join(DB_FILE))?;
        conn.execute(
            "CREATE TABLE IF NOT EXISTS entries(
                key TEXT PRIMARY KEY,
                value TEXT NOT NULL
            )",
            [],
        )?;
        Ok(Store { conn })
    }

    /// Loads the persisted course list. Best-effort: a missing entry or one
    /// that no longer deserializes yields an empty list, never an error.
    pub fn load_courses(&self) -> Vec<Course> {
        let Some(raw) = self.read_entry(KEY_COURSES) else {
            return Vec::new();
        };
        match serde_json::from_str(&raw) {
            Ok(courses) => courses,
            Err(e) => {
                log::warn!("discarding malformed `{KEY_COURSES}` entry: {e}");
                Vec::new()
            }
        }
    }

    /// Loads the persisted selection. Same best-effort contract as
    /// [`Store::load_courses`].
    pub fn load_selection(&self) -> Option<String> {
        let raw = self.read_entry(KEY_SELECTION)?;
        match serde_json::from_str::<Option<String>>(&raw) {
            Ok(v) => v,
            Err(e) => {
                log::warn!("discarding malformed `{KEY_SELECTION}` entry: {e}");
                None
            }
        }
    }

    pub fn save_courses(&self, courses: &[Course]) -> anyhow::Result<()> {
        self.write_entry(KEY_COURSES, &serde_json::to_string(courses)?)
    }

    pub fn save_selection(&self, selection: Option<&str>) -> anyhow::Result<()> {
        self.write_entry(KEY_SELECTION, &serde_json::to_string(&selection)?)
    }

    fn read_entry(&self, key: &str) -> Option<String> {
        let row = self
            .conn
            .query_row("SELECT value FROM entries WHERE key = ?", [key], |r| {
                r.get(0)
            })
            .optional();
        match row {
            Ok(v) => v,
            Err(e) => {
                log::warn!("read of entry `{key}` failed: {e}");
                None
            }
        }
    }

    fn write_entry(&self, key: &str, value: &str) -> anyhow::Result<()> {
        self.conn.execute(
            "INSERT OR REPLACE INTO entries(key, value) VALUES(?, ?)",
            (key, value),
        )?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;
    use std::time::{SystemTime, UNIX_EPOCH};

    fn temp_workspace(prefix: &str) -> PathBuf {
        std::env::temp_dir().join(format!(
            "{}-{}-{}",
            prefix,
            std::process::id(),
            SystemTime::now()
                .duration_since(UNIX_EPOCH)
                .expect("clock")
                .as_nanos()
        ))
    }

    #[test]
    fn fresh_store_loads_empty_state() {
        let store = Store::open(&temp_workspace("assigntrack-store-fresh")).expect("open");
        assert!(store.load_courses().is_empty());
        assert_eq!(store.load_selection(), None);
    }

    #[test]
    fn courses_and_selection_round_trip() {
        let ws = temp_workspace("assigntrack-store-roundtrip");
        let store = Store::open(&ws).expect("open");

        let courses = vec![Course::new("Algorithms".to_string())];
        store.save_courses(&courses).expect("save courses");
        store
            .save_selection(Some(&courses[0].id))
            .expect("save selection");

        // Re-open to prove the values survived the connection.
        let store = Store::open(&ws).expect("reopen");
        assert_eq!(store.load_courses(), courses);
        assert_eq!(store.load_selection(), Some(courses[0].id.clone()));

        store.save_selection(None).expect("clear selection");
        assert_eq!(store.load_selection(), None);
    }

    #[test]
    fn malformed_entries_fall_back_to_empty() {
        let store = Store::open(&temp_workspace("assigntrack-store-malformed")).expect("open");
        store.write_entry(KEY_COURSES, "not json").expect("write");
        store.write_entry(KEY_SELECTION, "{broken").expect("write");
        assert!(store.load_courses().is_empty());
        assert_eq!(store.load_selection(), None);
    }
}
