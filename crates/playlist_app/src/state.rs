//! Per-channel resume cursors kept next to the CSV output.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use engine_logging::{engine_debug, engine_error, engine_info, engine_warn};
use playlist_engine::write_atomically;
use serde::{Deserialize, Serialize};

const STATE_FILENAME: &str = ".playlist_state.ron";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChannelCursor {
    pub last_cursor: String,
    pub pages_fetched: u32,
    pub saved_utc: DateTime<Utc>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
struct PersistedState {
    channels: BTreeMap<String, ChannelCursor>,
}

pub fn state_path(output_dir: &Path) -> PathBuf {
    output_dir.join(STATE_FILENAME)
}

fn read_state(path: &Path) -> PersistedState {
    let content = match fs::read_to_string(path) {
        Ok(text) => text,
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
            return PersistedState::default();
        }
        Err(err) => {
            engine_warn!("Failed to read resume state from {:?}: {}", path, err);
            return PersistedState::default();
        }
    };

    match ron::from_str(&content) {
        Ok(state) => state,
        Err(err) => {
            engine_warn!("Failed to parse resume state from {:?}: {}", path, err);
            PersistedState::default()
        }
    }
}

/// Cursor saved by the last run for `channel`, if any.
pub fn load_cursor(output_dir: &Path, channel: &str) -> Option<ChannelCursor> {
    let path = state_path(output_dir);
    let cursor = read_state(&path).channels.remove(channel)?;
    engine_info!(
        "Resuming {} from cursor {} (saved {})",
        channel,
        cursor.last_cursor,
        cursor.saved_utc.to_rfc3339()
    );
    Some(cursor)
}

/// Records the cursor a later `--resume` run should continue from.
///
/// Entries for other channels are preserved. An empty cursor is not saved.
pub fn save_cursor(output_dir: &Path, channel: &str, last_cursor: &str, pages_fetched: u32) {
    if last_cursor.is_empty() {
        engine_debug!("No cursor to save for {}", channel);
        return;
    }

    let path = state_path(output_dir);
    let mut state = read_state(&path);
    state.channels.insert(
        channel.to_string(),
        ChannelCursor {
            last_cursor: last_cursor.to_string(),
            pages_fetched,
            saved_utc: Utc::now(),
        },
    );

    let pretty = ron::ser::PrettyConfig::new();
    let content = match ron::ser::to_string_pretty(&state, pretty) {
        Ok(text) => text,
        Err(err) => {
            engine_error!("Failed to serialize resume state: {}", err);
            return;
        }
    };

    if let Err(err) = write_atomically(&path, content.as_bytes()) {
        engine_error!("Failed to write resume state to {:?}: {}", path, err);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use tempfile::TempDir;

    #[test]
    fn missing_state_means_no_cursor() {
        let temp = TempDir::new().unwrap();
        assert_eq!(load_cursor(temp.path(), "swr4"), None);
    }

    #[test]
    fn saved_cursor_is_loaded_per_channel() {
        let temp = TempDir::new().unwrap();
        save_cursor(temp.path(), "swr4", "4711", 3);
        save_cursor(temp.path(), "wdr2", "99", 1);
        save_cursor(temp.path(), "swr4", "4800", 5);

        let swr4 = load_cursor(temp.path(), "swr4").unwrap();
        assert_eq!(swr4.last_cursor, "4800");
        assert_eq!(swr4.pages_fetched, 5);
        assert_eq!(load_cursor(temp.path(), "wdr2").unwrap().last_cursor, "99");
        assert_eq!(load_cursor(temp.path(), "ndr1"), None);
    }

    #[test]
    fn empty_cursor_is_not_saved() {
        let temp = TempDir::new().unwrap();
        save_cursor(temp.path(), "swr4", "", 2);
        assert!(!state_path(temp.path()).exists());
    }

    #[test]
    fn corrupt_state_is_ignored_and_replaced() {
        let temp = TempDir::new().unwrap();
        fs::write(state_path(temp.path()), "not ron at all {").unwrap();
        assert_eq!(load_cursor(temp.path(), "swr4"), None);

        save_cursor(temp.path(), "swr4", "12", 1);
        assert_eq!(load_cursor(temp.path(), "swr4").unwrap().last_cursor, "12");
    }
}
