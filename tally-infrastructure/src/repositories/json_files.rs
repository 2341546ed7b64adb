use std::fs::{self, File};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::Serialize;
use tempfile::NamedTempFile;
use tracing::debug;

use tally_domain::{
    DedupIndex, EventSource, FingerprintRepository, SummaryRepository, SummaryStore, UserEvent,
};

/// Input batch: a JSON array of events.
pub struct JsonEventFile {
    path: PathBuf,
}

impl JsonEventFile {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl EventSource for JsonEventFile {
    fn load_events(&self) -> Result<Vec<UserEvent>> {
        let content = fs::read_to_string(&self.path)
            .with_context(|| format!("failed to read {}", self.path.display()))?;
        let events: Vec<UserEvent> = serde_json::from_str(&content)
            .with_context(|| format!("{} is not a JSON array of events", self.path.display()))?;
        debug!("read {} events from {}", events.len(), self.path.display());
        Ok(events)
    }
}

/// Summary output, also read back as prior state in update mode.
pub struct JsonSummaryFile {
    path: PathBuf,
}

impl JsonSummaryFile {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl SummaryRepository for JsonSummaryFile {
    fn load_summaries(&self) -> Result<Option<SummaryStore>> {
        if !self.path.exists() {
            return Ok(None);
        }
        let content = fs::read_to_string(&self.path)
            .with_context(|| format!("failed to read {}", self.path.display()))?;
        let store: SummaryStore = serde_json::from_str(&content)
            .with_context(|| format!("{} is not a JSON array of summaries", self.path.display()))?;
        Ok(Some(store))
    }

    fn save_summaries(&self, store: &SummaryStore) -> Result<()> {
        write_pretty_json(&self.path, store)
    }
}

/// Dedup index: a JSON object keyed by fingerprint.
pub struct JsonIndexFile {
    path: PathBuf,
}

impl JsonIndexFile {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl FingerprintRepository for JsonIndexFile {
    fn load_index(&self) -> Result<Option<DedupIndex>> {
        if !self.path.exists() {
            return Ok(None);
        }
        let content = fs::read_to_string(&self.path)
            .with_context(|| format!("failed to read {}", self.path.display()))?;
        let index: DedupIndex = serde_json::from_str(&content)
            .with_context(|| format!("{} is not a fingerprint index", self.path.display()))?;
        Ok(Some(index))
    }

    fn save_index(&self, index: &DedupIndex) -> Result<()> {
        write_pretty_json(&self.path, index)
    }
}

/// Serializes fully before touching the destination, then replaces it.
fn write_pretty_json<T: Serialize + ?Sized>(path: &Path, value: &T) -> Result<()> {
    let content = serde_json::to_string_pretty(value)
        .with_context(|| format!("failed to serialize {}", path.display()))?;
    replace_file(path, |file| file.write_all(content.as_bytes()))?;
    debug!("wrote {}", path.display());
    Ok(())
}

/// Stages the new content in a temporary file beside `path` and renames it
/// over the destination. On any failure the previous file is left as it was
/// and the staged file is removed.
fn replace_file(path: &Path, write: impl FnOnce(&mut File) -> io::Result<()>) -> Result<()> {
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => {
            fs::create_dir_all(parent)
                .with_context(|| format!("failed to create {}", parent.display()))?;
            parent
        }
        _ => Path::new("."),
    };
    let mut staged = NamedTempFile::new_in(dir)
        .with_context(|| format!("failed to stage a file in {}", dir.display()))?;
    write(staged.as_file_mut())
        .and_then(|()| staged.as_file().sync_all())
        .with_context(|| format!("failed to write {}", path.display()))?;
    staged
        .persist(path)
        .with_context(|| format!("failed to replace {}", path.display()))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tally_domain::{DailySummary, Fingerprint, SummaryKey};

    #[test]
    fn loads_events_in_input_order() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("events.json");
        fs::write(
            &path,
            r#"[
                {"userId": 2, "eventType": "comment", "timestamp": 1672444900},
                {"userId": 1, "eventType": "post", "timestamp": 1672444800}
            ]"#,
        )
        .expect("write input");

        let events = JsonEventFile::new(&path).load_events().expect("load");
        assert_eq!(
            events,
            vec![
                UserEvent::new(2, "comment", 1672444900),
                UserEvent::new(1, "post", 1672444800),
            ]
        );
    }

    #[test]
    fn rejects_malformed_event_batches() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("events.json");
        for content in [
            r#"{"userId": 1, "eventType": "post", "timestamp": 1}"#,
            r#"[{"userId": "1", "eventType": "post", "timestamp": 1}]"#,
            r#"[{"userId": 1, "timestamp": 1}]"#,
            "not json",
        ] {
            fs::write(&path, content).expect("write input");
            assert!(JsonEventFile::new(&path).load_events().is_err(), "{content}");
        }
        assert!(JsonEventFile::new(dir.path().join("absent.json"))
            .load_events()
            .is_err());
    }

    #[test]
    fn summary_file_round_trips_with_two_space_indent() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("out").join("summaries.json");
        let repo = JsonSummaryFile::new(&path);
        assert!(repo.load_summaries().expect("load").is_none());

        let mut summary = DailySummary::new(SummaryKey::new(1, "2022-12-31"));
        summary.set_count("post", 1);
        let store = SummaryStore::from_summaries(vec![summary]);
        repo.save_summaries(&store).expect("save");

        let written = fs::read_to_string(&path).expect("read output");
        assert_eq!(
            written,
            "[\n  {\n    \"userId\": 1,\n    \"date\": \"2022-12-31\",\n    \"post\": 1\n  }\n]"
        );
        assert_eq!(repo.load_summaries().expect("load"), Some(store));
    }

    #[test]
    fn malformed_summary_file_fails_to_load() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("summaries.json");
        fs::write(&path, r#"[{"userId": 1}]"#).expect("write");
        assert!(JsonSummaryFile::new(&path).load_summaries().is_err());
    }

    #[test]
    fn index_file_round_trips() {
        let dir = tempfile::tempdir().expect("tempdir");
        let repo = JsonIndexFile::new(dir.path().join("hash.json"));
        assert!(repo.load_index().expect("load").is_none());

        let index: DedupIndex = [Fingerprint::of(&UserEvent::new(1, "post", 1672444800))
            .expect("hash")]
        .into_iter()
        .collect();
        repo.save_index(&index).expect("save");
        assert_eq!(repo.load_index().expect("load"), Some(index));
    }

    #[test]
    fn malformed_index_file_fails_to_load() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("hash.json");
        fs::write(&path, "[]").expect("write");
        assert!(JsonIndexFile::new(&path).load_index().is_err());
    }

    #[test]
    fn save_replaces_previous_content() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("summaries.json");
        fs::write(&path, "[\n  {\"stale\": true}\n]").expect("write");

        JsonSummaryFile::new(&path)
            .save_summaries(&SummaryStore::new())
            .expect("save");

        assert_eq!(fs::read_to_string(&path).expect("read"), "[]");
        assert_eq!(fs::read_dir(dir.path()).expect("list").count(), 1);
    }

    #[test]
    fn failed_write_keeps_previous_file_intact() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("output.json");
        let previous = "[\n  {\n    \"userId\": 1,\n    \"date\": \"2022-12-31\",\n    \"post\": 1\n  }\n]";
        fs::write(&path, previous).expect("write");

        let err = replace_file(&path, |file| {
            file.write_all(b"[\n  {\n    \"userId\"")?;
            Err(io::Error::other("no space left"))
        })
        .expect_err("write failure");

        assert!(format!("{err:#}").contains("no space left"));
        assert_eq!(fs::read_to_string(&path).expect("read"), previous);
        assert_eq!(fs::read_dir(dir.path()).expect("list").count(), 1);
    }

    #[test]
    fn failed_rename_keeps_destination_and_cleans_up() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("hash.json");
        fs::create_dir(&path).expect("mkdir");
        fs::write(path.join("keep"), "x").expect("write");

        let err = JsonIndexFile::new(&path)
            .save_index(&DedupIndex::new())
            .expect_err("cannot replace a directory");

        assert!(format!("{err:#}").contains("failed to replace"));
        assert_eq!(fs::read_to_string(path.join("keep")).expect("read"), "x");
        assert_eq!(fs::read_dir(dir.path()).expect("list").count(), 1);
    }
}
