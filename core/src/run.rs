use crate::fetch::RecentlyPlayedSource;
use crate::store::HistoryStore;
use log::{error, warn};
use serde::Serialize;

/// What a single collection run amounted to.
///
/// The original tool folded fetch failures into "nothing to save"; keeping
/// them apart lets callers tell "no new plays" from "something broke" while
/// both stay non-fatal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RunOutcome {
    /// New data was merged into the history file.
    Saved { fetched: usize, total_rows: usize },
    /// The fetch succeeded but returned no play events; the file was not touched.
    NothingToSave,
    /// The service-side fetch failed; the file was not touched.
    FetchFailed(String),
    /// The fetch succeeded but the history file could not be read or written.
    StoreFailed(String),
}

/// Runs the pipeline once: fetch up to `limit` recent plays, then merge them
/// into `store`. An empty fetch skips the store entirely, leaving the file
/// byte-identical. Fetch and store failures are logged and reported in the
/// outcome; nothing here aborts the process.
pub async fn run_once<S: RecentlyPlayedSource>(
    source: &S,
    store: &HistoryStore,
    limit: u32,
) -> RunOutcome {
    let records = match source.fetch_recent(limit).await {
        Ok(records) => records,
        Err(e) => {
            error!("Error fetching recently played tracks: {}", e);
            return RunOutcome::FetchFailed(e.to_string());
        }
    };

    if records.is_empty() {
        warn!("No data fetched, nothing to save.");
        return RunOutcome::NothingToSave;
    }

    match store.merge_and_save(&records) {
        Ok(stats) => RunOutcome::Saved {
            fetched: records.len(),
            total_rows: stats.total,
        },
        Err(e) => {
            error!("Error saving history to {}: {}", store.path().display(), e);
            RunOutcome::StoreFailed(e.to_string())
        }
    }
}

/// Payload handed back to a scheduled-trigger runtime.
#[derive(Debug, Serialize)]
pub struct InvocationResponse {
    #[serde(rename = "statusCode")]
    pub status_code: u16,
    pub body: String,
}

/// Entry point for scheduled invocation. The event shape is unused; the
/// transport status is always 200 and the JSON-encoded body carries the
/// actual outcome message.
pub async fn handle<S: RecentlyPlayedSource>(
    source: &S,
    store: &HistoryStore,
    _event: serde_json::Value,
) -> InvocationResponse {
    let message = match run_once(source, store, crate::fetch::RECENTLY_PLAYED_LIMIT).await {
        RunOutcome::Saved { .. } => "Data collection successful!".to_string(),
        RunOutcome::NothingToSave => "No data fetched, nothing to save.".to_string(),
        RunOutcome::FetchFailed(e) | RunOutcome::StoreFailed(e) => format!("Error: {}", e),
    };

    let body = serde_json::to_string(&message).unwrap_or(message);
    InvocationResponse {
        status_code: 200,
        body,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fetch::{FetchError, RECENTLY_PLAYED_LIMIT};
    use crate::models::PlayRecord;
    use async_trait::async_trait;
    use std::fs;
    use tempfile::tempdir;

    struct FixedSource(Vec<PlayRecord>);

    #[async_trait]
    impl RecentlyPlayedSource for FixedSource {
        async fn fetch_recent(&self, _limit: u32) -> Result<Vec<PlayRecord>, FetchError> {
            Ok(self.0.clone())
        }
    }

    struct FailingSource;

    #[async_trait]
    impl RecentlyPlayedSource for FailingSource {
        async fn fetch_recent(&self, _limit: u32) -> Result<Vec<PlayRecord>, FetchError> {
            Err(FetchError::Spotify(rspotify::ClientError::InvalidToken))
        }
    }

    fn sample_batch() -> Vec<PlayRecord> {
        vec![
            PlayRecord::new("Song A", "Artist X", "2024-01-01T10:00:00Z"),
            PlayRecord::new("Song B", "Artist Y", "2024-01-01T11:00:00Z"),
        ]
    }

    #[tokio::test]
    async fn test_successful_run_saves_and_reports_counts() {
        let dir = tempdir().unwrap();
        let store = HistoryStore::new(dir.path().join("history.csv"));
        let source = FixedSource(sample_batch());

        let outcome = run_once(&source, &store, RECENTLY_PLAYED_LIMIT).await;
        assert_eq!(
            outcome,
            RunOutcome::Saved {
                fetched: 2,
                total_rows: 2
            }
        );
        assert_eq!(store.load().unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_empty_fetch_leaves_file_untouched() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("history.csv");
        let store = HistoryStore::new(&path);
        store.merge_and_save(&sample_batch()).unwrap();
        let before = fs::read_to_string(&path).unwrap();

        let outcome = run_once(&FixedSource(Vec::new()), &store, RECENTLY_PLAYED_LIMIT).await;
        assert_eq!(outcome, RunOutcome::NothingToSave);
        assert_eq!(fs::read_to_string(&path).unwrap(), before);
    }

    #[tokio::test]
    async fn test_fetch_failure_is_reported_and_file_untouched() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("history.csv");
        let store = HistoryStore::new(&path);

        let outcome = run_once(&FailingSource, &store, RECENTLY_PLAYED_LIMIT).await;
        assert!(matches!(outcome, RunOutcome::FetchFailed(_)));
        assert!(!path.exists());
    }

    #[tokio::test]
    async fn test_store_failure_is_reported() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("history.csv");
        fs::write(&path, "Track Name,Artist,Played At\nSong A,Artist X\n").unwrap();
        let store = HistoryStore::new(&path);

        let outcome = run_once(&FixedSource(sample_batch()), &store, RECENTLY_PLAYED_LIMIT).await;
        assert!(matches!(outcome, RunOutcome::StoreFailed(_)));
    }

    #[tokio::test]
    async fn test_handle_success_message() {
        let dir = tempdir().unwrap();
        let store = HistoryStore::new(dir.path().join("history.csv"));
        let source = FixedSource(sample_batch());

        let response = handle(&source, &store, serde_json::json!({})).await;
        assert_eq!(response.status_code, 200);
        assert_eq!(response.body, "\"Data collection successful!\"");
    }

    #[tokio::test]
    async fn test_handle_nothing_to_save_message() {
        let dir = tempdir().unwrap();
        let store = HistoryStore::new(dir.path().join("history.csv"));

        let response = handle(&FixedSource(Vec::new()), &store, serde_json::json!({})).await;
        assert_eq!(response.status_code, 200);
        assert_eq!(response.body, "\"No data fetched, nothing to save.\"");
    }

    #[tokio::test]
    async fn test_handle_failure_still_returns_200() {
        let dir = tempdir().unwrap();
        let store = HistoryStore::new(dir.path().join("history.csv"));

        let response = handle(&FailingSource, &store, serde_json::json!(null)).await;
        assert_eq!(response.status_code, 200);
        assert!(response.body.contains("Error:"));
    }
}
