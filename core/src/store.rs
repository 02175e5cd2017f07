/*
    spotify-history-rs | Rust CLI tool to archive recently played Spotify tracks.
    Copyright (C) 2025  spotify-history-rs contributors

    This program is free software: you can redistribute it and/or modify
    it under the terms of the GNU Affero General Public License as published
    by the Free Software Foundation, either version 3 of the License, or
    (at your option) any later version.

    This program is distributed in the hope that it will be useful,
    but WITHOUT ANY WARRANTY; without even the implied warranty of
    MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
    GNU Affero General Public License for more details.

    You should have received a copy of the GNU Affero General Public License
    along with this program.  If not, see <https://www.gnu.org/licenses/>.
*/

use crate::models::PlayRecord;
use log::info;
use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Where the accumulated listening history lives unless overridden.
pub const DEFAULT_HISTORY_FILE: &str = "spotify_listening_history.csv";

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Failed to access history file: {0}")]
    Io(#[from] std::io::Error),
    #[error("Failed to process history file: {0}")]
    Csv(#[from] csv::Error),
}

/// Counters from one merge, for reporting.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MergeStats {
    pub existing: usize,
    pub incoming: usize,
    pub total: usize,
}

impl MergeStats {
    /// Rows that survived deduplication and were not already on disk.
    pub fn newly_added(&self) -> usize {
        self.total - self.existing
    }
}

/// CSV-backed play history with a fixed column order
/// `[Track Name, Artist, Played At]` and full-row deduplication.
pub struct HistoryStore {
    path: PathBuf,
}

impl HistoryStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Loads the existing history. A missing file is an empty history; a
    /// malformed file is an error the caller is expected to log and survive.
    pub fn load(&self) -> Result<Vec<PlayRecord>, StoreError> {
        if !self.path.exists() {
            return Ok(Vec::new());
        }

        let mut reader = csv::Reader::from_path(&self.path)?;
        let mut rows = Vec::new();
        for result in reader.deserialize() {
            rows.push(result?);
        }
        Ok(rows)
    }

    /// Appends `new_records` to the stored history, removes exact-duplicate
    /// rows keeping the first occurrence, and rewrites the file.
    ///
    /// The rewrite goes to a temporary sibling first and is renamed into
    /// place, so a crash mid-write cannot truncate the existing history.
    pub fn merge_and_save(&self, new_records: &[PlayRecord]) -> Result<MergeStats, StoreError> {
        let mut seen: HashSet<PlayRecord> = HashSet::new();
        let mut merged: Vec<PlayRecord> = Vec::new();
        for record in self.load()? {
            if seen.insert(record.clone()) {
                merged.push(record);
            }
        }
        // Counted after deduplication: the on-disk file may already hold
        // duplicate rows if something else wrote it.
        let existing_count = merged.len();

        for record in new_records {
            if seen.insert(record.clone()) {
                merged.push(record.clone());
            }
        }

        let tmp_path = self.path.with_extension("csv.tmp");
        if let Err(e) = write_rows(&tmp_path, &merged) {
            let _ = fs::remove_file(&tmp_path);
            return Err(e);
        }
        fs::rename(&tmp_path, &self.path)?;

        info!("Data saved to {}.", self.path.display());

        Ok(MergeStats {
            existing: existing_count,
            incoming: new_records.len(),
            total: merged.len(),
        })
    }
}

fn write_rows(path: &Path, rows: &[PlayRecord]) -> Result<(), StoreError> {
    let mut writer = csv::Writer::from_path(path)?;
    for record in rows {
        writer.serialize(record)?;
    }
    writer.flush()?;
    Ok(())
}
