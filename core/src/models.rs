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

use serde::{Deserialize, Serialize};
use std::fmt;

/// One play event as reported by Spotify.
///
/// Equality is structural over all three fields and is what the history store
/// deduplicates on. Two plays of the same track with the same reported
/// timestamp collapse into a single row; there is no other row identity.
///
/// The serde renames fix the CSV column order to
/// `[Track Name, Artist, Played At]`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PlayRecord {
    #[serde(rename = "Track Name")]
    pub track_name: String,
    #[serde(rename = "Artist")]
    pub artist: String,
    /// RFC 3339 timestamp exactly as the service reported it (UTC, `Z` suffix).
    #[serde(rename = "Played At")]
    pub played_at: String,
}

impl PlayRecord {
    pub fn new(
        track_name: impl Into<String>,
        artist: impl Into<String>,
        played_at: impl Into<String>,
    ) -> Self {
        Self {
            track_name: track_name.into(),
            artist: artist.into(),
            played_at: played_at.into(),
        }
    }
}

impl fmt::Display for PlayRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} - {} ({})", self.track_name, self.artist, self.played_at)
    }
}
