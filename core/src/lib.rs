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

pub mod auth;
pub mod fetch;
pub mod models;
pub mod run;
pub mod store;

// Re-export key items for convenience
pub use auth::get_spotify_client;
pub use fetch::{RecentlyPlayedSource, SpotifyFetcher, RECENTLY_PLAYED_LIMIT};
pub use models::PlayRecord;
pub use run::{handle, run_once, InvocationResponse, RunOutcome};
pub use store::{HistoryStore, MergeStats, DEFAULT_HISTORY_FILE};
