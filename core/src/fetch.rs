use crate::models::PlayRecord;
use async_trait::async_trait;
use chrono::SecondsFormat;
use log::info;
use rspotify::{prelude::*, AuthCodeSpotify};
use std::sync::Arc;
use thiserror::Error;

/// The recently-played endpoint never returns more than 50 items; requests
/// above that are clamped rather than rejected.
pub const RECENTLY_PLAYED_LIMIT: u32 = 50;

#[derive(Error, Debug)]
pub enum FetchError {
    #[error("Spotify API error: {0}")]
    Spotify(#[from] rspotify::ClientError),
}

/// Anything that can produce the user's recent play events.
///
/// The pipeline only talks to this trait, so the fetch step can be exercised
/// in tests without an authorized session.
#[async_trait]
pub trait RecentlyPlayedSource {
    async fn fetch_recent(&self, limit: u32) -> Result<Vec<PlayRecord>, FetchError>;
}

/// Fetches recent plays from the Spotify Web API through an authorized
/// session constructed once at startup and passed in explicitly.
pub struct SpotifyFetcher {
    spotify: Arc<AuthCodeSpotify>,
}

impl SpotifyFetcher {
    pub fn new(spotify: AuthCodeSpotify) -> Self {
        Self {
            spotify: Arc::new(spotify),
        }
    }
}

#[async_trait]
impl RecentlyPlayedSource for SpotifyFetcher {
    /// Projects each play event into a flat record: track display name, first
    /// listed artist, and the play timestamp exactly as reported (UTC, no
    /// local clock normalization).
    async fn fetch_recent(&self, limit: u32) -> Result<Vec<PlayRecord>, FetchError> {
        let limit = limit.min(RECENTLY_PLAYED_LIMIT);
        let history = self
            .spotify
            .current_user_recently_played(Some(limit), None)
            .await?;

        let records: Vec<PlayRecord> = history
            .items
            .into_iter()
            .map(|item| PlayRecord {
                track_name: item.track.name,
                artist: item
                    .track
                    .artists
                    .first()
                    .map(|a| a.name.clone())
                    .unwrap_or_default(),
                played_at: item
                    .played_at
                    .to_rfc3339_opts(SecondsFormat::Secs, true),
            })
            .collect();

        info!("Fetched {} tracks.", records.len());
        Ok(records)
    }
}
