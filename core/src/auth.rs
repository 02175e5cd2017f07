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

use rspotify::{prelude::*, scopes, AuthCodeSpotify, Config, Credentials, OAuth};
use thiserror::Error;

/// Redirect URI used when `RSPOTIFY_REDIRECT_URI` is not set. The port must
/// match one of the redirect URIs registered for the application.
const DEFAULT_REDIRECT_URI: &str = "http://localhost:8888/callback";

#[derive(Error, Debug)]
pub enum AuthError {
    #[error("Spotify API credentials are missing: {0}")]
    ClientConfig(String),
    #[error("Spotify authentication failed: {0}")]
    Spotify(#[from] rspotify::ClientError),
}

/// Rejects absent or blank credentials before any network activity happens.
/// A missing client id or secret is operator-fixable only, so it is fatal.
pub fn validate_credentials(creds: &Credentials) -> Result<(), AuthError> {
    if creds.id.trim().is_empty() {
        return Err(AuthError::ClientConfig(
            "RSPOTIFY_CLIENT_ID is empty".to_string(),
        ));
    }
    match &creds.secret {
        Some(secret) if !secret.trim().is_empty() => Ok(()),
        _ => Err(AuthError::ClientConfig(
            "RSPOTIFY_CLIENT_SECRET is empty".to_string(),
        )),
    }
}

/// Initializes and authenticates a Spotify client using the Authorization Code Flow.
///
/// This function:
/// 1. Reads credentials (`RSPOTIFY_CLIENT_ID`, `RSPOTIFY_CLIENT_SECRET`) from the environment
///    and fails fast if either is missing or empty.
/// 2. Reads the redirect URI from `RSPOTIFY_REDIRECT_URI`, falling back to
///    `http://localhost:8888/callback`.
/// 3. Requests the `user-read-recently-played` scope.
/// 4. Handles the OAuth2 flow, including token caching and refreshing.
///
/// If a valid token is not cached, it will prompt the user (via stdout) to visit a URL
/// to authorize the application.
pub async fn get_spotify_client() -> Result<AuthCodeSpotify, AuthError> {
    // Load credentials from env. `rspotify` expects RSPOTIFY_CLIENT_ID/SECRET.
    let creds = Credentials::from_env().ok_or_else(|| {
        AuthError::ClientConfig("Missing RSPOTIFY_CLIENT_ID or RSPOTIFY_CLIENT_SECRET".to_string())
    })?;

    let spotify = build_client(creds)?;

    // Get the authorization URL.
    let url = spotify.get_authorize_url(false)?;

    // This method from the `cli` feature of rspotify handles the interaction:
    // 1. Tries to open the URL in the default browser.
    // 2. If that fails, prints the URL to stdout.
    // 3. Waits for the redirect URI to be hit (if running a local server) or input.
    spotify.prompt_for_token(&url).await?;

    Ok(spotify)
}

/// Validates the credentials and only then assembles the client. Nothing in
/// here touches the network; authorization happens afterwards against the
/// client this returns.
fn build_client(creds: Credentials) -> Result<AuthCodeSpotify, AuthError> {
    validate_credentials(&creds)?;

    // The only scope needed to read the recently-played window.
    let scopes = scopes!("user-read-recently-played");

    // Load OAuth config (Redirect URI) from env, or use the fixed local default.
    let oauth = OAuth::from_env(scopes.clone()).unwrap_or_else(|| OAuth {
        scopes,
        redirect_uri: DEFAULT_REDIRECT_URI.to_string(),
        ..Default::default()
    });

    // Configure the client.
    // `token_cached: true` enables saving the token to a file (default: .spotify_token_cache.json).
    let config = Config {
        token_cached: true,
        token_refreshing: true,
        ..Default::default()
    };

    Ok(AuthCodeSpotify::with_config(creds, oauth, config))
}
