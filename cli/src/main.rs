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

use clap::{Parser, Subcommand};
use dotenvy::dotenv;
use history_core::{
    get_spotify_client, handle, run_once, HistoryStore, RunOutcome, SpotifyFetcher,
    DEFAULT_HISTORY_FILE, RECENTLY_PLAYED_LIMIT,
};
use log::info;
use std::process;

#[derive(Parser)]
#[command(name = "spotify-history")]
#[command(about = "Archive your recently played Spotify tracks to a CSV file", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Fetches recent plays once and merges them into the history file
    Run {
        /// Path of the CSV history file
        #[arg(long, short = 'o', default_value = DEFAULT_HISTORY_FILE)]
        output: String,

        /// How many recent plays to request (the API caps this at 50)
        #[arg(long, default_value_t = RECENTLY_PLAYED_LIMIT)]
        limit: u32,
    },
    /// Runs the scheduled-invocation handler once and prints its payload
    Invoke {
        /// Path of the CSV history file
        #[arg(long, short = 'o', default_value = DEFAULT_HISTORY_FILE)]
        output: String,
    },
}

#[tokio::main]
async fn main() {
    env_logger::init();

    if dotenv().is_err() {
        // Silently ignore
    }

    let cli = Cli::parse();

    match &cli.command {
        Commands::Run { output, limit } => {
            handle_run(output, *limit).await;
        }
        Commands::Invoke { output } => {
            handle_invoke(output).await;
        }
    }
}

async fn get_fetcher() -> SpotifyFetcher {
    let spotify = match get_spotify_client().await {
        Ok(s) => s,
        Err(e) => {
            eprintln!("Error initializing Spotify client: {}", e);
            process::exit(1);
        }
    };
    SpotifyFetcher::new(spotify)
}

async fn handle_run(output: &str, limit: u32) {
    let fetcher = get_fetcher().await;
    let store = HistoryStore::new(output);
    info!("Collecting up to {} recent plays into {}", limit, output);

    println!("Fetching your recently played tracks...");

    match run_once(&fetcher, &store, limit).await {
        RunOutcome::Saved { fetched, total_rows } => {
            println!();
            println!("---------------------------------------------------");
            println!("COLLECTION COMPLETE");
            println!("---------------------------------------------------");
            println!("Tracks Fetched:       {}", fetched);
            println!("Rows in History File: {}", total_rows);
            println!("History File:         {}", store.path().display());
            println!("---------------------------------------------------");
        }
        RunOutcome::NothingToSave => {
            println!();
            println!("[OK] No recent plays returned. History file left untouched.");
        }
        RunOutcome::FetchFailed(e) => {
            eprintln!();
            eprintln!("[ERROR] Fetching recently played tracks failed: {}", e);
        }
        RunOutcome::StoreFailed(e) => {
            eprintln!();
            eprintln!("[ERROR] Saving the history file failed: {}", e);
        }
    }
}

async fn handle_invoke(output: &str) {
    let fetcher = get_fetcher().await;
    let store = HistoryStore::new(output);

    let response = handle(&fetcher, &store, serde_json::Value::Null).await;
    match serde_json::to_string_pretty(&response) {
        Ok(payload) => println!("{}", payload),
        Err(e) => {
            eprintln!("[ERROR] Failed to encode invocation payload: {}", e);
            process::exit(1);
        }
    }
}
