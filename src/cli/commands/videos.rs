//! One-shot video discovery command.

use crate::cli::Output;
use crate::config::Settings;
use crate::server::{AppState, VideosResponse};
use anyhow::Result;

/// Run the video flow for `location` and print the response body.
pub async fn run_videos(location: &str, settings: Settings) -> Result<()> {
    let state = AppState::from_settings(&settings)?;

    let spinner = Output::spinner(&format!("Searching videos for {}...", location));
    let videos = state.videos.discover(location).await;
    spinner.finish_and_clear();

    if videos.is_empty() {
        Output::warning("No videos found (run with -v to see why).");
    }

    Output::json(&VideosResponse { videos })
}
