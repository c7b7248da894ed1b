//! One-shot location enrichment command.

use crate::cli::Output;
use crate::config::Settings;
use crate::server::{resolve_address, AppState};
use anyhow::Result;

/// Run the grounded flows for `location` and print the composite body.
pub async fn run_location(
    location: &str,
    name: Option<&str>,
    full_address: Option<&str>,
    settings: Settings,
) -> Result<()> {
    let state = AppState::from_settings(&settings)?;

    let spinner = Output::spinner(&format!("Researching {}...", location));
    let report = state
        .location_report(
            location,
            name.unwrap_or_default(),
            resolve_address(location, full_address),
        )
        .await;
    spinner.finish_and_clear();

    Output::json(&report)
}
