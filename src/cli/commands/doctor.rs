//! Doctor command - verify configuration and credentials.

use crate::cli::{mask_secret, Output};
use crate::config::Settings;
use crate::gemini::VertexClient;
use console::style;
use std::path::Path;

/// Check result for a single item.
#[derive(Debug)]
pub struct CheckResult {
    pub name: String,
    pub status: CheckStatus,
    pub message: String,
    pub hint: Option<String>,
}

#[derive(Debug, PartialEq)]
pub enum CheckStatus {
    Ok,
    Warning,
    Error,
}

impl CheckResult {
    fn ok(name: &str, message: &str) -> Self {
        Self {
            name: name.to_string(),
            status: CheckStatus::Ok,
            message: message.to_string(),
            hint: None,
        }
    }

    fn warning(name: &str, message: &str, hint: &str) -> Self {
        Self {
            name: name.to_string(),
            status: CheckStatus::Warning,
            message: message.to_string(),
            hint: Some(hint.to_string()),
        }
    }

    fn error(name: &str, message: &str, hint: &str) -> Self {
        Self {
            name: name.to_string(),
            status: CheckStatus::Error,
            message: message.to_string(),
            hint: Some(hint.to_string()),
        }
    }

    fn print(&self) {
        let icon = match self.status {
            CheckStatus::Ok => style("✓").green(),
            CheckStatus::Warning => style("!").yellow(),
            CheckStatus::Error => style("✗").red(),
        };

        println!("  {} {} - {}", icon, style(&self.name).bold(), self.message);

        if let Some(hint) = &self.hint {
            println!("    {} {}", style("→").dim(), style(hint).dim());
        }
    }
}

/// Run all diagnostic checks.
pub fn run_doctor(settings: &Settings, config_path: &Path) -> anyhow::Result<()> {
    Output::header("Postbot Doctor");
    println!();

    println!("{}", style("Generative Model").bold());
    let model_checks = check_vertex(settings);
    for check in &model_checks {
        check.print();
    }

    println!();
    println!("{}", style("Video Search").bold());
    let search_check = check_search_key(settings);
    search_check.print();

    println!();
    println!("{}", style("Configuration").bold());
    let config_check = check_config_file(config_path);
    config_check.print();

    println!();

    let checks: Vec<&CheckResult> = model_checks
        .iter()
        .chain([&search_check, &config_check])
        .collect();
    let errors = checks.iter().filter(|c| c.status == CheckStatus::Error).count();
    let warnings = checks.iter().filter(|c| c.status == CheckStatus::Warning).count();

    if errors > 0 {
        Output::error(&format!("{} error(s) found.", errors));
        anyhow::bail!("configuration incomplete");
    } else if warnings > 0 {
        Output::warning(&format!("All checks passed with {} warning(s).", warnings));
    } else {
        Output::success("All checks passed! Postbot is ready to serve.");
    }

    Ok(())
}

/// Check the Vertex AI project, region and credentials.
fn check_vertex(settings: &Settings) -> Vec<CheckResult> {
    let mut results = Vec::new();

    match VertexClient::endpoint_for(&settings.vertex) {
        Ok(endpoint) => results.push(CheckResult::ok("Endpoint", &endpoint)),
        Err(e) => results.push(CheckResult::error(
            "Endpoint",
            &e.to_string(),
            "Set with: export PROJECT_ID=... LOCATION=us-central1",
        )),
    }

    results.push(CheckResult::ok("Model", &settings.vertex.model));

    match &settings.vertex.access_token {
        Some(token) => results.push(CheckResult::ok(
            "VERTEX_ACCESS_TOKEN",
            &format!("configured ({})", mask_secret(token)),
        )),
        None => results.push(CheckResult::warning(
            "VERTEX_ACCESS_TOKEN",
            "not set",
            "Requests are sent without credentials unless a proxy adds them",
        )),
    }

    results
}

/// Check the RapidAPI key.
fn check_search_key(settings: &Settings) -> CheckResult {
    match &settings.search.api_key {
        Some(key) => CheckResult::ok("KEY", &format!("configured ({})", mask_secret(key))),
        None => CheckResult::error("KEY", "not set", "Set with: export KEY='your-rapidapi-key'"),
    }
}

/// Check if config file exists.
fn check_config_file(config_path: &Path) -> CheckResult {
    if config_path.exists() {
        CheckResult::ok("Config file", &format!("{}", config_path.display()))
    } else {
        CheckResult::warning(
            "Config file",
            "using defaults",
            "Create with: postbot config init",
        )
    }
}
