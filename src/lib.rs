//! Postbot - restaurant location enrichment
//!
//! Collects marketing data about a physical restaurant location with the
//! help of a hosted generative model:
//!
//! - short-form videos mentioning the location, found through a tool-calling
//!   exchange between the model and a video search API
//! - reservation and menu links, found by the model's own web search
//! - cuisine and dining-style labels with confidence scores
//!
//! # Architecture
//!
//! - `config` - Settings and prompt templates
//! - `gemini` - Generative model wire types, trait and Vertex AI client
//! - `search` - Video search API client
//! - `parse` - Decoding of fenced JSON answers
//! - `flows` - Video discovery and grounded query flows
//! - `server` - HTTP handlers (`/postbot_videos`, `/postbot_location`)
//! - `cli` - Command line interface
//!
//! # Example
//!
//! ```rust,no_run
//! use postbot::config::Settings;
//! use postbot::server::AppState;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let settings = Settings::load()?;
//!     let state = AppState::from_settings(&settings)?;
//!
//!     let videos = state.videos.discover("Dishoom Covent Garden").await;
//!     println!("Found {} videos", videos.len());
//!
//!     Ok(())
//! }
//! ```

pub mod cli;
pub mod config;
pub mod error;
pub mod flows;
pub mod gemini;
pub mod parse;
pub mod search;
pub mod server;

pub use error::{PostbotError, Result};
