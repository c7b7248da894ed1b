//! CLI command implementations.

mod config;
mod doctor;
mod location;
mod serve;
mod videos;

pub use config::run_config;
pub use doctor::run_doctor;
pub use location::run_location;
pub use serve::run_serve;
pub use videos::run_videos;
