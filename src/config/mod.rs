//! Configuration module for Postbot.
//!
//! Handles loading and managing application settings and prompt templates.

mod prompts;
mod settings;

pub use prompts::{LabelPrompts, Prompts, ReservationPrompts, VideoPrompts};
pub use settings::{
    GenerationSettings, PromptSettings, SamplingSettings, SearchSettings, ServerSettings,
    Settings, VertexSettings,
};
