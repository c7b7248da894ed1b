//! Single-prompt flows answered with the model's own web search.

use super::types::{
    LabelCandidate, ReservationMenuLinks, CUISINE_CATEGORIES, DINING_STYLE_CATEGORIES,
};
use crate::config::{GenerationSettings, Prompts, SamplingSettings};
use crate::error::Result;
use crate::gemini::{Content, GenerateContentRequest, GenerativeModel, Tool};
use crate::parse::{parse_list, parse_or, preview};
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{debug, instrument, warn};

/// Parameters that specialise the shared label prompt.
struct LabelKind {
    flow: &'static str,
    kind: &'static str,
    hint: &'static str,
    categories: &'static [&'static str],
    example: &'static str,
}

const FOOD_TYPES: LabelKind = LabelKind {
    flow: "food_types",
    kind: "food",
    hint: "Examples of food labels are sushi or pizza, whatever the place is mainly known for.",
    categories: CUISINE_CATEGORIES,
    example: "Asian",
};

const DINING_STYLES: LabelKind = LabelKind {
    flow: "labels",
    kind: "restaurant",
    hint: "Restaurant labels describe the kind of setting the place gives off.",
    categories: DINING_STYLE_CATEGORIES,
    example: "Brunch",
};

/// Grounded reservation, cuisine and dining-style flows.
pub struct GroundedFlows {
    model: Arc<dyn GenerativeModel>,
    prompts: Arc<Prompts>,
    grounding: Tool,
    generation: GenerationSettings,
}

impl GroundedFlows {
    pub fn new(model: Arc<dyn GenerativeModel>, prompts: Arc<Prompts>, grounding: Tool) -> Self {
        Self {
            model,
            prompts,
            grounding,
            generation: GenerationSettings::default(),
        }
    }

    /// Override the per-flow sampling parameters.
    pub fn with_generation(mut self, generation: GenerationSettings) -> Self {
        self.generation = generation;
        self
    }

    /// Booking and menu URLs for the named restaurant.
    #[instrument(skip(self))]
    pub async fn reservation_links(&self, location: &str, name: &str) -> ReservationMenuLinks {
        let mut vars = HashMap::new();
        vars.insert("location".to_string(), location.to_string());
        vars.insert("name".to_string(), name.to_string());
        let prompt = self
            .prompts
            .render_with_custom(&self.prompts.reservation.user, &vars);

        match self.answer("reservation", prompt, &self.generation.reservation).await {
            Some(text) => parse_or("reservation", &text, ReservationMenuLinks::placeholder()),
            None => ReservationMenuLinks::placeholder(),
        }
    }

    /// Cuisine labels for the restaurant at `address`.
    #[instrument(skip(self))]
    pub async fn food_types(&self, address: &str) -> Vec<LabelCandidate> {
        let prompt = self.label_prompt(&FOOD_TYPES, &self.prompts.food_types.user, address);
        self.answer(FOOD_TYPES.flow, prompt, &self.generation.food_types)
            .await
            .map(|text| parse_list(FOOD_TYPES.flow, &text))
            .unwrap_or_default()
    }

    /// Dining-style labels for the restaurant at `address`.
    #[instrument(skip(self))]
    pub async fn dining_labels(&self, address: &str) -> Vec<LabelCandidate> {
        let prompt = self.label_prompt(&DINING_STYLES, &self.prompts.labels.user, address);
        self.answer(DINING_STYLES.flow, prompt, &self.generation.labels)
            .await
            .map(|text| parse_list(DINING_STYLES.flow, &text))
            .unwrap_or_default()
    }

    fn label_prompt(&self, kind: &LabelKind, template: &str, address: &str) -> String {
        let mut vars = HashMap::new();
        vars.insert("location".to_string(), address.to_string());
        vars.insert("label_kind".to_string(), kind.kind.to_string());
        vars.insert("label_hint".to_string(), kind.hint.to_string());
        vars.insert("categories".to_string(), kind.categories.join(", "));
        vars.insert("example_label".to_string(), kind.example.to_string());
        self.prompts.render_with_custom(template, &vars)
    }

    /// Model text for `prompt`, or `None` after logging the failure.
    async fn answer(&self, flow: &str, prompt: String, sampling: &SamplingSettings) -> Option<String> {
        match self.ask(prompt, sampling).await {
            Ok(text) => {
                debug!(flow, "Model answer: {}", preview(&text, 500));
                Some(text)
            }
            Err(e) => {
                warn!(flow, fallback = true, error = %e, "Grounded query failed");
                None
            }
        }
    }

    async fn ask(&self, prompt: String, sampling: &SamplingSettings) -> Result<String> {
        let mut request = GenerateContentRequest::new(vec![Content::user_text(prompt)])
            .with_tool(self.grounding.clone());
        if let Some(config) = sampling.to_config() {
            request = request.with_generation_config(config);
        }

        let response = self.model.generate_content(request).await?;
        Ok(response.text())
    }
}
