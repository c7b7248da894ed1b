//! Prompt templates for Postbot.
//!
//! Prompts can be customized by placing TOML files in the custom prompts directory.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::PathBuf;

/// Collection of all prompt templates.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
#[derive(Default)]
pub struct Prompts {
    pub videos: VideoPrompts,
    pub reservation: ReservationPrompts,
    pub food_types: LabelPrompts,
    pub labels: LabelPrompts,
    /// Custom variables from config, available in all prompts.
    #[serde(skip)]
    pub variables: HashMap<String, String>,
}

/// Prompt for the tool-calling video discovery flow.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct VideoPrompts {
    pub user: String,
}

impl Default for VideoPrompts {
    fn default() -> Self {
        Self {
            user: r#"1. Generate TikTok search keywords for the location: {{location}}. Keywords must be comma separated, with no punctuation (no apostrophes), no slashes and no logical operators (AND, OR).
The keywords should help users discover content about this location. Do not include the address code. Use hashtags where relevant. Use at most 10 keywords.

2. Call the get_posts tool with these keywords.

3. Return every TikTok video link (https://www.tiktok.com/@{username}/video/{video_id}) that applies. Use the cover from the API response as the thumbnail.

4. Give a short reason why each video relates to the location.

5. Using those reasons and what the video and menu show, rank the results by accuracy as a percentage, highest first. Don't be verbose.

6. Describe what happens in the video in the "ocr" property.

7. Output the results as a JSON array like the example below.

[
  {
    "link": "https://www.tiktok.com/@username/video/video_id",
    "accuracy": 100,
    "reason": "shows logo",
    "ocr": "this video has a menu with the location logo and branding",
    "thumbnail": "https://www.tiktok.com/videoid/thumbnail.jpg"
  }
]"#
            .to_string(),
        }
    }
}

/// Prompt for the reservation/menu link flow.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ReservationPrompts {
    pub user: String,
}

impl Default for ReservationPrompts {
    fn default() -> Self {
        Self {
            user: r#"You help users find information about restaurants. You will receive the name and location of a restaurant. Find the URLs for online booking/reservations and for menus of that restaurant.

Instructions:
- Perform a web search using the restaurant name and location.
- Use only information found in the top search results.
- Check the page content of each result.
- Extract ALL relevant URLs, main URL and sub routes, for reservations and menus directly from the pages.
- Do not fabricate or assume any URL that is not present in the search results.
- Make sure each URL is valid and belongs to this restaurant.

Sample URLs for reference:
https://www.restaurant.com/reservations
https://www.restaurant.com/reservations/
https://www.restaurant.com/menu
https://www.restaurant.com/menu/drinks
https://www.restaurant.com/menu/desserts

Output the results as a JSON object with this structure:

```json
{
  "reservation": [ /* array of reservation URLs */ ],
  "menu": [ /* array of menu URLs */ ]
}
```

If no URLs are found for a category, return an empty array for it.

Restaurant Name: {{name}}
Restaurant Location: {{location}}"#
                .to_string(),
        }
    }
}

/// Prompt for a label classification flow.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LabelPrompts {
    pub user: String,
}

impl Default for LabelPrompts {
    fn default() -> Self {
        Self {
            user: r#"Search for every {{label_kind}} label that applies to the restaurant at this location: {{location}}. {{label_hint}}
The categories to consider are {{categories}}.

Based on the search results, rank the categories by accuracy as a percentage. Don't be verbose.

Output the results as a JSON array like the example below.

[
  {
    "label": "{{example_label}}",
    "accuracy": 95,
    "reason": "a detailed explanation from what was found in the search"
  }
]"#
            .to_string(),
        }
    }
}

impl Prompts {
    /// Load prompts, using custom prompts from the directory if available.
    pub fn load(custom_dir: Option<&PathBuf>) -> crate::error::Result<Self> {
        let mut prompts = Self::default();

        if let Some(dir) = custom_dir {
            if let Some(videos) = Self::load_file(dir, "videos.toml")? {
                prompts.videos = videos;
            }
            if let Some(reservation) = Self::load_file(dir, "reservation.toml")? {
                prompts.reservation = reservation;
            }
            if let Some(food_types) = Self::load_file(dir, "food_types.toml")? {
                prompts.food_types = food_types;
            }
            if let Some(labels) = Self::load_file(dir, "labels.toml")? {
                prompts.labels = labels;
            }
        }

        Ok(prompts)
    }

    /// Load prompts with custom variables from settings.
    pub fn load_with_variables(
        custom_dir: Option<&PathBuf>,
        variables: HashMap<String, String>,
    ) -> crate::error::Result<Self> {
        let mut prompts = Self::load(custom_dir)?;
        prompts.variables = variables;
        Ok(prompts)
    }

    fn load_file<T: serde::de::DeserializeOwned>(
        dir: &std::path::Path,
        file: &str,
    ) -> crate::error::Result<Option<T>> {
        let path = dir.join(file);
        if !path.exists() {
            return Ok(None);
        }
        let content = std::fs::read_to_string(&path)?;
        Ok(Some(toml::from_str(&content)?))
    }

    /// Render a prompt template with the given variables.
    ///
    /// The template is scanned once, so placeholders inside substituted
    /// values are never expanded. Unknown placeholders are left as they are.
    pub fn render(template: &str, vars: &HashMap<String, String>) -> String {
        let mut result = String::with_capacity(template.len());
        let mut rest = template;

        while let Some(start) = rest.find("{{") {
            result.push_str(&rest[..start]);
            let after = &rest[start + 2..];

            match after.find("}}").and_then(|end| vars.get(&after[..end]).map(|v| (end, v))) {
                Some((end, value)) => {
                    result.push_str(value);
                    rest = &after[end + 2..];
                }
                None => {
                    result.push_str("{{");
                    rest = after;
                }
            }
        }

        result.push_str(rest);
        result
    }

    /// Render a prompt template with both provided variables and custom config variables.
    /// Provided variables take precedence over custom config variables.
    pub fn render_with_custom(&self, template: &str, vars: &HashMap<String, String>) -> String {
        let mut merged = self.variables.clone();
        for (key, value) in vars {
            merged.insert(key.clone(), value.clone());
        }
        Self::render(template, &merged)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_prompts() {
        let prompts = Prompts::default();
        assert!(prompts.videos.user.contains("{{location}}"));
        assert!(prompts.reservation.user.contains("{{name}}"));
        assert!(prompts.labels.user.contains("{{categories}}"));
    }

    #[test]
    fn test_render_template() {
        let template = "Hello {{name}}, you have {{count}} messages.";
        let mut vars = HashMap::new();
        vars.insert("name".to_string(), "Alice".to_string());
        vars.insert("count".to_string(), "5".to_string());

        let result = Prompts::render(template, &vars);
        assert_eq!(result, "Hello Alice, you have 5 messages.");
    }

    #[test]
    fn test_render_does_not_expand_substituted_values() {
        let mut vars = HashMap::new();
        vars.insert("location".to_string(), "{{name}} {{categories}}".to_string());
        vars.insert("name".to_string(), "Bao".to_string());
        vars.insert("categories".to_string(), "Asian".to_string());

        let result = Prompts::render("{{name}} at {{location}} ({{unknown}})", &vars);
        assert_eq!(result, "Bao at {{name}} {{categories}} ({{unknown}})");
    }

    #[test]
    fn test_render_keeps_single_braces() {
        let mut vars = HashMap::new();
        vars.insert("location".to_string(), "123 Main St".to_string());

        let result = Prompts::render(&VideoPrompts::default().user, &vars);
        assert!(result.contains("location: 123 Main St."));
        assert!(result.contains("@{username}/video/{video_id}"));
    }

    #[test]
    fn test_custom_variables_are_overridden() {
        let mut prompts = Prompts::default();
        prompts.variables.insert("city".to_string(), "Lagos".to_string());
        prompts.variables.insert("name".to_string(), "ignored".to_string());

        let mut vars = HashMap::new();
        vars.insert("name".to_string(), "Bukka".to_string());

        let result = prompts.render_with_custom("{{name}} in {{city}}", &vars);
        assert_eq!(result, "Bukka in Lagos");
    }

    #[test]
    fn test_load_custom_prompt_file() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("labels.toml"), "user = \"Labels for {{location}}\"\n").unwrap();

        let prompts = Prompts::load(Some(&dir.path().to_path_buf())).unwrap();
        assert_eq!(prompts.labels.user, "Labels for {{location}}");
        assert_eq!(prompts.food_types.user, LabelPrompts::default().user);
    }
}
