//! Value objects produced by the flows.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// Cuisine categories offered to the food-type flow.
pub const CUISINE_CATEGORIES: &[&str] = &[
    "Asian",
    "Italian",
    "American",
    "Mexican",
    "Mediterranean",
    "Cafe's/Bakery",
    "Other",
];

/// Dining-style categories offered to the label flow.
pub const DINING_STYLE_CATEGORIES: &[&str] = &["Casual", "Fine Dining", "Brunch"];

/// A short-form video judged relevant to a location.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VideoCandidate {
    pub link: String,
    #[serde(default, deserialize_with = "deserialize_accuracy")]
    pub accuracy: u8,
    #[serde(default)]
    pub reason: String,
    #[serde(default)]
    pub ocr: String,
    #[serde(default)]
    pub thumbnail: String,
}

/// A category label with the model's confidence.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LabelCandidate {
    pub label: String,
    #[serde(default, deserialize_with = "deserialize_accuracy")]
    pub accuracy: u8,
    #[serde(default)]
    pub reason: String,
}

/// Booking and menu URLs for a restaurant.
///
/// A key the model left out stays `None` and is reported as `null`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ReservationMenuLinks {
    #[serde(default)]
    pub reservation: Option<Vec<String>>,
    #[serde(default)]
    pub menu: Option<Vec<String>>,
}

impl ReservationMenuLinks {
    /// Shape returned when the flow fails.
    pub fn placeholder() -> Self {
        Self {
            reservation: Some(vec![String::new(), String::new()]),
            menu: Some(vec![String::new(), String::new()]),
        }
    }
}

/// Accept `90`, `90.4` or `"90%"`, clamped to 0..=100. `null` reads as 0.
fn deserialize_accuracy<'de, D>(deserializer: D) -> Result<u8, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    let number = match &value {
        Value::Null => Some(0.0),
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().trim_end_matches('%').trim().parse::<f64>().ok(),
        _ => None,
    };

    match number {
        Some(n) if n.is_finite() => Ok(n.round().clamp(0.0, 100.0) as u8),
        _ => Err(serde::de::Error::custom(format!(
            "invalid accuracy value: {}",
            value
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_video_candidate_defaults() {
        let video: VideoCandidate = serde_json::from_value(json!({
            "link": "https://www.tiktok.com/@a/video/1",
            "accuracy": 90
        }))
        .unwrap();

        assert_eq!(video.accuracy, 90);
        assert!(video.reason.is_empty());
        assert!(video.thumbnail.is_empty());
    }

    #[test]
    fn test_lenient_accuracy() {
        let label: LabelCandidate =
            serde_json::from_value(json!({"label": "Asian", "accuracy": "95%", "reason": "sushi"})).unwrap();
        assert_eq!(label.accuracy, 95);

        let label: LabelCandidate =
            serde_json::from_value(json!({"label": "Other", "accuracy": 120.7})).unwrap();
        assert_eq!(label.accuracy, 100);

        let label: LabelCandidate =
            serde_json::from_value(json!({"label": "Other", "accuracy": null})).unwrap();
        assert_eq!(label.accuracy, 0);

        let bad = serde_json::from_value::<LabelCandidate>(json!({"label": "Other", "accuracy": "high"}));
        assert!(bad.is_err());
    }

    #[test]
    fn test_links_missing_key_is_null() {
        let links: ReservationMenuLinks =
            serde_json::from_value(json!({"menu": ["https://r.com/menu"]})).unwrap();

        assert_eq!(links.reservation, None);
        assert_eq!(
            serde_json::to_value(&links).unwrap(),
            json!({"reservation": null, "menu": ["https://r.com/menu"]})
        );
    }

    #[test]
    fn test_placeholder_shape() {
        assert_eq!(
            serde_json::to_value(ReservationMenuLinks::placeholder()).unwrap(),
            json!({"reservation": ["", ""], "menu": ["", ""]})
        );
    }
}
