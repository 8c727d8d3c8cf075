//! Brain-dump categorization client.
//!
//! # Responsibility
//! - Build the categorization prompt and response schema.
//! - Decode model output into a typed [`Categorization`].
//!
//! # Invariants
//! - Blank input fails with `AiError::EmptyInput` without a network call.
//! - `type` and `priority` are restricted to their fixed enumerations.

use super::{AiError, AiResult, GenerateRequest, TextModel};
use crate::model::item::{fallback_title, ItemType, Priority};
use log::{info, warn};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::sync::Arc;

static CODE_FENCE_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?s)^```[a-zA-Z]*\s*(.*?)\s*```$").expect("valid code fence regex")
});

/// Structured categorization result (item shape minus id/timestamp/completed).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Categorization {
    pub title: String,
    #[serde(rename = "type")]
    pub kind: ItemType,
    pub category: String,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub priority: Option<Priority>,
}

/// Categorizer over any [`TextModel`] backend.
#[derive(Clone)]
pub struct Categorizer {
    model: Arc<dyn TextModel>,
}

impl Categorizer {
    pub fn new(model: Arc<dyn TextModel>) -> Self {
        Self { model }
    }

    /// Categorizes `text`, biased by optional personal `context`.
    pub async fn categorize(&self, text: &str, context: Option<&str>) -> AiResult<Categorization> {
        if text.trim().is_empty() {
            return Err(AiError::EmptyInput);
        }

        let request = GenerateRequest::structured(build_prompt(text, context), response_schema());
        let raw = match self.model.generate(&request).await {
            Ok(raw) => raw,
            Err(err) => {
                warn!(
                    "event=categorize module=ai status=error backend={} error_code={}",
                    self.model.description(),
                    err.code()
                );
                return Err(err);
            }
        };

        let categorization = parse_categorization(&raw, text)?;
        info!(
            "event=categorize module=ai status=ok type={} tags={} has_priority={}",
            categorization.kind,
            categorization.tags.len(),
            categorization.priority.is_some()
        );
        Ok(categorization)
    }
}

fn build_prompt(text: &str, context: Option<&str>) -> String {
    let context_instruction = context
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .map(|value| {
            format!(
                "Personal user context to consider: \"{value}\". Use this to better categorize and title the item."
            )
        })
        .unwrap_or_default();

    format!(
        "Analyze this brain dump: \"{text}\". {context_instruction}\n\
         Categorize it as a 'task', 'idea', 'win', or 'note'. Provide a short clear title, \
         a broad category (like Work, Personal, Creative, Health), and relevant tags. \
         Also suggest a priority if it's a task."
    )
}

/// Response schema sent with every categorization request.
pub fn response_schema() -> serde_json::Value {
    json!({
        "type": "OBJECT",
        "properties": {
            "title": { "type": "STRING" },
            "type": { "type": "STRING", "enum": ["task", "idea", "win", "note"] },
            "category": { "type": "STRING" },
            "tags": { "type": "ARRAY", "items": { "type": "STRING" } },
            "priority": { "type": "STRING", "enum": ["low", "medium", "high"] }
        },
        "required": ["title", "type", "category", "tags", "priority"]
    })
}

/// Decodes model output, tolerating Markdown code fences.
///
/// Tags are trimmed and blank tags dropped; a blank title falls back to the
/// truncated source text.
pub fn parse_categorization(raw: &str, source_text: &str) -> AiResult<Categorization> {
    let trimmed = raw.trim();
    let json_text = CODE_FENCE_RE
        .captures(trimmed)
        .and_then(|caps| caps.get(1))
        .map_or(trimmed, |body| body.as_str());

    let mut parsed: Categorization =
        serde_json::from_str(json_text).map_err(|err| AiError::Decode(err.to_string()))?;

    parsed.title = parsed.title.trim().to_string();
    if parsed.title.is_empty() {
        parsed.title = fallback_title(source_text);
    }
    parsed.category = parsed.category.trim().to_string();
    parsed.tags = parsed
        .tags
        .into_iter()
        .map(|tag| tag.trim().to_string())
        .filter(|tag| !tag.is_empty())
        .collect();
    Ok(parsed)
}

#[cfg(test)]
mod tests {
    use super::{build_prompt, parse_categorization, response_schema};
    use crate::ai::AiError;
    use crate::model::item::{ItemType, Priority};

    #[test]
    fn prompt_includes_context_only_when_present() {
        let with_context = build_prompt("call mom", Some("I am a nurse"));
        assert!(with_context.contains("\"I am a nurse\""));

        let without = build_prompt("call mom", Some("  "));
        assert!(!without.contains("Personal user context"));
        assert!(without.starts_with("Analyze this brain dump: \"call mom\"."));
    }

    #[test]
    fn schema_requires_all_fields() {
        let schema = response_schema();
        assert_eq!(schema["required"].as_array().unwrap().len(), 5);
        assert_eq!(schema["properties"]["type"]["enum"][2], "win");
    }

    #[test]
    fn parse_accepts_fenced_json() {
        let raw = "```json\n{\"title\":\"Call mom\",\"type\":\"task\",\"category\":\"Personal\",\"tags\":[\" family \",\"\"],\"priority\":\"high\"}\n```";
        let parsed = parse_categorization(raw, "call mom").unwrap();
        assert_eq!(parsed.kind, ItemType::Task);
        assert_eq!(parsed.priority, Some(Priority::High));
        assert_eq!(parsed.tags, vec!["family".to_string()]);
    }

    #[test]
    fn parse_rejects_unknown_type() {
        let raw = r#"{"title":"x","type":"event","category":"Work","tags":[],"priority":"low"}"#;
        let err = parse_categorization(raw, "x").unwrap_err();
        assert!(matches!(err, AiError::Decode(_)));
    }

    #[test]
    fn blank_title_falls_back_to_source_text() {
        let raw = r#"{"title":"  ","type":"idea","category":"Creative","tags":[],"priority":"low"}"#;
        let parsed = parse_categorization(raw, "a garden on the roof").unwrap();
        assert_eq!(parsed.title, "a garden on the roof");
    }
}
