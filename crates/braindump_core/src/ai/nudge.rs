//! Gentle nudge generation for the Tasks view.
//!
//! # Responsibility
//! - Produce a short motivational message from pending task titles.
//! - Keep the last good message when a refresh fails.
//!
//! # Invariants
//! - Zero pending tasks never reach the model.
//! - Returned messages are at most [`MAX_NUDGE_WORDS`] words.

use super::{AiError, AiResult, GenerateRequest, TextModel};
use crate::model::item::Item;
use log::{info, warn};
use std::sync::Arc;

pub const MAX_NUDGE_WORDS: usize = 25;
pub const ALL_CAUGHT_UP_MESSAGE: &str =
    "You're all caught up! How about a quick moment of mindfulness?";
pub const EMPTY_RESPONSE_MESSAGE: &str =
    "Just checking in. Remember to breathe and take it one step at a time.";
pub const INITIAL_NUDGE_MESSAGE: &str = "Your brain is ready for a calm start.";

#[derive(Clone)]
pub struct NudgeClient {
    model: Arc<dyn TextModel>,
}

impl NudgeClient {
    pub fn new(model: Arc<dyn TextModel>) -> Self {
        Self { model }
    }

    /// Generates a nudge for the pending tasks in `items`.
    pub async fn generate(&self, items: &[Item], context: Option<&str>) -> AiResult<String> {
        let titles = pending_task_titles(items);
        if titles.is_empty() {
            return Ok(ALL_CAUGHT_UP_MESSAGE.to_string());
        }

        let request = GenerateRequest::text(build_prompt(&titles, context));
        let text = match self.model.generate(&request).await {
            Ok(text) => text,
            Err(AiError::EmptyResponse) => EMPTY_RESPONSE_MESSAGE.to_string(),
            Err(err) => return Err(err),
        };

        let message = cap_words(&text, MAX_NUDGE_WORDS);
        if message.is_empty() {
            return Ok(EMPTY_RESPONSE_MESSAGE.to_string());
        }
        Ok(message)
    }
}

/// Current nudge text plus pending state, as shown by the Tasks view.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NudgeBoard {
    message: String,
    loading: bool,
}

impl Default for NudgeBoard {
    fn default() -> Self {
        Self {
            message: INITIAL_NUDGE_MESSAGE.to_string(),
            loading: false,
        }
    }
}

impl NudgeBoard {
    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn begin_refresh(&mut self) {
        self.loading = true;
    }

    /// Applies a refresh result; failures keep the previous message.
    ///
    /// Returns `true` when the message changed.
    pub fn finish_refresh(&mut self, result: AiResult<String>) -> bool {
        self.loading = false;
        match result {
            Ok(message) => {
                let changed = message != self.message;
                self.message = message;
                changed
            }
            Err(err) => {
                warn!(
                    "event=nudge_refresh module=ai status=error error_code={} kept_previous=true",
                    err.code()
                );
                false
            }
        }
    }

    /// Runs one full refresh cycle against `client`.
    pub async fn refresh(
        &mut self,
        client: &NudgeClient,
        items: &[Item],
        context: Option<&str>,
    ) -> bool {
        self.begin_refresh();
        let result = client.generate(items, context).await;
        let changed = self.finish_refresh(result);
        info!("event=nudge_refresh module=ai status=done changed={changed}");
        changed
    }
}

fn pending_task_titles(items: &[Item]) -> Vec<&str> {
    items
        .iter()
        .filter(|item| item.is_pending_task())
        .map(|item| item.title.as_str())
        .collect()
}

fn build_prompt(titles: &[&str], context: Option<&str>) -> String {
    let context_instruction = context
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .map(|value| {
            format!(
                "The user's personal context is: \"{value}\". Tailor the nudge to be relevant to their life/work."
            )
        })
        .unwrap_or_default();

    format!(
        "Based on these tasks: {}, generate a \"Gentle Nudge\". {context_instruction}\n\
         This should be a kind, ADHD-friendly reminder that reduces overwhelm and suggests \
         one small, actionable step. Keep it under {MAX_NUDGE_WORDS} words.",
        titles.join(", ")
    )
}

fn cap_words(text: &str, max_words: usize) -> String {
    let words = text.split_whitespace().collect::<Vec<_>>();
    if words.len() <= max_words {
        return words.join(" ");
    }
    let mut capped = words[..max_words].join(" ");
    capped.push_str("...");
    capped
}
