//! Captured item domain model.
//!
//! # Responsibility
//! - Define the canonical record shared by the Tasks, Library and Wins views.
//! - Provide partial-update and fallback-title helpers used by the stores.
//!
//! # Invariants
//! - `id` is unique across one item collection and never empty.
//! - `timestamp` is the creation instant in epoch milliseconds.
//! - `completed` is meaningful only for `ItemType::Task`.
//!
//! # See also
//! - crate::store::item_store

use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};
use uuid::Uuid;

/// Stable item identifier.
///
/// Newly captured items use UUID v4 text; persisted ids are accepted as-is.
pub type ItemId = String;

/// Maximum title length (in chars) kept by the fallback title.
pub const FALLBACK_TITLE_CHARS: usize = 30;
/// Category assigned when categorization is unavailable.
pub const FALLBACK_CATEGORY: &str = "Unsorted";

/// Item category produced by categorization.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ItemType {
    /// Actionable item that can be completed.
    Task,
    /// Creative thought worth keeping.
    Idea,
    /// Something that went well.
    Win,
    /// Anything else.
    Note,
}

impl ItemType {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Task => "task",
            Self::Idea => "idea",
            Self::Win => "win",
            Self::Note => "note",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "task" => Some(Self::Task),
            "idea" => Some(Self::Idea),
            "win" => Some(Self::Win),
            "note" => Some(Self::Note),
            _ => None,
        }
    }
}

impl Display for ItemType {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Optional task urgency.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Priority {
    Low,
    Medium,
    High,
}

impl Priority {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "low" => Some(Self::Low),
            "medium" => Some(Self::Medium),
            "high" => Some(Self::High),
            _ => None,
        }
    }

    /// Sort rank used by the library priority order (`unset` ranks 0).
    pub fn rank(priority: Option<Self>) -> u8 {
        match priority {
            Some(Self::High) => 3,
            Some(Self::Medium) => 2,
            Some(Self::Low) => 1,
            None => 0,
        }
    }
}

impl Display for Priority {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Validation error for item invariants.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ItemValidationError {
    /// `id` is empty or whitespace.
    EmptyId,
    /// Two items in one collection share an id.
    DuplicateId(ItemId),
}

impl Display for ItemValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyId => write!(f, "item id cannot be empty"),
            Self::DuplicateId(id) => write!(f, "duplicate item id `{id}`"),
        }
    }
}

impl Error for ItemValidationError {}

/// Canonical captured item.
///
/// Wire names follow the persisted JSON blob (`type`, `timestamp`, camelCase).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Item {
    pub id: ItemId,
    #[serde(rename = "type")]
    pub kind: ItemType,
    /// Original frozen capture text, stored verbatim.
    pub content: String,
    pub title: String,
    pub category: String,
    /// Creation instant, epoch milliseconds.
    pub timestamp: i64,
    #[serde(default)]
    pub completed: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub priority: Option<Priority>,
    #[serde(default)]
    pub tags: Vec<String>,
}

impl Item {
    /// Creates a new item with a generated id and no priority/tags.
    pub fn new(
        kind: ItemType,
        content: impl Into<String>,
        title: impl Into<String>,
        category: impl Into<String>,
        timestamp: i64,
    ) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            kind,
            content: content.into(),
            title: title.into(),
            category: category.into(),
            timestamp,
            completed: false,
            priority: None,
            tags: Vec::new(),
        }
    }

    /// Builds the uncategorized note stored when categorization fails.
    pub fn fallback(content: impl Into<String>, timestamp: i64) -> Self {
        let content = content.into();
        let title = fallback_title(&content);
        Self::new(ItemType::Note, content, title, FALLBACK_CATEGORY, timestamp)
    }

    pub fn validate(&self) -> Result<(), ItemValidationError> {
        if self.id.trim().is_empty() {
            return Err(ItemValidationError::EmptyId);
        }
        Ok(())
    }

    /// Returns whether this item is an incomplete task.
    pub fn is_pending_task(&self) -> bool {
        self.kind == ItemType::Task && !self.completed
    }

    /// Returns whether this item counts as a win (explicit win or done task).
    pub fn is_win(&self) -> bool {
        self.kind == ItemType::Win || (self.kind == ItemType::Task && self.completed)
    }
}

/// Partial update merged into an existing item.
///
/// `None` leaves the field untouched. `priority: Some(None)` clears it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ItemPatch {
    pub kind: Option<ItemType>,
    pub content: Option<String>,
    pub title: Option<String>,
    pub category: Option<String>,
    pub completed: Option<bool>,
    pub priority: Option<Option<Priority>>,
    pub tags: Option<Vec<String>>,
}

impl ItemPatch {
    pub fn completed(value: bool) -> Self {
        Self {
            completed: Some(value),
            ..Self::default()
        }
    }

    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    /// Merges patch fields into `item`. `id` and `timestamp` never change.
    pub fn apply_to(&self, item: &mut Item) {
        if let Some(kind) = self.kind {
            item.kind = kind;
        }
        if let Some(content) = &self.content {
            item.content = content.clone();
        }
        if let Some(title) = &self.title {
            item.title = title.clone();
        }
        if let Some(category) = &self.category {
            item.category = category.clone();
        }
        if let Some(completed) = self.completed {
            item.completed = completed;
        }
        if let Some(priority) = self.priority {
            item.priority = priority;
        }
        if let Some(tags) = &self.tags {
            item.tags = tags.clone();
        }
    }
}

/// Derives the fallback title: first 30 chars, plus `...` when truncated.
pub fn fallback_title(text: &str) -> String {
    let mut title = text.chars().take(FALLBACK_TITLE_CHARS).collect::<String>();
    if text.chars().count() > FALLBACK_TITLE_CHARS {
        title.push_str("...");
    }
    title
}

/// Current wall-clock time in epoch milliseconds.
pub fn now_epoch_ms() -> i64 {
    chrono::Utc::now().timestamp_millis()
}

#[cfg(test)]
mod tests {
    use super::{fallback_title, Item, ItemPatch, ItemType, Priority};

    #[test]
    fn fallback_title_keeps_short_text() {
        assert_eq!(fallback_title("buy milk"), "buy milk");
    }

    #[test]
    fn fallback_title_truncates_on_char_boundary() {
        let text = "é".repeat(31);
        let title = fallback_title(&text);
        assert_eq!(title.chars().count(), 33);
        assert!(title.ends_with("..."));
    }

    #[test]
    fn patch_leaves_identity_untouched() {
        let mut item = Item::new(ItemType::Idea, "x", "x", "Work", 10);
        let id = item.id.clone();
        ItemPatch {
            kind: Some(ItemType::Task),
            priority: Some(Some(Priority::High)),
            ..ItemPatch::default()
        }
        .apply_to(&mut item);
        assert_eq!(item.id, id);
        assert_eq!(item.timestamp, 10);
        assert_eq!(item.kind, ItemType::Task);
        assert_eq!(item.priority, Some(Priority::High));
    }

    #[test]
    fn json_shape_survives_decode() {
        let mut item = Item::new(ItemType::Task, "call mom\n", "Call mom", "Family", 42);
        item.priority = Some(Priority::High);
        item.tags = vec!["family".to_string(), "phone".to_string()];

        let json = serde_json::to_value(&item).unwrap();
        assert_eq!(json["type"], "task");
        assert_eq!(json["priority"], "high");
        assert_eq!(serde_json::from_value::<Item>(json).unwrap(), item);

        let bare = Item::new(ItemType::Note, "x", "x", "Personal", 1);
        let json = serde_json::to_value(&bare).unwrap();
        assert!(json.get("priority").is_none());
    }

    #[test]
    fn priority_rank_orders_unset_lowest() {
        assert!(Priority::rank(Some(Priority::High)) > Priority::rank(Some(Priority::Medium)));
        assert!(Priority::rank(Some(Priority::Low)) > Priority::rank(None));
    }
}
