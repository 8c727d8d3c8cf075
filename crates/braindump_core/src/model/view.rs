//! Navigation targets shared by the front-ends.

use crate::model::item::ItemType;
use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};

/// Top-level views reachable from the bottom navigation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum View {
    /// Home view.
    #[default]
    Tasks,
    Library,
    Capture,
    Wins,
    Profile,
}

impl View {
    /// Destination shown after publishing an item of `kind`.
    pub fn after_capture(kind: ItemType) -> Self {
        match kind {
            ItemType::Win => Self::Wins,
            ItemType::Task => Self::Tasks,
            ItemType::Idea | ItemType::Note => Self::Library,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Tasks => "tasks",
            Self::Library => "library",
            Self::Capture => "capture",
            Self::Wins => "wins",
            Self::Profile => "profile",
        }
    }
}

impl Display for View {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
