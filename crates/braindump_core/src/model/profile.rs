//! User profile and preference model.
//!
//! # Responsibility
//! - Define the profile blob persisted alongside the item collection.
//! - Provide partial-update patches for profile and preference edits.
//!
//! # Invariants
//! - The profile is always persisted as a whole object.
//! - Missing persisted profile resolves to [`UserProfile::default`].

use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};

const DEFAULT_PROFILE_NAME: &str = "Sarah J.";
const DEFAULT_STREAK: u32 = 5;
const DEFAULT_TOTAL_WINS: u32 = 12;

/// Color palette selection. Rendering is owned by the front-end.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Palette {
    #[default]
    Default,
    Earthy,
    Ocean,
    Midnight,
}

impl Palette {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Default => "default",
            Self::Earthy => "earthy",
            Self::Ocean => "ocean",
            Self::Midnight => "midnight",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "default" => Some(Self::Default),
            "earthy" => Some(Self::Earthy),
            "ocean" => Some(Self::Ocean),
            "midnight" => Some(Self::Midnight),
            _ => None,
        }
    }
}

impl Display for Palette {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// How often the Tasks view should surface nudges.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NudgeFrequency {
    Low,
    #[default]
    Medium,
    High,
}

impl NudgeFrequency {
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
}

impl Display for NudgeFrequency {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Preferences {
    pub palette: Palette,
    pub notifications_enabled: bool,
    pub nudge_frequency: NudgeFrequency,
    /// Free-text personal context passed to categorization and nudges.
    pub ai_context: String,
}

impl Default for Preferences {
    fn default() -> Self {
        Self {
            palette: Palette::Default,
            notifications_enabled: true,
            nudge_frequency: NudgeFrequency::Medium,
            ai_context: String::new(),
        }
    }
}

impl Preferences {
    /// Returns the personal context when it carries any text.
    pub fn context(&self) -> Option<&str> {
        let trimmed = self.ai_context.trim();
        (!trimmed.is_empty()).then_some(trimmed)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    pub name: String,
    /// Opaque avatar reference (URL or asset key).
    pub avatar: String,
    pub streak: u32,
    pub total_wins: u32,
    pub preferences: Preferences,
}

impl Default for UserProfile {
    fn default() -> Self {
        Self {
            name: DEFAULT_PROFILE_NAME.to_string(),
            avatar: String::new(),
            streak: DEFAULT_STREAK,
            total_wins: DEFAULT_TOTAL_WINS,
            preferences: Preferences::default(),
        }
    }
}

/// Partial profile update. `None` fields are left untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProfilePatch {
    pub name: Option<String>,
    pub avatar: Option<String>,
    pub streak: Option<u32>,
    pub total_wins: Option<u32>,
    pub preferences: Option<PreferencesPatch>,
}

impl ProfilePatch {
    pub fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.avatar.is_none()
            && self.streak.is_none()
            && self.total_wins.is_none()
            && self
                .preferences
                .as_ref()
                .map_or(true, PreferencesPatch::is_empty)
    }

    pub fn apply_to(&self, profile: &mut UserProfile) {
        if let Some(name) = &self.name {
            profile.name = name.clone();
        }
        if let Some(avatar) = &self.avatar {
            profile.avatar = avatar.clone();
        }
        if let Some(streak) = self.streak {
            profile.streak = streak;
        }
        if let Some(total_wins) = self.total_wins {
            profile.total_wins = total_wins;
        }
        if let Some(preferences) = &self.preferences {
            preferences.apply_to(&mut profile.preferences);
        }
    }
}

/// Partial preference update. `None` fields are left untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PreferencesPatch {
    pub palette: Option<Palette>,
    pub notifications_enabled: Option<bool>,
    pub nudge_frequency: Option<NudgeFrequency>,
    pub ai_context: Option<String>,
}

impl PreferencesPatch {
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    pub fn apply_to(&self, preferences: &mut Preferences) {
        if let Some(palette) = self.palette {
            preferences.palette = palette;
        }
        if let Some(enabled) = self.notifications_enabled {
            preferences.notifications_enabled = enabled;
        }
        if let Some(frequency) = self.nudge_frequency {
            preferences.nudge_frequency = frequency;
        }
        if let Some(context) = &self.ai_context {
            preferences.ai_context = context.clone();
        }
    }
}
