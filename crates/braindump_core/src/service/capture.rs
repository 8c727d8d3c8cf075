//! Capture workflow: input → processing → review → success.
//!
//! # Responsibility
//! - Freeze submitted text and drive categorization for it.
//! - Commit exactly one item per completed capture attempt.
//! - Fall back to an uncategorized note when categorization fails.
//!
//! # Invariants
//! - Only `discard` before publish leaves the store untouched.
//! - A categorization result is applied only while the workflow is still
//!   processing the ticket that requested it.
//! - `Success` always carries the committed item.

use crate::ai::categorizer::{Categorization, Categorizer};
use crate::ai::AiResult;
use crate::model::item::{now_epoch_ms, Item, ItemId};
use crate::model::view::View;
use crate::store::item_store::ItemStore;
use crate::store::StoreError;
use log::{info, warn};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::time::Duration;

/// Delay before the success state auto-advances to its destination view.
pub const SUCCESS_ADVANCE_DELAY: Duration = Duration::from_millis(1200);

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CaptureState {
    /// Editable text.
    Input { text: String },
    /// Categorization in flight for the frozen text.
    Processing { text: String, generation: u64 },
    /// Awaiting explicit publish or discard.
    Review {
        text: String,
        categorization: Categorization,
    },
    /// Terminal; auto-advances to `destination` after [`SUCCESS_ADVANCE_DELAY`].
    Success { item: Item, destination: View },
}

impl CaptureState {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Input { .. } => "input",
            Self::Processing { .. } => "processing",
            Self::Review { .. } => "review",
            Self::Success { .. } => "success",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CaptureError {
    /// Submitted text is blank.
    EmptyInput,
    /// Operation is not valid in the current state.
    InvalidState {
        operation: &'static str,
        state: &'static str,
    },
    Store(StoreError),
}

impl Display for CaptureError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyInput => write!(f, "capture text is empty"),
            Self::InvalidState { operation, state } => {
                write!(f, "cannot {operation} while capture is in `{state}` state")
            }
            Self::Store(err) => write!(f, "{err}"),
        }
    }
}

impl Error for CaptureError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Store(err) => Some(err),
            _ => None,
        }
    }
}

impl From<StoreError> for CaptureError {
    fn from(value: StoreError) -> Self {
        Self::Store(value)
    }
}

/// Handle for one in-flight categorization request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnalysisTicket {
    text: String,
    generation: u64,
}

impl AnalysisTicket {
    pub fn text(&self) -> &str {
        &self.text
    }
}

/// Result of applying a categorization outcome.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AnalysisOutcome {
    /// Workflow moved to review and awaits publish.
    Review,
    /// Categorization failed; an uncategorized note was stored.
    FallbackSaved { item_id: ItemId, destination: View },
    /// The ticket no longer matches the workflow; nothing was applied.
    Stale,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CaptureWorkflow {
    state: CaptureState,
    generation: u64,
}

impl Default for CaptureWorkflow {
    fn default() -> Self {
        Self::new()
    }
}

impl CaptureWorkflow {
    pub fn new() -> Self {
        Self::with_text(String::new())
    }

    pub fn with_text(text: impl Into<String>) -> Self {
        Self {
            state: CaptureState::Input { text: text.into() },
            generation: 0,
        }
    }

    pub fn state(&self) -> &CaptureState {
        &self.state
    }

    /// Text currently held by the workflow (empty after success).
    pub fn text(&self) -> &str {
        match &self.state {
            CaptureState::Input { text }
            | CaptureState::Processing { text, .. }
            | CaptureState::Review { text, .. } => text,
            CaptureState::Success { .. } => "",
        }
    }

    /// Whether a categorization request is in flight.
    pub fn is_processing(&self) -> bool {
        matches!(self.state, CaptureState::Processing { .. })
    }

    /// Whether the analyze action should be enabled.
    pub fn can_analyze(&self) -> bool {
        matches!(&self.state, CaptureState::Input { text } if !text.trim().is_empty())
    }

    pub fn set_text(&mut self, value: impl Into<String>) -> Result<(), CaptureError> {
        match &mut self.state {
            CaptureState::Input { text } => {
                *text = value.into();
                Ok(())
            }
            other => Err(CaptureError::InvalidState {
                operation: "edit text",
                state: other.name(),
            }),
        }
    }

    /// `input → processing`: freezes the text and issues a ticket.
    pub fn begin_analysis(&mut self) -> Result<AnalysisTicket, CaptureError> {
        let text = match &self.state {
            CaptureState::Input { text } if text.trim().is_empty() => {
                return Err(CaptureError::EmptyInput)
            }
            CaptureState::Input { text } => text.clone(),
            other => {
                return Err(CaptureError::InvalidState {
                    operation: "analyze",
                    state: other.name(),
                })
            }
        };

        self.generation += 1;
        self.state = CaptureState::Processing {
            text: text.clone(),
            generation: self.generation,
        };
        info!(
            "event=capture_analyze module=capture status=start generation={} text_len={}",
            self.generation,
            text.chars().count()
        );
        Ok(AnalysisTicket {
            text,
            generation: self.generation,
        })
    }

    /// Applies a categorization outcome for `ticket`.
    ///
    /// Success moves to review. Failure stores the fallback note and resets
    /// the input. Stale tickets are dropped without side effects.
    pub fn complete_analysis(
        &mut self,
        ticket: AnalysisTicket,
        result: AiResult<Categorization>,
        store: &mut ItemStore,
    ) -> Result<AnalysisOutcome, CaptureError> {
        let current = match &self.state {
            CaptureState::Processing { generation, .. } => Some(*generation),
            _ => None,
        };
        if current != Some(ticket.generation) {
            warn!(
                "event=capture_analyze module=capture status=stale generation={} state={}",
                ticket.generation,
                self.state.name()
            );
            return Ok(AnalysisOutcome::Stale);
        }

        match result {
            Ok(categorization) => {
                info!(
                    "event=capture_analyze module=capture status=ok generation={} type={}",
                    ticket.generation, categorization.kind
                );
                self.state = CaptureState::Review {
                    text: ticket.text,
                    categorization,
                };
                Ok(AnalysisOutcome::Review)
            }
            Err(err) => {
                warn!(
                    "event=capture_fallback module=capture status=start generation={} error_code={}",
                    ticket.generation,
                    err.code()
                );
                self.store_fallback(Item::fallback(ticket.text, now_epoch_ms()), store)
            }
        }
    }

    /// Commits `item` as the fallback note. On failure the text returns to input.
    fn store_fallback(
        &mut self,
        item: Item,
        store: &mut ItemStore,
    ) -> Result<AnalysisOutcome, CaptureError> {
        let text = item.content.clone();
        match store.add(item) {
            Ok(saved) => {
                let item_id = saved.id.clone();
                self.state = CaptureState::Input {
                    text: String::new(),
                };
                Ok(AnalysisOutcome::FallbackSaved {
                    item_id,
                    destination: View::Library,
                })
            }
            Err(err) => {
                warn!("event=capture_fallback module=capture status=error text_restored=true");
                self.state = CaptureState::Input { text };
                Err(err.into())
            }
        }
    }

    /// Runs `begin_analysis`, the categorizer call and `complete_analysis`.
    pub async fn analyze(
        &mut self,
        categorizer: &Categorizer,
        context: Option<&str>,
        store: &mut ItemStore,
    ) -> Result<AnalysisOutcome, CaptureError> {
        let ticket = self.begin_analysis()?;
        let result = categorizer.categorize(ticket.text(), context).await;
        self.complete_analysis(ticket, result, store)
    }

    /// `review → success`: commits the reviewed item.
    pub fn publish(&mut self, store: &mut ItemStore) -> Result<Item, CaptureError> {
        let (text, categorization) = match &self.state {
            CaptureState::Review {
                text,
                categorization,
            } => (text.clone(), categorization.clone()),
            other => {
                return Err(CaptureError::InvalidState {
                    operation: "publish",
                    state: other.name(),
                })
            }
        };

        let mut item = Item::new(
            categorization.kind,
            text,
            categorization.title,
            categorization.category,
            now_epoch_ms(),
        );
        item.priority = categorization.priority;
        item.tags = categorization.tags;

        let committed = store.add(item)?.clone();
        let destination = View::after_capture(committed.kind);
        info!(
            "event=capture_publish module=capture status=ok type={} destination={}",
            committed.kind, destination
        );
        self.state = CaptureState::Success {
            item: committed.clone(),
            destination,
        };
        Ok(committed)
    }

    /// `review → input`: drops the categorization and keeps the text.
    pub fn discard(&mut self) -> Result<(), CaptureError> {
        match std::mem::replace(
            &mut self.state,
            CaptureState::Input {
                text: String::new(),
            },
        ) {
            CaptureState::Review { text, .. } => {
                self.state = CaptureState::Input { text };
                info!("event=capture_discard module=capture status=ok");
                Ok(())
            }
            other => {
                let state = other.name();
                self.state = other;
                Err(CaptureError::InvalidState {
                    operation: "discard",
                    state,
                })
            }
        }
    }

    /// Destination view once the success state has advanced.
    pub fn destination(&self) -> Option<View> {
        match &self.state {
            CaptureState::Success { destination, .. } => Some(*destination),
            _ => None,
        }
    }

    /// Leaves the terminal success state for a fresh, empty input.
    pub fn reset(&mut self) {
        self.state = CaptureState::Input {
            text: String::new(),
        };
    }
}
