//! Read-only projections for the Tasks and Wins views.

use crate::model::item::{Item, ItemType};

/// Pending tasks shown on the Tasks view.
pub const TASKS_PREVIEW_LIMIT: usize = 3;
/// Recent wins shown on the Wins view.
pub const RECENT_WINS_LIMIT: usize = 5;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TasksView {
    /// First pending tasks in store order, capped at [`TASKS_PREVIEW_LIMIT`].
    pub pending: Vec<Item>,
    pub pending_total: usize,
    pub completed: Vec<Item>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WinsView {
    pub total: usize,
    /// Most recent wins in store order, capped at [`RECENT_WINS_LIMIT`].
    pub recent: Vec<Item>,
}

pub fn tasks_view(items: &[Item]) -> TasksView {
    let pending = items
        .iter()
        .filter(|item| item.is_pending_task())
        .collect::<Vec<_>>();
    let completed = items
        .iter()
        .filter(|item| item.kind == ItemType::Task && item.completed)
        .cloned()
        .collect();

    TasksView {
        pending_total: pending.len(),
        pending: pending
            .into_iter()
            .take(TASKS_PREVIEW_LIMIT)
            .cloned()
            .collect(),
        completed,
    }
}

/// Wins are explicit `win` items plus completed tasks.
pub fn wins_view(items: &[Item]) -> WinsView {
    let wins = items.iter().filter(|item| item.is_win()).collect::<Vec<_>>();
    WinsView {
        total: wins.len(),
        recent: wins.into_iter().take(RECENT_WINS_LIMIT).cloned().collect(),
    }
}
