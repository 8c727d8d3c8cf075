//! Plain-text rendering of items and views.

use braindump_core::Item;
use chrono::{Local, TimeZone};

pub fn item_line(item: &Item) -> String {
    let check = if item.completed { "x" } else { " " };
    let priority = item
        .priority
        .map(|priority| format!(" !{priority}"))
        .unwrap_or_default();
    let tags = if item.tags.is_empty() {
        String::new()
    } else {
        format!(" #{}", item.tags.join(" #"))
    };
    format!(
        "[{check}] {:<5} {}  ({}, {}){priority}{tags}\n      id: {}",
        item.kind.as_str(),
        item.title,
        item.category,
        format_timestamp(item.timestamp),
        item.id
    )
}

pub fn print_items(items: &[Item]) {
    for item in items {
        println!("{}", item_line(item));
    }
}

fn format_timestamp(epoch_ms: i64) -> String {
    Local
        .timestamp_millis_opt(epoch_ms)
        .single()
        .map(|dt| dt.format("%Y-%m-%d %H:%M").to_string())
        .unwrap_or_else(|| epoch_ms.to_string())
}

#[cfg(test)]
mod tests {
    use super::item_line;
    use braindump_core::{Item, ItemType, Priority};

    #[test]
    fn item_line_shows_state_priority_and_tags() {
        let mut item = Item::new(ItemType::Task, "pay rent", "Pay rent", "Home", 0);
        item.priority = Some(Priority::High);
        item.tags = vec!["money".to_string(), "monthly".to_string()];
        item.completed = true;

        let line = item_line(&item);
        assert!(line.starts_with("[x] task  Pay rent  (Home, "));
        assert!(line.contains("!high #money #monthly"));
        assert!(line.contains(&item.id));
    }
}
