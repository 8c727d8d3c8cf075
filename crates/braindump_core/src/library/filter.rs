//! Library filter/sort engine.
//!
//! # Responsibility
//! - Derive the filtered, ordered Library view from an item slice.
//!
//! # Invariants
//! - Pure and deterministic: no store access, no clock reads.
//! - Predicates combine with AND; sorting is stable.
//! - Date bounds are inclusive: start-of-day for `start`, end-of-day for `end`.

use crate::model::item::{Item, ItemType, Priority};
use chrono::{DateTime, Duration, Local, LocalResult, NaiveDate, NaiveDateTime, TimeZone};
use std::cmp::Ordering;
use std::error::Error;
use std::fmt::{Display, Formatter};

const DATE_FORMAT: &str = "%Y-%m-%d";
/// Longest DST transition searched when resolving a local day bound.
const MAX_GAP_MINUTES: i64 = 24 * 60;

/// A textual filter value that names no known option.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvalidQuery {
    pub field: &'static str,
    pub value: String,
}

impl Display for InvalidQuery {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "invalid {} `{}`", self.field, self.value)
    }
}

impl Error for InvalidQuery {}

/// Raw filter values as typed by a user; blank means unset.
#[derive(Debug, Clone, Copy, Default)]
pub struct QueryInput<'a> {
    pub kind: Option<&'a str>,
    pub status: Option<&'a str>,
    pub search: Option<&'a str>,
    /// `YYYY-MM-DD`.
    pub start: Option<&'a str>,
    /// `YYYY-MM-DD`.
    pub end: Option<&'a str>,
    pub sort: Option<&'a str>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum StatusFilter {
    #[default]
    All,
    Pending,
    Completed,
}

impl StatusFilter {
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "all" => Some(Self::All),
            "pending" => Some(Self::Pending),
            "completed" => Some(Self::Completed),
            _ => None,
        }
    }

    fn matches(self, item: &Item) -> bool {
        match self {
            Self::All => true,
            Self::Pending => !item.completed,
            Self::Completed => item.completed,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SortOption {
    #[default]
    DateDesc,
    DateAsc,
    Alphabetical,
    Priority,
}

impl SortOption {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::DateDesc => "date-desc",
            Self::DateAsc => "date-asc",
            Self::Alphabetical => "alphabetical",
            Self::Priority => "priority",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "date-desc" => Some(Self::DateDesc),
            "date-asc" => Some(Self::DateAsc),
            "alphabetical" => Some(Self::Alphabetical),
            "priority" => Some(Self::Priority),
            _ => None,
        }
    }

    fn compare(self, a: &Item, b: &Item) -> Ordering {
        match self {
            Self::DateDesc => b.timestamp.cmp(&a.timestamp),
            Self::DateAsc => a.timestamp.cmp(&b.timestamp),
            Self::Alphabetical => compare_titles(&a.title, &b.title),
            Self::Priority => Priority::rank(b.priority)
                .cmp(&Priority::rank(a.priority))
                .then_with(|| b.timestamp.cmp(&a.timestamp)),
        }
    }
}

impl Display for SortOption {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Inclusive calendar-day range; either side may be open.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DateRange {
    pub start: Option<NaiveDate>,
    pub end: Option<NaiveDate>,
}

impl DateRange {
    /// Millisecond bounds in `tz`: `[start 00:00:00.000, end 23:59:59.999]`.
    pub fn bounds_in<Tz: TimeZone>(&self, tz: &Tz) -> (Option<i64>, Option<i64>) {
        let start = self
            .start
            .and_then(|date| date.and_hms_milli_opt(0, 0, 0, 0))
            .map(|local| start_of_day_ms(tz, local));
        let end = self
            .end
            .and_then(|date| date.and_hms_milli_opt(23, 59, 59, 999))
            .map(|local| end_of_day_ms(tz, local));
        (start, end)
    }
}

/// Full Library query state. `Default` is the "clear all filters" state.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LibraryQuery {
    /// `None` matches every type.
    pub kind: Option<ItemType>,
    pub status: StatusFilter,
    pub search: String,
    pub date_range: DateRange,
    pub sort: SortOption,
}

impl LibraryQuery {
    pub fn is_filtered(&self) -> bool {
        self.kind.is_some()
            || self.status != StatusFilter::All
            || !self.search.is_empty()
            || self.date_range != DateRange::default()
    }

    /// Resets every filter and the sort order to defaults.
    pub fn clear(&mut self) {
        *self = Self::default();
    }

    /// Parses user-facing filter values. `all` is accepted for the type.
    pub fn parse(input: QueryInput<'_>) -> Result<Self, InvalidQuery> {
        let kind = match non_blank(input.kind) {
            None => None,
            Some(value) if value.eq_ignore_ascii_case("all") => None,
            Some(value) => Some(ItemType::parse(value).ok_or_else(|| invalid("type", value))?),
        };
        let status = non_blank(input.status)
            .map(|value| StatusFilter::parse(value).ok_or_else(|| invalid("status", value)))
            .transpose()?
            .unwrap_or_default();
        let sort = non_blank(input.sort)
            .map(|value| SortOption::parse(value).ok_or_else(|| invalid("sort", value)))
            .transpose()?
            .unwrap_or_default();

        Ok(Self {
            kind,
            status,
            search: non_blank(input.search).unwrap_or_default().to_string(),
            date_range: DateRange {
                start: parse_date("start date", input.start)?,
                end: parse_date("end date", input.end)?,
            },
            sort,
        })
    }
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|value| !value.is_empty())
}

fn invalid(field: &'static str, value: &str) -> InvalidQuery {
    InvalidQuery {
        field,
        value: value.to_string(),
    }
}

fn parse_date(field: &'static str, value: Option<&str>) -> Result<Option<NaiveDate>, InvalidQuery> {
    non_blank(value)
        .map(|raw| NaiveDate::parse_from_str(raw, DATE_FORMAT).map_err(|_| invalid(field, raw)))
        .transpose()
}

/// Applies `query` using the machine's local time zone for date bounds.
pub fn apply_library_query(items: &[Item], query: &LibraryQuery) -> Vec<Item> {
    apply_library_query_in(items, query, &Local)
}

/// Applies `query` with date bounds evaluated in `tz`.
pub fn apply_library_query_in<Tz: TimeZone>(
    items: &[Item],
    query: &LibraryQuery,
    tz: &Tz,
) -> Vec<Item> {
    let needle = query.search.to_lowercase();
    let (start_ms, end_ms) = query.date_range.bounds_in(tz);

    let mut result = items
        .iter()
        .filter(|item| query.kind.map_or(true, |kind| item.kind == kind))
        .filter(|item| query.status.matches(item))
        .filter(|item| matches_search(item, &needle))
        .filter(|item| start_ms.map_or(true, |start| item.timestamp >= start))
        .filter(|item| end_ms.map_or(true, |end| item.timestamp <= end))
        .cloned()
        .collect::<Vec<_>>();

    result.sort_by(|a, b| query.sort.compare(a, b));
    result
}

fn matches_search(item: &Item, needle: &str) -> bool {
    if needle.is_empty() {
        return true;
    }
    item.title.to_lowercase().contains(needle)
        || item.content.to_lowercase().contains(needle)
        || item
            .tags
            .iter()
            .any(|tag| tag.to_lowercase().contains(needle))
}

/// Locale-style title order: case-insensitive first, raw text as tie-break.
fn compare_titles(a: &str, b: &str) -> Ordering {
    a.to_lowercase()
        .cmp(&b.to_lowercase())
        .then_with(|| b.cmp(a))
}

/// First valid instant at or after `local`; a DST gap resolves to its end.
fn start_of_day_ms<Tz: TimeZone>(tz: &Tz, local: NaiveDateTime) -> i64 {
    resolve_local(tz, local, Duration::minutes(1), |found| found.earliest())
}

/// Last valid instant at or before `local`.
fn end_of_day_ms<Tz: TimeZone>(tz: &Tz, local: NaiveDateTime) -> i64 {
    resolve_local(tz, local, Duration::minutes(-1), |found| found.latest())
}

fn resolve_local<Tz: TimeZone>(
    tz: &Tz,
    local: NaiveDateTime,
    step: Duration,
    pick: impl Fn(LocalResult<DateTime<Tz>>) -> Option<DateTime<Tz>>,
) -> i64 {
    let mut candidate = local;
    for _ in 0..=MAX_GAP_MINUTES {
        if let Some(dt) = pick(tz.from_local_datetime(&candidate)) {
            return dt.timestamp_millis();
        }
        candidate += step;
    }
    local.and_utc().timestamp_millis()
}

#[cfg(test)]
mod tests {
    use super::{compare_titles, LibraryQuery, QueryInput, SortOption, StatusFilter};
    use crate::model::item::ItemType;
    use chrono::NaiveDate;
    use std::cmp::Ordering;

    #[test]
    fn parse_accepts_user_values_and_blank_defaults() {
        let query = LibraryQuery::parse(QueryInput {
            kind: Some("Task"),
            status: Some(" pending "),
            search: Some("  rent "),
            start: Some("2024-03-10"),
            end: Some(""),
            sort: Some("priority"),
        })
        .unwrap();
        assert_eq!(query.kind, Some(ItemType::Task));
        assert_eq!(query.status, StatusFilter::Pending);
        assert_eq!(query.search, "rent");
        assert_eq!(query.date_range.start, NaiveDate::from_ymd_opt(2024, 3, 10));
        assert_eq!(query.date_range.end, None);
        assert_eq!(query.sort, SortOption::Priority);

        let all = LibraryQuery::parse(QueryInput {
            kind: Some("all"),
            ..QueryInput::default()
        })
        .unwrap();
        assert_eq!(all, LibraryQuery::default());
    }

    #[test]
    fn parse_names_the_invalid_field() {
        let err = LibraryQuery::parse(QueryInput {
            end: Some("03/12/2024"),
            ..QueryInput::default()
        })
        .unwrap_err();
        assert_eq!(err.to_string(), "invalid end date `03/12/2024`");

        let err = LibraryQuery::parse(QueryInput {
            sort: Some("random"),
            ..QueryInput::default()
        })
        .unwrap_err();
        assert_eq!(err.field, "sort");
    }

    #[test]
    fn titles_compare_case_insensitively_with_lowercase_first() {
        assert_eq!(compare_titles("apple", "Banana"), Ordering::Less);
        assert_eq!(compare_titles("apple", "Apple"), Ordering::Less);
        assert_eq!(compare_titles("Zed", "zed"), Ordering::Greater);
    }
}
