//! Filter and sort pipeline for list views.
//!
//! Filtering keeps the original relative order. Sorting uses a stable sort
//! and does not break ties with a secondary key.

use std::cmp::Ordering;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::types::{Amount, Date};

/// Sentinel meaning "no constraint" for an equality filter.
pub const ALL: &str = "all";

/// A single equality constraint.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum FilterValue {
    #[default]
    All,
    Only(String),
}

impl FilterValue {
    /// Missing, empty and `"all"` all mean no constraint.
    pub fn parse(raw: Option<&str>) -> Self {
        match raw.map(str::trim) {
            None | Some("") | Some(ALL) => FilterValue::All,
            Some(value) => FilterValue::Only(value.to_string()),
        }
    }

    pub fn matches(&self, value: Option<&str>) -> bool {
        match self {
            FilterValue::All => true,
            FilterValue::Only(wanted) => value == Some(wanted.as_str()),
        }
    }
}

/// Criteria supplied by a list view.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListFilter {
    pub search: Option<String>,
    pub status: FilterValue,
    pub service: FilterValue,
}

impl ListFilter {
    pub fn new(search: Option<&str>, status: Option<&str>, service: Option<&str>) -> Self {
        let search = search
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_lowercase);
        Self {
            search,
            status: FilterValue::parse(status),
            service: FilterValue::parse(service),
        }
    }

    pub fn matches<T: Filterable + ?Sized>(&self, item: &T) -> bool {
        if !self.status.matches(item.status_label()) {
            return false;
        }
        if !self.service.matches(item.service()) {
            return false;
        }
        match &self.search {
            None => true,
            Some(term) => item
                .search_fields()
                .into_iter()
                .flatten()
                .any(|field| field.to_lowercase().contains(term.as_str())),
        }
    }
}

/// Fields a list item exposes to [`ListFilter`].
pub trait Filterable {
    /// Text fields searched by the free-text term (number, subject, awardee).
    fn search_fields(&self) -> Vec<Option<&str>>;
    fn status_label(&self) -> Option<&str>;
    fn service(&self) -> Option<&str>;
}

/// Fields a list item exposes to [`sort_items`].
pub trait Sortable {
    fn start_date(&self) -> Option<Date>;
    fn amount(&self) -> Amount;
    fn status_label(&self) -> Option<&str>;
    fn deadline(&self) -> Option<Date>;
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortKey {
    /// Most recent start first.
    #[default]
    StartDate,
    /// Largest amount first.
    Amount,
    /// Lexicographic on the status label.
    Status,
    /// Nearest deadline first.
    Deadline,
}

impl SortKey {
    pub fn as_str(self) -> &'static str {
        match self {
            SortKey::StartDate => "start_date",
            SortKey::Amount => "amount",
            SortKey::Status => "status",
            SortKey::Deadline => "deadline",
        }
    }
}

impl FromStr for SortKey {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "" | "start_date" => Ok(SortKey::StartDate),
            "amount" => Ok(SortKey::Amount),
            "status" => Ok(SortKey::Status),
            "deadline" => Ok(SortKey::Deadline),
            other => Err(CoreError::Validation(format!(
                "Unknown sort key '{other}'. Allowed: start_date, amount, status, deadline"
            ))),
        }
    }
}

/// Missing dates go last whatever the direction.
fn cmp_dates(a: Option<Date>, b: Option<Date>, descending: bool) -> Ordering {
    match (a, b) {
        (Some(a), Some(b)) if descending => b.cmp(&a),
        (Some(a), Some(b)) => a.cmp(&b),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

pub fn compare<T: Sortable + ?Sized>(a: &T, b: &T, key: SortKey) -> Ordering {
    match key {
        SortKey::StartDate => cmp_dates(a.start_date(), b.start_date(), true),
        SortKey::Amount => b.amount().cmp(&a.amount()),
        SortKey::Status => a
            .status_label()
            .unwrap_or_default()
            .cmp(b.status_label().unwrap_or_default()),
        SortKey::Deadline => cmp_dates(a.deadline(), b.deadline(), false),
    }
}

/// Keep the items matching `filter`, in their original order.
pub fn apply_filter<T: Filterable>(items: Vec<T>, filter: &ListFilter) -> Vec<T> {
    items.into_iter().filter(|item| filter.matches(item)).collect()
}

pub fn sort_items<T: Sortable>(items: &mut [T], key: SortKey) {
    items.sort_by(|a, b| compare(a, b, key));
}

/// Filter then sort.
pub fn filter_and_sort<T: Filterable + Sortable>(
    items: Vec<T>,
    filter: &ListFilter,
    key: SortKey,
) -> Vec<T> {
    let mut kept = apply_filter(items, filter);
    sort_items(&mut kept, key);
    kept
}
