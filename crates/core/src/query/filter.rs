//! Dynamic filter criteria and predicate composition.
//!
//! A [`FilterCriteria`] is a set of optional filter fields. Only the fields
//! that are present contribute a predicate; absent fields contribute no
//! constraint at all (never "field == null"). The present predicates are
//! folded into one conjunction, so an empty criteria set matches every
//! entry.

use std::cmp::Ordering;
use std::collections::HashSet;

use chrono::{DateTime, Duration, NaiveDate, NaiveTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use finledger_shared::types::PageRequest;

use crate::ledger::entry::{Category, EntrySource, EntryStatus, LedgerEntry};

/// A single composable predicate over a ledger entry.
pub type EntryPredicate = Box<dyn Fn(&LedgerEntry) -> bool + Send + Sync>;

/// Sort key for entry listings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SortBy {
    /// Store-assigned sequence number.
    Sequence,
    /// Entry name.
    Name,
    /// Settlement date.
    SettleDate,
    /// Canonical (reporting-currency) amount.
    Value,
}

impl SortBy {
    fn compare(self, a: &LedgerEntry, b: &LedgerEntry) -> Ordering {
        match self {
            Self::Sequence => a.sequence_number.cmp(&b.sequence_number),
            Self::Name => a.name.cmp(&b.name),
            Self::SettleDate => a.settle_date.cmp(&b.settle_date),
            Self::Value => a.canonical_amount.cmp(&b.canonical_amount),
        }
    }
}

/// Sort direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SortDirection {
    /// Ascending.
    Asc,
    /// Descending.
    Desc,
}

/// Optional filter fields plus sorting and paging.
///
/// `Default` yields an all-absent criteria set that matches every entry.
/// When deserialized from a request, `status` defaults to `ACCEPTED`, which
/// is where the original binding layer applies that default.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FilterCriteria {
    /// Case-insensitive name substring.
    pub name: Option<String>,
    /// Exact category.
    pub category: Option<Category>,
    /// Exact status.
    #[serde(default = "default_request_status")]
    pub status: Option<EntryStatus>,
    /// Inclusive lower bound on settle date.
    pub settle_date_from: Option<NaiveDate>,
    /// Inclusive upper bound on settle date.
    pub settle_date_to: Option<NaiveDate>,
    /// Inclusive lower bound on canonical amount.
    pub value_from: Option<Decimal>,
    /// Inclusive upper bound on canonical amount.
    pub value_to: Option<Decimal>,
    /// Tag membership: an entry matches when it carries any requested tag.
    /// An empty set matches everything.
    pub tags: Option<HashSet<String>>,
    /// Entries created on or after this day.
    pub created_at_from: Option<NaiveDate>,
    /// Entries created on or before this day.
    pub created_at_to: Option<NaiveDate>,
    /// Entries created strictly before the start of this day.
    pub created_at_before: Option<NaiveDate>,
    /// Exact source.
    pub source: Option<EntrySource>,
    /// Equality on the nested reference business id.
    pub reference_business_id: Option<String>,
    /// Sort key.
    pub sort_by: SortBy,
    /// Sort direction.
    pub sort_direction: SortDirection,
    /// Page selection.
    pub page: PageRequest,
}

fn default_request_status() -> Option<EntryStatus> {
    Some(EntryStatus::Accepted)
}

impl Default for FilterCriteria {
    fn default() -> Self {
        Self {
            name: None,
            category: None,
            status: None,
            settle_date_from: None,
            settle_date_to: None,
            value_from: None,
            value_to: None,
            tags: None,
            created_at_from: None,
            created_at_to: None,
            created_at_before: None,
            source: None,
            reference_business_id: None,
            sort_by: SortBy::SettleDate,
            sort_direction: SortDirection::Desc,
            page: PageRequest::default(),
        }
    }
}

impl FilterCriteria {
    /// Lower creation bound widened to the start of the day.
    #[must_use]
    pub fn created_at_from_bound(&self) -> Option<DateTime<Utc>> {
        self.created_at_from.map(start_of_day)
    }

    /// Upper creation bound: strictly before the start of the next day,
    /// i.e. anything up to the end of the given day matches.
    #[must_use]
    pub fn created_at_to_bound(&self) -> Option<DateTime<Utc>> {
        self.created_at_to
            .map(|date| start_of_day(date) + Duration::days(1))
    }

    /// Strict upper bound at the start of the given day.
    #[must_use]
    pub fn created_at_before_bound(&self) -> Option<DateTime<Utc>> {
        self.created_at_before.map(start_of_day)
    }

    /// Full ordering for entry listings: the selected key and direction,
    /// with the sequence number breaking ties deterministically.
    #[must_use]
    pub fn ordering(&self, a: &LedgerEntry, b: &LedgerEntry) -> Ordering {
        let by_key = self.sort_by.compare(a, b);
        let directed = match self.sort_direction {
            SortDirection::Asc => by_key,
            SortDirection::Desc => by_key.reverse(),
        };
        directed.then_with(|| a.sequence_number.cmp(&b.sequence_number))
    }
}

fn start_of_day(date: NaiveDate) -> DateTime<Utc> {
    date.and_time(NaiveTime::MIN).and_utc()
}

/// The conjunction of the predicates present in a [`FilterCriteria`].
pub struct FilterSpecification {
    predicates: Vec<EntryPredicate>,
}

impl FilterSpecification {
    /// Composes the predicates for every present filter field.
    #[must_use]
    pub fn from_criteria(criteria: &FilterCriteria) -> Self {
        let mut predicates = Vec::new();
        let mut push = |predicate: Option<EntryPredicate>| {
            if let Some(predicate) = predicate {
                predicates.push(predicate);
            }
        };

        push(equals(criteria.status, |e| Some(e.status)));
        push(equals(criteria.category, |e| Some(e.category)));
        push(like_ignore_case(criteria.name.as_deref(), |e| &e.name));
        push(greater_than_or_equal(criteria.settle_date_from, |e| {
            e.settle_date
        }));
        push(less_than_or_equal(criteria.settle_date_to, |e| {
            e.settle_date
        }));
        push(greater_than_or_equal(criteria.value_from, |e| {
            e.canonical_amount
        }));
        push(less_than_or_equal(criteria.value_to, |e| e.canonical_amount));
        push(any_of_tags(criteria.tags.as_ref()));
        push(greater_than_or_equal(criteria.created_at_from_bound(), |e| {
            e.created_at
        }));
        push(less_than(criteria.created_at_to_bound(), |e| e.created_at));
        push(less_than(criteria.created_at_before_bound(), |e| {
            e.created_at
        }));
        push(equals(criteria.source, |e| Some(e.source)));
        push(equals(criteria.reference_business_id.clone(), |e| {
            e.reference
                .as_ref()
                .and_then(|r| r.business_id.clone())
        }));

        Self { predicates }
    }

    /// Returns true when the entry satisfies every present predicate.
    /// An empty specification matches everything.
    #[must_use]
    pub fn matches(&self, entry: &LedgerEntry) -> bool {
        self.predicates.iter().all(|predicate| predicate(entry))
    }

    /// Number of active predicates.
    #[must_use]
    pub fn len(&self) -> usize {
        self.predicates.len()
    }

    /// Returns true when no filter field was present.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.predicates.is_empty()
    }
}

/// Equality against an extracted value; absent filter value means no
/// constraint.
fn equals<T, F>(value: Option<T>, accessor: F) -> Option<EntryPredicate>
where
    T: PartialEq + Clone + Send + Sync + 'static,
    F: Fn(&LedgerEntry) -> Option<T> + Send + Sync + 'static,
{
    value.map(|value| -> EntryPredicate { Box::new(move |e| accessor(e) == Some(value.clone())) })
}

/// Case-insensitive substring match.
fn like_ignore_case<F>(value: Option<&str>, accessor: F) -> Option<EntryPredicate>
where
    F: for<'a> Fn(&'a LedgerEntry) -> &'a str + Send + Sync + 'static,
{
    value.map(|needle| -> EntryPredicate {
        let needle = needle.to_lowercase();
        Box::new(move |e| accessor(e).to_lowercase().contains(&needle))
    })
}

/// Inclusive lower bound.
fn greater_than_or_equal<T, F>(value: Option<T>, accessor: F) -> Option<EntryPredicate>
where
    T: PartialOrd + Send + Sync + 'static,
    F: Fn(&LedgerEntry) -> T + Send + Sync + 'static,
{
    value.map(|bound| -> EntryPredicate { Box::new(move |e| accessor(e) >= bound) })
}

/// Inclusive upper bound.
fn less_than_or_equal<T, F>(value: Option<T>, accessor: F) -> Option<EntryPredicate>
where
    T: PartialOrd + Send + Sync + 'static,
    F: Fn(&LedgerEntry) -> T + Send + Sync + 'static,
{
    value.map(|bound| -> EntryPredicate { Box::new(move |e| accessor(e) <= bound) })
}

/// Strict upper bound.
fn less_than<T, F>(value: Option<T>, accessor: F) -> Option<EntryPredicate>
where
    T: PartialOrd + Send + Sync + 'static,
    F: Fn(&LedgerEntry) -> T + Send + Sync + 'static,
{
    value.map(|bound| -> EntryPredicate { Box::new(move |e| accessor(e) < bound) })
}

/// Membership test: the entry matches when any requested tag is present.
/// An empty or absent tag set contributes no constraint.
fn any_of_tags(tags: Option<&HashSet<String>>) -> Option<EntryPredicate> {
    match tags {
        Some(requested) if !requested.is_empty() => {
            let requested = requested.clone();
            Some(Box::new(move |e| {
                requested.iter().any(|tag| e.tags.contains(tag))
            }))
        }
        _ => None,
    }
}
