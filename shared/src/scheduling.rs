//! Calendar helpers for event scheduling

use std::collections::BTreeSet;

use chrono::{DateTime, NaiveDate, Utc};
use uuid::Uuid;

/// Normalize an event timestamp to its calendar day (UTC). Blocked-date
/// comparisons and SLA math operate on whole days only.
pub fn event_day(event_date: DateTime<Utc>) -> NaiveDate {
    event_date.date_naive()
}

/// Signed whole-day distance between an event and `today`. Negative means
/// the event date has passed, zero means the event is today.
pub fn sla_days(event_date: DateTime<Utc>, today: NaiveDate) -> i64 {
    (event_day(event_date) - today).num_days()
}

/// Calendar days reserved by themed-party orders.
///
/// Each input row is `(order id, party type id, event date)`. Only orders
/// with a party type and a date reserve their day; direct orders never
/// do. `exclude` drops one order's own reservation so an order being
/// moved does not conflict with itself. Days come out deduplicated and
/// sorted.
pub fn blocked_days<I>(orders: I, exclude: Option<Uuid>) -> BTreeSet<NaiveDate>
where
    I: IntoIterator<Item = (Uuid, Option<Uuid>, Option<DateTime<Utc>>)>,
{
    orders
        .into_iter()
        .filter(|(id, party_type_id, _)| party_type_id.is_some() && Some(*id) != exclude)
        .filter_map(|(_, _, event_date)| event_date.map(event_day))
        .collect()
}
