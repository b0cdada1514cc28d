//! Budget pricing and allocation math
//!
//! Pure functions: grouping of selected items into serving-allowance
//! buckets, the even per-guest split, staffing, quote totals, concrete
//! order quantities and the cost-rollup fallbacks. All I/O lives in the
//! backend services that feed these functions.

use std::collections::HashMap;

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::types::ItemRef;

/// Guests served per waiter
pub const GUESTS_PER_WAITER: i32 = 25;
/// Fixed fee per waiter
pub const WAITER_RATE: i64 = 260;
/// Flat party fee applied when the party type carries no price
pub const DEFAULT_PARTY_PRICE: i64 = 800;
/// Party duration assumed when the party type carries no duration
pub const DEFAULT_PARTY_DURATION_HOURS: i64 = 4;
/// Per-guest serving allowance for groups (and the ungrouped bucket)
/// that define none
pub const DEFAULT_QUANTITY_PER_PEOPLE: i64 = 10;

/// Serving-allowance data of the group an item belongs to
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GroupAllowance {
    pub id: Uuid,
    pub quantity_per_people: Decimal,
}

/// A catalog item after resolution, ready for pricing and allocation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResolvedItem {
    pub variant_id: Uuid,
    /// The request reference this item was matched against
    pub reference: ItemRef,
    pub title: String,
    pub price: Decimal,
    pub cost_price: Option<Decimal>,
    pub group: Option<GroupAllowance>,
    /// Quantity the customer asked for
    pub quantity: i32,
    /// price * quantity for the requested line
    pub line_total: Decimal,
}

/// Pricing inputs of a party type (with defaults already applied when
/// loading the record; `None` at the call site means "no party type",
/// which still contributes the default flat fee)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PartyPricing {
    pub duration_hours: Decimal,
    pub price: Decimal,
}

/// Price breakdown of a quote
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriceBreakdown {
    pub total_item_price: Decimal,
    pub number_of_waiters: i32,
    pub waiter_price: Decimal,
    pub extra_hours: Decimal,
    pub extra_hour_price: Decimal,
    pub total_price: Decimal,
}

/// Number of distinct items sharing each group bucket. Items without a
/// group all land in the single `None` bucket.
pub fn group_sizes(items: &[ResolvedItem]) -> HashMap<Option<Uuid>, usize> {
    let mut sizes: HashMap<Option<Uuid>, usize> = HashMap::new();
    for item in items {
        *sizes.entry(item.group.as_ref().map(|g| g.id)).or_insert(0) += 1;
    }
    sizes
}

/// Serving units allotted to one item per guest: the group's allowance
/// divided evenly across the group's member items. The ungrouped bucket
/// shares the default allowance the same way, however many unrelated
/// items it holds.
pub fn per_guest_allowance(item: &ResolvedItem, sizes: &HashMap<Option<Uuid>, usize>) -> Decimal {
    let quantity_per_people = item
        .group
        .as_ref()
        .map(|g| g.quantity_per_people)
        .unwrap_or_else(|| Decimal::from(DEFAULT_QUANTITY_PER_PEOPLE));
    let members = sizes
        .get(&item.group.as_ref().map(|g| g.id))
        .copied()
        .unwrap_or(1)
        .max(1);
    quantity_per_people / Decimal::from(members as i64)
}

/// Waiters needed for a guest count: one per started block of 25
pub fn number_of_waiters(number_of_people: i32) -> i32 {
    let people = number_of_people.max(1);
    (people + GUESTS_PER_WAITER - 1) / GUESTS_PER_WAITER
}

/// Compute the full price breakdown of a quote.
///
/// `extra_hours` is always zero today; the parameter stays wired so a
/// manual override keeps working without touching the formula.
pub fn compute_price_breakdown(
    party: Option<&PartyPricing>,
    items: &[ResolvedItem],
    number_of_people: i32,
    extra_hours: Decimal,
) -> PriceBreakdown {
    let sizes = group_sizes(items);
    let people = Decimal::from(number_of_people.max(1) as i64);

    let mut total_item_price = Decimal::ZERO;
    for item in items {
        total_item_price += per_guest_allowance(item, &sizes) * item.price * people;
    }

    let waiters = number_of_waiters(number_of_people);
    let waiter_price = Decimal::from(waiters as i64 * WAITER_RATE);

    let mut duration = party
        .map(|p| p.duration_hours)
        .unwrap_or_else(|| Decimal::from(DEFAULT_PARTY_DURATION_HOURS));
    if duration <= Decimal::ZERO {
        duration = Decimal::from(DEFAULT_PARTY_DURATION_HOURS);
    }
    let extra_hour_price = if extra_hours.is_zero() {
        Decimal::ZERO
    } else {
        total_item_price / duration * extra_hours
    };

    let party_price = party
        .map(|p| p.price)
        .unwrap_or_else(|| Decimal::from(DEFAULT_PARTY_PRICE));

    let total_price = total_item_price + party_price + waiter_price + extra_hour_price;

    PriceBreakdown {
        total_item_price,
        number_of_waiters: waiters,
        waiter_price,
        extra_hours,
        extra_hour_price,
        total_price,
    }
}

/// Concrete order quantity for one selected item: the per-guest allowance
/// times the guest count, rounded half-away-from-zero, never below 1 (a
/// selected item always yields at least one unit).
pub fn computed_quantity(
    group: Option<&GroupAllowance>,
    items_in_group: usize,
    number_of_people: i32,
) -> i32 {
    let quantity_per_people = group
        .map(|g| g.quantity_per_people)
        .unwrap_or_else(|| Decimal::from(DEFAULT_QUANTITY_PER_PEOPLE));
    let members = Decimal::from(items_in_group.max(1) as i64);
    let raw = quantity_per_people / members * Decimal::from(number_of_people.max(1) as i64);
    let rounded = raw.round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero);
    rounded.to_i32().unwrap_or(0).max(1)
}

/// Estimated unit cost when no authoritative cost price exists: half the
/// unit price
pub fn fallback_unit_cost(unit_price: Decimal) -> Decimal {
    unit_price / Decimal::from(2)
}

/// Cost inputs of one order item, as stored plus the linked variant's
/// cost price
#[derive(Debug, Clone, Default)]
pub struct ItemCostInput {
    pub quantity: i32,
    pub unit_price: Decimal,
    pub unit_cost: Option<Decimal>,
    pub variant_cost_price: Option<Decimal>,
    pub total_item_price: Option<Decimal>,
}

/// Cost attributed to one item: stored unit cost first, then the
/// variant's cost price, then half of the line total (reconstructed from
/// unit price and quantity when the stored total is missing).
pub fn item_cost(item: &ItemCostInput) -> Decimal {
    let quantity = Decimal::from(item.quantity.max(0) as i64);
    if let Some(unit_cost) = item.unit_cost {
        return unit_cost * quantity;
    }
    if let Some(cost_price) = item.variant_cost_price {
        return cost_price * quantity;
    }
    let line_total = item
        .total_item_price
        .unwrap_or(item.unit_price * quantity);
    line_total / Decimal::from(2)
}

/// Total cost of an order, recomputed from item-level data and rounded to
/// two decimal places. An order with no items costs zero.
pub fn total_cost_price(items: &[ItemCostInput]) -> Decimal {
    items
        .iter()
        .map(item_cost)
        .sum::<Decimal>()
        .round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
}
