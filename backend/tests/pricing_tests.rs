//! Tests for the quote pricing engine
//! Verifies the grouping rule, the even per-guest allowance split,
//! staffing and the total composition

use proptest::prelude::*;
use rust_decimal::Decimal;
use uuid::Uuid;

use shared::{
    compute_price_breakdown, group_sizes, number_of_waiters, per_guest_allowance, GroupAllowance,
    ItemRef, PartyPricing, ResolvedItem, DEFAULT_PARTY_PRICE, WAITER_RATE,
};

/// Helper to create Decimal from string
fn dec(s: &str) -> Decimal {
    s.parse().unwrap()
}

/// Helper to create a resolved item with an optional group
fn item(price: &str, group: Option<(Uuid, &str)>) -> ResolvedItem {
    let price = dec(price);
    ResolvedItem {
        variant_id: Uuid::new_v4(),
        reference: ItemRef::Internal(1),
        title: "item".to_string(),
        price,
        cost_price: None,
        group: group.map(|(id, quantity)| GroupAllowance {
            id,
            quantity_per_people: dec(quantity),
        }),
        quantity: 1,
        line_total: price,
    }
}

fn party(duration: &str, price: &str) -> PartyPricing {
    PartyPricing {
        duration_hours: dec(duration),
        price: dec(price),
    }
}

// =============================================================================
// Total composition
// =============================================================================

mod total_composition {
    use super::*;

    #[test]
    fn worked_example_two_items_one_group_fifty_guests() {
        // quantity_per_people = 10 split across 2 items -> 5 units per
        // guest each; 5*5*50 + 5*3*50 = 2000; 2 waiters -> 520;
        // 2000 + 800 + 520 = 3320
        let group = Uuid::new_v4();
        let items = vec![
            item("5", Some((group, "10"))),
            item("3", Some((group, "10"))),
        ];
        let breakdown = compute_price_breakdown(Some(&party("4", "800")), &items, 50, Decimal::ZERO);

        assert_eq!(breakdown.total_item_price, dec("2000"));
        assert_eq!(breakdown.number_of_waiters, 2);
        assert_eq!(breakdown.waiter_price, dec("520"));
        assert_eq!(breakdown.extra_hour_price, Decimal::ZERO);
        assert_eq!(breakdown.total_price, dec("3320"));
    }

    #[test]
    fn missing_party_type_uses_default_flat_fee() {
        let items = vec![item("10", None)];
        let breakdown = compute_price_breakdown(None, &items, 10, Decimal::ZERO);

        // 10 units per guest * 10 * 10 guests = 1000; 1 waiter = 260
        assert_eq!(breakdown.total_item_price, dec("1000"));
        assert_eq!(
            breakdown.total_price,
            dec("1000") + Decimal::from(DEFAULT_PARTY_PRICE) + dec("260")
        );
    }

    #[test]
    fn no_items_still_charges_party_fee_and_waiters() {
        let breakdown = compute_price_breakdown(Some(&party("4", "800")), &[], 30, Decimal::ZERO);

        assert_eq!(breakdown.total_item_price, Decimal::ZERO);
        assert_eq!(breakdown.number_of_waiters, 2);
        assert_eq!(breakdown.total_price, dec("800") + dec("520"));
    }

    #[test]
    fn extra_hours_stay_wired() {
        // total_item_price / duration * extra_hours:
        // 2000 / 4 * 2 = 1000 on top of the worked example
        let group = Uuid::new_v4();
        let items = vec![
            item("5", Some((group, "10"))),
            item("3", Some((group, "10"))),
        ];
        let breakdown = compute_price_breakdown(Some(&party("4", "800")), &items, 50, dec("2"));

        assert_eq!(breakdown.extra_hours, dec("2"));
        assert_eq!(breakdown.extra_hour_price, dec("1000"));
        assert_eq!(breakdown.total_price, dec("4320"));
    }
}

// =============================================================================
// Grouping and allowance split
// =============================================================================

mod allowance_split {
    use super::*;

    #[test]
    fn single_ungrouped_item_gets_full_default_allowance() {
        let items = vec![item("5", None)];
        let sizes = group_sizes(&items);

        assert_eq!(per_guest_allowance(&items[0], &sizes), dec("10"));
    }

    #[test]
    fn ungrouped_items_share_one_default_allowance() {
        // Five unrelated group-less items still split the single default
        // allowance of 10 -> 2 units per guest each. Current behavior,
        // preserved on purpose.
        let items: Vec<ResolvedItem> = (0..5).map(|_| item("5", None)).collect();
        let sizes = group_sizes(&items);

        for it in &items {
            assert_eq!(per_guest_allowance(it, &sizes), dec("2"));
        }
    }

    #[test]
    fn groups_split_independently() {
        let group_a = Uuid::new_v4();
        let group_b = Uuid::new_v4();
        let items = vec![
            item("1", Some((group_a, "12"))),
            item("1", Some((group_a, "12"))),
            item("1", Some((group_a, "12"))),
            item("1", Some((group_b, "8"))),
            item("1", None),
        ];
        let sizes = group_sizes(&items);

        assert_eq!(per_guest_allowance(&items[0], &sizes), dec("4"));
        assert_eq!(per_guest_allowance(&items[3], &sizes), dec("8"));
        assert_eq!(per_guest_allowance(&items[4], &sizes), dec("10"));
    }

    #[test]
    fn group_allowance_overrides_default() {
        let group = Uuid::new_v4();
        let items = vec![item("2", Some((group, "6")))];
        let breakdown = compute_price_breakdown(Some(&party("4", "800")), &items, 20, Decimal::ZERO);

        // 6 units per guest * 2 * 20 = 240
        assert_eq!(breakdown.total_item_price, dec("240"));
    }
}

// =============================================================================
// Staffing
// =============================================================================

mod staffing {
    use super::*;

    #[test]
    fn one_waiter_per_started_block_of_25() {
        assert_eq!(number_of_waiters(1), 1);
        assert_eq!(number_of_waiters(24), 1);
        assert_eq!(number_of_waiters(25), 1);
        assert_eq!(number_of_waiters(26), 2);
        assert_eq!(number_of_waiters(50), 2);
        assert_eq!(number_of_waiters(51), 3);
        assert_eq!(number_of_waiters(200), 8);
    }

    #[test]
    fn waiter_price_is_fixed_rate_per_waiter() {
        let breakdown = compute_price_breakdown(None, &[], 120, Decimal::ZERO);

        assert_eq!(breakdown.number_of_waiters, 5);
        assert_eq!(breakdown.waiter_price, Decimal::from(5 * WAITER_RATE));
    }
}

// =============================================================================
// Algebraic properties
// =============================================================================

proptest! {
    #[test]
    fn waiters_match_ceiling_division(people in 1i32..10_000) {
        let expected = (people as f64 / 25.0).ceil() as i32;
        prop_assert_eq!(number_of_waiters(people), expected);
    }

    #[test]
    fn total_item_price_matches_manual_sum(
        people in 1i32..500,
        prices in proptest::collection::vec(1i64..1_000, 1..8),
    ) {
        // All items in one group with the default allowance
        let group = Uuid::new_v4();
        let items: Vec<ResolvedItem> = prices
            .iter()
            .map(|p| item(&p.to_string(), Some((group, "10"))))
            .collect();

        let share = dec("10") / Decimal::from(items.len() as i64);
        let expected: Decimal = prices
            .iter()
            .map(|p| share * Decimal::from(*p) * Decimal::from(people as i64))
            .sum();

        let breakdown = compute_price_breakdown(None, &items, people, Decimal::ZERO);
        prop_assert_eq!(breakdown.total_item_price, expected);
    }

    #[test]
    fn total_price_is_sum_of_parts(
        people in 1i32..500,
        price in 1i64..2_000,
        party_fee in 1i64..5_000,
    ) {
        let items = vec![item(&price.to_string(), None)];
        let p = PartyPricing {
            duration_hours: dec("4"),
            price: Decimal::from(party_fee),
        };
        let breakdown = compute_price_breakdown(Some(&p), &items, people, Decimal::ZERO);

        prop_assert_eq!(
            breakdown.total_price,
            breakdown.total_item_price
                + Decimal::from(party_fee)
                + breakdown.waiter_price
                + breakdown.extra_hour_price
        );
    }
}
