//! Tests for concrete quantity allocation
//! Computed quantities scale the per-guest allowance by the guest count,
//! round half away from zero and never drop below one unit

use proptest::prelude::*;
use rust_decimal::Decimal;
use uuid::Uuid;

use shared::{computed_quantity, GroupAllowance, DEFAULT_QUANTITY_PER_PEOPLE};

/// Helper to create Decimal from string
fn dec(s: &str) -> Decimal {
    s.parse().unwrap()
}

fn group(quantity_per_people: &str) -> GroupAllowance {
    GroupAllowance {
        id: Uuid::new_v4(),
        quantity_per_people: dec(quantity_per_people),
    }
}

// =============================================================================
// Scaling
// =============================================================================

mod scaling {
    use super::*;

    #[test]
    fn allowance_times_guest_count() {
        // 10 per guest split across 2 items, 50 guests -> 250 units each
        let g = group("10");
        assert_eq!(computed_quantity(Some(&g), 2, 50), 250);
    }

    #[test]
    fn ungrouped_items_use_default_allowance() {
        // Same default bucket split as the quote: 10 / 5 items * 20
        // guests = 40
        assert_eq!(computed_quantity(None, 5, 20), 40);
        assert_eq!(
            computed_quantity(None, 1, 3),
            (DEFAULT_QUANTITY_PER_PEOPLE * 3) as i32
        );
    }

    #[test]
    fn rounds_half_away_from_zero() {
        // 1 / 2 * 5 = 2.5 -> 3
        let g = group("1");
        assert_eq!(computed_quantity(Some(&g), 2, 5), 3);

        // 0.7 / 1 * 2 = 1.4 -> 1
        let g = group("0.7");
        assert_eq!(computed_quantity(Some(&g), 1, 2), 1);
    }

    #[test]
    fn never_drops_below_one_unit() {
        // 10 / 30 * 1 = 0.33 -> rounds to 0, clamped to 1
        let g = group("10");
        assert_eq!(computed_quantity(Some(&g), 30, 1), 1);

        let g = group("0");
        assert_eq!(computed_quantity(Some(&g), 1, 100), 1);
    }

    #[test]
    fn degenerate_inputs_are_clamped() {
        let g = group("10");
        // Zero members treated as one, zero guests treated as one
        assert_eq!(computed_quantity(Some(&g), 0, 1), 10);
        assert_eq!(computed_quantity(Some(&g), 1, 0), 10);
    }
}

// =============================================================================
// Properties
// =============================================================================

proptest! {
    #[test]
    fn quantity_is_always_at_least_one(
        quantity_per_people in 0i64..100,
        members in 0usize..50,
        people in 0i32..2_000,
    ) {
        let g = GroupAllowance {
            id: Uuid::new_v4(),
            quantity_per_people: Decimal::from(quantity_per_people),
        };

        prop_assert!(computed_quantity(Some(&g), members, people) >= 1);
    }

    #[test]
    fn single_member_group_scales_linearly(
        quantity_per_people in 1i64..50,
        people in 1i32..2_000,
    ) {
        let g = GroupAllowance {
            id: Uuid::new_v4(),
            quantity_per_people: Decimal::from(quantity_per_people),
        };

        // Whole allowance, one member: no rounding comes into play
        prop_assert_eq!(
            computed_quantity(Some(&g), 1, people) as i64,
            quantity_per_people * people as i64
        );
    }
}
