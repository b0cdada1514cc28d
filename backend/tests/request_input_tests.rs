//! Tests for client-facing input types and boundary validation

use rust_decimal::Decimal;
use serde::Deserialize;

use shared::{
    deserialize_patch, merge_duplicate_items, validate_brazilian_phone, validate_contact_info,
    validate_email, validate_guest_count, validate_requested_items, ContactInfo,
    DetailedOrderItem, ItemRef, RequestedItem,
};

fn contact(name: &str, phone: &str) -> ContactInfo {
    ContactInfo {
        name: name.to_string(),
        phone: phone.to_string(),
        email: None,
        address: None,
        notes: None,
    }
}

// =============================================================================
// Item references
// =============================================================================

mod item_refs {
    use super::*;

    #[test]
    fn json_numbers_become_internal_refs() {
        let parsed: ItemRef = serde_json::from_str("42").unwrap();
        assert_eq!(parsed, ItemRef::Internal(42));
    }

    #[test]
    fn json_strings_become_external_refs() {
        let parsed: ItemRef = serde_json::from_str("\"gid://shop/Variant/42\"").unwrap();
        assert_eq!(
            parsed,
            ItemRef::External("gid://shop/Variant/42".to_string())
        );

        // Numeric-looking strings stay external; matching handles the
        // legacy-numeric second pass
        let parsed: ItemRef = serde_json::from_str("\"42\"").unwrap();
        assert_eq!(parsed, ItemRef::External("42".to_string()));
    }

    #[test]
    fn mixed_baskets_deserialize() {
        let basket: Vec<RequestedItem> =
            serde_json::from_str(r#"[{"id": 7, "quantity": 2}, {"id": "abc-123"}]"#).unwrap();

        assert_eq!(basket[0].id, ItemRef::Internal(7));
        assert_eq!(basket[0].quantity_or_default(), 2);
        assert_eq!(basket[1].id, ItemRef::External("abc-123".to_string()));
        assert_eq!(basket[1].quantity_or_default(), 1);
    }

    #[test]
    fn negative_quantity_clamps_to_zero() {
        let item = RequestedItem {
            id: ItemRef::Internal(1),
            quantity: Some(-3),
        };
        assert_eq!(item.quantity_or_default(), 0);
    }
}

// =============================================================================
// Duplicate basket lines
// =============================================================================

mod duplicate_lines {
    use super::*;

    fn line(id: ItemRef, title: &str, price: i64, quantity: i32) -> DetailedOrderItem {
        DetailedOrderItem {
            id,
            title: title.to_string(),
            price: Decimal::from(price),
            quantity,
        }
    }

    #[test]
    fn repeated_references_collapse_into_one_line() {
        let merged = merge_duplicate_items(vec![
            line(ItemRef::Internal(7), "Coxinha", 5, 10),
            line(ItemRef::Internal(7), "Coxinha", 5, 15),
        ]);

        assert_eq!(merged.len(), 1);
        assert_eq!(merged[0].quantity, 25);
    }

    #[test]
    fn first_line_keeps_its_title_and_price() {
        let merged = merge_duplicate_items(vec![
            line(ItemRef::External("abc".to_string()), "Original", 5, 1),
            line(ItemRef::External("abc".to_string()), "Renamed", 9, 1),
        ]);

        assert_eq!(merged[0].title, "Original");
        assert_eq!(merged[0].price, Decimal::from(5));
    }

    #[test]
    fn distinct_references_stay_in_order() {
        let merged = merge_duplicate_items(vec![
            line(ItemRef::Internal(1), "a", 1, 1),
            line(ItemRef::External("x".to_string()), "b", 1, 1),
            line(ItemRef::Internal(2), "c", 1, 1),
            line(ItemRef::Internal(1), "a again", 1, 4),
        ]);

        assert_eq!(merged.len(), 3);
        assert_eq!(merged[0].id, ItemRef::Internal(1));
        assert_eq!(merged[0].quantity, 5);
        assert_eq!(merged[1].id, ItemRef::External("x".to_string()));
        assert_eq!(merged[2].id, ItemRef::Internal(2));
    }

    #[test]
    fn numeric_ref_and_numeric_string_ref_stay_separate() {
        // Untagged refs keep their shape; only identical references merge
        let merged = merge_duplicate_items(vec![
            line(ItemRef::Internal(7), "a", 1, 1),
            line(ItemRef::External("7".to_string()), "b", 1, 1),
        ]);

        assert_eq!(merged.len(), 2);
    }

    #[test]
    fn negative_quantities_do_not_poison_the_merge() {
        let merged = merge_duplicate_items(vec![
            line(ItemRef::Internal(1), "a", 1, -5),
            line(ItemRef::Internal(1), "a", 1, 3),
        ]);

        assert_eq!(merged[0].quantity, 3);
    }
}

// =============================================================================
// Edit-field patch semantics
// =============================================================================

mod patch_fields {
    use super::*;

    #[derive(Debug, Deserialize)]
    struct Edit {
        #[serde(default, deserialize_with = "deserialize_patch")]
        event_date: Option<Option<String>>,
    }

    #[test]
    fn absent_field_means_keep() {
        let edit: Edit = serde_json::from_str("{}").unwrap();
        assert_eq!(edit.event_date, None);
    }

    #[test]
    fn explicit_null_means_clear() {
        let edit: Edit = serde_json::from_str(r#"{"event_date": null}"#).unwrap();
        assert_eq!(edit.event_date, Some(None));
    }

    #[test]
    fn value_means_set() {
        let edit: Edit = serde_json::from_str(r#"{"event_date": "2026-09-12"}"#).unwrap();
        assert_eq!(edit.event_date, Some(Some("2026-09-12".to_string())));
    }
}

// =============================================================================
// Boundary validation
// =============================================================================

mod validation {
    use super::*;

    #[test]
    fn guest_count_must_be_positive() {
        assert!(validate_guest_count(1).is_ok());
        assert!(validate_guest_count(500).is_ok());
        assert!(validate_guest_count(0).is_err());
        assert!(validate_guest_count(-10).is_err());
    }

    #[test]
    fn empty_basket_is_rejected() {
        assert!(validate_requested_items(&[]).is_err());

        let items = vec![RequestedItem {
            id: ItemRef::Internal(1),
            quantity: None,
        }];
        assert!(validate_requested_items(&items).is_ok());
    }

    #[test]
    fn negative_basket_quantity_is_rejected() {
        let items = vec![RequestedItem {
            id: ItemRef::Internal(1),
            quantity: Some(-1),
        }];
        assert!(validate_requested_items(&items).is_err());
    }

    #[test]
    fn contact_needs_name_and_phone() {
        assert!(validate_contact_info(&contact("Maria Silva", "11987654321")).is_ok());
        assert!(validate_contact_info(&contact("   ", "11987654321")).is_err());
        assert!(validate_contact_info(&contact("Maria Silva", "123")).is_err());
    }

    #[test]
    fn contact_email_checked_when_present() {
        let mut c = contact("Maria Silva", "11987654321");
        c.email = Some("maria@example.com".to_string());
        assert!(validate_contact_info(&c).is_ok());

        c.email = Some("not-an-email".to_string());
        assert!(validate_contact_info(&c).is_err());
    }

    #[test]
    fn phone_formats() {
        assert!(validate_brazilian_phone("11987654321").is_ok());
        assert!(validate_brazilian_phone("(11) 98765-4321").is_ok());
        assert!(validate_brazilian_phone("+5511987654321").is_ok());
        assert!(validate_brazilian_phone("1187654321").is_ok());
        assert!(validate_brazilian_phone("987654321").is_err());
        assert!(validate_brazilian_phone("abc").is_err());
    }

    #[test]
    fn email_formats() {
        assert!(validate_email("a@b.co").is_ok());
        assert!(validate_email("festa@buffet.com.br").is_ok());
        assert!(validate_email("a@b").is_err());
        assert!(validate_email("").is_err());
    }
}
