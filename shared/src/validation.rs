//! Validation utilities for the Festa Buffet ordering platform
//!
//! Boundary checks run before the engines; the engines assume validated,
//! well-typed input.

use crate::types::{ContactInfo, RequestedItem};

// ============================================================================
// Order input validations
// ============================================================================

/// Guest count must be at least one
pub fn validate_guest_count(number_of_people: i32) -> Result<(), &'static str> {
    if number_of_people < 1 {
        return Err("Number of people must be at least 1");
    }
    Ok(())
}

/// A quote or order needs at least one requested item
pub fn validate_requested_items(items: &[RequestedItem]) -> Result<(), &'static str> {
    if items.is_empty() {
        return Err("At least one item is required");
    }
    for item in items {
        if let Some(quantity) = item.quantity {
            if quantity < 0 {
                return Err("Item quantity cannot be negative");
            }
        }
    }
    Ok(())
}

/// Contact info must carry a name and a valid phone number
pub fn validate_contact_info(contact: &ContactInfo) -> Result<(), &'static str> {
    if contact.name.trim().is_empty() {
        return Err("Customer name is required");
    }
    validate_brazilian_phone(&contact.phone)?;
    if let Some(email) = &contact.email {
        validate_email(email)?;
    }
    Ok(())
}

// ============================================================================
// General validations
// ============================================================================

/// Validate email format (basic check)
pub fn validate_email(email: &str) -> Result<(), &'static str> {
    if email.contains('@') && email.contains('.') && email.len() >= 5 {
        Ok(())
    } else {
        Err("Invalid email format")
    }
}

/// Validate Brazilian phone number format
/// Accepts: 11987654321, (11) 98765-4321, +5511987654321
pub fn validate_brazilian_phone(phone: &str) -> Result<(), &'static str> {
    let digits: String = phone.chars().filter(|c| c.is_ascii_digit()).collect();

    // Mobile with area code: 11 digits, landline: 10 digits
    if digits.len() == 10 || digits.len() == 11 {
        return Ok(());
    }

    // International format with country code 55
    if digits.len() == 13 && digits.starts_with("55") {
        return Ok(());
    }
    if digits.len() == 12 && digits.starts_with("55") {
        return Ok(());
    }

    Err("Invalid Brazilian phone number")
}
