//! Contact-point utilities: phone/email normalization and masking

use once_cell::sync::Lazy;
use regex::Regex;

// International phone number regex (E.164 format)
static INTERNATIONAL_PHONE_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\+[1-9]\d{1,14}$").unwrap());

// Pragmatic email shape check; the server performs the authoritative one
static EMAIL_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").unwrap());

/// Normalize a phone number by removing common formatting characters
pub fn normalize_phone_number(phone: &str) -> String {
    phone
        .chars()
        .filter(|c| c.is_ascii_digit() || *c == '+')
        .collect()
}

/// Check if a phone number is valid (international E.164 format)
pub fn is_valid_phone(phone: &str) -> bool {
    let normalized = normalize_phone_number(phone);
    INTERNATIONAL_PHONE_REGEX.is_match(&normalized)
}

/// Check if an email address has a plausible shape
pub fn is_valid_email(email: &str) -> bool {
    EMAIL_REGEX.is_match(email)
}

/// Mask a phone number for display (e.g., +61****5678)
pub fn mask_phone_number(phone: &str) -> String {
    let normalized = normalize_phone_number(phone);
    if normalized.len() >= 7 {
        format!(
            "{}****{}",
            &normalized[0..3],
            &normalized[normalized.len() - 4..]
        )
    } else {
        "****".to_string()
    }
}

/// Mask an email address for display (e.g., al***@example.com)
pub fn mask_email(email: &str) -> String {
    match email.split_once('@') {
        Some((local, domain)) if !local.is_empty() => {
            let visible = local.chars().take(2).collect::<String>();
            format!("{}***@{}", visible, domain)
        }
        _ => "***".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_phone_number() {
        assert_eq!(normalize_phone_number("+61 412 345 678"), "+61412345678");
        assert_eq!(normalize_phone_number("(415) 555-2671"), "4155552671");
    }

    #[test]
    fn test_is_valid_phone() {
        assert!(is_valid_phone("+61412345678"));
        assert!(is_valid_phone("+14155552671"));
        assert!(is_valid_phone("+44 2071 838750"));
        assert!(!is_valid_phone("0412345678")); // Missing +
        assert!(!is_valid_phone("+0123456789")); // Invalid country code
    }

    #[test]
    fn test_is_valid_email() {
        assert!(is_valid_email("alice@example.com"));
        assert!(is_valid_email("a.b+tag@sub.example.org"));
        assert!(!is_valid_email("alice@"));
        assert!(!is_valid_email("alice example.com"));
        assert!(!is_valid_email("alice@example"));
    }

    #[test]
    fn test_mask_phone_number() {
        assert_eq!(mask_phone_number("+61412345678"), "+61****5678");
        assert_eq!(mask_phone_number("12345"), "****");
    }

    #[test]
    fn test_mask_email() {
        assert_eq!(mask_email("alice@example.com"), "al***@example.com");
        assert_eq!(mask_email("a@example.com"), "a***@example.com");
        assert_eq!(mask_email("not-an-email"), "***");
    }
}
