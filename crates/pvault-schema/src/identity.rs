//! Identity predicates: decide whether two records of the same category
//! represent the same real-world secret.
//!
//! Used by the store's duplicate check on create. Candidate uniqueness keys
//! are evaluated in a fixed order; the first predicate where both records
//! carry a non-empty, equal value decides. Comparison happens on plaintext
//! records; encrypted envelopes are never comparable (fresh IV per write).

use pvault_core::Record;

/// Single-field uniqueness keys, in evaluation order.
const SINGLE_KEYS: &[&str] = &["cardNumber", "docNumber", "accountNumber", "regNumber"];

/// Single-field keys evaluated after the (username, serviceName) pair.
const TRAILING_KEYS: &[&str] = &["licenseKey", "membershipId"];

/// Whether `candidate` duplicates `existing`.
///
/// Records of different categories never collide. The generic notes
/// category falls back to exact title match; untitled notes may repeat.
pub fn is_duplicate_of(candidate: &Record, existing: &Record) -> bool {
    if candidate.category != existing.category {
        return false;
    }

    for key in SINGLE_KEYS {
        if field_matches(candidate, existing, key) {
            return true;
        }
    }

    if field_matches(candidate, existing, "username")
        && field_matches(candidate, existing, "serviceName")
    {
        return true;
    }

    for key in TRAILING_KEYS {
        if field_matches(candidate, existing, key) {
            return true;
        }
    }

    if candidate.category == "notes" && field_matches(candidate, existing, "title") {
        return true;
    }

    false
}

/// Both records carry a non-empty value for `name` and the values agree.
fn field_matches(a: &Record, b: &Record, name: &str) -> bool {
    match (a.rendered(name), b.rendered(name)) {
        (Some(left), Some(right)) => left == right,
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_same_card_number_collides() {
        let a = Record::new("payment_cards")
            .with_field("cardName", "Personal Visa")
            .with_field("cardNumber", "4111111111111111");
        let b = Record::new("payment_cards")
            .with_field("cardName", "Work Visa")
            .with_field("cardNumber", "4111111111111111");

        assert!(is_duplicate_of(&a, &b));
    }

    #[test]
    fn test_different_category_never_collides() {
        let card = Record::new("payment_cards").with_field("cardNumber", "4111111111111111");
        let doc = Record::new("identity_docs").with_field("cardNumber", "4111111111111111");

        assert!(!is_duplicate_of(&card, &doc));
    }

    #[test]
    fn test_username_service_pair() {
        let a = Record::new("passwords")
            .with_field("username", "me@example.com")
            .with_field("serviceName", "mail");
        let same_pair = Record::new("passwords")
            .with_field("username", "me@example.com")
            .with_field("serviceName", "mail");
        let other_service = Record::new("passwords")
            .with_field("username", "me@example.com")
            .with_field("serviceName", "bank");

        assert!(is_duplicate_of(&a, &same_pair));
        assert!(
            !is_duplicate_of(&a, &other_service),
            "same username on another service is a distinct login"
        );
    }

    #[test]
    fn test_notes_collide_on_title_only() {
        let a = Record::new("notes")
            .with_field("title", "Meeting Notes")
            .with_field("content", "agenda");
        let same_title = Record::new("notes")
            .with_field("title", "Meeting Notes")
            .with_field("content", "different agenda");
        let untitled_a = Record::new("notes").with_field("content", "x");
        let untitled_b = Record::new("notes").with_field("content", "y");

        assert!(is_duplicate_of(&a, &same_title));
        assert!(
            !is_duplicate_of(&untitled_a, &untitled_b),
            "untitled notes may repeat"
        );
    }

    #[test]
    fn test_empty_values_never_match() {
        let a = Record::new("payment_cards").with_field("cardNumber", "");
        let b = Record::new("payment_cards").with_field("cardNumber", "");

        assert!(!is_duplicate_of(&a, &b));
    }

    #[test]
    fn test_license_key_collides() {
        let a = Record::new("software_licenses").with_field("licenseKey", "AAAA-BBBB");
        let b = Record::new("software_licenses").with_field("licenseKey", "AAAA-BBBB");

        assert!(is_duplicate_of(&a, &b));
    }
}
