//! The built-in categories shipped with the vault.
//!
//! These are fixed at process start and never mutate; their ids are reserved
//! against user-defined registrations. Field names are part of the at-rest
//! record format and must stay stable.

use crate::types::{CategorySchema, FieldSpec, FieldType};

use FieldType::{Date, LongText, Password, Text};

/// All built-in categories, in display order.
pub fn all() -> Vec<CategorySchema> {
    vec![
        payment_cards(),
        identity_docs(),
        passwords(),
        notes(),
        health_info(),
        memberships(),
        vehicle(),
        education(),
        bank_accounts(),
        software_licenses(),
    ]
}

fn payment_cards() -> CategorySchema {
    CategorySchema::new(
        "payment_cards",
        "Payment Cards",
        vec![
            FieldSpec::new("cardName", "Card Name", Text).required(),
            FieldSpec::new("cardNumber", "Card Number", Text).required().sensitive(),
            FieldSpec::new("cardHolder", "Card Holder Name", Text).required(),
            FieldSpec::new("expiryDate", "Expiry Date", Text).required(),
            FieldSpec::new("cvv", "CVV", Password).required().sensitive(),
            FieldSpec::new("pin", "PIN", Password).sensitive(),
            FieldSpec::new("notes", "Notes", LongText),
        ],
    )
}

fn identity_docs() -> CategorySchema {
    CategorySchema::new(
        "identity_docs",
        "Identity Documents",
        vec![
            FieldSpec::new("docName", "Document Name", Text).required(),
            FieldSpec::new("docNumber", "Document Number", Text).required().sensitive(),
            FieldSpec::new("fullName", "Full Name", Text).required(),
            FieldSpec::new("issueDate", "Issue Date", Date),
            FieldSpec::new("expiryDate", "Expiry Date", Date),
            FieldSpec::new("issuingAuthority", "Issuing Authority", Text),
            FieldSpec::new("notes", "Notes", LongText),
        ],
    )
}

fn passwords() -> CategorySchema {
    CategorySchema::new(
        "passwords",
        "Passwords & Logins",
        vec![
            FieldSpec::new("serviceName", "Service Name", Text).required(),
            FieldSpec::new("website", "Website URL", Text),
            FieldSpec::new("username", "Username/Email", Text).required(),
            FieldSpec::new("password", "Password", Password).required().sensitive(),
            FieldSpec::new("securityQuestion", "Security Question", Text),
            FieldSpec::new("securityAnswer", "Security Answer", Text).sensitive(),
            FieldSpec::new("notes", "Notes", LongText),
        ],
    )
}

fn notes() -> CategorySchema {
    CategorySchema::new(
        "notes",
        "Notes & Documents",
        vec![
            FieldSpec::new("title", "Title", Text).required(),
            FieldSpec::new("content", "Content", LongText).required().sensitive(),
            FieldSpec::new("tags", "Tags", Text),
        ],
    )
}

fn health_info() -> CategorySchema {
    CategorySchema::new(
        "health_info",
        "Health Information",
        vec![
            FieldSpec::new("infoType", "Information Type", Text).required(),
            FieldSpec::new("policyNumber", "Policy/ID Number", Text).sensitive(),
            FieldSpec::new("provider", "Provider Name", Text),
            FieldSpec::new("contactNumber", "Contact Number", Text),
            FieldSpec::new("validUntil", "Valid Until", Date),
            FieldSpec::new("notes", "Notes", LongText).sensitive(),
        ],
    )
}

fn memberships() -> CategorySchema {
    CategorySchema::new(
        "memberships",
        "Memberships & Loyalty",
        vec![
            FieldSpec::new("programName", "Program Name", Text).required(),
            FieldSpec::new("membershipId", "Membership ID", Text).required().sensitive(),
            FieldSpec::new("memberName", "Member Name", Text),
            FieldSpec::new("validFrom", "Valid From", Date),
            FieldSpec::new("validUntil", "Valid Until", Date),
            FieldSpec::new("benefits", "Benefits", LongText),
            FieldSpec::new("notes", "Notes", LongText),
        ],
    )
}

fn vehicle() -> CategorySchema {
    CategorySchema::new(
        "vehicle",
        "Vehicle & Transport",
        vec![
            FieldSpec::new("vehicleType", "Vehicle Type", Text).required(),
            FieldSpec::new("regNumber", "Registration Number", Text).required().sensitive(),
            FieldSpec::new("model", "Make & Model", Text),
            FieldSpec::new("licenseNumber", "License Number", Text).sensitive(),
            FieldSpec::new("insurancePolicy", "Insurance Policy", Text).sensitive(),
            FieldSpec::new("expiryDate", "Expiry Date", Date),
            FieldSpec::new("notes", "Notes", LongText),
        ],
    )
}

fn education() -> CategorySchema {
    CategorySchema::new(
        "education",
        "Education & Certificates",
        vec![
            FieldSpec::new("institution", "Institution Name", Text).required(),
            FieldSpec::new("degree", "Degree / Certificate", Text).required(),
            FieldSpec::new("year", "Year of Passing", Text),
            FieldSpec::new("certificateNumber", "Certificate / Roll No.", Text).sensitive(),
            FieldSpec::new("percentage", "Grade / Percentage", Text),
            FieldSpec::new("notes", "Notes", LongText),
        ],
    )
}

fn bank_accounts() -> CategorySchema {
    CategorySchema::new(
        "bank_accounts",
        "Bank Accounts",
        vec![
            FieldSpec::new("bankName", "Bank Name", Text).required(),
            FieldSpec::new("accountType", "Account Type", Text).required(),
            FieldSpec::new("accountNumber", "Account Number", Text).required().sensitive(),
            FieldSpec::new("routingNumber", "Routing Number", Text).sensitive(),
            FieldSpec::new("accountHolder", "Account Holder", Text),
            FieldSpec::new("branch", "Branch", Text),
            FieldSpec::new("notes", "Notes", LongText),
        ],
    )
}

fn software_licenses() -> CategorySchema {
    CategorySchema::new(
        "software_licenses",
        "Software Licenses",
        vec![
            FieldSpec::new("softwareName", "Software Name", Text).required(),
            FieldSpec::new("licenseKey", "License Key", Text).required().sensitive(),
            FieldSpec::new("purchaseDate", "Purchase Date", Date),
            FieldSpec::new("expiryDate", "Expiry Date", Date),
            FieldSpec::new("purchasedFrom", "Purchased From", Text),
            FieldSpec::new("version", "Version", Text),
            FieldSpec::new("notes", "Notes", LongText),
        ],
    )
}
