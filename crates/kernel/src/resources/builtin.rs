//! Built-in rental resources.

use super::{FieldDef, FieldType, FieldValue, Resource};

static LANDLORD_FIELDS: &[FieldDef] = &[
    FieldDef::new("id", FieldType::Integer),
    FieldDef::new("created", FieldType::DateTime),
    FieldDef::new("updated", FieldType::DateTime),
    FieldDef::new("identifier", FieldType::Text),
    FieldDef::new("email", FieldType::Text),
    FieldDef::new("first_name", FieldType::Text),
    FieldDef::new("last_name", FieldType::Text),
    FieldDef::new("phone", FieldType::Text),
    FieldDef::new("address", FieldType::Text),
    FieldDef::new("description", FieldType::Text),
    FieldDef::hidden("password", FieldType::Text),
];

static FLAT_FIELDS: &[FieldDef] = &[
    FieldDef::new("id", FieldType::Integer),
    FieldDef::new("created", FieldType::DateTime),
    FieldDef::new("updated", FieldType::DateTime),
    FieldDef::new("identifier", FieldType::Text),
    FieldDef::new("address", FieldType::Text),
    FieldDef::new("description", FieldType::Text),
    FieldDef::new("landlord_id", FieldType::Integer),
    FieldDef::new("tenant_id", FieldType::Integer),
];

static TENANT_FIELDS: &[FieldDef] = &[
    FieldDef::new("id", FieldType::Integer),
    FieldDef::new("created", FieldType::DateTime),
    FieldDef::new("updated", FieldType::DateTime),
    FieldDef::new("identifier", FieldType::Text),
    FieldDef::new("email", FieldType::Text),
    FieldDef::new("first_name", FieldType::Text),
    FieldDef::new("last_name", FieldType::Text),
    FieldDef::new("phone", FieldType::Text),
    FieldDef::new("address", FieldType::Text),
    FieldDef::new("description", FieldType::Text),
    FieldDef::new("landlord_id", FieldType::Integer),
    FieldDef::hidden("password", FieldType::Text),
];

static AGREEMENT_FIELDS: &[FieldDef] = &[
    FieldDef::new("id", FieldType::Integer),
    FieldDef::new("created", FieldType::DateTime),
    FieldDef::new("updated", FieldType::DateTime),
    FieldDef::new("identifier", FieldType::Text),
    FieldDef::new("sign_date", FieldType::Date),
    FieldDef::new("date_from", FieldType::Date),
    FieldDef::new("date_to", FieldType::Date),
    FieldDef::new("price_value", FieldType::Decimal),
    FieldDef::new("payment_deadline", FieldType::Integer),
    FieldDef::new("deposit_value", FieldType::Decimal),
    FieldDef::new("description", FieldType::Text),
    FieldDef::new("landlord_id", FieldType::Integer),
    FieldDef::new("tenant_id", FieldType::Integer),
    FieldDef::new("flat_id", FieldType::Integer),
];

static SETTLEMENT_FIELDS: &[FieldDef] = &[
    FieldDef::new("id", FieldType::Integer),
    FieldDef::new("created", FieldType::DateTime),
    FieldDef::new("updated", FieldType::DateTime),
    FieldDef::new("type", FieldType::Text),
    FieldDef::new("date", FieldType::Date),
    FieldDef::new("value", FieldType::Decimal),
    FieldDef::new("description", FieldType::Text),
    FieldDef::new("tenant_id", FieldType::Integer),
    FieldDef::new("agreement_id", FieldType::Integer),
];

/// Settlement kinds stored in `settlements.type`.
const SETTLEMENT_TYPES: &[&str] = &["charge", "payment"];

/// Property owners.
#[derive(Debug, Clone, Copy, Default)]
pub struct Landlords;

impl Resource for Landlords {
    fn name(&self) -> &str {
        "landlords"
    }

    fn fields(&self) -> &[FieldDef] {
        LANDLORD_FIELDS
    }
}

/// Rented flats.
#[derive(Debug, Clone, Copy, Default)]
pub struct Flats;

impl Resource for Flats {
    fn name(&self) -> &str {
        "flats"
    }

    fn fields(&self) -> &[FieldDef] {
        FLAT_FIELDS
    }
}

/// Tenants renting from a landlord.
#[derive(Debug, Clone, Copy, Default)]
pub struct Tenants;

impl Resource for Tenants {
    fn name(&self) -> &str {
        "tenants"
    }

    fn fields(&self) -> &[FieldDef] {
        TENANT_FIELDS
    }
}

/// Rental agreements between a landlord and a tenant for a flat.
#[derive(Debug, Clone, Copy, Default)]
pub struct Agreements;

impl Resource for Agreements {
    fn name(&self) -> &str {
        "agreements"
    }

    fn fields(&self) -> &[FieldDef] {
        AGREEMENT_FIELDS
    }

    fn coerce(&self, field: &FieldDef, raw: &str) -> Option<FieldValue> {
        let value = field.field_type.coerce(raw)?;
        match (field.name, &value) {
            // Day of month the rent is due.
            ("payment_deadline", FieldValue::Integer(day)) if !(1..=31).contains(day) => None,
            _ => Some(value),
        }
    }
}

/// Charges and payments booked against an agreement.
#[derive(Debug, Clone, Copy, Default)]
pub struct Settlements;

impl Resource for Settlements {
    fn name(&self) -> &str {
        "settlements"
    }

    fn fields(&self) -> &[FieldDef] {
        SETTLEMENT_FIELDS
    }

    fn coerce(&self, field: &FieldDef, raw: &str) -> Option<FieldValue> {
        if field.name == "type" {
            let kind = raw.trim().to_ascii_lowercase();
            return SETTLEMENT_TYPES
                .contains(&kind.as_str())
                .then_some(FieldValue::Text(kind));
        }
        field.field_type.coerce(raw)
    }
}
