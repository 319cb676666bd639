//! MyRent test utilities.
//!
//! Row fixtures shaped like the MyRent tables, plus assertion helpers for
//! listing responses.

use serde_json::{Value as JsonValue, json};

/// Create a test flat with default values.
pub fn test_flat(id: i64) -> TestFlat {
    TestFlat {
        id,
        identifier: format!("flat-{id}"),
        address: format!("Street {id}"),
        description: None,
        landlord_id: 1,
        tenant_id: None,
        created: "2020-10-01T12:00:00".to_string(),
    }
}

/// `n` flats with ids `1..=n`, in id order.
pub fn flat_rows(n: i64) -> Vec<JsonValue> {
    (1..=n).map(|id| test_flat(id).to_json()).collect()
}

/// A flat row builder.
#[derive(Debug, Clone)]
pub struct TestFlat {
    pub id: i64,
    pub identifier: String,
    pub address: String,
    pub description: Option<String>,
    pub landlord_id: i64,
    pub tenant_id: Option<i64>,
    pub created: String,
}

impl TestFlat {
    pub fn with_address(mut self, address: &str) -> Self {
        self.address = address.to_string();
        self
    }

    pub fn with_description(mut self, description: &str) -> Self {
        self.description = Some(description.to_string());
        self
    }

    /// Set the owning landlord.
    pub fn with_landlord(mut self, landlord_id: i64) -> Self {
        self.landlord_id = landlord_id;
        self
    }

    /// Set the current tenant.
    pub fn with_tenant(mut self, tenant_id: i64) -> Self {
        self.tenant_id = Some(tenant_id);
        self
    }

    pub fn with_created(mut self, created: &str) -> Self {
        self.created = created.to_string();
        self
    }

    pub fn to_json(&self) -> JsonValue {
        json!({
            "id": self.id,
            "identifier": self.identifier,
            "address": self.address,
            "description": self.description,
            "landlord_id": self.landlord_id,
            "tenant_id": self.tenant_id,
            "created": self.created,
            "updated": self.created,
        })
    }
}

/// Create a test tenant. The stored password is a placeholder hash.
pub fn test_tenant(id: i64, last_name: &str) -> TestTenant {
    TestTenant {
        id,
        first_name: "Jan".to_string(),
        last_name: last_name.to_string(),
        email: format!("tenant{id}@example.com"),
        landlord_id: 1,
    }
}

/// A tenant row builder.
#[derive(Debug, Clone)]
pub struct TestTenant {
    pub id: i64,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub landlord_id: i64,
}

impl TestTenant {
    pub fn with_first_name(mut self, first_name: &str) -> Self {
        self.first_name = first_name.to_string();
        self
    }

    pub fn with_landlord(mut self, landlord_id: i64) -> Self {
        self.landlord_id = landlord_id;
        self
    }

    pub fn to_json(&self) -> JsonValue {
        json!({
            "id": self.id,
            "identifier": format!("tenant-{}", self.id),
            "first_name": self.first_name,
            "last_name": self.last_name,
            "email": self.email,
            "landlord_id": self.landlord_id,
            "password": "$argon2id$placeholder",
        })
    }
}

/// Create a test settlement.
pub fn test_settlement(id: i64, kind: &str, date: &str, value: f64) -> TestSettlement {
    TestSettlement {
        id,
        kind: kind.to_string(),
        date: date.to_string(),
        value,
        tenant_id: 1,
        agreement_id: 1,
    }
}

/// A settlement row builder.
#[derive(Debug, Clone)]
pub struct TestSettlement {
    pub id: i64,
    pub kind: String,
    pub date: String,
    pub value: f64,
    pub tenant_id: i64,
    pub agreement_id: i64,
}

impl TestSettlement {
    pub fn with_tenant(mut self, tenant_id: i64) -> Self {
        self.tenant_id = tenant_id;
        self
    }

    pub fn with_agreement(mut self, agreement_id: i64) -> Self {
        self.agreement_id = agreement_id;
        self
    }

    pub fn to_json(&self) -> JsonValue {
        json!({
            "id": self.id,
            "type": self.kind,
            "date": self.date,
            "value": self.value,
            "tenant_id": self.tenant_id,
            "agreement_id": self.agreement_id,
        })
    }
}

/// Assertion helpers for JSON listings.
pub mod assert {
    use serde_json::Value;

    /// The `id` of every row, in order. Rows without an integer id are skipped.
    pub fn ids(rows: &[Value]) -> Vec<i64> {
        rows.iter()
            .filter_map(|row| row.get("id").and_then(Value::as_i64))
            .collect()
    }

    /// Assert that a JSON value has a specific key.
    pub fn has_key(value: &Value, key: &str) {
        assert!(
            value.get(key).is_some(),
            "Expected JSON to have key '{key}', got: {value}"
        );
    }

    /// Assert that a JSON value does not have a specific key.
    pub fn lacks_key(value: &Value, key: &str) {
        assert!(
            value.get(key).is_none(),
            "Expected JSON to lack key '{key}', got: {value}"
        );
    }

    /// Assert that every row carries exactly `keys`.
    pub fn row_keys(rows: &[Value], keys: &[&str]) {
        for row in rows {
            let mut actual: Vec<&str> = row
                .as_object()
                .map(|obj| obj.keys().map(String::as_str).collect())
                .unwrap_or_default();
            actual.sort_unstable();
            let mut expected = keys.to_vec();
            expected.sort_unstable();
            assert_eq!(actual, expected, "unexpected columns in row {row}");
        }
    }

    /// Assert that a string contains a substring.
    pub fn contains(haystack: &str, needle: &str) {
        assert!(
            haystack.contains(needle),
            "Expected string to contain '{needle}'\nActual: {haystack}"
        );
    }
}
