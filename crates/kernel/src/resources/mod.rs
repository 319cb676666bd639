//! Resource descriptors.
//!
//! A resource is an entity type exposed as a listable collection
//! (landlords, flats, ...). The listing pipeline never looks at business
//! fields directly; it asks the resource which fields exist, how they are
//! typed, and how to coerce a raw query-string value for each of them.

mod builtin;
mod field;
mod registry;

pub use builtin::{Agreements, Flats, Landlords, Settlements, Tenants};
pub use field::{FieldDef, FieldType, FieldValue};
pub use registry::ResourceRegistry;

/// A listable collection of records of one entity type.
pub trait Resource: Send + Sync {
    /// Resource name as used in URLs (e.g. "flats").
    fn name(&self) -> &str;

    /// Every field stored for this resource, hidden ones included.
    fn fields(&self) -> &[FieldDef];

    /// Backing table. Defaults to the resource name.
    fn table(&self) -> &str {
        self.name()
    }

    /// Look up a visible field by name.
    ///
    /// Hidden fields are reported as absent so they can never be filtered,
    /// sorted or projected.
    fn field(&self, name: &str) -> Option<&FieldDef> {
        self.fields().iter().find(|f| f.name == name && !f.hidden)
    }

    /// Names of all visible fields, in declaration order.
    fn visible_fields(&self) -> Vec<&'static str> {
        self.fields()
            .iter()
            .filter(|f| !f.hidden)
            .map(|f| f.name)
            .collect()
    }

    /// Coerce a raw query-string value for `field`.
    ///
    /// Returning `None` drops the filter. Resources override this to add
    /// field-specific validation on top of the type-driven default.
    fn coerce(&self, field: &FieldDef, raw: &str) -> Option<FieldValue> {
        field.field_type.coerce(raw)
    }

    /// Logical endpoint name of the collection listing.
    fn endpoint(&self) -> String {
        format!("{}.list", self.name())
    }

    /// Path of the collection listing, relative to the API prefix.
    fn path(&self) -> String {
        format!("/{}", self.name())
    }
}
