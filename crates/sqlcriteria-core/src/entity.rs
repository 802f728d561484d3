//! Entity and property metadata.
//!
//! Metadata is static and const-constructible so that generated code (or a
//! hand-written impl) can declare it once per entity type:
//!
//! ```
//! use sqlcriteria_core::{EntityMeta, PropertyInfo};
//!
//! static EMPLOYEE_PROPERTIES: &[PropertyInfo] = &[
//!     PropertyInfo::new("id").id(true).generated(true),
//!     PropertyInfo::new("name"),
//!     PropertyInfo::new("departmentId"),
//! ];
//! static EMPLOYEE: EntityMeta = EntityMeta::new("Employee", EMPLOYEE_PROPERTIES);
//!
//! assert_eq!(EMPLOYEE.id_properties().count(), 1);
//! assert_eq!(EMPLOYEE.generated_key_property().map(|p| p.name), Some("id"));
//! ```

use crate::value::Value;

/// Metadata about one persistent property of an entity.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PropertyInfo {
    /// Property name as declared on the entity
    pub name: &'static str,
    /// Explicit column name; the naming policy applies when absent
    pub column_name: Option<&'static str>,
    /// Whether this property is part of the identity
    pub id: bool,
    /// Whether the database generates this property's value on insert
    pub generated: bool,
    /// Whether the property is written by INSERT statements
    pub insertable: bool,
    /// Whether the property is written by UPDATE statements
    pub updatable: bool,
}

impl PropertyInfo {
    /// Create property metadata with default flags (insertable, updatable, not an id).
    pub const fn new(name: &'static str) -> Self {
        Self {
            name,
            column_name: None,
            id: false,
            generated: false,
            insertable: true,
            updatable: true,
        }
    }

    /// Set the database column name.
    pub const fn column(mut self, name: &'static str) -> Self {
        self.column_name = Some(name);
        self
    }

    /// Set identity flag.
    pub const fn id(mut self, value: bool) -> Self {
        self.id = value;
        self
    }

    /// Set database-generated flag.
    pub const fn generated(mut self, value: bool) -> Self {
        self.generated = value;
        self
    }

    /// Set insertable flag.
    pub const fn insertable(mut self, value: bool) -> Self {
        self.insertable = value;
        self
    }

    /// Set updatable flag.
    pub const fn updatable(mut self, value: bool) -> Self {
        self.updatable = value;
        self
    }
}

/// Metadata about an entity type: its name, table and ordered properties.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntityMeta {
    /// Entity type name
    pub name: &'static str,
    /// Explicit table name; the naming policy applies when absent
    pub table_name: Option<&'static str>,
    /// Persistent properties in declaration order
    pub properties: &'static [PropertyInfo],
}

impl EntityMeta {
    /// Create entity metadata.
    pub const fn new(name: &'static str, properties: &'static [PropertyInfo]) -> Self {
        Self {
            name,
            table_name: None,
            properties,
        }
    }

    /// Set the database table name.
    pub const fn table(mut self, name: &'static str) -> Self {
        self.table_name = Some(name);
        self
    }

    /// All persistent properties, in declaration order.
    pub fn properties(&self) -> &'static [PropertyInfo] {
        self.properties
    }

    /// Identity properties, in declaration order.
    pub fn id_properties(&self) -> impl Iterator<Item = &'static PropertyInfo> {
        self.properties.iter().filter(|p| p.id)
    }

    /// The property whose value the database generates, if any.
    pub fn generated_key_property(&self) -> Option<&'static PropertyInfo> {
        self.properties.iter().find(|p| p.generated)
    }

    /// Look up a property by name.
    pub fn property(&self, name: &str) -> Option<&'static PropertyInfo> {
        self.properties.iter().find(|p| p.name == name)
    }
}

/// A persistent entity type.
///
/// Implementations hand the engine an immutable snapshot of their values via
/// [`Entity::to_row`]; the engine never mutates an entity except through
/// [`Entity::set_generated_key`].
pub trait Entity: Clone + Send + Sync + 'static {
    /// Static metadata for this entity type.
    const META: &'static EntityMeta;

    /// Property values keyed by property name, in declaration order.
    fn to_row(&self) -> Vec<(&'static str, Value)>;

    /// Write a database-generated key into this snapshot.
    fn set_generated_key(&mut self, value: Value);

    /// Value of a single property.
    fn value_of(&self, property: &str) -> Option<Value> {
        self.to_row()
            .into_iter()
            .find(|(name, _)| *name == property)
            .map(|(_, value)| value)
    }

    /// Identity values, in declaration order.
    fn id_values(&self) -> Vec<Value> {
        let row = self.to_row();
        Self::META
            .id_properties()
            .map(|p| {
                row.iter()
                    .find(|(name, _)| *name == p.name)
                    .map_or(Value::Null, |(_, v)| v.clone())
            })
            .collect()
    }
}
