//! Entity and property references used as statement participants.

use sqlcriteria_core::{Entity, EntityMeta, Error, PropertyInfo, Result};
use std::fmt;
use std::hash::{Hash, Hasher};

/// A reference to an entity type participating in a statement.
///
/// Two `EntityDef`s are the same participant when they point at the same
/// entity type with the same instance tag. The tag defaults to `0`; give a
/// second reference a different tag to join an entity with itself.
#[derive(Clone, Copy)]
pub struct EntityDef {
    meta: &'static EntityMeta,
    instance: u16,
}

impl EntityDef {
    /// Reference the entity type `E`.
    pub fn of<E: Entity>() -> Self {
        Self::new(E::META)
    }

    /// Reference an entity by its metadata.
    pub const fn new(meta: &'static EntityMeta) -> Self {
        Self { meta, instance: 0 }
    }

    /// A distinct participant of the same entity type.
    pub const fn instance(self, instance: u16) -> Self {
        Self {
            meta: self.meta,
            instance,
        }
    }

    /// Entity metadata.
    pub fn meta(&self) -> &'static EntityMeta {
        self.meta
    }

    /// Entity type name.
    pub fn name(&self) -> &'static str {
        self.meta.name
    }

    /// Look up one of the entity's properties.
    pub fn property(&self, name: &str) -> Result<PropertyDef> {
        self.meta
            .property(name)
            .map(|info| PropertyDef { entity: *self, info })
            .ok_or_else(|| Error::UnknownProperty {
                entity: self.meta.name.to_string(),
                property: name.to_string(),
            })
    }

    /// All persistent properties, in declaration order.
    pub fn properties(&self) -> Vec<PropertyDef> {
        self.meta
            .properties()
            .iter()
            .map(|info| PropertyDef { entity: *self, info })
            .collect()
    }

    /// Identity properties, in declaration order.
    pub fn id_properties(&self) -> Vec<PropertyDef> {
        self.meta
            .id_properties()
            .map(|info| PropertyDef { entity: *self, info })
            .collect()
    }

    /// The database-generated key property, if any.
    pub fn generated_key_property(&self) -> Option<PropertyDef> {
        self.meta
            .generated_key_property()
            .map(|info| PropertyDef { entity: *self, info })
    }
}

impl PartialEq for EntityDef {
    fn eq(&self, other: &Self) -> bool {
        self.meta.name == other.meta.name && self.instance == other.instance
    }
}

impl Eq for EntityDef {}

impl Hash for EntityDef {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.meta.name.hash(state);
        self.instance.hash(state);
    }
}

impl fmt::Debug for EntityDef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.instance == 0 {
            write!(f, "EntityDef({})", self.meta.name)
        } else {
            write!(f, "EntityDef({}#{})", self.meta.name, self.instance)
        }
    }
}

/// A reference to one persistent property of a participating entity.
#[derive(Clone, Copy)]
pub struct PropertyDef {
    entity: EntityDef,
    info: &'static PropertyInfo,
}

impl PropertyDef {
    /// The owning entity participant.
    pub fn entity(&self) -> EntityDef {
        self.entity
    }

    /// Property metadata.
    pub fn info(&self) -> &'static PropertyInfo {
        self.info
    }

    /// Property name.
    pub fn name(&self) -> &'static str {
        self.info.name
    }
}

impl PartialEq for PropertyDef {
    fn eq(&self, other: &Self) -> bool {
        self.entity == other.entity && self.info.name == other.info.name
    }
}

impl Eq for PropertyDef {}

impl Hash for PropertyDef {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.entity.hash(state);
        self.info.name.hash(state);
    }
}

impl fmt::Debug for PropertyDef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}.{}", self.entity, self.info.name)
    }
}
