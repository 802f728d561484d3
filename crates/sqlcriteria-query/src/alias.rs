//! Table alias assignment for one statement.

use crate::def::{EntityDef, PropertyDef};
use sqlcriteria_core::{Error, Result};
use std::cell::Cell;

/// Issues `t0_`, `t1_`, ... aliases to the entities of one statement.
///
/// A sub-select gets a child manager whose lookups fall back to the parent, so
/// correlated references resolve to the outer alias. Children draw from the
/// root's counter, which keeps aliases unique across the whole statement.
#[derive(Debug)]
pub struct AliasManager<'p> {
    parent: Option<&'p AliasManager<'p>>,
    next: Cell<usize>,
    aliases: Vec<(EntityDef, String)>,
}

impl<'p> AliasManager<'p> {
    /// Manager for a top-level statement.
    pub fn new() -> Self {
        Self {
            parent: None,
            next: Cell::new(0),
            aliases: Vec::new(),
        }
    }

    /// Manager for a sub-select nested in `parent`.
    pub fn child(parent: &'p AliasManager<'p>) -> Self {
        Self {
            parent: Some(parent),
            next: Cell::new(0),
            aliases: Vec::new(),
        }
    }

    fn next_index(&self) -> usize {
        match self.parent {
            Some(parent) => parent.next_index(),
            None => {
                let index = self.next.get();
                self.next.set(index + 1);
                index
            }
        }
    }

    /// Register `entity` in this scope and return its alias.
    ///
    /// Registering an entity twice returns the alias issued the first time.
    pub fn register(&mut self, entity: EntityDef) -> &str {
        let position = match self.aliases.iter().position(|(e, _)| *e == entity) {
            Some(position) => position,
            None => {
                let alias = format!("t{}_", self.next_index());
                self.aliases.push((entity, alias));
                self.aliases.len() - 1
            }
        };
        &self.aliases[position].1
    }

    /// Alias of a registered entity, searching enclosing scopes.
    pub fn lookup(&self, entity: EntityDef) -> Option<&str> {
        self.aliases
            .iter()
            .find(|(e, _)| *e == entity)
            .map(|(_, alias)| alias.as_str())
            .or_else(|| self.parent.and_then(|parent| parent.lookup(entity)))
    }

    /// Alias of the entity owning `property`.
    ///
    /// Fails when the entity is neither the base table nor a join of this
    /// statement or an enclosing one.
    pub fn alias_for(&self, property: PropertyDef) -> Result<&str> {
        self.lookup(property.entity())
            .ok_or_else(|| Error::UnknownEntity {
                entity: property.entity().name().to_string(),
                property: property.name().to_string(),
            })
    }
}

impl Default for AliasManager<'_> {
    fn default() -> Self {
        Self::new()
    }
}
