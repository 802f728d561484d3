//! Entity lifecycle hooks.
//!
//! A listener is registered for one entity type and is called before and
//! after each insert, update and delete of that type. Instead of mutating the
//! entity it is handed, a hook returns a [`Replacement`]; the session applies
//! it and continues with the replacement as the current snapshot.
//!
//! # Example
//!
//! ```ignore
//! struct StampName;
//!
//! impl EntityListener<Department> for StampName {
//!     fn pre_insert(&self, ctx: &PreInsertContext<'_, Department>) -> Result<Replacement<Department>> {
//!         let mut dept = ctx.entity().clone();
//!         dept.name = format!("{}_{}", dept.name, &ctx.duplicate_key_type().as_str()[..1]);
//!         Ok(Replacement::With(dept))
//!     }
//! }
//! ```

use sqlcriteria_core::{Entity, Result};
use sqlcriteria_query::{DuplicateKeyType, EntityDef};
use std::any::{Any, TypeId};
use std::collections::HashMap;
use std::sync::Arc;

/// Outcome of a lifecycle hook.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Replacement<E> {
    /// Keep the current snapshot.
    #[default]
    Unchanged,
    /// Continue the operation with this snapshot.
    With(E),
}

impl<E> Replacement<E> {
    /// Apply to `current`; returns whether it was replaced.
    pub fn apply(self, current: &mut E) -> bool {
        match self {
            Replacement::Unchanged => false,
            Replacement::With(entity) => {
                *current = entity;
                true
            }
        }
    }
}

/// Context of a hook that runs before the statement executes.
#[derive(Debug)]
pub struct PreContext<'a, E> {
    entity: &'a E,
    entity_def: EntityDef,
    duplicate_key_type: DuplicateKeyType,
}

impl<'a, E: Entity> PreContext<'a, E> {
    pub(crate) fn new(entity: &'a E, duplicate_key_type: DuplicateKeyType) -> Self {
        Self {
            entity,
            entity_def: EntityDef::of::<E>(),
            duplicate_key_type,
        }
    }

    /// Current snapshot.
    pub fn entity(&self) -> &E {
        self.entity
    }

    /// Metadata of the entity type.
    pub fn entity_def(&self) -> EntityDef {
        self.entity_def
    }
}

/// Context of a hook that runs after the statement executed.
#[derive(Debug)]
pub struct PostContext<'a, E> {
    entity: &'a E,
    entity_def: EntityDef,
    duplicate_key_type: DuplicateKeyType,
    rows_affected: u64,
}

impl<'a, E: Entity> PostContext<'a, E> {
    pub(crate) fn new(entity: &'a E, duplicate_key_type: DuplicateKeyType, rows_affected: u64) -> Self {
        Self {
            entity,
            entity_def: EntityDef::of::<E>(),
            duplicate_key_type,
            rows_affected,
        }
    }

    /// Current snapshot, including any generated key.
    pub fn entity(&self) -> &E {
        self.entity
    }

    /// Metadata of the entity type.
    pub fn entity_def(&self) -> EntityDef {
        self.entity_def
    }

    /// Rows the statement affected; zero when execution was skipped.
    pub fn rows_affected(&self) -> u64 {
        self.rows_affected
    }
}

/// Context passed to [`EntityListener::pre_insert`].
pub type PreInsertContext<'a, E> = PreContext<'a, E>;
/// Context passed to [`EntityListener::post_insert`].
pub type PostInsertContext<'a, E> = PostContext<'a, E>;
/// Context passed to [`EntityListener::pre_update`].
pub type PreUpdateContext<'a, E> = PreContext<'a, E>;
/// Context passed to [`EntityListener::post_update`].
pub type PostUpdateContext<'a, E> = PostContext<'a, E>;
/// Context passed to [`EntityListener::pre_delete`].
pub type PreDeleteContext<'a, E> = PreContext<'a, E>;
/// Context passed to [`EntityListener::post_delete`].
pub type PostDeleteContext<'a, E> = PostContext<'a, E>;

impl<E> PreContext<'_, E> {
    /// Duplicate-key handling of the insert: `Exception` for a plain insert,
    /// the requested type for an upsert.
    pub fn duplicate_key_type(&self) -> DuplicateKeyType {
        self.duplicate_key_type
    }
}

impl<E> PostContext<'_, E> {
    /// Duplicate-key handling of the insert: `Exception` for a plain insert,
    /// the requested type for an upsert.
    pub fn duplicate_key_type(&self) -> DuplicateKeyType {
        self.duplicate_key_type
    }
}

/// Hooks around the persistence of one entity type. All hooks default to
/// [`Replacement::Unchanged`].
///
/// An error returned by a hook aborts the operation and reaches the caller
/// unchanged.
pub trait EntityListener<E: Entity>: Send + Sync {
    fn pre_insert(&self, _ctx: &PreInsertContext<'_, E>) -> Result<Replacement<E>> {
        Ok(Replacement::Unchanged)
    }

    fn post_insert(&self, _ctx: &PostInsertContext<'_, E>) -> Result<Replacement<E>> {
        Ok(Replacement::Unchanged)
    }

    fn pre_update(&self, _ctx: &PreUpdateContext<'_, E>) -> Result<Replacement<E>> {
        Ok(Replacement::Unchanged)
    }

    fn post_update(&self, _ctx: &PostUpdateContext<'_, E>) -> Result<Replacement<E>> {
        Ok(Replacement::Unchanged)
    }

    fn pre_delete(&self, _ctx: &PreDeleteContext<'_, E>) -> Result<Replacement<E>> {
        Ok(Replacement::Unchanged)
    }

    fn post_delete(&self, _ctx: &PostDeleteContext<'_, E>) -> Result<Replacement<E>> {
        Ok(Replacement::Unchanged)
    }
}

type Listeners<E> = Vec<Arc<dyn EntityListener<E>>>;

/// Listeners keyed by entity type, kept in registration order.
#[derive(Default)]
pub struct ListenerRegistry {
    by_type: HashMap<TypeId, Box<dyn Any + Send + Sync>>,
}

impl ListenerRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `listener` for entity type `E`.
    pub fn register<E, L>(&mut self, listener: L)
    where
        E: Entity,
        L: EntityListener<E> + 'static,
    {
        let slot = self
            .by_type
            .entry(TypeId::of::<E>())
            .or_insert_with(|| Box::new(Listeners::<E>::new()));
        if let Some(listeners) = slot.downcast_mut::<Listeners<E>>() {
            listeners.push(Arc::new(listener));
        }
        tracing::debug!(entity = E::META.name, "Registered entity listener");
    }

    /// Listeners for `E`, in registration order.
    pub fn listeners<E: Entity>(&self) -> &[Arc<dyn EntityListener<E>>] {
        self.by_type
            .get(&TypeId::of::<E>())
            .and_then(|slot| slot.downcast_ref::<Listeners<E>>())
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    /// Run `hook` on every listener for `E`. Each listener sees the snapshot
    /// left by the previous one.
    pub(crate) fn chain<E, F>(&self, mut entity: E, hook: F) -> Result<E>
    where
        E: Entity,
        F: Fn(&dyn EntityListener<E>, &E) -> Result<Replacement<E>>,
    {
        for listener in self.listeners::<E>() {
            if hook(listener.as_ref(), &entity)?.apply(&mut entity) {
                tracing::debug!(entity = E::META.name, "Listener replaced entity");
            }
        }
        Ok(entity)
    }
}

impl std::fmt::Debug for ListenerRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ListenerRegistry")
            .field("entity_types", &self.by_type.len())
            .finish()
    }
}
