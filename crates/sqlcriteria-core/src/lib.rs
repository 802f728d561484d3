//! Core types and traits for sqlcriteria.
//!
//! `sqlcriteria-core` is the **foundation layer** for the workspace. It defines the
//! contracts and data types that the compilation engine and the session build on.
//!
//! # Role In The Architecture
//!
//! - **Contract layer**: `Entity` is implemented by user types; `EntityMeta` and
//!   `PropertyInfo` are the static metadata the engine reads (ordered properties,
//!   identity properties, generated key).
//! - **Data model**: `Value` and `Row` carry bound parameters and result rows between
//!   the engine and an executor.
//! - **Naming**: `Naming` turns entity/property names into validated SQL identifiers.
//!
//! # Who Uses This Crate
//!
//! - `sqlcriteria-query` consumes entity metadata, `Naming` and `Value` to render SQL.
//! - `sqlcriteria-session` uses `Entity` snapshots and `Row` for lifecycle-aware DML.
//!
//! Most applications should use the `sqlcriteria` facade.

pub mod entity;
pub mod error;
pub mod identifiers;
pub mod naming;
pub mod row;
pub mod value;

pub use entity::{Entity, EntityMeta, PropertyInfo};
pub use error::{Error, Result};
pub use identifiers::{is_valid_identifier, validate_identifier};
pub use naming::Naming;
pub use row::Row;
pub use value::Value;
