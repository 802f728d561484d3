//! Naming policies mapping entity/property names to table/column names.

use crate::entity::{EntityMeta, PropertyInfo};
use crate::error::Result;
use crate::identifiers::validate_identifier;
use serde::{Deserialize, Serialize};

/// Naming policy applied when an entity or property has no explicit name.
///
/// Explicit table/column names declared in the metadata always win; the
/// policy only fills in the rest.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Naming {
    /// Use the name as declared.
    #[default]
    None,
    /// `employeeName` -> `employeename`
    LowerCase,
    /// `employeeName` -> `EMPLOYEENAME`
    UpperCase,
    /// `employeeName` -> `employee_name`
    SnakeLowerCase,
    /// `employeeName` -> `EMPLOYEE_NAME`
    SnakeUpperCase,
}

impl Naming {
    /// Apply the policy to a raw name.
    pub fn apply(self, name: &str) -> String {
        match self {
            Naming::None => name.to_string(),
            Naming::LowerCase => name.to_lowercase(),
            Naming::UpperCase => name.to_uppercase(),
            Naming::SnakeLowerCase => to_snake(name).to_lowercase(),
            Naming::SnakeUpperCase => to_snake(name).to_uppercase(),
        }
    }

    /// Table name for an entity, validated as an SQL identifier.
    pub fn table_name_for(self, meta: &EntityMeta) -> Result<String> {
        let name = match meta.table_name {
            Some(explicit) => explicit.to_string(),
            None => self.apply(meta.name),
        };
        validate_identifier(name)
    }

    /// Column name for a property, validated as an SQL identifier.
    pub fn column_name_for(self, property: &PropertyInfo) -> Result<String> {
        let name = match property.column_name {
            Some(explicit) => explicit.to_string(),
            None => self.apply(property.name),
        };
        validate_identifier(name)
    }
}

/// Insert `_` at word boundaries of a camel/pascal case name.
fn to_snake(name: &str) -> String {
    let chars: Vec<char> = name.chars().collect();
    let mut out = String::with_capacity(name.len() + 4);
    for (i, &c) in chars.iter().enumerate() {
        if c.is_uppercase() && i > 0 {
            let prev = chars[i - 1];
            let next_is_lower = chars.get(i + 1).is_some_and(|n| n.is_lowercase());
            if prev.is_lowercase() || prev.is_ascii_digit() || (prev.is_uppercase() && next_is_lower)
            {
                out.push('_');
            }
        }
        out.push(c);
    }
    out
}
