//! Statement-building configuration.

use crate::dialect::Dialect;
use crate::prepared::SqlLogType;
use serde::{Deserialize, Serialize};
use sqlcriteria_core::{Error, Naming, Result};

/// Collaborators every builder needs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    /// Target database dialect
    pub dialect: Dialect,
    /// Naming policy for tables and columns
    pub naming: Naming,
    /// Which form of the SQL is written to the log
    #[serde(default)]
    pub sql_log_type: SqlLogType,
}

impl Config {
    /// Create a configuration with the default SQL log type.
    pub fn new(dialect: Dialect, naming: Naming) -> Self {
        Self {
            dialect,
            naming,
            sql_log_type: SqlLogType::default(),
        }
    }

    /// Start a builder with nothing set.
    pub fn builder() -> ConfigBuilder {
        ConfigBuilder::default()
    }

    /// Set the SQL log type.
    pub fn sql_log_type(mut self, sql_log_type: SqlLogType) -> Self {
        self.sql_log_type = sql_log_type;
        self
    }
}

/// Incremental [`Config`] construction that refuses to guess missing pieces.
#[derive(Debug, Clone, Default)]
pub struct ConfigBuilder {
    dialect: Option<Dialect>,
    naming: Option<Naming>,
    sql_log_type: Option<SqlLogType>,
}

impl ConfigBuilder {
    /// Set the dialect.
    pub fn dialect(mut self, dialect: Dialect) -> Self {
        self.dialect = Some(dialect);
        self
    }

    /// Set the naming policy.
    pub fn naming(mut self, naming: Naming) -> Self {
        self.naming = Some(naming);
        self
    }

    /// Set the SQL log type.
    pub fn sql_log_type(mut self, sql_log_type: SqlLogType) -> Self {
        self.sql_log_type = Some(sql_log_type);
        self
    }

    /// Finish, failing when the dialect or naming policy is missing.
    pub fn build(self) -> Result<Config> {
        let dialect = self
            .dialect
            .ok_or_else(|| Error::Config("dialect is required".to_string()))?;
        let naming = self
            .naming
            .ok_or_else(|| Error::Config("naming policy is required".to_string()))?;
        Ok(Config {
            dialect,
            naming,
            sql_log_type: self.sql_log_type.unwrap_or_default(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder_requires_dialect_and_naming() {
        let err = Config::builder().naming(Naming::None).build().unwrap_err();
        assert_eq!(err.to_string(), "configuration error: dialect is required");

        let err = Config::builder().dialect(Dialect::Mysql).build().unwrap_err();
        assert!(matches!(err, Error::Config(_)));

        let config = Config::builder()
            .dialect(Dialect::Mysql)
            .naming(Naming::SnakeUpperCase)
            .build()
            .unwrap();
        assert_eq!(config, Config::new(Dialect::Mysql, Naming::SnakeUpperCase));
    }

    #[test]
    fn test_deserialize_defaults_log_type() {
        let config: Config =
            serde_json::from_str(r#"{"dialect":"oracle","naming":"snake_upper_case"}"#).unwrap();
        assert_eq!(config.dialect, Dialect::Oracle);
        assert_eq!(config.naming, Naming::SnakeUpperCase);
        assert_eq!(config.sql_log_type, SqlLogType::Formatted);
    }

    #[test]
    fn test_deserialize_rejects_missing_dialect() {
        let parsed = serde_json::from_str::<Config>(r#"{"naming":"none"}"#);
        assert!(parsed.is_err());
    }
}
