//! Entity-based DML builders.
//!
//! These builders derive INSERT, UPDATE and DELETE statements from one entity
//! snapshot and its metadata:
//! - INSERT writes every insertable property, skipping a generated key that is still NULL
//! - UPDATE sets updatable non-identity properties and matches on the identity
//! - DELETE matches on the identity
//!
//! Statements address the table without an alias.

use crate::config::Config;
use crate::prepared::{Commenter, PreparedSql, PreparedSqlBuilder, SqlKind};
use sqlcriteria_core::{Entity, Error, PropertyInfo, Result, Value};

const COMMA: &str = ", ";
const AND: &str = " and ";

fn lookup(row: &[(&'static str, Value)], property: &PropertyInfo) -> Value {
    row.iter()
        .find(|(name, _)| *name == property.name)
        .map_or(Value::Null, |(_, value)| value.clone())
}

fn id_condition<E: Entity>(
    config: &Config,
    entity: &E,
    sql: &mut PreparedSqlBuilder,
) -> Result<()> {
    let meta = E::META;
    if meta.id_properties().next().is_none() {
        return Err(Error::Structure(format!(
            "entity `{}` has no identity properties",
            meta.name
        )));
    }
    sql.append_sql(" where ");
    for (property, value) in meta.id_properties().zip(entity.id_values()) {
        sql.append_sql(&config.naming.column_name_for(property)?);
        sql.append_sql(" = ");
        sql.append_param(value);
        sql.append_sql(AND);
    }
    sql.cut_back_sql(AND.len());
    Ok(())
}

/// INSERT builder for one entity.
///
/// # Example
///
/// ```ignore
/// let sql = EntityInsertBuilder::new(&config, &employee).build(&no_comment)?;
/// ```
#[derive(Debug)]
pub struct EntityInsertBuilder<'a, E: Entity> {
    config: &'a Config,
    entity: &'a E,
}

impl<'a, E: Entity> EntityInsertBuilder<'a, E> {
    /// Create a new INSERT builder for the given entity.
    pub fn new(config: &'a Config, entity: &'a E) -> Self {
        Self { config, entity }
    }

    /// Column of the generated key when the database must produce it.
    pub fn generated_key_column(&self) -> Result<Option<String>> {
        let Some(property) = E::META.generated_key_property() else {
            return Ok(None);
        };
        if self.entity.value_of(property.name).is_some_and(|v| !v.is_null()) {
            return Ok(None);
        }
        self.config.naming.column_name_for(property).map(Some)
    }

    /// Build the INSERT statement.
    pub fn build(&self, commenter: &Commenter) -> Result<PreparedSql> {
        let meta = E::META;
        let row = self.entity.to_row();
        let columns: Vec<(&PropertyInfo, Value)> = meta
            .properties()
            .iter()
            .filter(|p| p.insertable)
            .map(|p| (p, lookup(&row, p)))
            .filter(|(p, value)| !(p.generated && value.is_null()))
            .collect();
        if columns.is_empty() {
            return Err(Error::Structure(format!(
                "entity `{}` has no insertable properties",
                meta.name
            )));
        }

        let mut sql =
            PreparedSqlBuilder::new(SqlKind::Insert, self.config.dialect, self.config.sql_log_type);
        sql.append_sql("insert into ");
        sql.append_sql(&self.config.naming.table_name_for(meta)?);
        sql.append_sql(" (");
        for (property, _) in &columns {
            sql.append_sql(&self.config.naming.column_name_for(property)?);
            sql.append_sql(COMMA);
        }
        sql.cut_back_sql(COMMA.len());
        sql.append_sql(") values (");
        for (_, value) in columns {
            sql.append_param(value);
            sql.append_sql(COMMA);
        }
        sql.cut_back_sql(COMMA.len());
        sql.append_sql(")");
        Ok(sql.build(commenter))
    }
}

/// UPDATE builder for one entity, matching on its identity.
#[derive(Debug)]
pub struct EntityUpdateBuilder<'a, E: Entity> {
    config: &'a Config,
    entity: &'a E,
    set_only: Option<Vec<&'a str>>,
}

impl<'a, E: Entity> EntityUpdateBuilder<'a, E> {
    /// Create a new UPDATE builder for the given entity.
    pub fn new(config: &'a Config, entity: &'a E) -> Self {
        Self {
            config,
            entity,
            set_only: None,
        }
    }

    /// Only update the named properties.
    pub fn set_only(mut self, properties: &[&'a str]) -> Self {
        self.set_only = Some(properties.to_vec());
        self
    }

    fn targets(&self) -> impl Iterator<Item = &'static PropertyInfo> + '_ {
        E::META.properties().iter().filter(move |p| {
            p.updatable
                && !p.id
                && self
                    .set_only
                    .as_ref()
                    .is_none_or(|only| only.contains(&p.name))
        })
    }

    /// False when no property would be set; executing such an update is skipped.
    pub fn is_executable(&self) -> bool {
        self.targets().next().is_some()
    }

    /// Build the UPDATE statement.
    pub fn build(&self, commenter: &Commenter) -> Result<PreparedSql> {
        let meta = E::META;
        if !self.is_executable() {
            return Err(Error::Structure(format!(
                "update of `{}` has nothing to set",
                meta.name
            )));
        }
        let row = self.entity.to_row();
        let mut sql =
            PreparedSqlBuilder::new(SqlKind::Update, self.config.dialect, self.config.sql_log_type);
        sql.append_sql("update ");
        sql.append_sql(&self.config.naming.table_name_for(meta)?);
        sql.append_sql(" set ");
        for property in self.targets() {
            sql.append_sql(&self.config.naming.column_name_for(property)?);
            sql.append_sql(" = ");
            sql.append_param(lookup(&row, property));
            sql.append_sql(COMMA);
        }
        sql.cut_back_sql(COMMA.len());
        id_condition(self.config, self.entity, &mut sql)?;
        Ok(sql.build(commenter))
    }
}

/// DELETE builder for one entity, matching on its identity.
#[derive(Debug)]
pub struct EntityDeleteBuilder<'a, E: Entity> {
    config: &'a Config,
    entity: &'a E,
}

impl<'a, E: Entity> EntityDeleteBuilder<'a, E> {
    /// Create a new DELETE builder for the given entity.
    pub fn new(config: &'a Config, entity: &'a E) -> Self {
        Self { config, entity }
    }

    /// Build the DELETE statement.
    pub fn build(&self, commenter: &Commenter) -> Result<PreparedSql> {
        let meta = E::META;
        let mut sql =
            PreparedSqlBuilder::new(SqlKind::Delete, self.config.dialect, self.config.sql_log_type);
        sql.append_sql("delete from ");
        sql.append_sql(&self.config.naming.table_name_for(meta)?);
        id_condition(self.config, self.entity, &mut sql)?;
        Ok(sql.build(commenter))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dialect::Dialect;
    use crate::prepared::no_comment;
    use crate::testing::{Department, Employee, config};
    use sqlcriteria_core::{EntityMeta, Naming};

    fn employee(id: Option<i64>) -> Employee {
        Employee {
            id,
            name: "SMITH".to_string(),
            salary: 800,
            department_id: Some(20),
        }
    }

    #[test]
    fn test_insert_skips_null_generated_key() {
        let emp = employee(None);
        let cfg = config(Dialect::Postgres);
        let builder = EntityInsertBuilder::new(&cfg, &emp);
        let sql = builder.build(&no_comment).unwrap();
        assert_eq!(
            sql.raw_sql(),
            "insert into employee (name, salary, department_id) values ($1, $2, $3)"
        );
        assert_eq!(
            sql.params(),
            &[Value::from("SMITH"), Value::Int(800), Value::BigInt(20)]
        );
        assert_eq!(builder.generated_key_column().unwrap().as_deref(), Some("id"));
    }

    #[test]
    fn test_insert_keeps_assigned_key() {
        let emp = employee(Some(9));
        let cfg = config(Dialect::Mysql);
        let builder = EntityInsertBuilder::new(&cfg, &emp);
        let sql = builder.build(&no_comment).unwrap();
        assert_eq!(
            sql.raw_sql(),
            "insert into employee (id, name, salary, department_id) values (?, ?, ?, ?)"
        );
        assert_eq!(builder.generated_key_column().unwrap(), None);
    }

    #[test]
    fn test_update_by_identity() {
        let emp = employee(Some(9));
        let sql = EntityUpdateBuilder::new(&config(Dialect::Sqlite), &emp)
            .build(&no_comment)
            .unwrap();
        assert_eq!(
            sql.raw_sql(),
            "update employee set name = ?1, salary = ?2, department_id = ?3 where id = ?4"
        );
        assert_eq!(sql.params().last(), Some(&Value::BigInt(9)));
    }

    #[test]
    fn test_update_set_only_and_executable() {
        let dept = Department {
            id: 1,
            name: "SALES".to_string(),
            location: "CHICAGO".to_string(),
        };
        let cfg = config(Dialect::Postgres);
        let sql = EntityUpdateBuilder::new(&cfg, &dept)
            .build(&no_comment)
            .unwrap();
        assert_eq!(sql.raw_sql(), "update department set name = $1 where id = $2");

        let nothing = EntityUpdateBuilder::new(&cfg, &dept).set_only(&["location"]);
        assert!(!nothing.is_executable());
        assert!(matches!(
            nothing.build(&no_comment).unwrap_err(),
            Error::Structure(_)
        ));
    }

    #[test]
    fn test_delete_by_identity() {
        let dept = Department {
            id: 4,
            name: "OPERATIONS".to_string(),
            location: "BOSTON".to_string(),
        };
        let cfg = Config::new(Dialect::Oracle, Naming::SnakeUpperCase);
        let sql = EntityDeleteBuilder::new(&cfg, &dept)
            .build(&no_comment)
            .unwrap();
        assert_eq!(sql.raw_sql(), "delete from DEPARTMENT where ID = :1");
        assert_eq!(sql.formatted_sql(), "delete from DEPARTMENT where ID = 4");
    }

    #[derive(Clone)]
    struct AuditLog {
        message: String,
    }

    static AUDIT_PROPERTIES: &[PropertyInfo] = &[PropertyInfo::new("message")];
    static AUDIT: EntityMeta = EntityMeta::new("AuditLog", AUDIT_PROPERTIES);

    impl Entity for AuditLog {
        const META: &'static EntityMeta = &AUDIT;

        fn to_row(&self) -> Vec<(&'static str, Value)> {
            vec![("message", self.message.clone().into())]
        }

        fn set_generated_key(&mut self, _value: Value) {}
    }

    #[test]
    fn test_identity_required_for_update_and_delete() {
        let log = AuditLog {
            message: "hi".to_string(),
        };
        let cfg = config(Dialect::Postgres);
        let err = EntityDeleteBuilder::new(&cfg, &log)
            .build(&no_comment)
            .unwrap_err();
        assert!(matches!(err, Error::Structure(_)));
        let err = EntityUpdateBuilder::new(&cfg, &log)
            .build(&no_comment)
            .unwrap_err();
        assert!(matches!(err, Error::Structure(_)));
    }
}
