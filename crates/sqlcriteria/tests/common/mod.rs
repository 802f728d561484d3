#![allow(dead_code)]

use sqlcriteria::prelude::*;

static EMPLOYEE_PROPERTIES: &[PropertyInfo] = &[
    PropertyInfo::new("id").id(true).generated(true),
    PropertyInfo::new("name"),
    PropertyInfo::new("salary"),
    PropertyInfo::new("departmentId"),
];
pub static EMPLOYEE: EntityMeta = EntityMeta::new("Employee", EMPLOYEE_PROPERTIES);

#[derive(Debug, Clone, PartialEq)]
pub struct Employee {
    pub id: Option<i64>,
    pub name: String,
    pub salary: i32,
    pub department_id: Option<i64>,
}

impl Entity for Employee {
    const META: &'static EntityMeta = &EMPLOYEE;

    fn to_row(&self) -> Vec<(&'static str, Value)> {
        vec![
            ("id", self.id.into()),
            ("name", self.name.clone().into()),
            ("salary", self.salary.into()),
            ("departmentId", self.department_id.into()),
        ]
    }

    fn set_generated_key(&mut self, value: Value) {
        self.id = value.as_i64();
    }
}

static DEPARTMENT_PROPERTIES: &[PropertyInfo] = &[
    PropertyInfo::new("id").id(true),
    PropertyInfo::new("name"),
    PropertyInfo::new("location"),
];
pub static DEPARTMENT: EntityMeta =
    EntityMeta::new("Department", DEPARTMENT_PROPERTIES).table("dept");

#[derive(Debug, Clone, PartialEq)]
pub struct Department {
    pub id: i64,
    pub name: String,
    pub location: String,
}

impl Entity for Department {
    const META: &'static EntityMeta = &DEPARTMENT;

    fn to_row(&self) -> Vec<(&'static str, Value)> {
        vec![
            ("id", self.id.into()),
            ("name", self.name.clone().into()),
            ("location", self.location.clone().into()),
        ]
    }

    fn set_generated_key(&mut self, _value: Value) {}
}

pub fn employee(name: &str) -> Employee {
    Employee {
        id: None,
        name: name.to_string(),
        salary: 1000,
        department_id: Some(1),
    }
}

pub fn department(name: &str) -> Department {
    Department {
        id: 1,
        name: name.to_string(),
        location: "NEW YORK".to_string(),
    }
}

/// One executed statement.
#[derive(Debug, Clone, PartialEq)]
pub struct Executed {
    pub kind: SqlKind,
    pub sql: String,
    pub params: Vec<Value>,
}

/// Executor that records statements and hands out increasing keys.
#[derive(Debug, Default)]
pub struct RecordingExecutor {
    pub executed: Vec<Executed>,
    pub next_key: i64,
}

impl RecordingExecutor {
    fn record(&mut self, sql: &PreparedSql) {
        self.executed.push(Executed {
            kind: sql.kind(),
            sql: sql.raw_sql().to_string(),
            params: sql.params().to_vec(),
        });
    }
}

impl Executor for RecordingExecutor {
    fn execute(&mut self, sql: &PreparedSql) -> Result<u64> {
        self.record(sql);
        Ok(1)
    }

    fn query(&mut self, sql: &PreparedSql) -> Result<Vec<Row>> {
        self.record(sql);
        Ok(Vec::new())
    }

    fn insert(
        &mut self,
        sql: &PreparedSql,
        generated_key_column: Option<&str>,
    ) -> Result<InsertOutcome> {
        self.record(sql);
        match generated_key_column {
            Some(_) => {
                self.next_key += 1;
                Ok(InsertOutcome::with_key(1, self.next_key))
            }
            None => Ok(InsertOutcome::rows(1)),
        }
    }
}

pub fn config(dialect: Dialect) -> Config {
    Config::new(dialect, Naming::SnakeLowerCase)
}

/// Number of placeholders of `dialect` in `sql`.
pub fn count_placeholders(dialect: Dialect, sql: &str) -> usize {
    match dialect {
        Dialect::Standard | Dialect::Mysql | Dialect::Sqlite => sql.matches('?').count(),
        Dialect::Postgres => sql.matches('$').count(),
        Dialect::Oracle => sql.matches(':').count(),
        Dialect::Mssql => sql.matches("@P").count(),
    }
}
