//! Mock entities shared by unit tests.

use sqlcriteria_core::{Entity, EntityMeta, Naming, PropertyInfo, Value};

use crate::config::Config;
use crate::def::EntityDef;
use crate::dialect::Dialect;

static EMPLOYEE_PROPERTIES: &[PropertyInfo] = &[
    PropertyInfo::new("id").id(true).generated(true),
    PropertyInfo::new("name"),
    PropertyInfo::new("salary"),
    PropertyInfo::new("departmentId"),
];
pub static EMPLOYEE: EntityMeta = EntityMeta::new("Employee", EMPLOYEE_PROPERTIES);

static DEPARTMENT_PROPERTIES: &[PropertyInfo] = &[
    PropertyInfo::new("id").id(true),
    PropertyInfo::new("name"),
    PropertyInfo::new("location").updatable(false),
];
pub static DEPARTMENT: EntityMeta = EntityMeta::new("Department", DEPARTMENT_PROPERTIES);

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

pub fn employee() -> EntityDef {
    EntityDef::new(&EMPLOYEE)
}

pub fn department() -> EntityDef {
    EntityDef::new(&DEPARTMENT)
}

pub fn config(dialect: Dialect) -> Config {
    Config::new(dialect, Naming::SnakeLowerCase)
}
