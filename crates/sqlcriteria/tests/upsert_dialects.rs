//! Upsert rendering across dialects.

mod common;

use common::{Department, config, department};
use sqlcriteria::prelude::*;

fn build(dialect: Dialect, context: &UpsertContext) -> Result<PreparedSql> {
    UpsertBuilder::new(&config(dialect), context).build(&no_comment)
}

fn by_identity(kind: DuplicateKeyType) -> UpsertContext {
    UpsertContext::from_entity(&department("SALES"), kind, Vec::new()).unwrap()
}

#[test]
fn switching_dialect_only_changes_conflict_clause() {
    let context = by_identity(DuplicateKeyType::Update);
    let postgres = build(Dialect::Postgres, &context).unwrap();
    let sqlite = build(Dialect::Sqlite, &context).unwrap();
    let mysql = build(Dialect::Mysql, &context).unwrap();

    assert_eq!(
        postgres.raw_sql(),
        "insert into dept (id, name, location) values ($1, $2, $3) \
         on conflict (id) do update set name = excluded.name, location = excluded.location"
    );
    assert_eq!(
        mysql.raw_sql(),
        "insert into dept (id, name, location) values (?, ?, ?) \
         on duplicate key update name = values(name), location = values(location)"
    );

    let prefix = |sql: &str| sql[..sql.find("values (").unwrap()].to_string();
    assert_eq!(prefix(postgres.raw_sql()), prefix(mysql.raw_sql()));
    assert_eq!(prefix(sqlite.raw_sql()), prefix(mysql.raw_sql()));
    assert_eq!(postgres.params(), mysql.params());
    assert_eq!(postgres.kind(), SqlKind::Upsert);
}

#[test]
fn ignore_per_dialect() {
    let context = by_identity(DuplicateKeyType::Ignore);
    assert!(
        build(Dialect::Postgres, &context)
            .unwrap()
            .raw_sql()
            .ends_with(" on conflict (id) do nothing")
    );
    assert!(
        build(Dialect::Mysql, &context)
            .unwrap()
            .raw_sql()
            .starts_with("insert ignore into dept (id, name, location)")
    );
    let oracle = build(Dialect::Oracle, &context).unwrap();
    assert!(!oracle.raw_sql().contains("when matched"));
    assert!(oracle.raw_sql().contains(" when not matched then insert "));
}

#[test]
fn oracle_merge_selects_from_dual() {
    let context = by_identity(DuplicateKeyType::Update);
    let sql = build(Dialect::Oracle, &context).unwrap();
    assert_eq!(
        sql.raw_sql(),
        "merge into dept target using (select :1 id, :2 name, :3 location from dual) excluded \
         on (target.id = excluded.id) \
         when matched then update set name = excluded.name, location = excluded.location \
         when not matched then insert (id, name, location) \
         values (excluded.id, excluded.name, excluded.location)"
    );
    assert_eq!(sql.params().len(), 3);
}

#[test]
fn mssql_merge_is_terminated() {
    let context = by_identity(DuplicateKeyType::Update);
    let sql = build(Dialect::Mssql, &context).unwrap();
    assert!(sql.raw_sql().starts_with(
        "merge into dept with (holdlock) as target using (values (@P1, @P2, @P3)) \
         as excluded (id, name, location) on (target.id = excluded.id)"
    ));
    assert!(sql.raw_sql().ends_with(';'));
}

#[test]
fn explicit_keys_replace_identity() {
    let d = EntityDef::of::<Department>();
    let context = UpsertContext::from_entity(
        &department("SALES"),
        DuplicateKeyType::Update,
        vec![d.property("name").unwrap()],
    )
    .unwrap();
    let sql = build(Dialect::Postgres, &context).unwrap();
    assert!(
        sql.raw_sql()
            .ends_with(" on conflict (name) do update set location = excluded.location")
    );
}

#[test]
fn exception_renders_plain_insert() {
    let context = by_identity(DuplicateKeyType::Exception);
    let sql = build(Dialect::Mysql, &context).unwrap();
    assert_eq!(
        sql.raw_sql(),
        "insert into dept (id, name, location) values (?, ?, ?)"
    );
}

#[test]
fn standard_dialect_has_no_upsert() {
    let err = build(Dialect::Standard, &by_identity(DuplicateKeyType::Update)).unwrap_err();
    assert!(matches!(
        err,
        Error::Unsupported {
            feature: "upsert",
            ..
        }
    ));
}
