//! Manager lifecycle and type fidelity through SQLite.

use ntest::timeout;
use tempfile::tempdir;

use rowmap_core::{
    Constraint, FieldDescriptor, MappingManager, OrmConfig, OrmError, Record, RecordSchema,
    TableBinding, Value,
};

use super::helpers::{bindings, config_at, post_schema, user_schema};

fn post(author_id: i64, title: &str) -> anyhow::Result<Record> {
    let record = Record::from_values(
        post_schema()?,
        [
            ("author_id", Value::from(author_id)),
            ("title", Value::from(title)),
            ("published", Value::from(true)),
            ("score", Value::from(3.0)),
            ("rating", Value::from(4.25)),
            ("summary", Value::Null),
        ],
    )?;
    Ok(record)
}

#[timeout(5000)]
#[test]
fn test_reopen_keeps_tables_and_rows() -> anyhow::Result<()> {
    let temp_dir = tempdir()?;
    let config = config_at(temp_dir.path());

    {
        let manager = MappingManager::open(&config, bindings()?)?;
        let user = Record::from_values(user_schema()?, [("username", "jane")])?;
        manager.insert(&[user])?;
        manager.close()?;
    }

    // CREATE TABLE IF NOT EXISTS makes the second open a no-op on schema.
    let manager = MappingManager::open(&config, bindings()?)?;
    let records = manager.select("User")?.collect::<Result<Vec<_>, _>>()?;
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].get_as::<String>("username")?, "jane");
    Ok(())
}

#[timeout(5000)]
#[test]
fn test_drop_commits_pending_inserts() -> anyhow::Result<()> {
    let temp_dir = tempdir()?;
    let config = config_at(temp_dir.path());

    {
        let manager = MappingManager::open(&config, bindings()?)?;
        manager.insert(&[Record::from_values(user_schema()?, [("username", "dropped")])?])?;
    }

    let manager = MappingManager::open(&config, bindings()?)?;
    assert_eq!(manager.select("User")?.len(), 1);
    Ok(())
}

#[timeout(5000)]
#[test]
fn test_field_types_survive_storage() -> anyhow::Result<()> {
    let manager = MappingManager::open(&OrmConfig::in_memory(), bindings()?)?;
    manager.insert(&[Record::from_values(user_schema()?, [("username", "author")])?])?;

    let mut with_summary = post(1, "second")?;
    with_summary.set("published", false)?.set("score", 12.75)?;
    with_summary.set("summary", "short")?;
    manager.insert(&[post(1, "first")?, with_summary.clone()])?;

    let posts = manager.select("Post")?.collect::<Result<Vec<_>, _>>()?;
    assert_eq!(posts.len(), 2);

    let first = &posts[0];
    assert_eq!(first.get("author_id")?, &Value::Integer(1));
    assert_eq!(first.get("published")?, &Value::Boolean(true));
    // Whole numbers come back from the fixed point column as reals.
    assert_eq!(first.get("score")?, &Value::Real(3.0));
    assert_eq!(first.get("rating")?, &Value::Real(4.25));
    assert_eq!(first.get("summary")?, &Value::Null);

    let second = &posts[1];
    assert_eq!(second.get_values(false), with_summary.get_values(false));
    Ok(())
}

#[timeout(5000)]
#[test]
fn test_foreign_key_enforced() -> anyhow::Result<()> {
    let manager = MappingManager::open(&OrmConfig::in_memory(), bindings()?)?;

    let err = manager.insert(&[post(42, "orphan")?]).unwrap_err();
    match err {
        OrmError::Engine { table, statement, .. } => {
            assert_eq!(table, "posts");
            assert!(statement.starts_with("INSERT INTO posts"));
        }
        other => panic!("expected engine error, got {:?}", other),
    }
    Ok(())
}

#[timeout(5000)]
#[test]
fn test_foreign_keys_can_be_disabled() -> anyhow::Result<()> {
    let config = OrmConfig {
        enforce_foreign_keys: false,
        ..OrmConfig::in_memory()
    };
    let manager = MappingManager::open(&config, bindings()?)?;

    assert_eq!(manager.insert(&[post(42, "orphan")?])?, 1);
    Ok(())
}

#[timeout(5000)]
#[test]
fn test_insert_with_primary_key() -> anyhow::Result<()> {
    let manager = MappingManager::open(&OrmConfig::in_memory(), bindings()?)?;

    let mut user = Record::from_values(user_schema()?, [("username", "pinned")])?;
    user.set("id", 7)?;
    assert_eq!(manager.insert_with_primary_key(&[user])?, 1);

    let records = manager.select("User")?.collect::<Result<Vec<_>, _>>()?;
    assert_eq!(records[0].get_as::<i64>("id")?, 7);

    // Same key again violates the primary key.
    let mut duplicate = Record::from_values(user_schema()?, [("username", "again")])?;
    duplicate.set("id", 7)?;
    let err = manager.insert_with_primary_key(&[duplicate]).unwrap_err();
    assert!(err.is_engine_error());
    Ok(())
}

#[timeout(5000)]
#[test]
fn test_select_is_lazy_and_repeatable() -> anyhow::Result<()> {
    let manager = MappingManager::open(&OrmConfig::in_memory(), bindings()?)?;
    let schema = user_schema()?;
    let users = ["a", "b", "c"]
        .iter()
        .map(|name| Record::from_values(schema.clone(), [("username", *name)]))
        .collect::<Result<Vec<_>, _>>()?;
    manager.insert(&users)?;

    let mut records = manager.select("User")?;
    assert_eq!(records.len(), 3);
    let first = records.next().transpose()?;
    assert_eq!(
        first.map(|r| r.get_as::<String>("username")).transpose()?,
        Some("a".to_string())
    );
    assert_eq!(records.len(), 2);

    assert_eq!(manager.select("User")?.count(), 3);
    Ok(())
}

#[timeout(5000)]
#[test]
fn test_empty_table_selects_nothing() -> anyhow::Result<()> {
    let manager = MappingManager::open(&OrmConfig::in_memory(), bindings()?)?;
    assert_eq!(manager.select("Post")?.count(), 0);
    assert_eq!(manager.insert(&[])?, 0);
    Ok(())
}

#[timeout(5000)]
#[test]
fn test_closed_manager_rejects_operations() -> anyhow::Result<()> {
    let manager = MappingManager::open(&OrmConfig::in_memory(), bindings()?)?;
    manager.close()?;

    let user = Record::from_values(user_schema()?, [("username", "late")])?;
    assert!(matches!(manager.insert(&[user]), Err(OrmError::ManagerClosed)));
    assert!(matches!(manager.select("User"), Err(OrmError::ManagerClosed)));
    assert!(matches!(manager.close(), Err(OrmError::ManagerClosed)));
    Ok(())
}

#[timeout(5000)]
#[test]
fn test_open_fails_on_unwritable_path() -> anyhow::Result<()> {
    let temp_dir = tempdir()?;
    let config = OrmConfig::new(temp_dir.path().join("missing").join("database.db"));

    let err = MappingManager::open(&config, bindings()?).unwrap_err();
    assert!(matches!(err, OrmError::Connection { .. }));
    Ok(())
}

#[timeout(5000)]
#[test]
fn test_text_primary_key_round_trip() -> anyhow::Result<()> {
    let schema = RecordSchema::builder("Item")
        .field(
            "code",
            FieldDescriptor::text().with(Constraint::PrimaryKey)?,
        )
        .field("b", FieldDescriptor::real())
        .build()?;
    let items = TableBinding::new("items", schema.clone())?;
    let manager = MappingManager::open(&OrmConfig::in_memory(), vec![items])?;

    let item = Record::from_values(schema, [("code", Value::from("X1")), ("b", Value::from(1.5))])?;
    assert!(matches!(
        manager.insert(&[item.clone()]),
        Err(OrmError::UnassignablePrimaryKey { .. })
    ));
    assert_eq!(manager.select("Item")?.count(), 0);

    assert_eq!(manager.insert_with_primary_key(&[item.clone()])?, 1);
    let records = manager.select("Item")?.collect::<Result<Vec<_>, _>>()?;
    assert_eq!(records, vec![item]);
    Ok(())
}

#[timeout(5000)]
#[test]
fn test_nan_never_reaches_the_table() -> anyhow::Result<()> {
    let manager = MappingManager::open(&OrmConfig::in_memory(), bindings()?)?;
    manager.insert(&[Record::from_values(user_schema()?, [("username", "author")])?])?;

    let mut record = post(1, "nan")?;
    assert!(matches!(
        record.set("rating", f64::NAN),
        Err(OrmError::TypeMismatch { .. })
    ));
    manager.insert(&[record])?;

    let posts = manager.select("Post")?.collect::<Result<Vec<_>, _>>()?;
    assert_eq!(posts.len(), 1);
    assert_eq!(posts[0].get("rating")?, &Value::Real(4.25));
    Ok(())
}
