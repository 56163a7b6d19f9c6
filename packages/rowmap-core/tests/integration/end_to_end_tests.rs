//! End-to-end workflow: declare, open, insert, select.

use ntest::timeout;
use tempfile::tempdir;

use rowmap_core::{MappingManager, OrmConfig, Record, TableBinding, Timestamp, Value};

use super::helpers::{config_at, user_schema};

#[timeout(5000)]
#[test]
fn test_user_round_trip() -> anyhow::Result<()> {
    let temp_dir = tempdir()?;
    let users = TableBinding::new("users", user_schema()?)?;
    let manager = MappingManager::open(&config_at(temp_dir.path()), vec![users])?;

    let user = Record::from_values(user_schema()?, [("username", "john_doe")])?;
    assert_eq!(manager.insert(&[user])?, 1);

    let records = manager.select("User")?.collect::<Result<Vec<_>, _>>()?;
    assert_eq!(records.len(), 1);

    let stored = &records[0];
    assert_eq!(stored.get_as::<i64>("id")?, 1);
    assert_eq!(stored.get_as::<String>("username")?, "john_doe");
    assert_eq!(stored.get("created_at")?.to_string(), "1970-01-01 00:00:00");

    manager.close()?;
    Ok(())
}

#[timeout(5000)]
#[test]
fn test_autoincrement_assigns_sequential_keys() -> anyhow::Result<()> {
    let temp_dir = tempdir()?;
    let users = TableBinding::new("users", user_schema()?)?;
    let manager = MappingManager::open(&config_at(temp_dir.path()), vec![users.clone()])?;

    let joined = Timestamp::new(2024, 2, 29, 12, 30, 0)?;
    let batch = vec![
        users.record([Value::from("alice"), Value::from(joined)])?,
        users.record([Value::from("bob"), Value::from(joined)])?,
        users.record([Value::from("carol"), Value::from(joined)])?,
    ];
    assert_eq!(manager.insert(&batch)?, 3);

    let records = manager.select("User")?.collect::<Result<Vec<_>, _>>()?;
    let ids: Vec<i64> = records
        .iter()
        .map(|r| r.get_as::<i64>("id"))
        .collect::<Result<_, _>>()?;
    assert_eq!(ids, vec![1, 2, 3]);

    for (record, original) in records.iter().zip(&batch) {
        assert_eq!(record.get_values(false), original.get_values(false));
        assert_eq!(record.get_as::<Timestamp>("created_at")?, joined);
    }
    Ok(())
}

#[timeout(5000)]
#[test]
fn test_hostile_text_is_stored_verbatim() -> anyhow::Result<()> {
    let users = TableBinding::new("users", user_schema()?)?;
    let manager = MappingManager::open(&OrmConfig::in_memory(), vec![users.clone()])?;

    let name = "x'); DROP TABLE users; --";
    manager.insert(&[users.record([Value::from(name), Value::from(Timestamp::epoch())])?])?;

    let records = manager.select("User")?.collect::<Result<Vec<_>, _>>()?;
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].get_as::<String>("username")?, name);
    Ok(())
}
