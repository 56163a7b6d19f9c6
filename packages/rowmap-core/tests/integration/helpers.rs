//! Shared schemas and fixtures.

use std::path::Path;
use std::sync::Arc;

use rowmap_core::{Constraint, FieldDescriptor, OrmConfig, RecordSchema, TableBinding};

/// `User {id: INTEGER PRIMARY KEY AUTOINCREMENT, username: TEXT, created_at: TIMESTAMP}`
pub fn user_schema() -> anyhow::Result<Arc<RecordSchema>> {
    let schema = RecordSchema::builder("User")
        .field(
            "id",
            FieldDescriptor::integer()
                .with(Constraint::PrimaryKey)?
                .with(Constraint::AutoIncrement)?,
        )
        .field("username", FieldDescriptor::text())
        .field("created_at", FieldDescriptor::timestamp())
        .build()?;
    Ok(schema)
}

/// `Post` rows reference `users(id)`.
pub fn post_schema() -> anyhow::Result<Arc<RecordSchema>> {
    let schema = RecordSchema::builder("Post")
        .field(
            "id",
            FieldDescriptor::integer()
                .with(Constraint::PrimaryKey)?
                .with(Constraint::AutoIncrement)?,
        )
        .field(
            "author_id",
            FieldDescriptor::integer().with_named("REFERENCES users(id)")?,
        )
        .field("title", FieldDescriptor::text_sized(120)?)
        .field("published", FieldDescriptor::boolean())
        .field("score", FieldDescriptor::fixed_point(10, 2)?)
        .field("rating", FieldDescriptor::real())
        .field(
            "summary",
            FieldDescriptor::text().with(Constraint::Nullable)?,
        )
        .build()?;
    Ok(schema)
}

pub fn bindings() -> anyhow::Result<Vec<TableBinding>> {
    Ok(vec![
        TableBinding::new("users", user_schema()?)?,
        TableBinding::new("posts", post_schema()?)?,
    ])
}

pub fn config_at(dir: &Path) -> OrmConfig {
    OrmConfig::new(dir.join("database.db"))
}
