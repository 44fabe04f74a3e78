#![cfg(feature = "sqlite")]

use store_middleware::prelude::*;
use tokio::runtime::Runtime;

#[test]
fn unique_index_enforces_and_drops() -> Result<(), Box<dyn std::error::Error>> {
    let rt = Runtime::new()?;
    rt.block_on(async {
        let mut db = SqliteAdapter::new(SqliteConfig::new(":memory:"));
        db.connect().await?;
        db.create_table(
            "accounts",
            &Schema::new()
                .column("id", "INTEGER PRIMARY KEY AUTOINCREMENT")
                .column("email", "TEXT NOT NULL"),
        )
        .await?;
        db.create_index("accounts", &["email"], &IndexOptions::new().unique(true))
            .await?;

        let row = Record::new().with("email", Value::Text("a@b.com".to_string()));
        db.insert("accounts", &row).await?;

        // Second insert violates the unique index; the engine error passes
        // through untranslated
        let err = db.insert("accounts", &row).await.unwrap_err();
        assert!(matches!(err, StoreMiddlewareError::SqliteError(_)));

        // Default index name is derived from table and columns
        db.drop_index("accounts", "idx_accounts_email").await?;
        db.insert("accounts", &row).await?;
        assert_eq!(db.count("accounts", &Record::new()).await?, 2);

        db.disconnect().await?;
        Ok(())
    })
}

#[test]
fn named_and_multi_column_indexes() -> Result<(), Box<dyn std::error::Error>> {
    let rt = Runtime::new()?;
    rt.block_on(async {
        let mut db = SqliteAdapter::new(SqliteConfig::new(":memory:"));
        db.connect().await?;
        db.create_table(
            "readings",
            &Schema::new()
                .column("id", "INTEGER PRIMARY KEY AUTOINCREMENT")
                .column("sensor", "TEXT NOT NULL")
                .column("taken_at", "TEXT NOT NULL"),
        )
        .await?;

        db.create_index(
            "readings",
            &["sensor", "taken_at"],
            &IndexOptions::new().name("by_sensor_time"),
        )
        .await?;
        db.drop_index("readings", "by_sensor_time").await?;

        let err = db
            .create_index("readings", &[], &IndexOptions::new())
            .await
            .unwrap_err();
        assert!(matches!(err, StoreMiddlewareError::ExecutionError(_)));

        db.disconnect().await?;
        Ok(())
    })
}

#[test]
fn drop_table_removes_the_table() -> Result<(), Box<dyn std::error::Error>> {
    let rt = Runtime::new()?;
    rt.block_on(async {
        let mut db = SqliteAdapter::new(SqliteConfig::new(":memory:"));
        db.connect().await?;
        db.create_table("temp", &Schema::new().column("id", "INTEGER PRIMARY KEY"))
            .await?;
        db.drop_table("temp").await?;

        // Queries against the dropped table fail in the engine
        let err = db
            .find_all("temp", &Record::new(), &FindOptions::new())
            .await
            .unwrap_err();
        assert!(matches!(err, StoreMiddlewareError::SqliteError(_)));

        let err = db.create_table("temp", &Schema::new()).await.unwrap_err();
        assert!(matches!(err, StoreMiddlewareError::ExecutionError(_)));

        db.disconnect().await?;
        Ok(())
    })
}

#[test]
fn file_backed_database_persists_across_reconnect() -> Result<(), Box<dyn std::error::Error>> {
    let rt = Runtime::new()?;
    rt.block_on(async {
        let dir = tempfile::tempdir()?;
        let path = dir.path().join("store.db").to_string_lossy().into_owned();

        let mut db = SqliteAdapter::new(SqliteConfig::new(&path));
        db.connect().await?;
        db.create_table(
            "notes",
            &Schema::new()
                .column("id", "INTEGER PRIMARY KEY AUTOINCREMENT")
                .column("body", "TEXT"),
        )
        .await?;
        db.insert("notes", &Record::new().with("body", Value::Text("hi".into())))
            .await?;
        db.disconnect().await?;

        let mut db = SqliteAdapter::new(SqliteConfig::new(&path));
        db.connect().await?;
        assert_eq!(db.count("notes", &Record::new()).await?, 1);
        db.disconnect().await?;
        Ok(())
    })
}
