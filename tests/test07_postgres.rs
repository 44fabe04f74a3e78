#![cfg(feature = "postgres")]

use store_middleware::prelude::*;
use tokio::runtime::Runtime;

fn config_from_env() -> PostgresConfig {
    PostgresConfig {
        host: std::env::var("DB_HOST").ok().or(Some("localhost".to_string())),
        port: std::env::var("DB_PORT").ok().and_then(|p| p.parse().ok()),
        user: std::env::var("DB_USER").ok().or(Some("postgres".to_string())),
        password: std::env::var("DB_PASSWORD").ok(),
        dbname: std::env::var("DB_NAME")
            .ok()
            .or(Some("middleware_test".to_string())),
        pool_size: None,
    }
}

// Needs a running PostgreSQL; set DB_HOST/DB_PORT/DB_USER/DB_PASSWORD/DB_NAME
// and run with --ignored.
#[test]
#[ignore]
fn postgres_crud_and_transactions() -> Result<(), Box<dyn std::error::Error>> {
    let rt = Runtime::new()?;
    rt.block_on(async {
        let mut db = PostgresAdapter::new(config_from_env());
        db.connect().await?;

        let _ = db.drop_table("mw_users").await;
        db.create_table(
            "mw_users",
            &Schema::new()
                .column("id", "BIGSERIAL PRIMARY KEY")
                .column("name", "TEXT NOT NULL")
                .column("email", "TEXT"),
        )
        .await?;

        // Generated key comes back from RETURNING
        let id = db
            .insert(
                "mw_users",
                &Record::new()
                    .with("name", Value::Text("Alice".into()))
                    .with("email", Value::Text("alice@example.com".into())),
            )
            .await?;
        assert!(matches!(id, Value::Int(_)));

        let row = db.find_by_id("mw_users", &id).await?.unwrap();
        assert_eq!(row.get("name"), Some(&Value::Text("Alice".into())));

        let affected = db
            .update(
                "mw_users",
                &Selector::ById(id.clone()),
                &Record::new().with("name", Value::Text("Alicia".into())),
            )
            .await?;
        assert_eq!(affected, 1);

        db.begin_transaction().await?;
        db.insert("mw_users", &Record::new().with("name", Value::Text("Temp".into())))
            .await?;
        let err = db.begin_transaction().await.unwrap_err();
        assert!(err.to_string().contains("transaction already in progress"));
        db.rollback().await?;
        assert_eq!(db.count("mw_users", &Record::new()).await?, 1);

        let err = db.commit().await.unwrap_err();
        assert!(err.to_string().contains("no transaction in progress"));

        db.begin_transaction().await?;
        db.insert("mw_users", &Record::new().with("name", Value::Text("Kept".into())))
            .await?;
        db.commit().await?;
        assert_eq!(db.count("mw_users", &Record::new()).await?, 2);

        db.create_index("mw_users", &["email"], &IndexOptions::new().unique(true))
            .await?;
        db.drop_index("mw_users", "idx_mw_users_email").await?;

        let deleted = db.delete("mw_users", &Selector::Matching(Record::new())).await?;
        assert_eq!(deleted, 2);
        db.drop_table("mw_users").await?;
        db.disconnect().await?;
        Ok(())
    })
}
