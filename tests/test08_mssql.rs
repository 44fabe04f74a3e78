#![cfg(feature = "mssql")]

use store_middleware::prelude::*;
use tokio::runtime::Runtime;

fn config_from_env() -> MssqlConfig {
    MssqlConfig {
        host: std::env::var("MSSQL_HOST").ok().or(Some("localhost".to_string())),
        port: std::env::var("MSSQL_PORT").ok().and_then(|p| p.parse().ok()),
        user: std::env::var("MSSQL_USER").ok().or(Some("sa".to_string())),
        password: std::env::var("MSSQL_PASSWORD").ok(),
        database: std::env::var("MSSQL_DB")
            .ok()
            .or(Some("middleware_test".to_string())),
        pool_size: None,
    }
}

// Needs a running SQL Server; set MSSQL_HOST/MSSQL_PORT/MSSQL_USER/
// MSSQL_PASSWORD/MSSQL_DB and run with --ignored.
#[test]
#[ignore]
fn mssql_crud_and_transactions() -> Result<(), Box<dyn std::error::Error>> {
    let rt = Runtime::new()?;
    rt.block_on(async {
        let mut db = MssqlAdapter::new(config_from_env());
        db.connect().await?;

        let _ = db.drop_table("mw_users").await;
        db.create_table(
            "mw_users",
            &Schema::new()
                .column("id", "BIGINT IDENTITY(1,1) PRIMARY KEY")
                .column("name", "NVARCHAR(200) NOT NULL")
                .column("email", "NVARCHAR(200)"),
        )
        .await?;

        // No RETURNING here; the generated key comes from SCOPE_IDENTITY()
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

        // Paging requires the synthesized ORDER BY under OFFSET/FETCH
        let page = db
            .find_all("mw_users", &Record::new(), &FindOptions::new().limit(10))
            .await?;
        assert_eq!(page.len(), 1);

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

        db.begin_transaction().await?;
        db.insert("mw_users", &Record::new().with("name", Value::Text("Kept".into())))
            .await?;
        db.commit().await?;
        assert_eq!(db.count("mw_users", &Record::new()).await?, 2);

        db.create_index("mw_users", &["email"], &IndexOptions::new())
            .await?;
        db.drop_index("mw_users", "idx_mw_users_email").await?;

        let deleted = db.delete("mw_users", &Selector::Matching(Record::new())).await?;
        assert_eq!(deleted, 2);
        db.drop_table("mw_users").await?;
        db.disconnect().await?;
        Ok(())
    })
}
