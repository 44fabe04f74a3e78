#![cfg(feature = "mongodb")]

use store_middleware::prelude::*;
use tokio::runtime::Runtime;

fn config_from_env() -> MongoConfig {
    MongoConfig {
        uri: std::env::var("MONGO_URI")
            .ok()
            .or(Some("mongodb://localhost:27017".to_string())),
        database: std::env::var("MONGO_DB")
            .ok()
            .or(Some("middleware_test".to_string())),
    }
}

// Needs a running MongoDB; set MONGO_URI/MONGO_DB and run with --ignored.
#[test]
#[ignore]
fn mongo_crud_round_trip() -> Result<(), Box<dyn std::error::Error>> {
    let rt = Runtime::new()?;
    rt.block_on(async {
        let mut db = MongoAdapter::new(config_from_env());
        db.connect().await?;

        let _ = db.drop_table("mw_users").await;
        db.create_table("mw_users", &Schema::new().column("unused", "unused"))
            .await?;

        let id = db
            .insert(
                "mw_users",
                &Record::new()
                    .with("name", Value::Text("Alice".into()))
                    .with("age", Value::Int(34)),
            )
            .await?;
        // Generated ObjectIds surface as 24-char hex text
        let hex = id.as_text().expect("generated id should be text");
        assert_eq!(hex.len(), 24);

        let row = db.find_by_id("mw_users", &id).await?.unwrap();
        assert_eq!(row.get("name"), Some(&Value::Text("Alice".into())));
        assert_eq!(row.get("id"), Some(&id));
        assert!(row.get("_id").is_none());

        db.insert(
            "mw_users",
            &Record::new()
                .with("name", Value::Text("Bob".into()))
                .with("age", Value::Int(41)),
        )
        .await?;

        let affected = db
            .update(
                "mw_users",
                &Selector::ById(id.clone()),
                &Record::new().with("age", Value::Int(35)),
            )
            .await?;
        assert_eq!(affected, 1);

        let sorted = db
            .find_all(
                "mw_users",
                &Record::new(),
                &FindOptions::new().sort_by("age", SortDirection::Descending),
            )
            .await?;
        assert_eq!(
            sorted[0].get("name"),
            Some(&Value::Text("Bob".to_string()))
        );

        assert_eq!(db.count("mw_users", &Record::new()).await?, 2);

        db.create_index("mw_users", &["name"], &IndexOptions::new().unique(true))
            .await?;
        db.drop_index("mw_users", "idx_mw_users_name").await?;

        let deleted = db
            .delete("mw_users", &Selector::Matching(Record::new()))
            .await?;
        assert_eq!(deleted, 2);

        db.drop_table("mw_users").await?;
        db.disconnect().await?;
        Ok(())
    })
}
