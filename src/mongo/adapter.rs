use async_trait::async_trait;
use futures_util::TryStreamExt;
use mongodb::bson::{Document, doc};
use mongodb::options::IndexOptions as MongoIndexOptions;
use mongodb::{Client, Database, IndexModel};
use tracing::debug;

use crate::adapter::StoreAdapter;
use crate::error::StoreMiddlewareError;
use crate::mongo::config::MongoConfig;
use crate::mongo::convert;
use crate::types::{FindOptions, IndexOptions, Record, Schema, Selector, Value};

/// Document store adapter.
///
/// Tables are collections and rows are documents. Criteria records pass
/// through as native equality filters, so the same `find_all(criteria)` call
/// works here and on the SQL engines. Transactions are not offered at this
/// layer; the transaction methods return `Unimplemented`.
pub struct MongoAdapter {
    config: MongoConfig,
    client: Option<Client>,
    database: Option<Database>,
}

impl MongoAdapter {
    /// Construct a Disconnected adapter from its config.
    #[must_use]
    pub fn new(config: MongoConfig) -> Self {
        Self {
            config,
            client: None,
            database: None,
        }
    }

    fn database(&self) -> Result<&Database, StoreMiddlewareError> {
        self.database
            .as_ref()
            .ok_or_else(|| StoreMiddlewareError::not_connected("mongodb"))
    }

    fn collection(
        &self,
        name: &str,
    ) -> Result<mongodb::Collection<Document>, StoreMiddlewareError> {
        Ok(self.database()?.collection::<Document>(name))
    }
}

#[async_trait]
impl StoreAdapter for MongoAdapter {
    async fn connect(&mut self) -> Result<(), StoreMiddlewareError> {
        if self.client.is_some() {
            return Ok(());
        }
        self.config.validate()?;
        let uri = self.config.uri.clone().unwrap_or_default();
        let dbname = self.config.database.clone().unwrap_or_default();
        let client = Client::with_uri_str(&uri).await?;
        self.database = Some(client.database(&dbname));
        self.client = Some(client);
        debug!("mongodb adapter connected");
        Ok(())
    }

    async fn disconnect(&mut self) -> Result<(), StoreMiddlewareError> {
        self.database = None;
        if let Some(client) = self.client.take() {
            client.shutdown().await;
            debug!("mongodb adapter disconnected");
        }
        Ok(())
    }

    async fn insert(&mut self, table: &str, row: &Record) -> Result<Value, StoreMiddlewareError> {
        let collection = self.collection(table)?;
        let doc = convert::record_to_document(row)?;
        debug!(collection = %table, "mongodb insert");
        let result = collection.insert_one(doc).await?;
        Ok(convert::bson_to_value(result.inserted_id))
    }

    async fn update(
        &mut self,
        table: &str,
        selector: &Selector,
        updates: &Record,
    ) -> Result<u64, StoreMiddlewareError> {
        let collection = self.collection(table)?;
        let filter = convert::selector_to_filter(selector)?;
        let set = convert::record_to_document(updates)?;
        debug!(collection = %table, "mongodb update");
        let result = collection.update_many(filter, doc! { "$set": set }).await?;
        Ok(result.matched_count)
    }

    async fn delete(
        &mut self,
        table: &str,
        selector: &Selector,
    ) -> Result<u64, StoreMiddlewareError> {
        let collection = self.collection(table)?;
        let filter = convert::selector_to_filter(selector)?;
        debug!(collection = %table, "mongodb delete");
        let result = collection.delete_many(filter).await?;
        Ok(result.deleted_count)
    }

    async fn find_by_id(
        &mut self,
        table: &str,
        id: &Value,
    ) -> Result<Option<Record>, StoreMiddlewareError> {
        let criteria = Record::new().with(convert::ID_FIELD, id.clone());
        self.find_one(table, &criteria, &FindOptions::new()).await
    }

    async fn find_by(
        &mut self,
        table: &str,
        column: &str,
        value: &Value,
    ) -> Result<Vec<Record>, StoreMiddlewareError> {
        let criteria = Record::new().with(column, value.clone());
        self.find_all(table, &criteria, &FindOptions::new()).await
    }

    async fn find_all(
        &mut self,
        table: &str,
        criteria: &Record,
        options: &FindOptions,
    ) -> Result<Vec<Record>, StoreMiddlewareError> {
        let collection = self.collection(table)?;
        let filter = convert::record_to_document(criteria)?;
        debug!(collection = %table, "mongodb find");

        let mut find = collection.find(filter);
        if let Some(limit) = options.limit {
            let limit = i64::try_from(limit).map_err(|_| {
                StoreMiddlewareError::ConversionError(format!("limit {limit} out of range"))
            })?;
            find = find.limit(limit);
        }
        if let Some(offset) = options.offset {
            find = find.skip(offset);
        }
        if !options.sort.is_empty() {
            find = find.sort(convert::sort_document(&options.sort));
        }

        let mut cursor = find.await?;
        let mut records = Vec::new();
        while let Some(doc) = cursor.try_next().await? {
            records.push(convert::document_to_record(doc));
        }
        Ok(records)
    }

    async fn find_one(
        &mut self,
        table: &str,
        criteria: &Record,
        options: &FindOptions,
    ) -> Result<Option<Record>, StoreMiddlewareError> {
        let mut options = options.clone();
        options.limit = Some(1);
        let rows = self.find_all(table, criteria, &options).await?;
        Ok(rows.into_iter().next())
    }

    async fn count(
        &mut self,
        table: &str,
        criteria: &Record,
    ) -> Result<u64, StoreMiddlewareError> {
        let collection = self.collection(table)?;
        let filter = convert::record_to_document(criteria)?;
        let total = collection.count_documents(filter).await?;
        Ok(total)
    }

    async fn create_table(
        &mut self,
        table: &str,
        _schema: &Schema,
    ) -> Result<(), StoreMiddlewareError> {
        // Collections are schemaless; the column list only matters to the SQL
        // engines. Creating the collection up front still makes index calls
        // and empty finds behave like their SQL counterparts.
        let database = self.database()?;
        debug!(collection = %table, "mongodb create collection");
        database.create_collection(table).await?;
        Ok(())
    }

    async fn drop_table(&mut self, table: &str) -> Result<(), StoreMiddlewareError> {
        let collection = self.collection(table)?;
        debug!(collection = %table, "mongodb drop collection");
        collection.drop().await?;
        Ok(())
    }

    async fn create_index(
        &mut self,
        table: &str,
        columns: &[&str],
        options: &IndexOptions,
    ) -> Result<(), StoreMiddlewareError> {
        let collection = self.collection(table)?;

        let mut keys = Document::new();
        for column in columns {
            keys.insert((*column).to_string(), 1);
        }
        let name = options
            .name
            .clone()
            .unwrap_or_else(|| format!("idx_{}_{}", table, columns.join("_")));
        let index_options = MongoIndexOptions::builder()
            .name(name)
            .unique(options.unique)
            .build();
        let model = IndexModel::builder()
            .keys(keys)
            .options(index_options)
            .build();

        debug!(collection = %table, "mongodb create index");
        collection.create_index(model).await?;
        Ok(())
    }

    async fn drop_index(&mut self, table: &str, name: &str) -> Result<(), StoreMiddlewareError> {
        let collection = self.collection(table)?;
        debug!(collection = %table, index = %name, "mongodb drop index");
        collection.drop_index(name).await?;
        Ok(())
    }

    async fn begin_transaction(&mut self) -> Result<(), StoreMiddlewareError> {
        self.database()?;
        Err(StoreMiddlewareError::Unimplemented(
            "transactions are not supported by the mongodb adapter".to_string(),
        ))
    }

    async fn commit(&mut self) -> Result<(), StoreMiddlewareError> {
        self.database()?;
        Err(StoreMiddlewareError::Unimplemented(
            "transactions are not supported by the mongodb adapter".to_string(),
        ))
    }

    async fn rollback(&mut self) -> Result<(), StoreMiddlewareError> {
        self.database()?;
        Err(StoreMiddlewareError::Unimplemented(
            "transactions are not supported by the mongodb adapter".to_string(),
        ))
    }
}
