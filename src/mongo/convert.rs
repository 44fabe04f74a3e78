use chrono::{DateTime, Utc};
use mongodb::bson::spec::BinarySubtype;
use mongodb::bson::{Binary, Bson, Document, oid::ObjectId};

use crate::error::StoreMiddlewareError;
use crate::types::{Record, Selector, SortDirection, Value};

/// Column name callers use for the primary key.
pub const ID_FIELD: &str = "id";
/// Field name the document store actually keys on.
pub const MONGO_ID_FIELD: &str = "_id";

/// Convert a middleware [`Value`] into BSON.
pub fn value_to_bson(value: &Value) -> Result<Bson, StoreMiddlewareError> {
    let bson = match value {
        Value::Int(i) => Bson::Int64(*i),
        Value::Float(f) => Bson::Double(*f),
        Value::Text(s) => Bson::String(s.clone()),
        Value::Bool(b) => Bson::Boolean(*b),
        Value::Timestamp(dt) => {
            let utc = DateTime::<Utc>::from_naive_utc_and_offset(*dt, Utc);
            Bson::DateTime(mongodb::bson::DateTime::from_chrono(utc))
        }
        Value::Null => Bson::Null,
        Value::Json(jsval) => Bson::try_from(jsval.clone()).map_err(|e| {
            StoreMiddlewareError::ConversionError(format!("JSON value not representable: {e}"))
        })?,
        Value::Blob(bytes) => Bson::Binary(Binary {
            subtype: BinarySubtype::Generic,
            bytes: bytes.clone(),
        }),
    };
    Ok(bson)
}

/// Convert BSON back into a middleware [`Value`].
///
/// `ObjectId`s come back as their 24-character hex text so generated keys can
/// round-trip through the common `Value` type. Documents and arrays come back
/// as `Value::Json`.
#[must_use]
pub fn bson_to_value(bson: Bson) -> Value {
    match bson {
        Bson::Int32(i) => Value::Int(i64::from(i)),
        Bson::Int64(i) => Value::Int(i),
        Bson::Double(f) => Value::Float(f),
        Bson::String(s) => Value::Text(s),
        Bson::Boolean(b) => Value::Bool(b),
        Bson::DateTime(dt) => Value::Timestamp(dt.to_chrono().naive_utc()),
        Bson::Null => Value::Null,
        Bson::ObjectId(oid) => Value::Text(oid.to_hex()),
        Bson::Binary(bin) => Value::Blob(bin.bytes),
        other => Value::Json(other.into()),
    }
}

/// Coerce an id value into the BSON form stored under `_id`.
///
/// Generated keys are `ObjectId`s surfaced as hex text, so text that parses
/// as an `ObjectId` is converted back before matching; anything else is
/// matched as-is.
pub fn id_to_bson(value: &Value) -> Result<Bson, StoreMiddlewareError> {
    if let Value::Text(s) = value
        && let Ok(oid) = ObjectId::parse_str(s)
    {
        return Ok(Bson::ObjectId(oid));
    }
    value_to_bson(value)
}

/// Convert a record into a BSON document, mapping the public `id` field onto
/// the store's `_id`.
pub fn record_to_document(record: &Record) -> Result<Document, StoreMiddlewareError> {
    let mut doc = Document::new();
    for (key, value) in record.iter() {
        if key == ID_FIELD {
            doc.insert(MONGO_ID_FIELD, id_to_bson(value)?);
        } else {
            doc.insert(key, value_to_bson(value)?);
        }
    }
    Ok(doc)
}

/// Convert a fetched document into a record, mapping `_id` back to `id`.
#[must_use]
pub fn document_to_record(doc: Document) -> Record {
    let mut record = Record::new();
    for (key, bson) in doc {
        if key == MONGO_ID_FIELD {
            record.set(ID_FIELD, bson_to_value(bson));
        } else {
            record.set(&key, bson_to_value(bson));
        }
    }
    record
}

/// Build the filter document for a selector.
pub fn selector_to_filter(selector: &Selector) -> Result<Document, StoreMiddlewareError> {
    match selector {
        Selector::ById(id) => {
            let mut doc = Document::new();
            doc.insert(MONGO_ID_FIELD, id_to_bson(id)?);
            Ok(doc)
        }
        Selector::Matching(criteria) => record_to_document(criteria),
    }
}

/// Build the sort document for find options.
#[must_use]
pub fn sort_document(sort: &[(String, SortDirection)]) -> Document {
    let mut doc = Document::new();
    for (field, direction) in sort {
        let order = match direction {
            SortDirection::Ascending => 1,
            SortDirection::Descending => -1,
        };
        doc.insert(field.clone(), Bson::Int32(order));
    }
    doc
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    #[test]
    fn id_field_maps_to_underscore_id() {
        let record = Record::new()
            .with("id", Value::Int(7))
            .with("name", Value::Text("ann".to_string()));
        let doc = record_to_document(&record).unwrap();
        assert_eq!(doc.get_i64("_id").unwrap(), 7);
        assert_eq!(doc.get_str("name").unwrap(), "ann");
        assert!(doc.get("id").is_none());

        let back = document_to_record(doc);
        assert_eq!(back.get("id"), Some(&Value::Int(7)));
        assert!(back.get("_id").is_none());
    }

    #[test]
    fn object_id_text_round_trips() {
        let oid = ObjectId::new();
        let value = Value::Text(oid.to_hex());
        let bson = id_to_bson(&value).unwrap();
        assert_eq!(bson, Bson::ObjectId(oid));
        assert_eq!(bson_to_value(bson), value);
    }

    #[test]
    fn short_text_id_is_not_coerced() {
        let value = Value::Text("user-42".to_string());
        let bson = id_to_bson(&value).unwrap();
        assert_eq!(bson, Bson::String("user-42".to_string()));
    }

    #[test]
    fn timestamps_become_bson_datetimes() {
        let dt = NaiveDate::from_ymd_opt(2024, 3, 1)
            .unwrap()
            .and_hms_opt(12, 30, 0)
            .unwrap();
        let bson = value_to_bson(&Value::Timestamp(dt)).unwrap();
        assert!(matches!(bson, Bson::DateTime(_)));
        assert_eq!(bson_to_value(bson), Value::Timestamp(dt));
    }

    #[test]
    fn sort_document_orders_fields() {
        let doc = sort_document(&[
            ("age".to_string(), SortDirection::Descending),
            ("name".to_string(), SortDirection::Ascending),
        ]);
        assert_eq!(doc.get_i32("age").unwrap(), -1);
        assert_eq!(doc.get_i32("name").unwrap(), 1);
    }
}
