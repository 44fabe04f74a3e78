use chrono::NaiveDateTime;
use clap::ValueEnum;
use serde_json::Value as JsonValue;

/// Values that can be stored in a row/document field or bound as a query
/// parameter.
///
/// Reuse the same enum across backends so caller code does not need to branch
/// on driver types:
/// ```rust
/// use store_middleware::prelude::*;
///
/// let row = Record::new()
///     .with("id", Value::Int(1))
///     .with("name", Value::Text("alice".into()))
///     .with("active", Value::Bool(true));
/// # let _ = row;
/// ```
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    /// Integer value (64-bit)
    Int(i64),
    /// Floating point value (64-bit)
    Float(f64),
    /// Text/string value
    Text(String),
    /// Boolean value
    Bool(bool),
    /// Timestamp value
    Timestamp(NaiveDateTime),
    /// NULL value
    Null,
    /// JSON value
    Json(JsonValue),
    /// Binary data
    Blob(Vec<u8>),
}

impl Value {
    /// Check if this value is NULL
    #[must_use]
    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    #[must_use]
    pub fn as_int(&self) -> Option<&i64> {
        if let Value::Int(value) = self {
            Some(value)
        } else {
            None
        }
    }

    #[must_use]
    pub fn as_text(&self) -> Option<&str> {
        if let Value::Text(value) = self {
            Some(value)
        } else {
            None
        }
    }

    #[must_use]
    pub fn as_bool(&self) -> Option<&bool> {
        if let Value::Bool(value) = self {
            return Some(value);
        } else if let Some(i) = self.as_int() {
            if *i == 1 {
                return Some(&true);
            } else if *i == 0 {
                return Some(&false);
            }
        }
        None
    }

    #[must_use]
    pub fn as_timestamp(&self) -> Option<NaiveDateTime> {
        if let Value::Timestamp(value) = self {
            return Some(*value);
        } else if let Some(s) = self.as_text() {
            // Try "YYYY-MM-DD HH:MM:SS"
            if let Ok(dt) = NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S") {
                return Some(dt);
            }
            // Try "YYYY-MM-DD HH:MM:SS.SSS"
            if let Ok(dt) = NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S.%3f") {
                return Some(dt);
            }
        }
        None
    }

    #[must_use]
    pub fn as_float(&self) -> Option<f64> {
        if let Value::Float(value) = self {
            Some(*value)
        } else {
            None
        }
    }

    #[must_use]
    pub fn as_blob(&self) -> Option<&[u8]> {
        if let Value::Blob(bytes) = self {
            Some(bytes)
        } else {
            None
        }
    }
}

impl From<i64> for Value {
    fn from(v: i64) -> Self {
        Value::Int(v)
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Value::Float(v)
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Value::Text(v.to_string())
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Value::Text(v)
    }
}

impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Value::Bool(v)
    }
}

/// An ordered field → [`Value`] mapping.
///
/// Serves both as a row/document payload and as a criteria mapping (an AND of
/// equality predicates). Insertion order is preserved and is the column order
/// used when generating INSERT/UPDATE statements.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Record {
    fields: Vec<(String, Value)>,
}

impl Record {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a field, replacing the value in place if the name already exists.
    pub fn set(&mut self, name: impl Into<String>, value: Value) {
        let name = name.into();
        if let Some(slot) = self.fields.iter_mut().find(|(n, _)| *n == name) {
            slot.1 = value;
        } else {
            self.fields.push((name, value));
        }
    }

    /// Builder-style [`Record::set`].
    #[must_use]
    pub fn with(mut self, name: impl Into<String>, value: Value) -> Self {
        self.set(name, value);
        self
    }

    #[must_use]
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.fields
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.fields.iter().map(|(n, _)| n.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.fields.iter().map(|(n, v)| (n.as_str(), v))
    }
}

impl FromIterator<(String, Value)> for Record {
    fn from_iter<T: IntoIterator<Item = (String, Value)>>(iter: T) -> Self {
        let mut record = Record::new();
        for (name, value) in iter {
            record.set(name, value);
        }
        record
    }
}

impl IntoIterator for Record {
    type Item = (String, Value);
    type IntoIter = std::vec::IntoIter<(String, Value)>;

    fn into_iter(self) -> Self::IntoIter {
        self.fields.into_iter()
    }
}

/// Target rows for an update/delete: a scalar primary-key value, or a
/// criteria mapping AND-combined into the WHERE clause / filter document.
///
/// A scalar means equality on the column named `id` for the SQL engines and
/// on `_id` for the document engine. A criteria mapping affects **all**
/// matching rows, not just the first.
#[derive(Debug, Clone, PartialEq)]
pub enum Selector {
    ById(Value),
    Matching(Record),
}

impl Selector {
    /// Shorthand for `Selector::ById`.
    pub fn id(value: impl Into<Value>) -> Self {
        Selector::ById(value.into())
    }
}

impl From<Record> for Selector {
    fn from(criteria: Record) -> Self {
        Selector::Matching(criteria)
    }
}

/// Sort direction for a single column/field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortDirection {
    Ascending,
    Descending,
}

/// Options for `find_all`/`find_one`.
#[derive(Debug, Clone, Default)]
pub struct FindOptions {
    pub limit: Option<u64>,
    pub offset: Option<u64>,
    pub sort: Vec<(String, SortDirection)>,
}

impl FindOptions {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn limit(mut self, limit: u64) -> Self {
        self.limit = Some(limit);
        self
    }

    #[must_use]
    pub fn offset(mut self, offset: u64) -> Self {
        self.offset = Some(offset);
        self
    }

    #[must_use]
    pub fn sort_by(mut self, column: impl Into<String>, direction: SortDirection) -> Self {
        self.sort.push((column.into(), direction));
        self
    }
}

/// Ordered column → engine-native type-string mapping, used only for DDL
/// generation. No schema cache is kept between calls.
#[derive(Debug, Clone, Default)]
pub struct Schema {
    columns: Vec<(String, String)>,
}

impl Schema {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn column(mut self, name: impl Into<String>, type_def: impl Into<String>) -> Self {
        self.columns.push((name.into(), type_def.into()));
        self
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.columns.iter().map(|(n, t)| (n.as_str(), t.as_str()))
    }
}

impl FromIterator<(String, String)> for Schema {
    fn from_iter<T: IntoIterator<Item = (String, String)>>(iter: T) -> Self {
        Schema {
            columns: iter.into_iter().collect(),
        }
    }
}

/// Options for index creation. An unnamed index defaults to
/// `idx_<table>_<col1>_<col2>...`.
#[derive(Debug, Clone, Default)]
pub struct IndexOptions {
    pub name: Option<String>,
    pub unique: bool,
}

impl IndexOptions {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    #[must_use]
    pub fn unique(mut self, unique: bool) -> Self {
        self.unique = unique;
        self
    }
}

/// The storage engines supported by this middleware.
#[derive(Debug, Clone, PartialEq, Eq, Hash, ValueEnum)]
pub enum EngineKind {
    /// Embedded `SQLite` database
    #[cfg(feature = "sqlite")]
    Sqlite,
    /// `PostgreSQL` database
    #[cfg(feature = "postgres")]
    Postgres,
    /// SQL Server database
    #[cfg(feature = "mssql")]
    Mssql,
    /// `MongoDB` document store
    #[cfg(feature = "mongodb")]
    Mongodb,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn record_preserves_insertion_order() {
        let record = Record::new()
            .with("zeta", Value::Int(1))
            .with("alpha", Value::Int(2))
            .with("mid", Value::Int(3));
        let keys: Vec<&str> = record.keys().collect();
        assert_eq!(keys, vec!["zeta", "alpha", "mid"]);
    }

    #[test]
    fn record_set_replaces_in_place() {
        let mut record = Record::new()
            .with("a", Value::Int(1))
            .with("b", Value::Int(2));
        record.set("a", Value::Int(10));
        let keys: Vec<&str> = record.keys().collect();
        assert_eq!(keys, vec!["a", "b"]);
        assert_eq!(record.get("a"), Some(&Value::Int(10)));
        assert_eq!(record.len(), 2);
    }

    #[test]
    fn value_bool_coerces_from_int() {
        assert_eq!(Value::Int(1).as_bool(), Some(&true));
        assert_eq!(Value::Int(0).as_bool(), Some(&false));
        assert_eq!(Value::Int(7).as_bool(), None);
    }

    #[test]
    fn value_timestamp_parses_from_text() {
        let v = Value::Text("2024-01-03 10:30:00".to_string());
        let dt = v.as_timestamp().unwrap();
        assert_eq!(
            dt,
            NaiveDateTime::parse_from_str("2024-01-03 10:30:00", "%Y-%m-%d %H:%M:%S").unwrap()
        );
    }

    #[test]
    fn selector_helpers() {
        assert_eq!(Selector::id(5i64), Selector::ById(Value::Int(5)));
        let criteria = Record::new().with("email", Value::Text("a@b.com".into()));
        let selector: Selector = criteria.clone().into();
        assert_eq!(selector, Selector::Matching(criteria));
    }
}
