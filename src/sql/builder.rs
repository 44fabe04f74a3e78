//! Statement construction shared by the relational adapters.
//!
//! Builders take a [`Dialect`] plus the caller's table/column descriptors and
//! return SQL with parameters in binding order. Column lists follow the
//! record's insertion order. Criteria mappings become AND-joined equality
//! predicates; a scalar selector means equality on the `id` column.

use crate::error::StoreMiddlewareError;
use crate::sql::{Dialect, DropIndexStyle, LimitStyle, QueryAndParams};
use crate::types::{FindOptions, IndexOptions, Record, Schema, Selector, SortDirection, Value};

/// Primary-key column assumed by scalar selectors.
pub const ID_COLUMN: &str = "id";

/// Build an INSERT statement. With `supports_returning`, appends
/// `RETURNING "id"` so the caller can read the generated key from the
/// result row.
///
/// # Errors
/// Returns `ExecutionError` if the row has no columns.
pub fn insert(
    dialect: &Dialect,
    table: &str,
    row: &Record,
) -> Result<QueryAndParams, StoreMiddlewareError> {
    if row.is_empty() {
        return Err(StoreMiddlewareError::ExecutionError(
            "insert requires at least one column".to_string(),
        ));
    }

    let columns: Vec<String> = row.keys().map(|k| dialect.quote(k)).collect();
    let placeholders: Vec<String> = (1..=row.len()).map(|i| dialect.placeholder(i)).collect();
    let params: Vec<Value> = row.iter().map(|(_, v)| v.clone()).collect();

    let mut query = format!(
        "INSERT INTO {} ({}) VALUES ({})",
        dialect.quote(table),
        columns.join(", "),
        placeholders.join(", "),
    );
    if dialect.supports_returning {
        query.push_str(&format!(" RETURNING {}", dialect.quote(ID_COLUMN)));
    }

    Ok(QueryAndParams::new(query, params))
}

/// Build an UPDATE statement affecting all rows matched by the selector.
///
/// # Errors
/// Returns `ExecutionError` if `updates` has no columns.
pub fn update(
    dialect: &Dialect,
    table: &str,
    selector: &Selector,
    updates: &Record,
) -> Result<QueryAndParams, StoreMiddlewareError> {
    if updates.is_empty() {
        return Err(StoreMiddlewareError::ExecutionError(
            "update requires at least one column".to_string(),
        ));
    }

    let mut position = 0usize;
    let mut params: Vec<Value> = Vec::with_capacity(updates.len() + 1);
    let assignments: Vec<String> = updates
        .iter()
        .map(|(name, value)| {
            position += 1;
            params.push(value.clone());
            format!("{} = {}", dialect.quote(name), dialect.placeholder(position))
        })
        .collect();

    let (where_clause, mut where_params) = where_for_selector(dialect, selector, &mut position);
    params.append(&mut where_params);

    let query = format!(
        "UPDATE {} SET {}{}",
        dialect.quote(table),
        assignments.join(", "),
        where_clause,
    );
    Ok(QueryAndParams::new(query, params))
}

/// Build a DELETE statement affecting all rows matched by the selector.
#[must_use]
pub fn delete(dialect: &Dialect, table: &str, selector: &Selector) -> QueryAndParams {
    let mut position = 0usize;
    let (where_clause, params) = where_for_selector(dialect, selector, &mut position);
    let query = format!("DELETE FROM {}{}", dialect.quote(table), where_clause);
    QueryAndParams::new(query, params)
}

/// Build a SELECT over the criteria mapping plus limit/offset/sort options.
#[must_use]
pub fn select(
    dialect: &Dialect,
    table: &str,
    criteria: &Record,
    options: &FindOptions,
) -> QueryAndParams {
    let mut position = 0usize;
    let (where_clause, params) = where_for_criteria(dialect, criteria, &mut position);

    let mut query = format!("SELECT * FROM {}{}", dialect.quote(table), where_clause);
    query.push_str(&order_and_limit(dialect, options));
    QueryAndParams::new(query, params)
}

/// Build a COUNT over the same WHERE construction as [`select`], independent
/// of any limit/offset.
#[must_use]
pub fn count(dialect: &Dialect, table: &str, criteria: &Record) -> QueryAndParams {
    let mut position = 0usize;
    let (where_clause, params) = where_for_criteria(dialect, criteria, &mut position);
    let query = format!(
        "SELECT COUNT(*) AS {} FROM {}{}",
        dialect.quote("count"),
        dialect.quote(table),
        where_clause,
    );
    QueryAndParams::new(query, params)
}

/// Build a CREATE TABLE statement from the schema mapping.
///
/// # Errors
/// Returns `ExecutionError` if the schema has no columns.
pub fn create_table(
    dialect: &Dialect,
    table: &str,
    schema: &Schema,
) -> Result<String, StoreMiddlewareError> {
    if schema.is_empty() {
        return Err(StoreMiddlewareError::ExecutionError(
            "create_table requires at least one column".to_string(),
        ));
    }
    let columns: Vec<String> = schema
        .iter()
        .map(|(name, type_def)| format!("{} {}", dialect.quote(name), type_def))
        .collect();
    Ok(format!(
        "CREATE TABLE {} ({})",
        dialect.quote(table),
        columns.join(", "),
    ))
}

/// Build a DROP TABLE statement.
#[must_use]
pub fn drop_table(dialect: &Dialect, table: &str) -> String {
    format!("DROP TABLE {}", dialect.quote(table))
}

/// Build a CREATE INDEX statement; unnamed indexes default to
/// `idx_<table>_<col1>_<col2>...`.
///
/// # Errors
/// Returns `ExecutionError` if no columns were given.
pub fn create_index(
    dialect: &Dialect,
    table: &str,
    columns: &[&str],
    options: &IndexOptions,
) -> Result<String, StoreMiddlewareError> {
    if columns.is_empty() {
        return Err(StoreMiddlewareError::ExecutionError(
            "create_index requires at least one column".to_string(),
        ));
    }
    let name = options
        .name
        .clone()
        .unwrap_or_else(|| default_index_name(table, columns));
    let quoted: Vec<String> = columns.iter().map(|c| dialect.quote(c)).collect();
    let unique = if options.unique { "UNIQUE " } else { "" };
    Ok(format!(
        "CREATE {}INDEX {} ON {} ({})",
        unique,
        dialect.quote(&name),
        dialect.quote(table),
        quoted.join(", "),
    ))
}

/// Build a DROP INDEX statement in the dialect's form.
#[must_use]
pub fn drop_index(dialect: &Dialect, table: &str, name: &str) -> String {
    match dialect.drop_index {
        DropIndexStyle::Bare => format!("DROP INDEX {}", dialect.quote(name)),
        DropIndexStyle::OnTable => format!(
            "DROP INDEX {} ON {}",
            dialect.quote(name),
            dialect.quote(table),
        ),
    }
}

/// Default name for an unnamed index.
#[must_use]
pub fn default_index_name(table: &str, columns: &[&str]) -> String {
    format!("idx_{}_{}", table, columns.join("_"))
}

fn where_for_selector(
    dialect: &Dialect,
    selector: &Selector,
    position: &mut usize,
) -> (String, Vec<Value>) {
    match selector {
        Selector::ById(id) => {
            *position += 1;
            (
                format!(
                    " WHERE {} = {}",
                    dialect.quote(ID_COLUMN),
                    dialect.placeholder(*position),
                ),
                vec![id.clone()],
            )
        }
        Selector::Matching(criteria) => where_for_criteria(dialect, criteria, position),
    }
}

fn where_for_criteria(
    dialect: &Dialect,
    criteria: &Record,
    position: &mut usize,
) -> (String, Vec<Value>) {
    if criteria.is_empty() {
        return (String::new(), Vec::new());
    }
    let mut params = Vec::with_capacity(criteria.len());
    let predicates: Vec<String> = criteria
        .iter()
        .map(|(name, value)| {
            *position += 1;
            params.push(value.clone());
            format!("{} = {}", dialect.quote(name), dialect.placeholder(*position))
        })
        .collect();
    (format!(" WHERE {}", predicates.join(" AND ")), params)
}

fn order_and_limit(dialect: &Dialect, options: &FindOptions) -> String {
    let mut clause = String::new();

    if !options.sort.is_empty() {
        let terms: Vec<String> = options
            .sort
            .iter()
            .map(|(column, direction)| {
                let dir = match direction {
                    SortDirection::Ascending => "ASC",
                    SortDirection::Descending => "DESC",
                };
                format!("{} {}", dialect.quote(column), dir)
            })
            .collect();
        clause.push_str(&format!(" ORDER BY {}", terms.join(", ")));
    }

    match dialect.limits {
        LimitStyle::LimitOffset { unlimited } => match (options.limit, options.offset) {
            (Some(limit), Some(offset)) => {
                clause.push_str(&format!(" LIMIT {limit} OFFSET {offset}"));
            }
            (Some(limit), None) => clause.push_str(&format!(" LIMIT {limit}")),
            (None, Some(offset)) => {
                clause.push_str(&format!(" LIMIT {unlimited} OFFSET {offset}"));
            }
            (None, None) => {}
        },
        LimitStyle::OffsetFetch => {
            if options.limit.is_some() || options.offset.is_some() {
                // OFFSET/FETCH is only legal after ORDER BY
                if options.sort.is_empty() {
                    clause.push_str(" ORDER BY (SELECT NULL)");
                }
                clause.push_str(&format!(" OFFSET {} ROWS", options.offset.unwrap_or(0)));
                if let Some(limit) = options.limit {
                    clause.push_str(&format!(" FETCH NEXT {limit} ROWS ONLY"));
                }
            }
        }
    }

    clause
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sql::QuoteStyle;

    fn row() -> Record {
        Record::new()
            .with("email", Value::Text("a@b.com".into()))
            .with("name", Value::Text("Ann".into()))
    }

    #[test]
    fn insert_sqlite_uses_fixed_placeholders() {
        let qp = insert(&Dialect::SQLITE, "users", &row()).unwrap();
        assert_eq!(
            qp.query,
            r#"INSERT INTO "users" ("email", "name") VALUES (?, ?)"#
        );
        assert_eq!(qp.params.len(), 2);
    }

    #[test]
    fn insert_postgres_appends_returning() {
        let qp = insert(&Dialect::POSTGRES, "users", &row()).unwrap();
        assert_eq!(
            qp.query,
            r#"INSERT INTO "users" ("email", "name") VALUES ($1, $2) RETURNING "id""#
        );
    }

    #[test]
    fn insert_mssql_numbers_at_placeholders() {
        let qp = insert(&Dialect::MSSQL, "users", &row()).unwrap();
        assert_eq!(
            qp.query,
            "INSERT INTO [users] ([email], [name]) VALUES (@P1, @P2)"
        );
    }

    #[test]
    fn insert_empty_row_is_an_error() {
        assert!(insert(&Dialect::SQLITE, "users", &Record::new()).is_err());
    }

    #[test]
    fn update_by_id_continues_numbering_into_where() {
        let updates = Record::new().with("name", Value::Text("Bea".into()));
        let qp = update(
            &Dialect::POSTGRES,
            "users",
            &Selector::id(7i64),
            &updates,
        )
        .unwrap();
        assert_eq!(qp.query, r#"UPDATE "users" SET "name" = $1 WHERE "id" = $2"#);
        assert_eq!(qp.params, vec![Value::Text("Bea".into()), Value::Int(7)]);
    }

    #[test]
    fn update_by_criteria_joins_predicates_with_and() {
        let updates = Record::new().with("active", Value::Bool(false));
        let criteria = Record::new()
            .with("city", Value::Text("Oslo".into()))
            .with("tier", Value::Int(2));
        let qp = update(
            &Dialect::MSSQL,
            "users",
            &Selector::Matching(criteria),
            &updates,
        )
        .unwrap();
        assert_eq!(
            qp.query,
            "UPDATE [users] SET [active] = @P1 WHERE [city] = @P2 AND [tier] = @P3"
        );
    }

    #[test]
    fn delete_with_empty_criteria_has_no_where() {
        let qp = delete(
            &Dialect::SQLITE,
            "users",
            &Selector::Matching(Record::new()),
        );
        assert_eq!(qp.query, r#"DELETE FROM "users""#);
        assert!(qp.params.is_empty());
    }

    #[test]
    fn select_limit_offset_sqlite() {
        let options = FindOptions::new().limit(5).offset(10);
        let qp = select(&Dialect::SQLITE, "users", &Record::new(), &options);
        assert_eq!(qp.query, r#"SELECT * FROM "users" LIMIT 5 OFFSET 10"#);
    }

    #[test]
    fn select_offset_without_limit_uses_unlimited_token() {
        let options = FindOptions::new().offset(3);
        let qp = select(&Dialect::SQLITE, "users", &Record::new(), &options);
        assert_eq!(qp.query, r#"SELECT * FROM "users" LIMIT -1 OFFSET 3"#);

        let qp = select(&Dialect::POSTGRES, "users", &Record::new(), &options);
        assert_eq!(qp.query, r#"SELECT * FROM "users" LIMIT ALL OFFSET 3"#);
    }

    #[test]
    fn select_mssql_synthesizes_order_by_for_offset_fetch() {
        let options = FindOptions::new().limit(1);
        let qp = select(&Dialect::MSSQL, "users", &Record::new(), &options);
        assert_eq!(
            qp.query,
            "SELECT * FROM [users] ORDER BY (SELECT NULL) OFFSET 0 ROWS FETCH NEXT 1 ROWS ONLY"
        );
    }

    #[test]
    fn select_sorts_before_limiting() {
        let options = FindOptions::new()
            .sort_by("name", SortDirection::Descending)
            .limit(2);
        let qp = select(&Dialect::POSTGRES, "users", &Record::new(), &options);
        assert_eq!(
            qp.query,
            r#"SELECT * FROM "users" ORDER BY "name" DESC LIMIT 2"#
        );

        let qp = select(&Dialect::MSSQL, "users", &Record::new(), &options);
        assert_eq!(
            qp.query,
            "SELECT * FROM [users] ORDER BY [name] DESC OFFSET 0 ROWS FETCH NEXT 2 ROWS ONLY"
        );
    }

    #[test]
    fn count_ignores_nothing_but_uses_same_where() {
        let criteria = Record::new().with("email", Value::Text("a@b.com".into()));
        let qp = count(&Dialect::SQLITE, "users", &criteria);
        assert_eq!(
            qp.query,
            r#"SELECT COUNT(*) AS "count" FROM "users" WHERE "email" = ?"#
        );
        assert_eq!(qp.params.len(), 1);
    }

    #[test]
    fn create_table_lists_columns_in_order() {
        let schema = Schema::new()
            .column("id", "INTEGER PRIMARY KEY AUTOINCREMENT")
            .column("email", "TEXT NOT NULL");
        let sql = create_table(&Dialect::SQLITE, "users", &schema).unwrap();
        assert_eq!(
            sql,
            r#"CREATE TABLE "users" ("id" INTEGER PRIMARY KEY AUTOINCREMENT, "email" TEXT NOT NULL)"#
        );
    }

    #[test]
    fn index_name_defaults_and_unique_flag() {
        assert_eq!(
            default_index_name("users", &["email", "name"]),
            "idx_users_email_name"
        );
        let sql = create_index(
            &Dialect::POSTGRES,
            "users",
            &["email"],
            &IndexOptions::new().unique(true),
        )
        .unwrap();
        assert_eq!(
            sql,
            r#"CREATE UNIQUE INDEX "idx_users_email" ON "users" ("email")"#
        );
    }

    #[test]
    fn drop_index_styles() {
        assert_eq!(
            drop_index(&Dialect::SQLITE, "users", "idx_users_email"),
            r#"DROP INDEX "idx_users_email""#
        );
        assert_eq!(
            drop_index(&Dialect::MSSQL, "users", "idx_users_email"),
            "DROP INDEX [idx_users_email] ON [users]"
        );
    }

    #[test]
    fn quoting_doubles_embedded_quote_characters() {
        assert_eq!(QuoteStyle::DoubleQuote.quote(r#"we"ird"#), r#""we""ird""#);
        assert_eq!(QuoteStyle::Bracket.quote("we]ird"), "[we]]ird]");
    }
}
