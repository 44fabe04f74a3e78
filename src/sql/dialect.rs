/// Parameter placeholder style for a SQL engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlaceholderStyle {
    /// Fixed `?` token (`SQLite`)
    Question,
    /// Positionally numbered `$1`, `$2`, ... (`PostgreSQL`)
    Dollar,
    /// Positionally numbered `@P1`, `@P2`, ... (SQL Server)
    AtP,
}

impl PlaceholderStyle {
    /// Placeholder token for the parameter at 1-based `position`.
    #[must_use]
    pub fn token(self, position: usize) -> String {
        match self {
            PlaceholderStyle::Question => "?".to_string(),
            PlaceholderStyle::Dollar => format!("${position}"),
            PlaceholderStyle::AtP => format!("@P{position}"),
        }
    }
}

/// Identifier quoting style.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuoteStyle {
    /// `"ident"` (`SQLite`, `PostgreSQL`)
    DoubleQuote,
    /// `[ident]` (SQL Server)
    Bracket,
}

impl QuoteStyle {
    /// Quote an identifier, doubling any embedded closing quote character.
    #[must_use]
    pub fn quote(self, ident: &str) -> String {
        match self {
            QuoteStyle::DoubleQuote => format!("\"{}\"", ident.replace('"', "\"\"")),
            QuoteStyle::Bracket => format!("[{}]", ident.replace(']', "]]")),
        }
    }
}

/// Row-limiting syntax.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LimitStyle {
    /// `LIMIT n OFFSET m`; `unlimited` is the limit token used when only an
    /// offset was requested (`-1` for `SQLite`, `ALL` for `PostgreSQL`).
    LimitOffset { unlimited: &'static str },
    /// `OFFSET m ROWS FETCH NEXT n ROWS ONLY` (SQL Server; requires an
    /// ORDER BY clause, so one is synthesized when the caller gave no sort).
    OffsetFetch,
}

/// `DROP INDEX` statement form.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DropIndexStyle {
    /// `DROP INDEX name`
    Bare,
    /// `DROP INDEX name ON table` (SQL Server)
    OnTable,
}

/// Everything that varies between the relational engines' SQL.
#[derive(Debug, Clone, Copy)]
pub struct Dialect {
    pub placeholders: PlaceholderStyle,
    pub quoting: QuoteStyle,
    pub supports_returning: bool,
    pub limits: LimitStyle,
    pub drop_index: DropIndexStyle,
}

impl Dialect {
    pub const SQLITE: Dialect = Dialect {
        placeholders: PlaceholderStyle::Question,
        quoting: QuoteStyle::DoubleQuote,
        supports_returning: false,
        limits: LimitStyle::LimitOffset { unlimited: "-1" },
        drop_index: DropIndexStyle::Bare,
    };

    pub const POSTGRES: Dialect = Dialect {
        placeholders: PlaceholderStyle::Dollar,
        quoting: QuoteStyle::DoubleQuote,
        supports_returning: true,
        limits: LimitStyle::LimitOffset { unlimited: "ALL" },
        drop_index: DropIndexStyle::Bare,
    };

    pub const MSSQL: Dialect = Dialect {
        placeholders: PlaceholderStyle::AtP,
        quoting: QuoteStyle::Bracket,
        supports_returning: false,
        limits: LimitStyle::OffsetFetch,
        drop_index: DropIndexStyle::OnTable,
    };

    /// Quote an identifier in this dialect.
    #[must_use]
    pub fn quote(&self, ident: &str) -> String {
        self.quoting.quote(ident)
    }

    /// Placeholder token at 1-based `position`.
    #[must_use]
    pub fn placeholder(&self, position: usize) -> String {
        self.placeholders.token(position)
    }
}
