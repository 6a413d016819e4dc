/// Column data type
#[derive(Debug, Clone, PartialEq)]
pub enum ColumnType {
    Integer,
    Text,
    /// Free-form VARCHAR as TheCocktailDB sends it
    Varchar,
    /// SQLite stores DATETIME as text; kept for schema readability
    DateTime,
}

impl ColumnType {
    pub fn sql_type(&self) -> &'static str {
        match self {
            ColumnType::Integer => "INTEGER",
            ColumnType::Text => "TEXT",
            ColumnType::Varchar => "VARCHAR",
            ColumnType::DateTime => "DATETIME",
        }
    }
}

/// How a column participates in the table key
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum KeyKind {
    None,
    /// Key supplied by the caller (drink IDs, surrogate ingredient IDs)
    Primary,
    /// Key assigned by SQLite; never part of an INSERT
    AutoIncrement,
}

/// Column definition
#[derive(Debug, Clone)]
pub struct Column {
    pub name: &'static str,
    pub col_type: ColumnType,
    pub key: KeyKind,
}

impl Column {
    pub const fn new(name: &'static str, col_type: ColumnType) -> Self {
        Self {
            name,
            col_type,
            key: KeyKind::None,
        }
    }

    pub const fn primary(name: &'static str) -> Self {
        Self {
            name,
            col_type: ColumnType::Integer,
            key: KeyKind::Primary,
        }
    }

    pub const fn auto_increment(name: &'static str) -> Self {
        Self {
            name,
            col_type: ColumnType::Integer,
            key: KeyKind::AutoIncrement,
        }
    }
}

/// Logical foreign key; declared in DDL, not enforced
#[derive(Debug, Clone)]
pub struct ForeignKey {
    pub column: &'static str,
    pub references_table: &'static str,
    pub references_column: &'static str,
}

impl ForeignKey {
    pub const fn new(
        column: &'static str,
        references_table: &'static str,
        references_column: &'static str,
    ) -> Self {
        Self {
            column,
            references_table,
            references_column,
        }
    }
}

/// Table schema definition
#[derive(Debug, Clone)]
pub struct TableSchema {
    pub name: &'static str,
    pub columns: &'static [Column],
    pub foreign_keys: &'static [ForeignKey],
}

impl TableSchema {
    /// Columns the caller provides values for, in bind order
    pub fn insert_columns(&self) -> Vec<&'static str> {
        self.columns
            .iter()
            .filter(|c| c.key != KeyKind::AutoIncrement)
            .map(|c| c.name)
            .collect()
    }
}

/// A value bound to an INSERT placeholder
#[derive(Debug, Clone, PartialEq)]
pub enum SqlValue {
    Null,
    Integer(i64),
    Text(String),
}

impl SqlValue {
    pub fn bind_to(&self, idx: usize, stmt: &mut rusqlite::Statement) -> rusqlite::Result<()> {
        match self {
            SqlValue::Null => stmt.raw_bind_parameter(idx, rusqlite::types::Null)?,
            SqlValue::Integer(i) => stmt.raw_bind_parameter(idx, i)?,
            SqlValue::Text(s) => stmt.raw_bind_parameter(idx, s.as_str())?,
        }
        Ok(())
    }
}

impl From<i64> for SqlValue {
    fn from(value: i64) -> Self {
        SqlValue::Integer(value)
    }
}

impl From<&str> for SqlValue {
    fn from(value: &str) -> Self {
        SqlValue::Text(value.to_string())
    }
}

impl From<Option<&str>> for SqlValue {
    fn from(value: Option<&str>) -> Self {
        value.map(SqlValue::from).unwrap_or(SqlValue::Null)
    }
}

/// A normalized row that knows its table and how to bind itself
pub trait TableRow {
    fn schema() -> &'static TableSchema;

    /// Values in [`TableSchema::insert_columns`] order
    fn values(&self) -> Vec<SqlValue>;
}
