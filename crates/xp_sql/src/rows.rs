use core::cell::OnceCell;

use xp_pack::{Error, Result};

/// Declared type of a result column, as far as decoding cares.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ColumnType {
    Integer,
    Float,
    Text,
    Blob,
    /// `YYYY-MM-DD`.
    Date,
    /// `[-]HH:MM:SS`, possibly beyond 24 hours.
    Time,
    /// `YYYY-MM-DD HH:MM:SS`.
    DateTime,
    /// Same text form as [`DateTime`](ColumnType::DateTime).
    Timestamp,
    Other,
}

impl ColumnType {
    /// Classify a declared SQL type name such as `VARCHAR(20)` or `BIGINT`.
    pub fn from_decl(decl: &str) -> Self {
        let decl = decl.to_ascii_uppercase();
        if decl.contains("TIMESTAMP") {
            Self::Timestamp
        } else if decl.contains("DATETIME") {
            Self::DateTime
        } else if decl.contains("DATE") {
            Self::Date
        } else if decl.contains("TIME") {
            Self::Time
        } else if decl.contains("INT") {
            Self::Integer
        } else if decl.contains("CHAR") || decl.contains("TEXT") || decl.contains("CLOB") || decl.contains("JSON") {
            Self::Text
        } else if decl.contains("BLOB") || decl.contains("BINARY") {
            Self::Blob
        } else if decl.contains("REAL") || decl.contains("FLOA") || decl.contains("DOUB") || decl.contains("DECIMAL") {
            Self::Float
        } else {
            Self::Other
        }
    }

    /// Whether the column holds a date or a time.
    #[inline]
    pub const fn is_temporal(self) -> bool {
        matches!(self, Self::Date | Self::Time | Self::DateTime | Self::Timestamp)
    }
}

/// Name and type of a result column.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Column {
    pub name: String,
    pub ty: ColumnType,
}

impl Column {
    #[inline]
    pub fn new(name: impl Into<String>, ty: ColumnType) -> Self {
        Self {
            name: name.into(),
            ty,
        }
    }
}

/// One cell: its text, `None` for SQL `NULL`.
#[derive(Clone, Debug, Default)]
pub struct Cell {
    pub(crate) text: Option<String>,
    /// Parsed on first navigation into the cell.
    pub(crate) json: OnceCell<Result<serde_json::Value, String>>,
}

impl Cell {
    #[inline]
    pub fn new(text: Option<String>) -> Self {
        Self {
            text,
            json: OnceCell::new(),
        }
    }

    #[inline]
    pub fn text(&self) -> Option<&str> {
        self.text.as_deref()
    }

    /// The cell text parsed as JSON.
    pub(crate) fn json(&self) -> &Result<serde_json::Value, String> {
        self.json.get_or_init(|| {
            let text = self.text.as_deref().unwrap_or("null");
            xp_json::parse(text).map_err(|e| e.to_string())
        })
    }
}

/// Something that yields result rows column by column, as text.
///
/// Implement it for a database client to decode its results; the
/// `sqlite` feature provides one over `rusqlite`.
pub trait RowSource {
    fn field_count(&self) -> usize;

    fn field_name(&self, index: usize) -> &str;

    fn field_type(&self, index: usize) -> ColumnType;

    /// The next row, one entry per field; `None` after the last row.
    fn next_row(&mut self) -> Result<Option<Vec<Option<String>>>>;
}

/// A fully fetched result set.
#[derive(Clone, Debug, Default)]
pub struct RowSet {
    columns: Vec<Column>,
    rows: Vec<Vec<Cell>>,
}

impl RowSet {
    #[inline]
    pub fn new(columns: Vec<Column>) -> Self {
        Self {
            columns,
            rows: Vec::new(),
        }
    }

    /// Drain `source` into a row set.
    pub fn from_source<S: RowSource + ?Sized>(source: &mut S) -> Result<Self> {
        let columns = (0..source.field_count())
            .map(|i| Column::new(source.field_name(i), source.field_type(i)))
            .collect();
        let mut set = Self::new(columns);
        while let Some(row) = source.next_row()? {
            set.push_row(row)?;
        }
        Ok(set)
    }

    /// Append a row; it must have one cell per column.
    pub fn push_row(&mut self, cells: Vec<Option<String>>) -> Result<()> {
        if cells.len() != self.columns.len() {
            return Err(Error::custom(format!(
                "row has {} cells, expected {}",
                cells.len(),
                self.columns.len()
            )));
        }
        self.rows.push(cells.into_iter().map(Cell::new).collect());
        Ok(())
    }

    #[inline]
    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    /// Number of rows.
    #[inline]
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Index of the column named `name`.
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c.name == name)
    }

    #[inline]
    pub(crate) fn cell(&self, row: usize, column: usize) -> Option<&Cell> {
        self.rows.get(row)?.get(column)
    }

    #[inline]
    pub(crate) fn row(&self, row: usize) -> Option<&[Cell]> {
        self.rows.get(row).map(Vec::as_slice)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn declared_types() {
        assert_eq!(ColumnType::from_decl("bigint unsigned"), ColumnType::Integer);
        assert_eq!(ColumnType::from_decl("VARCHAR(20)"), ColumnType::Text);
        assert_eq!(ColumnType::from_decl("datetime"), ColumnType::DateTime);
        assert_eq!(ColumnType::from_decl("DATE"), ColumnType::Date);
        assert_eq!(ColumnType::from_decl("TIME"), ColumnType::Time);
        assert_eq!(ColumnType::from_decl("double"), ColumnType::Float);
        assert!(ColumnType::from_decl("TIMESTAMP").is_temporal());
    }

    struct Fixed {
        rows: Vec<Vec<Option<String>>>,
    }

    impl RowSource for Fixed {
        fn field_count(&self) -> usize {
            2
        }

        fn field_name(&self, index: usize) -> &str {
            ["id", "name"][index]
        }

        fn field_type(&self, index: usize) -> ColumnType {
            [ColumnType::Integer, ColumnType::Text][index]
        }

        fn next_row(&mut self) -> Result<Option<Vec<Option<String>>>> {
            Ok(self.rows.pop())
        }
    }

    #[test]
    fn drains_sources() {
        let mut source = Fixed {
            rows: vec![vec![Some("1".into()), None]],
        };
        let set = RowSet::from_source(&mut source).unwrap();
        assert_eq!(set.len(), 1);
        assert_eq!(set.column_index("name"), Some(1));
        assert_eq!(set.cell(0, 1).unwrap().text(), None);

        let mut set = RowSet::new(set.columns().to_vec());
        assert!(set.push_row(vec![None]).is_err());
    }
}
