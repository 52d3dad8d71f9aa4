use rusqlite::types::ValueRef;
use rusqlite::{Connection, Params, Rows, Statement};
use xp_pack::{Error, Result};

use crate::rows::{Column, ColumnType, RowSet, RowSource};

#[inline]
fn sql_error(err: rusqlite::Error) -> Error {
    Error::custom(err)
}

/// [`RowSource`] over a running `rusqlite` query.
///
/// Column types come from the declared column types; expression columns
/// without one are [`ColumnType::Other`].
pub struct SqliteSource<'s> {
    columns: Vec<Column>,
    rows: Rows<'s>,
}

impl<'s> SqliteSource<'s> {
    /// Run `stmt` with `params`.
    pub fn new<P: Params>(stmt: &'s mut Statement<'_>, params: P) -> Result<Self> {
        let columns = stmt
            .columns()
            .iter()
            .map(|c| {
                let ty = c.decl_type().map_or(ColumnType::Other, ColumnType::from_decl);
                Column::new(c.name(), ty)
            })
            .collect();
        let rows = stmt.query(params).map_err(sql_error)?;
        Ok(Self { columns, rows })
    }
}

impl RowSource for SqliteSource<'_> {
    fn field_count(&self) -> usize {
        self.columns.len()
    }

    fn field_name(&self, index: usize) -> &str {
        &self.columns[index].name
    }

    fn field_type(&self, index: usize) -> ColumnType {
        self.columns[index].ty
    }

    fn next_row(&mut self) -> Result<Option<Vec<Option<String>>>> {
        let count = self.columns.len();
        let Some(row) = self.rows.next().map_err(sql_error)? else {
            return Ok(None);
        };
        let mut cells = Vec::with_capacity(count);
        for index in 0..count {
            let cell = match row.get_ref(index).map_err(sql_error)? {
                ValueRef::Null => None,
                ValueRef::Integer(i) => Some(i.to_string()),
                ValueRef::Real(f) => Some(f.to_string()),
                ValueRef::Text(bytes) | ValueRef::Blob(bytes) => {
                    Some(String::from_utf8_lossy(bytes).into_owned())
                }
            };
            cells.push(cell);
        }
        Ok(Some(cells))
    }
}

/// Run `sql` on `conn` and fetch every row.
pub fn query<P: Params>(conn: &Connection, sql: &str, params: P) -> Result<RowSet> {
    let mut stmt = conn.prepare(sql).map_err(sql_error)?;
    let mut source = SqliteSource::new(&mut stmt, params)?;
    RowSet::from_source(&mut source)
}

#[cfg(test)]
mod tests {
    use rusqlite::params;

    use super::*;

    #[test]
    fn fetches_typed_columns() {
        let conn = Connection::open_in_memory().unwrap();
        conn.execute_batch(
            "CREATE TABLE t (id INTEGER, name VARCHAR(10), at DATETIME, score REAL);
             INSERT INTO t VALUES (1, 'a', '1970-01-01 00:00:10', 0.5);
             INSERT INTO t VALUES (2, NULL, NULL, NULL);",
        )
        .unwrap();

        let set = query(&conn, "SELECT * FROM t WHERE id >= ?1", params![1]).unwrap();
        assert_eq!(set.len(), 2);
        let types: Vec<_> = set.columns().iter().map(|c| c.ty).collect();
        assert_eq!(
            types,
            [ColumnType::Integer, ColumnType::Text, ColumnType::DateTime, ColumnType::Float]
        );
        assert_eq!(set.cell(0, 3).unwrap().text(), Some("0.5"));
        assert_eq!(set.cell(1, 1).unwrap().text(), None);
    }

    #[test]
    fn reports_sql_errors() {
        let conn = Connection::open_in_memory().unwrap();
        assert!(matches!(query(&conn, "SELEC 1", []), Err(Error::Custom { .. })));
    }
}
