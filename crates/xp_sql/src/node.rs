use chrono::{NaiveDate, NaiveDateTime};
use xp_json::JsonNode;
use xp_pack::de::{Node, NodeKind};
use xp_pack::extend::Extend;
use xp_pack::{Error, Result};

use crate::rows::{Cell, Column, ColumnType, RowSet};

pub(crate) const FORMAT: &str = "db";

const DATETIME_FORMATS: [&str; 2] = ["%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%dT%H:%M:%S%.f"];
const DATE_FORMAT: &str = "%Y-%m-%d";

/// [`Node`] over a [`RowSet`].
///
/// A result set is an array of rows, a row is an object keyed by column
/// name. Cells holding JSON text can be navigated into like objects.
#[derive(Clone, Copy, Debug)]
pub enum RowNode<'a> {
    Rows(&'a RowSet),
    Row(&'a RowSet, usize),
    /// One column across all rows.
    Column(&'a RowSet, usize),
    Cell(&'a Column, &'a Cell),
    Null,
    Json(JsonNode<'a>),
}

impl<'a> RowNode<'a> {
    /// The cell node, [`RowNode::Null`] for SQL `NULL`.
    pub(crate) fn cell(column: &'a Column, cell: &'a Cell) -> Self {
        match cell.text() {
            None => Self::Null,
            Some(_) => Self::Cell(column, cell),
        }
    }

    /// The parsed JSON content of a cell.
    fn json(&self) -> Result<Option<JsonNode<'a>>> {
        match *self {
            Self::Json(node) => Ok(Some(node)),
            Self::Cell(_, cell) => match cell.json() {
                Ok(value) => Ok(Some(JsonNode(value))),
                Err(message) => Err(Error::mismatch(format!("cell is not json: {message}"))),
            },
            _ => Ok(None),
        }
    }

    /// Cell text and column type for the leaf readers.
    fn leaf(&self, what: &'static str) -> Result<(&'a str, ColumnType)> {
        match *self {
            Self::Cell(column, cell) => Ok((cell.text().unwrap_or_default(), column.ty)),
            _ => Err(Error::mismatch(what)),
        }
    }
}

impl Node for RowNode<'_> {
    const FORMAT: &'static str = FORMAT;

    fn kind(&self) -> NodeKind {
        match *self {
            Self::Rows(_) | Self::Column(..) => NodeKind::Array,
            Self::Row(..) => NodeKind::Object,
            Self::Null => NodeKind::Null,
            Self::Json(node) => node.kind(),
            Self::Cell(column, cell) => {
                let text = cell.text().unwrap_or_default();
                if text.starts_with('{') {
                    return NodeKind::Object;
                }
                if text.starts_with('[') {
                    return NodeKind::Array;
                }
                match column.ty {
                    ColumnType::Integer => NodeKind::Integer,
                    ColumnType::Float => NodeKind::Float,
                    _ => NodeKind::String,
                }
            }
        }
    }

    fn find(&self, key: &str, ext: &Extend) -> Result<Option<Self>> {
        match *self {
            Self::Row(set, row) => {
                let Some(index) = set.column_index(key) else {
                    return Ok(None);
                };
                let column = &set.columns()[index];
                Ok(set
                    .cell(row, index)
                    .filter(|cell| cell.text().is_some())
                    .map(|cell| Self::Cell(column, cell)))
            }
            Self::Null => Ok(None),
            Self::Rows(_) | Self::Column(..) => Err(Error::mismatch("not row")),
            Self::Cell(..) | Self::Json(_) => match self.json()? {
                Some(node) => Ok(node.find(key, ext)?.map(Self::Json)),
                None => Ok(None),
            },
        }
    }

    fn size(&self) -> Result<usize> {
        match *self {
            Self::Rows(set) | Self::Column(set, _) => Ok(set.len()),
            Self::Cell(..) | Self::Json(_) => match self.json()? {
                Some(node) => node.size(),
                None => Ok(0),
            },
            Self::Row(..) | Self::Null => Err(Error::mismatch("not rows")),
        }
    }

    fn at(&self, index: usize) -> Result<Option<Self>> {
        match *self {
            Self::Rows(set) => Ok((index < set.len()).then_some(Self::Row(set, index))),
            Self::Column(set, column) => {
                let col = &set.columns()[column];
                Ok(set.cell(index, column).map(|cell| Self::cell(col, cell)))
            }
            Self::Cell(..) | Self::Json(_) => match self.json()? {
                Some(node) => Ok(node.at(index)?.map(Self::Json)),
                None => Ok(None),
            },
            Self::Row(..) | Self::Null => Err(Error::mismatch("not rows")),
        }
    }

    fn for_each_entry(&self, f: &mut dyn FnMut(&str, Self) -> Result<()>) -> Result<()> {
        match *self {
            Self::Row(set, row) => {
                let Some(cells) = set.row(row) else {
                    return Ok(());
                };
                for (column, cell) in set.columns().iter().zip(cells) {
                    if cell.text().is_some() {
                        f(&column.name, Self::Cell(column, cell))?;
                    }
                }
                Ok(())
            }
            Self::Cell(..) | Self::Json(_) => match self.json()? {
                Some(node) => node.for_each_entry(&mut |key, child| f(key, Self::Json(child))),
                None => Ok(()),
            },
            _ => Err(Error::mismatch("not row")),
        }
    }

    fn read_bool(&self) -> Result<bool> {
        if let Self::Json(node) = self {
            return node.read_bool();
        }
        let (text, _) = self.leaf("not bool")?;
        let text = text.trim();
        if text.eq_ignore_ascii_case("true") {
            return Ok(true);
        }
        if text.eq_ignore_ascii_case("false") || text.is_empty() {
            return Ok(false);
        }
        parse_int(text).map(|i| i != 0).map_err(|_| Error::mismatch("not bool"))
    }

    fn read_i64(&self) -> Result<i64> {
        if let Self::Json(node) = self {
            return node.read_i64();
        }
        let (text, ty) = self.leaf("not integer")?;
        let text = text.trim();
        if text.is_empty() {
            return Ok(0);
        }
        match ty {
            ColumnType::Time => parse_time(text),
            ColumnType::Date | ColumnType::DateTime | ColumnType::Timestamp => {
                parse_int(text).or_else(|_| parse_datetime(text))
            }
            _ => parse_int(text),
        }
    }

    fn read_u64(&self) -> Result<u64> {
        if let Self::Json(node) = self {
            return node.read_u64();
        }
        let (text, ty) = self.leaf("not integer")?;
        if ty.is_temporal() {
            let secs = self.read_i64()?;
            return u64::try_from(secs).map_err(|_| Error::mismatch("integer overflow"));
        }
        let text = text.trim();
        if text.is_empty() {
            return Ok(0);
        }
        text.parse().map_err(|_| int_error(text))
    }

    fn read_f64(&self) -> Result<f64> {
        if let Self::Json(node) = self {
            return node.read_f64();
        }
        let (text, ty) = self.leaf("not number")?;
        if ty.is_temporal() {
            return self.read_i64().map(|secs| secs as f64);
        }
        let text = text.trim();
        if text.is_empty() {
            return Ok(0.0);
        }
        text.parse().map_err(|_| Error::mismatch("not number"))
    }

    fn read_string(&self) -> Result<String> {
        if let Self::Json(node) = self {
            return node.read_string();
        }
        self.leaf("not string").map(|(text, _)| text.to_owned())
    }
}

// -----------------------------------------------------------------------------
// Cell text

fn int_error(text: &str) -> Error {
    if !text.is_empty() && text.trim_start_matches('-').bytes().all(|b| b.is_ascii_digit()) {
        Error::mismatch("integer overflow")
    } else {
        Error::mismatch("not integer")
    }
}

fn parse_int(text: &str) -> Result<i64> {
    text.parse().map_err(|_| int_error(text))
}

/// `[-]H:M:S[.f]` to seconds; hours may exceed a day.
fn parse_time(text: &str) -> Result<i64> {
    let (negative, body) = match text.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, text),
    };
    let mut parts = body.split(':');
    let mut next = || -> Option<i64> {
        let whole = parts.next()?.split('.').next()?;
        whole.parse::<u64>().ok().and_then(|n| i64::try_from(n).ok())
    };
    let secs = next()
        .and_then(|h| h.checked_mul(3600))
        .zip(next().and_then(|m| m.checked_mul(60)))
        .and_then(|(h, m)| h.checked_add(m))
        .zip(next())
        .and_then(|(hm, s)| hm.checked_add(s))
        .ok_or_else(|| Error::mismatch("not time"))?;
    Ok(if negative { -secs } else { secs })
}

/// Date or datetime text to Unix seconds, read as UTC.
fn parse_datetime(text: &str) -> Result<i64> {
    for format in DATETIME_FORMATS {
        if let Ok(datetime) = NaiveDateTime::parse_from_str(text, format) {
            return Ok(datetime.and_utc().timestamp());
        }
    }
    NaiveDate::parse_from_str(text, DATE_FORMAT)
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|datetime| datetime.and_utc().timestamp())
        .ok_or_else(|| Error::mismatch("not date or time"))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn set() -> RowSet {
        let mut set = RowSet::new(vec![
            Column::new("n", ColumnType::Integer),
            Column::new("t", ColumnType::Time),
            Column::new("d", ColumnType::Date),
            Column::new("dt", ColumnType::DateTime),
            Column::new("j", ColumnType::Text),
        ]);
        set.push_row(vec![
            Some("12".into()),
            Some("-25:00:30".into()),
            Some("1970-01-02".into()),
            Some("1970-01-01 00:01:00.5".into()),
            Some(r#"{"k": [1, 2]}"#.into()),
        ])
        .unwrap();
        set.push_row(vec![None, None, None, None, Some("{oops".into())])
            .unwrap();
        set
    }

    #[test]
    fn temporal_cells() {
        let set = set();
        let row = RowNode::Row(&set, 0);
        let get = |key| row.find(key, Extend::DEFAULT).unwrap().unwrap();

        assert_eq!(get("n").kind(), NodeKind::Integer);
        assert_eq!(get("t").read_i64().unwrap(), -(25 * 3600 + 30));
        assert_eq!(get("d").read_i64().unwrap(), 86_400);
        assert_eq!(get("dt").read_u64().unwrap(), 60);
        assert_eq!(get("d").read_string().unwrap(), "1970-01-02");
        assert_eq!(get("j").read_i64().unwrap_err().to_string(), "not integer");
    }

    #[test]
    fn time_out_of_range() {
        let not_time = |text| parse_time(text).unwrap_err().to_string();
        assert_eq!(not_time("3000000000000000:00:00"), "not time");
        assert_eq!(not_time("-9223372036854775808:00:00"), "not time");
        assert_eq!(not_time("0:0:9223372036854775808"), "not time");
        assert_eq!(not_time("1:-2:3"), "not time");
        assert_eq!(not_time("12:30"), "not time");
        assert_eq!(parse_time("838:59:59.25").unwrap(), 838 * 3600 + 59 * 60 + 59);
    }

    #[test]
    fn json_cells() {
        let set = set();
        let cell = RowNode::Row(&set, 0).find("j", Extend::DEFAULT).unwrap().unwrap();
        assert_eq!(cell.kind(), NodeKind::Object);
        let k = cell.find("k", Extend::DEFAULT).unwrap().unwrap();
        assert_eq!(k.size().unwrap(), 2);
        assert_eq!(k.at(1).unwrap().unwrap().read_i64().unwrap(), 2);

        let bad = RowNode::Row(&set, 1).find("j", Extend::DEFAULT).unwrap().unwrap();
        assert!(bad.find("k", Extend::DEFAULT).is_err());
    }

    #[test]
    fn nulls_are_absent() {
        let set = set();
        let row = RowNode::Row(&set, 1);
        assert!(row.find("n", Extend::DEFAULT).unwrap().is_none());
        assert!(row.find("nope", Extend::DEFAULT).unwrap().is_none());

        let mut keys = Vec::new();
        row.for_each_entry(&mut |key, _| {
            keys.push(key.to_owned());
            Ok(())
        })
        .unwrap();
        assert_eq!(keys, ["j"]);

        let column = RowNode::Column(&set, 0);
        assert_eq!(column.size().unwrap(), 2);
        assert!(column.at(1).unwrap().unwrap().is_null());
    }
}
