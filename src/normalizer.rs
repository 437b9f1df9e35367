use rusqlite::types::{ToSql, ToSqlOutput};

use crate::carrier::{CanonicalField, Carrier, FieldKind};
use crate::sheet::{Cell, RawSheet};

/// A normalized cell value, ready for SQLite.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Null,
    Text(String),
    Real(f64),
    Int(i64),
    Bool(bool),
}

impl Value {
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            Value::Text(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Real(v) => Some(*v),
            Value::Int(v) => Some(*v as f64),
            _ => None,
        }
    }

}

impl ToSql for Value {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        match self {
            Value::Null => Ok(ToSqlOutput::from(rusqlite::types::Null)),
            Value::Text(s) => Ok(ToSqlOutput::from(s.as_str())),
            Value::Real(v) => Ok(ToSqlOutput::from(*v)),
            Value::Int(v) => Ok(ToSqlOutput::from(*v)),
            Value::Bool(b) => Ok(ToSqlOutput::from(*b)),
        }
    }
}

/// A table holding only canonical columns, values cleaned and coerced.
#[derive(Debug, Clone)]
pub struct NormalizedTable {
    pub carrier: Carrier,
    pub columns: Vec<CanonicalField>,
    pub rows: Vec<Vec<Value>>,
}

impl NormalizedTable {
    pub fn column_index(&self, field: CanonicalField) -> Option<usize> {
        self.columns.iter().position(|c| *c == field)
    }

    /// Iterate one column's values; empty iterator when the column is absent.
    pub fn column_values(&self, field: CanonicalField) -> impl Iterator<Item = &Value> {
        let idx = self.column_index(field);
        self.rows.iter().filter_map(move |row| idx.map(|i| &row[i]))
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// Rename columns per the carrier mapping, drop everything unmapped, clean
/// strings, and coerce each kept column to its canonical type.
///
/// Mapped columns absent from the source are silently omitted; coercion
/// failures degrade to null rather than failing the file.
pub fn normalize(sheet: &RawSheet, carrier: Carrier) -> NormalizedTable {
    // (source column index, canonical field), in mapping order
    let bound: Vec<(usize, CanonicalField)> = carrier
        .mapping()
        .iter()
        .filter_map(|(raw, field)| sheet.header_index(raw).map(|idx| (idx, *field)))
        .collect();

    let columns: Vec<CanonicalField> = bound.iter().map(|(_, f)| *f).collect();
    let rows = sheet
        .rows
        .iter()
        .map(|row| {
            bound
                .iter()
                .map(|(idx, field)| {
                    let cell = row.get(*idx).unwrap_or(&Cell::Empty);
                    coerce(clean(cell), field.kind())
                })
                .collect()
        })
        .collect();

    NormalizedTable { carrier, columns, rows }
}

/// Trim strings and collapse empty / placeholder text to nothing.
fn clean(cell: &Cell) -> Cell {
    match cell {
        Cell::Text(s) => {
            let trimmed = s.trim();
            if trimmed.is_empty() || trimmed.eq_ignore_ascii_case("nan") {
                Cell::Empty
            } else {
                Cell::Text(trimmed.to_string())
            }
        }
        other => other.clone(),
    }
}

fn coerce(cell: Cell, kind: FieldKind) -> Value {
    match kind {
        FieldKind::Text => coerce_text(cell),
        FieldKind::Date => coerce_date(cell),
        FieldKind::Numeric => coerce_numeric(cell),
        FieldKind::Integer => coerce_integer(cell),
        FieldKind::Boolean => coerce_boolean(cell),
    }
}

fn coerce_text(cell: Cell) -> Value {
    match cell {
        Cell::Empty => Value::Null,
        Cell::Text(s) => Value::Text(s),
        Cell::Number(n) => {
            if n.fract() == 0.0 && n.abs() < 1e15 {
                Value::Text(format!("{}", n as i64))
            } else {
                Value::Text(format!("{n}"))
            }
        }
        Cell::Bool(b) => Value::Text(if b { "true" } else { "false" }.to_string()),
    }
}

fn coerce_date(cell: Cell) -> Value {
    match cell {
        Cell::Text(s) => match parse_date(&s) {
            Some(iso) => Value::Text(iso),
            None => Value::Null,
        },
        Cell::Number(serial) => match excel_serial_to_date(serial) {
            Some(iso) => Value::Text(iso),
            None => Value::Null,
        },
        _ => Value::Null,
    }
}

fn coerce_numeric(cell: Cell) -> Value {
    match cell {
        Cell::Number(n) => Value::Real(n),
        Cell::Text(s) => match parse_amount(&s) {
            Some(n) => Value::Real(n),
            None => Value::Null,
        },
        _ => Value::Null,
    }
}

fn coerce_integer(cell: Cell) -> Value {
    let n = match cell {
        Cell::Number(n) => n,
        Cell::Text(s) => match parse_amount(&s) {
            Some(n) => n,
            None => return Value::Null,
        },
        _ => return Value::Null,
    };
    if n.fract() == 0.0 && n.abs() < 1e15 {
        Value::Int(n as i64)
    } else {
        Value::Real(n)
    }
}

fn coerce_boolean(cell: Cell) -> Value {
    match cell {
        Cell::Bool(b) => Value::Bool(b),
        Cell::Number(n) if n == 1.0 => Value::Bool(true),
        Cell::Number(n) if n == 0.0 => Value::Bool(false),
        Cell::Text(s) => match s.to_lowercase().as_str() {
            "true" | "yes" | "1" => Value::Bool(true),
            "false" | "no" | "0" => Value::Bool(false),
            _ => Value::Null,
        },
        _ => Value::Null,
    }
}

/// Parse a monetary/numeric string; currency symbols, thousands separators,
/// and accounting-style parenthesized negatives are accepted.
pub fn parse_amount(raw: &str) -> Option<f64> {
    let s = raw.replace(',', "").replace('"', "").replace('$', "");
    let s = s.trim();
    if let Some(inner) = s.strip_prefix('(').and_then(|v| v.strip_suffix(')')) {
        return inner.trim().parse::<f64>().ok().map(|v| -v);
    }
    s.parse().ok()
}

const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%m/%d/%Y", "%m/%d/%y", "%Y/%m/%d"];
const DATETIME_FORMATS: &[&str] = &["%Y-%m-%d %H:%M:%S", "%m/%d/%Y %H:%M:%S", "%Y-%m-%dT%H:%M:%S"];

/// Parse a date string in any of the formats carriers actually emit,
/// normalized to ISO-8601.
pub fn parse_date(raw: &str) -> Option<String> {
    let raw = raw.trim();
    for fmt in DATE_FORMATS {
        if let Ok(d) = chrono::NaiveDate::parse_from_str(raw, fmt) {
            return Some(d.format("%Y-%m-%d").to_string());
        }
    }
    for fmt in DATETIME_FORMATS {
        if let Ok(dt) = chrono::NaiveDateTime::parse_from_str(raw, fmt) {
            return Some(dt.date().format("%Y-%m-%d").to_string());
        }
    }
    None
}

/// Excel epoch is 1899-12-30 (accounting for the 1900 leap year bug).
/// Serials outside a sane reporting window are treated as not-a-date.
pub fn excel_serial_to_date(serial: f64) -> Option<String> {
    if !(1.0..200_000.0).contains(&serial) {
        return None;
    }
    let base = chrono::NaiveDate::from_ymd_opt(1899, 12, 30)?;
    let date = base + chrono::Duration::days(serial as i64);
    Some(date.format("%Y-%m-%d").to_string())
}
