//! Cell value enum for dynamic column values

use std::cmp::Ordering;
use std::fmt;

use chrono::DateTime;
use chrono::NaiveDate;
use chrono::Utc;
use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;
use serde::Deserialize;
use serde::Serialize;

/// A dynamic value extracted from a record by a column accessor.
///
/// Every filter and sort comparison in the engine operates on cell values,
/// so the enum covers the column types a business data set actually carries:
/// text, numbers, money, booleans and calendar/timestamp dates.
///
/// # Example
///
/// ```
/// use datagrid::value::CellValue;
///
/// let name = CellValue::from("Contoso");
/// let revenue = CellValue::from(1_000_000i64);
/// let active = CellValue::from(true);
/// let empty = CellValue::Null;
///
/// assert!(empty.is_null());
/// assert_eq!(name.to_string(), "Contoso");
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CellValue {
    /// Null/empty value.
    Null,
    /// Boolean value.
    Bool(bool),
    /// 64-bit integer.
    Int(i64),
    /// 64-bit floating point.
    Float(f64),
    /// Arbitrary precision decimal (monetary columns).
    Decimal(Decimal),
    /// Calendar date without time-of-day.
    Date(NaiveDate),
    /// Date and time in UTC.
    DateTime(DateTime<Utc>),
    /// String value.
    Text(String),
}

impl CellValue {
    /// Returns `true` if this is a null value.
    pub fn is_null(&self) -> bool {
        matches!(self, CellValue::Null)
    }

    /// Returns the type name of this value.
    pub fn type_name(&self) -> &'static str {
        match self {
            CellValue::Null => "null",
            CellValue::Bool(_) => "bool",
            CellValue::Int(_) => "int",
            CellValue::Float(_) => "float",
            CellValue::Decimal(_) => "decimal",
            CellValue::Date(_) => "date",
            CellValue::DateTime(_) => "datetime",
            CellValue::Text(_) => "text",
        }
    }

    /// Normalizes this value to a calendar date, dropping any time-of-day.
    ///
    /// Text values are parsed leniently (RFC 3339, then `YYYY-MM-DD`, then
    /// `MM/DD/YYYY`). Returns `None` for values with no calendar date; the
    /// caller decides the fallback.
    pub fn as_calendar_date(&self) -> Option<NaiveDate> {
        match self {
            CellValue::Date(date) => Some(*date),
            CellValue::DateTime(stamp) => Some(stamp.date_naive()),
            CellValue::Text(text) => parse_calendar_date(text),
            _ => None,
        }
    }

    /// Compares two non-null cell values under the engine's total order.
    ///
    /// Same-kind values compare naturally: numeric kinds on the number line
    /// (`NaN` after every other number), text case-insensitively with a
    /// case-sensitive tiebreak, date kinds on the timeline. Values of
    /// different kinds order by a fixed rank: Bool < numeric < Text <
    /// Date/DateTime. `Null` is deliberately not special-cased here; the
    /// sort engine orders nulls last before ever comparing values.
    pub fn compare(&self, other: &CellValue) -> Ordering {
        use CellValue::*;
        match (self, other) {
            (Bool(a), Bool(b)) => a.cmp(b),
            (Int(a), Int(b)) => a.cmp(b),
            (Decimal(a), Decimal(b)) => a.cmp(b),
            (Text(a), Text(b)) => compare_text(a, b),
            (Date(a), Date(b)) => a.cmp(b),
            (DateTime(a), DateTime(b)) => a.cmp(b),
            (Date(a), DateTime(b)) => a.and_time(midnight()).and_utc().cmp(b),
            (DateTime(a), Date(b)) => a.cmp(&b.and_time(midnight()).and_utc()),
            (a, b) if a.is_numeric() && b.is_numeric() => compare_f64(a.to_f64(), b.to_f64()),
            (a, b) => a.type_rank().cmp(&b.type_rank()),
        }
    }

    fn is_numeric(&self) -> bool {
        matches!(
            self,
            CellValue::Int(_) | CellValue::Float(_) | CellValue::Decimal(_)
        )
    }

    fn to_f64(&self) -> f64 {
        match self {
            CellValue::Int(n) => *n as f64,
            CellValue::Float(n) => *n,
            CellValue::Decimal(n) => n.to_f64().unwrap_or(f64::NAN),
            _ => f64::NAN,
        }
    }

    fn type_rank(&self) -> u8 {
        match self {
            CellValue::Null => 0,
            CellValue::Bool(_) => 1,
            CellValue::Int(_) | CellValue::Float(_) | CellValue::Decimal(_) => 2,
            CellValue::Text(_) => 3,
            CellValue::Date(_) | CellValue::DateTime(_) => 4,
        }
    }
}

/// Parses a calendar date out of user-supplied text.
///
/// Accepts RFC 3339 timestamps, `YYYY-MM-DD`, a naive `YYYY-MM-DDTHH:MM:SS`
/// timestamp, and `MM/DD/YYYY`. Returns `None` when nothing matches.
pub fn parse_calendar_date(text: &str) -> Option<NaiveDate> {
    let text = text.trim();
    if text.is_empty() {
        return None;
    }
    if let Ok(stamp) = DateTime::parse_from_rfc3339(text) {
        return Some(stamp.date_naive());
    }
    if let Ok(stamp) = chrono::NaiveDateTime::parse_from_str(text, "%Y-%m-%dT%H:%M:%S") {
        return Some(stamp.date());
    }
    for format in ["%Y-%m-%d", "%m/%d/%Y"] {
        if let Ok(date) = NaiveDate::parse_from_str(text, format) {
            return Some(date);
        }
    }
    None
}

fn midnight() -> chrono::NaiveTime {
    chrono::NaiveTime::MIN
}

/// Case-insensitive ordering with a case-sensitive tiebreak, standing in for
/// locale collation.
fn compare_text(a: &str, b: &str) -> Ordering {
    let folded = a.to_lowercase().cmp(&b.to_lowercase());
    if folded != Ordering::Equal {
        return folded;
    }
    a.cmp(b)
}

fn compare_f64(a: f64, b: f64) -> Ordering {
    match (a.is_nan(), b.is_nan()) {
        (true, true) => Ordering::Equal,
        (true, false) => Ordering::Greater,
        (false, true) => Ordering::Less,
        (false, false) => a.partial_cmp(&b).unwrap_or(Ordering::Equal),
    }
}

impl fmt::Display for CellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CellValue::Null => Ok(()),
            CellValue::Bool(v) => write!(f, "{v}"),
            CellValue::Int(v) => write!(f, "{v}"),
            CellValue::Float(v) => write!(f, "{v}"),
            CellValue::Decimal(v) => write!(f, "{v}"),
            CellValue::Date(v) => write!(f, "{}", v.format("%Y-%m-%d")),
            CellValue::DateTime(v) => write!(f, "{}", v.to_rfc3339()),
            CellValue::Text(v) => f.write_str(v),
        }
    }
}

// =============================================================================
// From implementations
// =============================================================================

impl From<bool> for CellValue {
    fn from(v: bool) -> Self {
        CellValue::Bool(v)
    }
}

impl From<i32> for CellValue {
    fn from(v: i32) -> Self {
        CellValue::Int(v as i64)
    }
}

impl From<i64> for CellValue {
    fn from(v: i64) -> Self {
        CellValue::Int(v)
    }
}

impl From<f64> for CellValue {
    fn from(v: f64) -> Self {
        CellValue::Float(v)
    }
}

impl From<Decimal> for CellValue {
    fn from(v: Decimal) -> Self {
        CellValue::Decimal(v)
    }
}

impl From<String> for CellValue {
    fn from(v: String) -> Self {
        CellValue::Text(v)
    }
}

impl From<&str> for CellValue {
    fn from(v: &str) -> Self {
        CellValue::Text(v.to_string())
    }
}

impl From<NaiveDate> for CellValue {
    fn from(v: NaiveDate) -> Self {
        CellValue::Date(v)
    }
}

impl From<DateTime<Utc>> for CellValue {
    fn from(v: DateTime<Utc>) -> Self {
        CellValue::DateTime(v)
    }
}

impl<T: Into<CellValue>> From<Option<T>> for CellValue {
    fn from(v: Option<T>) -> Self {
        match v {
            Some(inner) => inner.into(),
            None => CellValue::Null,
        }
    }
}

impl Default for CellValue {
    fn default() -> Self {
        CellValue::Null
    }
}
