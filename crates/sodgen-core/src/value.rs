//! Cell value types

use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::Arc;

use chrono::{Duration, NaiveDate, NaiveDateTime, NaiveTime};

/// Largest serial Excel accepts (9999-12-31 23:59:59)
const MAX_DATE_SERIAL: f64 = 2_958_466.0;
const MILLIS_PER_DAY: f64 = 86_400_000.0;

fn serial_epoch() -> Option<NaiveDateTime> {
    NaiveDate::from_ymd_opt(1899, 12, 30).map(|d| d.and_time(NaiveTime::MIN))
}

/// A scalar value stored in one column of a row
///
/// Missing values are an explicit [`CellValue::Empty`]; a `NaN` number is
/// treated as empty everywhere values are compared.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum CellValue {
    /// Empty cell (no value)
    #[default]
    Empty,

    /// Boolean value (TRUE/FALSE)
    Boolean(bool),

    /// Numeric value (all numbers stored as f64)
    Number(f64),

    /// String value
    String(SharedString),

    /// Date or date-time as an Excel 1900 serial (days since 1899-12-30)
    DateTime(f64),
}

impl CellValue {
    /// Create a new string value
    pub fn string<S: AsRef<str>>(s: S) -> Self {
        CellValue::String(SharedString::new(s))
    }

    /// Create a number value, mapping `NaN` to [`CellValue::Empty`]
    pub fn number(n: f64) -> Self {
        if n.is_nan() {
            CellValue::Empty
        } else {
            CellValue::Number(n)
        }
    }

    /// Create a date value from an Excel serial, mapping `NaN` to
    /// [`CellValue::Empty`]
    pub fn date_time(serial: f64) -> Self {
        if serial.is_nan() {
            CellValue::Empty
        } else {
            CellValue::DateTime(serial)
        }
    }

    /// Parse an ISO `YYYY-MM-DD` date or `YYYY-MM-DD HH:MM:SS` date-time
    ///
    /// A `T` separator is accepted in place of the space.
    pub fn parse_iso_date(text: &str) -> Option<Self> {
        let text = text.trim();
        let parsed = NaiveDate::parse_from_str(text, "%Y-%m-%d")
            .map(|d| d.and_time(NaiveTime::MIN))
            .or_else(|_| NaiveDateTime::parse_from_str(text, "%Y-%m-%d %H:%M:%S"))
            .or_else(|_| NaiveDateTime::parse_from_str(text, "%Y-%m-%dT%H:%M:%S"))
            .ok()?;
        Some(CellValue::from(parsed))
    }

    /// Check if the cell is empty
    pub fn is_empty(&self) -> bool {
        match self {
            CellValue::Empty => true,
            CellValue::Number(n) | CellValue::DateTime(n) => n.is_nan(),
            _ => false,
        }
    }

    /// Try to get the value as a number
    pub fn as_number(&self) -> Option<f64> {
        match self {
            CellValue::Number(n) if !n.is_nan() => Some(*n),
            _ => None,
        }
    }

    /// Try to get the value as a calendar date-time
    ///
    /// `None` for non-dates and for serials outside Excel's date range.
    pub fn as_date_time(&self) -> Option<NaiveDateTime> {
        match self {
            CellValue::DateTime(serial) if (0.0..MAX_DATE_SERIAL).contains(serial) => {
                let millis = (serial * MILLIS_PER_DAY).round() as i64;
                serial_epoch()?.checked_add_signed(Duration::milliseconds(millis))
            }
            _ => None,
        }
    }

    /// Try to get the value as a boolean
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            CellValue::Boolean(b) => Some(*b),
            _ => None,
        }
    }

    /// Try to get the value as a string
    pub fn as_string(&self) -> Option<&str> {
        match self {
            CellValue::String(s) => Some(s.as_str()),
            _ => None,
        }
    }

    /// Text form of the value, used where values are matched as text
    ///
    /// Numbers use the shortest `f64` display (`123`, `1.5`), booleans are
    /// `TRUE`/`FALSE`, dates are ISO (`2023-03-15`, `2023-03-15 12:30:00`) and
    /// an empty value is the empty string.
    pub fn to_text(&self) -> String {
        self.to_string()
    }

    /// Compare two values under the row-equality rule
    ///
    /// Two empties are equal, an empty never equals a non-empty value, and
    /// otherwise values must share a type and compare equal.
    pub fn same_value(&self, other: &CellValue) -> bool {
        match (self.is_empty(), other.is_empty()) {
            (true, true) => return true,
            (true, false) | (false, true) => return false,
            (false, false) => {}
        }

        match (self, other) {
            (CellValue::Boolean(a), CellValue::Boolean(b)) => a == b,
            (CellValue::Number(a), CellValue::Number(b)) => a == b,
            (CellValue::DateTime(a), CellValue::DateTime(b)) => a == b,
            (CellValue::String(a), CellValue::String(b)) => a == b,
            _ => false,
        }
    }

    /// Feed a normalized form of the value into a hasher
    ///
    /// Values that are [`same_value`](Self::same_value)-equal hash identically.
    pub fn hash_normalized<H: Hasher>(&self, state: &mut H) {
        if self.is_empty() {
            0u8.hash(state);
            return;
        }

        match self {
            CellValue::Boolean(b) => {
                1u8.hash(state);
                b.hash(state);
            }
            CellValue::Number(n) => {
                2u8.hash(state);
                // -0.0 == 0.0
                let n = if *n == 0.0 { 0.0f64 } else { *n };
                n.to_bits().hash(state);
            }
            CellValue::String(s) => {
                3u8.hash(state);
                s.hash(state);
            }
            CellValue::DateTime(n) => {
                4u8.hash(state);
                let n = if *n == 0.0 { 0.0f64 } else { *n };
                n.to_bits().hash(state);
            }
            CellValue::Empty => {}
        }
    }

    /// Get the type name for error messages
    pub fn type_name(&self) -> &'static str {
        match self {
            CellValue::Empty => "empty",
            CellValue::Boolean(_) => "boolean",
            CellValue::Number(_) => "number",
            CellValue::String(_) => "string",
            CellValue::DateTime(_) => "date",
        }
    }
}

impl fmt::Display for CellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CellValue::Empty => write!(f, ""),
            CellValue::Number(n) | CellValue::DateTime(n) if n.is_nan() => write!(f, ""),
            CellValue::Boolean(b) => write!(f, "{}", if *b { "TRUE" } else { "FALSE" }),
            CellValue::Number(n) => write!(f, "{}", n),
            CellValue::String(s) => write!(f, "{}", s.as_str()),
            CellValue::DateTime(n) => match self.as_date_time() {
                Some(dt) if dt.time() == NaiveTime::MIN => write!(f, "{}", dt.format("%Y-%m-%d")),
                Some(dt) => write!(f, "{}", dt.format("%Y-%m-%d %H:%M:%S")),
                None => write!(f, "{}", n),
            },
        }
    }
}

impl From<bool> for CellValue {
    fn from(b: bool) -> Self {
        CellValue::Boolean(b)
    }
}

impl From<i32> for CellValue {
    fn from(n: i32) -> Self {
        CellValue::Number(n as f64)
    }
}

impl From<i64> for CellValue {
    fn from(n: i64) -> Self {
        CellValue::Number(n as f64)
    }
}

impl From<f64> for CellValue {
    fn from(n: f64) -> Self {
        CellValue::number(n)
    }
}

impl From<NaiveDateTime> for CellValue {
    fn from(dt: NaiveDateTime) -> Self {
        let days = serial_epoch()
            .map_or(f64::NAN, |epoch| {
                (dt - epoch).num_milliseconds() as f64 / MILLIS_PER_DAY
            });
        CellValue::date_time(days)
    }
}

impl From<NaiveDate> for CellValue {
    fn from(d: NaiveDate) -> Self {
        CellValue::from(d.and_time(NaiveTime::MIN))
    }
}

impl From<&str> for CellValue {
    fn from(s: &str) -> Self {
        CellValue::string(s)
    }
}

impl From<String> for CellValue {
    fn from(s: String) -> Self {
        CellValue::string(s)
    }
}

impl<T: Into<CellValue>> From<Option<T>> for CellValue {
    fn from(value: Option<T>) -> Self {
        value.map_or(CellValue::Empty, Into::into)
    }
}

/// Shared string for cheap row copies
///
/// Expanded rows repeat most of their template's strings, so string data is
/// reference counted rather than reallocated per copy.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct SharedString(Arc<str>);

impl SharedString {
    /// Create a new shared string
    pub fn new<S: AsRef<str>>(s: S) -> Self {
        SharedString(Arc::from(s.as_ref()))
    }

    /// Get the string slice
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Get the length of the string
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Check if the string is empty
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Debug for SharedString {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}", self.0)
    }
}

impl fmt::Display for SharedString {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl AsRef<str> for SharedString {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl From<&str> for SharedString {
    fn from(s: &str) -> Self {
        SharedString::new(s)
    }
}

impl From<String> for SharedString {
    fn from(s: String) -> Self {
        SharedString::new(s)
    }
}
