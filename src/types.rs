use chrono::NaiveDateTime;
use serde_json::Value as JsonValue;

/// A single column value in a grid row.
///
/// The underlying store decides the type of every cell; this enum is the
/// closed set of shapes the pipeline knows how to display and filter. Rows
/// keep the driver's column order, so a `Vec<CellValue>` paired with a shared
/// column-name list is a full untyped row.
#[derive(Debug, Clone, PartialEq)]
pub enum CellValue {
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
}

impl CellValue {
    /// Check if this value is NULL
    #[must_use]
    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    /// String form used for display and substring filtering.
    ///
    /// `Null` yields `None`: a null cell has no text and can never match a
    /// non-empty search term.
    #[must_use]
    pub fn display_string(&self) -> Option<String> {
        match self {
            CellValue::Int(v) => Some(v.to_string()),
            CellValue::Float(v) => Some(v.to_string()),
            CellValue::Text(v) => Some(v.clone()),
            CellValue::Bool(v) => Some(v.to_string()),
            CellValue::Timestamp(v) => Some(v.format("%Y-%m-%d %H:%M:%S%.3f").to_string()),
            CellValue::Null => None,
            CellValue::Json(v) => Some(v.to_string()),
        }
    }

    /// JSON form used by the HTTP surface.
    #[must_use]
    pub fn to_json(&self) -> JsonValue {
        match self {
            CellValue::Int(v) => JsonValue::from(*v),
            CellValue::Float(v) => JsonValue::from(*v),
            CellValue::Text(v) => JsonValue::from(v.as_str()),
            CellValue::Bool(v) => JsonValue::from(*v),
            CellValue::Timestamp(v) => {
                JsonValue::from(v.format("%Y-%m-%dT%H:%M:%S%.3f").to_string())
            }
            CellValue::Null => JsonValue::Null,
            CellValue::Json(v) => v.clone(),
        }
    }
}
