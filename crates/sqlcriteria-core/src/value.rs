//! Dynamic SQL values bound to prepared statements.

use serde::{Deserialize, Serialize};

/// A dynamically-typed SQL value.
///
/// Values are always bound as parameters; the literal form produced by
/// [`Value::to_sql_literal`] is only used for the formatted log output.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Value {
    /// SQL NULL
    Null,
    /// Boolean
    Bool(bool),
    /// 16-bit integer
    SmallInt(i16),
    /// 32-bit integer
    Int(i32),
    /// 64-bit integer
    BigInt(i64),
    /// 32-bit float
    Float(f32),
    /// 64-bit float
    Double(f64),
    /// Arbitrary precision decimal kept as its textual form
    Decimal(String),
    /// Text
    Text(String),
    /// Binary data
    Bytes(Vec<u8>),
    /// Date in ISO-8601 form (`YYYY-MM-DD`)
    Date(String),
    /// Time in ISO-8601 form (`HH:MM:SS`)
    Time(String),
    /// Timestamp in ISO-8601 form
    Timestamp(String),
    /// UUID in canonical hyphenated form
    Uuid(String),
    /// JSON document
    Json(serde_json::Value),
}

impl Value {
    /// Check if this value is NULL.
    pub const fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// Get as string slice if this is a textual value.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Text(s) | Value::Decimal(s) => Some(s),
            _ => None,
        }
    }

    /// Get as i64 if this is an integer value.
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Value::SmallInt(v) => Some(i64::from(*v)),
            Value::Int(v) => Some(i64::from(*v)),
            Value::BigInt(v) => Some(*v),
            _ => None,
        }
    }

    /// Render this value as an SQL literal for logging.
    pub fn to_sql_literal(&self) -> String {
        match self {
            Value::Null => "null".to_string(),
            Value::Bool(b) => b.to_string(),
            Value::SmallInt(v) => v.to_string(),
            Value::Int(v) => v.to_string(),
            Value::BigInt(v) => v.to_string(),
            Value::Float(v) => v.to_string(),
            Value::Double(v) => v.to_string(),
            Value::Decimal(s) => s.clone(),
            Value::Text(s)
            | Value::Date(s)
            | Value::Time(s)
            | Value::Timestamp(s)
            | Value::Uuid(s) => quote_literal(s),
            Value::Bytes(bytes) => {
                let mut hex = String::with_capacity(bytes.len() * 2 + 3);
                hex.push_str("x'");
                for b in bytes {
                    hex.push_str(&format!("{:02x}", b));
                }
                hex.push('\'');
                hex
            }
            Value::Json(json) => quote_literal(&json.to_string()),
        }
    }
}

fn quote_literal(s: &str) -> String {
    format!("'{}'", s.replace('\'', "''"))
}

impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Value::Bool(v)
    }
}

impl From<i16> for Value {
    fn from(v: i16) -> Self {
        Value::SmallInt(v)
    }
}

impl From<i32> for Value {
    fn from(v: i32) -> Self {
        Value::Int(v)
    }
}

impl From<i64> for Value {
    fn from(v: i64) -> Self {
        Value::BigInt(v)
    }
}

impl From<f32> for Value {
    fn from(v: f32) -> Self {
        Value::Float(v)
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Value::Double(v)
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Value::Text(v.to_string())
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Value::Text(v)
    }
}

impl From<Vec<u8>> for Value {
    fn from(v: Vec<u8>) -> Self {
        Value::Bytes(v)
    }
}

impl From<serde_json::Value> for Value {
    fn from(v: serde_json::Value) -> Self {
        Value::Json(v)
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(v: Option<T>) -> Self {
        v.map_or(Value::Null, Into::into)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_option_conversion() {
        assert_eq!(Value::from(None::<i64>), Value::Null);
        assert_eq!(Value::from(Some(3_i64)), Value::BigInt(3));
    }

    #[test]
    fn test_literal_quotes_are_doubled() {
        assert_eq!(Value::from("O'Brien").to_sql_literal(), "'O''Brien'");
    }

    #[test]
    fn test_literal_forms() {
        assert_eq!(Value::Null.to_sql_literal(), "null");
        assert_eq!(Value::Int(1000).to_sql_literal(), "1000");
        assert_eq!(Value::Bytes(vec![0xab, 0x01]).to_sql_literal(), "x'ab01'");
        assert_eq!(
            Value::Json(serde_json::json!({"a": 1})).to_sql_literal(),
            "'{\"a\":1}'"
        );
    }

    #[test]
    fn test_as_i64() {
        assert_eq!(Value::SmallInt(2).as_i64(), Some(2));
        assert_eq!(Value::Text("2".into()).as_i64(), None);
    }
}
