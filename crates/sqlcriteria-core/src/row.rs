//! Result rows handed back by executors.

use crate::value::Value;

/// A single result row: ordered column names with their values.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Row {
    columns: Vec<String>,
    values: Vec<Value>,
}

impl Row {
    /// Create a row from parallel column/value lists.
    ///
    /// Extra entries on the longer side are dropped.
    pub fn new(mut columns: Vec<String>, mut values: Vec<Value>) -> Self {
        let len = columns.len().min(values.len());
        columns.truncate(len);
        values.truncate(len);
        Self { columns, values }
    }

    /// Number of columns.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// True if the row has no columns.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Get a value by position.
    pub fn get(&self, index: usize) -> Option<&Value> {
        self.values.get(index)
    }

    /// Get a value by column name (case-insensitive).
    pub fn get_named(&self, name: &str) -> Option<&Value> {
        self.columns
            .iter()
            .position(|c| c.eq_ignore_ascii_case(name))
            .and_then(|i| self.values.get(i))
    }

    /// Column names in result order.
    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    /// Iterate over (column, value) pairs.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.columns
            .iter()
            .map(String::as_str)
            .zip(self.values.iter())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_get_named_ignores_case() {
        let row = Row::new(
            vec!["ID".to_string(), "NAME".to_string()],
            vec![Value::BigInt(1), Value::from("SALES")],
        );
        assert_eq!(row.get_named("name"), Some(&Value::from("SALES")));
        assert_eq!(row.get(0), Some(&Value::BigInt(1)));
        assert_eq!(row.get_named("missing"), None);
    }

    #[test]
    fn test_mismatched_lengths_are_truncated() {
        let row = Row::new(vec!["A".to_string()], vec![Value::Null, Value::Int(2)]);
        assert_eq!(row.len(), 1);
        assert_eq!(row.iter().count(), 1);
    }
}
