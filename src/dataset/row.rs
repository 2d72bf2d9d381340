use crate::spreadsheet::CellValue;
use std::collections::HashMap;

/// One data record: column name to cell value.
///
/// Inserting under an existing name replaces the earlier value.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Row(HashMap<String, CellValue>);

impl Row {
    pub fn new() -> Self {
        Self::default()
    }

    /// Value stored under `column`, or `None` if the row has no such column
    pub fn get(&self, column: &str) -> Option<&CellValue> {
        self.0.get(column)
    }

    /// Value stored under `column`, with absent columns read as [`CellValue::Empty`]
    pub fn value(&self, column: &str) -> &CellValue {
        static EMPTY: CellValue = CellValue::Empty;
        self.0.get(column).unwrap_or(&EMPTY)
    }

    pub fn insert(&mut self, column: impl Into<String>, value: CellValue) {
        self.0.insert(column.into(), value);
    }

    pub fn contains(&self, column: &str) -> bool {
        self.0.contains_key(column)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Column names present in the row, in no particular order
    pub fn columns(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }
}

impl<K: Into<String>> FromIterator<(K, CellValue)> for Row {
    fn from_iter<T: IntoIterator<Item = (K, CellValue)>>(iter: T) -> Self {
        Row(iter.into_iter().map(|(key, value)| (key.into(), value)).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn later_value_wins() {
        let mut row = Row::new();
        row.insert("name", CellValue::from("first"));
        row.insert("name", CellValue::from("second"));

        assert_eq!(row.len(), 1);
        assert_eq!(row.get("name"), Some(&CellValue::from("second")));
    }

    #[test]
    fn absent_columns_read_empty() {
        let row: Row = [("age", CellValue::from(30.0))].into_iter().collect();

        assert!(row.contains("age"));
        assert!(row.get("name").is_none());
        assert!(row.value("name").is_empty());
        assert_eq!(row.columns().collect::<Vec<_>>(), vec!["age"]);
    }
}
