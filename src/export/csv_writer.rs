use crate::error::SheetError;
use crate::export::RowSequence;
use csv::QuoteStyle;
use csv::Terminator;
use csv::WriterBuilder;

/// Serializes the header and rows as UTF-8 comma-separated text.
///
/// Fields holding a comma, quote or line break are quoted with embedded
/// quotes doubled; each record ends with `\n`.
pub(super) fn write(rows: &RowSequence) -> Result<Vec<u8>, SheetError> {
    let mut writer = WriterBuilder::new()
        .quote_style(QuoteStyle::Necessary)
        .terminator(Terminator::Any(b'\n'))
        .from_writer(Vec::new());

    writer.write_record(&rows.columns)?;
    for row in &rows.rows {
        writer.write_record(rows.columns.iter().map(|column| row.value(column).to_string()))?;
    }
    writer.into_inner().map_err(|e| SheetError::from(e.into_error()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataset::Row;
    use crate::spreadsheet::CellValue;

    fn text(rows: &RowSequence) -> String {
        String::from_utf8(write(rows).unwrap()).unwrap()
    }

    #[test]
    fn header_and_values() {
        let rows = RowSequence {
            columns: vec!["name".to_owned(), "age".to_owned(), "member".to_owned()],
            rows: vec![
                [("name", CellValue::from("Alice")), ("age", CellValue::from(30.0)), ("member", CellValue::from(true))]
                    .into_iter()
                    .collect::<Row>(),
                [("name", CellValue::from("Bob")), ("age", CellValue::Empty)].into_iter().collect(),
            ],
        };
        assert_eq!(text(&rows), "name,age,member\nAlice,30,TRUE\nBob,,\n");
    }

    #[test]
    fn quoting() {
        let rows = RowSequence {
            columns: vec!["note".to_owned()],
            rows: vec![
                [("note", CellValue::from("a, b"))].into_iter().collect(),
                [("note", CellValue::from("say \"hi\""))].into_iter().collect(),
                [("note", CellValue::from("two\nlines"))].into_iter().collect(),
            ],
        };
        assert_eq!(text(&rows), "note\n\"a, b\"\n\"say \"\"hi\"\"\"\n\"two\nlines\"\n");
    }

    #[test]
    fn header_only() {
        let rows = RowSequence {
            columns: vec!["a".to_owned(), "b".to_owned()],
            rows: Vec::new(),
        };
        assert_eq!(text(&rows), "a,b\n");
    }
}
