use crate::dataset::Dataset;
use crate::dataset::Selection;
use std::fmt::Display;

/// Number of leading rows shown in a preview
pub const PREVIEW_ROWS: usize = 5;

/// The first rows of a dataset restricted to the selected columns, rendered as text.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Preview {
    /// Selected column names in selection order
    pub columns: Vec<String>,
    /// Displayed cell text, one inner vector per row
    pub rows: Vec<Vec<String>>,
}

impl Preview {
    /// Builds the preview of at most [`PREVIEW_ROWS`] rows.
    pub fn new(dataset: &Dataset, selection: &Selection) -> Self {
        let columns = selection.columns().to_vec();
        let rows = dataset.rows
            .iter()
            .take(PREVIEW_ROWS)
            .map(|row| columns.iter().map(|column| row.value(column).to_string()).collect())
            .collect();
        Self { columns, rows }
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }
}

impl Display for Preview {
    /// Writes a plain text table with columns padded to their widest entry
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.columns.is_empty() {
            return Ok(());
        }
        let widths: Vec<usize> = self.columns
            .iter()
            .enumerate()
            .map(|(index, column)| {
                self.rows
                    .iter()
                    .map(|row| row[index].chars().count())
                    .chain(std::iter::once(column.chars().count()))
                    .max()
                    .unwrap_or(0)
            })
            .collect();

        write_line(f, &self.columns, &widths)?;
        let rule = widths.iter().map(|width| "-".repeat(*width)).collect::<Vec<_>>().join("-+-");
        writeln!(f, "{}", rule)?;
        for row in &self.rows {
            write_line(f, row, &widths)?;
        }
        Ok(())
    }
}

/// Writes one table line, padding each cell to its column width
fn write_line(f: &mut std::fmt::Formatter<'_>, cells: &[String], widths: &[usize]) -> std::fmt::Result {
    let line = cells
        .iter()
        .zip(widths)
        .map(|(cell, width)| format!("{:<width$}", cell.replace('\n', " "), width = *width))
        .collect::<Vec<_>>()
        .join(" | ");
    writeln!(f, "{}", line.trim_end())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataset::decode;

    #[test]
    fn limited_to_five_rows() {
        let content = "n,sq\n1,1\n2,4\n3,9\n4,16\n5,25\n6,36\n7,49\n";
        let dataset = decode(content.as_bytes(), "squares.csv").unwrap();
        let selection: Selection = ["sq", "n"].into_iter().collect();
        let preview = Preview::new(&dataset, &selection);

        assert_eq!(preview.columns, vec!["sq", "n"]);
        assert_eq!(preview.rows.len(), PREVIEW_ROWS);
        assert_eq!(preview.rows[4], vec!["25", "5"]);
    }

    #[test]
    fn empty_selection() {
        let dataset = decode(b"a,b\n1,2\n", "x.csv").unwrap();
        let preview = Preview::new(&dataset, &Selection::new());

        assert!(preview.is_empty());
        assert_eq!(preview.to_string(), "");
    }

    #[test]
    fn renders_table() {
        let dataset = decode(b"name,age\nAlice,30\nBob,\n", "people.csv").unwrap();
        let selection: Selection = ["name", "age"].into_iter().collect();
        let table = Preview::new(&dataset, &selection).to_string();

        assert_eq!(table, "name  | age\n------+----\nAlice | 30\nBob   |\n");
    }
}
