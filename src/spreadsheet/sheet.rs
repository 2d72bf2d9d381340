use crate::spreadsheet::cell::Cell;
use crate::spreadsheet::range::Range;
use std::collections::BTreeSet;
use std::collections::HashMap;

/// A sheet read from a spreadsheet file: its non-empty cells, the rows present
/// in the source and the column span they use.
pub(crate) struct Sheet {
    /// Source file name
    pub(crate) file_name: String,
    /// Sheet name
    pub(crate) name: String,
    /// All non-empty cells in the sheet
    pub(crate) cells: Vec<Cell>,
    /// Index mapping from (row, col) to cell vector position
    indexes: HashMap<(usize, usize), usize>,
    /// Rows present in the source, with or without values
    present_rows: BTreeSet<usize>,
    /// Used range (row span of present rows, column span of cells and declared dimension)
    pub(crate) row_lower_bound: Option<usize>,
    pub(crate) row_upper_bound: Option<usize>,
    pub(crate) col_lower_bound: Option<usize>,
    pub(crate) col_upper_bound: Option<usize>,
}

impl Sheet {
    pub(super) fn new(file_name: &str, name: &str) -> Self {
        Self {
            file_name: file_name.to_owned(),
            name: name.to_owned(),
            cells: Vec::new(),
            indexes: HashMap::new(),
            present_rows: BTreeSet::new(),
            row_lower_bound: None,
            row_upper_bound: None,
            col_lower_bound: None,
            col_upper_bound: None,
        }
    }

    /// Returns true if the sheet spans no cell at all.
    pub(crate) fn is_empty(&self) -> bool {
        self.bounds().is_none()
    }

    /// Adds a cell to the sheet. A later cell at the same position replaces the earlier one.
    pub(super) fn push(&mut self, cell: Cell) {
        self.cover(cell.row, cell.col);
        match self.indexes.get(&(cell.row, cell.col)) {
            Some(index) => self.cells[*index] = cell,
            None => {
                self.indexes.insert((cell.row, cell.col), self.cells.len());
                self.cells.push(cell);
            }
        }
    }

    /// Marks a row as present and widens the used range to a column, without storing a cell.
    pub(super) fn cover(&mut self, row: usize, col: usize) {
        self.cover_row(row);
        self.update_col_bound(col);
    }

    /// Marks a row as present, even if it holds no value.
    pub(super) fn cover_row(&mut self, row: usize) {
        self.present_rows.insert(row);
        if self.row_lower_bound.map(|row_lower_bound| row < row_lower_bound).unwrap_or(true) {
            self.row_lower_bound = Some(row);
        }
        if self.row_upper_bound.map(|row_upper_bound| row_upper_bound < row).unwrap_or(true) {
            self.row_upper_bound = Some(row);
        }
    }

    /// Widens the column span to a declared dimension. Its rows are not trusted;
    /// only rows present in the source are read.
    pub(super) fn cover_columns(&mut self, range: &Range) {
        for col in [range.col_lower_bound, range.col_upper_bound].into_iter().flatten() {
            self.update_col_bound(col);
        }
    }

    fn update_col_bound(&mut self, col: usize) {
        if self.col_lower_bound.map(|col_lower_bound| col < col_lower_bound).unwrap_or(true) {
            self.col_lower_bound = Some(col);
        }
        if self.col_upper_bound.map(|col_upper_bound| col_upper_bound < col).unwrap_or(true) {
            self.col_upper_bound = Some(col);
        }
    }

    /// Gets the cell at the specified position, if one was stored.
    pub(crate) fn get(&self, row: usize, col: usize) -> Option<&Cell> {
        self.indexes
            .get(&(row, col))
            .and_then(|index| self.cells.get(*index))
    }

    /// Returns the used range as (row_lower, row_upper, col_lower, col_upper).
    pub(crate) fn bounds(&self) -> Option<(usize, usize, usize, usize)> {
        Some((
            self.row_lower_bound?,
            self.row_upper_bound?,
            self.col_lower_bound?,
            self.col_upper_bound?,
        ))
    }

    /// Returns the number of rows present in the source.
    pub(crate) fn row_count(&self) -> usize {
        if self.is_empty() { 0 } else { self.present_rows.len() }
    }

    /// Iterates the present rows in order, each as the optional cells of the column span.
    ///
    /// Rows missing from the source are skipped, so the work done is bounded by
    /// the rows actually read rather than by the declared range.
    pub(crate) fn rows(&self) -> impl Iterator<Item = Vec<Option<&Cell>>> + '_ {
        let columns = self.bounds().map(|(_, _, col_lower, col_upper)| col_lower..=col_upper);
        self.present_rows.iter().filter_map(move |&row| {
            let columns = columns.clone()?;
            Some(columns.map(|col| self.get(row, col)).collect())
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::spreadsheet::cell::CellValue;

    fn push(sheet: &mut Sheet, row: usize, col: usize) {
        sheet.push(Cell {
            row,
            col,
            value: CellValue::Text(format!("{row}:{col}")),
        });
    }

    #[test]
    fn sheet_initial() {
        let sheet = Sheet::new("", "");

        assert!(sheet.is_empty());
        assert_eq!(sheet.bounds(), None);
        assert_eq!(sheet.rows().count(), 0);
    }

    #[test]
    fn sheet_update() {
        let mut sheet = Sheet::new("", "");
        push(&mut sheet, 1, 1);
        push(&mut sheet, 1, 3);
        push(&mut sheet, 3, 1);
        push(&mut sheet, 3, 3);

        assert_eq!(sheet.cells.len(), 4);
        assert_eq!(sheet.bounds(), Some((1, 3, 1, 3)));

        let rows: Vec<_> = sheet.rows().collect();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].len(), 3);
        assert_eq!(rows[0][0].map(|cell| cell.reference()), Some("B2".to_owned()));
        assert!(rows[0][1].is_none());
        assert_eq!(rows[1][2].map(|cell| cell.value.to_string()), Some("3:3".to_owned()));
    }

    #[test]
    fn sheet_replace_same_position() {
        let mut sheet = Sheet::new("", "");
        push(&mut sheet, 0, 0);
        sheet.push(Cell { row: 0, col: 0, value: CellValue::from("again") });

        assert_eq!(sheet.cells.len(), 1);
        assert_eq!(sheet.get(0, 0).map(|cell| cell.value.clone()), Some(CellValue::from("again")));
    }

    #[test]
    fn sheet_cover_dimension_widens_columns_only() {
        let mut sheet = Sheet::new("", "");
        push(&mut sheet, 0, 0);
        sheet.cover_columns(&Range::try_from("A1:C5").unwrap());
        sheet.cover_row(6);

        assert_eq!(sheet.bounds(), Some((0, 6, 0, 2)));
        assert_eq!(sheet.row_count(), 2);
        let rows: Vec<_> = sheet.rows().collect();
        assert_eq!(rows.len(), 2);
        assert!(rows.iter().all(|row| row.len() == 3));
        assert!(rows[1].iter().all(Option::is_none));
    }

    #[test]
    fn sheet_huge_dimension_reads_present_rows() {
        let mut sheet = Sheet::new("", "");
        sheet.cover_columns(&Range::try_from("A1:XFD1048576").unwrap());
        push(&mut sheet, 0, 0);
        push(&mut sheet, 2, 1);

        assert_eq!(sheet.row_count(), 2);
        assert_eq!(sheet.rows().count(), 2);
        assert_eq!(sheet.bounds(), Some((0, 2, 0, 16_383)));
    }

    #[test]
    fn sheet_rows_without_columns_are_empty() {
        let mut sheet = Sheet::new("", "");
        sheet.cover_row(0);

        assert!(sheet.is_empty());
        assert_eq!(sheet.row_count(), 0);
        assert_eq!(sheet.rows().count(), 0);
    }
}
