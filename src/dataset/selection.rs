/// Ordered, duplicate-free list of chosen column names.
///
/// The order is the order in which columns were first toggled on; preview and
/// export both follow it.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Selection {
    columns: Vec<String>,
}

impl Selection {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds `column` at the end if absent, removes it if present.
    ///
    /// # Returns
    /// `true` if the column is selected after the call
    pub fn toggle(&mut self, column: &str) -> bool {
        match self.columns.iter().position(|it| it == column) {
            Some(index) => {
                self.columns.remove(index);
                false
            }
            None => {
                self.columns.push(column.to_owned());
                true
            }
        }
    }

    pub fn contains(&self, column: &str) -> bool {
        self.columns.iter().any(|it| it == column)
    }

    pub fn clear(&mut self) {
        self.columns.clear();
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.columns.iter().map(String::as_str)
    }
}

impl<S: AsRef<str>> FromIterator<S> for Selection {
    /// Toggles each name in turn, so a name given twice ends up deselected.
    fn from_iter<T: IntoIterator<Item = S>>(iter: T) -> Self {
        let mut selection = Selection::new();
        for column in iter {
            selection.toggle(column.as_ref());
        }
        selection
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn toggle_keeps_insertion_order() {
        let mut selection = Selection::new();
        assert!(selection.toggle("b"));
        assert!(selection.toggle("a"));
        assert!(selection.toggle("c"));
        assert!(!selection.toggle("a"));

        assert_eq!(selection.columns(), ["b", "c"]);
        assert!(!selection.contains("a"));
        assert!(selection.toggle("a"));
        assert_eq!(selection.iter().collect::<Vec<_>>(), vec!["b", "c", "a"]);
    }

    #[test]
    fn toggle_twice_restores() {
        let mut selection: Selection = ["name", "age"].into_iter().collect();
        let before = selection.clone();
        selection.toggle("city");
        selection.toggle("city");
        assert_eq!(selection, before);

        selection.toggle("name");
        selection.toggle("name");
        assert_eq!(selection.len(), 2);
        assert!(selection.contains("name"));
    }

    #[test]
    fn collect_toggles() {
        let selection: Selection = ["a", "b", "a"].into_iter().collect();
        assert_eq!(selection.columns(), ["b"]);

        let mut selection = selection;
        selection.clear();
        assert!(selection.is_empty());
    }
}
