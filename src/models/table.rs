/// A string-typed table with header-derived column names
///
/// Every cell is a `String`; blank cells are the empty string. Source data is
/// unreliable (leading zeros, mixed types, missing values), so nothing is
/// parsed at this layer.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Table {
    headers: Vec<String>,
    rows: Vec<Vec<String>>,
}

impl Table {
    /// Builds a table, padding or truncating each row to the header width
    pub fn new(headers: Vec<String>, rows: Vec<Vec<String>>) -> Self {
        let width = headers.len();
        let rows = rows
            .into_iter()
            .map(|mut row| {
                row.resize(width, String::new());
                row
            })
            .collect();

        Self { headers, rows }
    }

    /// Convenience constructor for literal tables
    pub fn from_rows(headers: &[&str], rows: &[&[&str]]) -> Self {
        Self::new(
            headers.iter().map(|h| h.to_string()).collect(),
            rows.iter()
                .map(|row| row.iter().map(|c| c.to_string()).collect())
                .collect(),
        )
    }

    pub fn headers(&self) -> &[String] {
        &self.headers
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.headers.iter().position(|h| h == name)
    }

    pub fn has_column(&self, name: &str) -> bool {
        self.column_index(name).is_some()
    }

    /// Iterates rows in table order
    pub fn rows(&self) -> impl Iterator<Item = Row<'_>> {
        self.rows.iter().map(move |cells| Row { table: self, cells })
    }

    /// Clones out a whole column, or `None` when the column does not exist
    pub fn column(&self, name: &str) -> Option<Vec<String>> {
        let idx = self.column_index(name)?;
        Some(self.rows.iter().map(|row| row[idx].clone()).collect())
    }

    /// Returns a new table with `name` replaced by `values`
    ///
    /// The column is appended when missing. `values` must have one entry per row.
    pub fn with_column(mut self, name: &str, values: Vec<String>) -> Self {
        debug_assert_eq!(values.len(), self.rows.len());

        let idx = match self.column_index(name) {
            Some(idx) => idx,
            None => {
                self.headers.push(name.to_string());
                for row in &mut self.rows {
                    row.push(String::new());
                }
                self.headers.len() - 1
            }
        };

        for (row, value) in self.rows.iter_mut().zip(values) {
            row[idx] = value;
        }
        self
    }

    /// Returns a new table with `f` applied to every cell
    pub fn map_cells(mut self, f: impl Fn(&str) -> String) -> Self {
        for row in &mut self.rows {
            for cell in row.iter_mut() {
                *cell = f(cell);
            }
        }
        self
    }

    /// Returns a new table with `f` applied to every cell of `name`, if present
    pub fn map_column(mut self, name: &str, f: impl Fn(&str) -> String) -> Self {
        if let Some(idx) = self.column_index(name) {
            for row in &mut self.rows {
                row[idx] = f(&row[idx]);
            }
        }
        self
    }
}

/// Borrowed view of one table row
#[derive(Debug, Clone, Copy)]
pub struct Row<'a> {
    table: &'a Table,
    cells: &'a [String],
}

impl<'a> Row<'a> {
    /// Cell value, or `None` when the column is absent
    pub fn get(&self, column: &str) -> Option<&'a str> {
        self.table
            .column_index(column)
            .map(|idx| self.cells[idx].as_str())
    }

    /// Cell value, or `default` when the column is absent
    pub fn get_or(&self, column: &str, default: &'a str) -> &'a str {
        self.get(column).unwrap_or(default)
    }
}
