//! Plain-text tables for terminal output.

use std::fmt;

pub const EMPTY_PLACEHOLDER: &str = "No data";

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Table {
    headers: Vec<String>,
    rows: Vec<Vec<String>>,
}

impl Table {
    #[must_use]
    pub fn new<I, S>(headers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            headers: headers.into_iter().map(Into::into).collect(),
            rows: Vec::new(),
        }
    }

    /// Short rows are padded with empty cells, extra cells are dropped.
    pub fn push_row<I, S>(&mut self, cells: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut row: Vec<String> = cells
            .into_iter()
            .map(Into::into)
            .take(self.headers.len())
            .collect();
        row.resize(self.headers.len(), String::new());
        self.rows.push(row);
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Body rows as printed; an empty table still prints its placeholder row.
    #[must_use]
    pub fn rendered_rows(&self) -> usize {
        self.rows.len().max(1)
    }

    fn widths(&self) -> Vec<usize> {
        self.headers
            .iter()
            .enumerate()
            .map(|(index, header)| {
                self.rows
                    .iter()
                    .map(|row| cell_width(&row[index]))
                    .chain(std::iter::once(cell_width(header)))
                    .max()
                    .unwrap_or(0)
            })
            .collect()
    }
}

fn cell_width(cell: &str) -> usize {
    cell.chars().count()
}

fn write_line(f: &mut fmt::Formatter<'_>, cells: &[String], widths: &[usize]) -> fmt::Result {
    let line = cells
        .iter()
        .zip(widths)
        .map(|(cell, width)| format!("{cell:<width$}"))
        .collect::<Vec<_>>()
        .join(" | ");
    writeln!(f, "{}", line.trim_end())
}

impl fmt::Display for Table {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let widths = self.widths();
        write_line(f, &self.headers, &widths)?;

        let rule = widths
            .iter()
            .map(|width| "-".repeat(*width))
            .collect::<Vec<_>>()
            .join("-+-");
        writeln!(f, "{rule}")?;

        if self.rows.is_empty() {
            let span = rule.chars().count().max(EMPTY_PLACEHOLDER.len());
            return writeln!(f, "{EMPTY_PLACEHOLDER:^span$}");
        }

        for row in &self.rows {
            write_line(f, row, &widths)?;
        }
        Ok(())
    }
}
