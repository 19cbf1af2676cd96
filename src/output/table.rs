//! Plain-text table rendering

use std::io::{self, Write};

const COLUMN_GAP: &str = "  ";

/// A table header with an optional maximum column width (in characters)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Column {
    pub header: String,
    pub max_width: Option<usize>,
}

impl Column {
    pub fn new(header: impl Into<String>) -> Self {
        Self {
            header: header.into(),
            max_width: None,
        }
    }

    pub fn with_max_width(mut self, width: usize) -> Self {
        self.max_width = Some(width);
        self
    }
}

pub fn truncate_string(s: &str, max_len: usize) -> String {
    let char_count = s.chars().count();
    if char_count > max_len {
        let truncated: String = s.chars().take(max_len.saturating_sub(3)).collect();
        format!("{}...", truncated)
    } else {
        s.to_string()
    }
}

fn pad(s: &str, width: usize) -> String {
    let len = s.chars().count();
    format!("{}{}", s, " ".repeat(width.saturating_sub(len)))
}

/// Write `rows` as aligned columns. Rows shorter than the header are padded
/// with empty cells; extra cells are ignored.
pub fn render_table<W: Write>(
    columns: &[Column],
    rows: &[Vec<String>],
    writer: &mut W,
) -> io::Result<()> {
    let cells: Vec<Vec<String>> = rows
        .iter()
        .map(|row| {
            columns
                .iter()
                .enumerate()
                .map(|(i, column)| {
                    let value = row.get(i).map(String::as_str).unwrap_or("");
                    let value = value.replace(['\n', '\r'], " ");
                    match column.max_width {
                        Some(max) => truncate_string(&value, max),
                        None => value,
                    }
                })
                .collect()
        })
        .collect();

    let widths: Vec<usize> = columns
        .iter()
        .enumerate()
        .map(|(i, column)| {
            cells
                .iter()
                .map(|row| row[i].chars().count())
                .chain(std::iter::once(column.header.chars().count()))
                .max()
                .unwrap_or(0)
        })
        .collect();

    let headers: Vec<&str> = columns.iter().map(|c| c.header.as_str()).collect();
    write_line(writer, &headers, &widths)?;
    for row in &cells {
        let row: Vec<&str> = row.iter().map(String::as_str).collect();
        write_line(writer, &row, &widths)?;
    }
    Ok(())
}

fn write_line<W: Write>(writer: &mut W, cells: &[&str], widths: &[usize]) -> io::Result<()> {
    let line = cells
        .iter()
        .zip(widths)
        .map(|(cell, width)| pad(cell, *width))
        .collect::<Vec<_>>()
        .join(COLUMN_GAP);
    writeln!(writer, "{}", line.trim_end())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn render(columns: &[Column], rows: &[Vec<String>]) -> String {
        let mut out = Vec::new();
        render_table(columns, rows, &mut out).unwrap();
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn test_columns_are_aligned() {
        let columns = vec![Column::new("ID"), Column::new("NAME")];
        let rows = vec![
            vec!["1".to_string(), "Alpha".to_string()],
            vec!["100".to_string(), "B".to_string()],
        ];
        assert_eq!(
            render(&columns, &rows),
            "ID   NAME\n1    Alpha\n100  B\n"
        );
    }

    #[test]
    fn test_max_width_truncates() {
        let columns = vec![Column::new("NAME").with_max_width(6)];
        let rows = vec![vec!["Long name here".to_string()]];
        assert_eq!(render(&columns, &rows), "NAME\nLon...\n");
    }

    #[test]
    fn test_short_rows_are_padded() {
        let columns = vec![Column::new("A"), Column::new("B")];
        let rows = vec![vec!["x".to_string()]];
        assert_eq!(render(&columns, &rows), "A  B\nx\n");
    }

    #[test]
    fn test_truncate_string_counts_chars() {
        assert_eq!(truncate_string("héllo wörld", 8), "héllo...");
        assert_eq!(truncate_string("short", 10), "short");
    }
}
