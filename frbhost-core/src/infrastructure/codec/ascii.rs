// frbhost-core/src/infrastructure/codec/ascii.rs

// Whitespace-delimited text tables, readable by astropy's ascii readers.

use std::fmt::Write as _;
use std::fs;
use std::path::Path;

use crate::domain::photometry::{Column, ColumnData, PhotometryTable};
use crate::domain::sed::params::format_float;
use crate::infrastructure::error::InfrastructureError;
use crate::infrastructure::fs::atomic_write;

const MISSING: &str = "nan";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HeaderStyle {
    /// `# id redshift ...` (astropy `commented_header`)
    Commented,
    /// `lambda_filter model_flux ...` (astropy `basic`)
    Plain,
}

fn cell(data: &ColumnData, row: usize) -> String {
    match data {
        ColumnData::Float(v) => v
            .get(row)
            .copied()
            .flatten()
            .map(format_float)
            .unwrap_or_else(|| MISSING.to_string()),
        ColumnData::Int(v) => v
            .get(row)
            .copied()
            .flatten()
            .map(|i| i.to_string())
            .unwrap_or_else(|| MISSING.to_string()),
        ColumnData::Text(v) => match v.get(row).cloned().flatten() {
            Some(s) if needs_quotes(&s) => quote(&s),
            Some(s) => s,
            None => "\"\"".to_string(),
        },
    }
}

/// Text that would not read back as the same text unless quoted.
fn needs_quotes(s: &str) -> bool {
    s.is_empty()
        || s == "--"
        || s.starts_with('#')
        || s.contains(|c: char| c.is_whitespace() || c == '"')
        || s.parse::<f64>().is_ok()
}

/// Embedded quotes are doubled.
fn quote(s: &str) -> String {
    format!("\"{}\"", s.replace('"', "\"\""))
}

/// Render `table` as fixed-width, whitespace-delimited text.
pub fn render_table(table: &PhotometryTable, style: HeaderStyle) -> String {
    let mut grid: Vec<Vec<String>> = Vec::with_capacity(table.row_count() + 1);
    grid.push(table.column_names());
    for row in 0..table.row_count() {
        grid.push(table.columns().iter().map(|c| cell(&c.data, row)).collect());
    }

    let widths: Vec<usize> = (0..table.columns().len())
        .map(|c| grid.iter().map(|r| r[c].len()).max().unwrap_or(0))
        .collect();

    let mut out = String::new();
    for (i, row) in grid.iter().enumerate() {
        if i == 0 && style == HeaderStyle::Commented {
            out.push_str("# ");
        } else if style == HeaderStyle::Commented {
            out.push_str("  ");
        }
        let line: Vec<String> = row
            .iter()
            .zip(&widths)
            .map(|(v, w)| format!("{v:>w$}"))
            .collect();
        let _ = writeln!(out, "{}", line.join(" "));
    }
    out
}

pub fn write_ascii_table(
    path: &Path,
    table: &PhotometryTable,
    style: HeaderStyle,
    overwrite: bool,
) -> Result<(), InfrastructureError> {
    atomic_write(path, render_table(table, style), overwrite)
}

struct Token {
    text: String,
    quoted: bool,
}

fn tokens(line: &str) -> Vec<Token> {
    let mut out = Vec::new();
    let mut current = String::new();
    let mut in_quotes = false;
    let mut quoted = false;
    let mut chars = line.chars().peekable();
    while let Some(c) = chars.next() {
        match c {
            '"' if in_quotes && chars.peek() == Some(&'"') => {
                chars.next();
                current.push('"');
            }
            '"' => {
                in_quotes = !in_quotes;
                quoted = true;
            }
            c if c.is_whitespace() && !in_quotes => {
                if !current.is_empty() || quoted {
                    out.push(Token {
                        text: std::mem::take(&mut current),
                        quoted,
                    });
                    quoted = false;
                }
            }
            c => current.push(c),
        }
    }
    if !current.is_empty() || quoted {
        out.push(Token {
            text: current,
            quoted,
        });
    }
    out
}

/// Quoted cells make a text column; otherwise Int, then Float, then Text.
fn infer_column(name: String, cells: Vec<Token>) -> Column {
    if cells.iter().any(|t| t.quoted) {
        return text_column(name, cells);
    }
    let is_missing = |s: &str| s.eq_ignore_ascii_case(MISSING) || s == "--";

    if let Some(ints) = cells
        .iter()
        .map(|t| {
            if is_missing(&t.text) {
                Some(None)
            } else {
                t.text.parse::<i64>().ok().map(Some)
            }
        })
        .collect::<Option<Vec<_>>>()
    {
        return Column::new(name, ColumnData::Int(ints));
    }
    if let Some(floats) = cells
        .iter()
        .map(|t| {
            if is_missing(&t.text) {
                Some(None)
            } else {
                t.text.parse::<f64>().ok().map(Some)
            }
        })
        .collect::<Option<Vec<_>>>()
    {
        return Column::new(name, ColumnData::Float(floats));
    }
    text_column(name, cells)
}

fn text_column(name: String, cells: Vec<Token>) -> Column {
    Column::new(
        name,
        ColumnData::Text(
            cells
                .into_iter()
                .map(|t| (!t.text.is_empty()).then_some(t.text))
                .collect(),
        ),
    )
}

/// Parse text produced by [`render_table`] (either header style).
pub fn parse_table(text: &str) -> Result<PhotometryTable, String> {
    let mut lines = text.lines().filter(|l| !l.trim().is_empty());
    let header = lines
        .next()
        .ok_or_else(|| "empty table".to_string())?;
    let names: Vec<String> = tokens(header.trim_start().trim_start_matches('#'))
        .into_iter()
        .map(|t| t.text)
        .collect();

    let mut cells: Vec<Vec<Token>> = names.iter().map(|_| Vec::new()).collect();
    for (n, line) in lines.enumerate() {
        if line.trim_start().starts_with('#') {
            continue;
        }
        let row = tokens(line);
        if row.len() != names.len() {
            return Err(format!(
                "row {} has {} fields, expected {}",
                n + 1,
                row.len(),
                names.len()
            ));
        }
        for (col, value) in cells.iter_mut().zip(row) {
            col.push(value);
        }
    }

    let columns = names
        .into_iter()
        .zip(cells)
        .map(|(name, values)| infer_column(name, values))
        .collect();
    PhotometryTable::from_columns(columns).map_err(|e| e.to_string())
}

pub fn read_ascii_table(path: &Path) -> Result<PhotometryTable, InfrastructureError> {
    let text = fs::read_to_string(path)?;
    parse_table(&text).map_err(|reason| {
        InfrastructureError::ConfigError(format!(
            "Cannot parse text table '{}': {reason}",
            path.display()
        ))
    })
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use anyhow::Result;

    fn sample() -> Result<PhotometryTable> {
        Ok(PhotometryTable::from_columns(vec![
            Column::new("id", ColumnData::Text(vec![Some("host A".into()), Some("B".into())])),
            Column::floats("redshift", vec![Some(0.5), None]),
            Column::new("n", ColumnData::Int(vec![Some(1), Some(22)])),
        ])?)
    }

    #[test]
    fn test_render_commented_header() -> Result<()> {
        let text = render_table(&sample()?, HeaderStyle::Commented);
        let mut lines = text.lines();
        assert!(lines.next().unwrap().starts_with("# "));
        assert!(lines.next().unwrap().contains("\"host A\""));
        Ok(())
    }

    #[test]
    fn test_columns_are_aligned() -> Result<()> {
        let text = render_table(&sample()?, HeaderStyle::Plain);
        let lens: Vec<usize> = text.lines().map(str::len).collect();
        assert!(lens.windows(2).all(|w| w[0] == w[1]));
        Ok(())
    }

    #[test]
    fn test_parse_back_both_styles() -> Result<()> {
        let table = sample()?;
        for style in [HeaderStyle::Commented, HeaderStyle::Plain] {
            let back = parse_table(&render_table(&table, style)).unwrap();
            assert_eq!(back, table);
        }
        Ok(())
    }

    #[test]
    fn test_ragged_rows_are_rejected() {
        assert!(parse_table("a b\n1 2 3\n").is_err());
    }

    #[test]
    fn test_text_keeps_its_type_and_quotes() -> Result<()> {
        let table = PhotometryTable::from_columns(vec![
            Column::new(
                "id",
                ColumnData::Text(vec![Some("007".into()), Some("12".into()), Some("nan".into())]),
            ),
            Column::new(
                "note",
                ColumnData::Text(vec![
                    Some("say \"hi\"".into()),
                    Some("\"".into()),
                    Some("#3".into()),
                ]),
            ),
            Column::floats("z", vec![Some(0.1), Some(0.2), None]),
        ])?;
        let text = render_table(&table, HeaderStyle::Commented);
        assert!(text.contains("\"say \"\"hi\"\"\""));

        let back = parse_table(&text).unwrap();
        assert_eq!(back, table);
        Ok(())
    }
}
