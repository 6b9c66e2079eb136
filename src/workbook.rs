use std::path::Path;

use calamine::{open_workbook_auto, Data, Reader};
use thiserror::Error;

// Raw decoded value; casting and range checks belong to the row processor.
#[derive(Debug, Clone, PartialEq)]
pub enum Cell {
    Empty,
    Number(f64),
    Text(String),
    Bool(bool),
}

impl Cell {
    pub fn as_text(&self) -> String {
        match self {
            Cell::Empty => String::new(),
            Cell::Number(f) => {
                if f.fract() == 0.0 {
                    format!("{}", *f as i64)
                } else {
                    format!("{f}")
                }
            }
            Cell::Text(s) => s.clone(),
            Cell::Bool(b) => b.to_string(),
        }
    }

    pub fn is_blank(&self) -> bool {
        match self {
            Cell::Empty => true,
            Cell::Text(s) => s.trim().is_empty(),
            _ => false,
        }
    }
}

#[derive(Debug, Error)]
pub enum DecodeError {
    #[error("failed to decode spreadsheet: {0}")]
    Workbook(#[from] calamine::Error),
    #[error("failed to decode csv: {0}")]
    Csv(#[from] csv::Error),
    #[error("workbook contains no sheets")]
    NoSheet,
}

// Decode a spreadsheet into a rectangular grid; row 0 is the header row.
// Any decode failure aborts with no partial output.
pub fn read_workbook(path: &Path) -> Result<Vec<Vec<Cell>>, DecodeError> {
    let is_csv = path
        .extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("csv"));
    if is_csv {
        read_csv(path)
    } else {
        read_excel(path)
    }
}

fn read_excel(path: &Path) -> Result<Vec<Vec<Cell>>, DecodeError> {
    let mut workbook = open_workbook_auto(path)?;
    let range = workbook
        .worksheet_range_at(0)
        .ok_or(DecodeError::NoSheet)??;

    let mut grid = Vec::with_capacity(range.height());
    for row in range.rows() {
        grid.push(row.iter().map(convert_cell).collect());
    }
    Ok(grid)
}

fn convert_cell(data: &Data) -> Cell {
    match data {
        Data::Empty => Cell::Empty,
        Data::Int(i) => Cell::Number(*i as f64),
        Data::Float(f) => Cell::Number(*f),
        Data::String(s) => Cell::Text(s.clone()),
        Data::Bool(b) => Cell::Bool(*b),
        Data::DateTime(dt) => Cell::Number(dt.as_f64()),
        Data::DateTimeIso(s) | Data::DurationIso(s) => Cell::Text(s.clone()),
        // Cell errors surface as their display text so the row processor
        // rejects them with the literal value quoted.
        Data::Error(e) => Cell::Text(format!("{e}")),
    }
}

fn read_csv(path: &Path) -> Result<Vec<Vec<Cell>>, DecodeError> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_path(path)?;

    let mut grid = Vec::new();
    for record in reader.records() {
        let record = record?;
        let row = record
            .iter()
            .map(|field| {
                if field.trim().is_empty() {
                    Cell::Empty
                } else {
                    Cell::Text(field.to_string())
                }
            })
            .collect();
        grid.push(row);
    }
    Ok(grid)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn reads_csv_into_grid() {
        let mut file = tempfile::Builder::new()
            .suffix(".csv")
            .tempfile()
            .unwrap();
        writeln!(file, "UserID,Email,Nome").unwrap();
        writeln!(file, "u-1,ana@example.com,Ana").unwrap();
        writeln!(file, "u-2,,Bruno").unwrap();
        file.flush().unwrap();

        let grid = read_workbook(file.path()).unwrap();
        assert_eq!(grid.len(), 3);
        assert_eq!(grid[0][0], Cell::Text("UserID".to_string()));
        assert_eq!(grid[1][2], Cell::Text("Ana".to_string()));
        assert_eq!(grid[2][1], Cell::Empty);
    }

    #[test]
    fn corrupt_excel_fails_with_decode_error() {
        let mut file = tempfile::Builder::new()
            .suffix(".xlsx")
            .tempfile()
            .unwrap();
        file.write_all(b"this is not a zip archive").unwrap();
        file.flush().unwrap();

        let result = read_workbook(file.path());
        assert!(result.is_err());
    }

    #[test]
    fn number_cell_renders_integers_without_decimals() {
        assert_eq!(Cell::Number(3.0).as_text(), "3");
        assert_eq!(Cell::Number(3.5).as_text(), "3.5");
    }

    #[test]
    fn blank_detection_covers_whitespace_text() {
        assert!(Cell::Empty.is_blank());
        assert!(Cell::Text("   ".to_string()).is_blank());
        assert!(!Cell::Text("0".to_string()).is_blank());
        assert!(!Cell::Number(0.0).is_blank());
    }
}
