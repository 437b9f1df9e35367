use std::path::Path;

use crate::error::{CommishError, Result};

/// A single spreadsheet cell before normalization.
#[derive(Debug, Clone, PartialEq)]
pub enum Cell {
    Empty,
    Text(String),
    Number(f64),
    Bool(bool),
}

/// Raw tabular data: one header row plus data rows with arbitrary headers.
#[derive(Debug, Clone)]
pub struct RawSheet {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<Cell>>,
}

impl RawSheet {
    pub fn header_index(&self, name: &str) -> Option<usize> {
        self.headers.iter().position(|h| h == name)
    }
}

fn extension(path: &Path) -> Option<String> {
    path.extension().map(|e| e.to_string_lossy().to_lowercase())
}

/// Open a report file and read it into a `RawSheet`.
///
/// Accepts `.csv` always and `.xlsx`/`.xls` when built with the `xlsx`
/// feature. A file with no data rows is an error, not an empty sheet.
pub fn open_sheet(path: &Path) -> Result<RawSheet> {
    let display = path.display().to_string();
    if !path.exists() {
        return Err(CommishError::BadFile(format!("{display}: file does not exist")));
    }

    let sheet = match extension(path).as_deref() {
        Some("csv") => read_csv(path)?,
        #[cfg(feature = "xlsx")]
        Some("xlsx") | Some("xls") => read_xlsx(path)?,
        _ => {
            return Err(CommishError::BadFile(format!(
                "{display}: expected a .csv, .xlsx, or .xls report"
            )))
        }
    };

    if sheet.rows.is_empty() {
        return Err(CommishError::EmptyFile(display));
    }
    Ok(sheet)
}

fn read_csv(path: &Path) -> Result<RawSheet> {
    let file = std::fs::File::open(path)?;
    let mut rdr = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_reader(std::io::BufReader::new(file));

    let mut headers: Vec<String> = Vec::new();
    let mut rows = Vec::new();
    for result in rdr.records() {
        let record = result?;
        if headers.is_empty() {
            headers = record.iter().map(|f| f.trim().to_string()).collect();
            continue;
        }
        let mut row: Vec<Cell> = record
            .iter()
            .map(|f| {
                if f.trim().is_empty() {
                    Cell::Empty
                } else {
                    Cell::Text(f.to_string())
                }
            })
            .collect();
        // Short records pad out to the header width
        while row.len() < headers.len() {
            row.push(Cell::Empty);
        }
        rows.push(row);
    }

    if headers.is_empty() {
        return Err(CommishError::EmptyFile(path.display().to_string()));
    }
    Ok(RawSheet { headers, rows })
}

#[cfg(feature = "xlsx")]
fn read_xlsx(path: &Path) -> Result<RawSheet> {
    use calamine::{Data, Reader};

    let mut workbook = calamine::open_workbook_auto(path)
        .map_err(|e| CommishError::BadFile(format!("{}: {e}", path.display())))?;
    let sheet_name = workbook
        .sheet_names()
        .first()
        .cloned()
        .ok_or_else(|| CommishError::EmptyFile(path.display().to_string()))?;
    let range = workbook
        .worksheet_range(&sheet_name)
        .map_err(|e| CommishError::BadFile(format!("{}: {e}", path.display())))?;

    let mut cells = range.rows();
    let headers: Vec<String> = cells
        .next()
        .ok_or_else(|| CommishError::EmptyFile(path.display().to_string()))?
        .iter()
        .map(|c| c.to_string().trim().to_string())
        .collect();

    let rows = cells
        .map(|row| {
            row.iter()
                .map(|c| match c {
                    Data::Empty => Cell::Empty,
                    Data::String(s) => Cell::Text(s.clone()),
                    Data::Float(f) => Cell::Number(*f),
                    Data::Int(i) => Cell::Number(*i as f64),
                    Data::Bool(b) => Cell::Bool(*b),
                    Data::DateTime(dt) => Cell::Number(dt.as_f64()),
                    Data::DateTimeIso(s) | Data::DurationIso(s) => Cell::Text(s.clone()),
                    Data::Error(_) => Cell::Empty,
                })
                .collect()
        })
        .collect();

    Ok(RawSheet { headers, rows })
}
