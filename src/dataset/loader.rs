//! Positional sensor-table loader.
//!
//! Supported formats, chosen by extension:
//! * `.txt` / `.dat` - whitespace-delimited (CMAPSS native layout)
//! * `.xlsx` / `.xlsm` / `.xlsb` / `.xls` / `.ods` - first worksheet
//! * anything else - comma-separated
//!
//! Files carry no header row. A first row whose unit id or cycle does not
//! parse as a number is treated as a stray header and dropped; any other
//! malformed row, the first included, fails the whole load.

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use calamine::{open_workbook_auto, Data, Reader};

use super::{DatasetError, SensorRow, SensorTable};

/// Minimum columns: unit id, cycle, one sensor.
const MIN_COLUMNS: usize = 3;

/// Largest integer an `f64` represents exactly.
const MAX_EXACT_INT: f64 = 9_007_199_254_740_992.0;

/// On-disk layout of a dataset file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DatasetFormat {
    Whitespace,
    Delimited,
    Spreadsheet,
}

impl DatasetFormat {
    pub fn from_path(path: &Path) -> Self {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .unwrap_or("")
            .to_ascii_lowercase();

        match ext.as_str() {
            "txt" | "dat" => DatasetFormat::Whitespace,
            "xlsx" | "xlsm" | "xlsb" | "xls" | "ods" => DatasetFormat::Spreadsheet,
            _ => DatasetFormat::Delimited,
        }
    }
}

/// Load a sensor table from `path`.
pub fn load_table(path: &Path) -> Result<SensorTable, DatasetError> {
    if !path.exists() {
        return Err(DatasetError::NotFound(path.to_path_buf()));
    }

    let format = DatasetFormat::from_path(path);
    let table = match format {
        DatasetFormat::Whitespace => load_whitespace(path)?,
        DatasetFormat::Delimited => load_delimited(path)?,
        DatasetFormat::Spreadsheet => load_spreadsheet(path)?,
    };

    tracing::debug!(
        path = %path.display(),
        ?format,
        rows = table.len(),
        num_sensors = table.num_sensors(),
        "Loaded sensor table"
    );
    Ok(table)
}

fn load_whitespace(path: &Path) -> Result<SensorTable, DatasetError> {
    let reader = BufReader::new(File::open(path)?);
    let mut builder = TableBuilder::default();

    for (i, line) in reader.lines().enumerate() {
        let line = line?;
        let cells = line.split_whitespace().map(parse_cell).collect();
        builder.push(i + 1, cells)?;
    }

    builder.finish()
}

fn load_delimited(path: &Path) -> Result<SensorTable, DatasetError> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_path(path)?;
    let mut builder = TableBuilder::default();

    for (i, result) in reader.records().enumerate() {
        let record = result?;
        let line = record
            .position()
            .map(|p| p.line() as usize)
            .unwrap_or(i + 1);

        let mut fields: Vec<&str> = record.iter().collect();
        while fields.last().is_some_and(|f| f.is_empty()) {
            fields.pop();
        }
        builder.push(line, fields.into_iter().map(parse_cell).collect())?;
    }

    builder.finish()
}

fn load_spreadsheet(path: &Path) -> Result<SensorTable, DatasetError> {
    let mut workbook = open_workbook_auto(path)?;
    let range = workbook
        .worksheet_range_at(0)
        .ok_or_else(|| DatasetError::Spreadsheet("workbook has no worksheets".to_string()))??;
    let mut builder = TableBuilder::default();

    for (i, row) in range.rows().enumerate() {
        let mut cells: Vec<Option<f64>> = row.iter().map(spreadsheet_cell).collect();
        let trailing_empty = row
            .iter()
            .rev()
            .take_while(|c| matches!(c, Data::Empty))
            .count();
        cells.truncate(row.len() - trailing_empty);
        builder.push(i + 1, cells)?;
    }

    builder.finish()
}

/// Numeric value of a text cell; `None` for blanks, text and non-finite values.
fn parse_cell(raw: &str) -> Option<f64> {
    raw.trim().parse::<f64>().ok().filter(|v| v.is_finite())
}

fn spreadsheet_cell(cell: &Data) -> Option<f64> {
    match cell {
        Data::Float(v) => Some(*v).filter(|v| v.is_finite()),
        Data::Int(v) => Some(*v as f64),
        Data::String(s) => parse_cell(s),
        _ => None,
    }
}

fn integral(value: f64) -> Option<i64> {
    (value.fract() == 0.0 && value.abs() < MAX_EXACT_INT).then_some(value as i64)
}

/// Accumulates parsed rows and enforces the positional shape.
#[derive(Default)]
struct TableBuilder {
    rows: Vec<SensorRow>,
    width: Option<usize>,
    header_width: Option<usize>,
    seen_first: bool,
}

impl TableBuilder {
    fn push(&mut self, line: usize, cells: Vec<Option<f64>>) -> Result<(), DatasetError> {
        if cells.is_empty() {
            return Ok(());
        }

        let first = !self.seen_first;
        self.seen_first = true;

        // a header names the unit and cycle columns; numeric ids mean data
        if first && cells.iter().take(2).any(Option::is_none) {
            tracing::debug!(line, "Dropping non-numeric first row");
            self.header_width = Some(cells.len());
            return Ok(());
        }

        if let Some(col) = cells.iter().position(Option::is_none) {
            return Err(DatasetError::format(
                line,
                format!("non-numeric or missing value in column {}", col),
            ));
        }

        let width = *self.width.get_or_insert(cells.len());
        if cells.len() < MIN_COLUMNS {
            return Err(DatasetError::format(
                line,
                format!(
                    "expected at least {} columns (unit, cycle, sensors), found {}",
                    MIN_COLUMNS,
                    cells.len()
                ),
            ));
        }
        if cells.len() != width {
            return Err(DatasetError::format(
                line,
                format!("expected {} columns, found {}", width, cells.len()),
            ));
        }

        let values: Vec<f64> = cells.into_iter().flatten().collect();
        let unit_id = integral(values[0]).ok_or_else(|| {
            DatasetError::format(line, format!("unit id {} is not an integer", values[0]))
        })?;
        let cycle = integral(values[1]).ok_or_else(|| {
            DatasetError::format(line, format!("cycle {} is not an integer", values[1]))
        })?;

        self.rows
            .push(SensorRow::new(unit_id, cycle, values[2..].to_vec()));
        Ok(())
    }

    fn finish(self) -> Result<SensorTable, DatasetError> {
        let width = match self.width.or(self.header_width) {
            Some(w) => w,
            None => return Err(DatasetError::EmptyTable),
        };
        if width < MIN_COLUMNS {
            return Err(DatasetError::format(
                1,
                format!(
                    "expected at least {} columns (unit, cycle, sensors), found {}",
                    MIN_COLUMNS, width
                ),
            ));
        }
        SensorTable::new(self.rows, width - 2)
    }
}
