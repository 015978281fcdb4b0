use super::{CellValue, Store, StoreError, Table};
use calamine::{open_workbook, Data, Reader, Xlsx};
use rust_xlsxwriter::Workbook;
use std::path::{Path, PathBuf};

/// A single-sheet workbook holding a header row and data rows.
#[derive(Debug, Clone)]
pub struct XlsxTableFile {
    path: PathBuf,
}

impl XlsxTableFile {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Store for XlsxTableFile {
    type Doc = Table;

    fn exists(&self) -> bool {
        self.path.is_file()
    }

    fn load(&self) -> Result<Table, StoreError> {
        if !self.exists() {
            return Err(StoreError::Missing {
                path: self.path.clone(),
            });
        }

        let mut workbook: Xlsx<_> = open_workbook(&self.path)?;
        let sheet = workbook.sheet_names().first().cloned().ok_or_else(|| {
            StoreError::Malformed("workbook contains no sheets".to_string())
        })?;
        let range = match workbook.worksheet_range_at(0) {
            Some(r) => r?,
            None => {
                return Err(StoreError::Malformed(
                    "workbook contains no sheets".to_string(),
                ))
            }
        };

        let mut rows = range.rows();
        let header: Vec<String> = match rows.next() {
            Some(r) => r.iter().map(|c| cell_from_data(c).to_display()).collect(),
            None => {
                return Err(StoreError::Malformed(format!(
                    "sheet {} has no header row",
                    sheet
                )))
            }
        };
        if header.iter().all(|h| h.trim().is_empty()) {
            return Err(StoreError::Malformed(format!(
                "sheet {} has an empty header row",
                sheet
            )));
        }

        let rows = rows
            .map(|r| r.iter().map(cell_from_data).collect::<Vec<_>>())
            .filter(|r| !r.iter().all(CellValue::is_empty))
            .collect();

        Ok(Table {
            sheet,
            header,
            rows,
        })
    }

    fn save(&self, table: &Table) -> Result<(), StoreError> {
        let mut workbook = Workbook::new();
        let worksheet = workbook.add_worksheet();
        worksheet.set_name(&table.sheet)?;

        for (col, h) in table.header.iter().enumerate() {
            worksheet.write_string(0, col as u16, h)?;
        }
        for (i, row) in table.rows.iter().enumerate() {
            let r = (i + 1) as u32;
            for (col, cell) in row.iter().enumerate() {
                match cell {
                    CellValue::Empty => {}
                    CellValue::Text(s) => {
                        worksheet.write_string(r, col as u16, s)?;
                    }
                    CellValue::Number(n) => {
                        worksheet.write_number(r, col as u16, *n)?;
                    }
                }
            }
        }

        workbook.save(&self.path)?;
        Ok(())
    }
}

fn cell_from_data(cell: &Data) -> CellValue {
    match cell {
        Data::Empty => CellValue::Empty,
        Data::String(s) => CellValue::Text(s.clone()),
        Data::Float(f) => CellValue::Number(*f),
        Data::Int(i) => CellValue::Number(*i as f64),
        Data::Bool(b) => CellValue::Text(b.to_string()),
        Data::DateTime(dt) => CellValue::Number(dt.as_f64()),
        Data::DateTimeIso(s) | Data::DurationIso(s) => CellValue::Text(s.clone()),
        Data::Error(e) => CellValue::Text(format!("{:?}", e)),
    }
}
