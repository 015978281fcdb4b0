//! File-backed stores for the roster workbook and the credentials document.

mod error;
mod json;
mod xlsx;

pub use error::StoreError;
pub use json::JsonFile;
pub use xlsx::XlsxTableFile;

/// A load/save pair over one persisted document.
///
/// Every call opens the backing file, does its work and closes it again; no
/// handle outlives the call.
pub trait Store {
    type Doc;

    fn exists(&self) -> bool;
    fn load(&self) -> Result<Self::Doc, StoreError>;
    fn save(&self, doc: &Self::Doc) -> Result<(), StoreError>;
}

#[derive(Debug, Clone, PartialEq)]
pub enum CellValue {
    Empty,
    Text(String),
    Number(f64),
}

impl CellValue {
    pub fn text(s: impl Into<String>) -> Self {
        CellValue::Text(s.into())
    }

    pub fn is_empty(&self) -> bool {
        match self {
            CellValue::Empty => true,
            CellValue::Text(s) => s.is_empty(),
            CellValue::Number(_) => false,
        }
    }

    /// String form of the cell. Integral numbers drop their fractional part so
    /// ids typed into a spreadsheet as numbers compare equal to their text.
    pub fn to_display(&self) -> String {
        match self {
            CellValue::Empty => String::new(),
            CellValue::Text(s) => s.clone(),
            CellValue::Number(n) => {
                if n.is_finite() && n.fract() == 0.0 && n.abs() < 1e15 {
                    format!("{}", *n as i64)
                } else {
                    n.to_string()
                }
            }
        }
    }
}

/// One worksheet: a header row followed by data rows.
#[derive(Debug, Clone, PartialEq)]
pub struct Table {
    pub sheet: String,
    pub header: Vec<String>,
    pub rows: Vec<Vec<CellValue>>,
}

impl Table {
    pub fn new(sheet: impl Into<String>, header: &[&str]) -> Self {
        Self {
            sheet: sheet.into(),
            header: header.iter().map(|h| h.to_string()).collect(),
            rows: Vec::new(),
        }
    }

    pub fn column(&self, name: &str) -> Option<usize> {
        self.header.iter().position(|h| h == name)
    }

    /// Cell at `row`/`col`, treating short rows as padded with empties.
    pub fn cell(&self, row: usize, col: Option<usize>) -> String {
        col.and_then(|c| self.rows.get(row).and_then(|r| r.get(c)))
            .map(CellValue::to_display)
            .unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn integral_numbers_display_without_fraction() {
        assert_eq!(CellValue::Number(2023001.0).to_display(), "2023001");
        assert_eq!(CellValue::Number(2.5).to_display(), "2.5");
        assert_eq!(CellValue::Empty.to_display(), "");
        assert_eq!(CellValue::text("一班").to_display(), "一班");
    }

    #[test]
    fn short_rows_read_as_empty() {
        let mut t = Table::new("students", &["a", "b"]);
        t.rows.push(vec![CellValue::text("x")]);
        assert_eq!(t.cell(0, t.column("a")), "x");
        assert_eq!(t.cell(0, t.column("b")), "");
        assert_eq!(t.cell(0, t.column("missing")), "");
    }
}
