use std::io::{self, Write};
use std::path::Path;
use chrono::Datelike;
use rust_xlsxwriter::{ExcelDateTime, Format, Workbook, XlsxError};
use thiserror::Error;
use crate::dataset::{Transaction, COLUMNS};

const DATE_FORMAT: &str = "yyyy-mm-dd";
const TIME_COLUMN_WIDTH: f64 = 12.0;

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("failed to write workbook: {0}")]
    Xlsx(#[from] XlsxError),
    #[error("failed to render preview: {0}")]
    Csv(#[from] csv::Error),
    #[error(transparent)]
    Io(#[from] io::Error),
}

/// Writes `transactions` to an `.xlsx` workbook at `path`, replacing any
/// existing file. Row 1 holds the column headers; dates are real Excel dates.
pub fn write_workbook(path: &Path, transactions: &[Transaction]) -> Result<(), ExportError> {
    let mut workbook = Workbook::new();
    let worksheet = workbook.add_worksheet();
    let header_format = Format::new().set_bold();
    let date_format = Format::new().set_num_format(DATE_FORMAT);

    for (col, name) in COLUMNS.iter().enumerate() {
        worksheet.write_string_with_format(0, col as u16, *name, &header_format)?;
    }
    worksheet.set_column_width(2, TIME_COLUMN_WIDTH)?;

    for (i, tx) in transactions.iter().enumerate() {
        let row = i as u32 + 1;
        let date = ExcelDateTime::from_ymd(tx.time.year() as u16, tx.time.month() as u8, tx.time.day() as u8)?;

        worksheet.write_number(row, 0, tx.tran_id as f64)?;
        worksheet.write_number(row, 1, tx.card_id)?;
        worksheet.write_datetime_with_format(row, 2, &date, &date_format)?;
        worksheet.write_number(row, 3, tx.amount)?;
        worksheet.write_string(row, 4, tx.label.to_string())?;
    }

    workbook.save(path)?;
    tracing::info!(path = %path.display(), rows = transactions.len(), "workbook saved");
    Ok(())
}

// Only reports whether something exists at `path` after the write returned.
pub fn export_succeeded(path: &Path) -> bool {
    path.exists()
}

/// Renders rows as a tab-separated table with a header line.
pub fn render_preview<W: Write>(transactions: &[Transaction], writer: W) -> Result<(), ExportError> {
    let mut wtr = csv::WriterBuilder::new()
        .delimiter(b'\t')
        .from_writer(writer);
    for tx in transactions {
        wtr.serialize(tx)?;
    }
    if transactions.is_empty() {
        wtr.write_record(COLUMNS)?;
    }
    wtr.flush()?;
    Ok(())
}

/// First and last `n` rows of the table; they overlap when it is short.
pub fn head_tail(transactions: &[Transaction], n: usize) -> (&[Transaction], &[Transaction]) {
    let head = &transactions[..n.min(transactions.len())];
    let tail = &transactions[transactions.len().saturating_sub(n)..];
    (head, tail)
}

// Writes the workbook and reports on `out`.
// Inputs: output path, the merged table, preview size, and the report sink
// Outputs: Ok once both previews are printed, or the write error
// Key steps:
// 1. Write the workbook
// 2. Print the status line decided by the existence probe
// 3. Stop on a failed write, before any preview
// 4. Print the first and last rows
pub fn export_and_report<W: Write>(
    path: &Path,
    transactions: &[Transaction],
    preview_rows: usize,
    out: &mut W,
) -> Result<(), ExportError> {
    let write_result = write_workbook(path, transactions);
    if let Err(err) = &write_result {
        tracing::error!(path = %path.display(), error = %err, "workbook export failed");
    }

    if export_succeeded(path) {
        writeln!(out, "File has been successfully created at: {}", path.display())?;
    } else {
        writeln!(out, "An error occurred while creating the file.")?;
    }
    write_result?;

    let (head, tail) = head_tail(transactions, preview_rows);
    writeln!(out, "{} first rows:", preview_rows)?;
    render_preview(head, &mut *out)?;
    writeln!(out, "\n{} last rows:", preview_rows)?;
    render_preview(tail, &mut *out)?;
    Ok(())
}
