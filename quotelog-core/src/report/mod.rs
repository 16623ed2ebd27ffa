//! Workbook report builder.
//!
//! Reads the finalized CSV log and renders a single-sheet workbook: the raw
//! sample rows under a styled header, a per-symbol line chart, and a summary
//! block. The file is written to a temporary sibling and renamed into place
//! on success, so a failed build never leaves a half-written workbook at the
//! output path.

pub mod summary;

pub use summary::{summarize, symbol_order, SymbolSummary};

use crate::log::{read_log, LogError, LOG_HEADER};
use crate::sample::UNAVAILABLE_MARKER;
use rust_xlsxwriter::{Chart, ChartType, Color, Format, FormatBorder, Workbook, XlsxError};
use std::path::{Path, PathBuf};
use thiserror::Error;

const SHEET_NAME: &str = "Stock Data";
const CHART_TITLE: &str = "Stock Prices Over Time";

/// Fill for the data header and the summary column headers.
const HEADER_FILL: u32 = 0xD9E1F2;
/// Fill for the "Summary" section cell.
const SUMMARY_FILL: u32 = 0xBDD7EE;
/// Currency format with 3 decimal places, applied to every price cell.
const PRICE_NUM_FORMAT: &str = "$#,##0.000";

#[derive(Debug, Error)]
pub enum ReportError {
    #[error(transparent)]
    Log(#[from] LogError),

    #[error("log {path} contains no samples")]
    EmptyLog { path: PathBuf },

    #[error("workbook build failed: {0}")]
    Workbook(#[from] XlsxError),

    #[error("failed to finalize workbook {path}: {source}")]
    Finalize {
        path: PathBuf,
        source: std::io::Error,
    },
}

/// What the report contains, for the operator's closing lines.
#[derive(Debug, Clone)]
pub struct ReportStats {
    pub rows: usize,
    pub summaries: Vec<SymbolSummary>,
    pub workbook_path: PathBuf,
}

/// Build the workbook from a finalized log.
///
/// Fatal to this phase only: the log file is never touched, and the caller
/// reports its path so the raw data survives a failed report.
pub fn build_workbook(
    log_path: &Path,
    out_path: &Path,
    currency: &str,
) -> Result<ReportStats, ReportError> {
    let samples = read_log(log_path)?;
    if samples.is_empty() {
        return Err(ReportError::EmptyLog {
            path: log_path.to_path_buf(),
        });
    }

    let order = symbol_order(&samples);
    let summaries = summarize(&samples);

    let mut workbook = Workbook::new();
    let worksheet = workbook.add_worksheet();
    worksheet.set_name(SHEET_NAME)?;

    let header_format = Format::new()
        .set_bold()
        .set_background_color(Color::RGB(HEADER_FILL))
        .set_border(FormatBorder::Thin);
    let summary_header_format = Format::new()
        .set_bold()
        .set_background_color(Color::RGB(HEADER_FILL));
    let section_format = Format::new()
        .set_bold()
        .set_background_color(Color::RGB(SUMMARY_FILL));
    let price_format = Format::new().set_num_format(PRICE_NUM_FORMAT);

    // Data sheet: styled header, then every sample row verbatim. Prices are
    // numeric cells; unavailable entries stay the literal marker so the
    // column keeps its type distinction.
    for (col, title) in LOG_HEADER.iter().enumerate() {
        worksheet.write_string_with_format(0, col as u16, *title, &header_format)?;
    }
    for (i, sample) in samples.iter().enumerate() {
        let row = i as u32 + 1;
        worksheet.write_string(row, 0, sample.timestamp_text())?;
        worksheet.write_string(row, 1, sample.symbol.as_str())?;
        match sample.price {
            Some(price) => {
                worksheet.write_number_with_format(row, 2, price, &price_format)?;
            }
            None => {
                worksheet.write_string(row, 2, UNAVAILABLE_MARKER)?;
            }
        }
    }
    worksheet.set_column_width(0, 20)?;
    worksheet.set_column_width(1, 10)?;
    worksheet.set_column_width(2, 12)?;

    // Trend chart: one series per symbol, spanning that symbol's first to
    // last data row. Ticks interleave symbols, so the span includes other
    // symbols' rows; the chart plots their non-matching cells as gaps.
    let mut chart = Chart::new(ChartType::Line);
    for symbol in &order {
        let mut rows = samples
            .iter()
            .enumerate()
            .filter(|(_, s)| &s.symbol == symbol)
            .map(|(i, _)| i as u32 + 1);
        if let Some(first) = rows.next() {
            let last = rows.last().unwrap_or(first);
            chart
                .add_series()
                .set_name(symbol.as_str())
                .set_categories((SHEET_NAME, first, 0, last, 0))
                .set_values((SHEET_NAME, first, 2, last, 2));
        }
    }
    chart.title().set_name(CHART_TITLE);
    chart.x_axis().set_name("Time");
    let y_label = format!("Price ({currency})");
    chart.y_axis().set_name(y_label.as_str());
    worksheet.insert_chart(1, 4, &chart)?;

    // Summary block below the data rows.
    let summary_row = samples.len() as u32 + 4;
    worksheet.write_string_with_format(summary_row, 0, "Summary", &section_format)?;
    for (col, title) in ["Stock", "Highest", "Lowest", "Average"].iter().enumerate() {
        worksheet.write_string_with_format(summary_row + 1, col as u16, *title, &summary_header_format)?;
    }
    for (i, s) in summaries.iter().enumerate() {
        let row = summary_row + 2 + i as u32;
        worksheet.write_string(row, 0, s.symbol.as_str())?;
        worksheet.write_number_with_format(row, 1, s.highest, &price_format)?;
        worksheet.write_number_with_format(row, 2, s.lowest, &price_format)?;
        worksheet.write_number_with_format(row, 3, s.average, &price_format)?;
    }

    // Atomic finalize: write to a temp sibling, rename into place.
    let tmp_path = out_path.with_extension("xlsx.tmp");
    workbook.save(&tmp_path)?;
    std::fs::rename(&tmp_path, out_path).map_err(|e| {
        let _ = std::fs::remove_file(&tmp_path);
        ReportError::Finalize {
            path: out_path.to_path_buf(),
            source: e,
        }
    })?;

    Ok(ReportStats {
        rows: samples.len(),
        summaries,
        workbook_path: out_path.to_path_buf(),
    })
}
