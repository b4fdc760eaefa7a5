//! Tabular projections of reservation listings for export.
//!
//! Two renderings are produced from the same rows: a CSV file for
//! spreadsheets and a paginated fixed-width text report for printing.

use chrono::{NaiveDate, NaiveDateTime};
use database::services::query_reservation::ReservationDetails;
use models::PaymentStatus;
use rust_decimal::Decimal;
use serde::Serialize;
use thiserror::Error;

/// Rows printed on each page of the text report
pub const ROWS_PER_PAGE: usize = 50;

const TIME_FORMAT: &str = "%Y-%m-%d %H:%M";

#[derive(Debug, Error)]
pub enum ReportError {
    #[error("failed to write CSV: {0}")]
    Csv(#[from] csv::Error),
    #[error("failed to flush CSV: {0}")]
    Io(#[from] std::io::Error),
}

/// One reservation as it appears in an exported report
#[derive(Debug, Clone, PartialEq)]
pub struct ReportRow {
    pub court: String,
    pub start_at: NaiveDateTime,
    pub end_at: NaiveDateTime,
    pub amount: Decimal,
    pub paid: Decimal,
    pub payment_method: Option<String>,
    pub status: PaymentStatus,
}

impl From<&ReservationDetails> for ReportRow {
    fn from(details: &ReservationDetails) -> Self {
        let reservation = &details.reservation;
        Self {
            court: details
                .court_name
                .clone()
                .unwrap_or_else(|| format!("#{}", reservation.court_id)),
            start_at: reservation.start_at,
            end_at: reservation.end_at,
            amount: reservation.total_amount,
            paid: reservation.paid_amount,
            payment_method: reservation.payment_method.clone(),
            status: reservation.payment_status,
        }
    }
}

#[derive(Serialize)]
struct CsvRecord<'a> {
    #[serde(rename = "Court")]
    court: &'a str,
    #[serde(rename = "Start")]
    start: String,
    #[serde(rename = "End")]
    end: String,
    #[serde(rename = "Amount")]
    amount: String,
    #[serde(rename = "Paid")]
    paid: String,
    #[serde(rename = "Payment method")]
    payment_method: &'a str,
    #[serde(rename = "Status")]
    status: &'a str,
}

impl<'a> From<&'a ReportRow> for CsvRecord<'a> {
    fn from(row: &'a ReportRow) -> Self {
        Self {
            court: &row.court,
            start: row.start_at.format(TIME_FORMAT).to_string(),
            end: row.end_at.format(TIME_FORMAT).to_string(),
            amount: format!("{:.2}", row.amount),
            paid: format!("{:.2}", row.paid),
            payment_method: row.payment_method.as_deref().unwrap_or(""),
            status: row.status.as_ref(),
        }
    }
}

/// Serialize rows to CSV with a header line
pub fn to_csv(rows: &[ReportRow]) -> Result<Vec<u8>, ReportError> {
    let mut writer = csv::Writer::from_writer(Vec::new());

    if rows.is_empty() {
        writer.write_record([
            "Court",
            "Start",
            "End",
            "Amount",
            "Paid",
            "Payment method",
            "Status",
        ])?;
    }
    for row in rows {
        writer.serialize(CsvRecord::from(row))?;
    }

    writer
        .into_inner()
        .map_err(|err| ReportError::Io(err.into_error()))
}

/// Render a printable text report, [`ROWS_PER_PAGE`] rows per page with a
/// form feed between pages
pub fn render_printable(title: &str, rows: &[ReportRow]) -> String {
    let pages: Vec<&[ReportRow]> = if rows.is_empty() {
        vec![rows]
    } else {
        rows.chunks(ROWS_PER_PAGE).collect()
    };
    let page_count = pages.len();

    let rendered: Vec<String> = pages
        .into_iter()
        .enumerate()
        .map(|(idx, page)| render_page(title, page, idx + 1, page_count, rows.len()))
        .collect();

    rendered.join("\x0c")
}

fn render_page(title: &str, rows: &[ReportRow], page: usize, pages: usize, total: usize) -> String {
    let mut out = String::new();
    out.push_str(title);
    out.push('\n');
    out.push_str(&format!("{total} reservations - page {page} of {pages}\n\n"));

    let header = format!(
        "{:<20} {:<16} {:<16} {:>10} {:>10} {:<12} {:<10}",
        "Court", "Start", "End", "Amount", "Paid", "Method", "Status"
    );
    out.push_str(&header);
    out.push('\n');
    out.push_str(&"-".repeat(header.len()));
    out.push('\n');

    if rows.is_empty() {
        out.push_str("No reservations\n");
    }
    for row in rows {
        out.push_str(&format!(
            "{:<20} {:<16} {:<16} {:>10} {:>10} {:<12} {:<10}\n",
            truncate(&row.court, 20),
            row.start_at.format(TIME_FORMAT),
            row.end_at.format(TIME_FORMAT),
            format!("S/{:.2}", row.amount),
            format!("S/{:.2}", row.paid),
            truncate(row.payment_method.as_deref().unwrap_or("-"), 12),
            row.status.as_ref(),
        ));
    }

    out
}

fn truncate(value: &str, width: usize) -> String {
    value.chars().take(width).collect()
}

/// Download name for an export, dated when a single day was requested
pub fn export_filename(day: Option<NaiveDate>, extension: &str) -> String {
    match day {
        Some(day) => format!("reservations_{}.{extension}", day.format("%Y-%m-%d")),
        None => format!("reservations.{extension}"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveTime;

    fn row(court: &str, hour: u32) -> ReportRow {
        let day = NaiveDate::from_ymd_opt(2025, 3, 14).unwrap();
        ReportRow {
            court: court.to_owned(),
            start_at: day.and_time(NaiveTime::from_hms_opt(hour, 0, 0).unwrap()),
            end_at: day.and_time(NaiveTime::from_hms_opt(hour + 1, 30, 0).unwrap()),
            amount: Decimal::from(90),
            paid: Decimal::from(45),
            payment_method: Some("yape".to_owned()),
            status: PaymentStatus::Parcial,
        }
    }

    #[test]
    fn test_csv_has_header_and_quotes_commas() {
        let bytes = to_csv(&[row("Cancha 1, techada", 9)]).unwrap();
        let text = String::from_utf8(bytes).unwrap();
        let mut lines = text.lines();

        assert_eq!(
            lines.next(),
            Some("Court,Start,End,Amount,Paid,Payment method,Status")
        );
        assert_eq!(
            lines.next(),
            Some("\"Cancha 1, techada\",2025-03-14 09:00,2025-03-14 10:30,90.00,45.00,yape,parcial")
        );
        assert_eq!(lines.next(), None);
    }

    #[test]
    fn test_empty_csv_still_has_header() {
        let text = String::from_utf8(to_csv(&[]).unwrap()).unwrap();
        assert_eq!(text, "Court,Start,End,Amount,Paid,Payment method,Status\n");
    }

    #[test]
    fn test_printable_paginates() {
        let rows: Vec<ReportRow> = (0..ROWS_PER_PAGE + 1).map(|_| row("Cancha", 8)).collect();
        let report = render_printable("Reservations", &rows);

        assert_eq!(report.matches('\x0c').count(), 1);
        assert!(report.contains("page 1 of 2"));
        assert!(report.contains("page 2 of 2"));
        assert!(report.contains("S/90.00"));
        assert!(report.contains("S/45.00"));
    }

    #[test]
    fn test_printable_empty_report() {
        let report = render_printable("Reservations", &[]);
        assert!(!report.contains('\x0c'));
        assert!(report.contains("No reservations"));
        assert!(report.contains("page 1 of 1"));
    }

    #[test]
    fn test_export_filename() {
        assert_eq!(export_filename(None, "csv"), "reservations.csv");
        let day = NaiveDate::from_ymd_opt(2025, 1, 5);
        assert_eq!(export_filename(day, "txt"), "reservations_2025-01-05.txt");
    }
}
