//! Excel export for the back-office report download

use std::path::Path;

use rust_xlsxwriter::{Format, Workbook, Worksheet};

use haulmatch_store::{AssignmentRecord, LedgerStats};
use haulmatch_types::{Error, Result};

/// Export assignment history and ledger totals to an Excel workbook
pub fn export_to_excel(
    assignments: &[&AssignmentRecord],
    ledger_stats: &LedgerStats,
    output_path: &Path,
) -> Result<()> {
    let mut workbook = Workbook::new();

    let summary_sheet = workbook.add_worksheet();
    write_summary_sheet(summary_sheet, assignments, ledger_stats)?;

    let assignments_sheet = workbook.add_worksheet();
    write_assignments_sheet(assignments_sheet, assignments)?;

    workbook
        .save(output_path)
        .map_err(|e| Error::Excel(e.to_string()))?;

    Ok(())
}

fn write_summary_sheet(
    sheet: &mut Worksheet,
    assignments: &[&AssignmentRecord],
    ledger_stats: &LedgerStats,
) -> Result<()> {
    sheet
        .set_name("Summary")
        .map_err(|e| Error::Excel(e.to_string()))?;

    let header_format = Format::new().set_bold();

    sheet
        .write_string_with_format(0, 0, "Haulmatch Back-Office Report", &header_format)
        .map_err(|e| Error::Excel(e.to_string()))?;

    let active = assignments.iter().filter(|a| a.active).count();
    let rows: [(&str, f64); 6] = [
        ("Assignments:", assignments.len() as f64),
        ("Active:", active as f64),
        ("Commission entries:", ledger_stats.entry_count as f64),
        ("Pending amount:", ledger_stats.pending_amount),
        ("Deducted amount:", ledger_stats.deducted_amount),
        ("Paid amount:", ledger_stats.paid_amount),
    ];

    for (offset, (label, value)) in rows.iter().enumerate() {
        let row = offset as u32 + 2;
        sheet
            .write_string(row, 0, *label)
            .map_err(|e| Error::Excel(e.to_string()))?;
        sheet
            .write_number(row, 1, *value)
            .map_err(|e| Error::Excel(e.to_string()))?;
    }

    Ok(())
}

fn write_assignments_sheet(
    sheet: &mut Worksheet,
    assignments: &[&AssignmentRecord],
) -> Result<()> {
    sheet
        .set_name("Assignments")
        .map_err(|e| Error::Excel(e.to_string()))?;

    let header_format = Format::new().set_bold();
    let headers = ["Assignment", "Load", "Vehicle", "Matched At", "Active"];

    for (col, header) in headers.iter().enumerate() {
        sheet
            .write_string_with_format(0, col as u16, *header, &header_format)
            .map_err(|e| Error::Excel(e.to_string()))?;
    }

    for (offset, record) in assignments.iter().enumerate() {
        let row = offset as u32 + 1;
        sheet
            .write_string(row, 0, &record.id)
            .map_err(|e| Error::Excel(e.to_string()))?;
        sheet
            .write_string(row, 1, &record.load_id)
            .map_err(|e| Error::Excel(e.to_string()))?;
        sheet
            .write_string(row, 2, &record.vehicle_id)
            .map_err(|e| Error::Excel(e.to_string()))?;
        sheet
            .write_string(row, 3, &record.matched_at.to_rfc3339())
            .map_err(|e| Error::Excel(e.to_string()))?;
        sheet
            .write_string(row, 4, if record.active { "yes" } else { "no" })
            .map_err(|e| Error::Excel(e.to_string()))?;
    }

    Ok(())
}
