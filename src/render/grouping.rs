use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::core::InvoiceLine;

/// One printed table row: every line sharing a `baris`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RowGroup {
    /// Printed row number, 1, 2, 3, … in `baris` order.
    pub row_number: usize,
    /// Grouping key the row was built from.
    pub baris: u32,
    /// Distinct worker names, first occurrence first.
    pub worker_names: Vec<String>,
    /// Job names, each followed by its description when that differs.
    pub description_lines: Vec<String>,
    /// Sum of the line totals, saturating at `Decimal::MAX`/`MIN`.
    pub row_total: Decimal,
}

impl RowGroup {
    fn new(row_number: usize, baris: u32) -> Self {
        Self {
            row_number,
            baris,
            worker_names: Vec::new(),
            description_lines: Vec::new(),
            row_total: Decimal::ZERO,
        }
    }

    fn absorb(&mut self, line: &InvoiceLine) {
        if let Some(name) = line.worker_name.as_deref().map(str::trim) {
            if !name.is_empty() && !self.worker_names.iter().any(|w| w == name) {
                self.worker_names.push(name.to_string());
            }
        }

        let job = line.job_name.trim();
        self.description_lines.push(job.to_string());
        if let Some(desc) = line.description.as_deref().map(str::trim) {
            if !desc.is_empty() && desc != job {
                self.description_lines.push(desc.to_string());
            }
        }

        let line_total = line.unit_price.saturating_mul(Decimal::from(line.quantity));
        self.row_total = self.row_total.saturating_add(line_total);
    }
}

/// Group invoice lines into display rows.
///
/// Lines are ordered by `(baris, line_order)`; consecutive lines with the
/// same `baris` form one row. Rows are numbered from 1 regardless of the
/// `baris` values, so gaps in `baris` never show up in print.
pub fn group_for_display(lines: &[InvoiceLine]) -> Vec<RowGroup> {
    let mut sorted: Vec<&InvoiceLine> = lines.iter().collect();
    sorted.sort_by_key(|l| l.key());

    let mut rows: Vec<RowGroup> = Vec::new();
    for line in sorted {
        match rows.last_mut() {
            Some(row) if row.baris == line.baris => row.absorb(line),
            _ => {
                let mut row = RowGroup::new(rows.len() + 1, line.baris);
                row.absorb(line);
                rows.push(row);
            }
        }
    }
    rows
}
