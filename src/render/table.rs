use std::convert::Infallible;

use serde::{Deserialize, Serialize};

use super::format::format_rupiah;
use super::grouping::{RowGroup, group_for_display};
use crate::core::InvoiceLine;

/// Cell texts for one invoice table row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableRow {
    /// Sequential row number.
    pub index: usize,
    /// Worker names, one per line.
    pub workers: String,
    /// Job and description lines, one per line.
    pub description: String,
    /// Formatted row total, e.g. `Rp 350.000,50`.
    pub total: String,
}

impl From<&RowGroup> for TableRow {
    fn from(group: &RowGroup) -> Self {
        Self {
            index: group.row_number,
            workers: group.worker_names.join("\n"),
            description: group.description_lines.join("\n"),
            total: format_rupiah(group.row_total),
        }
    }
}

/// Something that draws table rows, such as a PDF table or a print preview grid.
pub trait RowSink {
    type Error;

    fn push_row(&mut self, row: TableRow) -> Result<(), Self::Error>;
}

impl RowSink for Vec<TableRow> {
    type Error = Infallible;

    fn push_row(&mut self, row: TableRow) -> Result<(), Self::Error> {
        self.push(row);
        Ok(())
    }
}

/// Group `lines` and feed one [`TableRow`] per group to `sink`.
/// Returns the number of rows written.
pub fn render_rows<S: RowSink>(lines: &[InvoiceLine], sink: &mut S) -> Result<usize, S::Error> {
    let groups = group_for_display(lines);
    for group in &groups {
        sink.push_row(TableRow::from(group))?;
    }
    Ok(groups.len())
}
