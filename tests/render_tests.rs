#![cfg(feature = "render")]

use chrono::NaiveDate;
use rust_decimal_macros::dec;
use tagihan::core::*;
use tagihan::render::{RowSink, TableRow, format_rupiah, render_rows};

fn invoice() -> Invoice {
    InvoiceBuilder::new(NaiveDate::from_ymd_opt(2024, 1, 15).unwrap())
        .add_line(
            InvoiceLineBuilder::new(2, 1, "Notifikasi", 1, dec!(50000))
                .worker("Zhang Min")
                .build(),
        )
        .add_line(
            InvoiceLineBuilder::new(1, 2, "Biaya IMTA", 1, dec!(250000.50))
                .worker("Ahmad")
                .description("DPKK 12 bulan")
                .build(),
        )
        .add_line(
            InvoiceLineBuilder::new(1, 1, "Perpanjangan KITAS", 1, dec!(100000))
                .worker("Li Wei")
                .build(),
        )
        .build_with_number("FSN/24/01/001")
        .unwrap()
}

/// Plain-text sink, one row per line with cells separated by `|`.
#[derive(Default)]
struct TextTable(Vec<String>);

impl RowSink for TextTable {
    type Error = std::convert::Infallible;

    fn push_row(&mut self, row: TableRow) -> Result<(), Self::Error> {
        self.0.push(format!(
            "{} | {} | {} | {}",
            row.index,
            row.workers.replace('\n', ", "),
            row.description.replace('\n', " / "),
            row.total
        ));
        Ok(())
    }
}

#[test]
fn invoice_table_text() {
    let inv = invoice();
    let mut table = TextTable::default();
    let written = render_rows(inv.lines(), &mut table).unwrap();
    assert_eq!(written, 2);

    insta::assert_snapshot!(table.0.join("\n"), @r"
    1 | Li Wei, Ahmad | Perpanjangan KITAS / Biaya IMTA / DPKK 12 bulan | Rp 350.000,50
    2 | Zhang Min | Notifikasi | Rp 50.000
    ");
}

#[test]
fn footer_amounts() {
    let inv = invoice();
    assert_eq!(format_rupiah(inv.totals.subtotal), "Rp 400.001");
    assert_eq!(format_rupiah(inv.totals.vat_amount), "Rp 44.000");
    assert_eq!(format_rupiah(inv.totals.total_amount), "Rp 444.001");
}

#[test]
fn row_totals_keep_sen() {
    let inv = invoice();
    let mut rows: Vec<TableRow> = Vec::new();
    render_rows(inv.lines(), &mut rows).unwrap();
    let totals: Vec<_> = rows.iter().map(|r| r.total.as_str()).collect();
    assert_eq!(totals, ["Rp 350.000,50", "Rp 50.000"]);
}

#[cfg(feature = "terbilang")]
#[test]
fn footer_words() {
    insta::assert_snapshot!(
        invoice().total_in_words().unwrap(),
        @"Empat Ratus Empat Puluh Empat Ribu Satu Rupiah"
    );
}
