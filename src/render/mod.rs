//! Row grouping and table rows shared by the PDF and print renderers.
//!
//! Renderers never group lines themselves: they call [`render_rows`] (or
//! [`group_for_display`] directly) and draw one table row per result.

mod format;
mod grouping;
mod table;

pub use format::format_rupiah;
pub use grouping::{RowGroup, group_for_display};
pub use table::{RowSink, TableRow, render_rows};
