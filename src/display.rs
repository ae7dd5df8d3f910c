//! Terminal output helpers.

use crate::aggregator::extract_amount;
use crate::types::{AssetId, TransactionRecord, XEM_DIVISIBILITY};

/// Fixed-point rendering of a quantity given in the asset's smallest unit.
///
/// A divisibility too large to scale by prints the raw quantity.
pub fn format_quantity(raw: u64, divisibility: u32) -> String {
    if divisibility == 0 {
        return raw.to_string();
    }

    let Some(scale) = 10u128.checked_pow(divisibility) else {
        return raw.to_string();
    };
    let raw = raw as u128;
    format!(
        "{}.{:0width$}",
        raw / scale,
        raw % scale,
        width = divisibility as usize
    )
}

/// XEM moved by a record, `-` when it carries no transfer.
pub fn format_xem_moved(record: &TransactionRecord) -> String {
    if record.transfer.is_none() {
        return "-".into();
    }

    let amount = extract_amount(record, &AssetId::xem());
    format!("{} XEM", format_quantity(amount, XEM_DIVISIBILITY))
}

/// Plain text table with aligned columns.
pub struct Table {
    headers: Vec<String>,
    rows: Vec<Vec<String>>,
    col_widths: Vec<usize>,
}

impl Table {
    pub fn new(headers: &[&str]) -> Self {
        Table {
            col_widths: headers.iter().map(|h| h.chars().count()).collect(),
            headers: headers.iter().map(|h| h.to_string()).collect(),
            rows: Vec::new(),
        }
    }

    /// Cells beyond the header count are dropped.
    pub fn add_row<S: Into<String>>(&mut self, row: impl IntoIterator<Item = S>) {
        let row: Vec<String> = row
            .into_iter()
            .map(Into::into)
            .take(self.headers.len())
            .collect();

        for (width, cell) in self.col_widths.iter_mut().zip(&row) {
            *width = (*width).max(cell.chars().count());
        }

        self.rows.push(row);
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn render(&self) -> String {
        let mut output = self.render_row(&self.headers);
        output.push('\n');
        output.push_str(&self.render_separator());
        output.push('\n');

        for row in &self.rows {
            output.push_str(&self.render_row(row));
            output.push('\n');
        }

        output
    }

    fn render_row(&self, row: &[String]) -> String {
        row.iter()
            .zip(&self.col_widths)
            .map(|(cell, width)| format!("{:<width$}", cell, width = width))
            .collect::<Vec<_>>()
            .join(" | ")
            .trim_end()
            .to_string()
    }

    fn render_separator(&self) -> String {
        self.col_widths
            .iter()
            .map(|w| "-".repeat(*w))
            .collect::<Vec<_>>()
            .join("-+-")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::nis::mock_client::{mosaic_transfer, other_record, transfer};
    use crate::types::MosaicAmount;

    #[test]
    fn formats_quantities() {
        assert_eq!(format_quantity(26_000_000, 6), "26.000000");
        assert_eq!(format_quantity(5, 6), "0.000005");
        assert_eq!(format_quantity(1_234_567, 3), "1234.567");
        assert_eq!(format_quantity(42, 0), "42");
    }

    #[test]
    fn oversized_divisibility_does_not_overflow() {
        assert_eq!(format_quantity(1, 38), format!("0.{:0>38}", 1));
        assert_eq!(format_quantity(1, 39), "1");
        assert_eq!(format_quantity(7, u32::MAX), "7");
    }

    #[test]
    fn xem_moved_scales_mosaic_bundles() {
        let bundle = mosaic_transfer(
            3,
            2_000_000,
            vec![
                MosaicAmount { asset: AssetId::xem(), quantity: 1_500_000 },
                MosaicAmount { asset: AssetId::new("dim", "coin"), quantity: 9 },
            ],
        );
        let coin_only = mosaic_transfer(
            2,
            5_000_000,
            vec![MosaicAmount { asset: AssetId::new("dim", "coin"), quantity: 9 }],
        );

        assert_eq!(format_xem_moved(&bundle), "3.000000 XEM");
        assert_eq!(format_xem_moved(&coin_only), "0.000000 XEM");
        assert_eq!(format_xem_moved(&transfer(1, 1_250_000)), "1.250000 XEM");
        assert_eq!(format_xem_moved(&other_record(4)), "-");
    }

    #[test]
    fn renders_aligned_columns() {
        let mut table = Table::new(&["ID", "Amount"]);
        table.add_row(["105", "1.000000"]);
        table.add_row(["7", "12.500000"]);

        let rendered = table.render();
        let lines: Vec<_> = rendered.lines().collect();

        assert_eq!(lines[0], "ID  | Amount");
        assert_eq!(lines[1], "----+----------");
        assert_eq!(lines[2], "105 | 1.000000");
        assert_eq!(lines[3], "7   | 12.500000");
    }
}
