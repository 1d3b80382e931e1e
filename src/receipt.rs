//! Receipt
//!
//! Plain-text order summary: one table row per cart line, followed by the subtotal, coupon
//! discount, shipping and grand total.

use std::io;

use rust_decimal::Decimal;
use tabled::{
    builder::Builder,
    grid::config::HorizontalLine,
    settings::{
        Alignment, Color, Style, Theme,
        object::{Columns, Rows},
    },
};
use thiserror::Error;

use crate::{
    cart::CartLine,
    checkout::Checkout,
    coupons::AppliedCoupon,
    money::{money_from_amount, percentage_points},
    storage::Storage,
    totals::{OrderTotals, TotalsError},
};

/// Errors that can occur when building a receipt.
#[derive(Debug, Error)]
pub enum ReceiptError {
    /// The totals could not be computed.
    #[error(transparent)]
    Totals(#[from] TotalsError),

    /// IO error
    #[error("IO error")]
    IO,
}

/// Summary of a checkout, ready to print.
#[derive(Debug, Clone)]
pub struct Receipt<'r, 'a> {
    lines: &'r [CartLine<'a>],
    totals: OrderTotals<'a>,
    coupon: Option<&'r AppliedCoupon<'a>>,
}

impl<'r, 'a> Receipt<'r, 'a> {
    /// Create a receipt from its parts.
    pub fn new(
        lines: &'r [CartLine<'a>],
        totals: OrderTotals<'a>,
        coupon: Option<&'r AppliedCoupon<'a>>,
    ) -> Self {
        Self {
            lines,
            totals,
            coupon,
        }
    }

    /// Snapshot the current state of a checkout.
    ///
    /// # Errors
    ///
    /// Returns [`ReceiptError::Totals`] if the totals cannot be computed.
    pub fn from_checkout<S: Storage>(checkout: &'r Checkout<'a, S>) -> Result<Self, ReceiptError> {
        Ok(Self::new(
            checkout.cart().lines(),
            checkout.totals()?,
            checkout.applied_coupon(),
        ))
    }

    /// Totals shown at the foot of the receipt.
    pub fn totals(&self) -> &OrderTotals<'a> {
        &self.totals
    }

    /// Writes the receipt.
    ///
    /// # Errors
    ///
    /// Returns an error if the receipt cannot be written.
    pub fn write_to(&self, mut out: impl io::Write) -> Result<(), ReceiptError> {
        if self.lines.is_empty() {
            return writeln!(out, "\nYour cart is empty.\n").map_err(|_err| ReceiptError::IO);
        }

        let mut builder = Builder::default();

        builder.push_record(["", "Item", "Variant", "Qty", "Price", "MRP", "Line Total"]);

        for (idx, line) in self.lines.iter().enumerate() {
            builder.push_record(line_cells(idx + 1, line));
        }

        let table_width = write_receipt_table(&mut out, builder)?;

        write_receipt_summary(&mut out, self, table_width)
    }
}

fn line_cells(position: usize, line: &CartLine<'_>) -> [String; 7] {
    let line_total = money_from_amount(line.line_total(), line.price().currency());
    let savings = percentage_points(line.mrp_savings()).round_dp(0);

    let mrp = if savings > Decimal::ZERO {
        format!("{} ({savings}% off)", line.mrp())
    } else {
        String::new()
    };

    [
        position.to_string(),
        line.title().to_string(),
        line.variant().unwrap_or_default().to_string(),
        line.quantity().to_string(),
        format!("{}", line.price()),
        mrp,
        format!("{line_total}"),
    ]
}

/// Renders the line table and returns its width.
fn write_receipt_table(out: &mut impl io::Write, builder: Builder) -> Result<usize, ReceiptError> {
    let mut table = builder.build();
    let mut theme = Theme::from(Style::modern_rounded());

    theme.remove_horizontal_lines();
    theme.insert_horizontal_line(
        1,
        HorizontalLine::new(Some('─'), Some('┼'), Some('├'), Some('┤')),
    );

    table.with(theme);
    table.modify(Rows::first(), Color::BOLD);
    table.modify(Columns::new(3..7), Alignment::right());

    let table_str = table.to_string();
    let width = table_str.lines().next().map_or(0, visible_width);

    writeln!(out, "\n{table_str}").map_err(|_err| ReceiptError::IO)?;

    Ok(width)
}

fn write_receipt_summary(
    out: &mut impl io::Write,
    receipt: &Receipt<'_, '_>,
    table_width: usize,
) -> Result<(), ReceiptError> {
    let totals = &receipt.totals;

    let mut rows: Vec<(String, String)> = vec![(
        " Subtotal:".to_string(),
        format!("{}  ", totals.subtotal),
    )];

    if let Some(coupon) = receipt.coupon {
        rows.push((
            format!(" Coupon {}:", coupon.code()),
            format!("-{}  ", totals.discount),
        ));
    }

    let shipping = if totals.shipping_charge.is_zero() {
        "Free  ".to_string()
    } else {
        format!("{}  ", totals.shipping_charge)
    };

    rows.push((" Shipping:".to_string(), shipping));

    let total_label = " \x1b[1mTotal:\x1b[0m";
    let total_val = format!("{}  ", totals.grand_total);

    let value_width = rows
        .iter()
        .map(|(_, value)| visible_width(value))
        .chain([visible_width(&total_val)])
        .max()
        .unwrap_or_default();

    let label_width = table_width.saturating_sub(value_width + 2);

    for (label, value) in &rows {
        write_summary_line(out, label, value, label_width, value_width)?;
    }

    write_summary_line(
        out,
        total_label,
        &format!("\x1b[1m{total_val}\x1b[0m"),
        label_width,
        value_width,
    )?;

    writeln!(out).map_err(|_err| ReceiptError::IO)
}

/// Returns the visible (non-ANSI) width of a string.
fn visible_width(s: &str) -> usize {
    let mut width = 0usize;
    let mut in_escape = false;

    for ch in s.chars() {
        if in_escape {
            if ch.is_ascii_alphabetic() {
                in_escape = false;
            }
        } else if ch == '\x1b' {
            in_escape = true;
        } else {
            width += 1;
        }
    }

    width
}

/// Writes a summary line with a right-aligned label and a fixed-width value column.
fn write_summary_line(
    out: &mut impl io::Write,
    label: &str,
    value: &str,
    label_col_width: usize,
    value_col_width: usize,
) -> Result<(), ReceiptError> {
    let label_pad = label_col_width.saturating_sub(visible_width(label));
    let value_pad = value_col_width.saturating_sub(visible_width(value));

    writeln!(
        out,
        "{:>label_pad$}{label}  {}{value}",
        "",
        " ".repeat(value_pad)
    )
    .map_err(|_err| ReceiptError::IO)
}
