//! Receipt
//!
//! Terminal rendering of the cart summary. Strictly downstream of
//! [`crate::pricing`]: every money value here comes from [`Totals`], never
//! from recomputing business logic in the view.

use std::io;

use rusty_money::{Money, iso::Currency};
use smallvec::SmallVec;
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
    cart::Cart,
    pricing::{PricingError, Totals},
    products::Catalog,
    promotions::AppliedPromo,
};

/// Errors that can occur when building or writing a receipt.
#[derive(Debug, Error)]
pub enum ReceiptError {
    /// Error deriving totals for the cart.
    #[error(transparent)]
    Pricing(#[from] PricingError),

    /// IO error
    #[error("IO error")]
    IO,
}

/// One rendered line of the cart summary.
#[derive(Debug, Clone)]
struct SummaryRow<'a> {
    name: String,
    quantity: u32,
    unit_price: Money<'a, Currency>,
    line_total: Money<'a, Currency>,
    in_stock: bool,
}

/// Printable summary of a cart: one row per line item plus derived totals.
#[derive(Debug, Clone)]
pub struct Receipt<'a> {
    rows: SmallVec<[SummaryRow<'a>; 8]>,
    totals: Totals<'a>,
    promo: Option<AppliedPromo>,
}

impl<'a> Receipt<'a> {
    /// Build a receipt from a cart with live catalog prices.
    ///
    /// A line whose product no longer resolves is shown with its cached name
    /// and a zero price, matching how pricing treats it.
    ///
    /// # Errors
    ///
    /// Returns a [`ReceiptError`] if totals cannot be derived.
    pub fn from_cart(
        cart: &Cart,
        catalog: &Catalog<'a>,
        promo: Option<&AppliedPromo>,
    ) -> Result<Self, ReceiptError> {
        let totals = Totals::compute(cart, catalog, promo)?;
        let currency = catalog.currency();

        let mut rows = SmallVec::new();

        for item in cart.iter() {
            let row = match catalog.lookup(item.product_id) {
                Some(product) => SummaryRow {
                    name: product.name.clone(),
                    quantity: item.quantity,
                    unit_price: product.price,
                    line_total: line_total(product.price, item.quantity)?,
                    in_stock: product.in_stock,
                },
                None => SummaryRow {
                    name: item.name.clone(),
                    quantity: item.quantity,
                    unit_price: Money::from_minor(0, currency),
                    line_total: Money::from_minor(0, currency),
                    in_stock: false,
                },
            };

            rows.push(row);
        }

        Ok(Receipt {
            rows,
            totals,
            promo: promo.cloned(),
        })
    }

    /// The totals backing this receipt.
    #[must_use]
    pub fn totals(&self) -> &Totals<'a> {
        &self.totals
    }

    /// Write the receipt table and summary to the given sink.
    ///
    /// # Errors
    ///
    /// Returns a [`ReceiptError::IO`] if the sink cannot be written.
    pub fn write_to(&self, out: &mut impl io::Write) -> Result<(), ReceiptError> {
        let mut builder = Builder::default();

        builder.push_record(["", "Item", "Qty", "Unit Price", "Line Total"]);

        for (idx, row) in self.rows.iter().enumerate() {
            let name = if row.in_stock {
                row.name.clone()
            } else {
                format!("{} (out of stock)", row.name)
            };

            builder.push_record([
                format!("#{:<3}", idx + 1),
                name,
                row.quantity.to_string(),
                format!("{}", row.unit_price),
                format!("{}", row.line_total),
            ]);
        }

        let mut table = builder.build();
        let mut theme = Theme::from(Style::modern_rounded());
        let separator = HorizontalLine::new(Some('─'), Some('┼'), Some('├'), Some('┤'));

        theme.remove_horizontal_lines();
        theme.insert_horizontal_line(1, separator);

        table.with(theme);
        table.modify(Rows::first(), Color::BOLD);
        table.modify(Columns::new(2..5), Alignment::right());

        writeln!(out, "\n{table}").map_err(|_err| ReceiptError::IO)?;

        self.write_summary(out)
    }

    fn write_summary(&self, out: &mut impl io::Write) -> Result<(), ReceiptError> {
        let subtotal_label = " Subtotal:";
        let total_label = " \x1b[1mTotal:\x1b[0m";

        let discount_label = self
            .promo
            .as_ref()
            .map(|promo| format!(" Discount ({} {}):", promo.code, promo.percent));

        let subtotal_val = format!("{}  ", self.totals.subtotal());
        let discount_val = format!("-{}  ", self.totals.discount());
        let total_val = format!("\x1b[1m{}  \x1b[0m", self.totals.total());

        let label_width = visible_width(subtotal_label)
            .max(visible_width(total_label))
            .max(discount_label.as_deref().map_or(0, visible_width));

        write_summary_line(out, subtotal_label, &subtotal_val, label_width)?;

        if let Some(label) = discount_label.as_deref() {
            write_summary_line(out, label, &discount_val, label_width)?;
        }

        write_summary_line(out, total_label, &total_val, label_width)?;

        writeln!(out).map_err(|_err| ReceiptError::IO)
    }
}

/// Line total for a rendered row; pricing itself re-derives this
/// independently.
fn line_total(
    unit_price: Money<'_, Currency>,
    quantity: u32,
) -> Result<Money<'_, Currency>, ReceiptError> {
    let minor = unit_price
        .to_minor_units()
        .checked_mul(i64::from(quantity))
        .ok_or(PricingError::AmountConversion)?;

    Ok(Money::from_minor(minor, unit_price.currency()))
}

/// Write one right-padded `label value` summary line.
fn write_summary_line(
    out: &mut impl io::Write,
    label: &str,
    value: &str,
    label_col_width: usize,
) -> Result<(), ReceiptError> {
    let label_pad = label_col_width.saturating_sub(visible_width(label));

    writeln!(out, "{:>label_pad$}{label}  {value}", "").map_err(|_err| ReceiptError::IO)
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

#[cfg(test)]
mod tests {
    use rusty_money::iso::RUB;
    use testresult::TestResult;

    use crate::{
        cart::LineItem,
        products::{Product, ProductId},
        promotions::Percent,
    };

    use super::*;

    fn catalog() -> Result<Catalog<'static>, crate::products::CatalogError> {
        Catalog::with_products(
            [(
                ProductId(1),
                Product {
                    name: "Samurai Honour".to_string(),
                    price: Money::from_minor(45900, RUB),
                    image: None,
                    in_stock: true,
                    category: "combat".to_string(),
                },
            )],
            RUB,
        )
    }

    fn line(id: u32, quantity: u32, name: &str) -> LineItem {
        LineItem {
            product_id: ProductId(id),
            quantity,
            name: name.to_string(),
            unit_price_minor: 45900,
            image: None,
        }
    }

    #[test]
    fn receipt_renders_rows_and_summary() -> TestResult {
        let catalog = catalog()?;
        let mut cart = Cart::new();

        cart.push(line(1, 2, "Samurai Honour"));

        let promo = AppliedPromo {
            code: "KATANA2023".to_string(),
            percent: Percent::new(15)?,
        };

        let receipt = Receipt::from_cart(&cart, &catalog, Some(&promo))?;

        let mut rendered = Vec::new();

        receipt.write_to(&mut rendered)?;

        let text = String::from_utf8(rendered)?;

        assert!(text.contains("Samurai Honour"), "missing item row");
        assert!(text.contains("Subtotal:"), "missing subtotal line");
        assert!(
            text.contains("Discount (KATANA2023 15%):"),
            "missing discount line"
        );
        assert!(text.contains("Total:"), "missing total line");

        Ok(())
    }

    #[test]
    fn unresolvable_line_renders_with_cached_name_and_zero_price() -> TestResult {
        let catalog = catalog()?;
        let mut cart = Cart::new();

        cart.push(line(99, 1, "Discontinued Blade"));

        let receipt = Receipt::from_cart(&cart, &catalog, None)?;

        let mut rendered = Vec::new();

        receipt.write_to(&mut rendered)?;

        let text = String::from_utf8(rendered)?;

        assert!(
            text.contains("Discontinued Blade (out of stock)"),
            "missing cached-name row"
        );
        assert_eq!(receipt.totals().subtotal(), Money::from_minor(0, RUB));

        Ok(())
    }

    #[test]
    fn receipt_without_promo_omits_discount_line() -> TestResult {
        let catalog = catalog()?;
        let mut cart = Cart::new();

        cart.push(line(1, 1, "Samurai Honour"));

        let receipt = Receipt::from_cart(&cart, &catalog, None)?;

        let mut rendered = Vec::new();

        receipt.write_to(&mut rendered)?;

        let text = String::from_utf8(rendered)?;

        assert!(!text.contains("Discount"), "unexpected discount line");

        Ok(())
    }

    #[test]
    fn visible_width_ignores_ansi_escapes() {
        assert_eq!(visible_width("\x1b[1mTotal:\x1b[0m"), 6);
        assert_eq!(visible_width("Subtotal:"), 9);
    }
}
