use std::collections::BTreeMap;

use rust_decimal::{Decimal, RoundingStrategy};
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use super::coerce::to_number;
use super::types::*;

const HUNDRED: Decimal = dec!(100);

/// Amount that percentage-based additional taxes are applied to.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum PercentageBase {
    /// Pre-tax subtotal. IRPF is withheld on the net amount, so this is the default.
    #[default]
    Subtotal,
    /// Subtotal plus line IVA.
    SubtotalWithTax,
}

/// Computes document totals from line items and additional taxes.
///
/// Every pass starts from scratch: item subtotals are recomputed from
/// quantity and unit price, and nothing carries over between calls.
///
/// ```
/// use billeo::core::*;
/// use rust_decimal_macros::dec;
///
/// let items = vec![LineItemBuilder::new("Diseño web", 2, dec!(50)).tax_rate(21).build()];
/// let taxes = vec![AdditionalTax::percentage("IRPF", -15)];
///
/// let calc = TotalsCalculator::new().compute(&items, &taxes);
/// assert_eq!(calc.totals.subtotal, dec!(100));
/// assert_eq!(calc.totals.tax, dec!(21));
/// assert_eq!(calc.totals.additional_taxes_total, dec!(-15));
/// assert_eq!(calc.totals.total, dec!(106));
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct TotalsCalculator {
    percentage_base: PercentageBase,
}

impl TotalsCalculator {
    /// Calculator applying percentage taxes to the pre-tax subtotal.
    pub fn new() -> Self {
        Self::default()
    }

    /// Choose what percentage additional taxes are applied to.
    pub fn percentage_base(mut self, base: PercentageBase) -> Self {
        self.percentage_base = base;
        self
    }

    /// Compute totals without touching the inputs.
    pub fn compute(&self, items: &[LineItem], additional_taxes: &[AdditionalTax]) -> Calculation {
        let mut items = items.to_vec();
        let (totals, lines) = self.run(&mut items, additional_taxes);
        Calculation {
            items,
            additional_taxes: lines,
            totals,
        }
    }

    /// Compute totals, overwriting each item's `subtotal` in place.
    pub fn apply(&self, items: &mut [LineItem], additional_taxes: &[AdditionalTax]) -> InvoiceTotals {
        self.run(items, additional_taxes).0
    }

    /// Recompute and store the totals of `document`.
    pub fn recalculate<'a>(&self, document: &'a mut Document) -> &'a InvoiceTotals {
        document.totals = self.apply(&mut document.items, &document.additional_taxes);
        &document.totals
    }

    fn run(
        &self,
        items: &mut [LineItem],
        additional_taxes: &[AdditionalTax],
    ) -> (InvoiceTotals, Vec<AdditionalTaxLine>) {
        let mut subtotal = Decimal::ZERO;
        let mut tax = Decimal::ZERO;

        for item in items.iter_mut() {
            let line_subtotal = line_subtotal(item);
            item.subtotal = line_subtotal;
            subtotal = subtotal.saturating_add(line_subtotal);
            tax = tax.saturating_add(percent_of(line_subtotal, to_number(&item.tax_rate)));
        }

        let base = match self.percentage_base {
            PercentageBase::Subtotal => subtotal,
            PercentageBase::SubtotalWithTax => subtotal.saturating_add(tax),
        };

        let lines: Vec<AdditionalTaxLine> = additional_taxes
            .iter()
            .map(|t| AdditionalTaxLine {
                name: t.name.clone(),
                is_percentage: t.is_percentage,
                contribution: contribution(t, base),
            })
            .collect();

        let additional_taxes_total = lines
            .iter()
            .fold(Decimal::ZERO, |acc, l| acc.saturating_add(l.contribution));

        let raw_total = subtotal
            .saturating_add(tax)
            .saturating_add(additional_taxes_total);
        let total = raw_total.max(Decimal::ZERO);
        if total != raw_total {
            tracing::trace!(%raw_total, "total floored at zero");
        }

        tracing::debug!(
            items = items.len(),
            additional_taxes = lines.len(),
            %subtotal,
            %tax,
            %additional_taxes_total,
            %total,
            "totals computed"
        );

        let totals = InvoiceTotals {
            subtotal,
            tax,
            additional_taxes_total,
            total,
        };
        (totals, lines)
    }
}

/// Compute totals with the default configuration.
///
/// Returns the items with recomputed subtotals alongside the totals; the
/// inputs are left untouched.
pub fn compute_totals(items: &[LineItem], additional_taxes: &[AdditionalTax]) -> Calculation {
    TotalsCalculator::new().compute(items, additional_taxes)
}

/// In-place variant of [`compute_totals`]: overwrites every item's `subtotal`.
pub fn calculate_totals(items: &mut [LineItem], additional_taxes: &[AdditionalTax]) -> InvoiceTotals {
    TotalsCalculator::new().apply(items, additional_taxes)
}

/// IVA grouped by rate, ascending.
///
/// Rates are compared numerically, so `21` and `"21.00"` share a group.
pub fn tax_breakdown(items: &[LineItem]) -> Vec<TaxBreakdown> {
    let mut groups: BTreeMap<Decimal, (Decimal, Decimal)> = BTreeMap::new();

    for item in items {
        let rate = to_number(&item.tax_rate).normalize();
        let base = line_subtotal(item);
        let entry = groups.entry(rate).or_insert((Decimal::ZERO, Decimal::ZERO));
        entry.0 = entry.0.saturating_add(base);
        entry.1 = entry.1.saturating_add(percent_of(base, rate));
    }

    groups
        .into_iter()
        .map(|(rate, (taxable_amount, tax_amount))| TaxBreakdown {
            rate,
            taxable_amount,
            tax_amount,
        })
        .collect()
}

impl Document {
    /// Recompute totals and item subtotals with the default configuration.
    pub fn recalculate(&mut self) -> &InvoiceTotals {
        TotalsCalculator::new().recalculate(self)
    }
}

impl InvoiceTotals {
    /// `subtotal + tax + additional_taxes_total` before flooring.
    pub fn raw_total(&self) -> Decimal {
        self.subtotal
            .saturating_add(self.tax)
            .saturating_add(self.additional_taxes_total)
    }

    /// Whether the raw total was negative and `total` was clamped to zero.
    pub fn is_floored(&self) -> bool {
        self.raw_total() < Decimal::ZERO
    }

    /// All four amounts rounded half-up to `dp` places, for display or storage.
    pub fn rounded(&self, dp: u32) -> Self {
        Self {
            subtotal: round_half_up(self.subtotal, dp),
            tax: round_half_up(self.tax, dp),
            additional_taxes_total: round_half_up(self.additional_taxes_total, dp),
            total: round_half_up(self.total, dp),
        }
    }
}

pub(crate) fn line_subtotal(item: &LineItem) -> Decimal {
    to_number(&item.quantity).saturating_mul(to_number(&item.unit_price))
}

fn contribution(tax: &AdditionalTax, base: Decimal) -> Decimal {
    let amount = to_number(&tax.amount);
    if tax.is_percentage {
        percent_of(base, amount)
    } else {
        amount
    }
}

pub(crate) fn percent_of(amount: Decimal, rate: Decimal) -> Decimal {
    amount.saturating_mul(rate) / HUNDRED
}

/// Round a Decimal to `dp` decimal places using half-up (commercial rounding).
fn round_half_up(value: Decimal, dp: u32) -> Decimal {
    value.round_dp_with_strategy(dp, RoundingStrategy::MidpointAwayFromZero)
}
