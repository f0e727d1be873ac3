//! Quarterly IVA and IRPF figures, as filed in modelos 303, 111 and 130.

use chrono::{Datelike, NaiveDate};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::irpf::is_irpf;
use crate::core::{Document, DocumentKind, compute_totals};

/// Calendar quarter of a tax year.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Quarter {
    Q1,
    Q2,
    Q3,
    Q4,
}

impl Quarter {
    /// Quarter a date falls in.
    pub fn from_date(date: NaiveDate) -> Self {
        match date.month() {
            1..=3 => Self::Q1,
            4..=6 => Self::Q2,
            7..=9 => Self::Q3,
            _ => Self::Q4,
        }
    }

    /// Whether `date` lies in this quarter of `year`.
    pub fn contains(&self, year: i32, date: NaiveDate) -> bool {
        date.year() == year && Self::from_date(date) == *self
    }
}

/// Totals of the invoices and expenses issued in one quarter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuarterlySummary {
    pub year: i32,
    pub quarter: Quarter,
    pub invoice_count: usize,
    pub expense_count: usize,
    /// Net amount invoiced (base imponible de ventas).
    pub income_base: Decimal,
    /// IVA repercutido on invoices.
    pub output_iva: Decimal,
    /// Net amount of expenses.
    pub expense_base: Decimal,
    /// IVA soportado on expenses.
    pub input_iva: Decimal,
    /// IRPF withheld by clients on our invoices.
    pub irpf_withheld_by_clients: Decimal,
    /// IRPF we withheld from suppliers, to be paid over.
    pub irpf_withheld_from_suppliers: Decimal,
}

impl QuarterlySummary {
    /// Output minus input IVA; negative means IVA to carry forward.
    /// Saturates at the `Decimal` range like the totals it is built from.
    pub fn iva_payable(&self) -> Decimal {
        self.output_iva.saturating_sub(self.input_iva)
    }

    /// Income minus expenses, before IRPF.
    pub fn net_result(&self) -> Decimal {
        self.income_base.saturating_sub(self.expense_base)
    }
}

/// Summarise the invoices and expenses dated in `quarter` of `year`.
///
/// Totals are recomputed from each document's lines, so stale stored totals
/// do not leak into the figures. Quotes and undated documents are skipped.
pub fn quarterly_summary(documents: &[Document], year: i32, quarter: Quarter) -> QuarterlySummary {
    let mut summary = QuarterlySummary {
        year,
        quarter,
        invoice_count: 0,
        expense_count: 0,
        income_base: Decimal::ZERO,
        output_iva: Decimal::ZERO,
        expense_base: Decimal::ZERO,
        input_iva: Decimal::ZERO,
        irpf_withheld_by_clients: Decimal::ZERO,
        irpf_withheld_from_suppliers: Decimal::ZERO,
    };

    let in_quarter = documents.iter().filter(|d| {
        d.kind != DocumentKind::Quote && d.issue_date.is_some_and(|date| quarter.contains(year, date))
    });

    for document in in_quarter {
        let calc = compute_totals(&document.items, &document.additional_taxes);
        let withheld: Decimal = calc
            .additional_taxes
            .iter()
            .filter(|t| is_irpf(&t.name) && t.contribution < Decimal::ZERO)
            .fold(Decimal::ZERO, |acc, t| acc.saturating_sub(t.contribution));

        match document.kind {
            DocumentKind::Invoice => {
                summary.invoice_count += 1;
                summary.income_base = summary.income_base.saturating_add(calc.totals.subtotal);
                summary.output_iva = summary.output_iva.saturating_add(calc.totals.tax);
                summary.irpf_withheld_by_clients =
                    summary.irpf_withheld_by_clients.saturating_add(withheld);
            }
            DocumentKind::Expense => {
                summary.expense_count += 1;
                summary.expense_base = summary.expense_base.saturating_add(calc.totals.subtotal);
                summary.input_iva = summary.input_iva.saturating_add(calc.totals.tax);
                summary.irpf_withheld_from_suppliers =
                    summary.irpf_withheld_from_suppliers.saturating_add(withheld);
            }
            DocumentKind::Quote => {}
        }
    }

    tracing::debug!(
        year,
        ?quarter,
        invoices = summary.invoice_count,
        expenses = summary.expense_count,
        iva_payable = %summary.iva_payable(),
        "quarterly summary computed"
    );

    summary
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn quarter_boundaries() {
        assert_eq!(Quarter::from_date(date(2024, 3, 31)), Quarter::Q1);
        assert_eq!(Quarter::from_date(date(2024, 4, 1)), Quarter::Q2);
        assert_eq!(Quarter::from_date(date(2024, 9, 30)), Quarter::Q3);
        assert_eq!(Quarter::from_date(date(2024, 12, 31)), Quarter::Q4);
        assert!(Quarter::Q1.contains(2024, date(2024, 2, 29)));
        assert!(!Quarter::Q1.contains(2023, date(2024, 2, 29)));
    }
}
