//! IVA rates (Ley 37/1992) and the recargo de equivalencia surcharge.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::core::{AdditionalTax, LineItem, LineItemBuilder, tax_breakdown};

/// Spanish IVA rates applicable on the peninsula and Balearic Islands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum IvaRate {
    /// 21% — tipo general.
    General,
    /// 10% — tipo reducido (hospitality, transport, housing).
    Reduced,
    /// 4% — tipo superreducido (bread, books, medicines).
    SuperReduced,
    /// 0% — exempt or not subject (e.g. medical, education).
    Exempt,
}

impl IvaRate {
    pub const ALL: [IvaRate; 4] = [
        Self::General,
        Self::Reduced,
        Self::SuperReduced,
        Self::Exempt,
    ];

    /// Rate in percent.
    pub fn percent(&self) -> Decimal {
        match self {
            Self::General => dec!(21),
            Self::Reduced => dec!(10),
            Self::SuperReduced => dec!(4),
            Self::Exempt => dec!(0),
        }
    }

    /// Match a percentage to a rate, comparing numerically (`21.0` is `General`).
    pub fn from_percent(percent: Decimal) -> Option<Self> {
        Self::ALL.into_iter().find(|r| r.percent() == percent)
    }

    /// Recargo de equivalencia charged to retailers on top of this rate.
    pub fn recargo_equivalencia(&self) -> Decimal {
        match self {
            Self::General => dec!(5.2),
            Self::Reduced => dec!(1.4),
            Self::SuperReduced => dec!(0.5),
            Self::Exempt => dec!(0),
        }
    }
}

impl LineItemBuilder {
    /// Set the line's tax rate from an IVA rate.
    pub fn iva(self, rate: IvaRate) -> Self {
        self.tax_rate(rate.percent())
    }
}

/// Recargo de equivalencia for a supplier invoice to a retailer, as a flat
/// additional tax.
///
/// Each IVA rate group contributes `taxable_amount * surcharge / 100`; lines
/// whose rate is not an IVA rate contribute nothing. Returns `None` when the
/// surcharge is zero.
pub fn recargo_equivalencia(items: &[LineItem]) -> Option<AdditionalTax> {
    let amount: Decimal = tax_breakdown(items)
        .iter()
        .filter_map(|group| {
            IvaRate::from_percent(group.rate)
                .map(|rate| crate::core::percent_of(group.taxable_amount, rate.recargo_equivalencia()))
        })
        .fold(Decimal::ZERO, Decimal::saturating_add);

    if amount.is_zero() {
        None
    } else {
        Some(AdditionalTax::flat("Recargo de equivalencia", amount))
    }
}
