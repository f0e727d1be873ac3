//! IRPF withholding presets for professional invoices.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::core::AdditionalTax;

/// Label used for IRPF additional taxes.
pub const IRPF_NAME: &str = "IRPF";

/// IRPF withholding rate applied by a professional on their invoices.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum IrpfRate {
    /// 15% — general rate for professional activities.
    Standard,
    /// 7% — first three years of activity.
    NewProfessional,
    /// Any other rate, in percent.
    Custom(Decimal),
}

impl IrpfRate {
    /// Withholding rate in percent, always positive.
    pub fn percent(&self) -> Decimal {
        match self {
            Self::Standard => dec!(15),
            Self::NewProfessional => dec!(7),
            Self::Custom(p) => p.abs(),
        }
    }
}

/// IRPF withholding as a negative percentage of the subtotal.
///
/// ```
/// use billeo::core::*;
/// use billeo::iva::*;
/// use rust_decimal_macros::dec;
///
/// let items = [LineItemBuilder::new("Traducción", 1, 1000).iva(IvaRate::General).build()];
/// let calc = compute_totals(&items, &[irpf_withholding(IrpfRate::Standard)]);
/// assert_eq!(calc.totals.total, dec!(1060));
/// ```
pub fn irpf_withholding(rate: IrpfRate) -> AdditionalTax {
    AdditionalTax::percentage(IRPF_NAME, -rate.percent())
}

/// Whether an additional tax label denotes IRPF ("IRPF", "irpf 15%", "Retención IRPF").
pub fn is_irpf(name: &str) -> bool {
    name.to_ascii_uppercase().contains(IRPF_NAME)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{FieldValue, to_number};

    #[test]
    fn withholding_is_negative_percentage() {
        let tax = irpf_withholding(IrpfRate::NewProfessional);
        assert_eq!(tax.name, "IRPF");
        assert!(tax.is_percentage);
        assert_eq!(tax.amount, FieldValue::Number(dec!(-7)));
    }

    #[test]
    fn custom_rate_sign_is_ignored() {
        let tax = irpf_withholding(IrpfRate::Custom(dec!(-19)));
        assert_eq!(to_number(&tax.amount), dec!(-19));
    }

    #[test]
    fn irpf_labels() {
        assert!(is_irpf("IRPF"));
        assert!(is_irpf("Retención irpf 15%"));
        assert!(!is_irpf("Recargo de equivalencia"));
    }
}
