//! # billeo
//!
//! Invoice, quote and expense totals for Spanish small businesses: per-line
//! IVA, additional taxes such as IRPF withholding, and a grand total that
//! never goes below zero.
//!
//! All monetary values use [`rust_decimal::Decimal`] — never floating point.
//! Numeric form fields are accepted as numbers or text and coerced leniently:
//! a malformed field counts as zero instead of failing the calculation.
//!
//! ## Quick Start
//!
//! ```rust
//! use billeo::core::*;
//! use rust_decimal_macros::dec;
//!
//! let items = vec![
//!     LineItemBuilder::new("Desarrollo web", "2", "50").tax_rate("21").build(),
//! ];
//! let taxes = vec![AdditionalTax::percentage("IRPF", -15)];
//!
//! let calc = compute_totals(&items, &taxes);
//! assert_eq!(calc.items[0].subtotal, dec!(100));
//! assert_eq!(calc.totals.tax, dec!(21));
//! assert_eq!(calc.totals.total, dec!(106));
//! ```
//!
//! ## Feature Flags
//!
//! | Feature | Description |
//! |---------|-------------|
//! | `core` (default) | Document types, totals calculation, validation, numbering |
//! | `iva` | IVA rates, recargo de equivalencia, IRPF presets, quarterly summary |
//! | `json` | JSON boundary for host forms |
//! | `all` | Everything |

#[cfg(feature = "core")]
pub mod core;

#[cfg(feature = "iva")]
pub mod iva;

#[cfg(feature = "json")]
pub mod json;

// Re-export core types at crate root for convenience
#[cfg(feature = "core")]
pub use crate::core::*;
