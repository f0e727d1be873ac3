//! Spanish tax presets: IVA rates, recargo de equivalencia, IRPF withholding
//! and quarterly summaries.
//!
//! # Example
//!
//! ```
//! use billeo::core::*;
//! use billeo::iva::*;
//! use rust_decimal_macros::dec;
//!
//! let invoice = DocumentBuilder::new(DocumentKind::Invoice)
//!     .add_item(LineItemBuilder::new("Asesoría fiscal", 2, 100).iva(IvaRate::General).build())
//!     .add_tax(irpf_withholding(IrpfRate::Standard))
//!     .build()
//!     .unwrap();
//!
//! // 200 + 42 IVA - 30 IRPF
//! assert_eq!(invoice.totals.total, dec!(212));
//! ```

mod irpf;
mod rates;
mod summary;

pub use irpf::{IRPF_NAME, IrpfRate, irpf_withholding, is_irpf};
pub use rates::{IvaRate, recargo_equivalencia};
pub use summary::{Quarter, QuarterlySummary, quarterly_summary};
