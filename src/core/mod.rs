//! Core document types, totals calculation, validation and numbering.
//!
//! The calculator is a pure function over plain data: it never fails, never
//! rounds and never keeps state between calls.

mod builder;
mod calculator;
mod coerce;
mod error;
mod numbering;
mod types;
mod validation;

pub use builder::*;
pub use calculator::{
    PercentageBase, TotalsCalculator, calculate_totals, compute_totals, tax_breakdown,
};
pub use coerce::*;
pub use error::*;
pub use numbering::*;
pub use types::*;
pub use validation::*;

#[cfg(feature = "iva")]
pub(crate) use calculator::percent_of;
#[cfg(feature = "json")]
pub(crate) use types::{null_as_default, skip_null_entries};
