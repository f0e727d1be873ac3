use chrono::{Datelike, NaiveDate};

use super::error::BilleoError;
use super::types::DocumentKind;

/// Gapless document number sequence.
///
/// Generates numbers in the format `{prefix}{year}-{sequential}`, e.g.
/// "F-2024-001" for invoices or "P-2024-001" for quotes. Spanish invoicing
/// rules require invoice series to be correlative within each year, so each
/// document kind keeps its own sequence.
#[derive(Debug, Clone)]
pub struct DocumentNumberSequence {
    prefix: String,
    year: i32,
    next_number: u64,
    zero_pad: usize,
}

impl DocumentNumberSequence {
    /// Create a sequence for `kind` starting at 1, using the kind's default prefix.
    pub fn new(kind: DocumentKind, year: i32) -> Self {
        Self::with_prefix(kind.default_prefix(), year)
    }

    /// Create a sequence with a custom prefix (e.g. a second invoice series "R-").
    pub fn with_prefix(prefix: impl Into<String>, year: i32) -> Self {
        Self::starting_at(prefix, year, 1)
    }

    /// Create a sequence continuing from a given number.
    pub fn starting_at(prefix: impl Into<String>, year: i32, next_number: u64) -> Self {
        Self {
            prefix: prefix.into(),
            year,
            next_number,
            zero_pad: 3,
        }
    }

    /// Set zero-padding width (default: 3, so "001").
    pub fn with_padding(mut self, width: usize) -> Self {
        self.zero_pad = width;
        self
    }

    /// Generate the next document number.
    ///
    /// Fails once the counter reaches `u64::MAX`; the sequence is left unchanged.
    pub fn next_number(&mut self) -> Result<String, BilleoError> {
        let following = self.next_number.checked_add(1).ok_or_else(|| {
            BilleoError::Numbering(format!("sequence {}{} is exhausted", self.prefix, self.year))
        })?;
        let number = self.format(self.next_number);
        self.next_number = following;
        Ok(number)
    }

    /// Preview the next number without consuming it.
    pub fn peek(&self) -> String {
        self.format(self.next_number)
    }

    /// Year the sequence currently numbers.
    pub fn year(&self) -> i32 {
        self.year
    }

    /// The next sequential value, without prefix or formatting.
    pub fn next_raw(&self) -> u64 {
        self.next_number
    }

    /// Advance to a new year, resetting the counter to 1.
    pub fn advance_year(&mut self, new_year: i32) -> Result<(), BilleoError> {
        if new_year <= self.year {
            return Err(BilleoError::Numbering(format!(
                "new year {new_year} must be greater than current year {}",
                self.year
            )));
        }
        tracing::debug!(prefix = %self.prefix, from = self.year, to = new_year, "numbering year advanced");
        self.year = new_year;
        self.next_number = 1;
        Ok(())
    }

    /// Advance the year if `date` falls in a later one.
    /// Returns true if the year was advanced.
    pub fn auto_advance(&mut self, date: NaiveDate) -> bool {
        let date_year = date.year();
        if date_year > self.year {
            tracing::debug!(prefix = %self.prefix, from = self.year, to = date_year, "numbering year advanced");
            self.year = date_year;
            self.next_number = 1;
            true
        } else {
            false
        }
    }

    fn format(&self, number: u64) -> String {
        format!(
            "{}{}-{:0>width$}",
            self.prefix,
            self.year,
            number,
            width = self.zero_pad
        )
    }
}
