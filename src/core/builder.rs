use chrono::NaiveDate;
use rust_decimal::Decimal;

use super::error::BilleoError;
use super::types::*;
use super::validation;

/// Builder for invoices, quotes and expenses.
///
/// ```
/// use billeo::core::*;
/// use rust_decimal_macros::dec;
/// use chrono::NaiveDate;
///
/// let invoice = DocumentBuilder::new(DocumentKind::Invoice)
///     .number("F-2024-001")
///     .issue_date(NaiveDate::from_ymd_opt(2024, 3, 15).unwrap())
///     .add_item(LineItemBuilder::new("Consultoría", dec!(10), dec!(60)).tax_rate(21).build())
///     .add_tax(AdditionalTax::percentage("IRPF", -15))
///     .build()
///     .unwrap();
///
/// assert_eq!(invoice.totals.total, dec!(636));
/// ```
pub struct DocumentBuilder {
    kind: DocumentKind,
    number: Option<String>,
    issue_date: Option<NaiveDate>,
    items: Vec<LineItem>,
    additional_taxes: Vec<AdditionalTax>,
}

impl DocumentBuilder {
    /// Start an empty document of the given kind.
    pub fn new(kind: DocumentKind) -> Self {
        Self {
            kind,
            number: None,
            issue_date: None,
            items: Vec::new(),
            additional_taxes: Vec::new(),
        }
    }

    pub fn number(mut self, number: impl Into<String>) -> Self {
        self.number = Some(number.into());
        self
    }

    pub fn issue_date(mut self, date: NaiveDate) -> Self {
        self.issue_date = Some(date);
        self
    }

    pub fn add_item(mut self, item: LineItem) -> Self {
        self.items.push(item);
        self
    }

    pub fn add_tax(mut self, tax: AdditionalTax) -> Self {
        self.additional_taxes.push(tax);
        self
    }

    /// Build the document, calculating totals and running form validation.
    /// Returns all validation errors (not just the first).
    pub fn build(self) -> Result<Document, BilleoError> {
        // Input limits to prevent abuse
        if self.items.len() > 10_000 {
            return Err(BilleoError::Builder(
                "document cannot have more than 10,000 line items".into(),
            ));
        }
        if self.number.as_ref().is_some_and(|n| n.len() > 200) {
            return Err(BilleoError::Builder(
                "document number cannot exceed 200 characters".into(),
            ));
        }

        let document = self.build_unchecked();

        let errors = validation::validate_document(&document);
        if !errors.is_empty() {
            let msg = errors
                .iter()
                .map(|e| e.to_string())
                .collect::<Vec<_>>()
                .join("; ");
            return Err(BilleoError::Validation(msg));
        }

        Ok(document)
    }

    /// Build without validation, e.g. for a draft still being edited.
    pub fn build_unchecked(self) -> Document {
        let mut document = Document {
            kind: self.kind,
            number: self.number,
            issue_date: self.issue_date,
            items: self.items,
            additional_taxes: self.additional_taxes,
            totals: InvoiceTotals::default(),
        };
        document.recalculate();
        document
    }
}

/// Builder for LineItem.
pub struct LineItemBuilder {
    description: String,
    quantity: FieldValue,
    unit_price: FieldValue,
    tax_rate: FieldValue,
}

impl LineItemBuilder {
    /// New line at the general IVA rate (21%).
    pub fn new(
        description: impl Into<String>,
        quantity: impl Into<FieldValue>,
        unit_price: impl Into<FieldValue>,
    ) -> Self {
        Self {
            description: description.into(),
            quantity: quantity.into(),
            unit_price: unit_price.into(),
            tax_rate: FieldValue::Number(Decimal::from(21)),
        }
    }

    pub fn tax_rate(mut self, rate: impl Into<FieldValue>) -> Self {
        self.tax_rate = rate.into();
        self
    }

    /// Finish the line; `subtotal` is filled in when totals are calculated.
    pub fn build(self) -> LineItem {
        LineItem {
            description: self.description,
            quantity: self.quantity,
            unit_price: self.unit_price,
            tax_rate: self.tax_rate,
            subtotal: Decimal::ZERO,
        }
    }
}

impl AdditionalTax {
    /// Percentage of the subtotal, e.g. `percentage("IRPF", -15)`.
    pub fn percentage(name: impl Into<String>, amount: impl Into<FieldValue>) -> Self {
        Self {
            name: name.into(),
            amount: amount.into(),
            is_percentage: true,
        }
    }

    /// Absolute amount added to the total (negative to subtract).
    pub fn flat(name: impl Into<String>, amount: impl Into<FieldValue>) -> Self {
        Self {
            name: name.into(),
            amount: amount.into(),
            is_percentage: false,
        }
    }
}
