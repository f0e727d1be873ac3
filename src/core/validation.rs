//! Form validation, kept apart from the calculation.
//!
//! The calculator accepts anything and degrades bad numbers to zero; these
//! checks are what a form shows next to the offending field.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use super::calculator::{TotalsCalculator, line_subtotal};
use super::coerce::parse_decimal;
use super::error::ValidationError;
use super::types::*;

/// Validate a document's items and additional taxes, plus its stored totals.
/// Returns all validation errors found (not just the first).
pub fn validate_document(document: &Document) -> Vec<ValidationError> {
    let mut errors = Vec::new();

    if document
        .number
        .as_ref()
        .is_some_and(|n| n.trim().is_empty())
    {
        errors.push(ValidationError::new(
            "number",
            "document number must not be blank",
        ));
    }

    for (i, item) in document.items.iter().enumerate() {
        validate_line(item, i, &mut errors);
    }

    for (i, tax) in document.additional_taxes.iter().enumerate() {
        validate_additional_tax(tax, i, &mut errors);
    }

    errors.extend(validate_arithmetic(document));

    errors
}

/// Check that stored totals and item subtotals match a fresh calculation.
pub fn validate_arithmetic(document: &Document) -> Vec<ValidationError> {
    let mut errors = Vec::new();

    for (i, item) in document.items.iter().enumerate() {
        let expected = line_subtotal(item);
        if item.subtotal != expected {
            errors.push(ValidationError::new(
                format!("items[{i}].subtotal"),
                format!(
                    "subtotal {} does not match quantity × unit price {}",
                    item.subtotal, expected
                ),
            ));
        }
    }

    let expected = TotalsCalculator::new()
        .compute(&document.items, &document.additional_taxes)
        .totals;
    let stored = &document.totals;

    let checks = [
        ("totals.subtotal", stored.subtotal, expected.subtotal),
        ("totals.tax", stored.tax, expected.tax),
        (
            "totals.additional_taxes_total",
            stored.additional_taxes_total,
            expected.additional_taxes_total,
        ),
        ("totals.total", stored.total, expected.total),
    ];
    for (field, actual, wanted) in checks {
        if actual != wanted {
            errors.push(ValidationError::new(
                field,
                format!("{actual} does not match recalculated {wanted}"),
            ));
        }
    }

    if stored.total < Decimal::ZERO {
        errors.push(ValidationError::new("totals.total", "total must not be negative"));
    }

    errors
}

fn validate_line(item: &LineItem, index: usize, errors: &mut Vec<ValidationError>) {
    let prefix = format!("items[{index}]");

    if item.description.trim().is_empty() {
        errors.push(ValidationError::new(
            format!("{prefix}.description"),
            "description must not be empty",
        ));
    }

    check_non_negative(&item.quantity, &format!("{prefix}.quantity"), "quantity", errors);
    check_non_negative(&item.unit_price, &format!("{prefix}.unit_price"), "unit price", errors);

    let rate_field = format!("{prefix}.tax_rate");
    if let Some(rate) = check_non_negative(&item.tax_rate, &rate_field, "tax rate", errors) {
        if rate > dec!(100) {
            errors.push(ValidationError::new(
                rate_field,
                format!("tax rate {rate}% exceeds 100%"),
            ));
        }
    }
}

fn validate_additional_tax(tax: &AdditionalTax, index: usize, errors: &mut Vec<ValidationError>) {
    let prefix = format!("additional_taxes[{index}]");

    if tax.name.trim().is_empty() {
        errors.push(ValidationError::new(
            format!("{prefix}.name"),
            "additional tax name must not be empty",
        ));
    }

    let field = format!("{prefix}.amount");
    if let Some(amount) = check_parseable(&tax.amount, &field, "amount", errors) {
        if tax.is_percentage && amount.abs() > dec!(100) {
            errors.push(ValidationError::new(
                field,
                format!("percentage {amount}% must be between -100% and 100%"),
            ));
        }
    }
}

/// Parse a field that may be left empty. Reports text with no numeric value.
fn check_parseable(
    value: &FieldValue,
    field: &str,
    label: &str,
    errors: &mut Vec<ValidationError>,
) -> Option<Decimal> {
    if value.is_empty() {
        return None;
    }
    match value {
        FieldValue::Number(d) => Some(*d),
        FieldValue::Empty => None,
        FieldValue::Text(s) => {
            let parsed = parse_decimal(s);
            if parsed.is_none() {
                errors.push(ValidationError::new(
                    field,
                    format!("{label} '{s}' is not a number"),
                ));
            }
            parsed
        }
    }
}

fn check_non_negative(
    value: &FieldValue,
    field: &str,
    label: &str,
    errors: &mut Vec<ValidationError>,
) -> Option<Decimal> {
    let parsed = check_parseable(value, field, label, errors)?;
    if parsed < Decimal::ZERO {
        errors.push(ValidationError::new(
            field,
            format!("{label} must not be negative"),
        ));
    }
    Some(parsed)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::builder::{DocumentBuilder, LineItemBuilder};

    fn draft(item: LineItem) -> Document {
        DocumentBuilder::new(DocumentKind::Invoice)
            .add_item(item)
            .build_unchecked()
    }

    #[test]
    fn clean_document_has_no_errors() {
        let doc = draft(LineItemBuilder::new("Hosting", 1, 20).build());
        assert!(validate_document(&doc).is_empty());
    }

    #[test]
    fn reports_every_bad_field() {
        let doc = draft(
            LineItemBuilder::new(" ", "abc", -5)
                .tax_rate("150")
                .build(),
        );
        let errors = validate_document(&doc);
        let fields: Vec<&str> = errors.iter().map(|e| e.field.as_str()).collect();
        assert_eq!(
            fields,
            [
                "items[0].description",
                "items[0].quantity",
                "items[0].unit_price",
                "items[0].tax_rate",
            ]
        );
    }

    #[test]
    fn empty_fields_are_not_errors() {
        let doc = draft(LineItemBuilder::new("Pendiente", "", FieldValue::Empty).build());
        assert!(validate_document(&doc).is_empty());

        let doc = draft(LineItemBuilder::new("Pendiente", "   ", 10).tax_rate(" ").build());
        assert!(validate_document(&doc).is_empty());
    }

    #[test]
    fn percentage_out_of_range() {
        let mut doc = draft(LineItemBuilder::new("Hosting", 1, 20).build());
        doc.additional_taxes.push(AdditionalTax::percentage("", -120));
        doc.recalculate();
        let errors = validate_document(&doc);
        assert_eq!(errors.len(), 2);
        assert_eq!(errors[0].field, "additional_taxes[0].name");
        assert_eq!(errors[1].field, "additional_taxes[0].amount");
    }

    #[test]
    fn flat_amounts_have_no_range() {
        let mut doc = draft(LineItemBuilder::new("Hosting", 1, 20).build());
        doc.additional_taxes.push(AdditionalTax::flat("Descuento", -500));
        doc.recalculate();
        assert!(validate_document(&doc).is_empty());
    }

    #[test]
    fn stale_totals_detected() {
        let mut doc = draft(LineItemBuilder::new("Hosting", 2, 20).build());
        doc.items[0].quantity = FieldValue::from(3);
        let errors = validate_arithmetic(&doc);
        assert!(errors.iter().any(|e| e.field == "items[0].subtotal"));
        assert!(errors.iter().any(|e| e.field == "totals.subtotal"));
        assert!(errors.iter().any(|e| e.field == "totals.total"));

        doc.recalculate();
        assert!(validate_arithmetic(&doc).is_empty());
    }
}
