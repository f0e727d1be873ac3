#![cfg(feature = "json")]

use billeo::core::*;
use billeo::json::*;
use chrono::NaiveDate;
use rust_decimal_macros::dec;

#[test]
fn parse_form_state_with_mixed_types() {
    let doc = parse_document(
        r#"{
            "kind": "invoice",
            "number": "F-2024-003",
            "issueDate": "2024-03-15",
            "items": [
                {"description": "Logo", "quantity": "2", "unitPrice": 50, "taxRate": "21", "subtotal": 12345},
                {"description": "Tarjetas", "quantity": 1.5, "unitPrice": "10.00", "taxRate": 21}
            ],
            "additionalTaxes": [
                {"name": "IRPF", "amount": "-15", "isPercentage": "true"},
                null
            ],
            "totals": {"subtotal": "1", "tax": "1", "additionalTaxesTotal": "1", "total": "1"}
        }"#,
    )
    .unwrap();

    assert_eq!(doc.kind, DocumentKind::Invoice);
    assert_eq!(doc.issue_date, NaiveDate::from_ymd_opt(2024, 3, 15));
    assert_eq!(doc.items[0].subtotal, dec!(100));
    assert_eq!(doc.items[1].subtotal, dec!(15));
    assert_eq!(doc.additional_taxes.len(), 1);
    assert!(doc.additional_taxes[0].is_percentage);
    assert_eq!(doc.totals.subtotal, dec!(115));
    assert_eq!(doc.totals.tax, dec!(24.15));
    assert_eq!(doc.totals.additional_taxes_total, dec!(-17.25));
    assert_eq!(doc.totals.total, dec!(121.9));
}

#[test]
fn nulls_and_missing_fields_default() {
    let doc = parse_document(
        r#"{"kind": "expense", "issueDate": "", "items": [{"quantity": null, "unitPrice": "abc"}], "additionalTaxes": null}"#,
    )
    .unwrap();
    assert_eq!(doc.kind, DocumentKind::Expense);
    assert_eq!(doc.issue_date, None);
    assert_eq!(doc.items.len(), 1);
    assert_eq!(doc.items[0].description, "");
    assert!(doc.additional_taxes.is_empty());
    assert_eq!(doc.totals, InvoiceTotals::default());
}

#[test]
fn null_items_array_is_empty() {
    let doc = parse_document(r#"{"items": null}"#).unwrap();
    assert!(doc.items.is_empty());
    assert_eq!(doc.kind, DocumentKind::Invoice);
}

#[test]
fn lenient_percentage_flags() {
    let calc = calculate_json(
        r#"{
            "items": [{"quantity": 1, "unitPrice": 100, "taxRate": 0}],
            "additionalTaxes": [
                {"name": "a", "amount": 10, "isPercentage": 1},
                {"name": "b", "amount": 10, "isPercentage": "false"},
                {"name": "c", "amount": 10, "isPercentage": null},
                {"name": "d", "amount": 10}
            ]
        }"#,
    )
    .unwrap();
    let flags: Vec<bool> = calc.additional_taxes.iter().map(|t| t.is_percentage).collect();
    assert_eq!(flags, [true, false, false, false]);
    assert_eq!(calc.totals.additional_taxes_total, dec!(40));
}

#[test]
fn boolean_in_numeric_field_is_zero() {
    let calc = calculate_json(r#"{"items": [{"quantity": true, "unitPrice": 10}]}"#).unwrap();
    assert_eq!(calc.totals.subtotal, dec!(0));
}

#[test]
fn compute_totals_json_output() {
    let out = compute_totals_json(
        r#"{"items": [{"description": "Hosting", "quantity": 2, "unitPrice": 50, "taxRate": 21}],
            "additionalTaxes": [{"name": "IRPF", "amount": -15, "isPercentage": true}]}"#,
    )
    .unwrap();
    let value: serde_json::Value = serde_json::from_str(&out).unwrap();

    assert_eq!(value["items"][0]["subtotal"], "100");
    assert_eq!(value["items"][0]["unitPrice"], "50");
    assert_eq!(value["additionalTaxes"][0]["name"], "IRPF");
    assert_eq!(value["totals"]["subtotal"], "100");
    assert_eq!(value["totals"]["tax"], "21");
    assert_eq!(value["totals"]["total"], "106");
}

#[test]
fn to_json_round_trips_through_parse() {
    let doc = DocumentBuilder::new(DocumentKind::Quote)
        .number("P-2024-009")
        .issue_date(NaiveDate::from_ymd_opt(2024, 11, 5).unwrap())
        .add_item(LineItemBuilder::new("Reforma web", 1, dec!(1250.50)).build())
        .add_tax(AdditionalTax::flat("Dominio", 15))
        .build()
        .unwrap();

    let json = to_json(&doc).unwrap();
    assert!(json.contains(r#""kind":"quote""#));
    assert!(json.contains(r#""issueDate":"2024-11-05""#));

    let parsed = parse_document(&json).unwrap();
    assert_eq!(parsed.totals, doc.totals);
    assert_eq!(parsed.number, doc.number);
}

#[test]
fn invalid_json_is_an_error() {
    let err = parse_document("{not json").unwrap_err();
    assert!(matches!(err, BilleoError::Json(_)));

    let err = parse_document(r#"{"issueDate": "15/03/2024"}"#).unwrap_err();
    assert!(matches!(err, BilleoError::Json(_)));
}
