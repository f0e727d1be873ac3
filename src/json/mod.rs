//! JSON boundary for hosts that keep form state as JSON.
//!
//! Field names follow the host form (`unitPrice`, `taxRate`,
//! `additionalTaxes`, `isPercentage`). Numeric fields may be numbers,
//! strings or `null`; client-supplied subtotals and totals are ignored.
//!
//! ```
//! use billeo::json::compute_totals_json;
//!
//! let out = compute_totals_json(
//!     r#"{"items":[{"quantity":"2","unitPrice":50,"taxRate":"21"}],"additionalTaxes":[null]}"#,
//! )
//! .unwrap();
//! let value: serde_json::Value = serde_json::from_str(&out).unwrap();
//! assert_eq!(value["totals"]["total"], "121");
//! ```

use serde::Deserialize;

use crate::core::{
    AdditionalTax, BilleoError, Calculation, Document, LineItem, compute_totals,
};

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct TotalsRequest {
    #[serde(default, deserialize_with = "crate::core::null_as_default")]
    items: Vec<LineItem>,
    #[serde(default, deserialize_with = "crate::core::skip_null_entries")]
    additional_taxes: Vec<AdditionalTax>,
}

/// Parse a document and recalculate its totals.
pub fn parse_document(json: &str) -> Result<Document, BilleoError> {
    let mut document: Document =
        serde_json::from_str(json).map_err(|e| BilleoError::Json(e.to_string()))?;
    document.recalculate();
    Ok(document)
}

/// Compute totals for `{ "items": [...], "additionalTaxes": [...] }`.
pub fn calculate_json(json: &str) -> Result<Calculation, BilleoError> {
    let request: TotalsRequest =
        serde_json::from_str(json).map_err(|e| BilleoError::Json(e.to_string()))?;
    Ok(compute_totals(&request.items, &request.additional_taxes))
}

/// Like [`calculate_json`], returning the serialized calculation.
pub fn compute_totals_json(json: &str) -> Result<String, BilleoError> {
    let calculation = calculate_json(json)?;
    serde_json::to_string(&calculation).map_err(|e| BilleoError::Json(e.to_string()))
}

/// Serialize a document, totals included, for the host to persist.
pub fn to_json(document: &Document) -> Result<String, BilleoError> {
    serde_json::to_string(document).map_err(|e| BilleoError::Json(e.to_string()))
}
