use std::fmt;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use rust_decimal::prelude::FromPrimitive;
use serde::de::{self, Visitor};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// A numeric form field as it arrives from the host: a number, raw text, or nothing.
///
/// The calculator reads every numeric field through [`crate::core::to_number`],
/// so a `FieldValue` never has to be valid to be usable.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum FieldValue {
    /// Missing, `null`, or not a number at all (e.g. a boolean).
    #[default]
    Empty,
    /// A numeric value (JSON number or programmatic input).
    Number(Decimal),
    /// Text typed into a form field, parsed lazily.
    Text(String),
}

impl FieldValue {
    /// True for a missing value or text that is only whitespace.
    pub fn is_empty(&self) -> bool {
        match self {
            Self::Empty => true,
            Self::Number(_) => false,
            Self::Text(s) => s.trim().is_empty(),
        }
    }
}

impl From<Decimal> for FieldValue {
    fn from(value: Decimal) -> Self {
        Self::Number(value)
    }
}

impl From<i32> for FieldValue {
    fn from(value: i32) -> Self {
        Self::Number(Decimal::from(value))
    }
}

impl From<i64> for FieldValue {
    fn from(value: i64) -> Self {
        Self::Number(Decimal::from(value))
    }
}

impl From<u32> for FieldValue {
    fn from(value: u32) -> Self {
        Self::Number(Decimal::from(value))
    }
}

impl From<u64> for FieldValue {
    fn from(value: u64) -> Self {
        Self::Number(Decimal::from(value))
    }
}

impl From<&str> for FieldValue {
    fn from(value: &str) -> Self {
        Self::Text(value.to_owned())
    }
}

impl From<String> for FieldValue {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl<T: Into<FieldValue>> From<Option<T>> for FieldValue {
    fn from(value: Option<T>) -> Self {
        value.map_or(Self::Empty, Into::into)
    }
}

impl Serialize for FieldValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::Empty => serializer.serialize_none(),
            Self::Number(d) => Serialize::serialize(d, serializer),
            Self::Text(s) => serializer.serialize_str(s),
        }
    }
}

impl<'de> Deserialize<'de> for FieldValue {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_any(FieldValueVisitor)
    }
}

struct FieldValueVisitor;

impl<'de> Visitor<'de> for FieldValueVisitor {
    type Value = FieldValue;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("a number, a string or null")
    }

    fn visit_bool<E: de::Error>(self, _: bool) -> Result<FieldValue, E> {
        Ok(FieldValue::Empty)
    }

    fn visit_i64<E: de::Error>(self, v: i64) -> Result<FieldValue, E> {
        Ok(FieldValue::Number(Decimal::from(v)))
    }

    fn visit_u64<E: de::Error>(self, v: u64) -> Result<FieldValue, E> {
        Ok(FieldValue::Number(Decimal::from(v)))
    }

    fn visit_f64<E: de::Error>(self, v: f64) -> Result<FieldValue, E> {
        // NaN, infinities and magnitudes beyond Decimal's range have no value.
        Ok(Decimal::from_f64(v).map_or(FieldValue::Empty, FieldValue::Number))
    }

    fn visit_str<E: de::Error>(self, v: &str) -> Result<FieldValue, E> {
        Ok(FieldValue::Text(v.to_owned()))
    }

    fn visit_string<E: de::Error>(self, v: String) -> Result<FieldValue, E> {
        Ok(FieldValue::Text(v))
    }

    fn visit_none<E: de::Error>(self) -> Result<FieldValue, E> {
        Ok(FieldValue::Empty)
    }

    fn visit_unit<E: de::Error>(self) -> Result<FieldValue, E> {
        Ok(FieldValue::Empty)
    }

    fn visit_some<D: Deserializer<'de>>(self, deserializer: D) -> Result<FieldValue, D::Error> {
        FieldValue::deserialize(deserializer)
    }
}

/// Invoice, quote or expense line.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LineItem {
    /// Free-form description.
    #[serde(default, deserialize_with = "null_as_default")]
    pub description: String,
    /// Quantity, expected to be non-negative.
    #[serde(default)]
    pub quantity: FieldValue,
    /// Net price per unit, expected to be non-negative.
    #[serde(default)]
    pub unit_price: FieldValue,
    /// IVA percentage for this line (21 means 21%).
    #[serde(default)]
    pub tax_rate: FieldValue,
    /// `quantity * unit_price`, overwritten on every calculation.
    /// Never read from input.
    #[serde(default, skip_deserializing)]
    pub subtotal: Decimal,
}

/// Document-level tax or adjustment, e.g. IRPF withholding or a flat fee.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AdditionalTax {
    #[serde(default, deserialize_with = "null_as_default")]
    pub name: String,
    /// Percentage of the subtotal or absolute amount; negative values reduce the total.
    #[serde(default)]
    pub amount: FieldValue,
    #[serde(default, deserialize_with = "lenient_bool")]
    pub is_percentage: bool,
}

/// Aggregate totals of a document.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InvoiceTotals {
    /// Sum of line subtotals.
    pub subtotal: Decimal,
    /// Sum of per-line IVA.
    pub tax: Decimal,
    /// Sum of additional tax contributions.
    pub additional_taxes_total: Decimal,
    /// `subtotal + tax + additional_taxes_total`, floored at zero.
    pub total: Decimal,
}

impl fmt::Display for InvoiceTotals {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "subtotal {:.2} | tax {:.2} | additional {:.2} | total {:.2}",
            self.subtotal, self.tax, self.additional_taxes_total, self.total
        )
    }
}

/// Contribution of a single additional tax.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AdditionalTaxLine {
    pub name: String,
    pub is_percentage: bool,
    pub contribution: Decimal,
}

/// Output of a calculation pass.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Calculation {
    /// Input items with recomputed subtotals.
    pub items: Vec<LineItem>,
    /// One entry per additional tax, in input order.
    pub additional_taxes: Vec<AdditionalTaxLine>,
    pub totals: InvoiceTotals,
}

/// IVA grouped by rate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaxBreakdown {
    pub rate: Decimal,
    pub taxable_amount: Decimal,
    pub tax_amount: Decimal,
}

/// Kind of document whose totals are computed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DocumentKind {
    /// Factura issued to a client.
    #[default]
    Invoice,
    /// Presupuesto sent to a client, no tax effect until invoiced.
    Quote,
    /// Gasto: a supplier invoice or receipt.
    Expense,
}

impl DocumentKind {
    /// Default numbering prefix (factura, presupuesto, gasto).
    pub fn default_prefix(&self) -> &'static str {
        match self {
            Self::Invoice => "F-",
            Self::Quote => "P-",
            Self::Expense => "G-",
        }
    }
}

/// An invoice, quote or expense being edited.
///
/// Totals are derived state: they are never read from input and are
/// refreshed by [`Document::recalculate`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Document {
    #[serde(default)]
    pub kind: DocumentKind,
    #[serde(default)]
    pub number: Option<String>,
    #[serde(default, deserialize_with = "optional_date")]
    pub issue_date: Option<NaiveDate>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub items: Vec<LineItem>,
    /// `null` entries are dropped when deserializing.
    #[serde(default, deserialize_with = "skip_null_entries")]
    pub additional_taxes: Vec<AdditionalTax>,
    #[serde(default, skip_deserializing)]
    pub totals: InvoiceTotals,
}

impl Document {
    /// Empty, undated document of the given kind with zero totals.
    pub fn new(kind: DocumentKind) -> Self {
        Self {
            kind,
            ..Self::default()
        }
    }
}

pub(crate) fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + Default,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

pub(crate) fn skip_null_entries<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    let entries = Option::<Vec<Option<T>>>::deserialize(deserializer)?.unwrap_or_default();
    Ok(entries.into_iter().flatten().collect())
}

fn optional_date<'de, D>(deserializer: D) -> Result<Option<NaiveDate>, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<String>::deserialize(deserializer)? {
        None => Ok(None),
        Some(s) if s.trim().is_empty() => Ok(None),
        Some(s) => NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d")
            .map(Some)
            .map_err(de::Error::custom),
    }
}

fn lenient_bool<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    struct LenientBool;

    impl<'de> Visitor<'de> for LenientBool {
        type Value = bool;

        fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            f.write_str("a boolean, 0/1, \"true\"/\"false\" or null")
        }

        fn visit_bool<E: de::Error>(self, v: bool) -> Result<bool, E> {
            Ok(v)
        }

        fn visit_i64<E: de::Error>(self, v: i64) -> Result<bool, E> {
            Ok(v != 0)
        }

        fn visit_u64<E: de::Error>(self, v: u64) -> Result<bool, E> {
            Ok(v != 0)
        }

        fn visit_f64<E: de::Error>(self, v: f64) -> Result<bool, E> {
            Ok(v != 0.0)
        }

        fn visit_str<E: de::Error>(self, v: &str) -> Result<bool, E> {
            let v = v.trim();
            Ok(v.eq_ignore_ascii_case("true") || v == "1")
        }

        fn visit_none<E: de::Error>(self) -> Result<bool, E> {
            Ok(false)
        }

        fn visit_unit<E: de::Error>(self) -> Result<bool, E> {
            Ok(false)
        }

        fn visit_some<D: Deserializer<'de>>(self, deserializer: D) -> Result<bool, D::Error> {
            deserializer.deserialize_any(LenientBool)
        }
    }

    deserializer.deserialize_any(LenientBool)
}
