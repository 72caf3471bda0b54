//! The registry's representation of a single business.
//!
//! Entries keep the order in which the registry returned them. Several
//! queries resolve ties by taking the first match, so the sequences are never
//! re-sorted.

use std::fmt;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// The registry's version number for an entry that is currently in force.
pub const CURRENT_VERSION: i64 = 1;

/// An entry which may stop being valid at some date.
pub trait Expiring {
    /// The date on which the entry stops being valid, if known.
    fn end_date(&self) -> Option<NaiveDate>;
}

/// A registered name or auxiliary (trade) name of a business.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NameEntry {
    /// Display rank of the name.
    ///
    /// For auxiliary names, `0` marks a name that is not listed on its own.
    pub order: i64,
    /// Entry version. [`CURRENT_VERSION`] is the version in force.
    pub version: i64,
    /// The name itself.
    pub name: String,
    /// Language code of the name, if the registry supplied one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub language: Option<String>,
    /// When the name was registered.
    #[serde(default, deserialize_with = "registry_date::deserialize")]
    pub registration_date: Option<NaiveDate>,
    /// When the name stops being valid.
    #[serde(default, deserialize_with = "registry_date::deserialize")]
    pub end_date: Option<NaiveDate>,
    /// Provenance id, see [`crate::domain::source::source_text`].
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<i64>,
}

/// A liquidation, bankruptcy or restructuring filing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LiquidationEntry {
    /// Entry version.
    #[serde(default = "current_version")]
    pub version: i64,
    /// The registry's code for the kind of filing.
    #[serde(rename = "type")]
    pub kind: TypeCode,
    /// Free-text description of the filing.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Language of the description.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub language: Option<String>,
    /// When the filing was registered.
    #[serde(default, deserialize_with = "registry_date::deserialize")]
    pub registration_date: Option<NaiveDate>,
    /// When the filing ended.
    #[serde(default, deserialize_with = "registry_date::deserialize")]
    pub end_date: Option<NaiveDate>,
    /// Provenance id.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<i64>,
}

/// A company form (legal form) the business has had.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompanyFormEntry {
    /// Entry version.
    #[serde(default = "current_version")]
    pub version: i64,
    /// The registry's code for the company form.
    #[serde(default, rename = "type", skip_serializing_if = "Option::is_none")]
    pub kind: Option<TypeCode>,
    /// Human-readable name of the company form.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Language of the name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub language: Option<String>,
    /// When the company form was registered.
    #[serde(default, deserialize_with = "registry_date::deserialize")]
    pub registration_date: Option<NaiveDate>,
    /// When the company form ended.
    #[serde(default, deserialize_with = "registry_date::deserialize")]
    pub end_date: Option<NaiveDate>,
    /// Provenance id.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<i64>,
}

impl Expiring for NameEntry {
    fn end_date(&self) -> Option<NaiveDate> {
        self.end_date
    }
}

impl Expiring for LiquidationEntry {
    fn end_date(&self) -> Option<NaiveDate> {
        self.end_date
    }
}

impl Expiring for CompanyFormEntry {
    fn end_date(&self) -> Option<NaiveDate> {
        self.end_date
    }
}

/// A type code as it arrived from the registry.
///
/// The registry uses both textual and numeric codes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum TypeCode {
    /// A textual code, such as `KONK`.
    Text(String),
    /// A numeric code.
    Number(i64),
}

impl fmt::Display for TypeCode {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Self::Text(code) => f.write_str(code),
            Self::Number(code) => write!(f, "{code}"),
        }
    }
}

/// One business as returned by the registry.
///
/// The well-known fields are parsed into typed values. The complete JSON
/// object is kept as well, so fields without a dedicated accessor remain
/// reachable through [`RegistryRecord::raw_field`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Map<String, Value>", into = "Map<String, Value>")]
pub struct RegistryRecord {
    /// The business id exactly as the registry reported it.
    pub business_id: Option<String>,
    /// The primary registered name.
    pub name: String,
    /// When the business was registered.
    pub registration_date: Option<NaiveDate>,
    /// The current company form code.
    pub company_form: Option<String>,
    /// Link to the full registry entry.
    pub details_uri: Option<String>,
    /// Registered names, in registry order.
    pub names: Vec<NameEntry>,
    /// Auxiliary (trade) names, in registry order.
    pub auxiliary_names: Vec<NameEntry>,
    /// Liquidation filings, in registry order.
    pub liquidations: Vec<LiquidationEntry>,
    /// Company forms, in registry order.
    pub company_forms: Vec<CompanyFormEntry>,
    raw: Map<String, Value>,
}

impl RegistryRecord {
    /// Builds a record from one element of the registry's `results` array.
    ///
    /// # Errors
    ///
    /// Returns an error if the value is not a JSON object or if a well-known
    /// field has an unexpected shape.
    pub fn from_value(value: Value) -> Result<Self, ParseError> {
        match value {
            Value::Object(raw) => Self::try_from(raw),
            _ => Err(ParseError::NotAnObject),
        }
    }

    /// Looks up a field of the underlying JSON object.
    #[must_use]
    pub fn raw_field(&self, key: &str) -> Option<&Value> {
        self.raw.get(key)
    }

    /// Looks up a field of the underlying JSON object, falling back to
    /// `default` when the field is absent.
    #[must_use]
    pub fn raw_field_or<'a>(&'a self, key: &str, default: &'a Value) -> &'a Value {
        self.raw_field(key).unwrap_or(default)
    }

    /// Returns the underlying JSON object.
    #[must_use]
    pub const fn raw(&self) -> &Map<String, Value> {
        &self.raw
    }
}

impl TryFrom<Map<String, Value>> for RegistryRecord {
    type Error = ParseError;

    fn try_from(raw: Map<String, Value>) -> Result<Self, Self::Error> {
        let fields: Fields = serde_json::from_value(Value::Object(raw.clone()))?;

        Ok(Self {
            business_id: fields.business_id,
            name: fields.name,
            registration_date: fields.registration_date,
            company_form: fields.company_form,
            details_uri: fields.details_uri,
            names: fields.names.unwrap_or_default(),
            auxiliary_names: fields.auxiliary_names.unwrap_or_default(),
            liquidations: fields.liquidations.unwrap_or_default(),
            company_forms: fields.company_forms.unwrap_or_default(),
            raw,
        })
    }
}

impl From<RegistryRecord> for Map<String, Value> {
    fn from(record: RegistryRecord) -> Self {
        record.raw
    }
}

/// Errors that can occur when interpreting a registry record.
#[derive(Debug, thiserror::Error)]
pub enum ParseError {
    /// The record is not a JSON object.
    #[error("registry record is not a JSON object")]
    NotAnObject,

    /// A well-known field has an unexpected shape.
    #[error("registry record has an unexpected shape: {0}")]
    Shape(#[from] serde_json::Error),
}

// The well-known fields. A `null` sequence is treated like a missing one.
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct Fields {
    name: String,
    #[serde(default)]
    business_id: Option<String>,
    #[serde(default, deserialize_with = "registry_date::deserialize")]
    registration_date: Option<NaiveDate>,
    #[serde(default)]
    company_form: Option<String>,
    #[serde(default)]
    details_uri: Option<String>,
    #[serde(default)]
    names: Option<Vec<NameEntry>>,
    #[serde(default)]
    auxiliary_names: Option<Vec<NameEntry>>,
    #[serde(default)]
    liquidations: Option<Vec<LiquidationEntry>>,
    #[serde(default)]
    company_forms: Option<Vec<CompanyFormEntry>>,
}

const fn current_version() -> i64 {
    CURRENT_VERSION
}

/// Registry dates are `YYYY-MM-DD`, sometimes followed by a time of day which
/// is discarded. `null` and the empty string both mean "no date".
mod registry_date {
    use chrono::NaiveDate;
    use serde::{Deserialize, Deserializer, de::Error};

    pub fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<Option<NaiveDate>, D::Error> {
        let Some(text) = Option::<String>::deserialize(deserializer)? else {
            return Ok(None);
        };
        let text = text.trim();
        if text.is_empty() {
            return Ok(None);
        }

        text.get(..10)
            .and_then(|day| NaiveDate::parse_from_str(day, "%Y-%m-%d").ok())
            .map(Some)
            .ok_or_else(|| D::Error::custom(format!("invalid date '{text}'")))
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn parses_registry_result() {
        let record = RegistryRecord::from_value(json!({
            "businessId": "0112038-9",
            "name": "Nokia Oyj",
            "registrationDate": "1978-03-15",
            "companyForm": "OYJ",
            "detailsUri": null,
            "names": [
                {"order": 0, "version": 1, "name": "Nokia Oyj", "registrationDate": "1997-09-01", "endDate": null, "source": 1},
                {"order": 0, "version": 2, "name": "Nokia Ab", "registrationDate": "1966-01-01", "endDate": "1997-09-01", "source": 1}
            ],
            "auxiliaryNames": [
                {"order": 1, "version": 1, "name": "Nokia Corporation", "language": "EN", "registrationDate": "1997-09-01T00:00:00", "endDate": "", "source": 1}
            ],
            "liquidations": [],
            "companyForms": [
                {"version": 1, "name": "Julkinen osakeyhtiö", "type": "OYJ", "language": "FI", "registrationDate": "1997-09-01", "endDate": null, "source": 1}
            ],
            "addresses": [{"street": "Karakaari 7"}]
        }))
        .unwrap();

        assert_eq!(record.business_id.as_deref(), Some("0112038-9"));
        assert_eq!(record.name, "Nokia Oyj");
        assert_eq!(record.registration_date, Some(date(1978, 3, 15)));
        assert_eq!(record.company_form.as_deref(), Some("OYJ"));
        assert_eq!(record.details_uri, None);

        assert_eq!(record.names.len(), 2);
        assert_eq!(record.names[1].name, "Nokia Ab");
        assert_eq!(record.names[1].end_date, Some(date(1997, 9, 1)));

        let aux = &record.auxiliary_names[0];
        assert_eq!(aux.language.as_deref(), Some("EN"));
        assert_eq!(aux.registration_date, Some(date(1997, 9, 1)));
        assert_eq!(aux.end_date, None);

        assert!(record.liquidations.is_empty());
        assert_eq!(
            record.company_forms[0].kind,
            Some(TypeCode::Text("OYJ".to_string()))
        );
        assert!(record.raw_field("addresses").is_some());
    }

    #[test]
    fn preserves_entry_order() {
        let record = RegistryRecord::from_value(json!({
            "name": "Primary",
            "auxiliaryNames": [
                {"order": 3, "version": 1, "name": "C"},
                {"order": 1, "version": 1, "name": "A"},
                {"order": 2, "version": 1, "name": "B"}
            ]
        }))
        .unwrap();

        let names: Vec<&str> = record
            .auxiliary_names
            .iter()
            .map(|entry| entry.name.as_str())
            .collect();
        assert_eq!(names, vec!["C", "A", "B"]);
    }

    #[test]
    fn missing_and_null_sequences_are_empty() {
        let record = RegistryRecord::from_value(json!({
            "name": "Primary",
            "names": null
        }))
        .unwrap();

        assert!(record.names.is_empty());
        assert!(record.auxiliary_names.is_empty());
        assert!(record.liquidations.is_empty());
        assert!(record.company_forms.is_empty());
    }

    #[test]
    fn numeric_type_codes_are_accepted() {
        let record = RegistryRecord::from_value(json!({
            "name": "Primary",
            "liquidations": [{"version": 1, "type": 4, "endDate": null}]
        }))
        .unwrap();

        assert_eq!(record.liquidations[0].kind, TypeCode::Number(4));
        assert_eq!(record.liquidations[0].kind.to_string(), "4");
    }

    #[test]
    fn rejects_non_objects() {
        assert!(matches!(
            RegistryRecord::from_value(json!(["not", "a", "record"])),
            Err(ParseError::NotAnObject)
        ));
    }

    #[test]
    fn rejects_missing_name() {
        assert!(matches!(
            RegistryRecord::from_value(json!({"names": []})),
            Err(ParseError::Shape(_))
        ));
    }

    #[test]
    fn rejects_invalid_dates() {
        let result = RegistryRecord::from_value(json!({
            "name": "Primary",
            "names": [{"order": 0, "version": 1, "name": "X", "endDate": "tomorrow"}]
        }));
        assert!(matches!(result, Err(ParseError::Shape(_))));
    }

    #[test]
    fn raw_field_falls_back_to_default() {
        let record = RegistryRecord::from_value(json!({
            "name": "Primary",
            "website": "https://example.fi"
        }))
        .unwrap();
        let fallback = json!("none");

        assert_eq!(
            record.raw_field_or("website", &fallback),
            &json!("https://example.fi")
        );
        assert_eq!(record.raw_field_or("missing", &fallback), &fallback);
        assert_eq!(record.raw_field("missing"), None);
        assert_eq!(record.raw().len(), 2);
    }

    #[test]
    fn serializes_back_to_raw_object() {
        let raw = json!({
            "name": "Primary",
            "unknownField": [1, 2, 3]
        });
        let record = RegistryRecord::from_value(raw.clone()).unwrap();
        assert_eq!(serde_json::to_value(&record).unwrap(), raw);

        let parsed: RegistryRecord = serde_json::from_value(raw).unwrap();
        assert_eq!(parsed, record);
    }

    #[test]
    fn entry_dates_serialize_without_time_of_day() {
        let entry: NameEntry = serde_json::from_value(json!({
            "order": 0,
            "version": 1,
            "name": "Nokia Oyj",
            "registrationDate": "1997-09-01T00:00:00",
            "endDate": ""
        }))
        .unwrap();

        let value = serde_json::to_value(&entry).unwrap();
        assert_eq!(value["registrationDate"], json!("1997-09-01"));
        assert_eq!(value["endDate"], Value::Null);
    }
}
