//! The facts about a business which are in force on a given date.

use chrono::{Local, NaiveDate};
use serde_json::{Map, Value};

use crate::domain::record::{
    CURRENT_VERSION, CompanyFormEntry, Expiring, NameEntry, RegistryRecord, TypeCode,
};

/// Checks whether an entry is still valid on the given date.
///
/// Entries without an end date never expire. An entry whose end date is the
/// given date has already expired.
#[must_use]
pub fn not_expired(entry: &impl Expiring, now: NaiveDate) -> bool {
    entry.end_date().is_none_or(|end_date| now < end_date)
}

/// A borrowed, read-only view of a registry record as of a reference date.
///
/// Every query filters the record's historical entries down to the ones in
/// force on that date. The reference date is fixed when the view is created.
#[derive(Debug, Clone, Copy)]
pub struct TemporalRecordView<'a> {
    record: &'a RegistryRecord,
    date: NaiveDate,
}

impl<'a> TemporalRecordView<'a> {
    /// Creates a view of `record` as of `date`.
    #[must_use]
    pub const fn new(record: &'a RegistryRecord, date: NaiveDate) -> Self {
        Self { record, date }
    }

    /// Creates a view of `record` as of the local calendar date.
    #[must_use]
    pub fn today(record: &'a RegistryRecord) -> Self {
        Self::new(record, Local::now().date_naive())
    }

    /// The reference date of this view.
    #[must_use]
    pub const fn date(&self) -> NaiveDate {
        self.date
    }

    /// The underlying record.
    #[must_use]
    pub const fn record(&self) -> &'a RegistryRecord {
        self.record
    }

    /// Checks whether an entry is still valid on the reference date.
    #[must_use]
    pub fn is_active(&self, entry: &impl Expiring) -> bool {
        not_expired(entry, self.date)
    }

    /// Returns the primary name of the business.
    ///
    /// When a language code is given, registered names and then auxiliary
    /// names are searched for the first current entry in that language. Any
    /// non-negative order qualifies, including the `0` that hides an auxiliary
    /// name from [`Self::active_auxiliary_names`]. Without a match the
    /// record's primary name is returned.
    #[must_use]
    pub fn primary_name(&self, language: Option<&str>) -> &'a str {
        let Some(language) = language else {
            return &self.record.name;
        };

        self.record
            .names
            .iter()
            .chain(&self.record.auxiliary_names)
            .find(|entry| {
                entry.language.as_deref() == Some(language)
                    && entry.order >= 0
                    && entry.version == CURRENT_VERSION
                    && self.is_active(*entry)
            })
            .map_or(&self.record.name, |entry| &entry.name)
    }

    /// Returns the current registered names, in registry order.
    #[must_use]
    pub fn active_names(&self) -> Vec<&'a NameEntry> {
        self.record
            .names
            .iter()
            .filter(|entry| entry.version == CURRENT_VERSION && self.is_active(*entry))
            .collect()
    }

    /// Returns the auxiliary names that are listed and in force, in registry
    /// order.
    ///
    /// Entries with order `0` are not listed.
    #[must_use]
    pub fn active_auxiliary_names(&self) -> Vec<&'a NameEntry> {
        self.record
            .auxiliary_names
            .iter()
            .filter(|entry| {
                entry.order != 0 && entry.version == CURRENT_VERSION && self.is_active(*entry)
            })
            .collect()
    }

    /// Returns the type of the first liquidation filing still in force, or
    /// `None` if the business is not being liquidated.
    #[must_use]
    pub fn liquidation_status(&self) -> Option<&'a TypeCode> {
        self.record
            .liquidations
            .iter()
            .find(|entry| self.is_active(*entry))
            .map(|entry| &entry.kind)
    }

    /// Checks whether any company form is still in force.
    #[must_use]
    pub fn has_active_company_form(&self) -> bool {
        self.record
            .company_forms
            .iter()
            .any(|entry| self.is_active(entry))
    }

    /// Returns the company forms still in force, in registry order.
    #[must_use]
    pub fn active_company_forms(&self) -> Vec<&'a CompanyFormEntry> {
        self.record
            .company_forms
            .iter()
            .filter(|entry| self.is_active(*entry))
            .collect()
    }

    /// Looks up a field of the underlying JSON object.
    #[must_use]
    pub fn raw_field(&self, key: &str) -> Option<&'a Value> {
        self.record.raw_field(key)
    }

    /// Looks up a field of the underlying JSON object, falling back to
    /// `default` when the field is absent.
    #[must_use]
    pub fn raw_field_or(&self, key: &str, default: &'a Value) -> &'a Value {
        self.record.raw_field_or(key, default)
    }

    /// Returns the underlying JSON object.
    #[must_use]
    pub const fn raw(&self) -> &'a Map<String, Value> {
        self.record.raw()
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;
    use test_case::test_case;

    use super::*;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 6, 15).unwrap()
    }

    fn record(value: Value) -> RegistryRecord {
        RegistryRecord::from_value(value).unwrap()
    }

    fn name(order: i64, version: i64, text: &str, end_date: Option<&str>) -> Value {
        json!({
            "order": order,
            "version": version,
            "name": text,
            "language": "sv",
            "endDate": end_date,
        })
    }

    #[test_case(None, true; "no end date")]
    #[test_case(Some("2024-06-14"), false; "ended yesterday")]
    #[test_case(Some("2024-06-15"), false; "ends today")]
    #[test_case(Some("2024-06-16"), true; "ends tomorrow")]
    #[test_case(Some("2024-06-15T12:00:00"), false; "ends today with time of day")]
    fn expiry_boundary(end_date: Option<&str>, active: bool) {
        let record = record(json!({
            "name": "Primary",
            "names": [name(0, 1, "Name", end_date)]
        }));
        assert_eq!(not_expired(&record.names[0], today()), active);
    }

    #[test]
    fn primary_name_without_language_is_record_name() {
        let record = record(json!({
            "name": "Primary",
            "names": [name(0, 1, "Svenska", None)]
        }));
        let view = TemporalRecordView::new(&record, today());
        assert_eq!(view.primary_name(None), "Primary");
    }

    #[test]
    fn primary_name_accepts_order_zero_auxiliary_name() {
        let record = record(json!({
            "name": "Primary",
            "names": [],
            "auxiliaryNames": [name(0, 1, "Alt", None)]
        }));
        let view = TemporalRecordView::new(&record, today());

        assert_eq!(view.primary_name(Some("sv")), "Alt");
        assert!(view.active_auxiliary_names().is_empty());
    }

    #[test]
    fn primary_name_prefers_registered_names() {
        let record = record(json!({
            "name": "Primary",
            "names": [name(0, 1, "Registered", None)],
            "auxiliaryNames": [name(1, 1, "Auxiliary", None)]
        }));
        let view = TemporalRecordView::new(&record, today());
        assert_eq!(view.primary_name(Some("sv")), "Registered");
    }

    #[test]
    fn primary_name_skips_ineligible_entries() {
        let record = record(json!({
            "name": "Primary",
            "names": [
                name(0, 2, "Old version", None),
                name(-1, 1, "Negative order", None),
                name(0, 1, "Expired", Some("2024-06-15")),
                name(0, 1, "Current", Some("2030-01-01")),
                name(0, 1, "Later match", None)
            ]
        }));
        let view = TemporalRecordView::new(&record, today());
        assert_eq!(view.primary_name(Some("sv")), "Current");
    }

    #[test]
    fn primary_name_falls_back_without_match() {
        let record = record(json!({
            "name": "Primary",
            "names": [name(0, 1, "Svenska", None)]
        }));
        let view = TemporalRecordView::new(&record, today());
        assert_eq!(view.primary_name(Some("en")), "Primary");
        assert_eq!(view.primary_name(Some("SV")), "Primary");
    }

    #[test]
    fn active_auxiliary_names_filters_and_keeps_order() {
        let record = record(json!({
            "name": "Primary",
            "auxiliaryNames": [
                name(2, 1, "Second", None),
                name(0, 1, "Hidden", None),
                name(1, 2, "Superseded", None),
                name(-1, 1, "Negative", None),
                name(3, 1, "Ended", Some("2024-01-01")),
                name(1, 1, "First", Some("2024-06-16"))
            ]
        }));
        let view = TemporalRecordView::new(&record, today());

        let names: Vec<&str> = view
            .active_auxiliary_names()
            .into_iter()
            .map(|entry| entry.name.as_str())
            .collect();
        assert_eq!(names, vec!["Second", "Negative", "First"]);
    }

    #[test]
    fn active_names_ignore_order() {
        let record = record(json!({
            "name": "Primary",
            "names": [
                name(0, 1, "Current", None),
                name(0, 2, "Previous", Some("2010-01-01")),
                name(5, 1, "Ranked", None)
            ]
        }));
        let view = TemporalRecordView::new(&record, today());

        let names: Vec<&str> = view
            .active_names()
            .into_iter()
            .map(|entry| entry.name.as_str())
            .collect();
        assert_eq!(names, vec!["Current", "Ranked"]);
    }

    #[test]
    fn liquidation_status_returns_first_active_entry() {
        let record = record(json!({
            "name": "Primary",
            "liquidations": [
                {"version": 1, "type": "SANE", "endDate": "2020-01-01"},
                {"version": 2, "type": "KONK", "endDate": null},
                {"version": 1, "type": "SELV", "endDate": null}
            ]
        }));
        let view = TemporalRecordView::new(&record, today());
        assert_eq!(
            view.liquidation_status(),
            Some(&TypeCode::Text("KONK".to_string()))
        );
    }

    #[test]
    fn liquidation_without_version_counts() {
        let record = record(json!({
            "name": "Primary",
            "liquidations": [{"type": "SANE"}]
        }));
        let view = TemporalRecordView::new(&record, today());
        assert_eq!(
            view.liquidation_status(),
            Some(&TypeCode::Text("SANE".to_string()))
        );
    }

    #[test]
    fn liquidation_status_absent_when_all_expired() {
        let record = record(json!({
            "name": "Primary",
            "liquidations": [
                {"version": 1, "type": "KONK", "endDate": "2024-06-15"}
            ]
        }));
        let view = TemporalRecordView::new(&record, today());
        assert_eq!(view.liquidation_status(), None);
    }

    #[test]
    fn liquidation_status_absent_when_empty() {
        let record = record(json!({"name": "Primary"}));
        let view = TemporalRecordView::new(&record, today());
        assert_eq!(view.liquidation_status(), None);
    }

    #[test]
    fn company_forms_ignore_version() {
        let record = record(json!({
            "name": "Primary",
            "companyForms": [
                {"version": 1, "type": "OY", "endDate": "2024-06-15"},
                {"version": 2, "type": "OYJ", "endDate": null}
            ]
        }));
        let view = TemporalRecordView::new(&record, today());

        assert!(view.has_active_company_form());
        let forms = view.active_company_forms();
        assert_eq!(forms.len(), 1);
        assert_eq!(forms[0].kind, Some(TypeCode::Text("OYJ".to_string())));
    }

    #[test]
    fn no_active_company_form_when_all_ended() {
        let record = record(json!({
            "name": "Primary",
            "companyForms": [{"version": 1, "type": "OY", "endDate": "2001-01-01"}]
        }));
        let view = TemporalRecordView::new(&record, today());
        assert!(!view.has_active_company_form());
        assert!(view.active_company_forms().is_empty());
    }

    #[test]
    fn reference_date_changes_results() {
        let record = record(json!({
            "name": "Primary",
            "liquidations": [{"version": 1, "type": "KONK", "endDate": "2024-06-16"}]
        }));
        let before = TemporalRecordView::new(&record, today());
        let after = TemporalRecordView::new(&record, today().succ_opt().unwrap());

        assert!(before.liquidation_status().is_some());
        assert!(after.liquidation_status().is_none());
        assert_eq!(after.date(), NaiveDate::from_ymd_opt(2024, 6, 16).unwrap());
    }

    #[test]
    fn raw_field_passthrough() {
        let record = record(json!({
            "name": "Primary",
            "detailsUri": "https://example.fi/0112038-9"
        }));
        let view = TemporalRecordView::new(&record, today());
        let fallback = Value::Null;

        assert_eq!(
            view.raw_field("detailsUri"),
            Some(&json!("https://example.fi/0112038-9"))
        );
        assert_eq!(view.raw_field_or("missing", &fallback), &Value::Null);
        assert_eq!(view.raw(), record.raw());
        assert_eq!(view.record(), &record);
    }
}
