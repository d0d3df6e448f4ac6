use std::collections::HashSet;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A supplier's matching preferences. Each dimension is a JSON-encoded
/// string array in a TEXT column; NULL means "never configured".
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SupplierPreference {
    pub id: Uuid,
    pub supplier_id: Uuid,
    pub manufacturers: Option<String>,
    pub models: Option<String>,
    pub regions: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl SupplierPreference {
    pub fn manufacturer_filter(&self) -> PreferenceFilter {
        PreferenceFilter::parse(self.manufacturers.as_deref())
    }

    pub fn region_filter(&self) -> PreferenceFilter {
        PreferenceFilter::parse(self.regions.as_deref())
    }
}

/// One dimension of a preference record. Absent, empty, or unparseable
/// stored values all degrade to `Any` (fail-open): a broken preference must
/// widen a supplier's feed, never silence it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PreferenceFilter {
    Any,
    OneOf(HashSet<String>),
}

impl PreferenceFilter {
    pub fn parse(raw: Option<&str>) -> Self {
        match raw {
            None => PreferenceFilter::Any,
            Some(s) => match serde_json::from_str::<Vec<String>>(s) {
                Ok(values) if !values.is_empty() => {
                    PreferenceFilter::OneOf(values.into_iter().collect())
                }
                _ => PreferenceFilter::Any,
            },
        }
    }

    pub fn allows(&self, value: &str) -> bool {
        match self {
            PreferenceFilter::Any => true,
            PreferenceFilter::OneOf(values) => values.contains(value),
        }
    }
}

/// Decode a stored dimension back into the list shape the settings page
/// works with. Same fail-open rule as matching: unparseable reads as empty.
pub fn decode_preference_list(raw: Option<&str>) -> Vec<String> {
    raw.and_then(|s| serde_json::from_str::<Vec<String>>(s).ok())
        .unwrap_or_default()
}

#[derive(Debug, Deserialize)]
pub struct UpdatePreferencesRequest {
    pub manufacturers: Option<Vec<String>>,
    pub models: Option<Vec<String>>,
    pub regions: Option<Vec<String>>,
}

#[derive(Debug, Serialize)]
pub struct PreferencesResponse {
    pub manufacturers: Vec<String>,
    pub models: Vec<String>,
    pub regions: Vec<String>,
}

impl From<Option<SupplierPreference>> for PreferencesResponse {
    fn from(preference: Option<SupplierPreference>) -> Self {
        match preference {
            Some(p) => Self {
                manufacturers: decode_preference_list(p.manufacturers.as_deref()),
                models: decode_preference_list(p.models.as_deref()),
                regions: decode_preference_list(p.regions.as_deref()),
            },
            None => Self {
                manufacturers: Vec::new(),
                models: Vec::new(),
                regions: Vec::new(),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn absent_and_empty_parse_to_any() {
        assert_eq!(PreferenceFilter::parse(None), PreferenceFilter::Any);
        assert_eq!(PreferenceFilter::parse(Some("[]")), PreferenceFilter::Any);
    }

    #[test]
    fn malformed_json_fails_open() {
        assert_eq!(PreferenceFilter::parse(Some("not json")), PreferenceFilter::Any);
        assert_eq!(PreferenceFilter::parse(Some("{\"a\":1}")), PreferenceFilter::Any);
    }

    #[test]
    fn populated_set_filters_by_membership() {
        let filter = PreferenceFilter::parse(Some(r#"["Mazda","Toyota"]"#));
        assert!(filter.allows("Mazda"));
        assert!(!filter.allows("Honda"));
    }

    #[test]
    fn decode_list_round_trips_and_fails_open() {
        assert_eq!(
            decode_preference_list(Some(r#"["Mazda","Toyota"]"#)),
            vec!["Mazda".to_string(), "Toyota".to_string()]
        );
        assert!(decode_preference_list(Some("oops")).is_empty());
        assert!(decode_preference_list(None).is_empty());
    }
}
