//! Supplier matching: which suppliers get to see (and get notified about)
//! a request.

use uuid::Uuid;

use crate::middleware::error_handling::Result;
use crate::models::preference::SupplierPreference;
use crate::repositories::PreferenceRepository;

/// Request attributes a supplier preference can filter on. All dimensions
/// optional: an empty criteria set matches every supplier.
#[derive(Debug, Clone, Default)]
pub struct MatchCriteria {
    pub manufacturer: Option<String>,
    pub region: Option<String>,
}

impl MatchCriteria {
    pub fn for_manufacturer(manufacturer: &str) -> Self {
        Self {
            manufacturer: Some(manufacturer.to_string()),
            region: None,
        }
    }
}

pub struct MatchingService {
    preference_repo: PreferenceRepository,
}

impl MatchingService {
    pub fn new(preference_repo: PreferenceRepository) -> Self {
        Self { preference_repo }
    }

    /// Scan the full supplier population and keep everyone whose preferences
    /// allow the criteria. No ordering guarantee; callers treat the result
    /// as a membership set.
    pub async fn find_matching_suppliers(&self, criteria: &MatchCriteria) -> Result<Vec<Uuid>> {
        let population = self.preference_repo.load_supplier_population().await?;

        Ok(population
            .into_iter()
            .filter(|(_, preference)| preference_allows(preference.as_ref(), criteria))
            .map(|(supplier_id, _)| supplier_id)
            .collect())
    }
}

/// The matching predicate. A supplier with no preference record matches
/// everything; a configured dimension only excludes when it is non-empty,
/// the criteria names a value, and the value is missing from the set.
/// Unparseable stored sets fail open (see `PreferenceFilter::parse`).
pub fn preference_allows(
    preference: Option<&SupplierPreference>,
    criteria: &MatchCriteria,
) -> bool {
    let Some(preference) = preference else {
        return true;
    };

    if let Some(manufacturer) = &criteria.manufacturer {
        if !preference.manufacturer_filter().allows(manufacturer) {
            return false;
        }
    }

    if let Some(region) = &criteria.region {
        if !preference.region_filter().allows(region) {
            return false;
        }
    }

    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn preference(
        manufacturers: Option<&str>,
        regions: Option<&str>,
    ) -> SupplierPreference {
        SupplierPreference {
            id: Uuid::new_v4(),
            supplier_id: Uuid::new_v4(),
            manufacturers: manufacturers.map(String::from),
            models: None,
            regions: regions.map(String::from),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    fn mazda_criteria() -> MatchCriteria {
        MatchCriteria::for_manufacturer("Mazda")
    }

    #[test]
    fn absent_preference_record_matches_any_criteria() {
        assert!(preference_allows(None, &mazda_criteria()));
        assert!(preference_allows(None, &MatchCriteria::default()));
    }

    #[test]
    fn unconfigured_record_matches_any_criteria() {
        let p = preference(None, None);
        assert!(preference_allows(Some(&p), &mazda_criteria()));
    }

    #[test]
    fn empty_set_matches_any_criteria() {
        let p = preference(Some("[]"), None);
        assert!(preference_allows(Some(&p), &mazda_criteria()));
    }

    #[test]
    fn manufacturer_set_filters_by_membership() {
        let p = preference(Some(r#"["Mazda","Toyota"]"#), None);
        assert!(preference_allows(Some(&p), &mazda_criteria()));
        assert!(!preference_allows(
            Some(&p),
            &MatchCriteria::for_manufacturer("Honda")
        ));
    }

    #[test]
    fn empty_criteria_matches_everyone() {
        let p = preference(Some(r#"["Mazda"]"#), None);
        assert!(preference_allows(Some(&p), &MatchCriteria::default()));
    }

    #[test]
    fn malformed_stored_set_fails_open() {
        let p = preference(Some("{broken"), None);
        assert!(preference_allows(Some(&p), &mazda_criteria()));
    }

    #[test]
    fn region_set_filters_by_membership() {
        let p = preference(None, Some(r#"["north"]"#));
        let mut criteria = MatchCriteria::default();
        criteria.region = Some("south".to_string());
        assert!(!preference_allows(Some(&p), &criteria));

        criteria.region = Some("north".to_string());
        assert!(preference_allows(Some(&p), &criteria));
    }

    #[test]
    fn both_dimensions_must_allow() {
        let p = preference(Some(r#"["Mazda"]"#), Some(r#"["north"]"#));
        let criteria = MatchCriteria {
            manufacturer: Some("Mazda".to_string()),
            region: Some("south".to_string()),
        };
        assert!(!preference_allows(Some(&p), &criteria));
    }
}
