//! Claim persistence.

mod json;
mod memory;

pub use json::JsonFileStore;
pub use memory::MemoryStore;

use chrono::{Datelike, NaiveDate};
use rust_decimal::Decimal;
use tracing::warn;

use crate::claim::parse_amount;
use crate::error::StorageError;
use crate::models::claim::{ClaimAnalysis, ClaimRoute, StoredClaim};
use crate::models::config::{StorageBackend, StorageConfig};

/// Result type for storage operations.
pub type Result<T> = std::result::Result<T, StorageError>;

/// Incident date formats, tried in order. chrono accepts unpadded month and
/// day numbers, so `%m/%d/%Y` covers both `M/d/yyyy` and `MM/dd/yyyy`.
const INCIDENT_DATE_FORMATS: [&str; 3] = ["%m/%d/%Y", "%d/%m/%Y", "%Y-%m-%d"];

/// Durable storage for analyzed claims.
pub trait ClaimStore: Send + Sync {
    /// Persist an analysis and return the stored record.
    fn save(&self, analysis: &ClaimAnalysis) -> Result<StoredClaim>;

    /// All stored claims, ordered by id.
    fn list(&self) -> Result<Vec<StoredClaim>>;

    /// A single claim by id.
    fn get(&self, id: u64) -> Result<Option<StoredClaim>>;
}

/// Open the store selected by configuration.
pub fn open_store(config: &StorageConfig) -> Result<Box<dyn ClaimStore>> {
    Ok(match config.backend {
        StorageBackend::Memory => Box::new(MemoryStore::new()),
        StorageBackend::Json => Box::new(JsonFileStore::open(&config.path)?),
    })
}

/// A claim ready to be stored, before an id is assigned.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewClaim {
    pub policy_number: Option<String>,
    pub policy_holder_name: Option<String>,
    pub incident_date: Option<NaiveDate>,
    pub incident_time: Option<String>,
    pub location: Option<String>,
    pub description: Option<String>,
    pub claim_type: Option<String>,
    pub estimated_damage: Option<Decimal>,
    pub recommended_route: ClaimRoute,
    pub reasoning: String,
    pub raw_text: Option<String>,
}

impl NewClaim {
    /// Convert an analysis, parsing the date and amount on a best-effort basis.
    ///
    /// Unparseable dates and amounts are stored as absent; they never fail the save.
    pub fn from_analysis(analysis: &ClaimAnalysis) -> Self {
        let decision = &analysis.decision;
        let fields = &decision.extracted_fields;

        let incident_date = fields
            .incident_date
            .as_deref()
            .filter(|d| !d.trim().is_empty())
            .and_then(|d| {
                let parsed = parse_incident_date(d);
                if parsed.is_none() {
                    warn!("Could not parse incident date '{}'", d);
                }
                parsed
            });

        let estimated_damage = fields
            .estimated_damage
            .as_deref()
            .filter(|d| !d.trim().is_empty())
            .and_then(|d| {
                let parsed = parse_amount(d);
                if parsed.is_none() {
                    warn!("Could not parse estimated damage '{}'", d);
                }
                parsed
            });

        Self {
            policy_number: fields.policy_number.clone(),
            policy_holder_name: fields.policy_holder_name.clone(),
            incident_date,
            incident_time: fields.incident_time.clone(),
            location: fields.location.clone(),
            description: fields.description.clone(),
            claim_type: fields.claim_type.clone(),
            estimated_damage,
            recommended_route: decision.route,
            reasoning: decision.reasoning.clone(),
            raw_text: Some(analysis.raw_text.clone()).filter(|t| !t.is_empty()),
        }
    }

    /// Attach an id and creation timestamp.
    pub fn into_stored(self, id: u64) -> StoredClaim {
        StoredClaim {
            id,
            policy_number: self.policy_number,
            policy_holder_name: self.policy_holder_name,
            incident_date: self.incident_date,
            incident_time: self.incident_time,
            location: self.location,
            description: self.description,
            claim_type: self.claim_type,
            estimated_damage: self.estimated_damage,
            recommended_route: self.recommended_route,
            reasoning: self.reasoning,
            raw_text: self.raw_text,
            created_at: chrono::Utc::now(),
        }
    }
}

/// Parse a raw incident date with the first matching format.
///
/// Slash formats require a four-digit year.
pub fn parse_incident_date(value: &str) -> Option<NaiveDate> {
    let value = value.trim();
    INCIDENT_DATE_FORMATS
        .iter()
        .filter_map(|fmt| NaiveDate::parse_from_str(value, fmt).ok())
        .find(|date| date.year() >= 1000)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::claim::{ExtractedFields, RoutingDecision};
    use pretty_assertions::assert_eq;

    fn analysis(date: Option<&str>, amount: Option<&str>) -> ClaimAnalysis {
        ClaimAnalysis {
            decision: RoutingDecision {
                route: ClaimRoute::FastTrack,
                reasoning: "Estimated damage < 25,000 -> Fast-track.".to_string(),
                missing_fields: Vec::new(),
                extracted_fields: ExtractedFields {
                    policy_number: Some("PN-1".to_string()),
                    incident_date: date.map(str::to_string),
                    estimated_damage: amount.map(str::to_string),
                    ..ExtractedFields::default()
                },
            },
            raw_text: "POLICY NUMBER: PN-1".to_string(),
        }
    }

    #[test]
    fn test_parse_month_first() {
        assert_eq!(parse_incident_date("5/1/2024"), NaiveDate::from_ymd_opt(2024, 5, 1));
        assert_eq!(parse_incident_date("05/01/2024"), NaiveDate::from_ymd_opt(2024, 5, 1));
    }

    #[test]
    fn test_parse_day_first_when_month_first_fails() {
        assert_eq!(parse_incident_date("25/12/2023"), NaiveDate::from_ymd_opt(2023, 12, 25));
    }

    #[test]
    fn test_parse_iso() {
        assert_eq!(parse_incident_date(" 2024-02-29 "), NaiveDate::from_ymd_opt(2024, 2, 29));
    }

    #[test]
    fn test_unparseable_dates() {
        assert_eq!(parse_incident_date("5/1/24"), None);
        assert_eq!(parse_incident_date("yesterday"), None);
        assert_eq!(parse_incident_date("31/31/2024"), None);
    }

    #[test]
    fn test_new_claim_parses_date_and_amount() {
        let claim = NewClaim::from_analysis(&analysis(Some("5/1/2024"), Some("1,200.00")));
        assert_eq!(claim.incident_date, NaiveDate::from_ymd_opt(2024, 5, 1));
        assert_eq!(claim.estimated_damage, Some(Decimal::new(120000, 2)));
        assert_eq!(claim.policy_number.as_deref(), Some("PN-1"));
        assert_eq!(claim.recommended_route, ClaimRoute::FastTrack);
        assert_eq!(claim.raw_text.as_deref(), Some("POLICY NUMBER: PN-1"));
    }

    #[test]
    fn test_open_store_by_backend() {
        let config = StorageConfig {
            backend: StorageBackend::Memory,
            path: "unused.json".into(),
        };
        let store = open_store(&config).unwrap();
        assert_eq!(store.save(&analysis(None, None)).unwrap().id, 1);
    }

    #[test]
    fn test_bad_values_degrade_to_absent() {
        let claim = NewClaim::from_analysis(&analysis(Some("sometime"), Some("1.2.3")));
        assert_eq!(claim.incident_date, None);
        assert_eq!(claim.estimated_damage, None);
        assert_eq!(claim.reasoning, "Estimated damage < 25,000 -> Fast-track.");
    }

    #[test]
    fn test_estimate_without_digits_is_absent() {
        let claim = NewClaim::from_analysis(&analysis(None, Some("n/a")));
        assert_eq!(claim.estimated_damage, None);

        let huge = "9".repeat(40);
        let claim = NewClaim::from_analysis(&analysis(None, Some(huge.as_str())));
        assert_eq!(claim.estimated_damage, None);
    }
}
