//! Claim field extraction and routing.

mod index;
mod resolver;
pub mod routing;
pub mod rules;
mod validator;

pub use index::LineIndex;
pub use resolver::{FieldResolver, ValueSource, INJURY_CLAIM_TYPE, PROPERTY_CLAIM_TYPE};
pub use routing::{parse_amount, ParsedAmount, RoutingEngine, INVESTIGATION_KEYWORDS};
pub use rules::{FieldRule, FieldRules};
pub use validator::find_missing_fields;

use std::time::Instant;

use tracing::info;

use crate::error::ExtractionError;
use crate::models::claim::{ClaimAnalysis, ClaimField, ExtractedFields, RoutingDecision};
use crate::models::config::FnolConfig;

/// Trait for claim analysis pipelines.
pub trait ClaimProcessor {
    /// Resolve fields, validate, and route a claim from its text.
    fn analyze(&self, text: &str) -> ClaimAnalysis;
}

/// Index -> resolve -> validate -> route, over immutable rule and routing tables.
#[derive(Debug, Clone)]
pub struct ClaimAnalyzer {
    resolver: FieldResolver,
    engine: RoutingEngine,
}

impl ClaimAnalyzer {
    pub fn new(resolver: FieldResolver, engine: RoutingEngine) -> Self {
        Self { resolver, engine }
    }

    /// Analyzer with the built-in rules and the standard threshold.
    pub fn standard() -> Result<Self, ExtractionError> {
        Ok(Self::new(
            FieldResolver::new(FieldRules::standard()?),
            RoutingEngine::new(),
        ))
    }

    /// Analyzer with the built-in rules plus configured aliases and threshold.
    pub fn from_config(config: &FnolConfig) -> Result<Self, ExtractionError> {
        let mut rules = FieldRules::standard()?;
        for (field, aliases) in &config.extraction.extra_aliases {
            for alias in aliases {
                rules = rules.with_alias(*field, alias);
            }
        }

        let engine =
            RoutingEngine::new().with_fast_track_threshold(config.routing.fast_track_threshold);
        Ok(Self::new(FieldResolver::new(rules), engine))
    }

    pub fn resolver(&self) -> &FieldResolver {
        &self.resolver
    }

    pub fn engine(&self) -> &RoutingEngine {
        &self.engine
    }

    /// Resolve fields only.
    pub fn extract_fields(&self, text: &str) -> ExtractedFields {
        self.resolver.resolve_text(text)
    }

    /// Route already-resolved fields.
    pub fn route(
        &self,
        fields: &ExtractedFields,
        missing_fields: &[ClaimField],
        text: &str,
    ) -> RoutingDecision {
        self.engine.route(fields, missing_fields, text)
    }
}

impl ClaimProcessor for ClaimAnalyzer {
    fn analyze(&self, text: &str) -> ClaimAnalysis {
        let start = Instant::now();

        let fields = self.extract_fields(text);
        let missing = find_missing_fields(&fields);
        let decision = self.route(&fields, &missing, text);

        info!(
            route = %decision.route,
            missing = missing.len(),
            elapsed_us = start.elapsed().as_micros() as u64,
            "Analyzed claim from {} characters of text",
            text.len()
        );

        ClaimAnalysis {
            decision,
            raw_text: text.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::claim::ClaimRoute;
    use pretty_assertions::assert_eq;
    use proptest::prelude::*;
    use rust_decimal::Decimal;

    const ACORD_STYLE: &str = "\
AUTOMOBILE LOSS NOTICE
POLICY NUMBER: PA-77812-01
NAME OF INSURED: Jane Doe
DATE OF LOSS: 5/1/2024
Time of Loss: 4:45 PM
Location of Loss: 400 Market St, Springfield
Description of Accident: Backed into a pole in a parking lot.
ESTIMATE AMOUNT: $1,200.00
";

    fn analyzer() -> ClaimAnalyzer {
        ClaimAnalyzer::standard().unwrap()
    }

    #[test]
    fn test_end_to_end_fast_track() {
        let analysis = analyzer().analyze(ACORD_STYLE);
        let decision = &analysis.decision;
        let fields = &decision.extracted_fields;

        assert_eq!(fields.policy_number.as_deref(), Some("PA-77812-01"));
        assert_eq!(fields.policy_holder_name.as_deref(), Some("Jane Doe"));
        assert_eq!(fields.incident_date.as_deref(), Some("5/1/2024"));
        assert_eq!(fields.incident_time.as_deref(), Some("4:45 PM"));
        assert_eq!(fields.location.as_deref(), Some("400 Market St, Springfield"));
        assert_eq!(fields.claim_type.as_deref(), Some("PROPERTY"));
        assert_eq!(fields.estimated_damage.as_deref(), Some("1,200.00"));
        assert_eq!(parse_amount("1,200.00"), Some(Decimal::new(120000, 2)));

        assert!(decision.missing_fields.is_empty());
        assert_eq!(decision.route, ClaimRoute::FastTrack);
        assert_eq!(analysis.raw_text, ACORD_STYLE);
    }

    #[test]
    fn test_injury_narrative_goes_to_specialist() {
        let text = ACORD_STYLE.replace("Backed into a pole", "Driver injured after backing into a pole");
        let analysis = analyzer().analyze(&text);
        assert_eq!(analysis.decision.extracted_fields.claim_type.as_deref(), Some("INJURY"));
        assert_eq!(analysis.decision.route, ClaimRoute::SpecialistQueue);
    }

    #[test]
    fn test_missing_fields_go_to_manual_review() {
        let text = "NAME OF INSURED: Jane Doe\nESTIMATE AMOUNT: 500";
        let analysis = analyzer().analyze(text);
        assert_eq!(analysis.decision.route, ClaimRoute::ManualReview);
        assert_eq!(
            analysis.decision.missing_fields,
            vec![
                ClaimField::PolicyNumber,
                ClaimField::IncidentDate,
                ClaimField::Location,
                ClaimField::Description
            ]
        );
    }

    #[test]
    fn test_config_threshold_and_aliases() {
        let mut config = FnolConfig::default();
        config.routing.fast_track_threshold = Decimal::from(1_000);
        config
            .extraction
            .extra_aliases
            .insert(ClaimField::PolicyNumber, vec!["Contract".to_string()]);

        let analyzer = ClaimAnalyzer::from_config(&config).unwrap();
        let text = ACORD_STYLE.replace("POLICY NUMBER: PA-77812-01", "Contract: C-1");
        let analysis = analyzer.analyze(&text);

        assert_eq!(analysis.decision.extracted_fields.policy_number.as_deref(), Some("C-1"));
        assert_eq!(analysis.decision.route, ClaimRoute::ManualReview);
    }

    proptest! {
        #[test]
        fn prop_analysis_is_idempotent(text in "(?s).{0,400}") {
            let analyzer = analyzer();
            let first = serde_json::to_string(&analyzer.analyze(&text)).unwrap();
            let second = serde_json::to_string(&analyzer.analyze(&text)).unwrap();
            prop_assert_eq!(first, second);
        }

        #[test]
        fn prop_claim_type_never_absent(text in "(?s).{0,200}") {
            let fields = analyzer().extract_fields(&text);
            prop_assert!(fields.claim_type.is_some());
        }
    }
}
