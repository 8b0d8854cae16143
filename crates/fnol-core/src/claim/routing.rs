//! Claim routing: a strict priority cascade over resolved fields.

use std::str::FromStr;

use rust_decimal::Decimal;
use tracing::{debug, warn};

use crate::models::claim::{ClaimField, ClaimRoute, ExtractedFields, RoutingDecision};

/// Substrings in the raw text that send a claim to investigation.
pub const INVESTIGATION_KEYWORDS: [&str; 5] =
    ["fraud", "inconsistent", "staged", "suspicious", "fabricat"];

const INJURY_KEYWORDS: [&str; 2] = ["injury", "injured"];

const INVESTIGATION_REASON: &str =
    "Document contains potential fraud keywords -> Investigation flagged.";
const SPECIALIST_REASON: &str = "Claim type indicates INJURY -> route to Specialist Queue.";
const NO_ESTIMATE_REASON: &str =
    "Unable to determine fast-track (no valid estimate). Defaulting to Manual Review.";

/// Routes a claim to exactly one queue.
#[derive(Debug, Clone)]
pub struct RoutingEngine {
    fast_track_threshold: Decimal,
}

impl RoutingEngine {
    /// Create an engine with the standard 25,000 fast-track threshold.
    pub fn new() -> Self {
        Self {
            fast_track_threshold: Decimal::from(25_000),
        }
    }

    /// Set the fast-track threshold (exclusive upper bound).
    pub fn with_fast_track_threshold(mut self, threshold: Decimal) -> Self {
        self.fast_track_threshold = threshold;
        self
    }

    pub fn fast_track_threshold(&self) -> Decimal {
        self.fast_track_threshold
    }

    /// Apply the cascade; the first matching rule wins.
    ///
    /// 1. fraud keywords anywhere in the raw text -> investigation
    /// 2. injury claim type -> specialist queue
    /// 3. missing mandatory fields -> manual review
    /// 4. estimate below threshold -> fast track, otherwise manual review
    /// 5. no parseable estimate -> manual review
    pub fn route(
        &self,
        fields: &ExtractedFields,
        missing_fields: &[ClaimField],
        raw_text: &str,
    ) -> RoutingDecision {
        let (route, reasoning) = self.decide(fields, missing_fields, raw_text);
        debug!("Routed claim to {}: {}", route, reasoning);

        RoutingDecision {
            route,
            reasoning,
            missing_fields: missing_fields.to_vec(),
            extracted_fields: fields.clone(),
        }
    }

    fn decide(
        &self,
        fields: &ExtractedFields,
        missing_fields: &[ClaimField],
        raw_text: &str,
    ) -> (ClaimRoute, String) {
        let lower = raw_text.to_lowercase();
        if INVESTIGATION_KEYWORDS.iter().any(|k| lower.contains(k)) {
            return (ClaimRoute::Investigation, INVESTIGATION_REASON.to_string());
        }

        if let Some(claim_type) = &fields.claim_type {
            let claim_type = claim_type.trim().to_lowercase();
            if INJURY_KEYWORDS.iter().any(|k| claim_type.contains(k)) {
                return (ClaimRoute::SpecialistQueue, SPECIALIST_REASON.to_string());
            }
        }

        if !missing_fields.is_empty() {
            let names: Vec<&str> = missing_fields.iter().map(|f| f.name()).collect();
            return (
                ClaimRoute::ManualReview,
                format!("One or more mandatory fields missing: {}", names.join(", ")),
            );
        }

        let threshold = format_amount(self.fast_track_threshold);
        let estimate = fields
            .estimated_damage
            .as_deref()
            .map_or(ParsedAmount::Invalid, ParsedAmount::parse);
        match estimate {
            ParsedAmount::Value(amount) if amount < self.fast_track_threshold => (
                ClaimRoute::FastTrack,
                format!("Estimated damage < {threshold} -> Fast-track."),
            ),
            ParsedAmount::Value(_) | ParsedAmount::TooLarge => (
                ClaimRoute::ManualReview,
                format!("Estimated damage >= {threshold} -> Manual review required."),
            ),
            ParsedAmount::Invalid => {
                warn!("No valid estimate in {:?}", fields.estimated_damage);
                (ClaimRoute::ManualReview, NO_ESTIMATE_REASON.to_string())
            }
        }
    }
}

impl Default for RoutingEngine {
    fn default() -> Self {
        Self::new()
    }
}

/// Outcome of reading a scraped amount.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParsedAmount {
    Value(Decimal),
    /// A well-formed number beyond `Decimal::MAX`.
    TooLarge,
    /// No digits, or not a number at all.
    Invalid,
}

impl ParsedAmount {
    /// Read an amount after dropping everything but digits and periods.
    pub fn parse(value: &str) -> Self {
        let cleaned: String = value
            .chars()
            .filter(|c| c.is_ascii_digit() || *c == '.')
            .collect();

        let well_formed =
            cleaned.chars().any(|c| c.is_ascii_digit()) && cleaned.matches('.').count() <= 1;
        if !well_formed {
            return ParsedAmount::Invalid;
        }

        match Decimal::from_str(&cleaned) {
            Ok(amount) => ParsedAmount::Value(amount),
            Err(e) => {
                debug!("Amount '{}' exceeds decimal range: {}", value, e);
                ParsedAmount::TooLarge
            }
        }
    }
}

/// Parse an amount after dropping everything but digits and periods.
///
/// Currency symbols and thousands separators are discarded, so `$1,200.50`
/// parses as `1200.50`. Returns `None` for blank, malformed or out-of-range input.
pub fn parse_amount(value: &str) -> Option<Decimal> {
    match ParsedAmount::parse(value) {
        ParsedAmount::Value(amount) => Some(amount),
        ParsedAmount::TooLarge | ParsedAmount::Invalid => None,
    }
}

/// Format an amount with comma thousands separators (25000 -> 25,000).
fn format_amount(amount: Decimal) -> String {
    let text = amount.normalize().to_string();
    let (sign, digits) = match text.strip_prefix('-') {
        Some(rest) => ("-", rest),
        None => ("", text.as_str()),
    };
    let (int_part, frac_part) = match digits.split_once('.') {
        Some((i, f)) => (i, Some(f)),
        None => (digits, None),
    };

    let mut grouped = String::with_capacity(int_part.len() + int_part.len() / 3);
    for (i, c) in int_part.chars().enumerate() {
        if i > 0 && (int_part.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(c);
    }

    match frac_part {
        Some(frac) => format!("{sign}{grouped}.{frac}"),
        None => format!("{sign}{grouped}"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use proptest::prelude::*;

    fn complete(estimate: &str) -> ExtractedFields {
        ExtractedFields {
            policy_number: Some("PN-1".to_string()),
            policy_holder_name: Some("Jane Doe".to_string()),
            incident_date: Some("5/1/2024".to_string()),
            incident_time: None,
            location: Some("Main St".to_string()),
            description: Some("Hail damage".to_string()),
            claim_type: Some("PROPERTY".to_string()),
            estimated_damage: Some(estimate.to_string()),
        }
    }

    fn route(fields: &ExtractedFields, missing: &[ClaimField], text: &str) -> RoutingDecision {
        RoutingEngine::new().route(fields, missing, text)
    }

    #[test]
    fn test_fast_track_below_threshold() {
        let decision = route(&complete("24999.99"), &[], "");
        assert_eq!(decision.route, ClaimRoute::FastTrack);
        assert_eq!(decision.reasoning, "Estimated damage < 25,000 -> Fast-track.");
    }

    #[test]
    fn test_threshold_is_exclusive() {
        let decision = route(&complete("25000"), &[], "");
        assert_eq!(decision.route, ClaimRoute::ManualReview);
        assert_eq!(decision.reasoning, "Estimated damage >= 25,000 -> Manual review required.");
    }

    #[test]
    fn test_unparseable_estimate() {
        let decision = route(&complete("1.2.3"), &[], "");
        assert_eq!(decision.route, ClaimRoute::ManualReview);
        assert_eq!(decision.reasoning, NO_ESTIMATE_REASON);

        let mut fields = complete("");
        fields.estimated_damage = None;
        let decision = route(&fields, &[], "");
        assert_eq!(decision.reasoning, NO_ESTIMATE_REASON);
    }

    #[test]
    fn test_missing_fields_listed() {
        let missing = [ClaimField::PolicyNumber, ClaimField::Description];
        let decision = route(&complete("100"), &missing, "");
        assert_eq!(decision.route, ClaimRoute::ManualReview);
        assert_eq!(
            decision.reasoning,
            "One or more mandatory fields missing: policyNumber, description"
        );
        assert_eq!(decision.missing_fields, missing.to_vec());
    }

    #[test]
    fn test_injury_beats_missing_fields() {
        let mut fields = complete("100");
        fields.claim_type = Some("  Bodily Injury ".to_string());
        let decision = route(&fields, &[ClaimField::Location], "");
        assert_eq!(decision.route, ClaimRoute::SpecialistQueue);
        assert_eq!(decision.missing_fields, vec![ClaimField::Location]);
    }

    #[test]
    fn test_investigation_beats_everything() {
        let mut fields = complete("100");
        fields.claim_type = Some("INJURY".to_string());
        let decision = route(&fields, &[ClaimField::Location], "Looks STAGED to me");
        assert_eq!(decision.route, ClaimRoute::Investigation);
        assert_eq!(decision.reasoning, INVESTIGATION_REASON);
        assert_eq!(decision.missing_fields, vec![ClaimField::Location]);
    }

    #[test]
    fn test_fabrication_prefix_matches() {
        let decision = route(&complete("100"), &[], "statement was fabricated");
        assert_eq!(decision.route, ClaimRoute::Investigation);
    }

    #[test]
    fn test_custom_threshold() {
        let engine = RoutingEngine::new().with_fast_track_threshold(Decimal::from(1_000));
        let decision = engine.route(&complete("1,500"), &[], "");
        assert_eq!(decision.route, ClaimRoute::ManualReview);
        assert_eq!(decision.reasoning, "Estimated damage >= 1,000 -> Manual review required.");
    }

    #[test]
    fn test_estimate_beyond_decimal_range_needs_review() {
        let decision = route(&complete("100,000,000,000,000,000,000,000,000,000"), &[], "");
        assert_eq!(decision.route, ClaimRoute::ManualReview);
        assert_eq!(decision.reasoning, "Estimated damage >= 25,000 -> Manual review required.");
    }

    #[test]
    fn test_parsed_amount_cases() {
        assert_eq!(ParsedAmount::parse("$24,999.99"), ParsedAmount::Value(Decimal::new(2499999, 2)));
        assert_eq!(ParsedAmount::parse("9".repeat(40).as_str()), ParsedAmount::TooLarge);
        assert_eq!(ParsedAmount::parse("1.2.3"), ParsedAmount::Invalid);
        assert_eq!(ParsedAmount::parse("n/a"), ParsedAmount::Invalid);
        assert_eq!(ParsedAmount::parse("."), ParsedAmount::Invalid);
    }

    #[test]
    fn test_parse_amount() {
        assert_eq!(parse_amount("$1,200.50"), Some(Decimal::new(120050, 2)));
        assert_eq!(parse_amount("USD 800"), Some(Decimal::from(800)));
        assert_eq!(parse_amount("n/a"), None);
        assert_eq!(parse_amount("1.2.3"), None);
    }

    #[test]
    fn test_format_amount() {
        assert_eq!(format_amount(Decimal::from(25_000)), "25,000");
        assert_eq!(format_amount(Decimal::from(999)), "999");
        assert_eq!(format_amount(Decimal::from(1_234_567)), "1,234,567");
        assert_eq!(format_amount(Decimal::new(1_000_050, 2)), "10,000.5");
    }

    proptest! {
        #[test]
        fn prop_fraud_keyword_always_investigates(
            prefix in "[a-z ]{0,20}",
            suffix in "[a-z ]{0,20}",
            keyword in prop::sample::select(vec!["FRAUD", "Inconsistent", "staged", "SusPicious", "fabricat"]),
            estimate in "[0-9]{1,6}",
        ) {
            let text = format!("{prefix}{keyword}{suffix}");
            let decision = route(&complete(&estimate), &[], &text);
            prop_assert_eq!(decision.route, ClaimRoute::Investigation);
        }

        #[test]
        fn prop_missing_fields_force_manual_review(
            mask in 1u8..128,
            estimate in "[0-9]{1,6}",
        ) {
            let missing: Vec<ClaimField> = ClaimField::MANDATORY
                .into_iter()
                .enumerate()
                .filter(|(i, _)| mask & (1 << i) != 0)
                .map(|(_, f)| f)
                .collect();

            let decision = route(&complete(&estimate), &missing, "plain text");
            prop_assert_eq!(decision.route, ClaimRoute::ManualReview);
            for field in &missing {
                prop_assert!(decision.reasoning.contains(field.name()));
            }
            prop_assert_eq!(decision.missing_fields, missing);
        }
    }
}
