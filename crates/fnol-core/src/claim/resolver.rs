//! Field resolution: rule table lookups with pattern fallbacks.

use tracing::{debug, trace};

use super::index::LineIndex;
use super::rules::{FieldRule, FieldRules};
use crate::models::claim::{ClaimField, ExtractedFields};

const INJURY_KEYWORDS: [&str; 2] = ["injury", "injured"];

/// Claim type assigned when the document mentions an injury.
pub const INJURY_CLAIM_TYPE: &str = "INJURY";
/// Claim type assigned otherwise.
pub const PROPERTY_CLAIM_TYPE: &str = "PROPERTY";

/// Where a resolved value came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueSource {
    /// A `label: value` line, with the alias that matched.
    Label(usize),
    /// A fallback pattern over the raw text.
    Pattern(usize),
}

/// Resolves claim fields from raw text using an immutable rule table.
#[derive(Debug, Clone)]
pub struct FieldResolver {
    rules: FieldRules,
}

impl FieldResolver {
    pub fn new(rules: FieldRules) -> Self {
        Self { rules }
    }

    pub fn rules(&self) -> &FieldRules {
        &self.rules
    }

    /// Resolve every field. Never fails; unmatched fields stay `None`.
    pub fn resolve(&self, text: &str, index: &LineIndex) -> ExtractedFields {
        let mut fields = ExtractedFields::default();

        for rule in self.rules.iter() {
            let value = resolve_rule(rule, text, index);
            fields.set(rule.field, value);
        }

        if fields.is_blank(ClaimField::ClaimType) {
            let detected = detect_claim_type(text);
            debug!("No explicit claim type, detected {}", detected);
            fields.claim_type = Some(detected.to_string());
        }

        normalize(&mut fields);
        fields
    }

    /// Build the line index and resolve in one step.
    pub fn resolve_text(&self, text: &str) -> ExtractedFields {
        self.resolve(text, &LineIndex::build(text))
    }
}

/// First non-blank candidate: aliases in order, then patterns in order.
fn resolve_rule(rule: &FieldRule, text: &str, index: &LineIndex) -> Option<String> {
    let labelled = rule
        .aliases
        .iter()
        .enumerate()
        .find_map(|(i, alias)| non_blank(index.get(alias)).map(|v| (ValueSource::Label(i), v)));

    let found = labelled.or_else(|| {
        rule.patterns.iter().enumerate().find_map(|(i, pattern)| {
            let captured = pattern
                .captures(text)
                .and_then(|caps| caps.get(1))
                .map(|m| m.as_str());
            non_blank(captured).map(|v| (ValueSource::Pattern(i), v))
        })
    });

    match found {
        Some((source, value)) => {
            trace!("{} resolved from {:?}", rule.field, source);
            Some(value.to_string())
        }
        None => {
            trace!("{} unresolved", rule.field);
            None
        }
    }
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

fn detect_claim_type(text: &str) -> &'static str {
    let lower = text.to_lowercase();
    if INJURY_KEYWORDS.iter().any(|k| lower.contains(k)) {
        INJURY_CLAIM_TYPE
    } else {
        PROPERTY_CLAIM_TYPE
    }
}

fn normalize(fields: &mut ExtractedFields) {
    fields.policy_number = fields
        .policy_number
        .take()
        .map(|v| keep_chars(&v, |c| c.is_ascii_alphanumeric() || c == '-'));

    fields.estimated_damage = fields
        .estimated_damage
        .take()
        .map(|v| keep_chars(&v, |c| c.is_ascii_digit() || c == ',' || c == '.'));

    fields.location = fields.location.take().map(|v| collapse_newlines(&v));
    fields.description = fields.description.take().map(|v| collapse_newlines(&v));

    for field in [
        ClaimField::PolicyNumber,
        ClaimField::PolicyHolderName,
        ClaimField::IncidentDate,
        ClaimField::IncidentTime,
        ClaimField::Location,
        ClaimField::Description,
        ClaimField::ClaimType,
        ClaimField::EstimatedDamage,
    ] {
        if fields.is_blank(field) {
            fields.set(field, None);
        }
    }
}

fn keep_chars(value: &str, keep: impl Fn(char) -> bool) -> String {
    value.chars().filter(|c| keep(*c)).collect::<String>().trim().to_string()
}

/// Replace every run of CR/LF characters with a single space.
fn collapse_newlines(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    let mut in_break = false;
    for c in value.chars() {
        if c == '\r' || c == '\n' {
            if !in_break {
                out.push(' ');
                in_break = true;
            }
        } else {
            out.push(c);
            in_break = false;
        }
    }
    out.trim().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn resolver() -> FieldResolver {
        FieldResolver::new(FieldRules::standard().unwrap())
    }

    #[test]
    fn test_labels_take_priority_over_patterns() {
        let text = "Policy: LBL-1\nPOLICY NUMBER PAT-2 appears in the header";
        let fields = resolver().resolve_text(text);
        assert_eq!(fields.policy_number.as_deref(), Some("LBL-1"));
    }

    #[test]
    fn test_alias_order() {
        let text = "Insured: Second Choice\nName of Insured: First Choice";
        let fields = resolver().resolve_text(text);
        assert_eq!(fields.policy_holder_name.as_deref(), Some("First Choice"));
    }

    #[test]
    fn test_pattern_fallback() {
        let text = "POLICY NUMBER\nAB-99\nNAME OF INSURED Jane Q Public\nLOCATION OF LOSS 12 Elm St, Springfield";
        let fields = resolver().resolve_text(text);
        assert_eq!(fields.policy_number.as_deref(), Some("AB-99"));
        assert_eq!(fields.policy_holder_name.as_deref(), Some("Jane Q Public"));
        assert_eq!(fields.location.as_deref(), Some("12 Elm St, Springfield"));
    }

    #[test]
    fn test_policy_number_normalized() {
        let fields = resolver().resolve_text("Policy Number: #AB 12/34-X");
        assert_eq!(fields.policy_number.as_deref(), Some("AB1234-X"));
    }

    #[test]
    fn test_policy_number_normalized_to_nothing_is_absent() {
        let fields = resolver().resolve_text("Policy Number: ###");
        assert_eq!(fields.policy_number, None);
    }

    #[test]
    fn test_estimated_damage_keeps_digits_commas_periods() {
        let fields = resolver().resolve_text("Estimate Amount: USD $12,500.75");
        assert_eq!(fields.estimated_damage.as_deref(), Some("12,500.75"));
    }

    #[test]
    fn test_estimated_damage_from_any_alias() {
        let fields = resolver().resolve_text("Estimated Damage Amount: 800");
        assert_eq!(fields.estimated_damage.as_deref(), Some("800"));

        let fields = resolver().resolve_text("Estimated Damage: 1,000");
        assert_eq!(fields.estimated_damage.as_deref(), Some("1,000"));
    }

    #[test]
    fn test_estimated_damage_second_pattern() {
        let fields = resolver().resolve_text("the Estimated Damage Amount $4,100 in total");
        assert_eq!(fields.estimated_damage.as_deref(), Some("4,100"));
    }

    #[test]
    fn test_description_collapses_newlines() {
        let text = "DESCRIPTION OF ACCIDENT\nTree fell\r\n\r\non the garage.\nINSURED VEHICLE\n";
        let fields = resolver().resolve_text(text);
        assert_eq!(fields.description.as_deref(), Some("Tree fell on the garage."));
    }

    #[test]
    fn test_incident_date_and_time() {
        let text = "DATE OF LOSS 7/4/2024\nTime of Loss: 9:15 PM";
        let fields = resolver().resolve_text(text);
        assert_eq!(fields.incident_date.as_deref(), Some("7/4/2024"));
        assert_eq!(fields.incident_time.as_deref(), Some("9:15 PM"));
    }

    #[test]
    fn test_explicit_claim_type_wins() {
        let fields = resolver().resolve_text("Claim Type: Auto\nDriver was injured");
        assert_eq!(fields.claim_type.as_deref(), Some("Auto"));
    }

    #[test]
    fn test_claim_type_detection() {
        let fields = resolver().resolve_text("Passenger INJURED in collision");
        assert_eq!(fields.claim_type.as_deref(), Some(INJURY_CLAIM_TYPE));

        let fields = resolver().resolve_text("Water leak in kitchen");
        assert_eq!(fields.claim_type.as_deref(), Some(PROPERTY_CLAIM_TYPE));

        let fields = resolver().resolve_text("");
        assert_eq!(fields.claim_type.as_deref(), Some(PROPERTY_CLAIM_TYPE));
    }

    #[test]
    fn test_blank_holder_name_is_absent() {
        let fields = resolver().resolve_text("NAME OF INSURED   \n");
        assert_eq!(fields.policy_holder_name, None);
    }

    #[test]
    fn test_extra_alias() {
        let rules = FieldRules::standard()
            .unwrap()
            .with_alias(ClaimField::Location, "site");
        let fields = FieldResolver::new(rules).resolve_text("Site: Pier 39");
        assert_eq!(fields.location.as_deref(), Some("Pier 39"));
    }

    #[test]
    fn test_collapse_newlines() {
        assert_eq!(collapse_newlines("a\n\n\r\nb\nc "), "a b c");
        assert_eq!(collapse_newlines("\nabc\n"), "abc");
    }
}
