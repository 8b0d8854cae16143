//! Declarative field rule table.
//!
//! Each field has an ordered list of label aliases (looked up in the
//! [`LineIndex`](crate::claim::LineIndex)) followed by an ordered list of
//! fallback patterns searched over the raw text. The first non-blank
//! candidate wins.

pub mod patterns;

use regex::{Regex, RegexBuilder};

use crate::error::ExtractionError;
use crate::models::claim::ClaimField;

/// Result type for rule construction.
pub type Result<T> = std::result::Result<T, ExtractionError>;

/// Ordered candidates for a single field.
#[derive(Debug, Clone)]
pub struct FieldRule {
    pub field: ClaimField,
    /// Lowercase labels, highest priority first.
    pub aliases: Vec<String>,
    /// Fallback patterns, tried after every alias.
    pub patterns: Vec<Regex>,
}

impl FieldRule {
    pub fn new(field: ClaimField) -> Self {
        Self {
            field,
            aliases: Vec::new(),
            patterns: Vec::new(),
        }
    }

    /// Append label aliases.
    pub fn aliases<I, S>(mut self, aliases: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.aliases
            .extend(aliases.into_iter().map(|a| a.as_ref().trim().to_lowercase()));
        self
    }

    /// Append a fallback pattern, compiled case-insensitively.
    pub fn pattern(mut self, source: &str) -> Result<Self> {
        self.patterns.push(compile(self.field, source)?);
        Ok(self)
    }
}

/// Immutable rule table, one rule per field.
#[derive(Debug, Clone)]
pub struct FieldRules {
    rules: Vec<FieldRule>,
}

impl FieldRules {
    /// Built-in rules for FNOL documents.
    pub fn standard() -> Result<Self> {
        use patterns::*;

        let rules = vec![
            FieldRule::new(ClaimField::PolicyNumber)
                .aliases([
                    "policy number",
                    "policy_number",
                    "policynumber",
                    "policy",
                    "policy no",
                    "policy#",
                    "policynum",
                ])
                .pattern(POLICY_NUMBER)?,
            FieldRule::new(ClaimField::PolicyHolderName)
                .aliases([
                    "name of insured",
                    "insured",
                    "insured name",
                    "policyholder",
                    "policy holder",
                    "insured name (first, middle, last)",
                ])
                .pattern(NAME_OF_INSURED)?,
            FieldRule::new(ClaimField::Location)
                .aliases(["location of loss", "location", "address"])
                .pattern(LOCATION_OF_LOSS)?,
            FieldRule::new(ClaimField::Description)
                .aliases(["description of accident", "description", "remarks"])
                .pattern(DESCRIPTION_OF_ACCIDENT)?,
            FieldRule::new(ClaimField::IncidentDate)
                .aliases(["date of loss", "loss date"])
                .pattern(DATE_OF_LOSS)?,
            FieldRule::new(ClaimField::IncidentTime).aliases(["time of loss", "time"]),
            FieldRule::new(ClaimField::EstimatedDamage)
                .aliases([
                    "estimated damage amount",
                    "estimate amount",
                    "estimated amount",
                    "estimated damage",
                    "estimateddamage",
                    "estimate",
                ])
                .pattern(ESTIMATE_AMOUNT)?
                .pattern(ESTIMATED_DAMAGE_AMOUNT)?,
            // Without an explicit value the resolver falls back to keyword detection.
            FieldRule::new(ClaimField::ClaimType).aliases(["claim type", "claimtype", "type"]),
        ];

        Ok(Self { rules })
    }

    /// Append an alias to a field's rule.
    pub fn with_alias(mut self, field: ClaimField, alias: impl AsRef<str>) -> Self {
        let rule = self.rule_mut(field);
        rule.aliases.push(alias.as_ref().trim().to_lowercase());
        self
    }

    /// Append a fallback pattern to a field's rule.
    pub fn with_pattern(mut self, field: ClaimField, source: &str) -> Result<Self> {
        let regex = compile(field, source)?;
        self.rule_mut(field).patterns.push(regex);
        Ok(self)
    }

    /// Rule for a field.
    pub fn get(&self, field: ClaimField) -> Option<&FieldRule> {
        self.rules.iter().find(|r| r.field == field)
    }

    /// All rules in evaluation order.
    pub fn iter(&self) -> impl Iterator<Item = &FieldRule> {
        self.rules.iter()
    }

    fn rule_mut(&mut self, field: ClaimField) -> &mut FieldRule {
        if let Some(pos) = self.rules.iter().position(|r| r.field == field) {
            &mut self.rules[pos]
        } else {
            self.rules.push(FieldRule::new(field));
            let last = self.rules.len() - 1;
            &mut self.rules[last]
        }
    }
}

fn compile(field: ClaimField, source: &str) -> Result<Regex> {
    RegexBuilder::new(source)
        .case_insensitive(true)
        .build()
        .map_err(|source| ExtractionError::InvalidPattern { field, source })
}
