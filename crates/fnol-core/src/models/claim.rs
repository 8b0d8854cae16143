//! Claim data models: resolved fields, routing decisions, and stored records.

use std::fmt;

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// A semantic field recovered from FNOL text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ClaimField {
    PolicyNumber,
    PolicyHolderName,
    IncidentDate,
    IncidentTime,
    Location,
    Description,
    ClaimType,
    EstimatedDamage,
}

impl ClaimField {
    /// Fields required for straight-through processing, in reporting order.
    pub const MANDATORY: [ClaimField; 7] = [
        ClaimField::PolicyNumber,
        ClaimField::PolicyHolderName,
        ClaimField::IncidentDate,
        ClaimField::Location,
        ClaimField::Description,
        ClaimField::ClaimType,
        ClaimField::EstimatedDamage,
    ];

    /// External (camelCase) name of the field.
    pub fn name(self) -> &'static str {
        match self {
            ClaimField::PolicyNumber => "policyNumber",
            ClaimField::PolicyHolderName => "policyHolderName",
            ClaimField::IncidentDate => "incidentDate",
            ClaimField::IncidentTime => "incidentTime",
            ClaimField::Location => "location",
            ClaimField::Description => "description",
            ClaimField::ClaimType => "claimType",
            ClaimField::EstimatedDamage => "estimatedDamage",
        }
    }
}

impl fmt::Display for ClaimField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Claim attributes resolved from document text. `None` means unresolved.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ExtractedFields {
    pub policy_number: Option<String>,
    pub policy_holder_name: Option<String>,

    /// Raw date string as written in the document.
    pub incident_date: Option<String>,
    pub incident_time: Option<String>,
    pub location: Option<String>,
    pub description: Option<String>,

    /// Explicit claim type, or `INJURY`/`PROPERTY` when the document has none.
    pub claim_type: Option<String>,

    /// Raw numeric string, e.g. `1,200.00`.
    pub estimated_damage: Option<String>,
}

impl ExtractedFields {
    /// Get the value of a field.
    pub fn get(&self, field: ClaimField) -> Option<&str> {
        let value = match field {
            ClaimField::PolicyNumber => &self.policy_number,
            ClaimField::PolicyHolderName => &self.policy_holder_name,
            ClaimField::IncidentDate => &self.incident_date,
            ClaimField::IncidentTime => &self.incident_time,
            ClaimField::Location => &self.location,
            ClaimField::Description => &self.description,
            ClaimField::ClaimType => &self.claim_type,
            ClaimField::EstimatedDamage => &self.estimated_damage,
        };
        value.as_deref()
    }

    /// Set the value of a field.
    pub fn set(&mut self, field: ClaimField, value: Option<String>) {
        let slot = match field {
            ClaimField::PolicyNumber => &mut self.policy_number,
            ClaimField::PolicyHolderName => &mut self.policy_holder_name,
            ClaimField::IncidentDate => &mut self.incident_date,
            ClaimField::IncidentTime => &mut self.incident_time,
            ClaimField::Location => &mut self.location,
            ClaimField::Description => &mut self.description,
            ClaimField::ClaimType => &mut self.claim_type,
            ClaimField::EstimatedDamage => &mut self.estimated_damage,
        };
        *slot = value;
    }

    /// Check whether a field is absent or blank.
    pub fn is_blank(&self, field: ClaimField) -> bool {
        self.get(field).is_none_or(|v| v.trim().is_empty())
    }
}

/// Queue a claim is routed to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ClaimRoute {
    FastTrack,
    ManualReview,
    SpecialistQueue,
    Investigation,
}

impl ClaimRoute {
    pub fn as_str(self) -> &'static str {
        match self {
            ClaimRoute::FastTrack => "FAST_TRACK",
            ClaimRoute::ManualReview => "MANUAL_REVIEW",
            ClaimRoute::SpecialistQueue => "SPECIALIST_QUEUE",
            ClaimRoute::Investigation => "INVESTIGATION",
        }
    }
}

impl fmt::Display for ClaimRoute {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Outcome of the routing engine for one claim.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RoutingDecision {
    #[serde(rename = "recommendedRoute")]
    pub route: ClaimRoute,

    /// Which rule fired, in plain words.
    pub reasoning: String,

    /// Mandatory fields that were absent, in declaration order.
    #[serde(default)]
    pub missing_fields: Vec<ClaimField>,

    #[serde(default)]
    pub extracted_fields: ExtractedFields,
}

/// A routing decision together with the text it was computed from.
///
/// Returned by analysis and accepted back when a reviewed claim is saved.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClaimAnalysis {
    #[serde(flatten)]
    pub decision: RoutingDecision,

    #[serde(default)]
    pub raw_text: String,
}

/// A persisted claim record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoredClaim {
    /// Store-assigned identifier.
    pub id: u64,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub policy_number: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub policy_holder_name: Option<String>,

    /// Incident date, when the raw value matched a known format.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub incident_date: Option<NaiveDate>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub incident_time: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub claim_type: Option<String>,

    /// Estimated damage, when the raw value parsed as a number.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub estimated_damage: Option<Decimal>,

    pub recommended_route: ClaimRoute,

    pub reasoning: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub raw_text: Option<String>,

    pub created_at: DateTime<Utc>,
}
