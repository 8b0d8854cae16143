//! Mandatory field validation.

use crate::models::claim::{ClaimField, ExtractedFields};

/// Mandatory fields that are absent or blank, in declaration order.
pub fn find_missing_fields(fields: &ExtractedFields) -> Vec<ClaimField> {
    ClaimField::MANDATORY
        .into_iter()
        .filter(|field| fields.is_blank(*field))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn complete() -> ExtractedFields {
        ExtractedFields {
            policy_number: Some("PN-1".to_string()),
            policy_holder_name: Some("Jane Doe".to_string()),
            incident_date: Some("5/1/2024".to_string()),
            incident_time: None,
            location: Some("Main St".to_string()),
            description: Some("Hail".to_string()),
            claim_type: Some("PROPERTY".to_string()),
            estimated_damage: Some("100".to_string()),
        }
    }

    #[test]
    fn test_complete_fields() {
        assert!(find_missing_fields(&complete()).is_empty());
    }

    #[test]
    fn test_incident_time_is_optional() {
        let mut fields = complete();
        fields.incident_time = None;
        assert!(find_missing_fields(&fields).is_empty());
    }

    #[test]
    fn test_missing_in_declaration_order() {
        let mut fields = complete();
        fields.estimated_damage = None;
        fields.policy_number = Some("  ".to_string());
        fields.location = None;

        assert_eq!(
            find_missing_fields(&fields),
            vec![
                ClaimField::PolicyNumber,
                ClaimField::Location,
                ClaimField::EstimatedDamage
            ]
        );
    }

    #[test]
    fn test_everything_missing() {
        let missing = find_missing_fields(&ExtractedFields::default());
        assert_eq!(missing, ClaimField::MANDATORY.to_vec());
    }
}
