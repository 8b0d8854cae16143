//! Anchored fallback patterns for FNOL documents.
//!
//! Every pattern captures the field value in group 1. Patterns are compiled
//! case-insensitively when a rule table is built.

// Policy number token after the POLICY NUMBER anchor.
pub const POLICY_NUMBER: &str = r"POLICY NUMBER[:\s]*([A-Za-z0-9\-]+)";

// Rest of the NAME OF INSURED line (or the next line when the label stands alone).
pub const NAME_OF_INSURED: &str = r"NAME OF INSURED\s*[:\-]*[ \t]*([^\r\n]+)";

pub const LOCATION_OF_LOSS: &str = r"LOCATION OF LOSS[:\s]*([^\r\n]+)";

// Multi-line narrative, bounded by the next LOSS / INSURED VEHICLE heading or page footer.
pub const DESCRIPTION_OF_ACCIDENT: &str =
    r"(?s)DESCRIPTION OF ACCIDENT(.*?)(?:LOSS|INSURED VEHICLE|Page \d+ of)";

pub const DATE_OF_LOSS: &str = r"DATE OF LOSS[^0-9]*([0-9]{1,2}/[0-9]{1,2}/[0-9]{2,4})";

pub const ESTIMATE_AMOUNT: &str = r"ESTIMATE AMOUNT[:\s$]*([0-9,.]+)";

pub const ESTIMATED_DAMAGE_AMOUNT: &str = r"Estimated Damage Amount[:\s$]*([0-9,.]+)";
