//! Representative records returned by a lookup.

use serde::{Deserialize, Deserializer, Serialize};

/// Display name used when no representative data exists for a constituency
pub const DATA_NOT_AVAILABLE: &str = "Data not available";

/// Party shown on placeholder records
pub const NO_PARTY: &str = "N/A";

/// An elected representative (MLA or MP) attached to a constituency.
///
/// Optional fields are left out of the JSON when absent, so a placeholder
/// serializes to just `name`, `party`, `constituency` and, when known, the
/// constituency number.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RepresentativeRecord {
    pub name: String,
    pub party: String,
    /// Name of the constituency this record was looked up for
    pub constituency: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub constituency_number: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub contact: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub office_address: Option<String>,
}

impl RepresentativeRecord {
    /// Well-formed record signalling that no data exists for `constituency`.
    pub fn placeholder(constituency: &str, constituency_number: Option<&str>) -> Self {
        Self {
            name: DATA_NOT_AVAILABLE.to_string(),
            party: NO_PARTY.to_string(),
            constituency: constituency.to_string(),
            constituency_number: constituency_number.map(str::to_string),
            contact: None,
            email: None,
            office_address: None,
        }
    }

    pub fn is_placeholder(&self) -> bool {
        self.name == DATA_NOT_AVAILABLE && self.contact.is_none() && self.email.is_none()
    }
}

/// One value of a record store file (`{"Shivajinagar": {...}, ...}`).
///
/// Every field is optional on disk; missing `name`/`party` fall back to the
/// placeholder values when the record is built.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RecordEntry {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub party: Option<String>,
    #[serde(default, deserialize_with = "string_or_number")]
    pub constituency_number: Option<String>,
    #[serde(default)]
    pub contact: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub office_address: Option<String>,
}

impl RecordEntry {
    /// Materialize a record for `constituency`, using `fallback_number` when
    /// the entry carries no number of its own.
    pub fn to_record(
        &self,
        constituency: &str,
        fallback_number: Option<&str>,
    ) -> RepresentativeRecord {
        RepresentativeRecord {
            name: self
                .name
                .clone()
                .unwrap_or_else(|| DATA_NOT_AVAILABLE.to_string()),
            party: self.party.clone().unwrap_or_else(|| NO_PARTY.to_string()),
            constituency: constituency.to_string(),
            constituency_number: self
                .constituency_number
                .clone()
                .or_else(|| fallback_number.map(str::to_string)),
            contact: self.contact.clone(),
            email: self.email.clone(),
            office_address: self.office_address.clone(),
        }
    }
}

/// Accept `"157"` and `157` alike; anything else (null, bool, object) is None.
fn string_or_number<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<serde_json::Value>::deserialize(deserializer)?;
    Ok(value.as_ref().and_then(scalar_to_string))
}

/// Render a JSON string or number as a plain string.
pub fn scalar_to_string(value: &serde_json::Value) -> Option<String> {
    match value {
        serde_json::Value::String(s) if !s.is_empty() => Some(s.clone()),
        serde_json::Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_placeholder_omits_empty_fields() {
        let record = RepresentativeRecord::placeholder("Hebbal", Some("158"));
        let json = serde_json::to_value(&record).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "name": "Data not available",
                "party": "N/A",
                "constituency": "Hebbal",
                "constituency_number": "158",
            })
        );
        assert!(record.is_placeholder());
    }

    #[test]
    fn test_entry_accepts_numeric_constituency_number() {
        let entry: RecordEntry =
            serde_json::from_str(r#"{"name": "PC Mohan", "party": "BJP", "constituency_number": 25}"#)
                .unwrap();
        assert_eq!(entry.constituency_number.as_deref(), Some("25"));

        let record = entry.to_record("Bangalore Central", None);
        assert_eq!(record.name, "PC Mohan");
        assert_eq!(record.constituency, "Bangalore Central");
        assert!(!record.is_placeholder());
    }

    #[test]
    fn test_entry_defaults_and_fallback_number() {
        let entry: RecordEntry = serde_json::from_str(r#"{"contact": "+91-80-0000"}"#).unwrap();
        let record = entry.to_record("Chickpet", Some("169"));
        assert_eq!(record.name, DATA_NOT_AVAILABLE);
        assert_eq!(record.party, NO_PARTY);
        assert_eq!(record.constituency_number.as_deref(), Some("169"));
        assert_eq!(record.contact.as_deref(), Some("+91-80-0000"));
    }
}
