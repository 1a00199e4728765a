//! Core domain types for cinfinder results.
//!
//! All values here are request-scoped: built once from upstream data and
//! never mutated afterwards.

use serde::{Deserialize, Serialize};

/// Placeholder for a detail field the upstream page does not provide.
pub const NOT_AVAILABLE: &str = "N/A";

/// Placeholder for a label-anchored field whose label is missing.
pub const NOT_FOUND: &str = "Not found";

// ---------------------------------------------------------------------------
// SearchRecord
// ---------------------------------------------------------------------------

/// One company returned by a name search.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchRecord {
    /// Company display name.
    pub name: String,
    /// Registration code (CIN).
    pub cin: String,
    /// Listing status as reported upstream.
    pub listed: String,
    /// State of registration.
    pub state: String,
}

impl SearchRecord {
    /// Build a record from one raw `name;cin;listed;state` entry.
    ///
    /// Segments past the fourth are ignored. Returns `None` when fewer than
    /// four segments are present.
    pub fn from_entry(entry: &str) -> Option<Self> {
        let mut parts = entry.split(';').map(str::trim);
        let name = parts.next()?;
        let cin = parts.next()?;
        let listed = parts.next()?;
        let state = parts.next()?;

        Some(Self {
            name: name.to_string(),
            cin: cin.to_string(),
            listed: listed.to_string(),
            state: state.to_string(),
        })
    }
}

// ---------------------------------------------------------------------------
// CompanyDetails
// ---------------------------------------------------------------------------

/// Company profile resolved from a registration code.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompanyDetails {
    /// Trailing path segment of the profile URL the details were read from.
    pub cin: String,
    /// Regulator office code, or [`NOT_FOUND`].
    pub roc_code: String,
    /// Registered legal name, or [`NOT_AVAILABLE`].
    pub legal_name: String,
    /// Founding date as published, or [`NOT_AVAILABLE`].
    pub founding_date: String,
    /// Director names in page order. Never empty: `["N/A"]` when none are listed.
    pub directors: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn record_from_well_formed_entry() {
        let record = SearchRecord::from_entry("Acme Ltd; U123; Yes; MH").expect("record");
        assert_eq!(
            record,
            SearchRecord {
                name: "Acme Ltd".into(),
                cin: "U123".into(),
                listed: "Yes".into(),
                state: "MH".into(),
            }
        );
    }

    #[test]
    fn record_ignores_extra_segments() {
        let record = SearchRecord::from_entry("A;B;C;D;E;F").expect("record");
        assert_eq!(record.state, "D");
    }

    #[test]
    fn record_rejects_short_entry() {
        assert!(SearchRecord::from_entry("Acme Ltd;U123;Yes").is_none());
        assert!(SearchRecord::from_entry("").is_none());
    }

    #[test]
    fn record_keeps_empty_segments() {
        let record = SearchRecord::from_entry(";;;").expect("record");
        assert_eq!(record.name, "");
        assert_eq!(record.state, "");
    }

    #[test]
    fn details_serialize_with_snake_case_keys() {
        let details = CompanyDetails {
            cin: "U123".into(),
            roc_code: NOT_FOUND.into(),
            legal_name: "Acme Limited".into(),
            founding_date: NOT_AVAILABLE.into(),
            directors: vec![NOT_AVAILABLE.into()],
        };

        let json = serde_json::to_value(&details).expect("serialize");
        assert_eq!(json["roc_code"], "Not found");
        assert_eq!(json["legal_name"], "Acme Limited");
        assert_eq!(json["directors"][0], "N/A");
    }
}
