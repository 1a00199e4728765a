//! Decoding of the search endpoint's response envelope.
//!
//! The endpoint answers with a single-field object, `{"d": [...]}`, where each
//! entry is a `name;cin;listed;state` string.

use serde::{Deserialize, Serialize};
use tracing::debug;

use cinfinder_shared::SearchRecord;

/// Body of the search POST.
#[derive(Debug, Serialize)]
pub(crate) struct SearchRequest<'a> {
    #[serde(rename = "strSearch")]
    pub str_search: &'a str,
    pub mode: &'a str,
}

/// Response envelope of the search endpoint.
#[derive(Debug, Default, Deserialize)]
pub struct SearchEnvelope {
    /// Raw entries; absent and `null` are both treated as no results.
    #[serde(default)]
    pub d: Option<Vec<String>>,
}

impl SearchEnvelope {
    /// Consume the envelope, yielding its raw entries.
    pub fn into_entries(self) -> Vec<String> {
        self.d.unwrap_or_default()
    }
}

/// Normalize raw entries into records, preserving upstream order.
///
/// Entries with fewer than four `;`-separated segments are skipped.
/// Duplicates are kept.
pub fn parse_entries(entries: &[String]) -> Vec<SearchRecord> {
    entries
        .iter()
        .filter_map(|entry| {
            let record = SearchRecord::from_entry(entry);
            if record.is_none() {
                debug!(%entry, "skipping malformed search entry");
            }
            record
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entries(raw: &[&str]) -> Vec<String> {
        raw.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn parses_and_trims_entries() {
        let records = parse_entries(&entries(&["Acme Ltd; U123; Yes; MH"]));
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].name, "Acme Ltd");
        assert_eq!(records[0].cin, "U123");
        assert_eq!(records[0].listed, "Yes");
        assert_eq!(records[0].state, "MH");
    }

    #[test]
    fn drops_malformed_entries_and_keeps_order() {
        let records = parse_entries(&entries(&[
            "Beta Corp;L999;No;KA",
            "garbage",
            "Acme Ltd;U123",
            "Acme Ltd;U123;Yes;MH",
        ]));
        let names: Vec<&str> = records.iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, ["Beta Corp", "Acme Ltd"]);
    }

    #[test]
    fn keeps_duplicates() {
        let records = parse_entries(&entries(&["A;1;No;DL", "A;1;No;DL"]));
        assert_eq!(records.len(), 2);
        assert_eq!(records[0], records[1]);
    }

    #[test]
    fn envelope_without_d_is_empty() {
        let envelope: SearchEnvelope = serde_json::from_str("{}").expect("decode");
        assert!(envelope.into_entries().is_empty());

        let envelope: SearchEnvelope = serde_json::from_str(r#"{"d": null}"#).expect("decode");
        assert!(envelope.into_entries().is_empty());
    }

    #[test]
    fn request_body_uses_upstream_field_names() {
        let body = SearchRequest {
            str_search: "acme",
            mode: "SCBN",
        };
        let json = serde_json::to_value(&body).expect("serialize");
        assert_eq!(json, serde_json::json!({"strSearch": "acme", "mode": "SCBN"}));
    }
}
