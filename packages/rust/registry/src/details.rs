//! Detail extraction stage: profile page → [`CompanyDetails`].
//!
//! Most fields come from the page's `Organization` JSON-LD block. The ROC code
//! is only printed as page text next to a `ROC Code:` label, so it is read by
//! taking the label's parent text and removing the label. That is best-effort:
//! markup where the value lives outside the label's parent yields an empty or
//! partial code, and a missing label yields [`NOT_FOUND`].
//!
//! Missing fields degrade to sentinels. The only hard failure is a page with
//! no `Organization` block at all.

use std::sync::LazyLock;

use cinfinder_shared::{CinFinderError, CompanyDetails, NOT_AVAILABLE, NOT_FOUND, Result};
use regex::Regex;
use reqwest::Client;
use scraper::{ElementRef, Html, Selector};
use serde_json::{Map, Value};
use tracing::{debug, info, instrument};

use crate::http::fetch_html;
use crate::resolvers::ProfileUrl;

/// Label text removed from the parent element's text.
const ROC_LABEL: &str = "ROC Code:";

/// JSON-LD `@type` the details are read from.
const ORGANIZATION_TYPE: &str = "Organization";

static ROC_LABEL_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)ROC Code:").expect("valid regex"));

/// Fetches a profile page and extracts company details from it.
pub struct DetailExtractionStage {
    client: Client,
}

impl DetailExtractionStage {
    pub(crate) fn new(client: Client) -> Self {
        Self { client }
    }

    /// Fetch `profile_url` and extract its company details.
    #[instrument(skip_all, fields(url = %profile_url))]
    pub async fn extract_details(&self, profile_url: &ProfileUrl) -> Result<CompanyDetails> {
        let html = fetch_html(&self.client, profile_url.as_str()).await?;
        let details = parse_company_page(&html, profile_url)?;

        info!(
            cin = %details.cin,
            directors = details.directors.len(),
            "extracted company details"
        );
        Ok(details)
    }
}

/// Extract company details from a fetched profile page.
///
/// Pure function of its inputs: the same page always yields the same details.
pub fn parse_company_page(html: &str, profile_url: &ProfileUrl) -> Result<CompanyDetails> {
    let doc = Html::parse_document(html);

    let roc_code = extract_roc_code(&doc).unwrap_or_else(|| NOT_FOUND.to_string());

    let org = find_organization(&doc).ok_or_else(|| {
        CinFinderError::extraction(format!(
            "could not find Organization JSON-LD on {profile_url}"
        ))
    })?;

    Ok(CompanyDetails {
        cin: profile_url.cin().to_string(),
        roc_code,
        legal_name: text_field(&org, "legalName"),
        founding_date: text_field(&org, "foundingDate"),
        directors: directors(&org),
    })
}

/// Read the value printed next to the `ROC Code:` label, if the label exists.
fn extract_roc_code(doc: &Html) -> Option<String> {
    let span_sel = Selector::parse("span").unwrap();

    // The label is the span whose own text matches, not a wrapper around it.
    let label = doc
        .select(&span_sel)
        .filter(|span| span.children().all(|child| child.value().is_text()))
        .find(|span| ROC_LABEL_PATTERN.is_match(&span.text().collect::<String>()))?;
    let parent = label.parent().and_then(ElementRef::wrap)?;

    let text = parent
        .text()
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .collect::<Vec<_>>()
        .join(" ");

    Some(text.replace(ROC_LABEL, "").trim().to_string())
}

/// First JSON-LD object on the page whose `@type` is `Organization`.
///
/// Blocks that fail to parse or are not JSON objects are skipped.
fn find_organization(doc: &Html) -> Option<Map<String, Value>> {
    let script_sel = Selector::parse(r#"script[type="application/ld+json"]"#).unwrap();

    doc.select(&script_sel).find_map(|script| {
        let raw = script.text().collect::<String>();
        match serde_json::from_str::<Value>(raw.trim()) {
            Ok(Value::Object(obj))
                if obj.get("@type").and_then(Value::as_str) == Some(ORGANIZATION_TYPE) =>
            {
                Some(obj)
            }
            Ok(_) => None,
            Err(e) => {
                debug!(error = %e, "skipping unparseable JSON-LD block");
                None
            }
        }
    })
}

/// Scalar field as text; [`NOT_AVAILABLE`] when absent, null, or structured.
fn text_field(org: &Map<String, Value>, key: &str) -> String {
    match org.get(key) {
        Some(Value::String(s)) => s.clone(),
        Some(Value::Number(n)) => n.to_string(),
        Some(Value::Bool(b)) => b.to_string(),
        _ => NOT_AVAILABLE.to_string(),
    }
}

/// Trimmed, non-empty employee names in page order, or `["N/A"]`.
fn directors(org: &Map<String, Value>) -> Vec<String> {
    let employees: Vec<&Value> = match org.get("employee") {
        Some(Value::Array(items)) => items.iter().collect(),
        Some(single @ Value::Object(_)) => vec![single],
        _ => Vec::new(),
    };

    let names: Vec<String> = employees
        .into_iter()
        .filter_map(|e| e.get("name").and_then(Value::as_str))
        .map(str::trim)
        .filter(|name| !name.is_empty())
        .map(String::from)
        .collect();

    if names.is_empty() {
        vec![NOT_AVAILABLE.to_string()]
    } else {
        names
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn profile() -> ProfileUrl {
        ProfileUrl::from_raw("https://registry.example/company/acme-ltd/U123")
    }

    fn page(body: &str) -> String {
        format!("<html><head><title>Acme</title></head><body>{body}</body></html>")
    }

    fn org_block(json: &str) -> String {
        format!(r#"<script type="application/ld+json">{json}</script>"#)
    }

    #[test]
    fn reads_organization_fields() {
        let html = page(&format!(
            r#"<div><span>ROC Code:</span> RoC-Mumbai</div>{}"#,
            org_block(
                r#"{"@type": "Organization", "legalName": "ACME LIMITED",
                    "foundingDate": "2001-04-12",
                    "employee": [{"name": " Jane Doe "}, {"name": ""}, {"name": "John Roe"}]}"#
            )
        ));

        let details = parse_company_page(&html, &profile()).unwrap();
        assert_eq!(details.cin, "U123");
        assert_eq!(details.roc_code, "RoC-Mumbai");
        assert_eq!(details.legal_name, "ACME LIMITED");
        assert_eq!(details.founding_date, "2001-04-12");
        assert_eq!(details.directors, ["Jane Doe", "John Roe"]);
    }

    #[test]
    fn blank_employee_names_are_dropped() {
        let html = page(&org_block(
            r#"{"@type": "Organization", "employee": [{"name": " Jane Doe "}, {"name": ""}]}"#,
        ));
        let details = parse_company_page(&html, &profile()).unwrap();
        assert_eq!(details.directors, ["Jane Doe"]);

        let html = page(&org_block(
            r#"{"@type": "Organization", "employee": [{"name": "   "}, {"jobTitle": "CFO"}]}"#,
        ));
        let details = parse_company_page(&html, &profile()).unwrap();
        assert_eq!(details.directors, [NOT_AVAILABLE]);
    }

    #[test]
    fn empty_or_missing_employees_yield_placeholder() {
        for json in [
            r#"{"@type": "Organization", "employee": []}"#,
            r#"{"@type": "Organization", "employee": null}"#,
            r#"{"@type": "Organization"}"#,
        ] {
            let details = parse_company_page(&page(&org_block(json)), &profile()).unwrap();
            assert_eq!(details.directors, [NOT_AVAILABLE], "for {json}");
        }
    }

    #[test]
    fn single_employee_object_is_accepted() {
        let html = page(&org_block(
            r#"{"@type": "Organization", "employee": {"@type": "Person", "name": "Solo Director"}}"#,
        ));
        let details = parse_company_page(&html, &profile()).unwrap();
        assert_eq!(details.directors, ["Solo Director"]);
    }

    #[test]
    fn missing_fields_use_sentinels() {
        let html = page(&org_block(r#"{"@type": "Organization", "legalName": null}"#));
        let details = parse_company_page(&html, &profile()).unwrap();
        assert_eq!(details.roc_code, NOT_FOUND);
        assert_eq!(details.legal_name, NOT_AVAILABLE);
        assert_eq!(details.founding_date, NOT_AVAILABLE);
    }

    #[test]
    fn no_json_ld_is_extraction_error() {
        let html = page("<div><span>ROC Code:</span> RoC-Delhi</div>");
        let err = parse_company_page(&html, &profile()).unwrap_err();
        assert!(matches!(err, CinFinderError::Extraction { .. }));
    }

    #[test]
    fn no_organization_block_is_extraction_error() {
        let html = page(&format!(
            "{}{}{}",
            org_block(r#"{"@type": "BreadcrumbList", "itemListElement": []}"#),
            org_block(r#"[{"@type": "Organization", "legalName": "In An Array"}]"#),
            org_block("{ not json"),
        ));
        let err = parse_company_page(&html, &profile()).unwrap_err();
        assert!(err.to_string().contains("Organization"));
    }

    #[test]
    fn selects_first_organization_after_skipping_others() {
        let html = page(&format!(
            "{}{}{}{}",
            org_block("{ broken"),
            org_block(r#"{"@type": "WebSite", "name": "Registry"}"#),
            org_block(r#"{"@type": "Organization", "legalName": "FIRST"}"#),
            org_block(r#"{"@type": "Organization", "legalName": "SECOND"}"#),
        ));
        let details = parse_company_page(&html, &profile()).unwrap();
        assert_eq!(details.legal_name, "FIRST");
    }

    #[test]
    fn roc_label_is_case_insensitive_but_removal_is_literal() {
        let html = page(&format!(
            r#"<p><span>roc code:</span> RoC-Pune</p>{}"#,
            org_block(r#"{"@type": "Organization"}"#)
        ));
        let details = parse_company_page(&html, &profile()).unwrap();
        // The label is found, but only the exact-case label text is stripped.
        assert_eq!(details.roc_code, "roc code: RoC-Pune");
    }

    #[test]
    fn roc_label_inside_wrapper_span_reads_innermost_parent() {
        let html = page(&format!(
            r#"<div>Registered Office <span class="field"><span>ROC Code:</span> RoC-Delhi</span></div>{}"#,
            org_block(r#"{"@type": "Organization"}"#)
        ));
        let details = parse_company_page(&html, &profile()).unwrap();
        assert_eq!(details.roc_code, "RoC-Delhi");
    }

    #[test]
    fn span_with_markup_around_label_text_is_not_the_label() {
        let html = page(&format!(
            r#"<p><span><b>ROC Code:</b> RoC-Goa</span></p>{}"#,
            org_block(r#"{"@type": "Organization"}"#)
        ));
        let details = parse_company_page(&html, &profile()).unwrap();
        assert_eq!(details.roc_code, NOT_FOUND);
    }

    #[test]
    fn roc_value_outside_parent_yields_empty_code() {
        let html = page(&format!(
            r#"<dl><dt><span>ROC Code:</span></dt><dd>RoC-Chennai</dd></dl>{}"#,
            org_block(r#"{"@type": "Organization"}"#)
        ));
        let details = parse_company_page(&html, &profile()).unwrap();
        assert_eq!(details.roc_code, "");
    }

    #[test]
    fn numeric_fields_are_rendered_as_text() {
        let html = page(&org_block(r#"{"@type": "Organization", "foundingDate": 1999}"#));
        let details = parse_company_page(&html, &profile()).unwrap();
        assert_eq!(details.founding_date, "1999");
    }

    #[test]
    fn extraction_is_deterministic() {
        let html = page(&format!(
            r#"<div><span>ROC Code:</span> RoC-Kolkata</div>{}"#,
            org_block(r#"{"@type": "Organization", "legalName": "X", "employee": [{"name": "A"}]}"#)
        ));
        let first = parse_company_page(&html, &profile()).unwrap();
        let second = parse_company_page(&html, &profile()).unwrap();
        assert_eq!(first, second);
    }
}
