// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Page metadata extraction from episode JSON.
//
// The viewer embeds the episode description as JSON in the `data-value`
// attribute of a `<script id="episode-json">` tag. Only `main` pages whose
// URL matches the configured pattern are scrambled page assets; they are
// numbered 1..N in document order.

use html_escape::decode_html_entities;
use regex::Regex;
use serde::Deserialize;
use serde_json::Value;
use tracing::{debug, info, instrument};

use pagewerk_core::error::{PagewerkError, Result};
use pagewerk_core::types::PageRecord;

/// `type` of the page entries that carry artwork.
const MAIN_PAGE_TYPE: &str = "main";

#[derive(Debug, Deserialize)]
struct Episode {
    #[serde(rename = "readableProduct")]
    readable_product: Option<ReadableProduct>,
}

#[derive(Debug, Deserialize)]
struct ReadableProduct {
    #[serde(rename = "pageStructure")]
    page_structure: Option<PageStructure>,
}

#[derive(Debug, Deserialize)]
struct PageStructure {
    #[serde(default = "empty_pages")]
    pages: Value,
}

fn empty_pages() -> Value {
    Value::Array(Vec::new())
}

#[derive(Debug, Deserialize)]
struct RawPage {
    src: Option<String>,
    #[serde(rename = "type")]
    kind: Option<String>,
}

/// Turns an episode description into ordered page records.
#[derive(Debug, Clone)]
pub struct PageExtractor {
    url_pattern: Regex,
    script_tag: Regex,
    data_value: Regex,
}

impl PageExtractor {
    /// Extractor keeping page URLs that match `url_pattern`.
    pub fn new(url_pattern: &str) -> Result<Self> {
        let url_pattern = Regex::new(url_pattern).map_err(|e| {
            PagewerkError::DataExtraction(format!("invalid page URL pattern '{url_pattern}': {e}"))
        })?;
        let script_tag = Regex::new(r#"(?is)<script\b[^>]*\bid\s*=\s*["']episode-json["'][^>]*>"#)
            .map_err(|e| PagewerkError::DataExtraction(e.to_string()))?;
        let data_value = Regex::new(r#"(?is)\bdata-value\s*=\s*(?:"([^"]*)"|'([^']*)')"#)
            .map_err(|e| PagewerkError::DataExtraction(e.to_string()))?;
        Ok(Self {
            url_pattern,
            script_tag,
            data_value,
        })
    }

    /// Parse episode JSON into page records numbered 1..N.
    #[instrument(skip_all, fields(json_len = json.len()))]
    pub fn extract(&self, json: &str) -> Result<Vec<PageRecord>> {
        let episode: Episode = serde_json::from_str(json)
            .map_err(|e| PagewerkError::DataExtraction(format!("episode JSON is malformed: {e}")))?;

        let pages = episode
            .readable_product
            .ok_or_else(|| PagewerkError::DataExtraction("missing readableProduct".into()))?
            .page_structure
            .ok_or_else(|| PagewerkError::DataExtraction("missing pageStructure".into()))?
            .pages;

        let Value::Array(entries) = pages else {
            return Err(PagewerkError::DataExtraction("pages is not an array".into()));
        };

        let total = entries.len();
        let records: Vec<PageRecord> = entries
            .into_iter()
            .filter_map(|entry| serde_json::from_value::<RawPage>(entry).ok())
            .filter(|page| page.kind.as_deref() == Some(MAIN_PAGE_TYPE))
            .filter_map(|page| page.src)
            .filter(|src| !src.is_empty() && self.url_pattern.is_match(src))
            .zip(1u32..)
            .map(|(source_url, index)| PageRecord { source_url, index })
            .collect();

        if records.is_empty() {
            return Err(PagewerkError::DataExtraction(format!(
                "no page URL matches {}",
                self.url_pattern.as_str()
            )));
        }

        info!(entries = total, pages = records.len(), "page records extracted");
        Ok(records)
    }

    /// Locate the `episode-json` script tag in a viewer page and extract from
    /// its `data-value` attribute.
    #[instrument(skip_all, fields(html_len = html.len()))]
    pub fn extract_from_html(&self, html: &str) -> Result<Vec<PageRecord>> {
        let tag = self
            .script_tag
            .find(html)
            .ok_or_else(|| PagewerkError::DataExtraction("episode-json script not found".into()))?;
        let raw = self
            .data_value
            .captures(tag.as_str())
            .and_then(|caps| caps.get(1).or_else(|| caps.get(2)))
            .map(|m| m.as_str())
            .filter(|value| !value.is_empty())
            .ok_or_else(|| PagewerkError::DataExtraction("episode-json has no data".into()))?;

        debug!(len = raw.len(), "episode-json attribute found");
        self.extract(&decode_html_entities(raw))
    }

    /// Accepts either a viewer HTML page or bare episode JSON.
    pub fn extract_any(&self, input: &str) -> Result<Vec<PageRecord>> {
        if input.trim_start().starts_with('{') {
            self.extract(input)
        } else {
            self.extract_from_html(input)
        }
    }
}
