//! Pure HTML-fragment extraction
//!
//! Parses listing entry fragments into partial `ProfileRecord` values and
//! contact panel markup into key/value pairs. No I/O; absent fields become
//! empty strings, never an error.

use scraper::{ElementRef, Html, Selector};

use crate::config::SelectorSet;
use crate::harvest_engine::HarvestError;
use crate::records::ProfileRecord;

/// Selector set compiled once per run.
#[derive(Debug, Clone)]
pub struct CompiledSelectors {
    /// Matches the entry root by its identifier attribute, since fragments
    /// are the entry's outer HTML without the surrounding list item.
    entry_root: Selector,
    urn_attr: String,
    profile_link: Selector,
    thumbnail: Selector,
    full_name: Selector,
    connection_badge: Selector,
    premium_badge: Selector,
    job_title: Selector,
    location: Selector,
    contact_block: Selector,
    contact_header: Selector,
    contact_link: Selector,
    contact_span: Selector,
}

impl CompiledSelectors {
    /// Compile the configured selector strings.
    ///
    /// # Errors
    ///
    /// Returns `HarvestError::Config` naming the first selector that fails
    /// to parse.
    pub fn compile(set: &SelectorSet) -> Result<Self, HarvestError> {
        let parse = |s: &str| {
            Selector::parse(s)
                .map_err(|e| HarvestError::Config(format!("invalid selector `{s}`: {e}")))
        };
        Ok(Self {
            entry_root: parse(&format!("[{}]", set.urn_attr))?,
            urn_attr: set.urn_attr.clone(),
            profile_link: parse(&set.profile_link)?,
            thumbnail: parse(&set.thumbnail)?,
            full_name: parse(&set.full_name)?,
            connection_badge: parse(&set.connection_badge)?,
            premium_badge: parse(&set.premium_badge)?,
            job_title: parse(&set.job_title)?,
            location: parse(&set.location)?,
            contact_block: parse(&set.contact_block)?,
            contact_header: parse(&set.contact_header)?,
            contact_link: parse("a")?,
            contact_span: parse("span")?,
        })
    }
}

fn collect_text(element: ElementRef<'_>) -> String {
    element.text().collect::<String>().trim().to_string()
}

fn first_text(doc: &Html, selector: &Selector) -> String {
    doc.select(selector).next().map(collect_text).unwrap_or_default()
}

/// Parse one listing entry fragment into a partial record.
///
/// Contact fields stay empty; they are filled by the contact fetcher when a
/// detail address was resolved.
#[must_use]
pub fn parse_entry(fragment: &str, selectors: &CompiledSelectors) -> ProfileRecord {
    let doc = Html::parse_fragment(fragment);
    let mut record = ProfileRecord::default();

    if let Some(root) = doc.select(&selectors.entry_root).next() {
        record.urn = root
            .value()
            .attr(&selectors.urn_attr)
            .unwrap_or_default()
            .to_string();
    }

    if let Some(link) = doc.select(&selectors.profile_link).next() {
        record.profile_url = link.value().attr("href").unwrap_or_default().to_string();
    }

    if let Some(img) = doc.select(&selectors.thumbnail).next() {
        record.profile_image_url = img.value().attr("src").unwrap_or_default().to_string();
        let alt = img.value().attr("alt").unwrap_or_default();
        let mut parts = alt.split_whitespace();
        record.first_name = parts.next().unwrap_or_default().to_string();
        record.last_name = parts.collect::<Vec<_>>().join(" ");
    }

    record.full_name = first_text(&doc, &selectors.full_name);
    record.connection_degree = first_text(&doc, &selectors.connection_badge);
    record.premium_badge = doc.select(&selectors.premium_badge).next().is_some();
    record.job_title = first_text(&doc, &selectors.job_title);
    record.location = first_text(&doc, &selectors.location);

    record
}

/// Normalize a header label into a canonical contact key:
/// lower-cased, whitespace runs collapsed to single underscores.
#[must_use]
pub fn normalize_key(label: &str) -> String {
    label
        .to_lowercase()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join("_")
}

/// Whether a key or value is scraping noise: too short, no alphabetic
/// character, or carrying a known junk substring.
#[must_use]
pub fn is_noise(s: &str, junk_markers: &[String]) -> bool {
    s.len() < 3
        || !s.chars().any(|c| c.is_ascii_alphabetic())
        || junk_markers.iter().any(|marker| s.contains(marker.as_str()))
}

/// Parse the contact panel into accepted key/value pairs, in block order.
///
/// Per sub-block the key comes from the header label (`UnknownKey{i}`
/// fallback, then normalized) and the value from the first anchor's target
/// with any `mailto:` prefix stripped, preferring the target over the
/// anchor text, else the first span's text, else the block text. Noisy
/// pairs are rejected.
#[must_use]
pub fn parse_contact_panel(
    panel_html: &str,
    selectors: &CompiledSelectors,
    junk_markers: &[String],
) -> Vec<(String, String)> {
    let doc = Html::parse_fragment(panel_html);
    let mut pairs = Vec::new();

    for (i, block) in doc.select(&selectors.contact_block).enumerate() {
        let label = block
            .select(&selectors.contact_header)
            .next()
            .map(collect_text)
            .filter(|s| !s.is_empty())
            .unwrap_or_else(|| format!("UnknownKey{i}"));
        let key = normalize_key(&label);

        let value = if let Some(anchor) = block.select(&selectors.contact_link).next() {
            let href = anchor.value().attr("href").unwrap_or_default().trim();
            if let Some(address) = href.strip_prefix("mailto:") {
                address.to_string()
            } else if !href.is_empty() {
                href.to_string()
            } else {
                collect_text(anchor)
            }
        } else if let Some(span) = block.select(&selectors.contact_span).next() {
            collect_text(span)
        } else {
            collect_text(block)
        };

        if !is_noise(&key, junk_markers) && !is_noise(&value, junk_markers) {
            pairs.push((key, value));
        }
    }

    pairs
}
