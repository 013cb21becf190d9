//! Harvested record types.
//!
//! `ProfileRecord` is the unit of accumulation: one listing entry, enriched
//! with whatever the contact-info overlay yielded. `ProfileSummary` is the
//! wire projection published on the outbound event bus.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Connection-tier marker that classifies an entry as first-degree.
pub const FIRST_DEGREE_MARKER: &str = "1st";

/// One harvested entity.
///
/// Identity and summary fields come from the listing entry; the contact
/// fields are filled exactly once, before the record is appended to the
/// session. Absent fields are always empty strings, never a separate
/// null-like state.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ProfileRecord {
    /// Stable identifier from the entry's result-urn attribute. May be empty.
    pub urn: String,
    pub profile_url: String,
    pub profile_image_url: String,
    pub first_name: String,
    pub last_name: String,
    pub full_name: String,
    /// Enumeration-like connection tier label, e.g. "1st" or "2nd".
    pub connection_degree: String,
    /// Whether the entry carried a premium badge.
    pub premium_badge: bool,
    pub job_title: String,
    pub location: String,
    /// Contact fields keyed by normalized header label (lower-case,
    /// whitespace collapsed to underscores). Keys are discovered
    /// dynamically per entry.
    pub contact_info: BTreeMap<String, String>,
    /// Unparsed panel text fallback.
    pub contact_info_raw: String,
    pub contact_info_error: bool,
    /// Human-readable failure cause; empty on success.
    pub error_reason: String,
}

impl ProfileRecord {
    /// Whether this record counts toward the VIP tally: first-degree
    /// connection or premium badge. Evaluated once, at parse time.
    #[must_use]
    pub fn is_vip(&self) -> bool {
        self.connection_degree.contains(FIRST_DEGREE_MARKER) || self.premium_badge
    }
}

/// Projection of a record published on `ProfileScraped` and
/// `AllProfilesScraped` events. Email, date of birth and phone are pulled
/// from the contact-info mapping when present.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileSummary {
    pub full_name: String,
    pub email: String,
    pub dob: String,
    pub phone: String,
    pub profile_url: String,
    pub job_title: String,
    pub location: String,
    pub connection_degree: String,
}

impl ProfileSummary {
    #[must_use]
    pub fn from_record(record: &ProfileRecord) -> Self {
        let contact = |key: &str| record.contact_info.get(key).cloned().unwrap_or_default();
        Self {
            full_name: record.full_name.clone(),
            email: contact("email"),
            dob: contact("dob"),
            phone: contact("phone"),
            profile_url: record.profile_url.clone(),
            job_title: record.job_title.clone(),
            location: record.location.clone(),
            connection_degree: record.connection_degree.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn vip_classification_by_degree_and_badge() {
        let mut record = ProfileRecord {
            connection_degree: "2nd".to_string(),
            ..ProfileRecord::default()
        };
        assert!(!record.is_vip());

        record.connection_degree = "1st".to_string();
        assert!(record.is_vip());

        record.connection_degree = "3rd".to_string();
        record.premium_badge = true;
        assert!(record.is_vip());
    }

    #[test]
    fn summary_pulls_contact_fields_when_present() {
        let mut record = ProfileRecord {
            full_name: "Ada Lovelace".to_string(),
            profile_url: "https://example.com/in/ada".to_string(),
            ..ProfileRecord::default()
        };
        record
            .contact_info
            .insert("email".to_string(), "ada@example.com".to_string());

        let summary = ProfileSummary::from_record(&record);
        assert_eq!(summary.email, "ada@example.com");
        assert_eq!(summary.phone, "");
        assert_eq!(summary.full_name, "Ada Lovelace");
    }
}
