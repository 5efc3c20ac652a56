//! Lost-item and found-item records as the reporting API returns them.
//!
//! Identifiers arrive under `_id`; `id` is accepted as well. Timestamps are
//! emitted by the server without an offset and are read as UTC.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::location::LocationSelection;

/// Upper bound on images attached to a single report.
pub const MAX_IMAGES: usize = 5;

/// Page size used by the list endpoints when the caller does not pick one.
pub const DEFAULT_PAGE_LIMIT: u32 = 10;

/// Public view of a lost-item report.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LostItem {
    #[serde(rename = "_id", alias = "id")]
    pub id: String,
    pub description: String,
    #[serde(with = "timestamp")]
    pub date_lost: DateTime<Utc>,
    #[serde(default)]
    pub product_link: Option<String>,
    #[serde(default)]
    pub image_filenames: Vec<String>,
    #[serde(default)]
    pub country: Option<String>,
    #[serde(default)]
    pub state: Option<String>,
    #[serde(default)]
    pub city: Option<String>,
    #[serde(with = "timestamp")]
    pub created_at: DateTime<Utc>,
}

impl LostItem {
    #[must_use]
    pub fn location(&self) -> LocationSelection {
        LocationSelection::from_parts(
            self.country.as_deref(),
            self.state.as_deref(),
            self.city.as_deref(),
        )
    }
}

/// Details a finder attached when reporting a specific lost item as found.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FoundReport {
    pub finder_contact: String,
    #[serde(default)]
    pub finder_description: Option<String>,
    #[serde(default, with = "timestamp::option")]
    pub date_found: Option<DateTime<Utc>>,
    #[serde(default)]
    pub found_country: Option<String>,
    #[serde(default)]
    pub found_state: Option<String>,
    #[serde(default)]
    pub found_city: Option<String>,
    #[serde(default)]
    pub finder_image_filenames: Vec<String>,
}

impl FoundReport {
    #[must_use]
    pub fn location(&self) -> LocationSelection {
        LocationSelection::from_parts(
            self.found_country.as_deref(),
            self.found_state.as_deref(),
            self.found_city.as_deref(),
        )
    }
}

/// Full record returned to the holder of a management token.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ManagedLostItem {
    #[serde(flatten)]
    pub item: LostItem,
    pub reporter_email: String,
    pub management_token: String,
    #[serde(default)]
    pub found_by_contact: Option<String>,
    #[serde(default, with = "timestamp::option")]
    pub found_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub found_reports: Vec<FoundReport>,
}

/// Public view of a standalone found-item report.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FoundItem {
    #[serde(rename = "_id", alias = "id")]
    pub id: String,
    pub description: String,
    #[serde(with = "timestamp")]
    pub date_found: DateTime<Utc>,
    #[serde(default)]
    pub country: Option<String>,
    #[serde(default)]
    pub state: Option<String>,
    #[serde(default)]
    pub city: Option<String>,
    #[serde(default)]
    pub image_filenames: Vec<String>,
    #[serde(with = "timestamp")]
    pub created_at: DateTime<Utc>,
}

impl FoundItem {
    #[must_use]
    pub fn location(&self) -> LocationSelection {
        LocationSelection::from_parts(
            self.country.as_deref(),
            self.state.as_deref(),
            self.city.as_deref(),
        )
    }
}

/// Partial update for a managed lost item. Unset fields are left out of the
/// request body so the server keeps their current values.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LostItemUpdate {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date_lost: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub product_link: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub country: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub state: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub city: Option<String>,
}

impl LostItemUpdate {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    /// Replaces all three location fields with the given selection.
    ///
    /// Empty levels are sent as empty strings so a cleared city actually
    /// clears the stored one.
    #[must_use]
    pub fn with_location(mut self, selection: &LocationSelection) -> Self {
        self.country = Some(selection.country().to_string());
        self.state = Some(selection.state().to_string());
        self.city = Some(selection.city().to_string());
        self
    }
}

/// Ownership claim on a found item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClaimRequest {
    pub owner_email: String,
    pub owner_description: String,
}

/// Serde helpers for the server's timestamp format.
///
/// Accepts RFC 3339 and offset-less ISO 8601 (`2025-01-15T10:00:00.123456`),
/// writes RFC 3339.
pub mod timestamp {
    use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
    use serde::{Deserialize, Deserializer, Serializer};

    /// Parses a server timestamp, treating an offset-less value as UTC.
    #[must_use]
    pub fn parse(raw: &str) -> Option<DateTime<Utc>> {
        let raw = raw.trim();
        if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
            return Some(dt.with_timezone(&Utc));
        }
        if let Ok(naive) = NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f") {
            return Some(naive.and_utc());
        }
        NaiveDate::parse_from_str(raw, "%Y-%m-%d")
            .ok()
            .and_then(|d| d.and_hms_opt(0, 0, 0))
            .map(|naive| naive.and_utc())
    }

    pub fn serialize<S: Serializer>(value: &DateTime<Utc>, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&value.to_rfc3339())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<DateTime<Utc>, D::Error> {
        let raw = String::deserialize(deserializer)?;
        parse(&raw).ok_or_else(|| serde::de::Error::custom(format!("invalid timestamp \"{raw}\"")))
    }

    pub mod option {
        use chrono::{DateTime, Utc};
        use serde::{Deserialize, Deserializer, Serializer};

        #[allow(clippy::ref_option)]
        pub fn serialize<S: Serializer>(
            value: &Option<DateTime<Utc>>,
            serializer: S,
        ) -> Result<S::Ok, S::Error> {
            match value {
                Some(dt) => serializer.serialize_some(&dt.to_rfc3339()),
                None => serializer.serialize_none(),
            }
        }

        pub fn deserialize<'de, D: Deserializer<'de>>(
            deserializer: D,
        ) -> Result<Option<DateTime<Utc>>, D::Error> {
            let raw = Option::<String>::deserialize(deserializer)?;
            match raw {
                None => Ok(None),
                Some(s) => super::parse(&s)
                    .map(Some)
                    .ok_or_else(|| serde::de::Error::custom(format!("invalid timestamp \"{s}\""))),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use chrono::{Datelike, Timelike};
    use serde_json::json;

    use super::*;

    #[test]
    fn lost_item_reads_underscore_id_and_naive_timestamps() {
        let raw = json!({
            "_id": "0b5c6b0e-7f5e-4bd0-9a55-2d4f1b0a1c11",
            "description": "Black leather wallet with a red stripe",
            "date_lost": "2025-03-02T14:30:00",
            "product_link": null,
            "image_filenames": ["a.jpg"],
            "country": "Wonderland",
            "state": null,
            "city": null,
            "created_at": "2025-03-03T08:00:00.123456"
        });
        let item: LostItem = serde_json::from_value(raw).expect("lost item should parse");
        assert_eq!(item.id, "0b5c6b0e-7f5e-4bd0-9a55-2d4f1b0a1c11");
        assert_eq!(item.date_lost.day(), 2);
        assert_eq!(item.date_lost.hour(), 14);
        assert_eq!(item.image_filenames, vec!["a.jpg".to_string()]);
        assert_eq!(item.location().country(), "Wonderland");
        assert_eq!(item.location().state(), "");
    }

    #[test]
    fn found_item_accepts_plain_id_and_rfc3339() {
        let raw = json!({
            "id": "f-1",
            "description": "Blue umbrella near the fountain",
            "date_found": "2025-04-01T09:00:00Z",
            "created_at": "2025-04-01T10:00:00+02:00"
        });
        let item: FoundItem = serde_json::from_value(raw).unwrap();
        assert_eq!(item.id, "f-1");
        assert!(item.image_filenames.is_empty());
        assert_eq!(item.created_at.hour(), 8);
    }

    #[test]
    fn managed_item_flattens_public_fields() {
        let raw = json!({
            "_id": "item-1",
            "description": "Silver ring engraved with initials",
            "reporter_email": "alice@example.com",
            "date_lost": "2025-01-10T00:00:00",
            "image_filenames": [],
            "management_token": "tok-123",
            "created_at": "2025-01-11T00:00:00",
            "found_by_contact": null,
            "found_at": null,
            "found_reports": [{
                "finder_contact": "bob@example.com",
                "date_found": "2025-01-12T12:00:00",
                "found_city": "Tulgey Wood",
                "finder_image_filenames": []
            }]
        });
        let managed: ManagedLostItem = serde_json::from_value(raw).unwrap();
        assert_eq!(managed.item.id, "item-1");
        assert_eq!(managed.management_token, "tok-123");
        assert_eq!(managed.found_reports.len(), 1);
        assert!(managed.found_reports[0].date_found.is_some());
        assert_eq!(managed.found_reports[0].location().city(), "");
    }

    #[test]
    fn invalid_timestamp_is_rejected() {
        let raw = json!({
            "_id": "x",
            "description": "Anything at all here",
            "date_found": "yesterday",
            "created_at": "2025-04-01T10:00:00"
        });
        assert!(serde_json::from_value::<FoundItem>(raw).is_err());
    }

    #[test]
    fn update_skips_unset_fields() {
        let update = LostItemUpdate {
            description: Some("Updated description text".to_string()),
            ..LostItemUpdate::default()
        };
        let body = serde_json::to_value(&update).unwrap();
        assert_eq!(body, json!({"description": "Updated description text"}));
    }

    #[test]
    fn update_with_location_sends_cleared_levels() {
        let selection = LocationSelection::from_parts(Some("Wonderland"), None, None);
        let body = serde_json::to_value(LostItemUpdate::default().with_location(&selection)).unwrap();
        assert_eq!(
            body,
            json!({"country": "Wonderland", "state": "", "city": ""})
        );
    }

    #[test]
    fn default_update_is_empty() {
        assert!(LostItemUpdate::default().is_empty());
    }

    #[test]
    fn timestamp_parse_accepts_bare_date() {
        let dt = timestamp::parse("2025-06-30").expect("date should parse");
        assert_eq!((dt.month(), dt.day(), dt.hour()), (6, 30, 0));
    }
}
