use serde::{Deserialize, Serialize};

/// A selectable country, state or city as served by `/locations/*`.
///
/// The location endpoints return whole database documents; everything but the
/// identifier and the display name is ignored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LocationOption {
    #[serde(
        rename = "_id",
        alias = "id",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub id: Option<String>,
    pub name: String,
}

impl LocationOption {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: None,
            name: name.into(),
        }
    }

    pub fn with_id(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: Some(id.into()),
            name: name.into(),
        }
    }

    /// Rendering key: the id when present, otherwise the name.
    #[must_use]
    pub fn key(&self) -> &str {
        self.id.as_deref().unwrap_or(&self.name)
    }
}

/// The effective country/state/city triple.
///
/// An empty string means "nothing selected" at that level. Construction
/// always enforces the dependency chain: a state needs a country and a city
/// needs a state, so lower levels are dropped when a higher one is empty.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "RawSelection")]
pub struct LocationSelection {
    country: String,
    state: String,
    city: String,
}

#[derive(Deserialize)]
struct RawSelection {
    #[serde(default)]
    country: Option<String>,
    #[serde(default)]
    state: Option<String>,
    #[serde(default)]
    city: Option<String>,
}

impl From<RawSelection> for LocationSelection {
    fn from(raw: RawSelection) -> Self {
        Self::from_parts(
            raw.country.as_deref(),
            raw.state.as_deref(),
            raw.city.as_deref(),
        )
    }
}

impl LocationSelection {
    #[must_use]
    pub fn empty() -> Self {
        Self::default()
    }

    /// Builds a selection from optional parts, trimming whitespace and
    /// dropping any level whose parent is empty.
    #[must_use]
    pub fn from_parts(country: Option<&str>, state: Option<&str>, city: Option<&str>) -> Self {
        let clean = |v: Option<&str>| v.map(str::trim).unwrap_or_default().to_string();
        let country = clean(country);
        let state = if country.is_empty() {
            String::new()
        } else {
            clean(state)
        };
        let city = if state.is_empty() {
            String::new()
        } else {
            clean(city)
        };
        Self {
            country,
            state,
            city,
        }
    }

    #[must_use]
    pub fn country(&self) -> &str {
        &self.country
    }

    #[must_use]
    pub fn state(&self) -> &str {
        &self.state
    }

    #[must_use]
    pub fn city(&self) -> &str {
        &self.city
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.country.is_empty()
    }

    /// Human-readable `city, state, country`, skipping empty levels.
    /// Returns `None` when nothing is selected.
    #[must_use]
    pub fn label(&self) -> Option<String> {
        let parts: Vec<&str> = [self.city.as_str(), self.state.as_str(), self.country.as_str()]
            .into_iter()
            .filter(|p| !p.is_empty())
            .collect();
        if parts.is_empty() {
            None
        } else {
            Some(parts.join(", "))
        }
    }
}

impl std::fmt::Display for LocationSelection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.label() {
            Some(label) => f.write_str(&label),
            None => f.write_str("N/A"),
        }
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn option_key_prefers_id() {
        assert_eq!(LocationOption::with_id("42", "Wonderland").key(), "42");
        assert_eq!(LocationOption::new("Wonderland").key(), "Wonderland");
    }

    #[test]
    fn option_reads_database_document() {
        let raw = json!({
            "_id": "65f0c0ffee",
            "name": "Lookingglass",
            "country_name": "Wonderland",
            "iso2": "LG"
        });
        let option: LocationOption = serde_json::from_value(raw).unwrap();
        assert_eq!(option.id.as_deref(), Some("65f0c0ffee"));
        assert_eq!(option.name, "Lookingglass");
    }

    #[test]
    fn option_without_id_is_accepted() {
        let option: LocationOption = serde_json::from_value(json!({"name": "Tulgey"})).unwrap();
        assert!(option.id.is_none());
    }

    #[test]
    fn from_parts_drops_orphaned_levels() {
        let sel = LocationSelection::from_parts(None, Some("Lookingglass"), Some("Tulgey"));
        assert_eq!(sel, LocationSelection::empty());

        let sel = LocationSelection::from_parts(Some("Wonderland"), Some(" "), Some("Tulgey"));
        assert_eq!(sel.country(), "Wonderland");
        assert_eq!(sel.state(), "");
        assert_eq!(sel.city(), "");
    }

    #[test]
    fn deserialize_enforces_invariant() {
        let sel: LocationSelection =
            serde_json::from_value(json!({"country": "", "state": "Lookingglass", "city": "Tulgey"}))
                .unwrap();
        assert!(sel.is_empty());
        assert_eq!(sel.state(), "");
    }

    #[test]
    fn label_and_display() {
        let sel = LocationSelection::from_parts(Some("Wonderland"), Some("Lookingglass"), None);
        assert_eq!(sel.label().as_deref(), Some("Lookingglass, Wonderland"));
        assert_eq!(LocationSelection::empty().to_string(), "N/A");
    }
}
