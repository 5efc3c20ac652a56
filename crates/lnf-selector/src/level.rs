use std::fmt;

/// Placeholder token the form controls submit for "nothing selected".
pub const PLACEHOLDER: &str = "none";

/// One level of the location hierarchy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Level {
    Country,
    State,
    City,
}

impl Level {
    pub const ALL: [Level; 3] = [Level::Country, Level::State, Level::City];

    #[must_use]
    pub fn index(self) -> usize {
        match self {
            Self::Country => 0,
            Self::State => 1,
            Self::City => 2,
        }
    }

    /// The level that depends on this one directly.
    #[must_use]
    pub fn child(self) -> Option<Level> {
        match self {
            Self::Country => Some(Self::State),
            Self::State => Some(Self::City),
            Self::City => None,
        }
    }

    /// Every level below this one, nearest first.
    #[must_use]
    pub fn below(self) -> &'static [Level] {
        match self {
            Self::Country => &[Self::State, Self::City],
            Self::State => &[Self::City],
            Self::City => &[],
        }
    }

    /// Every level above this one, outermost first.
    #[must_use]
    pub fn prerequisites(self) -> &'static [Level] {
        match self {
            Self::Country => &[],
            Self::State => &[Self::Country],
            Self::City => &[Self::Country, Self::State],
        }
    }

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Country => "country",
            Self::State => "state",
            Self::City => "city",
        }
    }
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Lifecycle of a level's option list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LevelStatus {
    /// Prerequisites unmet; no options.
    #[default]
    Idle,
    Loading,
    Ready,
    Failed,
}

/// A value submitted for a level.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Choice {
    /// Nothing selected. Choosing it clears the level.
    Placeholder,
    Value(String),
}

impl Choice {
    /// Parses a raw control value. `"none"` and blank input are the
    /// placeholder; anything else is a name, trimmed.
    #[must_use]
    pub fn parse(raw: &str) -> Self {
        let raw = raw.trim();
        if raw.is_empty() || raw == PLACEHOLDER {
            Self::Placeholder
        } else {
            Self::Value(raw.to_string())
        }
    }

    #[must_use]
    pub fn as_value(&self) -> Option<&str> {
        match self {
            Self::Placeholder => None,
            Self::Value(v) => Some(v),
        }
    }
}

impl From<&str> for Choice {
    fn from(raw: &str) -> Self {
        Self::parse(raw)
    }
}

impl From<String> for Choice {
    fn from(raw: String) -> Self {
        Self::parse(&raw)
    }
}

impl From<Option<&str>> for Choice {
    fn from(raw: Option<&str>) -> Self {
        raw.map_or(Self::Placeholder, Self::parse)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn placeholder_and_blank_parse_to_placeholder() {
        assert_eq!(Choice::parse("none"), Choice::Placeholder);
        assert_eq!(Choice::parse(""), Choice::Placeholder);
        assert_eq!(Choice::parse("   "), Choice::Placeholder);
        assert_eq!(Choice::from(None), Choice::Placeholder);
    }

    #[test]
    fn values_are_trimmed() {
        assert_eq!(
            Choice::parse(" Wonderland "),
            Choice::Value("Wonderland".to_string())
        );
        // Only the exact sentinel is special.
        assert_eq!(Choice::parse("None").as_value(), Some("None"));
    }

    #[test]
    fn level_relations() {
        assert_eq!(Level::Country.below(), &[Level::State, Level::City]);
        assert!(Level::City.below().is_empty());
        assert_eq!(Level::City.prerequisites(), &[Level::Country, Level::State]);
        assert_eq!(Level::City.child(), None);
    }
}
