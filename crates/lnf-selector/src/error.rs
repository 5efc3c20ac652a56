use thiserror::Error;

use crate::level::Level;

/// Why a level currently refuses a new value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DisabledReason {
    /// A level above has nothing selected.
    MissingPrerequisite,
    /// A level above holds a value whose option list failed to load, so the
    /// value is unconfirmed.
    PrerequisiteFailed,
    /// Options are being fetched.
    Loading,
    /// The option list is empty (never loaded, failed or empty response).
    NoOptions,
}

impl std::fmt::Display for DisabledReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            Self::MissingPrerequisite => "a parent level has no selection",
            Self::PrerequisiteFailed => "a parent level failed to load",
            Self::Loading => "options are loading",
            Self::NoOptions => "no options are available",
        })
    }
}

/// Rejected selector input.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SelectorError {
    #[error("{level} is disabled: {reason}")]
    Disabled { level: Level, reason: DisabledReason },

    #[error("\"{value}\" is not a known {level}")]
    UnknownOption { level: Level, value: String },

    /// `retry` on a level whose last fetch did not fail, or whose
    /// prerequisites no longer hold or have failed themselves.
    #[error("{level} has no failed load to retry")]
    NothingToRetry { level: Level },

    #[error("location selector task has stopped")]
    Closed,
}
