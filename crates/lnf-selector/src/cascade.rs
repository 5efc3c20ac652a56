//! The dependent-select state machine.
//!
//! All three levels share one mechanism. A level can load once every level
//! above it has a selection; loading a level clears it and everything below
//! it. Each dispatched fetch carries the level's sequence number, and a
//! completion is applied only if that number is still the latest, so a slow
//! response for a superseded parent value never overwrites newer options.
//!
//! The machine performs no I/O. Callers run the [`Fetch`]es it returns and
//! feed the results back through [`Cascade::complete`].

use lnf_client::RequestFailure;
use lnf_core::{LocationOption, LocationSelection};

use crate::error::{DisabledReason, SelectorError};
use crate::level::{Choice, Level, LevelStatus};
use crate::source::LocationQuery;

/// A fetch the machine wants performed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Fetch {
    pub level: Level,
    pub seq: u64,
    pub query: LocationQuery,
}

#[derive(Debug, Clone, Default)]
struct LevelState {
    status: LevelStatus,
    options: Vec<LocationOption>,
    selected: String,
    error: Option<String>,
    // Order in which errors were recorded, for `latest_error`.
    error_stamp: u64,
    seq: u64,
    // A pre-filled value not yet checked against a loaded option list.
    hydrating: bool,
}

impl LevelState {
    fn has_option(&self, name: &str) -> bool {
        self.options.iter().any(|o| o.name == name)
    }

    /// Back to `Idle` with nothing selected. Bumps the sequence so any
    /// in-flight fetch for this level is ignored.
    fn reset(&mut self) {
        self.seq += 1;
        self.status = LevelStatus::Idle;
        self.options.clear();
        self.selected.clear();
        self.error = None;
        self.hydrating = false;
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct LevelSnapshot {
    pub status: LevelStatus,
    pub options: Vec<LocationOption>,
    pub selected: String,
    pub error: Option<String>,
    pub disabled: bool,
}

impl LevelSnapshot {
    #[must_use]
    pub fn option_names(&self) -> Vec<&str> {
        self.options.iter().map(|o| o.name.as_str()).collect()
    }
}

/// Point-in-time view of the whole selector.
#[derive(Debug, Clone, PartialEq)]
pub struct Snapshot {
    pub selection: LocationSelection,
    pub country: LevelSnapshot,
    pub state: LevelSnapshot,
    pub city: LevelSnapshot,
    pub latest_error: Option<String>,
}

impl Snapshot {
    #[must_use]
    pub fn level(&self, level: Level) -> &LevelSnapshot {
        match level {
            Level::Country => &self.country,
            Level::State => &self.state,
            Level::City => &self.city,
        }
    }

    /// True when no level is loading.
    #[must_use]
    pub fn is_settled(&self) -> bool {
        Level::ALL
            .iter()
            .all(|&l| self.level(l).status != LevelStatus::Loading)
    }
}

#[derive(Debug, Clone, Default)]
pub struct Cascade {
    levels: [LevelState; 3],
    error_clock: u64,
    last_emitted: Option<LocationSelection>,
    mounted: bool,
}

impl Cascade {
    /// Creates a machine pre-filled with `initial`. Pre-filled values are
    /// kept while their option lists load and dropped if they turn out not
    /// to be among the options.
    #[must_use]
    pub fn new(initial: &LocationSelection) -> Self {
        let mut cascade = Self::default();
        for (level, value) in [
            (Level::Country, initial.country()),
            (Level::State, initial.state()),
            (Level::City, initial.city()),
        ] {
            let state = cascade.level_mut(level);
            state.selected = value.to_string();
            state.hydrating = !value.is_empty();
        }
        cascade
    }

    /// Starts the initial loads: countries unconditionally, and states and
    /// cities when the pre-filled selection already satisfies them.
    /// Calling it again does nothing.
    pub fn mount(&mut self) -> Vec<Fetch> {
        if self.mounted {
            return Vec::new();
        }
        self.mounted = true;
        Level::ALL
            .iter()
            .filter_map(|&level| self.begin_load(level))
            .collect()
    }

    /// Applies a user choice to `level`.
    ///
    /// Choosing the placeholder clears the level and is always accepted. A
    /// value is accepted only while the level is enabled and only if it is
    /// one of the loaded options; accepting a new value starts the load of
    /// the level below.
    ///
    /// # Errors
    ///
    /// Returns [`SelectorError::Disabled`] or [`SelectorError::UnknownOption`];
    /// the state is unchanged in both cases.
    pub fn select(&mut self, level: Level, choice: &Choice) -> Result<Vec<Fetch>, SelectorError> {
        let Some(value) = choice.as_value() else {
            self.clear(level);
            return Ok(Vec::new());
        };
        if let Some(reason) = self.disabled_reason(level) {
            return Err(SelectorError::Disabled { level, reason });
        }
        let state = self.level_mut(level);
        if !state.has_option(value) {
            return Err(SelectorError::UnknownOption {
                level,
                value: value.to_string(),
            });
        }
        if state.selected == value {
            return Ok(Vec::new());
        }
        state.selected = value.to_string();
        state.hydrating = false;
        for &below in level.below() {
            self.level_mut(below).hydrating = false;
        }
        Ok(level
            .child()
            .and_then(|child| self.begin_load(child))
            .into_iter()
            .collect())
    }

    /// Clears `level` and resets every level below it to `Idle`.
    pub fn clear(&mut self, level: Level) {
        let state = self.level_mut(level);
        state.selected.clear();
        state.hydrating = false;
        for &below in level.below() {
            self.level_mut(below).reset();
        }
    }

    /// Re-dispatches the fetch of a failed level.
    ///
    /// # Errors
    ///
    /// Returns [`SelectorError::NothingToRetry`] unless `level` is `Failed`
    /// and its prerequisites still hold. A level under a failed parent is
    /// retried by retrying the parent.
    pub fn retry(&mut self, level: Level) -> Result<Fetch, SelectorError> {
        let parent_failed = level
            .prerequisites()
            .iter()
            .any(|&p| self.level_ref(p).status == LevelStatus::Failed);
        if parent_failed || self.level_ref(level).status != LevelStatus::Failed {
            return Err(SelectorError::NothingToRetry { level });
        }
        self.begin_load(level)
            .ok_or(SelectorError::NothingToRetry { level })
    }

    /// Applies the result of `fetch`. Returns `false` when the result was
    /// discarded because a newer fetch for the level has been dispatched.
    pub fn complete(
        &mut self,
        fetch: &Fetch,
        result: Result<Vec<LocationOption>, RequestFailure>,
    ) -> bool {
        let level = fetch.level;
        let state = self.level_ref(level);
        if fetch.seq != state.seq || state.status != LevelStatus::Loading {
            tracing::debug!(
                %level,
                seq = fetch.seq,
                latest = state.seq,
                "discarding stale location response"
            );
            return false;
        }

        match result {
            Ok(options) => {
                let state = self.level_mut(level);
                state.status = LevelStatus::Ready;
                state.options = options;
                if state.hydrating {
                    state.hydrating = false;
                    if !state.selected.is_empty() && !state.has_option(&state.selected) {
                        tracing::debug!(
                            %level,
                            value = %state.selected,
                            "pre-filled value is not among the options; dropping it"
                        );
                        self.clear(level);
                    }
                }
            }
            Err(e) => {
                let message = fetch.query.failure_message();
                tracing::warn!(%level, error = %e, "{message}");
                self.error_clock += 1;
                let stamp = self.error_clock;
                let state = self.level_mut(level);
                state.status = LevelStatus::Failed;
                state.options.clear();
                state.error = Some(message);
                state.error_stamp = stamp;
            }
        }
        true
    }

    /// Returns the current triple if it differs from the last one returned.
    /// The first call after construction always returns it.
    pub fn take_change(&mut self) -> Option<LocationSelection> {
        let current = self.selection();
        if self.last_emitted.as_ref() == Some(&current) {
            return None;
        }
        self.last_emitted = Some(current.clone());
        Some(current)
    }

    #[must_use]
    pub fn selection(&self) -> LocationSelection {
        LocationSelection::from_parts(
            Some(&self.levels[0].selected),
            Some(&self.levels[1].selected),
            Some(&self.levels[2].selected),
        )
    }

    /// Why `level` currently rejects values, or `None` when it accepts them.
    ///
    /// A failed level disables everything below it: a pre-filled value kept
    /// through a failed load was never confirmed against its options.
    #[must_use]
    pub fn disabled_reason(&self, level: Level) -> Option<DisabledReason> {
        let prerequisites = level.prerequisites().iter().map(|&p| self.level_ref(p));
        for parent in prerequisites {
            if parent.selected.is_empty() {
                return Some(DisabledReason::MissingPrerequisite);
            }
            if parent.status == LevelStatus::Failed {
                return Some(DisabledReason::PrerequisiteFailed);
            }
        }
        let state = self.level_ref(level);
        if state.status == LevelStatus::Loading {
            return Some(DisabledReason::Loading);
        }
        if state.options.is_empty() {
            return Some(DisabledReason::NoOptions);
        }
        None
    }

    #[must_use]
    pub fn status(&self, level: Level) -> LevelStatus {
        self.level_ref(level).status
    }

    #[must_use]
    pub fn options(&self, level: Level) -> &[LocationOption] {
        &self.level_ref(level).options
    }

    #[must_use]
    pub fn error(&self, level: Level) -> Option<&str> {
        self.level_ref(level).error.as_deref()
    }

    /// The most recently recorded error still standing on any level.
    #[must_use]
    pub fn latest_error(&self) -> Option<&str> {
        self.levels
            .iter()
            .filter(|s| s.error.is_some())
            .max_by_key(|s| s.error_stamp)
            .and_then(|s| s.error.as_deref())
    }

    #[must_use]
    pub fn is_settled(&self) -> bool {
        self.levels
            .iter()
            .all(|s| s.status != LevelStatus::Loading)
    }

    #[must_use]
    pub fn snapshot(&self) -> Snapshot {
        let view = |level: Level| {
            let state = self.level_ref(level);
            LevelSnapshot {
                status: state.status,
                options: state.options.clone(),
                selected: state.selected.clone(),
                error: state.error.clone(),
                disabled: self.disabled_reason(level).is_some(),
            }
        };
        Snapshot {
            selection: self.selection(),
            country: view(Level::Country),
            state: view(Level::State),
            city: view(Level::City),
            latest_error: self.latest_error().map(str::to_string),
        }
    }

    /// Puts `level` into `Loading` and returns the fetch to run, or `None`
    /// when its prerequisites are unmet.
    ///
    /// A fresh load clears the level's selection and resets every level
    /// below. A level still holding a pre-filled value keeps it, and leaves
    /// the levels below alone.
    fn begin_load(&mut self, level: Level) -> Option<Fetch> {
        let query = self.query_for(level)?;
        let state = self.level_mut(level);
        state.seq += 1;
        state.status = LevelStatus::Loading;
        state.options.clear();
        state.error = None;
        let seq = state.seq;
        if !state.hydrating {
            state.selected.clear();
            for &below in level.below() {
                self.level_mut(below).reset();
            }
        }
        Some(Fetch { level, seq, query })
    }

    fn query_for(&self, level: Level) -> Option<LocationQuery> {
        let country = &self.level_ref(Level::Country).selected;
        let state = &self.level_ref(Level::State).selected;
        match level {
            Level::Country => Some(LocationQuery::Countries),
            Level::State if !country.is_empty() => Some(LocationQuery::States {
                country: country.clone(),
            }),
            Level::City if !country.is_empty() && !state.is_empty() => {
                Some(LocationQuery::Cities {
                    country: country.clone(),
                    state: state.clone(),
                })
            }
            Level::State | Level::City => None,
        }
    }

    fn level_ref(&self, level: Level) -> &LevelState {
        &self.levels[level.index()]
    }

    fn level_mut(&mut self, level: Level) -> &mut LevelState {
        &mut self.levels[level.index()]
    }
}

#[cfg(test)]
#[path = "cascade_test.rs"]
mod tests;
