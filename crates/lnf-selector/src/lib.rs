//! Dependent country → state → city selection.
//!
//! [`Cascade`] is the synchronous state machine; [`LocationSelector`] runs
//! it on a tokio task and performs the fetches it asks for through a
//! [`LocationSource`].

pub mod cascade;
pub mod driver;
pub mod error;
pub mod level;
pub mod source;

pub use cascade::{Cascade, Fetch, LevelSnapshot, Snapshot};
pub use driver::LocationSelector;
pub use error::{DisabledReason, SelectorError};
pub use level::{Choice, Level, LevelStatus};
pub use source::{LocationQuery, LocationSource};
