use async_trait::async_trait;
use lnf_client::{ApiClient, RequestFailure};
use lnf_core::LocationOption;

/// A fetch request for one level, built from its prerequisites' values.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum LocationQuery {
    Countries,
    States { country: String },
    Cities { country: String, state: String },
}

impl LocationQuery {
    /// Message recorded on the level when this fetch fails.
    #[must_use]
    pub fn failure_message(&self) -> String {
        match self {
            Self::Countries => "Could not load countries.".to_string(),
            Self::States { country } => format!("Could not load states for {country}."),
            Self::Cities { state, .. } => format!("Could not load cities for {state}."),
        }
    }
}

/// Where option lists come from.
#[async_trait]
pub trait LocationSource: Send + Sync + 'static {
    async fn fetch(&self, query: &LocationQuery) -> Result<Vec<LocationOption>, RequestFailure>;
}

#[async_trait]
impl LocationSource for ApiClient {
    async fn fetch(&self, query: &LocationQuery) -> Result<Vec<LocationOption>, RequestFailure> {
        match query {
            LocationQuery::Countries => self.get_countries().await,
            LocationQuery::States { country } => self.get_states(country).await,
            LocationQuery::Cities { country, state } => self.get_cities(country, state).await,
        }
    }
}
