//! Country, state and city option lists.

use lnf_core::LocationOption;

use crate::client::{encode_component, is_blank, ApiClient};
use crate::error::RequestFailure;
use crate::payload::RequestOptions;

impl ApiClient {
    /// Lists all countries.
    ///
    /// # Errors
    ///
    /// Returns [`RequestFailure`] on any pipeline failure.
    pub async fn get_countries(&self) -> Result<Vec<LocationOption>, RequestFailure> {
        self.location_list("/locations/countries").await
    }

    /// Lists the states of `country`.
    ///
    /// # Errors
    ///
    /// Returns [`RequestFailure::Validation`] without a request when
    /// `country` is blank, otherwise any pipeline failure (404 when the
    /// server knows no states for it).
    pub async fn get_states(&self, country: &str) -> Result<Vec<LocationOption>, RequestFailure> {
        if is_blank(country) {
            return Err(RequestFailure::validation(
                "Country name is required to fetch states.",
            ));
        }
        let endpoint = format!("/locations/states?country={}", encode_component(country));
        self.location_list(&endpoint).await
    }

    /// Lists the cities of `state` in `country`.
    ///
    /// # Errors
    ///
    /// Returns [`RequestFailure::Validation`] without a request when either
    /// name is blank, otherwise any pipeline failure.
    pub async fn get_cities(
        &self,
        country: &str,
        state: &str,
    ) -> Result<Vec<LocationOption>, RequestFailure> {
        if is_blank(country) || is_blank(state) {
            return Err(RequestFailure::validation(
                "Country and state names are required to fetch cities.",
            ));
        }
        let endpoint = format!(
            "/locations/cities?country={}&state={}",
            encode_component(country),
            encode_component(state)
        );
        self.location_list(&endpoint).await
    }

    /// A `null` or empty body is an empty list.
    async fn location_list(&self, endpoint: &str) -> Result<Vec<LocationOption>, RequestFailure> {
        let options: Option<Vec<LocationOption>> =
            self.execute_json(endpoint, RequestOptions::get()).await?;
        Ok(options.unwrap_or_default())
    }
}
