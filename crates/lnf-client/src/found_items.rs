//! Standalone found-item endpoints and ownership claims.

use lnf_core::{ClaimRequest, FoundItem};
use reqwest::Method;

use crate::client::{encode_component, is_blank, ApiClient};
use crate::error::RequestFailure;
use crate::payload::{ApiPayload, FormPayload, RequestOptions};

impl ApiClient {
    /// Creates a found-item report. `description` and `date_found` must be
    /// present and non-empty; both are checked before any request is sent.
    ///
    /// # Errors
    ///
    /// Returns [`RequestFailure::Validation`] for a missing description or
    /// date, otherwise any pipeline failure.
    pub async fn create_found_item(&self, form: FormPayload) -> Result<FoundItem, RequestFailure> {
        if form.get("description").is_none_or(is_blank) {
            return Err(RequestFailure::validation("Description is required."));
        }
        if form.get("date_found").is_none_or(is_blank) {
            return Err(RequestFailure::validation("Date found is required."));
        }
        self.execute_json("/found-items", RequestOptions::form(Method::POST, form))
            .await
    }

    /// Lists public found items, newest first.
    ///
    /// # Errors
    ///
    /// Returns [`RequestFailure`] on any pipeline failure.
    pub async fn list_public_found_items(
        &self,
        skip: u32,
        limit: u32,
    ) -> Result<Vec<FoundItem>, RequestFailure> {
        let endpoint = format!("/found-items?skip={skip}&limit={limit}");
        let items: Option<Vec<FoundItem>> =
            self.execute_json(&endpoint, RequestOptions::get()).await?;
        Ok(items.unwrap_or_default())
    }

    /// Fetches the public view of a found item.
    ///
    /// # Errors
    ///
    /// Returns [`RequestFailure::Validation`] without a request when
    /// `item_id` is blank, otherwise any pipeline failure.
    pub async fn get_public_found_item(&self, item_id: &str) -> Result<FoundItem, RequestFailure> {
        if is_blank(item_id) {
            return Err(RequestFailure::validation(
                "Item ID is required for public view.",
            ));
        }
        let endpoint = format!("/found-items/{}", encode_component(item_id));
        self.execute_json(&endpoint, RequestOptions::get()).await
    }

    /// Submits an ownership claim on a found item. The response shape is
    /// not fixed by the server, so the raw payload is returned.
    ///
    /// # Errors
    ///
    /// Returns [`RequestFailure::Validation`] without a request when the id,
    /// email or description is blank, otherwise any pipeline failure.
    pub async fn claim_found_item(
        &self,
        item_id: &str,
        claim: &ClaimRequest,
    ) -> Result<ApiPayload, RequestFailure> {
        if is_blank(item_id) {
            return Err(RequestFailure::validation("Item ID is required to claim it."));
        }
        if is_blank(&claim.owner_email) || is_blank(&claim.owner_description) {
            return Err(RequestFailure::validation(
                "Owner email and description are required for a claim.",
            ));
        }
        let body = serde_json::to_value(claim).map_err(|source| RequestFailure::Decode {
            message: format!("Could not encode claim: {source}"),
            source,
        })?;
        let endpoint = format!("/found-items/{}/claim", encode_component(item_id));
        self.execute(&endpoint, RequestOptions::json(Method::POST, body))
            .await
    }
}
