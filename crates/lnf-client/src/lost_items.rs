//! Lost-item endpoints: reporting, public views, token-gated management and
//! found-reports against a specific lost item.

use lnf_core::{LostItem, LostItemUpdate, ManagedLostItem};
use reqwest::Method;

use crate::client::{encode_component, is_blank, ApiClient};
use crate::error::RequestFailure;
use crate::payload::{FormPayload, RequestOptions};

impl ApiClient {
    /// Creates a lost-item report from a multipart form (`description`,
    /// `reporter_email`, `date_lost`, optional `product_link`, location and
    /// `images`). The response includes the management token.
    ///
    /// # Errors
    ///
    /// Returns [`RequestFailure`] on any pipeline failure.
    pub async fn create_lost_item(&self, form: FormPayload) -> Result<ManagedLostItem, RequestFailure> {
        self.execute_json("/items", RequestOptions::form(Method::POST, form))
            .await
    }

    /// Fetches the public view of a lost item.
    ///
    /// # Errors
    ///
    /// Returns [`RequestFailure::Validation`] without a request when
    /// `item_id` is blank, otherwise any pipeline failure.
    pub async fn get_public_item(&self, item_id: &str) -> Result<LostItem, RequestFailure> {
        if is_blank(item_id) {
            return Err(RequestFailure::validation(
                "Item ID is required for public view.",
            ));
        }
        let endpoint = format!("/items/{}", encode_component(item_id));
        self.execute_json(&endpoint, RequestOptions::get()).await
    }

    /// Lists public lost items, newest first.
    ///
    /// # Errors
    ///
    /// Returns [`RequestFailure`] on any pipeline failure.
    pub async fn list_public_items(&self, skip: u32, limit: u32) -> Result<Vec<LostItem>, RequestFailure> {
        let endpoint = format!("/items?skip={skip}&limit={limit}");
        let items: Option<Vec<LostItem>> = self.execute_json(&endpoint, RequestOptions::get()).await?;
        Ok(items.unwrap_or_default())
    }

    /// Fetches the full record of a lost item for its owner.
    ///
    /// # Errors
    ///
    /// Returns [`RequestFailure::Validation`] without a request when the id
    /// or token is blank, otherwise any pipeline failure (403 for a wrong
    /// token, 404 for an unknown item).
    pub async fn get_item_for_management(
        &self,
        item_id: &str,
        token: &str,
    ) -> Result<ManagedLostItem, RequestFailure> {
        if is_blank(item_id) || is_blank(token) {
            return Err(RequestFailure::validation(
                "Item ID and token are required for management view.",
            ));
        }
        let endpoint = manage_endpoint(item_id, token);
        self.execute_json(&endpoint, RequestOptions::get()).await
    }

    /// Applies a partial update to a managed lost item.
    ///
    /// # Errors
    ///
    /// Returns [`RequestFailure::Validation`] without a request when the id
    /// or token is blank, otherwise any pipeline failure.
    pub async fn update_item(
        &self,
        item_id: &str,
        token: &str,
        update: &LostItemUpdate,
    ) -> Result<ManagedLostItem, RequestFailure> {
        if is_blank(item_id) || is_blank(token) {
            return Err(RequestFailure::validation(
                "Item ID and token required for update.",
            ));
        }
        let body = serde_json::to_value(update).map_err(|source| RequestFailure::Decode {
            message: format!("Could not encode update: {source}"),
            source,
        })?;
        let endpoint = manage_endpoint(item_id, token);
        self.execute_json(&endpoint, RequestOptions::json(Method::PUT, body))
            .await
    }

    /// Deletes a managed lost item and its images.
    ///
    /// # Errors
    ///
    /// Returns [`RequestFailure::Validation`] without a request when the id
    /// or token is blank, otherwise any pipeline failure.
    pub async fn delete_item(&self, item_id: &str, token: &str) -> Result<(), RequestFailure> {
        if is_blank(item_id) || is_blank(token) {
            return Err(RequestFailure::validation(
                "Item ID and token required for deletion.",
            ));
        }
        let endpoint = manage_endpoint(item_id, token);
        self.execute(&endpoint, RequestOptions::delete()).await?;
        Ok(())
    }

    /// Submits a found-report against a lost item (`finder_contact`,
    /// optional `finder_description`, `date_found`, `found_*` location and
    /// `finder_images`). The server answers 204 and emails the reporter.
    ///
    /// # Errors
    ///
    /// Returns [`RequestFailure::Validation`] without a request when the id
    /// or `finder_contact` is missing, otherwise any pipeline failure.
    pub async fn notify_found(&self, item_id: &str, form: FormPayload) -> Result<(), RequestFailure> {
        if is_blank(item_id) {
            return Err(RequestFailure::validation(
                "Item ID is required to report it found.",
            ));
        }
        if form.get("finder_contact").is_none_or(is_blank) {
            return Err(RequestFailure::validation("Finder contact is required."));
        }
        let endpoint = format!("/items/{}/found", encode_component(item_id));
        self.execute(&endpoint, RequestOptions::form(Method::POST, form))
            .await?;
        Ok(())
    }
}

fn manage_endpoint(item_id: &str, token: &str) -> String {
    format!(
        "/items/{}/manage?token={}",
        encode_component(item_id),
        encode_component(token)
    )
}
