//! REST client for the Closetly backend.
//!
//! Wraps the try-on endpoints (submission and status), the catalog
//! listings, and closet management (upload, retype, delete) using
//! [`reqwest`].

use std::time::Duration;

use closetly_core::catalog::{
    ClosetItem, ModelPhoto, UploadedItem, UploadedModel, TYPE_UNKNOWN, UNSPECIFIED,
};
use closetly_core::image::ImagePayload;
use closetly_core::tryon::{JobId, JobStatus};

use crate::config::ClientConfig;
use crate::messages::{
    ItemsResponse, MessageResponse, ModelsResponse, NewItemRequest, NewItemResponse,
    NewModelRequest, NewModelResponse, StatusResponse, SubmitRequest, SubmitResponse,
    UpdateItemTypeRequest,
};

/// HTTP client for one Closetly backend.
pub struct ClosetlyApi {
    client: reqwest::Client,
    base_url: String,
}

/// Errors from the REST API layer.
#[derive(Debug, thiserror::Error)]
pub enum ClosetlyApiError {
    /// The HTTP request itself failed (network, DNS, TLS, timeout, etc.).
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// The backend returned a non-2xx status code.
    #[error("Closetly API error ({status}): {body}")]
    ApiError {
        /// HTTP status code.
        status: u16,
        /// Raw response body for debugging.
        body: String,
    },

    /// The body parsed but did not carry what the endpoint promises.
    #[error("Malformed response: {0}")]
    Malformed(String),

    /// A 2xx response whose body reports a failure (`{"error": ...}`).
    #[error("Closetly backend error: {0}")]
    Backend(String),
}

impl ClosetlyApi {
    /// Create a client for `base_url` (e.g. `http://host:8000`) with a
    /// per-request timeout.
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self, ClosetlyApiError> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self::with_client(client, base_url))
    }

    /// Create a client from loaded configuration.
    pub fn from_config(config: &ClientConfig) -> Result<Self, ClosetlyApiError> {
        Self::new(config.base_url.clone(), config.request_timeout())
    }

    /// Reuse an existing [`reqwest::Client`].
    pub fn with_client(client: reqwest::Client, base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self { client, base_url }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Queue a try-on job.
    ///
    /// Sends `POST /api/tryon` and returns the task id the backend
    /// assigned. A 2xx response without a usable `id` is
    /// [`ClosetlyApiError::Malformed`].
    pub async fn submit_tryon(
        &self,
        model_image: &ImagePayload,
        clothing_image: &ImagePayload,
    ) -> Result<JobId, ClosetlyApiError> {
        let response = self
            .client
            .post(format!("{}/api/tryon", self.base_url))
            .json(&SubmitRequest::new(model_image, clothing_image))
            .send()
            .await?;

        let body: SubmitResponse = Self::parse_response(response).await?;
        body.job_id()
            .ok_or_else(|| ClosetlyApiError::Malformed("no task id returned".to_string()))
    }

    /// Fetch the status of a try-on job.
    ///
    /// Sends `GET /api/tryon/status/{id}`.
    pub async fn get_tryon_status(&self, id: &JobId) -> Result<JobStatus, ClosetlyApiError> {
        let response = self
            .client
            .get(format!("{}/api/tryon/status/{}", self.base_url, id))
            .send()
            .await?;

        let body: StatusResponse = Self::parse_response(response).await?;
        body.into_status().map_err(ClosetlyApiError::Malformed)
    }

    /// List clothing items including their base64 payloads.
    ///
    /// Sends `GET /api/items/full`.
    pub async fn list_items(&self) -> Result<Vec<ClosetItem>, ClosetlyApiError> {
        let response = self
            .client
            .get(format!("{}/api/items/full", self.base_url))
            .send()
            .await?;

        let body: ItemsResponse = Self::parse_response(response).await?;
        Ok(body.items)
    }

    /// List model photos including their base64 payloads.
    ///
    /// Sends `GET /api/models/full`.
    pub async fn list_models(&self) -> Result<Vec<ModelPhoto>, ClosetlyApiError> {
        let response = self
            .client
            .get(format!("{}/api/models/full", self.base_url))
            .send()
            .await?;

        let body: ModelsResponse = Self::parse_response(response).await?;
        Ok(body.models)
    }

    /// Add a clothing item to the closet.
    ///
    /// Sends `POST /api/items`. With `item_type` of `None` the item is sent
    /// as [`TYPE_UNKNOWN`] and the backend classifies it; the returned
    /// [`UploadedItem`] carries the stored type.
    pub async fn upload_item(
        &self,
        name: &str,
        image: &ImagePayload,
        item_type: Option<&str>,
    ) -> Result<UploadedItem, ClosetlyApiError> {
        let item_type = item_type.unwrap_or(TYPE_UNKNOWN);
        let response = self
            .client
            .post(format!("{}/api/items", self.base_url))
            .json(&NewItemRequest {
                name,
                image_base64: image.as_str(),
                image_url: "",
                item_type,
            })
            .send()
            .await?;

        let body: NewItemResponse = Self::parse_response(response).await?;
        body.into_uploaded(item_type).map_err(|err| match err {
            Some(msg) => ClosetlyApiError::Backend(msg),
            None => ClosetlyApiError::Malformed("no item id returned".to_string()),
        })
    }

    /// Change the stored type of an item.
    ///
    /// Sends `PUT /api/items/{id}`. The backend acknowledges unknown ids
    /// with "No changes made", which is not an error here.
    pub async fn update_item_type(
        &self,
        id: &str,
        item_type: &str,
    ) -> Result<(), ClosetlyApiError> {
        let response = self
            .client
            .put(format!("{}/api/items/{}", self.base_url, id))
            .json(&UpdateItemTypeRequest { item_type })
            .send()
            .await?;

        let body: MessageResponse = Self::parse_response(response).await?;
        match body.error {
            Some(error) => Err(ClosetlyApiError::Backend(error)),
            None => Ok(()),
        }
    }

    /// Remove an item from the closet.
    ///
    /// Sends `DELETE /api/items/{id}`; an unknown id is a 404
    /// [`ClosetlyApiError::ApiError`].
    pub async fn delete_item(&self, id: &str) -> Result<(), ClosetlyApiError> {
        let response = self
            .client
            .delete(format!("{}/api/items/{}", self.base_url, id))
            .send()
            .await?;

        Self::ensure_success(response).await?;
        Ok(())
    }

    /// Add a model photo.
    ///
    /// Sends `POST /api/models`. Missing `gender`/`style` are sent as
    /// [`UNSPECIFIED`].
    pub async fn upload_model_photo(
        &self,
        name: &str,
        image: &ImagePayload,
        gender: Option<&str>,
        style: Option<&str>,
    ) -> Result<UploadedModel, ClosetlyApiError> {
        let response = self
            .client
            .post(format!("{}/api/models", self.base_url))
            .json(&NewModelRequest {
                name,
                image_base64: image.as_str(),
                gender: gender.unwrap_or(UNSPECIFIED),
                style: style.unwrap_or(UNSPECIFIED),
            })
            .send()
            .await?;

        let body: NewModelResponse = Self::parse_response(response).await?;
        body.into_uploaded()
            .ok_or_else(|| ClosetlyApiError::Malformed("no model id returned".to_string()))
    }

    /// Remove a model photo.
    ///
    /// Sends `DELETE /api/model/{id}` (singular path, unlike the listing).
    pub async fn delete_model_photo(&self, id: &str) -> Result<(), ClosetlyApiError> {
        let response = self
            .client
            .delete(format!("{}/api/model/{}", self.base_url, id))
            .send()
            .await?;

        Self::ensure_success(response).await?;
        Ok(())
    }

    // ---- private helpers ----

    /// Ensure the response has a success status code. Returns the
    /// response unchanged on success, or a [`ClosetlyApiError::ApiError`]
    /// containing the status and body text on failure.
    async fn ensure_success(
        response: reqwest::Response,
    ) -> Result<reqwest::Response, ClosetlyApiError> {
        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "<unreadable body>".to_string());
            return Err(ClosetlyApiError::ApiError {
                status: status.as_u16(),
                body,
            });
        }
        Ok(response)
    }

    /// Parse a successful JSON response body into the expected type.
    async fn parse_response<T: serde::de::DeserializeOwned>(
        response: reqwest::Response,
    ) -> Result<T, ClosetlyApiError> {
        let response = Self::ensure_success(response).await?;
        let bytes = response.bytes().await?;
        serde_json::from_slice(&bytes).map_err(|e| ClosetlyApiError::Malformed(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn trailing_slash_is_trimmed_from_base_url() {
        let api = ClosetlyApi::with_client(reqwest::Client::new(), "http://localhost:8000/");
        assert_eq!(api.base_url(), "http://localhost:8000");
    }

    #[test]
    fn api_error_display_includes_status_and_body() {
        let err = ClosetlyApiError::ApiError {
            status: 500,
            body: "Try-on failed".to_string(),
        };
        assert_eq!(err.to_string(), "Closetly API error (500): Try-on failed");
    }
}
