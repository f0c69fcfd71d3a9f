//! Wire types for the Closetly backend REST API.
//!
//! The backend speaks camelCase JSON for requests and a small ad-hoc shape
//! for try-on status. These types exist only at the HTTP boundary; callers
//! get [`closetly_core`] types back.

use closetly_core::catalog::{ClosetItem, ModelPhoto, UploadedItem, UploadedModel};
use closetly_core::image::ImagePayload;
use closetly_core::tryon::{JobId, JobStatus};
use serde::{Deserialize, Serialize};

/// Status word the backend uses for a finished job.
pub const STATUS_SUCCEEDED: &str = "succeeded";
/// Status word the backend uses for a failed job.
pub const STATUS_FAILED: &str = "failed";

/// Body of `POST /api/tryon`.
#[derive(Debug, Serialize)]
pub struct SubmitRequest<'a> {
    #[serde(rename = "modelBase64")]
    pub model_base64: &'a str,
    #[serde(rename = "clothingBase64")]
    pub clothing_base64: &'a str,
}

impl<'a> SubmitRequest<'a> {
    pub fn new(model_image: &'a ImagePayload, clothing_image: &'a ImagePayload) -> Self {
        Self {
            model_base64: model_image.as_str(),
            clothing_base64: clothing_image.as_str(),
        }
    }
}

/// Response of `POST /api/tryon`.
///
/// `id` is optional on the wire; a missing id is a failed submission.
#[derive(Debug, Deserialize)]
pub struct SubmitResponse {
    #[serde(default)]
    pub id: Option<String>,
}

impl SubmitResponse {
    pub fn job_id(self) -> Option<JobId> {
        self.id.and_then(JobId::parse)
    }
}

/// Response of `GET /api/tryon/status/{id}`.
#[derive(Debug, Deserialize)]
pub struct StatusResponse {
    pub status: String,
    #[serde(default)]
    pub output_url: Option<String>,
    #[serde(default)]
    pub error: Option<String>,
}

impl StatusResponse {
    /// Map the wire shape to a [`JobStatus`].
    ///
    /// Any status other than `succeeded`/`failed` counts as pending. A
    /// `succeeded` report without an output URL is rejected.
    pub fn into_status(self) -> Result<JobStatus, String> {
        match self.status.as_str() {
            STATUS_SUCCEEDED => match self.output_url {
                Some(url) if !url.trim().is_empty() => Ok(JobStatus::Succeeded {
                    output_image_url: url,
                }),
                _ => Err("job reported succeeded without an output_url".to_string()),
            },
            STATUS_FAILED => Ok(JobStatus::Failed { error: self.error }),
            _ => Ok(JobStatus::Pending { raw: self.status }),
        }
    }
}

/// Response of `GET /api/items/full`.
#[derive(Debug, Deserialize)]
pub struct ItemsResponse {
    #[serde(default)]
    pub items: Vec<ClosetItem>,
}

/// Response of `GET /api/models/full`.
#[derive(Debug, Deserialize)]
pub struct ModelsResponse {
    #[serde(default)]
    pub models: Vec<ModelPhoto>,
}

/// Body of `POST /api/items`.
#[derive(Debug, Serialize)]
pub struct NewItemRequest<'a> {
    pub name: &'a str,
    #[serde(rename = "imageBase64")]
    pub image_base64: &'a str,
    /// Required on the wire; the backend re-hosts the image and overwrites it.
    #[serde(rename = "imageUrl")]
    pub image_url: &'a str,
    #[serde(rename = "type")]
    pub item_type: &'a str,
}

/// Response of `POST /api/items`.
///
/// A failed database insert still answers 2xx, with only `error` set.
#[derive(Debug, Deserialize)]
pub struct NewItemResponse {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(rename = "type", default)]
    pub item_type: Option<String>,
    #[serde(default)]
    pub error: Option<String>,
}

impl NewItemResponse {
    /// `Err(Some(msg))` when the backend reported an error, `Err(None)`
    /// when the body carried neither an error nor an id.
    pub fn into_uploaded(self, requested_type: &str) -> Result<UploadedItem, Option<String>> {
        if let Some(error) = self.error {
            return Err(Some(error));
        }
        let id = self.id.filter(|id| !id.trim().is_empty()).ok_or(None)?;
        Ok(UploadedItem {
            id,
            item_type: self.item_type.unwrap_or_else(|| requested_type.to_string()),
        })
    }
}

/// Body of `PUT /api/items/{id}`.
#[derive(Debug, Serialize)]
pub struct UpdateItemTypeRequest<'a> {
    #[serde(rename = "type")]
    pub item_type: &'a str,
}

/// Body of `POST /api/models`.
#[derive(Debug, Serialize)]
pub struct NewModelRequest<'a> {
    pub name: &'a str,
    #[serde(rename = "imageBase64")]
    pub image_base64: &'a str,
    pub gender: &'a str,
    pub style: &'a str,
}

/// Response of `POST /api/models`.
#[derive(Debug, Deserialize)]
pub struct NewModelResponse {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(rename = "imageUrl", default)]
    pub image_url: Option<String>,
}

impl NewModelResponse {
    pub fn into_uploaded(self) -> Option<UploadedModel> {
        let id = self.id.filter(|id| !id.trim().is_empty())?;
        Some(UploadedModel {
            id,
            image_url: self.image_url,
        })
    }
}

/// `{"message": ...}` / `{"error": ...}` acknowledgement used by updates.
#[derive(Debug, Deserialize)]
pub struct MessageResponse {
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub error: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    fn status(json: &str) -> Result<JobStatus, String> {
        serde_json::from_str::<StatusResponse>(json)
            .unwrap()
            .into_status()
    }

    #[test]
    fn submit_request_uses_camel_case_keys() {
        let model = ImagePayload::new("bW9kZWw=").unwrap();
        let cloth = ImagePayload::new("c2hpcnQ=").unwrap();
        let json = serde_json::to_value(SubmitRequest::new(&model, &cloth)).unwrap();
        assert_eq!(json["modelBase64"], "bW9kZWw=");
        assert_eq!(json["clothingBase64"], "c2hpcnQ=");
    }

    #[test]
    fn submit_response_without_id_has_no_job() {
        let parsed: SubmitResponse = serde_json::from_str(r#"{"detail":"nope"}"#).unwrap();
        assert!(parsed.job_id().is_none());
        let parsed: SubmitResponse = serde_json::from_str(r#"{"id":""}"#).unwrap();
        assert!(parsed.job_id().is_none());
    }

    #[test]
    fn succeeded_maps_output_url() {
        assert_eq!(
            status(r#"{"status":"succeeded","output_url":"https://x/y.png"}"#),
            Ok(JobStatus::Succeeded {
                output_image_url: "https://x/y.png".into()
            })
        );
    }

    #[test]
    fn succeeded_without_url_is_malformed() {
        assert!(status(r#"{"status":"succeeded"}"#).is_err());
    }

    #[test]
    fn failed_carries_backend_message() {
        assert_matches!(
            status(r#"{"status":"failed","error":"face not detected"}"#),
            Ok(JobStatus::Failed { error: Some(msg) }) if msg == "face not detected"
        );
    }

    #[test]
    fn unknown_status_is_pending() {
        assert_matches!(
            status(r#"{"status":"processing"}"#),
            Ok(JobStatus::Pending { raw }) if raw == "processing"
        );
        assert_matches!(status(r#"{"status":"submitted"}"#), Ok(JobStatus::Pending { .. }));
    }

    #[test]
    fn new_item_request_uses_backend_keys() {
        let json = serde_json::to_value(NewItemRequest {
            name: "Blue tee",
            image_base64: "aTE=",
            image_url: "",
            item_type: "unknown",
        })
        .unwrap();
        assert_eq!(json["imageBase64"], "aTE=");
        assert_eq!(json["imageUrl"], "");
        assert_eq!(json["type"], "unknown");
    }

    #[test]
    fn new_item_response_prefers_backend_classification() {
        let parsed: NewItemResponse =
            serde_json::from_str(r#"{"id":"i9","type":"pants"}"#).unwrap();
        assert_eq!(
            parsed.into_uploaded("unknown"),
            Ok(UploadedItem {
                id: "i9".into(),
                item_type: "pants".into()
            })
        );

        let parsed: NewItemResponse = serde_json::from_str(r#"{"id":"i9"}"#).unwrap();
        assert_eq!(parsed.into_uploaded("dress").unwrap().item_type, "dress");
    }

    #[test]
    fn new_item_response_surfaces_insert_errors() {
        let parsed: NewItemResponse =
            serde_json::from_str(r#"{"error":"DB insert failed: timeout"}"#).unwrap();
        assert_matches!(parsed.into_uploaded("top"), Err(Some(msg)) if msg.contains("DB insert"));

        let parsed: NewItemResponse = serde_json::from_str("{}").unwrap();
        assert_eq!(parsed.into_uploaded("top"), Err(None));
    }

    #[test]
    fn new_model_response_needs_an_id() {
        let parsed: NewModelResponse =
            serde_json::from_str(r#"{"id":"m9","imageUrl":"https://img/m9.png"}"#).unwrap();
        let uploaded = parsed.into_uploaded().unwrap();
        assert_eq!(uploaded.id, "m9");
        assert_eq!(uploaded.image_url.as_deref(), Some("https://img/m9.png"));

        let parsed: NewModelResponse = serde_json::from_str(r#"{"imageUrl":"x"}"#).unwrap();
        assert!(parsed.into_uploaded().is_none());
    }
}
