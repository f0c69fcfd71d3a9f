//! Closet catalog: clothing items, model photos and category filtering.

use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::image::ImagePayload;
use crate::types::RecordId;

// ---------------------------------------------------------------------------
// Categories
// ---------------------------------------------------------------------------

/// Pseudo-category that matches every item.
pub const CATEGORY_ALL: &str = "All";

/// Item type given to stored try-on results.
pub const CATEGORY_TRYON: &str = "tryon";

/// Item type that asks the backend to classify the upload itself.
pub const TYPE_UNKNOWN: &str = "unknown";

/// Gender and style of a model photo uploaded without them.
pub const UNSPECIFIED: &str = "unspecified";

/// Categories offered by the closet browser, in display order.
pub const CATEGORIES: &[&str] = &[
    CATEGORY_TRYON,
    CATEGORY_ALL,
    "top",
    "pants",
    "pajama",
    "t-shirt",
    "jacket",
    "dress",
    "others",
    "underwear",
    "shoes",
    "socks",
];

/// Validate a category name against [`CATEGORIES`] (case-insensitive).
pub fn validate_category(category: &str) -> Result<(), CoreError> {
    if CATEGORIES.iter().any(|c| c.eq_ignore_ascii_case(category)) {
        Ok(())
    } else {
        Err(CoreError::Validation(format!(
            "Invalid category '{category}'. Must be one of: {}",
            CATEGORIES.join(", ")
        )))
    }
}

/// Validate a type to store on an item.
///
/// Any non-blank name is accepted since the backend's classifier may add
/// types outside [`CATEGORIES`]; the [`CATEGORY_ALL`] pseudo-category is not
/// a type.
pub fn validate_item_type(item_type: &str) -> Result<(), CoreError> {
    let trimmed = item_type.trim();
    if trimmed.is_empty() {
        return Err(CoreError::Validation("item type must not be empty".to_string()));
    }
    if trimmed.eq_ignore_ascii_case(CATEGORY_ALL) {
        return Err(CoreError::Validation(format!(
            "'{CATEGORY_ALL}' is a filter, not an item type"
        )));
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Entries
// ---------------------------------------------------------------------------

/// A clothing item stored in the closet.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClosetItem {
    #[serde(rename = "_id")]
    pub id: RecordId,
    #[serde(default)]
    pub name: String,
    #[serde(rename = "type", default = "unknown_type")]
    pub item_type: String,
    #[serde(rename = "imageUrl", default)]
    pub image_url: Option<String>,
    #[serde(rename = "imageBase64", default)]
    pub image_base64: Option<String>,
}

/// A model photo that clothing can be tried on.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModelPhoto {
    #[serde(rename = "_id")]
    pub id: RecordId,
    #[serde(default)]
    pub name: String,
    #[serde(rename = "imageUrl", default)]
    pub image_url: Option<String>,
    #[serde(rename = "imageBase64", default)]
    pub image_base64: Option<String>,
    #[serde(default)]
    pub gender: Option<String>,
    #[serde(default)]
    pub style: Option<String>,
}

/// Result of adding an item to the closet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadedItem {
    pub id: RecordId,
    /// Stored type; the backend's classification when uploaded as
    /// [`TYPE_UNKNOWN`].
    pub item_type: String,
}

/// Result of adding a model photo.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadedModel {
    pub id: RecordId,
    /// Where the backend hosts the uploaded photo.
    pub image_url: Option<String>,
}

fn unknown_type() -> String {
    TYPE_UNKNOWN.to_string()
}

impl ClosetItem {
    /// The embedded image payload, if the catalog was fetched with payloads.
    pub fn payload(&self) -> Option<ImagePayload> {
        self.image_base64
            .as_deref()
            .and_then(|b64| ImagePayload::new(b64).ok())
    }

    pub fn matches_category(&self, category: &str) -> bool {
        category.eq_ignore_ascii_case(CATEGORY_ALL)
            || self
                .item_type
                .to_lowercase()
                .contains(&category.to_lowercase())
    }
}

impl ModelPhoto {
    pub fn payload(&self) -> Option<ImagePayload> {
        self.image_base64
            .as_deref()
            .and_then(|b64| ImagePayload::new(b64).ok())
    }
}

/// Items whose type matches `category`.
///
/// [`CATEGORY_ALL`] keeps everything; any other category matches items
/// whose type contains it, ignoring case (so `"pants"` also selects
/// `"long-pants"`).
pub fn filter_by_category<'a>(items: &'a [ClosetItem], category: &str) -> Vec<&'a ClosetItem> {
    items
        .iter()
        .filter(|item| item.matches_category(category))
        .collect()
}

pub fn find_item<'a>(items: &'a [ClosetItem], id: &str) -> Result<&'a ClosetItem, CoreError> {
    items.iter().find(|i| i.id == id).ok_or_else(|| CoreError::NotFound {
        entity: "item",
        id: id.to_string(),
    })
}

pub fn find_model<'a>(models: &'a [ModelPhoto], id: &str) -> Result<&'a ModelPhoto, CoreError> {
    models.iter().find(|m| m.id == id).ok_or_else(|| CoreError::NotFound {
        entity: "model",
        id: id.to_string(),
    })
}
