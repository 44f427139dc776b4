//! Page and collection models.
//!
//! Create and update requests can be built from loose JSON objects; field
//! names the API does not accept are rejected with [`Error::Validation`]
//! before any request is sent.
//!
//! ```
//! use domo_rs::PageUpdate;
//!
//! let ok = PageUpdate::try_from(serde_json::json!({"locked": true, "cardIds": [1, 2]}));
//! assert!(ok.is_ok());
//!
//! let bad = PageUpdate::try_from(serde_json::json!({"lockd": true}));
//! assert!(bad.is_err());
//! ```
//!
//! [`Error::Validation`]: crate::Error::Validation

use serde::{Deserialize, Serialize};

use super::primitives::{CardId, CollectionId, GroupId, PageId, UserId};
use crate::Error;

/// Users and groups who can see a page.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Visibility {
    /// Users with access
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub user_ids: Vec<UserId>,
    /// Groups with access
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub group_ids: Vec<GroupId>,
}

/// A page, possibly with nested sub-pages.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Page {
    /// Page id
    pub id: PageId,
    /// Page name
    #[serde(default)]
    pub name: String,
    /// Parent page, `0` or absent for top-level pages
    #[serde(default)]
    pub parent_id: Option<PageId>,
    /// Owner
    #[serde(default)]
    pub owner_id: Option<UserId>,
    /// Whether the page is locked
    #[serde(default)]
    pub locked: bool,
    /// Cards on the page
    #[serde(default)]
    pub card_ids: Vec<CardId>,
    /// Collections in display order
    #[serde(default)]
    pub collection_ids: Vec<CollectionId>,
    /// Who can see the page
    #[serde(default)]
    pub visibility: Option<Visibility>,
    /// Sub-pages (list results only)
    #[serde(default)]
    pub children: Vec<Page>,
}

/// A collection of cards on a page.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Collection {
    /// Collection id
    pub id: CollectionId,
    /// Title
    #[serde(default)]
    pub title: String,
    /// Description
    #[serde(default)]
    pub description: Option<String>,
    /// Cards in the collection
    #[serde(default)]
    pub card_ids: Vec<CardId>,
}

/// Request body for creating a page.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct PageRequest {
    /// Page name
    pub name: String,
    /// Create as a sub-page of this page
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent_id: Option<PageId>,
    /// Lock the page
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub locked: Option<bool>,
    /// Cards to place on the page
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub card_ids: Option<Vec<CardId>>,
    /// Who can see the page
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub visibility: Option<Visibility>,
}

impl PageRequest {
    /// Create a request with a page name.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }
}

/// Partial update of a page. Unset fields are left unchanged.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct PageUpdate {
    /// Rename the page
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Move under another page; `0` makes it top-level
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent_id: Option<PageId>,
    /// Change the owner
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub owner_id: Option<UserId>,
    /// Lock or unlock
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub locked: Option<bool>,
    /// Reorder collections
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub collection_ids: Option<Vec<CollectionId>>,
    /// Replace the cards on the page
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub card_ids: Option<Vec<CardId>>,
    /// Change who can see the page
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub visibility: Option<Visibility>,
}

/// Request body for creating a collection.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct CollectionRequest {
    /// Title
    pub title: String,
    /// Description
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Cards to place in the collection
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub card_ids: Option<Vec<CardId>>,
}

impl CollectionRequest {
    /// Create a request with a title.
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            ..Default::default()
        }
    }
}

/// Partial update of a collection.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct CollectionUpdate {
    /// New title
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    /// New description
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Replace the cards in the collection
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub card_ids: Option<Vec<CardId>>,
}

macro_rules! try_from_loose_json {
    ($($ty:ident => $what:literal),* $(,)?) => {
        $(
            impl TryFrom<serde_json::Value> for $ty {
                type Error = Error;

                fn try_from(value: serde_json::Value) -> Result<Self, Self::Error> {
                    serde_json::from_value(value)
                        .map_err(|e| Error::Validation(format!("invalid {}: {}", $what, e)))
                }
            }
        )*
    };
}

try_from_loose_json!(
    PageRequest => "page request",
    PageUpdate => "page update",
    CollectionRequest => "collection request",
    CollectionUpdate => "collection update",
);
