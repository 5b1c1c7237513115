//! Category domain types.
//!
//! Categories are read-only over HTTP; the default set is seeded by the CLI.

use chrono::{DateTime, Utc};
use serde::Serialize;

use habitloop_core::CategoryId;

/// A habit category.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Category {
    /// Unique category ID.
    pub id: CategoryId,
    /// Unique category name.
    pub name: String,
    /// Hex color code (e.g. "#3B82F6").
    pub color: String,
    /// Icon name for the frontend icon set.
    pub icon: String,
    /// When the category was created.
    pub created_at: DateTime<Utc>,
}

/// The category fields denormalized into habit and feed payloads.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryRef {
    pub name: String,
    pub color: String,
    pub icon: String,
}
