//! Catalog entry model and DTOs.

use catalens_core::types::{DbId, Timestamp};
use serde::Serialize;
use sqlx::FromRow;

/// A row from the `catalog_entries` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct CatalogEntry {
    pub id: DbId,
    pub object_name: String,
    pub color: String,
    /// How many times this exact image has been uploaded.
    pub count: i32,
    /// Media-relative path of the stored binary; the most recent upload
    /// wins on dedup.
    pub image_path: String,
    /// Formatted as `"Height={h}cm, Width={w}cm"`.
    pub dimensions: String,
    /// Lowercase SHA-256 hex digest of the raw upload bytes. Unique.
    pub image_hash: String,
    pub manufacturer: String,
    pub specification: String,
    pub description: String,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for the upsert path.
///
/// Carries everything a fresh row needs. On a hash hit only
/// `description` and `image_path` are applied; the other fields keep
/// the stored row's values.
#[derive(Debug, Clone)]
pub struct NewCatalogEntry {
    pub object_name: String,
    pub color: String,
    pub image_path: String,
    pub dimensions: String,
    pub image_hash: String,
    pub manufacturer: String,
    pub specification: String,
    pub description: String,
}
