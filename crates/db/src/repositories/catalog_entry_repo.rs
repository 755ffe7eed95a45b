//! Repository for the `catalog_entries` table.

use catalens_core::types::DbId;
use sqlx::PgPool;

use crate::models::catalog_entry::{CatalogEntry, NewCatalogEntry};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, object_name, color, count, image_path, dimensions, image_hash, \
     manufacturer, specification, description, created_at, updated_at";

/// Provides lookup and upsert operations for catalog entries.
pub struct CatalogEntryRepo;

impl CatalogEntryRepo {
    /// Insert a new entry, or bump the existing one with the same image
    /// hash.
    ///
    /// A single atomic statement guarded by the
    /// `uq_catalog_entries_image_hash` constraint, so two concurrent
    /// uploads of the same image cannot both insert. On a hash hit the
    /// counter increments and only `description` and `image_path` take
    /// the new upload's values; everything else keeps the stored row.
    /// Returns the post-write row.
    pub async fn upsert_by_hash(
        pool: &PgPool,
        input: &NewCatalogEntry,
    ) -> Result<CatalogEntry, sqlx::Error> {
        let query = format!(
            "INSERT INTO catalog_entries
                 (object_name, color, count, image_path, dimensions, image_hash,
                  manufacturer, specification, description)
             VALUES ($1, $2, 1, $3, $4, $5, $6, $7, $8)
             ON CONFLICT (image_hash) DO UPDATE SET
                 count = catalog_entries.count + 1,
                 description = EXCLUDED.description,
                 image_path = EXCLUDED.image_path,
                 updated_at = now()
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, CatalogEntry>(&query)
            .bind(&input.object_name)
            .bind(&input.color)
            .bind(&input.image_path)
            .bind(&input.dimensions)
            .bind(&input.image_hash)
            .bind(&input.manufacturer)
            .bind(&input.specification)
            .bind(&input.description)
            .fetch_one(pool)
            .await
    }

    /// Find an entry by its internal ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<CatalogEntry>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM catalog_entries WHERE id = $1");
        sqlx::query_as::<_, CatalogEntry>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Find an entry by its content hash.
    pub async fn find_by_hash(
        pool: &PgPool,
        image_hash: &str,
    ) -> Result<Option<CatalogEntry>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM catalog_entries WHERE image_hash = $1");
        sqlx::query_as::<_, CatalogEntry>(&query)
            .bind(image_hash)
            .fetch_optional(pool)
            .await
    }

    /// List all entries, most recently created first.
    pub async fn list_all(pool: &PgPool) -> Result<Vec<CatalogEntry>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM catalog_entries ORDER BY created_at DESC");
        sqlx::query_as::<_, CatalogEntry>(&query)
            .fetch_all(pool)
            .await
    }
}
