//! Handlers for the catalog listing and detail pages.

use axum::extract::{Path, State};
use axum::response::Html;
use tera::Context;

use catalens_core::error::CoreError;
use catalens_core::types::DbId;
use catalens_db::repositories::CatalogEntryRepo;

use crate::error::{AppError, AppResult};
use crate::render::render_page;
use crate::state::AppState;

/// GET /images -- all catalog entries, newest first.
pub async fn image_list(State(state): State<AppState>) -> AppResult<Html<String>> {
    let images = CatalogEntryRepo::list_all(&state.pool).await?;

    let mut context = Context::new();
    context.insert("images", &images);
    render_page(&state.templates, "imagelist.html", &context)
}

/// GET /images/{id} -- single entry, 404 on unknown id.
pub async fn image_detail(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Html<String>> {
    let image = CatalogEntryRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "CatalogEntry",
            id,
        }))?;

    let mut context = Context::new();
    context.insert("image", &image);
    render_page(&state.templates, "image_detail.html", &context)
}
