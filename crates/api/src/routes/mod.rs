//! Route table assembly.
//!
//! ```text
//! /                GET upload form, POST ingest
//! /images          GET catalog listing
//! /images/{id}     GET entry detail
//! /health          GET liveness (mounted separately in main)
//! /media/*         static files (mounted separately in main)
//! ```

pub mod health;

use axum::routing::get;
use axum::Router;

use crate::handlers::{catalog, upload};
use crate::state::AppState;

/// Page routes for the upload form and catalog views.
pub fn page_routes() -> Router<AppState> {
    Router::new()
        // Any method other than POST gets the empty form.
        .route(
            "/",
            get(upload::upload_form)
                .post(upload::upload_files)
                .fallback(upload::upload_form),
        )
        .route("/images", get(catalog::image_list))
        .route("/images/{id}", get(catalog::image_detail))
}
