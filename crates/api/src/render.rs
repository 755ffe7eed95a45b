//! Tera template registry for the HTML pages.
//!
//! The three page templates are compiled into the binary, so the server
//! has no template directory to locate at runtime.

use axum::response::Html;
use tera::{Context, Tera};

use crate::error::AppResult;

/// Build the template registry.
///
/// Fails only if a bundled template is syntactically invalid, so the
/// binary treats an error here as fatal at startup.
pub fn build_templates() -> Result<Tera, tera::Error> {
    let mut tera = Tera::default();
    tera.add_raw_templates(vec![
        ("upload.html", include_str!("../templates/upload.html")),
        ("imagelist.html", include_str!("../templates/imagelist.html")),
        (
            "image_detail.html",
            include_str!("../templates/image_detail.html"),
        ),
    ])?;
    Ok(tera)
}

/// Render a named template into an HTML response.
pub fn render_page(tera: &Tera, name: &str, context: &Context) -> AppResult<Html<String>> {
    Ok(Html(tera.render(name, context)?))
}
