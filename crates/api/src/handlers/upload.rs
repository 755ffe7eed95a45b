//! Handlers for the upload page: form rendering and the ingestion
//! pipeline.
//!
//! POST pipeline: stage uploads to disk, transcribe the optional audio
//! note, stream-hash the image, fetch the vision description, parse it,
//! move the image into the media tree, upsert by hash, render the
//! listing. Staged files are deleted best-effort afterwards.

use std::path::{Path, PathBuf};

use axum::extract::{Multipart, State};
use axum::response::Html;
use tera::Context;
use tokio::io::AsyncReadExt;

use catalens_core::description::parse_description_line;
use catalens_core::hashing::{ContentHasher, HASH_CHUNK_SIZE};
use catalens_db::models::catalog_entry::{CatalogEntry, NewCatalogEntry};
use catalens_db::repositories::CatalogEntryRepo;

use crate::error::{AppError, AppResult};
use crate::render::render_page;
use crate::state::AppState;

/// Multipart field carrying the optional audio note.
const AUDIO_FIELD: &str = "audio_file";
/// Multipart field carrying the image.
const IMAGE_FIELD: &str = "image_file";

/// One staged upload: original filename plus its temporary location.
struct StagedFile {
    filename: String,
    path: PathBuf,
}

/// GET / -- empty upload form.
pub async fn upload_form(State(state): State<AppState>) -> AppResult<Html<String>> {
    render_page(&state.templates, "upload.html", &Context::new())
}

/// POST / -- ingest an image (and optional audio note), then render the
/// listing with the freshly derived description.
pub async fn upload_files(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> AppResult<Html<String>> {
    let staging_dir = state.config.media_dir.join("tmp");
    tokio::fs::create_dir_all(&staging_dir)
        .await
        .map_err(|e| AppError::InternalError(format!("Failed to create staging dir: {e}")))?;

    let mut audio: Option<StagedFile> = None;
    let mut image: Option<StagedFile> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::BadRequest(e.to_string()))?
    {
        let Some(name) = field.name().map(str::to_string) else {
            continue;
        };
        if name != AUDIO_FIELD && name != IMAGE_FIELD {
            continue;
        }

        let filename = field.file_name().unwrap_or("upload").to_string();
        let data = field
            .bytes()
            .await
            .map_err(|e| AppError::BadRequest(e.to_string()))?;
        if data.is_empty() {
            continue;
        }

        let staged = stage_upload(&staging_dir, &filename, &data).await?;
        match name.as_str() {
            AUDIO_FIELD => audio = Some(staged),
            _ => image = Some(staged),
        }
    }

    // No image: same as a non-POST visit, show the empty form.
    let Some(image) = image else {
        if let Some(audio) = audio {
            remove_staged(&audio.path).await;
        }
        return render_page(&state.templates, "upload.html", &Context::new());
    };

    let mut transcription: Option<String> = None;
    if let Some(audio) = audio {
        let result = transcribe_staged(&state, &audio).await;
        remove_staged(&audio.path).await;
        transcription = Some(result?);
    }

    let result = process_image(&state, &image, transcription.as_deref()).await;
    remove_staged(&image.path).await;
    let entry = result?;

    let images = CatalogEntryRepo::list_all(&state.pool).await?;
    let mut context = Context::new();
    context.insert("images", &images);
    context.insert("image_description", &entry);
    render_page(&state.templates, "imagelist.html", &context)
}

/// Read a staged audio note back and send it for transcription.
async fn transcribe_staged(state: &AppState, audio: &StagedFile) -> Result<String, AppError> {
    let bytes = tokio::fs::read(&audio.path)
        .await
        .map_err(|e| AppError::InternalError(format!("Failed to read staged audio: {e}")))?;
    Ok(state.openai.transcribe(bytes, &audio.filename).await?)
}

/// Hash, describe, parse, store, and upsert one staged image.
///
/// The staged file itself is left for the caller to clean up.
async fn process_image(
    state: &AppState,
    image: &StagedFile,
    transcription: Option<&str>,
) -> Result<CatalogEntry, AppError> {
    let image_hash = hash_file(&image.path)
        .await
        .map_err(|e| AppError::InternalError(format!("Failed to hash upload: {e}")))?;

    let bytes = tokio::fs::read(&image.path)
        .await
        .map_err(|e| AppError::InternalError(format!("Failed to read staged image: {e}")))?;

    let line = state.openai.describe_image(&bytes).await?;
    tracing::debug!(%image_hash, line = %line, "Received description line");

    let parsed = parse_description_line(&line, transcription);

    // Most recent upload wins: the stored binary is keyed by hash, so a
    // repeat upload simply replaces it.
    let image_path =
        store_image(&state.config.media_dir, &image_hash, &image.filename, &bytes).await?;

    let input = NewCatalogEntry {
        object_name: parsed.object_name,
        color: parsed.color,
        image_path,
        dimensions: parsed.dimensions,
        image_hash,
        manufacturer: parsed.manufacturer,
        specification: parsed.specification,
        description: parsed.description,
    };
    Ok(CatalogEntryRepo::upsert_by_hash(&state.pool, &input).await?)
}

/// Write an uploaded field to the staging directory under a unique name.
async fn stage_upload(
    staging_dir: &Path,
    filename: &str,
    data: &[u8],
) -> Result<StagedFile, AppError> {
    // Browsers may send a path; keep only the basename.
    let basename = filename.rsplit(['/', '\\']).next().unwrap_or(filename);
    let path = staging_dir.join(format!("{}-{basename}", uuid::Uuid::new_v4()));
    tokio::fs::write(&path, data)
        .await
        .map_err(|e| AppError::InternalError(format!("Failed to stage upload: {e}")))?;
    Ok(StagedFile {
        filename: basename.to_string(),
        path,
    })
}

/// Best-effort removal of a staged file. Failures are logged and do not
/// abort the request.
async fn remove_staged(path: &Path) {
    if let Err(e) = tokio::fs::remove_file(path).await {
        tracing::warn!(path = %path.display(), error = %e, "Failed to delete staged upload");
    }
}

/// Stream a staged file through the content hasher in fixed-size chunks.
async fn hash_file(path: &Path) -> std::io::Result<String> {
    let mut file = tokio::fs::File::open(path).await?;
    let mut hasher = ContentHasher::new();
    let mut buf = [0u8; HASH_CHUNK_SIZE];
    loop {
        let n = file.read(&mut buf).await?;
        if n == 0 {
            break;
        }
        hasher.update(&buf[..n]);
    }
    Ok(hasher.finish())
}

/// Write the upload under `{media_dir}/images/{hash}{ext}` and return
/// the media-relative path stored in the database.
async fn store_image(
    media_dir: &Path,
    hash: &str,
    filename: &str,
    bytes: &[u8],
) -> Result<String, AppError> {
    let relative = format!("images/{hash}{}", image_extension(filename));
    let dest = media_dir.join(&relative);
    if let Some(parent) = dest.parent() {
        tokio::fs::create_dir_all(parent)
            .await
            .map_err(|e| AppError::InternalError(format!("Failed to create media dir: {e}")))?;
    }
    tokio::fs::write(&dest, bytes)
        .await
        .map_err(|e| AppError::InternalError(format!("Failed to store image: {e}")))?;
    Ok(relative)
}

/// File extension of the original upload (with leading dot), or empty
/// if it has none.
fn image_extension(filename: &str) -> &str {
    match filename.rfind('.') {
        Some(idx) if idx + 1 < filename.len() => &filename[idx..],
        _ => "",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use catalens_core::hashing::sha256_hex;

    #[test]
    fn image_extension_cases() {
        assert_eq!(image_extension("photo.jpg"), ".jpg");
        assert_eq!(image_extension("archive.tar.gz"), ".gz");
        assert_eq!(image_extension("noext"), "");
        assert_eq!(image_extension("trailing."), "");
    }

    #[tokio::test]
    async fn hash_file_matches_one_shot_digest() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("upload.bin");
        let data: Vec<u8> = (0u8..=255).cycle().take(3 * HASH_CHUNK_SIZE + 17).collect();
        tokio::fs::write(&path, &data).await.unwrap();

        assert_eq!(hash_file(&path).await.unwrap(), sha256_hex(&data));
    }

    #[tokio::test]
    async fn store_image_is_keyed_by_hash() {
        let dir = tempfile::tempdir().unwrap();

        let first = store_image(dir.path(), "abc123", "lamp.jpg", b"one")
            .await
            .unwrap();
        assert_eq!(first, "images/abc123.jpg");

        // Same hash again: newest upload wins.
        store_image(dir.path(), "abc123", "lamp.jpg", b"two")
            .await
            .unwrap();
        let stored = tokio::fs::read(dir.path().join(&first)).await.unwrap();
        assert_eq!(stored, b"two");
    }
}
