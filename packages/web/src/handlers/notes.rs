//! Upload, listing and download of notes.

use std::path::Path as FsPath;

use api::notes::{upload_note, IncomingFile, NoteDraft};
use api::{AppError, DownloadPolicy};
use axum::extract::multipart::MultipartError;
use axum::extract::{Multipart, Path, State};
use axum::http::{header, HeaderValue, StatusCode};
use axum::response::{Html, IntoResponse, Redirect, Response};
use uuid::Uuid;

use crate::extract::CurrentUser;
use crate::routes::AppState;
use crate::views;

/// Multipart field carrying the file.
const FILE_FIELD: &str = "noteFile";

fn plain(status: StatusCode, message: &'static str) -> Response {
    (status, message).into_response()
}

/// 413 when the body limit was hit, 400 for any other malformed upload.
fn unreadable_upload(err: MultipartError) -> Response {
    tracing::warn!("Failed to read upload: {}", err);
    match err.status() {
        StatusCode::PAYLOAD_TOO_LARGE => plain(StatusCode::PAYLOAD_TOO_LARGE, "File too large."),
        _ => plain(StatusCode::BAD_REQUEST, "Failed to read upload."),
    }
}

pub async fn upload_page(CurrentUser(_user): CurrentUser) -> Html<String> {
    views::upload(None)
}

pub async fn upload(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    mut multipart: Multipart,
) -> Response {
    let mut draft = NoteDraft::default();
    let mut file: Option<IncomingFile> = None;

    loop {
        let field = match multipart.next_field().await {
            Ok(Some(field)) => field,
            Ok(None) => break,
            Err(e) => return unreadable_upload(e),
        };

        let name = field.name().unwrap_or_default().to_string();
        let file_name = field.file_name().map(str::to_string);

        if name == FILE_FIELD {
            let Some(file_name) = file_name.filter(|n| !n.is_empty()) else {
                continue;
            };
            match field.bytes().await {
                Ok(bytes) => {
                    file = Some(IncomingFile {
                        file_name,
                        bytes: bytes.to_vec(),
                    })
                }
                Err(e) => return unreadable_upload(e),
            }
            continue;
        }

        let value = match field.text().await {
            Ok(value) => value,
            Err(e) => return unreadable_upload(e),
        };
        match name.as_str() {
            "branch" => draft.branch = value,
            "subject" => draft.subject = value,
            "description" => draft.description = value,
            _ => {}
        }
    }

    let Some(file) = file else {
        return plain(StatusCode::BAD_REQUEST, "No file uploaded.");
    };

    match upload_note(&state.uploads, &state.notes, user.id, &draft, &file).await {
        Ok(_) => Redirect::to("/dashboard").into_response(),
        Err(AppError::Validation(e)) => {
            (StatusCode::BAD_REQUEST, views::upload(Some(&e.to_string()))).into_response()
        }
        Err(AppError::UnsupportedFileType(name)) => {
            tracing::info!("Rejected upload with unsupported type: {}", name);
            plain(StatusCode::BAD_REQUEST, "File type not supported")
        }
        Err(_) => plain(StatusCode::INTERNAL_SERVER_ERROR, "Error saving note."),
    }
}

pub async fn my_notes(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
) -> Response {
    match state.notes.list_by_owner(user.id).await {
        Ok(notes) => views::my_notes(&user.full_name, &notes).into_response(),
        Err(e) => {
            tracing::error!("Failed to list notes for {}: {}", user.id, e);
            plain(StatusCode::INTERNAL_SERVER_ERROR, "Server Error")
        }
    }
}

pub async fn all_notes(State(state): State<AppState>) -> Html<String> {
    match state.notes.list_all().await {
        Ok(notes) => views::all_notes(&notes, None),
        Err(e) => {
            tracing::error!("Error fetching notes: {}", e);
            views::all_notes(&[], Some("Error fetching notes"))
        }
    }
}

pub async fn download(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path(id): Path<String>,
) -> Response {
    let Ok(id) = Uuid::parse_str(&id) else {
        return plain(StatusCode::NOT_FOUND, "File not found");
    };

    let note = match state.notes.get_by_id(id).await {
        Ok(Some(note)) => note,
        Ok(None) => return plain(StatusCode::NOT_FOUND, "File not found"),
        Err(e) => {
            tracing::error!("Failed to load note {}: {}", id, e);
            return plain(StatusCode::INTERNAL_SERVER_ERROR, "Server Error");
        }
    };

    if state.download_policy == DownloadPolicy::OwnerOnly && note.uploaded_by != user.id {
        tracing::info!(note_id = %note.id, user_id = %user.id, "Download denied");
        return plain(StatusCode::FORBIDDEN, "Access denied");
    }

    let bytes = match state.uploads.read(&note.file).await {
        Ok(Some(bytes)) => bytes,
        Ok(None) => {
            tracing::warn!(note_id = %note.id, "File missing on disk: {}", note.file);
            return plain(StatusCode::NOT_FOUND, "File not found");
        }
        Err(e) => {
            tracing::error!("Error during file download: {}", e);
            return plain(StatusCode::INTERNAL_SERVER_ERROR, "Server Error");
        }
    };

    let file_name = FsPath::new(&note.file)
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or("download");
    let disposition = HeaderValue::from_str(&format!("attachment; filename=\"{}\"", file_name))
        .unwrap_or_else(|_| HeaderValue::from_static("attachment"));

    (
        [
            (
                header::CONTENT_TYPE,
                HeaderValue::from_static(store::uploads::content_type(file_name)),
            ),
            (header::CONTENT_DISPOSITION, disposition),
        ],
        bytes,
    )
        .into_response()
}
