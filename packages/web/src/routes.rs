//! Router assembly and shared state.

use api::settings::Session as SessionSettings;
use api::{CredentialStore, DownloadPolicy, NoteStore};
use axum::extract::DefaultBodyLimit;
use axum::routing::get;
use axum::Router;
use store::UploadDir;
use tower_http::trace::TraceLayer;
use tower_sessions::cookie::time::Duration;
use tower_sessions::cookie::SameSite;
use tower_sessions::{Expiry, SessionManagerLayer, SessionStore};

use crate::handlers::{auth, notes};

#[derive(Clone)]
pub struct AppState {
    pub credentials: CredentialStore,
    pub notes: NoteStore,
    pub uploads: UploadDir,
    pub download_policy: DownloadPolicy,
}

/// All endpoints. The caller adds the session layer.
pub fn router(state: AppState, max_upload_bytes: usize) -> Router {
    Router::new()
        .route("/", get(auth::landing))
        .route("/signup", get(auth::signup_page).post(auth::signup))
        .route("/login", get(auth::login_page).post(auth::login))
        .route("/dashboard", get(auth::dashboard))
        .route("/logout", get(auth::logout))
        .route(
            "/upload-notes",
            get(notes::upload_page)
                .post(notes::upload)
                .layer(DefaultBodyLimit::max(max_upload_bytes)),
        )
        .route("/view-my-notes", get(notes::my_notes))
        .route("/view-all-notes", get(notes::all_notes))
        .route("/download/{id}", get(notes::download))
        .with_state(state)
        .layer(TraceLayer::new_for_http())
}

/// Session cookie configuration shared by production and tests.
pub fn session_layer<S: SessionStore>(
    store: S,
    settings: &SessionSettings,
) -> SessionManagerLayer<S> {
    SessionManagerLayer::new(store)
        .with_secure(settings.secure)
        .with_same_site(SameSite::Lax)
        .with_expiry(Expiry::OnInactivity(Duration::days(
            settings.inactivity_days,
        )))
}
