//! Authentication guard.

use api::auth::session;
use api::UserInfo;
use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use axum::response::{IntoResponse, Redirect, Response};
use tower_sessions::Session;

/// The session's user snapshot. Extracting it from an anonymous request
/// redirects to `/login`.
pub struct CurrentUser(pub UserInfo);

impl<S> FromRequestParts<S> for CurrentUser
where
    S: Send + Sync,
{
    type Rejection = Response;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let session = Session::from_request_parts(parts, state)
            .await
            .map_err(IntoResponse::into_response)?;

        match session::current_user(&session).await {
            Ok(Some(user)) => Ok(CurrentUser(user)),
            Ok(None) => Err(Redirect::to("/login").into_response()),
            Err(e) => {
                tracing::error!("Failed to read session: {}", e);
                Err(Redirect::to("/login").into_response())
            }
        }
    }
}
