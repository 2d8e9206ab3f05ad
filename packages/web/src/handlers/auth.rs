//! Landing, signup, login, dashboard and logout.

use api::accounts::{Login, Signup};
use api::auth::session;
use api::{AppError, UserInfo};
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{Html, IntoResponse, Redirect, Response};
use axum::Form;
use tower_sessions::Session;

use crate::extract::CurrentUser;
use crate::routes::AppState;
use crate::views;

const SIGNUP_FAILED: &str = "An error occurred during signup. Please try again.";
const LOGIN_FAILED: &str = "An error occurred during login. Please try again.";

pub async fn landing() -> Html<String> {
    views::landing()
}

pub async fn signup_page() -> Html<String> {
    views::signup(None)
}

pub async fn signup(
    State(state): State<AppState>,
    session: Session,
    Form(form): Form<Signup>,
) -> Response {
    let user = match state.credentials.create(form).await {
        Ok(user) => user,
        Err(AppError::Validation(e)) => {
            return views::signup(Some(&e.to_string())).into_response();
        }
        Err(e) => {
            tracing::error!("Signup failed: {}", e);
            return views::signup(Some(SIGNUP_FAILED)).into_response();
        }
    };

    if let Err(e) = session::establish(&session, &UserInfo::from(&user)).await {
        tracing::error!("Failed to set session: {}", e);
        return views::signup(Some(SIGNUP_FAILED)).into_response();
    }
    Redirect::to("/dashboard").into_response()
}

pub async fn login_page() -> Html<String> {
    views::login(None)
}

pub async fn login(
    State(state): State<AppState>,
    session: Session,
    Form(form): Form<Login>,
) -> Response {
    let user = match state.credentials.authenticate(&form).await {
        Ok(user) => user,
        Err(e @ AppError::Authentication) => {
            return views::login(Some(&e.to_string())).into_response();
        }
        Err(e) => {
            tracing::error!("Login failed: {}", e);
            return views::login(Some(LOGIN_FAILED)).into_response();
        }
    };

    if let Err(e) = session::establish(&session, &UserInfo::from(&user)).await {
        tracing::error!("Failed to set session: {}", e);
        return views::login(Some(LOGIN_FAILED)).into_response();
    }
    Redirect::to("/dashboard").into_response()
}

pub async fn dashboard(CurrentUser(user): CurrentUser) -> Html<String> {
    views::dashboard(&user)
}

pub async fn logout(session: Session) -> Response {
    match session::destroy(&session).await {
        Ok(()) => Redirect::to("/login").into_response(),
        Err(e) => {
            tracing::error!("Error while logging out: {}", e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                "An error occurred during logout.",
            )
                .into_response()
        }
    }
}
